pub const MEMORY_SIZE: usize = 4096;
pub const SCREEN_WIDTH: u8 = 64;
pub const SCREEN_HEIGHT: u8 = 32;
pub const FONT_OFFSET: u16 = 0;
pub const PROGRAM_OFFSET: u16 = 0x200;
pub const STACK_DEPTH: usize = 16;

/// A 16 bit memory address, also used for the program counter and the
/// I register.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Address(pub u16);

impl Address {
    pub fn incr(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    pub fn offset(self, off: u16) -> Address {
        Address(self.0.wrapping_add(off))
    }
}

/// Index of one of the 16 general purpose registers V0 to VF.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Register(pub u8);

/// An 8 bit value as held by registers, timers and memory cells.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Value(pub u8);
