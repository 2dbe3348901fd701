use super::basics::{Address, Register, Value, FONT_OFFSET, PROGRAM_OFFSET, STACK_DEPTH};
use super::devices::{Graphics, Keyboard};
use super::memory::{Memory, MemoryError};
use super::program::Instruction;
use arrayvec::ArrayVec;
use rand::Rng;
use thiserror::Error;

/// The 4x5 pixel glyphs for the digits 0 to F, five bytes each. Programs
/// reach them through `SpriteAddr`, which expects the table at `FONT_OFFSET`.
const FONT_SPRITES: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, 0x20, 0x60, 0x20, 0x20, 0x70, 0xF0, 0x10, 0xF0, 0x80,
    0xF0, 0xF0, 0x10, 0xF0, 0x10, 0xF0, 0x90, 0x90, 0xF0, 0x10, 0x10, 0xF0, 0x80, 0xF0,
    0x10, 0xF0, 0xF0, 0x80, 0xF0, 0x90, 0xF0, 0xF0, 0x10, 0x20, 0x40, 0x40, 0xF0, 0x90,
    0xF0, 0x90, 0xF0, 0xF0, 0x90, 0xF0, 0x10, 0xF0, 0xF0, 0x90, 0xF0, 0x90, 0x90, 0xE0,
    0x90, 0xE0, 0x90, 0xE0, 0xF0, 0x80, 0x80, 0x80, 0xF0, 0xE0, 0x90, 0x90, 0x90, 0xE0,
    0xF0, 0x70, 0xF0, 0x80, 0xF0, 0xF0, 0x80, 0xF0, 0x80, 0x80,
];

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmError {
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error("call stack limit of {limit} frames exceeded")]
    StackOverflow { limit: usize },
}

/// Holds the state of a virtual machine in action and executes instructions
/// against it: the 16 registers, the program counter, the I register, the
/// call stack, the two timers and the memory, plus the display and keyboard
/// the machine talks to.
///
/// The machine never fetches its next instruction itself; the driver reads
/// a word at the program counter and hands it to [`execute`].
///
/// [`execute`]: VirtualMachine::execute
pub struct VirtualMachine<G: Graphics, K: Keyboard> {
    program_counter: Address,
    stack: Vec<Address>,
    stack_limit: usize,
    registers: [Value; 16],
    register_i: Address,
    delay_timer: Value,
    sound_timer: Value,
    memory: Memory,
    graphics: G,
    keyboard: K,
    rng: Box<dyn FnMut() -> u8>,
}

impl<G: Graphics, K: Keyboard> VirtualMachine<G, K> {
    /// Creates a new VM instance with zeroed registers, timers and memory.
    pub fn new(memory_size: usize, graphics: G, keyboard: K) -> VirtualMachine<G, K> {
        Self::with_rng(
            memory_size,
            graphics,
            keyboard,
            Box::new(|| rand::thread_rng().gen()),
        )
    }

    /// Same as [`new`], with the random source for `Rand` supplied by the
    /// caller. Tests inject a fixed sequence here.
    ///
    /// [`new`]: VirtualMachine::new
    pub fn with_rng(
        memory_size: usize,
        graphics: G,
        keyboard: K,
        rng: Box<dyn FnMut() -> u8>,
    ) -> VirtualMachine<G, K> {
        let mut stack = Vec::new();
        stack.reserve(STACK_DEPTH);

        VirtualMachine {
            program_counter: Address(0),
            stack,
            stack_limit: STACK_DEPTH,
            registers: [Value(0); 16],
            register_i: Address(0),
            delay_timer: Value(0),
            sound_timer: Value(0),
            memory: Memory::new(memory_size),
            graphics,
            keyboard,
            rng,
        }
    }

    pub fn program_counter(&self) -> Address {
        self.program_counter
    }

    pub fn pointer(&self) -> Address {
        self.register_i
    }

    pub fn registers(&self) -> &[Value; 16] {
        &self.registers
    }

    pub fn delay_timer(&self) -> Value {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> Value {
        self.sound_timer
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Caps the call stack. Calls past the limit fail with
    /// [`VmError::StackOverflow`].
    pub fn set_stack_limit(&mut self, limit: usize) {
        self.stack_limit = limit;
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn graphics(&self) -> &G {
        &self.graphics
    }

    /// Writes the font glyphs to `FONT_OFFSET`.
    pub fn load_font(&mut self) -> Result<(), VmError> {
        for (i, font_byte) in FONT_SPRITES.iter().enumerate() {
            self.memory
                .write_byte(Address(FONT_OFFSET).offset(i as u16), Value(*font_byte))?;
        }
        Ok(())
    }

    /// Copies a program to `PROGRAM_OFFSET` and points the program counter
    /// at its first instruction.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), VmError> {
        for (i, rom_byte) in rom.iter().enumerate() {
            self.memory
                .write_byte(Address(PROGRAM_OFFSET).offset(i as u16), Value(*rom_byte))?;
        }
        self.program_counter = Address(PROGRAM_OFFSET);
        Ok(())
    }

    /// Counts both timers down by one, stopping at zero. The driver calls
    /// this at its own 60 Hz cadence; instructions only read and set the
    /// timers.
    pub fn tick_timers(&mut self) {
        if self.delay_timer.0 > 0 {
            self.delay_timer.0 -= 1;
        }
        if self.sound_timer.0 > 0 {
            self.sound_timer.0 -= 1;
        }
    }

    /// Returns the value of one of the registers.
    fn register(&mut self, reg: Register) -> &mut Value {
        assert!(reg.0 < 16);
        &mut self.registers[reg.0 as usize]
    }

    /// Sets the VF register to a given value.
    fn set_vf(&mut self, value: u8) {
        self.registers[15] = Value(value);
    }

    /// Moves the program counter past the current instruction.
    fn advance(&mut self) {
        self.program_counter = self.program_counter.offset(2);
    }

    /// Skips the next instruction when the condition holds.
    fn skip_if(&mut self, condition: bool) {
        let step = if condition { 4 } else { 2 };
        self.program_counter = self.program_counter.offset(step);
    }

    /// Returns the control flow from a subroutine. Returning with an empty
    /// stack leaves the program counter in place, which the driver can
    /// observe as a stall.
    fn return_subroutine(&mut self) {
        if let Some(addr) = self.stack.pop() {
            self.program_counter = addr;
        }
    }

    /// Calls a subroutine, failing once the stack limit is reached.
    fn call_subroutine(&mut self, addr: Address) -> Result<(), VmError> {
        if self.stack.len() >= self.stack_limit {
            return Err(VmError::StackOverflow {
                limit: self.stack_limit,
            });
        }
        self.stack.push(self.program_counter);
        self.program_counter = addr;
        Ok(())
    }

    /// Decodes and executes a single instruction word. The program counter
    /// moves as part of the instruction: by 2 normally, by 4 for a taken
    /// skip, directly for control transfers, and not at all for `Unknown`.
    ///
    /// An out of bounds memory access aborts the instruction; whatever it
    /// wrote before the failing access stays written.
    pub fn execute(&mut self, word: u16) -> Result<(), VmError> {
        match Instruction::decode(word) {
            // Jumps
            Instruction::Jump(addr) => self.program_counter = addr,
            Instruction::JumpAdd(addr) => {
                let v0 = self.register(Register(0)).0;
                self.program_counter = addr.offset(v0 as u16);
            }
            Instruction::CallSubroutine(addr) => self.call_subroutine(addr)?,
            Instruction::ReturnSubroutine => self.return_subroutine(),

            // Conditionals
            Instruction::SkipIfEqualConst(vx, n) => {
                let skip = *self.register(vx) == n;
                self.skip_if(skip);
            }
            Instruction::SkipIfNotEqualConst(vx, n) => {
                let skip = *self.register(vx) != n;
                self.skip_if(skip);
            }
            Instruction::SkipIfEqual(vx, vy) => {
                let skip = *self.register(vx) == *self.register(vy);
                self.skip_if(skip);
            }
            Instruction::SkipIfNotEqual(vx, vy) => {
                let skip = *self.register(vx) != *self.register(vy);
                self.skip_if(skip);
            }

            // Register arithmetic
            Instruction::SetConst(vx, n) => {
                *self.register(vx) = n;
                self.advance();
            }
            Instruction::AddConst(vx, n) => {
                let value = Value(self.register(vx).0.wrapping_add(n.0));
                *self.register(vx) = value;
                self.advance();
            }
            Instruction::Set(vx, vy) => {
                *self.register(vx) = *self.register(vy);
                self.advance();
            }
            Instruction::Or(vx, vy) => {
                let value = Value(self.register(vx).0 | self.register(vy).0);
                *self.register(vx) = value;
                self.advance();
            }
            Instruction::And(vx, vy) => {
                let value = Value(self.register(vx).0 & self.register(vy).0);
                *self.register(vx) = value;
                self.advance();
            }
            Instruction::Xor(vx, vy) => {
                let value = Value(self.register(vx).0 ^ self.register(vy).0);
                *self.register(vx) = value;
                self.advance();
            }
            Instruction::Add(vx, vy) => {
                let sum = self.register(vx).0 as u16 + self.register(vy).0 as u16;
                *self.register(vx) = Value(sum as u8);
                self.set_vf((sum > 0xff) as u8);
                self.advance();
            }
            Instruction::Sub(vx, vy) => {
                let x = self.register(vx).0;
                let y = self.register(vy).0;
                *self.register(vx) = Value(x.wrapping_sub(y));
                self.set_vf((x >= y) as u8);
                self.advance();
            }
            Instruction::NegSub(vx, vy) => {
                let x = self.register(vx).0;
                let y = self.register(vy).0;
                *self.register(vx) = Value(y.wrapping_sub(x));
                self.set_vf((y >= x) as u8);
                self.advance();
            }
            Instruction::RightShift(vx, vy) => {
                let y = self.register(vy).0;
                self.set_vf(y & 1);
                *self.register(vx) = Value(y >> 1);
                self.advance();
            }
            Instruction::LeftShift(vx, vy) => {
                let y = self.register(vy).0;
                self.set_vf(y >> 7 & 1);
                *self.register(vx) = Value(y << 1);
                self.advance();
            }

            // Key presses
            Instruction::SkipIfKey(vx) => {
                let key = self.register(vx).0 & 0xf;
                let skip = self.keyboard.is_pressed(key);
                self.skip_if(skip);
            }
            Instruction::SkipIfNotKey(vx) => {
                let key = self.register(vx).0 & 0xf;
                let skip = !self.keyboard.is_pressed(key);
                self.skip_if(skip);
            }
            Instruction::WaitKey(vx) => {
                // The one suspending instruction: nothing else runs until
                // the keyboard delivers the next key event.
                let key = self.keyboard.await_key_press();
                *self.register(vx) = Value(key & 0xf);
                self.advance();
            }

            // Graphics
            Instruction::Draw(vx, vy, n) => {
                let x = self.register(vx).0;
                let y = self.register(vy).0;
                let mut rows = ArrayVec::<[u8; 16]>::new();
                for off in 0..n.0 {
                    let row = self.memory.read_byte(self.register_i.offset(off as u16))?;
                    rows.push(row.0);
                }
                let collided = self.graphics.draw(x, y, &rows);
                self.set_vf(collided as u8);
                self.advance();
            }
            Instruction::ClearDisplay => {
                self.graphics.clear();
                self.advance();
            }
            Instruction::SpriteAddr(vx) => {
                let digit = self.register(vx).0 & 0xf;
                self.register_i = Address(FONT_OFFSET).offset(digit as u16 * 5);
                self.advance();
            }

            // Timers
            Instruction::GetDelayTimer(vx) => {
                let value = self.delay_timer;
                *self.register(vx) = value;
                self.advance();
            }
            Instruction::SetDelayTimer(vx) => {
                self.delay_timer = *self.register(vx);
                self.advance();
            }
            Instruction::SetSoundTimer(vx) => {
                self.sound_timer = *self.register(vx);
                self.advance();
            }

            // I register
            Instruction::SetI(addr) => {
                self.register_i = addr;
                self.advance();
            }
            Instruction::AddToI(vx) => {
                let value = self.register(vx).0;
                self.register_i = self.register_i.offset(value as u16);
                self.advance();
            }
            Instruction::Decimal(vx) => {
                let value = self.register(vx).0;
                self.memory.write_byte(self.register_i, Value(value / 100))?;
                self.memory
                    .write_byte(self.register_i.offset(1), Value(value / 10 % 10))?;
                self.memory
                    .write_byte(self.register_i.offset(2), Value(value % 10))?;
                self.advance();
            }
            Instruction::StoreRegisters(vx) => {
                for i in 0..=vx.0 {
                    let value = *self.register(Register(i));
                    self.memory.write_byte(self.register_i, value)?;
                    self.register_i.incr();
                }
                self.advance();
            }
            Instruction::LoadRegisters(vx) => {
                for i in 0..=vx.0 {
                    let value = self.memory.read_byte(self.register_i)?;
                    *self.register(Register(i)) = value;
                    self.register_i.incr();
                }
                self.advance();
            }

            // Misc
            Instruction::Rand(vx, n) => {
                let value = Value((self.rng)() & n.0);
                *self.register(vx) = value;
                self.advance();
            }
            Instruction::Unknown => (),
        }
        Ok(())
    }
}
