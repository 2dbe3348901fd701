use super::devices::{Graphics, Keyboard};
use super::vm::{VirtualMachine, VmError};
use std::thread;
use std::time::{Duration, Instant};

pub const INSTRUCTION_SLEEP: Duration = Duration::from_millis(2);
pub const TIMER_INTERVAL: Duration = Duration::from_micros(16667);

/// Fetches the big-endian instruction word at the program counter and hands
/// it to the machine. The fetch is the driver's job; a program counter that
/// ran off the end of memory surfaces here as an out of bounds error.
pub fn step<G, K>(vm: &mut VirtualMachine<G, K>) -> Result<(), VmError>
where
    G: Graphics,
    K: Keyboard,
{
    let word = vm.memory().read_short(vm.program_counter())?;
    vm.execute(word)
}

/// Steps until the program counter stops moving: a jump to the current
/// address, a return on an empty stack or an unknown instruction. Programs
/// use a self-jump as their halt.
pub fn run_until_stalled<G, K>(vm: &mut VirtualMachine<G, K>) -> Result<(), VmError>
where
    G: Graphics,
    K: Keyboard,
{
    loop {
        let pc = vm.program_counter();
        step(vm)?;
        if vm.program_counter() == pc {
            return Ok(());
        }
    }
}

/// Drives the machine in real time: instructions are paced by
/// `instruction_sleep` and the timers count down at 60 Hz. Returns once the
/// program counter stalls.
pub fn run<G, K>(
    vm: &mut VirtualMachine<G, K>,
    instruction_sleep: Duration,
) -> Result<(), VmError>
where
    G: Graphics,
    K: Keyboard,
{
    let mut next_tick = Instant::now() + TIMER_INTERVAL;
    loop {
        let pc = vm.program_counter();
        step(vm)?;
        if vm.program_counter() == pc {
            return Ok(());
        }
        while Instant::now() >= next_tick {
            vm.tick_timers();
            next_tick += TIMER_INTERVAL;
        }
        thread::sleep(instruction_sleep);
    }
}
