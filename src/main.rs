use chip8vm::emulator::basics::MEMORY_SIZE;
use chip8vm::emulator::executor;
use chip8vm::emulator::{channel_keyboard, AsciiDisplay, KeyHandle, VirtualMachine};
use clap::Parser;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::io::BufRead;
use std::time::Duration;
use std::{fs, io, process, thread};

lazy_static! {
    static ref DEFAULT_KEYMAP: HashMap<char, u8> = vec![
        ('0', 0x0),
        ('1', 0x1),
        ('2', 0x2),
        ('3', 0x3),
        ('4', 0x4),
        ('5', 0x5),
        ('6', 0x6),
        ('7', 0x7),
        ('8', 0x8),
        ('9', 0x9),
        ('a', 0xa),
        ('b', 0xb),
        ('c', 0xc),
        ('d', 0xd),
        ('e', 0xe),
        ('f', 0xf),
    ]
    .into_iter()
    .collect();
}

#[derive(Parser)]
#[command(name = "chip8vm")]
#[command(about = "Run a CHIP-8 ROM in a terminal")]
struct Cli {
    /// Path to the ROM file to execute
    rom: String,
    /// Milliseconds to sleep between instructions
    #[arg(short, long, default_value = "2")]
    instruction_sleep: u64,
    /// Maximum call stack depth
    #[arg(long)]
    stack_limit: Option<usize>,
}

/// Feeds lines typed on stdin into the key matrix: the first character of a
/// line maps to a key, which is held until the next line arrives.
fn spawn_stdin_keys(handle: KeyHandle) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };
            handle.release();
            if let Some(key) = line
                .chars()
                .next()
                .and_then(|c| DEFAULT_KEYMAP.get(&c.to_ascii_lowercase()))
            {
                handle.press(*key);
            }
        }
    });
}

fn main() {
    let cli = Cli::parse();

    let rom = match fs::read(&cli.rom) {
        Ok(rom) => rom,
        Err(err) => {
            eprintln!("cannot read {}: {}", cli.rom, err);
            process::exit(1);
        }
    };

    let (keyboard, handle) = channel_keyboard();
    let mut vm = VirtualMachine::new(MEMORY_SIZE, AsciiDisplay::new(), keyboard);
    if let Some(limit) = cli.stack_limit {
        vm.set_stack_limit(limit);
    }

    let loaded = vm.load_font().and_then(|_| vm.load_rom(&rom));
    if let Err(err) = loaded {
        eprintln!("cannot load {}: {}", cli.rom, err);
        process::exit(1);
    }

    spawn_stdin_keys(handle);

    let result = executor::run(&mut vm, Duration::from_millis(cli.instruction_sleep));
    vm.graphics().print();
    if let Err(err) = result {
        eprintln!("machine fault: {}", err);
        process::exit(1);
    }
}
