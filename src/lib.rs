//! A CHIP-8 virtual machine: bounds-checked memory, a pure instruction
//! decoder, the execution engine, and terminal devices to run ROMs with.

pub mod emulator;
