pub mod ascii_display;
pub mod basics;
pub mod devices;
pub mod executor;
pub mod memory;
pub mod program;
pub mod vm;

pub use ascii_display::AsciiDisplay;
pub use devices::{channel_keyboard, ChannelKeyboard, Graphics, KeyHandle, Keyboard};
pub use memory::{Memory, MemoryError};
pub use program::Instruction;
pub use vm::{VirtualMachine, VmError};
