pub use crate::emu::{Emu, FrameSink, HostEvent, InputSource};
pub use crate::error::Error;
pub use crate::quirks::Quirks;
pub use crate::screen::FrameBuffer;

pub mod constants;
mod cpu;
mod emu;
mod error;
mod instruction;
mod keypad;
mod memory;
mod quirks;
mod screen;
mod timers;
