use thiserror::Error;

/// Fatal interpreter faults.
///
/// None of these are recoverable: a program that raises one is either
/// malformed or leans on an opcode family this interpreter does not
/// implement, so the run loop aborts and reports the diagnostic.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("empty program image")]
    EmptyProgram,

    #[error("program image is {size} bytes but only {max} fit in memory")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("unknown opcode {opcode:#06X} at {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("access of {len} bytes at {addr:#05X} runs past the end of memory")]
    OutOfBounds { addr: u16, len: usize },

    #[error("call stack overflow")]
    StackOverflow,

    #[error("return with an empty call stack")]
    StackUnderflow,

    #[error("no font glyph for value {value:#04X}")]
    BadGlyph { value: u8 },

    #[error("key {key:#04X} is not on the keypad")]
    BadKey { key: u8 },
}
