/// Total addressable memory in bytes.
pub const MEMORY_SIZE: usize = 4096;

/// Address at which program images are loaded.
pub const PROGRAM_START: u16 = 0x200;

/// Largest program image that fits between `PROGRAM_START` and the end of
/// memory.
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Return addresses the call stack can hold.
pub const STACK_DEPTH: usize = 16;

/// Horizontal display resolution in pixels.
pub const DISPLAY_WIDTH: usize = 64;

/// Vertical display resolution in pixels.
pub const DISPLAY_HEIGHT: usize = 32;

/// Bytes per font glyph.
pub const GLYPH_SIZE: u16 = 5;

/// The hexadecimal font, baked into memory below `PROGRAM_START`.
///
/// Each glyph is five bytes tall with only the high nibble of each byte used,
/// so `0` renders as a hollow 4x5 box.
pub const FONT_GLYPHS: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
