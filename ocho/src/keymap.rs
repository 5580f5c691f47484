use sdl2::keyboard::Scancode;

/// # Keymap
/// CHIP-8 input is generated with a hexadecimal keypad.
///
/// The original layout is mapped to the left 4 alphanumeric columns, by
/// physical position so alternative keyboard layouts keep the same shape.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
pub fn keymap(key: Scancode) -> Option<u8> {
    match key {
        Scancode::X => Some(0x0),
        Scancode::Num1 => Some(0x1),
        Scancode::Num2 => Some(0x2),
        Scancode::Num3 => Some(0x3),
        Scancode::Q => Some(0x4),
        Scancode::W => Some(0x5),
        Scancode::E => Some(0x6),
        Scancode::A => Some(0x7),
        Scancode::S => Some(0x8),
        Scancode::D => Some(0x9),
        Scancode::Z => Some(0xA),
        Scancode::C => Some(0xB),
        Scancode::Num4 => Some(0xC),
        Scancode::R => Some(0xD),
        Scancode::F => Some(0xE),
        Scancode::V => Some(0xF),
        _ => None,
    }
}
