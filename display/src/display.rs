use sdl2::pixels::PixelFormatEnum;

use ocho_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use ocho_core::{FrameBuffer, FrameSink};

/// # Display
/// The SDL2 rendering sink.
///
/// Owns the window and canvas; each presented frame is converted to an RGB
/// texture and stretched over the whole window. The display only hears from
/// the interpreter when the pixel grid actually changed.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
}

impl Display {
    /// Open a window scaled up from the native 64x32 grid.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context to draw with
    /// * `title` the window title, conventionally the program name
    /// * `scale` the integer size multiplier for each pixel
    pub fn new(sdl: &sdl2::Sdl, title: &str, scale: u32) -> Result<Self, String> {
        let video = sdl.video()?;
        let window = video
            .window(
                title,
                DISPLAY_WIDTH as u32 * scale,
                DISPLAY_HEIGHT as u32 * scale,
            )
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        Ok(Display { canvas })
    }

    /// Flatten a frame into RGB24 texture bytes.
    ///
    /// Rows are concatenated, each cell is triplicated into its R/G/B
    /// channels, and the 0/1 pixel state is stretched to 0/255 intensity.
    fn rgb24(frame: &FrameBuffer) -> Vec<u8> {
        frame
            .iter()
            .flat_map(|row| row.iter())
            .flat_map(|pixel| std::iter::repeat(pixel).take(3))
            .map(|pixel| pixel * 255)
            .collect()
    }
}

impl FrameSink for Display {
    fn present(&mut self, frame: &FrameBuffer) {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .unwrap();

        texture
            .with_lock(None, |buffer: &mut [u8], _pitch: usize| {
                buffer.copy_from_slice(&Display::rgb24(frame));
            })
            .unwrap();

        self.canvas.copy(&texture, None, None).unwrap();
        self.canvas.present()
    }
}
