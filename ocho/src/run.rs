use std::fs;

use anyhow::{anyhow, Context, Result};
use log::info;
use sdl2::event::Event;

use ocho_core::{Emu, HostEvent, InputSource};
use ocho_display::Display;

use crate::config::Config;
use crate::keymap::keymap;
use crate::Args;

/// Adapts the SDL event pump to the run loop's input contract.
struct SdlInput {
    events: sdl2::EventPump,
}

impl InputSource for SdlInput {
    fn poll(&mut self) -> Vec<HostEvent> {
        self.events
            .poll_iter()
            .filter_map(|event| match event {
                Event::Quit { .. } => Some(HostEvent::Quit),
                Event::KeyDown {
                    scancode: Some(key),
                    repeat: false,
                    ..
                } => keymap(key).map(HostEvent::KeyDown),
                Event::KeyUp {
                    scancode: Some(key),
                    ..
                } => keymap(key).map(HostEvent::KeyUp),
                _ => None,
            })
            .collect()
    }
}

/// Merge the CLI over the persisted config, set up SDL, and run the program
/// to completion.
pub fn run(args: &Args) -> Result<()> {
    let config = Config::load_or_create();
    let scale = args.scale.unwrap_or(config.scale);
    let freq = args.freq.unwrap_or(config.freq);
    if scale == 0 || freq == 0 {
        return Err(anyhow!("scale and freq must be positive, got {} and {}", scale, freq));
    }

    let program = fs::read(&args.program)
        .with_context(|| format!("could not read {}", args.program.display()))?;

    let title = args
        .program
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ocho".to_string());

    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, &title, scale).map_err(|e| anyhow!(e))?;
    let mut input = SdlInput {
        events: sdl.event_pump().map_err(|e| anyhow!(e))?,
    };

    info!("running {} at {} Hz, scale {}", title, freq, scale);
    let mut emu = Emu::new();
    emu.run(&program, freq, &mut display, &mut input)?;
    Ok(())
}
