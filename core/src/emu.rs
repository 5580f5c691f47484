use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::cpu::Cpu;
use crate::error::Error;
use crate::keypad::{Keypad, Resolution};
use crate::memory::Memory;
use crate::quirks::Quirks;
use crate::screen::{FrameBuffer, Screen};
use crate::timers::Timers;

/// A host input event fed into the run loop, with keys already translated
/// to their logical 0x0..=0xF indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    KeyDown(u8),
    KeyUp(u8),
    Quit,
}

/// Where finished frames go.
///
/// The run loop calls this once per iteration in which the pixel grid
/// changed; nothing else crosses the rendering boundary.
pub trait FrameSink {
    fn present(&mut self, frame: &FrameBuffer);
}

/// Where key transitions and quit requests come from.
pub trait InputSource {
    /// Drain every event that arrived since the last poll.
    fn poll(&mut self) -> Vec<HostEvent>;
}

/// # Emu
/// The cooperative run loop.
///
/// Owns every state container and drives the engine: one instruction per
/// iteration, then host events, then keypad resolution, then timer decay,
/// then presentation and pacing. Everything happens on the calling thread;
/// the only "blocking" state is the keypad's halting request, emulated by
/// rewinding the program counter so the same instruction fetches again.
pub struct Emu {
    cpu: Cpu,
    memory: Memory,
    screen: Screen,
    keypad: Keypad,
    timers: Timers,
    quirks: Quirks,
}

impl Emu {
    pub fn new() -> Self {
        Self::with_quirks(Quirks::default())
    }

    pub fn with_quirks(quirks: Quirks) -> Self {
        Emu {
            cpu: Cpu::new(),
            memory: Memory::new(),
            screen: Screen::new(),
            keypad: Keypad::new(),
            timers: Timers::new(),
            quirks,
        }
    }

    /// Load `program` and drive it until the host asks to quit or an
    /// instruction faults.
    ///
    /// # Arguments
    /// * `program` the raw image bytes
    /// * `frequency` target instructions per second; must be positive
    /// * `sink` where changed frames are presented
    /// * `input` the host event source, drained every iteration
    pub fn run(
        &mut self,
        program: &[u8],
        frequency: u32,
        sink: &mut impl FrameSink,
        input: &mut impl InputSource,
    ) -> Result<(), Error> {
        self.memory.load_program(program)?;
        info!("loaded {} byte program", program.len());

        let step_period = Duration::from_secs(1) / frequency;
        loop {
            let started = Instant::now();

            self.cpu.step(
                &mut self.memory,
                &mut self.screen,
                &mut self.keypad,
                &mut self.timers,
                self.quirks,
            )?;

            for event in input.poll() {
                match event {
                    HostEvent::KeyDown(key) => self.keypad.key_down(key),
                    HostEvent::KeyUp(key) => self.keypad.key_up(key),
                    HostEvent::Quit => {
                        info!("quit requested");
                        return Ok(());
                    }
                }
            }

            match self.keypad.resolve() {
                Resolution::Skip => self.cpu.skip(),
                Resolution::Rewind => self.cpu.rewind(),
                Resolution::Store { register, key } => {
                    debug!("captured key {:#03X} into V{:X}", key, register);
                    self.cpu.v[register as usize] = key;
                }
                Resolution::NoSkip | Resolution::Idle => {}
            }

            self.timers.tick();

            if let Some(frame) = self.screen.take_frame() {
                sink.present(frame);
            }

            if let Some(remainder) = step_period.checked_sub(started.elapsed()) {
                thread::sleep(remainder);
            }
        }
    }
}

impl Default for Emu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Fast enough that pacing sleeps stay negligible in tests.
    const TEST_HZ: u32 = 1_000_000;

    struct NullSink;

    impl FrameSink for NullSink {
        fn present(&mut self, _frame: &FrameBuffer) {}
    }

    struct CountingSink {
        frames: usize,
        lit_pixels: usize,
    }

    impl FrameSink for CountingSink {
        fn present(&mut self, frame: &FrameBuffer) {
            self.frames += 1;
            self.lit_pixels = frame
                .iter()
                .flat_map(|row| row.iter())
                .filter(|pixel| **pixel == 1)
                .count();
        }
    }

    /// Replays scripted polls, then asks to quit forever after.
    struct Script {
        polls: VecDeque<Vec<HostEvent>>,
    }

    impl Script {
        fn new(polls: Vec<Vec<HostEvent>>) -> Self {
            Script {
                polls: polls.into_iter().collect(),
            }
        }
    }

    impl InputSource for Script {
        fn poll(&mut self) -> Vec<HostEvent> {
            self.polls
                .pop_front()
                .unwrap_or_else(|| vec![HostEvent::Quit])
        }
    }

    #[test]
    fn test_run_stops_on_quit() {
        let mut emu = Emu::new();
        // V0 = 0x42, then spin
        let program = [0x60, 0x42, 0x12, 0x02];
        let mut input = Script::new(vec![vec![], vec![]]);
        emu.run(&program, TEST_HZ, &mut NullSink, &mut input).unwrap();
        assert_eq!(emu.cpu.v[0x0], 0x42);
    }

    #[test]
    fn test_run_propagates_load_failures() {
        let mut emu = Emu::new();
        let oversized = vec![0; 4096];
        let result = emu.run(&oversized, TEST_HZ, &mut NullSink, &mut Script::new(vec![]));
        assert_eq!(
            result,
            Err(Error::ProgramTooLarge {
                size: 4096,
                max: 3584
            })
        );
    }

    #[test]
    fn test_run_propagates_instruction_faults() {
        let mut emu = Emu::new();
        let program = [0x80, 0x0F];
        let result = emu.run(&program, TEST_HZ, &mut NullSink, &mut Script::new(vec![]));
        assert_eq!(
            result,
            Err(Error::UnknownOpcode {
                opcode: 0x800F,
                pc: 0x200
            })
        );
    }

    #[test]
    fn test_run_holds_at_halting_input_then_stores_the_key() {
        let mut emu = Emu::new();
        // V5 = next key press, then spin
        let program = [0xF5, 0x0A, 0x12, 0x02];
        let mut input = Script::new(vec![
            vec![],
            vec![],
            vec![],
            vec![HostEvent::KeyDown(0xB)],
            vec![],
        ]);
        emu.run(&program, TEST_HZ, &mut NullSink, &mut input).unwrap();
        assert_eq!(emu.cpu.v[0x5], 0xB);
        // the wait resolved exactly once and execution moved on
        assert_eq!(emu.cpu.pc, 0x202);
    }

    #[test]
    fn test_run_applies_skip_resolutions() {
        // skip over the jump when key 4 is down, then land on a spin loop
        let program = [0x61, 0x04, 0xE1, 0x9E, 0x12, 0x00, 0x12, 0x06];
        let mut emu = Emu::new();
        let mut input = Script::new(vec![
            vec![HostEvent::KeyDown(0x4)],
            vec![],
            vec![],
            vec![],
        ]);
        emu.run(&program, TEST_HZ, &mut NullSink, &mut input).unwrap();
        assert_eq!(emu.cpu.pc, 0x206);
    }

    #[test]
    fn test_run_presents_dirty_frames_only() {
        let mut emu = Emu::new();
        // draw the zero glyph, then spin without touching the screen
        let program = [0xA0, 0x00, 0xD0, 0x05, 0x12, 0x04];
        let mut sink = CountingSink {
            frames: 0,
            lit_pixels: 0,
        };
        let mut input = Script::new(vec![vec![]; 8]);
        emu.run(&program, TEST_HZ, &mut sink, &mut input).unwrap();
        // the initial blank frame plus the draw; the spin adds nothing
        assert_eq!(sink.frames, 2);
        // the zero glyph lights a hollow 4x5 box
        assert_eq!(sink.lit_pixels, 14);
    }
}
