use std::time::{Duration, Instant};

/// Delay between decrements; the 60 Hz hardware cadence rounded to whole
/// milliseconds.
const TICK_INTERVAL: Duration = Duration::from_millis(17);

/// # Timers
/// The delay and sound countdown timers.
///
/// Decrements are gated on wall-clock time so the cadence stays fixed no
/// matter how fast the run loop iterates. Reads and writes are immediate and
/// unsynchronized with the cadence.
pub struct Timers {
    delay: u8,
    sound: u8,
    last_tick: Instant,
}

impl Timers {
    pub fn new() -> Self {
        Timers {
            delay: 0,
            sound: 0,
            last_tick: Instant::now(),
        }
    }

    /// Step both timers toward zero if at least one tick interval elapsed
    /// since the previous decrement.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_tick) >= TICK_INTERVAL {
            self.last_tick = now;
            self.delay = self.delay.saturating_sub(1);
            self.sound = self.sound.saturating_sub(1);
        }
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub fn sound(&self) -> u8 {
        self.sound
    }

    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }
}
