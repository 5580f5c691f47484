use crate::error::Error;

/// The keypad's response to the run loop after pending requests resolve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resolution {
    /// Nothing was pending.
    Idle,
    /// The skip condition held; hop over the next instruction.
    Skip,
    /// The skip condition did not hold.
    NoSkip,
    /// Still waiting on a key; the requesting instruction must run again.
    Rewind,
    /// A key arrived for the waiting register.
    Store { register: u8, key: u8 },
}

/// # Keypad
/// The 16-key logical input controller.
///
/// Key state mirrors the host keyboard between loop iterations. The engine
/// never reads that state directly: skip and halting queries are parked here
/// as requests and resolved exactly once per iteration, after the run loop
/// has drained host events, so both see the freshest snapshot.
pub struct Keypad {
    keys: [bool; 16],
    skip: Option<SkipRequest>,
    waiting_register: Option<u8>,
    captured: Option<u8>,
}

struct SkipRequest {
    key: u8,
    expect_down: bool,
}

impl Keypad {
    pub fn new() -> Self {
        Keypad {
            keys: [false; 16],
            skip: None,
            waiting_register: None,
            captured: None,
        }
    }

    /// Mirror a host key press; feeds a pending halting request if one is
    /// waiting.
    pub fn key_down(&mut self, key: u8) {
        if let Some(state) = self.keys.get_mut(key as usize) {
            *state = true;
            if self.waiting_register.is_some() && self.captured.is_none() {
                self.captured = Some(key);
            }
        }
    }

    /// Mirror a host key release.
    pub fn key_up(&mut self, key: u8) {
        if let Some(state) = self.keys.get_mut(key as usize) {
            *state = false;
        }
    }

    /// Park an EX9E/EXA1 comparison until the next resolution point.
    ///
    /// # Arguments
    /// * `key` the key to test, 0x0..=0xF
    /// * `expect_down` skip when the key is down (true) or up (false)
    pub fn request_skip(&mut self, key: u8, expect_down: bool) -> Result<(), Error> {
        if key > 0xF {
            return Err(Error::BadKey { key });
        }
        self.skip = Some(SkipRequest { key, expect_down });
        Ok(())
    }

    /// Park a halting read that fills `register` with the next key press.
    pub fn request_halting_input(&mut self, register: u8) {
        self.waiting_register = Some(register);
    }

    /// Resolve whatever request is pending against the current key state.
    ///
    /// At most one request can be pending because at most one instruction
    /// executed since the last resolution.
    pub fn resolve(&mut self) -> Resolution {
        if let Some(register) = self.waiting_register {
            return match self.captured.take() {
                Some(key) => {
                    self.waiting_register = None;
                    Resolution::Store { register, key }
                }
                None => Resolution::Rewind,
            };
        }
        if let Some(request) = self.skip.take() {
            return if self.keys[request.key as usize] == request.expect_down {
                Resolution::Skip
            } else {
                Resolution::NoSkip
            };
        }
        Resolution::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_idle_without_requests() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.resolve(), Resolution::Idle);
    }

    #[test]
    fn test_skip_when_expected_key_is_down() {
        let mut keypad = Keypad::new();
        keypad.key_down(0x5);
        keypad.request_skip(0x5, true).unwrap();
        assert_eq!(keypad.resolve(), Resolution::Skip);
        // resolving clears the request
        assert_eq!(keypad.resolve(), Resolution::Idle);
    }

    #[test]
    fn test_no_skip_when_expected_key_is_up() {
        let mut keypad = Keypad::new();
        keypad.request_skip(0x5, true).unwrap();
        assert_eq!(keypad.resolve(), Resolution::NoSkip);
    }

    #[test]
    fn test_skip_on_released_key_when_expecting_up() {
        let mut keypad = Keypad::new();
        keypad.key_down(0x5);
        keypad.key_up(0x5);
        keypad.request_skip(0x5, false).unwrap();
        assert_eq!(keypad.resolve(), Resolution::Skip);
    }

    #[test]
    fn test_skip_request_rejects_bad_key() {
        let mut keypad = Keypad::new();
        assert_eq!(
            keypad.request_skip(0x10, true),
            Err(Error::BadKey { key: 0x10 })
        );
    }

    #[test]
    fn test_halting_request_rewinds_until_key_arrives() {
        let mut keypad = Keypad::new();
        keypad.request_halting_input(0x3);
        assert_eq!(keypad.resolve(), Resolution::Rewind);
        assert_eq!(keypad.resolve(), Resolution::Rewind);
        keypad.key_down(0xA);
        assert_eq!(
            keypad.resolve(),
            Resolution::Store {
                register: 0x3,
                key: 0xA
            }
        );
        assert_eq!(keypad.resolve(), Resolution::Idle);
    }

    #[test]
    fn test_halting_request_captures_first_key_only() {
        let mut keypad = Keypad::new();
        keypad.request_halting_input(0x0);
        keypad.key_down(0x1);
        keypad.key_down(0x2);
        assert_eq!(
            keypad.resolve(),
            Resolution::Store {
                register: 0x0,
                key: 0x1
            }
        );
    }

    #[test]
    fn test_keys_held_before_halting_request_do_not_count() {
        let mut keypad = Keypad::new();
        keypad.key_down(0x1);
        keypad.request_halting_input(0x0);
        assert_eq!(keypad.resolve(), Resolution::Rewind);
    }
}
