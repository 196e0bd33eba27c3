//! Sound effects.
//!
//! The game only ever plays one sound: the boom of a collision. On a
//! terminal that is the bell character, so playback is queued here and
//! written out by whichever front end owns the output stream.

use std::io::{self, Write};

const BELL: &[u8] = b"\x07";

#[derive(Debug, Clone, Default)]
pub struct Sfx {
    enabled: bool,
    started: bool,
    pending_booms: u32,
}

impl Sfx {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            started: false,
            pending_booms: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Prime playback. Only the first call on an enabled sink has an effect.
    pub fn start(&mut self) {
        if self.started || !self.enabled {
            return;
        }
        self.started = true;
        log::debug!("sound effects started");
    }

    /// Queue one explosion sound. Ignored until `start` has been called.
    pub fn play_boom(&mut self) {
        if !self.started {
            return;
        }
        self.pending_booms += 1;
    }

    /// Write queued sounds to `out`. Several booms in one frame ring once.
    pub fn flush<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if self.pending_booms == 0 {
            return Ok(());
        }
        self.pending_booms = 0;
        out.write_all(BELL)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flushed(sfx: &mut Sfx) -> Vec<u8> {
        let mut out = Vec::new();
        sfx.flush(&mut out).unwrap();
        out
    }

    #[test]
    fn test_boom_before_start_is_ignored() {
        let mut sfx = Sfx::new(true);
        sfx.play_boom();
        assert!(flushed(&mut sfx).is_empty());
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut sfx = Sfx::new(true);
        sfx.start();
        sfx.start();
        assert!(sfx.is_started());
    }

    #[test]
    fn test_disabled_never_starts() {
        let mut sfx = Sfx::new(false);
        sfx.start();
        sfx.play_boom();
        assert!(!sfx.is_started());
        assert!(flushed(&mut sfx).is_empty());
    }

    #[test]
    fn test_flush_rings_once_and_clears() {
        let mut sfx = Sfx::new(true);
        sfx.start();
        sfx.play_boom();
        sfx.play_boom();

        assert_eq!(flushed(&mut sfx), BELL);
        assert!(flushed(&mut sfx).is_empty());
    }
}
