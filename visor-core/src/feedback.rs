//! Press flash: a fire-and-forget timer read back as an intensity.
//!
//! Nothing is scheduled. Each render asks how far `now` is into the flash;
//! a newer press simply replaces the old one.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressFeedback {
    pub button_name: String,
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl PressFeedback {
    pub fn new(button_name: impl Into<String>, start_ms: u64, duration_ms: u64) -> Self {
        Self {
            button_name: button_name.into(),
            start_ms,
            duration_ms,
        }
    }

    /// 1.0 at the press, falling linearly to 0.0 at `start + duration`.
    /// `None` once finished.
    pub fn intensity(&self, now_ms: u64) -> Option<f32> {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        if self.duration_ms == 0 || elapsed >= self.duration_ms {
            return None;
        }
        Some(1.0 - elapsed as f32 / self.duration_ms as f32)
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.intensity(now_ms).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_decays() {
        let flash = PressFeedback::new("play_pause", 1_000, 200);
        assert_eq!(flash.intensity(1_000), Some(1.0));
        assert_eq!(flash.intensity(1_100), Some(0.5));
        assert_eq!(flash.intensity(1_200), None);
        assert!(flash.is_expired(5_000));
        // A clock that reads earlier than the press counts as the press itself
        assert_eq!(flash.intensity(900), Some(1.0));
    }

    #[test]
    fn test_zero_duration_never_flashes() {
        assert!(PressFeedback::new("next", 0, 0).is_expired(0));
    }
}
