//! Whole-second time accounting
//!
//! Pure logic with no I/O: a non-negative second counter and the
//! `HH:MM:SS` label format shared by the timers and the history files.

/// Format seconds as "HH:MM:SS"
///
/// Hours are zero-padded to two digits but not clamped, so values past
/// 359999 seconds render with three or more hour digits.
pub fn format_hms(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Parse an "HH:MM:SS" label back into seconds
///
/// Minutes and seconds must be below 60. Returns `None` for anything that
/// `format_hms` could not have produced.
pub fn parse_hms(text: &str) -> Option<u64> {
    let mut parts = text.split(':');
    let h = parts.next()?;
    let m = parts.next()?;
    let s = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let field = |part: &str| -> Option<u64> {
        if part.len() < 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        part.parse().ok()
    };

    if m.len() != 2 || s.len() != 2 {
        return None;
    }
    let (h, m, s) = (field(h)?, field(m)?, field(s)?);
    if m >= 60 || s >= 60 {
        return None;
    }
    Some(h * 3600 + m * 60 + s)
}

/// Second counter behind a timer
///
/// Never negative: countdown decrements saturate at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Clock {
    seconds: u64,
}

impl Clock {
    /// Create a clock at the given baseline
    pub fn new(seconds: u64) -> Self {
        Self { seconds }
    }

    /// Current value in whole seconds
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Overwrite the current value (used by resets)
    pub fn set(&mut self, seconds: u64) {
        self.seconds = seconds;
    }

    /// Advance by one second
    pub fn increment(&mut self) {
        self.seconds = self.seconds.saturating_add(1);
    }

    /// Retreat by one second, clamped at zero
    pub fn decrement(&mut self) {
        self.seconds = self.seconds.saturating_sub(1);
    }

    /// Whether the clock has reached zero
    pub fn is_zero(&self) -> bool {
        self.seconds == 0
    }

    /// Display label in "HH:MM:SS" form
    pub fn label(&self) -> String {
        format_hms(self.seconds)
    }
}
