use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of finished Work sessions between long breaks.
pub const LONG_BREAK_EVERY: u32 = 4;

/// What the countdown is currently timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Work,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub fn is_break(self) -> bool {
        !matches!(self, Mode::Work)
    }

    /// Break mode that follows `completed_work_count` finished Work sessions
    /// when no task dictates otherwise.
    pub fn break_after(completed_work_count: u32) -> Mode {
        if completed_work_count > 0 && completed_work_count % LONG_BREAK_EVERY == 0 {
            Mode::LongBreak
        } else {
            Mode::ShortBreak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::ShortBreak => "short_break",
            Mode::LongBreak => "long_break",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "work" | "focus" => Ok(Mode::Work),
            "short_break" | "short" => Ok(Mode::ShortBreak),
            "long_break" | "long" => Ok(Mode::LongBreak),
            other => Err(format!("unknown mode '{other}'")),
        }
    }
}

/// Inclusive `[min, max]` range in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: u32,
    pub max: u32,
}

impl DurationRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Clamp `minutes` into the range. A misconfigured range (`min > max`)
    /// collapses onto `min`.
    pub fn clamp(&self, minutes: u32) -> u32 {
        minutes.max(self.min).min(self.max.max(self.min))
    }
}

/// Accepted input ranges for every user-editable duration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationLimits {
    #[serde(default = "default_work_range")]
    pub work: DurationRange,
    #[serde(default = "default_short_break_range")]
    pub short_break: DurationRange,
    #[serde(default = "default_long_break_range")]
    pub long_break: DurationRange,
    #[serde(default = "default_task_range")]
    pub task: DurationRange,
}

fn default_work_range() -> DurationRange {
    DurationRange::new(1, 90)
}
fn default_short_break_range() -> DurationRange {
    DurationRange::new(1, 30)
}
fn default_long_break_range() -> DurationRange {
    DurationRange::new(1, 60)
}
fn default_task_range() -> DurationRange {
    DurationRange::new(1, 180)
}

impl Default for DurationLimits {
    fn default() -> Self {
        Self {
            work: default_work_range(),
            short_break: default_short_break_range(),
            long_break: default_long_break_range(),
            task: default_task_range(),
        }
    }
}

impl DurationLimits {
    pub fn for_mode(&self, mode: Mode) -> DurationRange {
        match mode {
            Mode::Work => self.work,
            Mode::ShortBreak => self.short_break,
            Mode::LongBreak => self.long_break,
        }
    }
}

/// Configured minutes per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeDurations {
    pub work: u32,
    pub short_break: u32,
    pub long_break: u32,
}

impl Default for ModeDurations {
    fn default() -> Self {
        Self {
            work: 25,
            short_break: 5,
            long_break: 15,
        }
    }
}

impl ModeDurations {
    pub fn minutes(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work,
            Mode::ShortBreak => self.short_break,
            Mode::LongBreak => self.long_break,
        }
    }

    pub fn clamped(self, limits: &DurationLimits) -> Self {
        Self {
            work: limits.work.clamp(self.work),
            short_break: limits.short_break.clamp(self.short_break),
            long_break: limits.long_break.clamp(self.long_break),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_break_every_fourth_session() {
        assert_eq!(Mode::break_after(0), Mode::ShortBreak);
        assert_eq!(Mode::break_after(3), Mode::ShortBreak);
        assert_eq!(Mode::break_after(4), Mode::LongBreak);
        assert_eq!(Mode::break_after(5), Mode::ShortBreak);
        assert_eq!(Mode::break_after(8), Mode::LongBreak);
    }

    #[test]
    fn clamps_out_of_range_input() {
        let limits = DurationLimits::default();
        let d = ModeDurations {
            work: 0,
            short_break: 500,
            long_break: 20,
        }
        .clamped(&limits);
        assert_eq!(d.work, 1);
        assert_eq!(d.short_break, 30);
        assert_eq!(d.long_break, 20);
    }

    #[test]
    fn parses_mode_aliases() {
        assert_eq!("focus".parse::<Mode>().unwrap(), Mode::Work);
        assert_eq!("short-break".parse::<Mode>().unwrap(), Mode::ShortBreak);
        assert_eq!("LONG".parse::<Mode>().unwrap(), Mode::LongBreak);
        assert!("nap".parse::<Mode>().is_err());
    }
}
