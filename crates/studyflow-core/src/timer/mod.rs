mod clock;
mod mode;

pub use clock::{ClockEvent, ClockState, SessionClock, SessionEnd, SessionState};
pub use mode::{DurationLimits, DurationRange, Mode, ModeDurations, LONG_BREAK_EVERY};
