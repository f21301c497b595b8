//! Completion signal collaborator.

use std::io::Write;

use crate::error::NotifyError;

/// Plays the "session finished" signal. Failures are reported, never
/// panicked on; the orchestrator falls back to an on-screen message.
pub trait Notifier {
    fn play_completion_signal(&mut self) -> Result<(), NotifyError>;
}

/// Does nothing. Used when notifications are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn play_completion_signal(&mut self) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Rings the terminal bell on the wrapped writer.
pub struct TerminalBell {
    out: Box<dyn Write>,
}

impl TerminalBell {
    pub fn new(out: Box<dyn Write>) -> Self {
        Self { out }
    }

    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }
}

impl Notifier for TerminalBell {
    fn play_completion_signal(&mut self) -> Result<(), NotifyError> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}
