//! Cancellable delay and timeout scheduling for trial sequencing.
//!
//! Clocks never invoke code on their own: scheduled items become due and
//! the owner pulls them with [`TrialClock::pop_due`], processing each one to
//! completion before pulling the next.

pub mod clock;
pub mod manual;
pub mod timer;

pub use clock::{CancelToken, Fired, TimerQueue, TrialClock};
pub use manual::ManualClock;
pub use timer::HighPrecisionClock;
