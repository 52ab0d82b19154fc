//! Fiscal year registry, closure state machine and closure evaluation.
//!
//! The registry records which year is open for editing and which years
//! have been closed. Closing a year is a multi-step workflow driven by
//! [`ClosureState`]; the pure checks that gate it live in [`closure`].

pub mod closure;
pub mod error;
pub mod registry;
pub mod state;
pub mod types;

pub use closure::{closure_reminder, evaluate_closure};
pub use error::YearError;
pub use registry::YearRegistry;
pub use state::{ClosureEvent, ClosureState};
pub use types::{
    ClosureBlocker, ClosureReminder, ClosureReport, ClosureStats, ClosureWarning, YearSummary,
    YearView,
};
