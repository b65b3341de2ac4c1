//! networkrecoverd-core: connectivity monitor state machine.
//! Pure logic only. Probing, prompting and recovery are injected by the caller.

pub mod monitor;
pub mod state;

pub use monitor::{Outcome, Transition, advance, transition};
pub use state::{DEFAULT_FAILURE_THRESHOLD, MonitorState, Phase};
