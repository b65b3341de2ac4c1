//! networkrecoverd-io: side-effecting collaborators of the monitor.
//! TCP reachability probe, operator confirmation dialog and recovery script
//! runner, each behind a trait so callers can substitute fakes. No monitor
//! logic lives here.

pub mod error;
pub mod probe;
pub mod prompt;
pub mod recovery;

pub use error::{PromptError, RecoveryError};
pub use probe::{ReachabilityProbe, TcpProbe};
pub use prompt::{Confirmer, DialogBackend, DialogConfirmer};
pub use recovery::{RecoveryAction, RecoveryReport, ScriptRecovery};
