//! Domain types shared by the stages and the orchestrator.

pub mod draft;
pub mod error;
pub mod summary;
pub mod verdict;

pub use draft::{DraftLayout, DraftSet, MAX_MESSAGE_CHARS};
pub use error::{FailureKind, StageError, StageResult};
pub use summary::Summary;
pub use verdict::{EvaluationVerdict, VerdictLabel};
