//! The five pipeline stages.
//!
//! Each stage returns a tagged `StageResult`; none of them touch `RunState`.

pub mod composer;
pub mod monitor;
pub mod publisher;
pub mod reviewer;
pub mod summarizer;

pub use composer::Composer;
pub use monitor::{parse_target_date, SourceMonitor};
pub use publisher::{PublishReport, Publisher, SimulatedTarget};
pub use reviewer::Reviewer;
pub use summarizer::{Summarizer, SummaryBatch};
