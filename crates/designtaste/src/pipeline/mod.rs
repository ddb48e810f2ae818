//! Element ingestion and the background analysis that follows it.
//!
//! `ingest` validates and stores a captured element, then hands its id to the
//! [`AnalysisWorker`]. The worker runs the [`Analyzer`] chain: critique,
//! inspiration search, persistence and the final status update.

pub mod error;
pub mod ingest;
pub mod progress;
pub mod runner;
pub mod worker;

pub use error::IngestError;
pub use ingest::{ingest, IngestAck, IngestRequest};
pub use progress::{BroadcastProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use runner::{AnalysisOutcome, Analyzer};
pub use worker::AnalysisWorker;
