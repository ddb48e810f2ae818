//! Broadcasting of analysis progress for streaming consumers.

pub mod analysis_progress;

pub use analysis_progress::{
    AnalysisPhase, AnalysisProgressBroadcaster, AnalysisProgressEvent, AnalysisProgressTracker,
    AnalysisStatus,
};
