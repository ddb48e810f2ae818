//! Status projection for the dashboard.
//!
//! Everything here is a pure function of the element's status, whether an
//! analysis exists and how many inspirations were stored.

use serde::Serialize;

use crate::queue::JobStatus;

/// One entry of the four-step progress checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingStep {
    pub label: &'static str,
    pub completed: bool,
}

/// Percentage shown in the progress bar. Unfinished work never reaches 100.
pub fn progress(status: JobStatus, has_analysis: bool, inspirations_count: u64) -> u8 {
    match status {
        JobStatus::Error => 0,
        JobStatus::Completed => 100,
        JobStatus::Queued | JobStatus::Processing => {
            let mut progress = 0u8;
            if status == JobStatus::Processing {
                progress += 15;
            }
            if has_analysis {
                progress += 35;
            }
            if inspirations_count > 0 {
                progress += 35;
            }
            progress.min(95)
        }
    }
}

pub fn current_step(status: JobStatus, has_analysis: bool, inspirations_count: u64) -> &'static str {
    match status {
        JobStatus::Error => "Error occurred during processing",
        JobStatus::Completed => "Processing completed successfully",
        _ if !has_analysis => "Analyzing image...",
        _ if inspirations_count == 0 => "Finding inspiration...",
        _ => "Generating code...",
    }
}

pub fn steps(status: JobStatus, has_analysis: bool, inspirations_count: u64) -> [ProcessingStep; 4] {
    let finished = status.is_terminal();
    let analysed = finished || (status == JobStatus::Processing && has_analysis);
    [
        ProcessingStep {
            label: "Analyzing image",
            completed: analysed,
        },
        ProcessingStep {
            label: "Suggesting tips",
            completed: analysed,
        },
        ProcessingStep {
            label: "Finding inspiration",
            completed: finished || inspirations_count > 0,
        },
        ProcessingStep {
            label: "Generating code",
            completed: finished,
        },
    ]
}

/// Which collaborator the dashboard says is working.
pub fn ai_provider_label(has_analysis: bool, inspirations_count: u64) -> &'static str {
    if !has_analysis {
        "Mistral AI"
    } else if inspirations_count == 0 {
        "Design Sources"
    } else {
        "Processing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_monotonic() {
        let queued = progress(JobStatus::Queued, false, 0);
        let started = progress(JobStatus::Processing, false, 0);
        let analysed = progress(JobStatus::Processing, true, 0);
        let inspired = progress(JobStatus::Processing, true, 4);
        let done = progress(JobStatus::Completed, true, 4);

        assert_eq!((queued, started, analysed, inspired, done), (0, 15, 50, 85, 100));
        assert!(queued <= 15 && analysed <= 50 && inspired <= 85);
    }

    #[test]
    fn test_error_resets_progress() {
        assert_eq!(progress(JobStatus::Error, true, 10), 0);
    }

    #[test]
    fn test_current_step() {
        assert_eq!(current_step(JobStatus::Processing, false, 0), "Analyzing image...");
        assert_eq!(current_step(JobStatus::Processing, true, 0), "Finding inspiration...");
        assert_eq!(current_step(JobStatus::Processing, true, 3), "Generating code...");
        assert_eq!(
            current_step(JobStatus::Completed, true, 3),
            "Processing completed successfully"
        );
        assert_eq!(current_step(JobStatus::Error, false, 0), "Error occurred during processing");
    }

    #[test]
    fn test_steps() {
        let mid = steps(JobStatus::Processing, true, 0);
        let done: Vec<bool> = mid.iter().map(|s| s.completed).collect();
        assert_eq!(done, vec![true, true, false, false]);

        // A queued element is never "analysed", even with a stray analysis row.
        assert!(!steps(JobStatus::Queued, true, 0)[0].completed);
        assert!(steps(JobStatus::Error, false, 0).iter().all(|s| s.completed));
        assert_eq!(mid[2].label, "Finding inspiration");
    }

    #[test]
    fn test_ai_provider_label() {
        assert_eq!(ai_provider_label(false, 0), "Mistral AI");
        assert_eq!(ai_provider_label(true, 0), "Design Sources");
        assert_eq!(ai_provider_label(true, 2), "Processing");
    }
}
