//! Completion gate: when may an interview be finalized?

use interviewer_types::turn::Transcript;

/// Whether the transcript is long enough to offer finalization.
///
/// A pure function of the turn count: true iff the transcript holds more
/// than `threshold` turns. Content and field completeness are not consulted.
pub fn is_ready_for_submission(transcript: &Transcript, threshold: usize) -> bool {
    transcript.len() > threshold
}
