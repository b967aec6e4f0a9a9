use serde::{Deserialize, Serialize};

/// One contiguous span of transcript text attributed to one speaker.
///
/// `sequence` is the 1-based assignment order within a transcript,
/// strictly increasing with no gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerBlock {
    pub sequence: u32,
    pub speaker: String,
    pub text: String,
}
