pub mod output;
pub mod search;
pub mod segment;

pub use segment::{SpeakerSegmenter, UNKNOWN_SPEAKER};
