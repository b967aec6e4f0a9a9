// Speaker attribution over normalized transcript text.
//
// Line-by-line heuristic: short, punctuation-free lines that don't look
// like page boilerplate are treated as speaker labels; everything under a
// label accumulates into that speaker's block. Lossy and best-effort;
// false positives/negatives are accepted.

use regex::Regex;

use earncall_model::SpeakerBlock;

/// Sentinel speaker used when the text yields no label candidates at all.
pub const UNKNOWN_SPEAKER: &str = "Unknown";

/// Heuristic label/utterance classifier.
///
/// A line is a candidate speaker label if it is at most
/// `max_label_chars` characters, contains no sentence-terminal
/// punctuation (`.` `!` `?`), has between 1 and `max_label_words` words,
/// and does not match the boilerplate denylist.
pub struct SpeakerSegmenter {
    max_label_chars: usize,
    max_label_words: usize,
    denylist: Regex,
}

impl Default for SpeakerSegmenter {
    fn default() -> Self {
        Self {
            max_label_chars: 60,
            max_label_words: 5,
            denylist: Regex::new(
                r"(?i)\b(Fiscal|Quarter|FY|Download|Insights|Privacy|Terms|Disclaimer)\b",
            )
            .expect("valid regex"),
        }
    }
}

enum State {
    AwaitingLabel,
    Accumulating { speaker: String, lines: Vec<String> },
}

impl SpeakerSegmenter {
    /// Split normalized text into ordered speaker blocks.
    ///
    /// Sequence numbers are 1-based and gapless. Text before the first
    /// label has no speaker to attach to and is dropped; a label that
    /// accumulated no text produces no block. If no label is ever found,
    /// the whole text becomes one block under [`UNKNOWN_SPEAKER`].
    pub fn segment(&self, text: &str) -> Vec<SpeakerBlock> {
        let mut blocks: Vec<SpeakerBlock> = Vec::new();
        let mut state = State::AwaitingLabel;

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if self.looks_like_speaker(line) {
                if let State::Accumulating { speaker, lines } =
                    std::mem::replace(&mut state, State::AwaitingLabel)
                {
                    push_block(&mut blocks, speaker, &lines);
                }
                state = State::Accumulating {
                    speaker: line.to_string(),
                    lines: Vec::new(),
                };
            } else if let State::Accumulating { lines, .. } = &mut state {
                lines.push(line.to_string());
            }
        }

        if let State::Accumulating { speaker, lines } = state {
            push_block(&mut blocks, speaker, &lines);
        }

        if blocks.is_empty() {
            tracing::debug!("No speaker labels found; emitting single Unknown block");
            blocks.push(SpeakerBlock {
                sequence: 1,
                speaker: UNKNOWN_SPEAKER.to_string(),
                text: text.to_string(),
            });
        }

        blocks
    }

    fn looks_like_speaker(&self, line: &str) -> bool {
        if line.chars().count() > self.max_label_chars {
            return false;
        }
        if line.chars().any(|c| matches!(c, '.' | '!' | '?')) {
            return false;
        }
        let words = line.split_whitespace().count();
        if words == 0 || words > self.max_label_words {
            return false;
        }
        !self.denylist.is_match(line)
    }
}

fn push_block(blocks: &mut Vec<SpeakerBlock>, speaker: String, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    let text = lines
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    blocks.push(SpeakerBlock {
        sequence: blocks.len() as u32 + 1,
        speaker,
        text,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_speakers() {
        let segmenter = SpeakerSegmenter::default();
        let blocks = segmenter.segment("Operator\nWelcome.\nTim Cook\nThanks everyone.");

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].sequence, 1);
        assert_eq!(blocks[0].speaker, "Operator");
        assert_eq!(blocks[0].text, "Welcome.");
        assert_eq!(blocks[1].sequence, 2);
        assert_eq!(blocks[1].speaker, "Tim Cook");
        assert_eq!(blocks[1].text, "Thanks everyone.");
    }

    #[test]
    fn test_multiline_utterance_joined_with_spaces() {
        let segmenter = SpeakerSegmenter::default();
        let blocks =
            segmenter.segment("Operator\nWelcome to the call.\nPlease stand by.\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Welcome to the call. Please stand by.");
    }

    #[test]
    fn test_no_labels_falls_back_to_unknown() {
        let segmenter = SpeakerSegmenter::default();
        let text = "This is a long paragraph of prose. It has sentences everywhere. \
                    Nothing resembles a label.";
        let blocks = segmenter.segment(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].sequence, 1);
        assert_eq!(blocks[0].speaker, UNKNOWN_SPEAKER);
        assert_eq!(blocks[0].text, text);
    }

    #[test]
    fn test_denylist_rejects_boilerplate() {
        let segmenter = SpeakerSegmenter::default();
        assert!(!segmenter.looks_like_speaker("Fiscal 2025"));
        assert!(!segmenter.looks_like_speaker("Third Quarter Results"));
        assert!(!segmenter.looks_like_speaker("Download Transcript"));
        assert!(!segmenter.looks_like_speaker("Privacy"));
        assert!(segmenter.looks_like_speaker("Tim Cook"));
        assert!(segmenter.looks_like_speaker("Operator"));
    }

    #[test]
    fn test_label_shape_limits() {
        let segmenter = SpeakerSegmenter::default();
        // Sentence punctuation disqualifies
        assert!(!segmenter.looks_like_speaker("Thanks everyone."));
        assert!(!segmenter.looks_like_speaker("Really?"));
        // Too many words
        assert!(!segmenter.looks_like_speaker("one two three four five six"));
        // Too long
        let long = "A".repeat(61);
        assert!(!segmenter.looks_like_speaker(&long));
        // Up to five words is fine
        assert!(segmenter.looks_like_speaker("John Q Public Senior VP"));
    }

    #[test]
    fn test_text_before_first_label_is_dropped() {
        let segmenter = SpeakerSegmenter::default();
        let blocks = segmenter.segment(
            "Welcome to the Q3 earnings call, everyone.\nOperator\nPlease stand by.",
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].speaker, "Operator");
        assert_eq!(blocks[0].text, "Please stand by.");
    }

    #[test]
    fn test_label_without_text_yields_no_block() {
        let segmenter = SpeakerSegmenter::default();
        let blocks = segmenter.segment("Operator\nTim Cook\nThanks everyone.");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].speaker, "Tim Cook");
    }

    #[test]
    fn test_sequences_contiguous() {
        let segmenter = SpeakerSegmenter::default();
        let blocks = segmenter.segment(
            "Operator\nWelcome.\nTim Cook\nThanks everyone.\nAnalyst One\nGreat results.",
        );
        let sequences: Vec<u32> = blocks.iter().map(|b| b.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }
}
