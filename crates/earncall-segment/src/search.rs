use anyhow::{ensure, Result};
use regex::Regex;

/// One keyword hit with surrounding context lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    /// 1-based line number within the transcript text.
    pub line_no: usize,
    pub line: String,
    pub before: Vec<String>,
    pub after: Vec<String>,
}

/// Find case-insensitive keyword matches in transcript text, with
/// `context_lines` lines of context on each side. `whole_word` anchors
/// the keyword at word boundaries.
pub fn find_keyword(
    text: &str,
    keyword: &str,
    context_lines: usize,
    whole_word: bool,
) -> Result<Vec<KeywordMatch>> {
    ensure!(!keyword.is_empty(), "keyword must be non-empty");

    let escaped = regex::escape(keyword);
    let pattern = if whole_word {
        format!(r"(?i)\b{escaped}\b")
    } else {
        format!("(?i){escaped}")
    };
    let re = Regex::new(&pattern)?;

    let lines: Vec<&str> = text.lines().collect();
    let mut matches = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if !re.is_match(line) {
            continue;
        }
        let start = i.saturating_sub(context_lines);
        let end = (i + context_lines + 1).min(lines.len());
        matches.push(KeywordMatch {
            line_no: i + 1,
            line: line.to_string(),
            before: lines[start..i].iter().map(|s| s.to_string()).collect(),
            after: lines[i + 1..end].iter().map(|s| s.to_string()).collect(),
        });
    }

    Ok(matches)
}
