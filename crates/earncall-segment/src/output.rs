use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use earncall_model::SpeakerBlock;

/// Write the normalized transcript text as UTF-8, creating the parent
/// directory if needed.
pub fn write_transcript_txt(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), lines = text.lines().count(), "Wrote transcript text");
    Ok(())
}

/// Write speaker blocks as CSV with header `sequence,speaker,text`.
pub fn write_speaker_csv(path: &Path, blocks: &[SpeakerBlock]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("failed to open {}", path.display()))?;
    for block in blocks {
        writer.serialize(block)?;
    }
    writer.flush()?;
    tracing::info!(path = %path.display(), blocks = blocks.len(), "Wrote speaker blocks");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("earncall-output-{}-{}", std::process::id(), name));
        p
    }

    #[test]
    fn test_csv_header_and_quoting() {
        let path = temp_path("blocks.csv");
        let blocks = vec![
            SpeakerBlock {
                sequence: 1,
                speaker: "Operator".to_string(),
                text: "Welcome, everyone, to the call.".to_string(),
            },
            SpeakerBlock {
                sequence: 2,
                speaker: "Tim Cook".to_string(),
                text: "Revenue was \"strong\".".to_string(),
            },
        ];
        write_speaker_csv(&path, &blocks).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("sequence,speaker,text"));
        // Commas in the utterance force quoting
        assert_eq!(
            lines.next(),
            Some("1,Operator,\"Welcome, everyone, to the call.\"")
        );

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_txt_roundtrip_creates_parent() {
        let dir = temp_path("txt-dir");
        let path = dir.join("AAPL_2025_Q4.txt");
        write_transcript_txt(&path, "Operator\nWelcome.").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Operator\nWelcome.");
        fs::remove_dir_all(&dir).unwrap();
    }
}
