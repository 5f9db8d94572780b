//! CSV export of decisions for spreadsheets and audits.

use crate::core::decision::Decision;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write one row per file: the keeper, each deleted video and each deleted
/// sidecar
///
/// Columns: group_id, strategy, label, action, score, size_bytes, path
pub fn export_csv<W: Write>(decisions: &[Decision], mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "group_id,strategy,label,action,score,size_bytes,path")?;

    for decision in decisions {
        let row = |writer: &mut W, action: &str, score: String, size: String, path: &Path| {
            writeln!(
                writer,
                "{},{},{},{},{},{},{}",
                decision.group_id,
                decision.strategy,
                csv_field(&decision.label),
                action,
                score,
                size,
                csv_field(&path.display().to_string())
            )
        };

        let keep = &decision.keep;
        row(
            &mut writer,
            "keep",
            keep.score.points.to_string(),
            keep.record.size_bytes.to_string(),
            &keep.record.path,
        )?;

        for scored in &decision.delete {
            row(
                &mut writer,
                "delete",
                scored.score.points.to_string(),
                scored.record.size_bytes.to_string(),
                &scored.record.path,
            )?;
            for sidecar in &scored.record.sidecars {
                row(&mut writer, "delete_sidecar", String::new(), String::new(), sidecar)?;
            }
        }
    }

    Ok(())
}

/// Export decisions to a CSV file
pub fn export_to_file(decisions: &[Decision], path: &Path) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    export_csv(decisions, &mut writer)?;
    writer.flush()
}

/// Quote a field when it contains a delimiter, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decision::DecisionEngine;
    use crate::core::grouper::{DuplicateGroup, GroupStrategy};
    use crate::core::parser::MediaParser;
    use crate::core::vocabulary::Vocabulary;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn decision() -> Decision {
        let parser = MediaParser::new(Vocabulary::default().compile().unwrap());
        let mut drop = parser.parse_path(Path::new("/m/Heat, The (1995)/Heat.720p.mkv"), 40);
        drop.sidecars.insert(PathBuf::from("/m/Heat, The (1995)/Heat.720p.srt"));
        let group = DuplicateGroup::new(
            GroupStrategy::Folder,
            "Heat, The (1995)".into(),
            vec![
                parser.parse_path(Path::new("/m/Heat, The (1995)/Heat.1080p.mkv"), 100),
                drop,
            ],
        );
        DecisionEngine::default().decide(&group).unwrap()
    }

    #[test]
    fn csv_has_row_per_file() {
        let mut output = Vec::new();
        export_csv(&[decision()], &mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("group_id,"));
        assert!(lines[1].contains(",keep,5,100,"));
        assert!(lines[2].contains(",delete,4,40,"));
        assert!(lines[3].contains(",delete_sidecar,,,"));
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("Heat, The"), "\"Heat, The\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn export_to_file_writes_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("decisions.csv");

        export_to_file(&[decision()], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("folder"));
        assert!(content.contains("\"/m/Heat, The (1995)/Heat.1080p.mkv\""));
    }
}
