// CSV export of the standings table currently on screen.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use guillotine_core::standings::StandingsTable;

/// File name for an export of `table`.
pub fn export_file_name(table: &StandingsTable) -> String {
    format!("standings_{}_w{}.csv", table.season, table.visible_weeks)
}

/// Write `table` as CSV under `dir`, creating it if needed. Returns the path
/// written.
pub fn export_standings(table: &StandingsTable, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;
    let path = dir.join(export_file_name(table));

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mut header = vec!["Manager".to_string(), "Draft".to_string(), "FAAB".to_string()];
    header.extend((1..=table.visible_weeks).map(|w| format!("Wk{w}")));
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![
            row.user_name.clone(),
            row.draft_position.map(|d| d.to_string()).unwrap_or_default(),
            row.faab_remaining.to_string(),
        ];
        record.extend(row.cells.iter().map(|c| format_value(c.score)));
        writer.write_record(&record)?;
    }

    for summary in &table.weekly_summary {
        let mut record = vec![summary.metric.label().to_string(), String::new(), String::new()];
        record.extend(summary.cells.iter().map(|c| format_value(c.value)));
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), rows = table.rows.len(), "exported standings");
    Ok(path)
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use guillotine_core::model::{Manager, SeasonData};
    use guillotine_core::standings::{build_standings, StandingsContext, SummaryMetric};

    fn table() -> StandingsTable {
        let mut ann = Manager::new("Ann");
        ann.draft_position = Some(3);
        ann.faab_remaining = 750;
        ann.set_score(1, Some(120.5));
        ann.set_score(2, Some(99.0));
        let mut ben = Manager::new("Ben");
        ben.faab_remaining = 0;
        ben.chop_week = Some(1);
        ben.set_score(1, Some(80.0));
        let season = SeasonData {
            season: 2024,
            managers: vec![ben, ann],
            weekly_stats: Default::default(),
            current_week: 2,
            champion: None,
            status: None,
            starting_faab: None,
        };
        build_standings(&season, &StandingsContext::default())
    }

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("guillotine_export_{name}_{}", std::process::id()))
    }

    #[test]
    fn file_name_includes_season_and_week() {
        assert_eq!(export_file_name(&table()), "standings_2024_w2.csv");
    }

    #[test]
    fn writes_header_rows_and_summary() {
        let dir = temp_dir("rows");
        let _ = std::fs::remove_dir_all(&dir);
        let path = export_standings(&table(), &dir).unwrap();
        assert_eq!(path, dir.join("standings_2024_w2.csv"));

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Manager,Draft,FAAB,Wk1,Wk2");
        assert_eq!(lines[1], "Ben,,0,80.00,");
        assert_eq!(lines[2], "Ann,3,750,120.50,99.00");
        assert_eq!(lines.len(), 3 + SummaryMetric::ALL.len());
        assert!(lines[3].starts_with("High Score,,,"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
