use std::path::{Path, PathBuf};

use kifu_types::{DiffAverages, FamilyFields, GameRecord, SettingEntry};
use log::{debug, error, info, warn};

use crate::append::{AppendOutcome, append_row};
use crate::decode::read_log;
use crate::error::{Error, Result};
use crate::eval;
use crate::extract::extract_record;
use crate::row::{QuoteStyle, build_row};
use crate::scanner::{file_name, scan_logs};
use crate::settings::{Settings, entry_family, sql_path};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Build the row but leave the SQL file untouched
    pub dry_run: bool,
    pub quote_style: QuoteStyle,
}

/// Everything produced for one game log.
#[derive(Debug)]
pub struct Update {
    pub record: GameRecord,
    pub averages: DiffAverages,
    pub row: String,
    pub sql_path: PathBuf,
    /// None on a dry run
    pub outcome: Option<AppendOutcome>,
}

impl Update {
    /// Dry-run report: the record as JSON, then the row literal.
    pub fn dry_run_output(&self) -> String {
        #[derive(serde::Serialize)]
        struct DryRun<'a> {
            record: &'a GameRecord,
            averages: &'a DiffAverages,
            sql_file_path: String,
        }

        let report = DryRun {
            record: &self.record,
            averages: &self.averages,
            sql_file_path: self.sql_path.display().to_string(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => format!("{json}\n{}", self.row),
            Err(e) => {
                warn!("cannot serialize record: {e}");
                self.row.clone()
            }
        }
    }
}

/// Extract, analyze and build the row for already-decoded `content`.
pub fn build_update(
    content: &str,
    filename: &str,
    entry: &SettingEntry,
    style: QuoteStyle,
) -> Result<(GameRecord, DiffAverages, String)> {
    let family = entry_family(entry)?;
    let record = extract_record(family, content, &entry.player, filename)?;
    log_record(&record);

    let averages = eval::analyze(content);
    let row = build_row(&record, &averages, style);
    Ok((record, averages, row))
}

/// Process one game log and append its row to the matching SQL file.
pub fn update_sql(input: &Path, settings: &Settings, options: &RunOptions) -> Result<Update> {
    let filename = file_name(input);
    info!("processing {filename} ({})", input.display());

    let entry = settings.find(&filename)?;
    debug!(
        "matched setting {} (pattern {}, player {})",
        entry.name, entry.pattern, entry.player
    );

    let content = read_log(input)?;
    debug!("loaded {} bytes", content.len());

    let (record, averages, row) = build_update(&content, &filename, entry, options.quote_style)?;
    info!("row: {}", row.trim_end());

    let sql_path = sql_path(entry);
    let outcome = if options.dry_run {
        None
    } else {
        let outcome = append_row(&sql_path, &row)?;
        if outcome == AppendOutcome::Terminated {
            debug!("replaced trailing ';' with a separator");
        }
        info!("updated {}", sql_path.display());
        Some(outcome)
    };

    Ok(Update {
        record,
        averages,
        row,
        sql_path,
        outcome,
    })
}

fn log_record(record: &GameRecord) {
    let result = match record.result {
        Some(true) => "sente win",
        Some(false) => "gote win",
        None => "draw",
    };
    let teban = if record.first_player_to_move {
        "sente"
    } else {
        "gote"
    };
    info!(
        "{} game: mode {}, teban {teban}, result {result}",
        record.mode.family().setting_name(),
        record.mode.code()
    );
    match &record.fields {
        FamilyFields::Shogi24 {
            first_player_rating,
            second_player_rating,
        } => debug!("ratings: sente {first_player_rating}, gote {second_player_rating}"),
        FamilyFields::Wars {
            first_player_strategy,
            second_player_strategy,
            first_player_castle,
            second_player_castle,
        } => {
            debug!("strategies: sente {first_player_strategy}, gote {second_player_strategy}");
            debug!("castles: sente {first_player_castle}, gote {second_player_castle}");
        }
    }
}

// ── Batch mode ─────────────────────────────────────────────────────

/// Per-run counts for a directory.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub found: usize,
    pub succeeded: usize,
    pub failed: Vec<(PathBuf, Error)>,
}

impl BatchSummary {
    pub fn error_count(&self) -> usize {
        self.failed.len()
    }
}

/// Process every `.kif` under `dir` in sorted order.
///
/// A failing file is logged and counted; the rest still run. Settings are
/// loaded once the directory is known to be valid. If they cannot be
/// loaded, every file fails with `ConfigUnavailable`. On a dry run each
/// file's report goes to stdout.
pub fn process_directory(
    dir: &Path,
    load_settings: impl FnOnce() -> Result<Settings>,
    options: &RunOptions,
) -> Result<BatchSummary> {
    if !dir.is_dir() {
        return Err(Error::InvalidInput {
            path: dir.to_path_buf(),
        });
    }

    let logs = scan_logs(dir);
    let mut summary = BatchSummary {
        found: logs.len(),
        ..Default::default()
    };
    info!("found {} .kif files under {}", logs.len(), dir.display());
    if logs.is_empty() {
        warn!("no .kif files in {}", dir.display());
        return Ok(summary);
    }

    let settings = load_settings();
    if let Err(e) = &settings {
        error!("{e}");
    }

    for (i, path) in logs.iter().enumerate() {
        info!("[{}/{}] {}", i + 1, logs.len(), file_name(path));
        let processed = match &settings {
            Ok(settings) => update_sql(path, settings, options),
            Err(e) => Err(config_failure(e)),
        };
        match processed {
            Ok(update) => {
                if options.dry_run {
                    print!("{}", update.dry_run_output());
                }
                summary.succeeded += 1;
            }
            Err(e) => {
                error!("{}: {e}", path.display());
                summary.failed.push((path.clone(), e));
            }
        }
    }

    Ok(summary)
}

/// A fresh `ConfigUnavailable` for one file of a batch whose settings failed.
fn config_failure(err: &Error) -> Error {
    match err {
        Error::ConfigUnavailable { path, reason } => Error::ConfigUnavailable {
            path: path.clone(),
            reason: reason.clone(),
        },
        other => Error::ConfigUnavailable {
            path: PathBuf::new(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const KIF_24: &str = "\
棋戦：レーティング対局室(15分)
先手：taro(1523)
後手：hanako(1487)
*#評価値=100
*#評価値=150
*#評価値=120
*#評価値=200
まで4手で先手の勝ち
";

    struct Scratch {
        root: PathBuf,
    }

    impl Scratch {
        fn new(label: &str) -> Self {
            let root = std::env::temp_dir().join(format!(
                "kifu-sql-pipeline-{label}-{}",
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&root);
            fs::create_dir_all(&root).unwrap();
            Self { root }
        }

        fn settings(&self) -> Settings {
            Settings::from_entries(vec![SettingEntry {
                pattern: r"club-.*\.kif".into(),
                name: "24".into(),
                player: "taro".into(),
                sql_file_path: self.root.join("24.sql").display().to_string(),
            }])
            .unwrap()
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.root);
        }
    }

    #[test]
    fn test_build_update_row() {
        let entry = SettingEntry {
            pattern: ".*".into(),
            name: "24".into(),
            player: "hanako".into(),
            sql_file_path: "unused.sql".into(),
        };
        let (record, averages, row) =
            build_update(KIF_24, "club-1.kif", &entry, QuoteStyle::Verbatim).unwrap();
        assert!(!record.first_player_to_move);
        assert_eq!(averages.bucket_a, -30.0);
        assert_eq!(row, "('15', false, true, -30, 65, 1523, 1487, 'club-1.kif')\n");
    }

    #[test]
    fn test_build_update_unknown_family() {
        let entry = SettingEntry {
            pattern: ".*".into(),
            name: "81".into(),
            player: "taro".into(),
            sql_file_path: "unused.sql".into(),
        };
        assert!(matches!(
            build_update(KIF_24, "x.kif", &entry, QuoteStyle::Verbatim),
            Err(Error::UnknownFamily { .. })
        ));
    }

    #[test]
    fn test_update_sql_appends() {
        let scratch = Scratch::new("single");
        let settings = scratch.settings();
        fs::write(scratch.root.join("24.sql"), "INSERT INTO games VALUES\n(0);\n").unwrap();
        let log = scratch.root.join("club-1.kif");
        fs::write(&log, KIF_24).unwrap();

        let update = update_sql(&log, &settings, &RunOptions::default()).unwrap();
        assert_eq!(update.outcome, Some(AppendOutcome::Terminated));

        let sql = fs::read_to_string(scratch.root.join("24.sql")).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO games VALUES\n(0),\n('15', true, true, -30, 65, 1523, 1487, 'club-1.kif')\n;"
        );
    }

    #[test]
    fn test_update_sql_dry_run_leaves_file() {
        let scratch = Scratch::new("dry");
        let settings = scratch.settings();
        fs::write(scratch.root.join("24.sql"), "INSERT INTO games VALUES\n(0);\n").unwrap();
        let log = scratch.root.join("club-1.kif");
        fs::write(&log, KIF_24).unwrap();

        let options = RunOptions {
            dry_run: true,
            ..Default::default()
        };
        let update = update_sql(&log, &settings, &options).unwrap();
        assert_eq!(update.outcome, None);
        assert_eq!(
            fs::read_to_string(scratch.root.join("24.sql")).unwrap(),
            "INSERT INTO games VALUES\n(0);\n"
        );
    }

    #[test]
    fn test_update_sql_setting_not_found() {
        let scratch = Scratch::new("nosetting");
        let log = scratch.root.join("other.kif");
        fs::write(&log, KIF_24).unwrap();
        assert!(matches!(
            update_sql(&log, &scratch.settings(), &RunOptions::default()),
            Err(Error::SettingNotFound { .. })
        ));
    }

    #[test]
    fn test_update_sql_missing_sql_file() {
        let scratch = Scratch::new("nosql");
        let log = scratch.root.join("club-1.kif");
        fs::write(&log, KIF_24).unwrap();
        assert!(matches!(
            update_sql(&log, &scratch.settings(), &RunOptions::default()),
            Err(Error::SqlFileNotFound { .. })
        ));
    }

    #[test]
    fn test_process_directory_continues_after_failure() {
        let scratch = Scratch::new("batch");
        let settings = scratch.settings();
        fs::write(scratch.root.join("24.sql"), "INSERT INTO games VALUES\n(0);\n").unwrap();
        let games = scratch.root.join("games");
        fs::create_dir_all(&games).unwrap();
        fs::write(games.join("club-1.kif"), KIF_24).unwrap();
        fs::write(games.join("club-2.kif"), "棋戦：(15分)\n").unwrap();
        fs::write(games.join("club-3.kif"), KIF_24.replace("15分", "長考")).unwrap();
        fs::write(games.join("readme.txt"), "ignored").unwrap();

        let summary =
            process_directory(&games, || Ok(settings), &RunOptions::default()).unwrap();
        assert_eq!(summary.found, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.error_count(), 1);
        assert!(matches!(summary.failed[0].1, Error::PlayerInfoNotFound));

        let sql = fs::read_to_string(scratch.root.join("24.sql")).unwrap();
        let club1 = sql.find("'club-1.kif'").unwrap();
        let club3 = sql.find("'club-3.kif'").unwrap();
        assert!(club1 < club3);
        assert!(sql.contains("('30', true, true,"));
    }

    fn unavailable() -> Result<Settings> {
        Err(Error::ConfigUnavailable {
            path: PathBuf::from("absent.json"),
            reason: "No such file or directory".into(),
        })
    }

    #[test]
    fn test_process_directory_rejects_file() {
        let scratch = Scratch::new("notdir");
        let file = scratch.root.join("club-1.kif");
        fs::write(&file, KIF_24).unwrap();
        assert!(matches!(
            process_directory(&file, unavailable, &RunOptions::default()),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_process_directory_without_settings_counts_every_file() {
        let scratch = Scratch::new("nosettings");
        fs::write(scratch.root.join("club-1.kif"), KIF_24).unwrap();
        fs::write(scratch.root.join("club-2.kif"), KIF_24).unwrap();

        let summary =
            process_directory(&scratch.root, unavailable, &RunOptions::default()).unwrap();
        assert_eq!(summary.found, 2);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.error_count(), 2);
        for (_, e) in &summary.failed {
            assert!(matches!(
                e,
                Error::ConfigUnavailable { path, .. } if path == Path::new("absent.json")
            ));
        }
    }

    #[test]
    fn test_process_directory_dry_run_leaves_file() {
        let scratch = Scratch::new("batchdry");
        let settings = scratch.settings();
        let seed = "INSERT INTO games VALUES\n(0);\n";
        fs::write(scratch.root.join("24.sql"), seed).unwrap();
        fs::write(scratch.root.join("club-1.kif"), KIF_24).unwrap();

        let options = RunOptions {
            dry_run: true,
            ..Default::default()
        };
        let summary = process_directory(&scratch.root, || Ok(settings), &options).unwrap();
        assert_eq!(summary.succeeded, 1);
        assert_eq!(fs::read_to_string(scratch.root.join("24.sql")).unwrap(), seed);
    }

    #[test]
    fn test_dry_run_output_has_record_and_row() {
        let scratch = Scratch::new("dryout");
        let log = scratch.root.join("club-1.kif");
        fs::write(&log, KIF_24).unwrap();
        let options = RunOptions {
            dry_run: true,
            ..Default::default()
        };

        let update = update_sql(&log, &scratch.settings(), &options).unwrap();
        let output = update.dry_run_output();
        assert!(output.contains("\"source_filename\": \"club-1.kif\""));
        assert!(output.contains("\"sql_file_path\""));
        assert!(output.ends_with("('15', true, true, -30, 65, 1523, 1487, 'club-1.kif')\n"));
    }
}
