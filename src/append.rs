use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};

const TERMINATOR: char = ';';
const SEPARATOR: &str = ",\n";

/// Trailing state of the SQL file before appending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Ended with `;`: the terminator was replaced by a separator.
    Terminated,
    /// Anything else: the row was appended directly.
    Open,
}

/// Insert `row` before the final `;` of the statement in `sql_path`.
///
/// The whole file is read, rewritten and written back. Running this twice
/// with the same row adds two rows.
pub fn append_row(sql_path: &Path, row: &str) -> Result<AppendOutcome> {
    let content = match fs::read_to_string(sql_path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::SqlFileNotFound {
                path: sql_path.to_path_buf(),
            });
        }
        Err(e) => return Err(Error::io(sql_path, e)),
    };
    debug!("{} loaded ({} bytes)", sql_path.display(), content.len());

    let (updated, outcome) = splice_row(&content, row);
    fs::write(sql_path, updated).map_err(|e| Error::io(sql_path, e))?;
    Ok(outcome)
}

/// The text-only half of [`append_row`].
pub fn splice_row(content: &str, row: &str) -> (String, AppendOutcome) {
    let trimmed = content.trim_end_matches([' ', '\t', '\n', '\r']);

    let (mut out, outcome) = match trimmed.strip_suffix(TERMINATOR) {
        Some(body) => {
            let mut s = String::with_capacity(content.len() + row.len() + 2);
            s.push_str(body);
            s.push_str(SEPARATOR);
            (s, AppendOutcome::Terminated)
        }
        None => (trimmed.to_string(), AppendOutcome::Open),
    };

    out.push_str(row);
    out.push(TERMINATOR);
    (out, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(label: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "kifu-sql-append-{label}-{}",
            std::process::id()
        ));
        fs::write(&path, content).unwrap();
        path
    }

    const STATEMENT: &str = "INSERT INTO games VALUES\n('hy', true, NULL, 0, 0, 1500, 1400, 'a.kif')\n;\n";

    #[test]
    fn test_splice_terminated() {
        let (out, outcome) = splice_row("INSERT INTO t VALUES\n(0,0,0);\n", "(1,2,3)");
        assert_eq!(outcome, AppendOutcome::Terminated);
        assert_eq!(out, "INSERT INTO t VALUES\n(0,0,0),\n(1,2,3);");
    }

    #[test]
    fn test_splice_open() {
        let (out, outcome) = splice_row("INSERT INTO t VALUES\n(0,0,0),\n  \n", "(1,2,3)\n");
        assert_eq!(outcome, AppendOutcome::Open);
        assert_eq!(out, "INSERT INTO t VALUES\n(0,0,0),(1,2,3)\n;");
    }

    #[test]
    fn test_splice_empty_file() {
        let (out, outcome) = splice_row("", "(1)\n");
        assert_eq!(outcome, AppendOutcome::Open);
        assert_eq!(out, "(1)\n;");
    }

    #[test]
    fn test_append_row_rewrites_file() {
        let path = scratch_file("rewrite", STATEMENT);
        let row = "('sp', false, true, 3, -4, '', '', '', '', 'w.kif')\n";

        let outcome = append_row(&path, row).unwrap();
        assert_eq!(outcome, AppendOutcome::Terminated);

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "INSERT INTO games VALUES\n('hy', true, NULL, 0, 0, 1500, 1400, 'a.kif')\n,\n\
             ('sp', false, true, 3, -4, '', '', '', '', 'w.kif')\n;"
        );
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_twice_adds_two_rows() {
        let path = scratch_file("twice", "INSERT INTO t VALUES\n(0);\n");

        append_row(&path, "(1)").unwrap();
        let once = fs::read_to_string(&path).unwrap();
        append_row(&path, "(1)").unwrap();
        let twice = fs::read_to_string(&path).unwrap();

        assert_ne!(once, twice);
        assert_eq!(twice, "INSERT INTO t VALUES\n(0),\n(1),\n(1);");
        assert_eq!(twice.matches("(1)").count(), 2);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_sql_file() {
        let path = std::env::temp_dir().join("kifu-sql-append-does-not-exist.sql");
        let err = append_row(&path, "(1)").unwrap_err();
        assert!(matches!(err, Error::SqlFileNotFound { .. }));
    }
}
