use std::sync::LazyLock;

use kifu_types::DiffAverages;
use log::debug;
use regex::Regex;

use crate::markers::CHECKMATE;

/// Evaluations are clamped to ±this; checkmate maps to the bounds.
pub const EVAL_LIMIT: i32 = 3300;

// ── Evaluation line formats ────────────────────────────────────────
//
// Real data examples:
//   Analysis pass (older engines):
//     **解析 0 ○候補1 時間 00:01.5 深さ 23/37 ノード数 1234567 評価値 85
//     **解析 0 △ 時間 00:00.3 深さ 5/9 評価値 -詰 7
//   Comment format (newer GUIs):
//     *#評価値=-412
//
// The whole line must match: a line with anything after the value
// (e.g. a trailing 読み筋) is not an evaluation line.

/// One historical evaluation-line format.
pub struct EvalMatcher {
    pub name: &'static str,
    /// Anchored at both ends; the signed token is captured as `value`.
    pattern: Regex,
}

impl EvalMatcher {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
        }
    }

    /// The raw signed token if `line` is in this format.
    pub fn capture<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(line)
            .and_then(|c| c.name("value"))
            .map(|m| m.as_str())
    }
}

/// Tried in order, first match wins. New formats go at the end.
pub static EVAL_MATCHERS: LazyLock<Vec<EvalMatcher>> = LazyLock::new(|| {
    vec![
        EvalMatcher::new(
            "analysis",
            r"^\*\*解析\s*0\s*[△○]?\s*(?:候補1)?\s*時間.*?評価値\s*(?P<value>[+-]?[0-9]+|[+-]?詰(?:\s*[0-9]+)?)$",
        ),
        EvalMatcher::new("comment", r"^\*#評価値=(?P<value>[+-]?[0-9]+)$"),
    ]
});

/// The matching format's name and the evaluation token on `line`.
pub fn match_eval_line(line: &str) -> Option<(&'static str, &str)> {
    EVAL_MATCHERS
        .iter()
        .find_map(|m| m.capture(line).map(|raw| (m.name, raw)))
}

/// Normalize a captured evaluation token to [-EVAL_LIMIT, EVAL_LIMIT].
///
/// Checkmate tokens ("+詰", "-詰 5") map to the bound matching their sign;
/// an unsigned mate counts as negative. Integers too wide to parse
/// saturate by sign.
pub fn sanitize_eval(raw: &str) -> i32 {
    let limit = i64::from(EVAL_LIMIT);
    if raw.contains(CHECKMATE) {
        return if raw.starts_with('+') {
            EVAL_LIMIT
        } else {
            -EVAL_LIMIT
        };
    }
    match raw.trim().parse::<i64>() {
        Ok(v) => v.clamp(-limit, limit) as i32,
        Err(_) if raw.starts_with('-') => -EVAL_LIMIT,
        Err(_) => EVAL_LIMIT,
    }
}

/// Collect the sanitized evaluation of every evaluation line, in order.
pub fn evaluation_series(content: &str) -> Vec<i32> {
    let mut series = Vec::new();
    let mut line_count = 0usize;

    for (idx, line) in content.lines().enumerate() {
        line_count += 1;
        let Some((format, raw)) = match_eval_line(line) else {
            continue;
        };
        let value = sanitize_eval(raw);
        series.push(value);

        let n = series.len();
        if n <= 5 || n % 20 == 0 {
            debug!("line {} ({format}): {raw} -> {value}", idx + 1);
        }
    }

    debug!(
        "scanned {line_count} lines, {} evaluation lines",
        series.len()
    );
    series
}

/// Average consecutive differences, split by index parity.
///
/// `diff[i] = series[i] - series[i-1]` goes to bucket A when `i` is even
/// and to bucket B when `i` is odd. Evaluations alternate perspective by
/// ply, so each bucket approximates one side's swing.
pub fn diff_averages(series: &[i32]) -> DiffAverages {
    let mut bucket_a: Vec<i64> = Vec::new();
    let mut bucket_b: Vec<i64> = Vec::new();

    for (i, pair) in series.windows(2).enumerate() {
        let diff = i64::from(pair[1]) - i64::from(pair[0]);
        // windows index i covers diff index i + 1
        if (i + 1) % 2 == 0 {
            bucket_a.push(diff);
        } else {
            bucket_b.push(diff);
        }
    }

    debug!(
        "differences: bucket A {}, bucket B {}",
        bucket_a.len(),
        bucket_b.len()
    );

    DiffAverages {
        bucket_a: bucket_average(&bucket_a),
        bucket_b: bucket_average(&bucket_b),
    }
}

/// Mean of the bucket, 0.0 when empty.
pub fn bucket_average(bucket: &[i64]) -> f64 {
    if bucket.is_empty() {
        return 0.0;
    }
    bucket.iter().sum::<i64>() as f64 / bucket.len() as f64
}

/// Series extraction and averaging in one pass over `content`.
pub fn analyze(content: &str) -> DiffAverages {
    let averages = diff_averages(&evaluation_series(content));
    debug!(
        "averages: A {:.3}, B {:.3}",
        averages.bucket_a, averages.bucket_b
    );
    averages
}
