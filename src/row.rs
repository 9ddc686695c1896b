use std::borrow::Cow;

use kifu_types::{DiffAverages, FamilyFields, GameRecord};
use log::warn;

/// How string fields are placed between single quotes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteStyle {
    /// Inserted as-is. A value containing `'` breaks the statement.
    #[default]
    Verbatim,
    /// Embedded `'` doubled to `''`.
    Escaped,
}

/// Build the row literal for one game, newline-terminated.
///
/// Column order:
///   24:   (mode, teban, result, ave_a, ave_b, sente_rating, gote_rating, file)
///   Wars: (mode, teban, result, ave_a, ave_b, sente_strategy, gote_strategy,
///          sente_castle, gote_castle, file)
pub fn build_row(record: &GameRecord, averages: &DiffAverages, style: QuoteStyle) -> String {
    let mut values: Vec<String> = vec![
        format!("'{}'", record.mode.code()),
        bool_token(record.first_player_to_move).to_string(),
        result_token(record.result).to_string(),
        round_average(averages.bucket_a).to_string(),
        round_average(averages.bucket_b).to_string(),
    ];

    match &record.fields {
        FamilyFields::Shogi24 {
            first_player_rating,
            second_player_rating,
        } => {
            values.push(first_player_rating.to_string());
            values.push(second_player_rating.to_string());
        }
        FamilyFields::Wars {
            first_player_strategy,
            second_player_strategy,
            first_player_castle,
            second_player_castle,
        } => {
            values.push(quoted("first_player_strategy", first_player_strategy, style));
            values.push(quoted("second_player_strategy", second_player_strategy, style));
            values.push(quoted("first_player_castle", first_player_castle, style));
            values.push(quoted("second_player_castle", second_player_castle, style));
        }
    }

    values.push(quoted("source_filename", &record.source_filename, style));

    format!("({})\n", values.join(", "))
}

fn bool_token(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}

fn result_token(result: Option<bool>) -> &'static str {
    result.map_or("NULL", bool_token)
}

/// Nearest integer, halves away from zero.
pub fn round_average(value: f64) -> i64 {
    value.round() as i64
}

fn quoted(column: &str, value: &str, style: QuoteStyle) -> String {
    let body: Cow<'_, str> = match style {
        QuoteStyle::Escaped => Cow::Owned(value.replace('\'', "''")),
        QuoteStyle::Verbatim => {
            if value.contains('\'') {
                warn!("{column} contains a single quote, row literal will be malformed: {value}");
            }
            Cow::Borrowed(value)
        }
    };
    format!("'{body}'")
}
