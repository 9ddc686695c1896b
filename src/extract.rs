use regex::Regex;
use std::sync::LazyLock;

use kifu_types::{Family, FamilyFields, GameRecord, Mode, Shogi24Mode, WarsMode};

use crate::error::{Error, Result};
use crate::markers::*;

// ── Regex patterns ─────────────────────────────────────────────────
//
// Real data examples:
//   24:
//     先手：taro_shogi(1523)
//     後手：hanako(1487)
//   Wars:
//     先手：taro_shogi 三段
//     後手:hanako 二段
//     先手の戦法：四間飛車
//     後手の囲い：舟囲い
//
// Captures stop at the end of the line; `[^\r\n]` keeps CRLF logs clean.

// 24 player with rating: 先手：{Name}({Rating})
static RE_24_SENTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"先手：(?P<name>[^\r\n]+?)\((?P<rating>[0-9]+)\)").unwrap());
static RE_24_GOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"後手：(?P<name>[^\r\n]+?)\((?P<rating>[0-9]+)\)").unwrap());

// Wars player: colon may be full-width or half-width
static RE_WARS_SENTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"先手[：:](?P<name>[^\r\n]+)").unwrap());
static RE_WARS_GOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"後手[：:](?P<name>[^\r\n]+)").unwrap());

static RE_WARS_SENTE_STRATEGY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"先手の戦法：(?P<value>[^\r\n]+)").unwrap());
static RE_WARS_GOTE_STRATEGY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"後手の戦法：(?P<value>[^\r\n]+)").unwrap());
static RE_WARS_SENTE_CASTLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"先手の囲い：(?P<value>[^\r\n]+)").unwrap());
static RE_WARS_GOTE_CASTLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"後手の囲い：(?P<value>[^\r\n]+)").unwrap());

/// Extract a record with the procedure of `family`.
pub fn extract_record(
    family: Family,
    content: &str,
    player: &str,
    source_filename: &str,
) -> Result<GameRecord> {
    match family {
        Family::Shogi24 => extract_shogi24(content, player, source_filename),
        Family::Wars => extract_wars(content, player, source_filename),
    }
}

// ── 将棋倶楽部24 ────────────────────────────────────────────────────

pub fn extract_shogi24(content: &str, player: &str, source_filename: &str) -> Result<GameRecord> {
    let mode = shogi24_mode(content).ok_or(Error::ModeNotFound)?;
    let result = game_result(content);

    let (sente, sente_rating) = rated_player(&RE_24_SENTE, content)?;
    let (gote, gote_rating) = rated_player(&RE_24_GOTE, content)?;
    let first_player_to_move = resolve_teban(player, sente, gote)?;

    Ok(GameRecord {
        mode: Mode::Shogi24(mode),
        first_player_to_move,
        result,
        fields: FamilyFields::Shogi24 {
            first_player_rating: sente_rating,
            second_player_rating: gote_rating,
        },
        source_filename: source_filename.to_string(),
    })
}

/// Longer markers are checked first so "早指し" cannot shadow "早指し3".
pub fn shogi24_mode(content: &str) -> Option<Shogi24Mode> {
    if content.contains(SHOGI24_HAYAZASHI3) {
        Some(Shogi24Mode::Hayazashi3)
    } else if content.contains(SHOGI24_HAYAZASHI2) {
        Some(Shogi24Mode::Hayazashi2)
    } else if content.contains(SHOGI24_HAYAZASHI) {
        Some(Shogi24Mode::Hayazashi)
    } else if content.contains(SHOGI24_FIFTEEN) {
        Some(Shogi24Mode::FifteenMinutes)
    } else if content.contains(SHOGI24_CHOUKOU) {
        Some(Shogi24Mode::Choukou)
    } else {
        None
    }
}

fn rated_player<'a>(re: &Regex, content: &'a str) -> Result<(&'a str, u32)> {
    let caps = re.captures(content).ok_or(Error::PlayerInfoNotFound)?;
    let name = caps.name("name").ok_or(Error::PlayerInfoNotFound)?.as_str();
    let rating = caps
        .name("rating")
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .ok_or(Error::PlayerInfoNotFound)?;
    Ok((name, rating))
}

// ── 将棋ウォーズ ────────────────────────────────────────────────────

pub fn extract_wars(content: &str, player: &str, source_filename: &str) -> Result<GameRecord> {
    let mode = wars_mode(content).ok_or(Error::ModeNotFound)?;

    let sente = capture_value(&RE_WARS_SENTE, "name", content);
    let gote = capture_value(&RE_WARS_GOTE, "name", content);
    let (Some(sente), Some(gote)) = (sente, gote) else {
        return Err(Error::PlayerNamesNotFound);
    };
    let first_player_to_move = resolve_teban(player, sente, gote)?;

    let result = if content.contains(WARS_WINNER_SENTE) {
        Some(true)
    } else if content.contains(WARS_WINNER_GOTE) {
        Some(false)
    } else {
        game_result(content)
    };

    let field = |re: &Regex| {
        capture_value(re, "value", content)
            .unwrap_or_default()
            .to_string()
    };

    Ok(GameRecord {
        mode: Mode::Wars(mode),
        first_player_to_move,
        result,
        fields: FamilyFields::Wars {
            first_player_strategy: field(&RE_WARS_SENTE_STRATEGY),
            second_player_strategy: field(&RE_WARS_GOTE_STRATEGY),
            first_player_castle: field(&RE_WARS_SENTE_CASTLE),
            second_player_castle: field(&RE_WARS_GOTE_CASTLE),
        },
        source_filename: source_filename.to_string(),
    })
}

pub fn wars_mode(content: &str) -> Option<WarsMode> {
    let sprint = content.contains(WARS_SPRINT);
    if content.contains(WARS_TEN_MINUTES) {
        Some(WarsMode::TenMinutes)
    } else if content.contains(WARS_THREE_MINUTES) && !sprint {
        Some(WarsMode::ThreeMinutes)
    } else if sprint {
        Some(WarsMode::Sprint)
    } else if content.contains(WARS_TEN_SECONDS) {
        Some(WarsMode::TenSeconds)
    } else {
        None
    }
}

// ── Shared ─────────────────────────────────────────────────────────

/// Result from the 先手's point of view, from the footer.
pub fn game_result(content: &str) -> Option<bool> {
    if content.contains(SENTE_WINS) {
        Some(true)
    } else if content.contains(GOTE_WINS) {
        Some(false)
    } else {
        None
    }
}

/// True if `player` is 先手, false if 後手. Sente is checked first.
fn resolve_teban(player: &str, sente: &str, gote: &str) -> Result<bool> {
    if sente.contains(player) {
        Ok(true)
    } else if gote.contains(player) {
        Ok(false)
    } else {
        Err(Error::PlayerNotFound {
            player: player.to_string(),
        })
    }
}

fn capture_value<'a>(re: &Regex, group: &str, content: &'a str) -> Option<&'a str> {
    re.captures(content)
        .and_then(|c| c.name(group))
        .map(|m| m.as_str())
}
