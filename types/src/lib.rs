use serde::{Deserialize, Serialize};

// ── Service family ───────────────────────────────────────────────────────

/// Which online service produced a game log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    /// 将棋倶楽部24: records carry ratings
    Shogi24,
    /// 将棋ウォーズ: records carry strategy and castle names
    Wars,
}

impl Family {
    /// Parse the `name` field of a setting entry ("24" / "wars").
    pub fn from_setting_name(name: &str) -> Option<Self> {
        match name {
            "24" => Some(Self::Shogi24),
            "wars" => Some(Self::Wars),
            _ => None,
        }
    }

    pub fn setting_name(&self) -> &'static str {
        match self {
            Self::Shogi24 => "24",
            Self::Wars => "wars",
        }
    }
}

// ── Time-control mode ────────────────────────────────────────────────────

/// 24 time controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shogi24Mode {
    /// 早指し
    Hayazashi,
    /// 早指し2
    Hayazashi2,
    /// 早指し3
    Hayazashi3,
    /// 15分
    FifteenMinutes,
    /// 長考
    Choukou,
}

/// Wars time controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarsMode {
    /// 10分
    TenMinutes,
    /// 3分
    ThreeMinutes,
    /// スプリント
    Sprint,
    /// 10秒
    TenSeconds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "family", content = "mode")]
pub enum Mode {
    Shogi24(Shogi24Mode),
    Wars(WarsMode),
}

impl Mode {
    /// The short code stored in the `mode` column.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Shogi24(m) => match m {
                Shogi24Mode::Hayazashi => "hy",
                Shogi24Mode::Hayazashi2 => "hy2",
                Shogi24Mode::Hayazashi3 => "hy3",
                Shogi24Mode::FifteenMinutes => "15",
                Shogi24Mode::Choukou => "30",
            },
            Self::Wars(m) => match m {
                WarsMode::TenMinutes => "10m",
                WarsMode::ThreeMinutes => "3m",
                WarsMode::Sprint => "sp",
                WarsMode::TenSeconds => "10s",
            },
        }
    }

    pub fn family(&self) -> Family {
        match self {
            Self::Shogi24(_) => Family::Shogi24,
            Self::Wars(_) => Family::Wars,
        }
    }
}

// ── Extracted game record ────────────────────────────────────────────────

/// Fields that only one family records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FamilyFields {
    Shogi24 {
        first_player_rating: u32,
        second_player_rating: u32,
    },
    Wars {
        /// 先手の戦法 (empty when not recorded)
        first_player_strategy: String,
        /// 後手の戦法
        second_player_strategy: String,
        /// 先手の囲い
        first_player_castle: String,
        /// 後手の囲い
        second_player_castle: String,
    },
}

/// Per-game metadata pulled out of one game log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub mode: Mode,
    /// True when the tracked player is 先手 (moves first)
    pub first_player_to_move: bool,
    /// Some(true) = 先手 won, Some(false) = 後手 won, None = draw/undecided
    #[serde(default)]
    pub result: Option<bool>,
    pub fields: FamilyFields,
    pub source_filename: String,
}

// ── Evaluation statistics ────────────────────────────────────────────────

/// Mean evaluation swing of each bucket (see `kifu_sql::eval`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffAverages {
    /// Mean of differences at even indices
    pub bucket_a: f64,
    /// Mean of differences at odd indices
    pub bucket_b: f64,
}

// ── Settings ─────────────────────────────────────────────────────────────

/// One entry of `setting.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingEntry {
    /// Regex that must match the whole base filename
    pub pattern: String,
    /// Family selector: "24" or "wars"
    pub name: String,
    /// Tracked player's name (substring-matched against both sides)
    pub player: String,
    pub sql_file_path: String,
}
