//! Literal markers found in KIF headers and footers.
//!
//! 24 and Wars share the result footer ("まで87手で先手の勝ち") but
//! otherwise use their own vocabulary for time controls and extra fields.

// ── Shared ─────────────────────────────────────────────────────────

pub const SENTE_WINS: &str = "先手の勝ち";
pub const GOTE_WINS: &str = "後手の勝ち";

// ── 将棋倶楽部24 ────────────────────────────────────────────────────

/// Time-control markers in precedence order. The numbered variants
/// come first because "早指し" is a prefix of both.
pub const SHOGI24_HAYAZASHI3: &str = "早指し3";
pub const SHOGI24_HAYAZASHI2: &str = "早指し2";
pub const SHOGI24_HAYAZASHI: &str = "早指し";
pub const SHOGI24_FIFTEEN: &str = "15分";
pub const SHOGI24_CHOUKOU: &str = "長考";

// ── 将棋ウォーズ ────────────────────────────────────────────────────

pub const WARS_TEN_MINUTES: &str = "10分";
pub const WARS_THREE_MINUTES: &str = "3分";
/// Sprint games also mention "3分", so sprint suppresses the 3m match.
pub const WARS_SPRINT: &str = "スプリント";
pub const WARS_TEN_SECONDS: &str = "10秒";

/// "勝者：▲" / "勝者：△" override the shared footer.
pub const WARS_WINNER_SENTE: &str = "勝者：▲";
pub const WARS_WINNER_GOTE: &str = "勝者：△";

// ── Evaluation lines ───────────────────────────────────────────────

/// Checkmate marker inside an evaluation token ("+詰", "-詰 7").
pub const CHECKMATE: &str = "詰";
