use std::fs;
use std::path::Path;

use encoding_rs::SHIFT_JIS;
use log::debug;

use crate::error::{Error, Result};

/// Read a game log as text.
///
/// Wars exports are UTF-8; 24 and older GUIs write Shift_JIS.
pub fn read_log(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    decode_log(&bytes).ok_or_else(|| Error::DecodeFailure {
        path: path.to_path_buf(),
    })
}

/// UTF-8 (BOM stripped) first, then Shift_JIS. None if neither is clean.
pub fn decode_log(bytes: &[u8]) -> Option<String> {
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return Some(text.to_string());
    }

    let (text, had_errors) = SHIFT_JIS.decode_without_bom_handling(bytes);
    if had_errors {
        return None;
    }
    debug!("decoded {} bytes as Shift_JIS", bytes.len());
    Some(text.into_owned())
}
