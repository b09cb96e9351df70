//! Browser cookies used to seed the Ozon API session.
//!
//! Two input forms are accepted: a JSON array exported by a cookie-manager
//! extension, and the inline `name=value; name2=value2` string shown in the
//! devtools request inspector.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// One cookie as exported from an authenticated browser session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieEntry {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Read a JSON array of cookie objects (`name` and `value` required,
/// `domain` and `path` optional).
///
/// # Errors
///
/// Returns `CoreError::Io` when the file cannot be read and
/// `CoreError::CookieJson` when it is not a valid cookie array.
pub fn read_cookies_json(path: &Path) -> Result<Vec<CookieEntry>, CoreError> {
    let text = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CoreError::CookieJson {
        path: path.display().to_string(),
        source,
    })
}

/// Parse an inline `name=value; name2=value2` cookie header string.
/// Segments without `=` or with an empty name are dropped.
#[must_use]
pub fn parse_cookie_header(raw: &str) -> Vec<CookieEntry> {
    raw.split(';')
        .filter_map(|part| {
            let (name, value) = part.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(CookieEntry {
                name: name.to_string(),
                value: value.trim().to_string(),
                domain: None,
                path: None,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
