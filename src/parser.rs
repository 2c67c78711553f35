//! Decoding of Understat payloads.
//!
//! The JSON endpoints return plain JSON. The legacy HTML pages embed the same data
//! as `var shotsData = JSON.parse('...')` with every non-alphanumeric byte written
//! as a `\xNN` escape, so those are unescaped before handing them to serde.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::api::{MatchShots, RawMatch};
use crate::errors::{FetchStage, Result, ShotError};

static EMBEDDED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)var\s+(\w+)\s*=\s*JSON\.parse\(\s*'(.*?)'\s*\)").expect("static regex")
});

/// Find `var <name> = JSON.parse('...')` in a page and return the decoded JSON text.
pub fn extract_embedded_json(html: &str, name: &str) -> Result<String> {
    let raw = EMBEDDED_RE
        .captures_iter(html)
        .find(|caps| caps.get(1).map(|m| m.as_str()) == Some(name))
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            ShotError::data_source(FetchStage::Extract, name, "embedded JSON.parse payload not found")
        })?;

    unescape_js(raw).map_err(|e| ShotError::data_source(FetchStage::Extract, name, e))
}

/// Undo JavaScript single-quoted string escaping. `\xNN` yields raw bytes so that
/// escaped UTF-8 sequences reassemble into the original characters.
fn unescape_js(raw: &str) -> std::result::Result<String, String> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let esc = *bytes.get(i + 1).ok_or("dangling backslash")?;
        match esc {
            b'x' => {
                let hex = bytes.get(i + 2..i + 4).ok_or("truncated \\x escape")?;
                let (hi, lo) = match (hex_value(hex[0]), hex_value(hex[1])) {
                    (Some(hi), Some(lo)) => (hi, lo),
                    _ => {
                        return Err(format!(
                            "invalid \\x escape {:?}",
                            String::from_utf8_lossy(hex)
                        ))
                    }
                };
                out.push(hi << 4 | lo);
                i += 4;
                continue;
            }
            b'n' => out.push(b'\n'),
            b't' => out.push(b'\t'),
            b'r' => out.push(b'\r'),
            // \\ \' \" \/ and anything else: keep the escaped character itself
            other => out.push(other),
        }
        i += 2;
    }

    String::from_utf8(out).map_err(|e| format!("payload is not UTF-8: {}", e))
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Parse a league listing.
///
/// Accepts both the `getLeagueData` envelope (`{"dates": [...], ...}`) and the bare
/// array embedded in league pages.
pub fn parse_league_matches(body: &str, target: &str) -> Result<Vec<RawMatch>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ShotError::data_source(FetchStage::Decode, target, e))?;

    let dates = match value {
        Value::Object(mut obj) => obj.remove("dates").ok_or_else(|| {
            ShotError::data_source(FetchStage::Decode, target, "response has no `dates` list")
        })?,
        other => other,
    };

    serde_json::from_value(dates).map_err(|e| ShotError::data_source(FetchStage::Record, target, e))
}

/// Parse a match's shot listing.
///
/// Accepts both the `getMatchData` envelope (`{"shots": {"h": .., "a": ..}, ...}`)
/// and the bare `{"h": .., "a": ..}` object embedded in match pages.
pub fn parse_match_shots(body: &str, target: &str) -> Result<MatchShots> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ShotError::data_source(FetchStage::Decode, target, e))?;

    let shots = match value {
        Value::Object(mut obj) if obj.contains_key("shots") => obj.remove("shots").unwrap_or_default(),
        other => other,
    };

    serde_json::from_value(shots).map_err(|e| ShotError::data_source(FetchStage::Record, target, e))
}
