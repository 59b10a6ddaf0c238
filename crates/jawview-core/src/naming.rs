//! Scan file naming
//!
//! File names start with the patient id (leading zeros allowed) and carry the
//! jaw role somewhere in the rest of the name, e.g. `0028_upper.stl`,
//! `10-низ.stl` or `7_l.stl`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Keywords that mark an upper jaw scan, tried in order
pub const UPPER_KEYWORDS: &[&str] = &["upper", "верх", "verh", "top"];

/// Keywords that mark a lower jaw scan, tried in order
pub const LOWER_KEYWORDS: &[&str] = &["lower", "низ", "ниж", "niz", "nizh", "bottom"];

/// Numeric patient id taken from the start of a file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatientId(pub u64);

impl PatientId {
    /// Get the raw id value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which jaw a scan belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Upper,
    Lower,
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse the leading patient id of a file name.
///
/// Leading zeros are ignored (`"0028_upper.stl"` is 28, `"000.stl"` is 0).
/// Names that do not start with a digit, or whose digit run does not fit in
/// a `u64`, have no id.
pub fn extract_id(name: &str) -> Option<PatientId> {
    let digits_end = name
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(name.len());
    let digits = &name[..digits_end];
    if digits.is_empty() {
        return None;
    }

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Some(PatientId(0));
    }
    significant.parse().ok().map(PatientId)
}

/// Classify a file name as upper or lower jaw.
///
/// Matching is a case-insensitive substring search over [`UPPER_KEYWORDS`],
/// then [`LOWER_KEYWORDS`], then the single-letter `_u` / `_l` markers, which
/// only count when followed by the end of the name or a character that
/// cannot continue a word.
pub fn detect_role(name: &str) -> Role {
    let name = name.to_lowercase();

    if UPPER_KEYWORDS.iter().any(|k| name.contains(k)) {
        return Role::Upper;
    }
    if LOWER_KEYWORDS.iter().any(|k| name.contains(k)) {
        return Role::Lower;
    }

    match role_marker(&name) {
        Some('u') => Role::Upper,
        Some('l') => Role::Lower,
        _ => Role::Unknown,
    }
}

/// Find the first `_u` / `_l` marker that ends at a word boundary.
fn role_marker(name: &str) -> Option<char> {
    let mut rest = name;
    while let Some(pos) = rest.find('_') {
        let mut tail = rest[pos + 1..].chars();
        if let Some(letter @ ('u' | 'l')) = tail.next() {
            let at_boundary = tail
                .next()
                .is_none_or(|c| !(c.is_alphanumeric() || c == '_'));
            if at_boundary {
                return Some(letter);
            }
        }
        rest = &rest[pos + 1..];
    }
    None
}

/// A scan file name with its parsed id and role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNameRecord {
    /// File name as found on disk
    pub filename: String,
    /// Leading numeric id, if any
    pub id: Option<PatientId>,
    /// Detected jaw role
    pub role: Role,
}

impl FileNameRecord {
    pub fn parse(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let id = extract_id(&filename);
        let role = detect_role(&filename);
        Self { filename, id, role }
    }
}
