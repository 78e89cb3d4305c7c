//! Helpers for turning API-supplied names into safe local file names.
//!
//! Attachment names come from whoever sent the message, so they can carry
//! directory separators, `..` segments or characters that are not valid on
//! every filesystem.

/// Characters rejected by Windows filesystems in addition to separators.
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Device names Windows refuses as a file stem, with or without an extension.
const RESERVED_STEMS: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

fn is_reserved_device_name(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or_default().trim_end();
    RESERVED_STEMS
        .iter()
        .any(|reserved| stem.eq_ignore_ascii_case(reserved))
}

/// Reduces an attachment name to a single, safe path component.
///
/// Only the final component of the name is kept; reserved and control
/// characters become `_`, trailing dots and spaces are dropped, and Windows
/// device names get a `_` prefix. Returns `None` when nothing usable remains.
///
/// - `report.xlsx` → `report.xlsx`
/// - `../../etc/passwd` → `passwd`
/// - `C:\Temp\a?.csv` → `a_.csv`
/// - `COM1.csv` → `_COM1.csv`
pub fn sanitize_filename(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_control() || RESERVED_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    let cleaned = cleaned.trim_end_matches(['.', ' ']);

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        return None;
    }

    if is_reserved_device_name(cleaned) {
        return Some(format!("_{}", cleaned));
    }

    Some(cleaned.to_string())
}
