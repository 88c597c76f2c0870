//! File naming for uploads and generated newsletters.
//!
//! Everything the app writes to disk is named after the moment it was
//! generated, down to the millisecond:
//!
//! - `output/newsletter_20250109_080500_123.html` (generated newsletter)
//! - `uploads/20250109_080500_123_curation_janvier.xlsx` (kept upload)
//! - `newsletter_20250109_080500_123.zip` (download name, never written)
//!
//! Names are claimed with an exclusive create; when two requests still land
//! on the same name the later one takes a [`numbered`] variant
//! (`newsletter_20250109_080500_123_2.html`).
//!
//! Names coming back from URLs are checked with [`is_artifact_name`] before
//! they are joined onto the output directory.

use chrono::NaiveDateTime;

/// Spreadsheet extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["xls", "xlsx"];

const ARTIFACT_PREFIX: &str = "newsletter_";
const ARTIFACT_EXTENSION: &str = ".html";

/// Timestamp used in every generated name: `20250109_080500_123`.
pub fn stamp(at: NaiveDateTime) -> String {
    at.format("%Y%m%d_%H%M%S_%3f").to_string()
}

/// The `n`th alternative for a taken name: `a.html` → `a_2.html`.
/// A name without extension gets the suffix at the end.
pub fn numbered(filename: &str, n: u32) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{n}.{ext}"),
        _ => format!("{filename}_{n}"),
    }
}

/// Whether `filename` has an allowed spreadsheet extension (case-insensitive).
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Reduce a client-supplied filename to a safe ASCII name.
///
/// - `"../../etc/passwd"` → `"etc_passwd"`
/// - `"Curation Janvier.xlsx"` → `"Curation_Janvier.xlsx"`
/// - `"Sélection été.xlsx"` → `"Slection_t.xlsx"`
///
/// Returns `"upload"` when nothing usable is left.
pub fn secure_filename(filename: &str) -> String {
    let joined = filename
        .split(|c: char| c.is_whitespace() || c == '/' || c == '\\')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == '_');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Name of the newsletter generated at `stamp`.
pub fn newsletter_filename(stamp: &str) -> String {
    format!("{ARTIFACT_PREFIX}{stamp}{ARTIFACT_EXTENSION}")
}

/// Name under which an upload is kept.
pub fn upload_filename(stamp: &str, original: &str) -> String {
    format!("{}_{}", stamp, secure_filename(original))
}

/// Download name for an artifact: `.html` becomes `.zip`.
pub fn zip_filename(artifact: &str) -> String {
    match artifact.strip_suffix(ARTIFACT_EXTENSION) {
        Some(stem) => format!("{stem}.zip"),
        None => format!("{artifact}.zip"),
    }
}

/// Whether `name` can safely designate a file in the output directory:
/// a bare `.html` file name with no path components or hidden prefix.
pub fn is_artifact_name(name: &str) -> bool {
    name.len() > ARTIFACT_EXTENSION.len()
        && name.ends_with(ARTIFACT_EXTENSION)
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        && !name.contains("..")
}
