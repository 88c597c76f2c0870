//! Generated newsletters on disk.
//!
//! The output directory is the only store: every `*.html` file directly
//! inside it is an [`Artifact`]. Listing reads filesystem metadata, so
//! newsletters copied in by hand show up too.

use crate::naming;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Newsletter not found: {0}")]
    NotFound(String),
}

/// Metadata of one generated newsletter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub filename: String,
    pub size: u64,
    pub created: DateTime<Local>,
}

/// List newsletters in `output_dir`, newest first.
///
/// A missing directory lists as empty. Ties on creation time are broken by
/// file name, descending, which matches the timestamped naming.
pub fn list(output_dir: &Path) -> Result<Vec<Artifact>, ArtifactError> {
    if !output_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut artifacts = Vec::new();
    for entry in WalkDir::new(output_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().into_owned();
        if !naming::is_artifact_name(&filename) {
            continue;
        }
        let metadata = entry.metadata()?;
        let created = metadata.created().or_else(|_| metadata.modified())?;
        artifacts.push(Artifact {
            filename,
            size: metadata.len(),
            created: DateTime::<Local>::from(created),
        });
    }

    artifacts.sort_by(|a, b| {
        b.created
            .cmp(&a.created)
            .then_with(|| b.filename.cmp(&a.filename))
    });
    Ok(artifacts)
}

/// Alternatives tried after the first name is taken.
const MAX_NUMBERED: u32 = 100;

/// Write `contents` under a name in `dir` that no other file holds.
///
/// The first candidate is `filename`; if it already exists the numbered
/// variants `stem_2.ext`, `stem_3.ext`, ... are tried. The file is created
/// exclusively, so concurrent writers never share a name. Returns the name
/// actually used. Creates `dir` when missing.
pub fn write_new(dir: &Path, filename: &str, contents: &[u8]) -> Result<String, ArtifactError> {
    fs::create_dir_all(dir)?;
    for n in 1..=MAX_NUMBERED {
        let candidate = if n == 1 {
            filename.to_string()
        } else {
            naming::numbered(filename, n)
        };
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dir.join(&candidate))
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        };
        file.write_all(contents)?;
        if n > 1 {
            tracing::debug!(requested = filename, used = %candidate, "name taken, numbered");
        }
        return Ok(candidate);
    }
    Err(ArtifactError::Io(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free name for {filename} in {}", dir.display()),
    )))
}

/// Resolve an artifact name to its path, rejecting anything that is not a
/// plain `.html` file name or does not exist.
pub fn locate(output_dir: &Path, filename: &str) -> Result<PathBuf, ArtifactError> {
    if !naming::is_artifact_name(filename) {
        return Err(ArtifactError::NotFound(filename.to_string()));
    }
    let path = output_dir.join(filename);
    if !path.is_file() {
        return Err(ArtifactError::NotFound(filename.to_string()));
    }
    Ok(path)
}

/// Read an artifact's HTML.
pub fn read(output_dir: &Path, filename: &str) -> Result<String, ArtifactError> {
    let path = locate(output_dir, filename)?;
    Ok(fs::read_to_string(path)?)
}

/// Package an artifact into an in-memory zip archive holding the single
/// HTML file under its own name.
pub fn zip(output_dir: &Path, filename: &str) -> Result<Vec<u8>, ArtifactError> {
    let path = locate(output_dir, filename)?;
    let html = fs::read(path)?;

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    archive.start_file(filename, options)?;
    archive.write_all(&html)?;
    let cursor = archive.finish()?;
    Ok(cursor.into_inner())
}
