//! # Curation Letter
//!
//! Turns a spreadsheet of curated articles, videos and events into a
//! self-contained HTML newsletter ready to paste into an emailing tool. A
//! small web front end lets editors upload the spreadsheet, preview the
//! result, download it zipped, and browse earlier editions.
//!
//! # Architecture: One-Way Pipeline
//!
//! ```text
//! 1. Read     .xls/.xlsx bytes  →  Table            (header row + string cells)
//! 2. Parse    Table             →  Vec<Resource>    (typed records, defaults filled)
//! 3. Render   Vec<Resource>     →  HTML             (section order, inline styles)
//! 4. Deliver  HTML              →  output/*.html    (zip, preview, history)
//! ```
//!
//! Each stage is a plain function of its input. Only the delivery stage
//! touches the filesystem, so parsing and rendering are tested entirely in
//! memory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`sheet`] | Workbook bytes → [`sheet::Table`], cell normalization |
//! | [`parse`] | Table → [`types::Resource`] records, column aliases and field defaults |
//! | [`types`] | `Resource` tagged union, category ranks, `Stats` |
//! | [`locale`] | French and English wording for the template |
//! | [`render`] | Section ordering and HTML rendering with Maud |
//! | [`naming`] | Timestamped artifact names, upload filename sanitizing |
//! | [`artifacts`] | Output directory listing, lookup, zip packaging |
//! | [`sample`] | The example workbook |
//! | [`config`] | `config.toml` + environment loading and validation |
//! | [`server`] | axum front end: upload, preview, download, history, basic auth |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Categories, Not Rows, Drive Layout
//!
//! Editors fill the spreadsheet in whatever order they collect links. The
//! renderer stable-sorts records by category rank, so the newsletter always
//! reads introduction → featured → resources → videos → events while items
//! inside a category keep the spreadsheet order.
//!
//! ## Forgiving Input
//!
//! A row never fails the parse. Missing columns and blank cells take their
//! declared defaults, rows with no type are skipped, and unknown types are
//! kept as [`types::Resource::Other`] at the end of the newsletter. The only
//! hard failure is a file that is not a readable workbook.
//!
//! ## The Output Directory Is the Database
//!
//! Generated newsletters are plain files named after their generation time.
//! History is a directory listing; nothing else records what was generated.

pub mod artifacts;
pub mod config;
pub mod locale;
pub mod naming;
pub mod output;
pub mod parse;
pub mod render;
pub mod sample;
pub mod server;
pub mod sheet;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
