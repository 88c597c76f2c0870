//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every record leads
//! with its positional index, category and title; links and descriptions
//! follow as indented context lines. The same inventory is printed by
//! `parse` and `generate`, so a spreadsheet reads the same way before and
//! after rendering.
//!
//! # Output Format
//!
//! ## Parse
//!
//! ```text
//! Resources
//! 001 introduction
//!     Bienvenue dans cette édition de notre newsletter ! Ce mois-ci, no...
//! 002 featured-resource IA et Design : Les nouvelles tendances 2025
//!     Link: https://example.com/article-ia-design
//! 006 event Workshop Design Thinking
//!     When: 15 février 2025, 14h00 - 17h00
//!     Where: En ligne
//! ```
//!
//! ## Generate
//!
//! ```text
//! Resources
//! ...
//!
//! 7 resources: 1 introduction, 1 featured, 2 resources, 1 videos, 2 events
//! Generated output/newsletter_20250109_080500.html
//! ```
//!
//! ## History
//!
//! ```text
//! 001 newsletter_20250109_080500.html  12.4 KB  09/01/2025 08:05
//! 002 newsletter_20250102_171200.html  11.9 KB  02/01/2025 17:12
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::artifacts::Artifact;
use crate::types::{Resource, Stats};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max).collect();
        format!("{}...", kept)
    }
}

/// Join the non-empty parts with `", "`.
fn join_present(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Human-readable file size.
fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

// ============================================================================
// Resources
// ============================================================================

/// Format parsed records as an inventory, in source order.
pub fn format_resources(resources: &[Resource]) -> Vec<String> {
    let mut lines = vec!["Resources".to_string()];
    if resources.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
        return lines;
    }

    let ctx = indent(1);
    for (i, resource) in resources.iter().enumerate() {
        let kind = resource.kind();
        let title = resource.title();
        if title.is_empty() {
            lines.push(format!("{} {}", format_index(i + 1), kind.as_str()));
        } else {
            lines.push(format!("{} {} {}", format_index(i + 1), kind.as_str(), title));
        }

        match resource {
            Resource::Introduction { description } => {
                let first = description.lines().next().unwrap_or_default().trim();
                if !first.is_empty() {
                    lines.push(format!("{}{}", ctx, truncate_desc(first, 60)));
                }
            }
            Resource::FeaturedResource(item)
            | Resource::Resource(item)
            | Resource::Video(item)
            | Resource::Other { item, .. } => {
                if !item.link.is_empty() {
                    lines.push(format!("{}Link: {}", ctx, item.link));
                }
                if !item.image.is_empty() {
                    lines.push(format!("{}Image: {}", ctx, item.image));
                }
            }
            Resource::Event(event) => {
                let when = join_present(&[&event.date, &event.time]);
                if !when.is_empty() {
                    lines.push(format!("{}When: {}", ctx, when));
                }
                if !event.location.is_empty() {
                    lines.push(format!("{}Where: {}", ctx, event.location));
                }
                lines.push(format!("{}Price: {} ({})", ctx, event.price, event.language));
                if !event.link.is_empty() {
                    lines.push(format!("{}Link: {}", ctx, event.link));
                }
            }
        }
    }
    lines
}

pub fn print_resources(resources: &[Resource]) {
    for line in format_resources(resources) {
        println!("{}", line);
    }
}

// ============================================================================
// Stats
// ============================================================================

/// One-line summary of category counts.
pub fn format_stats(stats: &Stats) -> String {
    format!(
        "{} resources: {} introduction, {} featured, {} resources, {} videos, {} events",
        stats.total,
        stats.introduction,
        stats.featured,
        stats.resources,
        stats.videos,
        stats.events
    )
}

// ============================================================================
// Generate
// ============================================================================

/// Format the outcome of `generate`: inventory, counts and the written path.
pub fn format_generate_output(resources: &[Resource], stats: &Stats, path: &Path) -> Vec<String> {
    let mut lines = format_resources(resources);
    lines.push(String::new());
    lines.push(format_stats(stats));
    lines.push(format!("Generated {}", path.display()));
    lines
}

pub fn print_generate_output(resources: &[Resource], stats: &Stats, path: &Path) {
    for line in format_generate_output(resources, stats, path) {
        println!("{}", line);
    }
}

// ============================================================================
// History
// ============================================================================

/// Format generated newsletters, in the order given (newest first).
pub fn format_history(artifacts: &[Artifact]) -> Vec<String> {
    if artifacts.is_empty() {
        return vec!["No newsletters generated yet".to_string()];
    }
    artifacts
        .iter()
        .enumerate()
        .map(|(i, a)| {
            format!(
                "{} {}  {}  {}",
                format_index(i + 1),
                a.filename,
                format_size(a.size),
                a.created.format("%d/%m/%Y %H:%M")
            )
        })
        .collect()
}

pub fn print_history(artifacts: &[Artifact]) {
    for line in format_history(artifacts) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
