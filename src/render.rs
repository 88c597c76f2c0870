//! Newsletter rendering.
//!
//! Takes parsed [`Resource`] records and produces one self-contained HTML
//! document ready to paste into an emailing tool.
//!
//! ## Section Order
//!
//! Records are stable-sorted by category rank, so the spreadsheet's row
//! order only matters within a category:
//!
//! ```text
//! introduction → featured resource → resources → videos → events → anything else
//! ```
//!
//! ## Email Constraints
//!
//! Email clients strip `<style>` blocks and ignore most modern CSS, so the
//! template sticks to what survives everywhere:
//!
//! - **Table layout**: a 600px centered presentation table, no flexbox or grid
//! - **Inline styles only**: colors come from [`ColorConfig`] and are written on each element
//! - **No scripts, no external assets** besides the images the editors link to
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Every interpolated spreadsheet value is escaped.

use crate::config::{AppConfig, ColorConfig};
use crate::locale::{Labels, Locale};
use crate::types::{Event, Item, Resource, ResourceKind, Stats};
use chrono::{Local, NaiveDateTime};
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a rendered newsletter is stamped with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edition {
    /// Display date in the header, e.g. `"Janvier 2025"`.
    pub date: String,
    /// Generation stamp in the footer, e.g. `"09/01/2025 à 08:05"`.
    pub generated_at: String,
}

impl Edition {
    /// Stamp an edition at `now`. A missing or blank `date` falls back to
    /// the month and year of `now` in `locale`.
    pub fn new(date: Option<&str>, now: NaiveDateTime, locale: Locale) -> Self {
        let date = date
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| locale.month_year(now));
        Self {
            date,
            generated_at: locale.timestamp(now),
        }
    }

    /// Stamp an edition with the current local time.
    pub fn now(date: Option<&str>, locale: Locale) -> Self {
        Self::new(date, Local::now().naive_local(), locale)
    }
}

/// Newsletter template bound to a title, a locale and a palette.
#[derive(Debug, Clone)]
pub struct Renderer {
    title: String,
    locale: Locale,
    colors: ColorConfig,
}

impl Renderer {
    pub fn new(title: impl Into<String>, locale: Locale, colors: ColorConfig) -> Self {
        Self {
            title: title.into(),
            locale,
            colors,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.newsletter.title.clone(),
            config.newsletter.locale,
            config.colors.clone(),
        )
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Render `resources` in section order.
    ///
    /// Pure: the same records and edition always give the same bytes.
    pub fn render(&self, resources: &[Resource], edition: &Edition) -> String {
        let ordered = order_resources(resources);
        self.document(&ordered, edition).into_string()
    }

    /// Render with a fresh [`Edition`] and optionally write the result to
    /// `output_path`, creating parent directories as needed.
    pub fn generate(
        &self,
        resources: &[Resource],
        date: Option<&str>,
        output_path: Option<&Path>,
    ) -> Result<String, RenderError> {
        let edition = Edition::now(date, self.locale);
        let html = self.render(resources, &edition);
        if let Some(path) = output_path {
            save_html(&html, path)?;
            tracing::info!(path = %path.display(), resources = resources.len(), "newsletter generated");
        }
        Ok(html)
    }

    fn document(&self, ordered: &[&Resource], edition: &Edition) -> Markup {
        let labels = self.locale.labels();
        let c = &self.colors;
        let page_title = format!("{} - {}", self.title, edition.date);

        html! {
            (DOCTYPE)
            html lang=(labels.lang) {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (page_title) }
                }
                body style={ "margin:0;padding:0;background-color:" (c.background) ";" } {
                    table role="presentation" width="100%" cellpadding="0" cellspacing="0" border="0"
                        style={ "background-color:" (c.background) ";" } {
                        tr {
                            td align="center" style="padding:24px 12px;" {
                                table role="presentation" width="600" cellpadding="0" cellspacing="0" border="0"
                                    style={ "width:100%;max-width:600px;background-color:" (c.surface) ";border:1px solid " (c.border) ";font-family:Helvetica,Arial,sans-serif;color:" (c.text) ";" } {
                                    (self.header(edition))
                                    @for group in group_by_rank(ordered) {
                                        (self.section(group, labels))
                                    }
                                    (self.footer(edition, labels))
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn header(&self, edition: &Edition) -> Markup {
        let c = &self.colors;
        html! {
            tr {
                td style={ "padding:32px 32px 16px 32px;border-bottom:3px solid " (c.accent) ";" } {
                    h1 style={ "margin:0;font-size:28px;line-height:1.2;color:" (c.accent) ";" } { (self.title) }
                    p style={ "margin:8px 0 0 0;font-size:14px;color:" (c.text_muted) ";" } { (edition.date) }
                }
            }
        }
    }

    fn footer(&self, edition: &Edition, labels: &Labels) -> Markup {
        let c = &self.colors;
        html! {
            tr {
                td style={ "padding:16px 32px 24px 32px;border-top:1px solid " (c.border) ";font-size:12px;color:" (c.text_muted) ";text-align:center;" } {
                    (labels.generated_on) " " (edition.generated_at)
                }
            }
        }
    }

    /// One newsletter section: a heading (except for the introduction)
    /// followed by its records.
    fn section(&self, group: &[&Resource], labels: &Labels) -> Markup {
        let heading = group.first().and_then(|r| section_heading(&r.kind(), labels));
        html! {
            @if let Some(heading) = heading {
                (self.section_heading(heading))
            }
            @for resource in group {
                @match resource {
                    Resource::Introduction { description } => { (self.introduction(description)) }
                    Resource::FeaturedResource(item) => { (self.card(item, labels.read_more, true)) }
                    Resource::Resource(item) | Resource::Other { item, .. } => {
                        (self.card(item, labels.read_more, false))
                    }
                    Resource::Video(item) => { (self.card(item, labels.watch, false)) }
                    Resource::Event(event) => { (self.event(event, labels)) }
                }
            }
        }
    }

    fn section_heading(&self, heading: &str) -> Markup {
        let c = &self.colors;
        html! {
            tr {
                td style="padding:24px 32px 0 32px;" {
                    h2 style={ "margin:0;font-size:13px;letter-spacing:1px;text-transform:uppercase;color:" (c.accent) ";" } { (heading) }
                }
            }
        }
    }

    fn introduction(&self, description: &str) -> Markup {
        let c = &self.colors;
        html! {
            tr {
                td style={ "padding:24px 32px 0 32px;font-size:16px;line-height:1.6;color:" (c.text) ";" } {
                    @for paragraph in description.lines().map(str::trim).filter(|l| !l.is_empty()) {
                        p style="margin:0 0 12px 0;" { (paragraph) }
                    }
                }
            }
        }
    }

    /// Standard card. The featured variant gets a larger title and a filled button.
    fn card(&self, item: &Item, call_to_action: &str, featured: bool) -> Markup {
        let c = &self.colors;
        let title_size = if featured { "22px" } else { "18px" };
        html! {
            tr {
                td style="padding:16px 32px 8px 32px;" {
                    @if !item.image.is_empty() {
                        img src=(item.image) alt=(item.title) width="536"
                            style={ "display:block;width:100%;max-width:536px;height:auto;border:0;border-radius:4px;margin:0 0 12px 0;" };
                    }
                    @if !item.title.is_empty() {
                        h3 style={ "margin:0 0 8px 0;font-size:" (title_size) ";line-height:1.3;color:" (c.text) ";" } {
                            (self.maybe_link(&item.title, &item.link))
                        }
                    }
                    @if !item.description.is_empty() {
                        p style={ "margin:0 0 12px 0;font-size:15px;line-height:1.6;color:" (c.text) ";" } { (item.description) }
                    }
                    @if !item.link.is_empty() {
                        (self.button(&item.link, call_to_action, featured))
                    }
                }
            }
        }
    }

    fn event(&self, event: &Event, labels: &Labels) -> Markup {
        let c = &self.colors;
        let details = [
            (labels.date, &event.date),
            (labels.time, &event.time),
            (labels.location, &event.location),
            (labels.price, &event.price),
            (labels.language, &event.language),
        ];
        html! {
            tr {
                td style={ "padding:16px 32px 8px 32px;" } {
                    table role="presentation" width="100%" cellpadding="0" cellspacing="0" border="0"
                        style={ "border-left:3px solid " (c.accent) ";" } {
                        tr {
                            td style="padding:4px 0 4px 16px;" {
                                @if !event.title.is_empty() {
                                    h3 style={ "margin:0 0 8px 0;font-size:17px;line-height:1.3;color:" (c.text) ";" } {
                                        (self.maybe_link(&event.title, &event.link))
                                    }
                                }
                                table role="presentation" cellpadding="0" cellspacing="0" border="0"
                                    style={ "font-size:14px;line-height:1.5;color:" (c.text_muted) ";" } {
                                    @for (label, value) in details.iter().filter(|(_, v)| !v.is_empty()) {
                                        tr {
                                            td style="padding:0 12px 0 0;font-weight:bold;" { (label) }
                                            td { (value) }
                                        }
                                    }
                                }
                                @if !event.link.is_empty() {
                                    div style="margin-top:12px;" {
                                        (self.button(&event.link, labels.register, false))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn maybe_link(&self, text: &str, link: &str) -> Markup {
        let c = &self.colors;
        html! {
            @if link.is_empty() {
                (text)
            } @else {
                a href=(link) style={ "color:" (c.text) ";text-decoration:none;" } { (text) }
            }
        }
    }

    fn button(&self, link: &str, label: &str, filled: bool) -> Markup {
        let c = &self.colors;
        let style = if filled {
            format!(
                "display:inline-block;padding:10px 18px;background-color:{};color:{};border-radius:4px;font-size:14px;font-weight:bold;text-decoration:none;",
                c.accent, c.surface
            )
        } else {
            format!(
                "display:inline-block;font-size:14px;font-weight:bold;color:{};text-decoration:none;",
                c.accent
            )
        };
        html! {
            a href=(link) style=(style) { (label) " →" }
        }
    }
}

fn section_heading(kind: &ResourceKind, labels: &Labels) -> Option<&'static str> {
    match kind {
        ResourceKind::Introduction => None,
        ResourceKind::FeaturedResource => Some(labels.featured),
        ResourceKind::Resource => Some(labels.resources),
        ResourceKind::Video => Some(labels.videos),
        ResourceKind::Event => Some(labels.events),
        ResourceKind::Other(_) => Some(labels.other),
    }
}

/// Split an ordered slice into runs of equal rank.
fn group_by_rank<'a, 'r>(ordered: &'a [&'r Resource]) -> Vec<&'a [&'r Resource]> {
    ordered.chunk_by(|a, b| a.rank() == b.rank()).collect()
}

/// Order resources by category rank, keeping source order within a category.
pub fn order_resources(resources: &[Resource]) -> Vec<&Resource> {
    let mut ordered: Vec<&Resource> = resources.iter().collect();
    ordered.sort_by_key(|r| r.rank());
    ordered
}

/// Write rendered HTML to `path`, creating parent directories.
pub fn save_html(html: &str, path: &Path) -> Result<(), RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    Ok(())
}

/// Count records per category.
///
/// Unknown types only count toward `total`.
pub fn stats(resources: &[Resource]) -> Stats {
    let mut stats = Stats {
        total: resources.len(),
        ..Stats::default()
    };
    for resource in resources {
        match resource {
            Resource::Introduction { .. } => stats.introduction += 1,
            Resource::FeaturedResource(_) => stats.featured += 1,
            Resource::Resource(_) => stats.resources += 1,
            Resource::Video(_) => stats.videos += 1,
            Resource::Event(_) => stats.events += 1,
            Resource::Other { .. } => {}
        }
    }
    stats
}

// ============================================================================
// Tests
// ============================================================================
