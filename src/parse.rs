//! Resource parsing.
//!
//! Maps spreadsheet rows to [`Resource`] records. The parser is deliberately
//! lenient: a row without a type marker is skipped, an unknown marker still
//! yields a standard card, and any missing or blank cell falls back to the
//! field's default. The only failure is a spreadsheet that cannot be read at
//! all, reported as a single [`SheetError`].
//!
//! ## Columns
//!
//! Each field accepts the French header the editorial template uses and an
//! English alias. Matching ignores case and surrounding whitespace.
//!
//! | Field | Headers |
//! |-------|---------|
//! | type | `Type de ressource`, `Type` |
//! | image | `Image`, `Image (lien)` |
//! | title | `Titre de la ressource`, `Title` |
//! | description | `Description de la ressource`, `Description` |
//! | link | `Lien`, `Link` |
//! | date | `Date` |
//! | time | `Horaire`, `Time` |
//! | location | `Localité`, `Location` |
//! | price | `Prix`, `Price` |
//! | language | `Langue`, `Language` |

use crate::config::FieldDefaults;
use crate::sheet::{SheetError, Table};
use crate::types::{Event, Item, Resource, ResourceKind};
use std::path::Path;

const TYPE: &[&str] = &["type de ressource", "type"];
const IMAGE: &[&str] = &["image", "image (lien)"];
const TITLE: &[&str] = &["titre de la ressource", "title"];
const DESCRIPTION: &[&str] = &["description de la ressource", "description"];
const LINK: &[&str] = &["lien", "link"];
const DATE: &[&str] = &["date"];
const TIME: &[&str] = &["horaire", "time"];
const LOCATION: &[&str] = &["localité", "location"];
const PRICE: &[&str] = &["prix", "price"];
const LANGUAGE: &[&str] = &["langue", "language"];

/// Column positions resolved once per table.
struct Columns {
    kind: Option<usize>,
    image: Option<usize>,
    title: Option<usize>,
    description: Option<usize>,
    link: Option<usize>,
    date: Option<usize>,
    time: Option<usize>,
    location: Option<usize>,
    price: Option<usize>,
    language: Option<usize>,
}

impl Columns {
    fn resolve(table: &Table) -> Self {
        let find = |aliases: &[&str]| aliases.iter().find_map(|name| table.column(name));
        Self {
            kind: find(TYPE),
            image: find(IMAGE),
            title: find(TITLE),
            description: find(DESCRIPTION),
            link: find(LINK),
            date: find(DATE),
            time: find(TIME),
            location: find(LOCATION),
            price: find(PRICE),
            language: find(LANGUAGE),
        }
    }
}

/// One data row with its column map.
struct Row<'a> {
    cells: &'a [Option<String>],
    columns: &'a Columns,
}

impl Row<'_> {
    fn get(&self, column: Option<usize>) -> Option<&str> {
        column
            .and_then(|i| self.cells.get(i))
            .and_then(|cell| cell.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    fn value(&self, column: Option<usize>, default: &str) -> String {
        self.get(column).unwrap_or(default).to_string()
    }

    fn item(&self) -> Item {
        let c = self.columns;
        Item {
            image: self.value(c.image, ""),
            title: self.value(c.title, ""),
            description: self.value(c.description, ""),
            link: self.value(c.link, ""),
        }
    }

    fn event(&self, defaults: &FieldDefaults) -> Event {
        let c = self.columns;
        Event {
            title: self.value(c.title, ""),
            link: self.value(c.link, ""),
            date: self.value(c.date, ""),
            time: self.value(c.time, ""),
            location: self.value(c.location, ""),
            price: self.value(c.price, &defaults.price),
            language: self.value(c.language, &defaults.language),
        }
    }
}

/// Parse every data row of `table` into resources, in source order.
///
/// Rows whose type cell is missing or blank are skipped.
pub fn parse_table(table: &Table, defaults: &FieldDefaults) -> Vec<Resource> {
    let columns = Columns::resolve(table);
    if columns.kind.is_none() {
        tracing::warn!("no type column found; headers: {:?}", table.headers());
    }

    let mut resources = Vec::new();
    for (index, cells) in table.rows().iter().enumerate() {
        let row = Row {
            cells,
            columns: &columns,
        };
        // Header is spreadsheet row 1.
        let row_number = index + 2;

        let Some(kind) = row.get(columns.kind).and_then(ResourceKind::from_marker) else {
            tracing::debug!(row = row_number, "skipping row without resource type");
            continue;
        };

        let resource = match kind {
            ResourceKind::Introduction => Resource::Introduction {
                description: row.value(columns.description, ""),
            },
            ResourceKind::FeaturedResource => Resource::FeaturedResource(row.item()),
            ResourceKind::Resource => Resource::Resource(row.item()),
            ResourceKind::Video => Resource::Video(row.item()),
            ResourceKind::Event => Resource::Event(row.event(defaults)),
            ResourceKind::Other(label) => {
                tracing::debug!(row = row_number, %label, "unknown resource type, using standard card");
                Resource::Other {
                    label,
                    item: row.item(),
                }
            }
        };
        resources.push(resource);
    }

    tracing::debug!(
        rows = table.rows().len(),
        resources = resources.len(),
        "parsed spreadsheet"
    );
    resources
}

/// Parse an in-memory workbook.
pub fn parse_bytes(bytes: &[u8], defaults: &FieldDefaults) -> Result<Vec<Resource>, SheetError> {
    let table = Table::from_bytes(bytes)?;
    Ok(parse_table(&table, defaults))
}

/// Parse a workbook on disk.
pub fn parse_file(path: &Path, defaults: &FieldDefaults) -> Result<Vec<Resource>, SheetError> {
    let table = Table::from_path(path)?;
    Ok(parse_table(&table, defaults))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_workbook_bytes, table};

    const HEADERS: &[&str] = &[
        "Type de ressource",
        "Image",
        "Titre de la ressource",
        "Description de la ressource",
        "Lien",
        "Date",
        "Horaire",
        "Localité",
        "Prix",
        "Langue",
    ];

    fn parse(rows: &[&[&str]]) -> Vec<Resource> {
        parse_table(&table(HEADERS, rows), &FieldDefaults::default())
    }

    #[test]
    fn blank_type_rows_are_skipped() {
        let resources = parse(&[
            &["introduction", "", "", "Bienvenue"],
            &["", "", "Orphan"],
            &["   ", "", "Also orphan"],
            &["ressources", "", "Guide"],
        ]);
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[1].title(), "Guide");
    }

    #[test]
    fn introduction_only_has_description() {
        let resources = parse(&[&["introduction", "img.jpg", "Ignored", "Bienvenue"]]);
        assert_eq!(
            resources,
            vec![Resource::Introduction {
                description: "Bienvenue".into()
            }]
        );
    }

    #[test]
    fn standard_resource_fields() {
        let resources = parse(&[&[
            "ressources",
            "https://x/img.jpg",
            "Guide",
            "Un guide",
            "https://x/guide",
            "ignored date",
        ]]);
        assert_eq!(
            resources,
            vec![Resource::Resource(Item {
                image: "https://x/img.jpg".into(),
                title: "Guide".into(),
                description: "Un guide".into(),
                link: "https://x/guide".into(),
            })]
        );
    }

    #[test]
    fn event_defaults_price_and_language() {
        let resources = parse(&[&["événements", "", "Meetup", "", "https://x/meetup"]]);
        let Resource::Event(event) = &resources[0] else {
            panic!("expected event, got {:?}", resources[0]);
        };
        assert_eq!(event.title, "Meetup");
        assert_eq!(event.link, "https://x/meetup");
        assert_eq!(event.date, "");
        assert_eq!(event.time, "");
        assert_eq!(event.location, "");
        assert_eq!(event.price, "Free");
        assert_eq!(event.language, "Français");
    }

    #[test]
    fn event_uses_cells_when_present() {
        let resources = parse(&[&[
            "event",
            "",
            "Workshop",
            "",
            "https://x/w",
            "15 février 2025",
            "14h00 - 17h00",
            "En ligne",
            "25€",
            "English",
        ]]);
        let Resource::Event(event) = &resources[0] else {
            panic!("expected event");
        };
        assert_eq!(event.date, "15 février 2025");
        assert_eq!(event.time, "14h00 - 17h00");
        assert_eq!(event.location, "En ligne");
        assert_eq!(event.price, "25€");
        assert_eq!(event.language, "English");
    }

    #[test]
    fn configured_defaults_are_used() {
        let defaults = FieldDefaults {
            price: "Gratuit".into(),
            language: "English".into(),
        };
        let resources = parse_table(&table(HEADERS, &[&["event", "", "Talk"]]), &defaults);
        let Resource::Event(event) = &resources[0] else {
            panic!("expected event");
        };
        assert_eq!(event.price, "Gratuit");
        assert_eq!(event.language, "English");
    }

    #[test]
    fn missing_columns_default_to_empty() {
        let t = table(&["Type de ressource"], &[&["vidéothèque"]]);
        let resources = parse_table(&t, &FieldDefaults::default());
        assert_eq!(resources, vec![Resource::Video(Item::default())]);
    }

    #[test]
    fn header_matching_ignores_case_and_whitespace() {
        let variants = [
            "Titre de la ressource",
            " titre de la ressource ",
            "TITRE DE LA RESSOURCE",
        ];
        for header in variants {
            let t = table(&["Type de ressource", header], &[&["ressources", "Guide"]]);
            let resources = parse_table(&t, &FieldDefaults::default());
            assert_eq!(resources[0].title(), "Guide", "header {header:?}");
        }
    }

    #[test]
    fn english_headers_are_accepted() {
        let t = table(
            &["Type", "Title", "Link", "Price"],
            &[&["event", "Conf", "https://conf", "10€"]],
        );
        let resources = parse_table(&t, &FieldDefaults::default());
        let Resource::Event(event) = &resources[0] else {
            panic!("expected event");
        };
        assert_eq!(event.title, "Conf");
        assert_eq!(event.link, "https://conf");
        assert_eq!(event.price, "10€");
    }

    #[test]
    fn unknown_type_becomes_standard_card() {
        let resources = parse(&[&["Podcast", "", "Episode", "Desc", "https://p"]]);
        assert_eq!(
            resources,
            vec![Resource::Other {
                label: "podcast".into(),
                item: Item {
                    image: String::new(),
                    title: "Episode".into(),
                    description: "Desc".into(),
                    link: "https://p".into(),
                },
            }]
        );
    }

    #[test]
    fn output_keeps_source_order() {
        let resources = parse(&[
            &["événements", "", "E1"],
            &["introduction"],
            &["ressources", "", "R1"],
        ]);
        let kinds: Vec<ResourceKind> = resources.iter().map(Resource::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ResourceKind::Event,
                ResourceKind::Introduction,
                ResourceKind::Resource
            ]
        );
    }

    #[test]
    fn never_more_records_than_rows() {
        let rows: &[&[&str]] = &[&["introduction"], &[""], &["x"], &[], &["event"]];
        let t = table(HEADERS, rows);
        let resources = parse_table(&t, &FieldDefaults::default());
        assert!(resources.len() <= t.rows().len());
        assert_eq!(resources.len(), 3);
    }

    #[test]
    fn table_without_type_column_yields_nothing() {
        let t = table(&["Titre"], &[&["Guide"]]);
        assert!(parse_table(&t, &FieldDefaults::default()).is_empty());
    }

    #[test]
    fn sample_workbook_parses_to_seven_records() {
        let resources = parse_bytes(&sample_workbook_bytes(), &FieldDefaults::default()).unwrap();
        assert_eq!(resources.len(), 7);
        assert_eq!(resources[0].kind(), ResourceKind::Introduction);
        assert_eq!(resources[1].kind(), ResourceKind::FeaturedResource);
    }

    #[test]
    fn unreadable_bytes_fail_as_a_whole() {
        let result = parse_bytes(b"PK\x03\x04 broken", &FieldDefaults::default());
        assert!(result.is_err());
    }
}
