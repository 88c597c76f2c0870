//! The example workbook.
//!
//! Seven rows covering every resource type, with the French headers and
//! type labels editors actually use. `curation-letter sample` writes it out
//! as a starting point; the test suite parses it as the reference input.

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::Path;

pub const HEADERS: [&str; 10] = [
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

pub const ROWS: [[&str; 10]; 7] = [
    [
        "introduction",
        "",
        "",
        "Bienvenue dans cette édition de notre newsletter ! Ce mois-ci, nous explorons les tendances du design et du développement web. Découvrez nos sélections de ressources, événements et vidéos incontournables.",
        "",
        "",
        "",
        "",
        "",
        "",
    ],
    [
        "ressource en vedette",
        "https://example.com/image-vedette.jpg",
        "IA et Design : Les nouvelles tendances 2025",
        "Un article complet qui explore comment l'intelligence artificielle transforme les pratiques du design moderne. Découvrez les outils, les méthodologies et les cas d'usage concrets.",
        "https://example.com/article-ia-design",
        "",
        "",
        "",
        "",
        "",
    ],
    [
        "ressources",
        "https://example.com/image1.jpg",
        "Guide complet du design system",
        "Apprenez à créer un design system robuste et scalable pour vos projets. Ce guide couvre tous les aspects essentiels.",
        "https://example.com/guide-design-system",
        "",
        "",
        "",
        "",
        "",
    ],
    [
        "ressources",
        "https://example.com/image2.jpg",
        "Les meilleures pratiques UX en 2025",
        "Découvrez les dernières pratiques en expérience utilisateur pour créer des interfaces intuitives et performantes.",
        "https://example.com/ux-best-practices",
        "",
        "",
        "",
        "",
        "",
    ],
    [
        "vidéothèque",
        "https://example.com/video-thumbnail.jpg",
        "Conférence : L'avenir du web design",
        "Une vidéo fascinante sur les évolutions du web design avec des exemples concrets et des démonstrations.",
        "https://youtube.com/watch?v=example",
        "",
        "",
        "",
        "",
        "",
    ],
    [
        "événements",
        "",
        "Workshop Design Thinking",
        "",
        "https://example.com/workshop-design-thinking",
        "15 février 2025",
        "14h00 - 17h00",
        "En ligne",
        "Gratuit",
        "Français",
    ],
    [
        "événements",
        "",
        "Meetup UX Paris",
        "",
        "https://example.com/meetup-ux-paris",
        "22 février 2025",
        "19h00 - 21h00",
        "Paris, France",
        "25€",
        "Français",
    ],
];

fn build() -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Newsletter")?;

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    for (row, values) in ROWS.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            // Blank cells stay empty so they read back as missing.
            if !value.is_empty() {
                sheet.write_string(row as u32 + 1, col as u16, *value)?;
            }
        }
    }
    sheet.set_column_width(3, 60)?;
    Ok(workbook)
}

/// The example workbook as `.xlsx` bytes.
pub fn workbook_bytes() -> Result<Vec<u8>, XlsxError> {
    build()?.save_to_buffer()
}

/// Write the example workbook to `path`.
pub fn write(path: &Path) -> Result<(), XlsxError> {
    build()?.save(path)
}
