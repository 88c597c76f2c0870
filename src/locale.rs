//! Newsletter wording.
//!
//! The editorial team writes in French, so `fr` is the default; `en` exists
//! for English editions. Every piece of fixed text in the rendered HTML goes
//! through [`Labels`] so a locale switch never leaves a mixed-language email.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

const MONTHS_FR: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Fixed text used by the newsletter template.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub lang: &'static str,
    pub featured: &'static str,
    pub resources: &'static str,
    pub videos: &'static str,
    pub events: &'static str,
    pub other: &'static str,
    pub read_more: &'static str,
    pub watch: &'static str,
    pub register: &'static str,
    pub date: &'static str,
    pub time: &'static str,
    pub location: &'static str,
    pub price: &'static str,
    pub language: &'static str,
    pub generated_on: &'static str,
}

const LABELS_FR: Labels = Labels {
    lang: "fr",
    featured: "Ressource en vedette",
    resources: "Ressources",
    videos: "Vidéothèque",
    events: "Événements",
    other: "À découvrir aussi",
    read_more: "Lire la suite",
    watch: "Voir la vidéo",
    register: "S'inscrire",
    date: "Date",
    time: "Horaire",
    location: "Lieu",
    price: "Prix",
    language: "Langue",
    generated_on: "Newsletter générée le",
};

const LABELS_EN: Labels = Labels {
    lang: "en",
    featured: "Featured resource",
    resources: "Resources",
    videos: "Videos",
    events: "Events",
    other: "More to explore",
    read_more: "Read more",
    watch: "Watch the video",
    register: "Register",
    date: "Date",
    time: "Time",
    location: "Location",
    price: "Price",
    language: "Language",
    generated_on: "Newsletter generated on",
};

impl Locale {
    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::Fr => &LABELS_FR,
            Locale::En => &LABELS_EN,
        }
    }

    pub fn month_name(self, month: u32) -> &'static str {
        let names = match self {
            Locale::Fr => &MONTHS_FR,
            Locale::En => &MONTHS_EN,
        };
        names[(month.clamp(1, 12) - 1) as usize]
    }

    /// Default display date: `"Octobre 2026"`.
    pub fn month_year(self, at: NaiveDateTime) -> String {
        format!("{} {}", self.month_name(at.month()), at.year())
    }

    /// Generation stamp shown in the footer: `"19/10/2026 à 14:05"`.
    pub fn timestamp(self, at: NaiveDateTime) -> String {
        let joiner = match self {
            Locale::Fr => "à",
            Locale::En => "at",
        };
        format!(
            "{} {} {}",
            at.format("%d/%m/%Y"),
            joiner,
            at.format("%H:%M")
        )
    }
}
