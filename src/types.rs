//! Shared types passed between the parser, the renderer and the delivery layer.
//!
//! A newsletter is a flat list of [`Resource`] records. Each record's shape is
//! fixed by its category: an introduction only carries a description, events
//! carry scheduling details, and everything else uses the standard
//! image/title/description/link card ([`Item`]).

use serde::{Serialize, Serializer};

/// Newsletter category of a record, in section order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Introduction,
    FeaturedResource,
    Resource,
    Video,
    Event,
    /// Non-empty type marker that matched none of the known categories.
    Other(String),
}

/// Rank given to records whose type marker is not a known category.
pub const UNRANKED: u32 = 999;

impl ResourceKind {
    /// Match a type marker against the known categories.
    ///
    /// The marker is trimmed and lowercased first. Both the English
    /// identifiers (`featured-resource`) and the French labels used by the
    /// editorial spreadsheets (`ressource en vedette`) are accepted. Returns
    /// `None` for blank markers; any other unknown marker becomes
    /// [`ResourceKind::Other`] carrying the normalized label.
    pub fn from_marker(marker: &str) -> Option<Self> {
        let normalized = marker.trim().to_lowercase();
        let kind = match normalized.as_str() {
            "" => return None,
            "introduction" => Self::Introduction,
            "featured-resource" | "featured" | "ressource en vedette" => Self::FeaturedResource,
            "resource" | "resources" | "ressource" | "ressources" => Self::Resource,
            "video" | "videos" | "vidéo" | "vidéothèque" | "videotheque" => Self::Video,
            "event" | "events" | "événement" | "événements" | "evenements" => Self::Event,
            _ => Self::Other(normalized),
        };
        Some(kind)
    }

    /// Section rank: introduction first, events last, unknown types after everything.
    pub fn rank(&self) -> u32 {
        match self {
            Self::Introduction => 0,
            Self::FeaturedResource => 1,
            Self::Resource => 2,
            Self::Video => 3,
            Self::Event => 4,
            Self::Other(_) => UNRANKED,
        }
    }

    /// Canonical `type` identifier (the normalized label for unknown types).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Introduction => "introduction",
            Self::FeaturedResource => "featured-resource",
            Self::Resource => "resource",
            Self::Video => "video",
            Self::Event => "event",
            Self::Other(label) => label,
        }
    }
}

/// Standard card shape shared by featured resources, resources, videos and
/// records of unknown type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Item {
    pub image: String,
    pub title: String,
    pub description: String,
    pub link: String,
}

/// An event listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub title: String,
    pub link: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub price: String,
    pub language: String,
}

/// One item destined for the newsletter.
///
/// Serializes as a flat object whose `type` field is the canonical
/// identifier from [`ResourceKind::as_str`]. Records of unknown type carry
/// their own label there (`"type": "podcast"`), next to the card fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Introduction {
        description: String,
    },
    FeaturedResource(Item),
    Resource(Item),
    Video(Item),
    Event(Event),
    /// Unknown type marker, kept with the standard card shape.
    Other { label: String, item: Item },
}

#[derive(Serialize)]
struct Tagged<'a, T: Serialize> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(flatten)]
    body: &'a T,
}

#[derive(Serialize)]
struct IntroductionBody<'a> {
    description: &'a str,
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.kind();
        let kind = kind.as_str();
        match self {
            Self::Introduction { description } => Tagged {
                kind,
                body: &IntroductionBody { description },
            }
            .serialize(serializer),
            Self::FeaturedResource(item)
            | Self::Resource(item)
            | Self::Video(item)
            | Self::Other { item, .. } => Tagged { kind, body: item }.serialize(serializer),
            Self::Event(event) => Tagged { kind, body: event }.serialize(serializer),
        }
    }
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Introduction { .. } => ResourceKind::Introduction,
            Self::FeaturedResource(_) => ResourceKind::FeaturedResource,
            Self::Resource(_) => ResourceKind::Resource,
            Self::Video(_) => ResourceKind::Video,
            Self::Event(_) => ResourceKind::Event,
            Self::Other { label, .. } => ResourceKind::Other(label.clone()),
        }
    }

    pub fn rank(&self) -> u32 {
        self.kind().rank()
    }

    /// Title shown in listings. Introductions have none.
    pub fn title(&self) -> &str {
        match self {
            Self::Introduction { .. } => "",
            Self::FeaturedResource(item)
            | Self::Resource(item)
            | Self::Video(item)
            | Self::Other { item, .. } => &item.title,
            Self::Event(event) => &event.title,
        }
    }
}

/// Per-category counts for a parsed newsletter.
///
/// `total` counts every record. Records of unknown type only show up in
/// `total`, so the named counters can sum to less than it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub introduction: usize,
    pub featured: usize,
    pub resources: usize,
    pub videos: usize,
    pub events: usize,
}
