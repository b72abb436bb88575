use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Base of the canonical back-link for a watch-list entry.
pub const SOURCE_ANIME_URL: &str = "https://myanimelist.net/anime";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MediaKind {
    Series,
    Movie,
}

impl MediaKind {
    /// Column of the local store holding this kind's target id.
    pub fn store_column(self) -> &'static str {
        match self {
            MediaKind::Series => "tvdb_id",
            MediaKind::Movie => "tmdb_id",
        }
    }

    /// Name of the target catalog, used in log and report lines.
    pub fn catalog(self) -> &'static str {
        match self {
            MediaKind::Series => "tvdb",
            MediaKind::Movie => "tmdb",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Series => write!(f, "series"),
            MediaKind::Movie => write!(f, "movie"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Display for Season {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        };
        write!(f, "{}", name)
    }
}

/// Label shared by both library managers for one run, e.g. `fall-2024`.
pub fn season_tag(season: Season, year: u16) -> String {
    format!("{}-{}", season, year)
}

pub fn source_link(external_id: i64) -> String {
    format!("{}/{}", SOURCE_ANIME_URL, external_id)
}

/// An entry of the source catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRef {
    pub id: i64,
    pub title: String,
}

impl ExternalRef {
    /// Title with its back-link, used as the key of a resolved entry so that
    /// equal titles stay apart.
    pub fn linked_title(&self) -> String {
        format!("{} ({})", self.title, source_link(self.id))
    }

    /// Report text for an entry that could not be resolved.
    pub fn unresolved_report(&self) -> String {
        format!("Title: {}\nLink: {}", self.title, source_link(self.id))
    }
}

/// An external entry together with its id in a target catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
    pub title: String,
    pub target_id: i64,
}

impl ResolvedRef {
    pub fn new(external: &ExternalRef, target_id: i64) -> Self {
        Self {
            title: external.linked_title(),
            target_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_tag_format() {
        assert_eq!(season_tag(Season::Fall, 2024), "fall-2024");
        assert_eq!(season_tag(Season::Winter, 2025), "winter-2025");
    }

    #[test]
    fn test_linked_title_and_report() {
        let external = ExternalRef {
            id: 500,
            title: "Show A".into(),
        };
        assert_eq!(
            external.linked_title(),
            "Show A (https://myanimelist.net/anime/500)"
        );
        assert_eq!(
            external.unresolved_report(),
            "Title: Show A\nLink: https://myanimelist.net/anime/500"
        );
    }
}
