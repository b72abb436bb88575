use crate::error::WatchlistError;
use crate::media::{MediaKind, Season};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

const SEASONAL_URL: &str = "https://api.myanimelist.net/v2/anime/season";
const SEASONAL_FIELDS: &str = "alternative_titles{en},my_list_status{status},media_type";

#[derive(Deserialize)]
struct SeasonalResponse {
    data: Vec<SeasonalNode>,
    #[serde(default)]
    paging: Paging,
}

#[derive(Deserialize, Default)]
struct Paging {
    next: Option<String>,
}

#[derive(Deserialize)]
struct SeasonalNode {
    node: MalAnime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MalAnime {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub alternative_titles: Option<AlternativeTitles>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub my_list_status: Option<ListStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlternativeTitles {
    #[serde(default)]
    pub en: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListStatus {
    pub status: WatchStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    Watching,
    Completed,
    OnHold,
    Dropped,
    PlanToWatch,
    #[serde(other)]
    Unknown,
}

impl MalAnime {
    /// Only planned or running entries are synced.
    pub fn is_wanted(&self) -> bool {
        matches!(
            self.my_list_status.as_ref().map(|s| s.status),
            Some(WatchStatus::PlanToWatch) | Some(WatchStatus::Watching)
        )
    }

    pub fn kind(&self) -> MediaKind {
        match self.media_type.as_deref() {
            Some("movie") => MediaKind::Movie,
            _ => MediaKind::Series,
        }
    }

    /// English title when there is one, the default title otherwise.
    pub fn display_title(&self) -> &str {
        self.alternative_titles
            .as_ref()
            .and_then(|t| t.en.as_deref())
            .filter(|en| !en.is_empty())
            .unwrap_or(self.title.as_str())
    }
}

/// Fetches every entry of a season, following `paging.next`.
pub fn get_seasonal_anime(token: &str, season: Season, year: u16) -> Result<Vec<MalAnime>, WatchlistError> {
    let client = Client::new();
    let mut anime = Vec::new();
    let mut request = client
        .get(format!("{}/{}/{}", SEASONAL_URL, year, season))
        .query(&[
            ("fields", SEASONAL_FIELDS),
            ("nsfw", "true"),
            ("limit", "500"),
            ("sort", "anime_num_list_users"),
        ]);

    loop {
        let resp = request.bearer_auth(token).send()?;
        if !resp.status().is_success() {
            return Err(WatchlistError::Status {
                status: resp.status().as_u16(),
                body: resp.text()?,
            });
        }

        let page: SeasonalResponse = resp.json()?;
        debug!(entries = page.data.len(), "fetched seasonal page");
        anime.extend(page.data.into_iter().map(|n| n.node));

        match page.paging.next {
            Some(next) => request = client.get(next),
            None => break,
        }
    }

    info!(%season, year, entries = anime.len(), "fetched seasonal anime");
    Ok(anime)
}

/// Keeps wanted entries and groups their ids by media kind.
pub fn wanted_ids(anime: &[MalAnime]) -> BTreeMap<MediaKind, Vec<i64>> {
    let mut ids: BTreeMap<MediaKind, Vec<i64>> = BTreeMap::new();
    for a in anime.iter().filter(|a| a.is_wanted()) {
        ids.entry(a.kind()).or_default().push(a.id);
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "data": [
            {"node": {"id": 1, "title": "Sousou no Frieren", "alternative_titles": {"en": "Frieren: Beyond Journey's End"}, "media_type": "tv", "my_list_status": {"status": "watching"}}},
            {"node": {"id": 2, "title": "Eiga", "alternative_titles": {"en": ""}, "media_type": "movie", "my_list_status": {"status": "plan_to_watch"}}},
            {"node": {"id": 3, "title": "Dropped Show", "media_type": "tv", "my_list_status": {"status": "dropped"}}},
            {"node": {"id": 4, "title": "Not On List", "media_type": "ona"}},
            {"node": {"id": 5, "title": "Odd Status", "my_list_status": {"status": "rewatching"}}}
        ],
        "paging": {}
    }"#;

    fn anime() -> Vec<MalAnime> {
        let page: SeasonalResponse = serde_json::from_str(PAGE).unwrap();
        page.data.into_iter().map(|n| n.node).collect()
    }

    #[test]
    fn test_wanted_ids_filters_and_groups() {
        let ids = wanted_ids(&anime());
        assert_eq!(ids[&MediaKind::Series], vec![1]);
        assert_eq!(ids[&MediaKind::Movie], vec![2]);
    }

    #[test]
    fn test_display_title_prefers_english() {
        let anime = anime();
        assert_eq!(anime[0].display_title(), "Frieren: Beyond Journey's End");
        assert_eq!(anime[1].display_title(), "Eiga");
        assert_eq!(anime[2].display_title(), "Dropped Show");
    }
}
