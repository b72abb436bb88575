use crate::config::MappingConfig;
use crate::error::MappingError;
use crate::media::MediaKind;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub external_id: i64,
    pub target_id: i64,
}

#[derive(Debug, Default)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
}

impl MappingTable {
    pub fn new(entries: Vec<MappingEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn lookup(&self, external_id: i64) -> Option<i64> {
        self.entries
            .iter()
            .find(|e| e.external_id == external_id)
            .map(|e| e.target_id)
            .filter(|id| *id > 0)
    }
}

pub trait MappingSource {
    fn load(&self, kind: MediaKind) -> Result<MappingTable, MappingError>;
}

#[derive(Deserialize)]
struct TvdbDocument {
    #[serde(rename = "AnimeMap", default)]
    anime: Vec<TvdbEntry>,
}

#[derive(Deserialize)]
struct TvdbEntry {
    malid: i64,
    #[serde(default)]
    tvdbid: i64,
}

#[derive(Deserialize)]
struct TmdbDocument {
    #[serde(rename = "animeMovies", default)]
    movies: Vec<TmdbEntry>,
}

#[derive(Deserialize)]
struct TmdbEntry {
    malid: i64,
    #[serde(default)]
    tmdbid: i64,
}

fn parse_table(kind: MediaKind, url: &str, body: &str) -> Result<MappingTable, MappingError> {
    let parse_err = |source| MappingError::Parse {
        url: url.to_string(),
        source,
    };

    let entries = match kind {
        MediaKind::Series => serde_yaml::from_str::<TvdbDocument>(body)
            .map_err(parse_err)?
            .anime
            .into_iter()
            .map(|a| MappingEntry {
                external_id: a.malid,
                target_id: a.tvdbid,
            })
            .collect(),
        MediaKind::Movie => serde_yaml::from_str::<TmdbDocument>(body)
            .map_err(parse_err)?
            .movies
            .into_iter()
            .map(|m| MappingEntry {
                external_id: m.malid,
                target_id: m.tmdbid,
            })
            .collect(),
    };

    Ok(MappingTable::new(entries))
}

/// Fetches the community-maintained yaml tables over http.
pub struct CommunityMappings {
    client: Client,
    config: MappingConfig,
}

impl CommunityMappings {
    pub fn new(config: MappingConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, kind: MediaKind) -> &str {
        match kind {
            MediaKind::Series => &self.config.tvdb_url,
            MediaKind::Movie => &self.config.tmdb_url,
        }
    }
}

impl MappingSource for CommunityMappings {
    fn load(&self, kind: MediaKind) -> Result<MappingTable, MappingError> {
        let url = self.url(kind);
        let fetch_err = |source| MappingError::Fetch {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().map_err(fetch_err)?;
        if !resp.status().is_success() {
            return Err(MappingError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let body = resp.text().map_err(fetch_err)?;
        let table = parse_table(kind, url, &body)?;
        info!(%kind, entries = table.len(), "loaded community mapping");
        Ok(table)
    }
}
