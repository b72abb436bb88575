use super::LibraryItem;
use crate::config::RadarrConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieOptions {
    pub monitor: String,
    pub search_for_movie: bool,
    pub add_method: String,
    pub ignore_episodes_with_files: bool,
    pub ignore_episodes_without_files: bool,
}

/// Radarr movie; unknown fields ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub tmdb_id: i64,
    #[serde(default)]
    pub tags: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_profile_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitored: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_availability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_options: Option<AddMovieOptions>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LibraryItem for Movie {
    type Defaults = RadarrConfig;

    const RESOURCE: &'static str = "movie";
    const ID_FIELD: &'static str = "tmdbId";
    const ALREADY_ADDED: &'static str = "This movie has already been added";

    fn for_add(title: &str, target_id: i64, tags: Vec<i64>, defaults: &RadarrConfig) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            tmdb_id: target_id,
            tags,
            quality_profile_id: Some(defaults.quality_profile_id),
            monitored: Some(defaults.monitored),
            minimum_availability: Some(defaults.minimum_availability.clone()),
            root_folder_path: Some(defaults.root_folder_path.clone()),
            add_options: Some(AddMovieOptions {
                monitor: defaults.monitor.clone(),
                search_for_movie: defaults.search_for_movie,
                add_method: defaults.add_method.clone(),
                ignore_episodes_with_files: false,
                ignore_episodes_without_files: false,
            }),
            extra: Map::new(),
        }
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn target_id(&self) -> i64 {
        self.tmdb_id
    }

    fn tags(&self) -> &[i64] {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut Vec<i64> {
        &mut self.tags
    }
}
