use super::LibraryItem;
use crate::config::SonarrConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSeriesOptions {
    pub monitor: String,
    pub search_for_missing_episodes: bool,
    pub search_for_cutoff_unmet_episodes: bool,
    pub ignore_episodes_with_files: bool,
    pub ignore_episodes_without_files: bool,
}

/// Sonarr series. Fields not listed are kept in `extra` so that an update
/// sends back the record exactly as it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub tvdb_id: i64,
    #[serde(default)]
    pub tags: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_profile_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_folder: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitored: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_options: Option<AddSeriesOptions>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LibraryItem for Series {
    type Defaults = SonarrConfig;

    const RESOURCE: &'static str = "series";
    const ID_FIELD: &'static str = "tvdbId";
    const ALREADY_ADDED: &'static str = "This series has already been added";

    fn for_add(title: &str, target_id: i64, tags: Vec<i64>, defaults: &SonarrConfig) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            tvdb_id: target_id,
            tags,
            quality_profile_id: Some(defaults.quality_profile_id),
            season_folder: Some(defaults.season_folder),
            monitored: Some(defaults.monitored),
            series_type: Some(defaults.series_type.clone()),
            root_folder_path: Some(defaults.root_folder_path.clone()),
            add_options: Some(AddSeriesOptions {
                monitor: defaults.monitor.clone(),
                search_for_missing_episodes: defaults.search_for_missing_episodes,
                search_for_cutoff_unmet_episodes: false,
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
        self.tvdb_id
    }

    fn tags(&self) -> &[i64] {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut Vec<i64> {
        &mut self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_payload_shape() {
        let defaults = SonarrConfig {
            url: "http://localhost:8989".into(),
            api_key: "key".into(),
            root_folder_path: "/anime".into(),
            quality_profile_id: 4,
            season_folder: true,
            monitored: true,
            monitor: "future".into(),
            series_type: "anime".into(),
            search_for_missing_episodes: true,
        };

        let series = Series::for_add("Show A", 9001, vec![3], &defaults);
        let payload = serde_json::to_value(&series).unwrap();

        assert_eq!(payload["tvdbId"], 9001);
        assert_eq!(payload["tags"], json!([3]));
        assert_eq!(payload["rootFolderPath"], "/anime");
        assert_eq!(payload["seriesType"], "anime");
        assert_eq!(payload["addOptions"]["monitor"], "future");
        assert!(payload.get("id").is_none());
    }

    #[test]
    fn test_fetched_record_keeps_unknown_fields() {
        let fetched = json!({
            "id": 12,
            "title": "Show A",
            "tvdbId": 9001,
            "tags": [1],
            "path": "/anime/Show A",
            "seasons": [{"seasonNumber": 1, "monitored": true}]
        });

        let series: Series = serde_json::from_value(fetched.clone()).unwrap();
        assert_eq!(series.id(), Some(12));
        assert_eq!(series.tags(), &[1]);

        let round_trip = serde_json::to_value(&series).unwrap();
        assert_eq!(round_trip, fetched);
    }
}
