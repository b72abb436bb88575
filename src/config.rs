use anyhow::Result;
use inquire::{required, Confirm, CustomType, Password, Text};
use serde::{Deserialize, Serialize};
use std::path::Path;

const APP_NAME: &str = "seasonarr";
const CONFIG_NAME: &str = "config";

const COMMUNITY_TVDB_MAP: &str = "https://github.com/varoOP/shinkro-mapping/raw/main/tvdb-mal.yaml";
const COMMUNITY_TMDB_MAP: &str = "https://github.com/varoOP/shinkro-mapping/raw/main/tmdb-mal.yaml";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    pub sonarr: Option<SonarrConfig>,
    pub radarr: Option<RadarrConfig>,
    pub autobrr: Option<AutobrrConfig>,
    #[serde(default)]
    pub community_mappings: MappingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SonarrConfig {
    pub url: String,
    pub api_key: String,
    pub root_folder_path: String,
    pub quality_profile_id: i64,
    #[serde(default = "default_true")]
    pub season_folder: bool,
    #[serde(default = "default_true")]
    pub monitored: bool,
    #[serde(default = "default_series_monitor")]
    pub monitor: String,
    #[serde(default = "default_series_type")]
    pub series_type: String,
    #[serde(default = "default_true")]
    pub search_for_missing_episodes: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarrConfig {
    pub url: String,
    pub api_key: String,
    pub root_folder_path: String,
    pub quality_profile_id: i64,
    #[serde(default = "default_true")]
    pub monitored: bool,
    #[serde(default = "default_movie_monitor")]
    pub monitor: String,
    #[serde(default = "default_minimum_availability")]
    pub minimum_availability: String,
    #[serde(default = "default_add_method")]
    pub add_method: String,
    #[serde(default = "default_true")]
    pub search_for_movie: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutobrrConfig {
    pub url: String,
    pub api_key: String,
    pub filter_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    #[serde(default = "default_tvdb_map")]
    pub tvdb_url: String,
    #[serde(default = "default_tmdb_map")]
    pub tmdb_url: String,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            tvdb_url: default_tvdb_map(),
            tmdb_url: default_tmdb_map(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_series_monitor() -> String {
    "all".into()
}

fn default_series_type() -> String {
    "anime".into()
}

fn default_movie_monitor() -> String {
    "movieOnly".into()
}

fn default_minimum_availability() -> String {
    "released".into()
}

fn default_add_method() -> String {
    "manual".into()
}

fn default_tvdb_map() -> String {
    COMMUNITY_TVDB_MAP.into()
}

fn default_tmdb_map() -> String {
    COMMUNITY_TMDB_MAP.into()
}

/// Reads the config without prompting. A missing file is created with defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let cfg = match path {
        Some(path) => confy::load_path(path)?,
        None => confy::load(APP_NAME, CONFIG_NAME)?,
    };
    Ok(cfg)
}

pub fn get_config(path: Option<&Path>) -> Result<Config> {
    let cfg = load_config(path)?;
    if cfg.sonarr.is_none() && cfg.radarr.is_none() {
        let new_cfg = generate_new_config(cfg)?;
        match path {
            Some(path) => confy::store_path(path, &new_cfg)?,
            None => confy::store(APP_NAME, CONFIG_NAME, &new_cfg)?,
        }
        return Ok(new_cfg);
    }

    Ok(cfg)
}

fn generate_new_config(mut cfg: Config) -> Result<Config> {
    if Confirm::new("Configure sonarr?").with_default(true).prompt()? {
        let (url, api_key, root_folder_path, quality_profile_id) = prompt_manager("sonarr")?;
        cfg.sonarr = Some(SonarrConfig {
            url,
            api_key,
            root_folder_path,
            quality_profile_id,
            season_folder: true,
            monitored: true,
            monitor: default_series_monitor(),
            series_type: default_series_type(),
            search_for_missing_episodes: true,
        });
    }

    if Confirm::new("Configure radarr?").with_default(true).prompt()? {
        let (url, api_key, root_folder_path, quality_profile_id) = prompt_manager("radarr")?;
        cfg.radarr = Some(RadarrConfig {
            url,
            api_key,
            root_folder_path,
            quality_profile_id,
            monitored: true,
            monitor: default_movie_monitor(),
            minimum_availability: default_minimum_availability(),
            add_method: default_add_method(),
            search_for_movie: true,
        });
    }

    Ok(cfg)
}

fn prompt_manager(name: &str) -> Result<(String, String, String, i64)> {
    let url = Text::new(&format!("Enter {} url:", name))
        .with_validator(required!())
        .prompt()?;
    let api_key = Password::new(&format!("Enter {} api key:", name))
        .without_confirmation()
        .prompt()?;
    let root_folder_path = Text::new("Enter root folder path:")
        .with_validator(required!())
        .prompt()?;
    let quality_profile_id = CustomType::<i64>::new("Enter quality profile id:")
        .with_default(1)
        .prompt()?;

    Ok((
        url.trim_end_matches('/').to_string(),
        api_key,
        root_folder_path,
        quality_profile_id,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_config_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[sonarr]
url = "http://localhost:8989"
api_key = "key"
root_folder_path = "/anime"
quality_profile_id = 4
"#,
        )
        .unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        let sonarr = cfg.sonarr.unwrap();
        assert_eq!(sonarr.quality_profile_id, 4);
        assert_eq!(sonarr.series_type, "anime");
        assert!(sonarr.season_folder);
        assert!(cfg.radarr.is_none());
        assert!(cfg.autobrr.is_none());
        assert_eq!(cfg.community_mappings.tvdb_url, COMMUNITY_TVDB_MAP);
    }

    #[test]
    fn test_load_config_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = load_config(Some(&path)).unwrap();
        assert!(cfg.sonarr.is_none());
        assert!(path.exists());
    }
}
