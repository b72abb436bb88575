use crate::config::AutobrrConfig;
use anyhow::{bail, Result};
use regex::Regex;
use reqwest::blocking::Client;
use serde_json::json;
use std::sync::OnceLock;
use tracing::info;

fn glob_chars() -> &'static Regex {
    static GLOB_CHARS: OnceLock<Regex> = OnceLock::new();
    GLOB_CHARS.get_or_init(|| Regex::new(r"[,*?\[\]]").expect("valid regex"))
}

/// Builds the filter's `shows` value, one `*title*` pattern per title.
///
/// Commas separate patterns, so they and other glob characters inside a
/// title are replaced with the single-character wildcard.
pub fn shows_pattern<'a>(titles: impl IntoIterator<Item = &'a str>) -> String {
    titles
        .into_iter()
        .map(|t| format!("*{}*", glob_chars().replace_all(t.trim(), "?")))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn update_filter_shows(cfg: &AutobrrConfig, shows: &str) -> Result<()> {
    let client = Client::new();
    let resp = client
        .patch(format!(
            "{}/api/filters/{}",
            cfg.url.trim_end_matches('/'),
            cfg.filter_id
        ))
        .header("X-API-Token", &cfg.api_key)
        .json(&json!({ "shows": shows }))
        .send()?;

    if !resp.status().is_success() {
        let status = resp.status();
        bail!("autobrr returned {}:\n{}", status, resp.text()?);
    }

    info!(filter_id = cfg.filter_id, "updated autobrr filter");
    Ok(())
}
