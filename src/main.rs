mod arr;
mod autobrr;
mod cli;
mod config;
mod error;
mod logging;
mod mal;
mod mapping;
mod media;
mod reconcile;
mod resolve;
mod store;

use crate::arr::{ArrClient, LibraryItem, Movie, Series};
use crate::autobrr::{shows_pattern, update_filter_shows};
use crate::cli::Cli;
use crate::config::{get_config, Config};
use crate::logging::init_logging;
use crate::mal::{get_seasonal_anime, wanted_ids};
use crate::mapping::CommunityMappings;
use crate::media::{season_tag, MediaKind, ResolvedRef};
use crate::reconcile::Reconciler;
use crate::resolve::{KindResolution, Resolver};
use crate::store::IdentifierStore;
use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeMap;
use tracing::{error, info};

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose, args.quiet)?;

    let cfg = get_config(args.config.as_deref())?;
    let store = IdentifierStore::open(&args.store_db)
        .with_context(|| format!("failed to open {}", args.store_db.display()))?;

    let token = store.mal_access_token()?;
    let anime = get_seasonal_anime(&token, args.season, args.season_year)?;
    let mut ids = wanted_ids(&anime);
    if !args.dry_run {
        retain_configured_kinds(&mut ids, &cfg);
    }

    let mappings = CommunityMappings::new(cfg.community_mappings.clone());
    let resolutions = Resolver::new(&store, &mappings)
        .resolve(&ids)
        .context("id resolution failed")?;

    for (kind, resolution) in &resolutions {
        print_resolution(*kind, resolution);
    }

    if args.dry_run {
        for (kind, resolution) in &resolutions {
            for item in &resolution.resolved {
                println!("would add {} {} ({})", kind, item.title, item.target_id);
            }
        }
        return Ok(());
    }

    let tag = season_tag(args.season, args.season_year);
    let empty = KindResolution::default();

    if let Some(sonarr) = &cfg.sonarr {
        let items = &resolutions.get(&MediaKind::Series).unwrap_or(&empty).resolved;
        sync_library::<Series>("sonarr", &sonarr.url, &sonarr.api_key, sonarr.clone(), &tag, items)?;
    }

    if let Some(radarr) = &cfg.radarr {
        let items = &resolutions.get(&MediaKind::Movie).unwrap_or(&empty).resolved;
        sync_library::<Movie>("radarr", &radarr.url, &radarr.api_key, radarr.clone(), &tag, items)?;
    }

    if let Some(autobrr) = &cfg.autobrr {
        let shows = shows_pattern(
            anime
                .iter()
                .filter(|a| a.is_wanted())
                .map(|a| a.display_title()),
        );
        update_filter_shows(autobrr, &shows)?;
        println!("{}", shows);
    }

    Ok(())
}

/// Kinds without a configured manager are neither resolved nor synced.
fn retain_configured_kinds(ids: &mut BTreeMap<MediaKind, Vec<i64>>, cfg: &Config) {
    ids.retain(|kind, _| match kind {
        MediaKind::Series => cfg.sonarr.is_some(),
        MediaKind::Movie => cfg.radarr.is_some(),
    });
}

fn print_resolution(kind: MediaKind, resolution: &KindResolution) {
    if !resolution.unresolved.is_empty() {
        println!(
            "\n{} ids for the following anime were not found (Total: {}):\n{}\n",
            kind.catalog(),
            resolution.unresolved.len(),
            resolution.unresolved.join("\n\n")
        );
    }
    println!(
        "Total number of anime {} entries that can be added: {}",
        kind,
        resolution.resolved.len()
    );
}

fn sync_library<T: LibraryItem>(
    name: &str,
    url: &str,
    api_key: &str,
    defaults: T::Defaults,
    tag: &str,
    items: &[ResolvedRef],
) -> Result<()> {
    let client = ArrClient::<T>::new(url, api_key)?;
    let reconciler = Reconciler::new(client, defaults);
    let tag_id = reconciler
        .ensure_tag(tag)
        .with_context(|| format!("unable to set up tag {} in {}", tag, name))?;

    let mut failed = 0;
    for item in items {
        match reconciler.add_or_tag(&item.title, item.target_id, tag_id) {
            Ok(outcome) => info!(manager = name, title = %item.title, %outcome, "reconciled"),
            Err(err) => {
                failed += 1;
                error!(manager = name, title = %item.title, "unable to add: {}", err);
            }
        }
    }

    println!(
        "{}: {} of {} added or tagged, {} failed",
        name,
        items.len() - failed,
        items.len(),
        failed
    );
    Ok(())
}
