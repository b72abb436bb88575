use crate::media::Season;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "seasonarr")]
#[command(about = "Add a season's planned and watching anime to sonarr and radarr, tagged by season")]
pub struct Cli {
    /// Season of the anime to sync
    #[arg(long, value_enum)]
    pub season: Season,

    /// Year of the season
    #[arg(long)]
    pub season_year: u16,

    /// Path to the tracker's mapping database
    #[arg(long)]
    pub store_db: PathBuf,

    /// Config file (defaults to the per-user config location)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Resolve and report only, without touching sonarr, radarr or autobrr
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
