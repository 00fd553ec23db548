pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod images;
pub mod reconcile;
pub mod report;
pub mod search;
pub mod tags;

use std::io;

use cli::{Cli, Command};
use config::Config;
use error::Result;

pub fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::from_env()?;
    cli.apply_to(&mut config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Match => commands::run_match(&config, &mut out),
        Command::Fuzzy { apply, .. } => commands::run_fuzzy(&config, *apply, &mut out),
        Command::Tag { dry_run } => commands::run_tag(&config, *dry_run, &mut out),
        Command::Search { query, limit } => commands::run_search(&config, query, *limit, &mut out),
    }
}
