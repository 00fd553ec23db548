use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    config::{self, Config},
    error::Result,
    reconcile::SimilarityMetric,
};

#[derive(Parser, Debug)]
#[command(name = "cardmatch")]
#[command(about = "Match card images to catalog names and curate the catalog", long_about = None)]
pub struct Cli {
    /// Card catalog JSON file
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Directory holding the card images
    #[arg(long, global = true, value_name = "DIR")]
    pub images: Option<PathBuf>,

    /// Image file extension to consider
    #[arg(long, global = true, value_name = "EXT")]
    pub extension: Option<String>,

    /// Tag map JSON file
    #[arg(long, global = true, value_name = "PATH")]
    pub tag_map: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report exact (normalized) matches between cards and images
    Match,

    /// Propose renames for near-miss image names
    Fuzzy {
        /// Rename the image files, then re-run the match analysis
        #[arg(long)]
        apply: bool,
        /// Minimum similarity score in [0, 1]
        #[arg(long)]
        threshold: Option<f64>,
        /// Similarity metric
        #[arg(long, value_parser = config::parse_metric)]
        metric: Option<SimilarityMetric>,
    },

    /// Apply the tag map to the catalog
    Tag {
        /// Report without writing the catalog
        #[arg(long)]
        dry_run: bool,
    },

    /// Look up cards by approximate name
    Search {
        query: String,
        /// Maximum number of results
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

impl Cli {
    /// Layer command-line flags over `config`.
    pub fn apply_to(&self, config: &mut Config) -> Result<()> {
        if let Some(path) = &self.catalog {
            config.catalog_path.clone_from(path);
        }
        if let Some(dir) = &self.images {
            config.images_dir.clone_from(dir);
        }
        if let Some(extension) = &self.extension {
            config.image_extension = config::normalize_extension(extension)?;
        }
        if let Some(path) = &self.tag_map {
            config.tag_map_path.clone_from(path);
        }
        if let Command::Fuzzy {
            threshold, metric, ..
        } = &self.command
        {
            if let Some(threshold) = threshold {
                config.fuzzy.threshold = *threshold;
            }
            if let Some(metric) = metric {
                config.fuzzy.metric = *metric;
            }
        }
        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CardmatchError;

    #[test]
    fn parses_fuzzy_flags() {
        let cli = Cli::try_parse_from([
            "cardmatch",
            "fuzzy",
            "--apply",
            "--threshold",
            "0.9",
            "--metric",
            "normalized-levenshtein",
            "--images",
            "/tmp/images",
        ])
        .expect("valid arguments");

        let mut config = Config::default();
        cli.apply_to(&mut config).expect("valid overrides");

        assert!(matches!(cli.command, Command::Fuzzy { apply: true, .. }));
        assert!((config.fuzzy.threshold - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.fuzzy.metric, SimilarityMetric::NormalizedLevenshtein);
        assert_eq!(config.images_dir, PathBuf::from("/tmp/images"));
    }

    #[test]
    fn rejects_unknown_metric() {
        assert!(Cli::try_parse_from(["cardmatch", "fuzzy", "--metric", "soundex"]).is_err());
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        let cli = Cli::try_parse_from(["cardmatch", "fuzzy", "--threshold", "2"])
            .expect("parses as a number");
        let err = cli
            .apply_to(&mut Config::default())
            .expect_err("threshold above 1");
        assert!(matches!(err, CardmatchError::Config(_)));
    }

    #[test]
    fn search_defaults_limit() {
        let cli = Cli::try_parse_from(["cardmatch", "search", "mason"]).expect("valid arguments");
        assert!(matches!(
            cli.command,
            Command::Search { ref query, limit: 10 } if query == "mason"
        ));
    }
}
