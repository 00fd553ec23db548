use std::{
    env::{self, VarError},
    path::PathBuf,
};

use log::{debug, error, info};

use crate::{
    error::{CardmatchError, Result},
    reconcile::{FuzzyOptions, SimilarityMetric},
};

pub const DEFAULT_CATALOG: &str = "data/agricola-cards.json";
pub const DEFAULT_IMAGES_DIR: &str = "card-images";
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";
pub const DEFAULT_TAG_MAP: &str = "data/tag-map.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub images_dir: PathBuf,
    pub image_extension: String,
    pub tag_map_path: PathBuf,
    pub fuzzy: FuzzyOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG),
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            image_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            tag_map_path: PathBuf::from(DEFAULT_TAG_MAP),
            fuzzy: FuzzyOptions::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key))
    }

    /// Build a configuration from an arbitrary variable lookup, falling back
    /// to the defaults for every variable that is not present.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let var = |key: &str| -> Result<Option<String>> {
            match lookup(key) {
                Ok(value) => Ok(Some(value)),
                Err(VarError::NotPresent) => Ok(None),
                Err(e) => {
                    error!("Failed to load {key} from environment: {e}");
                    Err(e.into())
                }
            }
        };

        let mut config = Self::default();

        if let Some(path) = var("CARDMATCH_CATALOG")? {
            config.catalog_path = PathBuf::from(path);
        }
        if let Some(dir) = var("CARDMATCH_IMAGES_DIR")? {
            config.images_dir = PathBuf::from(dir);
        }
        if let Some(extension) = var("CARDMATCH_IMAGE_EXTENSION")? {
            config.image_extension = normalize_extension(&extension)?;
        }
        if let Some(path) = var("CARDMATCH_TAG_MAP")? {
            config.tag_map_path = PathBuf::from(path);
        }
        if let Some(threshold) = var("CARDMATCH_THRESHOLD")? {
            config.fuzzy.threshold = parse_threshold(&threshold)?;
        }
        if let Some(metric) = var("CARDMATCH_METRIC")? {
            config.fuzzy.metric = parse_metric(&metric)?;
        }

        config.validate()?;

        info!("Configuration loaded successfully");
        debug!("Catalog: {}", config.catalog_path.display());
        debug!(
            "Images: {} (*.{})",
            config.images_dir.display(),
            config.image_extension
        );
        debug!("Tag map: {}", config.tag_map_path.display());
        debug!(
            "Fuzzy threshold: {} ({})",
            config.fuzzy.threshold, config.fuzzy.metric
        );

        Ok(config)
    }

    /// Check invariants that CLI overrides may have broken.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.fuzzy.threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(CardmatchError::Config(format!(
                "threshold must be within [0, 1], got {threshold}"
            )));
        }
        if self.image_extension.is_empty() {
            return Err(CardmatchError::Config(
                "image extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Strip a leading dot so both `png` and `.png` are accepted.
pub fn normalize_extension(raw: &str) -> Result<String> {
    let extension = raw.trim().trim_start_matches('.');
    if extension.is_empty() {
        return Err(CardmatchError::Config(format!(
            "invalid image extension '{raw}'"
        )));
    }
    Ok(extension.to_string())
}

pub fn parse_threshold(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| CardmatchError::Config(format!("invalid threshold '{raw}': {e}")))
}

pub fn parse_metric(raw: &str) -> Result<SimilarityMetric> {
    raw.trim().parse::<SimilarityMetric>().map_err(|_| {
        CardmatchError::Config(format!(
            "unknown similarity metric '{raw}' (expected one of: {})",
            SimilarityMetric::names().join(", ")
        ))
    })
}
