//! Subcommand bodies. Each writes its report to `out`.

use std::io::Write;

use log::{info, warn};

use crate::{
    catalog,
    config::Config,
    error::Result,
    images::ImageStore,
    reconcile::{conflicting_targets, fuzzy_reconcile, reconcile},
    report::{MatchReport, ProposalReport, SearchReport},
    search,
    tags::{TagMap, apply_tags},
};

pub fn run_match(config: &Config, out: &mut impl Write) -> Result<()> {
    let cards = catalog::load(&config.catalog_path)?;
    let store = ImageStore::new(&config.images_dir, &config.image_extension);
    let images = ImageStore::named(store.list()?);
    let left = catalog::named(&cards);

    let result = reconcile(&left, &images);
    write!(
        out,
        "{}",
        MatchReport {
            title: "CARD-TO-IMAGE MATCHING REPORT",
            result: &result,
        }
    )?;

    Ok(())
}

/// Propose fuzzy renames and, when `apply` is set, perform them and report
/// the matches again.
///
/// All proposals are computed before any file is touched.
pub fn run_fuzzy(config: &Config, apply: bool, out: &mut impl Write) -> Result<()> {
    let cards = catalog::load(&config.catalog_path)?;
    let store = ImageStore::new(&config.images_dir, &config.image_extension);
    let images = ImageStore::named(store.list()?);
    let left = catalog::named(&cards);

    let result = reconcile(&left, &images);
    writeln!(out, "Total cards: {}", result.left_total)?;
    writeln!(out, "Total images: {}", result.right_total)?;
    writeln!(out)?;
    writeln!(
        out,
        "Exact normalized matches (before fuzzy): {}",
        result.matched_right_count()
    )?;
    writeln!(
        out,
        "Unmatched images (before fuzzy):         {}",
        result.unmatched_right.len()
    )?;
    writeln!(
        out,
        "Unmatched cards  (before fuzzy):         {}",
        result.unmatched_left.len()
    )?;
    writeln!(out)?;

    let proposals = fuzzy_reconcile(&result.unmatched_right, &result.unmatched_left, config.fuzzy);
    let conflicts = conflicting_targets(&proposals);
    for (target, indices) in &conflicts {
        warn!(
            "{} proposals target '{target}'; only the first can be applied",
            indices.len()
        );
    }
    info!("{} fuzzy rename proposals", proposals.len());

    write!(
        out,
        "{}",
        ProposalReport {
            threshold: config.fuzzy.threshold,
            proposals: &proposals,
            conflicts: &conflicts,
        }
    )?;

    if !apply || proposals.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    let applied = store.apply_all(&proposals);
    write!(out, "{applied}")?;

    let images_after = ImageStore::named(store.list()?);
    let result_after = reconcile(&left, &images_after);
    writeln!(out)?;
    write!(
        out,
        "{}",
        MatchReport {
            title: "POST-RENAME ANALYSIS",
            result: &result_after,
        }
    )?;

    Ok(())
}

pub fn run_tag(config: &Config, dry_run: bool, out: &mut impl Write) -> Result<()> {
    let mut cards = catalog::load(&config.catalog_path)?;
    let map = TagMap::load(&config.tag_map_path)?;

    let report = apply_tags(&mut cards, &map);
    if dry_run {
        info!("Dry run: catalog left unchanged");
    } else {
        catalog::save(&config.catalog_path, &cards)?;
    }

    write!(out, "{report}")?;
    Ok(())
}

pub fn run_search(config: &Config, query: &str, limit: usize, out: &mut impl Write) -> Result<()> {
    let cards = catalog::load(&config.catalog_path)?;
    let results = search::search(&cards, query, limit);
    write!(
        out,
        "{}",
        SearchReport {
            query,
            results: &results,
        }
    )?;
    Ok(())
}
