//! Plain-text reports. Formatting only.

use std::fmt;

use crate::{
    catalog::Card,
    images::{ApplyReport, ImageFile, RenameOutcome},
    reconcile::{MatchResult, RenameProposal},
    tags::TagReport,
};

const RULE_WIDTH: usize = 60;

fn heavy_rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))
}

fn light_rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "-".repeat(RULE_WIDTH))
}

/// Card-to-image exact match summary.
pub struct MatchReport<'r, 'a, L> {
    pub title: &'r str,
    pub result: &'r MatchResult<'a, L, ImageFile>,
}

impl<L> fmt::Display for MatchReport<'_, '_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;

        heavy_rule(f)?;
        writeln!(f, "{}", self.title)?;
        heavy_rule(f)?;
        writeln!(f)?;
        writeln!(f, "Total cards:               {}", result.left_total)?;
        writeln!(f, "Total images:              {}", result.right_total)?;
        writeln!(f, "Unique normalized cards:   {}", result.left_distinct_keys)?;
        writeln!(f, "Unique normalized images:  {}", result.right_distinct_keys)?;
        writeln!(f)?;
        writeln!(f, "Normalized matches:        {}", result.matched_keys())?;
        writeln!(f, "  -> Cards matched:        {}", result.matched_left_count())?;
        writeln!(f, "  -> Images matched:       {}", result.matched_right_count())?;
        writeln!(f)?;

        light_rule(f)?;
        writeln!(
            f,
            "UNMATCHED CARDS ({} cards, no matching image):",
            result.unmatched_left.len()
        )?;
        light_rule(f)?;
        for (idx, item) in result.unmatched_left.iter().enumerate() {
            writeln!(
                f,
                "  {:>3}. {}  [normalized: {}]",
                idx + 1,
                item.display(),
                item.key()
            )?;
        }
        writeln!(f)?;

        light_rule(f)?;
        writeln!(
            f,
            "UNMATCHED IMAGES ({} images, no matching card):",
            result.unmatched_right.len()
        )?;
        light_rule(f)?;
        for (idx, item) in result.unmatched_right.iter().enumerate() {
            writeln!(
                f,
                "  {:>3}. {}  [normalized: {}]",
                idx + 1,
                item.payload.file_name,
                item.key()
            )?;
        }

        Ok(())
    }
}

/// Fuzzy rename proposals.
pub struct ProposalReport<'r, 'a, L> {
    pub threshold: f64,
    pub proposals: &'r [RenameProposal<'a, L, ImageFile>],
    pub conflicts: &'r [(String, Vec<usize>)],
}

impl<L> fmt::Display for ProposalReport<'_, '_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.proposals.is_empty() {
            return writeln!(
                f,
                "No fuzzy matches found with score >= {}.",
                self.threshold
            );
        }

        writeln!(f, "Found {} fuzzy rename(s):", self.proposals.len())?;
        writeln!(f)?;
        for proposal in self.proposals {
            let image = &proposal.source.payload;
            writeln!(
                f,
                "  \"{}\" -> \"{}\"  (card: \"{}\", score: {:.4})",
                image.file_name,
                image.renamed(&proposal.target_display),
                proposal.target.display(),
                proposal.score
            )?;
        }

        if !self.conflicts.is_empty() {
            writeln!(f)?;
            writeln!(f, "WARNING: several images would take the same name:")?;
            for (target, indices) in self.conflicts {
                let sources: Vec<&str> = indices
                    .iter()
                    .filter_map(|idx| self.proposals.get(*idx))
                    .map(|proposal| proposal.source.payload.file_name.as_str())
                    .collect();
                writeln!(f, "  - {target}: {}", sources.join(", "))?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Renaming files...")?;
        writeln!(f)?;
        for entry in &self.entries {
            match &entry.outcome {
                Ok(RenameOutcome::Renamed) => {
                    writeln!(f, "  RENAMED: \"{}\" -> \"{}\"", entry.from, entry.to)?;
                }
                Ok(RenameOutcome::AlreadyApplied) => {
                    writeln!(f, "  ALREADY DONE: \"{}\" -> \"{}\"", entry.from, entry.to)?;
                }
                Err(e) => {
                    writeln!(f, "  FAILED: \"{}\" -> \"{}\": {e}", entry.from, entry.to)?;
                }
            }
        }
        writeln!(f)?;
        writeln!(
            f,
            "Renamed: {}, already applied: {}, failed: {}",
            self.renamed(),
            self.already_applied(),
            self.failed()
        )
    }
}

impl fmt::Display for TagReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total cards: {}", self.total)?;
        writeln!(f, "Tagged cards: {}", self.tagged)?;
        writeln!(f, "Untagged cards: {}", self.untagged())?;

        if !self.not_found.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "WARNING: {} names in the tag map not found in the catalog:",
                self.not_found.len()
            )?;
            for name in &self.not_found {
                writeln!(f, "  - {name}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Tag distribution:")?;
        for (tag, count) in &self.distribution {
            writeln!(f, "  {tag}: {count}")?;
        }

        writeln!(f)?;
        if self.warnings.is_empty() {
            writeln!(f, "All tags valid!")
        } else {
            writeln!(f, "ERROR: unknown tags found:")?;
            for warning in &self.warnings {
                writeln!(f, "  - {warning}")?;
            }
            Ok(())
        }
    }
}

/// Numbered card names returned by a search.
pub struct SearchReport<'r> {
    pub query: &'r str,
    pub results: &'r [&'r Card],
}

impl fmt::Display for SearchReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.results.is_empty() {
            return writeln!(f, "No cards match \"{}\".", self.query);
        }
        for (idx, card) in self.results.iter().enumerate() {
            writeln!(f, "  {:>3}. {}", idx + 1, card.name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::CardmatchError,
        images::ApplyEntry,
        reconcile::{FuzzyOptions, NamedItem, fuzzy_reconcile, reconcile},
    };

    fn images(names: &[&str]) -> Vec<NamedItem<ImageFile>> {
        names
            .iter()
            .filter_map(|name| ImageFile::parse(name, "png"))
            .map(|file| NamedItem::new(file.stem.clone(), file))
            .collect()
    }

    #[test]
    fn match_report_lists_unmatched_with_keys() {
        let cards = vec![NamedItem::new("Café", ()), NamedItem::new("Baseboards", ())];
        let images = images(&["cafe.png", "totally_unrelated.png"]);
        let result = reconcile(&cards, &images);
        let text = MatchReport {
            title: "MATCHING REPORT",
            result: &result,
        }
        .to_string();

        assert!(text.contains("Normalized matches:        1"));
        assert!(text.contains("    1. Baseboards  [normalized: baseboards]"));
        assert!(text.contains("    1. totally_unrelated.png  [normalized: totally_unrelated]"));
    }

    #[test]
    fn proposal_report_shows_new_file_names() {
        let cards = vec![NamedItem::new("Stonecutter", ())];
        let images = images(&["stonecuter.png"]);
        let left: Vec<_> = cards.iter().collect();
        let right: Vec<_> = images.iter().collect();
        let proposals = fuzzy_reconcile(&right, &left, FuzzyOptions::default());
        let text = ProposalReport {
            threshold: 0.85,
            proposals: &proposals,
            conflicts: &[],
        }
        .to_string();

        assert!(text.contains(
            "\"stonecuter.png\" -> \"stonecutter.png\"  (card: \"Stonecutter\", score: 0.9524)"
        ));
    }

    #[test]
    fn empty_proposal_report() {
        let proposals: Vec<RenameProposal<'_, (), ImageFile>> = Vec::new();
        let text = ProposalReport {
            threshold: 0.85,
            proposals: &proposals,
            conflicts: &[],
        }
        .to_string();
        assert_eq!(text, "No fuzzy matches found with score >= 0.85.\n");
    }

    #[test]
    fn apply_report_lists_failures() {
        let report = ApplyReport {
            entries: vec![
                ApplyEntry {
                    from: "a.png".to_string(),
                    to: "b.png".to_string(),
                    outcome: Ok(RenameOutcome::Renamed),
                },
                ApplyEntry {
                    from: "c.png".to_string(),
                    to: "b.png".to_string(),
                    outcome: Err(CardmatchError::Collision {
                        path: "b.png".into(),
                    }),
                },
            ],
        };
        let text = report.to_string();
        assert!(text.contains("RENAMED: \"a.png\" -> \"b.png\""));
        assert!(text.contains("FAILED: \"c.png\" -> \"b.png\": Rename target already exists: b.png"));
        assert!(text.contains("Renamed: 1, already applied: 0, failed: 1"));
    }
}
