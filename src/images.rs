//! Image directory listing and rename application.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{
    error::{CardmatchError, Result},
    reconcile::{NamedItem, RenameProposal},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub stem: String,
    /// Extension as spelled on disk, without the dot.
    pub extension: String,
}

impl ImageFile {
    /// Split `file_name` if it ends with `.extension` (ASCII case-insensitive).
    pub fn parse(file_name: &str, extension: &str) -> Option<Self> {
        let split = file_name.len().checked_sub(extension.len() + 1)?;
        if split == 0 || !file_name.is_char_boundary(split) {
            return None;
        }
        let (stem, suffix) = file_name.split_at(split);
        let suffix = suffix.strip_prefix('.')?;
        if !suffix.eq_ignore_ascii_case(extension) {
            return None;
        }
        Some(Self {
            file_name: file_name.to_string(),
            stem: stem.to_string(),
            extension: suffix.to_string(),
        })
    }

    /// File name this image would have with a new stem.
    pub fn renamed(&self, stem: &str) -> String {
        format!("{stem}.{}", self.extension)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    /// The source is gone and the target exists: nothing left to do.
    AlreadyApplied,
}

#[derive(Debug)]
pub struct ApplyEntry {
    pub from: String,
    pub to: String,
    pub outcome: Result<RenameOutcome>,
}

/// Per-proposal results of a batch apply.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub entries: Vec<ApplyEntry>,
}

impl ApplyReport {
    fn count(&self, outcome: RenameOutcome) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(&entry.outcome, Ok(o) if *o == outcome))
            .count()
    }

    pub fn renamed(&self) -> usize {
        self.count(RenameOutcome::Renamed)
    }

    pub fn already_applied(&self) -> usize {
        self.count(RenameOutcome::AlreadyApplied)
    }

    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|entry| entry.outcome.is_err()).count()
    }
}

/// A directory of card images with one file extension.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    extension: String,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// List matching image files, sorted by file name.
    ///
    /// # Errors
    ///
    /// Returns a malformed-input error if the directory cannot be read.
    pub fn list(&self) -> Result<Vec<ImageFile>> {
        let entries =
            fs::read_dir(&self.dir).map_err(|e| CardmatchError::malformed(&self.dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CardmatchError::malformed(&self.dir, e))?;
            if !entry.path().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                warn!("Skipping non UTF-8 file name {:?}", entry.file_name());
                continue;
            };
            if let Some(image) = ImageFile::parse(&file_name, &self.extension) {
                files.push(image);
            }
        }

        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        info!(
            "Found {} .{} images in {}",
            files.len(),
            self.extension,
            self.dir.display()
        );

        Ok(files)
    }

    /// Images as named items, matched on their stem.
    pub fn named(files: Vec<ImageFile>) -> Vec<NamedItem<ImageFile>> {
        files
            .into_iter()
            .map(|file| NamedItem::new(file.stem.clone(), file))
            .collect()
    }

    /// Rename `image` so its stem becomes `target_stem`.
    ///
    /// Applying the same rename twice is harmless: once the source is gone
    /// and the target exists the result is [`RenameOutcome::AlreadyApplied`].
    ///
    /// # Errors
    ///
    /// `NotFound` if neither the source nor the target exists, `Collision`
    /// if both exist as distinct files.
    pub fn apply(&self, image: &ImageFile, target_stem: &str) -> Result<RenameOutcome> {
        if target_stem.contains(['/', '\\']) {
            return Err(CardmatchError::Validation(format!(
                "'{target_stem}' is not a valid file name"
            )));
        }

        let from = self.dir.join(&image.file_name);
        let to = self.dir.join(image.renamed(target_stem));

        if from == to {
            return Ok(RenameOutcome::AlreadyApplied);
        }

        let source_exists = from.symlink_metadata().is_ok();
        let target_exists = to.symlink_metadata().is_ok();

        match (source_exists, target_exists) {
            (false, true) => Ok(RenameOutcome::AlreadyApplied),
            (false, false) => Err(CardmatchError::NotFound { path: from }),
            (true, true) if !same_file(&from, &to) => Err(CardmatchError::Collision { path: to }),
            (true, _) => {
                fs::rename(&from, &to)?;
                debug!("Renamed {} -> {}", from.display(), to.display());
                Ok(RenameOutcome::Renamed)
            }
        }
    }

    /// Apply every proposal in order. Failures are recorded per entry and
    /// never stop the batch.
    pub fn apply_all<L>(&self, proposals: &[RenameProposal<'_, L, ImageFile>]) -> ApplyReport {
        let mut report = ApplyReport::default();

        for proposal in proposals {
            let image = &proposal.source.payload;
            let outcome = self.apply(image, &proposal.target_display);
            if let Err(e) = &outcome {
                warn!("Could not rename {}: {e}", image.file_name);
            }
            report.entries.push(ApplyEntry {
                from: image.file_name.clone(),
                to: image.renamed(&proposal.target_display),
                outcome,
            });
        }

        info!(
            "Applied renames: {} renamed, {} already applied, {} failed",
            report.renamed(),
            report.already_applied(),
            report.failed()
        );

        report
    }
}

/// Whether two existing paths name the same file, as happens for a
/// case-only rename on a case-insensitive filesystem.
#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (a.metadata(), b.metadata()) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
