//! Proportional sampling across stimulus folders.
//!
//! Every choice (which folders, which files per folder, which files for the
//! top-up) goes through a [`RandomSource`], so the same code path serves both
//! the random draw and the deterministic "first N of the sorted list" mode.

use std::collections::HashSet;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::config::SampleConfig;
use crate::data::StimulusFile;
use crate::dataset::FolderIndex;
use crate::error::{ManifestError, Result};

/// Picks `amount` distinct positions out of `0..len`, in draw order.
///
/// Callers never ask for more than `len`.
pub trait RandomSource {
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize>;
}

/// Always takes the leading elements. Over sorted inputs this is the
/// deterministic selection mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct SortedPrefix;

impl RandomSource for SortedPrefix {
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        (0..amount.min(len)).collect()
    }
}

/// Uniform sampling without replacement backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.0, len, amount.min(len)).into_vec()
    }
}

/// The source a run should use for the given knobs.
pub fn source_for(sample: &SampleConfig) -> Box<dyn RandomSource> {
    match (sample.random_sample, sample.seed) {
        (false, _) => Box::new(SortedPrefix),
        (true, Some(seed)) => Box::new(RngSource::seeded(seed)),
        (true, None) => Box::new(RngSource::from_entropy()),
    }
}

fn pick<'a, T, S: RandomSource + ?Sized>(
    items: &'a [T],
    amount: usize,
    source: &mut S,
) -> Vec<&'a T> {
    source
        .sample_indices(items.len(), amount.min(items.len()))
        .into_iter()
        .map(|i| &items[i])
        .collect()
}

/// Outcome of a sampling pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Folders chosen for per-folder picks, in selection order.
    pub folders: Vec<String>,
    /// Selected images: per-folder picks first, then top-up picks.
    pub images: Vec<StimulusFile>,
    /// How many of `images` came from the top-up pass.
    pub topped_up: usize,
}

/// Number of folders to draw from: `max(1, total / per_folder)`, capped at `available`.
pub fn folders_needed(sample: &SampleConfig, available: usize) -> Result<usize> {
    if sample.per_folder == 0 {
        return Err(ManifestError::InvalidSampleSize);
    }
    Ok((sample.total / sample.per_folder).max(1).min(available))
}

/// Draw up to `sample.total` images spread across the folders of `index`.
pub fn select<S: RandomSource + ?Sized>(
    index: &FolderIndex,
    sample: &SampleConfig,
    source: &mut S,
) -> Result<Selection> {
    let names = index.folder_names();
    let needed = folders_needed(sample, names.len())?;

    let folders: Vec<String> = pick(&names, needed, source)
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    let mut images: Vec<StimulusFile> = Vec::new();
    for folder in &folders {
        let Some(files) = index.groups.get(folder) else {
            continue;
        };
        let picked = pick(files, sample.per_folder, source);
        debug!(folder = %folder, available = files.len(), picked = picked.len(), "sampled folder");
        images.extend(picked.into_iter().cloned());
    }

    let mut topped_up = 0;
    if images.len() < sample.total {
        let already: HashSet<&Path> = images.iter().map(|file| file.path.as_path()).collect();
        let remaining: Vec<&StimulusFile> = index
            .images
            .iter()
            .filter(|file| !already.contains(file.path.as_path()))
            .collect();
        let need = sample.total - images.len();
        let extra: Vec<StimulusFile> = pick(&remaining, need, source)
            .into_iter()
            .map(|file| (*file).clone())
            .collect();
        topped_up = extra.len();
        if topped_up < need {
            warn!(
                requested = sample.total,
                available = images.len() + topped_up,
                "not enough images to reach the requested total"
            );
        }
        images.extend(extra);
    }

    images.truncate(sample.total);
    topped_up = topped_up.min(images.len());
    Ok(Selection {
        folders,
        images,
        topped_up,
    })
}
