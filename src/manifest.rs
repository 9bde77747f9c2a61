use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{ManifestConfig, SampleConfig};
use crate::data::{ImageRecord, LabelKey, Manifest};
use crate::dataset::{category_groups, FolderIndex};
use crate::error::{ManifestError, Result};
use crate::sampling::{select, RandomSource, Selection};

/// Every image under the stimuli root, labelled by category.
///
/// Categories in name order, files sorted within each category.
pub fn build_full_manifest(config: &ManifestConfig) -> Result<(Manifest, usize)> {
    let groups = category_groups(config)?;
    let mut manifest = Manifest::new(LabelKey::Category);
    for files in groups.values() {
        manifest
            .records
            .extend(files.iter().map(|file| ImageRecord::from_file(file, &config.root)));
    }
    if manifest.is_empty() {
        return Err(ManifestError::NoImagesFound(config.stimuli_root()));
    }
    Ok((manifest, groups.len()))
}

/// Records for a sampled selection, in selection order.
pub fn sample_manifest(selection: &Selection, config: &ManifestConfig) -> Manifest {
    Manifest {
        label_key: LabelKey::Folder,
        records: selection
            .images
            .iter()
            .map(|file| ImageRecord::from_file(file, &config.root))
            .collect(),
    }
}

/// Render the manifest as a JS file declaring `variable`.
pub fn to_js(json: &str, variable: &str) -> String {
    format!("const {variable} = {json};\n")
}

/// Write the JSON and JS artifacts, replacing whatever was there.
pub fn write_outputs(manifest: &Manifest, config: &ManifestConfig) -> Result<(PathBuf, PathBuf)> {
    let json = serde_json::to_string_pretty(manifest)?;

    let json_path = config.json_path();
    fs::write(&json_path, &json).map_err(|err| ManifestError::io(&json_path, err))?;
    info!(path = %json_path.display(), records = manifest.len(), "wrote manifest");

    let js_path = config.js_path();
    fs::write(&js_path, to_js(&json, &config.js_variable))
        .map_err(|err| ManifestError::io(&js_path, err))?;
    info!(path = %js_path.display(), "wrote manifest script");

    Ok((json_path, js_path))
}

/// What a full manifest run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullReport {
    pub categories: usize,
    pub images: usize,
    pub json_path: PathBuf,
    pub js_path: PathBuf,
}

/// What a sampled manifest run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleReport {
    pub images_found: usize,
    pub folders_available: usize,
    pub folders_picked: usize,
    pub per_folder: usize,
    pub written: usize,
    pub topped_up: usize,
    pub json_path: PathBuf,
    pub js_path: PathBuf,
}

pub fn run_full(config: &ManifestConfig) -> Result<FullReport> {
    let (manifest, categories) = build_full_manifest(config)?;
    let (json_path, js_path) = write_outputs(&manifest, config)?;
    Ok(FullReport {
        categories,
        images: manifest.len(),
        json_path,
        js_path,
    })
}

pub fn run_sample<S: RandomSource + ?Sized>(
    config: &ManifestConfig,
    sample: &SampleConfig,
    source: &mut S,
) -> Result<SampleReport> {
    let index = FolderIndex::build(config)?;
    let selection = select(&index, sample, source)?;
    let manifest = sample_manifest(&selection, config);
    let (json_path, js_path) = write_outputs(&manifest, config)?;
    Ok(SampleReport {
        images_found: index.images.len(),
        folders_available: index.groups.len(),
        folders_picked: selection.folders.len(),
        per_folder: sample.per_folder,
        written: manifest.len(),
        topped_up: selection.topped_up,
        json_path,
        js_path,
    })
}

/// Absolute form of `path` for display, falling back to the path as given.
pub fn display_path(path: &Path) -> String {
    fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
