use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Image suffixes recognized by default (compared case-insensitively).
pub const DEFAULT_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "bmp"];

pub const DEFAULT_STIMULI_DIR: &str = "stimuli";
pub const DEFAULT_JS_VARIABLE: &str = "manifest";

pub const PER_FOLDER: usize = 2;
pub const TOTAL: usize = 10;
pub const RANDOM_SAMPLE: bool = true;

/// Where to scan and where to write.
///
/// `stimuli_dir` and both output paths are resolved against `root`, and the
/// `image` path of every record is written relative to `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestConfig {
    pub root: PathBuf,
    pub stimuli_dir: PathBuf,
    pub out_json: PathBuf,
    pub out_js: PathBuf,
    pub extensions: BTreeSet<String>,
    pub js_variable: String,
}

impl ManifestConfig {
    fn with_outputs(out_json: &str, out_js: &str) -> Self {
        Self {
            root: PathBuf::from("."),
            stimuli_dir: PathBuf::from(DEFAULT_STIMULI_DIR),
            out_json: PathBuf::from(out_json),
            out_js: PathBuf::from(out_js),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            js_variable: DEFAULT_JS_VARIABLE.to_string(),
        }
    }

    /// Defaults of the full manifest tool.
    pub fn full() -> Self {
        Self::with_outputs("manifest.json", "manifest.js")
    }

    /// Defaults of the sampled manifest tool.
    pub fn sample() -> Self {
        Self::with_outputs("manifest_test.json", "manifest_test.js")
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_stimuli_dir(mut self, stimuli_dir: impl Into<PathBuf>) -> Self {
        self.stimuli_dir = stimuli_dir.into();
        self
    }

    /// Replace the recognized extensions. Leading dots and case are ignored.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    pub fn with_js_variable(mut self, name: impl Into<String>) -> Self {
        self.js_variable = name.into();
        self
    }

    pub fn stimuli_root(&self) -> PathBuf {
        self.root.join(&self.stimuli_dir)
    }

    pub fn json_path(&self) -> PathBuf {
        self.root.join(&self.out_json)
    }

    pub fn js_path(&self) -> PathBuf {
        self.root.join(&self.out_js)
    }

    /// True when `path` carries one of the recognized extensions.
    pub fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self::full()
    }
}

/// Knobs of the sampled manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleConfig {
    /// How many images to take from each chosen folder.
    pub per_folder: usize,
    /// Size of the final manifest.
    pub total: usize,
    /// Random draw when true, sorted prefix otherwise.
    pub random_sample: bool,
    /// Fixed seed for reproducible random draws.
    pub seed: Option<u64>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            per_folder: PER_FOLDER,
            total: TOTAL,
            random_sample: RANDOM_SAMPLE,
            seed: None,
        }
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}
