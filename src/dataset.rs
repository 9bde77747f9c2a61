use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::ManifestConfig;
use crate::data::{top_level_segment, StimulusFile};
use crate::error::{ManifestError, Result};

/// Folder name -> images found anywhere beneath that folder.
pub type FolderGroups = BTreeMap<String, Vec<StimulusFile>>;

/// Recursively collect every file under `dir` with a recognized image extension.
///
/// The returned order is whatever the walk produced.
pub fn scan_images(dir: &Path, config: &ManifestConfig) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(ManifestError::MissingDirectory(dir.to_path_buf()));
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry.map_err(|source| ManifestError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_file =
            entry.file_type().is_file() || (entry.path_is_symlink() && path.is_file());
        if is_file && config.is_image(path) {
            images.push(path.to_path_buf());
        }
    }
    Ok(images)
}

/// Group images by category, one category per first-level directory of the stimuli root.
///
/// Categories come back in name order and the files of each category are sorted,
/// so the same tree always yields the same groups.
pub fn category_groups(config: &ManifestConfig) -> Result<FolderGroups> {
    let root = config.stimuli_root();
    if !root.exists() {
        return Err(ManifestError::MissingDirectory(root));
    }

    let mut groups = FolderGroups::new();
    let entries = fs::read_dir(&root).map_err(|err| ManifestError::io(&root, err))?;
    for entry in entries {
        let entry = entry.map_err(|err| ManifestError::io(&root, err))?;
        let folder = entry.path();
        if !folder.is_dir() {
            continue;
        }

        let category = entry.file_name().to_string_lossy().into_owned();
        let mut images = scan_images(&folder, config)?;
        images.sort();
        debug!(category = %category, images = images.len(), "scanned category");

        let files = images.into_iter().map(|path| StimulusFile {
            path,
            folder: category.clone(),
        });
        // lossy names of distinct folders can collide
        let group = groups.entry(category.clone()).or_default();
        group.extend(files);
        group.sort();
    }
    Ok(groups)
}

/// Flat, sorted image pool of the stimuli root partitioned by top-level folder.
#[derive(Debug, Clone)]
pub struct FolderIndex {
    pub images: Vec<StimulusFile>,
    pub groups: FolderGroups,
}

impl FolderIndex {
    /// Scan the whole stimuli root in one pass and partition the result.
    ///
    /// The key is the first path segment below the root, so an image lying
    /// directly in the root forms a group named after its own file.
    pub fn build(config: &ManifestConfig) -> Result<Self> {
        let root = config.stimuli_root();
        let mut paths = scan_images(&root, config)?;
        if paths.is_empty() {
            return Err(ManifestError::NoImagesFound(root));
        }
        paths.sort();

        let mut images = Vec::with_capacity(paths.len());
        let mut groups = FolderGroups::new();
        for path in paths {
            let Some(folder) = top_level_segment(&path, &root) else {
                continue;
            };
            let file = StimulusFile { path, folder };
            groups.entry(file.folder.clone()).or_default().push(file.clone());
            images.push(file);
        }

        if groups.is_empty() {
            return Err(ManifestError::NoFolderGroups(root));
        }

        info!(
            images = images.len(),
            folders = groups.len(),
            root = %root.display(),
            "indexed stimuli"
        );
        Ok(Self { images, groups })
    }

    pub fn folder_names(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn config_for(dir: &TempDir) -> ManifestConfig {
        ManifestConfig::full().with_root(dir.path())
    }

    #[test]
    fn scan_filters_by_extension_recursively() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "stimuli/a/1.JPG");
        touch(dir.path(), "stimuli/a/deep/2.png");
        touch(dir.path(), "stimuli/a/notes.txt");
        touch(dir.path(), "stimuli/b/3.bmp");

        let config = config_for(&dir);
        let mut found = scan_images(&config.stimuli_root(), &config).unwrap();
        found.sort();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["1.JPG", "2.png", "3.bmp"]);
    }

    #[cfg(unix)]
    #[test]
    fn scan_follows_symlinked_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "elsewhere/real.jpg");
        fs::create_dir_all(dir.path().join("stimuli/a")).unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("elsewhere/real.jpg"),
            dir.path().join("stimuli/a/link.jpg"),
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("stimuli/a/sub")).unwrap();

        let config = config_for(&dir);
        let found = scan_images(&config.stimuli_root(), &config).unwrap();
        assert_eq!(found, vec![dir.path().join("stimuli/a/link.jpg")]);
    }

    #[test]
    fn scan_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let err = scan_images(&config.stimuli_root(), &config).unwrap_err();
        assert!(matches!(err, ManifestError::MissingDirectory(_)));
    }

    #[test]
    fn category_groups_are_sorted_and_ignore_loose_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "stimuli/zebra/2.jpg");
        touch(dir.path(), "stimuli/zebra/1.jpg");
        touch(dir.path(), "stimuli/apple/nested/x.gif");
        touch(dir.path(), "stimuli/loose.jpg");
        fs::create_dir_all(dir.path().join("stimuli/empty")).unwrap();

        let groups = category_groups(&config_for(&dir)).unwrap();
        assert_eq!(
            groups.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["apple", "empty", "zebra"]
        );
        let zebra: Vec<_> = groups["zebra"]
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(zebra, vec!["1.jpg", "2.jpg"]);
        assert!(groups["empty"].is_empty());
        assert_eq!(groups["apple"][0].folder, "apple");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn colliding_lossy_category_names_keep_all_images() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let stimuli = dir.path().join("stimuli");
        for (name, image) in [(&b"cat\xff"[..], "1.jpg"), (&b"cat\xfe"[..], "2.jpg")] {
            let folder = stimuli.join(OsStr::from_bytes(name));
            fs::create_dir_all(&folder).unwrap();
            fs::write(folder.join(image), b"").unwrap();
        }

        let groups = category_groups(&config_for(&dir)).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["cat\u{FFFD}"].len(), 2);
    }

    #[test]
    fn index_partitions_by_top_level_folder() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "stimuli/b/inner/3.jpg");
        touch(dir.path(), "stimuli/a/1.jpg");
        touch(dir.path(), "stimuli/a/2.jpg");
        touch(dir.path(), "stimuli/loose.png");

        let index = FolderIndex::build(&config_for(&dir)).unwrap();
        assert_eq!(index.folder_names(), vec!["a", "b", "loose.png"]);
        assert_eq!(index.images.len(), 4);
        assert_eq!(index.groups["b"].len(), 1);
        assert_eq!(index.groups["b"][0].folder, "b");
        assert!(index.images.windows(2).all(|w| w[0].path <= w[1].path));
    }

    #[test]
    fn index_of_empty_root_reports_no_images() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("stimuli/a")).unwrap();
        let err = FolderIndex::build(&config_for(&dir)).unwrap_err();
        assert!(matches!(err, ManifestError::NoImagesFound(_)));
    }

    #[test]
    fn loose_images_form_their_own_group() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "stimuli/loose.png");
        let index = FolderIndex::build(&config_for(&dir)).unwrap();
        assert_eq!(index.folder_names(), vec!["loose.png"]);
        assert_eq!(index.images.len(), 1);
        assert_eq!(index.images[0].folder, "loose.png");
    }
}
