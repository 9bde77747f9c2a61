use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::path::{Component, Path, PathBuf};

/// An image found under the stimuli root, tagged with its first path segment below that root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StimulusFile {
    pub path: PathBuf,
    pub folder: String,
}

/// Which key the label is written under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKey {
    Category,
    Folder,
}

impl LabelKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelKey::Category => "category",
            LabelKey::Folder => "folder",
        }
    }
}

/// One manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageRecord {
    pub image: String,
    #[serde(alias = "category", alias = "folder")]
    pub label: String,
}

impl ImageRecord {
    /// Build a record with `image` relative to `base`.
    pub fn from_file(file: &StimulusFile, base: &Path) -> Self {
        Self {
            image: web_path(&file.path, base),
            label: file.folder.clone(),
        }
    }
}

/// Ordered list of records plus the key its labels are serialized under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub label_key: LabelKey,
    pub records: Vec<ImageRecord>,
}

impl Manifest {
    pub fn new(label_key: LabelKey) -> Self {
        Self {
            label_key,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

struct KeyedRecord<'a> {
    record: &'a ImageRecord,
    label_key: LabelKey,
}

impl Serialize for KeyedRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("image", &self.record.image)?;
        map.serialize_entry(self.label_key.as_str(), &self.record.label)?;
        map.end()
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in &self.records {
            seq.serialize_element(&KeyedRecord {
                record,
                label_key: self.label_key,
            })?;
        }
        seq.end()
    }
}

/// Path of `path` relative to `base`, always joined with `/`.
///
/// Falls back to the whole path when it does not live under `base`.
pub fn web_path(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    let mut parts: Vec<String> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Prefix(prefix) => {
                parts.push(prefix.as_os_str().to_string_lossy().into_owned())
            }
            Component::RootDir => parts.push(String::new()),
            Component::CurDir => {}
            Component::ParentDir => parts.push("..".to_string()),
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
        }
    }
    if parts.len() == 1 && parts[0].is_empty() {
        return "/".to_string();
    }
    parts.join("/")
}

/// First path segment of `path` below `root`.
///
/// For a file lying directly in `root` that is the file name itself.
pub fn top_level_segment(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    relative.components().find_map(|component| match component {
        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_path_uses_forward_slashes() {
        let base = Path::new(".");
        let path = Path::new(".").join("stimuli").join("ABPS_alcohol").join("001.jpg");
        assert_eq!(web_path(&path, base), "stimuli/ABPS_alcohol/001.jpg");
    }

    #[test]
    fn web_path_outside_base_keeps_full_path() {
        let path = Path::new("/data/stimuli/a/1.png");
        assert_eq!(web_path(path, Path::new("/elsewhere")), "/data/stimuli/a/1.png");
    }

    #[test]
    fn top_level_segment_skips_nested_parents() {
        let root = Path::new("stimuli");
        assert_eq!(
            top_level_segment(Path::new("stimuli/cats/indoor/1.jpg"), root).as_deref(),
            Some("cats")
        );
        assert_eq!(
            top_level_segment(Path::new("stimuli/loose.jpg"), root).as_deref(),
            Some("loose.jpg")
        );
        assert_eq!(top_level_segment(Path::new("other/cats/1.jpg"), root), None);
    }

    #[test]
    fn manifest_serializes_image_then_label() {
        let mut manifest = Manifest::new(LabelKey::Folder);
        manifest.records.push(ImageRecord {
            image: "stimuli/猫/1.jpg".to_string(),
            label: "猫".to_string(),
        });
        let json = serde_json::to_string_pretty(&manifest).unwrap();
        assert_eq!(
            json,
            "[\n  {\n    \"image\": \"stimuli/猫/1.jpg\",\n    \"folder\": \"猫\"\n  }\n]"
        );
    }

    #[test]
    fn records_read_back_from_either_label_key() {
        let category: ImageRecord =
            serde_json::from_str(r#"{"image": "stimuli/a/1.jpg", "category": "a"}"#).unwrap();
        let folder: ImageRecord =
            serde_json::from_str(r#"{"image": "stimuli/a/1.jpg", "folder": "a"}"#).unwrap();
        assert_eq!(category, folder);
        assert_eq!(category.label, "a");
    }
}
