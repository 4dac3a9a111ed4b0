//! Project data types
//!
//! Mirrors the records in `data/images.json`:
//!
//! ```json
//! [{ "name": "Harbour", "images": [{"url": "...", "title": "...", "tags": ["ink"]}], "tags": ["ink"] }]
//! ```

use serde::{Deserialize, Serialize};

/// A single gallery image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(
        default,
        deserialize_with = "nullable_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,
}

impl Image {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            tags: Vec::new(),
        }
    }
}

/// A portfolio project
///
/// `name` is the lookup key. Records without a name are kept in the list but
/// cannot be addressed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub images: Vec<Image>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub tags: Vec<String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            images: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Builder: add a tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Builder: add an image
    pub fn image(mut self, image: Image) -> Self {
        self.images.push(image);
        self
    }

    /// Check if this project carries `tag`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// First image, used as the gallery thumbnail
    pub fn cover(&self) -> Option<&Image> {
        self.images.first()
    }
}

/// Treat a `null` list the same as a missing one
fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "name": "Harbour",
            "images": [{"url": "img/h1.jpg", "title": "Dawn", "tags": ["ink"]}],
            "tags": ["ink", "paper"]
        }"#;

        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.name.as_deref(), Some("Harbour"));
        assert_eq!(project.images.len(), 1);
        assert_eq!(project.images[0].tags, vec!["ink"]);
        assert!(project.has_tag("paper"));
        assert!(!project.has_tag("oil"));
        assert_eq!(project.cover().map(|i| i.title.as_str()), Some("Dawn"));
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let project: Project = serde_json::from_str(r#"{"name": null, "tags": null}"#).unwrap();
        assert_eq!(project.name, None);
        assert!(project.images.is_empty());
        assert!(project.tags.is_empty());
        assert!(project.cover().is_none());
    }

    #[test]
    fn test_null_image_lists() {
        let json = r#"{"name": "A", "images": [{"url": "u", "title": "t", "tags": null}]}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.images.len(), 1);
        assert!(project.images[0].tags.is_empty());

        let project: Project = serde_json::from_str(r#"{"name": "B", "images": null}"#).unwrap();
        assert!(project.images.is_empty());
    }
}
