//! Model paths a gallery pre-warms.

use crate::gallery::GalleryConfig;

/// The fixed list of model paths a gallery pre-warms.
///
/// One entry per distinct path, in the order portals first mention it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelRegistry {
    sources: Vec<String>,
}

impl ModelRegistry {
    /// Registry over explicit paths; duplicates are dropped.
    #[must_use]
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sources: Vec<String> = Vec::new();
        for path in paths {
            let path = path.into();
            if !sources.contains(&path) {
                sources.push(path);
            }
        }
        Self { sources }
    }

    /// Registry of every model path referenced by a gallery.
    #[must_use]
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::from_paths(config.portals.iter().map(|p| p.model_asset_path.clone()))
    }

    /// Registered paths.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(String::as_str)
    }

    /// Number of registered paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gallery_registers_three_models() {
        let registry = ModelRegistry::from_config(&GalleryConfig::default());
        let paths: Vec<&str> = registry.iter().collect();
        assert_eq!(
            paths,
            [
                "/free__rubiks_cube_3d/scene.gltf",
                "/ballon_dog/scene.gltf",
                "/GLaDOS/scene.gltf",
            ]
        );
    }

    #[test]
    fn duplicates_collapse() {
        let registry = ModelRegistry::from_paths(["/a.gltf", "/b.gltf", "/a.gltf"]);
        assert_eq!(registry.len(), 2);
    }
}
