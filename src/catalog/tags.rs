//! Style tag catalog: tag id -> prompt sentence fragment

use std::collections::HashMap;

const BUILTIN_TAGS: &[(&str, &str)] = &[
    (
        "scene_futuristic",
        "Place it in a futuristic, all-white room where the walls are covered with 3D geometric, crystalline panels. ",
    ),
    (
        "scene_cyberpunk",
        "Place it on a wet, reflective desk in a dark, cyberpunk city alley at night. ",
    ),
    ("scene_cozy", "Place it on a warm, natural oak wood desk. "),
    (
        "color_icy_blue",
        "The entire scene is illuminated by soft, cool-toned icy blue backlighting from hidden LED strips. ",
    ),
    (
        "color_neon",
        "The main light source is the vibrant neon pink and cyan glow from the PC itself and nearby holographic signs. ",
    ),
    (
        "color_sunset",
        "Soft, warm sunlight streams in from a blurred window in the background, creating a cozy and inviting atmosphere. ",
    ),
    (
        "item_plants",
        "Shelves with small green potted plants are subtly visible in the out-of-focus background. ",
    ),
    (
        "item_cat",
        "A cute cat is sleeping peacefully next to the PC case. ",
    ),
    (
        "item_figures",
        "Shelves in the background are filled with detailed anime figures and gaming collectibles. ",
    ),
];

/// Registry of style tags
#[derive(Debug, Clone, Default)]
pub struct TagCatalog {
    fragments: HashMap<String, String>,
}

impl TagCatalog {
    /// Build a catalog from explicit (id, fragment) pairs
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fragments: entries
                .into_iter()
                .map(|(id, fragment)| (id.into(), fragment.into()))
                .collect(),
        }
    }

    /// Scene, lighting and prop tags offered by the front-end
    pub fn builtin() -> Self {
        Self::new(BUILTIN_TAGS.iter().copied())
    }

    /// Fragment for a tag, if the tag is known
    pub fn fragment(&self, id: &str) -> Option<&str> {
        self.fragments.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
