use crate::store::Record;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Logical texture identity, independent of any pack or file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Asset {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            let tag = tag.into();
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Registration of an asset for one edition.
///
/// The id is the owning asset id followed by a single suffix letter (`42a`, `42b`, ...).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Use {
    pub id: String,
    pub asset: String,
    pub edition: String,
    #[serde(default)]
    pub name: String,
}

impl Use {
    pub fn new(
        id: impl Into<String>,
        asset: impl Into<String>,
        edition: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            asset: asset.into(),
            edition: edition.into(),
            name: String::new(),
        }
    }

    /// Suffix letter distinguishing this use among the uses of its asset.
    pub fn suffix(&self) -> Option<char> {
        self.id
            .strip_prefix(self.asset.as_str())
            .and_then(|rest| {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_lowercase() => Some(c),
                    _ => None,
                }
            })
    }
}

/// Concrete relative file location of a use, with the game versions it is valid for.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TexturePath {
    pub id: String,
    #[serde(rename = "use")]
    pub use_id: String,
    pub name: String,
    pub versions: Vec<String>,
    #[serde(default)]
    pub is_animated: bool,
}

impl TexturePath {
    pub fn new<I, S>(
        id: impl Into<String>,
        use_id: impl Into<String>,
        name: impl Into<String>,
        versions: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            use_id: use_id.into(),
            name: name.into(),
            versions: versions.into_iter().map(Into::into).collect(),
            is_animated: false,
        }
    }

    pub fn animated(mut self) -> Self {
        self.is_animated = true;
        self
    }

    pub fn covers(&self, version: &str) -> bool {
        self.versions.iter().any(|v| v == version)
    }
}

/// Source repository of a pack for one edition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct Repository {
    pub org: String,
    pub repo: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pack {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub per_edition_repository: IndexMap<String, Repository>,
}

impl Pack {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tags: Vec::new(),
            per_edition_repository: IndexMap::new(),
        }
    }

    pub fn with_repository(
        mut self,
        edition: impl Into<String>,
        org: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        self.per_edition_repository.insert(
            edition.into(),
            Repository {
                org: org.into(),
                repo: repo.into(),
            },
        );
        self
    }

    pub fn repository(&self, edition: &str) -> Option<&Repository> {
        self.per_edition_repository.get(edition)
    }
}

/// Authorship record linking contributors to the assets they worked on.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub id: String,
    pub assets: Vec<String>,
    #[serde(default)]
    pub pack: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub date: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(untagged)]
pub enum AnimationFrame {
    Index(u32),
    Timed { index: u32, time: u32 },
}

/// `.mcmeta` style animation data of an animated path. The id is the path id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct Animation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frametime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<AnimationFrame>>,
}

macro_rules! impl_record {
    ($ty:ty, $collection:literal) => {
        impl Record for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }
    };
}

impl_record!(Asset, "assets");
impl_record!(Use, "uses");
impl_record!(TexturePath, "paths");
impl_record!(Pack, "packs");
impl_record!(Contribution, "contributions");
impl_record!(Animation, "animations");
