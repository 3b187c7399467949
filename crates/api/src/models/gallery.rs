use super::catalog::Animation;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Gallery lookup: which file represents each matching asset in a pack.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct GalleryQuery {
    /// Pack id
    pub pack: String,
    /// Edition name, or "all"
    pub edition: String,
    /// Game version, or "latest"
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Asset id or name fragment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl GalleryQuery {
    pub fn new(
        pack: impl Into<String>,
        edition: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            pack: pack.into(),
            edition: edition.into(),
            version: version.into(),
            tag: None,
            search: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

/// One fully resolved asset → use → path chain with its fetchable URL.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryEntry {
    pub asset_id: String,
    pub use_id: String,
    pub path_id: String,
    pub name: String,
    pub tags: Vec<String>,
    pub animation: Option<Animation>,
    /// Empty when the pack has no repository for the edition
    pub url: String,
}
