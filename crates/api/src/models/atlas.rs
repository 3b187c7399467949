use crate::error::{ApiError, ApiResult};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Atlas,
    Sprite,
    Tile,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Atlas => "atlas",
            AssetKind::Sprite => "sprite",
            AssetKind::Tile => "tile",
        }
    }
}

impl FromStr for AssetKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "atlas" => Ok(AssetKind::Atlas),
            "sprite" => Ok(AssetKind::Sprite),
            "tile" => Ok(AssetKind::Tile),
            other => Err(ApiError::Validation(format!(
                "unknown asset kind '{}' (expected atlas, sprite or tile)",
                other
            ))),
        }
    }
}

/// Composite asset id of the form `<kind>:<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedId {
    pub kind: AssetKind,
    pub name: String,
}

impl TypedId {
    pub fn new(kind: AssetKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn sprite(name: impl Into<String>) -> Self {
        Self::new(AssetKind::Sprite, name)
    }
}

impl FromStr for TypedId {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, name) = s.split_once(':').ok_or_else(|| {
            ApiError::Validation(format!("'{}' is not a typed id (<kind>:<name>)", s))
        })?;
        if name.is_empty() {
            return Err(ApiError::Validation(format!("typed id '{}' has no name", s)));
        }
        Ok(TypedId {
            kind: kind.parse()?,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for TypedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasSize {
    pub cols: u32,
    pub rows: u32,
}

/// Placement of a sub-asset inside an atlas.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(untagged)]
pub enum AtlasPosition {
    #[serde(rename_all = "camelCase")]
    Range {
        col_start: u32,
        col_end: u32,
        row_start: u32,
        row_end: u32,
    },
    Cell {
        col: u32,
        row: u32,
    },
    Pixels {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Versions a sub-asset placement applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applicability {
    All,
    Versions(Vec<String>),
}

impl Applicability {
    pub fn applies_to(&self, version: &str) -> bool {
        match self {
            Applicability::All => true,
            Applicability::Versions(versions) => versions.iter().any(|v| v == version),
        }
    }
}

impl Serialize for Applicability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Applicability::All => serializer.serialize_str("all"),
            Applicability::Versions(versions) => versions.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Applicability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Keyword(String),
            List(Vec<String>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Keyword(k) if k == "all" => Ok(Applicability::All),
            Raw::Keyword(k) => Err(serde::de::Error::custom(format!(
                "expected \"all\" or a version list, got \"{}\"",
                k
            ))),
            Raw::List(versions) => Ok(Applicability::Versions(versions)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AtlasSlot {
    pub position: AtlasPosition,
    pub versions: Applicability,
}

/// Composite asset whose pixel space is split into addressable sprites.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Atlas {
    pub id: String,
    pub size: AtlasSize,
    #[serde(default)]
    pub map: IndexMap<String, AtlasSlot>,
}

impl Atlas {
    pub fn typed_id(&self) -> ApiResult<TypedId> {
        self.id.parse()
    }
}
