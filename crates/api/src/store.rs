//! Document-store seams consumed by the resolution engine.
//!
//! The engine never talks to a concrete database. Each collection is reached through
//! [`Collection`], packs through [`PackRepository`] and the edition/version list through
//! [`VersionCatalogSource`]. [`CatalogStore`] bundles the collection handles so they can be
//! built once and passed into every resolver.

use crate::error::ApiResult;
use crate::models::{Animation, Asset, Contribution, Pack, TexturePath, Use, VersionCatalog};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A record persisted in one store collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "array-contains")]
    ArrayContains,
    #[serde(rename = "array-contains-any")]
    ArrayContainsAny,
    #[serde(rename = "includes")]
    Includes,
}

/// Field-level search condition. All predicates of a search must hold.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Predicate {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
    #[serde(default)]
    pub ignore_case: bool,
}

impl Predicate {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            ignore_case: false,
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    pub fn is_in<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::new(field, Operator::In, values)
    }

    pub fn array_contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::ArrayContains, value)
    }

    pub fn array_contains_any<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::new(field, Operator::ArrayContainsAny, values)
    }

    pub fn includes(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Includes, value)
    }

    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "operation", rename_all = "kebab-case")]
pub enum EditOp {
    Set {
        value: Value,
    },
    /// Removes `delete_count` elements at `start` and inserts `items` there.
    #[serde(rename_all = "camelCase")]
    ArraySplice {
        start: usize,
        delete_count: usize,
        #[serde(default)]
        items: Vec<Value>,
    },
}

/// Edit of a single field of a single record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FieldEdit {
    pub id: String,
    pub field: String,
    #[serde(flatten)]
    pub op: EditOp,
}

impl FieldEdit {
    pub fn set(id: impl Into<String>, field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            op: EditOp::Set {
                value: value.into(),
            },
        }
    }

    pub fn splice(
        id: impl Into<String>,
        field: impl Into<String>,
        start: usize,
        delete_count: usize,
        items: Vec<Value>,
    ) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            op: EditOp::ArraySplice {
                start,
                delete_count,
                items,
            },
        }
    }
}

/// Partial record returned by [`Collection::select`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Projection(pub Map<String, Value>);

impl Projection {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }
}

/// One collection of the document store.
///
/// Deleting an absent id is not an error. Search results keep store order.
#[async_trait]
pub trait Collection<R: Record>: Send + Sync {
    async fn get(&self, id: &str) -> ApiResult<R>;

    async fn search(&self, predicates: &[Predicate]) -> ApiResult<Vec<R>>;

    async fn read_all(&self) -> ApiResult<IndexMap<String, R>>;

    async fn select(&self, fields: &[&str]) -> ApiResult<IndexMap<String, Projection>>;

    /// Values of one field across all records, deduplicated; arrays are expanded when `flatten`.
    async fn values(&self, field: &str, flatten: bool) -> ApiResult<Vec<Value>>;

    /// Stores a record; an empty id is replaced by the next free numeric id.
    async fn add(&self, record: R) -> ApiResult<String>;

    async fn add_bulk(&self, records: Vec<R>) -> ApiResult<Vec<String>>;

    async fn set(&self, id: &str, record: R) -> ApiResult<()>;

    async fn set_bulk(&self, ids: &[String], records: Vec<R>) -> ApiResult<()>;

    async fn remove(&self, id: &str) -> ApiResult<()>;

    async fn remove_bulk(&self, ids: &[String]) -> ApiResult<()>;

    async fn edit_field_bulk(&self, edits: Vec<FieldEdit>) -> ApiResult<()>;
}

#[async_trait]
pub trait PackRepository: Send + Sync {
    async fn get_by_id(&self, id: &str) -> ApiResult<Pack>;

    async fn read_all(&self) -> ApiResult<Vec<Pack>>;
}

#[async_trait]
impl<C> PackRepository for C
where
    C: Collection<Pack> + ?Sized,
{
    async fn get_by_id(&self, id: &str) -> ApiResult<Pack> {
        <C as Collection<Pack>>::get(self, id).await
    }

    async fn read_all(&self) -> ApiResult<Vec<Pack>> {
        Ok(<C as Collection<Pack>>::read_all(self)
            .await?
            .into_values()
            .collect())
    }
}

#[async_trait]
pub trait VersionCatalogSource: Send + Sync {
    async fn read(&self) -> ApiResult<VersionCatalog>;

    /// Replaces the version list of one edition.
    async fn write(&self, edition: &str, versions: Vec<String>) -> ApiResult<()>;
}

/// Handles to every catalog collection, shared by all resolvers.
#[derive(Clone)]
pub struct CatalogStore {
    pub assets: Arc<dyn Collection<Asset>>,
    pub uses: Arc<dyn Collection<Use>>,
    pub paths: Arc<dyn Collection<TexturePath>>,
    pub contributions: Arc<dyn Collection<Contribution>>,
    pub animations: Arc<dyn Collection<Animation>>,
}
