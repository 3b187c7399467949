//! In-memory implementation of the catalog store interfaces.
//!
//! Records keep insertion order, which is the "store order" the resolvers rely on
//! when several paths cover the same version.

use super::predicate::{field_value, matches_all};
use async_trait::async_trait;
use indexmap::IndexMap;
use pigment_api::{
    Animation, ApiError, ApiResult, Asset, CatalogStore, Collection, Contribution, EditOp,
    FieldEdit, Pack, PackRepository, Predicate, Projection, Record, TexturePath, Use,
    VersionCatalog, VersionCatalogSource,
};
use serde_json::{Map, Value};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

fn poisoned(collection: &str) -> ApiError {
    ApiError::Store(format!("{} lock poisoned", collection))
}

/// Thread-safe in-memory collection
pub struct MemoryCollection<R: Record> {
    records: RwLock<IndexMap<String, R>>,
}

impl<R: Record> MemoryCollection<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(IndexMap::new()),
        }
    }

    pub fn with_records(records: impl IntoIterator<Item = R>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.id().to_string(), r))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> ApiResult<RwLockReadGuard<'_, IndexMap<String, R>>> {
        self.records.read().map_err(|_| poisoned(R::COLLECTION))
    }

    fn write(&self) -> ApiResult<RwLockWriteGuard<'_, IndexMap<String, R>>> {
        self.records.write().map_err(|_| poisoned(R::COLLECTION))
    }

    fn next_numeric_id<'a>(ids: impl Iterator<Item = &'a String>) -> String {
        match ids.filter_map(|k| k.parse::<u64>().ok()).max() {
            Some(n) => (n + 1).to_string(),
            None => "0".to_string(),
        }
    }

    /// Assigns an id if missing and checks it against stored and staged records.
    fn stage_new(
        records: &IndexMap<String, R>,
        staged: &mut IndexMap<String, R>,
        mut record: R,
    ) -> ApiResult<String> {
        if record.id().is_empty() {
            record.set_id(Self::next_numeric_id(records.keys().chain(staged.keys())));
        }
        let id = record.id().to_string();
        if records.contains_key(&id) || staged.contains_key(&id) {
            return Err(ApiError::Validation(format!(
                "{} already contains id '{}'",
                R::COLLECTION,
                id
            )));
        }
        staged.insert(id.clone(), record);
        Ok(id)
    }

    fn insert_all(&self, new_records: Vec<R>) -> ApiResult<Vec<String>> {
        let mut records = self.write()?;
        let mut staged = IndexMap::with_capacity(new_records.len());
        let ids = new_records
            .into_iter()
            .map(|r| Self::stage_new(&records, &mut staged, r))
            .collect::<ApiResult<Vec<_>>>()?;
        records.extend(staged);
        Ok(ids)
    }
}

impl<R: Record> Default for MemoryCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_edit(doc: &mut Value, field: &str, op: &EditOp) -> ApiResult<()> {
    let object = doc
        .as_object_mut()
        .ok_or_else(|| ApiError::Store("record is not an object".to_string()))?;

    match op {
        EditOp::Set { value } => {
            object.insert(field.to_string(), value.clone());
        }
        EditOp::ArraySplice {
            start,
            delete_count,
            items,
        } => {
            let array = object
                .entry(field.to_string())
                .or_insert_with(|| Value::Array(Vec::new()))
                .as_array_mut()
                .ok_or_else(|| {
                    ApiError::Validation(format!("field '{}' is not an array", field))
                })?;
            let start = (*start).min(array.len());
            let end = start.saturating_add(*delete_count).min(array.len());
            array.splice(start..end, items.iter().cloned());
        }
    }
    Ok(())
}

#[async_trait]
impl<R: Record> Collection<R> for MemoryCollection<R> {
    async fn get(&self, id: &str) -> ApiResult<R> {
        self.read()?
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(R::COLLECTION, id))
    }

    async fn search(&self, predicates: &[Predicate]) -> ApiResult<Vec<R>> {
        let records = self.read()?;
        let mut found = Vec::new();
        for record in records.values() {
            let doc = serde_json::to_value(record)?;
            if matches_all(&doc, predicates) {
                found.push(record.clone());
            }
        }
        Ok(found)
    }

    async fn read_all(&self) -> ApiResult<IndexMap<String, R>> {
        Ok(self.read()?.clone())
    }

    async fn select(&self, fields: &[&str]) -> ApiResult<IndexMap<String, Projection>> {
        let records = self.read()?;
        let mut out = IndexMap::with_capacity(records.len());
        for (id, record) in records.iter() {
            let doc = serde_json::to_value(record)?;
            let mut partial = Map::new();
            for field in fields {
                if let Some(value) = field_value(&doc, field) {
                    partial.insert(field.to_string(), value.clone());
                }
            }
            out.insert(id.clone(), Projection(partial));
        }
        Ok(out)
    }

    async fn values(&self, field: &str, flatten: bool) -> ApiResult<Vec<Value>> {
        let records = self.read()?;
        let mut out: Vec<Value> = Vec::new();
        let mut push = |v: &Value| {
            if !out.contains(v) {
                out.push(v.clone());
            }
        };
        for record in records.values() {
            let doc = serde_json::to_value(record)?;
            match field_value(&doc, field) {
                Some(Value::Array(items)) if flatten => items.iter().for_each(&mut push),
                Some(value) => push(value),
                None => {}
            }
        }
        Ok(out)
    }

    async fn add(&self, record: R) -> ApiResult<String> {
        let mut ids = self.insert_all(vec![record])?;
        ids.pop()
            .ok_or_else(|| ApiError::Store(format!("{} add returned no id", R::COLLECTION)))
    }

    /// All or nothing: a duplicate anywhere in the batch leaves the collection unchanged.
    async fn add_bulk(&self, new_records: Vec<R>) -> ApiResult<Vec<String>> {
        self.insert_all(new_records)
    }

    async fn set(&self, id: &str, mut record: R) -> ApiResult<()> {
        record.set_id(id.to_string());
        self.write()?.insert(id.to_string(), record);
        Ok(())
    }

    async fn set_bulk(&self, ids: &[String], new_records: Vec<R>) -> ApiResult<()> {
        if ids.len() != new_records.len() {
            return Err(ApiError::Validation(format!(
                "set_bulk on {} got {} ids for {} records",
                R::COLLECTION,
                ids.len(),
                new_records.len()
            )));
        }
        let mut records = self.write()?;
        for (id, mut record) in ids.iter().zip(new_records) {
            record.set_id(id.clone());
            records.insert(id.clone(), record);
        }
        Ok(())
    }

    async fn remove(&self, id: &str) -> ApiResult<()> {
        self.write()?.shift_remove(id);
        Ok(())
    }

    async fn remove_bulk(&self, ids: &[String]) -> ApiResult<()> {
        let mut records = self.write()?;
        for id in ids {
            records.shift_remove(id);
        }
        Ok(())
    }

    async fn edit_field_bulk(&self, edits: Vec<FieldEdit>) -> ApiResult<()> {
        let mut records = self.write()?;

        // Stage every edit first so a bad edit leaves the collection untouched.
        let mut staged: IndexMap<String, Value> = IndexMap::new();
        for edit in &edits {
            if !staged.contains_key(&edit.id) {
                let record = records
                    .get(&edit.id)
                    .ok_or_else(|| ApiError::not_found(R::COLLECTION, edit.id.clone()))?;
                staged.insert(edit.id.clone(), serde_json::to_value(record)?);
            }
            if let Some(doc) = staged.get_mut(&edit.id) {
                apply_edit(doc, &edit.field, &edit.op)?;
            }
        }

        let mut decoded = Vec::with_capacity(staged.len());
        for (id, doc) in staged {
            let record: R = serde_json::from_value(doc).map_err(|e| {
                ApiError::Validation(format!("edit of {}/{} is invalid: {}", R::COLLECTION, id, e))
            })?;
            decoded.push((id, record));
        }
        for (id, record) in decoded {
            records.insert(id, record);
        }
        Ok(())
    }
}

/// Version catalog held in memory.
#[derive(Default)]
pub struct MemoryVersionCatalog {
    catalog: RwLock<VersionCatalog>,
}

impl MemoryVersionCatalog {
    pub fn new(catalog: VersionCatalog) -> Self {
        Self {
            catalog: RwLock::new(catalog),
        }
    }
}

#[async_trait]
impl VersionCatalogSource for MemoryVersionCatalog {
    async fn read(&self) -> ApiResult<VersionCatalog> {
        self.catalog
            .read()
            .map(|c| c.clone())
            .map_err(|_| poisoned("versions"))
    }

    async fn write(&self, edition: &str, versions: Vec<String>) -> ApiResult<()> {
        self.catalog
            .write()
            .map_err(|_| poisoned("versions"))?
            .insert(edition, versions);
        Ok(())
    }
}

/// Every catalog collection, the pack repository and the version catalog, all in memory.
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    pub assets: Arc<MemoryCollection<Asset>>,
    pub uses: Arc<MemoryCollection<Use>>,
    pub paths: Arc<MemoryCollection<TexturePath>>,
    pub packs: Arc<MemoryCollection<Pack>>,
    pub contributions: Arc<MemoryCollection<Contribution>>,
    pub animations: Arc<MemoryCollection<Animation>>,
    pub versions: Arc<MemoryVersionCatalog>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> CatalogStore {
        CatalogStore {
            assets: self.assets.clone(),
            uses: self.uses.clone(),
            paths: self.paths.clone(),
            contributions: self.contributions.clone(),
            animations: self.animations.clone(),
        }
    }

    pub fn pack_repository(&self) -> Arc<dyn PackRepository> {
        self.packs.clone()
    }

    pub fn version_source(&self) -> Arc<dyn VersionCatalogSource> {
        self.versions.clone()
    }
}
