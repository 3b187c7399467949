pub mod memory;
pub mod predicate;
pub mod snapshot;

pub use memory::{MemoryCatalog, MemoryCollection, MemoryVersionCatalog};
pub use snapshot::CatalogSnapshot;
