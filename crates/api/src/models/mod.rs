pub mod atlas;
pub mod catalog;
pub mod gallery;
pub mod version;

pub use atlas::*;
pub use catalog::*;
pub use gallery::*;
pub use version::*;
