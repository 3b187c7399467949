//! Join stages between the catalog collections.
//!
//! Both resolvers are built from the same store handle and know nothing about each
//! other; components that need both receive them already constructed.

pub mod paths;
pub mod uses;

pub use paths::PathJoinResolver;
pub use uses::UseJoinResolver;
