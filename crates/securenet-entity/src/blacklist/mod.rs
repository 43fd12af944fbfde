//! Blacklist entity.

pub mod model;

pub use model::BlacklistEntry;
