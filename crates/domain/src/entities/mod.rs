//! Entities - records with identity owned by the character aggregate

mod item;
mod resource;

pub use item::{ItemData, ItemRecord, RawItemRecord};
pub use resource::{Resource, ResourcePatch, BUILT_IN_RESOURCES};
