//! HTTP handlers, one module per resource.

pub mod categories;
pub mod common;
pub mod media;
pub mod messages;
pub mod posts;
pub mod profile;
pub mod settings;
pub mod tags;
