//! Typed records for each table plus the insert and patch shapes the services accept.

mod category;
mod media;
mod message;
mod post;
mod profile;
mod setting;
mod tag;

pub use category::*;
pub use media::*;
pub use message::*;
pub use post::*;
pub use profile::*;
pub use setting::*;
pub use tag::*;

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: i64 = 20;

/// One page of a filtered listing. `total` counts every row matching the filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Offset/limit window. Clamping to a maximum is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

impl Default for Window {
    fn default() -> Self {
        Window {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}
