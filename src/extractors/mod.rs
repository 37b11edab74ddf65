//! Request extractors.

mod user;

pub use user::{CurrentUser, RequireUser};
