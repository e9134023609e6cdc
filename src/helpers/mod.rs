//! Helper functions for browsing and templates
//!
//! Tag counts, archives and search operate on the newest-first post list
//! returned by the store; URL and date helpers are registered as template
//! filters.

mod date;
mod list;
mod search;
mod url;

pub use date::*;
pub use list::*;
pub use search::*;
pub use url::*;
