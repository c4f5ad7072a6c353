pub mod config;
pub mod dates;
pub mod error;
pub mod favorites;
pub mod parsers;
pub mod remap;
pub mod rewrite;
pub mod search;
pub mod status;
pub mod time;
pub mod toggle;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export for easy access
pub use dates::{compute_window, resolve_window, DateFilterSelection, DateWindow, DisplayDate};
pub use error::{DateError, MockError};
pub use favorites::{apply_favorite, FavoriteEntry};
pub use parsers::{parse_key, StorageItem, StructuredKey};
pub use remap::remap_timestamp;
pub use rewrite::{rewrite_dates, rewrite_key};
