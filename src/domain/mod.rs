//! Domain layer for the zgallery plugin.
//!
//! Plain data types shared by the search core, storage and UI, independent of
//! Zellij APIs.
//!
//! - [`error`]: error types and result alias
//! - [`item`]: gallery result items and thumbnail derivation
//! - [`snapshot`]: the persisted search position
//!
//! # Examples
//!
//! ```
//! use zgallery::domain::ResultItem;
//!
//! let item = ResultItem::new("sunset", true, "https://i.example.test/a/b.png");
//! assert_eq!(item.thumbnail_url(), "https://i.example.test/a/bh.png");
//! ```

pub mod error;
pub mod item;
pub mod snapshot;

pub use error::{GalleryError, NetworkError, Result};
pub use item::ResultItem;
pub use snapshot::SessionSnapshot;
