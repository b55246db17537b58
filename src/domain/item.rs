//! Gallery result items.

use serde::{Deserialize, Serialize};
use url::Url;

/// Size marker inserted before the extension to request the list-sized rendition.
const THUMBNAIL_MARKER: char = 'h';

/// One displayable gallery entry.
///
/// Built by the gateway from a single remote record and owned by the result
/// cache afterwards. Never mutated once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub title: String,
    /// True when the record's first image carries an `image/*` MIME type.
    pub is_media: bool,
    pub source_url: String,
}

impl ResultItem {
    #[must_use]
    pub fn new(title: impl Into<String>, is_media: bool, source_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_media,
            source_url: source_url.into(),
        }
    }

    /// Returns the URL of the list-sized rendition of this item.
    ///
    /// The marker `h` is inserted before the extension of the final path
    /// segment. Non-media items, URLs that fail to parse and final segments
    /// without an extension yield `source_url` unchanged; callers show a
    /// placeholder for non-media items.
    ///
    /// # Examples
    ///
    /// ```
    /// use zgallery::domain::ResultItem;
    ///
    /// let photo = ResultItem::new("cat", true, "https://x.test/abc/photo.jpg");
    /// assert_eq!(photo.thumbnail_url(), "https://x.test/abc/photoh.jpg");
    ///
    /// let clip = ResultItem::new("cat", false, "https://x.test/abc/clip.mp4");
    /// assert_eq!(clip.thumbnail_url(), "https://x.test/abc/clip.mp4");
    /// ```
    #[must_use]
    pub fn thumbnail_url(&self) -> String {
        if !self.is_media {
            return self.source_url.clone();
        }

        let Ok(mut url) = Url::parse(&self.source_url) else {
            return self.source_url.clone();
        };

        let path = url.path().to_string();
        let segment_start = path.rfind('/').map_or(0, |slash| slash + 1);
        let Some(dot) = path[segment_start..].rfind('.') else {
            return self.source_url.clone();
        };

        let split = segment_start + dot;
        let resized = format!("{}{}{}", &path[..split], THUMBNAIL_MARKER, &path[split..]);
        url.set_path(&resized);
        url.to_string()
    }

    /// Short label for the item kind shown in the result table.
    #[must_use]
    pub fn kind_label(&self) -> &'static str {
        if self.is_media {
            "image"
        } else {
            "other"
        }
    }
}
