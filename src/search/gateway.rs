//! Remote gallery API client.
//!
//! The plugin runtime performs HTTP on the host and answers with an event, so
//! a page fetch is split in two halves: [`RemoteGateway::page_request`] builds
//! the request and [`RemoteGateway::parse_page`] turns the response into
//! validated [`ResultItem`]s.

use std::collections::BTreeMap;

use serde::Deserialize;
use url::Url;

use crate::domain::{GalleryError, NetworkError, ResultItem, Result};

/// Default public gallery API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.imgur.com";

/// A GET request ready to hand to the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    /// Opaque key/value pairs echoed back with the response.
    pub context: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct GalleryResponse {
    #[serde(default)]
    data: Option<Vec<GalleryRecord>>,
}

#[derive(Debug, Deserialize)]
struct GalleryRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    images: Option<Vec<GalleryImage>>,
}

#[derive(Debug, Deserialize)]
struct GalleryImage {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

impl GalleryRecord {
    /// Maps a raw record to at most one item. Records without images, or whose
    /// first image has no link, are dropped.
    fn into_item(self) -> Option<ResultItem> {
        let image = self.images?.into_iter().next()?;
        let link = image.link?;
        let is_media = image
            .kind
            .as_deref()
            .is_some_and(|mime| mime.starts_with("image"));

        Some(ResultItem::new(self.title.unwrap_or_default(), is_media, link))
    }
}

/// Builds page requests for the gallery search endpoint and decodes replies.
#[derive(Debug, Clone)]
pub struct RemoteGateway {
    base_url: Url,
    client_id: Option<String>,
}

impl RemoteGateway {
    /// Creates a gateway for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Config`] if `base_url` is not an absolute
    /// hierarchical URL.
    pub fn new(base_url: &str, client_id: Option<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| GalleryError::Config(format!("invalid api_base_url '{base_url}': {e}")))?;

        if base_url.cannot_be_a_base() {
            return Err(GalleryError::Config(format!(
                "api_base_url '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            base_url,
            client_id: client_id.filter(|id| !id.is_empty()),
        })
    }

    /// Builds the request for one page of results. Pages are 1-based.
    ///
    /// # Examples
    ///
    /// ```
    /// use zgallery::search::RemoteGateway;
    ///
    /// let gateway = RemoteGateway::new("https://api.example.test", None).unwrap();
    /// let request = gateway.page_request("cute puppy", 2);
    /// assert_eq!(request.url, "https://api.example.test/3/gallery/search/time/2?q=cute+puppy");
    /// ```
    #[must_use]
    pub fn page_request(&self, term: &str, page: u32) -> HttpRequest {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["3", "gallery", "search", "time", &page.to_string()]);
        }
        url.query_pairs_mut().clear().append_pair("q", term);

        let mut headers = BTreeMap::new();
        if let Some(client_id) = &self.client_id {
            headers.insert("Authorization".to_string(), format!("Client-ID {client_id}"));
        }

        HttpRequest {
            url: url.to_string(),
            headers,
            context: BTreeMap::new(),
        }
    }

    /// Decodes one page response into result items, preserving order.
    ///
    /// # Errors
    ///
    /// [`NetworkError::Status`] for any non-2xx status and
    /// [`NetworkError::Decode`] when the body is not the expected JSON.
    pub fn parse_page(&self, status: u16, body: &[u8]) -> std::result::Result<Vec<ResultItem>, NetworkError> {
        if !(200..300).contains(&status) {
            return Err(NetworkError::Status(status));
        }

        let response: GalleryResponse =
            serde_json::from_slice(body).map_err(|e| NetworkError::Decode(e.to_string()))?;

        let records = response.data.unwrap_or_default();
        let total = records.len();
        let items: Vec<ResultItem> = records.into_iter().filter_map(GalleryRecord::into_item).collect();

        tracing::debug!(total, kept = items.len(), "decoded gallery page");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> RemoteGateway {
        RemoteGateway::new("https://api.example.test", Some("abc123".to_string())).unwrap()
    }

    #[test]
    fn page_request_targets_search_endpoint() {
        let request = gateway().page_request("cats", 1);
        assert_eq!(request.url, "https://api.example.test/3/gallery/search/time/1?q=cats");
        assert_eq!(
            request.headers.get("Authorization").map(String::as_str),
            Some("Client-ID abc123")
        );
    }

    #[test]
    fn page_request_keeps_base_path_prefix() {
        let gateway = RemoteGateway::new("http://localhost:8080/proxy/", None).unwrap();
        let request = gateway.page_request("dog", 3);
        assert_eq!(request.url, "http://localhost:8080/proxy/3/gallery/search/time/3?q=dog");
        assert!(request.headers.is_empty());
    }

    #[test]
    fn empty_client_id_sends_no_header() {
        let gateway = RemoteGateway::new(DEFAULT_API_BASE_URL, Some(String::new())).unwrap();
        assert!(gateway.page_request("x", 1).headers.is_empty());
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        assert!(matches!(
            RemoteGateway::new("not a url", None),
            Err(GalleryError::Config(_))
        ));
        assert!(matches!(
            RemoteGateway::new("mailto:someone@example.test", None),
            Err(GalleryError::Config(_))
        ));
    }

    #[test]
    fn parse_page_maps_records_in_order_and_drops_imageless() {
        let body = br#"{
            "data": [
                {"title": "first", "images": [{"type": "image/jpeg", "link": "https://i.x.test/1.jpg"}]},
                {"title": "no images", "images": []},
                {"title": "null images", "images": null},
                {"title": "missing images"},
                {"title": "video", "images": [{"type": "video/mp4", "link": "https://i.x.test/2.mp4"},
                                              {"type": "image/png", "link": "https://i.x.test/3.png"}]},
                {"images": [{"type": "image/gif", "link": "https://i.x.test/4.gif"}]}
            ],
            "success": true,
            "status": 200
        }"#;

        let items = gateway().parse_page(200, body).unwrap();
        assert_eq!(
            items,
            vec![
                ResultItem::new("first", true, "https://i.x.test/1.jpg"),
                ResultItem::new("video", false, "https://i.x.test/2.mp4"),
                ResultItem::new("", true, "https://i.x.test/4.gif"),
            ]
        );
    }

    #[test]
    fn parse_page_with_empty_data_yields_no_items() {
        assert!(gateway().parse_page(200, br#"{"data": []}"#).unwrap().is_empty());
        assert!(gateway().parse_page(200, br#"{}"#).unwrap().is_empty());
    }

    #[test]
    fn non_success_status_is_status_error() {
        assert_eq!(gateway().parse_page(500, b"oops"), Err(NetworkError::Status(500)));
        assert_eq!(gateway().parse_page(404, b"{}"), Err(NetworkError::Status(404)));
    }

    #[test]
    fn malformed_body_is_decode_error() {
        assert!(matches!(
            gateway().parse_page(200, b"<html>"),
            Err(NetworkError::Decode(_))
        ));
    }
}
