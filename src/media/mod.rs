//! Image URL helpers for the documentation gallery.
//!
//! Gallery entries carry either a bare drive file id, an absolute URL or a
//! path relative to the backend host. [`MediaResolver`] turns those into
//! fetchable URLs, and [`FallbackChain`] is the ordered list of sources to
//! try when one fails to load.

use serde::Serialize;
use std::collections::HashSet;

use crate::api::models::Photo;

/// 1x1 transparent GIF, the last resort of every chain
pub const PLACEHOLDER_DATA_URL: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///ywAAAAAAQABAAACAUwAOw==";

/// Widths requested for grid thumbnails, largest first
pub const GRID_WIDTHS: [u32; 2] = [768, 480];

/// Photos shown before the next "load more"
pub const GALLERY_BATCH: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResolver {
    host: String,
}

impl MediaResolver {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
        }
    }

    /// Derive the host from an API base such as `https://host/api`
    pub fn from_api_base(api_base: &str) -> Self {
        let trimmed = api_base.trim_end_matches('/');
        Self::new(trimmed.strip_suffix("/api").unwrap_or(trimmed))
    }

    /// Absolute URL for a stored image reference, or `None` when empty
    pub fn resolve(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if is_drive_file_id(raw) {
            return Some(format!("{}/api/drive/file/{}", self.host, raw));
        }
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Some(raw.to_string());
        }
        let sep = if raw.starts_with('/') { "" } else { "/" };
        Some(format!("{}{}{}", self.host, sep, raw))
    }

    /// Resolved URL with width and optional format hints appended
    pub fn responsive_url(&self, raw: &str, width: u32, fmt: Option<&str>) -> Option<String> {
        self.resolve(raw).map(|base| with_size_hint(&base, width, fmt))
    }

    /// Sources to try for a gallery image, in order
    pub fn fallback_chain(&self, raw: &str, full_link: Option<&str>) -> FallbackChain {
        let mut candidates: Vec<String> = GRID_WIDTHS
            .iter()
            .filter_map(|w| self.responsive_url(raw, *w, None))
            .collect();
        candidates.extend(self.resolve(raw));
        candidates.extend(full_link.and_then(|link| self.resolve(link)));
        candidates.push(PLACEHOLDER_DATA_URL.to_string());
        FallbackChain::new(candidates)
    }
}

impl MediaResolver {
    /// Grid tile for a gallery photo: thumbnail sources plus the full-size link
    pub fn tile<'a>(&self, photo: &'a Photo) -> GalleryTile<'a> {
        GalleryTile {
            photo,
            sources: self.fallback_chain(&photo.thumbnail, Some(&photo.full)),
            full_url: self.resolve(&photo.full),
        }
    }

    /// Tiles for the first `limit` photos
    pub fn tiles<'a>(&self, photos: &'a [Photo], limit: usize) -> Vec<GalleryTile<'a>> {
        photos.iter().take(limit).map(|p| self.tile(p)).collect()
    }
}

/// One gallery entry ready to display
#[derive(Debug, Clone, Serialize)]
pub struct GalleryTile<'a> {
    pub photo: &'a Photo,
    #[serde(serialize_with = "serialize_chain")]
    pub sources: FallbackChain,
    pub full_url: Option<String>,
}

fn serialize_chain<S: serde::Serializer>(chain: &FallbackChain, s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(chain.sources())
}

/// A bare id has no slashes and is longer than five characters
fn is_drive_file_id(value: &str) -> bool {
    !value.contains('/') && value.len() > 5
}

/// Append `w=` (and `fmt=`) using `?` or `&` as appropriate
pub fn with_size_hint(url: &str, width: u32, fmt: Option<&str>) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    match fmt.filter(|f| !f.is_empty()) {
        Some(fmt) => format!("{}{}w={}&fmt={}", url, sep, width, fmt),
        None => format!("{}{}w={}", url, sep, width),
    }
}

/// Ordered, de-duplicated image sources. Each failure advances at most
/// once per entry, so the chain always terminates.
#[derive(Debug, Clone)]
pub struct FallbackChain {
    sources: Vec<String>,
    position: usize,
}

impl FallbackChain {
    pub fn new<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let sources = candidates
            .into_iter()
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();
        Self {
            sources,
            position: 0,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.sources.get(self.position).map(String::as_str)
    }

    /// Advance after a load failure. `None` means every source failed and
    /// the caller should fall back to a plain background.
    pub fn next_source(&mut self) -> Option<&str> {
        if self.position + 1 >= self.sources.len() {
            self.position = self.sources.len();
            return None;
        }
        self.position += 1;
        self.current()
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.sources.len()
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
