//! Article preview collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::FetchResult;
use crate::models::PageId;

/// Maximum abstract length in characters, placeholder included.
pub const ABSTRACT_WIDTH: usize = 500;

const PLACEHOLDER: &str = " [...]";

/// Short article excerpt shown when a map point is clicked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticlePreview {
    pub page_id: PageId,
    pub title: String,
    /// Abstract, at most [`ABSTRACT_WIDTH`] characters
    pub text: String,
    pub image_url: Option<String>,
    pub canonical_url: String,
}

/// Source of article previews, keyed by the same ids as the collection.
#[async_trait]
pub trait ArticlePreviewSource: Send + Sync {
    async fn preview(&self, id: PageId) -> FetchResult<ArticlePreview>;
}

/// Collapse whitespace and cut `text` at a word boundary so that the result,
/// including the `" [...]"` placeholder, fits in `width` characters.
pub fn shorten(text: &str, width: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let collapsed = words.join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(PLACEHOLDER.chars().count());
    let mut out = String::new();
    let mut used = 0;
    for word in words {
        let extra = word.chars().count() + usize::from(!out.is_empty());
        if used + extra > budget {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        used += extra;
    }

    if out.is_empty() {
        PLACEHOLDER.trim_start().to_string()
    } else {
        out + PLACEHOLDER
    }
}

/// Article URL derived from the API endpoint: `…/w/api.php` → `…/wiki/<Title>`.
pub fn canonical_url(api_url: &str, title: &str) -> String {
    let base = match api_url.strip_suffix("w/api.php") {
        Some(prefix) => format!("{}wiki/", prefix),
        None => format!("{}/wiki/", api_url.trim_end_matches('/')),
    };
    format!("{}{}", base, title.replace(' ', "_"))
}
