use serde::{Deserialize, Serialize};

use crate::i18n::{Language, Translator};
use crate::models::PageId;
use crate::sources::ArticlePreview;

/// Label of the link to the full article.
pub const LINK_LABEL: &str = "zum Artikel";

/// Info panel content for one clicked point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewData {
    pub page_id: PageId,
    pub title: String,
    /// Abstract, at most 500 characters
    pub text: String,
    pub image_url: Option<String>,
    pub article_url: String,
    pub link_label: String,
}

impl From<ArticlePreview> for PreviewData {
    fn from(preview: ArticlePreview) -> Self {
        Self {
            page_id: preview.page_id,
            title: preview.title,
            text: preview.text,
            image_url: preview.image_url,
            article_url: preview.canonical_url,
            link_label: LINK_LABEL.to_string(),
        }
    }
}

impl PreviewData {
    pub fn localize(&mut self, translator: &dyn Translator, language: Language) {
        self.link_label = translator.translate(LINK_LABEL, language);
    }
}
