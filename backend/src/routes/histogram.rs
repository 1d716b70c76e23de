use serde::{Deserialize, Serialize};

use crate::i18n::{Language, Translator};
use crate::models::{AbsoluteRange, NormalizedRange};
use crate::services::histogram::HistogramBin;

/// Hover label for the view count range of a bar.
pub const VIEWS_LABEL: &str = "Aufrufe";
/// Hover label for the number of places in a bar.
pub const PLACES_LABEL: &str = "versch. Orte";

/// Plotly hover template for histogram bars.
pub fn hover_template(views_label: &str, places_label: &str) -> String {
    format!(
        "%{{customdata[0]}}-%{{customdata[1]}} {}: %{{y}} {}",
        views_label, places_label
    )
}

/// Popularity histogram for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramData {
    pub bins: Vec<HistogramBin>,
    /// Slider range the selection was computed from
    pub normalized_range: NormalizedRange,
    /// Selection in log_views units
    pub range: AbsoluteRange,
    pub max_log_views: f64,
    /// Items with at least one view
    pub binned_count: usize,
    pub total_count: usize,
    pub hover_template: String,
}

impl HistogramData {
    /// Histogram of a collection that has no items yet.
    pub fn empty(normalized_range: NormalizedRange) -> Self {
        Self {
            bins: Vec::new(),
            normalized_range,
            range: AbsoluteRange::new(0.0, 0.0),
            max_log_views: 0.0,
            binned_count: 0,
            total_count: 0,
            hover_template: hover_template(VIEWS_LABEL, PLACES_LABEL),
        }
    }

    /// Rewrite display strings into `language`.
    pub fn localize(&mut self, translator: &dyn Translator, language: Language) {
        self.hover_template = hover_template(
            &translator.translate(VIEWS_LABEL, language),
            &translator.translate(PLACES_LABEL, language),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{DictionaryTranslator, IdentityTranslator};

    #[test]
    fn test_hover_template() {
        assert_eq!(
            hover_template(VIEWS_LABEL, PLACES_LABEL),
            "%{customdata[0]}-%{customdata[1]} Aufrufe: %{y} versch. Orte"
        );
    }

    #[test]
    fn test_localize() {
        let mut dict = DictionaryTranslator::new();
        dict.insert("Aufrufe", Language::En, "views");
        dict.insert("versch. Orte", Language::En, "different places");

        let mut data = HistogramData::empty(NormalizedRange::FULL);
        data.localize(&dict, Language::En);
        assert_eq!(
            data.hover_template,
            "%{customdata[0]}-%{customdata[1]} views: %{y} different places"
        );

        data.localize(&IdentityTranslator, Language::De);
        assert!(data.hover_template.contains("Aufrufe"));
    }
}
