use serde::{Deserialize, Serialize};

use crate::i18n::{Language, Translator};
use crate::models::{AbsoluteRange, Item, Location, PageId};

/// Hover label for a point's view count.
pub const HOVER_LABEL: &str = "Aufrufe in den letzten 30 Tagen";

/// Color stops shared by map points and histogram bars, low to high.
pub const COLORSCALE: [(f64, &str); 7] = [
    (0.0, "#0187c2"),
    (0.46, "#5837ff"),
    (0.58, "#8f50dc"),
    (0.75, "#b162ae"),
    (0.84, "#ff7674"),
    (0.95, "#ffaf72"),
    (1.0, "#fff96b"),
];

/// Plotly hover template for map points.
pub fn hover_template(label: &str) -> String {
    format!(
        "<b>%{{customdata[0]}}</b><br><br>{}: %{{customdata[1]}}<extra></extra>",
        label
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: String,
}

pub fn colorscale() -> Vec<ColorStop> {
    COLORSCALE
        .iter()
        .map(|(offset, color)| ColorStop {
            offset: *offset,
            color: color.to_string(),
        })
        .collect()
}

/// One visible article on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub page_id: PageId,
    pub title: String,
    pub lat: f64,
    pub lon: f64,
    pub views: u64,
    pub log_views: f64,
    /// Marker area; zero-view articles are drawn as if they had one view
    pub dot_size: u64,
}

impl From<&Item> for MapPoint {
    fn from(item: &Item) -> Self {
        Self {
            page_id: item.id,
            title: item.title.clone(),
            lat: item.lat,
            lon: item.lon,
            views: item.views(),
            log_views: item.log_views(),
            dot_size: item.views().max(1),
        }
    }
}

/// Map layer data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    pub points: Vec<MapPoint>,
    /// Items known to the session, shown or not
    pub total_count: usize,
    pub center: Location,
    pub zoom: u8,
    /// Filter applied to the points, in log_views units
    pub range: AbsoluteRange,
    /// Color axis: zero to the largest known log_views
    pub color_range: [f64; 2],
    pub colorscale: Vec<ColorStop>,
    pub hover_template: String,
}

impl MapData {
    /// Map of a collection that has no items yet.
    pub fn empty(center: Location, zoom: u8) -> Self {
        Self {
            points: Vec::new(),
            total_count: 0,
            center,
            zoom,
            range: AbsoluteRange::new(0.0, 0.0),
            color_range: [0.0, 0.0],
            colorscale: colorscale(),
            hover_template: hover_template(HOVER_LABEL),
        }
    }

    /// Rewrite display strings into `language`.
    pub fn localize(&mut self, translator: &dyn Translator, language: Language) {
        self.hover_template = hover_template(&translator.translate(HOVER_LABEL, language));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_view_point_gets_unit_size() {
        let item = Item::new(PageId::new(4), "Pariser Platz", 52.5163, 13.3791, 0);
        let point = MapPoint::from(&item);
        assert_eq!(point.dot_size, 1);
        assert_eq!(point.log_views, 0.0);

        let item = Item::new(PageId::new(5), "Tor", 52.5163, 13.3777, 300);
        assert_eq!(MapPoint::from(&item).dot_size, 300);
    }

    #[test]
    fn test_colorscale_is_ordered() {
        let stops = colorscale();
        assert_eq!(stops.len(), 7);
        assert_eq!(stops.first().unwrap().offset, 0.0);
        assert_eq!(stops.last().unwrap().offset, 1.0);
        assert!(stops.windows(2).all(|w| w[0].offset < w[1].offset));
    }

    #[test]
    fn test_hover_template() {
        assert_eq!(
            hover_template(HOVER_LABEL),
            "<b>%{customdata[0]}</b><br><br>Aufrufe in den letzten 30 Tagen: %{customdata[1]}<extra></extra>"
        );
    }
}
