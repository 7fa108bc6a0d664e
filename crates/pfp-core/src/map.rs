use serde::Serialize;

use crate::config::MapConfig;
use crate::model::{Event, RelatedPlace};

/// Embeddable map centred on an event's place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPreview {
    pub url: String,
    pub caption: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Build the embed URL for a coordinate pair.
pub fn embed_url(config: &MapConfig, latitude: f64, longitude: f64) -> String {
    format!(
        "{}?q={latitude},{longitude}&hl={}&z={}&output=embed",
        config.base_url, config.locale, config.zoom
    )
}

pub fn place_preview(config: &MapConfig, place: &RelatedPlace) -> Option<MapPreview> {
    if !place.has_valid_coordinates() {
        return None;
    }
    Some(MapPreview {
        url: embed_url(config, place.latitude, place.longitude),
        caption: place.label.clone(),
        latitude: place.latitude,
        longitude: place.longitude,
    })
}

/// Map preview for an event, if it has a place with usable coordinates.
pub fn event_preview(config: &MapConfig, event: &Event) -> Option<MapPreview> {
    event
        .related_place
        .as_ref()
        .and_then(|place| place_preview(config, place))
}
