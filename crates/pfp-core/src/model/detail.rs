use serde::{Deserialize, Serialize};

/// Full record of one registry for a person, with its life events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDetail {
    /// Name as recorded by the registry.
    pub label: String,
    #[serde(rename = "subject")]
    pub subject_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// A dated biographical occurrence, optionally tied to a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_place: Option<RelatedPlace>,
}

impl Event {
    /// Start and end joined with an en-dash when both are present,
    /// otherwise whichever one exists.
    pub fn date_text(&self) -> Option<String> {
        let start = self.start_date.as_deref().filter(|s| !s.is_empty());
        let end = self.end_date.as_deref().filter(|s| !s.is_empty());
        match (start, end) {
            (Some(s), Some(e)) => Some(format!("{s} – {e}")),
            (Some(d), None) | (None, Some(d)) => Some(d.to_string()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedPlace {
    pub label: String,
    #[serde(rename = "lat", alias = "latitude")]
    pub latitude: f64,
    #[serde(rename = "long", alias = "longitude")]
    pub longitude: f64,
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

impl RelatedPlace {
    /// Finite and within WGS84 bounds.
    pub fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Response body of a detail document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailDocument {
    #[serde(default)]
    pub sources: Vec<SourceDetail>,
}
