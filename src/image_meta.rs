//! Image metadata and recognition projection
//!
//! Turns the EXIF-style metadata payload and the recognition-label payload
//! into flat display records, and derives a map coordinate from the GPS
//! fields when both are present.

use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

/// Metadata field names feeding coordinate derivation
const GPS_LATITUDE_KEY: &str = "GPSLatitude";
const GPS_LONGITUDE_KEY: &str = "GPSLongitude";

/// One metadata field, value stringified for display
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMetadataRecord {
    pub key: String,
    pub value: String,
}

/// One recognition label with rounded percent confidence
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionLabel {
    pub word: String,
    pub confidence_percent: u8,
}

/// Decimal-degree coordinate pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct RecognitionPayload {
    #[serde(rename = "Labels", default)]
    labels: Vec<RecognitionEntry>,
}

#[derive(Debug, Deserialize)]
struct RecognitionEntry {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Confidence", default)]
    confidence: f64,
}

/// Project the metadata payload: every field of the first record in the
/// payload's list, values stringified. An empty list yields no records.
pub fn project_metadata(payload: &Value) -> Vec<ImageMetadataRecord> {
    let Some(first) = payload.as_array().and_then(|records| records.first()) else {
        return Vec::new();
    };
    let Some(fields) = first.as_object() else {
        return Vec::new();
    };
    fields
        .iter()
        .map(|(key, value)| ImageMetadataRecord {
            key: key.clone(),
            value: stringify(value),
        })
        .collect()
}

/// JSON value to display text: strings unquoted, everything else as JSON
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse raw metadata bytes and project them
pub fn parse_metadata(bytes: &[u8]) -> Result<Vec<ImageMetadataRecord>> {
    let payload: Value = serde_json::from_slice(bytes).map_err(Error::Payload)?;
    Ok(project_metadata(&payload))
}

/// Parse raw recognition bytes into labels, confidence rounded to integer
/// percent
pub fn parse_labels(bytes: &[u8]) -> Result<Vec<RecognitionLabel>> {
    let payload: RecognitionPayload = serde_json::from_slice(bytes).map_err(Error::Payload)?;
    Ok(payload
        .labels
        .into_iter()
        .map(|entry| RecognitionLabel {
            word: entry.name,
            confidence_percent: entry.confidence.round().clamp(0.0, 100.0) as u8,
        })
        .collect())
}

/// Derive a coordinate pair from projected metadata. Both GPS fields must be
/// present and parse; otherwise there is no coordinate and no map marker.
pub fn derive_coordinates(records: &[ImageMetadataRecord]) -> Option<GeoCoordinates> {
    let field = |key: &str| {
        records
            .iter()
            .find(|record| record.key == key)
            .map(|record| record.value.as_str())
    };
    let latitude = exif_to_decimal(field(GPS_LATITUDE_KEY)?)?;
    let longitude = exif_to_decimal(field(GPS_LONGITUDE_KEY)?)?;
    Some(GeoCoordinates {
        latitude,
        longitude,
    })
}

/// Convert an EXIF degrees/minutes/seconds rendering to decimal degrees.
///
/// Accepts the common textual forms: `40 deg 26' 46.30" N`, `40° 26' 46.3"`,
/// or an already-decimal `40.446`. A trailing `S` or `W` hemisphere negates
/// the value. Returns `None` when no numeric component is found.
pub fn exif_to_decimal(text: &str) -> Option<f64> {
    let mut components: Vec<f64> = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_ascii_digit() || ch == '.' || (ch == '-' && current.is_empty()) {
            current.push(ch);
        } else if !current.is_empty() {
            if let Ok(n) = current.parse() {
                components.push(n);
            }
            current.clear();
        }
    }
    if !current.is_empty() {
        if let Ok(n) = current.parse() {
            components.push(n);
        }
    }

    let degrees = *components.first()?;
    let minutes = components.get(1).copied().unwrap_or(0.0);
    let seconds = components.get(2).copied().unwrap_or(0.0);

    let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
    let southern_or_western = text
        .trim_end()
        .chars()
        .last()
        .is_some_and(|c| matches!(c, 'S' | 's' | 'W' | 'w'));
    let sign = if degrees < 0.0 || southern_or_western {
        -1.0
    } else {
        1.0
    };
    Some(sign * magnitude)
}
