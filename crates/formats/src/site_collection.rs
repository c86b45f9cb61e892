//! GeoJSON site datasets.
//!
//! A dataset is a `FeatureCollection` of `Point` features. Records that
//! could not be placed on the map (no id, no usable coordinate) are rejected
//! here so they never reach projection math.

use std::collections::HashSet;

use foundation::geo::LngLat;
use foundation::ids::SiteId;
use serde_json::{Map, Value};
use viewport::Site;

#[derive(Debug)]
pub enum SiteCollectionError {
    /// The payload is not JSON at all.
    Json(serde_json::Error),
    NotAFeatureCollection,
    InvalidSite { index: usize, reason: String },
    DuplicateId { index: usize, id: SiteId },
}

impl std::fmt::Display for SiteCollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteCollectionError::Json(e) => write!(f, "site collection is not valid JSON: {e}"),
            SiteCollectionError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            SiteCollectionError::InvalidSite { index, reason } => {
                write!(f, "invalid site at index {index}: {reason}")
            }
            SiteCollectionError::DuplicateId { index, id } => {
                write!(f, "duplicate site id {id} at index {index}")
            }
        }
    }
}

impl std::error::Error for SiteCollectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SiteCollectionError::Json(e) => Some(e),
            _ => None,
        }
    }
}

pub fn sites_from_geojson_str(payload: &str) -> Result<Vec<Site>, SiteCollectionError> {
    let value: Value = serde_json::from_str(payload).map_err(SiteCollectionError::Json)?;
    sites_from_geojson_value(&value)
}

pub fn sites_from_geojson_value(value: &Value) -> Result<Vec<Site>, SiteCollectionError> {
    let obj = value
        .as_object()
        .ok_or(SiteCollectionError::NotAFeatureCollection)?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or(SiteCollectionError::NotAFeatureCollection)?;
    if ty != "FeatureCollection" {
        return Err(SiteCollectionError::NotAFeatureCollection);
    }
    let features = obj
        .get("features")
        .and_then(|v| v.as_array())
        .ok_or(SiteCollectionError::NotAFeatureCollection)?;

    let mut seen = HashSet::with_capacity(features.len());
    let mut sites = Vec::with_capacity(features.len());
    for (index, feature) in features.iter().enumerate() {
        let site = parse_site(feature)
            .map_err(|reason| SiteCollectionError::InvalidSite { index, reason })?;
        if !seen.insert(site.id.clone()) {
            return Err(SiteCollectionError::DuplicateId { index, id: site.id });
        }
        sites.push(site);
    }
    Ok(sites)
}

fn parse_site(feature: &Value) -> Result<Site, String> {
    let obj = feature
        .as_object()
        .ok_or_else(|| "feature must be an object".to_string())?;
    match obj.get("type").and_then(|v| v.as_str()) {
        Some("Feature") => {}
        Some(other) => return Err(format!("unexpected feature type: {other}")),
        None => return Err("feature missing type".to_string()),
    }

    let properties = match obj.get("properties") {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::Null) | None => Map::new(),
        Some(_) => return Err("properties must be an object".to_string()),
    };

    // The dataset keys sites by `properties.id`; the feature id is a fallback.
    let id = properties
        .get("id")
        .and_then(id_from_value)
        .or_else(|| obj.get("id").and_then(id_from_value))
        .ok_or_else(|| "site has no id".to_string())?;

    let geometry = obj
        .get("geometry")
        .and_then(|v| v.as_object())
        .ok_or_else(|| "feature missing geometry".to_string())?;
    let coordinate = parse_point(geometry)?;

    Ok(Site::new(id, coordinate).with_properties(properties))
}

fn id_from_value(value: &Value) -> Option<SiteId> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(SiteId::new(s.clone())),
        Value::Number(n) => Some(SiteId::new(n.to_string())),
        _ => None,
    }
}

fn parse_point(geometry: &Map<String, Value>) -> Result<LngLat, String> {
    let ty = geometry
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "geometry missing type".to_string())?;
    if ty != "Point" {
        return Err(format!("site geometry must be Point, got {ty}"));
    }
    let coords = geometry
        .get("coordinates")
        .and_then(|v| v.as_array())
        .ok_or_else(|| "Point missing coordinates".to_string())?;
    if coords.len() < 2 {
        return Err("Point coordinates must be [lng, lat]".to_string());
    }
    let lng = coords[0]
        .as_f64()
        .ok_or_else(|| "longitude must be a number".to_string())?;
    let lat = coords[1]
        .as_f64()
        .ok_or_else(|| "latitude must be a number".to_string())?;
    if !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
        return Err(format!("coordinate [{lng}, {lat}] out of range"));
    }
    Ok(LngLat::new(lng, lat))
}

#[cfg(test)]
mod tests {
    use super::{SiteCollectionError, sites_from_geojson_str, sites_from_geojson_value};
    use foundation::geo::LngLat;
    use foundation::ids::SiteId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn point(id: serde_json::Value, lng: f64, lat: f64) -> serde_json::Value {
        json!({
            "type": "Feature",
            "properties": { "id": id, "name": "Site" },
            "geometry": { "type": "Point", "coordinates": [lng, lat] }
        })
    }

    #[test]
    fn parses_point_features_in_order() {
        let fc = json!({
            "type": "FeatureCollection",
            "features": [point(json!("berlin"), 13.4, 52.5), point(json!(7), 2.35, 48.86)]
        });
        let sites = sites_from_geojson_value(&fc).expect("sites");
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].id, SiteId::new("berlin"));
        assert_eq!(sites[0].coordinate, LngLat::new(13.4, 52.5));
        assert_eq!(sites[0].name(), Some("Site"));
        assert_eq!(sites[1].id, SiteId::new("7"));
    }

    #[test]
    fn falls_back_to_feature_id() {
        let fc = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": "outer",
                "properties": null,
                "geometry": { "type": "Point", "coordinates": [1.0, 2.0] }
            }]
        });
        let sites = sites_from_geojson_value(&fc).expect("sites");
        assert_eq!(sites[0].id, SiteId::new("outer"));
        assert!(sites[0].properties.is_empty());
    }

    #[test]
    fn rejects_site_without_id() {
        let fc = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "name": "anonymous" },
                "geometry": { "type": "Point", "coordinates": [1.0, 2.0] }
            }]
        });
        match sites_from_geojson_value(&fc).unwrap_err() {
            SiteCollectionError::InvalidSite { index, reason } => {
                assert_eq!(index, 0);
                assert_eq!(reason, "site has no id".to_string());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_missing_or_bad_coordinates() {
        let cases = [
            json!({ "type": "Feature", "properties": { "id": "x" } }),
            json!({ "type": "Feature", "properties": { "id": "x" },
                    "geometry": { "type": "Point", "coordinates": [1.0] } }),
            json!({ "type": "Feature", "properties": { "id": "x" },
                    "geometry": { "type": "Point", "coordinates": ["a", 2.0] } }),
            json!({ "type": "Feature", "properties": { "id": "x" },
                    "geometry": { "type": "Point", "coordinates": [200.0, 2.0] } }),
            json!({ "type": "Feature", "properties": { "id": "x" },
                    "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] } }),
        ];
        for feature in cases {
            let fc = json!({ "type": "FeatureCollection", "features": [feature] });
            let err = sites_from_geojson_value(&fc).unwrap_err();
            assert!(
                matches!(err, SiteCollectionError::InvalidSite { index: 0, .. }),
                "{err}"
            );
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let fc = json!({
            "type": "FeatureCollection",
            "features": [point(json!("a"), 1.0, 1.0), point(json!("a"), 2.0, 2.0)]
        });
        match sites_from_geojson_value(&fc).unwrap_err() {
            SiteCollectionError::DuplicateId { index, id } => {
                assert_eq!(index, 1);
                assert_eq!(id, SiteId::new("a"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_collections() {
        assert!(matches!(
            sites_from_geojson_str(r#"{ "type": "Feature" }"#).unwrap_err(),
            SiteCollectionError::NotAFeatureCollection
        ));
    }

    #[test]
    fn syntax_errors_are_not_blamed_on_a_feature() {
        let err = sites_from_geojson_str(r#"{ "type": "FeatureCollection", "features": [ "#)
            .unwrap_err();
        assert!(matches!(err, SiteCollectionError::Json(_)), "{err}");
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("site collection is not valid JSON"));
    }
}
