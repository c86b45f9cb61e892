use std::rc::Rc;

use foundation::geo::LngLat;
use foundation::ids::SiteId;
use foundation::math::Vec2;
use serde::Serialize;
use serde_json::{Map, Value};

/// A map site as loaded from the dataset. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
    pub id: SiteId,
    pub coordinate: LngLat,
    /// Display properties, passed through to the popup presenter untouched.
    pub properties: Map<String, Value>,
}

impl Site {
    pub fn new(id: impl Into<SiteId>, coordinate: LngLat) -> Self {
        Self {
            id: id.into(),
            coordinate,
            properties: Map::new(),
        }
    }

    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }
}

/// A site together with its position under the current viewport transform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedSite {
    pub site: Rc<Site>,
    pub pixel: Vec2,
}

/// The selected site, positioned for popup display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupCandidate {
    pub site: Rc<Site>,
    /// Marker position in pixels.
    pub pixel: Vec2,
    /// Where the popup should be anchored, in pixels.
    pub anchor: Vec2,
}
