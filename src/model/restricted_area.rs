use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::geo::Point;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictedArea {
    pub name: String,
    /// Implicitly closed: the last vertex connects back to the first.
    pub polygon: Vec<Point>,
}

impl RestrictedArea {
    pub fn new(name: impl Into<String>, polygon: Vec<Point>) -> Result<Self, EngineError> {
        let name = name.into();
        if polygon.len() < 3 {
            return Err(EngineError::InvalidGeometry(format!(
                "restricted area '{}' polygon has {} vertices, need >= 3",
                name,
                polygon.len()
            )));
        }
        Ok(Self { name, polygon })
    }
}
