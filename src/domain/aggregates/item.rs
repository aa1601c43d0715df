//! Shippable item: a read-only snapshot of a catalog product's package measurements

use crate::domain::value_objects::{Dimensions, DimensionsError};

#[derive(Clone, Debug, PartialEq)]
pub struct ShippableItem {
    id: String,
    dimensions: Dimensions,
}

impl ShippableItem {
    pub fn new(id: impl Into<String>, dimensions: Dimensions) -> Self { Self { id: id.into(), dimensions } }

    pub fn from_measurements(id: impl Into<String>, height: Option<f64>, width: Option<f64>, length: Option<f64>, weight: Option<f64>) -> Result<Self, DimensionsError> {
        Ok(Self::new(id, Dimensions::from_parts(height, width, length, weight)?))
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn dimensions(&self) -> &Dimensions { &self.dimensions }
}
