use slotmap::SecondaryMap;

use crate::math::Point2;

use super::face::LoopId;

slotmap::new_key_type! {
    /// Unique identifier for a UV layer in the mesh store.
    pub struct UvLayerId;
}

/// A named set of per-loop UV coordinates.
///
/// Loops without an entry have no UV data in this layer.
#[derive(Debug, Clone)]
pub struct UvLayerData {
    /// Layer name, as shown by the host application.
    pub name: String,
    /// UV coordinate of each loop.
    pub coords: SecondaryMap<LoopId, Point2>,
}

impl UvLayerData {
    /// Creates an empty layer.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coords: SecondaryMap::new(),
        }
    }
}
