use crate::totals::LocationTotals;

/// Kind of object a hover pick resolved to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PickingType {
    Location,
    Flow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationPick {
    pub id: String,
    pub name: String,
    pub totals: LocationTotals,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowPick {
    pub origin: String,
    pub dest: String,
    pub count: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PickedObject {
    Location(LocationPick),
    Flow(FlowPick),
}

impl PickedObject {
    pub fn picking_type(&self) -> PickingType {
        match self {
            PickedObject::Location(_) => PickingType::Location,
            PickedObject::Flow(_) => PickingType::Flow,
        }
    }
}

/// Hover notification from the flow layer.
///
/// `x`/`y` are screen pixels relative to the canvas. `object` is `None`
/// when the pointer is over no interactive shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PickInfo {
    pub x: f64,
    pub y: f64,
    pub object: Option<PickedObject>,
}

impl PickInfo {
    pub fn empty(x: f64, y: f64) -> Self {
        Self { x, y, object: None }
    }

    pub fn picking_type(&self) -> Option<PickingType> {
        self.object.as_ref().map(PickedObject::picking_type)
    }
}
