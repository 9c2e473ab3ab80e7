/// Player input, applied at the start of the tick it is scheduled for.
#[derive(Clone, Debug)]
pub enum DefenseAction {
    /// Absolute pointer position in field coordinates; no camera transform.
    PointerMoved { x: f32, y: f32 },
    /// Attempt to build on the tile currently under the pointer. Invalid
    /// attempts (no active tile, tile occupied) are silent no-ops.
    PlaceBuilding,
}
