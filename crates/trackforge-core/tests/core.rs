#[path = "core/bounds.rs"]
mod bounds;
#[path = "core/dimensions.rs"]
mod dimensions;
