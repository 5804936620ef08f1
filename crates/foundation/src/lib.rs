pub mod bounds;
pub mod camera;
pub mod math;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use camera::*;
