//! WebGPU rendering module
//!
//! The scene is tessellated into colored triangles in field coordinates,
//! then mapped to clip space on upload.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::scene;
pub use vertex::Vertex;
