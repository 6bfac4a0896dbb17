/// SW3D Core Library - software 3D rendering pipeline
///
/// This library turns an OBJ-style mesh description into a packed color
/// buffer entirely on the CPU: matrix transforms, perspective divide,
/// scanline rasterization with a depth buffer and per-pixel Phong shading.

pub mod camera;
pub mod config;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod obj;
pub mod pipeline;
pub mod raster;
pub mod renderer;
pub mod transform;

// Re-export commonly used types
pub use camera::{CameraState, ControlCommand};
pub use config::{Material, RenderConfig};
pub use error::{Error, IndexError, ParseError, Result};
pub use framebuffer::{DepthBuffer, FrameBuffer, Rgb};
pub use geometry::{Mesh, Triangle, TriangleIndexPair};
pub use pipeline::TransformPipeline;
pub use raster::Rasterizer;
pub use renderer::Renderer;
pub use transform::Transform;
