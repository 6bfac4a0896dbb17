/// Rendering context: owns the mesh, the frame buffers and the per-frame scratch space
use std::time::Instant;

use log::{debug, info, warn};
use nalgebra::{Vector3, Vector4};

use crate::camera::CameraState;
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::framebuffer::FrameBuffer;
use crate::geometry::Mesh;
use crate::pipeline::TransformPipeline;
use crate::raster::{RasterStats, Rasterizer};

pub struct Renderer {
    mesh: Mesh,
    config: RenderConfig,
    pipeline: TransformPipeline,
    framebuffer: FrameBuffer,
    screen_vertices: Vec<Vector4<f64>>,
    world_normals: Vec<Vector3<f64>>,
    stats: RasterStats,
}

impl Renderer {
    /// Validate the configuration and the mesh's face references, then
    /// allocate buffers. Corners without normals get flat face normals.
    pub fn new(mesh: Mesh, config: RenderConfig) -> Result<Self> {
        config.validate().map_err(Error::Config)?;
        let mesh = mesh.with_face_normals();
        mesh.validate_indices()?;

        info!(
            "renderer ready: {} vertices, {} normals, {} triangles at {}x{}",
            mesh.vertices.len(),
            mesh.normals.len(),
            mesh.triangles.len(),
            config.width,
            config.height
        );

        Ok(Self {
            pipeline: TransformPipeline::new(&config),
            framebuffer: FrameBuffer::new(config.width, config.height),
            screen_vertices: Vec::with_capacity(mesh.vertices.len()),
            world_normals: Vec::with_capacity(mesh.normals.len()),
            stats: RasterStats::default(),
            mesh,
            config,
        })
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The most recently finished frame
    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    /// Triangle and pixel counters of the most recently finished frame
    pub fn stats(&self) -> RasterStats {
        self.stats
    }

    /// Change the output size; the next frame is drawn at the new size
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        let config = RenderConfig {
            width,
            height,
            ..self.config.clone()
        };
        config.validate().map_err(Error::Config)?;

        self.pipeline = TransformPipeline::new(&config);
        self.framebuffer = FrameBuffer::new(width, height);
        self.config = config;
        Ok(())
    }

    /// Draw one complete frame: clear, transform, rasterize.
    ///
    /// A degenerate camera is refused with a warning and the previous frame
    /// is left intact.
    pub fn render(&mut self, camera: &CameraState) -> Result<&FrameBuffer> {
        if let Err(e) = camera.validate() {
            warn!("skipping frame: {}", e);
            return Err(e);
        }

        let start = Instant::now();

        self.pipeline
            .transform_vertices(&self.mesh.vertices, camera, &mut self.screen_vertices);
        self.pipeline
            .transform_normals(&self.mesh.normals, camera, &mut self.world_normals);

        let rasterizer = Rasterizer::new(
            self.config.light_direction,
            camera.view_direction(),
            self.config.material.clone(),
        );

        self.framebuffer.clear(self.config.background);
        let stats = rasterizer.draw_model(
            &self.screen_vertices,
            &self.world_normals,
            &self.mesh.triangles,
            &mut self.framebuffer,
        )?;

        debug!(
            "frame: {} drawn, {} culled, {} rejected, {} pixels in {:?}",
            stats.drawn,
            stats.culled,
            stats.rejected,
            stats.pixels,
            start.elapsed()
        );
        self.stats = stats;
        Ok(&self.framebuffer)
    }
}
