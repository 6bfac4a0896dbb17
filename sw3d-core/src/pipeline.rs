/// Model-space to screen-space vertex transformation
use nalgebra::{Matrix4, Vector3, Vector4};

use crate::camera::CameraState;
use crate::config::RenderConfig;
use crate::transform::{homogeneous_divide, Transform};

/// The fixed-order transform chain for one output size and lens
#[derive(Debug, Clone)]
pub struct TransformPipeline {
    width: f64,
    height: f64,
    aspect: f64,
    fov: f64,
    near: f64,
    far: f64,
    model_scale: f64,
}

impl TransformPipeline {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            width: config.width as f64,
            height: config.height as f64,
            aspect: config.aspect(),
            fov: config.fov,
            near: config.near,
            far: config.far,
            model_scale: config.model_scale,
        }
    }

    pub fn projection_matrix(&self) -> Matrix4<f64> {
        Transform::projection(self.fov, self.aspect, self.near, self.far)
    }

    pub fn viewport_matrix(&self) -> Matrix4<f64> {
        Transform::viewport(0.0, 0.0, self.width, self.height, 0.0, 1.0)
    }

    /// `Scale × RotationX × RotationY × Translation × View × Projection`
    pub fn model_view_projection(&self, camera: &CameraState) -> Matrix4<f64> {
        let model_view = Transform::multiply(&camera.model_matrix(self.model_scale), &camera.view_matrix());
        Transform::multiply(&model_view, &self.projection_matrix())
    }

    /// Project one model-space point to the screen.
    ///
    /// `x`, `y` are pixels and `z` is depth in `[0, 1]` for points between the
    /// clip planes. `w` carries the clip-space `w` so that points behind the
    /// camera (`w <= 0`) can be recognised after the divide.
    pub fn project(&self, point: &Vector3<f64>, mvp: &Matrix4<f64>, viewport: &Matrix4<f64>) -> Vector4<f64> {
        let clip = Transform::apply_point(point, mvp);
        let ndc = homogeneous_divide(&clip);
        let mut screen = Transform::apply(&ndc, viewport);
        screen.w = clip.w;
        screen
    }

    /// Replace `out` with the screen-space form of every vertex, in order
    pub fn transform_vertices(&self, vertices: &[Vector3<f64>], camera: &CameraState, out: &mut Vec<Vector4<f64>>) {
        let mvp = self.model_view_projection(camera);
        let viewport = self.viewport_matrix();

        out.clear();
        out.extend(vertices.iter().map(|v| self.project(v, &mvp, &viewport)));
    }

    /// Replace `out` with every normal rotated by the object rotation and renormalized
    pub fn transform_normals(&self, normals: &[Vector3<f64>], camera: &CameraState, out: &mut Vec<Vector3<f64>>) {
        let rotation = camera.rotation_matrix();

        out.clear();
        out.extend(normals.iter().map(|n| {
            Transform::apply(&n.push(0.0), &rotation)
                .xyz()
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::zeros)
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn pipeline() -> TransformPipeline {
        TransformPipeline::new(&RenderConfig::with_size(800, 600))
    }

    #[test]
    fn test_projection_uses_configured_aspect() {
        let config = RenderConfig::with_size(320, 100);
        let expected = Transform::projection(config.fov, 3.2, config.near, config.far);
        let actual = TransformPipeline::new(&config).projection_matrix();
        assert!((actual - expected).norm() < 1e-12);
        assert!((actual[(1, 1)] / actual[(0, 0)] - 3.2).abs() < 1e-12);
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let mut out = Vec::new();
        pipeline().transform_vertices(&[Vector3::zeros()], &CameraState::default(), &mut out);

        let p = out[0];
        assert!((p.x - 400.0).abs() < 1e-9);
        assert!((p.y - 300.0).abs() < 1e-9);
        assert!(p.z > 0.0 && p.z < 1.0);
        assert!((p.w - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_offset_vertex_lands_at_expected_pixel() {
        let mut out = Vec::new();
        pipeline().transform_vertices(
            &[Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)],
            &CameraState::default(),
            &mut out,
        );

        let y_scale = 1.0 / (PI / 16.0).tan();
        let x_scale = y_scale / (800.0 / 600.0);
        // Model scale 0.4, eye 12 units away
        assert!((out[0].x - (400.0 + 400.0 * 0.4 * x_scale / 12.0)).abs() < 1e-9);
        assert!((out[0].y - 300.0).abs() < 1e-9);
        // +Y is up in the world, so it goes up the screen
        assert!((out[1].y - (300.0 - 300.0 * 0.4 * y_scale / 12.0)).abs() < 1e-9);
    }

    #[test]
    fn test_nearer_points_get_smaller_depth() {
        let mut out = Vec::new();
        pipeline().transform_vertices(
            &[Vector3::new(0.0, 0.0, -1.0), Vector3::new(0.0, 0.0, 1.0)],
            &CameraState::default(),
            &mut out,
        );
        assert!(out[1].z < out[0].z);
    }

    #[test]
    fn test_point_behind_camera_has_negative_w() {
        let mut out = Vec::new();
        // 0.4 * 50 = 20 units along +Z puts it behind the eye at z = 12
        pipeline().transform_vertices(&[Vector3::new(0.0, 0.0, 50.0)], &CameraState::default(), &mut out);
        assert!(out[0].w < 0.0);
    }

    #[test]
    fn test_transform_is_deterministic() {
        let mut camera = CameraState::default();
        camera.rotation_x = 0.3;
        camera.rotation_y = -1.1;
        camera.object_position = Vector3::new(1.0, 2.0, 3.0);

        let vertices = [Vector3::new(1.0, -2.0, 0.5), Vector3::new(-3.0, 0.0, 2.0)];
        let (mut a, mut b) = (Vec::new(), Vec::new());
        pipeline().transform_vertices(&vertices, &camera, &mut a);
        pipeline().transform_vertices(&vertices, &camera, &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_normals_rotate_without_translation() {
        let mut camera = CameraState::default();
        camera.rotation_y = FRAC_PI_2;
        camera.object_position = Vector3::new(100.0, 0.0, 0.0);

        let mut out = Vec::new();
        pipeline().transform_normals(&[Vector3::new(0.0, 0.0, 3.0)], &camera, &mut out);
        assert!((out[0] - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-9);
    }
}
