/// 4x4 transformation matrices in the row-vector convention (`v' = v × M`)
///
/// Matrices are plain `nalgebra` values laid out so that `m[(r, c)]` is the
/// entry in row `r + 1`, column `c + 1`. Translation lives in the fourth row,
/// so composing `A × B` applies `A` first.
use nalgebra::{Matrix4, Vector3, Vector4};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn identity() -> Matrix4<f64> {
        Matrix4::identity()
    }

    /// Identity with the fourth row set to `(x, y, z, 1)`
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4<f64> {
        let mut m = Self::identity();
        m[(3, 0)] = x;
        m[(3, 1)] = y;
        m[(3, 2)] = z;
        m
    }

    /// Rotation about the X axis (radians)
    pub fn rotation_x(radians: f64) -> Matrix4<f64> {
        let (sin, cos) = radians.sin_cos();
        let mut m = Self::identity();
        m[(1, 1)] = cos;
        m[(1, 2)] = sin;
        m[(2, 1)] = -sin;
        m[(2, 2)] = cos;
        m
    }

    /// Rotation about the Y axis (radians)
    pub fn rotation_y(radians: f64) -> Matrix4<f64> {
        let (sin, cos) = radians.sin_cos();
        let mut m = Self::identity();
        m[(0, 0)] = cos;
        m[(0, 2)] = -sin;
        m[(2, 0)] = sin;
        m[(2, 2)] = cos;
        m
    }

    pub fn scale(x: f64, y: f64, z: f64) -> Matrix4<f64> {
        Matrix4::from_diagonal(&Vector4::new(x, y, z, 1.0))
    }

    /// Look-at view matrix.
    ///
    /// `up` must be non-zero and not parallel to `eye - target`, otherwise the
    /// result is NaN.
    pub fn view(eye: &Vector3<f64>, target: &Vector3<f64>, up: &Vector3<f64>) -> Matrix4<f64> {
        let z_axis = (eye - target).normalize();
        let x_axis = up.cross(&z_axis).normalize();
        let y_axis = z_axis.cross(&x_axis);

        Matrix4::new(
            x_axis.x, y_axis.x, z_axis.x, 0.0,
            x_axis.y, y_axis.y, z_axis.y, 0.0,
            x_axis.z, y_axis.z, z_axis.z, 0.0,
            -x_axis.dot(eye), -y_axis.dot(eye), -z_axis.dot(eye), 1.0,
        )
    }

    /// Perspective projection. An infinite `far` collapses the depth range term to -1.
    pub fn projection(fov: f64, aspect: f64, near: f64, far: f64) -> Matrix4<f64> {
        let y_scale = 1.0 / (fov * 0.5).tan();
        let x_scale = y_scale / aspect;
        let neg_far_range = if far.is_infinite() {
            -1.0
        } else {
            far / (near - far)
        };

        Matrix4::new(
            x_scale, 0.0, 0.0, 0.0,
            0.0, y_scale, 0.0, 0.0,
            0.0, 0.0, neg_far_range, -1.0,
            0.0, 0.0, near * neg_far_range, 0.0,
        )
    }

    /// Map normalized device coordinates to pixels. Y is flipped so it grows downward.
    pub fn viewport(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        min_depth: f64,
        max_depth: f64,
    ) -> Matrix4<f64> {
        let mut m = Self::identity();
        m[(0, 0)] = width / 2.0;
        m[(1, 1)] = -(height / 2.0);
        m[(2, 2)] = max_depth - min_depth;
        m[(3, 0)] = x + width / 2.0;
        m[(3, 1)] = y + height / 2.0;
        m[(3, 2)] = min_depth;
        m
    }

    /// `a × b`: apply `a`, then `b`
    pub fn multiply(a: &Matrix4<f64>, b: &Matrix4<f64>) -> Matrix4<f64> {
        a * b
    }

    /// Object rotation: about X first, then about Y
    pub fn rotation(about_x: f64, about_y: f64) -> Matrix4<f64> {
        Self::multiply(&Self::rotation_x(about_x), &Self::rotation_y(about_y))
    }

    /// Transform a homogeneous row vector: `v × m`
    pub fn apply(v: &Vector4<f64>, m: &Matrix4<f64>) -> Vector4<f64> {
        m.tr_mul(v)
    }

    /// Transform a point (implicit `w = 1`)
    pub fn apply_point(p: &Vector3<f64>, m: &Matrix4<f64>) -> Vector4<f64> {
        Self::apply(&p.push(1.0), m)
    }
}

/// Divide every component by `w`, including `w` itself
pub fn homogeneous_divide(v: &Vector4<f64>) -> Vector4<f64> {
    v.component_div(&Vector4::repeat(v.w))
}
