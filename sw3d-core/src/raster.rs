/// Scanline rasterizer with depth testing and per-pixel Phong shading
///
/// Triangles arrive in screen space (`x`, `y` in pixels, `z` depth, `w` the
/// clip-space `w` kept for the behind-camera test). Each one is back-face
/// culled, split at its middle vertex into two spans of scanlines and filled
/// left to right. Visible pixels are shaded with a normal interpolated from
/// the three corner normals by barycentric weights.
use log::trace;
use nalgebra::{Vector3, Vector4};

use crate::config::Material;
use crate::error::{IndexError, IndexKind};
use crate::framebuffer::{FrameBuffer, Rgb};
use crate::geometry::Triangle;

/// Counters for one `draw_model` pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    pub drawn: usize,
    pub culled: usize,
    pub rejected: usize,
    pub pixels: usize,
}

/// A triangle corner in screen space with its world-rotated normal
#[derive(Debug, Clone, Copy)]
struct Corner {
    position: Vector4<f64>,
    normal: Vector3<f64>,
}

pub struct Rasterizer {
    light_direction: Vector3<f64>,
    view_direction: Vector3<f64>,
    material: Material,
}

impl Rasterizer {
    pub fn new(light_direction: Vector3<f64>, view_direction: Vector3<f64>, material: Material) -> Self {
        Self {
            light_direction,
            view_direction,
            material,
        }
    }

    /// Rasterize every triangle into `target`.
    ///
    /// Depths are reset to +infinity first; colors are left as they are, so
    /// callers clear the color grid themselves. Fails on the first corner that
    /// references past the end of `vertices` or `normals`. A corner without a
    /// normal contributes a zero normal.
    pub fn draw_model(
        &self,
        vertices: &[Vector4<f64>],
        normals: &[Vector3<f64>],
        triangles: &[Triangle],
        target: &mut FrameBuffer,
    ) -> Result<RasterStats, IndexError> {
        target.depth.reset();
        let mut stats = RasterStats::default();

        for triangle in triangles {
            let mut corners = [Corner {
                position: Vector4::zeros(),
                normal: Vector3::zeros(),
            }; 3];

            for (corner, index) in corners.iter_mut().zip(triangle.corners.iter()) {
                corner.position = *vertices.get(index.vertex).ok_or(IndexError {
                    kind: IndexKind::Vertex,
                    index: index.vertex,
                    len: vertices.len(),
                })?;
                if let Some(n) = index.normal {
                    corner.normal = *normals.get(n).ok_or(IndexError {
                        kind: IndexKind::Normal,
                        index: n,
                        len: normals.len(),
                    })?;
                }
            }

            self.draw_triangle(corners, target, &mut stats);
        }

        trace!("rasterized {:?}", stats);
        Ok(stats)
    }

    fn draw_triangle(&self, corners: [Corner; 3], target: &mut FrameBuffer, stats: &mut RasterStats) {
        let positions = corners.map(|c| c.position);

        if is_back_face(&positions) {
            stats.culled += 1;
            return;
        }

        // Behind the camera, or coordinates the divide turned into NaN/inf
        if positions
            .iter()
            .any(|p| p.w <= 0.0 || !p.x.is_finite() || !p.y.is_finite() || !p.z.is_finite())
        {
            stats.rejected += 1;
            return;
        }

        let mut sorted = corners;
        sorted.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
        let [down, mid, up] = sorted.map(|c| c.position);

        // Only the top edge rejects; everything else is clipped per pixel.
        if down.y < 0.0 {
            stats.rejected += 1;
            return;
        }
        stats.drawn += 1;

        let width = target.width() as i64;
        let height = target.height() as i64;

        let down_y = down.y as i64;
        let mid_y = mid.y as i64;
        let up_y = up.y as i64;

        let total_height = up_y - down_y;
        let first_height = mid_y - down_y;
        let second_height = up_y - mid_y;

        for i in 0..total_height {
            let y = down_y + i;
            if y >= height {
                break;
            }

            let second_half = i > first_height || mid_y == down_y;
            let segment_height = if second_half { second_height } else { first_height };

            let alpha = i as f64 / total_height as f64;
            let mut a = down + (up - down) * alpha;

            let beta = (i - if second_half { first_height } else { 0 }) as f64 / segment_height as f64;
            let mut b = if second_half {
                mid + (up - mid) * beta
            } else {
                down + (mid - down) * beta
            };

            if a.x > b.x {
                std::mem::swap(&mut a, &mut b);
            }

            let delta_x = b.x - a.x + 1.0;
            let x_start = (a.x.floor() as i64).max(0);
            let x_end = (b.x.floor() as i64).min(width - 1);

            for x in x_start..=x_end {
                let p = (x as f64 - a.x) / delta_x;
                let z = a.z + p * (b.z - a.z);

                if target.depth.test_and_set(x, y, z) {
                    let point = Vector3::new(x as f64, y as f64, z);
                    let normal = interpolate_normal(&point, &sorted);
                    target.set_pixel(x, y, self.shade(&normal));
                    stats.pixels += 1;
                }
            }
        }
    }

    /// Ambient + diffuse + specular color for a unit surface normal
    pub fn shade(&self, normal: &Vector3<f64>) -> Rgb {
        let m = &self.material;
        let diffuse = diffuse_term(normal, &self.light_direction);
        let specular = specular_term(normal, &self.light_direction, &self.view_direction);

        let color = m.ambient * m.ambient_weight
            + m.diffuse * (diffuse * m.diffuse_weight)
            + m.specular * specular.powi(m.specular_exponent);

        Rgb::new(channel(color.x), channel(color.y), channel(color.z))
    }
}

fn channel(value: f64) -> u8 {
    // NaN saturates to 0 on the cast
    value.clamp(0.0, 255.0) as u8
}

/// Positive when the screen-space winding is clockwise, i.e. the face points away
fn winding(positions: &[Vector4<f64>; 3]) -> f64 {
    let ab = positions[1] - positions[0];
    let ac = positions[2] - positions[0];
    ab.x * ac.y - ab.y * ac.x
}

pub fn is_back_face(positions: &[Vector4<f64>; 3]) -> bool {
    winding(positions) > 0.0
}

/// `max(0, n·L / |L|²)`
pub fn diffuse_term(normal: &Vector3<f64>, light: &Vector3<f64>) -> f64 {
    (normal.dot(light) / light.norm_squared()).max(0.0)
}

/// `max(0, V·R)` with `R = L - 2(L·n)n`
pub fn specular_term(normal: &Vector3<f64>, light: &Vector3<f64>, view: &Vector3<f64>) -> f64 {
    let reflected = light - normal * (2.0 * light.dot(normal));
    view.dot(&reflected).max(0.0)
}

/// Barycentric weights of `p` from the areas of the sub-triangles it forms with the corners
pub fn barycentric(p: &Vector3<f64>, a: &Vector3<f64>, b: &Vector3<f64>, c: &Vector3<f64>) -> (f64, f64, f64) {
    let area = |p0: &Vector3<f64>, p1: &Vector3<f64>, p2: &Vector3<f64>| (p1 - p0).cross(&(p2 - p0)).norm();

    let full = area(a, b, c);
    if full <= f64::EPSILON {
        return (1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0);
    }
    (area(p, b, c) / full, area(a, p, c) / full, area(a, b, p) / full)
}

fn interpolate_normal(point: &Vector3<f64>, corners: &[Corner; 3]) -> Vector3<f64> {
    let [a, b, c] = corners.map(|c| c.position.xyz());
    let (u, v, w) = barycentric(point, &a, &b, &c);
    (corners[0].normal * u + corners[1].normal * v + corners[2].normal * w)
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}
