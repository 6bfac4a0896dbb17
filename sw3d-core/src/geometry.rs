/// Mesh data model: vertex and normal lists plus indexed triangles
use nalgebra::Vector3;

use crate::error::{IndexError, IndexKind};

/// One triangle corner: a vertex index and an independent normal index (both 0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleIndexPair {
    pub vertex: usize,
    pub normal: Option<usize>,
}

impl TriangleIndexPair {
    pub fn new(vertex: usize, normal: usize) -> Self {
        Self {
            vertex,
            normal: Some(normal),
        }
    }

    pub fn without_normal(vertex: usize) -> Self {
        Self {
            vertex,
            normal: None,
        }
    }
}

/// A triangle face defined by three indexed corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub corners: [TriangleIndexPair; 3],
}

impl Triangle {
    pub fn new(a: TriangleIndexPair, b: TriangleIndexPair, c: TriangleIndexPair) -> Self {
        Self {
            corners: [a, b, c],
        }
    }
}

/// Fan-triangulate a polygon: `n` corners give `n - 2` triangles sharing corner 0.
pub fn triangulate(corners: &[TriangleIndexPair]) -> Vec<Triangle> {
    let n = corners.len();
    if n < 3 {
        return Vec::new();
    }
    (0..n - 2)
        .map(|k| Triangle::new(corners[0], corners[(1 + k) % n], corners[(2 + k) % n]))
        .collect()
}

/// An indexed triangle mesh. Built once at load time and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vector3<f64>>,
    pub normals: Vec<Vector3<f64>>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(
        vertices: Vec<Vector3<f64>>,
        normals: Vec<Vector3<f64>>,
        triangles: Vec<Triangle>,
    ) -> Self {
        Self {
            vertices,
            normals,
            triangles,
        }
    }

    /// Check every corner against the vertex and normal lists
    pub fn validate_indices(&self) -> Result<(), IndexError> {
        for triangle in &self.triangles {
            for corner in &triangle.corners {
                if corner.vertex >= self.vertices.len() {
                    return Err(IndexError {
                        kind: IndexKind::Vertex,
                        index: corner.vertex,
                        len: self.vertices.len(),
                    });
                }
                if let Some(normal) = corner.normal {
                    if normal >= self.normals.len() {
                        return Err(IndexError {
                            kind: IndexKind::Normal,
                            index: normal,
                            len: self.normals.len(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Give every corner that lacks a normal the flat normal of its triangle.
    ///
    /// Generated normals are appended to the normal list, one per affected
    /// triangle. Triangles with out-of-range vertex indices are left untouched.
    pub fn with_face_normals(mut self) -> Self {
        for t in 0..self.triangles.len() {
            let triangle = self.triangles[t];
            if triangle.corners.iter().all(|c| c.normal.is_some()) {
                continue;
            }

            let positions: Option<Vec<Vector3<f64>>> = triangle
                .corners
                .iter()
                .map(|c| self.vertices.get(c.vertex).copied())
                .collect();
            let Some(p) = positions else {
                continue;
            };

            let normal = (p[1] - p[0])
                .cross(&(p[2] - p[0]))
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::zeros);
            let index = self.normals.len();
            self.normals.push(normal);

            for corner in &mut self.triangles[t].corners {
                if corner.normal.is_none() {
                    corner.normal = Some(index);
                }
            }
        }
        self
    }

    /// An axis-aligned cube centered on the origin with outward, counter-clockwise faces
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let vertices = vec![
            Vector3::new(-h, -h, -h),
            Vector3::new(h, -h, -h),
            Vector3::new(h, h, -h),
            Vector3::new(-h, h, -h),
            Vector3::new(-h, -h, h),
            Vector3::new(h, -h, h),
            Vector3::new(h, h, h),
            Vector3::new(-h, h, h),
        ];
        let normals = vec![
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
        ];
        let faces: [([usize; 4], usize); 6] = [
            ([4, 5, 6, 7], 0), // front
            ([1, 0, 3, 2], 1), // back
            ([3, 7, 6, 2], 2), // top
            ([0, 1, 5, 4], 3), // bottom
            ([1, 2, 6, 5], 4), // right
            ([0, 4, 7, 3], 5), // left
        ];

        let mut triangles = Vec::with_capacity(12);
        for (quad, normal) in faces {
            let corners: Vec<TriangleIndexPair> = quad
                .iter()
                .map(|&v| TriangleIndexPair::new(v, normal))
                .collect();
            triangles.extend(triangulate(&corners));
        }

        Self::new(vertices, normals, triangles)
    }
}
