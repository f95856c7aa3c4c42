//! Geometry primitives for the display object and pointer picking
use nalgebra::{Point2, Point3, Vector3};

/// Determinant threshold below which a ray is treated as parallel to a face
const PARALLEL_EPSILON: f32 = 1e-7;

/// A 3D vertex with position and texture coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub uv: Point2<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, u: f32, v: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            uv: Point2::new(u, v),
        }
    }
}

/// A ray cast into the scene, usually from a pointer through the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }
}

/// Where a ray struck a mesh: interpolated texture coordinate and ray distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshHit {
    pub uv: Point2<f32>,
    pub distance: f32,
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Möller–Trumbore intersection. Faces are double sided.
    pub fn intersect(&self, ray: &Ray) -> Option<MeshHit> {
        let [a, b, c] = &self.vertices;
        let edge1 = b.position - a.position;
        let edge2 = c.position - a.position;

        let p = ray.direction.cross(&edge2);
        let det = edge1.dot(&p);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = ray.origin - a.position;
        let w1 = s.dot(&p) * inv_det;
        if !(0.0..=1.0).contains(&w1) {
            return None;
        }

        let q = s.cross(&edge1);
        let w2 = ray.direction.dot(&q) * inv_det;
        if w2 < 0.0 || w1 + w2 > 1.0 {
            return None;
        }

        let t = edge2.dot(&q) * inv_det;
        if t < 0.0 {
            return None;
        }

        let w0 = 1.0 - w1 - w2;
        let uv = Point2::from(a.uv.coords * w0 + b.uv.coords * w1 + c.uv.coords * w2);

        Some(MeshHit {
            uv,
            distance: t * ray.direction.norm(),
        })
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Nearest intersection of `ray` with any triangle
    pub fn intersect(&self, ray: &Ray) -> Option<MeshHit> {
        self.triangles
            .iter()
            .filter_map(|triangle| triangle.intersect(ray))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Axis-aligned bounds as (min, max), or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut vertices = self.triangles.iter().flat_map(|t| t.vertices.iter());
        let first = vertices.next()?.position;
        Some(vertices.fold((first, first), |(min, max), v| {
            (min.inf(&v.position), max.sup(&v.position))
        }))
    }

    /// A flat face in the XY plane facing +Z, centered on the origin.
    ///
    /// UVs run (0,0) at the bottom-left corner to (1,1) at the top-right,
    /// so a portrait face (`height > width`) holds a landscape surface
    /// rotated a quarter turn.
    pub fn display_quad(width: f32, height: f32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        let mut mesh = Self::with_capacity(2);

        mesh.add_triangle(Triangle::new(
            Vertex::new(-hw, -hh, 0.0, 0.0, 0.0),
            Vertex::new(hw, -hh, 0.0, 1.0, 0.0),
            Vertex::new(hw, hh, 0.0, 1.0, 1.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hw, -hh, 0.0, 0.0, 0.0),
            Vertex::new(hw, hh, 0.0, 1.0, 1.0),
            Vertex::new(-hw, hh, 0.0, 0.0, 1.0),
        ));

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward_ray(x: f32, y: f32) -> Ray {
        Ray::new(Point3::new(x, y, 5.0), Vector3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_quad_center_hit() {
        let quad = Mesh::display_quad(2.0, 4.0);
        let hit = quad.intersect(&forward_ray(0.0, 0.0)).unwrap();
        assert!((hit.uv.x - 0.5).abs() < 1e-5);
        assert!((hit.uv.y - 0.5).abs() < 1e-5);
        assert!((hit.distance - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_quad_uv_interpolation() {
        let quad = Mesh::display_quad(2.0, 4.0);
        // Quarter of the way across, three quarters up
        let hit = quad.intersect(&forward_ray(-0.5, 1.0)).unwrap();
        assert!((hit.uv.x - 0.25).abs() < 1e-5);
        assert!((hit.uv.y - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_miss_outside_and_behind() {
        let quad = Mesh::display_quad(2.0, 4.0);
        assert!(quad.intersect(&forward_ray(3.0, 0.0)).is_none());

        let away = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(quad.intersect(&away).is_none());

        let parallel = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(quad.intersect(&parallel).is_none());
    }

    #[test]
    fn test_nearest_hit_wins() {
        let mut mesh = Mesh::display_quad(2.0, 2.0);
        let far = Mesh::display_quad(2.0, 2.0);
        for mut triangle in far.triangles {
            for vertex in &mut triangle.vertices {
                vertex.position.z = -1.0;
                vertex.uv = Point2::new(0.0, 0.0);
            }
            mesh.add_triangle(triangle);
        }
        let hit = mesh.intersect(&forward_ray(0.2, 0.2)).unwrap();
        assert!((hit.distance - 5.0).abs() < 1e-5);
        assert!(hit.uv.x > 0.0);
    }

    #[test]
    fn test_bounds() {
        let quad = Mesh::display_quad(2.0, 4.0);
        let (min, max) = quad.bounds().unwrap();
        assert_eq!(min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 2.0, 0.0));
        assert!(Mesh::new().bounds().is_none());
    }
}
