//! The display object the surface is projected onto
use nalgebra::{Isometry3, Matrix4, Translation3, UnitQuaternion, Vector3};

use crate::geometry::{Mesh, MeshHit, Ray};

/// Anything a pointer ray can be tested against.
///
/// Supplied by the scene provider; the mapper only needs the UV of the
/// nearest hit.
pub trait DisplayMesh {
    fn intersect(&self, ray: &Ray) -> Option<MeshHit>;
}

impl DisplayMesh for Mesh {
    fn intersect(&self, ray: &Ray) -> Option<MeshHit> {
        Mesh::intersect(self, ray)
    }
}

/// Euler orientation (radians, applied Z·Y·X) plus a world position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub angles: Vector3<f32>,
    pub translation: Vector3<f32>,
}

impl Pose {
    pub fn new(angles: Vector3<f32>, translation: Vector3<f32>) -> Self {
        Self {
            angles,
            translation,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.angles += Vector3::new(dx, dy, dz);
    }

    pub fn isometry(&self) -> Isometry3<f32> {
        let rotation =
            UnitQuaternion::from_euler_angles(self.angles.x, self.angles.y, self.angles.z);
        Isometry3::from_parts(Translation3::from(self.translation), rotation)
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.isometry().to_homogeneous()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }
}

/// A mesh placed in the world. Rays are moved into mesh-local space
/// before intersecting, so the reported distance stays in world units.
#[derive(Debug, Clone)]
pub struct DisplayObject {
    pub mesh: Mesh,
    pub pose: Pose,
}

impl DisplayObject {
    pub fn new(mesh: Mesh, pose: Pose) -> Self {
        Self { mesh, pose }
    }
}

impl DisplayMesh for DisplayObject {
    fn intersect(&self, ray: &Ray) -> Option<MeshHit> {
        let inverse = self.pose.isometry().inverse();
        let local = Ray::new(
            inverse.transform_point(&ray.origin),
            inverse.transform_vector(&ray.direction),
        );
        self.mesh.intersect(&local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_pose_rotates_before_translating() {
        let pose = Pose::new(
            Vector3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
            Vector3::new(10.0, 0.0, 0.0),
        );
        let moved = pose.model_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((moved - Point3::new(10.0, 1.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_rotated_object_hit() {
        // Face turned to look down +X, moved away from the origin
        let object = DisplayObject::new(
            Mesh::display_quad(2.0, 2.0),
            Pose::new(
                Vector3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
                Vector3::new(3.0, 0.0, 0.0),
            ),
        );
        let ray = Ray::new(Point3::new(8.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0));
        let hit = object.intersect(&ray).unwrap();
        assert!((hit.distance - 5.0).abs() < 1e-4);
        assert!((hit.uv.x - 0.5).abs() < 1e-4);
        assert!((hit.uv.y - 0.5).abs() < 1e-4);

        let head_on = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(object.intersect(&head_on).is_none());
    }
}
