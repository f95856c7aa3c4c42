//! Pointer ray → mesh UV → rotated surface pixel
//!
//! The surface is displayed a quarter turn rotated on the mesh face, so a
//! landscape buffer fits a portrait face. The same rotation is used for
//! texture sampling and for hit-testing; `uv_to_surface` and
//! `surface_to_uv` are the only places it is spelled out.
use nalgebra::Point2;

use crate::calibration::SurfaceCalibration;
use crate::geometry::Ray;
use crate::scene::DisplayMesh;

/// A pointer position in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub x: f32,
    pub y: f32,
    /// False when the mesh was hit outside the calibration rectangle
    pub on_surface: bool,
}

impl SurfacePoint {
    pub fn off_surface() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            on_surface: false,
        }
    }
}

/// Normalized, calibrated (u, v) → surface pixel.
///
/// Axis swap plus a flip of one axis. Found against the display mesh's UV
/// layout; a differently unwrapped mesh needs its own convention.
pub fn uv_to_surface(u: f32, v: f32, width: f32, height: f32) -> (f32, f32) {
    ((1.0 - v) * width, u * height)
}

/// Exact inverse of [`uv_to_surface`]
pub fn surface_to_uv(x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
    (y / height, 1.0 - x / width)
}

#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    width: f32,
    height: f32,
    calibration: SurfaceCalibration,
}

impl CoordinateMapper {
    pub fn new(width: u32, height: u32, calibration: SurfaceCalibration) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            calibration,
        }
    }

    pub fn calibration(&self) -> &SurfaceCalibration {
        &self.calibration
    }

    pub fn calibration_mut(&mut self) -> &mut SurfaceCalibration {
        &mut self.calibration
    }

    /// Map a pointer ray onto the surface.
    ///
    /// `None` means no interaction at all: no ray, no mesh, or the ray
    /// missed. A mesh hit outside the calibration rectangle comes back with
    /// `on_surface == false`.
    pub fn map_pointer_to_surface(
        &self,
        ray: Option<&Ray>,
        mesh: Option<&dyn DisplayMesh>,
    ) -> Option<SurfacePoint> {
        let hit = mesh?.intersect(ray?)?;
        Some(self.map_uv(&hit.uv))
    }

    /// Map a raw mesh UV onto the surface
    pub fn map_uv(&self, uv: &Point2<f32>) -> SurfacePoint {
        if !self.calibration.contains(uv) {
            return SurfacePoint::off_surface();
        }
        let (u, v) = self.calibration.normalize(uv);
        let (x, y) = uv_to_surface(u, v, self.width, self.height);
        SurfacePoint {
            x: x.clamp(0.0, self.width),
            y: y.clamp(0.0, self.height),
            on_surface: true,
        }
    }

    /// Forward projection: where surface pixel (x, y) lands in mesh UV space
    pub fn surface_to_uv(&self, x: f32, y: f32) -> Point2<f32> {
        let (u, v) = surface_to_uv(x, y, self.width, self.height);
        self.calibration.denormalize(u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mesh;
    use nalgebra::{Point3, Vector3};

    fn mapper() -> CoordinateMapper {
        let calibration =
            SurfaceCalibration::new(Point2::new(0.1, 0.2), Point2::new(0.9, 0.8)).unwrap();
        CoordinateMapper::new(480, 320, calibration)
    }

    #[test]
    fn test_round_trip_through_projection() {
        let mapper = mapper();
        for &(x, y) in &[(1.0, 1.0), (12.0, 300.0), (479.0, 2.0), (240.0, 160.0), (479.0, 319.0)] {
            let uv = mapper.surface_to_uv(x, y);
            let back = mapper.map_uv(&uv);
            assert!(back.on_surface);
            assert!((back.x - x).abs() < 1e-2, "x {} -> {}", x, back.x);
            assert!((back.y - y).abs() < 1e-2, "y {} -> {}", y, back.y);
        }
    }

    #[test]
    fn test_rotation_convention() {
        let mapper = CoordinateMapper::new(400, 200, SurfaceCalibration::full());
        // Mesh bottom-left corner is the surface's top-right
        let corner = mapper.map_uv(&Point2::new(0.0, 0.0));
        assert_eq!((corner.x, corner.y), (400.0, 0.0));
        // Top of the mesh face is the surface's left edge
        let top = mapper.map_uv(&Point2::new(0.5, 1.0));
        assert_eq!((top.x, top.y), (0.0, 100.0));
    }

    #[test]
    fn test_outside_calibration_is_off_surface() {
        let mapper = mapper();
        for uv in [
            Point2::new(0.05, 0.5),
            Point2::new(0.95, 0.5),
            Point2::new(0.5, 0.1),
            Point2::new(0.5, 0.85),
        ] {
            assert_eq!(mapper.map_uv(&uv), SurfacePoint::off_surface());
        }
    }

    #[test]
    fn test_missing_inputs_are_not_interactions() {
        let mapper = mapper();
        let quad = Mesh::display_quad(2.0, 4.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let miss = Ray::new(Point3::new(9.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));

        assert!(mapper.map_pointer_to_surface(None, Some(&quad)).is_none());
        assert!(mapper.map_pointer_to_surface(Some(&ray), None).is_none());
        assert!(mapper.map_pointer_to_surface(Some(&miss), Some(&quad)).is_none());

        let center = mapper.map_pointer_to_surface(Some(&ray), Some(&quad)).unwrap();
        assert!(center.on_surface);
        assert!((center.x - 240.0).abs() < 1e-2);
        assert!((center.y - 160.0).abs() < 1e-2);
    }
}
