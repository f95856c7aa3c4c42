//! Camera, projection and pointer unprojection
use nalgebra::{Matrix4, Point3, Vector3};

use crate::geometry::{Mesh, Ray};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Screen-space rectangle in pixels (or terminal cells)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a 3D point to 2D screen space, returning (x, y, ndc depth).
    ///
    /// Points behind the camera or outside the view volume yield `None`.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        // Prevent division by near-zero depth values
        if clip.w < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        if !(-1.0..=1.0).contains(&ndc_x) || !(-1.0..=1.0).contains(&ndc_y) {
            return None;
        }

        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }

    /// Cast a ray from a screen position through the camera.
    ///
    /// Returns `None` when the screen has no area or the camera matrices
    /// cannot be inverted.
    pub fn pointer_ray(
        &self,
        screen_x: f32,
        screen_y: f32,
        width: u32,
        height: u32,
    ) -> Option<Ray> {
        if width == 0 || height == 0 {
            return None;
        }
        let inverse = (self.projection_matrix() * self.view_matrix()).try_inverse()?;

        let ndc_x = screen_x / width as f32 * 2.0 - 1.0;
        let ndc_y = 1.0 - screen_y / height as f32 * 2.0;

        let near = inverse.transform_point(&Point3::new(ndc_x, ndc_y, -1.0));
        let far = inverse.transform_point(&Point3::new(ndc_x, ndc_y, 1.0));
        let direction = far - near;
        if direction.norm() < 1e-9 {
            return None;
        }

        Some(Ray::new(near, direction.normalize()))
    }

    /// Screen rectangle enclosing the mesh's bounding box.
    ///
    /// Used for placing overlays next to the display object; corners that
    /// fall off screen are skipped.
    pub fn project_bounds(
        &self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<ScreenRect> {
        let (min, max) = mesh.bounds()?;
        let corners = (0..8).map(|i| {
            Point3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            )
        });

        let mut extent: Option<(f32, f32, f32, f32)> = None;
        for corner in corners {
            if let Some((x, y, _)) = self.project_to_screen(&corner, model_matrix, width, height) {
                extent = Some(match extent {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }

        extent.map(|(x0, y0, x1, y1)| ScreenRect {
            x: x0,
            y: y0,
            w: x1 - x0,
            h: y1 - y0,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(800, 600);
        let view = camera.view_matrix();
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_center_projects_to_screen_center() {
        let camera = Camera::new(800, 600);
        let (x, y, _) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 800, 600)
            .unwrap();
        assert!((x - 400.0).abs() < 1e-3);
        assert!((y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_behind_camera_is_rejected() {
        let camera = Camera::new(800, 600);
        let behind = Point3::new(0.0, 0.0, 10.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 800, 600)
            .is_none());
    }

    #[test]
    fn test_pointer_ray_inverts_projection() {
        let camera = Camera::new(800, 600);
        let point = Point3::new(0.4, -0.3, 0.0);
        let (x, y, _) = camera
            .project_to_screen(&point, &Matrix4::identity(), 800, 600)
            .unwrap();

        let ray = camera.pointer_ray(x, y, 800, 600).unwrap();
        // Walk the ray to the z = 0 plane
        let t = -ray.origin.z / ray.direction.z;
        let hit = ray.origin + ray.direction * t;
        assert!((hit - point).norm() < 1e-3);
    }

    #[test]
    fn test_pointer_ray_needs_area() {
        let camera = Camera::new(800, 600);
        assert!(camera.pointer_ray(1.0, 1.0, 0, 600).is_none());
    }

    #[test]
    fn test_project_bounds_is_centered() {
        let camera = Camera::new(800, 600);
        let quad = Mesh::display_quad(1.0, 2.0);
        let rect = camera
            .project_bounds(&quad, &Matrix4::identity(), 800, 600)
            .unwrap();
        assert!((rect.x + rect.w / 2.0 - 400.0).abs() < 1e-2);
        assert!((rect.y + rect.h / 2.0 - 300.0).abs() < 1e-2);
        assert!(rect.h > rect.w);
    }
}
