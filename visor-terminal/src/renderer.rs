/// Half-block rasterizer: draws the textured display object into terminal cells
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point2};
use std::io::Write;
use visor_core::{Camera, CoordinateMapper, Mesh, Surface, Triangle};

/// Mesh texels outside the calibrated rectangle
const BEZEL: u32 = 0xFF_30_30_30;
const EMPTY: u32 = 0xFF_00_00_00;

/// Each terminal cell holds two square-ish pixels stacked with '▀'
pub struct CellRenderer {
    width: usize,
    /// In pixels, twice the terminal rows
    height: usize,
    depth_buffer: Vec<f32>,
    colour_buffer: Vec<u32>,
}

impl CellRenderer {
    pub fn new(columns: usize, rows: usize) -> Self {
        let height = rows * 2;
        let size = columns * height;
        Self {
            width: columns,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            colour_buffer: vec![EMPTY; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.colour_buffer.fill(EMPTY);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.colour_buffer[y * self.width + x])
    }

    /// Rasterize `mesh` textured with `surface`, sampling through `mapper`
    /// so texels land exactly where pointer hits are mapped back to.
    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        surface: &Surface,
        mapper: &CoordinateMapper,
    ) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model_matrix, camera, surface, mapper);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        surface: &Surface,
        mapper: &CoordinateMapper,
    ) {
        let mut projected = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in projected.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(
                &vertex.position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(point) => *slot = point,
                None => return, // Triangle is clipped
            }
        }
        let [a, b, c] = triangle.vertices.map(|v| v.uv.coords);
        let [v0, v1, v2] = projected;

        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0) as i32;
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0) as i32;
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p)
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth >= self.depth_buffer[idx] {
                    continue;
                }
                self.depth_buffer[idx] = depth;

                let uv = Point2::from(a * w0 + b * w1 + c * w2);
                self.colour_buffer[idx] = sample(surface, mapper, &uv);
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in 0..self.height / 2 {
            for x in 0..self.width {
                let top = self.colour_buffer[row * 2 * self.width + x];
                let bottom = self.colour_buffer[(row * 2 + 1) * self.width + x];
                writer.queue(SetForegroundColor(to_colour(top)))?;
                writer.queue(SetBackgroundColor(to_colour(bottom)))?;
                writer.queue(Print('▀'))?;
            }
            writer.queue(ResetColor)?;
            if row + 1 < self.height / 2 {
                writer.queue(Print("\r\n"))?;
            }
        }
        Ok(())
    }
}

/// Surface colour for a mesh UV; bezel outside the calibrated rectangle
fn sample(surface: &Surface, mapper: &CoordinateMapper, uv: &Point2<f32>) -> u32 {
    let point = mapper.map_uv(uv);
    if !point.on_surface {
        return BEZEL;
    }
    let x = (point.x as i32).min(surface.width() as i32 - 1);
    let y = (point.y as i32).min(surface.height() as i32 - 1);
    surface.pixel(x, y).unwrap_or(BEZEL)
}

fn to_colour(argb: u32) -> Color {
    Color::Rgb {
        r: (argb >> 16) as u8,
        g: (argb >> 8) as u8,
        b: argb as u8,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
