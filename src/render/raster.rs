//! Character-cell rasterizer.
//!
//! Triangles are projected with the camera, scan-converted per cell with a
//! depth buffer, lit with a single directional light plus ambient term, and
//! written as a glyph from [`GLYPH_RAMP`] tinted by the material colour.
//! Shadow casters are flattened onto the ground plane along the light
//! direction and darken the receiver cells they cover.

use glam::{Mat4, Vec3};

use super::camera::{PerspectiveCamera, Projected};
use super::mesh::Triangle;
use crate::scene::graph::SceneGraph;

pub const GLYPH_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

const SHADOW_PLANE_Y: f32 = 0.02;
const SHADOW_DEPTH_TOLERANCE: f32 = 1.5;
const SHADOW_STRENGTH: f32 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Unit vector pointing from the scene towards the light.
    pub direction: Vec3,
    pub ambient: f32,
    pub intensity: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            direction: Vec3::new(10.0, 20.0, 10.0).normalize(),
            ambient: 0.6,
            intensity: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: [u8; 3],
    pub bg: [u8; 3],
    pub depth: f32,
    receiver: bool,
    shadowed: bool,
}

impl Cell {
    fn sky(bg: [u8; 3]) -> Self {
        Self {
            ch: ' ',
            fg: bg,
            bg,
            depth: f32::INFINITY,
            receiver: false,
            shadowed: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_infinite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sky {
    pub zenith: [u8; 3],
    pub horizon: [u8; 3],
}

impl Default for Sky {
    fn default() -> Self {
        Self {
            zenith: [0x5b, 0x9b, 0xd5],
            horizon: [0xd6, 0xea, 0xf8],
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::sky([0, 0, 0]); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::sky([0, 0, 0]); width as usize * height as usize];
    }

    pub fn cell(&self, x: u16, y: u16) -> &Cell {
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    pub fn row(&self, y: u16) -> &[Cell] {
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    pub fn clear(&mut self, sky: &Sky) {
        let rows = self.height.max(1) as f32;
        for y in 0..self.height as usize {
            let t = y as f32 / rows;
            let bg = mix(sky.zenith, sky.horizon, t);
            let start = y * self.width as usize;
            for cell in &mut self.cells[start..start + self.width as usize] {
                *cell = Cell::sky(bg);
            }
        }
    }

    /// Draws every visible mesh of `graph` as seen from `camera`.
    pub fn draw_scene(&mut self, graph: &SceneGraph, camera: &PerspectiveCamera, light: &Light) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let view_projection = camera.view_projection();
        let mut casters: Vec<Triangle> = Vec::new();

        graph.visit_visible(|visible| {
            let rgb = visible.mesh.material.rgb;
            for tri in visible.mesh.triangles() {
                let world = transform(&visible.world, tri);
                self.fill_surface(camera, &view_projection, light, &world, rgb, visible.receive_shadow);
                if visible.cast_shadow {
                    casters.push(world);
                }
            }
        });

        for tri in &casters {
            if let Some(flat) = flatten_onto_ground(tri, light.direction) {
                self.fill_shadow(camera, &view_projection, &flat);
            }
        }
    }

    fn fill_surface(
        &mut self,
        camera: &PerspectiveCamera,
        view_projection: &Mat4,
        light: &Light,
        tri: &Triangle,
        rgb: [u8; 3],
        receiver: bool,
    ) {
        let Some(projected) = self.project(camera, view_projection, tri) else {
            return;
        };

        let mut normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize_or_zero();
        let centre = (tri[0] + tri[1] + tri[2]) / 3.0;
        if normal.dot(camera.position - centre) < 0.0 {
            normal = -normal;
        }
        let diffuse = normal.dot(light.direction).max(0.0);
        let brightness = (light.ambient + light.intensity * diffuse) / (light.ambient + light.intensity);

        let glyph = GLYPH_RAMP[((brightness * (GLYPH_RAMP.len() - 1) as f32).round() as usize)
            .min(GLYPH_RAMP.len() - 1)];
        let fg = scale(rgb, 0.35 + 0.65 * brightness);

        let width = self.width as usize;
        scan(&projected, self.width, self.height, |x, y, depth| {
            let cell = &mut self.cells[y * width + x];
            if depth < cell.depth {
                cell.ch = glyph;
                cell.fg = fg;
                cell.depth = depth;
                cell.receiver = receiver;
                cell.shadowed = false;
            }
        });
    }

    fn fill_shadow(&mut self, camera: &PerspectiveCamera, view_projection: &Mat4, tri: &Triangle) {
        let Some(projected) = self.project(camera, view_projection, tri) else {
            return;
        };

        let width = self.width as usize;
        scan(&projected, self.width, self.height, |x, y, depth| {
            let cell = &mut self.cells[y * width + x];
            if cell.receiver && !cell.shadowed && (depth - cell.depth).abs() < SHADOW_DEPTH_TOLERANCE {
                cell.fg = scale(cell.fg, SHADOW_STRENGTH);
                cell.ch = GLYPH_RAMP[0];
                cell.shadowed = true;
            }
        });
    }

    fn project(
        &self,
        camera: &PerspectiveCamera,
        view_projection: &Mat4,
        tri: &Triangle,
    ) -> Option<[Projected; 3]> {
        let a = camera.project(view_projection, tri[0], self.width, self.height)?;
        let b = camera.project(view_projection, tri[1], self.width, self.height)?;
        let c = camera.project(view_projection, tri[2], self.width, self.height)?;
        Some([a, b, c])
    }
}

fn transform(world: &Mat4, tri: &Triangle) -> Triangle {
    [
        world.transform_point3(tri[0]),
        world.transform_point3(tri[1]),
        world.transform_point3(tri[2]),
    ]
}

fn flatten_onto_ground(tri: &Triangle, towards_light: Vec3) -> Option<Triangle> {
    if towards_light.y <= f32::EPSILON {
        return None;
    }
    let flatten = |p: Vec3| {
        let lift = (p.y - SHADOW_PLANE_Y) / towards_light.y;
        let mut q = p - towards_light * lift;
        q.y = SHADOW_PLANE_Y;
        q
    };
    Some([flatten(tri[0]), flatten(tri[1]), flatten(tri[2])])
}

/// Visits every cell whose centre lies inside the projected triangle with a
/// perspective-correct depth.
fn scan<F>(tri: &[Projected; 3], width: u16, height: u16, mut plot: F)
where
    F: FnMut(usize, usize, f32),
{
    let [a, b, c] = tri;
    let area = edge(a, b, c.x, c.y);
    if area.abs() < f32::EPSILON {
        return;
    }

    let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as usize;
    let max_x = (a.x.max(b.x).max(c.x).ceil() as isize).clamp(0, width as isize) as usize;
    let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as usize;
    let max_y = (a.y.max(b.y).max(c.y).ceil() as isize).clamp(0, height as isize) as usize;

    for y in min_y..max_y {
        let py = y as f32 + 0.5;
        for x in min_x..max_x {
            let px = x as f32 + 0.5;
            let w0 = edge(b, c, px, py) / area;
            let w1 = edge(c, a, px, py) / area;
            let w2 = edge(a, b, px, py) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }
            let inv_depth = w0 / a.depth + w1 / b.depth + w2 / c.depth;
            plot(x, y, 1.0 / inv_depth);
        }
    }
}

fn edge(a: &Projected, b: &Projected, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

fn scale(rgb: [u8; 3], factor: f32) -> [u8; 3] {
    rgb.map(|c| (c as f32 * factor).round().clamp(0.0, 255.0) as u8)
}

fn mix(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    [0, 1, 2].map(|i| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8)
}
