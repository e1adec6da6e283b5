use std::f32::consts::TAU;
use std::sync::Arc;

use glam::Vec3;

/// Primitive shapes, all centred on the local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    /// Apex at `+height / 2`, base at `-height / 2`.
    Cone {
        radius: f32,
        height: f32,
        segments: u32,
    },
    /// Axis along local Y.
    Cylinder {
        radius: f32,
        height: f32,
        segments: u32,
    },
    /// Horizontal plane in XZ, split into `tiles * tiles` quads.
    Plane { width: f32, depth: f32, tiles: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Material {
    pub rgb: [u8; 3],
}

impl Material {
    pub const fn hex(color: u32) -> Self {
        Self {
            rgb: [
                ((color >> 16) & 0xff) as u8,
                ((color >> 8) & 0xff) as u8,
                (color & 0xff) as u8,
            ],
        }
    }
}

pub type Triangle = [Vec3; 3];

#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
    triangles: Arc<[Triangle]>,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            triangles: tessellate(&geometry).into(),
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }
}

pub fn tessellate(geometry: &Geometry) -> Vec<Triangle> {
    match *geometry {
        Geometry::Box {
            width,
            height,
            depth,
        } => box_triangles(width / 2.0, height / 2.0, depth / 2.0),
        Geometry::Cone {
            radius,
            height,
            segments,
        } => cone_triangles(radius, height, segments.max(3)),
        Geometry::Cylinder {
            radius,
            height,
            segments,
        } => cylinder_triangles(radius, height, segments.max(3)),
        Geometry::Plane {
            width,
            depth,
            tiles,
        } => plane_triangles(width, depth, tiles.max(1)),
    }
}

fn quad(out: &mut Vec<Triangle>, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
    out.push([a, b, c]);
    out.push([a, c, d]);
}

fn box_triangles(hx: f32, hy: f32, hz: f32) -> Vec<Triangle> {
    let v = |x: f32, y: f32, z: f32| Vec3::new(x * hx, y * hy, z * hz);
    let mut out = Vec::with_capacity(12);
    // +X, -X, +Y, -Y, +Z, -Z
    quad(&mut out, v(1., -1., 1.), v(1., -1., -1.), v(1., 1., -1.), v(1., 1., 1.));
    quad(&mut out, v(-1., -1., -1.), v(-1., -1., 1.), v(-1., 1., 1.), v(-1., 1., -1.));
    quad(&mut out, v(-1., 1., 1.), v(1., 1., 1.), v(1., 1., -1.), v(-1., 1., -1.));
    quad(&mut out, v(-1., -1., -1.), v(1., -1., -1.), v(1., -1., 1.), v(-1., -1., 1.));
    quad(&mut out, v(-1., -1., 1.), v(1., -1., 1.), v(1., 1., 1.), v(-1., 1., 1.));
    quad(&mut out, v(1., -1., -1.), v(-1., -1., -1.), v(-1., 1., -1.), v(1., 1., -1.));
    out
}

fn ring(radius: f32, y: f32, segments: u32) -> Vec<Vec3> {
    (0..segments)
        .map(|i| {
            let theta = i as f32 / segments as f32 * TAU;
            Vec3::new(radius * theta.sin(), y, radius * theta.cos())
        })
        .collect()
}

fn cone_triangles(radius: f32, height: f32, segments: u32) -> Vec<Triangle> {
    let apex = Vec3::new(0.0, height / 2.0, 0.0);
    let base_centre = Vec3::new(0.0, -height / 2.0, 0.0);
    let base = ring(radius, -height / 2.0, segments);
    let n = base.len();

    let mut out = Vec::with_capacity(n * 2);
    for i in 0..n {
        let a = base[i];
        let b = base[(i + 1) % n];
        out.push([apex, a, b]);
        out.push([base_centre, b, a]);
    }
    out
}

fn cylinder_triangles(radius: f32, height: f32, segments: u32) -> Vec<Triangle> {
    let top_centre = Vec3::new(0.0, height / 2.0, 0.0);
    let bottom_centre = Vec3::new(0.0, -height / 2.0, 0.0);
    let top = ring(radius, height / 2.0, segments);
    let bottom = ring(radius, -height / 2.0, segments);
    let n = top.len();

    let mut out = Vec::with_capacity(n * 4);
    for i in 0..n {
        let j = (i + 1) % n;
        quad(&mut out, bottom[i], bottom[j], top[j], top[i]);
        out.push([top_centre, top[i], top[j]]);
        out.push([bottom_centre, bottom[j], bottom[i]]);
    }
    out
}

fn plane_triangles(width: f32, depth: f32, tiles: u32) -> Vec<Triangle> {
    let step_x = width / tiles as f32;
    let step_z = depth / tiles as f32;
    let x0 = -width / 2.0;
    let z0 = -depth / 2.0;

    let mut out = Vec::with_capacity((tiles * tiles * 2) as usize);
    for row in 0..tiles {
        for col in 0..tiles {
            let xa = x0 + col as f32 * step_x;
            let za = z0 + row as f32 * step_z;
            quad(
                &mut out,
                Vec3::new(xa, 0.0, za + step_z),
                Vec3::new(xa + step_x, 0.0, za + step_z),
                Vec3::new(xa + step_x, 0.0, za),
                Vec3::new(xa, 0.0, za),
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_hex() {
        assert_eq!(Material::hex(0x7cba3d).rgb, [0x7c, 0xba, 0x3d]);
    }

    #[test]
    fn test_triangle_counts() {
        let unit = Geometry::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        };
        assert_eq!(tessellate(&unit).len(), 12);

        let cone = Geometry::Cone {
            radius: 1.0,
            height: 3.0,
            segments: 8,
        };
        assert_eq!(tessellate(&cone).len(), 16);

        let wheel = Geometry::Cylinder {
            radius: 1.0,
            height: 0.5,
            segments: 16,
        };
        assert_eq!(tessellate(&wheel).len(), 64);

        let ground = Geometry::Plane {
            width: 100.0,
            depth: 100.0,
            tiles: 10,
        };
        assert_eq!(tessellate(&ground).len(), 200);
    }

    #[test]
    fn test_box_stays_within_half_extents() {
        let tris = tessellate(&Geometry::Box {
            width: 4.0,
            height: 2.0,
            depth: 6.0,
        });
        for v in tris.iter().flatten() {
            assert!(v.x.abs() <= 2.0 && v.y.abs() <= 1.0 && v.z.abs() <= 3.0);
        }
    }

    #[test]
    fn test_cone_apex_on_top() {
        let tris = tessellate(&Geometry::Cone {
            radius: 1.0,
            height: 3.0,
            segments: 8,
        });
        let top = tris
            .iter()
            .flatten()
            .map(|v| v.y)
            .fold(f32::MIN, f32::max);
        assert!((top - 1.5).abs() < 1e-6);
    }
}
