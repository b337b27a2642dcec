use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Interleaved vertex data: position (3), normal (3), texcoord (2).
pub const FLOATS_PER_VERTEX: usize = 8;

pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// UV sphere centered on the origin. `lat_segments` stacks from pole to
    /// pole, `lon_segments` slices around the Y axis.
    pub fn sphere(radius: f32, lat_segments: u16, lon_segments: u16) -> Self {
        let mut vertices = Vec::with_capacity(
            (lat_segments as usize + 1) * (lon_segments as usize + 1) * FLOATS_PER_VERTEX,
        );
        let mut indices = Vec::with_capacity(lat_segments as usize * lon_segments as usize * 6);

        for lat in 0..=lat_segments {
            let v = lat as f32 / lat_segments as f32;
            let theta = v * PI;
            for lon in 0..=lon_segments {
                let u = lon as f32 / lon_segments as f32;
                let phi = u * TAU;

                let nx = theta.sin() * phi.cos();
                let ny = theta.cos();
                let nz = theta.sin() * phi.sin();

                vertices.extend_from_slice(&[
                    nx * radius, ny * radius, nz * radius,
                    nx, ny, nz,
                    u, v,
                ]);
            }
        }

        let stride = lon_segments + 1;
        for lat in 0..lat_segments {
            for lon in 0..lon_segments {
                let a = lat * stride + lon;
                let b = a + stride;
                indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
            }
        }

        Mesh { vertices, indices }
    }

    /// Flat ring between `inner` and `outer` radius in the XY plane,
    /// normal along +Z. Rotate a quarter turn about X to lay it flat in
    /// the orbital plane.
    pub fn annulus(inner: f32, outer: f32, segments: u16) -> Self {
        let mut vertices =
            Vec::with_capacity((segments as usize + 1) * 2 * FLOATS_PER_VERTEX);
        let mut indices = Vec::with_capacity(segments as usize * 6);

        for i in 0..=segments {
            let v = i as f32 / segments as f32;
            let angle = v * TAU;
            let (sin, cos) = angle.sin_cos();

            vertices.extend_from_slice(&[
                cos * inner, sin * inner, 0.0,
                0.0, 0.0, 1.0,
                0.0, v,
            ]);
            vertices.extend_from_slice(&[
                cos * outer, sin * outer, 0.0,
                0.0, 0.0, 1.0,
                1.0, v,
            ]);
        }

        for i in 0..segments {
            let a = i * 2;
            indices.extend_from_slice(&[a, a + 1, a + 3, a, a + 3, a + 2]);
        }

        Mesh { vertices, indices }
    }
}

/// Rotation that lays an annulus into the XZ plane.
pub const RING_TILT: f32 = FRAC_PI_2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_has_expected_counts() {
        let mesh = Mesh::sphere(1.0, 32, 32);
        assert_eq!(mesh.vertices.len(), 33 * 33 * FLOATS_PER_VERTEX);
        assert_eq!(mesh.indices.len(), 32 * 32 * 6);
    }

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let radius = 3.5;
        let mesh = Mesh::sphere(radius, 8, 8);
        for chunk in mesh.vertices.chunks(FLOATS_PER_VERTEX) {
            let r = (chunk[0] * chunk[0] + chunk[1] * chunk[1] + chunk[2] * chunk[2]).sqrt();
            assert!((r - radius).abs() < 1e-4, "vertex off the sphere: r = {}", r);
        }
    }

    #[test]
    fn sphere_normals_are_unit_length() {
        let mesh = Mesh::sphere(2.0, 4, 4);
        for chunk in mesh.vertices.chunks(FLOATS_PER_VERTEX) {
            let n = (chunk[3] * chunk[3] + chunk[4] * chunk[4] + chunk[5] * chunk[5]).sqrt();
            assert!((n - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn annulus_stays_between_radii() {
        let mesh = Mesh::annulus(7.0, 9.0, 64);
        assert_eq!(mesh.vertices.len(), 65 * 2 * FLOATS_PER_VERTEX);
        assert_eq!(mesh.indices.len(), 64 * 6);
        for chunk in mesh.vertices.chunks(FLOATS_PER_VERTEX) {
            let r = (chunk[0] * chunk[0] + chunk[1] * chunk[1]).sqrt();
            assert!(r >= 7.0 - 1e-4 && r <= 9.0 + 1e-4);
            assert_eq!(chunk[2], 0.0);
        }
    }

    #[test]
    fn annulus_indices_stay_in_bounds() {
        let mesh = Mesh::annulus(1.0, 2.0, 16);
        let vertex_count = (mesh.vertices.len() / FLOATS_PER_VERTEX) as u16;
        assert!(mesh.indices.iter().all(|&i| i < vertex_count));
    }
}
