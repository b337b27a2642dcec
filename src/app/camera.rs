use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

const FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 2000.0;

const DRAG_RATE: f32 = 0.01;
const PITCH_LIMIT: f32 = 1.5;
const ZOOM_RATE: f32 = 0.05;
const ZOOM_MIN: f32 = 50.0;
const ZOOM_MAX: f32 = 1200.0;
/// Fraction of the remaining distance to the drag/zoom target covered
/// each frame.
const DAMPING: f32 = 0.1;

/// Damped orbit camera circling the origin. Drag and wheel input move the
/// targets; `update()` eases the actual orientation toward them once per
/// frame, so releasing the mouse leaves the view coasting to a stop.
pub struct OrbitCamera {
    yaw: f32,
    pitch: f32,
    distance: f32,
    target_yaw: f32,
    target_pitch: f32,
    target_distance: f32,
    dragging: bool,
    last_pointer: (i32, i32),
}

impl OrbitCamera {
    pub fn new(distance: f32) -> Self {
        OrbitCamera {
            yaw: 0.0,
            pitch: 0.0,
            distance,
            target_yaw: 0.0,
            target_pitch: 0.0,
            target_distance: distance,
            dragging: false,
            last_pointer: (0, 0),
        }
    }

    pub fn begin_drag(&mut self, x: i32, y: i32) {
        self.dragging = true;
        self.last_pointer = (x, y);
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn drag_to(&mut self, x: i32, y: i32) {
        if !self.dragging {
            return;
        }
        let dx = x - self.last_pointer.0;
        let dy = y - self.last_pointer.1;
        self.target_yaw += dx as f32 * DRAG_RATE;
        self.target_pitch = (self.target_pitch + dy as f32 * DRAG_RATE)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.last_pointer = (x, y);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.target_distance = (self.target_distance + delta * ZOOM_RATE).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// One frame of damping toward the targets.
    pub fn update(&mut self) {
        self.yaw += (self.target_yaw - self.yaw) * DAMPING;
        self.pitch += (self.target_pitch - self.pitch) * DAMPING;
        self.distance += (self.target_distance - self.distance) * DAMPING;
    }

    pub fn eye(&self) -> Point3<f32> {
        Point3::new(
            self.distance * self.pitch.cos() * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            self.distance * self.pitch.cos() * self.yaw.cos(),
        )
    }

    pub fn view(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye(), &Point3::origin(), &Vector3::y())
    }

    pub fn view_projection(&self, aspect: f32) -> Matrix4<f32> {
        Perspective3::new(aspect, FOV_Y, NEAR, FAR).to_homogeneous() * self.view()
    }

    /// Ray through a normalized-device-coordinate point, for hit testing.
    /// Returns (origin, unit direction) in world space.
    pub fn pick_ray(&self, ndc_x: f32, ndc_y: f32, aspect: f32) -> Option<(Point3<f32>, Vector3<f32>)> {
        let inverse = self.view_projection(aspect).try_inverse()?;
        let near = inverse.transform_point(&Point3::new(ndc_x, ndc_y, -1.0));
        let far = inverse.transform_point(&Point3::new(ndc_x, ndc_y, 1.0));
        let dir = (far - near).normalize();
        Some((near, dir))
    }
}

/// Project a world point to normalized device coordinates.
pub fn project(view_projection: &Matrix4<f32>, point: &Point3<f32>) -> Point3<f32> {
    view_projection.transform_point(point)
}

/// Map NDC to CSS pixel coordinates, Y growing downward.
pub fn ndc_to_pixels(ndc: &Point3<f32>, width: f32, height: f32) -> (f32, f32) {
    (
        (ndc.x * 0.5 + 0.5) * width,
        (1.0 - (ndc.y * 0.5 + 0.5)) * height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_the_z_axis() {
        let camera = OrbitCamera::new(400.0);
        let eye = camera.eye();
        assert!((eye.x).abs() < 1e-4);
        assert!((eye.y).abs() < 1e-4);
        assert!((eye.z - 400.0).abs() < 1e-4);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = OrbitCamera::new(400.0);
        let vp = camera.view_projection(16.0 / 9.0);
        let ndc = project(&vp, &Point3::origin());
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);

        let (px, py) = ndc_to_pixels(&ndc, 1600.0, 900.0);
        assert!((px - 800.0).abs() < 1e-2);
        assert!((py - 450.0).abs() < 1e-2);
    }

    #[test]
    fn center_ray_points_at_the_origin() {
        let camera = OrbitCamera::new(400.0);
        let (origin, dir) = camera.pick_ray(0.0, 0.0, 1.5).unwrap();
        assert!(dir.x.abs() < 1e-4);
        assert!(dir.y.abs() < 1e-4);
        assert!((dir.z + 1.0).abs() < 1e-4);
        // Origin sits on the near plane in front of the eye.
        assert!(origin.z < 400.0 && origin.z > 399.0);
    }

    #[test]
    fn damping_converges_on_the_drag_target() {
        let mut camera = OrbitCamera::new(400.0);
        camera.begin_drag(0, 0);
        camera.drag_to(100, 50);
        camera.end_drag();
        for _ in 0..200 {
            camera.update();
        }
        assert!((camera.yaw - 1.0).abs() < 1e-3);
        assert!((camera.pitch - 0.5).abs() < 1e-3);
    }

    #[test]
    fn drag_ignored_unless_started() {
        let mut camera = OrbitCamera::new(400.0);
        camera.drag_to(300, 300);
        camera.update();
        assert_eq!(camera.yaw, 0.0);
        assert_eq!(camera.pitch, 0.0);
    }

    #[test]
    fn pitch_clamps_and_zoom_clamps() {
        let mut camera = OrbitCamera::new(400.0);
        camera.begin_drag(0, 0);
        camera.drag_to(0, 10_000);
        assert!((camera.target_pitch - PITCH_LIMIT).abs() < 1e-6);

        camera.zoom(-1.0e6);
        assert_eq!(camera.target_distance, ZOOM_MIN);
        camera.zoom(1.0e9);
        assert_eq!(camera.target_distance, ZOOM_MAX);
    }
}
