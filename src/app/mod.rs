pub mod bodies;
pub mod camera;
pub mod hud;
pub mod picking;
pub mod starfield;

use std::f32::consts::TAU;

use nalgebra::{Point3, Vector3};
use rand::{rngs::SmallRng, SeedableRng};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
use web_sys::WebGlTexture;

use crate::engine::mesh::{Mesh, RING_TILT};
use crate::engine::renderer::Renderer;
use bodies::{Orrery, PLANETS, RING_INNER_PAD, RING_OUTER_PAD, RING_TEXTURE, SUN_SIZE, SUN_TEXTURE};
use camera::OrbitCamera;
use hud::Hud;

const SPHERE_SEGMENTS: u16 = 32;
const RING_SEGMENTS: u16 = 64;
const TRAIL_SEGMENTS: usize = 128;
const CAMERA_DISTANCE: f32 = 400.0;

/// Optional startup configuration fetched from `/assets/config.json`.
/// Every field has a default; a missing or malformed file changes nothing.
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub texture_path: String,
    pub star_count: u32,
    pub spin_step: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            texture_path: "/planet-textures".to_string(),
            star_count: 1000,
            spin_step: bodies::DEFAULT_SPIN_STEP,
        }
    }
}

/// One orbit-trail line, toggled in bulk by the orbit checkbox.
struct Trail {
    vertices: Vec<f32>,
    visible: bool,
}

fn set_trail_visibility(trails: &mut [Trail], visible: bool) {
    for trail in trails {
        trail.visible = visible;
    }
}

/// Render-side resources for one planet, parallel to `Orrery::bodies`.
struct PlanetVisual {
    mesh: Mesh,
    texture: WebGlTexture,
    ring: Option<Mesh>,
}

pub struct App {
    renderer: Renderer,
    orrery: Orrery,
    camera: OrbitCamera,
    hud: Hud,
    sun_mesh: Mesh,
    sun_texture: WebGlTexture,
    visuals: Vec<PlanetVisual>,
    trails: Vec<Trail>,
    ring_texture: Option<WebGlTexture>,
    stars: Vec<f32>,
    view_w: f32,
    view_h: f32,
}

impl App {
    pub fn new(renderer: Renderer, mut hud: Hud, config: AppConfig) -> Result<Self, JsValue> {
        let orrery = Orrery::new(config.spin_step);
        let camera = OrbitCamera::new(CAMERA_DISTANCE);

        let mut rng = SmallRng::from_entropy();
        let stars = starfield::scatter(&mut rng, config.star_count, starfield::STAR_SPREAD);

        let sun_mesh = Mesh::sphere(SUN_SIZE, SPHERE_SEGMENTS, SPHERE_SEGMENTS);
        let sun_texture =
            renderer.create_texture(&format!("{}/{}", config.texture_path, SUN_TEXTURE))?;

        let mut visuals = Vec::with_capacity(PLANETS.len());
        let mut trails = Vec::with_capacity(PLANETS.len());
        let mut ring_texture = None;
        for spec in PLANETS.iter() {
            let texture =
                renderer.create_texture(&format!("{}/{}", config.texture_path, spec.texture))?;

            let ring = if spec.has_ring {
                if ring_texture.is_none() {
                    ring_texture = Some(
                        renderer.create_texture(&format!("{}/{}", config.texture_path, RING_TEXTURE))?,
                    );
                }
                Some(Mesh::annulus(
                    spec.size + RING_INNER_PAD,
                    spec.size + RING_OUTER_PAD,
                    RING_SEGMENTS,
                ))
            } else {
                None
            };

            visuals.push(PlanetVisual {
                mesh: Mesh::sphere(spec.size, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
                texture,
                ring,
            });
            trails.push(Trail {
                vertices: trail_vertices(spec.distance),
                visible: true,
            });

            hud.add_planet(spec)?;
        }

        Ok(App {
            renderer,
            orrery,
            camera,
            hud,
            sun_mesh,
            sun_texture,
            visuals,
            trails,
            ring_texture,
            stars,
            view_w: 1.0,
            view_h: 1.0,
        })
    }

    /// One animation tick plus one render, run per display frame.
    pub fn frame(&mut self) {
        self.orrery.step();
        self.camera.update();

        let aspect = self.view_w / self.view_h;
        let view_projection = self.camera.view_projection(aspect);

        // Labels track both bodies and camera, paused or not.
        for (i, body) in self.orrery.bodies.iter().enumerate() {
            let ndc = camera::project(&view_projection, &Point3::from(body.position()));
            let (x, y) = camera::ndc_to_pixels(&ndc, self.view_w, self.view_h);
            self.hud.place_label(i, x, y);
        }

        self.renderer.clear(0.0, 0.0, 0.0);
        self.renderer.enable_depth_test();

        self.renderer.draw_points(&self.stars, 1.0, 1.0, 1.0, &view_projection);

        for trail in &self.trails {
            if trail.visible {
                self.renderer
                    .draw_line_loop(&trail.vertices, 1.0, 1.0, 1.0, &view_projection);
            }
        }

        self.renderer.draw_mesh(
            &self.sun_mesh,
            &Vector3::zeros(),
            0.0,
            0.0,
            Some(&self.sun_texture),
            false,
            &view_projection,
        );

        for (body, visual) in self.orrery.bodies.iter().zip(&self.visuals) {
            let position = body.position();
            self.renderer.draw_mesh(
                &visual.mesh,
                &position,
                0.0,
                body.spin,
                Some(&visual.texture),
                true,
                &view_projection,
            );

            if let (Some(ring), Some(texture)) = (&visual.ring, &self.ring_texture) {
                self.renderer.enable_blend();
                self.renderer
                    .draw_mesh(ring, &position, RING_TILT, 0.0, Some(texture), false, &view_projection);
                self.renderer.disable_blend();
            }
        }
    }

    pub fn pointer_down(&mut self, x: i32, y: i32) {
        self.camera.begin_drag(x, y);
    }

    pub fn pointer_up(&mut self) {
        self.camera.end_drag();
    }

    pub fn pointer_move(&mut self, client_x: i32, client_y: i32) {
        self.camera.drag_to(client_x, client_y);
        self.hover(client_x, client_y);
    }

    pub fn wheel(&mut self, delta: f32) {
        self.camera.zoom(delta);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.orrery.paused = paused;
    }

    pub fn set_speed(&mut self, name: &str, value: f32) {
        self.orrery.set_speed(name, value);
    }

    pub fn set_trails_visible(&mut self, visible: bool) {
        set_trail_visibility(&mut self.trails, visible);
    }

    pub fn toggle_sidebar(&self) {
        self.hud.toggle_sidebar();
    }

    /// Keep the drawing buffer and projection in step with the viewport.
    pub fn handle_resize(&mut self) {
        let window = match web_sys::window() {
            Some(window) => window,
            None => return,
        };
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        let dpr = window.device_pixel_ratio();

        self.view_w = width as f32;
        self.view_h = height as f32;

        if let Some(canvas) = self.renderer.canvas() {
            canvas.set_width((width * dpr) as u32);
            canvas.set_height((height * dpr) as u32);
        }
        self.renderer.resize((width * dpr) as i32, (height * dpr) as i32);
    }

    /// Ray-test the pointer against the planet spheres only; the sun,
    /// trails, ring and starfield never answer hover.
    fn hover(&mut self, client_x: i32, client_y: i32) {
        let ndc_x = client_x as f32 / self.view_w * 2.0 - 1.0;
        let ndc_y = -(client_y as f32 / self.view_h) * 2.0 + 1.0;
        let aspect = self.view_w / self.view_h;

        let hit = self.camera.pick_ray(ndc_x, ndc_y, aspect).and_then(|(origin, dir)| {
            let candidates: Vec<(Point3<f32>, f32)> = self
                .orrery
                .bodies
                .iter()
                .map(|body| (Point3::from(body.position()), body.spec.size))
                .collect();
            picking::nearest_hit(&origin, &dir, &candidates)
        });

        match hit {
            Some((index, _)) => {
                let name = self.orrery.bodies[index].spec.name;
                self.hud.show_tooltip(name, client_x, client_y);
            }
            None => self.hud.hide_tooltip(),
        }
    }
}

/// Closed 128-point circle at the orbital radius, in the orbital plane.
fn trail_vertices(distance: f32) -> Vec<f32> {
    let mut vertices = Vec::with_capacity(TRAIL_SEGMENTS * 3);
    for i in 0..TRAIL_SEGMENTS {
        let angle = i as f32 / TRAIL_SEGMENTS as f32 * TAU;
        vertices.extend_from_slice(&[angle.cos() * distance, 0.0, angle.sin() * distance]);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_is_a_closed_circle_at_the_orbit_radius() {
        let vertices = trail_vertices(56.0);
        assert_eq!(vertices.len(), TRAIL_SEGMENTS * 3);
        for point in vertices.chunks(3) {
            let r = (point[0] * point[0] + point[2] * point[2]).sqrt();
            assert!((r - 56.0).abs() < 1e-3);
            assert_eq!(point[1], 0.0);
        }
        // First point sits on the +X axis; the loop primitive closes it.
        assert!((vertices[0] - 56.0).abs() < 1e-4);
        assert_eq!(vertices[2], 0.0);
    }

    #[test]
    fn trail_visibility_toggles_every_line_at_once() {
        let mut trails: Vec<Trail> = bodies::PLANETS
            .iter()
            .map(|spec| Trail { vertices: trail_vertices(spec.distance), visible: true })
            .collect();

        set_trail_visibility(&mut trails, false);
        assert!(trails.iter().all(|t| !t.visible));

        set_trail_visibility(&mut trails, true);
        assert!(trails.iter().all(|t| t.visible));
        assert_eq!(trails.len(), 8);
    }

    #[test]
    fn config_defaults_apply_to_missing_fields() {
        let config: AppConfig = serde_json::from_str("{\"star_count\": 250}").unwrap();
        assert_eq!(config.star_count, 250);
        assert_eq!(config.texture_path, "/planet-textures");
        assert_eq!(config.spin_step, bodies::DEFAULT_SPIN_STEP);
    }

    #[test]
    fn config_default_matches_the_original_scene() {
        let config = AppConfig::default();
        assert_eq!(config.star_count, 1000);
        assert_eq!(config.spin_step, 0.01);
    }
}
