use std::collections::HashMap;

use nalgebra::Vector3;

/// Authored description of one planet. Speeds are radians per rendered
/// frame; sizes and distances are illustrative scene units, not to scale.
pub struct PlanetSpec {
    pub name: &'static str,
    pub size: f32,
    pub distance: f32,
    pub speed: f32,
    pub texture: &'static str,
    pub has_ring: bool,
}

pub const PLANETS: [PlanetSpec; 8] = [
    PlanetSpec { name: "Mercury", size: 2.0, distance: 28.0, speed: 0.020, texture: "mercury.jpg", has_ring: false },
    PlanetSpec { name: "Venus", size: 3.0, distance: 40.0, speed: 0.015, texture: "venus.jpg", has_ring: false },
    PlanetSpec { name: "Earth", size: 3.5, distance: 56.0, speed: 0.01, texture: "earth.jpg", has_ring: false },
    PlanetSpec { name: "Mars", size: 2.5, distance: 70.0, speed: 0.008, texture: "mars.jpg", has_ring: false },
    PlanetSpec { name: "Jupiter", size: 7.0, distance: 100.0, speed: 0.004, texture: "jupiter.jpg", has_ring: false },
    PlanetSpec { name: "Saturn", size: 6.0, distance: 130.0, speed: 0.003, texture: "saturn.jpg", has_ring: true },
    PlanetSpec { name: "Uranus", size: 4.5, distance: 160.0, speed: 0.002, texture: "uranus.jpg", has_ring: false },
    PlanetSpec { name: "Neptune", size: 4.5, distance: 190.0, speed: 0.001, texture: "neptune.jpg", has_ring: false },
];

pub const SUN_SIZE: f32 = 16.0;
pub const SUN_TEXTURE: &str = "sun.jpg";
pub const RING_TEXTURE: &str = "saturn_ring.png";

/// Width of the ring annulus relative to the planet radius.
pub const RING_INNER_PAD: f32 = 1.0;
pub const RING_OUTER_PAD: f32 = 3.0;

pub const DEFAULT_SPIN_STEP: f32 = 0.01;

/// Per-planet animation state. One per `PlanetSpec`, lives for the page.
pub struct Body {
    pub spec: &'static PlanetSpec,
    /// Accumulated orbital phase in radians; wraps implicitly through
    /// cos/sin, no modulo needed.
    pub angle: f32,
    /// Axial rotation, visual only.
    pub spin: f32,
}

impl Body {
    fn new(spec: &'static PlanetSpec) -> Self {
        Body { spec, angle: 0.0, spin: 0.0 }
    }

    pub fn position(&self) -> Vector3<f32> {
        Vector3::new(
            self.angle.cos() * self.spec.distance,
            0.0,
            self.angle.sin() * self.spec.distance,
        )
    }
}

/// All mutable animation state: the bodies, the live speed table and the
/// paused flag. Pure state, no DOM or GL handles.
pub struct Orrery {
    pub bodies: Vec<Body>,
    speeds: HashMap<&'static str, f32>,
    pub paused: bool,
    spin_step: f32,
}

impl Orrery {
    pub fn new(spin_step: f32) -> Self {
        Orrery {
            bodies: PLANETS.iter().map(Body::new).collect(),
            speeds: PLANETS.iter().map(|p| (p.name, p.speed)).collect(),
            paused: false,
            spin_step,
        }
    }

    /// Advance one frame. Speeds are read fresh each tick so a slider
    /// change takes effect on the next frame; while paused, nothing moves.
    pub fn step(&mut self) {
        if self.paused {
            return;
        }
        for body in &mut self.bodies {
            if let Some(speed) = self.speeds.get(body.spec.name) {
                body.angle += speed;
            }
            body.spin += self.spin_step;
        }
    }

    /// Overwrite one planet's speed. Unknown names are dropped silently;
    /// the table stays bijective with the planet list.
    pub fn set_speed(&mut self, name: &str, value: f32) {
        if let Some(entry) = self.speeds.get_mut(name) {
            *entry = value;
        }
    }

    pub fn speed(&self, name: &str) -> Option<f32> {
        self.speeds.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_speed_table() {
        let orrery = Orrery::new(DEFAULT_SPIN_STEP);
        let expected = [
            ("Mercury", 0.020),
            ("Venus", 0.015),
            ("Earth", 0.01),
            ("Mars", 0.008),
            ("Jupiter", 0.004),
            ("Saturn", 0.003),
            ("Uranus", 0.002),
            ("Neptune", 0.001),
        ];
        assert_eq!(orrery.bodies.len(), expected.len());
        for (name, speed) in expected {
            assert_eq!(orrery.speed(name), Some(speed), "{}", name);
        }
    }

    #[test]
    fn angles_accumulate_per_tick() {
        let mut orrery = Orrery::new(DEFAULT_SPIN_STEP);
        for _ in 0..10 {
            orrery.step();
        }
        for body in &orrery.bodies {
            assert!((body.angle - 10.0 * body.spec.speed).abs() < 1e-6);
            assert!((body.spin - 10.0 * DEFAULT_SPIN_STEP).abs() < 1e-6);
        }
    }

    #[test]
    fn position_follows_the_circle() {
        let mut orrery = Orrery::new(DEFAULT_SPIN_STEP);
        for _ in 0..100 {
            orrery.step();
        }
        for body in &orrery.bodies {
            let pos = body.position();
            assert!((pos.x - body.angle.cos() * body.spec.distance).abs() < 1e-4);
            assert_eq!(pos.y, 0.0);
            assert!((pos.z - body.angle.sin() * body.spec.distance).abs() < 1e-4);
        }
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let mut orrery = Orrery::new(DEFAULT_SPIN_STEP);
        orrery.step();
        let frozen: Vec<f32> = orrery.bodies.iter().map(|b| b.angle).collect();

        orrery.paused = true;
        for _ in 0..5 {
            orrery.step();
        }
        for (body, angle) in orrery.bodies.iter().zip(&frozen) {
            assert_eq!(body.angle, *angle);
        }

        // No catch-up: one more tick adds exactly one speed step.
        orrery.paused = false;
        orrery.step();
        for (body, angle) in orrery.bodies.iter().zip(&frozen) {
            assert!((body.angle - (angle + body.spec.speed)).abs() < 1e-6);
        }
    }

    #[test]
    fn set_speed_touches_only_one_entry() {
        let mut orrery = Orrery::new(DEFAULT_SPIN_STEP);
        orrery.set_speed("Earth", 0.03);
        assert_eq!(orrery.speed("Earth"), Some(0.03));
        assert_eq!(orrery.speed("Mars"), Some(0.008));
        assert_eq!(orrery.speed("Mercury"), Some(0.020));
    }

    #[test]
    fn set_speed_ignores_unknown_names() {
        let mut orrery = Orrery::new(DEFAULT_SPIN_STEP);
        orrery.set_speed("Pluto", 0.04);
        assert_eq!(orrery.speed("Pluto"), None);
        assert_eq!(orrery.bodies.len(), 8);
    }

    #[test]
    fn slider_change_lands_on_the_next_tick() {
        let mut orrery = Orrery::new(DEFAULT_SPIN_STEP);
        orrery.set_speed("Earth", 0.03);
        orrery.set_speed("Mars", 0.0);
        orrery.step();

        let earth = orrery.bodies.iter().find(|b| b.spec.name == "Earth").unwrap();
        let mars = orrery.bodies.iter().find(|b| b.spec.name == "Mars").unwrap();
        assert!((earth.angle - 0.03).abs() < 1e-6);
        assert_eq!(mars.angle, 0.0);
    }
}
