use rand::Rng;

/// Side of the cube the stars are scattered in, centered on the origin.
pub const STAR_SPREAD: f32 = 2000.0;

/// Interleaved xyz positions for `count` stars, uniformly distributed.
pub fn scatter<R: Rng>(rng: &mut R, count: u32, spread: f32) -> Vec<f32> {
    let half = spread / 2.0;
    let mut vertices = Vec::with_capacity(count as usize * 3);
    for _ in 0..count * 3 {
        vertices.push(rng.gen_range(-half..half));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn emits_three_floats_per_star() {
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(scatter(&mut rng, 1000, STAR_SPREAD).len(), 3000);
    }

    #[test]
    fn stays_inside_the_cube() {
        let mut rng = SmallRng::seed_from_u64(42);
        let stars = scatter(&mut rng, 500, 2000.0);
        assert!(stars.iter().all(|c| (-1000.0..1000.0).contains(c)));
    }

    #[test]
    fn fills_more_than_one_octant() {
        let mut rng = SmallRng::seed_from_u64(1);
        let stars = scatter(&mut rng, 300, 2000.0);
        assert!(stars.iter().any(|&c| c > 0.0));
        assert!(stars.iter().any(|&c| c < 0.0));
    }
}
