use nalgebra::{Point3, Vector3};

/// Analytic ray-sphere intersection. `dir` must be unit length; returns
/// the nearest positive hit distance along the ray.
pub fn ray_sphere(
    origin: &Point3<f32>,
    dir: &Vector3<f32>,
    center: &Point3<f32>,
    radius: f32,
) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.norm_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let t = -b - sqrt_d;
    if t > 0.0 {
        return Some(t);
    }
    let t = -b + sqrt_d;
    (t > 0.0).then_some(t)
}

/// Nearest hit among `(center, radius)` candidates, as (index, distance).
pub fn nearest_hit(
    origin: &Point3<f32>,
    dir: &Vector3<f32>,
    candidates: &[(Point3<f32>, f32)],
) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, (center, radius)) in candidates.iter().enumerate() {
        if let Some(t) = ray_sphere(origin, dir, center, *radius) {
            if best.map_or(true, |(_, best_t)| t < best_t) {
                best = Some((i, t));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray() -> (Point3<f32>, Vector3<f32>) {
        (Point3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn head_on_hit_reports_the_front_face() {
        let (origin, dir) = ray();
        let t = ray_sphere(&origin, &dir, &Point3::origin(), 2.0).unwrap();
        assert!((t - 8.0).abs() < 1e-5);
    }

    #[test]
    fn offset_ray_misses() {
        let (origin, dir) = ray();
        assert!(ray_sphere(&origin, &dir, &Point3::new(5.0, 0.0, 0.0), 2.0).is_none());
    }

    #[test]
    fn sphere_behind_the_origin_is_ignored() {
        let (origin, dir) = ray();
        assert!(ray_sphere(&origin, &dir, &Point3::new(0.0, 0.0, 20.0), 2.0).is_none());
    }

    #[test]
    fn grazing_ray_still_hits() {
        let (origin, dir) = ray();
        let t = ray_sphere(&origin, &dir, &Point3::new(0.0, 1.999, 0.0), 2.0);
        assert!(t.is_some());
    }

    #[test]
    fn nearest_of_two_overlapping_candidates_wins() {
        let (origin, dir) = ray();
        let candidates = [
            (Point3::new(0.0, 0.0, -5.0), 1.0),
            (Point3::new(0.0, 0.0, 0.0), 1.0),
        ];
        let (index, t) = nearest_hit(&origin, &dir, &candidates).unwrap();
        assert_eq!(index, 1);
        assert!((t - 9.0).abs() < 1e-5);
    }

    #[test]
    fn empty_candidate_list_reports_no_hit() {
        let (origin, dir) = ray();
        assert!(nearest_hit(&origin, &dir, &[]).is_none());
    }
}
