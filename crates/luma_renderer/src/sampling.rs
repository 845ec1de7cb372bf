//! Random sampling helpers.
//!
//! Every function takes the generator explicitly so callers decide how
//! streams are split between threads.

use luma_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform point in the cube [-half_extent, half_extent]^3.
pub fn random_in_cube(half_extent: f32, rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(
        gen_f32(rng) * 2.0 - 1.0,
        gen_f32(rng) * 2.0 - 1.0,
        gen_f32(rng) * 2.0 - 1.0,
    ) * half_extent
}

/// Add isotropic noise bounded by `epsilon` to a direction.
///
/// With `epsilon == 0` the direction is returned untouched and the
/// generator is not advanced.
pub fn jitter(direction: Vec3, epsilon: f32, rng: &mut dyn RngCore) -> Vec3 {
    if epsilon <= 0.0 {
        return direction;
    }
    direction + random_in_cube(epsilon, rng)
}

/// Uniform random unit vector.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling for a uniform distribution on the sphere
    loop {
        let v = random_in_cube(1.0, rng);
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Cosine-weighted direction on the hemisphere around `normal`.
///
/// Never points into the surface.
pub fn cosine_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let direction = normal + random_unit_vector(rng);

    // Catch degenerate scatter direction
    if direction.length_squared() < 1e-8 {
        return normal;
    }

    let direction = direction.normalize();
    if direction.dot(normal) < 0.0 {
        -direction
    } else {
        direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_in_cube_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let v = random_in_cube(0.25, &mut rng);
            assert!(v.abs().max_element() <= 0.25);
        }
    }

    #[test]
    fn test_zero_jitter_is_identity() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut untouched = StdRng::seed_from_u64(2);
        let direction = Vec3::new(0.3, -0.2, -1.0);

        assert_eq!(jitter(direction, 0.0, &mut rng), direction);

        // The stream was not advanced
        assert_eq!(gen_f32(&mut rng), gen_f32(&mut untouched));
    }

    #[test]
    fn test_jitter_is_bounded() {
        let mut rng = StdRng::seed_from_u64(3);
        let direction = Vec3::NEG_Z;

        for _ in 0..1000 {
            let noisy = jitter(direction, 0.001, &mut rng);
            assert!((noisy - direction).abs().max_element() <= 0.001 + 1e-6);
        }
    }

    #[test]
    fn test_random_unit_vector() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cosine_hemisphere_stays_above_surface() {
        let mut rng = StdRng::seed_from_u64(5);
        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();

        let mut mean_cos = 0.0;
        let n = 4000;
        for _ in 0..n {
            let d = cosine_hemisphere(normal, &mut rng);
            assert!((d.length() - 1.0).abs() < 1e-4);
            assert!(d.dot(normal) >= 0.0);
            mean_cos += d.dot(normal);
        }

        // E[cos θ] = 2/3 for a cosine-weighted hemisphere
        mean_cos /= n as f32;
        assert!((mean_cos - 2.0 / 3.0).abs() < 0.03, "mean cos = {}", mean_cos);
    }
}
