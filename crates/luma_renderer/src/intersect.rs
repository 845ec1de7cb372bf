//! Ray-scene intersection.

use luma_core::{ObjectId, Scene, Sphere};
use luma_math::{Interval, Ray, Vec3};

/// Result of a ray-vs-scene query.
///
/// A miss is always exactly [`Intersection::MISS`], so comparing against it
/// is well defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Point of intersection
    pub position: Vec3,
    /// Unit surface normal, pointing away from the sphere center
    pub normal: Vec3,
    /// Near root of the ray-sphere quadratic
    pub distance: f32,
    /// Far root of the ray-sphere quadratic
    pub exit: f32,
    /// The sphere that was hit, `None` for a miss
    pub object: Option<ObjectId>,
}

impl Intersection {
    /// The canonical miss.
    pub const MISS: Intersection = Intersection {
        position: Vec3::ZERO,
        normal: Vec3::ZERO,
        distance: 0.0,
        exit: 0.0,
        object: None,
    };

    pub fn is_miss(&self) -> bool {
        self.object.is_none()
    }

    pub fn is_hit(&self) -> bool {
        self.object.is_some()
    }
}

impl Default for Intersection {
    fn default() -> Self {
        Self::MISS
    }
}

/// Both real roots of the ray-sphere quadratic, near first.
///
/// Returns `None` when the discriminant is not strictly positive: a ray that
/// only grazes the sphere does not hit it.
pub fn sphere_roots(sphere: &Sphere, ray: &Ray) -> Option<(f32, f32)> {
    let oc = ray.origin - sphere.position;
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - sphere.radius * sphere.radius;

    let discriminant = b * b - 4.0 * a * c;
    if !(discriminant > 0.0) || a == 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    Some(((-b - sqrtd) / (2.0 * a), (-b + sqrtd) / (2.0 * a)))
}

/// Find the nearest sphere hit in front of the ray origin.
///
/// Only the near root is considered, so a ray starting inside a sphere does
/// not hit that sphere. On exactly equal distances the first sphere in scene
/// order wins.
pub fn trace_ray(scene: &Scene, ray: &Ray) -> Intersection {
    let mut closest = Intersection::MISS;
    let mut ray_t = Interval::FORWARD;

    for (id, sphere) in scene.iter() {
        let Some((near, far)) = sphere_roots(sphere, ray) else {
            continue;
        };
        if !ray_t.surrounds(near) {
            continue;
        }

        ray_t.max = near;
        let position = ray.at(near);
        closest = Intersection {
            position,
            normal: (position - sphere.position).normalize(),
            distance: near,
            exit: far,
            object: Some(id),
        };
    }

    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use luma_core::Material;

    const TOLERANCE: f32 = 1e-4;

    fn unit_sphere_scene() -> Scene {
        Scene::from_spheres([Sphere::new(Vec3::ZERO, 1.0, Material::default())]).unwrap()
    }

    #[test]
    fn test_head_on_hit() {
        let scene = unit_sphere_scene();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        let hit = trace_ray(&scene, &ray);
        assert_eq!(hit.object, Some(ObjectId(0)));
        assert!((hit.distance - 4.0).abs() < TOLERANCE);
        assert!((hit.exit - 6.0).abs() < TOLERANCE);
        assert!(hit.position.abs_diff_eq(Vec3::Z, TOLERANCE));
        assert!(hit.normal.abs_diff_eq(Vec3::Z, TOLERANCE));
    }

    #[test]
    fn test_hit_along_inverse_normal() {
        let center = Vec3::new(1.0, -2.0, 3.0);
        let radius = 1.5;
        let scene = Scene::from_spheres([Sphere::new(center, radius, Material::default())]).unwrap();

        let normals = [
            Vec3::X,
            Vec3::NEG_Y,
            Vec3::new(0.3, 0.4, -0.5).normalize(),
            Vec3::new(-1.0, 2.0, 2.0).normalize(),
        ];

        for normal in normals {
            let surface = center + normal * radius;
            for offset in [0.5, 2.0, 10.0] {
                let ray = Ray::new(surface + normal * offset, -normal);
                let hit = trace_ray(&scene, &ray);

                assert!(hit.is_hit());
                assert!(
                    (hit.distance - offset).abs() < TOLERANCE,
                    "offset {}: distance {}",
                    offset,
                    hit.distance
                );
                assert!((hit.exit - (offset + 2.0 * radius)).abs() < TOLERANCE);
                assert!(hit.normal.abs_diff_eq(normal, TOLERANCE));
                assert!((hit.normal.length() - 1.0).abs() < TOLERANCE);
            }
        }
    }

    #[test]
    fn test_unnormalized_direction() {
        let scene = unit_sphere_scene();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -2.0));

        // Distances are in units of the direction vector
        let hit = trace_ray(&scene, &ray);
        assert!((hit.distance - 2.0).abs() < TOLERANCE);
        assert!(hit.position.abs_diff_eq(Vec3::Z, TOLERANCE));
    }

    #[test]
    fn test_miss_is_canonical_and_idempotent() {
        let scene = unit_sphere_scene();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Y);

        let first = trace_ray(&scene, &ray);
        let second = trace_ray(&scene, &ray);

        assert_eq!(first, Intersection::MISS);
        assert_eq!(first, second);
        assert!(first.is_miss());
    }

    #[test]
    fn test_tangent_ray_is_a_miss() {
        let scene = unit_sphere_scene();
        let ray = Ray::new(Vec3::new(0.0, 1.0, 5.0), Vec3::NEG_Z);

        let sphere = &scene.spheres()[0];
        assert_eq!(sphere_roots(sphere, &ray), None);
        assert_eq!(trace_ray(&scene, &ray), Intersection::MISS);
    }

    #[test]
    fn test_sphere_behind_origin_is_ignored() {
        let scene = unit_sphere_scene();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);

        assert_eq!(trace_ray(&scene, &ray), Intersection::MISS);
    }

    #[test]
    fn test_origin_inside_sphere_is_ignored() {
        let scene = unit_sphere_scene();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(trace_ray(&scene, &ray), Intersection::MISS);
    }

    #[test]
    fn test_nearest_sphere_wins() {
        let scene = Scene::from_spheres([
            Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, Material::default()),
            Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0, Material::default()),
            Sphere::new(Vec3::new(0.0, 0.0, -20.0), 5.0, Material::default()),
        ])
        .unwrap();

        let hit = trace_ray(&scene, &Ray::new(Vec3::ZERO, Vec3::NEG_Z));
        assert_eq!(hit.object, Some(ObjectId(1)));
        assert!((hit.distance - 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_coincident_spheres_pick_first() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0, Material::default());
        let scene = Scene::from_spheres([sphere, sphere]).unwrap();

        let hit = trace_ray(&scene, &Ray::new(Vec3::ZERO, Vec3::NEG_Z));
        assert_eq!(hit.object, Some(ObjectId(0)));
    }

    #[test]
    fn test_empty_scene_misses() {
        let scene = Scene::new();
        let hit = trace_ray(&scene, &Ray::new(Vec3::ZERO, Vec3::NEG_Z));
        assert_eq!(hit, Intersection::MISS);
    }
}
