//! Ray versus sphere-set intersection.

use crate::model::note::{NoteId, Position};
use crate::scene::{Ray, SphereInstance};

/// Nearest intersection found by `hit_test`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub id: NoteId,
    /// Distance along the ray.
    pub distance: f64,
    pub point: Position,
}

/// Rotates a point about the Y axis, matching a group rotation of `angle`.
pub fn rotate_y(point: Position, angle: f64) -> Position {
    let (sin, cos) = angle.sin_cos();
    Position::new(
        point.x * cos + point.z * sin,
        point.y,
        -point.x * sin + point.z * cos,
    )
}

/// Returns the nearest sphere hit by `ray`.
///
/// Spheres are placed inside a group rotated by `rotation_y` around the
/// origin. A ray starting inside a sphere hits it at the exit point. Ties keep
/// the earlier instance.
pub fn hit_test(ray: &Ray, instances: &[SphereInstance], rotation_y: f64) -> Option<Hit> {
    let mut nearest: Option<Hit> = None;
    for instance in instances {
        let center = rotate_y(instance.center, rotation_y);
        let Some(distance) = intersect_sphere(ray, center, instance.radius) else {
            continue;
        };
        if nearest.map_or(true, |hit| distance < hit.distance) {
            nearest = Some(Hit {
                id: instance.id,
                distance,
                point: ray.point_at(distance),
            });
        }
    }
    nearest
}

fn intersect_sphere(ray: &Ray, center: Position, radius: f64) -> Option<f64> {
    let oc = Position::new(
        ray.origin.x - center.x,
        ray.origin.y - center.y,
        ray.origin.z - center.z,
    );
    let b = dot(oc, ray.direction);
    let c = dot(oc, oc) - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let near = -b - root;
    let far = -b + root;
    if far < 0.0 {
        return None;
    }
    Some(if near >= 0.0 { near } else { far })
}

fn dot(a: Position, b: Position) -> f64 {
    a.x * b.x + a.y * b.y + a.z * b.z
}
