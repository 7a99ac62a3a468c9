//! Perspective camera looking down the negative Z axis.

use crate::model::note::Position;
use crate::scene::SceneError;

const DEFAULT_FOV_DEGREES: f64 = 75.0;
const DEFAULT_NEAR: f64 = 0.1;
const DEFAULT_FAR: f64 = 1000.0;
const FOCUS_DISTANCE: f64 = 6.0;

/// Half-line with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Position,
    pub direction: Position,
}

impl Ray {
    /// Builds a ray, normalizing `direction`.
    pub fn new(origin: Position, direction: Position) -> Self {
        let length = (direction.x * direction.x
            + direction.y * direction.y
            + direction.z * direction.z)
            .sqrt();
        let direction = if length > 0.0 {
            Position::new(
                direction.x / length,
                direction.y / length,
                direction.z / length,
            )
        } else {
            direction
        };
        Self { origin, direction }
    }

    pub fn point_at(&self, t: f64) -> Position {
        Position::new(
            self.origin.x + self.direction.x * t,
            self.origin.y + self.direction.y * t,
            self.origin.z + self.direction.z * t,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Position,
    pub fov_degrees: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    home: Position,
}

impl Camera {
    /// Camera on the +Z axis at `distance` from the origin.
    pub fn new(distance: f64, width: u32, height: u32) -> Result<Self, SceneError> {
        let home = Position::new(0.0, 0.0, distance);
        let mut camera = Self {
            position: home,
            fov_degrees: DEFAULT_FOV_DEGREES,
            aspect: 1.0,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            home,
        };
        camera.resize(width, height)?;
        Ok(camera)
    }

    /// Recomputes the aspect ratio after a viewport resize.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SceneError> {
        if width == 0 || height == 0 {
            return Err(SceneError::EmptyViewport { width, height });
        }
        self.aspect = f64::from(width) / f64::from(height);
        Ok(())
    }

    /// Ray through normalized device coordinates (`[-1, 1]` on both axes).
    pub fn ray_from_ndc(&self, ndc_x: f64, ndc_y: f64) -> Ray {
        let half_height = (self.fov_degrees.to_radians() / 2.0).tan();
        let half_width = half_height * self.aspect;
        Ray::new(
            self.position,
            Position::new(ndc_x * half_width, ndc_y * half_height, -1.0),
        )
    }

    /// Moves the camera in front of `target`.
    pub fn focus_on(&mut self, target: Position) {
        self.position = Position::new(target.x, target.y, target.z + FOCUS_DISTANCE);
    }

    /// Returns to the initial overview position.
    pub fn reset(&mut self) {
        self.position = self.home;
    }

    pub fn is_focused(&self) -> bool {
        self.position != self.home
    }
}

/// Converts a pointer position in pixels to normalized device coordinates.
///
/// `x` grows left to right and `y` grows top to bottom in pixel space; NDC
/// has `+y` pointing up.
pub fn pointer_to_ndc(x: f64, y: f64, width: u32, height: u32) -> Result<(f64, f64), SceneError> {
    if width == 0 || height == 0 {
        return Err(SceneError::EmptyViewport { width, height });
    }
    let ndc_x = (x / f64::from(width)) * 2.0 - 1.0;
    let ndc_y = -(y / f64::from(height)) * 2.0 + 1.0;
    Ok((ndc_x, ndc_y))
}

#[cfg(test)]
mod tests {
    use super::{pointer_to_ndc, Camera};
    use crate::model::note::Position;
    use crate::scene::SceneError;

    #[test]
    fn pointer_corners_map_to_ndc_bounds() {
        assert_eq!(pointer_to_ndc(0.0, 0.0, 800, 600).unwrap(), (-1.0, 1.0));
        assert_eq!(pointer_to_ndc(800.0, 600.0, 800, 600).unwrap(), (1.0, -1.0));
        assert_eq!(pointer_to_ndc(400.0, 300.0, 800, 600).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn center_ray_points_down_negative_z() {
        let camera = Camera::new(30.0, 800, 600).unwrap();
        let ray = camera.ray_from_ndc(0.0, 0.0);
        assert_eq!(ray.origin, Position::new(0.0, 0.0, 30.0));
        assert_eq!(ray.direction, Position::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn resize_updates_aspect_and_rejects_empty_viewport() {
        let mut camera = Camera::new(30.0, 800, 600).unwrap();
        camera.resize(1920, 1080).unwrap();
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-12);
        assert_eq!(
            camera.resize(0, 1080).unwrap_err(),
            SceneError::EmptyViewport {
                width: 0,
                height: 1080
            }
        );
    }

    #[test]
    fn focus_and_reset() {
        let mut camera = Camera::new(30.0, 800, 600).unwrap();
        camera.focus_on(Position::new(8.0, 1.0, 0.0));
        assert!(camera.is_focused());
        camera.reset();
        assert!(!camera.is_focused());
    }
}
