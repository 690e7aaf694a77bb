use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

use super::vector::Vec3;

/// Smallest `D + z` used for the perspective divide, so nodes that swing
/// behind the camera stay finite.
const MIN_DEPTH: f32 = 1.0;
const FAR_BRIGHTNESS: f32 = 0.3;

/// Camera state: two rotation angles plus the viewport nodes are projected
/// into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub viewport: Rect,
    pub perspective_distance: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub rotated: Vec3,
    pub scale: f32,
    pub screen: Pos2,
}

impl View {
    pub fn new(viewport: Rect, perspective_distance: f32) -> Self {
        Self {
            rotation_x: 0.0,
            rotation_y: 0.0,
            viewport,
            perspective_distance,
        }
    }

    /// Rotates around the vertical axis by `rotation_y`, then around the
    /// horizontal axis by `rotation_x`.
    pub fn rotate(&self, point: Vec3) -> Vec3 {
        let (sin_y, cos_y) = self.rotation_y.sin_cos();
        let (sin_x, cos_x) = self.rotation_x.sin_cos();

        let x = point.x * cos_y + point.z * sin_y;
        let z = -point.x * sin_y + point.z * cos_y;

        let y = point.y * cos_x - z * sin_x;
        let z = point.y * sin_x + z * cos_x;
        Vec3::new(x, y, z)
    }

    /// Inverse of [`View::rotate`].
    pub fn unrotate(&self, point: Vec3) -> Vec3 {
        let (sin_y, cos_y) = self.rotation_y.sin_cos();
        let (sin_x, cos_x) = self.rotation_x.sin_cos();

        let y = point.y * cos_x + point.z * sin_x;
        let z = -point.y * sin_x + point.z * cos_x;

        let x = point.x * cos_y - z * sin_y;
        let z = point.x * sin_y + z * cos_y;
        Vec3::new(x, y, z)
    }

    pub fn perspective_scale(&self, rotated_z: f32) -> f32 {
        self.perspective_distance / (self.perspective_distance + rotated_z).max(MIN_DEPTH)
    }

    pub fn project(&self, world: Vec3) -> Projected {
        let rotated = self.rotate(world);
        let scale = self.perspective_scale(rotated.z);
        let screen = self.viewport.center() + vec2(rotated.x, rotated.y) * scale;
        Projected {
            rotated,
            scale,
            screen,
        }
    }

    /// Moves `world` so its projection shifts by `screen_delta`, keeping its
    /// depth in view space.
    pub fn drag(&self, world: Vec3, screen_delta: Vec2) -> Vec3 {
        let rotated = self.rotate(world);
        let scale = self.perspective_scale(rotated.z);
        let moved = Vec3::new(
            rotated.x + screen_delta.x / scale,
            rotated.y + screen_delta.y / scale,
            rotated.z,
        );
        self.unrotate(moved)
    }

    pub fn rotate_by(&mut self, screen_delta: Vec2, sensitivity: f32) {
        self.rotation_y += screen_delta.x * sensitivity;
        self.rotation_x += screen_delta.y * sensitivity;
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new(
            Rect::from_min_size(pos2(0.0, 0.0), vec2(1280.0, 800.0)),
            800.0,
        )
    }
}

/// Brightness in `[FAR_BRIGHTNESS, 1]`; the nearest depth (smallest rotated
/// z) maps to 1.
pub fn depth_brightness(depth: f32, nearest: f32, farthest: f32) -> f32 {
    let span = farthest - nearest;
    if span <= f32::EPSILON {
        return 1.0;
    }
    let closeness = ((farthest - depth) / span).clamp(0.0, 1.0);
    1.0 - (1.0 - FAR_BRIGHTNESS) * (1.0 - closeness)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> View {
        View::new(
            Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0)),
            800.0,
        )
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn origin_projects_to_center() {
        let projected = view().project(Vec3::ZERO);
        assert_eq!(projected.screen, pos2(400.0, 300.0));
        assert_eq!(projected.scale, 1.0);
    }

    #[test]
    fn depth_shrinks_and_grows_scale() {
        let view = view();
        assert!((view.project(Vec3::new(0.0, 0.0, 800.0)).scale - 0.5).abs() < 1e-6);
        assert!((view.project(Vec3::new(0.0, 0.0, -400.0)).scale - 2.0).abs() < 1e-6);
        let far = view.project(Vec3::new(100.0, 0.0, 800.0));
        assert!((far.screen.x - 450.0).abs() < 1e-3);
    }

    #[test]
    fn rotation_order_is_y_then_x() {
        let mut view = view();
        view.rotation_y = std::f32::consts::FRAC_PI_2;
        view.rotation_x = std::f32::consts::FRAC_PI_2;
        // +x -> -z after the Y turn, then -z -> +y after the X turn.
        let rotated = view.rotate(Vec3::new(1.0, 0.0, 0.0));
        assert!(close(rotated, Vec3::new(0.0, 1.0, 0.0)), "{rotated:?}");
    }

    #[test]
    fn unrotate_inverts_rotate() {
        let mut view = view();
        view.rotation_x = 0.7;
        view.rotation_y = -1.3;
        let point = Vec3::new(12.0, -40.0, 75.0);
        assert!(close(view.unrotate(view.rotate(point)), point));
    }

    #[test]
    fn drag_moves_projection_by_screen_delta() {
        let mut view = view();
        view.rotation_x = 0.4;
        view.rotation_y = 0.9;
        let start = Vec3::new(30.0, 20.0, -60.0);
        let before = view.project(start);
        let moved = view.drag(start, vec2(15.0, -8.0));
        let after = view.project(moved);
        assert!((after.screen.x - before.screen.x - 15.0).abs() < 1e-2);
        assert!((after.screen.y - before.screen.y + 8.0).abs() < 1e-2);
        assert!((after.rotated.z - before.rotated.z).abs() < 1e-3);
    }

    #[test]
    fn rotate_by_scales_delta() {
        let mut view = view();
        view.rotate_by(vec2(10.0, -20.0), 0.01);
        assert!((view.rotation_y - 0.1).abs() < 1e-6);
        assert!((view.rotation_x + 0.2).abs() < 1e-6);
    }

    #[test]
    fn nearer_is_brighter() {
        assert_eq!(depth_brightness(-100.0, -100.0, 100.0), 1.0);
        assert!((depth_brightness(100.0, -100.0, 100.0) - FAR_BRIGHTNESS).abs() < 1e-6);
        assert_eq!(depth_brightness(5.0, 5.0, 5.0), 1.0);
    }
}
