use crate::map::GridMap;
use crate::ray::normalize_angle;

/// The observer: continuous position, facing angle, and the movement intent
/// fed in by the input layer.
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Facing angle in radians, kept normalized to `[0, 2pi)`.
    pub angle: f32,
    /// -1 left, 0 idle, +1 right.
    pub turn_intent: i8,
    /// -1 backward, 0 idle, +1 forward.
    pub walk_intent: i8,
    /// World units per second.
    pub move_speed: f32,
    /// Radians per second.
    pub turn_speed: f32,
    /// Bounding box for the minimap marker.
    pub width: f32,
    pub height: f32,
}

impl Player {
    pub fn new(x: f32, y: f32, angle: f32) -> Self {
        Self {
            x,
            y,
            angle: normalize_angle(angle),
            turn_intent: 0,
            walk_intent: 0,
            move_speed: 100.0,
            turn_speed: std::f32::consts::FRAC_PI_2,
            width: 5.0,
            height: 5.0,
        }
    }

    /// Advances the observer by one tick.
    ///
    /// Collision is checked only at the destination point and rejects the
    /// whole move if it lands in a wall. There is no axis-separated sliding
    /// and no swept check, so a large `dt` can stick on corners or tunnel
    /// through thin walls.
    pub fn advance(&mut self, map: &GridMap, dt: f32) {
        self.angle = normalize_angle(self.angle + self.turn_intent as f32 * self.turn_speed * dt);

        let move_step = self.walk_intent as f32 * self.move_speed * dt;
        let new_x = self.x + self.angle.cos() * move_step;
        let new_y = self.y + self.angle.sin() * move_step;

        if map.has_wall_at(new_x, new_y) {
            return;
        }
        self.x = new_x;
        self.y = new_y;
    }
}
