use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::map::{GridMap, TILE_SIZE};

/// Sentinel distance for a ray that found no wall. Only reachable when the
/// solid-border invariant is broken and the iteration cap fires.
pub const NO_HIT: f32 = f32::MAX;

/// Wraps an angle into `[0, 2pi)`.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle % TAU;
    if a < 0.0 { a + TAU } else { a }
}

#[inline]
fn distance_between(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    ((x2 - x1) * (x2 - x1) + (y2 - y1) * (y2 - y1)).sqrt()
}

/// Result of casting one ray: the nearest wall intersection for one screen
/// column. Recomputed every frame.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    /// Absolute ray angle after normalization.
    pub angle: f32,
    pub wall_hit_x: f32,
    pub wall_hit_y: f32,
    /// Euclidean distance from the observer to the hit point.
    pub distance: f32,
    /// True if the winning intersection crossed a vertical grid line.
    pub was_hit_vertical: bool,
    /// Content code of the struck tile; selects the wall texture.
    pub wall_content: u8,
}

impl Default for RayHit {
    fn default() -> Self {
        Self {
            angle: 0.0,
            wall_hit_x: 0.0,
            wall_hit_y: 0.0,
            distance: NO_HIT,
            was_hit_vertical: false,
            wall_content: 0,
        }
    }
}

impl RayHit {
    #[inline]
    pub fn found_wall(&self) -> bool {
        self.distance < NO_HIT
    }
}

struct EdgeHit {
    x: f32,
    y: f32,
    content: u8,
}

#[inline]
fn content_at(map: &GridMap, x: f32, y: f32) -> u8 {
    let row = (y / TILE_SIZE).floor() as usize;
    let col = (x / TILE_SIZE).floor() as usize;
    map.tile_at(row, col)
}

/// Casts a single ray from `(px, py)` and returns the nearest wall hit.
///
/// Runs two independent searches along the ray, one stepping across
/// horizontal grid lines and one across vertical grid lines, then keeps the
/// closer result. Ties go to the horizontal hit (strict `<` on the vertical
/// distance), which fixes which face is textured on exact corner hits.
pub fn cast(map: &GridMap, px: f32, py: f32, angle: f32) -> RayHit {
    let angle = normalize_angle(angle);

    // Boundary angles resolve to the strict-inequality branch: exactly 0 is
    // facing right and counts as facing up.
    let facing_down = angle > 0.0 && angle < PI;
    let facing_up = !facing_down;
    let facing_right = angle < FRAC_PI_2 || angle > 1.5 * PI;
    let facing_left = !facing_right;

    // Each search crosses at most one grid line per row/column, so this cap
    // only fires if the solid-border invariant is broken.
    let max_steps = 2 * (map.rows() + map.cols());

    let tan_a = angle.tan();

    ///////////////////////////////////////////
    // Horizontal grid-line search
    ///////////////////////////////////////////
    let mut horz_hit: Option<EdgeHit> = None;

    let mut y_intercept = (py / TILE_SIZE).floor() * TILE_SIZE;
    if facing_down {
        y_intercept += TILE_SIZE;
    }
    let x_intercept = px + (y_intercept - py) / tan_a;

    let y_step = if facing_up { -TILE_SIZE } else { TILE_SIZE };
    let mut x_step = TILE_SIZE / tan_a;
    if (facing_left && x_step > 0.0) || (facing_right && x_step < 0.0) {
        x_step = -x_step;
    }

    let mut next_x = x_intercept;
    let mut next_y = y_intercept;
    let mut steps = 0;
    while map.is_inside(next_x, next_y) && steps < max_steps {
        let x_check = next_x;
        // Sample one unit into the cell above the line when facing up, so
        // the tile on the far side of the crossing is the one tested.
        let y_check = next_y + if facing_up { -1.0 } else { 0.0 };

        if map.has_wall_at(x_check, y_check) {
            horz_hit = Some(EdgeHit {
                x: next_x,
                y: next_y,
                content: content_at(map, x_check, y_check),
            });
            break;
        }
        next_x += x_step;
        next_y += y_step;
        steps += 1;
    }

    ///////////////////////////////////////////
    // Vertical grid-line search
    ///////////////////////////////////////////
    let mut vert_hit: Option<EdgeHit> = None;

    let mut x_intercept = (px / TILE_SIZE).floor() * TILE_SIZE;
    if facing_right {
        x_intercept += TILE_SIZE;
    }
    let y_intercept = py + (x_intercept - px) * tan_a;

    let x_step = if facing_left { -TILE_SIZE } else { TILE_SIZE };
    let mut y_step = TILE_SIZE * tan_a;
    if (facing_up && y_step > 0.0) || (facing_down && y_step < 0.0) {
        y_step = -y_step;
    }

    let mut next_x = x_intercept;
    let mut next_y = y_intercept;
    let mut steps = 0;
    while map.is_inside(next_x, next_y) && steps < max_steps {
        let x_check = next_x + if facing_left { -1.0 } else { 0.0 };
        let y_check = next_y;

        if map.has_wall_at(x_check, y_check) {
            vert_hit = Some(EdgeHit {
                x: next_x,
                y: next_y,
                content: content_at(map, x_check, y_check),
            });
            break;
        }
        next_x += x_step;
        next_y += y_step;
        steps += 1;
    }

    // Keep the closer of the two intersections.
    let horz_distance = horz_hit
        .as_ref()
        .map_or(NO_HIT, |h| distance_between(px, py, h.x, h.y));
    let vert_distance = vert_hit
        .as_ref()
        .map_or(NO_HIT, |h| distance_between(px, py, h.x, h.y));

    let (winner, distance, was_hit_vertical) = if vert_distance < horz_distance {
        (vert_hit, vert_distance, true)
    } else {
        (horz_hit, horz_distance, false)
    };

    match winner {
        Some(hit) => RayHit {
            angle,
            wall_hit_x: hit.x,
            wall_hit_y: hit.y,
            distance,
            was_hit_vertical,
            wall_content: hit.content,
        },
        None => RayHit {
            angle,
            ..RayHit::default()
        },
    }
}
