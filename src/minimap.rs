use crate::framebuffer::{Frame, pack_rgb};
use crate::map::{GridMap, TILE_SIZE};
use crate::player::Player;
use crate::ray::RayHit;
use crate::sprite::Sprite;

/// World units to minimap pixels.
pub const MINIMAP_SCALE: f32 = 0.2;

/// Top-down debug overlay: grid tiles, the cast ray fan, sprite markers,
/// and the player with a heading line. Drawn over the finished 3-D frame.
pub fn render(
    frame: &mut Frame,
    map: &GridMap,
    player: &Player,
    rays: &[RayHit],
    sprites: &[Sprite],
) {
    let tile_px = (MINIMAP_SCALE * TILE_SIZE) as usize;

    for row in 0..map.rows() {
        for col in 0..map.cols() {
            let color = if map.tile_at(row, col) != 0 {
                pack_rgb(0xFF, 0xFF, 0xFF)
            } else {
                pack_rgb(0x00, 0x00, 0x00)
            };
            frame.fill_rect(col * tile_px, row * tile_px, tile_px, tile_px, color);
        }
    }

    let px = MINIMAP_SCALE * player.x;
    let py = MINIMAP_SCALE * player.y;

    let ray_color = pack_rgb(0xFF, 0x00, 0x00);
    for ray in rays {
        if !ray.found_wall() {
            continue;
        }
        frame.draw_line(
            px,
            py,
            MINIMAP_SCALE * ray.wall_hit_x,
            MINIMAP_SCALE * ray.wall_hit_y,
            ray_color,
        );
    }

    let sprite_color = pack_rgb(0x00, 0xFF, 0xFF);
    for sprite in sprites {
        frame.fill_rect(
            (MINIMAP_SCALE * sprite.x) as usize,
            (MINIMAP_SCALE * sprite.y) as usize,
            2,
            2,
            sprite_color,
        );
    }

    frame.fill_rect(
        px as usize,
        py as usize,
        (MINIMAP_SCALE * player.width).max(1.0) as usize,
        (MINIMAP_SCALE * player.height).max(1.0) as usize,
        pack_rgb(0xFF, 0xC8, 0xFF),
    );
    frame.draw_line(
        px,
        py,
        px + player.angle.cos() * 8.0,
        py + player.angle.sin() * 8.0,
        pack_rgb(0xFF, 0xC8, 0xFF),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_and_player_are_marked() {
        let map = GridMap::new(3, 3, vec![1, 1, 1, 1, 0, 1, 1, 1, 1]);
        let player = Player::new(1.5 * TILE_SIZE, 1.5 * TILE_SIZE, 0.0);
        let mut buf = vec![0x0012_3456u32; 64 * 64];
        let mut frame = Frame::new(&mut buf, 64, 64);

        render(&mut frame, &map, &player, &[], &[]);

        // (0,0) lies in the solid corner tile, the center tile is empty.
        assert_eq!(frame.pixel(0, 0), pack_rgb(0xFF, 0xFF, 0xFF));
        let mid = (1.2 * TILE_SIZE * MINIMAP_SCALE) as usize;
        assert_eq!(frame.pixel(mid, mid), pack_rgb(0x00, 0x00, 0x00));
        // Player marker sits at the scaled position.
        let p = (1.5 * TILE_SIZE * MINIMAP_SCALE) as usize;
        assert_eq!(frame.pixel(p, p), pack_rgb(0xFF, 0xC8, 0xFF));
    }

    #[test]
    fn ray_fan_is_traced() {
        let map = GridMap::new(3, 3, vec![1, 1, 1, 1, 0, 1, 1, 1, 1]);
        // Facing south, so the heading line does not cross the east ray.
        let player = Player::new(1.5 * TILE_SIZE, 1.5 * TILE_SIZE, std::f32::consts::FRAC_PI_2);
        let hit = crate::ray::cast(&map, player.x, player.y, 0.0);
        let mut buf = vec![0u32; 64 * 64];
        let mut frame = Frame::new(&mut buf, 64, 64);

        render(&mut frame, &map, &player, &[hit], &[]);

        // A pixel strictly between player and hit lies on the red line.
        let x = (MINIMAP_SCALE * (player.x + 16.0)).round() as usize;
        let y = (MINIMAP_SCALE * player.y).round() as usize;
        assert_eq!(frame.pixel(x, y), pack_rgb(0xFF, 0x00, 0x00));
    }
}
