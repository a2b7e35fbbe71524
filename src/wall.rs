use crate::framebuffer::{Frame, darken};
use crate::map::TILE_SIZE;
use crate::player::Player;
use crate::projection::Projection;
use crate::ray::RayHit;
use crate::texture::{RenderError, TextureSet};

/// Flat fill above and below the wall strip; no ceiling/floor textures.
const CEILING_COLOR: u32 = 0x0033_3333;
const FLOOR_COLOR: u32 = 0x0077_7777;

/// Shading applied to faces struck on a vertical grid line, so
/// perpendicular wall faces read differently.
const VERTICAL_FACE_SHADE: f32 = 0.7;

/// Projects every ray hit into a textured vertical wall strip.
///
/// Returns the number of columns that carried no hit (invariant-violation
/// fallback; those columns get ceiling/floor fill only).
pub fn render(
    frame: &mut Frame,
    rays: &[RayHit],
    player: &Player,
    projection: &Projection,
    textures: &TextureSet,
) -> Result<usize, RenderError> {
    let screen_h = projection.height as i32;
    let half_h = screen_h / 2;
    let mut missed_columns = 0;

    for (x, ray) in rays.iter().enumerate() {
        if !ray.found_wall() {
            missed_columns += 1;
            fill_column(frame, x, 0, half_h, CEILING_COLOR);
            fill_column(frame, x, half_h, screen_h, FLOOR_COLOR);
            continue;
        }

        // Perpendicular distance, so straight walls render straight
        // instead of bowed (fisheye).
        let perp_distance = ray.distance * (ray.angle - player.angle).cos();
        let strip_height = ((TILE_SIZE / perp_distance) * projection.dist_proj_plane) as i32;

        let mut top = half_h - strip_height / 2;
        if top < 0 {
            top = 0;
        } else {
            fill_column(frame, x, 0, top, CEILING_COLOR);
        }

        let mut bottom = half_h + strip_height / 2;
        if bottom > screen_h {
            bottom = screen_h;
        } else {
            fill_column(frame, x, bottom, screen_h, FLOOR_COLOR);
        }

        // Along a vertical grid line the hit's y varies across the tile
        // face, and vice versa; that picks the texture column.
        let tex_offset_x = if ray.was_hit_vertical {
            ray.wall_hit_y as i32 % TILE_SIZE as i32
        } else {
            ray.wall_hit_x as i32 % TILE_SIZE as i32
        } as u32;

        let texture = textures.for_content(ray.wall_content)?;
        let tex_x = tex_offset_x.min(texture.width() - 1);

        for y in top..bottom {
            let distance_from_top = y + strip_height / 2 - half_h;
            let tex_y = ((distance_from_top as f32 * texture.height() as f32
                / strip_height as f32) as u32)
                .min(texture.height() - 1);

            let mut color = texture.texel(tex_x, tex_y);
            if ray.was_hit_vertical {
                color = darken(color, VERTICAL_FACE_SHADE);
            }
            frame.set_pixel(x, y as usize, color);
        }
    }

    Ok(missed_columns)
}

fn fill_column(frame: &mut Frame, x: usize, y0: i32, y1: i32, color: u32) {
    for y in y0.max(0)..y1 {
        frame.set_pixel(x, y as usize, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::Texture;

    fn setup() -> (Player, Projection, TextureSet) {
        let player = Player::new(0.0, 0.0, 0.0);
        // dist_proj_plane = 2.0 with this width/fov pairing
        let projection = Projection::new(4, 8, std::f32::consts::FRAC_PI_2);
        let textures = TextureSet::new(vec![Texture::new(2, 2, vec![0x00AA_BBCC; 4])]);
        (player, projection, textures)
    }

    fn straight_ray(distance: f32, vertical: bool) -> RayHit {
        RayHit {
            angle: 0.0,
            wall_hit_x: distance,
            wall_hit_y: 0.0,
            distance,
            was_hit_vertical: vertical,
            wall_content: 1,
        }
    }

    #[test]
    fn strip_is_centered_with_fills() {
        let (player, projection, textures) = setup();
        let rays = vec![straight_ray(32.0, false); 4];
        let mut buf = vec![0u32; 4 * 8];
        let mut frame = Frame::new(&mut buf, 4, 8);

        // strip height = (64 / 32) * 2 = 4 rows: [2, 6)
        let missed = render(&mut frame, &rays, &player, &projection, &textures).unwrap();
        assert_eq!(missed, 0);
        assert_eq!(frame.pixel(0, 0), CEILING_COLOR);
        assert_eq!(frame.pixel(0, 1), CEILING_COLOR);
        assert_eq!(frame.pixel(0, 2), 0x00AA_BBCC);
        assert_eq!(frame.pixel(0, 5), 0x00AA_BBCC);
        assert_eq!(frame.pixel(0, 6), FLOOR_COLOR);
        assert_eq!(frame.pixel(0, 7), FLOOR_COLOR);
    }

    #[test]
    fn vertical_faces_are_shaded() {
        let (player, projection, textures) = setup();
        let rays = vec![straight_ray(32.0, true); 4];
        let mut buf = vec![0u32; 4 * 8];
        let mut frame = Frame::new(&mut buf, 4, 8);

        render(&mut frame, &rays, &player, &projection, &textures).unwrap();
        assert_eq!(frame.pixel(0, 3), darken(0x00AA_BBCC, VERTICAL_FACE_SHADE));
    }

    #[test]
    fn unknown_wall_content_is_an_error() {
        let (player, projection, textures) = setup();
        let mut rays = vec![straight_ray(32.0, false); 4];
        rays[0].wall_content = 9;
        let mut buf = vec![0u32; 4 * 8];
        let mut frame = Frame::new(&mut buf, 4, 8);

        assert!(render(&mut frame, &rays, &player, &projection, &textures).is_err());
    }

    #[test]
    fn missed_column_falls_back_to_fills() {
        let (player, projection, textures) = setup();
        let rays = vec![RayHit::default(); 4];
        let mut buf = vec![0u32; 4 * 8];
        let mut frame = Frame::new(&mut buf, 4, 8);

        let missed = render(&mut frame, &rays, &player, &projection, &textures).unwrap();
        assert_eq!(missed, 4);
        assert_eq!(frame.pixel(2, 0), CEILING_COLOR);
        assert_eq!(frame.pixel(2, 7), FLOOR_COLOR);
    }
}
