use std::f32::consts::{PI, TAU};

use crate::framebuffer::Frame;
use crate::map::TILE_SIZE;
use crate::player::Player;
use crate::projection::Projection;
use crate::ray::RayHit;
use crate::texture::{CHROMA_KEY, RenderError, TextureSet};

/// Extra angular slack beyond FOV/2 so sprites straddling the view edge do
/// not pop in and out.
const FOV_EPSILON: f32 = 0.2;

/// A flat billboard anchored at a world position.
pub struct Sprite {
    pub x: f32,
    pub y: f32,
    /// Direct index into the texture set.
    pub texture: usize,
}

struct VisibleSprite<'a> {
    sprite: &'a Sprite,
    distance: f32,
    /// Unsigned angular offset from the view axis.
    angle: f32,
}

/// Culls, depth-sorts, and projects billboard sprites over the finished
/// wall pass. Painter's algorithm: far-to-near, nearer sprites overwrite;
/// walls occlude per column through the ray distances.
pub fn render(
    frame: &mut Frame,
    sprites: &[Sprite],
    rays: &[RayHit],
    player: &Player,
    projection: &Projection,
    textures: &TextureSet,
) -> Result<(), RenderError> {
    let half_fov = 0.5 * projection.fov;

    let mut visible: Vec<VisibleSprite> = sprites
        .iter()
        .filter_map(|sprite| {
            let mut angle = player.angle - (sprite.y - player.y).atan2(sprite.x - player.x);
            if angle > PI {
                angle -= TAU;
            }
            if angle < -PI {
                angle += TAU;
            }
            let angle = angle.abs();
            if angle < half_fov + FOV_EPSILON {
                let dx = sprite.x - player.x;
                let dy = sprite.y - player.y;
                Some(VisibleSprite {
                    sprite,
                    distance: (dx * dx + dy * dy).sqrt(),
                    angle,
                })
            } else {
                None
            }
        })
        .collect();

    // Farthest first, so closer sprites paint over them.
    visible.sort_by(|a, b| {
        b.distance
            .partial_cmp(&a.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let screen_w = projection.width as f32;
    let screen_h = projection.height as f32;

    for vis in &visible {
        let texture = textures.by_index(vis.sprite.texture)?;

        // Same fisheye correction as the walls, so a sprite standing next
        // to a wall scales identically.
        let perp_distance = vis.distance * vis.angle.cos();
        let sprite_height = (TILE_SIZE / perp_distance) * projection.dist_proj_plane;
        let sprite_width = sprite_height; // square billboard

        let top_y = (0.5 * screen_h - 0.5 * sprite_height).max(0.0);
        let bottom_y = (0.5 * screen_h + 0.5 * sprite_height).min(screen_h);

        let sprite_angle =
            (vis.sprite.y - player.y).atan2(vis.sprite.x - player.x) - player.angle;
        let screen_pos_x = sprite_angle.tan() * projection.dist_proj_plane;
        let left_x = 0.5 * screen_w + screen_pos_x - 0.5 * sprite_width;
        let right_x = left_x + sprite_width;

        let texel_width = texture.width() as f32 / sprite_width;

        let mut col = left_x.floor() as i32;
        while (col as f32) < right_x {
            let x = col;
            col += 1;
            if x < 0 || x >= projection.width as i32 {
                continue;
            }
            // Wall occlusion: the wall hit for this column wins on ties.
            if vis.distance >= rays[x as usize].distance {
                continue;
            }

            let tex_x =
                (((x as f32 - left_x) * texel_width).max(0.0) as u32).min(texture.width() - 1);

            let mut row = top_y.floor() as i32;
            while (row as f32) < bottom_y {
                let y = row;
                row += 1;
                if y < 0 || y >= projection.height as i32 {
                    continue;
                }
                let distance_from_top = y as f32 + 0.5 * sprite_height - 0.5 * screen_h;
                let tex_y = ((distance_from_top * texture.height() as f32 / sprite_height)
                    .max(0.0) as u32)
                    .min(texture.height() - 1);

                let texel = texture.texel(tex_x, tex_y);
                if texel != CHROMA_KEY {
                    frame.set_pixel(x as usize, y as usize, texel);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::Texture;

    const FOV: f32 = std::f32::consts::FRAC_PI_2;

    fn setup(texture_colors: &[u32]) -> (Player, Projection, TextureSet) {
        let player = Player::new(0.0, 0.0, 0.0);
        // 8x8 screen, dist_proj_plane = 4
        let projection = Projection::new(8, 8, FOV);
        let textures = TextureSet::new(
            texture_colors
                .iter()
                .map(|&c| Texture::new(2, 2, vec![c; 4]))
                .collect(),
        );
        (player, projection, textures)
    }

    fn open_rays(distance: f32) -> Vec<RayHit> {
        vec![
            RayHit {
                distance,
                ..RayHit::default()
            };
            8
        ]
    }

    #[test]
    fn sprite_ahead_is_drawn_centered() {
        let (player, projection, textures) = setup(&[0x0000_00AA]);
        let sprites = [Sprite {
            x: TILE_SIZE,
            y: 0.0,
            texture: 0,
        }];
        let rays = open_rays(1000.0);
        let mut buf = vec![0u32; 64];
        let mut frame = Frame::new(&mut buf, 8, 8);

        render(&mut frame, &sprites, &rays, &player, &projection, &textures).unwrap();
        // size = (64 / 64) * 4 = 4 pixels, centered: columns/rows [2, 6)
        assert_eq!(frame.pixel(3, 3), 0x0000_00AA);
        assert_eq!(frame.pixel(2, 5), 0x0000_00AA);
        assert_eq!(frame.pixel(0, 0), 0);
        assert_eq!(frame.pixel(7, 7), 0);
    }

    #[test]
    fn sprite_behind_wall_is_occluded() {
        let (player, projection, textures) = setup(&[0x0000_00AA]);
        let sprites = [Sprite {
            x: TILE_SIZE,
            y: 0.0,
            texture: 0,
        }];
        // Wall closer than the sprite on every column.
        let rays = open_rays(10.0);
        let mut buf = vec![0u32; 64];
        let mut frame = Frame::new(&mut buf, 8, 8);

        render(&mut frame, &sprites, &rays, &player, &projection, &textures).unwrap();
        assert!(buf.iter().all(|&p| p == 0));
    }

    #[test]
    fn sprite_outside_fov_is_culled() {
        let (player, projection, textures) = setup(&[0x0000_00AA]);
        // Due west while facing east: pi away, far outside FOV/2 + margin.
        let sprites = [Sprite {
            x: -TILE_SIZE,
            y: 0.0,
            texture: 0,
        }];
        let rays = open_rays(1000.0);
        let mut buf = vec![0u32; 64];
        let mut frame = Frame::new(&mut buf, 8, 8);

        render(&mut frame, &sprites, &rays, &player, &projection, &textures).unwrap();
        assert!(buf.iter().all(|&p| p == 0));
    }

    #[test]
    fn nearer_sprite_paints_over_farther() {
        let (player, projection, textures) = setup(&[0x0000_00AA, 0x0000_00BB]);
        let sprites = [
            Sprite {
                x: TILE_SIZE,
                y: 0.0,
                texture: 0,
            },
            Sprite {
                x: 2.0 * TILE_SIZE,
                y: 0.0,
                texture: 1,
            },
        ];
        let rays = open_rays(1000.0);
        let mut buf = vec![0u32; 64];
        let mut frame = Frame::new(&mut buf, 8, 8);

        render(&mut frame, &sprites, &rays, &player, &projection, &textures).unwrap();
        // Both cover the screen center; the nearer (texture 0) must win.
        assert_eq!(frame.pixel(4, 4), 0x0000_00AA);
    }

    #[test]
    fn chroma_key_texels_are_skipped() {
        let (player, projection, textures) = setup(&[CHROMA_KEY]);
        let sprites = [Sprite {
            x: TILE_SIZE,
            y: 0.0,
            texture: 0,
        }];
        let rays = open_rays(1000.0);
        let mut buf = vec![0u32; 64];
        let mut frame = Frame::new(&mut buf, 8, 8);

        render(&mut frame, &sprites, &rays, &player, &projection, &textures).unwrap();
        assert!(buf.iter().all(|&p| p == 0));
    }
}
