use rayon::iter::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator};

use crate::framebuffer::Frame;
use crate::map::GridMap;
use crate::minimap;
use crate::player::Player;
use crate::projection::Projection;
use crate::ray::{self, RayHit};
use crate::sprite::{self, Sprite};
use crate::texture::{RenderError, TextureSet};
use crate::wall;

/// Per-frame pipeline state: the projection setup and one ray record per
/// screen column. Rebuilt when the viewport changes so the
/// one-ray-per-column invariant holds.
pub struct Renderer {
    projection: Projection,
    rays: Vec<RayHit>,
    pub show_minimap: bool,
}

impl Renderer {
    pub fn new(width: usize, height: usize, fov: f32) -> Self {
        Self {
            projection: Projection::new(width, height, fov),
            rays: vec![RayHit::default(); width],
            show_minimap: false,
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Ray results of the last cast, one per column.
    pub fn rays(&self) -> &[RayHit] {
        &self.rays
    }

    /// Casts one ray per screen column. Columns are independent, so this is
    /// the one safe place to parallelize the pipeline.
    pub fn cast_all(&mut self, map: &GridMap, player: &Player) {
        let (px, py, pa) = (player.x, player.y, player.angle);
        let projection = self.projection;
        self.rays
            .par_iter_mut()
            .enumerate()
            .for_each(|(col, hit)| {
                *hit = ray::cast(map, px, py, pa + projection.column_offset(col));
            });
    }

    /// Renders one complete frame into `buf`: cast, walls, sprites, then
    /// the optional minimap overlay. The buffer holds a finished frame when
    /// this returns; nothing is presented mid-pass.
    ///
    /// Returns the number of columns whose ray found no wall, which is zero
    /// on any map with a solid border.
    pub fn render_frame(
        &mut self,
        buf: &mut [u32],
        map: &GridMap,
        player: &Player,
        sprites: &[Sprite],
        textures: &TextureSet,
    ) -> Result<usize, RenderError> {
        self.cast_all(map, player);

        let mut frame = Frame::new(buf, self.projection.width, self.projection.height);
        let missed = wall::render(&mut frame, &self.rays, player, &self.projection, textures)?;
        sprite::render(&mut frame, sprites, &self.rays, player, &self.projection, textures)?;
        if self.show_minimap {
            minimap::render(&mut frame, map, player, &self.rays, sprites);
        }
        Ok(missed)
    }
}
