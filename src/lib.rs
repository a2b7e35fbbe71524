//! Grid-based first-person raycasting renderer.
//!
//! The core pipeline runs once per tick: observer motion, one ray cast per
//! screen column, wall-strip projection, then depth-sorted billboard
//! sprites, all written into a caller-owned pixel buffer. Window creation,
//! input polling, texture decoding, and frame pacing are the caller's job
//! (see the binary in `main.rs` for a winit/softbuffer shell).

pub mod framebuffer;
pub mod map;
pub mod minimap;
pub mod player;
pub mod projection;
pub mod ray;
pub mod renderer;
pub mod sprite;
pub mod texture;
pub mod wall;

pub use map::{GridMap, TILE_SIZE};
pub use player::Player;
pub use projection::Projection;
pub use ray::RayHit;
pub use renderer::Renderer;
pub use sprite::Sprite;
pub use texture::{RenderError, Texture, TextureSet};
