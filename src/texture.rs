use thiserror::Error;

/// Texels treated as "do not draw" by the sprite projector (chroma key, not
/// an alpha channel).
pub const CHROMA_KEY: u32 = 0x00FF_00FF;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("tile content {content} selects texture {index} but only {loaded} textures are loaded")]
    MissingWallTexture {
        content: u8,
        index: usize,
        loaded: usize,
    },
    #[error("sprite references texture {index} but only {loaded} textures are loaded")]
    MissingSpriteTexture { index: usize, loaded: usize },
}

/// Immutable pixel image, packed 0RGB row-major. Decoding from any on-disk
/// format happens before construction.
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Texture {
    /// Panics if the pixel data does not match the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Self {
        assert_eq!(
            pixels.len(),
            (width * height) as usize,
            "pixel data does not match texture dimensions"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> u32 {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[(y * self.width + x) as usize]
    }
}

/// All loaded textures, indexed by tile content code minus one.
pub struct TextureSet {
    textures: Vec<Texture>,
}

impl TextureSet {
    pub fn new(textures: Vec<Texture>) -> Self {
        Self { textures }
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Texture for a wall tile's content code. Content `0` never reaches
    /// here (empty tiles are filtered by the wall predicate), so a miss
    /// means the map references a texture that was never loaded.
    pub fn for_content(&self, content: u8) -> Result<&Texture, RenderError> {
        let index = content.wrapping_sub(1) as usize;
        self.textures
            .get(index)
            .ok_or(RenderError::MissingWallTexture {
                content,
                index,
                loaded: self.textures.len(),
            })
    }

    /// Texture for a sprite, by direct index.
    pub fn by_index(&self, index: usize) -> Result<&Texture, RenderError> {
        self.textures.get(index).ok_or(RenderError::MissingSpriteTexture {
            index,
            loaded: self.textures.len(),
        })
    }
}
