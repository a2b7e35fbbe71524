/// Side length of one grid tile in world units.
pub const TILE_SIZE: f32 = 64.0;

/// Static tile grid. Row-major, `0` is empty floor, any other code is a
/// solid wall whose value selects the wall texture.
pub struct GridMap {
    tiles: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl GridMap {
    /// Builds a map from row-major tile codes.
    ///
    /// Panics if the data does not match the dimensions or if any border
    /// cell is empty. The solid border is what guarantees every ray search
    /// terminates, so a map violating it is rejected up front.
    pub fn new(rows: usize, cols: usize, tiles: Vec<u8>) -> Self {
        assert!(rows >= 2 && cols >= 2, "map must be at least 2x2");
        assert_eq!(tiles.len(), rows * cols, "tile data does not match dimensions");
        for row in 0..rows {
            for col in 0..cols {
                if row == 0 || row == rows - 1 || col == 0 || col == cols - 1 {
                    assert!(
                        tiles[row * cols + col] != 0,
                        "map border must be solid (empty cell at row {row}, col {col})"
                    );
                }
            }
        }
        Self { tiles, rows, cols }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Map width in world units.
    #[inline]
    pub fn width(&self) -> f32 {
        self.cols as f32 * TILE_SIZE
    }

    /// Map height in world units.
    #[inline]
    pub fn height(&self) -> f32 {
        self.rows as f32 * TILE_SIZE
    }

    /// Content code of a tile. Out-of-range indices are a caller contract
    /// violation and panic.
    #[inline]
    pub fn tile_at(&self, row: usize, col: usize) -> u8 {
        assert!(row < self.rows && col < self.cols, "tile index out of range");
        self.tiles[row * self.cols + col]
    }

    /// True if the point lies outside the map or inside a solid tile. The
    /// ray caster and the collision check share this one predicate.
    pub fn has_wall_at(&self, x: f32, y: f32) -> bool {
        if x < 0.0 || x > self.width() || y < 0.0 || y > self.height() {
            return true;
        }
        let col = (x / TILE_SIZE).floor().min(self.cols as f32 - 1.0) as usize;
        let row = (y / TILE_SIZE).floor().min(self.rows as f32 - 1.0) as usize;
        self.tiles[row * self.cols + col] != 0
    }

    /// Strict bounds check, no occupancy. Bounds the ray traversal loops.
    #[inline]
    pub fn is_inside(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && x <= self.width() && y >= 0.0 && y <= self.height()
    }
}
