/// Viewport and field-of-view configuration shared by the ray caster and
/// both projectors.
///
/// `dist_proj_plane` is the distance to the virtual projection plane that
/// makes the FOV sweep line up with screen columns; using the same value in
/// the caster's column angles and in the projectors' height scaling is what
/// keeps straight walls straight.
#[derive(Clone, Copy)]
pub struct Projection {
    pub width: usize,
    pub height: usize,
    pub fov: f32,
    pub dist_proj_plane: f32,
}

impl Projection {
    pub fn new(width: usize, height: usize, fov: f32) -> Self {
        let dist_proj_plane = 0.5 * width as f32 / (0.5 * fov).tan();
        Self {
            width,
            height,
            fov,
            dist_proj_plane,
        }
    }

    /// Angular offset of a screen column from the view axis.
    ///
    /// Projection-plane-correct sweep: the linear `fov / width` sweep is
    /// close but stretches the view at the edges.
    #[inline]
    pub fn column_offset(&self, col: usize) -> f32 {
        ((col as f32 - 0.5 * self.width as f32) / self.dist_proj_plane).atan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOV: f32 = std::f32::consts::FRAC_PI_3;

    #[test]
    fn center_column_has_no_offset() {
        let proj = Projection::new(640, 400, FOV);
        assert_eq!(proj.column_offset(320), 0.0);
    }

    #[test]
    fn edge_columns_reach_half_fov() {
        let proj = Projection::new(640, 400, FOV);
        let left = proj.column_offset(0);
        assert!((left + 0.5 * FOV).abs() < 1e-3);
        assert!(left < 0.0);
        assert!(proj.column_offset(639) > 0.0);
    }

    #[test]
    fn offsets_increase_monotonically() {
        let proj = Projection::new(320, 200, FOV);
        let mut last = f32::NEG_INFINITY;
        for col in 0..320 {
            let a = proj.column_offset(col);
            assert!(a > last);
            last = a;
        }
    }
}
