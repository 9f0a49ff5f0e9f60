use web_sys::CanvasRenderingContext2d;

/// Pan/zoom transform from map space (origin at the map center) to canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

const MIN_SCALE: f64 = 0.05;
const MAX_SCALE: f64 = 20.0;
const ZOOM_SENSITIVITY: f64 = 0.001;
const FIT_PADDING: f64 = 0.05;

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Zoom toward a focus point in canvas pixels, keeping that point fixed.
    pub fn zoom_at(&mut self, delta: f64, screen_x: f64, screen_y: f64) {
        let factor = (-delta * ZOOM_SENSITIVITY).exp();
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new_scale / self.scale;

        self.offset_x = screen_x - (screen_x - self.offset_x) * ratio;
        self.offset_y = screen_y - (screen_y - self.offset_y) * ratio;
        self.scale = new_scale;
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Center a `map_w` x `map_h` map (centered on the origin) in the canvas.
    pub fn fit_map(&mut self, map_w: f64, map_h: f64, canvas_w: f64, canvas_h: f64) {
        if map_w <= 0.0 || map_h <= 0.0 || canvas_w <= 0.0 || canvas_h <= 0.0 {
            return;
        }

        let scale_x = canvas_w / (map_w * (1.0 + FIT_PADDING * 2.0));
        let scale_y = canvas_h / (map_h * (1.0 + FIT_PADDING * 2.0));
        self.scale = scale_x.min(scale_y).clamp(MIN_SCALE, MAX_SCALE);
        self.offset_x = canvas_w / 2.0;
        self.offset_y = canvas_h / 2.0;
    }

    /// Put the context into map space. `pixel_ratio` accounts for a
    /// supersampled backing store.
    pub fn apply(&self, ctx: &CanvasRenderingContext2d, pixel_ratio: f64) {
        let scale = self.scale * pixel_ratio;
        ctx.set_transform(
            scale,
            0.0,
            0.0,
            scale,
            self.offset_x * pixel_ratio,
            self.offset_y * pixel_ratio,
        )
        .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_to_map(vp: &Viewport, sx: f64, sy: f64) -> (f64, f64) {
        ((sx - vp.offset_x) / vp.scale, (sy - vp.offset_y) / vp.scale)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn fit_map_centers_origin_and_pads() {
        let mut vp = Viewport::default();
        vp.fit_map(2000.0, 1000.0, 1100.0, 1100.0);
        assert_close(vp.scale, 0.5);
        assert_close(vp.offset_x, 550.0);
        assert_close(vp.offset_y, 550.0);
        let (mx, my) = screen_to_map(&vp, 550.0, 550.0);
        assert_close(mx, 0.0);
        assert_close(my, 0.0);
    }

    #[test]
    fn fit_map_ignores_degenerate_sizes() {
        let mut vp = Viewport::default();
        vp.fit_map(0.0, 100.0, 800.0, 600.0);
        assert_eq!(vp, Viewport::default());
    }

    #[test]
    fn zoom_keeps_focus_point_fixed() {
        let mut vp = Viewport {
            offset_x: 400.0,
            offset_y: 300.0,
            scale: 1.0,
        };
        let before = screen_to_map(&vp, 100.0, 50.0);
        vp.zoom_at(-500.0, 100.0, 50.0);
        assert!(vp.scale > 1.0);
        let after = screen_to_map(&vp, 100.0, 50.0);
        assert_close(before.0, after.0);
        assert_close(before.1, after.1);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut vp = Viewport::default();
        vp.zoom_at(100_000.0, 0.0, 0.0);
        assert_close(vp.scale, MIN_SCALE);
        vp.zoom_at(-100_000.0, 0.0, 0.0);
        assert_close(vp.scale, MAX_SCALE);
    }
}
