use super::{DrawSurface, OverlayImage, smoothing_for_scale};

/// Game-view state the cosmetic layer reads each frame.
pub trait CosmeticMapView {
    type Image: OverlayImage;

    fn is_cosmetic_map_loaded(&self) -> bool;
    fn cosmetic_map_image(&self) -> Option<&Self::Image>;
    /// Map extent in map-space units.
    fn width(&self) -> f64;
    fn height(&self) -> f64;
}

/// Draws the optional decorative map image over the terrain, in map space.
#[derive(Debug, Default)]
pub struct CosmeticMapLayer {
    has_drawn_once: bool,
}

impl CosmeticMapLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The caller must apply the map transform before `render`.
    pub fn should_transform(&self) -> bool {
        true
    }

    /// The overlay image just finished loading. Resets the drawn flag so the
    /// next frame counts as a fresh draw; drawing itself is never skipped.
    pub fn notify_map_ready(&mut self) {
        self.has_drawn_once = false;
    }

    pub fn has_drawn_once(&self) -> bool {
        self.has_drawn_once
    }

    /// Draw the overlay centered on the map-space origin, stretched to the map
    /// extent. Does nothing until the image is loaded and decoded.
    pub fn render<S, V>(&mut self, surface: &S, view: &V, scale: f64)
    where
        S: DrawSurface,
        V: CosmeticMapView<Image = S::Image>,
    {
        if !view.is_cosmetic_map_loaded() {
            return;
        }
        let Some(image) = view.cosmetic_map_image() else {
            return;
        };
        if !image.is_complete() || image.natural_width() == 0 {
            return;
        }

        let width = view.width();
        let height = view.height();
        surface.set_smoothing(smoothing_for_scale(scale));
        surface.draw_image(image, -width / 2.0, -height / 2.0, width, height);
        self.has_drawn_once = true;
    }
}
