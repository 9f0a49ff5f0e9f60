pub mod cosmetic;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// Image smoothing applied before drawing a map-space image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Smoothing {
    Disabled,
    Low,
}

impl Smoothing {
    pub fn is_enabled(self) -> bool {
        !matches!(self, Smoothing::Disabled)
    }

    /// Value for the canvas `imageSmoothingQuality` property, when smoothing is on.
    pub fn quality(self) -> Option<&'static str> {
        match self {
            Smoothing::Disabled => None,
            Smoothing::Low => Some("low"),
        }
    }
}

/// Smoothing policy shared by every layer that draws map-space images, so
/// overlays line up visually with the terrain underneath.
///
/// Zoomed out (scale below 1) gets cheap smoothing; zoomed in keeps hard pixels.
pub fn smoothing_for_scale(scale: f64) -> Smoothing {
    if scale < 1.0 {
        Smoothing::Low
    } else {
        Smoothing::Disabled
    }
}

/// Image whose load state the renderer can observe but does not own.
pub trait OverlayImage {
    fn is_complete(&self) -> bool;
    fn natural_width(&self) -> u32;
}

/// The drawing primitives layers need. Errors from the backend are swallowed.
pub trait DrawSurface {
    type Image: OverlayImage;

    fn set_smoothing(&self, smoothing: Smoothing);
    fn draw_image(&self, image: &Self::Image, x: f64, y: f64, width: f64, height: f64);
}

impl OverlayImage for HtmlImageElement {
    fn is_complete(&self) -> bool {
        self.complete()
    }

    fn natural_width(&self) -> u32 {
        HtmlImageElement::natural_width(self)
    }
}

impl DrawSurface for CanvasRenderingContext2d {
    type Image = HtmlImageElement;

    fn set_smoothing(&self, smoothing: Smoothing) {
        self.set_image_smoothing_enabled(smoothing.is_enabled());
        let Some(quality) = smoothing.quality() else {
            return;
        };
        // No web-sys setter exists for `imageSmoothingQuality`.
        let target: &JsValue = self.as_ref();
        js_sys::Reflect::set(
            target,
            &JsValue::from_str("imageSmoothingQuality"),
            &JsValue::from_str(quality),
        )
        .ok();
    }

    fn draw_image(&self, image: &HtmlImageElement, x: f64, y: f64, width: f64, height: f64) {
        self.draw_image_with_html_image_element_and_dw_and_dh(image, x, y, width, height)
            .ok();
    }
}
