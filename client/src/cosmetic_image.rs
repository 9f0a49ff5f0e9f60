use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

use crate::renderer::cosmetic::CosmeticMapView;

/// The decorative overlay for the current map, as seen by the cosmetic layer.
#[derive(Clone, Debug, Default)]
pub struct CosmeticOverlay {
    image: Option<HtmlImageElement>,
    width: f64,
    height: f64,
}

impl CosmeticOverlay {
    /// No overlay image yet (or none exists); the layer draws nothing.
    pub fn awaiting(width: f64, height: f64) -> Self {
        Self {
            image: None,
            width,
            height,
        }
    }

    pub fn ready(image: HtmlImageElement, width: f64, height: f64) -> Self {
        Self {
            image: Some(image),
            width,
            height,
        }
    }
}

impl CosmeticMapView for CosmeticOverlay {
    type Image = HtmlImageElement;

    fn is_cosmetic_map_loaded(&self) -> bool {
        self.image.is_some()
    }

    fn cosmetic_map_image(&self) -> Option<&HtmlImageElement> {
        self.image.as_ref()
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }
}

/// Load and decode an overlay image so the first draw never stalls on decode.
pub async fn decode_image(url: &str) -> Result<HtmlImageElement, String> {
    let image = HtmlImageElement::new().map_err(|e| format!("image element: {e:?}"))?;
    image.set_src(url);
    JsFuture::from(image.decode())
        .await
        .map_err(|e| format!("decode failed: {e:?}"))?;
    Ok(image)
}

/// Map extent for the overlay: the nation document's declared size when
/// present, otherwise the image's own pixel size.
pub fn overlay_extent(declared: Option<(u32, u32)>, natural: (u32, u32)) -> (f64, f64) {
    let (w, h) = declared.unwrap_or(natural);
    (w as f64, h as f64)
}
