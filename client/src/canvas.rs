use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use tracing::debug;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent, WheelEvent};

use crate::cosmetic_image::CosmeticOverlay;
use crate::render_loop::RenderScheduler;
use crate::renderer::cosmetic::{CosmeticMapLayer, CosmeticMapView};
use crate::viewport::Viewport;

const BACKGROUND: &str = "#0d1b2a";

/// Backing-store scale for crisp output on high-DPI screens.
pub fn render_scale() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .max(1.0)
}

fn backing_size(css: f64, ratio: f64) -> u32 {
    (css.max(1.0) * ratio).round() as u32
}

/// Full-window map canvas. Layers draw in map space after the viewport
/// transform is applied.
#[component]
pub fn MapCanvas() -> impl IntoView {
    let overlay: RwSignal<CosmeticOverlay> = expect_context();
    let viewport: RwSignal<Viewport> = expect_context();

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let cosmetic_layer = Rc::new(RefCell::new(CosmeticMapLayer::new()));
    let cached_ctx: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));

    let layer_render = cosmetic_layer.clone();
    let scheduler = Rc::new(RenderScheduler::new(move || {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return false;
        };
        let canvas: &HtmlCanvasElement = &canvas;

        let ratio = render_scale();
        let width = backing_size(canvas.client_width() as f64, ratio);
        let height = backing_size(canvas.client_height() as f64, ratio);
        if canvas.width() != width || canvas.height() != height {
            canvas.set_width(width);
            canvas.set_height(height);
            *cached_ctx.borrow_mut() = None;
        }

        let ctx = {
            let mut ctx_cache = cached_ctx.borrow_mut();
            if ctx_cache.is_none() {
                let Some(ctx) = canvas
                    .get_context("2d")
                    .ok()
                    .flatten()
                    .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
                else {
                    return false;
                };
                *ctx_cache = Some(ctx);
            }
            let Some(ctx) = ctx_cache.clone() else {
                return false;
            };
            ctx
        };

        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, width as f64, height as f64);

        let vp = viewport.get_untracked();
        let mut layer = layer_render.borrow_mut();
        ctx.save();
        if layer.should_transform() {
            vp.apply(&ctx, ratio);
        }
        let first_draw = !layer.has_drawn_once();
        overlay.with_untracked(|overlay| layer.render(&ctx, overlay, vp.scale));
        ctx.restore();
        if first_draw && layer.has_drawn_once() {
            debug!(scale = vp.scale, "cosmetic overlay drawn");
        }

        false
    }));

    // A freshly decoded overlay counts as a new first draw.
    let sched_overlay = scheduler.clone();
    let layer_ready = cosmetic_layer.clone();
    Effect::new(move || {
        if overlay.with(|overlay| overlay.is_cosmetic_map_loaded()) {
            layer_ready.borrow_mut().notify_map_ready();
        }
        sched_overlay.mark_dirty();
    });

    let sched_vp = scheduler.clone();
    Effect::new(move || {
        viewport.track();
        sched_vp.mark_dirty();
    });

    let dragging = Rc::new(Cell::new(false));
    let last_pos = Rc::new(Cell::new((0.0f64, 0.0f64)));

    let dragging_down = dragging.clone();
    let last_down = last_pos.clone();
    let on_pointer_down = move |e: PointerEvent| {
        dragging_down.set(true);
        last_down.set((e.client_x() as f64, e.client_y() as f64));
        if let Some(canvas) = canvas_ref.get_untracked() {
            canvas.set_pointer_capture(e.pointer_id()).ok();
        }
    };

    let dragging_move = dragging.clone();
    let last_move = last_pos.clone();
    let on_pointer_move = move |e: PointerEvent| {
        if !dragging_move.get() {
            return;
        }
        let (x, y) = (e.client_x() as f64, e.client_y() as f64);
        let (lx, ly) = last_move.replace((x, y));
        viewport.update(|vp| vp.pan(x - lx, y - ly));
    };

    let dragging_up = dragging.clone();
    let on_pointer_up = move |_: PointerEvent| {
        dragging_up.set(false);
    };

    let on_wheel = move |e: WheelEvent| {
        e.prevent_default();
        let (x, y) = (e.offset_x() as f64, e.offset_y() as f64);
        viewport.update(|vp| vp.zoom_at(e.delta_y(), x, y));
    };

    view! {
        <canvas
            node_ref=canvas_ref
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up.clone()
            on:pointercancel=on_pointer_up
            on:wheel=on_wheel
            style="position: absolute; inset: 0; width: 100%; height: 100%; display: block; cursor: grab; touch-action: none;"
        />
    }
}
