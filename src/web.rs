//! Browser bindings. JavaScript owns the `requestAnimationFrame` loop.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use thiserror::Error;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, Window};

use crate::splash::{SplashConfig, SplashScreen};
use crate::surface::{HostSurface, RenderSurface, Rgba, SurfaceSize};
use crate::timeline::split_chars;
use crate::visuals::{CharVisual, SplashVisuals};

#[derive(Debug, Error)]
pub enum WebError {
    #[error("no window object")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("no performance clock")]
    NoPerformance,
    #[error("canvas #{0} not found")]
    CanvasMissing(String),
    #[error("2d context unavailable")]
    ContextUnavailable,
    #[error("failed to mount splash: {0}")]
    Mount(#[from] crate::splash::SplashError),
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    size: SurfaceSize,
}

impl CanvasSurface {
    pub fn from_document(document: &Document, canvas_id: &str) -> Result<Self, WebError> {
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| WebError::CanvasMissing(canvas_id.to_owned()))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|obj| obj.dyn_into().ok())
            .ok_or(WebError::ContextUnavailable)?;
        let size = SurfaceSize::clamped(canvas.width() as f32, canvas.height() as f32);
        Ok(Self { canvas, ctx, size })
    }
}

#[allow(deprecated)]
impl RenderSurface for CanvasSurface {
    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.canvas.set_width(size.width() as u32);
        self.canvas.set_height(size.height() as u32);
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.size.width() as f64, self.size.height() as f64);
    }

    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Rgba) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center[0] as f64, center[1] as f64, radius as f64, 0.0, TAU);
        self.ctx.set_fill_style(&JsValue::from_str(&color.to_css()));
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Rgba) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style(&JsValue::from_str(&color.to_css()));
        self.ctx.set_line_width(width as f64);
        self.ctx.move_to(from[0] as f64, from[1] as f64);
        self.ctx.line_to(to[0] as f64, to[1] as f64);
        self.ctx.stroke();
    }
}

/// Maps splash visuals onto the page markup by class name.
pub struct DomHost {
    document: Document,
}

impl DomHost {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn elements(&self, selector: &str) -> Vec<HtmlElement> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    /// Replaces the text of every `selector` match with one
    /// `span.char.inline-block` per character, the targets the entrance
    /// stages animate.
    pub fn split_text(&self, selector: &str, text: &str) {
        let chars = split_chars(text);
        for el in self.elements(selector) {
            el.set_text_content(None);
            for c in &chars {
                let Ok(span) = self.document.create_element("span") else {
                    return;
                };
                span.set_class_name("char inline-block");
                span.set_text_content(Some(&c.to_string()));
                let _ = el.append_child(&span);
            }
        }
    }

    fn style_all(&self, selector: &str, props: &[(&str, String)]) {
        for el in self.elements(selector) {
            set_styles(&el, props);
        }
    }

    fn style_chars(&self, selector: &str, chars: &[CharVisual]) {
        for (el, c) in self.elements(selector).iter().zip(chars) {
            set_styles(
                el,
                &[
                    ("opacity", c.opacity.to_string()),
                    (
                        "transform",
                        format!("translateY({}px) rotateX({}deg)", c.y_px, c.rotate_x_deg),
                    ),
                ],
            );
        }
    }
}

fn set_styles(el: &HtmlElement, props: &[(&str, String)]) {
    let style = el.style();
    for (name, value) in props {
        let _ = style.set_property(name, value);
    }
}

impl HostSurface for DomHost {
    fn apply_visuals(&mut self, v: &SplashVisuals) {
        self.style_all(".splash-screen", &[("visibility", "visible".to_owned())]);
        self.style_chars(".splash-title .char", &v.title);
        self.style_chars(".splash-subtitle .char", &v.subtitle);
        self.style_all(
            ".divider",
            &[
                ("width", format!("{}rem", v.divider_width_rem)),
                ("opacity", v.divider_opacity.to_string()),
            ],
        );
        let decorations = self.elements(".decorative-border, .decorative-circle, .decorative-dot");
        for (el, d) in decorations.iter().zip(&v.decorations) {
            set_styles(
                el,
                &[
                    ("opacity", d.opacity.to_string()),
                    ("transform", format!("scale({})", d.scale)),
                ],
            );
        }
        self.style_all(
            ".splash-screen-gradient",
            &[("opacity", v.gradient_opacity.to_string())],
        );
        self.style_all(
            ".splash-screen",
            &[
                ("transform", format!("translateY({}%)", v.screen_offset_percent)),
                (
                    "display",
                    if v.screen_displayed { "flex" } else { "none" }.to_owned(),
                ),
            ],
        );
        self.style_all(
            ".main-content",
            &[
                ("opacity", v.content_opacity.to_string()),
                ("transform", format!("translateY({}px)", v.content_offset_px)),
            ],
        );
    }

    fn set_interaction_locked(&mut self, locked: bool) {
        if let Some(body) = self.document.body() {
            let overflow = if locked { "hidden" } else { "auto" };
            let _ = body.style().set_property("overflow", overflow);
        }
    }

    fn reveal_content(&mut self) {
        self.style_all(".main-content", &[("pointer-events", "auto".to_owned())]);
        for el in self.elements(".splash-screen") {
            let _ = el.style().set_property("pointer-events", "none");
        }
    }
}

type WebSplash = SplashScreen<CanvasSurface, DomHost>;

/// One splash mount bound to a page.
#[wasm_bindgen]
pub struct SplashApp {
    window: Window,
    inner: Rc<RefCell<WebSplash>>,
    origin_ms: f64,
    ceiling_timer: Option<i32>,
    _ceiling_callback: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl SplashApp {
    /// Mounts the splash. A missing canvas or 2D context is logged and the
    /// timeline plays without particles.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<SplashApp, JsValue> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let document = window.document().ok_or(WebError::NoDocument)?;
        let performance = window.performance().ok_or(WebError::NoPerformance)?;
        let origin_ms = performance.now();

        let surface = match CanvasSurface::from_document(&document, canvas_id) {
            Ok(surface) => Some(surface),
            Err(err) => {
                warn!(%err, "splash canvas unavailable");
                None
            }
        };
        let viewport = viewport_size(&window);
        let config = SplashConfig {
            seed: origin_ms.to_bits(),
            ..SplashConfig::default()
        };
        let ceiling_seconds = config.sequencer.lock_ceiling_seconds;

        let host = DomHost::new(document);
        host.split_text(".splash-title", &config.title);
        host.split_text(".splash-subtitle", &config.subtitle);
        let splash = SplashScreen::mount(config, surface, viewport, host, 0.0)
            .map_err(WebError::from)?;
        let inner = Rc::new(RefCell::new(splash));

        let timer_inner = Rc::clone(&inner);
        let callback = Closure::<dyn FnMut()>::new(move || {
            let now = ((performance.now() - origin_ms) / 1000.0) as f32;
            timer_inner.borrow_mut().advance(now);
        });
        let ceiling_timer = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                (ceiling_seconds as f64 * 1000.0).ceil() as i32,
            )
            .ok();

        Ok(SplashApp {
            window,
            inner,
            origin_ms,
            ceiling_timer,
            _ceiling_callback: Some(callback),
        })
    }

    /// Animation-frame callback. `now_ms` is the rAF timestamp. Returns
    /// `false` once disposed.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let now = ((now_ms - self.origin_ms) / 1000.0) as f32;
        self.inner.borrow_mut().frame(now).is_some()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.inner.borrow_mut().resize(width, height);
    }

    pub fn is_complete(&self) -> bool {
        self.inner.borrow().content_revealed()
    }

    pub fn dispose(&mut self) {
        if let Some(handle) = self.ceiling_timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        self._ceiling_callback = None;
        self.inner.borrow_mut().dispose();
    }
}

impl Drop for SplashApp {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn viewport_size(window: &Window) -> SurfaceSize {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    SurfaceSize::clamped(dim(window.inner_width()), dim(window.inner_height()))
}
