// Drawing side of the particle field. The field only talks to a `Surface`, the
// `Renderer` implements it on top of a 2D canvas context grabbed from the DOM.

use crate::color::Color;
use std::f64::consts::PI;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{console, CanvasRenderingContext2d, HtmlCanvasElement};

pub trait Surface {
    fn clear(&mut self, width: f64, height: f64);
    fn fill_circle(&mut self, center: [f64; 2], radius: f64, color: Color, opacity: f64);
    fn stroke_line(&mut self, from: [f64; 2], to: [f64; 2], width: f64, color: Color, opacity: f64);
}

pub struct Renderer {
    pub context: CanvasRenderingContext2d,
}

impl Renderer {
    // Returns None when the canvas can't hand out a 2d context, the caller
    // treats that as "nothing to draw on" rather than an error
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let context = match canvas.get_context("2d") {
            Ok(Some(context)) => context,
            Ok(None) => return None,
            Err(err) => {
                console::warn_2(&"2d context request failed:".into(), &err);
                return None;
            }
        };
        context
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()
            .map(|context| Renderer { context })
    }
}

impl Surface for Renderer {
    fn clear(&mut self, width: f64, height: f64) {
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    #[allow(deprecated)]
    fn fill_circle(&mut self, center: [f64; 2], radius: f64, color: Color, opacity: f64) {
        self.context
            .set_fill_style(&JsValue::from_str(&color.css_rgba(opacity)));
        self.context.begin_path();
        // arc only throws for a negative radius, skip the particle if it does
        if self
            .context
            .arc(center[0], center[1], radius, 0.0, PI * 2.0)
            .is_ok()
        {
            self.context.fill();
        }
    }

    #[allow(deprecated)]
    fn stroke_line(&mut self, from: [f64; 2], to: [f64; 2], width: f64, color: Color, opacity: f64) {
        self.context
            .set_stroke_style(&JsValue::from_str(&color.css_rgba(opacity)));
        self.context.set_line_width(width);
        self.context.begin_path();
        self.context.move_to(from[0], from[1]);
        self.context.line_to(to[0], to[1]);
        self.context.stroke();
    }
}
