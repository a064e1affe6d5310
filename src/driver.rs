//! Browser glue around [`ParticleField`].
//!
//! Looks up the canvas, sizes it to the viewport and runs the field from a
//! `requestAnimationFrame` loop. Window `resize` regenerates the batch and
//! document `visibilitychange` pauses or resumes the loop.
//!
//! All callbacks run on the browser's main thread and never overlap, so the
//! shared state is a plain `Rc<RefCell<_>>`.

use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::field::{FieldStats, ParticleField};
use crate::renderer::Renderer;
use crate::utils::Timer;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, HtmlCanvasElement, Window};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct AnimationState {
    field: ParticleField,
    renderer: Renderer,
    canvas: HtmlCanvasElement,
    frame_id: Option<i32>,
}

impl AnimationState {
    fn schedule(&mut self, window: &Window, callback: &Closure<dyn FnMut()>) {
        match window.request_animation_frame(callback.as_ref().unchecked_ref::<js_sys::Function>()) {
            Ok(id) => self.frame_id = Some(id),
            Err(err) => console::error_2(&"requestAnimationFrame failed:".into(), &err),
        }
    }

    fn cancel(&mut self, window: &Window) {
        if let Some(id) = self.frame_id.take() {
            if let Err(err) = window.cancel_animation_frame(id) {
                console::error_2(&"cancelAnimationFrame failed:".into(), &err);
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let _timer = Timer::new("ParticleField::resize");
        self.field.resize(width, height, &mut rand::thread_rng());
    }
}

/// Handle to a running particle background. The animation keeps going for as
/// long as the handle is alive; dropping it cancels the pending frame and
/// detaches the listeners.
#[wasm_bindgen]
pub struct ParticleBackground {
    window: Window,
    document: Document,
    state: Rc<RefCell<AnimationState>>,
    frame: FrameCallback,
    on_resize: Closure<dyn FnMut()>,
    on_visibility_change: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl ParticleBackground {
    pub fn stats(&self) -> FieldStats {
        self.state.borrow().field.stats()
    }

    pub fn stats_json(&self) -> String {
        serde_json::to_string(&self.stats()).unwrap_or_default()
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().field.is_running()
    }
}

impl Drop for ParticleBackground {
    fn drop(&mut self) {
        self.state.borrow_mut().cancel(&self.window);
        let _ = self.window.remove_event_listener_with_callback(
            "resize",
            self.on_resize.as_ref().unchecked_ref(),
        );
        let _ = self.document.remove_event_listener_with_callback(
            "visibilitychange",
            self.on_visibility_change.as_ref().unchecked_ref(),
        );
        self.frame.borrow_mut().take();
    }
}

/// Starts the background on the canvas with id `canvas_id`.
///
/// Returns `Ok(None)` without scheduling anything when there is no such
/// canvas or it can't provide a 2D context.
pub fn start(canvas_id: &str, config: FieldConfig) -> Result<Option<ParticleBackground>, FieldError> {
    config.validate()?;
    let window = web_sys::window().ok_or(FieldError::NoWindow)?;
    let document = window.document().ok_or(FieldError::NoDocument)?;

    let canvas = match document
        .get_element_by_id(canvas_id)
        .and_then(|element| element.dyn_into::<HtmlCanvasElement>().ok())
    {
        Some(canvas) => canvas,
        None => {
            console::warn_1(&format!("no canvas '{}', particle background disabled", canvas_id).into());
            return Ok(None);
        }
    };
    let renderer = match Renderer::new(&canvas) {
        Some(renderer) => renderer,
        None => {
            console::warn_1(&"2d canvas unavailable, particle background disabled".into());
            return Ok(None);
        }
    };

    let (width, height) = viewport_size(&window)?;
    canvas.set_width(width);
    canvas.set_height(height);
    let field = {
        let _timer = Timer::new("ParticleField::new");
        ParticleField::new(width, height, config, &mut rand::thread_rng())
    };
    console::log_1(
        &format!(
            "particle background: {} particles on {}x{}",
            field.particles().len(),
            width,
            height
        )
        .into(),
    );

    let state = Rc::new(RefCell::new(AnimationState {
        field,
        renderer,
        canvas,
        frame_id: None,
    }));
    let frame: FrameCallback = Rc::new(RefCell::new(None));
    *frame.borrow_mut() = Some(frame_callback(&window, &state, Rc::downgrade(&frame)));

    let on_resize = {
        let window = window.clone();
        let state = state.clone();
        Closure::wrap(Box::new(move || match viewport_size(&window) {
            Ok((width, height)) => state.borrow_mut().resize(width, height),
            Err(err) => console::error_1(&err.into()),
        }) as Box<dyn FnMut()>)
    };
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

    let on_visibility_change = {
        let window = window.clone();
        let document = document.clone();
        let state = state.clone();
        let frame = Rc::downgrade(&frame);
        Closure::wrap(Box::new(move || {
            let mut state = state.borrow_mut();
            if document.hidden() {
                state.field.pause();
                state.cancel(&window);
            } else if state.field.resume() {
                if let Some(frame) = frame.upgrade() {
                    if let Some(callback) = frame.borrow().as_ref() {
                        state.schedule(&window, callback);
                    }
                }
            }
        }) as Box<dyn FnMut()>)
    };
    document.add_event_listener_with_callback(
        "visibilitychange",
        on_visibility_change.as_ref().unchecked_ref(),
    )?;

    {
        let mut state = state.borrow_mut();
        if document.hidden() {
            state.field.pause();
        } else if let Some(callback) = frame.borrow().as_ref() {
            state.schedule(&window, callback);
        }
    }

    Ok(Some(ParticleBackground {
        window,
        document,
        state,
        frame,
        on_resize,
        on_visibility_change,
    }))
}

// One frame per display refresh; the next one is only requested while the
// field is running. Holds a weak reference to itself so the handle owns it.
fn frame_callback(
    window: &Window,
    state: &Rc<RefCell<AnimationState>>,
    frame: Weak<RefCell<Option<Closure<dyn FnMut()>>>>,
) -> Closure<dyn FnMut()> {
    let window = window.clone();
    let state = state.clone();
    Closure::wrap(Box::new(move || {
        let mut state = state.borrow_mut();
        state.frame_id = None;
        if !state.field.is_running() {
            return;
        }
        let AnimationState {
            field, renderer, ..
        } = &mut *state;
        field.update(renderer);
        if let Some(frame) = frame.upgrade() {
            if let Some(callback) = frame.borrow().as_ref() {
                state.schedule(&window, callback);
            }
        }
    }) as Box<dyn FnMut()>)
}

fn viewport_size(window: &Window) -> Result<(u32, u32), FieldError> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width.max(0.0) as u32, height.max(0.0) as u32))
}
