use console_error_panic_hook::set_once;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use gpu::outline::OutlineSettings;
use gpu::{Camera3D, OrbitCamera, RenderSettings, Renderer};
use protocol::LandId;
use runtime::event_bus::{Event, Level};
use runtime::{FrameClock, FrameStats};
use scene::picking::{PickOptions, pick_screen};
use session::{Relay, Session, SessionError};

mod socket;
mod ui;
mod wgpu;
use socket::WebSocketTransport;
use ui::{UiHooks, log_hook_error};
use crate::wgpu::{WgpuContext, init_wgpu, render_frame, resize_wgpu};

/// Browser viewport in CSS pixels plus the device pixel ratio.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    /// Drawing-buffer size in device pixels.
    pub fn physical(&self) -> (u32, u32) {
        let ratio = if self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        };
        (
            (self.width * ratio).round().max(1.0) as u32,
            (self.height * ratio).round().max(1.0) as u32,
        )
    }
}

#[derive(Debug)]
pub struct ViewerState {
    pub session: Session,
    pub orbit: OrbitCamera,
    pub camera: Camera3D,
    pub viewport: Viewport,
    pub outline: OutlineSettings,
    pub stats: FrameStats,
    pub clock: FrameClock,
    pub wgpu: Option<WgpuContext>,
    pub canvas: Option<web_sys::HtmlCanvasElement>,
    pub socket: Option<WebSocketTransport>,
    pub ui: Option<UiHooks>,
    pub renderer_requested: bool,
}

impl Default for ViewerState {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            session: Session::new(),
            orbit: OrbitCamera::default(),
            camera: Camera3D::viewer_default(viewport.width, viewport.height),
            viewport,
            outline: OutlineSettings::default(),
            stats: FrameStats::new(),
            clock: FrameClock::new(),
            wgpu: None,
            canvas: None,
            socket: None,
            ui: None,
            renderer_requested: false,
        }
    }
}

impl ViewerState {
    /// Feeds one inbound text frame to the session. Returns `true` when the
    /// frame configured the session and the renderer should be started.
    pub fn receive(&mut self, text: &str) -> Result<bool, SessionError> {
        let relay = self.session.receive_text(text)?;
        if relay == Relay::Configured && !self.renderer_requested {
            self.renderer_requested = true;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_viewport(viewport.width, viewport.height);
    }

    pub fn pick(&self, x_px: f64, y_px: f64) -> Option<LandId> {
        let Viewport { width, height, .. } = self.viewport;
        let hit = pick_screen(
            self.session.world(),
            self.session.lands(),
            x_px,
            y_px,
            |x, y| self.camera.screen_ray(x, y, width, height),
            PickOptions::default(),
        )?;
        Some(hit.land)
    }

    /// `vsync_ms` is the rAF timestamp and drives the frame clock; frame time
    /// is measured from `started_ms`, when the callback actually ran.
    pub fn begin_frame(&mut self, vsync_ms: f64, started_ms: f64) {
        self.stats.begin(started_ms);
        self.clock.tick(vsync_ms);
    }

    pub fn end_frame(&mut self, finished_ms: f64) {
        self.stats.end(finished_ms);
    }

    fn update_camera(&mut self, f: impl FnOnce(&mut OrbitCamera)) {
        f(&mut self.orbit);
        self.orbit.apply_to(&mut self.camera);
    }

    pub fn reset_camera(&mut self) {
        self.update_camera(|orbit| *orbit = OrbitCamera::default());
    }
}

thread_local! {
    static STATE: RefCell<ViewerState> = RefCell::new(ViewerState::default());
}

fn log_event(event: &Event) {
    let line = JsValue::from_str(&format!("[{}] {}", event.kind, event.message));
    match event.level {
        Level::Debug => web_sys::console::debug_1(&line),
        Level::Info => web_sys::console::log_1(&line),
        Level::Warn => web_sys::console::warn_1(&line),
        Level::Error => web_sys::console::error_1(&line),
    }
}

fn flush_events() {
    let events = STATE.with(|state| state.borrow_mut().session.drain_events());
    for event in &events {
        log_event(event);
    }
}

fn read_viewport(window: &web_sys::Window) -> Viewport {
    let dimension = |v: Result<JsValue, JsValue>, fallback: f64| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
    };
    let defaults = Viewport::default();
    Viewport {
        width: dimension(window.inner_width(), defaults.width),
        height: dimension(window.inner_height(), defaults.height),
        pixel_ratio: window.device_pixel_ratio(),
    }
}

fn size_canvas(canvas: &web_sys::HtmlCanvasElement, viewport: Viewport) -> Result<(), JsValue> {
    let (width, height) = viewport.physical();
    canvas.set_width(width);
    canvas.set_height(height);
    canvas.set_attribute(
        "style",
        &format!(
            "display:block;width:{}px;height:{}px",
            viewport.width, viewport.height
        ),
    )
}

fn handle_text(text: String) {
    let outcome = STATE.with(|state| state.borrow_mut().receive(&text));
    match outcome {
        Ok(true) => start_renderer(),
        Ok(false) => {}
        Err(err) => {
            web_sys::console::warn_1(&JsValue::from_str(&format!("event rejected: {err}")));
        }
    }
    flush_events();
}

fn start_renderer() {
    spawn_local(async move {
        if let Err(err) = start_renderer_inner().await {
            web_sys::console::error_1(&JsValue::from_str(&format!(
                "renderer init error: {:?}",
                err
            )));
        }
    });
}

async fn start_renderer_inner() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("document missing"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("body missing"))?;

    let canvas = document
        .create_element("canvas")?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;
    let viewport = read_viewport(&window);
    size_canvas(&canvas, viewport)?;
    body.append_child(&canvas)?;

    let settings = RenderSettings::for_pixel_ratio(viewport.pixel_ratio);
    let (width, height) = viewport.physical();
    let ctx = init_wgpu(canvas.clone(), width, height, settings).await?;

    let hooks = STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.set_viewport(viewport);
        s.wgpu = Some(ctx);
        s.canvas = Some(canvas);
        s.ui.clone()
    });

    if let Some(hooks) = &hooks {
        log_hook_error("initUI", hooks.init_ui());
        log_hook_error("initControls", hooks.init_controls());
    }

    install_resize_listener(&window)?;
    start_render_loop();
    Ok(())
}

fn on_resize() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let viewport = read_viewport(&window);
    let hooks = STATE.with(|state| {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        s.set_viewport(viewport);
        if let Some(canvas) = &s.canvas {
            if let Err(err) = size_canvas(canvas, viewport) {
                web_sys::console::warn_1(&err);
            }
        }
        if let Some(ctx) = &mut s.wgpu {
            let (width, height) = viewport.physical();
            resize_wgpu(ctx, width, height);
        }
        s.ui.clone()
    });
    if let Some(hooks) = hooks {
        log_hook_error("resizeUI", hooks.resize_ui());
    }
}

fn install_resize_listener(window: &web_sys::Window) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(on_resize) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn render_tick(timestamp_ms: f64) {
    let (hooks, view_proj, land_count) = STATE.with(|state| {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        s.begin_frame(timestamp_ms, now_ms());

        let frame = Renderer::collect(s.session.world());
        let uniform = frame.scene_uniform(&s.camera);
        if let Some(ctx) = &mut s.wgpu {
            if let Err(err) = render_frame(ctx, &frame, &uniform, &s.outline) {
                web_sys::console::warn_1(&err);
            }
        }
        (s.ui.clone(), uniform.view_proj, s.session.lands().len())
    });

    if let Some(hooks) = hooks {
        let flat: Vec<f32> = view_proj.iter().flatten().copied().collect();
        let matrix = js_sys::Float32Array::from(flat.as_slice());
        log_hook_error("renderUI", hooks.render_ui(&matrix, land_count as u32));
    }

    let end = now_ms();
    STATE.with(|state| state.borrow_mut().end_frame(end));
    flush_events();
}

fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(err) = window.request_animation_frame(f.as_ref().unchecked_ref()) {
        web_sys::console::error_1(&err);
    }
}

fn start_render_loop() {
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp_ms: f64| {
        render_tick(timestamp_ms);
        if let Some(cb) = f.borrow().as_ref() {
            request_animation_frame(cb);
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(cb) = g.borrow().as_ref() {
        request_animation_frame(cb);
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Opens the event connection. Rendering starts once `variables` arrives.
#[wasm_bindgen]
pub fn connect(url: &str) -> Result<(), JsValue> {
    let transport = WebSocketTransport::open(url, handle_text)?;
    STATE.with(|state| state.borrow_mut().socket = Some(transport));
    Ok(())
}

/// Registers the page's UI collaborator. Call before `connect`.
#[wasm_bindgen]
pub fn set_ui_hooks(hooks: UiHooks) {
    STATE.with(|state| state.borrow_mut().ui = Some(hooks));
}

/// Land under the given canvas position (CSS pixels), if any.
#[wasm_bindgen]
pub fn pick_land(x_px: f64, y_px: f64) -> Option<u32> {
    STATE.with(|state| state.borrow().pick(x_px, y_px).map(|id| id.0))
}

/// Sends `purchaseLand` when the land exists and is unowned.
#[wasm_bindgen]
pub fn request_purchase(id: u32) -> Result<bool, JsValue> {
    STATE.with(|state| {
        let s = state.borrow();
        let socket = s
            .socket
            .as_ref()
            .ok_or_else(|| JsValue::from_str("not connected"))?;
        s.session
            .request_purchase(socket, LandId(id))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    })
}

/// Sends `sellLand` when the land exists and is owned.
#[wasm_bindgen]
pub fn request_sell(id: u32) -> Result<bool, JsValue> {
    STATE.with(|state| {
        let s = state.borrow();
        let socket = s
            .socket
            .as_ref()
            .ok_or_else(|| JsValue::from_str("not connected"))?;
        s.session
            .request_sell(socket, LandId(id))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    })
}

#[wasm_bindgen]
pub fn land_owner(id: u32) -> Option<String> {
    STATE.with(|state| {
        state
            .borrow()
            .session
            .lands()
            .get(LandId(id))
            .and_then(|unit| unit.owner.as_ref())
            .map(|owner| owner.as_str().to_string())
    })
}

#[wasm_bindgen]
pub fn land_count() -> u32 {
    STATE.with(|state| state.borrow().session.lands().len() as u32)
}

/// Frame statistics as a JSON string.
#[wasm_bindgen]
pub fn frame_stats() -> String {
    STATE.with(|state| {
        let s = state.borrow();
        let snapshot = s.stats.snapshot();
        serde_json::json!({
            "frames": snapshot.frames,
            "fps": snapshot.fps,
            "frameMsMean": snapshot.frame_ms.mean(),
            "frameMsMax": snapshot.frame_ms.max,
            "ticks": s.clock.frames_elapsed(),
            "ownedLands": s.session.lands().owned_count(),
        })
        .to_string()
    })
}

#[wasm_bindgen]
pub fn camera_reset() {
    STATE.with(|state| state.borrow_mut().reset_camera());
}

/// Orbit around the camera target.
///
/// Intended usage: call with pointer delta in pixels.
#[wasm_bindgen]
pub fn camera_orbit(delta_x_px: f64, delta_y_px: f64) {
    STATE.with(|state| {
        state
            .borrow_mut()
            .update_camera(|orbit| orbit.orbit(delta_x_px, delta_y_px))
    });
}

/// Pan the camera target.
///
/// Intended usage: call with pointer delta in pixels.
#[wasm_bindgen]
pub fn camera_pan(delta_x_px: f64, delta_y_px: f64) {
    STATE.with(|state| {
        state
            .borrow_mut()
            .update_camera(|orbit| orbit.pan(delta_x_px, delta_y_px))
    });
}

/// Zoom (dolly) in/out.
///
/// Intended usage: call with wheel deltaY.
#[wasm_bindgen]
pub fn camera_zoom(wheel_delta_y: f64) {
    STATE.with(|state| {
        state
            .borrow_mut()
            .update_camera(|orbit| orbit.zoom(wheel_delta_y))
    });
}
