//! Browser host
//!
//! Canvas 2D drawing, the retained layer stacked in `#canvas-container`,
//! the control/status panels and `requestAnimationFrame` scheduling, plus
//! the `Gallery` object the page's menu script drives.

use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, EventTarget, HtmlCanvasElement, HtmlInputElement,
    HtmlSelectElement, Window,
};

use crate::controls::{ControlDescriptor, ControlValue, Widget, WidgetInput};
use crate::demos;
use crate::error::SurfaceError;
use crate::physics::Vector2;
use crate::runtime::{FrameClock, FrameHandle, Host, PanelHost, Runtime};
use crate::settings::Settings;
use crate::status::status_lines;
use crate::surface::{Canvas2d, Color, LayerHost, RenderSurface};

pub const CANVAS_ID: &str = "sim-canvas";
pub const CONTAINER_ID: &str = "canvas-container";
pub const CONTROLS_ID: &str = "sim-controls";
pub const DATA_ID: &str = "sim-data";
pub const PLAY_BUTTON_ID: &str = "sim-play-pause";
pub const PLAY_ICON_ID: &str = "play-icon";
pub const RESET_ID: &str = "sim-reset";
const RETAINED_CLASS: &str = "retained-layer";

type EventClosure = Closure<dyn FnMut(Event)>;

/// Back-reference from browser callbacks to the runtime, bound once the
/// runtime exists
#[derive(Clone, Default)]
struct RuntimeLink(Rc<RefCell<Weak<RefCell<Runtime>>>>);

impl RuntimeLink {
    fn bind(&self, runtime: &Rc<RefCell<Runtime>>) {
        *self.0.borrow_mut() = Rc::downgrade(runtime);
    }

    /// Run `f` on the runtime; skipped if it is gone or mid-operation
    fn with<R>(&self, f: impl FnOnce(&mut Runtime) -> R) -> Option<R> {
        let runtime = self.0.borrow().upgrade()?;
        let Ok(mut runtime) = runtime.try_borrow_mut() else {
            log::warn!("Runtime busy; dropping browser callback");
            return None;
        };
        Some(f(&mut runtime))
    }
}

fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{}", id)))
}

fn listen(target: &EventTarget, event: &str, mut handler: impl FnMut() + 'static) -> Result<EventClosure, JsValue> {
    let closure = EventClosure::new(move |_event: Event| handler());
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    Ok(closure)
}

// === Drawing ===

/// `Canvas2d` over a `CanvasRenderingContext2d`
pub struct WebCanvas {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl WebCanvas {
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    fn circle_path(&self, center: Vector2, radius: f64) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU);
    }

    fn path(&self, points: &[Vector2]) {
        self.ctx.begin_path();
        if let Some((first, rest)) = points.split_first() {
            self.ctx.move_to(first.x, first.y);
            for p in rest {
                self.ctx.line_to(p.x, p.y);
            }
        }
    }

    fn stroke_with(&self, width: f64, color: Color) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }
}

impl Canvas2d for WebCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(x, y, w, h);
    }

    fn fill_circle(&mut self, center: Vector2, radius: f64, color: Color) {
        self.circle_path(center, radius);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vector2, radius: f64, width: f64, color: Color) {
        self.circle_path(center, radius);
        self.stroke_with(width, color);
    }

    fn line(&mut self, from: Vector2, to: Vector2, width: f64, color: Color) {
        self.path(&[from, to]);
        self.stroke_with(width, color);
    }

    fn polyline(&mut self, points: &[Vector2], width: f64, color: Color) {
        if points.len() < 2 {
            return;
        }
        self.path(points);
        self.stroke_with(width, color);
    }

    fn fill_polygon(&mut self, points: &[Vector2], color: Color) {
        if points.len() < 3 {
            return;
        }
        self.path(points);
        self.ctx.close_path();
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn text(&mut self, text: &str, at: Vector2, size_px: f64, color: Color) {
        self.ctx.set_font(&format!("{}px sans-serif", size_px));
        self.ctx.set_fill_style_str(&color.to_css());
        let _ = self.ctx.fill_text(text, at.x, at.y);
    }

    /// Radial highlight from white through `color` to black
    fn fill_sphere(&mut self, center: Vector2, radius: f64, color: Color) {
        if radius < 2.0 {
            self.fill_circle(center, radius, color);
            return;
        }
        let gradient = match self.ctx.create_radial_gradient(
            center.x - radius * 0.3,
            center.y - radius * 0.3,
            radius * 0.1,
            center.x,
            center.y,
            radius,
        ) {
            Ok(g) => g,
            Err(_) => {
                self.fill_circle(center, radius, color);
                return;
            }
        };
        let _ = gradient.add_color_stop(0.0, "white");
        let _ = gradient.add_color_stop(0.4, &color.to_css());
        let _ = gradient.add_color_stop(1.0, "black");
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.circle_path(center, radius);
        self.ctx.fill();
    }
}

// === Layers ===

/// Retained layers as extra canvases stacked over the primary one
pub struct DomLayers {
    document: Document,
    container: Element,
    primary: HtmlCanvasElement,
}

fn layer_error(e: impl std::fmt::Debug) -> SurfaceError {
    SurfaceError::LayerUnavailable(format!("{:?}", e))
}

impl LayerHost for DomLayers {
    fn create_retained_layer(&mut self) -> Result<Box<dyn Canvas2d>, SurfaceError> {
        let canvas: HtmlCanvasElement = self
            .document
            .create_element("canvas")
            .map_err(layer_error)?
            .dyn_into()
            .map_err(layer_error)?;
        canvas.set_width(self.primary.width());
        canvas.set_height(self.primary.height());
        canvas
            .class_list()
            .add_3(RETAINED_CLASS, "absolute", "inset-0")
            .map_err(layer_error)?;
        self.container.append_child(&canvas).map_err(layer_error)?;
        let layer = WebCanvas::from_canvas(&canvas).map_err(layer_error)?;
        Ok(Box::new(layer))
    }

    fn remove_retained_layer(&mut self) {
        let selector = format!(".{}", RETAINED_CLASS);
        while let Ok(Some(el)) = self.container.query_selector(&selector) {
            el.remove();
        }
    }

    fn set_primary_visible(&mut self, visible: bool) {
        let style = self.primary.style();
        let _ = style.set_property("display", if visible { "block" } else { "none" });
    }
}

// === Panels ===

/// Control widgets in `#sim-controls`, status text in `#sim-data`
pub struct DomPanels {
    document: Document,
    controls: Element,
    data: Element,
    play_icon: Option<Element>,
    link: RuntimeLink,
    /// Listeners of the widgets currently in the panel
    listeners: Vec<EventClosure>,
}

impl DomPanels {
    fn new(document: &Document, link: RuntimeLink) -> Result<Self, JsValue> {
        Ok(Self {
            document: document.clone(),
            controls: element(document, CONTROLS_ID)?,
            data: element(document, DATA_ID)?,
            play_icon: document.get_element_by_id(PLAY_ICON_ID),
            link,
            listeners: Vec::new(),
        })
    }

    fn build_widget(&mut self, control: &ControlDescriptor) -> Result<Element, JsValue> {
        let doc = &self.document;
        let id = control.id;
        let row = doc.create_element("div")?;
        row.set_class_name("flex flex-col space-y-1");
        let label = doc.create_element("label")?;
        label.set_class_name("text-sm font-medium text-gray-700 flex justify-between");

        match &control.widget {
            Widget::Slider { min, max, step, value } => {
                let name = doc.create_element("span")?;
                name.set_text_content(Some(&control.label));
                let echo = doc.create_element("span")?;
                echo.set_class_name("text-gray-500 font-normal");
                echo.set_id(&format!("val-{}", id.0));
                echo.set_text_content(Some(&value.to_string()));
                label.append_child(&name)?;
                label.append_child(&echo)?;

                let input: HtmlInputElement = doc.create_element("input")?.dyn_into()?;
                input.set_type("range");
                input.set_min(&min.to_string());
                input.set_max(&max.to_string());
                input.set_step(&step.to_string());
                input.set_value(&value.to_string());
                input.set_class_name("w-full");

                let link = self.link.clone();
                let source = input.clone();
                self.listeners.push(listen(&input, "input", move || {
                    let raw = WidgetInput::Value(source.value());
                    if let Some(Ok(ControlValue::Number(n))) = link.with(|rt| rt.control_input(id, &raw)) {
                        echo.set_text_content(Some(&n.to_string()));
                    }
                })?);

                row.append_child(&label)?;
                row.append_child(&input)?;
            }
            Widget::Checkbox { checked } => {
                row.set_class_name("flex flex-row items-center space-x-3");
                let input: HtmlInputElement = doc.create_element("input")?.dyn_into()?;
                input.set_type("checkbox");
                input.set_checked(*checked);
                input.set_class_name("w-5 h-5 text-blue-600 rounded focus:ring-blue-500 border-gray-300");
                label.set_text_content(Some(&control.label));

                let link = self.link.clone();
                let source = input.clone();
                self.listeners.push(listen(&input, "change", move || {
                    let raw = WidgetInput::Checked(source.checked());
                    link.with(|rt| rt.control_input(id, &raw));
                })?);

                row.append_child(&input)?;
                row.append_child(&label)?;
            }
            Widget::Button => {
                let button = doc.create_element("button")?;
                button.set_text_content(Some(&control.label));
                button.set_class_name("w-full bg-white border border-gray-300 text-gray-700 py-2 rounded hover:bg-gray-50");

                let link = self.link.clone();
                self.listeners.push(listen(&button, "click", move || {
                    link.with(|rt| rt.control_input(id, &WidgetInput::Click));
                })?);

                row.append_child(&button)?;
            }
            Widget::Select { options, selected } => {
                label.set_text_content(Some(&control.label));
                let select: HtmlSelectElement = doc.create_element("select")?.dyn_into()?;
                select.set_class_name("w-full bg-white border border-gray-300 text-gray-700 py-1.5 px-3 rounded");
                for option in options {
                    let el = doc.create_element("option")?;
                    el.set_attribute("value", option)?;
                    el.set_text_content(Some(option));
                    select.append_child(&el)?;
                }
                if let Some(index) = selected {
                    select.set_selected_index(*index as i32);
                }

                let link = self.link.clone();
                let source = select.clone();
                self.listeners.push(listen(&select, "change", move || {
                    let raw = WidgetInput::Value(source.value());
                    link.with(|rt| rt.control_input(id, &raw));
                })?);

                row.append_child(&label)?;
                row.append_child(&select)?;
            }
        }
        Ok(row)
    }
}

impl PanelHost for DomPanels {
    fn clear_controls(&mut self) {
        self.controls.set_inner_html("");
        self.listeners.clear();
    }

    fn add_control(&mut self, control: &ControlDescriptor) {
        let widget = self.build_widget(control);
        match widget.and_then(|row| self.controls.append_child(&row)) {
            Ok(_) => {}
            Err(e) => log::error!("Failed to build control '{}': {:?}", control.label, e),
        }
    }

    /// Lines become text nodes separated by `<br>`; nothing is parsed as markup
    fn set_status(&mut self, text: &str) {
        self.data.set_text_content(None);
        for (i, line) in status_lines(text).enumerate() {
            if i > 0 {
                if let Ok(br) = self.document.create_element("br") {
                    let _ = self.data.append_child(&br);
                }
            }
            let _ = self.data.append_child(&self.document.create_text_node(line));
        }
    }

    fn set_running(&mut self, running: bool) {
        if let Some(icon) = &self.play_icon {
            icon.set_text_content(Some(if running { "⏸" } else { "▶" }));
        }
    }
}

// === Scheduling ===

/// `FrameClock` over `requestAnimationFrame`; handles are rAF ids
pub struct RafClock {
    window: Window,
    link: RuntimeLink,
}

impl FrameClock for RafClock {
    fn request_frame(&mut self) -> FrameHandle {
        let link = self.link.clone();
        let raf_id = Rc::new(Cell::new(0));
        let fired_id = raf_id.clone();
        let callback = Closure::once_into_js(move |time: f64| {
            link.with(|rt| rt.on_frame(FrameHandle(fired_id.get() as u64), time));
        });
        match self.window.request_animation_frame(callback.unchecked_ref()) {
            Ok(id) => {
                raf_id.set(id);
                FrameHandle(id as u64)
            }
            Err(e) => {
                // rAF ids start at 1, so this handle never fires
                log::error!("requestAnimationFrame failed: {:?}", e);
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0 as i32);
    }
}

// === JS surface ===

/// The runtime as seen by the page's menu script
#[wasm_bindgen]
pub struct Gallery {
    runtime: Rc<RefCell<Runtime>>,
    /// Play/pause and reset button listeners
    _buttons: Vec<EventClosure>,
}

#[wasm_bindgen]
impl Gallery {
    /// Attach to `#sim-canvas`, `#sim-controls` and `#sim-data` and register
    /// the bundled demonstrations
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Gallery, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = element(&document, CANVAS_ID)?.dyn_into()?;
        let container = element(&document, CONTAINER_ID)?;

        let link = RuntimeLink::default();
        let surface = RenderSurface::new(
            Box::new(WebCanvas::from_canvas(&canvas)?),
            Box::new(DomLayers {
                document: document.clone(),
                container,
                primary: canvas,
            }),
        );
        let host = Host {
            surface,
            panels: Box::new(DomPanels::new(&document, link.clone())?),
            clock: Box::new(RafClock {
                window: window.clone(),
                link: link.clone(),
            }),
        };

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let mut runtime = Runtime::new(host, settings, seed);
        demos::register_all(&mut runtime);

        let runtime = Rc::new(RefCell::new(runtime));
        link.bind(&runtime);

        let mut buttons = Vec::new();
        if let Some(play) = document.get_element_by_id(PLAY_BUTTON_ID) {
            let link = link.clone();
            buttons.push(listen(&play, "click", move || {
                link.with(Runtime::toggle_play);
            })?);
        }
        if let Some(reset) = document.get_element_by_id(RESET_ID) {
            let link = link.clone();
            buttons.push(listen(&reset, "click", move || {
                link.with(Runtime::reset);
            })?);
        }

        log::info!("Gallery ready with {} simulations", runtime.borrow().registered_ids().len());
        Ok(Gallery {
            runtime,
            _buttons: buttons,
        })
    }

    /// Returns false if the id is unknown or the simulation failed to start;
    /// the status panel says which
    #[wasm_bindgen(js_name = loadSim)]
    pub fn load_sim(&self, id: &str) -> bool {
        self.runtime.borrow_mut().load_sim(id).is_ok()
    }

    #[wasm_bindgen(js_name = startSim)]
    pub fn start_sim(&self) {
        self.runtime.borrow_mut().start_sim();
    }

    #[wasm_bindgen(js_name = stopSim)]
    pub fn stop_sim(&self) {
        self.runtime.borrow_mut().stop_sim();
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&self) {
        self.runtime.borrow_mut().toggle_play();
    }

    pub fn reset(&self) {
        self.runtime.borrow_mut().reset();
    }

    /// Destroy the current simulation (modal closed)
    pub fn unload(&self) {
        self.runtime.borrow_mut().unload();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.runtime.borrow().is_running()
    }

    #[wasm_bindgen(js_name = currentId)]
    pub fn current_id(&self) -> Option<String> {
        self.runtime.borrow().current_id().map(str::to_string)
    }

    #[wasm_bindgen(js_name = statusText)]
    pub fn status_text(&self) -> String {
        self.runtime.borrow().status_text()
    }

    #[wasm_bindgen(js_name = simulationIds)]
    pub fn simulation_ids(&self) -> Vec<String> {
        self.runtime
            .borrow()
            .registered_ids()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn fps(&self) -> u32 {
        self.runtime.borrow().fps()
    }
}
