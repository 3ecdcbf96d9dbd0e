//! Headless backends: a canvas that records draw calls and a layer host
//! that tracks layer bookkeeping. Used by the native driver and tests.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use super::{Canvas2d, Color, LayerHost};
use crate::error::SurfaceError;
use crate::physics::Vector2;

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Rect { x: f64, y: f64, w: f64, h: f64, color: Color },
    Circle { center: Vector2, radius: f64, color: Color, filled: bool },
    Line { from: Vector2, to: Vector2, width: f64, color: Color },
    Polygon { points: Vec<Vector2>, color: Color },
    Text { text: String, at: Vector2, size_px: f64, color: Color },
}

#[derive(Debug, Default)]
struct LogState {
    commands: Vec<DrawCommand>,
    clears: usize,
}

/// Shared view of a `RecordingCanvas`'s command list.
/// A `Clear` drops everything before it, so the log only ever holds the
/// current frame; the number of clears is counted separately.
#[derive(Debug, Clone, Default)]
pub struct DrawLog(Rc<RefCell<LogState>>);

impl DrawLog {
    pub fn commands(&self) -> Ref<'_, Vec<DrawCommand>> {
        Ref::map(self.0.borrow(), |state| &state.commands)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().commands.is_empty()
    }

    /// Clears issued over the canvas's lifetime
    pub fn clear_count(&self) -> usize {
        self.0.borrow().clears
    }

    /// Commands issued since the most recent `Clear`
    pub fn since_last_clear(&self) -> Vec<DrawCommand> {
        let state = self.0.borrow();
        let start = state
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map(|i| i + 1)
            .unwrap_or(0);
        state.commands[start..].to_vec()
    }

    fn push(&self, command: DrawCommand) {
        let mut state = self.0.borrow_mut();
        if command == DrawCommand::Clear {
            state.clears += 1;
            state.commands.clear();
        }
        state.commands.push(command);
    }
}

/// A `Canvas2d` that records its calls in a `DrawLog`
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    log: DrawLog,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            log: DrawLog::default(),
        }
    }

    pub fn log(&self) -> DrawLog {
        self.log.clone()
    }
}

impl Canvas2d for RecordingCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.log.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.log.push(DrawCommand::Rect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, center: Vector2, radius: f64, color: Color) {
        self.log.push(DrawCommand::Circle {
            center,
            radius,
            color,
            filled: true,
        });
    }

    fn stroke_circle(&mut self, center: Vector2, radius: f64, _width: f64, color: Color) {
        self.log.push(DrawCommand::Circle {
            center,
            radius,
            color,
            filled: false,
        });
    }

    fn line(&mut self, from: Vector2, to: Vector2, width: f64, color: Color) {
        self.log.push(DrawCommand::Line { from, to, width, color });
    }

    fn fill_polygon(&mut self, points: &[Vector2], color: Color) {
        self.log.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn text(&mut self, text: &str, at: Vector2, size_px: f64, color: Color) {
        self.log.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            size_px,
            color,
        });
    }
}

/// Layer bookkeeping observed by `HeadlessLayers`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerState {
    pub primary_visible: bool,
    pub live_layers: usize,
    pub created_total: usize,
}

/// `LayerHost` without a display; retained layers are `RecordingCanvas`es
#[derive(Debug, Clone)]
pub struct HeadlessLayers {
    width: f64,
    height: f64,
    state: Rc<RefCell<LayerState>>,
    last_layer: Rc<RefCell<Option<DrawLog>>>,
}

impl HeadlessLayers {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            state: Rc::new(RefCell::new(LayerState {
                primary_visible: true,
                live_layers: 0,
                created_total: 0,
            })),
            last_layer: Rc::new(RefCell::new(None)),
        }
    }

    pub fn state(&self) -> LayerState {
        self.state.borrow().clone()
    }

    /// Draw log of the most recently created retained layer
    pub fn last_layer_log(&self) -> Option<DrawLog> {
        self.last_layer.borrow().clone()
    }
}

impl LayerHost for HeadlessLayers {
    fn create_retained_layer(&mut self) -> Result<Box<dyn Canvas2d>, SurfaceError> {
        let canvas = RecordingCanvas::new(self.width, self.height);
        *self.last_layer.borrow_mut() = Some(canvas.log());
        let mut state = self.state.borrow_mut();
        state.live_layers += 1;
        state.created_total += 1;
        Ok(Box::new(canvas))
    }

    fn remove_retained_layer(&mut self) {
        let mut state = self.state.borrow_mut();
        state.live_layers = state.live_layers.saturating_sub(1);
    }

    fn set_primary_visible(&mut self, visible: bool) {
        self.state.borrow_mut().primary_visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_holds_only_current_frame() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        let log = canvas.log();
        for _ in 0..1000 {
            canvas.clear();
            for i in 0..10 {
                canvas.fill_circle(Vector2::new(i as f64, 0.0), 1.0, Color::RED);
            }
        }
        assert_eq!(log.len(), 11);
        assert_eq!(log.clear_count(), 1000);
        assert_eq!(log.since_last_clear().len(), 10);
    }

    #[test]
    fn test_commands_before_first_clear_kept() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        let log = canvas.log();
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0, Color::BLUE);
        canvas.text("hi", Vector2::new(0.0, 0.0), 12.0, Color::BLUE);
        assert_eq!(log.clear_count(), 0);
        assert_eq!(log.since_last_clear().len(), 2);
    }

    #[test]
    fn test_layers_track_visibility() {
        let mut layers = HeadlessLayers::new(10.0, 10.0);
        let _layer = layers.create_retained_layer().unwrap();
        layers.set_primary_visible(false);
        assert_eq!(layers.state().live_layers, 1);
        layers.remove_retained_layer();
        layers.set_primary_visible(true);
        let state = layers.state();
        assert_eq!((state.live_layers, state.created_total, state.primary_visible), (0, 1, true));
    }
}
