//! Render surfaces
//!
//! The primary surface is an immediate-mode 2D canvas redrawn every frame.
//! A demonstration may additionally acquire one retained-mode layer (a
//! second canvas stacked over the primary one, which gets hidden while the
//! layer exists). At most one retained layer exists at a time: acquiring
//! while one is held fails, and the runtime releases unconditionally before
//! constructing the next demonstration.

pub mod color;
pub mod recording;
pub mod scene;

pub use color::Color;
pub use recording::{DrawCommand, DrawLog, HeadlessLayers, LayerState, RecordingCanvas};
pub use scene::{Camera, NodeId, Scene3d, SceneNode, Shape};

use crate::error::SurfaceError;
use crate::physics::Vector2;

/// Immediate-mode 2D drawing backend
pub trait Canvas2d {
    /// Drawing area in pixels (width, height)
    fn size(&self) -> (f64, f64);

    /// Erase everything
    fn clear(&mut self);

    fn fill_background(&mut self, color: Color) {
        let (w, h) = self.size();
        self.fill_rect(0.0, 0.0, w, h, color);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color);

    fn fill_circle(&mut self, center: Vector2, radius: f64, color: Color);

    fn stroke_circle(&mut self, center: Vector2, radius: f64, width: f64, color: Color);

    fn line(&mut self, from: Vector2, to: Vector2, width: f64, color: Color);

    fn polyline(&mut self, points: &[Vector2], width: f64, color: Color) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], width, color);
        }
    }

    fn fill_polygon(&mut self, points: &[Vector2], color: Color);

    fn text(&mut self, text: &str, at: Vector2, size_px: f64, color: Color);

    /// Shaded ball; backends without gradients fall back to a flat disc
    fn fill_sphere(&mut self, center: Vector2, radius: f64, color: Color) {
        self.fill_circle(center, radius, color);
    }
}

/// Host side of layer management (creating/removing the secondary canvas,
/// toggling the primary canvas)
pub trait LayerHost {
    fn create_retained_layer(&mut self) -> Result<Box<dyn Canvas2d>, SurfaceError>;
    fn remove_retained_layer(&mut self);
    fn set_primary_visible(&mut self, visible: bool);
}

/// The drawing targets handed to demonstrations
pub struct RenderSurface {
    primary: Box<dyn Canvas2d>,
    layers: Box<dyn LayerHost>,
    retained: Option<Box<dyn Canvas2d>>,
}

impl RenderSurface {
    pub fn new(primary: Box<dyn Canvas2d>, layers: Box<dyn LayerHost>) -> Self {
        Self {
            primary,
            layers,
            retained: None,
        }
    }

    pub fn width(&self) -> f64 {
        self.primary.size().0
    }

    pub fn height(&self) -> f64 {
        self.primary.size().1
    }

    pub fn primary(&mut self) -> &mut dyn Canvas2d {
        self.primary.as_mut()
    }

    pub fn clear_primary(&mut self) {
        self.primary.clear();
    }

    /// The retained layer, if one is held
    pub fn retained(&mut self) -> Option<&mut (dyn Canvas2d + 'static)> {
        self.retained.as_deref_mut()
    }

    pub fn has_retained(&self) -> bool {
        self.retained.is_some()
    }

    /// Create the retained layer and bring it to the foreground
    pub fn acquire_retained(&mut self) -> Result<(), SurfaceError> {
        if self.retained.is_some() {
            return Err(SurfaceError::RetainedInUse);
        }
        let layer = self.layers.create_retained_layer()?;
        self.retained = Some(layer);
        self.layers.set_primary_visible(false);
        log::debug!("Retained layer acquired");
        Ok(())
    }

    /// Dispose the retained layer (if any) and put the primary canvas back
    /// in front. Safe to call repeatedly; returns whether a layer was disposed.
    pub fn release(&mut self) -> bool {
        let disposed = self.retained.take().is_some();
        if disposed {
            self.layers.remove_retained_layer();
            log::debug!("Retained layer released");
        }
        self.layers.set_primary_visible(true);
        disposed
    }
}

impl std::fmt::Debug for RenderSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSurface")
            .field("size", &self.primary.size())
            .field("retained", &self.retained.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headless() -> (RenderSurface, HeadlessLayers) {
        let layers = HeadlessLayers::new(800.0, 600.0);
        let surface = RenderSurface::new(
            Box::new(RecordingCanvas::new(800.0, 600.0)),
            Box::new(layers.clone()),
        );
        (surface, layers)
    }

    #[test]
    fn test_single_retained_layer() {
        let (mut surface, layers) = headless();
        assert!(surface.acquire_retained().is_ok());
        assert_eq!(surface.acquire_retained(), Err(SurfaceError::RetainedInUse));
        assert_eq!(layers.state().live_layers, 1);
        assert!(!layers.state().primary_visible);
    }

    #[test]
    fn test_release_restores_primary() {
        let (mut surface, layers) = headless();
        surface.acquire_retained().unwrap();
        assert!(surface.release());
        assert!(!surface.has_retained());
        assert_eq!(layers.state().live_layers, 0);
        assert!(layers.state().primary_visible);

        // Idempotent
        assert!(!surface.release());
        assert!(surface.acquire_retained().is_ok());
    }

    #[test]
    fn test_size_from_primary() {
        let (surface, _) = headless();
        assert_eq!(surface.width(), 800.0);
        assert_eq!(surface.height(), 600.0);
    }
}
