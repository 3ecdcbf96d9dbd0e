//! Bundled demonstrations

pub mod bouncing_balls;
pub mod orbitals;
pub mod projectile;

pub use bouncing_balls::BouncingBalls;
pub use orbitals::{AtomicOrbitals, OrbitalKind};
pub use projectile::{ProjectileChallenge, ProjectileMotion};

use crate::runtime::Runtime;
use crate::sim::Simulation;

pub const DEFAULT_DEMO: &str = "bouncing-balls";

/// Register every bundled demonstration under its gallery id
pub fn register_all(runtime: &mut Runtime) {
    runtime.register("projectile-motion", |ctx| {
        Ok(Box::new(ProjectileMotion::new(ctx)?) as Box<dyn Simulation>)
    });
    runtime.register("projectile-game", |ctx| {
        Ok(Box::new(ProjectileChallenge::new(ctx)?) as Box<dyn Simulation>)
    });
    runtime.register("bouncing-balls", |ctx| {
        Ok(Box::new(BouncingBalls::new(ctx)?) as Box<dyn Simulation>)
    });
    runtime.register("atomic-orbitals", |ctx| {
        Ok(Box::new(AtomicOrbitals::new(ctx)?) as Box<dyn Simulation>)
    });
}

#[cfg(test)]
pub(crate) mod harness {
    use crate::settings::Settings;
    use crate::sim::{SharedPanels, SimContext};
    use crate::surface::{DrawLog, HeadlessLayers, RecordingCanvas, RenderSurface};

    pub const WIDTH: f64 = 800.0;
    pub const HEIGHT: f64 = 600.0;

    /// Run a constructor against a fresh headless surface and empty panels.
    /// Returns its result, the surface, the panels and the primary canvas log.
    pub fn build<T>(make: impl FnOnce(&mut SimContext<'_>) -> T) -> (T, RenderSurface, SharedPanels, DrawLog) {
        let canvas = RecordingCanvas::new(WIDTH, HEIGHT);
        let log = canvas.log();
        let mut surface = RenderSurface::new(Box::new(canvas), Box::new(HeadlessLayers::new(WIDTH, HEIGHT)));
        let panels = SharedPanels::default();
        let settings = Settings::default();
        let value = {
            let mut ctx = SimContext::new(&mut surface, &panels, &settings, 42);
            make(&mut ctx)
        };
        (value, surface, panels, log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HeadlessHost, headless};
    use crate::runtime::{ManualClock, RuntimeState};
    use crate::settings::Settings;
    use crate::surface::HeadlessLayers;

    fn gallery() -> (Runtime, ManualClock, HeadlessLayers) {
        let HeadlessHost {
            host, clock, layers, ..
        } = headless(harness::WIDTH, harness::HEIGHT);
        let mut runtime = Runtime::new(host, Settings::default(), 7);
        register_all(&mut runtime);
        (runtime, clock, layers)
    }

    #[test]
    fn test_every_demo_loads_and_runs() {
        let (mut runtime, clock, layers) = gallery();
        let ids: Vec<String> = runtime.registered_ids().iter().map(|s| s.to_string()).collect();
        assert_eq!(
            ids,
            ["atomic-orbitals", "bouncing-balls", "projectile-game", "projectile-motion"]
        );
        for id in &ids {
            runtime.load_sim(id).unwrap();
            assert_eq!(runtime.state(), RuntimeState::Running);
            clock.run(&mut runtime, 3, 0.0, 16.0);
            assert!(!runtime.status_text().is_empty(), "{} reported nothing", id);
        }
        runtime.unload();
        assert_eq!(layers.state().live_layers, 0);
        assert!(layers.state().primary_visible);
    }

    #[test]
    fn test_switch_from_3d_to_2d() {
        let (mut runtime, clock, layers) = gallery();
        runtime.load_sim("atomic-orbitals").unwrap();
        assert!(!layers.state().primary_visible);
        clock.advance(&mut runtime, 0.0);

        runtime.load_sim(DEFAULT_DEMO).unwrap();
        assert!(layers.state().primary_visible);
        assert_eq!(layers.state().live_layers, 0);
        clock.advance(&mut runtime, 16.0);
        assert!(runtime.status_text().starts_with("Total Kinetic Energy"));
    }

    #[test]
    fn test_reset_while_paused_repaints_orbitals() {
        let (mut runtime, clock, layers) = gallery();
        runtime.load_sim("atomic-orbitals").unwrap();
        clock.run(&mut runtime, 2, 0.0, 16.0);
        runtime.stop_sim();

        let layer = layers.last_layer_log().unwrap();
        let clears = layer.clear_count();
        runtime.reset();
        assert_eq!(layer.clear_count(), clears + 1);
    }

    #[test]
    fn test_headless_logs_stay_bounded() {
        let (mut runtime, clock, layers) = gallery();
        runtime.load_sim("atomic-orbitals").unwrap();
        clock.run(&mut runtime, 60, 0.0, 16.0);
        let layer = layers.last_layer_log().unwrap();

        // One frame's worth: clear, background, at most the cloud plus nucleus
        assert!(layer.clear_count() >= 60);
        assert_eq!(layer.len(), layer.since_last_clear().len() + 1);
        assert!(layer.len() < 6000, "{} commands retained", layer.len());
    }
}
