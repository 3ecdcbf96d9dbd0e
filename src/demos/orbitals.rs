//! s, p and d electron clouds as rotating 3D point clouds
//!
//! The only demonstration here that draws on a retained layer: it builds a
//! `Scene3d` once, hides the primary canvas behind its own layer, and gives
//! the layer back in `destroy`.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::controls::{ControlId, ControlValue};
use crate::error::SimError;
use crate::sim::{SimContext, Simulation, StatusReporter};
use crate::surface::{Color, NodeId, RenderSurface, Scene3d, SceneNode, Shape};

const POINT_COUNT: usize = 5000;
/// Rejection-sampling attempts per point before giving up on it
const MAX_ATTEMPTS: usize = 10_000;
/// Samples are drawn from a cube of this edge length centred on the nucleus
const EXTENT: f64 = 20.0;
const DEFAULT_ROTATION_SPEED: f64 = 0.01;
const REDUCED_MOTION_FACTOR: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitalKind {
    S,
    P,
    D,
}

impl OrbitalKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::P => "P",
            Self::D => "D",
        }
    }

    /// Unnormalised acceptance weight at `p`
    pub fn density(self, p: DVec3) -> f64 {
        let r = p.length();
        match self {
            Self::S => (-r).exp(),
            Self::P => p.z.abs() * (-r / 2.0).exp(),
            Self::D => (p.x * p.y).abs() * (-r / 3.0).exp(),
        }
    }
}

/// Draw up to `count` points distributed according to `kind`'s density
pub fn sample_cloud(kind: OrbitalKind, count: usize, rng: &mut impl Rng) -> Vec<DVec3> {
    let mut points = Vec::with_capacity(count);
    let mut dropped = 0usize;
    for _ in 0..count {
        let accepted = (0..MAX_ATTEMPTS).find_map(|_| {
            let p = DVec3::new(
                (rng.random::<f64>() - 0.5) * EXTENT,
                (rng.random::<f64>() - 0.5) * EXTENT,
                (rng.random::<f64>() - 0.5) * EXTENT,
            );
            (rng.random::<f64>() < kind.density(p)).then_some(p)
        });
        match accepted {
            Some(p) => points.push(p),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        log::debug!("{} orbital: dropped {} points after {} attempts each", kind.label(), dropped, MAX_ATTEMPTS);
    }
    points
}

pub struct AtomicOrbitals {
    scene: Scene3d,
    cloud: NodeId,
    kind: OrbitalKind,
    rotation_speed: f64,
    reduced_motion: bool,
    seed: u64,
    rng: Pcg32,
    status: StatusReporter,
    kind_buttons: [(ControlId, OrbitalKind); 3],
    speed_id: ControlId,
}

impl AtomicOrbitals {
    pub fn new(ctx: &mut SimContext<'_>) -> Result<Self, SimError> {
        ctx.surface.acquire_retained()?;

        let mut scene = Scene3d::new();
        scene.background = Some(Color::GRAY_100);
        let cloud = scene.add(SceneNode::new(
            Shape::Points {
                positions: Vec::new(),
                size: 2.0,
            },
            Color::ORANGE,
        ));
        scene.add(SceneNode::new(Shape::Sphere { radius: 0.5 }, Color::BLACK));

        let kind_buttons = [
            (ctx.controls.button("s Orbital"), OrbitalKind::S),
            (ctx.controls.button("p Orbital"), OrbitalKind::P),
            (ctx.controls.button("d Orbital"), OrbitalKind::D),
        ];
        let speed_id = ctx
            .controls
            .slider("Rotation Speed", 0.0, 0.1, 0.001, DEFAULT_ROTATION_SPEED);

        let mut sim = Self {
            scene,
            cloud,
            kind: OrbitalKind::S,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            reduced_motion: ctx.settings().reduced_motion,
            seed: ctx.seed(),
            rng: ctx.rng(),
            status: ctx.status.clone(),
            kind_buttons,
            speed_id,
        };
        sim.rebuild_cloud();
        Ok(sim)
    }

    pub fn kind(&self) -> OrbitalKind {
        self.kind
    }

    pub fn scene(&self) -> &Scene3d {
        &self.scene
    }

    fn rebuild_cloud(&mut self) {
        let points = sample_cloud(self.kind, POINT_COUNT, &mut self.rng);
        if let Some(node) = self.scene.node_mut(self.cloud) {
            node.shape = Shape::Points {
                positions: points,
                size: 2.0,
            };
        }
    }
}

impl Simulation for AtomicOrbitals {
    fn update(&mut self) {
        let step = if self.reduced_motion {
            self.rotation_speed * REDUCED_MOTION_FACTOR
        } else {
            self.rotation_speed
        };
        self.scene.rotation.y += step;
        self.status.report(format!("Orbital: {} (3D)", self.kind.label()));
    }

    fn draw(&mut self, surface: &mut RenderSurface) {
        if let Some(layer) = surface.retained() {
            self.scene.render(layer);
        }
    }

    fn on_control(&mut self, id: ControlId, value: ControlValue) {
        if id == self.speed_id {
            if let Some(speed) = value.as_number() {
                self.rotation_speed = speed;
            }
            return;
        }
        if let Some(&(_, kind)) = self.kind_buttons.iter().find(|(b, _)| *b == id) {
            self.kind = kind;
            self.rebuild_cloud();
        }
    }

    fn reset(&mut self) {
        self.kind = OrbitalKind::S;
        self.scene.rotation = DVec3::ZERO;
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.rebuild_cloud();
    }

    fn destroy(&mut self, surface: &mut RenderSurface) {
        surface.release();
    }
}
