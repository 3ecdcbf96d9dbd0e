//! Cannon firing projectiles, plus a target-practice variant driven by a
//! challenge set

use crate::challenge::{Challenge, ChallengeSet};
use crate::controls::{ControlId, ControlValue};
use crate::error::SimError;
use crate::physics::Vector2;
use crate::sim::{SimContext, Simulation, StatusReporter};
use crate::surface::{Canvas2d, Color, RenderSurface};

/// Seconds advanced per frame
const DT: f64 = 0.1;
/// Pixels per metre
const SCALE: f64 = 10.0;
const MUZZLE_OFFSET: f64 = 50.0;
const GROUND_HEIGHT: f64 = 10.0;
const MAX_SHOTS: usize = 5;

const CANNON_COLOR: Color = Color::from_hex(0x444444);
const GROUND_COLOR: Color = Color::from_hex(0x8bc34a);
const TRAIL_COLOR: Color = Color::rgba(0, 0, 0, 0.2);

#[derive(Debug, Clone)]
struct Shot {
    pos: Vector2,
    vel: Vector2,
    path: Vec<Vector2>,
    ticks: u32,
}

#[derive(Debug, Clone, Copy)]
struct Ids {
    angle: ControlId,
    speed: ControlId,
    gravity: ControlId,
    vectors: ControlId,
    fire: ControlId,
}

pub struct ProjectileMotion {
    angle: f64,
    speed: f64,
    gravity: f64,
    show_vectors: bool,
    shots: Vec<Shot>,
    width: f64,
    height: f64,
    status: StatusReporter,
    ids: Ids,
}

impl ProjectileMotion {
    pub fn new(ctx: &mut SimContext<'_>) -> Result<Self, SimError> {
        let ids = Ids {
            angle: ctx.controls.slider("Angle", 0.0, 90.0, 1.0, 45.0),
            speed: ctx.controls.slider("Initial Speed", 5.0, 30.0, 1.0, 15.0),
            gravity: ctx.controls.slider("Gravity", 1.0, 20.0, 0.5, 9.8),
            vectors: ctx.controls.checkbox("Show Vectors", true),
            fire: ctx.controls.button("Fire Cannon"),
        };
        Ok(Self {
            angle: 45.0,
            speed: 15.0,
            gravity: 9.8,
            show_vectors: true,
            shots: Vec::new(),
            width: ctx.width(),
            height: ctx.height(),
            status: ctx.status.clone(),
            ids,
        })
    }

    fn muzzle(&self) -> Vector2 {
        Vector2::new(MUZZLE_OFFSET, self.height - MUZZLE_OFFSET)
    }

    pub fn fire(&mut self) {
        let rad = self.angle.to_radians();
        // Canvas y grows downwards
        let vel = Vector2::new(rad.cos() * self.speed, -rad.sin() * self.speed);
        self.shots.push(Shot {
            pos: self.muzzle(),
            vel,
            path: Vec::new(),
            ticks: 0,
        });
        log::debug!("Fired at {}° / {} m/s", self.angle, self.speed);
    }

    /// Horizontal distance of the latest shot from the muzzle, in metres
    pub fn last_distance(&self) -> Option<f64> {
        self.shots.last().map(|s| (s.pos.x - MUZZLE_OFFSET) / SCALE)
    }

    /// Advance every shot one step without reporting
    fn step(&mut self) {
        let floor = self.height - GROUND_HEIGHT;
        for shot in &mut self.shots {
            if shot.ticks % 2 == 0 {
                shot.path.push(shot.pos);
            }
            shot.ticks += 1;

            shot.vel.y += self.gravity * DT;
            shot.pos = shot.pos + shot.vel * DT;

            if shot.pos.y > floor {
                shot.pos.y = floor;
                shot.vel.y *= -0.6;
                shot.vel.x *= 0.8;
                if shot.vel.y.abs() < 1.0 {
                    shot.vel.y = 0.0;
                }
                if shot.vel.x.abs() < 0.1 {
                    shot.vel.x = 0.0;
                }
            }
        }
        if self.shots.len() > MAX_SHOTS {
            self.shots.remove(0);
        }
    }

    fn readout(&self) -> String {
        match self.shots.last() {
            Some(shot) => {
                let h = ((self.height - MUZZLE_OFFSET - shot.pos.y) / SCALE).max(0.0);
                let d = (shot.pos.x - MUZZLE_OFFSET) / SCALE;
                format!(
                    "Height: {:.1}m | Distance: {:.1}m | Velocity: {:.1}m/s",
                    h,
                    d,
                    shot.vel.magnitude()
                )
            }
            None => "Ready to fire!".to_string(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas2d) {
        let base = self.muzzle();

        // Barrel: 60x20 rect rotated about the base
        let theta = -self.angle.to_radians();
        let (sin, cos) = theta.sin_cos();
        let barrel: Vec<Vector2> = [(0.0, -10.0), (60.0, -10.0), (60.0, 10.0), (0.0, 10.0)]
            .into_iter()
            .map(|(x, y)| base + Vector2::new(x * cos - y * sin, x * sin + y * cos))
            .collect();
        canvas.fill_polygon(&barrel, CANNON_COLOR);
        canvas.fill_circle(base, 20.0, CANNON_COLOR);

        for shot in &self.shots {
            canvas.polyline(&shot.path, 1.0, TRAIL_COLOR);
            canvas.fill_sphere(shot.pos, 8.0, Color::ORANGE);
            if self.show_vectors && shot.vel.magnitude() > 1.0 {
                canvas.line(shot.pos, shot.pos + shot.vel * 5.0, 1.0, Color::GREEN);
            }
        }

        canvas.fill_rect(0.0, self.height - GROUND_HEIGHT, self.width, GROUND_HEIGHT, GROUND_COLOR);
    }

    /// Handle one of this demonstration's own controls; false if `id` is not one
    fn apply_control(&mut self, id: ControlId, value: &ControlValue) -> bool {
        let ids = self.ids;
        match value {
            ControlValue::Number(n) if id == ids.angle => self.angle = *n,
            ControlValue::Number(n) if id == ids.speed => self.speed = *n,
            ControlValue::Number(n) if id == ids.gravity => self.gravity = *n,
            ControlValue::Bool(b) if id == ids.vectors => self.show_vectors = *b,
            ControlValue::Pressed if id == ids.fire => self.fire(),
            _ => return false,
        }
        true
    }
}

impl Simulation for ProjectileMotion {
    fn update(&mut self) {
        self.step();
        self.status.report(self.readout());
    }

    fn draw(&mut self, surface: &mut RenderSurface) {
        self.paint(surface.primary());
    }

    fn on_control(&mut self, id: ControlId, value: ControlValue) {
        self.apply_control(id, &value);
    }

    fn reset(&mut self) {
        self.shots.clear();
    }
}

fn target_challenges() -> Vec<Challenge> {
    vec![
        Challenge::new("c1", "Hit the target at 50m!", 50.0, 2.0, "m")
            .with_hint("Try Angle 45, Speed ~22"),
        Challenge::new("c2", "Hit the target at 80m!", 80.0, 3.0, "m").with_hint("Increase speed"),
        Challenge::new("c3", "High arc target at 20m!", 20.0, 1.0, "m").with_hint("Angle > 70"),
    ]
}

/// Projectile motion with distance targets to hit in order
pub struct ProjectileChallenge {
    motion: ProjectileMotion,
    challenges: ChallengeSet,
    /// Last verdict, shown until the next check
    feedback: Option<String>,
    status: StatusReporter,
    check_id: ControlId,
}

impl ProjectileChallenge {
    pub fn new(ctx: &mut SimContext<'_>) -> Result<Self, SimError> {
        let motion = ProjectileMotion::new(ctx)?;
        let check_id = ctx.controls.button("Check Distance");
        Ok(Self {
            motion,
            challenges: ChallengeSet::new(target_challenges()),
            feedback: None,
            status: ctx.status.clone(),
            check_id,
        })
    }

    pub fn challenges(&self) -> &ChallengeSet {
        &self.challenges
    }

    /// Score the latest shot against the current target
    pub fn verify(&mut self) {
        let Some(distance) = self.motion.last_distance() else {
            self.feedback = Some("Fire the cannon first!".to_string());
            return;
        };
        let target = self.challenges.current().map(|c| c.target_value);
        self.feedback = match (self.challenges.check_answer(distance), target) {
            (Some(outcome), _) => Some(outcome.message().to_string()),
            (None, Some(target)) => Some(format!(
                "Missed! You hit {:.1}m. Target is {}m.",
                distance, target
            )),
            (None, None) => self.feedback.take(),
        };
    }

    fn readout(&self) -> String {
        let mut lines = vec![self.motion.readout(), self.challenges.progress()];
        if let Some(c) = self.challenges.current().filter(|c| !c.hint.is_empty()) {
            lines.push(format!("Hint: {}", c.hint));
        }
        if let Some(feedback) = &self.feedback {
            lines.push(feedback.clone());
        }
        lines.join("\n")
    }

    fn paint_target(&self, canvas: &mut dyn Canvas2d) {
        let Some(c) = self.challenges.current() else {
            return;
        };
        let x = MUZZLE_OFFSET + c.target_value * SCALE;
        let y = self.motion.height - GROUND_HEIGHT;

        canvas.fill_rect(
            x - c.tolerance * SCALE,
            y - 5.0,
            c.tolerance * SCALE * 2.0,
            5.0,
            Color::rgba(255, 0, 0, 0.3),
        );
        let flag = [
            Vector2::new(x, y),
            Vector2::new(x, y - 40.0),
            Vector2::new(x + 20.0, y - 30.0),
            Vector2::new(x, y - 20.0),
        ];
        canvas.fill_polygon(&flag, Color::RED);
        canvas.text(
            &format!("Target: {}{}", c.target_value, c.units),
            Vector2::new(x - 20.0, y - 50.0),
            12.0,
            Color::BLACK,
        );
        canvas.text(
            &format!("Challenge: {}", c.question),
            Vector2::new(10.0, 30.0),
            16.0,
            Color::BLACK,
        );
    }
}

impl Simulation for ProjectileChallenge {
    fn update(&mut self) {
        self.motion.step();
        self.status.report(self.readout());
    }

    fn draw(&mut self, surface: &mut RenderSurface) {
        let canvas = surface.primary();
        self.motion.paint(canvas);
        self.paint_target(canvas);
    }

    fn on_control(&mut self, id: ControlId, value: ControlValue) {
        if id == self.check_id {
            self.verify();
            self.status.report(self.readout());
        } else {
            self.motion.apply_control(id, &value);
        }
    }

    fn reset(&mut self) {
        self.motion.reset();
        self.challenges = ChallengeSet::new(target_challenges());
        self.feedback = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demos::harness::build;
    use crate::surface::DrawCommand;

    fn land(sim: &mut ProjectileMotion) {
        for _ in 0..2000 {
            sim.step();
        }
    }

    #[test]
    fn test_ready_before_firing() {
        let (sim, _surface, panels, _) = build(ProjectileMotion::new);
        let mut sim = sim.unwrap();
        sim.update();
        assert_eq!(panels.borrow().status.text(), "Ready to fire!");
        assert_eq!(panels.borrow().controls.len(), 5);
    }

    #[test]
    fn test_shot_lands_and_stops() {
        let (sim, _surface, _panels, _) = build(ProjectileMotion::new);
        let mut sim = sim.unwrap();
        sim.fire();
        land(&mut sim);
        let shot = sim.shots.last().unwrap();
        assert_eq!(shot.vel, Vector2::ZERO);
        assert_eq!(shot.pos.y, sim.height - GROUND_HEIGHT);
        assert!(sim.last_distance().unwrap() > 0.0);
    }

    #[test]
    fn test_keeps_last_five_shots() {
        let (sim, _surface, _panels, _) = build(ProjectileMotion::new);
        let mut sim = sim.unwrap();
        for _ in 0..7 {
            sim.fire();
            sim.step();
        }
        // Trimming removes one per step
        assert!(sim.shots.len() <= MAX_SHOTS + 1);
        sim.step();
        sim.step();
        assert_eq!(sim.shots.len(), MAX_SHOTS);
    }

    #[test]
    fn test_controls_update_parameters() {
        let (sim, _surface, _panels, _) = build(ProjectileMotion::new);
        let mut sim = sim.unwrap();
        let ids = sim.ids;
        sim.on_control(ids.angle, ControlValue::Number(60.0));
        sim.on_control(ids.vectors, ControlValue::Bool(false));
        sim.on_control(ids.fire, ControlValue::Pressed);
        assert_eq!(sim.angle, 60.0);
        assert!(!sim.show_vectors);
        assert_eq!(sim.shots.len(), 1);
    }

    #[test]
    fn test_draw_includes_ground() {
        let (sim, mut surface, _panels, log) = build(ProjectileMotion::new);
        let mut sim = sim.unwrap();
        sim.draw(&mut surface);
        let commands = log.commands();
        assert!(matches!(commands.last(), Some(DrawCommand::Rect { .. })));
    }

    #[test]
    fn test_challenge_needs_a_shot() {
        let (sim, _surface, panels, _) = build(ProjectileChallenge::new);
        let mut sim = sim.unwrap();
        assert_eq!(panels.borrow().controls.len(), 6);

        sim.on_control(sim.check_id, ControlValue::Pressed);
        let status = panels.borrow().status.text().to_string();
        assert!(status.contains("Fire the cannon first!"));
        assert!(status.contains("Challenge 1/3 | Score: 0"));
    }

    #[test]
    fn test_challenge_hit_and_miss() {
        let (sim, _surface, _panels, _) = build(ProjectileChallenge::new);
        let mut sim = sim.unwrap();

        // Place a landed shot exactly on the first target
        sim.motion.fire();
        let shot = sim.motion.shots.last_mut().unwrap();
        shot.pos.x = MUZZLE_OFFSET + 50.0 * SCALE;
        shot.vel = Vector2::ZERO;
        sim.verify();
        assert_eq!(
            sim.feedback.as_deref(),
            Some("Correct! Next Challenge: Hit the target at 80m!")
        );
        assert_eq!(sim.challenges().score(), 100);

        // Same shot misses the 80m target
        sim.verify();
        assert_eq!(
            sim.feedback.as_deref(),
            Some("Missed! You hit 50.0m. Target is 80m.")
        );
        assert_eq!(sim.challenges().index(), 1);

        sim.reset();
        assert_eq!(sim.challenges().index(), 0);
        assert!(sim.feedback.is_none());
    }

    #[test]
    fn test_challenge_completion_message() {
        let (sim, _surface, _panels, _) = build(ProjectileChallenge::new);
        let mut sim = sim.unwrap();
        sim.motion.fire();
        for target in [50.0, 80.0, 20.0] {
            let shot = sim.motion.shots.last_mut().unwrap();
            shot.pos.x = MUZZLE_OFFSET + target * SCALE;
            sim.verify();
        }
        assert_eq!(
            sim.feedback.as_deref(),
            Some("All Challenges Complete! Final Score: 300")
        );
        assert!(sim.challenges().is_complete());

        // Further checks keep the final verdict
        sim.verify();
        assert_eq!(
            sim.feedback.as_deref(),
            Some("All Challenges Complete! Final Score: 300")
        );
    }
}
