//! Balls under gravity bouncing off the walls and each other

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::controls::{ControlId, ControlValue};
use crate::error::SimError;
use crate::physics::{Body, Circle, Vector2, check_circle_collision, resolve_elastic_collision};
use crate::sim::{SimContext, Simulation, StatusReporter};
use crate::surface::{Color, RenderSurface};

const INITIAL_BALLS: usize = 5;
const FRICTION: f64 = 0.99;
const DEFAULT_GRAVITY: f64 = 0.5;
const DEFAULT_BOUNCINESS: f64 = 0.8;

#[derive(Debug, Clone)]
struct Ball {
    pos: Vector2,
    vel: Vector2,
    radius: f64,
    color: Color,
    mass: f64,
}

impl Circle for Ball {
    fn center(&self) -> Vector2 {
        self.pos
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

impl Body for Ball {
    fn position(&self) -> Vector2 {
        self.pos
    }

    fn velocity(&self) -> Vector2 {
        self.vel
    }

    fn set_velocity(&mut self, vel: Vector2) {
        self.vel = vel;
    }

    fn mass(&self) -> f64 {
        self.mass
    }
}

pub struct BouncingBalls {
    balls: Vec<Ball>,
    gravity: f64,
    bounciness: f64,
    width: f64,
    height: f64,
    seed: u64,
    rng: Pcg32,
    status: StatusReporter,
    gravity_id: ControlId,
    bounciness_id: ControlId,
    add_id: ControlId,
}

impl BouncingBalls {
    pub fn new(ctx: &mut SimContext<'_>) -> Result<Self, SimError> {
        let gravity_id = ctx.controls.slider("Gravity", 0.0, 2.0, 0.1, DEFAULT_GRAVITY);
        let bounciness_id = ctx.controls.slider("Bounciness", 0.1, 1.2, 0.1, DEFAULT_BOUNCINESS);
        let add_id = ctx.controls.button("Add Ball");

        let mut sim = Self {
            balls: Vec::new(),
            gravity: DEFAULT_GRAVITY,
            bounciness: DEFAULT_BOUNCINESS,
            width: ctx.width(),
            height: ctx.height(),
            seed: ctx.seed(),
            rng: ctx.rng(),
            status: ctx.status.clone(),
            gravity_id,
            bounciness_id,
            add_id,
        };
        sim.spawn_initial();
        Ok(sim)
    }

    fn spawn_initial(&mut self) {
        self.balls.clear();
        for _ in 0..INITIAL_BALLS {
            self.add_ball();
        }
    }

    fn add_ball(&mut self) {
        let rng = &mut self.rng;
        let ball = Ball {
            pos: Vector2::new(
                rng.random::<f64>() * self.width,
                rng.random::<f64>() * (self.height / 2.0),
            ),
            vel: Vector2::new(
                (rng.random::<f64>() - 0.5) * 10.0,
                (rng.random::<f64>() - 0.5) * 10.0,
            ),
            radius: 15.0 + rng.random::<f64>() * 10.0,
            color: Color::hsl(rng.random::<f64>() * 360.0, 0.7, 0.5),
            mass: 1.0,
        };
        self.balls.push(ball);
    }

    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.balls
            .iter()
            .map(|b| 0.5 * b.mass * b.vel.magnitude_squared())
            .sum()
    }

    fn bounce_off_walls(&mut self) {
        let (w, h, e) = (self.width, self.height, self.bounciness);
        for b in &mut self.balls {
            if b.pos.x < b.radius {
                b.pos.x = b.radius;
                b.vel.x *= -e;
            }
            if b.pos.x > w - b.radius {
                b.pos.x = w - b.radius;
                b.vel.x *= -e;
            }
            if b.pos.y > h - b.radius {
                b.pos.y = h - b.radius;
                b.vel.y *= -e;
            }
            if b.pos.y < b.radius {
                b.pos.y = b.radius;
                b.vel.y *= -e;
            }
        }
    }

    fn collide_pairs(&mut self) {
        for i in 0..self.balls.len() {
            let (head, tail) = self.balls.split_at_mut(i + 1);
            let b1 = &mut head[i];
            for b2 in tail.iter_mut() {
                if !check_circle_collision(&*b1, &*b2) {
                    continue;
                }
                resolve_elastic_collision(&mut *b1, &mut *b2);

                // Push apart so the pair does not stick
                let dist = b1.pos.distance(b2.pos);
                let overlap = (b1.radius + b2.radius - dist) / 2.0;
                let dir = (b2.pos - b1.pos).normalize();
                b1.pos = b1.pos - dir * overlap;
                b2.pos = b2.pos + dir * overlap;
            }
        }
    }
}

impl Simulation for BouncingBalls {
    fn update(&mut self) {
        for b in &mut self.balls {
            b.vel.y += self.gravity;
            b.vel = b.vel * FRICTION;
            b.pos = b.pos + b.vel;
        }
        self.bounce_off_walls();
        self.collide_pairs();

        self.status.report(format!(
            "Total Kinetic Energy: {:.0} J\nCounts: {}",
            self.kinetic_energy(),
            self.balls.len()
        ));
    }

    fn draw(&mut self, surface: &mut RenderSurface) {
        let canvas = surface.primary();
        for b in &self.balls {
            canvas.fill_sphere(b.pos, b.radius, b.color);
        }
    }

    fn on_control(&mut self, id: ControlId, value: ControlValue) {
        if id == self.gravity_id {
            if let Some(g) = value.as_number() {
                self.gravity = g;
            }
        } else if id == self.bounciness_id {
            if let Some(e) = value.as_number() {
                self.bounciness = e;
            }
        } else if id == self.add_id {
            self.add_ball();
        }
    }

    fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.spawn_initial();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demos::harness::build;

    #[test]
    fn test_registers_controls() {
        let (sim, _surface, panels, _) = build(BouncingBalls::new);
        let sim = sim.unwrap();
        assert_eq!(sim.ball_count(), INITIAL_BALLS);

        let panels = panels.borrow();
        let labels: Vec<_> = panels.controls.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Gravity", "Bounciness", "Add Ball"]);
    }

    #[test]
    fn test_balls_stay_inside() {
        let (sim, _surface, _panels, _) = build(BouncingBalls::new);
        let mut sim = sim.unwrap();
        for _ in 0..500 {
            sim.update();
        }
        // Overlap correction runs after the wall clamp, so allow some slack
        let margin = 100.0;
        for b in &sim.balls {
            assert!(b.pos.x > -margin && b.pos.x < sim.width + margin);
            assert!(b.pos.y > -margin && b.pos.y < sim.height + margin);
        }
    }

    #[test]
    fn test_add_ball_and_reset() {
        let (sim, _surface, panels, _) = build(BouncingBalls::new);
        let mut sim = sim.unwrap();
        let first: Vec<Vector2> = sim.balls.iter().map(|b| b.pos).collect();

        sim.on_control(sim.add_id, ControlValue::Pressed);
        assert_eq!(sim.ball_count(), INITIAL_BALLS + 1);
        sim.update();
        assert!(panels.borrow().status.text().ends_with("Counts: 6"));

        sim.reset();
        assert_eq!(sim.ball_count(), INITIAL_BALLS);
        let again: Vec<Vector2> = sim.balls.iter().map(|b| b.pos).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn test_zero_gravity_slider() {
        let (sim, _surface, _panels, _) = build(BouncingBalls::new);
        let mut sim = sim.unwrap();
        sim.on_control(sim.gravity_id, ControlValue::Number(0.0));
        assert_eq!(sim.gravity, 0.0);
        // Wrong value type is ignored
        sim.on_control(sim.gravity_id, ControlValue::Bool(true));
        assert_eq!(sim.gravity, 0.0);
    }

    #[test]
    fn test_draws_one_sphere_per_ball() {
        let (sim, mut surface, _panels, log) = build(BouncingBalls::new);
        let mut sim = sim.unwrap();
        sim.draw(&mut surface);
        assert_eq!(log.len(), INITIAL_BALLS);
    }
}
