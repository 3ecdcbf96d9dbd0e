//! Circle overlap tests and elastic collision response
//!
//! Response and overlap correction are separate: `resolve_elastic_collision`
//! only changes velocities, callers push overlapping bodies apart themselves.

use super::Vector2;

/// Anything with a circular footprint
pub trait Circle {
    fn center(&self) -> Vector2;
    fn radius(&self) -> f64;
}

/// A moving body with mass
pub trait Body {
    fn position(&self) -> Vector2;
    fn velocity(&self) -> Vector2;
    fn set_velocity(&mut self, vel: Vector2);
    fn mass(&self) -> f64;
}

/// True iff the distance between centers is less than the sum of radii
pub fn check_circle_collision(c1: &impl Circle, c2: &impl Circle) -> bool {
    c1.center().distance(c2.center()) < c1.radius() + c2.radius()
}

/// Exchange momentum between two bodies along the line of centers
///
/// No-op when the bodies are already separating, when the centers coincide,
/// or when the combined mass is not positive.
pub fn resolve_elastic_collision(p1: &mut impl Body, p2: &mut impl Body) {
    let axis = p2.position() - p1.position();
    let dist = axis.magnitude();
    if dist == 0.0 {
        return;
    }

    let normal = axis / dist;
    // Closing speed along the normal; <= 0 means moving apart or sliding past
    let closing = (p1.velocity() - p2.velocity()).dot(normal);
    if closing <= 0.0 {
        return;
    }

    let total_mass = p1.mass() + p2.mass();
    if total_mass <= 0.0 {
        return;
    }

    let impulse = 2.0 * closing / total_mass;
    let v1 = p1.velocity() - normal * (impulse * p2.mass());
    let v2 = p2.velocity() + normal * (impulse * p1.mass());
    p1.set_velocity(v1);
    p2.set_velocity(v2);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy)]
    struct Disc {
        pos: Vector2,
        vel: Vector2,
        radius: f64,
        mass: f64,
    }

    impl Disc {
        fn new(x: f64, y: f64, vx: f64, vy: f64, mass: f64) -> Self {
            Self {
                pos: Vector2::new(x, y),
                vel: Vector2::new(vx, vy),
                radius: 10.0,
                mass,
            }
        }
    }

    impl Circle for Disc {
        fn center(&self) -> Vector2 {
            self.pos
        }
        fn radius(&self) -> f64 {
            self.radius
        }
    }

    impl Body for Disc {
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

    #[test]
    fn test_circle_collision() {
        let a = Disc::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let b = Disc::new(19.0, 0.0, 0.0, 0.0, 1.0);
        let c = Disc::new(20.0, 0.0, 0.0, 0.0, 1.0);
        assert!(check_circle_collision(&a, &b));
        // Touching exactly is not a collision
        assert!(!check_circle_collision(&a, &c));
    }

    #[test]
    fn test_head_on_equal_mass_swaps() {
        let mut a = Disc::new(0.0, 0.0, 5.0, 0.0, 1.0);
        let mut b = Disc::new(15.0, 0.0, -5.0, 0.0, 1.0);
        resolve_elastic_collision(&mut a, &mut b);
        assert!((a.vel.x + 5.0).abs() < 1e-9);
        assert!((b.vel.x - 5.0).abs() < 1e-9);
        assert!(a.vel.y.abs() < 1e-9 && b.vel.y.abs() < 1e-9);
    }

    #[test]
    fn test_separating_bodies_untouched() {
        let mut a = Disc::new(0.0, 0.0, -5.0, 0.0, 1.0);
        let mut b = Disc::new(15.0, 0.0, 5.0, 0.0, 1.0);
        resolve_elastic_collision(&mut a, &mut b);
        assert_eq!(a.vel, Vector2::new(-5.0, 0.0));
        assert_eq!(b.vel, Vector2::new(5.0, 0.0));
    }

    #[test]
    fn test_coincident_centers_noop() {
        let mut a = Disc::new(3.0, 3.0, 1.0, 2.0, 1.0);
        let mut b = Disc::new(3.0, 3.0, -4.0, 0.5, 2.0);
        resolve_elastic_collision(&mut a, &mut b);
        assert_eq!(a.vel, Vector2::new(1.0, 2.0));
        assert_eq!(b.vel, Vector2::new(-4.0, 0.5));
    }

    #[test]
    fn test_position_not_corrected() {
        let mut a = Disc::new(0.0, 0.0, 5.0, 0.0, 1.0);
        let mut b = Disc::new(5.0, 0.0, -5.0, 0.0, 1.0);
        resolve_elastic_collision(&mut a, &mut b);
        assert_eq!(a.pos, Vector2::new(0.0, 0.0));
        assert_eq!(b.pos, Vector2::new(5.0, 0.0));
    }

    proptest! {
        #[test]
        fn momentum_and_energy_conserved(
            dx in 1.0f64..50.0, dy in -50.0f64..50.0,
            v1x in -20.0f64..20.0, v1y in -20.0f64..20.0,
            v2x in -20.0f64..20.0, v2y in -20.0f64..20.0,
            m1 in 0.1f64..10.0, m2 in 0.1f64..10.0,
        ) {
            let mut a = Disc::new(0.0, 0.0, v1x, v1y, m1);
            let mut b = Disc::new(dx, dy, v2x, v2y, m2);
            let p_before = a.vel * m1 + b.vel * m2;
            let e_before = 0.5 * m1 * a.vel.magnitude_squared() + 0.5 * m2 * b.vel.magnitude_squared();

            resolve_elastic_collision(&mut a, &mut b);

            let p_after = a.vel * m1 + b.vel * m2;
            let e_after = 0.5 * m1 * a.vel.magnitude_squared() + 0.5 * m2 * b.vel.magnitude_squared();
            prop_assert!((p_before - p_after).magnitude() < 1e-6);
            prop_assert!((e_before - e_after).abs() < 1e-6 * e_before.max(1.0));
        }
    }
}
