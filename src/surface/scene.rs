//! Retained-mode 3D scene graph
//!
//! Nodes persist between frames; each frame the whole scene is projected
//! through a perspective camera and painted back-to-front onto a 2D layer.

use glam::{DMat4, DVec3, EulerRot};

use super::{Canvas2d, Color};
use crate::physics::Vector2;

/// Handle to a node in a `Scene3d`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere { radius: f64 },
    /// Point cloud; `size` is the on-screen size in pixels
    Points { positions: Vec<DVec3>, size: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub shape: Shape,
    pub color: Color,
    pub translation: DVec3,
}

impl SceneNode {
    pub fn new(shape: Shape, color: Color) -> Self {
        Self {
            shape,
            color,
            translation: DVec3::ZERO,
        }
    }
}

/// Perspective camera looking at the origin
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: DVec3,
    /// Vertical field of view in degrees
    pub fov_y: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, 15.0),
            fov_y: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// One projected primitive waiting to be painted
struct Splat {
    depth: f64,
    at: Vector2,
    radius: f64,
    color: Color,
    sphere: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Scene3d {
    nodes: Vec<SceneNode>,
    /// Whole-scene rotation (radians about x, y, z)
    pub rotation: DVec3,
    pub camera: Camera,
    pub background: Option<Color>,
}

impl Scene3d {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn model(&self) -> DMat4 {
        DMat4::from_euler(EulerRot::YXZ, self.rotation.y, self.rotation.x, self.rotation.z)
    }

    fn view(&self) -> DMat4 {
        DMat4::look_at_rh(self.camera.position, DVec3::ZERO, DVec3::Y)
    }

    /// Project a world-space point; `None` if it is behind the near plane.
    /// Returns screen position and view-space distance.
    pub fn project(&self, point: DVec3, width: f64, height: f64) -> Option<(Vector2, f64)> {
        let view_point = (self.view() * self.model()).transform_point3(point);
        let distance = -view_point.z;
        if distance <= self.camera.near || distance >= self.camera.far {
            return None;
        }
        let aspect = if height > 0.0 { width / height } else { 1.0 };
        let proj = DMat4::perspective_rh(
            self.camera.fov_y.to_radians(),
            aspect,
            self.camera.near,
            self.camera.far,
        );
        let ndc = proj.project_point3(view_point);
        let screen = Vector2::new((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height);
        Some((screen, distance))
    }

    /// Pixels per world unit at the given view distance
    fn pixel_scale(&self, distance: f64, height: f64) -> f64 {
        let half_fov = (self.camera.fov_y.to_radians() * 0.5).tan();
        if distance <= 0.0 || half_fov <= 0.0 {
            return 0.0;
        }
        (height * 0.5) / (half_fov * distance)
    }

    /// Paint the scene onto `canvas`, farthest primitives first
    pub fn render(&self, canvas: &mut dyn Canvas2d) {
        let (width, height) = canvas.size();
        canvas.clear();
        if let Some(bg) = self.background {
            canvas.fill_background(bg);
        }

        let mut splats = Vec::new();
        for node in &self.nodes {
            match &node.shape {
                Shape::Sphere { radius } => {
                    if let Some((at, depth)) = self.project(node.translation, width, height) {
                        splats.push(Splat {
                            depth,
                            at,
                            radius: radius * self.pixel_scale(depth, height),
                            color: node.color,
                            sphere: true,
                        });
                    }
                }
                Shape::Points { positions, size } => {
                    for p in positions {
                        if let Some((at, depth)) = self.project(*p + node.translation, width, height) {
                            splats.push(Splat {
                                depth,
                                at,
                                radius: size * 0.5,
                                color: node.color,
                                sphere: false,
                            });
                        }
                    }
                }
            }
        }

        splats.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        for s in splats {
            if s.sphere {
                canvas.fill_sphere(s.at, s.radius, s.color);
            } else {
                let d = s.radius * 2.0;
                canvas.fill_rect(s.at.x - s.radius, s.at.y - s.radius, d, d, s.color);
            }
        }
    }
}
