//! Scene-graph node state: identity, local transform, and glide motion.
//!
//! A `SceneNode` is embedded by every object in the retained scene graph.
//! Children are owned by the embedding type so each kind can keep them
//! strongly typed (a `TreeNode` owns `TreeNode`s).

use crate::id::ObjectId;
use kurbo::{Affine, Point};

/// Whether a node is still moving toward its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Idle,
    Gliding,
}

/// Local transform plus glide-to-target animation state.
#[derive(Debug, Clone)]
pub struct SceneNode {
    id: ObjectId,
    position: Point,
    rotation: f64,
    scale: f64,
    target: Option<Point>,
    /// Units per millisecond.
    velocity: f64,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneNode {
    pub fn new() -> Self {
        Self {
            id: ObjectId::next(),
            position: Point::ORIGIN,
            rotation: 0.0,
            scale: 1.0,
            target: None,
            velocity: 0.0,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn target(&self) -> Option<Point> {
        self.target
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Place the node immediately, cancelling any glide.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
        self.target = None;
    }

    pub fn set_rotation(&mut self, radians: f64) {
        self.rotation = radians;
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn rotate(&mut self, radians: f64) {
        self.rotation += radians;
    }

    /// Glide toward `target` at `velocity` units per millisecond.
    /// A non-positive velocity jumps straight there.
    pub fn glide_to(&mut self, target: Point, velocity: f64) {
        if velocity > 0.0 && target != self.position {
            self.target = Some(target);
            self.velocity = velocity;
        } else {
            self.set_position(target);
        }
    }

    pub fn motion(&self) -> Motion {
        if self.target.is_some() {
            Motion::Gliding
        } else {
            Motion::Idle
        }
    }

    /// Advance the glide by `elapsed` milliseconds. Never overshoots: when
    /// the remaining distance fits in this frame's travel, the node snaps
    /// to its target and goes idle.
    pub fn step(&mut self, elapsed: f64) -> Motion {
        let Some(target) = self.target else {
            return Motion::Idle;
        };
        let travel = self.velocity * elapsed.max(0.0);
        let displacement = target - self.position;
        let remaining = displacement.hypot();
        if remaining <= travel {
            self.set_position(target);
            Motion::Idle
        } else {
            self.position += displacement * (travel / remaining);
            Motion::Gliding
        }
    }

    /// Parent space ← local space: `translate(position) · scale · rotate`.
    pub fn local_transform(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::scale(self.scale)
            * Affine::rotate(self.rotation)
    }
}
