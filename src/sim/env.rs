//! Spatial environment seam
//!
//! The spawn engine never talks to a renderer or physics backend directly.
//! Position, desired velocity and visibility go through `SpatialEnvironment`;
//! the player position comes from a `PlayerLocator`.
//!
//! `OpenField` is a minimal backend with an axis-aligned viewport and plain
//! position integration, used by the demo binary and the tests.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

/// Stable handle of a pooled instance (its slot index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u32);

impl InstanceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Engine-side body storage for pooled instances
pub trait SpatialEnvironment {
    /// Register a hidden body for a freshly built pool slot
    fn attach(&mut self, id: InstanceId);
    /// Drop every body (level unload)
    fn detach_all(&mut self);
    fn position(&self, id: InstanceId) -> Vec2;
    /// Teleport a body (spawn time only)
    fn set_position(&mut self, id: InstanceId, position: Vec2);
    /// Hand the integrator this tick's velocity (already scaled by the tick delta)
    fn set_desired_velocity(&mut self, id: InstanceId, velocity: Vec2);
    fn set_visible(&mut self, id: InstanceId, visible: bool);
    /// Whether the body is inside the rendered viewport
    fn is_on_screen(&self, id: InstanceId) -> bool;
}

/// Read-only access to the player position
pub trait PlayerLocator {
    fn player_position(&self) -> Vec2;
}

/// Player position shared between the game loop and the engine
#[derive(Debug, Clone, Default)]
pub struct SharedPlayer(Rc<Cell<Vec2>>);

impl SharedPlayer {
    pub fn new(position: Vec2) -> Self {
        Self(Rc::new(Cell::new(position)))
    }

    pub fn set(&self, position: Vec2) {
        self.0.set(position);
    }
}

impl PlayerLocator for SharedPlayer {
    fn player_position(&self) -> Vec2 {
        self.0.get()
    }
}

/// A body in the open field
#[derive(Debug, Clone, Copy, Default)]
pub struct Body {
    pub pos: Vec2,
    /// Per-tick displacement requested by the engine
    pub step: Vec2,
    pub visible: bool,
}

/// Unobstructed plane with a rectangular viewport
#[derive(Debug, Clone)]
pub struct OpenField {
    bodies: Vec<Body>,
    /// Viewport center (usually the camera, i.e. the player)
    pub view_center: Vec2,
    /// Viewport half extents
    pub view_half_extents: Vec2,
}

impl OpenField {
    pub fn new(view_half_extents: Vec2) -> Self {
        Self {
            bodies: Vec::new(),
            view_center: Vec2::ZERO,
            view_half_extents,
        }
    }

    pub fn body(&self, id: InstanceId) -> Option<&Body> {
        self.bodies.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Integrate every visible body by its requested step
    pub fn integrate(&mut self) {
        for body in self.bodies.iter_mut().filter(|b| b.visible) {
            body.pos += body.step;
        }
    }

    fn body_mut(&mut self, id: InstanceId) -> Option<&mut Body> {
        self.bodies.get_mut(id.index())
    }
}

impl SpatialEnvironment for OpenField {
    fn attach(&mut self, id: InstanceId) {
        if self.bodies.len() <= id.index() {
            self.bodies.resize(id.index() + 1, Body::default());
        }
        self.bodies[id.index()] = Body::default();
    }

    fn detach_all(&mut self) {
        self.bodies.clear();
    }

    fn position(&self, id: InstanceId) -> Vec2 {
        self.body(id).map(|b| b.pos).unwrap_or(Vec2::ZERO)
    }

    fn set_position(&mut self, id: InstanceId, position: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.pos = position;
        }
    }

    fn set_desired_velocity(&mut self, id: InstanceId, velocity: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.step = velocity;
        }
    }

    fn set_visible(&mut self, id: InstanceId, visible: bool) {
        if let Some(body) = self.body_mut(id) {
            body.visible = visible;
        }
    }

    fn is_on_screen(&self, id: InstanceId) -> bool {
        self.body(id).is_some_and(|b| {
            let d = (b.pos - self.view_center).abs();
            d.x <= self.view_half_extents.x && d.y <= self.view_half_extents.y
        })
    }
}
