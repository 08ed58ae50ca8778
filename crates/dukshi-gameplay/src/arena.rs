//! Arena geometry and fighter-vs-fighter collision.
//!
//! This module provides:
//! - `Vec2` and `Aabb` primitives (screen space, y grows downward)
//! - Arena bounds clamping
//! - Pairwise pushback between the two fighters

use serde::{Deserialize, Serialize};

use crate::config::RealtimeRules;

// ============================================================================
// Primitives
// ============================================================================

/// 2D vector for positions and velocities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a new Vec2.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum X coordinate
    pub min_x: f32,
    /// Minimum Y coordinate
    pub min_y: f32,
    /// Maximum X coordinate
    pub max_x: f32,
    /// Maximum Y coordinate
    pub max_y: f32,
}

impl Aabb {
    /// Creates a box from its top-left corner and size.
    #[must_use]
    pub fn from_corner(corner: Vec2, width: f32, height: f32) -> Self {
        Self {
            min_x: corner.x,
            min_y: corner.y,
            max_x: corner.x + width,
            max_y: corner.y + height,
        }
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        (self.min_x + self.max_x) / 2.0
    }

    /// Vertical center.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        (self.min_y + self.max_y) / 2.0
    }

    /// Checks if this box overlaps another.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Overlap depth on each axis, or `None` if the boxes don't touch.
    #[must_use]
    pub fn overlap(&self, other: &Aabb) -> Option<(f32, f32)> {
        if !self.overlaps(other) {
            return None;
        }
        let x = self.max_x.min(other.max_x) - self.min_x.max(other.min_x);
        let y = self.max_y.min(other.max_y) - self.min_y.max(other.min_y);
        Some((x, y))
    }
}

// ============================================================================
// Collision response
// ============================================================================

/// Velocity response when the fighters bump horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionResponse {
    /// Zero horizontal velocity.
    Stop,
    /// Reverse horizontal velocity, scaled by the configured damping.
    #[default]
    Bounce,
}

/// Axis along which a collision was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionAxis {
    /// Side-by-side contact.
    Horizontal,
    /// One fighter landed on the other.
    Vertical,
}

/// A body taking part in collision: its top-left corner and velocity.
#[derive(Debug)]
pub struct Body<'a> {
    /// Top-left corner
    pub position: &'a mut Vec2,
    /// Velocity per tick
    pub velocity: &'a mut Vec2,
}

/// Separates two overlapping fighters.
///
/// Each body is pushed by half the overlap along the axis of least overlap.
/// A horizontal contact then applies the configured velocity response; a
/// vertical one zeroes both vertical velocities.
///
/// Returns the axis resolved, or `None` if the fighters don't overlap.
pub fn resolve_pair(a: Body<'_>, b: Body<'_>, rules: &RealtimeRules) -> Option<CollisionAxis> {
    let box_a = Aabb::from_corner(*a.position, rules.fighter_width, rules.fighter_height);
    let box_b = Aabb::from_corner(*b.position, rules.fighter_width, rules.fighter_height);
    let (overlap_x, overlap_y) = box_a.overlap(&box_b)?;

    if overlap_x <= overlap_y {
        let push = overlap_x / 2.0;
        // Ties push `a` to the left.
        if box_a.center_x() <= box_b.center_x() {
            a.position.x -= push;
            b.position.x += push;
        } else {
            a.position.x += push;
            b.position.x -= push;
        }

        match rules.collision {
            CollisionResponse::Stop => {
                a.velocity.x = 0.0;
                b.velocity.x = 0.0;
            },
            CollisionResponse::Bounce => {
                a.velocity.x = -a.velocity.x * rules.bounce_damping;
                b.velocity.x = -b.velocity.x * rules.bounce_damping;
            },
        }
        Some(CollisionAxis::Horizontal)
    } else {
        let push = overlap_y / 2.0;
        if box_a.center_y() <= box_b.center_y() {
            a.position.y -= push;
            b.position.y += push;
        } else {
            a.position.y += push;
            b.position.y -= push;
        }
        a.velocity.y = 0.0;
        b.velocity.y = 0.0;
        Some(CollisionAxis::Vertical)
    }
}

/// Result of clamping a body to the arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundsContact {
    /// Hit the left or right wall
    pub wall: bool,
    /// Standing on the floor
    pub floor: bool,
}

/// Keeps a fighter inside the arena walls and above the floor.
pub fn clamp_to_arena(position: &mut Vec2, velocity: &mut Vec2, rules: &RealtimeRules) -> BoundsContact {
    let mut contact = BoundsContact::default();

    let max_x = (rules.arena_width - rules.fighter_width).max(0.0);
    if position.x < 0.0 || position.x > max_x {
        position.x = position.x.clamp(0.0, max_x);
        velocity.x = 0.0;
        contact.wall = true;
    }

    let floor_top = rules.floor_top();
    if position.y >= floor_top {
        position.y = floor_top;
        velocity.y = velocity.y.min(0.0);
        contact.floor = true;
    }
    if position.y < 0.0 {
        position.y = 0.0;
        velocity.y = velocity.y.max(0.0);
    }

    contact
}

// ============================================================================
// Tests
// ============================================================================
