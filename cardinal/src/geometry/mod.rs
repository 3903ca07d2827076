/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Field geometry: poses, field elements and projectile formulas.
//!
//! Units are whatever the field is measured in, except for the projectile
//! formulas in [`projectile`], which assume metres and seconds.  Angles are
//! radians throughout.

pub mod projectile;

pub use projectile::ProjectileError;

// ── Pose2d ────────────────────────────────────────────────────────────────────

/// A position and heading on the field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose2d {
    pub x: f64,
    pub y: f64,
    /// Heading in radians.
    pub heading: f64,
}

impl Pose2d {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    pub fn set(&mut self, x: f64, y: f64, heading: f64) {
        *self = Self::new(x, y, heading);
    }

    /// Direction from this pose to `target`, in radians, measured from the
    /// +x axis (`atan2`, so in `(-π, π]`).  Headings are ignored.
    pub fn angle_to(&self, target: &Pose2d) -> f64 {
        (target.y - self.y).atan2(target.x - self.x)
    }

    /// Straight-line distance to `target`.
    pub fn distance_to(&self, target: &Pose2d) -> f64 {
        (target.x - self.x).hypot(target.y - self.y)
    }
}

// ── Field elements ────────────────────────────────────────────────────────────

/// Something on the field whose pose can be tracked.
pub trait FieldElement {
    /// Move the element.  Elements may ignore parts of the update (see
    /// [`GoalElement`]).
    fn update(&mut self, x: f64, y: f64, orientation: f64);

    fn pose(&self) -> Pose2d;
}

/// The robot: position and orientation both change.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RobotElement {
    pose: Pose2d,
}

impl RobotElement {
    pub fn new(x: f64, y: f64, orientation: f64) -> Self {
        Self {
            pose: Pose2d::new(x, y, orientation),
        }
    }
}

impl FieldElement for RobotElement {
    fn update(&mut self, x: f64, y: f64, orientation: f64) {
        self.pose.set(x, y, orientation);
    }

    fn pose(&self) -> Pose2d {
        self.pose
    }
}

/// A fixed target such as a scoring location.  Its orientation is always 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GoalElement {
    pose: Pose2d,
}

impl GoalElement {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            pose: Pose2d::new(x, y, 0.0),
        }
    }
}

impl FieldElement for GoalElement {
    /// `orientation` is ignored.
    fn update(&mut self, x: f64, y: f64, _orientation: f64) {
        self.pose.set(x, y, 0.0);
    }

    fn pose(&self) -> Pose2d {
        self.pose
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
