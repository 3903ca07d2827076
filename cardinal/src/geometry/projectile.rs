/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Drag-free projectile formulas for a launch and landing at the same height.
//!
//! Free functions, metres and seconds, angles in radians above the
//! horizontal.  Inputs that would divide by (almost) zero return a
//! [`ProjectileError`] instead of `inf`/`NaN`.

use thiserror::Error;

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Denominators smaller than this are treated as zero.
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProjectileError {
    /// `sin(2θ)` is zero: a flat or vertical launch covers no range at any
    /// speed.
    #[error("launch angle {theta} rad gives undefined projectile motion (sin(2θ) = 0)")]
    DegenerateAngle { theta: f64 },

    /// The projectile has no horizontal velocity, so it never reaches any
    /// horizontal distance.
    #[error("no horizontal velocity at {velocity} m/s and {theta} rad")]
    NoHorizontalVelocity { velocity: f64, theta: f64 },

    /// No real launch speed lands at `range` with this angle (for example a
    /// positive range with a backwards launch).
    #[error("range {range} m is unreachable at {theta} rad")]
    Unreachable { range: f64, theta: f64 },
}

/// Horizontal distance covered by a projectile launched at `velocity` and
/// `theta`.
pub fn range(velocity: f64, theta: f64) -> f64 {
    velocity * velocity * (2.0 * theta).sin() / GRAVITY
}

/// Launch speed needed to cover `range` at `theta`.
///
/// # Errors
/// [`ProjectileError::DegenerateAngle`] when `|sin(2θ)| < EPSILON`, and
/// [`ProjectileError::Unreachable`] when the required speed is not real.
pub fn initial_velocity(range: f64, theta: f64) -> Result<f64, ProjectileError> {
    let denominator = (2.0 * theta).sin();
    if denominator.abs() < EPSILON {
        return Err(ProjectileError::DegenerateAngle { theta });
    }

    let squared = range * GRAVITY / denominator;
    if squared < 0.0 {
        return Err(ProjectileError::Unreachable { range, theta });
    }
    Ok(squared.sqrt())
}

/// Height above the launch point once the projectile has travelled `x`
/// horizontally.
///
/// # Errors
/// [`ProjectileError::NoHorizontalVelocity`] when `|2·v²·cos²θ| < EPSILON`.
pub fn height_at_distance(velocity: f64, theta: f64, x: f64) -> Result<f64, ProjectileError> {
    let denominator = 2.0 * velocity * velocity * theta.cos().powi(2);
    if denominator.abs() < EPSILON {
        return Err(ProjectileError::NoHorizontalVelocity { velocity, theta });
    }

    let linear = theta.tan() * x;
    let drop = GRAVITY * x * x / denominator;
    Ok(linear - drop)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
