//! Roll/pitch/yaw to 3D rotation for the attitude indicator

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Unit of the angle columns in a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    Degrees,
    Radians,
}

/// Orientation of one row, always in radians
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttitudeSample {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl AttitudeSample {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    pub fn from_degrees(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self::new(roll.to_radians(), pitch.to_radians(), yaw.to_radians())
    }

    /// The one place table angles are converted to radians
    pub fn from_unit(roll: f64, pitch: f64, yaw: f64, unit: AngleUnit) -> Self {
        match unit {
            AngleUnit::Degrees => Self::from_degrees(roll, pitch, yaw),
            AngleUnit::Radians => Self::new(roll, pitch, yaw),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.roll.is_finite() && self.pitch.is_finite() && self.yaw.is_finite()
    }
}

/// Stateless rotation builder
#[derive(Debug, Clone, Copy, Default)]
pub struct AttitudeSolver;

impl AttitudeSolver {
    /// `R = Rz(yaw) * Ry(pitch) * Rx(roll)`: roll applied first, yaw last
    pub fn orient(sample: &AttitudeSample) -> DMat3 {
        if !sample.is_finite() {
            warn!("Non-finite attitude sample {:?}", sample);
        }
        DMat3::from_rotation_z(sample.yaw)
            * DMat3::from_rotation_y(sample.pitch)
            * DMat3::from_rotation_x(sample.roll)
    }

    /// Rotate a body-frame vector
    pub fn apply(rotation: &DMat3, body: DVec3) -> DVec3 {
        *rotation * body
    }

    /// Orthonormal with determinant one, within `eps`
    pub fn is_rotation(rotation: &DMat3, eps: f64) -> bool {
        let gram = rotation.transpose() * *rotation;
        gram.abs_diff_eq(DMat3::IDENTITY, eps) && (rotation.determinant() - 1.0).abs() < eps
    }
}

/// The vehicle body drawn by the indicator: a line from the origin along +Z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyAxis {
    pub length: f64,
}

impl Default for BodyAxis {
    fn default() -> Self {
        Self { length: 1.5 }
    }
}

impl BodyAxis {
    /// Nose position after rotation
    pub fn nose(&self, rotation: &DMat3) -> DVec3 {
        AttitudeSolver::apply(rotation, DVec3::Z * self.length)
    }
}
