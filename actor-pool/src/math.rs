// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Math types shared by the pool and its adapters
//!
//! Double-precision nalgebra aliases plus the small transform and motion
//! records that an actor carries between activations.

pub use nalgebra::{UnitQuaternion, Vector3};

/// 3D vector (impulses, velocities, directions)
pub type Vec3 = Vector3<f64>;

/// 3D point in world space
pub type Point3 = nalgebra::Point3<f64>;

/// Rotation quaternion
pub type Quat = UnitQuaternion<f64>;

/// Build a point from a `[x, y, z]` array (the config file representation)
pub fn point_from_array(arr: [f64; 3]) -> Point3 {
    Point3::new(arr[0], arr[1], arr[2])
}

/// Check that every coordinate of a point is finite (not NaN or infinite)
pub fn is_finite_point(p: &Point3) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}

/// Position, rotation and uniform scale of an actor's visual
///
/// # Examples
///
/// ```
/// use actor_pool::math::{Point3, Transform};
///
/// let t = Transform::at(Point3::new(1.0, 2.0, 3.0), 0.5);
/// assert_eq!(t.position.y, 2.0);
/// assert_eq!(t.scale, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Point3,
    /// Orientation
    pub rotation: Quat,
    /// Uniform scale factor
    pub scale: f64,
}

impl Transform {
    /// Transform at `position` with identity rotation and the given scale
    pub fn at(position: Point3, scale: f64) -> Self {
        Transform {
            position,
            rotation: Quat::identity(),
            scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::at(Point3::origin(), 1.0)
    }
}

/// Transient motion state, cleared on every reactivation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Last linear velocity pushed to the physics body
    pub linear_velocity: Vec3,
    /// Last angular velocity pushed to the physics body
    pub angular_velocity: Vec3,
    /// Phase of the cosmetic glow oscillation, in radians
    pub oscillation_phase: f64,
}

impl Motion {
    /// Motion at rest with zero phase
    pub fn rest() -> Self {
        Motion {
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            oscillation_phase: 0.0,
        }
    }

    /// Intensity derived from the oscillation phase, in `[0.5, 1.0]`
    pub fn intensity(&self) -> f64 {
        0.75 + 0.25 * self.oscillation_phase.sin()
    }
}

impl Default for Motion {
    fn default() -> Self {
        Motion::rest()
    }
}
