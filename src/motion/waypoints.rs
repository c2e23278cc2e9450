use crate::Error;
use nalgebra::{Isometry3, Translation3, Vector3};
use serde::Deserialize;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// End effector pose: translation in meters, orientation carried along untouched.
pub type Pose = Isometry3<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Plane the circle is drawn in. The first axis of the pair is the one
/// along which the center is offset from the start pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Plane {
    #[default]
    Xy,
    Yz,
    Xz,
}

impl Plane {
    /// (primary, secondary) axes spanning the plane
    pub fn axes(self) -> (Axis, Axis) {
        match self {
            Plane::Xy => (Axis::X, Axis::Y),
            Plane::Yz => (Axis::Y, Axis::Z),
            Plane::Xz => (Axis::X, Axis::Z),
        }
    }

    /// Axis held constant along the circle
    pub fn fixed_axis(self) -> Axis {
        match self {
            Plane::Xy => Axis::Z,
            Plane::Yz => Axis::X,
            Plane::Xz => Axis::Y,
        }
    }
}

impl FromStr for Plane {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xy" => Ok(Plane::Xy),
            "yz" => Ok(Plane::Yz),
            "xz" => Ok(Plane::Xz),
            _ => Err(Error::UnknownPlane(s.to_string())),
        }
    }
}

impl TryFrom<String> for Plane {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Plane::Xy => "xy",
            Plane::Yz => "yz",
            Plane::Xz => "xz",
        };
        f.write_str(s)
    }
}

pub(crate) fn check_radius(radius: f64) -> Result<(), Error> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name: "radius",
            value: radius,
        })
    }
}

/// Center of the circle: one radius behind the start position along the primary axis,
/// so that the start pose sits on the circle at angle 0.
pub fn circle_center(start_pose: &Pose, radius: f64, plane: Plane) -> Vector3<f64> {
    let (a, _) = plane.axes();
    let mut center = start_pose.translation.vector;
    center[a.index()] -= radius;
    center
}

/// Builds `n_points + 1` poses around a full circle that starts and ends on `start_pose`.
///
/// Only the two in-plane coordinates change; the fixed axis and the orientation are
/// copied from `start_pose` into every waypoint. A zero radius is accepted and yields
/// copies of the start pose.
pub fn build_circle_waypoints(
    start_pose: &Pose,
    radius: f64,
    n_points: usize,
    plane: Plane,
) -> Result<Vec<Pose>, Error> {
    if n_points == 0 {
        return Err(Error::ZeroPoints);
    }
    check_radius(radius)?;

    let (a, b) = plane.axes();
    let center = circle_center(start_pose, radius, plane);

    let waypoints = (0..=n_points)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / n_points as f64;
            let mut position = start_pose.translation.vector;
            position[a.index()] = center[a.index()] + radius * theta.cos();
            position[b.index()] = center[b.index()] + radius * theta.sin();
            Pose::from_parts(Translation3::from(position), start_pose.rotation)
        })
        .collect();
    Ok(waypoints)
}
