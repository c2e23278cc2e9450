use crate::motion::waypoints::{build_circle_waypoints, check_radius, Plane, Pose};
use crate::Error;
use serde::Deserialize;

/// Planning and execution capabilities of an external move group.
///
/// Inverse kinematics, collision checking and time parameterization all happen
/// behind this trait. Errors of the implementor are handed back to the caller as is.
pub trait MoveGroup {
    type Trajectory;
    type Error: From<Error>;

    fn set_max_velocity_scaling_factor(&mut self, factor: f64) -> Result<(), Self::Error>;

    /// Current end effector pose
    fn current_pose(&mut self) -> Result<Pose, Self::Error>;

    /// Interpolates through `waypoints`, returning the trajectory and the
    /// fraction in [0, 1] of the path that could be followed.
    fn compute_cartesian_path(
        &mut self,
        waypoints: &[Pose],
        eef_step: f64,
        jump_threshold: f64,
        avoid_collisions: bool,
    ) -> Result<(Self::Trajectory, f64), Self::Error>;

    fn execute(&mut self, trajectory: &Self::Trajectory, wait: bool) -> Result<(), Self::Error>;
}

/// * `radius` circle radius [m]
/// * `n_points` coarse samples around 360°
/// * `plane` "xy", "yz" or "xz"
/// * `eef_step` interpolation resolution for the cartesian path
/// * `jump_threshold` joint-space jump check, 0 disables it
/// * `velocity_scale` velocity scaling set before planning
/// * `execute` execute once the path is complete enough
/// * `completeness_threshold` minimum fraction required for execution
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CircleParams {
    pub radius: f64,
    pub n_points: usize,
    pub plane: Plane,
    pub eef_step: f64,
    pub jump_threshold: f64,
    pub velocity_scale: f64,
    pub execute: bool,
    pub completeness_threshold: f64,
}

impl Default for CircleParams {
    fn default() -> Self {
        Self {
            radius: 0.10,
            n_points: 120,
            plane: Plane::Xy,
            eef_step: 0.005,
            jump_threshold: 0.0,
            velocity_scale: 0.2,
            execute: true,
            completeness_threshold: 0.95,
        }
    }
}

impl CircleParams {
    /// Rejects arguments the waypoint generation or the planner cannot work with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.n_points == 0 {
            return Err(Error::ZeroPoints);
        }
        check_radius(self.radius)?;
        // negative jump threshold disables the check, completeness above 1 never executes
        let checks = [
            ("eef_step", self.eef_step, self.eef_step.is_finite() && self.eef_step > 0.0),
            (
                "velocity_scale",
                self.velocity_scale,
                self.velocity_scale.is_finite() && self.velocity_scale > 0.0,
            ),
            ("jump_threshold", self.jump_threshold, !self.jump_threshold.is_nan()),
            (
                "completeness_threshold",
                self.completeness_threshold,
                !self.completeness_threshold.is_nan(),
            ),
        ];
        for (name, value, ok) in checks {
            if !ok {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Plans (and optionally executes) a closed cartesian circle starting from the
/// current end effector pose.
///
/// Returns the trajectory and the completion fraction whether or not it was executed.
/// A fraction below `completeness_threshold` is not an error, it only skips execution.
pub fn plan_cartesian_circle<G: MoveGroup>(
    group: &mut G,
    params: &CircleParams,
) -> Result<(G::Trajectory, f64), G::Error> {
    params.validate()?;

    group.set_max_velocity_scaling_factor(params.velocity_scale)?;
    log::debug!("Velocity scaling set to {}", params.velocity_scale);

    let start_pose = group.current_pose()?;
    log::debug!(
        "Start pose {:?}",
        start_pose.translation.vector.as_slice()
    );
    let waypoints = build_circle_waypoints(
        &start_pose,
        params.radius,
        params.n_points,
        params.plane,
    )?;
    log::debug!(
        "{} waypoints on a {:.3} m circle in the {} plane",
        waypoints.len(),
        params.radius,
        params.plane
    );

    let (trajectory, fraction) = group.compute_cartesian_path(
        &waypoints,
        params.eef_step,
        params.jump_threshold,
        true,
    )?;
    log::info!("Cartesian path computed ({:.1}% achieved)", fraction * 100.0);

    if params.execute {
        if fraction >= params.completeness_threshold {
            group.execute(&trajectory, true)?;
            log::info!("Circle executed");
        } else {
            log::warn!(
                "Fraction {fraction:.3} below threshold {:.3}, not executing",
                params.completeness_threshold
            );
        }
    }

    Ok((trajectory, fraction))
}
