use crate::motion::planner::MoveGroup;
use crate::motion::waypoints::Pose;
use crate::utils::config_parser::DryRunSettings;
use crate::Error;
use nalgebra::{Translation3, UnitQuaternion};

/// Upper bound on the poses a single cartesian path may interpolate
pub const MAX_TRAJECTORY_POSES: usize = 1_000_000;

/// Dense task-space trajectory produced by [`DryRunGroup`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartesianTrajectory {
    pub poses: Vec<Pose>,
    pub velocity_scale: f64,
}

impl CartesianTrajectory {
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Summed translation between consecutive poses [m]
    pub fn path_length(&self) -> f64 {
        self.poses
            .windows(2)
            .map(|w| (w[1].translation.vector - w[0].translation.vector).norm())
            .sum()
    }
}

/// Move group without a robot behind it.
///
/// Cartesian interpolation is done directly in task space and the only
/// feasibility check is a reach sphere around the base origin. Execution
/// teleports the end effector to the last pose of the trajectory.
#[derive(Debug, Clone)]
pub struct DryRunGroup {
    pose: Pose,
    reach: f64,
    velocity_scale: f64,
    executed: Vec<CartesianTrajectory>,
}

fn interpolate(start: &Pose, end: &Pose, t: f64) -> Pose {
    let translation = start.translation.vector.lerp(&end.translation.vector, t);
    let rotation: UnitQuaternion<f64> = if start.rotation == end.rotation {
        start.rotation
    } else {
        // opposite orientations have no unique slerp
        start
            .rotation
            .try_slerp(&end.rotation, t, 1.0e-9)
            .unwrap_or(if t < 0.5 { start.rotation } else { end.rotation })
    };
    Pose::from_parts(Translation3::from(translation), rotation)
}

impl DryRunGroup {
    pub fn new(pose: Pose, reach: f64) -> Self {
        Self {
            pose,
            reach,
            velocity_scale: 1.0,
            executed: Vec::new(),
        }
    }

    pub fn from_settings(settings: &DryRunSettings) -> Result<Self, Error> {
        Ok(Self::new(settings.start_pose()?, settings.reach))
    }

    pub fn velocity_scale(&self) -> f64 {
        self.velocity_scale
    }

    /// Trajectories executed so far, oldest first
    pub fn executed(&self) -> &[CartesianTrajectory] {
        &self.executed
    }

    fn reachable(&self, pose: &Pose) -> bool {
        pose.translation.vector.norm() <= self.reach
    }
}

impl MoveGroup for DryRunGroup {
    type Trajectory = CartesianTrajectory;
    type Error = Error;

    fn set_max_velocity_scaling_factor(&mut self, factor: f64) -> Result<(), Error> {
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(Error::InvalidParameter {
                name: "velocity_scale",
                value: factor,
            });
        }
        self.velocity_scale = factor;
        Ok(())
    }

    fn current_pose(&mut self) -> Result<Pose, Error> {
        Ok(self.pose)
    }

    fn compute_cartesian_path(
        &mut self,
        waypoints: &[Pose],
        eef_step: f64,
        jump_threshold: f64,
        _avoid_collisions: bool,
    ) -> Result<(CartesianTrajectory, f64), Error> {
        if !(eef_step > 0.0) {
            return Err(Error::InvalidParameter {
                name: "eef_step",
                value: eef_step,
            });
        }
        let mut trajectory = CartesianTrajectory {
            poses: Vec::new(),
            velocity_scale: self.velocity_scale,
        };
        let Some(first) = waypoints.first() else {
            return Ok((trajectory, 0.0));
        };
        if !self.reachable(first) {
            log::debug!("First waypoint out of reach");
            return Ok((trajectory, 0.0));
        }
        trajectory.poses.push(*first);

        let segments = waypoints.len() - 1;
        if segments == 0 {
            return Ok((trajectory, 1.0));
        }
        let lengths: Vec<f64> = waypoints
            .windows(2)
            .map(|w| (w[1].translation.vector - w[0].translation.vector).norm())
            .collect();
        let mean_length = lengths.iter().sum::<f64>() / segments as f64;
        let requested: f64 = lengths.iter().map(|l| (l / eef_step).ceil().max(1.0)).sum();
        if !(requested <= MAX_TRAJECTORY_POSES as f64) {
            log::debug!("{requested:e} poses requested, limit is {MAX_TRAJECTORY_POSES}");
            return Err(Error::InvalidParameter {
                name: "eef_step",
                value: eef_step,
            });
        }

        let mut covered = 0;
        'segments: for (i, w) in waypoints.windows(2).enumerate() {
            if jump_threshold > 0.0 && mean_length > 0.0 && lengths[i] > jump_threshold * mean_length {
                log::debug!("Jump of {:.4} m at segment {i}", lengths[i]);
                break;
            }
            let steps = ((lengths[i] / eef_step).ceil() as usize).max(1);
            for k in 1..=steps {
                let pose = interpolate(&w[0], &w[1], k as f64 / steps as f64);
                if !self.reachable(&pose) {
                    log::debug!("Out of reach in segment {i}");
                    break 'segments;
                }
                trajectory.poses.push(pose);
            }
            covered += 1;
        }

        Ok((trajectory, covered as f64 / segments as f64))
    }

    fn execute(&mut self, trajectory: &CartesianTrajectory, wait: bool) -> Result<(), Error> {
        let Some(last) = trajectory.poses.last() else {
            return Err(Error::Other {
                error: "Cannot execute an empty trajectory".to_string(),
            });
        };
        log::debug!(
            "Executing {} poses over {:.3} m (wait: {wait})",
            trajectory.len(),
            trajectory.path_length()
        );
        self.pose = *last;
        self.executed.push(trajectory.clone());
        Ok(())
    }
}
