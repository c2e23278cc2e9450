use cartesian_circle_lib::motion::dry_run::DryRunGroup;
use cartesian_circle_lib::motion::planner::{plan_cartesian_circle, CircleParams, MoveGroup};
use cartesian_circle_lib::motion::waypoints::{Plane, Pose};
use cartesian_circle_lib::utils::config_parser::DryRunSettings;
use cartesian_circle_lib::Error;
use nalgebra::{Translation3, UnitQuaternion};

#[derive(Debug, PartialEq)]
enum Call {
    Velocity(f64),
    CurrentPose,
    Plan {
        n_waypoints: usize,
        eef_step: f64,
        jump_threshold: f64,
        avoid_collisions: bool,
    },
    Execute { trajectory: u32, wait: bool },
}

#[derive(Debug)]
enum StubError {
    Lib(Error),
    Planning,
    Execution,
}

impl From<Error> for StubError {
    fn from(e: Error) -> Self {
        StubError::Lib(e)
    }
}

/// Records every call and answers with a fixed fraction
struct StubGroup {
    pose: Pose,
    fraction: f64,
    fail_planning: bool,
    fail_execution: bool,
    calls: Vec<Call>,
    waypoints: Vec<Pose>,
}

impl StubGroup {
    fn new(fraction: f64) -> Self {
        Self {
            pose: Pose::from_parts(
                Translation3::new(1.0, 0.0, 0.0),
                UnitQuaternion::from_euler_angles(0.0, 1.2, -0.4),
            ),
            fraction,
            fail_planning: false,
            fail_execution: false,
            calls: Vec::new(),
            waypoints: Vec::new(),
        }
    }

    fn executions(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Execute { .. }))
            .count()
    }
}

impl MoveGroup for StubGroup {
    type Trajectory = u32;
    type Error = StubError;

    fn set_max_velocity_scaling_factor(&mut self, factor: f64) -> Result<(), StubError> {
        self.calls.push(Call::Velocity(factor));
        Ok(())
    }

    fn current_pose(&mut self) -> Result<Pose, StubError> {
        self.calls.push(Call::CurrentPose);
        Ok(self.pose)
    }

    fn compute_cartesian_path(
        &mut self,
        waypoints: &[Pose],
        eef_step: f64,
        jump_threshold: f64,
        avoid_collisions: bool,
    ) -> Result<(u32, f64), StubError> {
        self.calls.push(Call::Plan {
            n_waypoints: waypoints.len(),
            eef_step,
            jump_threshold,
            avoid_collisions,
        });
        self.waypoints = waypoints.to_vec();
        if self.fail_planning {
            return Err(StubError::Planning);
        }
        Ok((42, self.fraction))
    }

    fn execute(&mut self, trajectory: &u32, wait: bool) -> Result<(), StubError> {
        self.calls.push(Call::Execute {
            trajectory: *trajectory,
            wait,
        });
        if self.fail_execution {
            return Err(StubError::Execution);
        }
        Ok(())
    }
}

#[test]
fn call_sequence_with_defaults() {
    let mut group = StubGroup::new(1.0);
    let (traj, fraction) = plan_cartesian_circle(&mut group, &CircleParams::default()).unwrap();
    assert_eq!(traj, 42);
    assert_eq!(fraction, 1.0);
    assert_eq!(
        group.calls,
        vec![
            Call::Velocity(0.2),
            Call::CurrentPose,
            Call::Plan {
                n_waypoints: 121,
                eef_step: 0.005,
                jump_threshold: 0.0,
                avoid_collisions: true,
            },
            Call::Execute {
                trajectory: 42,
                wait: true
            },
        ]
    );
}

#[test]
fn waypoints_start_at_current_pose() {
    let mut group = StubGroup::new(1.0);
    let params = CircleParams {
        n_points: 4,
        plane: Plane::Xz,
        ..Default::default()
    };
    plan_cartesian_circle(&mut group, &params).unwrap();
    let start = group.pose;
    assert_eq!(group.waypoints.len(), 5);
    for w in &group.waypoints {
        assert_eq!(w.rotation, start.rotation);
        assert_eq!(w.translation.y, start.translation.y);
    }
    let first = group.waypoints[0].translation.vector;
    let last = group.waypoints[4].translation.vector;
    assert!((first - start.translation.vector).norm() < 1e-12);
    assert!((last - first).norm() < 1e-12);
    // quarter turn in xz: center at x = 0.9, then up along z
    assert!((group.waypoints[1].translation.x - 0.9).abs() < 1e-12);
    assert!((group.waypoints[1].translation.z - 0.1).abs() < 1e-12);
}

#[test]
fn low_fraction_does_not_execute() {
    let mut group = StubGroup::new(0.5);
    let (_, fraction) = plan_cartesian_circle(&mut group, &CircleParams::default()).unwrap();
    assert_eq!(fraction, 0.5);
    assert_eq!(group.executions(), 0);
}

#[test]
fn high_fraction_executes_once() {
    let mut group = StubGroup::new(0.97);
    let (_, fraction) = plan_cartesian_circle(&mut group, &CircleParams::default()).unwrap();
    assert_eq!(fraction, 0.97);
    assert_eq!(group.executions(), 1);
}

#[test]
fn fraction_equal_to_threshold_executes() {
    let mut group = StubGroup::new(0.95);
    plan_cartesian_circle(&mut group, &CircleParams::default()).unwrap();
    assert_eq!(group.executions(), 1);
}

#[test]
fn threshold_above_one_never_executes() {
    let mut group = StubGroup::new(1.0);
    let params = CircleParams {
        completeness_threshold: 1.5,
        ..Default::default()
    };
    let (_, fraction) = plan_cartesian_circle(&mut group, &params).unwrap();
    assert_eq!(fraction, 1.0);
    assert_eq!(group.executions(), 0);
}

#[test]
fn execute_disabled() {
    let mut group = StubGroup::new(1.0);
    let params = CircleParams {
        execute: false,
        ..Default::default()
    };
    let (traj, fraction) = plan_cartesian_circle(&mut group, &params).unwrap();
    assert_eq!((traj, fraction), (42, 1.0));
    assert_eq!(group.executions(), 0);
}

#[test]
fn invalid_arguments_before_any_call() {
    let mut group = StubGroup::new(1.0);
    let params = CircleParams {
        n_points: 0,
        ..Default::default()
    };
    let err = plan_cartesian_circle(&mut group, &params).unwrap_err();
    assert!(matches!(err, StubError::Lib(Error::ZeroPoints)));
    assert!(group.calls.is_empty());

    let params = CircleParams {
        radius: -0.1,
        ..Default::default()
    };
    let err = plan_cartesian_circle(&mut group, &params).unwrap_err();
    assert!(matches!(err, StubError::Lib(Error::InvalidParameter { .. })));
    assert!(group.calls.is_empty());
}

#[test]
fn collaborator_errors_propagate() {
    let mut group = StubGroup::new(1.0);
    group.fail_planning = true;
    let err = plan_cartesian_circle(&mut group, &CircleParams::default()).unwrap_err();
    assert!(matches!(err, StubError::Planning));
    assert_eq!(group.executions(), 0);

    let mut group = StubGroup::new(1.0);
    group.fail_execution = true;
    let err = plan_cartesian_circle(&mut group, &CircleParams::default()).unwrap_err();
    assert!(matches!(err, StubError::Execution));
    assert_eq!(group.executions(), 1);
}

#[test]
fn dry_run_full_circle() {
    let mut group = DryRunGroup::from_settings(&DryRunSettings::default()).unwrap();
    let start = group.current_pose().unwrap();
    let (traj, fraction) = plan_cartesian_circle(&mut group, &CircleParams::default()).unwrap();
    assert_eq!(fraction, 1.0);
    assert_eq!(group.velocity_scale(), 0.2);
    assert_eq!(traj.velocity_scale, 0.2);
    assert_eq!(group.executed().len(), 1);
    assert_eq!(group.executed()[0], traj);
    let end = group.current_pose().unwrap();
    assert!((end.translation.vector - start.translation.vector).norm() < 1e-12);
    assert_eq!(end.rotation, start.rotation);
}

#[test]
fn dry_run_out_of_reach_skips_execution() {
    let settings = DryRunSettings {
        start_position: [0.8, 0.0, 0.0],
        reach: 0.85,
        ..Default::default()
    };
    let mut group = DryRunGroup::from_settings(&settings).unwrap();
    // the yz circle around x = 0.8 leaves the sphere quickly
    let params = CircleParams {
        radius: 0.4,
        plane: Plane::Yz,
        ..Default::default()
    };
    let (traj, fraction) = plan_cartesian_circle(&mut group, &params).unwrap();
    assert!(fraction < params.completeness_threshold);
    assert!(!traj.is_empty());
    assert!(group.executed().is_empty());
}

#[test]
fn dry_run_rejects_oversized_interpolation() {
    let mut group = DryRunGroup::from_settings(&DryRunSettings::default()).unwrap();
    let params = CircleParams {
        eef_step: 1e-9,
        ..Default::default()
    };
    let err = plan_cartesian_circle(&mut group, &params).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { name: "eef_step", .. }));
    assert!(group.executed().is_empty());
}
