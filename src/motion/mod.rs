pub mod dry_run;
pub mod planner;
pub mod waypoints;

pub use planner::{plan_cartesian_circle, CircleParams, MoveGroup};
pub use waypoints::{build_circle_waypoints, Plane, Pose};
