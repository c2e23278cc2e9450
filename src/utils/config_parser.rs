use crate::motion::planner::CircleParams;
use crate::motion::waypoints::Pose;
use crate::Error;
use nalgebra::{Quaternion, Translation3, UnitQuaternion};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Robot-less move group used by the binary
///
///  * `start_position` end effector position [x, y, z] in meters
///  * `start_orientation` quaternion [x, y, z, w]
///  * `reach` radius of the reachable sphere around the base [m]
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DryRunSettings {
    pub start_position: [f64; 3],
    pub start_orientation: [f64; 4],
    pub reach: f64,
}

impl Default for DryRunSettings {
    fn default() -> Self {
        Self {
            start_position: [0.4, 0.0, 0.3],
            start_orientation: [0.0, 0.0, 0.0, 1.0],
            reach: 0.85,
        }
    }
}

impl DryRunSettings {
    /// Fails on a non-finite position or an orientation that cannot be normalized.
    pub fn start_pose(&self) -> Result<Pose, Error> {
        let [x, y, z] = self.start_position;
        if let Some(&value) = self.start_position.iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "start_position",
                value,
            });
        }
        let [qx, qy, qz, qw] = self.start_orientation;
        let q = Quaternion::new(qw, qx, qy, qz);
        let norm = q.norm();
        let rotation = if norm.is_finite() {
            UnitQuaternion::try_new(q, 1.0e-9)
        } else {
            None
        };
        let Some(rotation) = rotation else {
            return Err(Error::InvalidParameter {
                name: "start_orientation",
                value: norm,
            });
        };
        Ok(Pose::from_parts(Translation3::new(x, y, z), rotation))
    }
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub circle: CircleParams,
    pub dry_run: DryRunSettings,
}

impl Config {
    pub fn from_settings_file<P: AsRef<Path>>(path_to_setting: P) -> Result<Self, Error> {
        let contents = fs::read_to_string(path_to_setting.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        let config: Config = toml::from_str(contents)?;
        config.dry_run.start_pose()?;
        if !(config.dry_run.reach > 0.0) {
            log::warn!("Non positive reach {}, nothing will be reachable", config.dry_run.reach);
        }
        Ok(config)
    }
}
