use crate::motion::planner::{plan_cartesian_circle, MoveGroup};
use crate::motion::waypoints::{build_circle_waypoints, Plane, Pose};
use crate::utils::python_args::{
    cartesian_path_kwargs, circle_params, exception_for, execute_kwargs, KwargValue,
    PythonException,
};
use crate::Error;
use nalgebra::{Quaternion, Translation3, UnitQuaternion};
use pyo3::exceptions::{PyOSError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

impl From<Error> for PyErr {
    fn from(e: Error) -> Self {
        let msg = e.to_string();
        match exception_for(&e) {
            PythonException::ValueError => PyValueError::new_err(msg),
            PythonException::OsError => PyOSError::new_err(msg),
            PythonException::RuntimeError => PyRuntimeError::new_err(msg),
        }
    }
}

impl ToPyObject for KwargValue {
    fn to_object(&self, py: Python<'_>) -> PyObject {
        match self {
            KwargValue::Float(v) => v.to_object(py),
            KwargValue::Bool(b) => b.to_object(py),
        }
    }
}

fn kwargs_dict<'py>(
    py: Python<'py>,
    kwargs: &[(&'static str, KwargValue)],
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    for (key, value) in kwargs {
        dict.set_item(*key, value.to_object(py))?;
    }
    Ok(dict)
}

fn attr_f64(obj: &Bound<'_, PyAny>, name: &str) -> PyResult<f64> {
    obj.getattr(name)?.extract()
}

/// Reads a `geometry_msgs/Pose`-like object
fn pose_from_py(pose: &Bound<'_, PyAny>) -> PyResult<Pose> {
    let p = pose.getattr("position")?;
    let o = pose.getattr("orientation")?;
    let q = Quaternion::new(
        attr_f64(&o, "w")?,
        attr_f64(&o, "x")?,
        attr_f64(&o, "y")?,
        attr_f64(&o, "z")?,
    );
    Ok(Pose::from_parts(
        Translation3::new(attr_f64(&p, "x")?, attr_f64(&p, "y")?, attr_f64(&p, "z")?),
        UnitQuaternion::from_quaternion(q),
    ))
}

/// Deep copies of `template` with positions taken from `poses`; the python
/// orientation is never rewritten.
fn poses_to_py<'py>(
    py: Python<'py>,
    template: &Bound<'py, PyAny>,
    poses: &[Pose],
) -> PyResult<Bound<'py, PyList>> {
    let deepcopy = py.import_bound("copy")?.getattr("deepcopy")?;
    let list = PyList::empty_bound(py);
    for pose in poses {
        let w = deepcopy.call1((template.clone(),))?;
        let position = w.getattr("position")?;
        let v = pose.translation.vector;
        position.setattr("x", v.x)?;
        position.setattr("y", v.y)?;
        position.setattr("z", v.z)?;
        list.append(w)?;
    }
    Ok(list)
}

/// MoveGroupCommander living on the python side
struct PyMoveGroup<'py> {
    group: Bound<'py, PyAny>,
    start_pose: Option<Bound<'py, PyAny>>,
}

impl<'py> MoveGroup for PyMoveGroup<'py> {
    type Trajectory = PyObject;
    type Error = PyErr;

    fn set_max_velocity_scaling_factor(&mut self, factor: f64) -> PyResult<()> {
        self.group
            .call_method1("set_max_velocity_scaling_factor", (factor,))?;
        Ok(())
    }

    fn current_pose(&mut self) -> PyResult<Pose> {
        let pose = self.group.call_method0("get_current_pose")?.getattr("pose")?;
        let out = pose_from_py(&pose)?;
        self.start_pose = Some(pose);
        Ok(out)
    }

    fn compute_cartesian_path(
        &mut self,
        waypoints: &[Pose],
        eef_step: f64,
        jump_threshold: f64,
        avoid_collisions: bool,
    ) -> PyResult<(PyObject, f64)> {
        let py = self.group.py();
        let template = self
            .start_pose
            .as_ref()
            .ok_or_else(|| PyRuntimeError::new_err("current pose must be read before planning"))?;
        let waypoints = poses_to_py(py, template, waypoints)?;
        let kwargs = kwargs_dict(
            py,
            &cartesian_path_kwargs(eef_step, jump_threshold, avoid_collisions),
        )?;
        self.group
            .call_method("compute_cartesian_path", (waypoints,), Some(&kwargs))?
            .extract()
    }

    fn execute(&mut self, trajectory: &PyObject, wait: bool) -> PyResult<()> {
        let py = self.group.py();
        let kwargs = kwargs_dict(py, &execute_kwargs(wait))?;
        self.group
            .call_method("execute", (trajectory.clone_ref(py),), Some(&kwargs))?;
        Ok(())
    }
}

/// Way-points forming a full circle that starts and ends at `start_pose`.
#[pyfunction]
#[pyo3(signature = (start_pose, radius, n_points, plane="xy"))]
fn build_waypoints<'py>(
    py: Python<'py>,
    start_pose: &Bound<'py, PyAny>,
    radius: f64,
    n_points: usize,
    plane: &str,
) -> PyResult<Bound<'py, PyList>> {
    let plane: Plane = plane.parse()?;
    let start = pose_from_py(start_pose)?;
    let poses = build_circle_waypoints(&start, radius, n_points, plane)?;
    poses_to_py(py, start_pose, &poses)
}

/// Plan (and optionally execute) a closed Cartesian circle with a MoveIt move group.
/// Returns `(trajectory, fraction)` as given by `compute_cartesian_path`.
#[pyfunction]
#[pyo3(
    name = "plan_cartesian_circle",
    signature = (
        move_group,
        radius = 0.10,
        n_points = 120,
        plane = "xy",
        eef_step = 0.005,
        jump_threshold = 0.0,
        velocity_scale = 0.2,
        execute = true,
        completeness_threshold = 0.95
    )
)]
#[allow(clippy::too_many_arguments)]
fn plan_cartesian_circle_py(
    move_group: Bound<'_, PyAny>,
    radius: f64,
    n_points: usize,
    plane: &str,
    eef_step: f64,
    jump_threshold: f64,
    velocity_scale: f64,
    execute: bool,
    completeness_threshold: f64,
) -> PyResult<(PyObject, f64)> {
    let params = circle_params(
        radius,
        n_points,
        plane,
        eef_step,
        jump_threshold,
        velocity_scale,
        execute,
        completeness_threshold,
    )?;
    let mut group = PyMoveGroup {
        group: move_group,
        start_pose: None,
    };
    plan_cartesian_circle(&mut group, &params)
}

#[pymodule]
fn cartesian_circle_lib(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();
    m.add_function(wrap_pyfunction!(build_waypoints, m)?)?;
    m.add_function(wrap_pyfunction!(plan_cartesian_circle_py, m)?)?;
    Ok(())
}
