//! Plain data exchanged with a python move group, kept free of pyo3 types.
use crate::motion::planner::CircleParams;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KwargValue {
    Float(f64),
    Bool(bool),
}

pub type Kwargs<const N: usize> = [(&'static str, KwargValue); N];

/// Keyword arguments of `MoveGroupCommander.compute_cartesian_path`
pub fn cartesian_path_kwargs(eef_step: f64, jump_threshold: f64, avoid_collisions: bool) -> Kwargs<3> {
    [
        ("eef_step", KwargValue::Float(eef_step)),
        ("jump_threshold", KwargValue::Float(jump_threshold)),
        ("avoid_collisions", KwargValue::Bool(avoid_collisions)),
    ]
}

/// Keyword arguments of `MoveGroupCommander.execute`
pub fn execute_kwargs(wait: bool) -> Kwargs<1> {
    [("wait", KwargValue::Bool(wait))]
}

/// Python exception raised for a crate error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PythonException {
    ValueError,
    OsError,
    RuntimeError,
}

pub fn exception_for(err: &Error) -> PythonException {
    match err {
        Error::Io(_) => PythonException::OsError,
        Error::Other { .. } => PythonException::RuntimeError,
        _ => PythonException::ValueError,
    }
}

/// Parses and validates loose call arguments, so that a bad plane or point
/// count fails before the move group is touched.
#[allow(clippy::too_many_arguments)]
pub fn circle_params(
    radius: f64,
    n_points: usize,
    plane: &str,
    eef_step: f64,
    jump_threshold: f64,
    velocity_scale: f64,
    execute: bool,
    completeness_threshold: f64,
) -> Result<CircleParams, Error> {
    let params = CircleParams {
        radius,
        n_points,
        plane: plane.parse()?,
        eef_step,
        jump_threshold,
        velocity_scale,
        execute,
        completeness_threshold,
    };
    params.validate()?;
    Ok(params)
}
