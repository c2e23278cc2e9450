pub mod config_parser;
pub mod python_args;
