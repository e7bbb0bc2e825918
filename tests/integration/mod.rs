//! Integration tests for the ogsbot bootstrap workflow

mod cli_contracts;
mod engine_config_patch;
mod install_workflow;
mod support;
