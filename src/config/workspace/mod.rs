//! Workspace-relative install layout.

pub mod layout;
