//! Install steps.
//!
//! Each step downloads one kind of artifact through an [`ArtifactSource`](crate::fetch::ArtifactSource)
//! and leaves it in its final place inside the [`InstallLayout`](crate::config::InstallLayout).

pub mod bridge;
pub mod engine;
pub mod libraries;
pub mod model;
pub mod permissions;

pub use bridge::install_bridge;
pub use engine::{extract_zip, install_engine};
pub use libraries::{install_libraries, LibrarySearchPath};
pub use model::{gunzip, install_model};
pub use permissions::{is_executable, mark_executable};
