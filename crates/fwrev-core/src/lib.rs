//! Firmware version resolution from git metadata.

pub mod backend;
pub mod resolver;

pub use backend::{GitBackend, ResolveError, VcsBackend};
pub use resolver::{resolve_version, Define, FirmwareVersion};
