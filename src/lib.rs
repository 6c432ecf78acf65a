//! Adds dependency and repository entries to a composer-style manifest
//! while leaving every other part of the document as it was.

pub mod error;
pub mod installer;
pub mod metadata;
pub mod output;

pub use error::{ErrorKind, Result};
pub use installer::{DependencyInstaller, InstallOptions, PackageChange};
pub use metadata::manifest::{DependencyEntry, Manifest, RepositoryEntry};
pub use output::{ConsoleOutput, NullOutput, Output, Verbosity};
