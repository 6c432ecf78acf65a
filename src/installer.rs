use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::{error::Result, metadata::manifest::{DependencyEntry, Manifest, RepositoryEntry, REPOSITORIES}, output::Output};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOptions {
    /// Touch an entry that is already present. When false, existing
    /// entries are skipped whatever `allow_override_version` says.
    pub update_if_exists: bool,
    /// Replace the constraint of an existing entry.
    pub allow_override_version: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            update_if_exists: true,
            allow_override_version: true,
        }
    }
}

impl InstallOptions {
    pub fn keep_existing() -> Self {
        Self {
            update_if_exists: true,
            allow_override_version: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageChange {
    Added,
    Updated,
    Unchanged,
    Kept,
    Skipped,
}

/// Edits the `require`, `require-dev` and `repositories` sections of a
/// manifest file.
///
/// The manifest is read once in [`DependencyInstaller::new`]; every install
/// call writes it straight back. Another instance writing the same file is
/// not observed until a new installer is constructed.
pub struct DependencyInstaller<O> {
    path: PathBuf,
    manifest: Manifest,
    output: O,
}

impl<O: Output> DependencyInstaller<O> {
    pub fn new<P: AsRef<Path>>(path: P, mut output: O) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let manifest = Manifest::load(&path)?;

        output.verbose(format!("Loaded manifest {}", path.display()));

        Ok(Self { path, manifest, output })
    }

    pub fn install_package(&mut self, name: &str, version: &str, dev: bool, options: InstallOptions) -> Result<PackageChange> {
        let entry = DependencyEntry::new(name, version, dev);

        self.install_dependency(&entry, options)
    }

    pub fn install_dependency(&mut self, entry: &DependencyEntry, options: InstallOptions) -> Result<PackageChange> {
        let sort = self.manifest.sort_packages();
        let section = self.manifest.section_mut(entry.section())?;

        let change = match section.get_mut(&entry.name) {
            None => {
                section.insert(entry.name.clone(), Value::String(entry.version_constraint.clone()));
                PackageChange::Added
            },
            Some(_) if !options.update_if_exists => PackageChange::Skipped,
            Some(_) if !options.allow_override_version => PackageChange::Kept,
            Some(Value::String(current)) if *current == entry.version_constraint => PackageChange::Unchanged,
            Some(current) => {
                *current = Value::String(entry.version_constraint.clone());
                PackageChange::Updated
            },
        };

        if sort && change == PackageChange::Added {
            section.sort_keys();
        }

        self.report(entry, change);
        self.save()?;

        Ok(change)
    }

    pub fn install_repository(&mut self, name: &str, kind: &str, url: &str) -> Result<()> {
        let entry = RepositoryEntry::new(name, kind, url);
        let value = entry.to_value()?;

        self.manifest.section_mut(REPOSITORIES)?
            .insert(entry.name.clone(), value);

        self.output.info(format!("Installing repository {} ({}: {})", entry.name, entry.kind, entry.url));
        self.save()
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_output(self) -> O {
        self.output
    }

    fn save(&mut self) -> Result<()> {
        self.manifest.save(&self.path)?;
        self.output.verbose(format!("Wrote {}", self.path.display()));

        Ok(())
    }

    fn report(&mut self, entry: &DependencyEntry, change: PackageChange) {
        let DependencyEntry { name, version_constraint, .. } = entry;
        let section = entry.section();

        match change {
            PackageChange::Added =>
                self.output.info(format!("Installing {name} ({version_constraint}) in {section}")),
            PackageChange::Updated =>
                self.output.info(format!("Updating {name} to {version_constraint} in {section}")),
            PackageChange::Unchanged =>
                self.output.verbose(format!("{name} already requires {version_constraint} in {section}")),
            PackageChange::Kept =>
                self.output.info(format!("Keeping existing version of {name} in {section}")),
            PackageChange::Skipped =>
                self.output.verbose(format!("Skipping {name}, already present in {section}")),
        }
    }
}
