use std::{fs, io::Write, path::Path};

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Value};
use tempfile::NamedTempFile;

use crate::error::{ErrorKind, Result};

pub const REQUIRE: &str = "require";
pub const REQUIRE_DEV: &str = "require-dev";
pub const REPOSITORIES: &str = "repositories";

const ROOT: &str = "<root>";

/// A composer-style manifest. Key order of the source document is kept,
/// so untouched sections are written back exactly where they were.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    root: Map<String, Value>,
}

impl Manifest {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;

        Self::parse(path, &data)
    }

    pub fn parse(path: &Path, data: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(data)
            .map_err(|source| ErrorKind::Parse { path: path.to_path_buf(), source })?;

        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(ErrorKind::NotAnObject { key: ROOT.to_string() }),
        }
    }

    /// Writes the manifest through a sibling temporary file, so the target
    /// is either fully replaced or left as it was.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = self.to_pretty_bytes()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&data)?;
        tmp.flush()?;

        if let Ok(meta) = fs::metadata(path) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }

        tmp.persist(path).map_err(|e| e.error)?;

        Ok(())
    }

    /// Four space indentation with a trailing newline, same as composer.
    pub fn to_pretty_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(256);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));

        self.root.serialize(&mut ser)?;
        buf.push(b'\n');

        Ok(buf)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn section(&self, key: &str) -> Option<&Map<String, Value>> {
        self.root.get(key).and_then(Value::as_object)
    }

    /// Returns the object stored under `key`, creating it when missing.
    /// A value of any other type is left alone and reported.
    pub fn section_mut(&mut self, key: &str) -> Result<&mut Map<String, Value>> {
        self.root.entry(key)
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| ErrorKind::NotAnObject { key: key.to_string() })
    }

    pub fn sort_packages(&self) -> bool {
        self.section("config")
            .and_then(|config| config.get("sort-packages"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEntry {
    pub name: String,
    pub version_constraint: String,
    pub dev: bool,
}

impl DependencyEntry {
    pub fn new(name: impl Into<String>, version_constraint: impl Into<String>, dev: bool) -> Self {
        Self {
            name: name.into(),
            version_constraint: version_constraint.into(),
            dev,
        }
    }

    pub fn section(&self) -> &'static str {
        if self.dev { REQUIRE_DEV } else { REQUIRE }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEntry {
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

impl RepositoryEntry {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            url: url.into(),
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn parse(data: &str) -> Result<Manifest> {
        Manifest::parse(Path::new("composer.json"), data)
    }

    #[test]
    fn keeps_key_order() {
        let manifest = parse(r#"{"name": "acme/app", "type": "project", "autoload": {}, "require": {}}"#).unwrap();

        let keys: Vec<_> = manifest.keys().collect();
        assert_eq!(keys, ["name", "type", "autoload", "require"]);
    }

    #[test]
    fn rejects_invalid_json() {
        let err = parse("{ not json").unwrap_err();

        assert!(matches!(err, ErrorKind::Parse { .. }));
    }

    #[test]
    fn rejects_non_object_root() {
        let err = parse("[1, 2]").unwrap_err();

        assert!(matches!(err, ErrorKind::NotAnObject { key } if key == ROOT));
    }

    #[test]
    fn section_mut_creates_missing_object() {
        let mut manifest = parse("{}").unwrap();

        manifest.section_mut(REQUIRE).unwrap().insert("psr/log".into(), json!("^3"));

        assert_eq!(manifest.get(REQUIRE), Some(&json!({"psr/log": "^3"})));
    }

    #[test]
    fn section_mut_refuses_scalars() {
        let mut manifest = parse(r#"{"require": "psr/log"}"#).unwrap();

        let err = manifest.section_mut(REQUIRE).unwrap_err();

        assert!(matches!(err, ErrorKind::NotAnObject { key } if key == REQUIRE));
        assert_eq!(manifest.get(REQUIRE), Some(&json!("psr/log")));
    }

    #[test]
    fn sort_packages_flag() {
        assert!(!parse("{}").unwrap().sort_packages());
        assert!(!parse(r#"{"config": {"sort-packages": "yes"}}"#).unwrap().sort_packages());
        assert!(parse(r#"{"config": {"sort-packages": true}}"#).unwrap().sort_packages());
    }

    #[test]
    fn pretty_output_matches_composer_layout() {
        let manifest = parse(r#"{"require":{"psr/log":"^3"},"homepage":"https://example.org/"}"#).unwrap();

        let out = String::from_utf8(manifest.to_pretty_bytes().unwrap()).unwrap();

        assert_eq!(out, "{\n    \"require\": {\n        \"psr/log\": \"^3\"\n    },\n    \"homepage\": \"https://example.org/\"\n}\n");
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("composer.json");
        let manifest = parse(r#"{"extra": {"branch-alias": {"dev-main": "1.x-dev"}}, "minimum-stability": "dev"}"#).unwrap();

        manifest.save(&path).unwrap();

        assert_eq!(Manifest::load(&path).unwrap(), manifest);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();

        let err = Manifest::load(dir.path().join("composer.json")).unwrap_err();

        assert!(matches!(err, ErrorKind::Io(_)));
    }

    #[test]
    fn dependency_entry_section() {
        assert_eq!(DependencyEntry::new("psr/log", "^3", false).section(), REQUIRE);
        assert_eq!(DependencyEntry::new("psr/log", "^3", true).section(), REQUIRE_DEV);
    }

    #[test]
    fn repository_entry_value() {
        let repo = RepositoryEntry::new("mediact", "composer", "https://composer.mediact.nl");

        assert_eq!(repo.to_value().unwrap(), json!({"type": "composer", "url": "https://composer.mediact.nl"}));
    }
}
