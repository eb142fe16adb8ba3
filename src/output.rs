//! Where rendered classes go.
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

pub trait OutputSink {
    /// Receive one rendered class. An error aborts the remaining emission;
    /// files already written stay on disk.
    fn write_class(&mut self, namespace: &str, class_name: &str, body: &str) -> Result<()>;
}

/// Writes `<root>/<namespace as path>/<ClassName>.<ext>`.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
    extension: String,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self { root: root.into(), extension: extension.into() }
    }

    pub fn root(&self) -> &Path { &self.root }

    pub fn path_for(&self, namespace: &str, class_name: &str) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(namespace.split('.').filter(|s| !s.is_empty()));
        path.push(format!("{class_name}.{}", self.extension));
        path
    }
}

impl OutputSink for FsSink {
    fn write_class(&mut self, namespace: &str, class_name: &str, body: &str) -> Result<()> {
        let path = self.path_for(namespace, class_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        std::fs::write(&path, body).map_err(|e| Error::io(&path, e))?;
        info!(path = %path.display(), "wrote class");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedClass {
    pub namespace: String,
    pub class_name: String,
    pub body: String,
}

/// Collects rendered classes in emission order.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub classes: Vec<RenderedClass>,
}

impl MemorySink {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, class_name: &str) -> Option<&RenderedClass> {
        self.classes.iter().find(|c| c.class_name == class_name)
    }
}

impl OutputSink for MemorySink {
    fn write_class(&mut self, namespace: &str, class_name: &str, body: &str) -> Result<()> {
        self.classes.push(RenderedClass {
            namespace: namespace.to_string(),
            class_name: class_name.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_sink_lays_out_namespace_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FsSink::new(dir.path(), "java");
        sink.write_class("com.example.api", "Item", "class Item {}\n").unwrap();

        let path = dir.path().join("com").join("example").join("api").join("Item.java");
        assert_eq!(sink.path_for("com.example.api", "Item"), path);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "class Item {}\n");
    }

    #[test]
    fn fs_sink_surfaces_io_failures() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("com");
        std::fs::write(&blocker, "not a directory").unwrap();
        let mut sink = FsSink::new(dir.path(), "java");
        let err = sink.write_class("com.example", "Item", "x").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        sink.write_class("a", "B", "b").unwrap();
        sink.write_class("a", "A", "a").unwrap();
        let names: Vec<_> = sink.classes.iter().map(|c| c.class_name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(sink.get("A").map(|c| c.body.as_str()), Some("a"));
    }
}
