//! Enumeration of `.java` sources from a jar or an exploded directory.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::ArtifactError;

/// A set of Java sources: either a sources jar or a directory tree.
///
/// Directory support mirrors the jar layout for local use and tests; the
/// artifact store itself only ever hands out jars.
#[derive(Clone, Debug)]
pub enum SourceSet {
    Jar(PathBuf),
    Dir(PathBuf),
}

impl SourceSet {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ArtifactError> {
        let path = path.into();
        let meta = std::fs::metadata(&path)?;
        if meta.is_dir() {
            Ok(SourceSet::Dir(path))
        } else {
            Ok(SourceSet::Jar(path))
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            SourceSet::Jar(path) | SourceSet::Dir(path) => path,
        }
    }

    /// All `.java` entries as `(entry name, contents)`, in stable order.
    ///
    /// Entries that are not valid UTF-8 or cannot be read are skipped with a
    /// diagnostic; the scan over a library is best-effort.
    pub fn java_sources(&self) -> Result<Vec<(String, String)>, ArtifactError> {
        match self {
            SourceSet::Jar(path) => jar_sources(path),
            SourceSet::Dir(path) => dir_sources(path),
        }
    }
}

fn jar_sources(path: &Path) -> Result<Vec<(String, String)>, ArtifactError> {
    let file = File::open(path)?;
    let mut zip = zip::ZipArchive::new(file)?;

    let mut sources = Vec::new();
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        if !entry.is_file() || !entry.name().ends_with(".java") {
            continue;
        }
        let name = entry.name().to_string();
        let mut text = String::new();
        match entry.read_to_string(&mut text) {
            Ok(_) => sources.push((name, text)),
            Err(err) => {
                tracing::warn!(entry = %name, archive = %path.display(), error = %err, "skipping unreadable source entry");
            }
        }
    }
    sources.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(sources)
}

fn dir_sources(root: &Path) -> Result<Vec<(String, String)>, ArtifactError> {
    let mut sources = Vec::new();
    for entry in walkdir::WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("java") {
            continue;
        }
        let name = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        match std::fs::read_to_string(path) {
            Ok(text) => sources.push((name, text)),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable source file");
            }
        }
    }
    sources.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn directory_source_sets_enumerate_java_files() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("com/acme");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join("B.java"), "class B {}").unwrap();
        std::fs::write(pkg.join("A.java"), "class A {}").unwrap();
        std::fs::write(pkg.join("notes.txt"), "not java").unwrap();

        let set = SourceSet::open(dir.path()).unwrap();
        let sources = set.java_sources().unwrap();
        let names: Vec<&str> = sources.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["com/acme/A.java", "com/acme/B.java"]);
        assert_eq!(sources[0].1, "class A {}");
    }

    #[test]
    fn jar_source_sets_enumerate_java_entries() {
        let dir = tempfile::tempdir().unwrap();
        let jar_path = dir.path().join("widgets-sources.jar");

        let file = File::create(&jar_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        writer
            .start_file("com/acme/Widget.java", options)
            .unwrap();
        writer.write_all(b"class Widget {}").unwrap();
        writer.start_file("META-INF/MANIFEST.MF", options).unwrap();
        writer.write_all(b"Manifest-Version: 1.0\n").unwrap();
        writer.finish().unwrap();

        let set = SourceSet::open(&jar_path).unwrap();
        let sources = set.java_sources().unwrap();
        assert_eq!(
            sources,
            vec![(
                "com/acme/Widget.java".to_string(),
                "class Widget {}".to_string()
            )]
        );
    }

    #[test]
    fn open_fails_for_missing_paths() {
        let err = SourceSet::open("/does/not/exist").unwrap_err();
        assert!(matches!(err, ArtifactError::Io(_)), "{err}");
    }
}
