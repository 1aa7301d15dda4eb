//! Built-in layout providers

use super::ports::LayoutHooks;
use depot_storage::{RepositoryFiles, RepositoryPath};
use std::io;

fn file_name(relative: &str) -> &str {
    relative.rsplit('/').next().unwrap_or(relative)
}

/// Maven 2 repository layout
///
/// Metadata is `maven-metadata.xml` (and `maven-metadata-<id>.xml`) at the
/// artifact or version level. A checksum sidecar counts as present only when
/// the artifact it describes is present too.
#[derive(Debug, Default, Clone, Copy)]
pub struct Maven2Layout;

impl LayoutHooks for Maven2Layout {
    fn name(&self) -> &str {
        "maven2"
    }

    fn artifact_exists(
        &self,
        files: &dyn RepositoryFiles,
        path: &RepositoryPath,
    ) -> io::Result<bool> {
        if !files.exists(path)? {
            return Ok(false);
        }
        let relative = path.relativize();
        if self.is_checksum(relative) {
            if let Some((artifact, _)) = relative.rsplit_once('.') {
                let artifact = RepositoryPath::new(path.storage_id(), path.repository_id(), artifact);
                return files.exists(&artifact);
            }
        }
        Ok(true)
    }

    fn is_metadata(&self, relative: &str) -> bool {
        let name = file_name(relative);
        let name = name
            .strip_suffix(".sha1")
            .or_else(|| name.strip_suffix(".md5"))
            .unwrap_or(name);
        name.starts_with("maven-metadata") && name.ends_with(".xml")
    }
}

/// npm registry layout
///
/// Tarballs live under `<package>/-/<package>-<version>.tgz`; the package
/// document is `<package>/package.json` (scoped packages keep their `@scope/`
/// prefix).
#[derive(Debug, Default, Clone, Copy)]
pub struct NpmLayout;

impl LayoutHooks for NpmLayout {
    fn name(&self) -> &str {
        "npm"
    }

    fn is_metadata(&self, relative: &str) -> bool {
        file_name(relative) == "package.json" && !relative.contains("/-/")
    }
}

/// Layout whose metadata is recognised by file name suffix
#[derive(Debug, Clone)]
pub struct SuffixLayout {
    name: &'static str,
    metadata_suffixes: &'static [&'static str],
}

impl SuffixLayout {
    pub const fn new(name: &'static str, metadata_suffixes: &'static [&'static str]) -> Self {
        Self {
            name,
            metadata_suffixes,
        }
    }

    pub const fn nuget() -> Self {
        Self::new("nuget", &[".nuspec"])
    }

    /// PEP 503 simple index pages
    pub const fn pypi() -> Self {
        Self::new("pypi", &["index.html"])
    }

    pub const fn rpm() -> Self {
        Self::new("rpm", &["repomd.xml", "primary.xml.gz", "filelists.xml.gz", "other.xml.gz"])
    }

    /// Plain files, no metadata
    pub const fn raw() -> Self {
        Self::new("raw", &[])
    }
}

impl LayoutHooks for SuffixLayout {
    fn name(&self) -> &str {
        self.name
    }

    fn is_metadata(&self, relative: &str) -> bool {
        let name = file_name(relative);
        self.metadata_suffixes
            .iter()
            .any(|suffix| name.ends_with(suffix))
    }
}
