// src/source.rs

//! Source locator: finds vendored archives and unpacks them
//!
//! Sources are never downloaded. A local source repository holds one archive
//! per library version, named by a fixed convention:
//!
//! - `{name}-{version}.tar.gz` for ordinary libraries
//! - `{module}-everywhere-opensource-src-{version}.tar.xz` for Qt modules
//!
//! Archives are unpacked with their single top-level directory stripped, so
//! the destination directory becomes the library's source root.

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tar::Archive;
use tracing::{debug, info};
use xz2::read::XzDecoder;

/// How a library's archive is named in the source repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveNaming {
    /// `{name}-{version}.tar.gz`
    Simple,
    /// `{name}-everywhere-opensource-src-{version}.tar.xz`
    Everywhere,
}

impl ArchiveNaming {
    /// Archive file name for a library version
    pub fn file_name(&self, name: &str, version: &str) -> String {
        match self {
            Self::Simple => format!("{}-{}.tar.gz", name, version),
            Self::Everywhere => format!("{}-everywhere-opensource-src-{}.tar.xz", name, version),
        }
    }
}

/// One archive a recipe needs, and where it goes inside the source folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub name: String,
    pub version: String,
    pub naming: ArchiveNaming,
    /// Subdirectory of the source folder to unpack into (`None` = the root)
    pub subdir: Option<String>,
}

impl SourceSpec {
    pub fn new(name: impl Into<String>, version: impl Into<String>, naming: ArchiveNaming) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            naming,
            subdir: None,
        }
    }

    pub fn into_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.subdir = Some(subdir.into());
        self
    }

    pub fn file_name(&self) -> String {
        self.naming.file_name(&self.name, &self.version)
    }
}

/// Compression wrapped around a tar archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TarCompression {
    None,
    Gzip,
    Xz,
}

impl TarCompression {
    fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Ok(Self::Gzip)
        } else if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            Ok(Self::Xz)
        } else if name.ends_with(".tar") {
            Ok(Self::None)
        } else {
            Err(Error::Archive(format!("unknown archive format: {}", name)))
        }
    }
}

/// Locates source archives under a configured repository root
#[derive(Debug, Clone)]
pub struct SourceLocator {
    root: PathBuf,
}

impl SourceLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the archive for a library version
    ///
    /// Fails with [`Error::SourceNotFound`] if the archive is not there.
    pub fn locate(&self, name: &str, version: &str, naming: ArchiveNaming) -> Result<PathBuf> {
        let path = self.root.join(naming.file_name(name, version));
        if !path.is_file() {
            return Err(Error::SourceNotFound { path });
        }
        debug!("Located source archive {}", path.display());
        Ok(path)
    }

    /// Locate and unpack a source into `source_folder`
    ///
    /// Returns the directory the sources were unpacked into.
    pub fn unpack(&self, spec: &SourceSpec, source_folder: &Path) -> Result<PathBuf> {
        let archive = self.locate(&spec.name, &spec.version, spec.naming)?;
        let dest = match &spec.subdir {
            Some(subdir) => source_folder.join(subdir),
            None => source_folder.to_path_buf(),
        };

        info!("Unpacking {} into {}", archive.display(), dest.display());
        let count = extract_strip_root(&archive, &dest)?;
        debug!("Unpacked {} entries", count);
        Ok(dest)
    }
}

/// Extract a tar archive into `dest`, dropping its single top-level directory
///
/// `dest` is created if needed and must not already contain files. Returns
/// the number of entries written.
pub fn extract_strip_root(archive: &Path, dest: &Path) -> Result<usize> {
    let compression = TarCompression::from_path(archive)?;

    if dest.exists() && fs::read_dir(dest)?.next().is_some() {
        return Err(Error::Archive(format!(
            "destination is not empty: {}",
            dest.display()
        )));
    }
    fs::create_dir_all(dest)?;

    let file = File::open(archive)?;
    let reader: Box<dyn Read> = match compression {
        TarCompression::None => Box::new(file),
        TarCompression::Gzip => Box::new(GzDecoder::new(file)),
        TarCompression::Xz => Box::new(XzDecoder::new(file)),
    };
    let mut tar = Archive::new(reader);

    let mut root: Option<PathBuf> = None;
    let mut count = 0;

    let entries = tar
        .entries()
        .map_err(|e| Error::Archive(format!("failed to read {}: {}", archive.display(), e)))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| Error::Archive(format!("failed to read archive entry: {}", e)))?;

        if entry.header().entry_type().is_pax_global_extensions() {
            continue;
        }

        let path = entry
            .path()
            .map_err(|e| Error::Archive(format!("invalid entry path: {}", e)))?
            .into_owned();

        // `./` and other entries with no named component
        let Some((top, rest)) = split_root(&path)? else {
            continue;
        };
        match &root {
            None => root = Some(top),
            Some(existing) if *existing != top => {
                return Err(Error::Archive(format!(
                    "archive has more than one top-level entry: {} and {}",
                    existing.display(),
                    top.display()
                )));
            }
            Some(_) => {}
        }

        // the top-level directory itself
        if rest.as_os_str().is_empty() {
            continue;
        }

        let target = dest.join(&rest);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        if entry.header().entry_type().is_hard_link() {
            let link = entry
                .link_name()
                .map_err(|e| Error::Archive(format!("invalid link name: {}", e)))?
                .ok_or_else(|| Error::Archive(format!("hard link without target: {}", path.display())))?
                .into_owned();
            let (_, link_rest) = split_root(&link)?.ok_or_else(|| {
                Error::Archive(format!("hard link with empty target: {}", path.display()))
            })?;
            fs::hard_link(dest.join(link_rest), &target)?;
        } else {
            entry.unpack(&target).map_err(|e| {
                Error::Archive(format!("failed to unpack {}: {}", path.display(), e))
            })?;
        }
        count += 1;
    }

    if root.is_none() {
        return Err(Error::Archive(format!("archive is empty: {}", archive.display())));
    }

    Ok(count)
}

/// Split an entry path into its first component and the remainder
///
/// Rejects absolute paths and `..` so nothing lands outside the destination.
/// A path made only of `.` components has no root and yields `None`.
fn split_root(path: &Path) -> Result<Option<(PathBuf, PathBuf)>> {
    let mut top = None;
    let mut rest = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => {
                if top.is_none() {
                    top = Some(PathBuf::from(part));
                } else {
                    rest.push(part);
                }
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::Archive(format!(
                    "refusing unsafe archive path: {}",
                    path.display()
                )));
            }
        }
    }

    Ok(top.map(|top| (top, rest)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    fn write_tar_gz(path: &Path, files: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_archive_naming() {
        assert_eq!(
            ArchiveNaming::Simple.file_name("boost", "1.79.0"),
            "boost-1.79.0.tar.gz"
        );
        assert_eq!(
            ArchiveNaming::Everywhere.file_name("qtbase", "5.15.3"),
            "qtbase-everywhere-opensource-src-5.15.3.tar.xz"
        );
    }

    #[test]
    fn test_locate_missing() {
        let repo = TempDir::new().unwrap();
        let locator = SourceLocator::new(repo.path());

        let err = locator
            .locate("boost", "1.79.0", ArchiveNaming::Simple)
            .unwrap_err();
        match err {
            Error::SourceNotFound { path } => {
                assert!(path.ends_with("boost-1.79.0.tar.gz"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unpack_strips_root() {
        let repo = TempDir::new().unwrap();
        write_tar_gz(
            &repo.path().join("fmt-8.1.1.tar.gz"),
            &[
                ("fmt-8.1.1/CMakeLists.txt", "project(fmt)"),
                ("fmt-8.1.1/include/fmt/core.h", "// core"),
            ],
        );

        let work = TempDir::new().unwrap();
        let src = work.path().join("src");
        let locator = SourceLocator::new(repo.path());
        let spec = SourceSpec::new("fmt", "8.1.1", ArchiveNaming::Simple);

        let dest = locator.unpack(&spec, &src).unwrap();
        assert_eq!(dest, src);
        assert!(src.join("CMakeLists.txt").is_file());
        assert!(src.join("include/fmt/core.h").is_file());
        assert!(!src.join("fmt-8.1.1").exists());
    }

    /// Raw entry names, written without the builder's path normalization
    fn write_tar_gz_raw(path: &Path, entries: &[(&str, Option<&str>)]) {
        let encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, content) in entries {
            let mut header = tar::Header::new_old();
            let data = content.unwrap_or("").as_bytes();
            header.as_old_mut().name[..name.len()].copy_from_slice(name.as_bytes());
            match content {
                Some(_) => {
                    header.set_entry_type(tar::EntryType::Regular);
                    header.set_mode(0o644);
                }
                None => {
                    header.set_entry_type(tar::EntryType::Directory);
                    header.set_mode(0o755);
                }
            }
            header.set_size(data.len() as u64);
            header.set_cksum();
            builder.append(&header, data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_unpack_dot_prefixed_archive() {
        let repo = TempDir::new().unwrap();
        let archive = repo.path().join("fmt-8.1.1.tar.gz");
        write_tar_gz_raw(
            &archive,
            &[
                ("./", None),
                ("./fmt-8.1.1/", None),
                ("./fmt-8.1.1/CMakeLists.txt", Some("project(fmt)")),
                ("./fmt-8.1.1/include/fmt/core.h", Some("// core")),
            ],
        );

        let work = TempDir::new().unwrap();
        let dest = work.path().join("src");
        let count = extract_strip_root(&archive, &dest).unwrap();

        assert_eq!(count, 2);
        assert!(dest.join("CMakeLists.txt").is_file());
        assert!(dest.join("include/fmt/core.h").is_file());
        assert!(!dest.join("fmt-8.1.1").exists());
    }

    #[test]
    fn test_unpack_into_subdir() {
        let repo = TempDir::new().unwrap();
        write_tar_gz(&repo.path().join("lib-1.0.tar.gz"), &[("lib-1.0/configure", "#!/bin/sh")]);

        let work = TempDir::new().unwrap();
        let spec = SourceSpec::new("lib", "1.0", ArchiveNaming::Simple).into_subdir("lib");
        let dest = SourceLocator::new(repo.path())
            .unpack(&spec, work.path())
            .unwrap();

        assert_eq!(dest, work.path().join("lib"));
        assert!(dest.join("configure").is_file());
    }

    #[test]
    fn test_multiple_roots_rejected() {
        let repo = TempDir::new().unwrap();
        let archive = repo.path().join("bad-1.0.tar.gz");
        write_tar_gz(&archive, &[("a/one.txt", "1"), ("b/two.txt", "2")]);

        let work = TempDir::new().unwrap();
        let err = extract_strip_root(&archive, &work.path().join("out")).unwrap_err();
        assert!(err.to_string().contains("more than one top-level entry"));
    }

    #[test]
    fn test_non_empty_destination_rejected() {
        let repo = TempDir::new().unwrap();
        let archive = repo.path().join("x-1.0.tar.gz");
        write_tar_gz(&archive, &[("x-1.0/file", "data")]);

        let work = TempDir::new().unwrap();
        fs::write(work.path().join("stale"), "old").unwrap();
        assert!(extract_strip_root(&archive, work.path()).is_err());
    }

    #[test]
    fn test_unknown_format() {
        let result = extract_strip_root(Path::new("file.zip"), Path::new("/tmp/never"));
        assert!(result.is_err());
    }
}
