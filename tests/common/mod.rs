// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use pantry::{
    Arch, BuildSettings, BuildType, Compiler, CompilerKind, KitchenConfig, Os, Profile,
    Result, RuntimeMode, Step, StepRunner,
};
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;
use xz2::write::XzEncoder;

/// Scratch directories for one cook: a source repository plus kitchen roots
///
/// Keep the value alive for the duration of the test.
pub struct Scratch {
    pub dir: TempDir,
}

impl Scratch {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sources")).unwrap();
        Self { dir }
    }

    pub fn sources(&self) -> PathBuf {
        self.dir.path().join("sources")
    }

    pub fn config(&self, host: Os) -> KitchenConfig {
        KitchenConfig {
            source_repo: Some(self.sources()),
            build_root: self.dir.path().join("build"),
            package_root: self.dir.path().join("packages"),
            jobs: 4,
            keep_builddir: false,
            host,
        }
    }
}

fn append_files<W: Write>(builder: &mut tar::Builder<W>, files: &[(&str, &str)]) {
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
    }
}

/// Write a `.tar.gz` archive with the given `(path, content)` entries
pub fn write_tar_gz(path: &Path, files: &[(&str, &str)]) {
    let encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    append_files(&mut builder, files);
    builder.into_inner().unwrap().finish().unwrap();
}

/// Write a `.tar.xz` archive with the given `(path, content)` entries
pub fn write_tar_xz(path: &Path, files: &[(&str, &str)]) {
    let encoder = XzEncoder::new(File::create(path).unwrap(), 6);
    let mut builder = tar::Builder::new(encoder);
    append_files(&mut builder, files);
    builder.into_inner().unwrap().finish().unwrap();
}

pub fn fmt_archive(repo: &Path) {
    write_tar_gz(
        &repo.join("fmt-8.1.1.tar.gz"),
        &[
            ("fmt-8.1.1/CMakeLists.txt", "project(FMT CXX)"),
            ("fmt-8.1.1/LICENSE.rst", "Copyright (c) 2012 - present, Victor Zverovich"),
            ("fmt-8.1.1/include/fmt/core.h", "// core"),
        ],
    );
}

pub fn boost_archive(repo: &Path) {
    write_tar_gz(
        &repo.join("boost-1.79.0.tar.gz"),
        &[
            ("boost_1_79_0/bootstrap.sh", "#!/bin/sh"),
            ("boost_1_79_0/bootstrap.bat", "@echo off"),
            ("boost_1_79_0/LICENSE_1_0.txt", "Boost Software License - Version 1.0"),
            ("boost_1_79_0/boost/version.hpp", "#define BOOST_VERSION 107900"),
        ],
    );
}

pub fn qt_archives(repo: &Path) {
    write_tar_xz(
        &repo.join("qtbase-everywhere-opensource-src-5.15.3.tar.xz"),
        &[
            ("qtbase-everywhere-src-5.15.3/configure", "#!/bin/sh"),
            ("qtbase-everywhere-src-5.15.3/LICENSE.LGPL3", "GNU LESSER GENERAL PUBLIC LICENSE"),
            ("qtbase-everywhere-src-5.15.3/LICENSE.GPL3", "GNU GENERAL PUBLIC LICENSE"),
        ],
    );
    write_tar_xz(
        &repo.join("qttools-everywhere-opensource-src-5.15.3.tar.xz"),
        &[("qttools-everywhere-src-5.15.3/qttools.pro", "SUBDIRS = src")],
    );
}

pub fn linux_gcc(build_type: BuildType) -> Profile {
    Profile::new(BuildSettings::new(
        Os::Linux,
        Arch::X86_64,
        Compiler::new(CompilerKind::Gcc).with_version("12"),
        build_type,
    ))
}

pub fn windows_msvc(runtime: RuntimeMode) -> Profile {
    Profile::new(BuildSettings::new(
        Os::Windows,
        Arch::X86_64,
        Compiler::new(CompilerKind::Msvc)
            .with_version("193")
            .with_runtime(runtime),
        BuildType::Release,
    ))
}

/// Step runner that records every step instead of spawning it
///
/// Steps whose name ends in `install` write `installs` (paths relative to
/// `package`) to mimic a real install. The step named `fail_at` exits 2.
pub struct RecordingRunner {
    pub seen: Rc<RefCell<Vec<Step>>>,
    pub fail_at: Option<String>,
    pub package: PathBuf,
    pub installs: Vec<String>,
}

impl RecordingRunner {
    pub fn new(package: impl Into<PathBuf>) -> Self {
        Self {
            seen: Rc::new(RefCell::new(Vec::new())),
            fail_at: None,
            package: package.into(),
            installs: Vec::new(),
        }
    }

    /// Handle on the recorded steps that outlives the runner
    pub fn seen(&self) -> Rc<RefCell<Vec<Step>>> {
        Rc::clone(&self.seen)
    }

    pub fn installing(mut self, files: &[&str]) -> Self {
        self.installs = files.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn failing_at(mut self, step: &str) -> Self {
        self.fail_at = Some(step.to_string());
        self
    }
}

impl StepRunner for RecordingRunner {
    fn run_step(&self, step: &Step) -> Result<Option<i32>> {
        self.seen.borrow_mut().push(step.clone());

        if self.fail_at.as_deref() == Some(step.name.as_str()) {
            return Ok(Some(2));
        }

        if step.name.ends_with("install") {
            for file in &self.installs {
                let path = self.package.join(file);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, "")?;
            }
        }

        Ok(Some(0))
    }
}

/// Names of the recorded steps, in order
pub fn step_names(seen: &Rc<RefCell<Vec<Step>>>) -> Vec<String> {
    seen.borrow().iter().map(|s| s.name.clone()).collect()
}
