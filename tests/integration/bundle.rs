//! Fake application bundles for the integration tests

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// `<root>/bin/python`, `<root>/app/`, `<root>/app_packages/PySide2/...`
pub struct Bundle {
    dir: TempDir,
}

pub const BINDING_FILES: [&str; 8] = [
    "QtCore.abi3.so",
    "QtGui.abi3.so",
    "QtWidgets.abi3.so",
    "QtWebEngineWidgets.abi3.so",
    "Qt/lib/libQt5Core.so.5",
    "Qt/lib/libQt5Gui.so.5",
    "Qt/lib/libQt5WebEngineCore.so.5",
    "Qt/plugins/platforms/libqxcb.so",
];

pub const AUXILIARY_FILES: [&str; 3] = ["designer", "rcc", "Qt/bin/uic"];

impl Bundle {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();

        let bundle = Self { dir };
        for file in BINDING_FILES.iter().chain(AUXILIARY_FILES.iter()) {
            bundle.write(&format!("app_packages/PySide2/{}", file), "\x7fELF");
        }
        bundle
    }

    /// A bundle with no binding package at all
    pub fn without_binding() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn python(&self) -> PathBuf {
        self.root().join("bin/python")
    }

    pub fn binding_dir(&self) -> PathBuf {
        self.root().join("app_packages/PySide2")
    }

    pub fn binding(&self, rel: &str) -> PathBuf {
        self.root().join("app_packages/PySide2").join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Loader trace line for a shared object of the binding package
    pub fn loaded(&self, rel: &str) -> String {
        format!(
            "# extension module 'PySide2.{}' loaded from '{}'\n",
            rel.split('.').next().unwrap(),
            self.binding(rel).display()
        )
    }

    /// Replace the interpreter with a shell script
    #[cfg(unix)]
    pub fn fake_python(&self, script: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.python();
        fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
