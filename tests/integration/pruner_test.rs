use trim_ps2::{
    core::pruner::{shared_objects, Pruner},
    models::{DependencySet, RetainedSet},
    utils::directory_size,
};

use super::bundle::{Bundle, AUXILIARY_FILES, BINDING_FILES};

fn aux() -> Vec<String> {
    ["designer", "rcc", "uic", "pyside2-lupdate"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn test_retained_names_survive_by_substring() {
    let bundle = Bundle::new();
    let binding_dir = bundle.binding_dir();

    // versioned entries from ldd keep the unversioned files of the same name
    bundle.write("app_packages/PySide2/Qt/lib/libQt5Core.so", "\x7fELF");
    let retained: RetainedSet = ["/elsewhere/libQt5Core.so.5.15.2", "QtGui.abi3.so"]
        .into_iter()
        .collect::<DependencySet>()
        .into();

    let report = Pruner::new(&aux()).prune(&binding_dir, &retained).unwrap();

    assert!(bundle.binding("QtGui.abi3.so").exists());
    assert!(bundle.binding("Qt/lib/libQt5Core.so.5").exists());
    assert!(bundle.binding("Qt/lib/libQt5Core.so").exists());
    assert!(!bundle.binding("QtCore.abi3.so").exists());
    assert_eq!(report.kept.len(), 3);
    assert_eq!(report.removed.len(), BINDING_FILES.len() + 1 - 3);
}

#[test]
fn test_auxiliary_binaries_go_regardless() {
    let bundle = Bundle::new();
    let binding_dir = bundle.binding_dir();
    let retained: RetainedSet = AUXILIARY_FILES
        .iter()
        .map(|f| bundle.binding(f).display().to_string())
        .collect::<DependencySet>()
        .into();

    let report = Pruner::new(&aux()).prune(&binding_dir, &retained).unwrap();

    for file in AUXILIARY_FILES {
        assert!(!bundle.binding(file).exists(), "{} survived", file);
    }
    assert_eq!(report.removed_auxiliary.len(), AUXILIARY_FILES.len());
}

#[test]
fn test_non_shared_objects_are_untouched() {
    let bundle = Bundle::new();
    bundle.write("app_packages/PySide2/__init__.py", "");
    bundle.write("app_packages/PySide2/Qt/translations/qt_de.qm", "x");
    let binding_dir = bundle.binding_dir();

    Pruner::new(&[]).prune(&binding_dir, &RetainedSet::new()).unwrap();

    assert!(shared_objects(&binding_dir).unwrap().is_empty());
    assert!(bundle.binding("__init__.py").exists());
    assert!(bundle.binding("Qt/translations/qt_de.qm").exists());
    assert!(bundle.binding("designer").exists());
}

#[test]
fn test_sizes_are_measured_before_and_after() {
    let bundle = Bundle::new();
    let binding_dir = bundle.binding_dir();
    let before = directory_size(&binding_dir).unwrap();

    let report = Pruner::new(&aux()).prune(&binding_dir, &RetainedSet::new()).unwrap();

    assert_eq!(report.size_before, before);
    assert_eq!(report.size_after, 0);
    assert_eq!(report.saved_bytes(), before);
}

#[cfg(unix)]
#[test]
fn test_removal_failure_is_reported_not_fatal() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let bundle = Bundle::new();
    let binding_dir = bundle.binding_dir();
    let locked = bundle.binding("Qt/plugins/platforms");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    let report = Pruner::new(&aux()).prune(&binding_dir, &RetainedSet::new());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let report = report.unwrap();

    // root ignores directory permissions
    if bundle.binding("Qt/plugins/platforms/libqxcb.so").exists() {
        assert_eq!(report.failed, vec![bundle.binding("Qt/plugins/platforms/libqxcb.so")]);
    } else {
        assert!(report.failed.is_empty());
    }
    assert!(!bundle.binding("QtCore.abi3.so").exists());
}
