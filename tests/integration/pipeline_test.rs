use trim_ps2::{
    models::{OutputFormat, Settings},
    RunOutcome, ScriptedRunner, TrimError, Trimmer,
};

use super::bundle::{Bundle, AUXILIARY_FILES, BINDING_FILES};

fn settings(bundle: &Bundle) -> Settings {
    Settings {
        python: Some(bundle.python()),
        use_colors: false,
        show_progress: false,
        ..Default::default()
    }
}

/// The application loads QtWidgets and the xcb platform plugin; `ldd` reports
/// QtGui, QtCore, a system libGL and a missing libxkbcommon-x11 for QtWidgets
fn widgets_runner(bundle: &Bundle) -> ScriptedRunner {
    let trace = format!(
        "import 'myapp' # <_frozen_importlib_external.SourceFileLoader object>\n\
         {}\
         QFactoryLoader::QFactoryLoader() loaded library \"{}\"\n\
         # cleanup[3] wiping PySide2\n",
        bundle.loaded("QtWidgets.abi3.so"),
        bundle.binding("Qt/plugins/platforms/libqxcb.so").display(),
    );

    let widgets_ldd = format!(
        "\tlinux-vdso.so.1 (0x00007ffd)\n\
         \tlibQt5Gui.so.5 => {} (0x00007f01)\n\
         \tlibQt5Core.so.5 => {} (0x00007f02)\n\
         \tlibGL.so.1 => /usr/lib/x86_64-linux-gnu/libGL.so.1 (0x00007f03)\n\
         \tlibxkbcommon-x11.so.0 => not found\n\
         \t/lib64/ld-linux-x86-64.so.2 (0x00007f04)\n",
        bundle.binding("Qt/lib/libQt5Gui.so.5").display(),
        bundle.binding("Qt/lib/libQt5Core.so.5").display(),
    );

    ScriptedRunner::new()
        .on(bundle.python().display().to_string(), RunOutcome::new("", trace, Some(0)))
        .on(
            format!("ldd {}", bundle.binding("QtWidgets.abi3.so").display()),
            RunOutcome::ok(widgets_ldd),
        )
        .on(
            "dpkg -S /usr/lib/x86_64-linux-gnu/libGL.so.1",
            RunOutcome::ok("libgl1:amd64: /usr/lib/x86_64-linux-gnu/libGL.so.1\n"),
        )
        .on(
            "dpkg -S",
            RunOutcome::new("", "dpkg-query: no path found matching pattern *libxkbcommon-x11.so.0*\n", Some(1)),
        )
        .on(
            "apt-file",
            RunOutcome::ok(
                "libxkbcommon-x11-0: /usr/lib/x86_64-linux-gnu/libxkbcommon-x11.so.0\n\
                 libxkbcommon-x11-0: /usr/lib/x86_64-linux-gnu/libxkbcommon-x11.so.0.0.0\n",
            ),
        )
}

#[test]
fn test_trim_keeps_exactly_the_loaded_closure() {
    let bundle = Bundle::new();
    let settings = settings(&bundle);
    let runner = widgets_runner(&bundle);
    let mut console = Vec::new();

    let report = Trimmer::new(&runner, &settings).run("myapp", &mut console).unwrap();

    let kept = [
        "QtWidgets.abi3.so",
        "Qt/lib/libQt5Core.so.5",
        "Qt/lib/libQt5Gui.so.5",
        "Qt/plugins/platforms/libqxcb.so",
    ];
    for file in BINDING_FILES {
        assert_eq!(bundle.binding(file).exists(), kept.contains(&file), "{}", file);
    }
    for file in AUXILIARY_FILES {
        assert!(!bundle.binding(file).exists(), "{} survived", file);
    }

    let prune = report.prune.unwrap();
    assert_eq!(prune.kept.len(), 4);
    assert_eq!(prune.removed.len(), 4);
    assert_eq!(prune.removed_auxiliary.len(), 3);
    assert!(prune.size_after < prune.size_before);

    // the application's closure, not the system libraries, decides what stays
    assert!(report.closure.contains("/usr/lib/x86_64-linux-gnu/libGL.so.1"));
    assert!(report.closure.contains("libxkbcommon-x11.so.0"));
    assert_eq!(report.retained.len(), 4);
    assert!(report.app_deps.is_subset(&report.closure));

    assert_eq!(runner.count("dpkg"), 0);
    assert_eq!(runner.count("apt-file"), 0);

    let console = String::from_utf8(console).unwrap();
    assert!(console.contains("***** RECURSIVE DEPS *****"));
    assert!(console.contains("Done"));
}

#[test]
fn test_dump_attributes_without_deleting() {
    let bundle = Bundle::new();
    let settings = Settings {
        dump: true,
        ..settings(&bundle)
    };
    let runner = widgets_runner(&bundle);
    let mut console = Vec::new();

    let report = Trimmer::new(&runner, &settings).run("myapp", &mut console).unwrap();

    for file in BINDING_FILES.iter().chain(AUXILIARY_FILES.iter()) {
        assert!(bundle.binding(file).exists(), "{} was deleted in dump mode", file);
    }
    assert!(report.prune.is_none());

    let dump = report.dump.unwrap();
    assert_eq!(dump.binding_modules.len(), 4);
    assert_eq!(dump.other_deps.len(), 2);
    assert_eq!(dump.attribution.resolution.packages(), ["libgl1".to_string()].into());
    assert_eq!(
        dump.attribution.suggestions["libxkbcommon-x11.so.0"],
        ["libxkbcommon-x11-0".to_string()].into()
    );

    // one batched apt-file query, fed on stdin
    assert_eq!(runner.count("apt-file"), 1);
    assert_eq!(runner.count("dpkg"), 2);

    let console = String::from_utf8(console).unwrap();
    assert!(console.contains("$ sudo apt install libgl1"));
    assert!(console.contains("> libxkbcommon-x11.so.0: ['libxkbcommon-x11-0']"));
    assert!(console.find("@ apt-file suggests:").unwrap() < console.find("***** REQUIRED PySide2 ELFs *****").unwrap());
}

#[test]
fn test_csv_dump_written_to_file() {
    let bundle = Bundle::new();
    let settings = Settings {
        dump: true,
        output_format: OutputFormat::Csv,
        output_file: Some(bundle.root().join("deps.csv")),
        ..settings(&bundle)
    };
    let runner = widgets_runner(&bundle);

    Trimmer::new(&runner, &settings).run("myapp", &mut Vec::new()).unwrap();

    let csv = std::fs::read_to_string(bundle.root().join("deps.csv")).unwrap();
    assert!(csv.starts_with("name,path,category,packages\n"));
    assert!(csv.contains(",binding_module,"));
    assert!(csv.contains("libGL.so.1,/usr/lib/x86_64-linux-gnu/libGL.so.1,resolved,libgl1"));
}

#[test]
fn test_exit_137_without_marker_aborts() {
    let bundle = Bundle::new();
    let settings = settings(&bundle);
    let runner = ScriptedRunner::new().on(
        bundle.python().display().to_string(),
        RunOutcome::new("", bundle.loaded("QtCore.abi3.so"), Some(137)),
    );

    let err = Trimmer::new(&runner, &settings).run("myapp", &mut Vec::new()).unwrap_err();

    assert!(matches!(err, TrimError::TargetAborted { code: Some(137), .. }));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(
        err.user_message(),
        "'myapp' module exited with code 137. Abort deps gathering."
    );
    for file in BINDING_FILES {
        assert!(bundle.binding(file).exists());
    }
}

#[test]
fn test_missing_binding_package() {
    let bundle = Bundle::without_binding();
    let settings = settings(&bundle);
    let runner = ScriptedRunner::new().on(
        bundle.python().display().to_string(),
        RunOutcome::new("", "ModuleNotFoundError: No module named 'PySide2'\n", Some(1)),
    );

    let err = Trimmer::new(&runner, &settings).run("myapp", &mut Vec::new()).unwrap_err();

    assert!(matches!(err, TrimError::BindingPackageNotFound { .. }));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(err.user_message(), "PySide2 not found");
}

#[test]
fn test_missing_interpreter_aborts_before_ldd() {
    let bundle = Bundle::new();
    let settings = settings(&bundle);
    let runner = ScriptedRunner::new().fail(bundle.python().display().to_string());

    let err = Trimmer::new(&runner, &settings).run("myapp", &mut Vec::new()).unwrap_err();

    assert!(matches!(err, TrimError::TargetNotStarted { .. }));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(runner.count("ldd"), 0);
    for file in BINDING_FILES {
        assert!(bundle.binding(file).exists());
    }
}

#[test]
fn test_missing_system_tools_do_not_fail_the_dump() {
    let bundle = Bundle::new();
    let settings = Settings {
        dump: true,
        ..settings(&bundle)
    };
    let trace = format!(
        "{}loaded /usr/lib/x86_64-linux-gnu/libGL.so.1\n",
        bundle.loaded("QtWidgets.abi3.so")
    );
    let runner = ScriptedRunner::new()
        .on(bundle.python().display().to_string(), RunOutcome::new("", trace, Some(0)))
        .fail("ldd")
        .fail("dpkg")
        .fail("apt-file");

    let report = Trimmer::new(&runner, &settings).run("myapp", &mut Vec::new()).unwrap();

    assert_eq!(report.closure, report.app_deps);
    let dump = report.dump.unwrap();
    assert!(dump.attribution.resolution.resolved.is_empty());
    assert_eq!(
        dump.attribution.unresolved,
        ["/usr/lib/x86_64-linux-gnu/libGL.so.1"].into_iter().collect()
    );
    assert!(dump.attribution.suggestions.values().all(|packages| packages.is_empty()));
    assert_eq!(runner.count("dpkg"), 1);
    assert_eq!(runner.count("apt-file"), 1);
    assert!(bundle.binding("QtWebEngineWidgets.abi3.so").exists());
}
