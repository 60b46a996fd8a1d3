//! Parsing of the interpreter's verbose import trace
//!
//! `python -v` (together with `QT_DEBUG_PLUGINS=1`) prints one line per loaded
//! extension module or plugin. Only lines mentioning `loaded` or one of the
//! fatal markers are relevant; from those the shared-object paths are pulled out.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::{Result, TrimError};
use crate::models::deps::{file_name, DependencySet};

/// Absolute path of a loaded shared object, versioned suffix included
static LOADED_LIB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/.*\.so[.\d]*").expect("loaded library pattern"));

/// Library named by an import failure, e.g. `ImportError: libGL.so.1: cannot open ...`
static IMPORT_ERROR_LIB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ImportError: (\S+?\.so[.\d]*)").expect("import error pattern"));

/// Lines of the trace that only describe interpreter shutdown
const SHUTDOWN_NOISE: [&str; 2] = ["# cleanup", "# destroy"];

/// Shared objects and fatal markers found in one trace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceSample {
    pub libs: DependencySet,
    pub markers: BTreeSet<String>,
}

impl TraceSample {
    pub fn has_fatal_marker(&self) -> bool {
        !self.markers.is_empty()
    }
}

/// Parser for loader trace output
pub struct LoaderTraceParser;

impl LoaderTraceParser {
    /// Extract loaded shared objects and fatal markers from combined trace output
    pub fn parse(output: &str, fatal_markers: &[String]) -> TraceSample {
        let mut sample = TraceSample::default();

        for line in output.lines() {
            let hits: Vec<&String> = fatal_markers
                .iter()
                .filter(|marker| line.contains(marker.as_str()))
                .collect();

            if !line.contains("loaded") && hits.is_empty() {
                continue;
            }

            sample.markers.extend(hits.into_iter().cloned());

            for found in LOADED_LIB.find_iter(line) {
                Self::collect(&mut sample.libs, found.as_str());
            }

            for caps in IMPORT_ERROR_LIB.captures_iter(line) {
                Self::collect(&mut sample.libs, &caps[1]);
            }
        }

        sample
    }

    fn collect(libs: &mut DependencySet, candidate: &str) {
        // The interpreter's own extension modules are never part of the binding
        if candidate.contains(".so") && !file_name(candidate).contains("python") {
            libs.insert(candidate);
        }
    }

    /// Full trace minus interpreter shutdown chatter, for postmortem output
    pub fn diagnostic(output: &str) -> String {
        output
            .lines()
            .filter(|line| !SHUTDOWN_NOISE.iter().any(|noise| line.contains(noise)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Directory of the shared object backing `module` in an import trace
    ///
    /// Looks for the first `loaded` line naming a path like `/.../QtCore*.so`.
    pub fn find_module_dir(output: &str, module: &str) -> Result<Option<PathBuf>> {
        let pattern = format!(r"/.*{}.*\.so", regex::escape(module));
        let module_lib = Regex::new(&pattern).map_err(|source| TrimError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;

        let found = output
            .lines()
            .filter(|line| line.contains("loaded"))
            .find_map(|line| module_lib.find(line))
            .and_then(|m| PathBuf::from(m.as_str()).parent().map(PathBuf::from));

        Ok(found)
    }
}
