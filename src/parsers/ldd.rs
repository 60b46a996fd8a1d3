//! Parsing of `ldd` output

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::deps::DependencySet;

/// `libfoo.so.1 => /usr/lib/libfoo.so.1 (0x00007f...)`
static RESOLVED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"=>(.*)\(").expect("resolved dependency pattern"));

/// `libbar.so.2 => not found`
static NOT_FOUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*)=> not found").expect("missing dependency pattern"));

/// Loader-internal entries that never correspond to a file worth keeping
const PSEUDO_ENTRIES: [&str; 2] = ["linux-vdso", "ld-linux"];

/// Parser for `ldd` output
pub struct LddParser;

impl LddParser {
    /// Resolved paths, plus bare names of libraries the loader could not find
    pub fn parse(output: &str) -> DependencySet {
        let mut deps = DependencySet::new();

        for line in output.lines() {
            if PSEUDO_ENTRIES.iter().any(|pseudo| line.contains(pseudo)) {
                continue;
            }

            let entry = if let Some(caps) = RESOLVED.captures(line) {
                caps[1].trim().to_string()
            } else if let Some(caps) = NOT_FOUND.captures(line) {
                caps[1].trim().to_string()
            } else {
                continue;
            };

            if !entry.is_empty() {
                deps.insert(entry);
            }
        }

        deps
    }
}
