//! Parsing of `dpkg -S` output

use std::collections::BTreeSet;

/// Parser for `dpkg -S <path>` output
pub struct DpkgParser;

impl DpkgParser {
    /// Owning packages named in the output, or `None` when dpkg found no owner
    ///
    /// Lines look like `libgl1:amd64: /usr/lib/x86_64-linux-gnu/libGL.so.1` or
    /// `libc6:amd64, libc6:i386: /usr/share/doc/libc6`. The architecture
    /// qualifier is dropped.
    pub fn parse(output: &str) -> Option<BTreeSet<String>> {
        if output.trim().is_empty() || output.contains("no path found") {
            return None;
        }

        let packages: BTreeSet<String> = output
            .lines()
            .filter(|line| !line.starts_with("diversion by"))
            .filter_map(|line| line.split_once(": ").map(|(owners, _)| owners))
            .flat_map(|owners| owners.split(", "))
            .filter_map(|owner| owner.split(':').next())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();

        if packages.is_empty() {
            None
        } else {
            Some(packages)
        }
    }
}
