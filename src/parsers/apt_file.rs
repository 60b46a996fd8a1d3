//! Parsing of `apt-file find -f -` output

use std::collections::{BTreeMap, BTreeSet};

use crate::models::deps::DependencySet;

/// Parser for `apt-file` search results
pub struct AptFileParser;

impl AptFileParser {
    /// Group candidate packages by the queried library they mention
    ///
    /// Every queried library gets an entry, empty when apt-file knows no
    /// package for it. Result lines that mention none of the queried
    /// libraries are ignored.
    pub fn parse(output: &str, queried: &DependencySet) -> BTreeMap<String, BTreeSet<String>> {
        let mut suggestions: BTreeMap<String, BTreeSet<String>> = queried
            .iter()
            .map(|lib| (lib.clone(), BTreeSet::new()))
            .collect();

        for line in output.lines() {
            let Some((package, path)) = line.split_once(": ") else {
                continue;
            };

            if let Some(lib) = queried.iter().find(|lib| path.contains(lib.as_str())) {
                if let Some(packages) = suggestions.get_mut(lib) {
                    packages.insert(package.trim().to_string());
                }
            }
        }

        suggestions
    }

    /// Stdin payload for a bulk query: one pattern per line
    pub fn query_input(queried: &DependencySet) -> String {
        let mut input = queried.iter().cloned().collect::<Vec<_>>().join("\n");
        input.push('\n');
        input
    }
}
