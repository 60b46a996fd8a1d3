//! Dependency sets and the partitions the pipeline builds from them

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// True when the entry names a location rather than a bare library name
pub fn is_path(entry: &str) -> bool {
    entry.contains('/')
}

/// Final path component of an entry, or the entry itself for bare names
pub fn file_name(entry: &str) -> &str {
    Path::new(entry)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(entry)
}

/// A set of shared-object references: absolute paths or bare `libfoo.so.1` names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencySet(BTreeSet<String>);

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning whether it was new
    pub fn insert(&mut self, entry: impl Into<String>) -> bool {
        self.0.insert(entry.into())
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.0.contains(entry)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// Add every entry of `other`
    pub fn extend_from(&mut self, other: &DependencySet) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Remove every entry of `other`
    pub fn subtract(&mut self, other: &DependencySet) {
        self.0.retain(|entry| !other.contains(entry));
    }

    /// Whether every entry of `self` is also in `other`
    pub fn is_subset(&self, other: &DependencySet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Split into (entries matching the predicate, the rest)
    pub fn partition<F>(&self, mut predicate: F) -> (DependencySet, DependencySet)
    where
        F: FnMut(&str) -> bool,
    {
        let (matching, rest): (BTreeSet<String>, BTreeSet<String>) =
            self.0.iter().cloned().partition(|entry| predicate(entry));
        (DependencySet(matching), DependencySet(rest))
    }

    /// File names of all entries, deduplicated
    pub fn names(&self) -> BTreeSet<String> {
        self.0.iter().map(|entry| file_name(entry).to_string()).collect()
    }
}

impl FromIterator<String> for DependencySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        DependencySet(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for DependencySet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        DependencySet(iter.into_iter().map(String::from).collect())
    }
}

impl IntoIterator for DependencySet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DependencySet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Package attribution of a dependency set
///
/// Every input entry lands in exactly one of `resolved` or `unresolved`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Entry -> owning OS packages
    pub resolved: BTreeMap<String, BTreeSet<String>>,
    pub unresolved: DependencySet,
}

impl Resolution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, entry: impl Into<String>, packages: BTreeSet<String>) {
        self.resolved.insert(entry.into(), packages);
    }

    pub fn leave_unresolved(&mut self, entry: impl Into<String>) {
        self.unresolved.insert(entry);
    }

    /// Distinct package names across every resolved entry
    pub fn packages(&self) -> BTreeSet<String> {
        self.resolved.values().flatten().cloned().collect()
    }

    /// Entries that were attributed to a package
    pub fn resolved_entries(&self) -> DependencySet {
        self.resolved.keys().map(String::as_str).collect()
    }

    /// `resolved ∪ unresolved`
    pub fn all_entries(&self) -> DependencySet {
        let mut all = self.resolved_entries();
        all.extend_from(&self.unresolved);
        all
    }
}

/// Libraries the pruner must never delete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetainedSet(DependencySet);

impl RetainedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the set; entries are never removed
    pub fn retain_all(&mut self, deps: &DependencySet) {
        self.0.extend_from(deps);
    }

    /// A file is kept when its name occurs inside any retained entry
    pub fn keeps(&self, file_name: &str) -> bool {
        self.0.iter().any(|entry| entry.contains(file_name))
    }

    pub fn deps(&self) -> &DependencySet {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<DependencySet> for RetainedSet {
    fn from(deps: DependencySet) -> Self {
        RetainedSet(deps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(entries: &[&str]) -> DependencySet {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_is_path() {
        assert!(is_path("/usr/lib/libfoo.so.1"));
        assert!(is_path("lib/libfoo.so"));
        assert!(!is_path("libfoo.so.1"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("/usr/lib/x86_64-linux-gnu/libfoo.so.1"), "libfoo.so.1");
        assert_eq!(file_name("libbar.so"), "libbar.so");
    }

    #[test]
    fn test_partition_keeps_every_entry() {
        let deps = set(&["/b/PySide2/QtCore.so", "/usr/lib/libc.so.6", "libGL.so.1"]);
        let (binding, other) = deps.partition(|entry| entry.contains("PySide2"));

        assert_eq!(binding, set(&["/b/PySide2/QtCore.so"]));
        assert_eq!(other, set(&["/usr/lib/libc.so.6", "libGL.so.1"]));
        assert_eq!(binding.len() + other.len(), deps.len());
    }

    #[test]
    fn test_subtract() {
        let mut deps = set(&["a.so", "b.so", "c.so"]);
        deps.subtract(&set(&["b.so", "z.so"]));
        assert_eq!(deps, set(&["a.so", "c.so"]));
    }

    #[test]
    fn test_names_deduplicate() {
        let deps = set(&["/a/libfoo.so", "/b/libfoo.so", "libbar.so"]);
        let names: Vec<_> = deps.names().into_iter().collect();
        assert_eq!(names, vec!["libbar.so".to_string(), "libfoo.so".to_string()]);
    }

    #[test]
    fn test_resolution_packages() {
        let mut resolution = Resolution::new();
        resolution.resolve("/lib/libc.so.6", ["libc6".to_string()].into());
        resolution.resolve("/lib/libm.so.6", ["libc6".to_string()].into());
        resolution.leave_unresolved("libmissing.so");

        assert_eq!(resolution.packages().len(), 1);
        assert_eq!(
            resolution.all_entries(),
            set(&["/lib/libc.so.6", "/lib/libm.so.6", "libmissing.so"])
        );
    }

    #[test]
    fn test_retained_set_substring_match() {
        let retained = RetainedSet::from(set(&["/bundle/PySide2/Qt/lib/libQt5Core.so.5"]));
        assert!(retained.keeps("libQt5Core.so.5"));
        assert!(retained.keeps("libQt5Core.so"));
        assert!(!retained.keeps("libQt5Gui.so.5"));
    }
}
