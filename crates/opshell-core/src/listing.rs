//! Help listing pipeline: merge catalogs, hide denylisted names, append
//! shell-native entries.

use std::collections::{BTreeSet, HashSet};

use crate::catalog::OperationCatalog;
use crate::descriptor::{DisplayedRow, OperationDescriptor, StaticEntry};

/// Operations hidden from help because they only make sense programmatically.
pub const DEFAULT_HIDDEN_OPERATIONS: [&str; 2] = ["startFlowDynamic", "getProtocolVersion"];

/// Union of catalogs, sorted by operation name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedListing {
    descriptors: Vec<OperationDescriptor>,
}

impl MergedListing {
    /// Returns the descriptors in listing order.
    #[must_use]
    pub fn descriptors(&self) -> &[OperationDescriptor] {
        &self.descriptors
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true when the listing has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Merged listing with denylisted names removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredListing {
    descriptors: Vec<OperationDescriptor>,
}

impl FilteredListing {
    /// Returns the descriptors in listing order.
    #[must_use]
    pub fn descriptors(&self) -> &[OperationDescriptor] {
        &self.descriptors
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true when the listing has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Operation names hidden from help; they stay invocable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist {
    names: BTreeSet<String>,
}

impl Denylist {
    /// Creates an empty denylist.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    /// Returns true when `name` is hidden.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Iterates over the hidden names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for Denylist {
    fn default() -> Self {
        DEFAULT_HIDDEN_OPERATIONS.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Denylist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Merges any number of catalogs.
///
/// Descriptors are deduplicated by `(name, parameter_types)` and stably
/// sorted by name using ordinal, case-sensitive comparison, so ties keep the
/// order in which the catalogs were supplied.
pub fn merge_all<'a, I>(catalogs: I) -> MergedListing
where
    I: IntoIterator<Item = &'a OperationCatalog>,
{
    let mut seen: HashSet<&OperationDescriptor> = HashSet::new();
    let mut descriptors: Vec<OperationDescriptor> = catalogs
        .into_iter()
        .flat_map(OperationCatalog::iter)
        .filter(|descriptor| seen.insert(*descriptor))
        .cloned()
        .collect();
    descriptors.sort_by(|left, right| left.name().cmp(right.name()));
    MergedListing { descriptors }
}

/// Merges the primary and extended catalogs.
#[must_use]
pub fn merge(primary: &OperationCatalog, extended: &OperationCatalog) -> MergedListing {
    merge_all([primary, extended])
}

/// Drops every row whose name is denylisted, whatever its parameters.
#[must_use]
pub fn filter(listing: MergedListing, denylist: &Denylist) -> FilteredListing {
    let descriptors = listing
        .descriptors
        .into_iter()
        .filter(|descriptor| !denylist.contains(descriptor.name()))
        .collect();
    FilteredListing { descriptors }
}

/// Projects the listing onto rows and appends the shutdown entries.
#[must_use]
pub fn augment(listing: &FilteredListing) -> Vec<DisplayedRow> {
    augment_with(listing, &StaticEntry::SHUTDOWN_ENTRIES)
}

/// Projects the listing onto rows and appends `entries` in order.
///
/// Entries are never deduplicated against catalog rows.
#[must_use]
pub fn augment_with(listing: &FilteredListing, entries: &[StaticEntry]) -> Vec<DisplayedRow> {
    listing
        .descriptors
        .iter()
        .map(OperationDescriptor::to_row)
        .chain(entries.iter().map(StaticEntry::to_row))
        .collect()
}

/// What the help listing hides and what it appends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpPolicy {
    denylist: Denylist,
    static_entries: Vec<StaticEntry>,
}

impl HelpPolicy {
    /// Creates a policy.
    #[must_use]
    pub const fn new(denylist: Denylist, static_entries: Vec<StaticEntry>) -> Self {
        Self {
            denylist,
            static_entries,
        }
    }

    /// Returns the denylist.
    #[must_use]
    pub const fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    /// Returns the appended entries.
    #[must_use]
    pub fn static_entries(&self) -> &[StaticEntry] {
        &self.static_entries
    }

    /// Builds the full help listing for the given catalogs.
    #[must_use]
    pub fn listing<'a, I>(&self, catalogs: I) -> Vec<DisplayedRow>
    where
        I: IntoIterator<Item = &'a OperationCatalog>,
    {
        let filtered = filter(merge_all(catalogs), &self.denylist);
        augment_with(&filtered, &self.static_entries)
    }
}

impl Default for HelpPolicy {
    fn default() -> Self {
        Self::new(Denylist::default(), StaticEntry::SHUTDOWN_ENTRIES.to_vec())
    }
}
