//! Catalogs of operation descriptors introspected from one interface.

use crate::descriptor::OperationDescriptor;

/// The set of descriptors exposed by one operations interface.
///
/// Descriptors are unique by `(name, parameter_types)`. Iteration follows
/// insertion order so merged listings stay deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationCatalog {
    descriptors: Vec<OperationDescriptor>,
}

impl OperationCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor, returning `false` when an identical one is present.
    pub fn insert(&mut self, descriptor: OperationDescriptor) -> bool {
        if self.contains(&descriptor) {
            return false;
        }
        self.descriptors.push(descriptor);
        true
    }

    /// Returns true when an identical descriptor is present.
    #[must_use]
    pub fn contains(&self, descriptor: &OperationDescriptor) -> bool {
        self.descriptors.contains(descriptor)
    }

    /// Iterates over the descriptors in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, OperationDescriptor> {
        self.descriptors.iter()
    }

    /// Number of distinct descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true when the catalog holds no descriptors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl FromIterator<OperationDescriptor> for OperationCatalog {
    fn from_iter<I: IntoIterator<Item = OperationDescriptor>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for descriptor in iter {
            catalog.insert(descriptor);
        }
        catalog
    }
}

impl<'a> IntoIterator for &'a OperationCatalog {
    type Item = &'a OperationDescriptor;
    type IntoIter = std::slice::Iter<'a, OperationDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
