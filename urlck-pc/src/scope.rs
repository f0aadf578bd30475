//! Store-view scopes of explicit assignments
//!
//! A store sees its own override when it has one and falls back to the
//! default otherwise. The default value of a product therefore reaches every
//! store that does not override it, including store 0 itself, while an
//! override reaches only its own store. A store-level row without a value
//! still counts as an override: the default does not reach that store.

use std::collections::{BTreeSet, HashMap};
use urlck_common::{ProductId, StoreId, DEFAULT_STORE_ID};

use crate::model::Assignment;
use crate::snapshot::Snapshot;

/// Store ids at which an assignment is the effective value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope(BTreeSet<StoreId>);

impl Scope {
    pub fn single(store_id: StoreId) -> Self {
        Self(BTreeSet::from([store_id]))
    }

    pub fn contains(&self, store_id: StoreId) -> bool {
        self.0.contains(&store_id)
    }

    pub fn intersects(&self, other: &Scope) -> bool {
        !self.0.is_disjoint(&other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = StoreId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<StoreId> for Scope {
    fn from_iter<I: IntoIterator<Item = StoreId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An assignment together with its resolved scope
#[derive(Debug, Clone)]
pub struct ScopedAssignment<'a> {
    pub assignment: &'a Assignment,
    pub scope: Scope,
}

/// Computes scopes for the assignments of one snapshot
#[derive(Debug, Clone)]
pub struct ScopeResolver {
    all_store_ids: BTreeSet<StoreId>,
    overrides: HashMap<ProductId, BTreeSet<StoreId>>,
}

impl ScopeResolver {
    /// Collect the store universe and per-product override stores
    ///
    /// The universe is the listed stores plus the default store plus any
    /// store an assignment or blank override was found at.
    pub fn new(snapshot: &Snapshot) -> Self {
        let mut all_store_ids: BTreeSet<StoreId> = snapshot.store_ids().iter().copied().collect();
        all_store_ids.insert(DEFAULT_STORE_ID);

        let mut overrides: HashMap<ProductId, BTreeSet<StoreId>> = HashMap::new();
        for assignment in snapshot.assignments() {
            all_store_ids.insert(assignment.store_id);
            if assignment.is_override() {
                overrides
                    .entry(assignment.product_id)
                    .or_default()
                    .insert(assignment.store_id);
            }
        }
        for &(store_id, product_id) in snapshot.blank_overrides() {
            all_store_ids.insert(store_id);
            overrides.entry(product_id).or_default().insert(store_id);
        }

        Self {
            all_store_ids,
            overrides,
        }
    }

    pub fn all_store_ids(&self) -> &BTreeSet<StoreId> {
        &self.all_store_ids
    }

    /// Scope of a single assignment
    pub fn scope_of(&self, assignment: &Assignment) -> Scope {
        if assignment.is_override() {
            return Scope::single(assignment.store_id);
        }

        match self.overrides.get(&assignment.product_id) {
            Some(overridden) => self
                .all_store_ids
                .difference(overridden)
                .copied()
                .collect(),
            None => self.all_store_ids.iter().copied().collect(),
        }
    }

    /// Scopes of every assignment in the snapshot, in snapshot order
    pub fn resolve<'a>(&self, snapshot: &'a Snapshot) -> Vec<ScopedAssignment<'a>> {
        snapshot
            .assignments()
            .iter()
            .map(|assignment| ScopedAssignment {
                assignment,
                scope: self.scope_of(assignment),
            })
            .collect()
    }
}
