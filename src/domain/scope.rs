//! Role-scoped record filters.
//!
//! A `RecordScope` is what remains visible to a caller once its role and
//! profiles are resolved. Caller-supplied filters are merged into it with
//! `RecordScope::apply`, which never widens visibility.

use uuid::Uuid;

/// Records visible to one caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordScope {
    /// No restriction
    Unrestricted,
    /// Records booked by this user
    Customer(Uuid),
    /// Records assigned to this staff profile
    Staff(Uuid),
    /// Records of these salons; never empty, see `RecordScope::salons`
    Salons(Vec<Uuid>),
    /// Matches no record
    Nothing,
}

impl RecordScope {
    /// Scope over a set of owned salons; an empty set sees nothing.
    pub fn salons(ids: Vec<Uuid>) -> Self {
        if ids.is_empty() {
            RecordScope::Nothing
        } else {
            RecordScope::Salons(ids)
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, RecordScope::Nothing)
    }

    /// Whether a record with these owners is inside the scope.
    pub fn covers(&self, customer_id: Uuid, staff_id: Uuid, salon_id: Uuid) -> bool {
        match self {
            RecordScope::Unrestricted => true,
            RecordScope::Customer(id) => *id == customer_id,
            RecordScope::Staff(id) => *id == staff_id,
            RecordScope::Salons(ids) => ids.contains(&salon_id),
            RecordScope::Nothing => false,
        }
    }

    /// Merge caller filters into this scope.
    ///
    /// A salon filter under a salon scope is intersected with the owned set;
    /// a salon outside the set leaves nothing visible.
    pub fn apply<S>(self, base: RecordFilter<S>) -> ScopedFilter<S> {
        let (scope, salon_id) = match (self, base.salon_id) {
            (RecordScope::Salons(owned), Some(requested)) => {
                let scope = if owned.contains(&requested) {
                    RecordScope::Salons(vec![requested])
                } else {
                    RecordScope::Nothing
                };
                (scope, None)
            }
            (scope, salon_id) => (scope, salon_id),
        };

        ScopedFilter {
            scope,
            status: base.status,
            salon_id,
        }
    }
}

/// Filters a caller may pass to a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter<S> {
    pub status: Option<S>,
    pub salon_id: Option<Uuid>,
}

impl<S> Default for RecordFilter<S> {
    fn default() -> Self {
        Self {
            status: None,
            salon_id: None,
        }
    }
}

/// Caller filters narrowed by scope, ready to become a store query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedFilter<S> {
    pub scope: RecordScope,
    pub status: Option<S>,
    pub salon_id: Option<Uuid>,
}

impl<S> ScopedFilter<S> {
    pub fn matches_nothing(&self) -> bool {
        self.scope.is_nothing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(salon_id: Option<Uuid>) -> RecordFilter<&'static str> {
        RecordFilter {
            status: Some("PENDING"),
            salon_id,
        }
    }

    #[test]
    fn empty_salon_set_sees_nothing() {
        assert_eq!(RecordScope::salons(vec![]), RecordScope::Nothing);
    }

    #[test]
    fn owner_salon_filter_is_intersected() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let scoped = RecordScope::Salons(vec![a, b]).apply(filter(Some(b)));
        assert_eq!(scoped.scope, RecordScope::Salons(vec![b]));
        assert_eq!(scoped.salon_id, None);
        assert_eq!(scoped.status, Some("PENDING"));
    }

    #[test]
    fn owner_salon_filter_outside_set_matches_nothing() {
        let scoped = RecordScope::Salons(vec![Uuid::new_v4()]).apply(filter(Some(Uuid::new_v4())));
        assert!(scoped.matches_nothing());
    }

    #[test]
    fn owner_without_salon_filter_keeps_whole_set() {
        let owned = vec![Uuid::new_v4(), Uuid::new_v4()];
        let scoped = RecordScope::Salons(owned.clone()).apply(filter(None));
        assert_eq!(scoped.scope, RecordScope::Salons(owned));
    }

    #[test]
    fn customer_scope_keeps_salon_filter_alongside() {
        let (me, salon) = (Uuid::new_v4(), Uuid::new_v4());
        let scoped = RecordScope::Customer(me).apply(filter(Some(salon)));
        assert_eq!(scoped.scope, RecordScope::Customer(me));
        assert_eq!(scoped.salon_id, Some(salon));
    }

    #[test]
    fn covers_respects_each_variant() {
        let (c, s, salon) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        assert!(RecordScope::Unrestricted.covers(c, s, salon));
        assert!(RecordScope::Customer(c).covers(c, s, salon));
        assert!(!RecordScope::Customer(s).covers(c, s, salon));
        assert!(RecordScope::Staff(s).covers(c, s, salon));
        assert!(RecordScope::Salons(vec![salon]).covers(c, s, salon));
        assert!(!RecordScope::Nothing.covers(c, s, salon));
    }
}
