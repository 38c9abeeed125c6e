use chrono::{DateTime, Utc};

/// Soft-delete state of a record, backed by a nullable `deleted_at` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Active,
    Deleted { at: DateTime<Utc> },
}

impl Lifecycle {
    pub fn from_deleted_at(deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            Some(at) => Lifecycle::Deleted { at },
            None => Lifecycle::Active,
        }
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Lifecycle::Active => None,
            Lifecycle::Deleted { at } => Some(*at),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_timestamp_is_active() {
        assert!(Lifecycle::from_deleted_at(None).is_active());
        let now = Utc::now();
        let deleted = Lifecycle::from_deleted_at(Some(now));
        assert!(!deleted.is_active());
        assert_eq!(deleted.deleted_at(), Some(now));
    }
}
