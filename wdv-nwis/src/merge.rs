//! Deep merge of normalized entities.
//!
//! Merging never removes data: fields absent from the incoming value keep
//! their stored contents, maps merge per key, and sequences merge element by
//! element. A sequence therefore never shrinks; callers that need a shorter
//! result must reset the affected entries first.

use std::collections::BTreeMap;

pub trait Merge {
    /// Fold `other` into `self`.
    fn merge(&mut self, other: Self);
}

macro_rules! merge_by_replace {
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::merge::Merge for $t {
                fn merge(&mut self, other: Self) {
                    *self = other;
                }
            }
        )*
    };
}

pub(crate) use merge_by_replace;

merge_by_replace!(bool, i32, i64, u32, u64, f64, String);

/// Implement [`Merge`] for a struct by merging each listed field.
macro_rules! merge_fields {
    ($t:ty { $($field:ident),* $(,)? }) => {
        impl $crate::merge::Merge for $t {
            fn merge(&mut self, other: Self) {
                $( $crate::merge::Merge::merge(&mut self.$field, other.$field); )*
            }
        }
    };
}

pub(crate) use merge_fields;

impl<T: Merge> Merge for Option<T> {
    fn merge(&mut self, other: Self) {
        if let Some(incoming) = other {
            match self {
                Some(existing) => existing.merge(incoming),
                None => *self = Some(incoming),
            }
        }
    }
}

impl<T: Merge> Merge for Vec<T> {
    fn merge(&mut self, other: Self) {
        for (index, incoming) in other.into_iter().enumerate() {
            match self.get_mut(index) {
                Some(existing) => existing.merge(incoming),
                None => self.push(incoming),
            }
        }
    }
}

impl<T: Merge> Merge for BTreeMap<String, T> {
    fn merge(&mut self, other: Self) {
        for (key, incoming) in other {
            match self.get_mut(&key) {
                Some(existing) => existing.merge(incoming),
                None => {
                    self.insert(key, incoming);
                }
            }
        }
    }
}
