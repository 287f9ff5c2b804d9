//! Zero-value contract
//!
//! A value is *zero* when every field is at its type default: empty string,
//! `0`, `false`, absent optional, empty collection. Records implement
//! [`IsZero`] field by field; there is no runtime introspection.
//!
//! Note that `Some("")` is **not** zero: a present optional is a value the
//! author wrote, even when it is empty.

use std::collections::BTreeMap;

/// Types that know their own zero value
pub trait IsZero {
    fn is_zero(&self) -> bool;
}

impl IsZero for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl IsZero for bool {
    fn is_zero(&self) -> bool {
        !*self
    }
}

impl IsZero for i32 {
    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl IsZero for i64 {
    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl<T> IsZero for Option<T> {
    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl<T> IsZero for Vec<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> IsZero for BTreeMap<K, V> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

/// Implement [`IsZero`] for a record by requiring every listed field to be zero
macro_rules! impl_is_zero {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::zero::IsZero for $ty {
            fn is_zero(&self) -> bool {
                $($crate::zero::IsZero::is_zero(&self.$field))&&+
            }
        }
    };
}

pub(crate) use impl_is_zero;

/// Drop zero-valued elements from a sparse list, in place
///
/// An absent list stays absent. A list left empty stays `Some(vec![])`;
/// collapsing it to `None` is a separate step.
pub fn compact_sparse_list<T: IsZero>(list: &mut Option<Vec<T>>) {
    if let Some(items) = list {
        items.retain(|e| !e.is_zero());
    }
}

/// Serde helper: skip zero scalars on encode
pub(crate) fn is_zero<T: IsZero>(value: &T) -> bool {
    value.is_zero()
}
