//! Comparators shared by every ordered container in this crate.
//!
//! A [`Comparator`] imposes a total order on values of some type. Returning
//! [`Ordering::Less`] means the first argument sorts before the second. Containers store
//! comparators behind an `Rc` so `map`, `filter` and `clone` can hand the same ordering to
//! the lists they build.
//!
//! # Examples
//!
//! ```
//! use classic_ds::compare;
//! use classic_ds::{AvlSortedList, SortedList};
//!
//! struct Reading {
//!     value: i32,
//!     label: &'static str,
//! }
//!
//! let mut list = AvlSortedList::new(compare::by_key(|r: &Reading| r.value, compare::natural()));
//! list.add(Reading { value: 12, label: "something" });
//! list.add(Reading { value: -1, label: "else" });
//!
//! // Look an item up by its key alone.
//! let found = list.find_by(|r| r.value.cmp(&12)).map(|r| r.label);
//! assert_eq!(found, Some("something"));
//! ```

use std::cmp::Ordering;
use std::rc::Rc;
use std::time::SystemTime;

/// A shared total-order function.
pub type Comparator<T> = Rc<dyn Fn(&T, &T) -> Ordering>;

/// Something that knows how to order itself against another value of the same type.
pub trait Comparable {
    /// Compares `self` with `other`.
    fn compare_to(&self, other: &Self) -> Ordering;
}

/// Wraps a closure as a [`Comparator`].
pub fn from_fn<T, F>(compare: F) -> Comparator<T>
where
    F: Fn(&T, &T) -> Ordering + 'static,
{
    Rc::new(compare)
}

/// Orders values by their [`Ord`] implementation.
pub fn natural<T: Ord>() -> Comparator<T> {
    Rc::new(|a: &T, b: &T| a.cmp(b))
}

/// Orders numbers in nondecreasing order. Incomparable values (`NaN`) are treated as equal.
pub fn numbers<T: PartialOrd>() -> Comparator<T> {
    Rc::new(|a: &T, b: &T| a.partial_cmp(b).unwrap_or(Ordering::Equal))
}

/// Orders strings the way a reader would: case-insensitively first, then by code point so
/// that distinct strings never compare equal.
pub fn strings<S: AsRef<str>>() -> Comparator<S> {
    Rc::new(|a: &S, b: &S| {
        let (a, b) = (a.as_ref(), b.as_ref());
        a.chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase))
            .then_with(|| a.cmp(b))
    })
}

/// Orders timestamps from earliest to latest.
pub fn timestamps() -> Comparator<SystemTime> {
    natural()
}

/// Orders values through their [`Comparable`] implementation.
pub fn comparable<T: Comparable>() -> Comparator<T> {
    Rc::new(|a: &T, b: &T| a.compare_to(b))
}

/// Orders values by a key extracted from them, compared with `compare`.
pub fn by_key<T, K, F>(key: F, compare: Comparator<K>) -> Comparator<T>
where
    F: Fn(&T) -> K + 'static,
    K: 'static,
{
    Rc::new(move |a: &T, b: &T| compare(&key(a), &key(b)))
}

/// Reverses an ordering.
pub fn reversed<T: 'static>(compare: Comparator<T>) -> Comparator<T> {
    Rc::new(move |a: &T, b: &T| compare(b, a))
}
