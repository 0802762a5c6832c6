//! Group collectors and their running aggregates.

use std::fmt;
use std::sync::Arc;

use plansmith_core::EntityView;

pub(crate) type ValueFn = Arc<dyn Fn(&EntityView<'_>) -> i64 + Send + Sync>;

/// What a group accumulates from each member.
#[derive(Clone)]
pub enum Collector {
    /// Each member contributes 1.
    Count,
    /// Each member contributes the extracted value.
    Sum(ValueFn),
}

impl Collector {
    pub fn count() -> Self {
        Collector::Count
    }

    pub fn sum<F>(f: F) -> Self
    where
        F: Fn(&EntityView<'_>) -> i64 + Send + Sync + 'static,
    {
        Collector::Sum(Arc::new(f))
    }

    #[inline]
    pub(crate) fn extract(&self, view: &EntityView<'_>) -> i64 {
        match self {
            Collector::Count => 1,
            Collector::Sum(f) => f(view),
        }
    }
}

impl fmt::Debug for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collector::Count => write!(f, "Count"),
            Collector::Sum(_) => write!(f, "Sum(..)"),
        }
    }
}

/// Running state of one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregate {
    /// Number of members.
    pub count: i64,
    /// Collected value: the member count for `Count`, the sum for `Sum`.
    pub value: i64,
}

impl Aggregate {
    #[inline]
    pub(crate) fn accumulate(&mut self, value: i64) {
        self.count += 1;
        self.value += value;
    }

    #[inline]
    pub(crate) fn retract(&mut self, value: i64) {
        self.count -= 1;
        self.value -= value;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count <= 0
    }
}
