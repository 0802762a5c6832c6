//! Constraint identity and impact direction.

/// Reference to a constraint for identification.
///
/// # Example
///
/// ```
/// use plansmith_core::ConstraintRef;
///
/// let cr = ConstraintRef::new("knapsack", "Max weight");
/// assert_eq!(cr.full_name(), "knapsack/Max weight");
///
/// let bare = ConstraintRef::new("", "Maximize value");
/// assert_eq!(bare.full_name(), "Maximize value");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstraintRef {
    /// Package grouping related constraints; may be empty.
    pub package: String,
    /// Name of the constraint.
    pub name: String,
}

impl ConstraintRef {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Returns `package/name`, or just the name when the package is empty.
    pub fn full_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.package, self.name)
        }
    }
}

/// Direction in which a constraint moves the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImpactType {
    /// Subtract `weight * measure` from the score.
    Penalty,
    /// Add `weight * measure` to the score.
    Reward,
}

impl ImpactType {
    /// Returns +1 for rewards and -1 for penalties.
    #[inline]
    pub const fn sign(self) -> i64 {
        match self {
            ImpactType::Penalty => -1,
            ImpactType::Reward => 1,
        }
    }
}
