//! Pluggable equality for state and trigger identifiers.
//!
//! The machine never compares identifiers directly; every lookup goes through
//! an [`EqualityPolicy`], so hosts can use identifier types with non-standard
//! notions of identity (case-insensitive names, version-tolerant ids, ...)
//! without wrapping them.

/// Equality strategy for a single identifier type.
///
/// # Example
///
/// ```rust
/// use cogwheel::core::EqualityPolicy;
///
/// struct CaseInsensitive;
///
/// impl EqualityPolicy<String> for CaseInsensitive {
///     fn equivalent(&self, a: &String, b: &String) -> bool {
///         a.eq_ignore_ascii_case(b)
///     }
/// }
///
/// assert!(CaseInsensitive.equivalent(&"Open".to_string(), &"OPEN".to_string()));
/// ```
pub trait EqualityPolicy<V> {
    /// Whether the two identifiers denote the same state or trigger.
    fn equivalent(&self, a: &V, b: &V) -> bool;
}

/// Default policy: the identifier type's own `PartialEq`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalEquality;

impl<V: PartialEq> EqualityPolicy<V> for NaturalEquality {
    fn equivalent(&self, a: &V, b: &V) -> bool {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_equality_delegates_to_partial_eq() {
        assert!(NaturalEquality.equivalent(&3u32, &3u32));
        assert!(!NaturalEquality.equivalent(&3u32, &4u32));
    }

    struct CaseInsensitive;

    impl EqualityPolicy<&'static str> for CaseInsensitive {
        fn equivalent(&self, a: &&'static str, b: &&'static str) -> bool {
            a.eq_ignore_ascii_case(b)
        }
    }

    #[test]
    fn custom_policy_overrides_identity() {
        assert!(CaseInsensitive.equivalent(&"idle", &"IDLE"));
        assert!(!NaturalEquality.equivalent(&"idle", &"IDLE"));
    }
}
