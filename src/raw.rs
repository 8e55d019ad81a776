use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A per-element value produced by a stylizer's transform phase. "Null" is
/// expressed as `Option<RawValue>` at the call sites, never as a variant.
///
/// `RawValue` carries a canonical total order so that distinct observed
/// values can be sorted deterministically before they are zipped against a
/// generated palette: booleans sort first, then numbers, then strings.
/// `Int` and `Float` compare numerically and are equal when they denote the
/// same number, mirroring how a dynamic value set would deduplicate them.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl RawValue {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(x) => *x != 0.0,
            Self::Str(s) => !s.is_empty(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Int(_) | Self::Float(_) => 1,
            Self::Str(_) => 2,
        }
    }
}

impl PartialEq for RawValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RawValue {}

impl PartialOrd for RawValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RawValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            (a, b) if a.rank() == b.rank() => {
                // Mixed Int/Float: compare numerically. total_cmp keeps the
                // order total even for NaN.
                let x = a.as_f64().unwrap_or(f64::NAN);
                let y = b.as_f64().unwrap_or(f64::NAN);
                x.total_cmp(&y)
            }
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl Hash for RawValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Bool(b) => b.hash(state),
            Self::Str(s) => s.hash(state),
            // Integer-valued floats must hash like the matching Int.
            Self::Int(n) => n.hash(state),
            Self::Float(x) => {
                if x.fract() == 0.0 && (i64::MIN as f64..=i64::MAX as f64).contains(x) {
                    (*x as i64).hash(state);
                } else {
                    x.to_bits().hash(state);
                }
            }
        }
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<f64> for RawValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn int_and_float_with_same_value_are_equal() {
        assert_eq!(RawValue::Int(1), RawValue::Float(1.0));
        assert_ne!(RawValue::Int(1), RawValue::Float(1.5));
    }

    #[test]
    fn canonical_order_is_bool_number_string() {
        let mut set = BTreeSet::new();
        set.insert(RawValue::from("b"));
        set.insert(RawValue::from(2i64));
        set.insert(RawValue::from(true));
        set.insert(RawValue::from("a"));
        set.insert(RawValue::from(1.5));

        let sorted: Vec<_> = set.into_iter().collect();
        assert_eq!(
            sorted,
            vec![
                RawValue::Bool(true),
                RawValue::Float(1.5),
                RawValue::Int(2),
                RawValue::Str("a".into()),
                RawValue::Str("b".into()),
            ]
        );
    }

    #[test]
    fn set_deduplicates_numeric_twins() {
        let mut set = BTreeSet::new();
        set.insert(RawValue::Int(1));
        set.insert(RawValue::Float(1.0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn truthiness_follows_value_emptiness() {
        assert!(RawValue::from(true).as_bool());
        assert!(!RawValue::from(0i64).as_bool());
        assert!(RawValue::from(0.5).as_bool());
        assert!(!RawValue::from("").as_bool());
        assert!(RawValue::from("x").as_bool());
    }

    #[test]
    fn serializes_untagged() {
        assert_eq!(serde_json::to_string(&RawValue::Int(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&RawValue::Str("a".into())).unwrap(),
            "\"a\""
        );
    }
}
