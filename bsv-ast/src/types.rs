#![forbid(unsafe_code)]

use std::fmt;
use std::rc::Rc;

/// Shared, immutable handle to a type expression.
pub type TypeRef = Rc<BsvType>;

/// A BSV type expression: `Name#(p0, p1, ...)`.
///
/// Type variables (`is_var`) stand for unbound types during inference and are
/// never valid solver constructor names. Numeric-kind types (`is_numeric`) carry
/// their value in `name` (e.g. `32` in `Bit#(32)`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BsvType {
    pub name: String,
    pub params: Vec<TypeRef>,
    pub is_var: bool,
    pub is_numeric: bool,
}

impl BsvType {
    pub fn named(name: impl Into<String>) -> TypeRef {
        Self::applied(name, Vec::new())
    }

    pub fn applied(name: impl Into<String>, params: Vec<TypeRef>) -> TypeRef {
        Rc::new(BsvType {
            name: name.into(),
            params,
            is_var: false,
            is_numeric: false,
        })
    }

    pub fn var(name: impl Into<String>) -> TypeRef {
        Rc::new(BsvType {
            name: name.into(),
            params: Vec::new(),
            is_var: true,
            is_numeric: false,
        })
    }

    pub fn numeric(value: u64) -> TypeRef {
        Rc::new(BsvType {
            name: value.to_string(),
            params: Vec::new(),
            is_var: false,
            is_numeric: true,
        })
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Value of a numeric-kind type, if it is a literal.
    pub fn numeric_value(&self) -> Option<u64> {
        if self.is_numeric {
            self.name.parse().ok()
        } else {
            None
        }
    }
}

impl fmt::Display for BsvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.params.is_empty() {
            f.write_str("#(")?;
            for (i, p) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{p}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_equality_recurses_into_params() {
        let a = BsvType::applied("Int", vec![BsvType::numeric(32)]);
        let b = BsvType::applied("Int", vec![BsvType::numeric(32)]);
        let c = BsvType::applied("Int", vec![BsvType::numeric(16)]);
        assert_eq!(a, b);
        assert!(!Rc::ptr_eq(&a, &b));
        assert_ne!(a, c);
    }

    #[test]
    fn display_uses_hash_paren_syntax() {
        let t = BsvType::applied(
            "Vector",
            vec![BsvType::numeric(4), BsvType::applied("Bit", vec![BsvType::numeric(8)])],
        );
        assert_eq!(t.to_string(), "Vector#(4, Bit#(8))");
        assert_eq!(BsvType::named("Bool").to_string(), "Bool");
    }

    #[test]
    fn numeric_value_only_for_numeric_kind() {
        assert_eq!(BsvType::numeric(7).numeric_value(), Some(7));
        assert_eq!(BsvType::named("7").numeric_value(), None);
        assert_eq!(BsvType::var("n").numeric_value(), None);
    }
}
