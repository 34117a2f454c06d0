//! The Euclin type lattice.
//!
//! A small fixed set of value types with structural equality. Only two
//! compatibility predicates exist on top of equality:
//!
//! - [`TypeDefinition::accepts_discarding`]: `NoValue` swallows any value.
//! - [`TypeDefinition::accepts_assign`]: equal types, or a `NoValue` target.
//!
//! There is deliberately no numeric widening: `Integer` is not accepted where
//! `Real` is expected. Callers must not assume an ordering between unrelated
//! types.

use std::fmt;

/// A value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDefinition {
    /// Integer number.
    Integer,
    /// Real (floating point) number.
    Real,
    /// Boolean.
    Boolean,
    /// String.
    String,
    /// The unit type. Values of this type are the no-value singleton.
    NoValue,
    /// Pair of integers.
    IntegerPair,
    /// Pair of reals.
    RealPair,
    /// Function value.
    Function(FunctionType),
}

/// Structural type of a function value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    /// Parameter types, in order.
    pub params: Vec<TypeDefinition>,
    /// Return type.
    pub returns: Box<TypeDefinition>,
}

impl TypeDefinition {
    /// Build a function type.
    pub fn function(params: Vec<TypeDefinition>, returns: TypeDefinition) -> Self {
        TypeDefinition::Function(FunctionType {
            params,
            returns: Box::new(returns),
        })
    }

    /// Whether this is the unit type.
    pub fn is_no_value(&self) -> bool {
        matches!(self, TypeDefinition::NoValue)
    }

    /// The function type, if this is one.
    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            TypeDefinition::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Whether a value of type `actual` may be dropped where `self` is expected.
    ///
    /// True iff `self` is `NoValue`, whatever `actual` is.
    pub fn accepts_discarding(&self, _actual: &TypeDefinition) -> bool {
        self.is_no_value()
    }

    /// Whether a value of type `actual` may be stored where `self` is expected.
    ///
    /// True iff the types are equal or `self` is `NoValue`.
    pub fn accepts_assign(&self, actual: &TypeDefinition) -> bool {
        self == actual || self.accepts_discarding(actual)
    }

    /// Compact descriptor used for entry-point registration.
    ///
    /// `Integer` = `I`, `Real` = `R`, `Boolean` = `Z`, `String` = `S`,
    /// `NoValue` = `V`, `IntegerPair` = `P`, `RealPair` = `Q`, and functions
    /// are `F(<params>)<ret>`.
    pub fn descriptor(&self) -> String {
        let mut out = String::new();
        self.write_descriptor(&mut out);
        out
    }

    pub(crate) fn write_descriptor(&self, out: &mut String) {
        match self {
            TypeDefinition::Integer => out.push('I'),
            TypeDefinition::Real => out.push('R'),
            TypeDefinition::Boolean => out.push('Z'),
            TypeDefinition::String => out.push('S'),
            TypeDefinition::NoValue => out.push('V'),
            TypeDefinition::IntegerPair => out.push('P'),
            TypeDefinition::RealPair => out.push('Q'),
            TypeDefinition::Function(f) => {
                out.push('F');
                write_method_descriptor(&f.params, &f.returns, out);
            }
        }
    }
}

/// Write `(<params>)<ret>` into `out`.
pub(crate) fn write_method_descriptor(
    params: &[TypeDefinition],
    returns: &TypeDefinition,
    out: &mut String,
) {
    out.push('(');
    for param in params {
        param.write_descriptor(out);
    }
    out.push(')');
    returns.write_descriptor(out);
}

impl fmt::Display for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDefinition::Integer => write!(f, "Int"),
            TypeDefinition::Real => write!(f, "Real"),
            TypeDefinition::Boolean => write!(f, "Bool"),
            TypeDefinition::String => write!(f, "String"),
            TypeDefinition::NoValue => write!(f, "Unit"),
            TypeDefinition::IntegerPair => write!(f, "IntPoint"),
            TypeDefinition::RealPair => write!(f, "RealPoint"),
            TypeDefinition::Function(func) => write!(f, "{}", func),
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ") -> {}", self.returns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real_to_real() -> TypeDefinition {
        TypeDefinition::function(vec![TypeDefinition::Real], TypeDefinition::Real)
    }

    #[test]
    fn structural_equality() {
        assert_eq!(real_to_real(), real_to_real());
        assert_ne!(
            real_to_real(),
            TypeDefinition::function(vec![TypeDefinition::Real], TypeDefinition::Integer)
        );
        assert_ne!(TypeDefinition::IntegerPair, TypeDefinition::RealPair);
    }

    #[test]
    fn no_value_discards_anything() {
        let unit = TypeDefinition::NoValue;
        assert!(unit.accepts_discarding(&TypeDefinition::Integer));
        assert!(unit.accepts_discarding(&real_to_real()));
        assert!(!TypeDefinition::Real.accepts_discarding(&TypeDefinition::Real));
    }

    #[test]
    fn assign_requires_equality_or_no_value() {
        assert!(TypeDefinition::Real.accepts_assign(&TypeDefinition::Real));
        assert!(TypeDefinition::NoValue.accepts_assign(&TypeDefinition::String));
        assert!(real_to_real().accepts_assign(&real_to_real()));
    }

    // Integer/Real cross-compatibility is an unresolved corner of the type
    // system; this pins the current "no widening" behavior.
    #[test]
    fn no_numeric_widening() {
        assert!(!TypeDefinition::Real.accepts_assign(&TypeDefinition::Integer));
        assert!(!TypeDefinition::Integer.accepts_assign(&TypeDefinition::Real));
    }

    #[test]
    fn descriptors() {
        assert_eq!(TypeDefinition::Real.descriptor(), "R");
        assert_eq!(real_to_real().descriptor(), "F(R)R");
        assert_eq!(
            TypeDefinition::function(vec![real_to_real(), TypeDefinition::Integer], TypeDefinition::NoValue)
                .descriptor(),
            "F(F(R)RI)V"
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(TypeDefinition::NoValue.to_string(), "Unit");
        assert_eq!(TypeDefinition::RealPair.to_string(), "RealPoint");
        assert_eq!(
            TypeDefinition::function(vec![TypeDefinition::Real, TypeDefinition::Boolean], TypeDefinition::String)
                .to_string(),
            "(Real, Bool) -> String"
        );
    }
}
