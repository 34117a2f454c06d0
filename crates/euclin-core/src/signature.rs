//! Function signatures and the table of globally known functions.

use rustc_hash::FxHashMap;

use crate::function_hash::FunctionHash;
use crate::types::{TypeDefinition, write_method_descriptor};

/// A named, typed function argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Argument {
    /// Argument name, unique within its function.
    pub name: String,
    /// Declared type.
    pub ty: TypeDefinition,
}

impl Argument {
    /// Create a new argument.
    pub fn new(name: impl Into<String>, ty: TypeDefinition) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// The signature of a user-declared, standard-library or synthetic function.
///
/// Immutable once built. `pure` marks functions the compiler knows to be
/// side-effect-free; only those may appear in constant expressions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSignature {
    name: String,
    arguments: Vec<Argument>,
    return_type: TypeDefinition,
    owner: String,
    pure: bool,
}

impl FunctionSignature {
    /// Create an impure signature.
    pub fn new(
        name: impl Into<String>,
        arguments: Vec<Argument>,
        return_type: TypeDefinition,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            arguments,
            return_type,
            owner: owner.into(),
            pure: false,
        }
    }

    /// Mark this signature as pure (or not).
    pub fn with_pure(mut self, pure: bool) -> Self {
        self.pure = pure;
        self
    }

    /// Function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered argument list.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Declared return type.
    pub fn return_type(&self) -> &TypeDefinition {
        &self.return_type
    }

    /// Identifier of the module that owns the entry point.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Whether the function is known to be side-effect-free.
    pub fn is_pure(&self) -> bool {
        self.pure
    }

    /// Number of arguments.
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// The structural function type of this signature.
    pub fn to_type(&self) -> TypeDefinition {
        TypeDefinition::function(
            self.arguments.iter().map(|a| a.ty.clone()).collect(),
            self.return_type.clone(),
        )
    }

    /// Method descriptor, e.g. `(RR)Q` for `(Real, Real) -> RealPoint`.
    pub fn descriptor(&self) -> String {
        let params: Vec<TypeDefinition> = self.arguments.iter().map(|a| a.ty.clone()).collect();
        let mut out = String::new();
        write_method_descriptor(&params, &self.return_type, &mut out);
        out
    }

    /// Deterministic identity of this signature's entry point.
    pub fn hash(&self) -> FunctionHash {
        FunctionHash::from_entry_point(&self.owner, &self.name, &self.descriptor())
    }
}

/// Every function visible to a compilation unit, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: FxHashMap<String, FunctionSignature>,
}

impl FunctionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a signature, returning the one it replaced.
    pub fn insert(&mut self, signature: FunctionSignature) -> Option<FunctionSignature> {
        self.functions.insert(signature.name().to_string(), signature)
    }

    /// Look up a function by name.
    pub fn get(&self, name: &str) -> Option<&FunctionSignature> {
        self.functions.get(name)
    }

    /// Whether a function with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Number of functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Iterate over all signatures in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.functions.values()
    }
}

impl FromIterator<FunctionSignature> for FunctionTable {
    fn from_iter<I: IntoIterator<Item = FunctionSignature>>(iter: I) -> Self {
        let mut table = FunctionTable::new();
        for signature in iter {
            table.insert(signature);
        }
        table
    }
}
