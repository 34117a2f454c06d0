//! Local slot table for function compilation.
//!
//! Euclin functions have no local declarations: the only locals are the
//! arguments, each assigned one slot in declaration order during the
//! prologue. The table is read-only once the body starts compiling.

use euclin_core::{CompilationError, Result, Span, TypeDefinition};
use rustc_hash::FxHashMap;

/// Information about a local variable.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVar {
    /// Variable name
    pub name: String,
    /// Variable type
    pub ty: TypeDefinition,
    /// Slot index
    pub slot: u16,
}

/// Argument slots of the function being compiled.
#[derive(Debug, Default)]
pub struct LocalScope {
    /// Variables in slot order
    variables: Vec<LocalVar>,
    /// Name to position in `variables`
    index: FxHashMap<String, usize>,
}

impl LocalScope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next slot to an argument.
    ///
    /// `function` and `span` identify the declaring function for the
    /// `ArgumentRedeclaration` error.
    pub fn declare(
        &mut self,
        name: &str,
        ty: TypeDefinition,
        function: &str,
        span: Span,
    ) -> Result<u16> {
        if self.index.contains_key(name) {
            return Err(CompilationError::ArgumentRedeclaration {
                function: function.to_string(),
                name: name.to_string(),
                span,
            });
        }

        let slot = u16::try_from(self.variables.len()).map_err(|_| {
            CompilationError::internal("too many local slots", function, span)
        })?;

        self.index.insert(name.to_string(), self.variables.len());
        self.variables.push(LocalVar {
            name: name.to_string(),
            ty,
            slot,
        });
        Ok(slot)
    }

    /// Look up a local by name.
    pub fn get(&self, name: &str) -> Option<&LocalVar> {
        self.index.get(name).and_then(|&i| self.variables.get(i))
    }

    /// Locals in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &LocalVar> {
        self.variables.iter()
    }

    /// Number of slots in use.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether no slot is in use.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Frame size in slots.
    pub fn max_locals(&self) -> u16 {
        self.variables.len() as u16
    }
}
