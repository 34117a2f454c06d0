//! CompilationUnit - state shared by every compiler instance of one block.
//!
//! The unit owns the entry-point registry and the synthetic-name counter,
//! and borrows the function table and options. It is threaded as `&mut`
//! through the lambda hoister and every (nested) function compiler; all
//! writes are sequential because compilation is.

use euclin_core::{FunctionSignature, FunctionTable};
use rustc_hash::FxHashMap;

use crate::module::EntryPoints;
use crate::options::CompilerOptions;

/// Shared state of one compilation unit.
pub struct CompilationUnit<'u> {
    functions: &'u FunctionTable,
    options: &'u CompilerOptions,
    entries: EntryPoints,
    /// Shared by hoisted lambdas and constant wrappers.
    next_synthetic_id: u32,
    /// Constant wrappers keyed by expected type descriptor and expression text.
    constant_wrappers: FxHashMap<String, FunctionSignature>,
}

impl<'u> CompilationUnit<'u> {
    /// Create a unit over the visible functions.
    pub fn new(functions: &'u FunctionTable, options: &'u CompilerOptions) -> Self {
        Self {
            functions,
            options,
            entries: EntryPoints::new(),
            next_synthetic_id: 0,
            constant_wrappers: FxHashMap::default(),
        }
    }

    /// Every function visible to this unit.
    pub fn functions(&self) -> &'u FunctionTable {
        self.functions
    }

    /// Options of this unit.
    pub fn options(&self) -> &'u CompilerOptions {
        self.options
    }

    /// Identifier of the output module.
    pub fn owner(&self) -> &'u str {
        &self.options.owner
    }

    /// Registered entry points.
    pub fn entries(&self) -> &EntryPoints {
        &self.entries
    }

    /// Registered entry points, mutably.
    pub fn entries_mut(&mut self) -> &mut EntryPoints {
        &mut self.entries
    }

    /// Allocate the next synthetic function number.
    pub fn next_synthetic_id(&mut self) -> u32 {
        let id = self.next_synthetic_id;
        self.next_synthetic_id += 1;
        id
    }

    /// A previously synthesized constant wrapper.
    pub fn constant_wrapper(&self, key: &str) -> Option<&FunctionSignature> {
        self.constant_wrappers.get(key)
    }

    /// Remember a compiled constant wrapper.
    pub fn remember_constant_wrapper(&mut self, key: String, signature: FunctionSignature) {
        self.constant_wrappers.insert(key, signature);
    }

    /// Give up the unit, keeping its entry points.
    pub fn into_entries(self) -> EntryPoints {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclin_core::TypeDefinition;

    #[test]
    fn synthetic_ids_are_sequential() {
        let functions = FunctionTable::new();
        let options = CompilerOptions::default();
        let mut unit = CompilationUnit::new(&functions, &options);

        assert_eq!(unit.next_synthetic_id(), 0);
        assert_eq!(unit.next_synthetic_id(), 1);
        assert_eq!(unit.owner(), "Main");
    }

    #[test]
    fn wrapper_cache() {
        let functions = FunctionTable::new();
        let options = CompilerOptions::default();
        let mut unit = CompilationUnit::new(&functions, &options);
        let sig = FunctionSignature::new("_lambda_0$constant", vec![], TypeDefinition::Real, "Main");

        assert!(unit.constant_wrapper("F(R)R:1.0").is_none());
        unit.remember_constant_wrapper("F(R)R:1.0".to_string(), sig.clone());
        assert_eq!(unit.constant_wrapper("F(R)R:1.0"), Some(&sig));
    }
}
