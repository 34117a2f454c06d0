//! The output module: entry points, their bytecode, and the constant pool.
//!
//! Entry points are registered ([`EntryPoints::declare`]) before their body
//! is compiled, so that recursive references and nested compilations see
//! them, and receive their bytecode ([`EntryPoints::define`]) once the body
//! compiled cleanly. A body that fails is [`abandoned`](EntryPoints::abandon),
//! which removes the declaration: the module never holds partial code.
//!
//! During compilation the constant pool and the entry points are borrowed
//! separately (the emitter of the function being compiled holds the pool),
//! and joined into an [`OutputModule`] once the block is done.

use bitflags::bitflags;
use euclin_core::{CompilationError, FunctionHash, FunctionSignature, Result, Span};
use rustc_hash::FxHashMap;

use crate::bytecode::{BytecodeChunk, ConstantPool};

bitflags! {
    /// Access and origin flags of an entry point.
    ///
    /// User functions are `PUBLIC | STATIC`; hoisted lambdas and constant
    /// wrappers additionally carry `FINAL | SYNTHETIC`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FunctionFlags: u8 {
        /// Visible outside the module.
        const PUBLIC = 1 << 0;
        /// No receiver.
        const STATIC = 1 << 1;
        /// Cannot be overridden.
        const FINAL = 1 << 2;
        /// Generated by the compiler, not written by the user.
        const SYNTHETIC = 1 << 3;
    }
}

impl FunctionFlags {
    /// Flags of a user-declared function.
    pub fn user() -> Self {
        FunctionFlags::PUBLIC | FunctionFlags::STATIC
    }

    /// Flags of a compiler-generated function.
    pub fn synthetic() -> Self {
        FunctionFlags::PUBLIC | FunctionFlags::STATIC | FunctionFlags::FINAL | FunctionFlags::SYNTHETIC
    }
}

/// A registered entry point.
#[derive(Debug, Clone)]
pub struct CompiledFunction {
    /// Signature the entry point was registered with.
    pub signature: FunctionSignature,
    /// Method descriptor, e.g. `(R)R`.
    pub descriptor: String,
    /// Deterministic identity.
    pub hash: FunctionHash,
    /// Access and origin flags.
    pub flags: FunctionFlags,
    /// Compiled body; `None` while the body is being compiled.
    pub bytecode: Option<BytecodeChunk>,
}

impl CompiledFunction {
    /// Entry-point name.
    pub fn name(&self) -> &str {
        self.signature.name()
    }

    /// Whether the body has been defined.
    pub fn is_defined(&self) -> bool {
        self.bytecode.is_some()
    }

    /// Whether the compiler generated this function.
    pub fn is_synthetic(&self) -> bool {
        self.flags.contains(FunctionFlags::SYNTHETIC)
    }
}

/// Registered entry points, in registration order.
#[derive(Debug, Clone, Default)]
pub struct EntryPoints {
    functions: Vec<CompiledFunction>,
    index: FxHashMap<String, usize>,
}

impl EntryPoints {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry point for `signature`.
    ///
    /// Fails with `DuplicateFunction` if the name is already registered.
    pub fn declare(
        &mut self,
        signature: &FunctionSignature,
        flags: FunctionFlags,
        span: Span,
    ) -> Result<FunctionHash> {
        if self.index.contains_key(signature.name()) {
            return Err(CompilationError::DuplicateFunction {
                name: signature.name().to_string(),
                span,
            });
        }

        let hash = signature.hash();
        log::trace!(
            "declaring entry point {}{} ({})",
            signature.name(),
            signature.descriptor(),
            hash
        );
        self.index
            .insert(signature.name().to_string(), self.functions.len());
        self.functions.push(CompiledFunction {
            signature: signature.clone(),
            descriptor: signature.descriptor(),
            hash,
            flags,
            bytecode: None,
        });
        Ok(hash)
    }

    /// Attach the compiled body of a declared entry point.
    pub fn define(&mut self, name: &str, bytecode: BytecodeChunk, span: Span) -> Result<()> {
        let entry = self
            .index
            .get(name)
            .and_then(|&i| self.functions.get_mut(i))
            .ok_or_else(|| {
                CompilationError::internal("defining an undeclared entry point", name, span)
            })?;

        if entry.bytecode.is_some() {
            return Err(CompilationError::internal(
                "entry point defined twice",
                name,
                span,
            ));
        }

        log::trace!("defined {} ({} bytes)", name, bytecode.len());
        entry.bytecode = Some(bytecode);
        Ok(())
    }

    /// Drop a declaration whose body failed to compile.
    ///
    /// Defined entry points are left untouched.
    pub fn abandon(&mut self, name: &str) {
        let Some(&position) = self.index.get(name) else {
            return;
        };
        if self.functions[position].is_defined() {
            return;
        }

        self.functions.remove(position);
        self.index.remove(name);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
    }

    /// Look up an entry point by name.
    pub fn get(&self, name: &str) -> Option<&CompiledFunction> {
        self.index.get(name).and_then(|&i| self.functions.get(i))
    }

    /// Whether an entry point with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of registered entry points.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Iterate in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledFunction> {
        self.functions.iter()
    }
}

/// A compiled module.
#[derive(Debug, Clone, Default)]
pub struct OutputModule {
    name: String,
    constants: ConstantPool,
    entries: EntryPoints,
}

impl OutputModule {
    /// Join a constant pool and its entry points into a module.
    pub fn new(name: impl Into<String>, constants: ConstantPool, entries: EntryPoints) -> Self {
        Self {
            name: name.into(),
            constants,
            entries,
        }
    }

    /// Module identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module-level constant pool.
    pub fn constants(&self) -> &ConstantPool {
        &self.constants
    }

    /// Look up a function by name.
    pub fn function(&self, name: &str) -> Option<&CompiledFunction> {
        self.entries.get(name)
    }

    /// Bytecode of a defined function.
    pub fn bytecode(&self, name: &str) -> Option<&BytecodeChunk> {
        self.function(name).and_then(|f| f.bytecode.as_ref())
    }

    /// All functions, in registration order.
    pub fn functions(&self) -> impl Iterator<Item = &CompiledFunction> {
        self.entries.iter()
    }

    /// Compiler-generated functions, in registration order.
    pub fn synthetic_functions(&self) -> impl Iterator<Item = &CompiledFunction> {
        self.entries.iter().filter(|f| f.is_synthetic())
    }

    /// Number of functions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the module has no functions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
