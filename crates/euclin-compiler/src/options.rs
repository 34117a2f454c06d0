//! Compiler configuration.

/// Default ceiling on expression and compilation nesting.
pub const DEFAULT_MAX_NESTING_DEPTH: u32 = 256;

/// Options for one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Identifier of the output module; owner of every synthetic function.
    pub owner: String,
    /// Maximum nesting of expressions, promotion wrappers and lambda bodies.
    pub max_nesting_depth: u32,
    /// Emit line annotations, parameter records and local ranges.
    pub emit_debug_info: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            owner: "Main".to_string(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            emit_debug_info: true,
        }
    }
}

impl CompilerOptions {
    /// Set the owning module identifier.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Set the nesting ceiling.
    pub fn with_max_nesting_depth(mut self, depth: u32) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Enable or disable debug metadata.
    pub fn with_debug_info(mut self, enabled: bool) -> Self {
        self.emit_debug_info = enabled;
        self
    }
}
