//! Code generation configuration

use sockidl_core::protocol::DEFAULT_MESSAGE_ID_BASE;

/// Default path of the runtime crate referenced by generated code.
pub const DEFAULT_RUNTIME_CRATE: &str = "sockidl_runtime";

/// Code generation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenConfig {
    /// First message id allocated for each interface
    pub message_id_base: u32,
    /// Path of the runtime crate in generated `use` items (e.g. `sockidl_runtime` or `crate::rt`)
    pub runtime_crate: String,
    /// Whether to prepend the `// Generated by ...` header
    pub emit_header: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            message_id_base: DEFAULT_MESSAGE_ID_BASE,
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            emit_header: true,
        }
    }
}

impl CodegenConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first message id
    pub fn with_message_id_base(mut self, base: u32) -> Self {
        self.message_id_base = base;
        self
    }

    /// Set the runtime crate path
    pub fn with_runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = path.into();
        self
    }

    /// Set whether to emit the version header
    pub fn with_header(mut self, emit: bool) -> Self {
        self.emit_header = emit;
        self
    }
}
