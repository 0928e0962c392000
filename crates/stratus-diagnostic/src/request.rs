//! Input declarations.

use stratus_core::{FieldIdentifier, DEFAULT_PACK_SIZE};

/// An input a diagnostic needs, with the pack size it reads it at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldRequest {
    /// Identifier the supplied field must match exactly.
    pub identifier: FieldIdentifier,
    /// Pack width the diagnostic reads the field with.
    pub pack_size: usize,
    /// Whether `initialize` fails without it.
    pub required: bool,
}

impl FieldRequest {
    /// A required input at the default pack size.
    pub fn required(identifier: FieldIdentifier) -> Self {
        Self {
            identifier,
            pack_size: DEFAULT_PACK_SIZE,
            required: true,
        }
    }

    /// Same request with a different pack size.
    pub fn with_pack_size(mut self, pack_size: usize) -> Self {
        self.pack_size = pack_size;
        self
    }

    /// Name of the requested field.
    pub fn name(&self) -> &str {
        self.identifier.name()
    }
}
