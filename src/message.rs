//! Message keys, translation seam, and deferred message bundles.
//!
//! The pipeline never hardcodes user-facing text. Everything it sends is
//! either a usage string or a [`Translatable`]: a well-known message key
//! plus named parameters, rendered through the host's [`Translator`].

/// Well-known message keys supplied by the dispatch pipeline and parameter
/// validation. Hosts map these to their own string tables.
pub mod keys {
    /// Sent when the sender fails a node's permission test and the node has
    /// no message override. Parameters: `permission`.
    pub const PERMISSION_DENIED: &str = "command.permission-denied";
    /// Sent when a token prefix-matches more than eight children.
    /// Parameters: `token`.
    pub const TOO_AMBIGUOUS: &str = "command.too-ambiguous";
    /// Sent when a token matches no child. Parameters: `token`.
    pub const CHILD_NONE: &str = "command.child-none";
    /// Header line above a suggestion list. Parameters: `token`.
    pub const SUGGESTION_HEADER: &str = "command.suggestion-header";
    /// One line per suggested child. Parameters: `name`, `usage`,
    /// `description`.
    pub const SUGGESTION: &str = "command.suggestion";

    /// String parameter rejection. Parameters: `sender`, `value`, `n`.
    pub const TYPE_STRING_ERROR: &str = "parameter.type-string-error";
    /// Integer parameter rejection. Parameters: `sender`, `value`, `n`.
    pub const TYPE_INTEGER_ERROR: &str = "parameter.type-integer-error";
    /// Float parameter rejection. Parameters: `sender`, `value`, `n`.
    pub const TYPE_FLOAT_ERROR: &str = "parameter.type-float-error";
    /// Boolean parameter rejection. Parameters: `sender`, `value`, `n`.
    pub const TYPE_BOOLEAN_ERROR: &str = "parameter.type-boolean-error";
    /// Null parameter rejection. Parameters: `sender`, `value`, `n`.
    pub const TYPE_NULL_ERROR: &str = "parameter.type-null-error";
    /// Fallback for parameter kinds outside the built-in type table.
    /// Parameters: `sender`, `value`, `n`.
    pub const GENERIC_ERROR: &str = "argument.generic-error";
}

/// Turns a message key and its named parameters into displayable text.
///
/// Implemented by the host; [`KeyTranslator`] is a minimal stand-in for
/// hosts without a string table.
pub trait Translator {
    /// Renders `key` with the given named parameters.
    fn translate(&self, key: &str, params: &[(String, String)]) -> String;
}

/// A message key plus named parameters, built where the failure is detected
/// and rendered where the translator is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translatable {
    key: String,
    params: Vec<(String, String)>,
}

impl Translatable {
    /// Creates a bundle for `key` with no parameters.
    pub fn new(key: impl Into<String>) -> Self {
        Translatable {
            key: key.into(),
            params: Vec::new(),
        }
    }

    /// Appends a named parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// The message key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The named parameters in insertion order.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Renders this bundle through the given translator.
    pub fn render(&self, translator: &dyn Translator) -> String {
        translator.translate(&self.key, &self.params)
    }
}

/// Fallback translator rendering the key followed by its parameters, e.g.
/// `command.child-none (token=xy)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyTranslator;

impl Translator for KeyTranslator {
    fn translate(&self, key: &str, params: &[(String, String)]) -> String {
        if params.is_empty() {
            return key.to_owned();
        }
        let rendered = params
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} ({})", key, rendered)
    }
}
