//! Typed, positioned parameter slots and their validation grammars.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::context::Sender;
use crate::message::{keys, Translatable, Translator};

lazy_static! {
    static ref NUMERIC: Regex =
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap();
    static ref INTEGER: Regex = Regex::new(r"^[+-]?\d+$").unwrap();
}

/// The primitive kinds a parameter can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
    /// Any text. Always valid.
    String,
    /// A whole number. Validated against a strict integer grammar: digits
    /// with an optional sign, no decimal point.
    Integer,
    /// A real number. The text must contain a literal decimal point and be
    /// otherwise numeric, so an integer-looking literal like `3` is
    /// rejected for this type.
    Float,
    /// Case-insensitive `1`/`true`/`yes`/`y` or `0`/`false`/`no`/`n`.
    Boolean,
    /// Never valid as input. A null slot is only ever filled by a default.
    Null,
}

impl ParameterType {
    /// Whether the raw text fits this type's grammar.
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            ParameterType::String => true,
            ParameterType::Integer => INTEGER.is_match(raw),
            ParameterType::Float => raw.contains('.') && NUMERIC.is_match(raw),
            ParameterType::Boolean => matches!(
                raw.to_lowercase().as_str(),
                "1" | "true" | "yes" | "y" | "0" | "false" | "no" | "n"
            ),
            ParameterType::Null => false,
        }
    }

    /// The message key used when text is rejected for this type.
    pub fn error_key(&self) -> &'static str {
        match self {
            ParameterType::String => keys::TYPE_STRING_ERROR,
            ParameterType::Integer => keys::TYPE_INTEGER_ERROR,
            ParameterType::Float => keys::TYPE_FLOAT_ERROR,
            ParameterType::Boolean => keys::TYPE_BOOLEAN_ERROR,
            ParameterType::Null => keys::TYPE_NULL_ERROR,
        }
    }
}

/// A value produced by a successful [`Parameter::read`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text, bound as-is.
    Str(String),
    /// A parsed integer.
    Int(i64),
    /// A parsed float.
    Float(f64),
    /// A parsed boolean.
    Bool(bool),
}

impl Value {
    /// The text form, when this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer, when this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The float, when this is a float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The boolean, when this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// A typed, positioned slot of a command.
///
/// Whether a parameter is required is always derived from its default:
/// required if and only if no default is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    ty: ParameterType,
    index: usize,
    default: Option<String>,
}

impl Parameter {
    /// Creates a required parameter. The positional index is assigned when
    /// the parameter is added to a node.
    pub fn new(name: impl Into<String>, ty: ParameterType) -> Self {
        Parameter {
            name: name.into(),
            ty,
            index: 0,
            default: None,
        }
    }

    /// Sets a default raw value, making the parameter optional. The default
    /// goes through the same `read` validation as user input when bound.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// The parameter name as shown in usage templates.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    pub fn ty(&self) -> ParameterType {
        self.ty
    }

    /// The position within the owning node's parameter sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// The default raw value, if one is set.
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Whether a default is set.
    pub fn is_default_set(&self) -> bool {
        self.default.is_some()
    }

    /// Required means no default, nothing else.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Renders the usage template: `<name>` when required, `[name]` or
    /// `[name=default]` when optional.
    pub fn template(&self) -> String {
        let mut out = self.name.clone();
        if let Some(default) = &self.default {
            if !default.is_empty() {
                out.push('=');
                out.push_str(default);
            }
        }
        if self.is_required() {
            format!("<{}>", out)
        } else {
            format!("[{}]", out)
        }
    }

    /// Builds the rejection message for `value`, keyed by the declared type
    /// and carrying the sender's display label, the offending text, and the
    /// 1-based position.
    pub fn error_message(&self, sender: &dyn Sender, value: &str) -> Translatable {
        Translatable::new(self.ty.error_key())
            .with("sender", sender.display_name())
            .with("value", value)
            .with("n", (self.index + 1).to_string())
    }

    /// Validates and coerces raw text into a typed [`Value`].
    ///
    /// On rejection the typed error message is sent through `sender`, or
    /// suppressed entirely when `sender` is `None` (silent mode), and the
    /// result is `None`.
    pub fn read(
        &self,
        raw: &str,
        sender: Option<&dyn Sender>,
        translator: &dyn Translator,
    ) -> Option<Value> {
        let value = if self.ty.accepts(raw) {
            match self.ty {
                ParameterType::String => Some(Value::Str(raw.to_owned())),
                // The grammar admits magnitudes the machine types cannot
                // hold, so parse failures reject like any other bad input.
                ParameterType::Integer => raw.parse::<i64>().ok().map(Value::Int),
                ParameterType::Float => raw.parse::<f64>().ok().map(Value::Float),
                ParameterType::Boolean => Some(Value::Bool(matches!(
                    raw.to_lowercase().as_str(),
                    "1" | "true" | "yes" | "y"
                ))),
                ParameterType::Null => None,
            }
        } else {
            None
        };

        if value.is_none() {
            if let Some(sender) = sender {
                let message = self.error_message(sender, raw).render(translator);
                sender.send_message(&message);
            }
        }
        value
    }
}
