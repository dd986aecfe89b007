#![warn(missing_docs)]

//! Runtime command trees with typed parameters, permission gating, and
//! prefix-based subcommand resolution.
//!
//! A [`CommandNode`] owns typed [`Parameter`]s, gating [`Requirement`]s,
//! and nested subcommands. [`CommandNode::execute`] resolves a raw token
//! stream into a fully bound invocation: permission and requirement
//! checks, arity validation, parameter binding, and recursive descent into
//! the single child a token resolves to. Per-invocation state lives
//! entirely on an [`InvocationContext`], so a registered tree is read-only
//! while serving.
//!
//! The host supplies two thin capabilities: a [`Sender`] (permission test,
//! message delivery, display name) and a [`Translator`] (message key +
//! named parameters to displayable text).
//!
//! ```
//! use arbor_commands::{node, InvocationContext, KeyTranslator, Parameter, ParameterType, Sender};
//!
//! struct Console;
//!
//! impl Sender for Console {
//!     fn test_permission(&self, _permission: &str) -> bool {
//!         true
//!     }
//!     fn send_message(&self, message: &str) {
//!         println!("{message}");
//!     }
//!     fn display_name(&self) -> String {
//!         "console".into()
//!     }
//! }
//!
//! let tp = node("tp")
//!     .parameter(Parameter::new("sub", ParameterType::String))
//!     .then(node("here").alias("h").executes(|_ctx| true))
//!     .build()
//!     .unwrap();
//!
//! let console = Console;
//! let mut ctx = InvocationContext::new(&console, &KeyTranslator, "tp", vec!["h".into()]);
//! assert!(tp.execute(&mut ctx));
//! assert_eq!(ctx.end_point().unwrap().name(), "here");
//! ```

mod builder;
mod context;
mod dispatch;
mod error;
mod message;
mod node;
mod parameter;
mod requirement;

pub use builder::{node, NodeBuilder};
pub use context::{InvocationContext, Sender};
pub use dispatch::Executable;
pub use error::{Failure, TreeError};
pub use message::{keys, KeyTranslator, Translatable, Translator};
pub use node::{Action, CasePolicy, CommandNode};
pub use parameter::{Parameter, ParameterType, Value};
pub use requirement::Requirement;
