//! Error types for tree registration and dispatch.
//!
//! Registration failures are real errors returned to the caller; dispatch
//! failures never cross the [`execute`](crate::CommandNode::execute)
//! boundary and are instead recorded on the invocation context as a
//! [`Failure`] alongside the `false` return.

/// Structural errors raised while mutating a command tree.
///
/// These can only occur at registration time. Once a tree is built, dispatch
/// reads it immutably and cannot produce a `TreeError`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The node is already a direct child of the target parent.
    #[error("command '{child}' is already a child of '{parent}'")]
    DuplicateChild {
        /// Name of the node being registered.
        child: String,
        /// Name of the node it was being attached to.
        parent: String,
    },

    /// Attaching the node would make it its own ancestor.
    #[error("command '{node}' is an ancestor of '{parent}' and cannot become its child")]
    Cyclic {
        /// Name of the node being registered.
        node: String,
        /// Name of the node it was being attached to.
        parent: String,
    },
}

/// The reason a dispatch rejected, recorded on the [`InvocationContext`]
/// before `execute` returns `false`.
///
/// Every rejection path sets exactly one of these, so hosts and tests can
/// distinguish outcomes without parsing the messages sent to the sender.
///
/// [`InvocationContext`]: crate::InvocationContext
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// The sender failed the node's permission test.
    PermissionDenied,
    /// A requirement predicate returned false. No message is sent for this.
    RequirementNotMet,
    /// Fewer arguments than required parameters, or an empty subcommand
    /// token where one was expected. The usage string was sent.
    Arity,
    /// A parameter rejected its raw text. The typed error message was
    /// already sent by the parameter itself.
    TypeValidation {
        /// Position of the offending parameter.
        index: usize,
    },
    /// No child matched the subcommand token.
    UnknownToken(String),
    /// The subcommand token matched more than one child.
    AmbiguousToken {
        /// The offending token.
        token: String,
        /// How many children it matched.
        matches: usize,
    },
    /// The end point's completion action returned false.
    ActionFailed,
}
