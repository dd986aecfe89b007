//! Execution gates evaluated against the invoking sender.

use crate::context::Sender;

/// A predicate over the invoking sender, independent of the permission
/// string. All of a node's requirements must pass before binding proceeds.
///
/// Requirements are stateless beyond their own configuration and are shared
/// across invocations; they must not mutate anything per call.
pub trait Requirement {
    /// Whether the sender satisfies this requirement.
    fn has_met(&self, sender: &dyn Sender) -> bool;
}

impl<F> Requirement for F
where
    F: Fn(&dyn Sender) -> bool,
{
    fn has_met(&self, sender: &dyn Sender) -> bool {
        self(sender)
    }
}
