//! Sender capability and per-invocation state.

use std::collections::BTreeMap;

use crate::error::Failure;
use crate::message::Translator;
use crate::node::CommandNode;
use crate::parameter::Value;

/// The capabilities the pipeline needs from whoever issued the command.
///
/// Host command sources (console, player, RPC peer) implement this at the
/// boundary; the core never assumes any behavior beyond these three calls.
pub trait Sender {
    /// Whether the sender holds the named permission.
    fn test_permission(&self, permission: &str) -> bool;

    /// Delivers rendered text back to the sender.
    fn send_message(&self, message: &str);

    /// The sender's display label, used in parameter error messages.
    fn display_name(&self) -> String;
}

/// All state of one top-level [`execute`](CommandNode::execute) call.
///
/// Created fresh per invocation and threaded by reference through the
/// recursive descent. The command tree itself never stores any of this, so
/// overlapping invocations on shared nodes cannot corrupt each other.
pub struct InvocationContext<'a> {
    sender: &'a dyn Sender,
    translator: &'a dyn Translator,
    label: String,
    args: Vec<String>,
    values: BTreeMap<usize, Value>,
    end_point: Option<CommandNode>,
    failure: Option<Failure>,
}

impl<'a> InvocationContext<'a> {
    /// Creates the context for one invocation: the sender, the host's
    /// translator, the label the command was invoked under, and the raw
    /// argument tokens.
    pub fn new(
        sender: &'a dyn Sender,
        translator: &'a dyn Translator,
        label: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        InvocationContext {
            sender,
            translator,
            label: label.into(),
            args,
            values: BTreeMap::new(),
            end_point: None,
            failure: None,
        }
    }

    /// The invoking sender.
    pub fn sender(&self) -> &dyn Sender {
        self.sender
    }

    /// The host's translator.
    pub fn translator(&self) -> &dyn Translator {
        self.translator
    }

    /// The label the top-level command was invoked under.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The working argument list. Descent consumes tokens from the front,
    /// so during and after dispatch this holds the arguments as seen by the
    /// deepest node reached.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub(crate) fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Removes and returns the front token, consumed by a child dispatch.
    pub(crate) fn shift_arg(&mut self) -> Option<String> {
        if self.args.is_empty() {
            None
        } else {
            Some(self.args.remove(0))
        }
    }

    /// The value bound at the given parameter index, for the node currently
    /// (or last) processing.
    pub fn bound(&self, index: usize) -> Option<&Value> {
        self.values.get(&index)
    }

    /// All values bound by the node currently (or last) processing, by
    /// parameter index.
    pub fn bindings(&self) -> &BTreeMap<usize, Value> {
        &self.values
    }

    pub(crate) fn bind(&mut self, index: usize, value: Value) {
        self.values.insert(index, value);
    }

    /// Binding restarts from scratch for each node in the descent.
    pub(crate) fn clear_bindings(&mut self) {
        self.values.clear();
    }

    /// The deepest node that completed during this invocation, if any.
    pub fn end_point(&self) -> Option<&CommandNode> {
        self.end_point.as_ref()
    }

    pub(crate) fn set_end_point(&mut self, node: CommandNode) {
        self.end_point = Some(node);
    }

    /// Why the invocation rejected, when `execute` returned `false`.
    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub(crate) fn fail(&mut self, failure: Failure) {
        self.failure = Some(failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::KeyTranslator;
    use pretty_assertions::assert_eq;

    struct Nobody;

    impl Sender for Nobody {
        fn test_permission(&self, _permission: &str) -> bool {
            true
        }

        fn send_message(&self, _message: &str) {}

        fn display_name(&self) -> String {
            "nobody".into()
        }
    }

    #[test]
    fn shift_consumes_from_the_front() {
        let sender = Nobody;
        let mut ctx = InvocationContext::new(
            &sender,
            &KeyTranslator,
            "tp",
            vec!["here".into(), "3".into()],
        );
        assert_eq!(ctx.shift_arg(), Some("here".to_owned()));
        assert_eq!(ctx.args(), ["3".to_owned()]);
        assert_eq!(ctx.shift_arg(), Some("3".to_owned()));
        assert_eq!(ctx.shift_arg(), None);
    }

    #[test]
    fn bindings_clear_between_nodes() {
        let sender = Nobody;
        let mut ctx = InvocationContext::new(&sender, &KeyTranslator, "tp", Vec::new());
        ctx.bind(0, Value::Str("here".into()));
        ctx.bind(1, Value::Int(3));
        assert_eq!(ctx.bound(1), Some(&Value::Int(3)));
        ctx.clear_bindings();
        assert!(ctx.bindings().is_empty());
    }
}
