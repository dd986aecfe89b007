//! Fluent construction of command trees.
//!
//! ```
//! use arbor_commands::{node, Parameter, ParameterType};
//!
//! let tp = node("tp")
//!     .description("teleport commands")
//!     .permission("world.tp")
//!     .parameter(Parameter::new("sub", ParameterType::String))
//!     .then(
//!         node("here")
//!             .alias("h")
//!             .description("teleport to the caller")
//!             .parameter(Parameter::new("who", ParameterType::String)),
//!     )
//!     .build()
//!     .unwrap();
//! assert_eq!(tp.children().len(), 1);
//! ```

use crate::context::InvocationContext;
use crate::error::TreeError;
use crate::node::{CasePolicy, CommandNode};
use crate::parameter::Parameter;
use crate::requirement::Requirement;

/// Starts building a node with the given name.
pub fn node(name: impl Into<String>) -> NodeBuilder {
    NodeBuilder {
        node: CommandNode::new(name),
        error: None,
    }
}

/// Accumulates a node's configuration and children, surfacing the first
/// structural error at [`build`](NodeBuilder::build) time.
#[derive(Debug)]
pub struct NodeBuilder {
    node: CommandNode,
    error: Option<TreeError>,
}

impl NodeBuilder {
    /// Appends an alias.
    pub fn alias(self, alias: impl Into<String>) -> Self {
        self.node.add_alias(alias);
        self
    }

    /// Sets the description shown in suggestion lines.
    pub fn description(self, description: impl Into<String>) -> Self {
        self.node.set_description(description);
        self
    }

    /// Sets the permission string.
    pub fn permission(self, permission: impl Into<String>) -> Self {
        self.node.set_permission(permission);
        self
    }

    /// Overrides the permission-denied message with fixed text.
    pub fn permission_message(self, message: impl Into<String>) -> Self {
        self.node.set_permission_message(message);
        self
    }

    /// Sets the case policy used to resolve this node's children.
    pub fn case_policy(self, policy: CasePolicy) -> Self {
        self.node.set_case_policy(policy);
        self
    }

    /// Appends a parameter at the next position.
    pub fn parameter(self, parameter: Parameter) -> Self {
        self.node.add_parameter(parameter);
        self
    }

    /// Appends a requirement.
    pub fn require(self, requirement: impl Requirement + 'static) -> Self {
        self.node.add_requirement(requirement);
        self
    }

    /// Sets the completion action.
    pub fn executes(
        self,
        action: impl for<'c> Fn(&mut InvocationContext<'c>) -> bool + 'static,
    ) -> Self {
        self.node.set_action(action);
        self
    }

    /// Attaches a child built from the given builder. A structural error
    /// here, or one already recorded inside the child, is kept and
    /// returned by [`build`](NodeBuilder::build).
    pub fn then(mut self, child: NodeBuilder) -> Self {
        match child.build() {
            Ok(child) => {
                if let Err(err) = self.node.add_child(&child) {
                    self.error.get_or_insert(err);
                }
            }
            Err(err) => {
                self.error.get_or_insert(err);
            }
        }
        self
    }

    /// Attaches an already-built node, e.g. a subtree shared with another
    /// registration path. Structural errors are kept for
    /// [`build`](NodeBuilder::build).
    pub fn then_node(mut self, child: &CommandNode) -> Self {
        if let Err(err) = self.node.add_child(child) {
            self.error.get_or_insert(err);
        }
        self
    }

    /// Finishes the node, returning the first structural error hit while
    /// attaching children, if any.
    pub fn build(self) -> Result<CommandNode, TreeError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.node),
        }
    }
}
