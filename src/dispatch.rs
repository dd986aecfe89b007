//! The ordered execution pipeline: permission, requirements, arity,
//! binding, and recursive child dispatch.

use tracing::{debug, warn};

use crate::context::InvocationContext;
use crate::error::Failure;
use crate::message::{keys, Translatable};
use crate::node::CommandNode;

/// How many prefix matches still produce an enumerated suggestion list.
/// Beyond this the sender gets a single too-ambiguous line instead.
const SUGGESTION_LIMIT: usize = 8;

/// The minimal capability a host needs to plug a command into its own
/// dispatch surface. [`CommandNode`] implements it; hosts with their own
/// command base type adapt at the boundary.
pub trait Executable {
    /// The permission string gating execution.
    fn permission(&self) -> String;

    /// Runs the pipeline against the given context.
    fn execute(&self, ctx: &mut InvocationContext<'_>) -> bool;

    /// The assembled usage string.
    fn usage(&self) -> String;
}

impl Executable for CommandNode {
    fn permission(&self) -> String {
        CommandNode::permission(self)
    }

    fn execute(&self, ctx: &mut InvocationContext<'_>) -> bool {
        CommandNode::execute(self, ctx)
    }

    fn usage(&self) -> String {
        CommandNode::usage(self)
    }
}

impl CommandNode {
    /// Drives the full pipeline for this node against the given context.
    ///
    /// Checks run in a fixed order: permission, requirements, arity,
    /// parameter binding, then child dispatch when this node has children
    /// and a subcommand token was bound. The first failed check sends its
    /// message (requirements fail silently), records a [`Failure`] on the
    /// context, and returns `false`. A node that completes records itself
    /// as the context's end point, runs its completion action if one is
    /// set, and returns `true`.
    pub fn execute(&self, ctx: &mut InvocationContext<'_>) -> bool {
        let name = self.name();
        debug!(command = %name, args = ?ctx.args(), "executing");

        let permission = self.permission();
        if !permission.is_empty() && !ctx.sender().test_permission(&permission) {
            debug!(command = %name, %permission, "permission denied");
            let message = self.permission_message().unwrap_or_else(|| {
                Translatable::new(keys::PERMISSION_DENIED)
                    .with("permission", permission)
                    .render(ctx.translator())
            });
            ctx.sender().send_message(&message);
            ctx.fail(Failure::PermissionDenied);
            return false;
        }

        for requirement in self.requirements() {
            if !requirement.has_met(ctx.sender()) {
                debug!(command = %name, "requirement not met");
                ctx.fail(Failure::RequirementNotMet);
                return false;
            }
        }

        let parameters = self.parameters();
        let required = parameters.iter().filter(|p| p.is_required()).count();
        if ctx.args().len() < required {
            debug!(command = %name, given = ctx.args().len(), required, "too few arguments");
            ctx.sender().send_message(&self.usage());
            ctx.fail(Failure::Arity);
            return false;
        }

        for (index, parameter) in parameters.iter().enumerate() {
            let raw = match ctx.arg(index) {
                Some(arg) => arg.to_owned(),
                None => match parameter.default_value() {
                    Some(default) => default.to_owned(),
                    // Unbound trailing optionals are not a failure on
                    // their own.
                    None => break,
                },
            };
            let value = parameter.read(&raw, Some(ctx.sender()), ctx.translator());
            match value {
                Some(value) => ctx.bind(index, value),
                None => {
                    debug!(command = %name, parameter = parameter.name(), value = %raw, "type validation failed");
                    ctx.fail(Failure::TypeValidation { index });
                    return false;
                }
            }
        }

        if self.has_children() {
            let token = ctx.bound(0).map(ToString::to_string);
            if let Some(token) = token {
                return self.dispatch_child(&token, ctx);
            }
        }

        ctx.set_end_point(self.clone());
        if let Some(action) = self.action() {
            if !action(ctx) {
                debug!(command = %name, "action reported failure");
                ctx.fail(Failure::ActionFailed);
                return false;
            }
        }
        true
    }

    /// Resolves `token` against the children and descends into the single
    /// match, or reports why it could not.
    fn dispatch_child(&self, token: &str, ctx: &mut InvocationContext<'_>) -> bool {
        if token.is_empty() {
            ctx.sender().send_message(&self.usage());
            ctx.fail(Failure::Arity);
            return false;
        }

        let matches = self.children_by_token(token);
        match matches.len() {
            0 => {
                debug!(command = %self.name(), %token, "no child matched");
                let message = Translatable::new(keys::CHILD_NONE)
                    .with("token", token)
                    .render(ctx.translator());
                ctx.sender().send_message(&message);
                ctx.fail(Failure::UnknownToken(token.to_owned()));
                false
            }
            1 => {
                let child = &matches[0];
                debug!(command = %self.name(), child = %child.name(), "descending");
                ctx.shift_arg();
                ctx.clear_bindings();
                child.execute(ctx)
            }
            count if count <= SUGGESTION_LIMIT => {
                let header = Translatable::new(keys::SUGGESTION_HEADER)
                    .with("token", token)
                    .render(ctx.translator());
                ctx.sender().send_message(&header);
                for candidate in &matches {
                    let line = Translatable::new(keys::SUGGESTION)
                        .with("name", candidate.name())
                        .with("usage", candidate.usage())
                        .with("description", candidate.description())
                        .render(ctx.translator());
                    ctx.sender().send_message(&line);
                }
                ctx.fail(Failure::AmbiguousToken {
                    token: token.to_owned(),
                    matches: count,
                });
                false
            }
            count => {
                warn!(command = %self.name(), %token, count, "token too ambiguous");
                let message = Translatable::new(keys::TOO_AMBIGUOUS)
                    .with("token", token)
                    .render(ctx.translator());
                ctx.sender().send_message(&message);
                ctx.fail(Failure::AmbiguousToken {
                    token: token.to_owned(),
                    matches: count,
                });
                false
            }
        }
    }
}
