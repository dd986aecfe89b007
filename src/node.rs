//! The command tree: nodes, structural mutation, and token resolution.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::context::InvocationContext;
use crate::error::TreeError;
use crate::parameter::Parameter;
use crate::requirement::Requirement;

/// A completion action run when a node finishes the pipeline as the end
/// point. Its boolean becomes the result of the whole invocation.
pub type Action = dyn for<'c> Fn(&mut InvocationContext<'c>) -> bool;

/// How tokens are compared against child names and aliases during
/// resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CasePolicy {
    /// Case-insensitive matching (the default).
    #[default]
    Insensitive,
    /// Byte-exact matching.
    Sensitive,
}

impl CasePolicy {
    pub(crate) fn fold(&self, text: &str) -> String {
        match self {
            CasePolicy::Insensitive => text.to_lowercase(),
            CasePolicy::Sensitive => text.to_owned(),
        }
    }
}

struct Inner {
    name: String,
    aliases: Vec<String>,
    description: String,
    permission: String,
    permission_message: Option<String>,
    case_policy: CasePolicy,
    parent: Weak<RefCell<Inner>>,
    children: BTreeMap<usize, CommandNode>,
    parameters: Vec<Parameter>,
    requirements: Vec<Rc<dyn Requirement>>,
    action: Option<Rc<Action>>,
}

/// A node of the command tree: a shared handle with identity semantics.
///
/// Cloning a `CommandNode` clones the handle, not the node; two clones
/// compare equal and mutate the same underlying entity. The tree is built
/// at registration time and read immutably during dispatch; all
/// per-invocation state lives on the [`InvocationContext`].
#[derive(Clone)]
pub struct CommandNode {
    inner: Rc<RefCell<Inner>>,
}

impl CommandNode {
    /// Creates a root node with the given name, no permission, and no
    /// children. Everything else is set through the mutators or the
    /// [builder](crate::builder).
    pub fn new(name: impl Into<String>) -> Self {
        CommandNode {
            inner: Rc::new(RefCell::new(Inner {
                name: name.into(),
                aliases: Vec::new(),
                description: String::new(),
                permission: String::new(),
                permission_message: None,
                case_policy: CasePolicy::default(),
                parent: Weak::new(),
                children: BTreeMap::new(),
                parameters: Vec::new(),
                requirements: Vec::new(),
                action: None,
            })),
        }
    }

    /// Identity test: whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &CommandNode) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// The node's primary name.
    pub fn name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    /// The node's aliases, in declaration order.
    pub fn aliases(&self) -> Vec<String> {
        self.inner.borrow().aliases.clone()
    }

    /// Appends an alias.
    pub fn add_alias(&self, alias: impl Into<String>) {
        self.inner.borrow_mut().aliases.push(alias.into());
    }

    /// The description shown in suggestion lines.
    pub fn description(&self) -> String {
        self.inner.borrow().description.clone()
    }

    /// Sets the description.
    pub fn set_description(&self, description: impl Into<String>) {
        self.inner.borrow_mut().description = description.into();
    }

    /// The permission string gating execution. Empty means ungated.
    pub fn permission(&self) -> String {
        self.inner.borrow().permission.clone()
    }

    /// Sets the permission string.
    pub fn set_permission(&self, permission: impl Into<String>) {
        self.inner.borrow_mut().permission = permission.into();
    }

    /// The permission-denied message override, if any.
    pub fn permission_message(&self) -> Option<String> {
        self.inner.borrow().permission_message.clone()
    }

    /// Overrides the translated permission-denied message with fixed text.
    pub fn set_permission_message(&self, message: impl Into<String>) {
        self.inner.borrow_mut().permission_message = Some(message.into());
    }

    /// The case policy applied when resolving this node's children.
    pub fn case_policy(&self) -> CasePolicy {
        self.inner.borrow().case_policy
    }

    /// Sets the case policy for resolving this node's children.
    pub fn set_case_policy(&self, policy: CasePolicy) {
        self.inner.borrow_mut().case_policy = policy;
    }

    /// The node's parameters, in binding order.
    pub fn parameters(&self) -> Vec<Parameter> {
        self.inner.borrow().parameters.clone()
    }

    /// Appends a parameter, assigning it the next positional index.
    pub fn add_parameter(&self, mut parameter: Parameter) {
        let mut inner = self.inner.borrow_mut();
        parameter.set_index(inner.parameters.len());
        inner.parameters.push(parameter);
    }

    /// The node's requirements, in evaluation order.
    pub fn requirements(&self) -> Vec<Rc<dyn Requirement>> {
        self.inner.borrow().requirements.clone()
    }

    /// Appends a requirement.
    pub fn add_requirement(&self, requirement: impl Requirement + 'static) {
        self.inner.borrow_mut().requirements.push(Rc::new(requirement));
    }

    /// Sets the completion action run when this node is the end point.
    pub fn set_action(&self, action: impl for<'c> Fn(&mut InvocationContext<'c>) -> bool + 'static) {
        self.inner.borrow_mut().action = Some(Rc::new(action));
    }

    pub(crate) fn action(&self) -> Option<Rc<Action>> {
        self.inner.borrow().action.clone()
    }

    /// The owning parent, if this node is attached to one.
    pub fn parent(&self) -> Option<CommandNode> {
        self.inner
            .borrow()
            .parent
            .upgrade()
            .map(|inner| CommandNode { inner })
    }

    /// Whether this node has any children.
    pub fn has_children(&self) -> bool {
        !self.inner.borrow().children.is_empty()
    }

    /// The direct children in index order.
    pub fn children(&self) -> Vec<CommandNode> {
        self.inner.borrow().children.values().cloned().collect()
    }

    /// The child stored at the given index, if any.
    pub fn child_at(&self, index: usize) -> Option<CommandNode> {
        self.inner.borrow().children.get(&index).cloned()
    }

    /// Identity membership test over direct children only.
    pub fn contains(&self, node: &CommandNode) -> bool {
        self.inner
            .borrow()
            .children
            .values()
            .any(|child| child.ptr_eq(node))
    }

    /// Registers `child` at the end of the child sequence.
    ///
    /// Fails with [`TreeError::DuplicateChild`] if `child` is already a
    /// direct child, and with [`TreeError::Cyclic`] if `child` is this node
    /// or one of its ancestors. A child already attached elsewhere is
    /// detached from its previous parent first.
    pub fn add_child(&self, child: &CommandNode) -> Result<(), TreeError> {
        let index = self
            .inner
            .borrow()
            .children
            .keys()
            .next_back()
            .map_or(0, |last| last + 1);
        self.attach(child, index).map(|_| ())
    }

    /// Registers `child` at an explicit index, with the same structural
    /// checks as [`add_child`](Self::add_child).
    ///
    /// An occupied index replaces the occupant: the displaced node's parent
    /// link is cleared and the node is returned so the replacement is never
    /// silent.
    pub fn add_child_at(
        &self,
        child: &CommandNode,
        index: usize,
    ) -> Result<Option<CommandNode>, TreeError> {
        self.attach(child, index)
    }

    /// Registers every node in the iterator, failing fast on the first
    /// structural error.
    pub fn add_children<'n>(
        &self,
        children: impl IntoIterator<Item = &'n CommandNode>,
    ) -> Result<(), TreeError> {
        for child in children {
            self.add_child(child)?;
        }
        Ok(())
    }

    /// Detaches all current children, then registers the given ones.
    pub fn set_children<'n>(
        &self,
        children: impl IntoIterator<Item = &'n CommandNode>,
    ) -> Result<(), TreeError> {
        for child in self.children() {
            self.remove_child(&child);
        }
        self.add_children(children)
    }

    fn attach(
        &self,
        child: &CommandNode,
        index: usize,
    ) -> Result<Option<CommandNode>, TreeError> {
        if self.ptr_eq(child) {
            return Err(TreeError::Cyclic {
                node: child.name(),
                parent: self.name(),
            });
        }
        if self.contains(child) {
            return Err(TreeError::DuplicateChild {
                child: child.name(),
                parent: self.name(),
            });
        }
        let mut cursor = self.parent();
        while let Some(ancestor) = cursor {
            if ancestor.ptr_eq(child) {
                return Err(TreeError::Cyclic {
                    node: child.name(),
                    parent: self.name(),
                });
            }
            cursor = ancestor.parent();
        }

        // One parent at a time.
        if let Some(previous) = child.parent() {
            previous.remove_child(child);
        }

        let displaced = self.inner.borrow_mut().children.insert(index, child.clone());
        if let Some(displaced) = &displaced {
            displaced.inner.borrow_mut().parent = Weak::new();
        }
        child.inner.borrow_mut().parent = Rc::downgrade(&self.inner);
        Ok(displaced)
    }

    /// Detaches `child`. A no-op when `child` is not a direct child.
    pub fn remove_child(&self, child: &CommandNode) {
        let key = self
            .inner
            .borrow()
            .children
            .iter()
            .find(|(_, node)| node.ptr_eq(child))
            .map(|(key, _)| *key);
        if let Some(key) = key {
            self.inner.borrow_mut().children.remove(&key);
            child.inner.borrow_mut().parent = Weak::new();
        }
    }

    /// The root-to-self path, computed by walking parent links.
    pub fn chain(&self) -> Vec<CommandNode> {
        let mut chain = vec![self.clone()];
        let mut cursor = self.parent();
        while let Some(node) = cursor {
            cursor = node.parent();
            chain.push(node);
        }
        chain.reverse();
        chain
    }

    /// Aliases in declaration order, then the name: the candidate labels a
    /// token is matched against during the prefix phase.
    pub(crate) fn labels(&self) -> Vec<String> {
        let inner = self.inner.borrow();
        let mut labels = inner.aliases.clone();
        labels.push(inner.name.clone());
        labels
    }

    /// Resolves a token against this node's children.
    ///
    /// An exact name match (under this node's case policy) short-circuits
    /// to that single child. Otherwise each child contributes at most one
    /// entry, keyed by the first of its labels (aliases, then name) the
    /// token is a prefix of; the matches come back sorted by that label.
    pub fn children_by_token(&self, token: &str) -> Vec<CommandNode> {
        let policy = self.case_policy();
        let folded = policy.fold(token);
        let children = self.children();

        for child in &children {
            if policy.fold(&child.name()) == folded {
                return vec![child.clone()];
            }
        }

        let mut matches: BTreeMap<String, CommandNode> = BTreeMap::new();
        for child in &children {
            for label in child.labels() {
                let label = policy.fold(&label);
                if label.starts_with(&folded) {
                    matches.entry(label).or_insert_with(|| child.clone());
                    break;
                }
            }
        }
        matches.into_values().collect()
    }

    /// Assembles the usage string: `/` plus the chain names space-joined,
    /// plus this node's parameter templates space-joined, trimmed.
    pub fn usage(&self) -> String {
        let names = self
            .chain()
            .iter()
            .map(|node| node.name())
            .collect::<Vec<_>>()
            .join(" ");
        let templates = self
            .parameters()
            .iter()
            .map(Parameter::template)
            .collect::<Vec<_>>()
            .join(" ");
        format!("/{} {}", names, templates).trim().to_owned()
    }
}

impl PartialEq for CommandNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for CommandNode {}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("CommandNode")
            .field("name", &inner.name)
            .field("aliases", &inner.aliases)
            .field("children", &inner.children.len())
            .field("parameters", &inner.parameters.len())
            .finish()
    }
}
