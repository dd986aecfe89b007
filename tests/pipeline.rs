//! End-to-end tests of the execution pipeline against small trees.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use arbor_commands::{
    node, CommandNode, Failure, InvocationContext, KeyTranslator, Parameter, ParameterType,
    Sender, Value,
};
use pretty_assertions::assert_eq;

struct TestSender {
    name: String,
    denied: HashSet<String>,
    messages: RefCell<Vec<String>>,
}

impl TestSender {
    fn new(name: &str) -> Self {
        TestSender {
            name: name.to_owned(),
            denied: HashSet::new(),
            messages: RefCell::new(Vec::new()),
        }
    }

    fn deny(mut self, permission: &str) -> Self {
        self.denied.insert(permission.to_owned());
        self
    }

    fn sent(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Sender for TestSender {
    fn test_permission(&self, permission: &str) -> bool {
        !self.denied.contains(permission)
    }

    fn send_message(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_owned());
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

fn execute(
    tree: &CommandNode,
    sender: &TestSender,
    args: &[&str],
) -> (bool, Option<Failure>, Option<String>) {
    let args = args.iter().map(|arg| arg.to_string()).collect();
    let mut ctx = InvocationContext::new(sender, &KeyTranslator, tree.name(), args);
    let ok = tree.execute(&mut ctx);
    let end_point = ctx.end_point().map(|n| n.name());
    (ok, ctx.failure().cloned(), end_point)
}

fn selector() -> Parameter {
    Parameter::new("sub", ParameterType::String)
}

#[test]
fn permission_denied_sends_the_translated_message() {
    let tree = node("tp").permission("world.tp").build().unwrap();
    let sender = TestSender::new("guest").deny("world.tp");

    let (ok, failure, _) = execute(&tree, &sender, &[]);
    assert!(!ok);
    assert_eq!(failure, Some(Failure::PermissionDenied));
    assert_eq!(
        sender.sent(),
        ["command.permission-denied (permission=world.tp)".to_owned()]
    );
}

#[test]
fn permission_message_override_is_sent_verbatim() {
    let tree = node("tp")
        .permission("world.tp")
        .permission_message("you shall not pass")
        .build()
        .unwrap();
    let sender = TestSender::new("guest").deny("world.tp");

    let (ok, _, _) = execute(&tree, &sender, &[]);
    assert!(!ok);
    assert_eq!(sender.sent(), ["you shall not pass".to_owned()]);
}

#[test]
fn empty_permission_is_ungated() {
    let tree = node("tp").build().unwrap();
    let sender = TestSender::new("guest").deny("");

    let (ok, failure, _) = execute(&tree, &sender, &[]);
    assert!(ok);
    assert_eq!(failure, None);
}

#[test]
fn requirement_failure_is_silent() {
    let tree = node("tp")
        .require(|sender: &dyn Sender| sender.display_name() == "admin")
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let (ok, failure, end_point) = execute(&tree, &sender, &[]);
    assert!(!ok);
    assert_eq!(failure, Some(Failure::RequirementNotMet));
    assert_eq!(end_point, None);
    assert!(sender.sent().is_empty());
}

#[test]
fn requirements_short_circuit_in_order() {
    let reached = Rc::new(RefCell::new(false));
    let flag = reached.clone();
    let tree = node("tp")
        .require(|_: &dyn Sender| false)
        .require(move |_: &dyn Sender| {
            *flag.borrow_mut() = true;
            true
        })
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let (ok, _, _) = execute(&tree, &sender, &[]);
    assert!(!ok);
    assert!(!*reached.borrow());
}

#[test]
fn too_few_arguments_sends_usage_and_binds_nothing() {
    let tree = node("warp")
        .parameter(Parameter::new("name", ParameterType::String))
        .parameter(Parameter::new("delay", ParameterType::Integer))
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let mut ctx = InvocationContext::new(&sender, &KeyTranslator, "warp", vec!["a".into()]);
    let ok = tree.execute(&mut ctx);
    assert!(!ok);
    assert_eq!(ctx.failure(), Some(&Failure::Arity));
    assert!(ctx.bindings().is_empty());
    assert_eq!(sender.sent(), ["/warp <name> <delay>".to_owned()]);
}

#[test]
fn type_validation_failure_stops_the_call() {
    let tree = node("warp")
        .parameter(Parameter::new("delay", ParameterType::Integer))
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let (ok, failure, end_point) = execute(&tree, &sender, &["soon"]);
    assert!(!ok);
    assert_eq!(failure, Some(Failure::TypeValidation { index: 0 }));
    assert_eq!(end_point, None);
    assert_eq!(
        sender.sent(),
        ["parameter.type-integer-error (sender=guest, value=soon, n=1)".to_owned()]
    );
}

#[test]
fn defaults_fill_missing_arguments() {
    let seen = Rc::new(RefCell::new(None));
    let slot = seen.clone();
    let tree = node("warp")
        .parameter(Parameter::new("delay", ParameterType::Integer).with_default("7"))
        .executes(move |ctx| {
            *slot.borrow_mut() = ctx.bound(0).cloned();
            true
        })
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let (ok, _, _) = execute(&tree, &sender, &[]);
    assert!(ok);
    assert_eq!(*seen.borrow(), Some(Value::Int(7)));
}

#[test]
fn bad_default_fails_like_bad_input() {
    let tree = node("warp")
        .parameter(Parameter::new("delay", ParameterType::Integer).with_default("soon"))
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let (ok, failure, _) = execute(&tree, &sender, &[]);
    assert!(!ok);
    assert_eq!(failure, Some(Failure::TypeValidation { index: 0 }));
}

#[test]
fn binding_stops_at_an_unbound_required_parameter() {
    // Only the second parameter is required, so one argument passes the
    // arity check; index 1 then stays unbound without failing the call.
    let tree = node("warp")
        .parameter(Parameter::new("name", ParameterType::String).with_default("home"))
        .parameter(Parameter::new("delay", ParameterType::Integer))
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let mut ctx = InvocationContext::new(&sender, &KeyTranslator, "warp", vec!["base".into()]);
    let ok = tree.execute(&mut ctx);
    assert!(ok);
    assert_eq!(ctx.bound(0), Some(&Value::Str("base".into())));
    assert_eq!(ctx.bound(1), None);
}

#[test]
fn alias_resolves_to_the_child() {
    let tree = node("tp")
        .parameter(selector())
        .then(node("here").alias("h"))
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let (ok, failure, end_point) = execute(&tree, &sender, &["h"]);
    assert!(ok);
    assert_eq!(failure, None);
    assert_eq!(end_point, Some("here".to_owned()));
}

#[test]
fn exact_name_wins_over_alias_prefixes() {
    let tree = node("root")
        .parameter(selector())
        .then(node("teleport"))
        .then(node("other").alias("te"))
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let (ok, _, end_point) = execute(&tree, &sender, &["teleport"]);
    assert!(ok);
    assert_eq!(end_point, Some("teleport".to_owned()));
}

#[test]
fn descent_consumes_the_token() {
    let seen = Rc::new(RefCell::new(None));
    let slot = seen.clone();
    let tree = node("tp")
        .parameter(selector())
        .then(
            node("to")
                .parameter(Parameter::new("target", ParameterType::String))
                .executes(move |ctx| {
                    *slot.borrow_mut() = ctx.bound(0).cloned();
                    true
                }),
        )
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let (ok, _, end_point) = execute(&tree, &sender, &["to", "alice"]);
    assert!(ok);
    assert_eq!(end_point, Some("to".to_owned()));
    assert_eq!(*seen.borrow(), Some(Value::Str("alice".into())));
}

#[test]
fn three_level_descent_reaches_the_leaf() {
    let tree = node("root")
        .parameter(selector())
        .then(node("mid").parameter(selector()).then(node("leaf")))
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let (ok, _, end_point) = execute(&tree, &sender, &["mid", "leaf"]);
    assert!(ok);
    assert_eq!(end_point, Some("leaf".to_owned()));
}

#[test]
fn unknown_token_reports_child_none() {
    let tree = node("tp")
        .parameter(selector())
        .then(node("here"))
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let (ok, failure, end_point) = execute(&tree, &sender, &["x"]);
    assert!(!ok);
    assert_eq!(failure, Some(Failure::UnknownToken("x".into())));
    assert_eq!(end_point, None);
    assert_eq!(sender.sent(), ["command.child-none (token=x)".to_owned()]);
}

#[test]
fn empty_token_sends_usage() {
    let tree = node("tp")
        .parameter(selector().with_default(""))
        .then(node("here"))
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let (ok, failure, _) = execute(&tree, &sender, &[]);
    assert!(!ok);
    assert_eq!(failure, Some(Failure::Arity));
    assert_eq!(sender.sent(), ["/tp [sub]".to_owned()]);
}

#[test]
fn few_matches_send_a_suggestion_table() {
    let tree = node("root")
        .parameter(selector())
        .then(node("spawn").description("go to spawn"))
        .then(node("smite").description("smite a player"))
        .then(node("sethome").description("set your home"))
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let (ok, failure, _) = execute(&tree, &sender, &["s"]);
    assert!(!ok);
    assert_eq!(
        failure,
        Some(Failure::AmbiguousToken {
            token: "s".into(),
            matches: 3,
        })
    );
    let sent = sender.sent();
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[0], "command.suggestion-header (token=s)");
    assert_eq!(
        sent[1],
        "command.suggestion (name=sethome, usage=/root sethome, description=set your home)"
    );
    assert_eq!(
        sent[2],
        "command.suggestion (name=smite, usage=/root smite, description=smite a player)"
    );
    assert_eq!(
        sent[3],
        "command.suggestion (name=spawn, usage=/root spawn, description=go to spawn)"
    );
}

#[test]
fn more_than_eight_matches_send_one_terse_line() {
    let mut root = node("root").parameter(selector());
    for i in 1..=9 {
        root = root.then(node(format!("t{i}")));
    }
    let tree = root.build().unwrap();
    let sender = TestSender::new("guest");

    let (ok, failure, _) = execute(&tree, &sender, &["t"]);
    assert!(!ok);
    assert_eq!(
        failure,
        Some(Failure::AmbiguousToken {
            token: "t".into(),
            matches: 9,
        })
    );
    assert_eq!(sender.sent(), ["command.too-ambiguous (token=t)".to_owned()]);
}

#[test]
fn child_failure_propagates_to_the_root_call() {
    let tree = node("tp")
        .parameter(selector())
        .then(node("here").permission("world.tp.here"))
        .build()
        .unwrap();
    let sender = TestSender::new("guest").deny("world.tp.here");

    let (ok, failure, end_point) = execute(&tree, &sender, &["here"]);
    assert!(!ok);
    assert_eq!(failure, Some(Failure::PermissionDenied));
    assert_eq!(end_point, None);
}

#[test]
fn action_result_becomes_the_call_result() {
    let tree = node("tp")
        .parameter(selector())
        .then(node("here").executes(|_ctx| false))
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let (ok, failure, end_point) = execute(&tree, &sender, &["here"]);
    assert!(!ok);
    assert_eq!(failure, Some(Failure::ActionFailed));
    // The node still completed the pipeline and is the end point.
    assert_eq!(end_point, Some("here".to_owned()));
}

#[test]
fn a_failed_call_leaves_nothing_behind_for_the_next_one() {
    let tree = node("warp")
        .parameter(Parameter::new("delay", ParameterType::Integer))
        .build()
        .unwrap();
    let sender = TestSender::new("guest");

    let (ok, _, _) = execute(&tree, &sender, &["soon"]);
    assert!(!ok);

    let retry = TestSender::new("guest");
    let mut ctx = InvocationContext::new(&retry, &KeyTranslator, "warp", vec!["5".into()]);
    assert!(tree.execute(&mut ctx));
    assert_eq!(ctx.bound(0), Some(&Value::Int(5)));
    assert!(retry.sent().is_empty());
}

#[test]
fn a_plain_node_with_extra_arguments_still_completes() {
    // No children: surplus tokens are left in the context untouched.
    let tree = node("ping").build().unwrap();
    let sender = TestSender::new("guest");

    let (ok, _, end_point) = execute(&tree, &sender, &["extra", "tokens"]);
    assert!(ok);
    assert_eq!(end_point, Some("ping".to_owned()));
}
