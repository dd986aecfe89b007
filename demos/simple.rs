use arbor_commands::{
    node, InvocationContext, KeyTranslator, Parameter, ParameterType, Sender,
};

struct Console;

impl Sender for Console {
    fn test_permission(&self, _permission: &str) -> bool {
        true
    }

    fn send_message(&self, message: &str) {
        println!("{message}");
    }

    fn display_name(&self) -> String {
        "console".into()
    }
}

fn main() {
    let tree = node("tp")
        .description("teleport commands")
        .parameter(Parameter::new("sub", ParameterType::String))
        .then(
            node("here")
                .alias("h")
                .description("teleport everyone to you")
                .executes(|ctx| {
                    ctx.sender().send_message("whoosh!");
                    true
                }),
        )
        .then(
            node("to")
                .description("teleport to a player")
                .parameter(Parameter::new("target", ParameterType::String))
                .parameter(Parameter::new("silent", ParameterType::Boolean).with_default("false"))
                .executes(|ctx| {
                    let target = ctx.bound(0).map(ToString::to_string).unwrap_or_default();
                    ctx.sender().send_message(&format!("teleporting to {target}"));
                    true
                }),
        )
        .build()
        .expect("static tree is well-formed");

    // Try: cargo run --example simple -- to alice
    let args: Vec<String> = std::env::args().skip(1).collect();
    let console = Console;
    let mut ctx = InvocationContext::new(&console, &KeyTranslator, "tp", args);
    if !tree.execute(&mut ctx) {
        std::process::exit(1);
    }
}
