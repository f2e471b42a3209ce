#![no_main]

use core::fmt;

use itertools::Itertools;
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};

// Builtins and load from names
#[derive(Arbitrary, Debug)]
enum LispleAtom {
    Add, Sub, Mul, Div,

    Identifier(u8),
    Integer(i64),
    Float(f64),
    QuotedString(String),
}

impl fmt::Display for LispleAtom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LispleAtom::Add => write!(f, "+"),
            LispleAtom::Sub => write!(f, "-"),
            LispleAtom::Mul => write!(f, "*"),
            LispleAtom::Div => write!(f, "/"),
            // A small pool of names so definitions and calls meet
            LispleAtom::Identifier(identifier) => write!(f, "f{}", identifier % 8),
            LispleAtom::Integer(value) => write!(f, "{}", value),
            LispleAtom::Float(value) => write!(f, "{:?}", value),
            LispleAtom::QuotedString(value) => write!(f, "\"{}\"", value.replace('"', "")),
        }
    }
}

#[derive(Arbitrary, Debug)]
enum LispleCommand {
    Define(u8, Vec<u8>, Vec<LispleCommand>),
    Call(Vec<LispleCommand>),
    Atom(LispleAtom),
}

fn stringify_arguments(values: &[LispleCommand]) -> String {
    values.iter()
        .map(LispleCommand::to_string)
        .join(" ")
}

impl fmt::Display for LispleCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LispleCommand::Atom(atom) => write!(f, "{}", atom),
            LispleCommand::Call(args) => write!(f, "({})", stringify_arguments(args)),
            LispleCommand::Define(name, parameters, body) => write!(
                f,
                "(defn f{} ({}) {})",
                name % 8,
                parameters.iter().map(|parameter| format!("f{}", parameter % 8)).join(" "),
                stringify_arguments(body)
            ),
        }
    }
}

fuzz_target!(|commands: Vec<LispleCommand>| {
    let mut context = lisple::EvaluationContext::new();

    for command in commands {
        let command = command.to_string();
        let _ = context.evaluate_str(&command);
    }
});
