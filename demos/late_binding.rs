use lisple::EvaluationContext;

fn main() {
    // `spam` sees `eggs` once it is defined, closures share their frame
    let program = vec![
        "(defn spam () (* (eggs) 3))",
        "(spam)",
        "(defn eggs () 20)",
        "(spam)",
    ];

    let mut context = EvaluationContext::new();
    for source in program {
        match context.evaluate_str(source) {
            Ok(value) => println!("{}: {}", source, value),
            Err(err) => println!("{}: {}", source, err)
        }
    }
}
