use crate::{error::LispleError, interpreter::{EvaluationResult, Value}};


pub(crate) type Builtin = fn(Vec<Value>) -> EvaluationResult;

fn value_list_to_numbers(values: Vec<Value>) -> Result<Vec<f64>, LispleError> {
    // Integers are widened, results are always floating point
    values.into_iter()
        .map(|value| match value {
            Value::Integer(integer) => Ok(integer as f64),
            Value::Float(float) => Ok(float),
            other => Err(LispleError::TypeMismatch(format!("wrong atom: {}", other)))
        }).collect()
}

fn builtin_fold(values: Vec<Value>, seed: f64, f: impl Fn(f64, f64) -> f64) -> EvaluationResult {
    let values = value_list_to_numbers(values)?;
    Ok(Value::Float(values.into_iter().fold(seed, f)))
}

fn builtin_concat(values: Vec<Value>) -> EvaluationResult {
    // The joined text is no longer a literal, so it comes back as a bare symbol
    let joined = values.into_iter()
        .map(|value| match value {
            Value::QuotedString(string) => Ok(string),
            other => Err(LispleError::TypeMismatch(format!("cannot join {} to a string", other)))
        }).collect::<Result<String, LispleError>>()?;
    Ok(Value::Symbol(joined))
}

fn builtin_add(values: Vec<Value>) -> EvaluationResult {
    if values.len() > 1 && matches!(values[0], Value::QuotedString(_)) {
        return builtin_concat(values);
    }
    builtin_fold(values, 0.0, |a, b| a + b)
}

// The seed is 0, so (- 5) is -5.0 and (- 10 3) is -13.0
fn builtin_sub(values: Vec<Value>) -> EvaluationResult {
    builtin_fold(values, 0.0, |a, b| a - b)
}

fn builtin_mul(values: Vec<Value>) -> EvaluationResult {
    builtin_fold(values, 1.0, |a, b| a * b)
}

// Likewise seeded with 1, so (/ 2 4) is 0.125. Dividing by zero gives an infinity.
fn builtin_div(values: Vec<Value>) -> EvaluationResult {
    builtin_fold(values, 1.0, |a, b| a / b)
}

/// Resolves a primitive operator by its full symbol.
pub(crate) fn lookup_builtin(symbol: &str) -> Option<Builtin> {
    let builtin: Builtin = match symbol {
        "+" => builtin_add,
        "-" => builtin_sub,
        "*" => builtin_mul,
        "/" => builtin_div,
        _ => return None,
    };
    Some(builtin)
}
