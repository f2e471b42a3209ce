use core::fmt;
use std::rc::Rc;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{builtin::lookup_builtin, environment::{AllocationContext, FrameId}, error::LispleError};

pub type EvaluationResult = Result<Value, LispleError>;

/// Keyword introducing the only special form, `(defn name (params...) body...)`
pub const DEFINE_KEYWORD: &str = "defn";


/// Both the parsed expression tree and the result of evaluating one.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Symbol(String),
    QuotedString(String),
    List(Vec<Value>),
    Closure(Closure),
    /// A failure handed back as data, printed like any other result
    Error(LispleError),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(integer) => write!(f, "{}", integer),
            // Debug always keeps a fraction or exponent, so floats read back as floats
            Self::Float(float) => write!(f, "{:?}", float),
            Self::Symbol(symbol) => write!(f, "{}", symbol),
            Self::QuotedString(string) => write!(f, "{:?}", string),
            Self::List(list) => write!(f, "({})", list.iter().join(" ")),
            Self::Closure(closure) => fmt::Display::fmt(closure, f),
            Self::Error(error) => fmt::Display::fmt(error, f),
        }
    }
}

/// A function value: parameter names, an unevaluated body and the frame it
/// was defined in.
///
/// The frame is shared, not copied. Definitions made in it after the closure
/// was created are visible when the closure runs.
///
/// A closure handed back by [crate::EvaluationContext] stays callable only
/// until that context evaluates something else. If nothing bound in the
/// global frame refers to its frame by then, the frame is released and
/// calling the closure fails with [LispleError::ReleasedFrame]. Bind it with
/// `defn` to keep it around.
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    parameters: Rc<[String]>,
    body: Rc<[Value]>,
    environment: FrameId,
}

impl Closure {
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn body(&self) -> &[Value] {
        &self.body
    }

    pub fn environment(&self) -> FrameId {
        self.environment
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<closure ({}) {}>", self.parameters.iter().join(" "), self.body.iter().join(" "))
    }
}

fn is_define(head: &Value) -> bool {
    matches!(head, Value::Symbol(symbol) if symbol == DEFINE_KEYWORD)
}

fn sexp_list_to_identifiers(list: &[Value]) -> Result<Vec<String>, LispleError> {
    list.iter()
        .map(|sexp| match sexp {
            Value::Symbol(identifier) => Ok(identifier.clone()),
            other => Err(LispleError::Arity(format!("{} parameter must be a symbol, got {}", DEFINE_KEYWORD, other)))
        }).collect()
}

/// Walks expression trees against the frames of an [AllocationContext].
///
/// Every nested list being evaluated counts towards `max_depth`, which bounds
/// native stack use. Closures can only recurse forever in this language, so
/// the limit is what turns such a call into an error.
pub struct Evaluator<'c> {
    allocations: &'c mut AllocationContext,
    depth: usize,
    max_depth: usize,
}

impl<'c> Evaluator<'c> {
    pub fn new(allocations: &'c mut AllocationContext, max_depth: usize) -> Self {
        Self { allocations, depth: 0, max_depth }
    }

    pub fn eval(&mut self, sexp: &Value, environment: FrameId) -> EvaluationResult {
        match sexp {
            Value::List(list) => match list.split_first() {
                None => Ok(sexp.clone()),
                Some((head, rest)) if is_define(head) => self.eval_define(rest, environment),
                Some((head, rest)) => {
                    if self.depth >= self.max_depth { return Err(LispleError::RecursionLimit(self.max_depth)) }

                    self.depth += 1;
                    let result = self.eval_call(head, rest, environment);
                    self.depth -= 1;
                    result
                }
            },
            // Unbound symbols evaluate to themselves
            Value::Symbol(symbol) => Ok(self.allocations.lookup(environment, symbol).unwrap_or_else(|| sexp.clone())),
            Value::Integer(_)
            | Value::Float(_)
            | Value::QuotedString(_)
            | Value::Closure(_)
            | Value::Error(_) => Ok(sexp.clone()),
        }
    }

    fn eval_call(&mut self, operator: &Value, operands: &[Value], environment: FrameId) -> EvaluationResult {
        // Operator first, then the operands strictly left to right
        let operator = self.eval(operator, environment)?;
        let arguments = operands.iter()
            .map(|operand| self.eval(operand, environment))
            .collect::<Result<Vec<Value>, LispleError>>()?;

        self.apply(operator, arguments)
    }

    fn eval_define(&mut self, list: &[Value], environment: FrameId) -> EvaluationResult {
        // (defn name (params...) body...) binds a closure over the current frame
        // in that same frame, and evaluates to the closure
        let [name, parameters, body @ ..] = list else {
            return Err(LispleError::Arity(format!("argument too less for {}", DEFINE_KEYWORD)));
        };
        if body.is_empty() { return Err(LispleError::Arity(format!("argument too less for {}", DEFINE_KEYWORD))); }

        let name = match name {
            Value::Symbol(name) => name,
            other => return Err(LispleError::Arity(format!("{} name must be a symbol, got {}", DEFINE_KEYWORD, other)))
        };
        let parameters = match parameters {
            Value::List(parameters) => sexp_list_to_identifiers(parameters)?,
            other => return Err(LispleError::Arity(format!("{} parameters must be a list, got {}", DEFINE_KEYWORD, other)))
        };

        let closure = Value::Closure(Closure {
            parameters: parameters.into(),
            body: body.into(),
            environment,
        });

        debug!(name = %name, "defining closure");
        self.allocations.define(environment, name.as_str(), closure.clone())?;
        Ok(closure)
    }

    /// Calls `operator` with already evaluated `arguments`.
    ///
    /// Anything that is neither a primitive operator nor a closure gives an
    /// [LispleError::UnknownOperator] back as a value rather than failing.
    pub fn apply(&mut self, operator: Value, arguments: Vec<Value>) -> EvaluationResult {
        trace!(operator = %operator, arguments = arguments.len(), "applying");

        match operator {
            Value::Symbol(symbol) => match lookup_builtin(&symbol) {
                Some(builtin) => builtin(arguments),
                None => Ok(Value::Error(LispleError::UnknownOperator(symbol))),
            },
            Value::Closure(closure) => {
                let frame = self.allocations.extend(closure.environment, &closure.parameters, arguments)?;
                self.eval_sequence(&closure.body, frame)
            },
            other @ (Value::Integer(_)
                | Value::Float(_)
                | Value::QuotedString(_)
                | Value::List(_)
                | Value::Error(_)) => Ok(Value::Error(LispleError::UnknownOperator(other.to_string()))),
        }
    }

    /// Evaluates `body` in order and returns the value of the last expression.
    pub fn eval_sequence(&mut self, body: &[Value], environment: FrameId) -> EvaluationResult {
        let (last, init) = body.split_last()
            .ok_or_else(|| LispleError::Arity("function body must have at least one expression".to_owned()))?;

        for sexp in init {
            self.eval(sexp, environment)?;
        }
        self.eval(last, environment)
    }
}
