//! An interpreter for a small S-expression language.
//!
//! Each input holds exactly one expression. Numbers, quoted strings and
//! symbols are the atoms, `(defn name (params...) body...)` defines a function,
//! and `+ - * /` are the only built in operators. Symbols that are not bound
//! evaluate to themselves.
//!
//! ```
//! use lisple::EvaluationContext;
//!
//! let mut context = EvaluationContext::new();
//! context.evaluate_str("(defn add (x y) (+ x y))").unwrap();
//! assert_eq!(context.evaluate_str("(add 3 4)").unwrap().to_string(), "7.0");
//! ```

mod builtin;
mod config;
mod context;
mod environment;
mod error;
mod interpreter;
mod parser;

#[cfg(test)]
mod test_utils;

pub use config::{Config, DEFAULT_MAX_EVAL_DEPTH, DEFAULT_MAX_PARSE_DEPTH, MAX_EVAL_DEPTH_VAR, MAX_PARSE_DEPTH_VAR};
pub use context::EvaluationContext;
pub use environment::{AllocationContext, FrameId};
pub use error::LispleError;
pub use interpreter::{Closure, EvaluationResult, Evaluator, Value, DEFINE_KEYWORD};
pub use parser::{next_token, parse, parse_with_limit, Atom, Token};
