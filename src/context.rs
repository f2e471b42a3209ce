use tracing::debug;

use crate::{config::Config, environment::{AllocationContext, FrameId}, error::LispleError, interpreter::{Evaluator, Value}, parser::parse_with_limit};


/// An evaluation context that reads expressions one at a time and evaluates
/// them against a single global frame that lives as long as the context.
///
/// Frames created by calls are released between evaluations once no closure
/// reachable from the global frame, or from the value just returned, still
/// refers to them. A closure kept by the caller past that point can no longer
/// be called and fails with [LispleError::ReleasedFrame].
pub struct EvaluationContext {
    allocations: AllocationContext,
    global: FrameId,
    config: Config,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let mut allocations = AllocationContext::new();
        let global = allocations.root();

        Self { allocations, global, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parses and evaluates one line. Parse errors leave the context untouched.
    pub fn evaluate_str(&mut self, input: &str) -> Result<Value, LispleError> {
        let sexp = parse_with_limit(input, self.config.max_parse_depth)
            .inspect_err(|err| debug!(%err, input, "parse failed"))?;
        debug!(sexp = %sexp, "parsed");

        self.evaluate_sexp(&sexp)
    }

    pub fn evaluate_sexp(&mut self, sexp: &Value) -> Result<Value, LispleError> {
        let result = Evaluator::new(&mut self.allocations, self.config.max_eval_depth)
            .eval(sexp, self.global);

        if let Err(err) = &result {
            debug!(%err, kind = err.kind(), "evaluation failed");
        }

        self.allocations.collect(self.global, result.as_ref().ok());
        result
    }

    /// The global binding of `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.allocations.lookup(self.global, name)
    }

    /// Frames currently alive, the global frame included.
    pub fn live_frames(&self) -> usize {
        self.allocations.live_frames()
    }
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_do_not_poison_the_session() {
        let mut context = EvaluationContext::new();
        assert_eq!(context.evaluate_str("(+ 1 2"), Err(LispleError::UnmatchedOpenParen));
        assert_eq!(context.evaluate_str("(+ 1 2)"), Ok(Value::Float(3.0)));
    }

    #[test]
    fn evaluation_errors_keep_earlier_definitions() {
        let mut context = EvaluationContext::new();
        context.evaluate_str("(defn f (x) (* x 2))").unwrap();
        assert!(matches!(context.evaluate_str("(f \"nope\")"), Err(LispleError::TypeMismatch(_))));
        assert!(matches!(context.evaluate_str("(f)"), Err(LispleError::Arity(_))));
        assert_eq!(context.evaluate_str("(f 21)"), Ok(Value::Float(42.0)));
    }

    #[test]
    fn call_frames_are_released_after_each_line() {
        let mut context = EvaluationContext::new();
        context.evaluate_str("(defn id (x) x)").unwrap();
        context.evaluate_str("(id (id (id 1)))").unwrap();
        assert_eq!(context.live_frames(), 1);
    }

    #[test]
    fn captured_frames_survive_while_referenced() {
        let mut context = EvaluationContext::new();
        context.evaluate_str("(defn make (n) (defn get () n))").unwrap();
        context.evaluate_str("(defn keep (g) (defn kept () (g)))").unwrap();

        // The returned closure holds `keep`'s frame, whose `g` holds `make`'s.
        // The frame of `hold` itself is unreachable.
        context.evaluate_str("(defn hold () (keep (make 7)))").unwrap();
        let kept = context.evaluate_str("(hold)").unwrap();
        assert!(matches!(kept, Value::Closure(_)));
        assert_eq!(context.live_frames(), 3);

        // Nothing global refers to those frames, so the next line frees them
        context.evaluate_str("1").unwrap();
        assert_eq!(context.live_frames(), 1);
    }

    #[test]
    fn stale_closures_fail_cleanly() {
        let mut context = EvaluationContext::new();
        context.evaluate_str("(defn make (n) (defn get () n))").unwrap();
        let get = context.evaluate_str("(make 3)").unwrap();

        // Callable while it is the latest result
        let call = Value::List(vec![get.clone()]);
        assert_eq!(context.evaluate_sexp(&call), Ok(Value::Integer(3)));

        // Released by now, since only the caller still holds it
        assert_eq!(context.evaluate_sexp(&call), Err(LispleError::ReleasedFrame));
    }

    #[test]
    fn global_lookup() {
        let mut context = EvaluationContext::new();
        assert_eq!(context.lookup("sq"), None);
        context.evaluate_str("(defn sq (x) (* x x))").unwrap();
        assert!(matches!(context.lookup("sq"), Some(Value::Closure(_))));
    }

    #[test]
    fn limits_come_from_the_config() {
        let config = Config { max_parse_depth: 2, max_eval_depth: 8 };
        let mut context = EvaluationContext::with_config(config);
        assert_eq!(context.config(), &config);

        assert_eq!(context.evaluate_str("(((1)))"), Err(LispleError::TooDeeplyNested(2)));
        context.evaluate_str("(defn spin (x) (spin x))").unwrap();
        assert_eq!(context.evaluate_str("(spin 1)"), Err(LispleError::RecursionLimit(8)));
    }
}
