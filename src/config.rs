use tracing::warn;


pub const DEFAULT_MAX_PARSE_DEPTH: usize = 128;
pub const DEFAULT_MAX_EVAL_DEPTH: usize = 256;

pub const MAX_PARSE_DEPTH_VAR: &str = "LISPLE_MAX_PARSE_DEPTH";
pub const MAX_EVAL_DEPTH_VAR: &str = "LISPLE_MAX_EVAL_DEPTH";

/// Limits applied to every line an [crate::EvaluationContext] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// How deeply lists may nest in the source text
    pub max_parse_depth: usize,
    /// How deeply calls may nest while evaluating
    pub max_eval_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_parse_depth: DEFAULT_MAX_PARSE_DEPTH,
            max_eval_depth: DEFAULT_MAX_EVAL_DEPTH,
        }
    }
}

impl Config {
    /// Defaults, overridden by `LISPLE_MAX_PARSE_DEPTH` and
    /// `LISPLE_MAX_EVAL_DEPTH` where those are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(depth) = read_limit(&lookup, MAX_PARSE_DEPTH_VAR) { config.max_parse_depth = depth; }
        if let Some(depth) = read_limit(&lookup, MAX_EVAL_DEPTH_VAR) { config.max_eval_depth = depth; }
        config
    }
}

fn read_limit(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<usize> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(limit) => Some(limit),
        Err(err) => {
            warn!(variable = name, value = %raw, %err, "ignoring invalid limit");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars.iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn unset_variables_keep_defaults() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn variables_override_limits() {
        let config = config_from(&[(MAX_PARSE_DEPTH_VAR, "16"), (MAX_EVAL_DEPTH_VAR, " 1000 ")]);
        assert_eq!(config, Config { max_parse_depth: 16, max_eval_depth: 1000 });
    }

    #[test]
    fn invalid_values_are_ignored() {
        let config = config_from(&[(MAX_PARSE_DEPTH_VAR, "deep"), (MAX_EVAL_DEPTH_VAR, "-3")]);
        assert_eq!(config, Config::default());
    }
}
