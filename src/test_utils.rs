use std::{io::BufRead, path::PathBuf};

use anyhow::bail;
use itertools::Itertools;
use serde::{de::{Visitor, Error}, Deserialize};


/// Expected outcome of one line: the printed value, or the kind of error.
#[derive(Debug, Clone)]
pub struct ExpectedResult(Result<String, String>);

impl From<ExpectedResult> for Result<String, String> {
    fn from(value: ExpectedResult) -> Self {
        value.0
    }
}

struct ExpectedResultVisitor {}

impl<'de> Deserialize<'de> for ExpectedResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de> {

        deserializer.deserialize_map(ExpectedResultVisitor {})
    }
}

impl<'de> Visitor<'de> for ExpectedResultVisitor {
    type Value = ExpectedResult;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "A structure containing the boolean key 'ok'. If it's okay, contains the key 'output', otherwise the key 'type'")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::MapAccess<'de>, {

        if map.next_key::<String>()? != Some("ok".to_owned()) {
            return Err(A::Error::custom("First key should be 'ok'"))
        }

        let ok: bool = map.next_value()?;
        let second_key = if ok { "output" } else { "type" };
        if map.next_key::<String>()?.as_deref()
            .ok_or(A::Error::custom("Must have two keys"))? != second_key
        {
            return Err(A::Error::custom(format!("Second key should be '{}'", second_key)))
        }

        let value: String = map.next_value()?;
        if map.next_key::<String>()?.is_some() {
            return Err(A::Error::custom("Only two keys should be present"));
        }

        Ok(ExpectedResult(if ok { Ok(value) } else { Err(value) }))
    }
}

fn base_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn load_input_file(testcase: usize) -> anyhow::Result<Vec<String>> {
    let source = std::fs::read(base_path().join("test_inputs").join(format!("{}.lisp", testcase)))?;
    Ok(source.as_slice().lines().collect::<Result<Vec<String>, _>>()?)
}

fn load_output_file(testcase: usize) -> anyhow::Result<Vec<ExpectedResult>> {
    let source = std::fs::read(base_path().join("test_outputs").join(format!("{}.json", testcase)))?;
    let result: Vec<ExpectedResult> = serde_json::from_slice(&source)?;
    Ok(result)
}

pub fn load_test_pair(testcase: usize) -> anyhow::Result<Vec<(String, ExpectedResult)>> {
    let input = load_input_file(testcase)?;
    let output = load_output_file(testcase)?;

    if input.len() != output.len() { bail!("Input and output of testcase {} does not match", testcase); }
    Ok(input.into_iter().zip(output).collect_vec())
}

/// Every numbered session under `test_inputs/`, in order.
pub fn all_testcases() -> anyhow::Result<Vec<usize>> {
    let mut testcases = vec![];
    for entry in std::fs::read_dir(base_path().join("test_inputs"))? {
        let path = entry?.path();
        if path.extension().is_some_and(|extension| extension == "lisp") {
            if let Some(testcase) = path.file_stem().and_then(|stem| stem.to_str()).and_then(|stem| stem.parse().ok()) {
                testcases.push(testcase);
            }
        }
    }

    if testcases.is_empty() { bail!("No testcases found"); }
    Ok(testcases.into_iter().sorted().collect_vec())
}
