//! `ssr ngh` commands: convert between `NghJSON` and standard JSON.

use clap::Subcommand;
use ssr_hydration::ngh_json::{self, NghValue};

use crate::error::CliError;
use crate::output::Output;

#[derive(Subcommand)]
pub(crate) enum NghCommand {
    /// Decode NghJSON and print it as JSON.
    Parse {
        /// NghJSON input, e.g. `{c:[{i:0}],n:{2:bf}}`.
        input: String,
    },
    /// Encode JSON as NghJSON.
    Stringify {
        /// JSON input made of objects, arrays, strings and non-negative integers.
        json: String,
    },
}

impl NghCommand {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input can't be decoded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let text = match self {
            Self::Parse { input } => parse_to_json(&input)?,
            Self::Stringify { json } => stringify_json(&json)?,
        };
        Output::new().result(&text)?;
        Ok(())
    }
}

fn parse_to_json(input: &str) -> Result<String, CliError> {
    let value = ngh_json::parse(input)?;
    Ok(serde_json::to_string_pretty(&serde_json::Value::from(&value))?)
}

fn stringify_json(json: &str) -> Result<String, CliError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    Ok(ngh_json::stringify(&NghValue::try_from(value)?))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_to_json() {
        assert_eq!(
            parse_to_json("{a:foo,b:[1,2]}").unwrap(),
            "{\n  \"a\": \"foo\",\n  \"b\": [\n    1,\n    2\n  ]\n}"
        );
    }

    #[test]
    fn test_stringify_json() {
        assert_eq!(
            stringify_json(r#"{"n": {"3": "bf"}, "c": [{"i": 0}]}"#).unwrap(),
            "{c:[{i:0}],n:{3:bf}}"
        );
    }

    #[test]
    fn test_stringify_rejects_unsupported_values() {
        let err = stringify_json(r#"{"flag": true}"#).unwrap_err();
        assert!(matches!(err, CliError::Ngh(_)));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            stringify_json("{not json").unwrap_err(),
            CliError::Json(_)
        ));
    }
}
