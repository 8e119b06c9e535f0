//! Fmt command - reformat JSON text.

use anyhow::Result;
use clap::Args;
use hostjson::{parse, stringify};
use hostjson_vm::{NativeContext, Realm, Value};
use std::path::PathBuf;

use crate::config::Config;

#[derive(Args, Default)]
pub struct FmtCommand {
    /// Input file (`-` or omitted reads stdin)
    pub file: Option<PathBuf>,

    /// Indent with N spaces (clamped to 10)
    #[arg(long, value_name = "N")]
    pub indent: Option<u32>,

    /// Indent with this string (first 10 characters)
    #[arg(long, value_name = "STR", conflicts_with = "indent")]
    pub indent_str: Option<String>,

    /// Only keep these object keys, in this order
    #[arg(long, value_name = "KEY", value_delimiter = ',')]
    pub keys: Option<Vec<String>>,

    /// Drop null object members
    #[arg(long)]
    pub drop_nulls: bool,
}

impl FmtCommand {
    pub fn run(&self, config: &Config) -> Result<()> {
        let input = super::read_input(self.file.as_deref())?;
        println!("{}", self.format(&input, config)?);
        Ok(())
    }

    /// Parse `input` and serialize it again with the effective options
    pub fn format(&self, input: &str, config: &Config) -> Result<String> {
        let mut ncx = NativeContext::new(Realm::new());

        let reviver = if self.drop_nulls || config.parse.drop_nulls {
            ncx.realm().new_function("dropNulls", 2, |_, args, _| {
                Ok(if args[1].is_null() {
                    Value::undefined()
                } else {
                    args[1].clone()
                })
            })
        } else {
            Value::undefined()
        };
        let value = parse(&mut ncx, &Value::string(input), &reviver)?;

        let replacer = match self.keys.as_ref().or(config.format.keys.as_ref()) {
            Some(keys) => {
                let list = ncx.realm().new_array();
                for key in keys {
                    list.array_push(Value::string(key));
                }
                Value::object(list)
            }
            None => Value::undefined(),
        };

        let space = self.space(config);
        tracing::debug!(?space, "formatting");

        stringify(&mut ncx, &value, &replacer, &space)?
            .ok_or_else(|| anyhow::anyhow!("Input has no JSON representation"))
    }

    /// Flags win over the config file; an indent string wins over a width
    fn space(&self, config: &Config) -> Value {
        if let Some(s) = &self.indent_str {
            return Value::string(s);
        }
        if let Some(n) = self.indent {
            return Value::number(n as f64);
        }
        if let Some(s) = &config.format.indent_str {
            return Value::string(s);
        }
        config
            .format
            .indent
            .map_or_else(Value::undefined, |n| Value::number(n as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FormatConfig, ParseConfig};

    #[test]
    fn test_compact_by_default() {
        let cmd = FmtCommand::default();
        let out = cmd.format("{ \"a\" : [1, 2.50] }", &Config::default()).unwrap();
        assert_eq!(out, r#"{"a":[1,2.5]}"#);
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config {
            format: FormatConfig {
                indent: None,
                indent_str: Some("\t".to_string()),
                keys: Some(vec!["b".to_string()]),
            },
            parse: ParseConfig::default(),
        };
        let cmd = FmtCommand {
            indent: Some(2),
            keys: Some(vec!["a".to_string()]),
            ..FmtCommand::default()
        };
        let out = cmd.format(r#"{"a":1,"b":2}"#, &config).unwrap();
        assert_eq!(out, "{\n  \"a\": 1\n}");

        let out = FmtCommand::default().format(r#"{"a":1,"b":2}"#, &config).unwrap();
        assert_eq!(out, "{\n\t\"b\": 2\n}");
    }

    #[test]
    fn test_drop_nulls() {
        let cmd = FmtCommand {
            drop_nulls: true,
            ..FmtCommand::default()
        };
        let out = cmd
            .format(r#"{"a":null,"b":{"c":null,"d":0}}"#, &Config::default())
            .unwrap();
        assert_eq!(out, r#"{"b":{"d":0}}"#);
        assert!(cmd.format("null", &Config::default()).is_err());
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        let err = FmtCommand::default()
            .format("{", &Config::default())
            .unwrap_err();
        assert!(err.to_string().starts_with("JSON.parse:"));
    }
}
