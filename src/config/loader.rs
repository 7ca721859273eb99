// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use crate::errors::ConfigError;
use crate::value::Value;

/// A cookbook file: step templates derived from registered ones, and
/// pipeline templates built from specifiers.
///
/// Entries are registered in file order, so a later entry may refer to an
/// earlier one.
///
/// # Example
/// ```yaml
/// steps:
///   - name: latin1_bytes
///     from: str_to_bytes
///     args: latin1
///   - name: spaced_hex
///     from: bytes_to_hex
///     args: [" ", 2]
///     kwargs:
///       upper: true
/// pipelines:
///   - name: fingerprint
///     steps:
///       - [str_to_bytes, utf8]
///       - sha256
///       - spaced_hex
///   - name: seal
///     steps:
///       - str_to_bytes
///       - [aead_encrypt, null, { key: !hex "000102030405060708090a0b0c0d0e0f" }]
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct CookbookConfig {
    #[serde(default)]
    pub steps: Vec<StepConfig>,
    #[serde(default)]
    pub pipelines: Vec<PipelineConfig>,
}

/// A new step template: a registered step with overrides under a new name.
///
/// `args` is either a single scalar (normalized to one argument) or a
/// sequence, and replaces the base step's positional arguments. `kwargs` are
/// merged into the base step's named arguments.
#[derive(Debug, Deserialize)]
pub struct StepConfig {
    pub name: String,
    pub from: String,
    #[serde(default)]
    pub args: Option<serde_yaml::Value>,
    #[serde(default)]
    pub kwargs: Option<BTreeMap<String, serde_yaml::Value>>,
}

/// A pipeline template. Each entry of `steps` is a step name or a
/// `[name, args?, kwargs?]` sequence.
#[derive(Debug, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<serde_yaml::Value>,
}

/// Load a cookbook from a YAML (`.yaml`, `.yml`) or TOML (`.toml`) file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CookbookConfig, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "yaml" | "yml" => parse_yaml(&fs::read_to_string(path)?),
        "toml" => parse_toml(&fs::read_to_string(path)?),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

pub fn parse_yaml(content: &str) -> Result<CookbookConfig, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}

pub fn parse_toml(content: &str) -> Result<CookbookConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Convert a document value into a pipeline value.
///
/// `!hex "…"` and `!base64 "…"` tagged strings become bytes, which is how
/// keys, salts and nonces are written in a cookbook. Mapping keys must be
/// strings.
pub fn value_from_yaml(value: serde_yaml::Value) -> Result<Value, ConfigError> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().ok_or_else(|| {
                ConfigError::InvalidValue("number out of range".to_string())
            })?),
        },
        Yaml::String(s) => Value::Text(s),
        Yaml::Sequence(items) => Value::List(
            items
                .into_iter()
                .map(value_from_yaml)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Yaml::Mapping(entries) => {
            let mut map = BTreeMap::new();
            for (key, value) in entries {
                let key = match key {
                    Yaml::String(key) => key,
                    other => {
                        return Err(ConfigError::InvalidValue(format!(
                            "mapping keys must be strings, found {}",
                            yaml_kind(&other)
                        )))
                    }
                };
                map.insert(key, value_from_yaml(value)?);
            }
            Value::Map(map)
        }
        Yaml::Tagged(tagged) => {
            let text = match tagged.value {
                Yaml::String(text) => text,
                other => {
                    return Err(ConfigError::InvalidValue(format!(
                        "tag {} expects a string, found {}",
                        tagged.tag,
                        yaml_kind(&other)
                    )))
                }
            };
            if tagged.tag == "hex" {
                Value::Bytes(hex::decode(text.trim()).map_err(|_| {
                    ConfigError::InvalidValue("!hex value is not valid hex".to_string())
                })?)
            } else if tagged.tag == "base64" {
                Value::Bytes(STANDARD.decode(text.trim()).map_err(|_| {
                    ConfigError::InvalidValue("!base64 value is not valid base64".to_string())
                })?)
            } else {
                return Err(ConfigError::InvalidValue(format!(
                    "unsupported tag {}",
                    tagged.tag
                )));
            }
        }
    })
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "bool",
        Yaml::Number(_) => "number",
        Yaml::String(_) => "string",
        Yaml::Sequence(_) => "sequence",
        Yaml::Mapping(_) => "mapping",
        Yaml::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_cookbook() {
        let yaml = r#"
steps:
  - name: latin1_bytes
    from: str_to_bytes
    args: latin1
  - name: spaced_hex
    from: bytes_to_hex
    args: [" ", 2]
    kwargs:
      upper: true
pipelines:
  - name: fingerprint
    steps:
      - [str_to_bytes, utf8]
      - sha256
      - spaced_hex
"#;

        let cfg = parse_yaml(yaml).unwrap();
        assert_eq!(cfg.steps.len(), 2);
        assert_eq!(cfg.steps[0].from, "str_to_bytes");
        assert!(cfg.steps[0].kwargs.is_none());
        assert_eq!(cfg.steps[1].kwargs.as_ref().unwrap().len(), 1);
        assert_eq!(cfg.pipelines.len(), 1);
        assert_eq!(cfg.pipelines[0].steps.len(), 3);
    }

    #[test]
    fn test_parse_toml_cookbook() {
        let toml = r#"
[[steps]]
name = "latin1_bytes"
from = "str_to_bytes"
args = "latin1"

[[pipelines]]
name = "b64"
steps = [["str_to_bytes", "utf8"], "bytes_to_b64"]
"#;

        let cfg = parse_toml(toml).unwrap();
        assert_eq!(cfg.steps[0].name, "latin1_bytes");
        assert_eq!(
            value_from_yaml(cfg.pipelines[0].steps[0].clone()).unwrap(),
            Value::List(vec![Value::from("str_to_bytes"), Value::from("utf8")])
        );
    }

    #[test]
    fn test_empty_document_is_empty_cookbook() {
        let cfg = parse_yaml("{}").unwrap();
        assert!(cfg.steps.is_empty());
        assert!(cfg.pipelines.is_empty());
    }

    #[test]
    fn test_value_from_yaml_table_driven() {
        struct TestCase {
            name: &'static str,
            yaml: &'static str,
            expected: Value,
        }

        let test_cases = vec![
            TestCase {
                name: "integer",
                yaml: "42",
                expected: Value::Int(42),
            },
            TestCase {
                name: "float",
                yaml: "1.5",
                expected: Value::Float(1.5),
            },
            TestCase {
                name: "null",
                yaml: "~",
                expected: Value::Null,
            },
            TestCase {
                name: "hex tag",
                yaml: "!hex \"00ff10\"",
                expected: Value::Bytes(vec![0x00, 0xff, 0x10]),
            },
            TestCase {
                name: "base64 tag",
                yaml: "!base64 \"ZGF0YQ==\"",
                expected: Value::Bytes(b"data".to_vec()),
            },
            TestCase {
                name: "nested sequence",
                yaml: "[a, [1, true]]",
                expected: Value::List(vec![
                    Value::from("a"),
                    Value::List(vec![Value::Int(1), Value::Bool(true)]),
                ]),
            },
        ];

        for test_case in test_cases {
            let yaml: serde_yaml::Value = serde_yaml::from_str(test_case.yaml).unwrap();
            assert_eq!(
                value_from_yaml(yaml).unwrap(),
                test_case.expected,
                "Test case '{}'",
                test_case.name
            );
        }
    }

    #[test]
    fn test_value_from_yaml_rejections() {
        for (name, yaml) in [
            ("bad hex", "!hex \"zz\""),
            ("bad base64", "!base64 \"***\""),
            ("unknown tag", "!rot13 \"abc\""),
            ("tag on a number", "!hex 12"),
            ("non-string key", "{1: a}"),
        ] {
            let yaml: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
            assert!(
                matches!(value_from_yaml(yaml), Err(ConfigError::InvalidValue(_))),
                "Test case '{}'",
                name
            );
        }
    }

    #[test]
    fn test_load_config_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("cookbook.yml");
        std::fs::write(&yaml_path, "pipelines:\n  - name: p\n    steps: [sha256]\n").unwrap();
        assert_eq!(load_config(&yaml_path).unwrap().pipelines[0].name, "p");

        let toml_path = dir.path().join("cookbook.toml");
        std::fs::write(&toml_path, "[[pipelines]]\nname = \"q\"\nsteps = [\"sha512\"]\n").unwrap();
        assert_eq!(load_config(&toml_path).unwrap().pipelines[0].name, "q");

        let json_path = dir.path().join("cookbook.json");
        std::fs::write(&json_path, "{}").unwrap();
        assert!(matches!(
            load_config(&json_path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_config_reports_io_and_parse_errors() {
        assert!(matches!(
            load_config("/nonexistent/cookbook.yaml"),
            Err(ConfigError::Io(_))
        ));

        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"steps: [unclosed").unwrap();
        assert!(matches!(load_config(file.path()), Err(ConfigError::Yaml(_))));
    }
}
