//! Configuration loading and parsing
//!
//! Rules can be declared in a TOML file instead of using the built-in sample
//! aspect. Each rule names a pointcut and the message each advice prints.

use anyhow::{Context, Result};
use aspect_weaver::WeaverConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main application configuration (loaded from rules.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub weaver: WeaverConfig,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleConfig {
    pub name: String,
    pub pointcut: String,
    /// Message printed before the matched operation
    pub before: Option<String>,
    /// Message printed after the matched operation returns successfully
    pub after_returning: Option<String>,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if config.rules.is_empty() {
        log::warn!("Config file {:?} declares no rules", path);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [weaver]
            trace_join_points = true

            [[rules]]
            name = "point"
            pointcut = "execution(* com.limpoxe.aoptest.MainActivity.doSomething(..))"
            before = "[pointBefore]..."
            after_returning = "[pointAfter]..."

            [[rules]]
            name = "audit"
            pointcut = "execution(* com.limpoxe.aoptest.MainActivity.doSomethingElse())"
            before = "[audit]..."
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert!(config.weaver.enabled);
        assert!(config.weaver.trace_join_points);
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[0].after_returning.as_deref(), Some("[pointAfter]..."));
        assert_eq!(config.rules[1].after_returning, None);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.weaver, WeaverConfig::default());
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[rules]]\nname = \"point\"\npointcut = \"execution(* a.B.c(..))\"\nbefore = \"hi\""
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.rules[0].name, "point");
        assert_eq!(config.rules[0].before.as_deref(), Some("hi"));
    }

    #[test]
    fn test_load_config_errors() {
        let missing = load_config(Path::new("/nonexistent/rules.toml")).unwrap_err();
        assert!(missing.to_string().contains("Failed to read config file"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[rules]]\nname = 3").unwrap();
        let invalid = load_config(file.path()).unwrap_err();
        assert!(invalid.to_string().contains("Failed to parse config file"));
    }
}
