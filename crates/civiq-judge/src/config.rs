//! Judge configuration and factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use civiq_core::model::ReviewMode;
use civiq_core::traits::AnswerJudge;

use crate::gemini::GeminiJudge;
use crate::mock::MockJudge;

/// Configuration for the external judge.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JudgeConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    /// Always replies with `reply`. Useful for dry runs.
    Mock {
        #[serde(default = "default_mock_reply")]
        reply: String,
    },
}

impl std::fmt::Debug for JudgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JudgeConfig::Gemini {
                api_key: _,
                base_url,
                model,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
            JudgeConfig::Mock { reply } => f.debug_struct("Mock").field("reply", reply).finish(),
        }
    }
}

fn default_mock_reply() -> String {
    "Correct".to_string()
}

/// Top-level civiq configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiviqConfig {
    /// External judge, if any.
    #[serde(default)]
    pub judge: Option<JudgeConfig>,
    /// Default routing of answers to the judge.
    #[serde(default)]
    pub review_mode: ReviewMode,
    /// Max concurrent judge calls.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Max retries on transient judge errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

fn default_parallelism() -> usize {
    4
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}

impl Default for CiviqConfig {
    fn default() -> Self {
        Self {
            judge: None,
            review_mode: ReviewMode::default(),
            parallelism: default_parallelism(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    // Substituted values are copied verbatim and never rescanned.
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_judge_config(config: &JudgeConfig) -> JudgeConfig {
    match config {
        JudgeConfig::Gemini {
            api_key,
            base_url,
            model,
        } => JudgeConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_deref().map(resolve_env_vars),
            model: model.as_deref().map(resolve_env_vars),
        },
        JudgeConfig::Mock { reply } => JudgeConfig::Mock {
            reply: reply.clone(),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `civiq.toml` in the current directory
/// 2. `~/.config/civiq/config.toml`
///
/// Environment variable override: `CIVIQ_GEMINI_KEY`.
pub fn load_config() -> Result<CiviqConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<CiviqConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("civiq.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => CiviqConfig::default(),
    };

    if let Ok(key) = std::env::var("CIVIQ_GEMINI_KEY") {
        apply_gemini_key(&mut config, key);
    }

    config.judge = config.judge.as_ref().map(resolve_judge_config);

    Ok(config)
}

/// Parse a TOML config string (useful for testing).
pub fn parse_config_str(content: &str) -> Result<CiviqConfig> {
    let config: CiviqConfig = toml::from_str(content)?;
    anyhow::ensure!(config.parallelism >= 1, "parallelism must be at least 1");
    Ok(config)
}

fn apply_gemini_key(config: &mut CiviqConfig, key: String) {
    match &mut config.judge {
        Some(JudgeConfig::Gemini { api_key, .. }) => *api_key = key,
        Some(JudgeConfig::Mock { .. }) => {}
        None => {
            config.judge = Some(JudgeConfig::Gemini {
                api_key: key,
                base_url: None,
                model: None,
            })
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("civiq"))
}

/// Create a judge instance from its configuration.
pub fn create_judge(config: &JudgeConfig) -> Result<Box<dyn AnswerJudge>> {
    match config {
        JudgeConfig::Gemini {
            api_key,
            base_url,
            model,
        } => {
            anyhow::ensure!(
                !api_key.is_empty(),
                "gemini judge has no API key; set CIVIQ_GEMINI_KEY or judge.api_key"
            );
            Ok(Box::new(GeminiJudge::new(
                api_key,
                base_url.clone(),
                model.clone(),
            )?))
        }
        JudgeConfig::Mock { reply } => Ok(Box::new(MockJudge::with_fixed_reply(reply))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_CIVIQ_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_CIVIQ_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_CIVIQ_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        assert_eq!(resolve_env_vars("a${_CIVIQ_TEST_VAR}b${x"), "ahellob${x");
        std::env::remove_var("_CIVIQ_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_values() {
        std::env::set_var("_CIVIQ_SELF_REF", "${_CIVIQ_SELF_REF}");
        std::env::set_var("_CIVIQ_BRACED", "key}with${brace}");
        assert_eq!(resolve_env_vars("${_CIVIQ_SELF_REF}"), "${_CIVIQ_SELF_REF}");
        assert_eq!(
            resolve_env_vars("${_CIVIQ_BRACED}-${_CIVIQ_BRACED}"),
            "key}with${brace}-key}with${brace}"
        );
        std::env::remove_var("_CIVIQ_SELF_REF");
        std::env::remove_var("_CIVIQ_BRACED");
    }

    #[test]
    fn default_config() {
        let config = CiviqConfig::default();
        assert!(config.judge.is_none());
        assert_eq!(config.review_mode, ReviewMode::Local);
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn parse_judge_config() {
        let toml_str = r#"
review_mode = "fallback"
parallelism = 2

[judge]
type = "gemini"
api_key = "sk-test"
model = "gemini-2.5-flash"
"#;
        let config = parse_config_str(toml_str).unwrap();
        assert_eq!(config.review_mode, ReviewMode::Fallback);
        assert_eq!(config.parallelism, 2);
        assert!(matches!(
            config.judge,
            Some(JudgeConfig::Gemini { ref model, .. }) if model.as_deref() == Some("gemini-2.5-flash")
        ));
    }

    #[test]
    fn zero_parallelism_is_rejected() {
        assert!(parse_config_str("parallelism = 0").is_err());
    }

    #[test]
    fn debug_masks_api_key() {
        let config = JudgeConfig::Gemini {
            api_key: "super-secret".into(),
            base_url: None,
            model: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn gemini_key_override_creates_judge() {
        let mut config = CiviqConfig::default();
        apply_gemini_key(&mut config, "from-env".into());
        assert!(matches!(
            config.judge,
            Some(JudgeConfig::Gemini { ref api_key, .. }) if api_key == "from-env"
        ));
    }

    #[test]
    fn load_explicit_missing_path() {
        let err = load_config_from(Some(Path::new("/nonexistent/civiq.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("civiq.toml");
        std::fs::write(&path, "[judge]\ntype = \"mock\"\nreply = \"Incorrect\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert!(matches!(
            config.judge,
            Some(JudgeConfig::Mock { ref reply }) if reply == "Incorrect"
        ));
    }

    #[test]
    fn create_gemini_requires_key() {
        let config = JudgeConfig::Gemini {
            api_key: String::new(),
            base_url: None,
            model: None,
        };
        assert!(create_judge(&config).is_err());
    }

    #[test]
    fn create_mock_judge() {
        let judge = create_judge(&JudgeConfig::Mock {
            reply: "Correct".into(),
        })
        .unwrap();
        assert_eq!(judge.name(), "mock");
    }
}
