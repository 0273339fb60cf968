pub mod check;
pub mod grade;
pub mod init;
pub mod list;
pub mod parse;
pub mod validate;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use civiq_core::model::ReviewMode;
use civiq_judge::config::{create_judge, load_config_from};
use civiq_judge::{ReviewConfig, ReviewRunner};

/// Build a review runner from config, with `--mode` taking precedence over
/// the configured review mode. The judge is only constructed when needed.
pub fn build_runner(
    mode: Option<&str>,
    config_path: Option<&Path>,
) -> Result<(ReviewRunner, ReviewMode)> {
    let config = load_config_from(config_path)?;

    let mode = match mode {
        Some(m) => m.parse::<ReviewMode>().map_err(|e| anyhow::anyhow!(e))?,
        None => config.review_mode,
    };

    let judge = match (&config.judge, mode) {
        (_, ReviewMode::Local) | (None, _) => None,
        (Some(judge_config), _) => {
            tracing::debug!("using judge {judge_config:?}");
            Some(Arc::from(create_judge(judge_config)?))
        }
    };

    let review_config = ReviewConfig {
        parallelism: config.parallelism,
        max_retries: config.max_retries,
        retry_delay: Duration::from_millis(config.retry_delay_ms),
    };

    Ok((ReviewRunner::new(judge, review_config), mode))
}
