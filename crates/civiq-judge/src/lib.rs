//! civiq-judge — External answer judges and batch review.
//!
//! Implements the `AnswerJudge` trait for the Gemini API and a scripted
//! mock, loads judge configuration, and provides the `ReviewRunner` that
//! combines local grading with judge verdicts.

pub mod config;
pub mod gemini;
pub mod mock;
pub mod review;

pub use civiq_core::error::JudgeError;
pub use config::{create_judge, load_config, load_config_from, CiviqConfig, JudgeConfig};
pub use review::{AnswerSheet, ReviewConfig, ReviewRunner, Submission};
