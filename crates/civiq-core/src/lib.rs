//! civiq-core — Question-bank parser and answer-grading engine.
//!
//! This crate defines the question and result data model, the parser that
//! builds a bank from the printed civics test, the pure grading engine, and
//! the seam through which an external judge can be plugged in by callers.

pub mod bank;
pub mod error;
pub mod grader;
pub mod model;
pub mod parser;
pub mod report;
pub mod traits;

pub use bank::QuestionBank;
pub use grader::grade;
pub use model::{GradeResult, GradingPolicy, QuestionRecord, ReviewMode, Verdict};
