//! survey-lens: Survey Analysis Library
//!
//! A library for cleaning and one-hot encoding survey responses, computing
//! correlation structure, and ranking features with a logistic regression.

pub mod charts;
pub mod cli;
pub mod pipeline;
pub mod report;
pub mod stages;
pub mod utils;
