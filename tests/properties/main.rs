//! Property tests for the analysis pipeline.

mod strategies;

mod bounds_tests;
mod determinism_tests;
mod privacy_tests;
