//! Matching: scores workers against jobs through the ranking collaborator.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
