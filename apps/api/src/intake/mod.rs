//! Conversational Intake: drives a worker from first message to a structured
//! profile. The collaborator decides when gathering is done; extraction then
//! merges whatever it recovered into the stored profile.

pub mod assistant;
pub mod extraction;
pub mod handlers;
pub mod prompts;
pub mod state;
