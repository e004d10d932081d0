//! Resume: skill categorisation, ATS copy, and the downloadable document.

pub mod copywriter;
pub mod document;
pub mod handlers;
pub mod prompts;
pub mod skills;
