use serde::Serialize;

use crate::models::worker::WorkerProfile;

/// Where a worker is in the intake flow. Derived from the stored profile,
/// never stored itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeState {
    /// No session or no profile behind it.
    Anonymous,
    /// Phone number accepted, nothing said yet.
    Identified,
    Chatting,
    /// Terminal. Further chat is allowed and does not leave this state.
    Complete,
}

impl IntakeState {
    pub fn of(profile: Option<&WorkerProfile>) -> Self {
        match profile {
            None => IntakeState::Anonymous,
            Some(p) if p.resume_complete() => IntakeState::Complete,
            Some(p) if p.transcript.is_empty() => IntakeState::Identified,
            Some(_) => IntakeState::Chatting,
        }
    }
}
