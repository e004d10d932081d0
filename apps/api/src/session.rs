//! Cookie-backed sessions. The cookie is signed with the server key and holds
//! only the role and the id of the session's root entity.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "skilllink_session";
const SESSION_TTL_SECS: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Worker { worker_id: Uuid },
    Employer { org_id: Uuid },
}

impl Session {
    fn encode(&self) -> String {
        match self {
            Session::Worker { worker_id } => format!("worker:{worker_id}"),
            Session::Employer { org_id } => format!("employer:{org_id}"),
        }
    }

    fn decode(raw: &str) -> Option<Self> {
        let (role, id) = raw.split_once(':')?;
        let id = Uuid::parse_str(id).ok()?;
        match role {
            "worker" => Some(Session::Worker { worker_id: id }),
            "employer" => Some(Session::Employer { org_id: id }),
            _ => None,
        }
    }

    pub fn read(jar: &SignedCookieJar) -> Option<Self> {
        jar.get(SESSION_COOKIE).and_then(|c| Self::decode(c.value()))
    }

    /// Replaces whatever session the jar held.
    pub fn store(&self, jar: SignedCookieJar) -> SignedCookieJar {
        let cookie = Cookie::build((SESSION_COOKIE, self.encode()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(SESSION_TTL_SECS))
            .build();
        jar.add(cookie)
    }

    pub fn clear(jar: SignedCookieJar) -> SignedCookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }
}

fn session_from_parts(parts: &Parts, state: &AppState) -> Option<Session> {
    let jar = SignedCookieJar::from_headers(&parts.headers, state.session_key.clone());
    Session::read(&jar)
}

/// Extractor for routes that require a worker session.
#[derive(Debug, Clone, Copy)]
pub struct WorkerSession {
    pub worker_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for WorkerSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match session_from_parts(parts, state) {
            Some(Session::Worker { worker_id }) => Ok(WorkerSession { worker_id }),
            _ => Err(AppError::Unauthorized),
        }
    }
}

/// Extractor for routes that require an employer session.
#[derive(Debug, Clone, Copy)]
pub struct EmployerSession {
    pub org_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for EmployerSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match session_from_parts(parts, state) {
            Some(Session::Employer { org_id }) => Ok(EmployerSession { org_id }),
            _ => Err(AppError::Unauthorized),
        }
    }
}
