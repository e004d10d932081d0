//! Matching Orchestrator: reduces one subject and many postings to the
//! scoring request, sends it to the ranking collaborator, and turns the reply
//! into at most ten results ordered by score.
//!
//! Any collaborator failure yields an empty list. Callers cannot (and must
//! not try to) tell that apart from "nothing matched".

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{generate_json, GenerationRequest, LanguageModel, ModelTier};
use crate::matching::prompts::matching_prompt;
use crate::models::job::JobPosting;
use crate::models::worker::WorkerProfile;

pub const MAX_MATCHES: usize = 10;

/// The only worker fields the ranking collaborator sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectSummary {
    pub trade: Option<String>,
    pub experience_years: Option<i32>,
    pub skills: Vec<String>,
    pub location: Option<String>,
}

impl SubjectSummary {
    pub fn of_worker(worker: &WorkerProfile) -> Self {
        Self {
            trade: worker.trade.clone(),
            experience_years: worker.experience_years,
            skills: worker.skills.clone(),
            location: worker.location.clone(),
        }
    }

    fn render(&self) -> String {
        format!(
            "Worker Profile:\n- Trade: {}\n- Experience: {} years\n- Skills: {}\n- Location: {}",
            self.trade.as_deref().unwrap_or("N/A"),
            self.experience_years.unwrap_or(0),
            self.skills.join(", "),
            self.location.as_deref().unwrap_or("N/A"),
        )
    }
}

/// The only posting fields the ranking collaborator sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSummary {
    #[serde(rename = "job_id")]
    pub id: Uuid,
    pub title: String,
    pub trade: String,
    pub required_skills: Vec<String>,
    pub experience_required: i32,
    pub location: String,
    pub salary_min: f64,
    pub salary_max: f64,
}

impl CandidateSummary {
    pub fn of_job(job: &JobPosting) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            trade: job.trade.clone(),
            required_skills: job.required_skills.clone(),
            experience_required: job.experience_required,
            location: job.location.clone(),
            salary_min: job.salary_min,
            salary_max: job.salary_max,
        }
    }
}

/// One scored pairing. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub job_id: Uuid,
    pub score: f64,
    pub reasoning: String,
}

/// Stable sort, highest score first. Equal scores keep their input order.
pub fn sort_by_score_desc<T>(items: &mut [T], score: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| score(b).total_cmp(&score(a)));
}

fn parse_score(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    score.is_finite().then_some(score)
}

fn parse_id(value: &Value) -> Option<Uuid> {
    match value {
        Value::String(s) => Uuid::parse_str(s.trim()).ok(),
        _ => None,
    }
}

/// Reads the collaborator reply. Entries that are malformed, duplicated, or
/// name an id outside `known` are dropped silently.
fn parse_matches(value: &Value, known: &HashSet<Uuid>) -> Vec<MatchResult> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        // Some replies wrap the array in an object.
        Value::Object(obj) => match obj.get("matches").and_then(Value::as_array) {
            Some(items) => items.as_slice(),
            None => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let job_id = obj.get("job_id").and_then(parse_id)?;
            let score = obj.get("score").and_then(parse_score)?;
            if !known.contains(&job_id) {
                debug!(%job_id, "Dropping match for unknown job id");
                return None;
            }
            if !seen.insert(job_id) {
                return None;
            }
            let reasoning = obj
                .get("reasoning")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_string();
            Some(MatchResult {
                job_id,
                score,
                reasoning,
            })
        })
        .collect()
}

/// Scores `candidates` for one subject. At most [`MAX_MATCHES`] results,
/// descending by score, each naming one of the candidates.
pub async fn score(
    llm: &dyn LanguageModel,
    subject: &SubjectSummary,
    candidates: &[CandidateSummary],
) -> Vec<MatchResult> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let jobs_json = match serde_json::to_string_pretty(candidates) {
        Ok(json) => json,
        Err(e) => {
            warn!("Could not serialize match candidates: {e}");
            return Vec::new();
        }
    };

    let request = GenerationRequest::prompt(ModelTier::Pro, matching_prompt(&subject.render(), &jobs_json))
        .with_system(JSON_ONLY_SYSTEM);

    let reply = match generate_json::<Value>(llm, request).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Job matching call failed: {e}");
            return Vec::new();
        }
    };

    let known: HashSet<Uuid> = candidates.iter().map(|c| c.id).collect();
    let mut results = parse_matches(&reply, &known);
    sort_by_score_desc(&mut results, |m| m.score);
    results.truncate(MAX_MATCHES);
    results
}

/// Pairs results with their postings by exact id. Results with no posting
/// produce no row.
pub fn join_jobs<'a>(results: Vec<MatchResult>, jobs: &'a [JobPosting]) -> Vec<(&'a JobPosting, MatchResult)> {
    results
        .into_iter()
        .filter_map(|result| {
            let job = jobs.iter().find(|job| job.id == result.job_id)?;
            Some((job, result))
        })
        .collect()
}

/// A worker ranked against one job.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerMatch {
    pub worker_id: Uuid,
    pub name: Option<String>,
    pub trade: Option<String>,
    pub experience_years: Option<i32>,
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub match_score: f64,
    pub match_reasoning: String,
}

/// Ranks `workers` for one job: one scoring call per worker, issued in
/// order, then a stable descending sort. Workers the collaborator returns
/// nothing for are left out.
pub async fn rank_workers_for_job(
    llm: &dyn LanguageModel,
    job: &JobPosting,
    workers: &[WorkerProfile],
) -> Vec<WorkerMatch> {
    let candidate = [CandidateSummary::of_job(job)];
    let mut matches = Vec::with_capacity(workers.len());

    for worker in workers {
        let results = score(llm, &SubjectSummary::of_worker(worker), &candidate).await;
        if let Some(best) = results.into_iter().next() {
            matches.push(WorkerMatch {
                worker_id: worker.id,
                name: worker.name.clone(),
                trade: worker.trade.clone(),
                experience_years: worker.experience_years,
                skills: worker.skills.clone(),
                location: worker.location.clone(),
                match_score: best.score,
                match_reasoning: best.reasoning,
            });
        }
    }

    sort_by_score_desc(&mut matches, |m| m.match_score);
    matches
}
