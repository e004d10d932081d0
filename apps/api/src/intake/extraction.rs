//! Structured profile extraction and its partial-overwrite merge.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::worker::{WorkHistoryEntry, WorkerProfile};

/// Fields recovered from a finished intake conversation. `None` means the
/// extraction did not carry that key (or carried something unusable), and the
/// merge leaves the profile's current value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileExtraction {
    pub name: Option<String>,
    pub trade: Option<String>,
    pub experience_years: Option<i32>,
    pub location: Option<String>,
    pub education: Option<String>,
    pub certifications: Option<String>,
    pub skills: Option<Vec<String>>,
    pub work_history: Option<Vec<WorkHistoryEntry>>,
}

impl ProfileExtraction {
    /// Reads an extraction result. Returns `None` unless the value is a JSON
    /// object; individual keys with unexpected shapes are dropped, not fatal.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            name: text_field(obj, "name"),
            trade: text_field(obj, "trade"),
            experience_years: obj.get("experience_years").and_then(years),
            location: text_field(obj, "location"),
            education: text_field(obj, "education"),
            certifications: text_field(obj, "certifications"),
            skills: obj.get("skills").and_then(string_list),
            work_history: obj.get("work_history").and_then(work_history),
        })
    }

    /// Overwrites each profile field the extraction carries; absent fields keep
    /// their prior value.
    pub fn apply_to(self, profile: &mut WorkerProfile) {
        if let Some(name) = self.name {
            profile.name = Some(name);
        }
        if let Some(trade) = self.trade {
            profile.trade = Some(trade);
        }
        if let Some(years) = self.experience_years {
            profile.experience_years = Some(years);
        }
        if let Some(location) = self.location {
            profile.location = Some(location);
        }
        if let Some(education) = self.education {
            profile.education = Some(education);
        }
        if let Some(certifications) = self.certifications {
            profile.certifications = Some(certifications);
        }
        if let Some(skills) = self.skills {
            profile.skills = skills;
        }
        if let Some(history) = self.work_history {
            profile.work_history = history;
        }
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        // Lists of certifications or degrees are flattened for display.
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(as_text).filter(|s| !s.is_empty()).collect();
            Some(parts.join(", "))
        }
        _ => None,
    }
}

/// Blank strings count as absent so they cannot wipe a known value.
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(as_text).filter(|s| !s.is_empty())
}

fn years(value: &Value) -> Option<i32> {
    let years = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            // "5", "5 years", "5.5"
            let digits: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            digits.parse::<f64>().ok()?
        }
        _ => return None,
    };
    (years.is_finite() && years >= 0.0 && years <= 80.0).then(|| years.round() as i32)
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(as_text)
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        Value::String(s) => Some(
            s.split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect(),
        ),
        _ => None,
    }
}

fn work_history(value: &Value) -> Option<Vec<WorkHistoryEntry>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| {
                let obj = item.as_object()?;
                let field = |key: &str| text_field(obj, key).unwrap_or_default();
                let entry = WorkHistoryEntry {
                    company: field("company"),
                    role: field("role"),
                    duration: field("duration"),
                };
                (entry != WorkHistoryEntry::default()).then_some(entry)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::language::Language;
    use serde_json::json;

    fn electrician() -> WorkerProfile {
        let mut profile = WorkerProfile::new("9876543210", Language::English);
        profile.name = Some("Ravi".to_string());
        profile.trade = Some("Electrician".to_string());
        profile.skills = vec!["wiring".to_string()];
        profile
    }

    #[test]
    fn test_missing_trade_keeps_existing_trade() {
        let mut profile = electrician();
        let extraction = ProfileExtraction::from_value(&json!({
            "name": "Ravi Kumar",
            "experience_years": 6
        }))
        .unwrap();

        extraction.apply_to(&mut profile);

        assert_eq!(profile.trade.as_deref(), Some("Electrician"));
        assert_eq!(profile.name.as_deref(), Some("Ravi Kumar"));
        assert_eq!(profile.experience_years, Some(6));
        assert_eq!(profile.skills, vec!["wiring"]);
    }

    #[test]
    fn test_null_values_do_not_erase() {
        let mut profile = electrician();
        ProfileExtraction::from_value(&json!({"trade": null, "skills": null}))
            .unwrap()
            .apply_to(&mut profile);
        assert_eq!(profile.trade.as_deref(), Some("Electrician"));
        assert_eq!(profile.skills, vec!["wiring"]);
    }

    #[test]
    fn test_full_extraction_overwrites_everything() {
        let mut profile = electrician();
        ProfileExtraction::from_value(&json!({
            "name": "Suresh",
            "trade": "Welder",
            "experience_years": "5 years",
            "location": "Mumbai",
            "education": "10th pass",
            "certifications": ["ITI Welding", "Safety"],
            "skills": ["arc welding", "MIG welding"],
            "work_history": [
                {"company": "L&T", "role": "Welder", "duration": 3},
                {"company": "", "role": "", "duration": ""}
            ]
        }))
        .unwrap()
        .apply_to(&mut profile);

        assert_eq!(profile.trade.as_deref(), Some("Welder"));
        assert_eq!(profile.experience_years, Some(5));
        assert_eq!(profile.location.as_deref(), Some("Mumbai"));
        assert_eq!(profile.certifications.as_deref(), Some("ITI Welding, Safety"));
        assert_eq!(profile.skills, vec!["arc welding", "MIG welding"]);
        assert_eq!(profile.work_history.len(), 1);
        assert_eq!(profile.work_history[0].duration, "3");
    }

    #[test]
    fn test_wrongly_typed_key_is_ignored() {
        let extraction =
            ProfileExtraction::from_value(&json!({"experience_years": {"min": 3}, "trade": "Plumber"}))
                .unwrap();
        assert_eq!(extraction.experience_years, None);
        assert_eq!(extraction.trade.as_deref(), Some("Plumber"));
    }

    #[test]
    fn test_skills_as_comma_string() {
        let extraction = ProfileExtraction::from_value(&json!({"skills": "pipe fitting, , soldering"})).unwrap();
        assert_eq!(
            extraction.skills,
            Some(vec!["pipe fitting".to_string(), "soldering".to_string()])
        );
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(ProfileExtraction::from_value(&json!(["name", "trade"])).is_none());
        assert!(ProfileExtraction::from_value(&json!("COMPLETE")).is_none());
    }

    #[test]
    fn test_years_out_of_range_dropped() {
        assert_eq!(years(&json!(-2)), None);
        assert_eq!(years(&json!(200)), None);
        assert_eq!(years(&json!(4.6)), Some(5));
    }
}
