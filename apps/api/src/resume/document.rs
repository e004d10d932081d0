//! The shape handed to rendering: profile fields plus categorized skills.
//! Markdown is the only output format produced here.

use std::fmt::Write as _;

use serde::Serialize;

use crate::models::worker::{WorkHistoryEntry, WorkerProfile};
use crate::resume::skills::CategorizedSkills;

#[derive(Debug, Clone, Serialize)]
pub struct ResumeDocument {
    pub name: Option<String>,
    pub phone: String,
    pub trade: Option<String>,
    pub experience_years: Option<i32>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub categorized_skills: CategorizedSkills,
    pub education: Option<String>,
    pub certifications: Option<String>,
    pub work_history: Vec<WorkHistoryEntry>,
}

impl ResumeDocument {
    pub fn new(worker: &WorkerProfile, categorized_skills: CategorizedSkills) -> Self {
        Self {
            name: worker.name.clone(),
            phone: worker.phone.clone(),
            trade: worker.trade.clone(),
            experience_years: worker.experience_years,
            location: worker.location.clone(),
            skills: worker.skills.clone(),
            categorized_skills,
            education: worker.education.clone(),
            certifications: worker.certifications.clone(),
            work_history: worker.work_history.clone(),
        }
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.trim().is_empty()).unwrap_or("Resume")
    }

    /// Download name, `<name>_Resume.md`, restricted to filename-safe ASCII.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .name
            .as_deref()
            .unwrap_or_default()
            .trim()
            .chars()
            .filter_map(|c| match c {
                c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => Some(c),
                ' ' => Some('_'),
                _ => None,
            })
            .collect();
        let stem = if stem.is_empty() { "Worker".to_string() } else { stem };
        format!("{stem}_Resume.md")
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", self.display_name());

        let mut contact = Vec::new();
        if let Some(trade) = non_blank(self.trade.as_deref()) {
            contact.push(trade.to_string());
        }
        if let Some(location) = non_blank(self.location.as_deref()) {
            contact.push(location.to_string());
        }
        contact.push(format!("Phone: {}", self.phone));
        let _ = writeln!(out, "{}\n", contact.join(" | "));

        if let Some(years) = self.experience_years {
            let _ = writeln!(out, "**Experience:** {years} years\n");
        }

        if !self.work_history.is_empty() {
            out.push_str("## Work History\n\n");
            for entry in &self.work_history {
                let mut line = format!("- **{}**", fallback_text(&entry.role, "Role"));
                if !entry.company.trim().is_empty() {
                    let _ = write!(line, ", {}", entry.company.trim());
                }
                if !entry.duration.trim().is_empty() {
                    let _ = write!(line, " ({})", entry.duration.trim());
                }
                let _ = writeln!(out, "{line}");
            }
            out.push('\n');
        }

        out.push_str("## Skills\n\n");
        for (label, skills) in [
            ("Technical", &self.categorized_skills.technical_skills),
            ("Tools & Equipment", &self.categorized_skills.tools_equipment),
            ("Soft Skills", &self.categorized_skills.soft_skills),
        ] {
            if !skills.is_empty() {
                let _ = writeln!(out, "- **{label}:** {}", skills.join(", "));
            }
        }
        out.push('\n');

        if let Some(certifications) = non_blank(self.certifications.as_deref()) {
            let _ = writeln!(out, "## Certifications\n\n{certifications}\n");
        }
        if let Some(education) = non_blank(self.education.as_deref()) {
            let _ = writeln!(out, "## Education\n\n{education}\n");
        }

        out.trim_end().to_string() + "\n"
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn fallback_text<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::language::Language;

    fn document() -> ResumeDocument {
        let mut worker = WorkerProfile::new("9123456780", Language::English);
        worker.name = Some("Suresh Patil".to_string());
        worker.trade = Some("Welder".to_string());
        worker.location = Some("Mumbai".to_string());
        worker.experience_years = Some(5);
        worker.education = Some("ITI".to_string());
        worker.work_history = vec![WorkHistoryEntry {
            company: "L&T".to_string(),
            role: "Welder".to_string(),
            duration: "3 years".to_string(),
        }];
        ResumeDocument::new(
            &worker,
            CategorizedSkills {
                technical_skills: vec!["Arc Welding".to_string()],
                soft_skills: vec![],
                tools_equipment: vec!["MIG Welder".to_string()],
            },
        )
    }

    #[test]
    fn test_markdown_has_sections_in_order() {
        let md = document().to_markdown();
        assert!(md.starts_with("# Suresh Patil\n"));
        assert!(md.contains("Welder | Mumbai | Phone: 9123456780"));
        assert!(md.contains("- **Welder**, L&T (3 years)"));
        assert!(md.contains("- **Technical:** Arc Welding"));
        assert!(!md.contains("Soft Skills"));
        assert!(!md.contains("## Certifications"));
        let skills = md.find("## Skills").unwrap();
        let education = md.find("## Education").unwrap();
        assert!(skills < education);
    }

    #[test]
    fn test_file_name_is_header_safe() {
        assert_eq!(document().file_name(), "Suresh_Patil_Resume.md");

        let mut doc = document();
        doc.name = Some("सुरेश".to_string());
        assert_eq!(doc.file_name(), "Worker_Resume.md");
        doc.name = Some("O\"Brien\r\n".to_string());
        assert_eq!(doc.file_name(), "OBrien_Resume.md");
    }
}
