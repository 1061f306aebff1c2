//! Pre-persistence checks for resume content and the small text fields around it.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::models::content::{ListItem, ResumeContent, MAX_SKILL_LEVEL};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Error, Serialize)]
#[error("{}", join_issues(.issues))]
pub struct ContentValidationError {
    pub issues: Vec<FieldIssue>,
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

/// Syntactic email check: one `@`, no whitespace, a dot in the domain.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email.trim())
}

/// Minimum-length check on trimmed text, counted in characters.
pub fn has_min_len(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

struct Collector {
    issues: Vec<FieldIssue>,
}

impl Collector {
    fn require(&mut self, field: String, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.issues.push(FieldIssue {
                field,
                message: format!("{label} is required"),
            });
        }
    }

    fn unique_ids<T: ListItem>(&mut self, section: &str, items: &[T]) {
        let mut seen = std::collections::HashSet::new();
        for (i, item) in items.iter().enumerate() {
            if item.id().is_empty() {
                self.issues.push(FieldIssue {
                    field: format!("{section}[{i}].id"),
                    message: "id is missing".to_string(),
                });
            } else if !seen.insert(item.id()) {
                self.issues.push(FieldIssue {
                    field: format!("{section}[{i}].id"),
                    message: format!("duplicate id '{}'", item.id()),
                });
            }
        }
    }
}

/// Validates a whole document, collecting every issue rather than stopping at the first.
pub fn validate_content(content: &ResumeContent) -> Result<(), ContentValidationError> {
    let mut c = Collector { issues: Vec::new() };
    let info = &content.personal_info;

    c.require("personalInfo.firstName".into(), &info.first_name, "First name");
    c.require("personalInfo.lastName".into(), &info.last_name, "Last name");
    if !is_valid_email(&info.email) {
        c.issues.push(FieldIssue {
            field: "personalInfo.email".to_string(),
            message: "Invalid email address".to_string(),
        });
    }

    for (i, e) in content.education.iter().enumerate() {
        c.require(format!("education[{i}].institution"), &e.institution, "Institution name");
    }
    for (i, e) in content.experience.iter().enumerate() {
        c.require(format!("experience[{i}].company"), &e.company, "Company name");
        c.require(format!("experience[{i}].position"), &e.position, "Position");
    }
    for (i, s) in content.skills.iter().enumerate() {
        c.require(format!("skills[{i}].name"), &s.name, "Skill name");
        if let Some(level) = s.level {
            if level > MAX_SKILL_LEVEL {
                c.issues.push(FieldIssue {
                    field: format!("skills[{i}].level"),
                    message: format!("level must be between 0 and {MAX_SKILL_LEVEL}"),
                });
            }
        }
    }
    for (i, p) in content.projects.iter().enumerate() {
        c.require(format!("projects[{i}].name"), &p.name, "Project name");
    }

    c.unique_ids("education", &content.education);
    c.unique_ids("experience", &content.experience);
    c.unique_ids("skills", &content.skills);
    c.unique_ids("projects", &content.projects);

    if c.issues.is_empty() {
        Ok(())
    } else {
        Err(ContentValidationError { issues: c.issues })
    }
}
