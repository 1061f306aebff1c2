//! The resume document a user edits: personal info plus four ordered entry lists.
//!
//! Serialized with camelCase keys so the stored JSONB blob and the HTTP bodies
//! share one shape. Lists are never sorted; their order is the order the user
//! (or the AI assist) produced.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Highest allowed skill level.
pub const MAX_SKILL_LEVEL: u8 = 5;

/// Root document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeContent {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Ignored when `current` is set; the end slot renders "Present".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// 0..=5 when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Section kinds
// ────────────────────────────────────────────────────────────────────────────

/// The four ordered lists of a resume. Templates loop over these and the
/// editor targets entries through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Education,
    Experience,
    Skills,
    Projects,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Education,
        SectionKind::Experience,
        SectionKind::Skills,
        SectionKind::Projects,
    ];

    /// Resolves the key used in templates and JSON (`education`, `skills`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Education => "education",
            SectionKind::Experience => "experience",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
        }
    }

    pub fn len_in(self, content: &ResumeContent) -> usize {
        match self {
            SectionKind::Education => content.education.len(),
            SectionKind::Experience => content.experience.len(),
            SectionKind::Skills => content.skills.len(),
            SectionKind::Projects => content.projects.len(),
        }
    }

    pub fn is_empty_in(self, content: &ResumeContent) -> bool {
        self.len_in(content) == 0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Personal info fields
// ────────────────────────────────────────────────────────────────────────────

/// Addressable scalar fields of `PersonalInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersonalField {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    City,
    State,
    ZipCode,
    Country,
    Title,
    Summary,
}

impl PersonalField {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "firstName" => PersonalField::FirstName,
            "lastName" => PersonalField::LastName,
            "email" => PersonalField::Email,
            "phone" => PersonalField::Phone,
            "address" => PersonalField::Address,
            "city" => PersonalField::City,
            "state" => PersonalField::State,
            "zipCode" => PersonalField::ZipCode,
            "country" => PersonalField::Country,
            "title" => PersonalField::Title,
            "summary" => PersonalField::Summary,
            _ => return None,
        })
    }

    /// Returns the value, or `None` when the field is absent or blank.
    pub fn get(self, info: &PersonalInfo) -> Option<&str> {
        let value = match self {
            PersonalField::FirstName => Some(info.first_name.as_str()),
            PersonalField::LastName => Some(info.last_name.as_str()),
            PersonalField::Email => Some(info.email.as_str()),
            PersonalField::Phone => info.phone.as_deref(),
            PersonalField::Address => info.address.as_deref(),
            PersonalField::City => info.city.as_deref(),
            PersonalField::State => info.state.as_deref(),
            PersonalField::ZipCode => info.zip_code.as_deref(),
            PersonalField::Country => info.country.as_deref(),
            PersonalField::Title => info.title.as_deref(),
            PersonalField::Summary => info.summary.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }

    /// Replaces the field. Required fields take an empty string for `None`.
    pub fn set(self, info: &mut PersonalInfo, value: Option<String>) {
        match self {
            PersonalField::FirstName => info.first_name = value.unwrap_or_default(),
            PersonalField::LastName => info.last_name = value.unwrap_or_default(),
            PersonalField::Email => info.email = value.unwrap_or_default(),
            PersonalField::Phone => info.phone = value,
            PersonalField::Address => info.address = value,
            PersonalField::City => info.city = value,
            PersonalField::State => info.state = value,
            PersonalField::ZipCode => info.zip_code = value,
            PersonalField::Country => info.country = value,
            PersonalField::Title => info.title = value,
            PersonalField::Summary => info.summary = value,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry identity
// ────────────────────────────────────────────────────────────────────────────

/// A list entry addressable by its id.
pub trait ListItem {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

macro_rules! impl_list_item {
    ($($ty:ty),*) => {
        $(
            impl ListItem for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )*
    };
}

impl_list_item!(EducationEntry, ExperienceEntry, SkillEntry, ProjectEntry);

/// Fresh identifier for a new list entry.
pub fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// Gives every entry without an id (or with an id already used earlier in the
/// same list) a fresh one.
fn assign_missing_ids<T: ListItem>(items: &mut [T]) {
    let mut seen = std::collections::HashSet::new();
    for item in items.iter_mut() {
        if item.id().is_empty() || !seen.insert(item.id().to_string()) {
            let id = new_item_id();
            seen.insert(id.clone());
            item.set_id(id);
        }
    }
}

impl ResumeContent {
    /// Ensures every list entry carries a unique id. Existing ids are kept.
    pub fn normalize(mut self) -> Self {
        assign_missing_ids(&mut self.education);
        assign_missing_ids(&mut self.experience);
        assign_missing_ids(&mut self.skills);
        assign_missing_ids(&mut self.projects);
        self
    }

    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.personal_info.first_name.trim(),
            self.personal_info.last_name.trim()
        )
        .trim()
        .to_string()
    }
}
