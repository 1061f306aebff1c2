//! Editor operations on a draft resume.
//!
//! The draft is always passed in explicitly; nothing here holds document state.
//! Every mutation is a whole-value replace of one field or one list entry.

pub mod validation;

use serde_json::Value;
use thiserror::Error;

use crate::models::content::{
    new_item_id, EducationEntry, ExperienceEntry, ListItem, PersonalField, ProjectEntry,
    ResumeContent, SectionKind, SkillEntry,
};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no {section} entry with id '{id}'")]
    EntryNotFound { section: &'static str, id: String },

    #[error("invalid {section} entry: {source}")]
    InvalidEntry {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// One list entry, tagged with the list it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Education(EducationEntry),
    Experience(ExperienceEntry),
    Skill(SkillEntry),
    Project(ProjectEntry),
}

impl Entry {
    pub fn section(&self) -> SectionKind {
        match self {
            Entry::Education(_) => SectionKind::Education,
            Entry::Experience(_) => SectionKind::Experience,
            Entry::Skill(_) => SectionKind::Skills,
            Entry::Project(_) => SectionKind::Projects,
        }
    }

    /// Decodes a JSON body into the entry type of `section`.
    pub fn from_value(section: SectionKind, value: Value) -> Result<Self, EditorError> {
        let wrap = |source| EditorError::InvalidEntry {
            section: section.as_str(),
            source,
        };
        Ok(match section {
            SectionKind::Education => {
                Entry::Education(serde_json::from_value(value).map_err(wrap)?)
            }
            SectionKind::Experience => {
                Entry::Experience(serde_json::from_value(value).map_err(wrap)?)
            }
            SectionKind::Skills => Entry::Skill(serde_json::from_value(value).map_err(wrap)?),
            SectionKind::Projects => Entry::Project(serde_json::from_value(value).map_err(wrap)?),
        })
    }
}

fn push_with_fresh_id<T: ListItem>(list: &mut Vec<T>, mut item: T) -> String {
    let id = new_item_id();
    item.set_id(id.clone());
    list.push(item);
    id
}

fn replace_by_id<T: ListItem>(list: &mut [T], id: &str, mut item: T) -> bool {
    match list.iter_mut().find(|existing| existing.id() == id) {
        Some(slot) => {
            item.set_id(id.to_string());
            *slot = item;
            true
        }
        None => false,
    }
}

fn remove_by_id<T: ListItem>(list: &mut Vec<T>, id: &str) -> bool {
    match list.iter().position(|existing| existing.id() == id) {
        Some(index) => {
            // Vec::remove shifts the tail, keeping relative order.
            list.remove(index);
            true
        }
        None => false,
    }
}

/// Appends an entry to its list under a freshly generated id (any id the
/// caller supplied is discarded) and returns that id.
pub fn add_entry(content: &mut ResumeContent, entry: Entry) -> String {
    match entry {
        Entry::Education(e) => push_with_fresh_id(&mut content.education, e),
        Entry::Experience(e) => push_with_fresh_id(&mut content.experience, e),
        Entry::Skill(e) => push_with_fresh_id(&mut content.skills, e),
        Entry::Project(e) => push_with_fresh_id(&mut content.projects, e),
    }
}

/// Replaces the entry with `id` in place. The stored id wins over any id in `entry`.
pub fn update_entry(
    content: &mut ResumeContent,
    id: &str,
    entry: Entry,
) -> Result<(), EditorError> {
    let section = entry.section();
    let found = match entry {
        Entry::Education(e) => replace_by_id(&mut content.education, id, e),
        Entry::Experience(e) => replace_by_id(&mut content.experience, id, e),
        Entry::Skill(e) => replace_by_id(&mut content.skills, id, e),
        Entry::Project(e) => replace_by_id(&mut content.projects, id, e),
    };
    if found {
        Ok(())
    } else {
        Err(EditorError::EntryNotFound {
            section: section.as_str(),
            id: id.to_string(),
        })
    }
}

/// Removes exactly the entry with `id`; the rest keep their relative order.
pub fn remove_entry(
    content: &mut ResumeContent,
    section: SectionKind,
    id: &str,
) -> Result<(), EditorError> {
    let found = match section {
        SectionKind::Education => remove_by_id(&mut content.education, id),
        SectionKind::Experience => remove_by_id(&mut content.experience, id),
        SectionKind::Skills => remove_by_id(&mut content.skills, id),
        SectionKind::Projects => remove_by_id(&mut content.projects, id),
    };
    if found {
        Ok(())
    } else {
        Err(EditorError::EntryNotFound {
            section: section.as_str(),
            id: id.to_string(),
        })
    }
}

pub fn set_personal_field(
    content: &mut ResumeContent,
    field: PersonalField,
    value: Option<String>,
) {
    field.set(&mut content.personal_info, value);
}
