//! Binds a parsed template to a `ResumeContent`.
//!
//! Pure and synchronous: the same content and template always produce the
//! same bytes. Lists render in stored order.

use std::borrow::Cow;

use crate::models::content::{
    EducationEntry, ExperienceEntry, ProjectEntry, ResumeContent, SectionKind, SkillEntry,
};
use crate::models::template::ResumeTemplate;
use crate::render::escape::escape_into;
use crate::render::template::{
    parse, Condition, EducationField, ExperienceField, Field, Node, ProjectField, SkillField,
};
use crate::render::RenderError;

/// Text shown in the end date slot of a current position.
pub const PRESENT: &str = "Present";

/// The list entry the current `#each` iteration is on.
#[derive(Clone, Copy)]
enum Item<'a> {
    None,
    Education(&'a EducationEntry),
    Experience(&'a ExperienceEntry),
    Skill(&'a SkillEntry),
    Project(&'a ProjectEntry),
}

fn non_blank(value: Option<&str>) -> Option<Cow<'_, str>> {
    value.filter(|v| !v.is_empty()).map(Cow::Borrowed)
}

fn education_value(entry: &EducationEntry, field: EducationField) -> Option<Cow<'_, str>> {
    match field {
        EducationField::Id => non_blank(Some(entry.id.as_str())),
        EducationField::Institution => non_blank(Some(entry.institution.as_str())),
        EducationField::Degree => non_blank(entry.degree.as_deref()),
        EducationField::FieldOfStudy => non_blank(entry.field_of_study.as_deref()),
        EducationField::StartDate => non_blank(entry.start_date.as_deref()),
        EducationField::EndDate => non_blank(entry.end_date.as_deref()),
        EducationField::Description => non_blank(entry.description.as_deref()),
    }
}

fn experience_value(entry: &ExperienceEntry, field: ExperienceField) -> Option<Cow<'_, str>> {
    match field {
        ExperienceField::Id => non_blank(Some(entry.id.as_str())),
        ExperienceField::Company => non_blank(Some(entry.company.as_str())),
        ExperienceField::Position => non_blank(Some(entry.position.as_str())),
        ExperienceField::StartDate => non_blank(entry.start_date.as_deref()),
        ExperienceField::EndDate if entry.current => Some(Cow::Borrowed(PRESENT)),
        ExperienceField::EndDate => non_blank(entry.end_date.as_deref()),
        ExperienceField::Current => entry.current.then_some(Cow::Borrowed("true")),
        ExperienceField::Description => non_blank(entry.description.as_deref()),
    }
}

fn skill_value(entry: &SkillEntry, field: SkillField) -> Option<Cow<'_, str>> {
    match field {
        SkillField::Id => non_blank(Some(entry.id.as_str())),
        SkillField::Name => non_blank(Some(entry.name.as_str())),
        SkillField::Level => entry.level.map(|level| Cow::Owned(level.to_string())),
    }
}

fn project_value(entry: &ProjectEntry, field: ProjectField) -> Option<Cow<'_, str>> {
    match field {
        ProjectField::Id => non_blank(Some(entry.id.as_str())),
        ProjectField::Name => non_blank(Some(entry.name.as_str())),
        ProjectField::Description => non_blank(entry.description.as_deref()),
        ProjectField::Url => non_blank(entry.url.as_deref()),
        ProjectField::StartDate => non_blank(entry.start_date.as_deref()),
        ProjectField::EndDate => non_blank(entry.end_date.as_deref()),
    }
}

/// Resolves a field against the document and the current item. `None` means
/// absent, which renders as nothing and is falsy in `#if`.
fn value<'a>(field: Field, content: &'a ResumeContent, item: Item<'a>) -> Option<Cow<'a, str>> {
    match (field, item) {
        (Field::Personal(f), _) => f.get(&content.personal_info).map(Cow::Borrowed),
        (Field::Education(f), Item::Education(e)) => education_value(e, f),
        (Field::Experience(f), Item::Experience(e)) => experience_value(e, f),
        (Field::Skill(f), Item::Skill(e)) => skill_value(e, f),
        (Field::Project(f), Item::Project(e)) => project_value(e, f),
        // The parser only admits item fields inside the matching `#each`.
        _ => None,
    }
}

fn holds(condition: Condition, content: &ResumeContent, item: Item<'_>) -> bool {
    match condition {
        Condition::NonEmpty(section) => !section.is_empty_in(content),
        Condition::Present(field) => value(field, content, item).is_some(),
    }
}

struct Renderer<'a> {
    content: &'a ResumeContent,
    out: String,
}

impl<'a> Renderer<'a> {
    fn nodes(&mut self, nodes: &[Node], item: Item<'a>) {
        for node in nodes {
            match node {
                Node::Text(text) => self.out.push_str(text),
                Node::Value(field) => {
                    if let Some(v) = value(*field, self.content, item) {
                        escape_into(&mut self.out, &v);
                    }
                }
                Node::If {
                    condition,
                    then,
                    otherwise,
                } => {
                    let branch = if holds(*condition, self.content, item) {
                        then
                    } else {
                        otherwise
                    };
                    self.nodes(branch, item);
                }
                Node::Each { section, body } => self.section(*section, body),
            }
        }
    }

    fn section(&mut self, section: SectionKind, body: &[Node]) {
        let content = self.content;
        match section {
            SectionKind::Education => self.education(&content.education, body),
            SectionKind::Experience => self.experience(&content.experience, body),
            SectionKind::Skills => self.skills(&content.skills, body),
            SectionKind::Projects => self.projects(&content.projects, body),
        }
    }

    fn education(&mut self, entries: &'a [EducationEntry], body: &[Node]) {
        for entry in entries {
            self.nodes(body, Item::Education(entry));
        }
    }

    fn experience(&mut self, entries: &'a [ExperienceEntry], body: &[Node]) {
        for entry in entries {
            self.nodes(body, Item::Experience(entry));
        }
    }

    fn skills(&mut self, entries: &'a [SkillEntry], body: &[Node]) {
        for entry in entries {
            self.nodes(body, Item::Skill(entry));
        }
    }

    fn projects(&mut self, entries: &'a [ProjectEntry], body: &[Node]) {
        for entry in entries {
            self.nodes(body, Item::Project(entry));
        }
    }
}

/// Renders already-parsed nodes.
pub fn render_nodes(nodes: &[Node], content: &ResumeContent) -> String {
    let mut renderer = Renderer {
        content,
        out: String::new(),
    };
    renderer.nodes(nodes, Item::None);
    renderer.out
}

/// Renders `content` through `template`, producing HTML markup.
pub fn render(content: &ResumeContent, template: &ResumeTemplate) -> Result<String, RenderError> {
    let nodes = parse(&template.html_template)?;
    Ok(render_nodes(&nodes, content))
}

/// Renders against the template with `template_id` from `templates`, failing
/// with `TemplateNotFound` when none matches.
pub fn render_by_id(
    content: &ResumeContent,
    template_id: i32,
    templates: &[ResumeTemplate],
) -> Result<String, RenderError> {
    let template = templates
        .iter()
        .find(|t| t.id == template_id)
        .ok_or(RenderError::TemplateNotFound(template_id))?;
    render(content, template)
}
