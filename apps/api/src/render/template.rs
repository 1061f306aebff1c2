//! Parser for the logic-less template language stored on `resume_templates`.
//!
//! Supported tags:
//! ```text
//! {{path}}                       escaped value
//! {{#if path}} .. {{else}} .. {{/if}}
//! {{#unless path}} .. {{/unless}}
//! {{#each section}} .. {{/each}}
//! {{! comment }}  {{!-- comment --}}
//! ```
//! Every placeholder is resolved here, once, into a typed `Field`, `Condition`
//! or `SectionKind`. A template that names something the resume does not have
//! fails to parse instead of rendering blank.

use crate::models::content::{PersonalField, SectionKind};
use crate::render::RenderError;

// ────────────────────────────────────────────────────────────────────────────
// Typed placeholders
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationField {
    Id,
    Institution,
    Degree,
    FieldOfStudy,
    StartDate,
    EndDate,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceField {
    Id,
    Company,
    Position,
    StartDate,
    /// Renders "Present" when the entry is current.
    EndDate,
    Current,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillField {
    Id,
    Name,
    Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectField {
    Id,
    Name,
    Description,
    Url,
    StartDate,
    EndDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Personal(PersonalField),
    Education(EducationField),
    Experience(ExperienceField),
    Skill(SkillField),
    Project(ProjectField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Scalar is present and non-empty, or boolean is true.
    Present(Field),
    /// List has at least one entry.
    NonEmpty(SectionKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Value(Field),
    If {
        condition: Condition,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
    Each {
        section: SectionKind,
        body: Vec<Node>,
    },
}

impl EducationField {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "id" => Self::Id,
            "institution" => Self::Institution,
            "degree" => Self::Degree,
            "fieldOfStudy" => Self::FieldOfStudy,
            "startDate" => Self::StartDate,
            "endDate" => Self::EndDate,
            "description" => Self::Description,
            _ => return None,
        })
    }
}

impl ExperienceField {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "id" => Self::Id,
            "company" => Self::Company,
            "position" => Self::Position,
            "startDate" => Self::StartDate,
            "endDate" => Self::EndDate,
            "current" => Self::Current,
            "description" => Self::Description,
            _ => return None,
        })
    }
}

impl SkillField {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "id" => Self::Id,
            "name" => Self::Name,
            "level" => Self::Level,
            _ => return None,
        })
    }
}

impl ProjectField {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "id" => Self::Id,
            "name" => Self::Name,
            "description" => Self::Description,
            "url" => Self::Url,
            "startDate" => Self::StartDate,
            "endDate" => Self::EndDate,
            _ => return None,
        })
    }
}

/// Where a placeholder is being resolved: top level, or inside `#each`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Root,
    Item(SectionKind),
}

fn resolve_field(path: &str, scope: Scope) -> Option<Field> {
    let path = path.strip_prefix("@root.").unwrap_or(path);
    if let Some(name) = path.strip_prefix("personalInfo.") {
        return PersonalField::from_name(name).map(Field::Personal);
    }
    let Scope::Item(section) = scope else {
        return None;
    };
    let name = path.strip_prefix("this.").unwrap_or(path);
    match section {
        SectionKind::Education => EducationField::from_name(name).map(Field::Education),
        SectionKind::Experience => ExperienceField::from_name(name).map(Field::Experience),
        SectionKind::Skills => SkillField::from_name(name).map(Field::Skill),
        SectionKind::Projects => ProjectField::from_name(name).map(Field::Project),
    }
}

fn resolve_section(path: &str) -> Option<SectionKind> {
    let path = path.strip_prefix("@root.").unwrap_or(path);
    SectionKind::from_name(path)
}

fn resolve_condition(path: &str, scope: Scope) -> Option<Condition> {
    let list = path.strip_suffix(".length").unwrap_or(path);
    if let Some(section) = resolve_section(list) {
        return Some(Condition::NonEmpty(section));
    }
    resolve_field(path, scope).map(Condition::Present)
}

// ────────────────────────────────────────────────────────────────────────────
// Tokenizer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    If,
    Unless,
    Each,
}

impl BlockKind {
    fn name(self) -> &'static str {
        match self {
            BlockKind::If => "if",
            BlockKind::Unless => "unless",
            BlockKind::Each => "each",
        }
    }
}

#[derive(Debug)]
enum Token<'a> {
    Text(&'a str),
    Value { path: &'a str, offset: usize },
    Open { kind: BlockKind, arg: &'a str, offset: usize },
    Else { offset: usize },
    Close { kind: BlockKind, offset: usize },
}

fn parse_error(offset: usize, message: impl Into<String>) -> RenderError {
    RenderError::Parse {
        offset,
        message: message.into(),
    }
}

fn block_kind(name: &str, offset: usize) -> Result<BlockKind, RenderError> {
    match name {
        "if" => Ok(BlockKind::If),
        "unless" => Ok(BlockKind::Unless),
        "each" => Ok(BlockKind::Each),
        other => Err(parse_error(offset, format!("unsupported block helper '{other}'"))),
    }
}

fn tokenize(source: &str) -> Result<Vec<Token<'_>>, RenderError> {
    let mut tokens = Vec::new();
    let mut rest = 0usize;

    while let Some(found) = source[rest..].find("{{") {
        let open = rest + found;
        if open > rest {
            tokens.push(Token::Text(&source[rest..open]));
        }
        let after = &source[open + 2..];

        if after.starts_with('{') {
            return Err(parse_error(
                open,
                "raw output ({{{ }}}) is not allowed; all values are escaped",
            ));
        }

        if after.starts_with("!--") {
            let end = after
                .find("--}}")
                .ok_or_else(|| parse_error(open, "unterminated comment"))?;
            rest = open + 2 + end + 4;
            continue;
        }

        let close = after
            .find("}}")
            .ok_or_else(|| parse_error(open, "unterminated tag"))?;
        let tag = after[..close].trim();
        rest = open + 2 + close + 2;

        if tag.starts_with('!') {
            continue;
        }
        if let Some(open_tag) = tag.strip_prefix('#') {
            let (name, arg) = open_tag
                .split_once(char::is_whitespace)
                .map(|(n, a)| (n, a.trim()))
                .unwrap_or((open_tag, ""));
            if arg.is_empty() {
                return Err(parse_error(open, format!("block '#{name}' needs an argument")));
            }
            tokens.push(Token::Open {
                kind: block_kind(name, open)?,
                arg,
                offset: open,
            });
        } else if let Some(name) = tag.strip_prefix('/') {
            tokens.push(Token::Close {
                kind: block_kind(name.trim(), open)?,
                offset: open,
            });
        } else if tag == "else" {
            tokens.push(Token::Else { offset: open });
        } else if tag.is_empty() {
            return Err(parse_error(open, "empty tag"));
        } else {
            tokens.push(Token::Value {
                path: tag,
                offset: open,
            });
        }
    }

    if rest < source.len() {
        tokens.push(Token::Text(&source[rest..]));
    }
    Ok(tokens)
}

// ────────────────────────────────────────────────────────────────────────────
// Parser
// ────────────────────────────────────────────────────────────────────────────

/// What ended a run of nodes.
enum Stop {
    Eof,
    Else(usize),
    Close(BlockKind, usize),
}

struct Parser<'a> {
    tokens: std::vec::IntoIter<Token<'a>>,
}

impl<'a> Parser<'a> {
    fn parse_nodes(&mut self, scope: Scope) -> Result<(Vec<Node>, Stop), RenderError> {
        let mut nodes = Vec::new();
        while let Some(token) = self.tokens.next() {
            match token {
                Token::Text(text) => nodes.push(Node::Text(text.to_string())),
                Token::Value { path, offset } => {
                    let field = resolve_field(path, scope).ok_or_else(|| {
                        RenderError::UnknownField {
                            offset,
                            name: path.to_string(),
                        }
                    })?;
                    nodes.push(Node::Value(field));
                }
                Token::Open { kind, arg, offset } => {
                    nodes.push(self.parse_block(kind, arg, offset, scope)?)
                }
                Token::Else { offset } => return Ok((nodes, Stop::Else(offset))),
                Token::Close { kind, offset } => return Ok((nodes, Stop::Close(kind, offset))),
            }
        }
        Ok((nodes, Stop::Eof))
    }

    fn parse_block(
        &mut self,
        kind: BlockKind,
        arg: &str,
        offset: usize,
        scope: Scope,
    ) -> Result<Node, RenderError> {
        match kind {
            BlockKind::Each => {
                let section = resolve_section(arg).ok_or_else(|| RenderError::UnknownField {
                    offset,
                    name: arg.to_string(),
                })?;
                let (body, stop) = self.parse_nodes(Scope::Item(section))?;
                match stop {
                    Stop::Close(BlockKind::Each, _) => Ok(Node::Each { section, body }),
                    other => Err(unbalanced(kind, offset, other)),
                }
            }
            BlockKind::If | BlockKind::Unless => {
                let condition =
                    resolve_condition(arg, scope).ok_or_else(|| RenderError::UnknownField {
                        offset,
                        name: arg.to_string(),
                    })?;
                let (first, stop) = self.parse_nodes(scope)?;
                let (second, stop) = match stop {
                    Stop::Else(_) => self.parse_nodes(scope)?,
                    other => (Vec::new(), other),
                };
                match stop {
                    Stop::Close(closed, _) if closed == kind => {}
                    other => return Err(unbalanced(kind, offset, other)),
                }
                let (then, otherwise) = if kind == BlockKind::Unless {
                    (second, first)
                } else {
                    (first, second)
                };
                Ok(Node::If {
                    condition,
                    then,
                    otherwise,
                })
            }
        }
    }
}

fn unbalanced(kind: BlockKind, offset: usize, stop: Stop) -> RenderError {
    match stop {
        Stop::Eof => parse_error(offset, format!("'#{}' is never closed", kind.name())),
        Stop::Else(at) => parse_error(at, format!("unexpected 'else' in '#{}'", kind.name())),
        Stop::Close(other, at) => parse_error(
            at,
            format!("'/{}' closes '#{}'", other.name(), kind.name()),
        ),
    }
}

/// Parses template source into a node tree.
pub fn parse(source: &str) -> Result<Vec<Node>, RenderError> {
    let mut parser = Parser {
        tokens: tokenize(source)?.into_iter(),
    };
    let (nodes, stop) = parser.parse_nodes(Scope::Root)?;
    match stop {
        Stop::Eof => Ok(nodes),
        Stop::Else(at) => Err(parse_error(at, "'else' outside of a block")),
        Stop::Close(kind, at) => Err(parse_error(
            at,
            format!("'/{}' without an opening block", kind.name()),
        )),
    }
}
