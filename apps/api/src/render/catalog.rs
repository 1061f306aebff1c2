//! Built-in templates, seeded into `resume_templates` at startup.

use crate::models::template::NewTemplate;

/// Modern. Used when a resume is created without a template choice.
pub const DEFAULT_TEMPLATE_ID: i32 = 1;

struct Builtin {
    id: i32,
    name: &'static str,
    description: &'static str,
    thumbnail: &'static str,
    source: &'static str,
}

const BUILTINS: [Builtin; 3] = [
    Builtin {
        id: 1,
        name: "Modern",
        description: "Clean and professional design",
        thumbnail: "/thumbnails/modern.png",
        source: include_str!("../../templates/modern.html"),
    },
    Builtin {
        id: 2,
        name: "Professional",
        description: "Perfect for senior positions",
        thumbnail: "/thumbnails/professional.png",
        source: include_str!("../../templates/professional.html"),
    },
    Builtin {
        id: 3,
        name: "Creative",
        description: "Stand out with style",
        thumbnail: "/thumbnails/creative.png",
        source: include_str!("../../templates/creative.html"),
    },
];

pub fn builtin_templates() -> Vec<NewTemplate> {
    BUILTINS
        .iter()
        .map(|b| NewTemplate {
            id: b.id,
            name: b.name.to_string(),
            description: b.description.to_string(),
            thumbnail: b.thumbnail.to_string(),
            html_template: b.source.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::template::parse;

    #[test]
    fn test_builtins_parse() {
        for template in builtin_templates() {
            assert!(
                parse(&template.html_template).is_ok(),
                "{} does not parse",
                template.name
            );
        }
    }

    #[test]
    fn test_default_is_builtin() {
        assert!(builtin_templates()
            .iter()
            .any(|t| t.id == DEFAULT_TEMPLATE_ID && t.name == "Modern"));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<i32> = builtin_templates().iter().map(|t| t.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }
}
