use serde_json::json;

/// What the caller asked the model to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Summary,
    Experience,
    /// A whole resume as `ResumeContent`-shaped JSON.
    Complete,
    /// Anything else: the prompt is sent unchanged.
    Freeform,
}

impl GenerationKind {
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("summary") => GenerationKind::Summary,
            Some("experience") => GenerationKind::Experience,
            Some("complete") => GenerationKind::Complete,
            _ => GenerationKind::Freeform,
        }
    }

    /// Frames the user's background text for this kind of request.
    pub fn frame(self, prompt: &str) -> String {
        match self {
            GenerationKind::Summary => format!(
                "Write a professional resume summary (2-3 sentences) for someone with the \
                 following background: {prompt}"
            ),
            GenerationKind::Experience => format!(
                "Write 3-4 bullet points describing job responsibilities and achievements \
                 for this position: {prompt}"
            ),
            GenerationKind::Complete => format!(
                "Create a professional resume based on the following background information. \
                 Format the response as JSON following this structure: {}. \
                 Background information: {prompt}",
                resume_shape()
            ),
            GenerationKind::Freeform => prompt.to_string(),
        }
    }
}

/// Example document showing the model the keys `ResumeContent` accepts.
fn resume_shape() -> String {
    json!({
        "personalInfo": {
            "firstName": "String",
            "lastName": "String",
            "email": "String",
            "phone": "String",
            "address": "String",
            "title": "String",
            "summary": "String"
        },
        "education": [{
            "institution": "String",
            "degree": "String",
            "fieldOfStudy": "String",
            "startDate": "String",
            "endDate": "String",
            "description": "String"
        }],
        "experience": [{
            "company": "String",
            "position": "String",
            "startDate": "String",
            "endDate": "String",
            "description": "String"
        }],
        "skills": [{ "name": "String", "level": 0 }],
        "projects": [{
            "name": "String",
            "description": "String",
            "url": "String",
            "startDate": "String",
            "endDate": "String"
        }]
    })
    .to_string()
}
