/// Reasons a single tag could not be expanded.
///
/// None of these abort a render: the tag is replaced by
/// [`TemplateError::placeholder`] and expansion carries on with the rest of
/// the text.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Invalid JSON in template {name}: {source}")]
    InvalidJson {
        name: String,
        source: serde_json::Error,
    },

    #[error("Template file {name}.md not found")]
    NotFound { name: String },

    #[error("Error reading template {name}.md: {source}")]
    Read {
        name: String,
        source: std::io::Error,
    },

    #[error("Invalid template name {name}")]
    InvalidName { name: String },

    #[error("Template recursion limit exceeded for {name}")]
    RecursionLimit { name: String },

    #[error("Template expansion limit exceeded for {name}")]
    ExpansionLimit { name: String },
}

impl TemplateError {
    /// Name of the template the failed tag referred to.
    pub fn name(&self) -> &str {
        match self {
            Self::InvalidJson { name, .. }
            | Self::NotFound { name }
            | Self::Read { name, .. }
            | Self::InvalidName { name }
            | Self::RecursionLimit { name }
            | Self::ExpansionLimit { name } => name,
        }
    }

    /// The HTML comment spliced into the page in place of the failed tag.
    pub fn placeholder(&self) -> String {
        match self {
            // The I/O error is only logged.
            Self::Read { name, .. } => format!("<!-- Error reading template {name}.md -->"),
            other => format!("<!-- {other} -->"),
        }
    }
}
