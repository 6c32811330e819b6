use serde::{Deserialize, Serialize};

/// Named reference video used as a preview overlay. `name` is unique and
/// doubles as the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub url: String,
}

/// Find a template by name, ignoring surrounding whitespace.
pub fn find_template<'a>(templates: &'a [Template], name: &str) -> Option<&'a Template> {
    let name = name.trim();
    templates.iter().find(|t| t.name == name)
}
