/// A `name=value` parameter attached to a field, e.g. `VALUE=DATE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One logical content line before encoding: name, ordered attributes, value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_attributes(name, value, Vec::new())
    }

    pub fn with_attributes(
        name: impl Into<String>,
        value: impl Into<String>,
        attributes: Vec<Attribute>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            value: value.into(),
        }
    }
}

/// A run of content inside a section: either plain fields or nested sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Fields(Vec<Field>),
    Sections(Vec<Section>),
}

/// A `BEGIN:<name>` / `END:<name>` wrapped block.
///
/// Sections are immutable once constructed; building a calendar means
/// constructing a fresh tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    content: Vec<Content>,
}

impl Section {
    pub fn new(name: impl Into<String>, content: Vec<Content>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// A section holding a flat field list and nothing else.
    pub fn with_fields(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(name, vec![Content::Fields(fields)])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Flattens the section to the ordered field sequence to print: a
    /// synthetic `BEGIN` field, each content node depth-first in order, then
    /// a synthetic `END` field.
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        let mut buf = vec![Field::new("BEGIN", self.name.clone())];
        for node in &self.content {
            match node {
                Content::Fields(fields) => buf.extend_from_slice(fields),
                Content::Sections(sections) => {
                    for section in sections {
                        buf.extend(section.fields());
                    }
                }
            }
        }
        buf.push(Field::new("END", self.name.clone()));
        buf
    }
}
