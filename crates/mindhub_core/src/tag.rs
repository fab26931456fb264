use std::fmt;

use mindhub_logging::hub_warn;
use serde::{Deserialize, Serialize};

/// A tag category as the server defines it (`GET tag/<kind>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTag {
    pub name: String,
    #[serde(default)]
    pub value: Vec<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// One `category: value` pair attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagChoice {
    pub name: String,
    pub value: String,
    pub color: Option<String>,
}

impl TagChoice {
    pub fn new(name: impl Into<String>, value: impl Into<String>, color: Option<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            color,
        }
    }

    /// Wire form, `name:value`.
    pub fn to_wire(&self) -> String {
        format!("{}:{}", self.name, self.value)
    }

    /// Same category and value; colour is presentation only.
    pub fn same_tag(&self, other: &TagChoice) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl fmt::Display for TagChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Joins tags the way submissions send them: `a:b,c:d`.
pub fn join_tags(tags: &[TagChoice]) -> String {
    tags.iter()
        .map(TagChoice::to_wire)
        .collect::<Vec<_>>()
        .join(",")
}

/// The known categories for one tag kind, flattened into pickable choices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagCatalog {
    categories: Vec<CustomTag>,
    choices: Vec<TagChoice>,
}

impl TagCatalog {
    pub fn from_categories(categories: Vec<CustomTag>) -> Self {
        let choices = categories
            .iter()
            .flat_map(|category| {
                category.value.iter().map(move |value| {
                    TagChoice::new(category.name.clone(), value.clone(), category.color.clone())
                })
            })
            .collect();
        Self {
            categories,
            choices,
        }
    }

    pub fn categories(&self) -> &[CustomTag] {
        &self.categories
    }

    pub fn choices(&self) -> &[TagChoice] {
        &self.choices
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category(&self, name: &str) -> Option<&CustomTag> {
        self.categories.iter().find(|category| category.name == name)
    }

    /// Choices whose `name: value` contains `query` (case-insensitive),
    /// leaving out the ones in `exclude`.
    pub fn search<'a>(&'a self, query: &str, exclude: &[TagChoice]) -> Vec<&'a TagChoice> {
        let needle = query.trim().to_lowercase();
        self.choices
            .iter()
            .filter(|choice| choice.to_string().to_lowercase().contains(&needle))
            .filter(|choice| !exclude.iter().any(|taken| taken.same_tag(choice)))
            .collect()
    }
}

/// Something in a raw tag list that could not be mapped cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagWarning {
    /// Category missing from the catalog. The tag is still kept.
    UnknownCategory { name: String, value: String },
    /// No `name:value` shape. The entry is skipped.
    Malformed { raw: String },
}

impl fmt::Display for TagWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagWarning::UnknownCategory { name, value } => {
                write!(f, "unknown tag category {name:?} (value {value:?})")
            }
            TagWarning::Malformed { raw } => write!(f, "malformed tag {raw:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagParse {
    pub tags: Vec<TagChoice>,
    pub warnings: Vec<TagWarning>,
}

/// Parses item tags against the catalog.
///
/// Each entry may itself be a comma-joined list. Duplicate tags collapse
/// into one; unknown categories are kept without a colour and reported.
pub fn parse_tags<S: AsRef<str>>(raw: &[S], catalog: &TagCatalog) -> TagParse {
    let mut parsed = TagParse::default();

    for entry in raw.iter().flat_map(|entry| entry.as_ref().split(',')) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let Some((name, value)) = entry
            .split_once(':')
            .map(|(name, value)| (name.trim(), value.trim()))
            .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        else {
            parsed.warnings.push(TagWarning::Malformed {
                raw: entry.to_string(),
            });
            continue;
        };

        let tag = match catalog.category(name) {
            Some(category) => TagChoice::new(name, value, category.color.clone()),
            None => {
                parsed.warnings.push(TagWarning::UnknownCategory {
                    name: name.to_string(),
                    value: value.to_string(),
                });
                TagChoice::new(name, value, None)
            }
        };

        if !parsed.tags.iter().any(|known| known.same_tag(&tag)) {
            parsed.tags.push(tag);
        }
    }

    for warning in &parsed.warnings {
        hub_warn!("{}", warning);
    }
    parsed
}

/// Parses a single comma-joined tag string.
pub fn parse_tag_string(raw: &str, catalog: &TagCatalog) -> TagParse {
    parse_tags(&[raw], catalog)
}
