//! Path templates with `{name}` placeholders.
//!
//! A [`PathTemplate`] is parsed once per endpoint path, joined with the
//! service root via [`PathTemplate::append`], and specialized once per call
//! via [`PathTemplate::substitute`]. Parsing and substitution are pure
//! in-memory transformations; no I/O happens here.

use crate::{params::ParamValue, Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Matches a `{name}` placeholder token. Braces that do not form a complete
/// token pass through the template untouched.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder pattern is valid"));

/// One placeholder occurrence: its name and the byte range of the whole
/// `{name}` token within the template string.
#[derive(Debug, Clone)]
struct Placeholder {
    name: String,
    start: usize,
    end: usize,
}

/// A path string containing `{name}` placeholders resolved at request-build
/// time.
///
/// # Examples
///
/// ```
/// use restbound::PathTemplate;
/// use std::collections::HashMap;
///
/// let endpoint = PathTemplate::parse("/api/contact").append(&PathTemplate::parse("/{name}"));
/// let mut values = HashMap::new();
/// values.insert("name".to_string(), "Contact1".into());
///
/// let path = endpoint.substitute(&values).unwrap();
/// assert_eq!(path.as_str(), "/api/contact/Contact1");
/// ```
#[derive(Debug, Clone)]
pub struct PathTemplate {
    path: String,
    placeholders: Vec<Placeholder>,
}

impl PathTemplate {
    /// Parses a path template, extracting every placeholder occurrence.
    ///
    /// An empty template parses as the root path `/`.
    pub fn parse(template: &str) -> Self {
        let path = if template.is_empty() {
            "/".to_string()
        } else {
            template.to_string()
        };

        let placeholders = PLACEHOLDER
            .captures_iter(&path)
            .filter_map(|caps| {
                let token = caps.get(0)?;
                let name = caps.get(1)?;
                Some(Placeholder {
                    name: name.as_str().to_string(),
                    start: token.start(),
                    end: token.end(),
                })
            })
            .collect();

        Self { path, placeholders }
    }

    /// Returns the template string.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Returns the placeholder names in first-occurrence order, without
    /// duplicates.
    ///
    /// Substitution still replaces every occurrence of a repeated name.
    pub fn variable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.placeholders.len());
        for placeholder in &self.placeholders {
            if !names.contains(&placeholder.name.as_str()) {
                names.push(&placeholder.name);
            }
        }
        names
    }

    /// Joins this template with another, ensuring exactly one `/` separator
    /// at the join regardless of leading/trailing separators on either side.
    pub fn append(&self, other: &PathTemplate) -> PathTemplate {
        let left = &self.path;
        let right = &other.path;
        let joined = match (left.ends_with('/'), right.starts_with('/')) {
            (true, true) => format!("{left}{}", &right[1..]),
            (false, false) => format!("{left}/{right}"),
            _ => format!("{left}{right}"),
        };
        PathTemplate::parse(&joined)
    }

    /// Replaces every placeholder occurrence with its mapped value.
    ///
    /// The result is re-parsed, so values that themselves contain `{name}`
    /// tokens compose with a later substitution pass. Fails with
    /// [`Error::Template`] naming the first placeholder that has no mapping.
    pub fn substitute(&self, values: &HashMap<String, ParamValue>) -> Result<PathTemplate> {
        if self.placeholders.is_empty() {
            return Ok(self.clone());
        }

        let mut out = String::with_capacity(self.path.len());
        let mut cursor = 0;
        for placeholder in &self.placeholders {
            out.push_str(&self.path[cursor..placeholder.start]);
            match values.get(&placeholder.name) {
                Some(value) => out.push_str(&value.to_string()),
                None => {
                    return Err(Error::Template {
                        name: placeholder.name.clone(),
                    })
                }
            }
            cursor = placeholder.end;
        }
        out.push_str(&self.path[cursor..]);

        Ok(PathTemplate::parse(&out))
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl Default for PathTemplate {
    fn default() -> Self {
        Self::parse("")
    }
}
