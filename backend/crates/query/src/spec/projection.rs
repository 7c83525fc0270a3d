//! Field projection

use serde::Serialize;

/// Internal version counter hidden unless a projection is requested
pub const VERSION_FIELD: &str = "__v";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "fields", rename_all = "lowercase")]
pub enum ProjectionSpec {
    /// Only these fields (plus `id`)
    Include(Vec<String>),
    /// Everything except these fields
    Exclude(Vec<String>),
}

impl Default for ProjectionSpec {
    fn default() -> Self {
        Self::Exclude(vec![VERSION_FIELD.to_string()])
    }
}

impl ProjectionSpec {
    /// Parse a comma-separated `fields` value.
    ///
    /// A list made only of `-field` tokens excludes those fields. Any other
    /// list is an inclusion and its names are kept verbatim. A list with no
    /// usable tokens falls back to the default.
    pub fn parse(raw: &str) -> Self {
        let tokens: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty() && *t != "-")
            .collect();

        if tokens.is_empty() {
            return Self::default();
        }

        if tokens.iter().all(|t| t.starts_with('-')) {
            Self::Exclude(
                tokens
                    .iter()
                    .map(|t| t.strip_prefix('-').unwrap_or(t).to_string())
                    .collect(),
            )
        } else {
            Self::Include(tokens.iter().map(|t| t.to_string()).collect())
        }
    }

    pub fn fields(&self) -> &[String] {
        match self {
            Self::Include(fields) | Self::Exclude(fields) => fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include() {
        assert_eq!(
            ProjectionSpec::parse("name,price"),
            ProjectionSpec::Include(vec!["name".into(), "price".into()])
        );
    }

    #[test]
    fn test_exclude() {
        assert_eq!(
            ProjectionSpec::parse("-summary, -description"),
            ProjectionSpec::Exclude(vec!["summary".into(), "description".into()])
        );
    }

    #[test]
    fn test_exclude_strips_one_marker() {
        assert_eq!(
            ProjectionSpec::parse("--secret,-name"),
            ProjectionSpec::Exclude(vec!["-secret".into(), "name".into()])
        );
    }

    #[test]
    fn test_mixed_list_is_inclusion() {
        assert_eq!(
            ProjectionSpec::parse("name,-price"),
            ProjectionSpec::Include(vec!["name".into(), "-price".into()])
        );
    }

    #[test]
    fn test_empty_falls_back_to_default() {
        assert_eq!(ProjectionSpec::parse(""), ProjectionSpec::default());
        assert_eq!(ProjectionSpec::parse(" , -"), ProjectionSpec::default());
        assert_eq!(
            ProjectionSpec::default(),
            ProjectionSpec::Exclude(vec!["__v".into()])
        );
    }
}
