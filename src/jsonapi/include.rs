use thiserror::Error;

/// A requested relation that is not in the resource type's allow-list.
/// Only the first offending name (left to right) is ever reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The included relationship '{relation}' is not allowed in the '{resource_type}' resource")]
pub struct InvalidInclude {
    pub relation: String,
    pub resource_type: String,
}

/// Validated relation names, de-duplicated, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeSet(Vec<String>);

impl IncludeSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, relation: &str) -> bool {
        self.0.iter().any(|r| r == relation)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Split a raw `include` value on commas, trimming whitespace and dropping
/// empty segments. Repeated names keep their first position.
pub fn parse(raw: Option<&str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for segment in raw.unwrap_or_default().split(',') {
        let name = segment.trim();
        if name.is_empty() || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}

/// Validate a raw `include` value against `allowed`.
///
/// Absent or blank input resolves to an empty set.
pub fn resolve(
    raw: Option<&str>,
    resource_type: &str,
    allowed: &[&str],
) -> Result<IncludeSet, InvalidInclude> {
    let requested = parse(raw);

    if let Some(first_invalid) = requested.iter().find(|name| !allowed.contains(&name.as_str())) {
        return Err(InvalidInclude {
            relation: first_invalid.clone(),
            resource_type: resource_type.to_string(),
        });
    }

    Ok(IncludeSet(requested))
}
