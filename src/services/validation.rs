use std::collections::BTreeMap;

/// Per-field validation messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// First message overall, used as the summary message
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().flatten().next().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.0
    }
}

/// Field names as they appear in messages: `device_name` reads "device name"
fn label(field: &str) -> String {
    field.replace('_', " ")
}

/// Collects rule failures for one request body
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Present and not blank. Returns the value so dependent rules can run.
    pub fn required<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => {
                self.errors.add(field, format!("The {} field is required.", label(field)));
                None
            }
        }
    }

    pub fn email(&mut self, field: &str, value: &str) -> bool {
        let valid = is_email(value);
        if !valid {
            self.errors.add(field, format!("The {} must be a valid email address.", label(field)));
        }
        valid
    }

    pub fn min_chars(&mut self, field: &str, value: &str, min: usize) -> bool {
        let valid = value.chars().count() >= min;
        if !valid {
            self.errors.add(
                field,
                format!("The {} must be at least {} characters.", label(field), min),
            );
        }
        valid
    }

    /// Letters, digits, dashes and underscores only
    pub fn alpha_dash(&mut self, field: &str, value: &str) -> bool {
        let valid = value.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_');
        if !valid {
            self.errors.add(
                field,
                format!("The {} must only contain letters, numbers, dashes and underscores.", label(field)),
            );
        }
        valid
    }

    /// `<field>_confirmation` must repeat the value
    pub fn confirmed(&mut self, field: &str, value: &str, confirmation: Option<&str>) -> bool {
        let valid = confirmation == Some(value);
        if !valid {
            self.errors.add(field, format!("The {} confirmation does not match.", label(field)));
        }
        valid
    }

    pub fn unique_violation(&mut self, field: &str) {
        self.errors.add(field, format!("The {} has already been taken.", label(field)));
    }

    pub fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Single `@`, non-empty local part, dotted domain without blank labels
pub fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return false;
    }
    domain.contains('.') && domain.split('.').all(|part| !part.is_empty())
}
