use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::controller::FieldKey;
use super::validation::{FieldLens, FieldViolation, FormModel, FormSchema, ValidationError};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@(?:[A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("email pattern")
});

type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Clone)]
enum Check {
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
    Email,
    Refine(Predicate),
}

impl Check {
    fn passes(&self, value: &str) -> bool {
        match self {
            Check::MinLength(min) => text_len(value) >= *min,
            Check::MaxLength(max) => text_len(value) <= *max,
            Check::Pattern(pattern) => pattern.is_match(value),
            Check::Email => is_email(value),
            Check::Refine(predicate) => predicate(value),
        }
    }
}

#[derive(Clone)]
struct Rule<E> {
    check: Check,
    error: E,
}

/// Ordered rules for one text field. The first failing rule decides the error.
#[derive(Clone)]
pub struct FieldRules<E> {
    rules: Vec<Rule<E>>,
    lowercase: bool,
}

impl<E> Default for FieldRules<E> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            lowercase: false,
        }
    }
}

impl<E> FieldRules<E>
where
    E: ValidationError,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Length is measured in UTF-16 code units.
    pub fn min_len(self, min: usize, error: impl Into<E>) -> Self {
        self.push(Check::MinLength(min), error)
    }

    pub fn max_len(self, max: usize, error: impl Into<E>) -> Self {
        self.push(Check::MaxLength(max), error)
    }

    pub fn pattern(self, pattern: &Regex, error: impl Into<E>) -> Self {
        self.push(Check::Pattern(pattern.clone()), error)
    }

    pub fn email(self, error: impl Into<E>) -> Self {
        self.push(Check::Email, error)
    }

    pub fn refine(
        self,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
        error: impl Into<E>,
    ) -> Self {
        self.push(Check::Refine(Arc::new(predicate)), error)
    }

    /// Lowercases the value in the validated output.
    pub fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    pub fn first_failure(&self, value: &str) -> Option<&E> {
        self.rules
            .iter()
            .find(|rule| !rule.check.passes(value))
            .map(|rule| &rule.error)
    }

    fn push(mut self, check: Check, error: impl Into<E>) -> Self {
        self.rules.push(Rule {
            check,
            error: error.into(),
        });
        self
    }
}

struct FieldSchema<E> {
    key: FieldKey,
    rules: FieldRules<E>,
}

/// Declarative per-field schema over a [`FormModel`].
pub struct Schema<T, E> {
    fields: Vec<FieldSchema<E>>,
    _model: std::marker::PhantomData<fn() -> T>,
}

impl<T, E> Default for Schema<T, E> {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            _model: std::marker::PhantomData,
        }
    }
}

impl<T, E> Schema<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<L>(mut self, lens: L, build: impl FnOnce(FieldRules<E>) -> FieldRules<E>) -> Self
    where
        L: FieldLens<T>,
    {
        self.fields.push(FieldSchema {
            key: lens.key(),
            rules: build(FieldRules::new()),
        });
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.fields.iter().map(|field| field.key)
    }
}

impl<T, E> FormSchema<T, E> for Schema<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    fn validate(&self, model: &T) -> Result<T, Vec<FieldViolation<E>>> {
        let mut output = model.clone();
        let mut violations = Vec::new();
        for field in &self.fields {
            let value = model.field_text(field.key).unwrap_or_default();
            match field.rules.first_failure(value) {
                Some(error) => violations.push(FieldViolation::new(field.key, error.clone())),
                None if field.rules.lowercase => {
                    output.set_field_text(field.key, value.to_lowercase());
                }
                None => {}
            }
        }

        if violations.is_empty() {
            Ok(output)
        } else {
            Err(violations)
        }
    }

    fn validate_field(&self, model: &T, key: FieldKey) -> Option<E> {
        let value = model.field_text(key).unwrap_or_default();
        self.fields
            .iter()
            .filter(|field| field.key == key)
            .find_map(|field| field.rules.first_failure(value))
            .cloned()
    }
}

fn text_len(value: &str) -> usize {
    value.encode_utf16().count()
}

fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldMessage;

    #[test]
    fn first_failing_rule_wins() {
        let rules = FieldRules::<FieldMessage>::new()
            .min_len(1, "required")
            .min_len(3, "too short")
            .max_len(5, "too long");

        assert_eq!(rules.first_failure(""), Some(&FieldMessage::new("required")));
        assert_eq!(rules.first_failure("ab"), Some(&FieldMessage::new("too short")));
        assert_eq!(rules.first_failure("abc"), None);
        assert_eq!(rules.first_failure("abcdef"), Some(&FieldMessage::new("too long")));
    }

    #[test]
    fn length_counts_utf16_units() {
        assert_eq!(text_len("ñandú"), 5);
        assert_eq!(text_len("😀"), 2);
    }

    #[test]
    fn email_syntax() {
        assert!(is_email("ana@x.com"));
        assert!(is_email("Ana.Perez+tag@mail.example.pe"));
        assert!(!is_email("ana@x"));
        assert!(!is_email(".ana@x.com"));
        assert!(!is_email("ana..perez@x.com"));
        assert!(!is_email("ana.@x.com"));
        assert!(!is_email("ana x@x.com"));
    }
}
