use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use super::controller::{
    FieldKey, FormController, FormResult, ValidationMode, read_lock, write_lock,
};

pub trait ValidationError: Clone + Send + Sync + 'static {
    fn message(&self) -> &str;
}

/// Plain text validation message, the error type of [`crate::user::user_schema`].
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldMessage(Cow<'static, str>);

impl FieldMessage {
    pub const fn new(message: &'static str) -> Self {
        Self(Cow::Borrowed(message))
    }
}

impl ValidationError for FieldMessage {
    fn message(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for FieldMessage {
    fn from(message: &'static str) -> Self {
        Self(Cow::Borrowed(message))
    }
}

impl From<String> for FieldMessage {
    fn from(message: String) -> Self {
        Self(Cow::Owned(message))
    }
}

impl Display for FieldMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

/// A form whose fields are all text, addressable by [`FieldKey`].
///
/// Usually derived with `#[derive(FormModel)]`.
pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;

    /// Every field key in declaration order. The set never changes.
    fn field_keys() -> &'static [FieldKey];

    fn field_text(&self, key: FieldKey) -> Option<&str>;

    /// Returns `false` without touching the model when `key` is not a field.
    fn set_field_text(&mut self, key: FieldKey, value: String) -> bool;

    fn key_for(name: &str) -> Option<FieldKey> {
        Self::field_keys()
            .iter()
            .copied()
            .find(|key| key.as_str() == name)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldViolation<E> {
    pub field: FieldKey,
    pub error: E,
}

impl<E> FieldViolation<E> {
    pub fn new(field: FieldKey, error: E) -> Self {
        Self { field, error }
    }
}

/// Validates a whole form model.
///
/// `Ok` carries the validated model with any output transforms applied. `Err`
/// lists violations in field order, at most one per field.
pub trait FormSchema<T, E>: Send + Sync
where
    E: ValidationError,
{
    fn validate(&self, model: &T) -> Result<T, Vec<FieldViolation<E>>>;

    fn validate_field(&self, model: &T, key: FieldKey) -> Option<E> {
        self.validate(model)
            .err()?
            .into_iter()
            .find(|violation| violation.field == key)
            .map(|violation| violation.error)
    }
}

impl<T, E, F> FormSchema<T, E> for F
where
    E: ValidationError,
    F: Fn(&T) -> Result<T, Vec<FieldViolation<E>>> + Send + Sync,
{
    fn validate(&self, model: &T) -> Result<T, Vec<FieldViolation<E>>> {
        (self)(model)
    }
}

impl<T, E> FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    pub fn handle_change(&self, name: &str, value: impl Into<String>) -> FormResult<()> {
        let key = Self::resolve_key(name)?;
        let value = value.into();
        self.apply_change(key, move |model| {
            model.set_field_text(key, value);
        })
    }

    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        self.apply_change(lens.key(), move |model| lens.set(model, value))
    }

    pub fn touch(&self, name: &str) -> FormResult<()> {
        let key = Self::resolve_key(name)?;
        self.touch_key(key)
    }

    pub fn touch_field<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        self.touch_key(lens.key())
    }

    /// Runs the schema over the current values and replaces every field error.
    pub fn validate_form(&self) -> FormResult<bool> {
        Ok(self.run_schema()?.is_some())
    }

    pub fn validate_field<L>(&self, lens: L) -> FormResult<bool>
    where
        L: FieldLens<T>,
    {
        self.validate_field_by_key(lens.key())
    }

    fn apply_change(&self, key: FieldKey, write: impl FnOnce(&mut T)) -> FormResult<()> {
        let touched = {
            let mut state = write_lock(&self.state, "writing form value")?;
            write(&mut state.model);
            let touched = state.is_touched(key);
            if touched {
                state.errors.remove(&key);
            }
            touched
        };

        if touched && self.options.validate_mode == ValidationMode::OnChange {
            let _ = self.validate_field_by_key(key)?;
        }
        Ok(())
    }

    fn touch_key(&self, key: FieldKey) -> FormResult<()> {
        {
            let mut state = write_lock(&self.state, "touching field")?;
            state.touched.insert(key, true);
        }

        if self.options.validate_mode == ValidationMode::OnBlur {
            let _ = self.validate_field_by_key(key)?;
        }
        Ok(())
    }

    /// Validated values on success, `None` when at least one field failed.
    pub(super) fn run_schema(&self) -> FormResult<Option<T>> {
        let model = {
            read_lock(&self.state, "reading model for form validation")?
                .model
                .clone()
        };
        let result = self.schema.validate(&model);

        let mut state = write_lock(&self.state, "applying form validation result")?;
        match result {
            Ok(validated) => {
                state.errors.clear();
                Ok(Some(validated))
            }
            Err(violations) => {
                state.errors = first_error_per_field::<T, E>(violations);
                Ok(None)
            }
        }
    }

    pub(super) fn validate_field_by_key(&self, key: FieldKey) -> FormResult<bool> {
        let model = {
            read_lock(&self.state, "reading model for field validation")?
                .model
                .clone()
        };
        let error = self.schema.validate_field(&model, key);

        let mut state = write_lock(&self.state, "writing field validation result")?;
        match error {
            Some(error) => {
                state.errors.insert(key, error);
                Ok(false)
            }
            None => {
                state.errors.remove(&key);
                Ok(true)
            }
        }
    }
}

fn first_error_per_field<T, E>(violations: Vec<FieldViolation<E>>) -> BTreeMap<FieldKey, E>
where
    T: FormModel,
{
    let mut errors = BTreeMap::new();
    for violation in violations {
        if !T::field_keys().contains(&violation.field) {
            continue;
        }
        errors.entry(violation.field).or_insert(violation.error);
    }
    errors
}
