use super::controller::{FieldKey, FormController, FormResult, SubmitState, read_lock, write_lock};
use super::validation::{FieldLens, FormModel, ValidationError};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum InputKind {
    #[default]
    Text,
    Email,
    Number,
    Tel,
    Date,
    Password,
    TextArea,
}

/// Static presentation metadata for one field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub label: &'static str,
    pub placeholder: Option<&'static str>,
    pub kind: InputKind,
    pub required: bool,
}

/// Everything an input widget needs to render one field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldView {
    pub key: FieldKey,
    pub value: String,
    pub error: Option<String>,
    pub disabled: bool,
    pub required: bool,
    pub label: Option<&'static str>,
    pub placeholder: Option<&'static str>,
    pub kind: InputKind,
}

impl<T, E> FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    pub fn register_descriptors(&self, descriptors: &[FieldDescriptor]) -> FormResult<()> {
        let mut registry = write_lock(&self.descriptors, "registering field descriptors")?;
        for descriptor in descriptors {
            registry.insert(descriptor.key, *descriptor);
        }
        Ok(())
    }

    pub fn field_error_for_display<L>(&self, lens: L) -> FormResult<Option<String>>
    where
        L: FieldLens<T>,
    {
        self.display_error_message(lens.key())
    }

    pub fn field_view(&self, name: &str) -> FormResult<FieldView> {
        let key = Self::resolve_key(name)?;
        self.field_view_by_key(key)
    }

    /// Views for every field, in declaration order.
    pub fn field_views(&self) -> FormResult<Vec<FieldView>> {
        T::field_keys()
            .iter()
            .map(|key| self.field_view_by_key(*key))
            .collect()
    }

    fn field_view_by_key(&self, key: FieldKey) -> FormResult<FieldView> {
        let descriptor = read_lock(&self.descriptors, "reading field descriptor")?
            .get(&key)
            .copied();
        let error = self.display_error_message(key)?;
        let state = read_lock(&self.state, "reading field view")?;
        Ok(FieldView {
            key,
            value: state.model.field_text(key).unwrap_or_default().to_owned(),
            error,
            disabled: state.submit_state == SubmitState::Submitting,
            required: descriptor.is_some_and(|d| d.required),
            label: descriptor.map(|d| d.label),
            placeholder: descriptor.and_then(|d| d.placeholder),
            kind: descriptor.map(|d| d.kind).unwrap_or_default(),
        })
    }

    fn display_error_message(&self, key: FieldKey) -> FormResult<Option<String>> {
        let state = read_lock(&self.state, "reading display error message")?;
        if !state.is_touched(key) {
            return Ok(None);
        }
        Ok(state
            .errors
            .get(&key)
            .map(|error| error.message().to_owned()))
    }
}
