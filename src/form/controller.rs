use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::validation::{FormModel, FormSchema, ValidationError};
use super::view::FieldDescriptor;

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
}

/// How a submit attempt ended. Never an error for the caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// The schema rejected the values, the callback was not invoked.
    Invalid,
    Submitted,
    /// The callback failed; the failure was logged and swallowed.
    CallbackFailed,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ValidationMode {
    OnChange,
    OnBlur,
    #[default]
    OnSubmit,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FormOptions {
    pub validate_mode: ValidationMode,
}

#[derive(Clone, Debug)]
pub struct FormSnapshot<T, E> {
    pub values: T,
    pub errors: BTreeMap<FieldKey, E>,
    pub touched: BTreeMap<FieldKey, bool>,
    pub submit_state: SubmitState,
    pub submit_count: u32,
    pub is_valid: bool,
}

impl<T, E> FormSnapshot<T, E> {
    pub fn is_submitting(&self) -> bool {
        self.submit_state == SubmitState::Submitting
    }

    pub fn is_touched(&self, key: FieldKey) -> bool {
        self.touched.get(&key).copied().unwrap_or(false)
    }

    pub fn error(&self, key: FieldKey) -> Option<&E> {
        self.errors.get(&key)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    StatePoisoned(&'static str),
    UnknownField(String),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::StatePoisoned(context) => {
                write!(f, "form state lock poisoned while {context}")
            }
            FormError::UnknownField(name) => write!(f, "form has no field named `{name}`"),
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

/// Failure raised by a submit callback.
pub type SubmitError = Box<dyn std::error::Error + Send + Sync>;

pub(super) struct FormState<T, E> {
    pub(super) id: FormId,
    pub(super) initial_model: T,
    pub(super) model: T,
    pub(super) errors: BTreeMap<FieldKey, E>,
    pub(super) touched: BTreeMap<FieldKey, bool>,
    pub(super) submit_state: SubmitState,
    pub(super) submit_count: u32,
}

impl<T, E> FormState<T, E> {
    pub(super) fn is_touched(&self, key: FieldKey) -> bool {
        self.touched.get(&key).copied().unwrap_or(false)
    }
}

#[derive(Clone)]
pub struct FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    pub(super) options: FormOptions,
    pub(super) state: Arc<RwLock<FormState<T, E>>>,
    pub(super) schema: Arc<dyn FormSchema<T, E>>,
    pub(super) descriptors: Arc<RwLock<BTreeMap<FieldKey, FieldDescriptor>>>,
}

impl<T, E> FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    pub fn new(initial: T, schema: impl FormSchema<T, E> + 'static, options: FormOptions) -> Self {
        Self {
            options,
            state: Arc::new(RwLock::new(FormState {
                id: FormId::next(),
                initial_model: initial.clone(),
                model: initial,
                errors: BTreeMap::new(),
                touched: BTreeMap::new(),
                submit_state: SubmitState::Idle,
                submit_count: 0,
            })),
            schema: Arc::new(schema),
            descriptors: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub fn form_id(&self) -> FormResult<FormId> {
        Ok(read_lock(&self.state, "reading form id")?.id)
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    pub fn values(&self) -> FormResult<T> {
        Ok(read_lock(&self.state, "reading form values")?.model.clone())
    }

    pub fn errors(&self) -> FormResult<BTreeMap<FieldKey, E>> {
        Ok(read_lock(&self.state, "reading form errors")?.errors.clone())
    }

    pub fn touched(&self) -> FormResult<BTreeMap<FieldKey, bool>> {
        Ok(read_lock(&self.state, "reading touched fields")?
            .touched
            .clone())
    }

    pub fn is_submitting(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading submit state")?.submit_state == SubmitState::Submitting)
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<T, E>> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            values: state.model.clone(),
            errors: state.errors.clone(),
            touched: state.touched.clone(),
            submit_state: state.submit_state,
            submit_count: state.submit_count,
            is_valid: state.errors.is_empty(),
        })
    }

    /// Runs the submit sequence with a blocking callback.
    ///
    /// Every field is marked touched and the form enters
    /// [`SubmitState::Submitting`] before validation. The callback only runs
    /// when the schema accepts the values and receives the validated copy.
    /// The form is back to [`SubmitState::Idle`] on every exit path.
    pub fn submit<F>(&self, on_valid: F) -> FormResult<SubmitOutcome>
    where
        F: FnOnce(T) -> Result<(), SubmitError>,
    {
        let guard = self.begin_submit()?;
        let Some(validated) = self.run_schema()? else {
            return Ok(guard.finish(SubmitOutcome::Invalid));
        };
        let outcome = settle(on_valid(validated));
        Ok(guard.finish(outcome))
    }

    /// Async flavour of [`FormController::submit`]. Suspends only while the
    /// callback future runs.
    pub async fn submit_async<F, Fut>(&self, on_valid: F) -> FormResult<SubmitOutcome>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<(), SubmitError>>,
    {
        let guard = self.begin_submit()?;
        let Some(validated) = self.run_schema()? else {
            return Ok(guard.finish(SubmitOutcome::Invalid));
        };
        let outcome = settle(on_valid(validated).await);
        Ok(guard.finish(outcome))
    }

    /// Binds `on_valid` into a reusable handler for a form-submit event.
    pub fn handle_submit<F, Fut>(&self, on_valid: F) -> SubmitHandler<T, E, F>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<(), SubmitError>>,
    {
        SubmitHandler {
            controller: self.clone(),
            on_valid: Arc::new(on_valid),
        }
    }

    pub fn reset(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "resetting form")?;
        state.model = state.initial_model.clone();
        state.errors.clear();
        state.touched.clear();
        state.submit_state = SubmitState::Idle;
        state.submit_count = 0;
        tracing::debug!(form = state.id.0, "form reset to initial values");
        Ok(())
    }

    pub(super) fn resolve_key(name: &str) -> FormResult<FieldKey> {
        T::key_for(name).ok_or_else(|| FormError::UnknownField(name.to_owned()))
    }

    fn begin_submit(&self) -> FormResult<SubmittingGuard<T, E>> {
        let mut state = write_lock(&self.state, "preparing submit")?;
        for key in T::field_keys() {
            state.touched.insert(*key, true);
        }
        state.submit_state = SubmitState::Submitting;
        state.submit_count = state.submit_count.saturating_add(1);
        tracing::debug!(
            form = state.id.0,
            attempt = state.submit_count,
            "form submit started"
        );
        Ok(SubmittingGuard {
            form: state.id,
            state: self.state.clone(),
        })
    }
}

/// Submit handler produced by [`FormController::handle_submit`].
pub struct SubmitHandler<T, E, F>
where
    T: FormModel,
    E: ValidationError,
{
    controller: FormController<T, E>,
    on_valid: Arc<F>,
}

impl<T, E, F> Clone for SubmitHandler<T, E, F>
where
    T: FormModel,
    E: ValidationError,
{
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            on_valid: self.on_valid.clone(),
        }
    }
}

impl<T, E, F, Fut> SubmitHandler<T, E, F>
where
    T: FormModel,
    E: ValidationError,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<(), SubmitError>>,
{
    pub async fn invoke(&self) -> FormResult<SubmitOutcome> {
        let on_valid = &self.on_valid;
        self.controller
            .submit_async(|values| (**on_valid)(values))
            .await
    }
}

/// Holds the form in [`SubmitState::Submitting`] and releases it on drop,
/// including during unwinding out of a panicking callback.
struct SubmittingGuard<T, E> {
    form: FormId,
    state: Arc<RwLock<FormState<T, E>>>,
}

impl<T, E> SubmittingGuard<T, E> {
    fn finish(self, outcome: SubmitOutcome) -> SubmitOutcome {
        tracing::debug!(form = self.form.0, ?outcome, "form submit finished");
        outcome
    }
}

impl<T, E> Drop for SubmittingGuard<T, E> {
    fn drop(&mut self) {
        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.submit_state = SubmitState::Idle;
    }
}

fn settle(result: Result<(), SubmitError>) -> SubmitOutcome {
    match result {
        Ok(()) => SubmitOutcome::Submitted,
        Err(error) => {
            tracing::error!(%error, "form submit callback failed");
            SubmitOutcome::CallbackFailed
        }
    }
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
