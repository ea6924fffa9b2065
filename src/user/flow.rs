use std::time::Duration;

use futures_timer::Delay;

use super::{UserForm, UserFormController, UserSummary, user_form};
use crate::form::{FormResult, SubmitError, SubmitOutcome};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RegistrationOptions {
    /// Stand-in for the round trip of a real registration request.
    pub submit_delay: Duration,
}

impl Default for RegistrationOptions {
    fn default() -> Self {
        Self {
            submit_delay: Duration::from_millis(1000),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RegistrationView {
    Editing,
    Registered(UserSummary),
}

/// Switches between the registration form and the summary of the last
/// registered user.
pub struct RegistrationFlow {
    form: UserFormController,
    view: RegistrationView,
    submitted: Option<UserForm>,
    options: RegistrationOptions,
}

impl RegistrationFlow {
    pub fn new(options: RegistrationOptions) -> FormResult<Self> {
        Ok(Self {
            form: user_form()?,
            view: RegistrationView::Editing,
            submitted: None,
            options,
        })
    }

    pub fn form(&self) -> &UserFormController {
        &self.form
    }

    pub fn view(&self) -> &RegistrationView {
        &self.view
    }

    pub fn submitted(&self) -> Option<&UserForm> {
        self.submitted.as_ref()
    }

    pub fn submit_label(&self) -> FormResult<&'static str> {
        Ok(if self.form.is_submitting()? {
            "Registrando..."
        } else {
            "Registrar"
        })
    }

    /// Submits the form and shows the summary when registration went through.
    pub async fn register(&mut self) -> FormResult<SubmitOutcome> {
        let delay = self.options.submit_delay;
        let mut accepted = None;
        let slot = &mut accepted;
        let outcome = self
            .form
            .submit_async(move |data: UserForm| async move {
                Delay::new(delay).await;
                *slot = Some(data);
                Ok::<(), SubmitError>(())
            })
            .await?;

        if let Some(data) = accepted {
            self.view = RegistrationView::Registered(UserSummary::from(&data));
            self.submitted = Some(data);
        }
        Ok(outcome)
    }

    /// Leaves the summary and starts over with an empty form.
    pub fn new_user(&mut self) -> FormResult<()> {
        self.view = RegistrationView::Editing;
        self.submitted = None;
        self.form.reset()
    }
}
