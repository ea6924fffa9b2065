//! The user registration form: model, rules, field metadata, summary view and
//! the editing/registered flow around them.

mod fields;
mod flow;
mod schema;
mod summary;

#[cfg(test)]
mod tests;

use crate::form::{FieldMessage, FormController, FormModel, FormOptions};

pub use fields::USER_FIELDS;
pub use flow::{RegistrationFlow, RegistrationOptions, RegistrationView};
pub use schema::{user_schema, user_schema_at};
pub use summary::{SummaryRow, UserSummary};

/// Registration form values. `Default` is the empty template the form starts from.
#[derive(Clone, Debug, Default, Eq, PartialEq, FormModel)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub age: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub description: String,
    pub username: String,
    pub password: String,
    #[form(rename = "birthDate")]
    pub birth_date: String,
}

pub type UserFormController = FormController<UserForm, FieldMessage>;

/// An empty registration form validated on submit, with field metadata registered.
pub fn user_form() -> crate::form::FormResult<UserFormController> {
    let controller = FormController::new(UserForm::default(), user_schema(), FormOptions::default());
    controller.register_descriptors(&USER_FIELDS)?;
    Ok(controller)
}
