pub use crate::form::{
    FieldKey, FieldLens, FieldMessage, FieldRules, FieldView, FieldViolation, FormController,
    FormError, FormModel, FormOptions, FormResult, FormSchema, FormSnapshot, Schema, SubmitError,
    SubmitOutcome, SubmitState, ValidationError, ValidationMode,
};
pub use crate::user::{
    RegistrationFlow, RegistrationOptions, RegistrationView, UserForm, UserSummary, user_schema,
};
