mod controller;
mod schema;
mod validation;
mod view;


pub use calmform_derive::FormModel;
pub use controller::{
    FieldKey, FormController, FormError, FormId, FormOptions, FormResult, FormSnapshot,
    SubmitError, SubmitHandler, SubmitOutcome, SubmitState, ValidationMode,
};
pub use schema::{FieldRules, Schema};
pub use validation::{
    FieldLens, FieldMessage, FieldViolation, FormModel, FormSchema, ValidationError,
};
pub use view::{FieldDescriptor, FieldView, InputKind};
