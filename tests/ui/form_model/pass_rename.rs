use calmform::form::{FieldKey, FieldLens, FormModel};

#[derive(Clone, Default, calmform::form::FormModel)]
struct SignupForm {
    #[form(rename = "birthDate")]
    birth_date: String,
    nickname: String,
}

fn main() {
    assert_eq!(SignupForm::fields().birth_date().key().as_str(), "birthDate");
    assert_eq!(
        SignupForm::field_keys(),
        &[FieldKey::new("birthDate"), FieldKey::new("nickname")]
    );

    let mut model = SignupForm::default();
    assert!(model.set_field_text(FieldKey::new("birthDate"), "2000-01-01".to_string()));
    assert!(!model.set_field_text(FieldKey::new("birth_date"), "ignored".to_string()));
    assert_eq!(model.birth_date, "2000-01-01");
    assert_eq!(model.nickname, "");
}
