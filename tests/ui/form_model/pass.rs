use calmform::form::{FieldLens, FormModel};

#[derive(Clone, calmform::form::FormModel)]
struct DemoForm {
    email: String,
}

fn main() {
    let fields = DemoForm::fields();
    let lens = fields.email();
    let mut model = DemoForm {
        email: "a@calm.ui".to_string(),
    };
    lens.set(&mut model, "b@calm.ui".to_string());
    assert_eq!(lens.key().as_str(), "email");
    assert_eq!(lens.get(&model), "b@calm.ui");
    assert_eq!(model.field_text(lens.key()), Some("b@calm.ui"));
}
