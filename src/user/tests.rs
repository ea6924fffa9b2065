use super::*;
use crate::form::{FieldKey, FormOptions, FormSchema, InputKind, SubmitOutcome};
use chrono::{Datelike, Local, NaiveDate};
use futures::executor::block_on;
use std::cell::RefCell;
use std::time::Duration;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date")
}

fn valid_user() -> UserForm {
    UserForm {
        name: "Ana Perez".into(),
        email: "Ana@X.com".into(),
        age: "25".into(),
        phone: "999999999".into(),
        address: "Av. Los Andes 123".into(),
        city: "Lima".into(),
        country: "Peru".into(),
        description: String::new(),
        username: "Ana_Dev".into(),
        password: "Abcdef1!".into(),
        birth_date: "1996-10-17".into(),
    }
}

fn error_for(model: &UserForm, field: &'static str) -> Option<String> {
    user_schema_at(today())
        .validate_field(model, FieldKey::new(field))
        .map(|error| error.to_string())
}

fn instant_flow() -> RegistrationFlow {
    RegistrationFlow::new(RegistrationOptions {
        submit_delay: Duration::ZERO,
    })
    .expect("flow")
}

fn fill(flow: &RegistrationFlow, model: &UserForm) {
    for key in UserForm::field_keys() {
        let value = model.field_text(*key).expect("field value").to_owned();
        flow.form()
            .handle_change(key.as_str(), value)
            .expect("change field");
    }
}

#[test]
fn field_keys_match_input_names() {
    let names = UserForm::field_keys()
        .iter()
        .map(|key| key.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "name",
            "email",
            "age",
            "phone",
            "address",
            "city",
            "country",
            "description",
            "username",
            "password",
            "birthDate",
        ]
    );
    for descriptor in USER_FIELDS {
        assert!(UserForm::key_for(descriptor.key.as_str()).is_some());
    }
}

#[test]
fn valid_user_passes_and_is_normalized() {
    let validated = user_schema_at(today())
        .validate(&valid_user())
        .expect("valid user");
    assert_eq!(validated.email, "ana@x.com");
    assert_eq!(validated.username, "ana_dev");
    assert_eq!(validated.name, "Ana Perez");
    assert_eq!(validated.password, "Abcdef1!");
}

#[test]
fn empty_template_fails_every_required_field() {
    let violations = user_schema_at(today())
        .validate(&UserForm::default())
        .expect_err("empty form");
    let failed = violations
        .iter()
        .map(|violation| violation.field.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        failed,
        vec![
            "name",
            "email",
            "age",
            "phone",
            "address",
            "city",
            "country",
            "username",
            "password",
            "birthDate",
        ]
    );
    assert_eq!(violations[0].error.to_string(), "El nombre es obligatorio");
    assert_eq!(
        violations[9].error.to_string(),
        "La fecha de nacimiento es obligatoria"
    );
}

#[test]
fn minimum_lengths_are_inclusive() {
    let cases = [
        ("name", "Ana", "An", "El nombre debe tener al menos 3 caracteres"),
        (
            "phone",
            "999999999",
            "99999999",
            "El teléfono debe tener al menos 9 dígitos",
        ),
        (
            "address",
            "Av. Lima 1",
            "Av. Lima ",
            "La dirección debe tener al menos 10 caracteres",
        ),
        ("city", "Ica", "Ic", "La ciudad debe tener al menos 3 caracteres"),
        ("country", "Perú", "Pe", "El país debe tener al menos 3 caracteres"),
        (
            "username",
            "rody",
            "rod",
            "El nombre de usuario debe tener al menos 4 caracteres",
        ),
        (
            "password",
            "Abcdef1!",
            "Abcde1!",
            "La contraseña debe tener al menos 8 caracteres",
        ),
    ];

    for (field, at_minimum, below, message) in cases {
        let mut model = valid_user();
        model.set_field_text(FieldKey::new(field), at_minimum.into());
        assert_eq!(error_for(&model, field), None, "{field} at minimum");

        model.set_field_text(FieldKey::new(field), below.into());
        assert_eq!(error_for(&model, field).as_deref(), Some(message), "{field}");
    }
}

#[test]
fn maximum_lengths() {
    let mut model = valid_user();
    model.name = "a".repeat(51);
    model.description = "d".repeat(501);
    model.username = "u".repeat(21);
    assert_eq!(
        error_for(&model, "name").as_deref(),
        Some("El nombre no debe exceder 50 caracteres")
    );
    assert_eq!(
        error_for(&model, "description").as_deref(),
        Some("La descripción no debe exceder 500 caracteres")
    );
    assert_eq!(
        error_for(&model, "username").as_deref(),
        Some("El nombre de usuario no debe exceder 20 caracteres")
    );

    model.description = "d".repeat(500);
    assert_eq!(error_for(&model, "description"), None);
}

#[test]
fn character_classes() {
    let mut model = valid_user();
    model.name = "Ñandú Pérez".into();
    model.city = "Lima 2".into();
    model.phone = "+51 999-999-999".into();
    model.username = "ana.dev".into();
    assert_eq!(error_for(&model, "name"), None);
    assert_eq!(
        error_for(&model, "city").as_deref(),
        Some("La ciudad solo puede contener letras")
    );
    assert_eq!(error_for(&model, "phone"), None);
    assert_eq!(
        error_for(&model, "username").as_deref(),
        Some("Solo se permiten letras, números y guiones bajos")
    );

    model.phone = "999 999 99a".into();
    assert_eq!(
        error_for(&model, "phone").as_deref(),
        Some("Solo se permiten números, +, espacios y guiones")
    );
}

#[test]
fn email_rules() {
    let mut model = valid_user();
    model.email = "ana@".into();
    assert_eq!(
        error_for(&model, "email").as_deref(),
        Some("Ingresa un email válido")
    );
}

#[test]
fn password_rules_report_first_missing_class() {
    let cases = [
        ("abcdef1!", "Debe contener al menos una mayúscula"),
        ("ABCDEF1!", "Debe contener al menos una minúscula"),
        ("Abcdefg!", "Debe contener al menos un número"),
        ("Abcdefg1", "Debe contener al menos un carácter especial"),
        ("abcdefgh", "Debe contener al menos una mayúscula"),
    ];
    for (password, message) in cases {
        let model = UserForm {
            password: password.into(),
            ..valid_user()
        };
        assert_eq!(error_for(&model, "password").as_deref(), Some(message));
    }
}

#[test]
fn age_rules() {
    let cases = [
        ("veinte", Some("Debe ser un número")),
        ("17", Some("Debes ser mayor de 18 años")),
        ("18", None),
        ("120", None),
        ("121", Some("Ingresa una edad válida")),
        ("30.5", None),
        ("1_8", Some("Debe ser un número")),
        ("2_5", Some("Debe ser un número")),
        ("1e400", Some("Ingresa una edad válida")),
        ("1e-400", Some("Debes ser mayor de 18 años")),
        ("-1e400", Some("Debes ser mayor de 18 años")),
        ("2.5e1", None),
    ];
    for (age, message) in cases {
        let model = UserForm {
            age: age.into(),
            ..valid_user()
        };
        assert_eq!(error_for(&model, "age").as_deref(), message, "age {age}");
    }
}

#[test]
fn birth_date_rules() {
    let cases = [
        ("no es fecha", Some("Fecha inválida")),
        ("2026-10-18", Some("La fecha no puede ser futura")),
        ("2030-01-01", Some("La fecha no puede ser futura")),
        ("2009-10-17", Some("Debes ser mayor de 18 años")),
        ("2008-10-18", Some("Debes ser mayor de 18 años")),
        ("2008-10-17", None),
        ("1996-10-17", None),
    ];
    for (birth_date, message) in cases {
        let model = UserForm {
            birth_date: birth_date.into(),
            ..valid_user()
        };
        assert_eq!(
            error_for(&model, "birthDate").as_deref(),
            message,
            "birth date {birth_date}"
        );
    }
}

#[test]
fn default_schema_dates_against_local_today() {
    let now = Local::now().date_naive();
    let thirty_years_ago = NaiveDate::from_ymd_opt(now.year() - 30, 1, 1).expect("date");
    let model = UserForm {
        birth_date: thirty_years_ago.format("%Y-%m-%d").to_string(),
        ..valid_user()
    };
    assert!(user_schema().validate(&model).is_ok());
}

#[test]
fn submit_passes_normalized_values_to_callback() {
    let form = FormController::new(
        UserForm::default(),
        user_schema_at(today()),
        FormOptions::default(),
    );
    let user = valid_user();
    for key in UserForm::field_keys() {
        form.handle_change(key.as_str(), user.field_text(*key).expect("value"))
            .expect("change");
    }

    let received = RefCell::new(Vec::new());
    let outcome = form
        .submit(|values| {
            received.borrow_mut().push(values);
            Ok(())
        })
        .expect("submit");

    assert_eq!(outcome, SubmitOutcome::Submitted);
    let received = received.into_inner();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].email, "ana@x.com");
    assert_eq!(received[0].username, "ana_dev");
    assert!(form.errors().expect("errors").is_empty());
}

#[test]
fn underage_submit_never_calls_back() {
    let form = FormController::new(
        UserForm {
            birth_date: "2009-01-01".into(),
            ..valid_user()
        },
        user_schema_at(today()),
        FormOptions::default(),
    );

    let outcome = form
        .submit(|_| panic!("underage user must not be submitted"))
        .expect("submit");
    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(
        form.field_error_for_display(UserForm::fields().birth_date())
            .expect("display error")
            .as_deref(),
        Some("Debes ser mayor de 18 años")
    );
    assert!(!form.is_submitting().expect("submitting"));
}

#[test]
fn user_form_registers_field_metadata() {
    let form = user_form().expect("user form");
    let birth = form.field_view("birthDate").expect("birth date view");
    assert_eq!(birth.label, Some("Fecha de nacimiento"));
    assert_eq!(birth.kind, InputKind::Date);
    assert!(birth.required);

    let description = form.field_view("description").expect("description view");
    assert_eq!(description.kind, InputKind::TextArea);
    assert!(!description.required);
    assert_eq!(form.field_views().expect("views").len(), 11);
}

#[test]
fn summary_lists_submitted_values() {
    let summary = UserSummary::from(&valid_user());
    assert_eq!(summary.row("Edad"), Some("25 años"));
    assert_eq!(summary.row("Fecha de nacimiento"), Some("1996-10-17"));
    assert_eq!(summary.row("Descripción"), None);
    assert_eq!(summary.rows.len(), 9);

    let described = UserSummary::from(&UserForm {
        description: "Me gusta Rust".into(),
        ..valid_user()
    });
    assert_eq!(described.row("Descripción"), Some("Me gusta Rust"));
}

#[test]
fn registration_flow_stays_on_form_when_invalid() {
    let mut flow = instant_flow();
    assert_eq!(flow.submit_label().expect("label"), "Registrar");

    let outcome = block_on(flow.register()).expect("register");
    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(flow.view(), &RegistrationView::Editing);
    assert!(flow.submitted().is_none());

    let name = flow.form().field_view("name").expect("name view");
    assert_eq!(name.error.as_deref(), Some("El nombre es obligatorio"));
}

#[test]
fn registration_flow_shows_summary_then_starts_over() {
    let mut flow = instant_flow();
    let mut user = valid_user();
    let now = Local::now().date_naive();
    user.birth_date = NaiveDate::from_ymd_opt(now.year() - 30, 6, 15)
        .expect("date")
        .format("%Y-%m-%d")
        .to_string();
    fill(&flow, &user);

    let outcome = block_on(flow.register()).expect("register");
    assert_eq!(outcome, SubmitOutcome::Submitted);
    let RegistrationView::Registered(summary) = flow.view() else {
        panic!("expected summary view");
    };
    assert_eq!(summary.row("Email"), Some("ana@x.com"));
    assert_eq!(summary.row("Nombre de usuario"), Some("ana_dev"));
    assert_eq!(
        flow.submitted().map(|data| data.email.as_str()),
        Some("ana@x.com")
    );

    flow.new_user().expect("new user");
    assert_eq!(flow.view(), &RegistrationView::Editing);
    let snapshot = flow.form().snapshot().expect("snapshot");
    assert_eq!(snapshot.values, UserForm::default());
    assert!(snapshot.errors.is_empty());
    assert!(snapshot.touched.is_empty());
}
