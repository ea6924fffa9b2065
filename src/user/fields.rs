use crate::form::{FieldDescriptor, FieldKey, InputKind};

const fn required(
    key: &'static str,
    label: &'static str,
    placeholder: Option<&'static str>,
    kind: InputKind,
) -> FieldDescriptor {
    FieldDescriptor {
        key: FieldKey::new(key),
        label,
        placeholder,
        kind,
        required: true,
    }
}

pub const USER_FIELDS: [FieldDescriptor; 11] = [
    required(
        "name",
        "Nombre completo",
        Some("Ej: Rody Huancas"),
        InputKind::Text,
    ),
    required(
        "email",
        "Correo electrónico",
        Some("rody@email.com"),
        InputKind::Email,
    ),
    required("age", "Edad", Some("Ej: 25"), InputKind::Number),
    required(
        "address",
        "Dirección",
        Some("Ej: Inca Yupanqui 4741"),
        InputKind::Text,
    ),
    required("city", "Ciudad", Some("Ej: Lima"), InputKind::Text),
    required("country", "País", Some("Ej: Perú"), InputKind::Text),
    required("phone", "Teléfono", Some("Ej: 999 999 999"), InputKind::Tel),
    required("birthDate", "Fecha de nacimiento", None, InputKind::Date),
    required(
        "username",
        "Nombre de Usuario",
        Some("Ej: rody_dev"),
        InputKind::Text,
    ),
    required(
        "password",
        "Contraseña",
        Some("*****************"),
        InputKind::Password,
    ),
    FieldDescriptor {
        key: FieldKey::new("description"),
        label: "Descripción (Opcional)",
        placeholder: Some("Cuéntanos sobre ti..."),
        kind: InputKind::TextArea,
        required: false,
    },
];
