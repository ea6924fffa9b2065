use super::UserForm;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

/// Read-only view of a registered user, built only from the submitted values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserSummary {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub rows: Vec<SummaryRow>,
}

impl UserSummary {
    pub fn row(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

impl From<&UserForm> for UserSummary {
    fn from(data: &UserForm) -> Self {
        let mut rows = vec![
            SummaryRow {
                label: "Nombre completo",
                value: data.name.clone(),
            },
            SummaryRow {
                label: "Email",
                value: data.email.clone(),
            },
            SummaryRow {
                label: "Edad",
                value: format!("{} años", data.age),
            },
            SummaryRow {
                label: "Teléfono",
                value: data.phone.clone(),
            },
            SummaryRow {
                label: "Fecha de nacimiento",
                value: data.birth_date.clone(),
            },
            SummaryRow {
                label: "Nombre de usuario",
                value: data.username.clone(),
            },
            SummaryRow {
                label: "Dirección",
                value: data.address.clone(),
            },
            SummaryRow {
                label: "Ciudad",
                value: data.city.clone(),
            },
            SummaryRow {
                label: "País",
                value: data.country.clone(),
            },
        ];
        if !data.description.is_empty() {
            rows.push(SummaryRow {
                label: "Descripción",
                value: data.description.clone(),
            });
        }

        Self {
            title: "¡Usuario Registrado Exitosamente!",
            subtitle: "Aquí está la información registrada",
            rows,
        }
    }
}
