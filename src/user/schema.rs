use std::num::IntErrorKind;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use super::UserForm;
use crate::form::{FieldMessage, FormModel, Schema};

static LETTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑ\s]+$").expect("letters pattern"));
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9+\s-]+$").expect("phone pattern"));
static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:(?P<radix>0[xXoObB][0-9a-fA-F]+)",
        r"|(?P<sign>[+-])?(?:(?P<infinity>Infinity)",
        r"|(?P<int>[0-9]*)(?:\.(?P<frac>[0-9]*))?(?:[eE](?P<exp>[+-]?[0-9]+))?))$",
    ))
    .expect("number pattern")
});
static USERNAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("username pattern"));
static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("uppercase pattern"));
static LOWERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").expect("lowercase pattern"));
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").expect("digit pattern"));
static SPECIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("special pattern"));

const ADULT_AGE: i32 = 18;
/// Significant digits a `Decimal` mantissa always holds.
const DECIMAL_DIGITS: usize = 28;

type Today = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Registration rules, dating birth dates against the local calendar day.
pub fn user_schema() -> Schema<UserForm, FieldMessage> {
    build(Arc::new(|| Local::now().date_naive()))
}

/// Registration rules with a fixed "today".
pub fn user_schema_at(today: NaiveDate) -> Schema<UserForm, FieldMessage> {
    build(Arc::new(move || today))
}

fn build(today: Today) -> Schema<UserForm, FieldMessage> {
    let fields = UserForm::fields();
    let not_future = today.clone();

    Schema::<UserForm, FieldMessage>::new()
        .field(fields.name(), |rules| {
            rules
                .min_len(1, "El nombre es obligatorio")
                .min_len(3, "El nombre debe tener al menos 3 caracteres")
                .max_len(50, "El nombre no debe exceder 50 caracteres")
                .pattern(&LETTERS, "El nombre solo puede contener letras")
        })
        .field(fields.email(), |rules| {
            rules
                .min_len(1, "El email es obligatorio")
                .email("Ingresa un email válido")
                .lowercase()
        })
        .field(fields.age(), |rules| {
            rules
                .min_len(1, "La edad es obligatoria")
                .refine(|value| parse_number(value).is_some(), "Debe ser un número")
                .refine(
                    |value| parse_number(value).is_some_and(|age| age >= Decimal::from(18)),
                    "Debes ser mayor de 18 años",
                )
                .refine(
                    |value| parse_number(value).is_some_and(|age| age <= Decimal::from(120)),
                    "Ingresa una edad válida",
                )
        })
        .field(fields.phone(), |rules| {
            rules
                .min_len(1, "El teléfono es obligatorio")
                .min_len(9, "El teléfono debe tener al menos 9 dígitos")
                .max_len(15, "El teléfono no debe exceder 15 dígitos")
                .pattern(&PHONE, "Solo se permiten números, +, espacios y guiones")
        })
        .field(fields.address(), |rules| {
            rules
                .min_len(1, "La dirección es obligatoria")
                .min_len(10, "La dirección debe tener al menos 10 caracteres")
                .max_len(100, "La dirección no debe exceder 100 caracteres")
        })
        .field(fields.city(), |rules| {
            rules
                .min_len(1, "La ciudad es obligatoria")
                .min_len(3, "La ciudad debe tener al menos 3 caracteres")
                .max_len(50, "La ciudad no debe exceder 50 caracteres")
                .pattern(&LETTERS, "La ciudad solo puede contener letras")
        })
        .field(fields.country(), |rules| {
            rules
                .min_len(1, "El país es obligatorio")
                .min_len(3, "El país debe tener al menos 3 caracteres")
                .max_len(50, "El país no debe exceder 50 caracteres")
                .pattern(&LETTERS, "El país solo puede contener letras")
        })
        .field(fields.description(), |rules| {
            rules.max_len(500, "La descripción no debe exceder 500 caracteres")
        })
        .field(fields.username(), |rules| {
            rules
                .min_len(1, "El nombre de usuario es obligatorio")
                .min_len(4, "El nombre de usuario debe tener al menos 4 caracteres")
                .max_len(20, "El nombre de usuario no debe exceder 20 caracteres")
                .pattern(&USERNAME, "Solo se permiten letras, números y guiones bajos")
                .lowercase()
        })
        .field(fields.password(), |rules| {
            rules
                .min_len(1, "La contraseña es obligatoria")
                .min_len(8, "La contraseña debe tener al menos 8 caracteres")
                .max_len(50, "La contraseña no debe exceder 50 caracteres")
                .pattern(&UPPERCASE, "Debe contener al menos una mayúscula")
                .pattern(&LOWERCASE, "Debe contener al menos una minúscula")
                .pattern(&DIGIT, "Debe contener al menos un número")
                .pattern(&SPECIAL, "Debe contener al menos un carácter especial")
        })
        .field(fields.birth_date(), move |rules| {
            rules
                .min_len(1, "La fecha de nacimiento es obligatoria")
                .refine(|value| parse_date(value).is_some(), "Fecha inválida")
                .refine(
                    move |value| parse_date(value).is_some_and(|birth| birth <= not_future()),
                    "La fecha no puede ser futura",
                )
                .refine(
                    move |value| {
                        parse_date(value)
                            .is_some_and(|birth| full_years(birth, today()) >= ADULT_AGE)
                    },
                    "Debes ser mayor de 18 años",
                )
        })
}

/// Reads a text input the way a browser number field does. Blank input reads as
/// zero, magnitudes past the decimal range saturate and tiny ones round to zero.
fn parse_number(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    let captures = NUMBER.captures(trimmed)?;
    if let Some(radix) = captures.name("radix") {
        return parse_radix(radix.as_str());
    }

    let negative = captures.name("sign").is_some_and(|sign| sign.as_str() == "-");
    let magnitude = if captures.name("infinity").is_some() {
        Decimal::MAX
    } else {
        let int = captures.name("int").map_or("", |digits| digits.as_str());
        let frac = captures.name("frac").map_or("", |digits| digits.as_str());
        if int.is_empty() && frac.is_empty() {
            return None;
        }
        let exponent = captures.name("exp").map_or(0, |exp| {
            let exp = exp.as_str();
            exp.parse::<i64>().unwrap_or(if exp.starts_with('-') {
                i64::MIN / 2
            } else {
                i64::MAX / 2
            })
        });
        scaled_decimal(&format!("{int}{frac}"), exponent.saturating_sub(frac.len() as i64))?
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// `digits × 10^exponent`, saturating at `Decimal::MAX` and flushing to zero.
fn scaled_decimal(digits: &str, exponent: i64) -> Option<Decimal> {
    let digits = digits.trim_start_matches('0');
    let significant = digits.trim_end_matches('0');
    if significant.is_empty() {
        return Some(Decimal::ZERO);
    }
    let kept = &significant[..significant.len().min(DECIMAL_DIGITS)];
    let exponent = exponent.saturating_add((digits.len() - kept.len()) as i64);
    if exponent.saturating_add(kept.len() as i64) > DECIMAL_DIGITS as i64 {
        return Some(Decimal::MAX);
    }

    let (mantissa, scale) = if exponent >= 0 {
        let mantissa = kept.parse::<i128>().ok()?;
        (mantissa * 10i128.pow(exponent as u32), 0)
    } else {
        let scale = exponent.unsigned_abs();
        let excess = scale.saturating_sub(DECIMAL_DIGITS as u64);
        if excess >= kept.len() as u64 {
            return Some(Decimal::ZERO);
        }
        let kept = &kept[..kept.len() - excess as usize];
        (kept.parse::<i128>().ok()?, (scale - excess) as u32)
    };
    Decimal::try_from_i128_with_scale(mantissa, scale).ok()
}

fn parse_radix(literal: &str) -> Option<Decimal> {
    let (prefix, digits) = literal.split_at(2);
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        _ => 2,
    };
    match u128::from_str_radix(digits, radix) {
        Ok(value) => Some(
            i128::try_from(value)
                .ok()
                .and_then(|value| Decimal::try_from_i128_with_scale(value, 0).ok())
                .unwrap_or(Decimal::MAX),
        ),
        Err(error) if *error.kind() == IntErrorKind::PosOverflow => Some(Decimal::MAX),
        Err(_) => None,
    }
}

/// Accepts `YYYY-MM-DD` (date inputs) or a full RFC 3339 timestamp.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}

fn full_years(birth: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years - 1
    } else {
        years
    }
}
