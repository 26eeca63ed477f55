//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión tolerante de los valores que entrega la API de Colibrí.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use validator::ValidationError;

lazy_static! {
    /// Mes en formato `YYYY-MM`
    pub static ref MONTH_REGEX: Regex = Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").unwrap();
}

/// Mes del calendario (año + mes 1..=12)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(instant: &DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        instant.year() == self.year && instant.month() == self.month
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Validar y convertir string `YYYY-MM` a mes
pub fn validate_month(value: &str) -> Result<YearMonth, ValidationError> {
    let invalid = || {
        let mut error = ValidationError::new("month");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM".to_string());
        error
    };

    if !MONTH_REGEX.is_match(value) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
        .map(|date| YearMonth {
            year: date.year(),
            month: date.month(),
        })
        .map_err(|_| invalid())
}

/// Convertir un timestamp en texto a UTC.
///
/// Acepta RFC 3339 y fechas sin zona (`YYYY-MM-DDTHH:MM[:SS[.fff]]`,
/// también con espacio), que se interpretan como UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Convertir un valor JSON (número o texto) a decimal
pub fn parse_decimal(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(|f| Decimal::try_from(f).ok())
            }
        }
        serde_json::Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Deserializador tolerante: timestamps nulos o inválidos quedan en `None`
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => parse_timestamp(&s),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    })
}

/// Deserializador tolerante para montos opcionales
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_decimal))
}

/// Deserializador tolerante para listas de precios; descarta entradas inválidas
pub fn lenient_decimal_list<'de, D>(deserializer: D) -> Result<Vec<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(items)) => items.iter().filter_map(parse_decimal).collect(),
        _ => Vec::new(),
    })
}

/// Deserializador tolerante para enteros no negativos (asientos)
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Deserializador tolerante para textos opcionales (acepta números)
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
