// src/common/dates.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::common::error::AppError;

/// Qual ponta de um intervalo o parâmetro representa.
/// Uma data "pura" vira início do dia (Start) ou fim do dia (End).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const ISO_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

fn end_of_day() -> NaiveTime {
    // 23:59:59.999999999
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN)
}

/// Aceita `yyyy-MM-dd`, `yyyy-MM-dd HH:mm:ss` ou ISO-8601 (com ou sem offset).
/// Horários sem fuso são interpretados como UTC.
pub fn parse_date_param(raw: &str, bound: Bound) -> Result<DateTime<Utc>, AppError> {
    let value = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        let time = match bound {
            Bound::Start => NaiveTime::MIN,
            Bound::End => end_of_day(),
        };
        return Ok(date.and_time(time).and_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT) {
        return Ok(dt.and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, ISO_LOCAL_FORMAT) {
        return Ok(dt.and_utc());
    }

    Err(AppError::BadRequest(format!(
        "Formato de data inválido: '{}'. Use yyyy-MM-dd, yyyy-MM-dd HH:mm:ss ou ISO-8601.",
        raw
    )))
}

/// Variante para parâmetros opcionais; vazio conta como ausente.
pub fn parse_optional(raw: Option<&str>, bound: Bound) -> Result<Option<DateTime<Utc>>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => parse_date_param(value, bound).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn bare_date_expands_to_day_bounds() {
        let start = parse_date_param("2024-03-10", Bound::Start).unwrap();
        assert_eq!((start.hour(), start.minute(), start.second()), (0, 0, 0));

        let end = parse_date_param("2024-03-10", Bound::End).unwrap();
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
        assert_eq!(end.nanosecond(), 999_999_999);
        assert_eq!(end.day(), 10);
    }

    #[test]
    fn accepts_space_separated_and_iso_timestamps() {
        let a = parse_date_param("2024-03-10 14:30:00", Bound::Start).unwrap();
        assert_eq!(a.hour(), 14);

        let b = parse_date_param("2024-03-10T14:30:00", Bound::End).unwrap();
        assert_eq!(b.minute(), 30);

        let c = parse_date_param("2024-03-10T14:30:00+02:00", Bound::Start).unwrap();
        assert_eq!(c.hour(), 12);
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_date_param("10/03/2024", Bound::Start).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn blank_optional_is_none() {
        assert!(parse_optional(Some("  "), Bound::Start).unwrap().is_none());
        assert!(parse_optional(None, Bound::End).unwrap().is_none());
    }
}
