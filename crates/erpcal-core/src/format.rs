//! Wire formats shared by the ERP document types.
//!
//! The ERP speaks `YYYY-MM-DD HH:MM:SS` datetimes and `YYYY-MM-DD` dates,
//! sends blank strings for unset select fields, and lets form inputs carry
//! numbers as either JSON numbers or text.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub const ERP_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const ERP_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ERP datetime. Accepts the ERP format, ISO-8601 with a `T`
/// separator, fractional seconds, and bare dates (midnight).
pub fn parse_erp_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    parse_with_time(raw).or_else(|| {
        NaiveDate::parse_from_str(raw, ERP_DATE_FORMAT)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

fn parse_with_time(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Parse an ERP date. A full datetime string yields its date part; any
/// other trailing text is rejected.
pub fn parse_erp_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, ERP_DATE_FORMAT)
        .ok()
        .or_else(|| parse_with_time(raw).map(|dt| dt.date()))
}

/// Serde adapter for `NaiveDateTime` fields in ERP format.
pub mod erp_datetime {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format(ERP_DATETIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_erp_datetime(&raw).ok_or_else(|| de::Error::custom(format!("invalid datetime: {raw}")))
    }
}

/// Serde adapter for `NaiveDate` fields in ERP format.
pub mod erp_date {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format(ERP_DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse_erp_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
    }
}

/// Deserialize an optional string-like field, treating null and blank
/// strings as absent.
pub fn blank_as_none<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(d)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(de::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Check {
    Bool(bool),
    Int(i64),
    Text(String),
    Null(()),
}

impl Check {
    fn into_flag(self) -> Option<bool> {
        match self {
            Check::Bool(b) => Some(b),
            Check::Int(n) => Some(n != 0),
            Check::Text(s) => match s.trim() {
                "" => None,
                "0" | "false" => Some(false),
                _ => Some(true),
            },
            Check::Null(()) => None,
        }
    }
}

/// Deserialize an ERP check field, which arrives as `0`/`1` or a bool.
pub fn check_field<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(Check::deserialize(d)?.into_flag().unwrap_or(false))
}

/// Like [`check_field`], keeping null and blank as `None`.
pub fn optional_check_field<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(Check::deserialize(d)?.into_flag())
}

/// Deserialize a field whose `null` means "use the default".
pub fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Optional ERP date where null and blank strings mean absent.
pub fn optional_erp_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_erp_date(s)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date: {s}"))),
    }
}

/// A numeric form input that may arrive as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    /// Numeric value, 0 when the text does not parse.
    pub fn coerce(&self) -> f64 {
        match self {
            NumberInput::Number(n) if n.is_finite() => *n,
            NumberInput::Number(_) => 0.0,
            NumberInput::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(0.0),
        }
    }
}

impl From<f64> for NumberInput {
    fn from(n: f64) -> Self {
        NumberInput::Number(n)
    }
}

impl From<&str> for NumberInput {
    fn from(s: &str) -> Self {
        NumberInput::Text(s.to_string())
    }
}

/// Coerce an optional numeric input, 0 when absent.
pub fn coerce_number(input: Option<&NumberInput>) -> f64 {
    input.map_or(0.0, NumberInput::coerce)
}

/// Title-case each word: `"in progress"` becomes `"In Progress"`.
pub fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_erp_and_iso_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_erp_datetime("2024-03-05 09:30:00"), Some(expected));
        assert_eq!(parse_erp_datetime("2024-03-05T09:30:00"), Some(expected));
        assert_eq!(parse_erp_datetime("2024-03-05 09:30:00.000000"), Some(expected));
        assert_eq!(parse_erp_datetime("2024-03-05 09:30"), Some(expected));
        assert_eq!(
            parse_erp_datetime("2024-03-05"),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_erp_datetime("next tuesday"), None);
    }

    #[test]
    fn parses_dates_from_datetimes() {
        assert_eq!(
            parse_erp_date("2024-03-05 18:00:00"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_erp_date("2024-03-05T18:00"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(parse_erp_date("05/03/2024"), None);
        assert_eq!(parse_erp_date(""), None);
    }

    #[test]
    fn rejects_dates_with_trailing_text() {
        assert_eq!(parse_erp_date("2024-07-01xyz"), None);
        assert_eq!(parse_erp_date("2024-07-01 later"), None);
        assert_eq!(parse_erp_datetime("2024-07-01xyz"), None);
    }

    #[test]
    fn number_input_coercion_defaults_to_zero() {
        assert_eq!(NumberInput::from(2.5).coerce(), 2.5);
        assert_eq!(NumberInput::from(" 12 ").coerce(), 12.0);
        assert_eq!(NumberInput::from("twelve").coerce(), 0.0);
        assert_eq!(NumberInput::from("").coerce(), 0.0);
        assert_eq!(NumberInput::from("NaN").coerce(), 0.0);
        assert_eq!(coerce_number(None), 0.0);
    }

    #[test]
    fn number_input_accepts_both_json_shapes() {
        let items: Vec<NumberInput> = serde_json::from_str(r#"[3, "4.5", "x"]"#).unwrap();
        let values: Vec<f64> = items.iter().map(NumberInput::coerce).collect();
        assert_eq!(values, vec![3.0, 4.5, 0.0]);
    }

    #[test]
    fn check_field_accepts_ints_and_bools() {
        #[derive(Deserialize)]
        struct Doc {
            #[serde(default, deserialize_with = "check_field")]
            all_day: bool,
        }

        let parse = |raw: &str| serde_json::from_str::<Doc>(raw).unwrap().all_day;
        assert!(parse(r#"{"all_day": 1}"#));
        assert!(parse(r#"{"all_day": true}"#));
        assert!(!parse(r#"{"all_day": 0}"#));
        assert!(!parse(r#"{"all_day": null}"#));
        assert!(!parse("{}"));
    }

    #[test]
    fn optional_adapters_treat_null_and_blank_as_absent() {
        #[derive(Deserialize)]
        struct Doc {
            #[serde(default, deserialize_with = "optional_check_field")]
            repeat: Option<bool>,
            #[serde(default, deserialize_with = "optional_erp_date")]
            date: Option<NaiveDate>,
            #[serde(default, deserialize_with = "null_as_default")]
            color: String,
        }

        let doc: Doc =
            serde_json::from_str(r#"{"repeat": 0, "date": "", "color": null}"#).unwrap();
        assert_eq!(doc.repeat, Some(false));
        assert_eq!(doc.date, None);
        assert_eq!(doc.color, "");

        let doc: Doc =
            serde_json::from_str(r#"{"repeat": "1", "date": "2024-07-01", "color": "red"}"#)
                .unwrap();
        assert_eq!(doc.repeat, Some(true));
        assert_eq!(doc.date, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert_eq!(doc.color, "red");

        let doc: Doc = serde_json::from_str(r#"{"repeat": null}"#).unwrap();
        assert_eq!(doc.repeat, None);
        assert!(serde_json::from_str::<Doc>(r#"{"date": "soon"}"#).is_err());
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("open"), "Open");
        assert_eq!(title_case("HIGH"), "High");
        assert_eq!(title_case("in  progress"), "In Progress");
        assert_eq!(title_case(""), "");
    }
}
