//! Date-family fields: dates, months, date-times and their numeric parts.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use formwork_document::path::{FieldPath, PathSegment};
use formwork_document::value::{Value, YearMonth};
use indexmap::IndexMap;

use super::{Common, FieldDescriptor, FieldKind, Parsed, common_options};
use crate::check::Check;
use crate::config::Config;
use crate::constraint::Constraint;
use crate::context::ValidationContext;
use crate::descriptor::number;
use crate::result::ResultCode;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateKind {
    Date,
    Month,
    DateTime,
}

impl DateKind {
    pub fn name(&self) -> &'static str {
        match self {
            DateKind::Date => "date",
            DateKind::Month => "month",
            DateKind::DateTime => "datetime",
        }
    }

    /// The parts a value of this kind is split into.
    pub fn parts(&self) -> &'static [DatePart] {
        match self {
            DateKind::Date => &[DatePart::Year, DatePart::Month, DatePart::Day],
            DateKind::Month => &[DatePart::Year, DatePart::Month],
            DateKind::DateTime => &[
                DatePart::Year,
                DatePart::Month,
                DatePart::Day,
                DatePart::Hour,
                DatePart::Minute,
            ],
        }
    }

    pub fn invalid_code(&self) -> ResultCode {
        match self {
            DateKind::Date => ResultCode::InvalidDate,
            DateKind::Month => ResultCode::InvalidMonth,
            DateKind::DateTime => ResultCode::InvalidDateTime,
        }
    }

    pub fn parse_text(&self, text: &str) -> Option<Value> {
        match self {
            DateKind::Date => parse_date(text).map(Value::Date),
            DateKind::Month => YearMonth::parse(text).map(Value::Month),
            DateKind::DateTime => parse_datetime(text).map(Value::DateTime),
        }
    }

    /// Convert an already typed date-family value to this kind.
    pub fn coerce(&self, value: &Value) -> Option<Value> {
        match (self, value) {
            (DateKind::Date, Value::Date(date)) => Some(Value::Date(*date)),
            (DateKind::Date, Value::DateTime(datetime)) => Some(Value::Date(datetime.date())),
            (DateKind::Month, Value::Month(month)) => Some(Value::Month(*month)),
            (DateKind::Month, Value::Date(date)) => Some(Value::Month(YearMonth::from(*date))),
            (DateKind::Month, Value::DateTime(datetime)) => {
                Some(Value::Month(YearMonth::from(datetime.date())))
            }
            (DateKind::DateTime, Value::DateTime(datetime)) => Some(Value::DateTime(*datetime)),
            (DateKind::DateTime, Value::Date(date)) => {
                date.and_hms_opt(0, 0, 0).map(Value::DateTime)
            }
            _ => None,
        }
    }

    /// Build a composite value from its parts. Missing seconds default to 0;
    /// any other missing part, or an impossible combination, yields `None`.
    pub fn compose(&self, parts: &IndexMap<DatePart, f64>) -> Option<Value> {
        let get = |part: DatePart| parts.get(&part).map(|n| *n as i64);
        let year = i32::try_from(get(DatePart::Year)?).ok()?;
        let month = u32::try_from(get(DatePart::Month)?).ok()?;
        match self {
            DateKind::Month => YearMonth::new(year, month).map(Value::Month),
            DateKind::Date | DateKind::DateTime => {
                let day = u32::try_from(get(DatePart::Day)?).ok()?;
                let date = NaiveDate::from_ymd_opt(year, month, day)?;
                if *self == DateKind::Date {
                    return Some(Value::Date(date));
                }
                let hour = u32::try_from(get(DatePart::Hour)?).ok()?;
                let minute = u32::try_from(get(DatePart::Minute)?).ok()?;
                let second = u32::try_from(get(DatePart::Second).unwrap_or(0)).ok()?;
                date.and_hms_opt(hour, minute, second).map(Value::DateTime)
            }
        }
    }
}

/// A numeric component of a date-family value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl DatePart {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatePart::Year => "year",
            DatePart::Month => "month",
            DatePart::Day => "day",
            DatePart::Hour => "hour",
            DatePart::Minute => "minute",
            DatePart::Second => "second",
        }
    }

    /// Inclusive range accepted when no explicit bound is given.
    pub fn default_bounds(&self) -> (f64, f64) {
        match self {
            DatePart::Year => (1.0, 9999.0),
            DatePart::Month => (1.0, 12.0),
            DatePart::Day => (1.0, 31.0),
            DatePart::Hour => (0.0, 23.0),
            DatePart::Minute | DatePart::Second => (0.0, 59.0),
        }
    }

    /// This part of a date-family value.
    pub fn extract(&self, value: &Value) -> Option<f64> {
        if let Value::Month(month) = value {
            return match self {
                DatePart::Year => Some(month.year as f64),
                DatePart::Month => Some(month.month as f64),
                _ => None,
            };
        }
        let datetime = value.as_datetime()?;
        let n = match self {
            DatePart::Year => datetime.year() as f64,
            DatePart::Month => datetime.month() as f64,
            DatePart::Day => datetime.day() as f64,
            DatePart::Hour => datetime.hour() as f64,
            DatePart::Minute => datetime.minute() as f64,
            DatePart::Second => datetime.second() as f64,
        };
        Some(n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOrder {
    Before,
    After,
}

/// Ordering constraint between this date field and another one.
#[derive(Debug, Clone, PartialEq)]
pub struct PairRule {
    /// Path expression of the other field, absolute or relative
    pub target: String,
    pub order: PairOrder,
    pub allow_equal: bool,
    pub label: Option<String>,
}

impl PairRule {
    pub fn before(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            order: PairOrder::Before,
            allow_equal: false,
            label: None,
        }
    }

    pub fn after(target: impl Into<String>) -> Self {
        Self {
            order: PairOrder::After,
            ..Self::before(target)
        }
    }

    pub fn or_equal(mut self) -> Self {
        self.allow_equal = true;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Name of the other field in messages: its label, or the last key of
    /// its resolved path.
    pub fn target_label(&self, anchor: &FieldPath) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        let target = anchor.resolve(&self.target);
        target
            .segments()
            .iter()
            .rev()
            .find_map(PathSegment::as_key)
            .map_or_else(|| target.to_string(), str::to_string)
    }
}

#[derive(Debug, Clone)]
pub struct DateSpec {
    pub kind: DateKind,
    /// Part descriptors, when the value may be submitted as separate parts
    pub parts: Option<IndexMap<DatePart, FieldDescriptor>>,
}

/// Builder for date, month and datetime fields.
#[derive(Clone)]
pub struct DateField {
    common: Common,
    kind: DateKind,
    parts: Option<IndexMap<DatePart, FieldDescriptor>>,
    pair: Option<Constraint<PairRule>>,
}

pub fn date() -> DateField {
    DateField::new(DateKind::Date)
}

pub fn month() -> DateField {
    DateField::new(DateKind::Month)
}

pub fn datetime() -> DateField {
    DateField::new(DateKind::DateTime)
}

common_options!(DateField);

impl DateField {
    fn new(kind: DateKind) -> Self {
        Self {
            common: Common::default(),
            kind,
            parts: None,
            pair: None,
        }
    }

    /// Accept the value as a mapping of parts (`birth.year`, `birth.month`,
    /// ...) and validate each part with its own descriptor.
    pub fn with_parts(mut self) -> Self {
        if self.parts.is_none() {
            let parts = self
                .kind
                .parts()
                .iter()
                .map(|part| (*part, date_part(*part).into()))
                .collect();
            self.parts = Some(parts);
        }
        self
    }

    /// Replace the descriptor of one part. Enables parts.
    pub fn part(mut self, part: DatePart, field: DatePartField) -> Self {
        self = self.with_parts();
        if let Some(parts) = self.parts.as_mut() {
            parts.insert(part, field.into());
        }
        self
    }

    pub fn before(self, target: impl Into<String>) -> Self {
        self.pair(PairRule::before(target))
    }

    pub fn after(self, target: impl Into<String>) -> Self {
        self.pair(PairRule::after(target))
    }

    pub fn pair(mut self, rule: impl Into<Constraint<PairRule>>) -> Self {
        self.pair = Some(rule.into());
        self
    }
}

impl From<DateField> for FieldDescriptor {
    fn from(field: DateField) -> Self {
        let spec = DateSpec {
            kind: field.kind,
            parts: field.parts,
        };
        let checks = field.pair.map(Check::Pair).into_iter().collect();
        field.common.finish(FieldKind::Date(spec), checks)
    }
}

/// Builder for a single numeric date component.
#[derive(Clone)]
pub struct DatePartField {
    common: Common,
    part: DatePart,
    min: Option<Constraint<f64>>,
    max: Option<Constraint<f64>>,
}

pub fn date_part(part: DatePart) -> DatePartField {
    DatePartField {
        common: Common::default(),
        part,
        min: None,
        max: None,
    }
}

common_options!(DatePartField);

impl DatePartField {
    pub fn min(mut self, min: impl Into<Constraint<f64>>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn max(mut self, max: impl Into<Constraint<f64>>) -> Self {
        self.max = Some(max.into());
        self
    }
}

impl From<DatePartField> for FieldDescriptor {
    fn from(field: DatePartField) -> Self {
        let (lower, upper) = field.part.default_bounds();
        let checks = vec![
            Check::Min(field.min.unwrap_or(Constraint::Static(lower))),
            Check::Max(field.max.unwrap_or(Constraint::Static(upper))),
        ];
        field.common.finish(FieldKind::DatePart(field.part), checks)
    }
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// Any date-family text as a point in time: date-times as is, dates at
/// midnight, months at midnight of their first day.
pub fn parse_instant(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    parse_datetime(text)
        .or_else(|| parse_date(text)?.and_hms_opt(0, 0, 0))
        .or_else(|| YearMonth::parse(text)?.first_day()?.and_hms_opt(0, 0, 0))
}

pub(crate) fn parse(kind: DateKind, ctx: &ValidationContext<'_>, config: &Config) -> Parsed {
    let value = match ctx.value {
        None | Some(Value::Null) => return Parsed::absent(),
        Some(Value::Text(text)) => {
            let text = if config.trim_text { text.trim() } else { text.as_str() };
            if text.is_empty() {
                return Parsed::absent();
            }
            kind.parse_text(text)
        }
        Some(other) => kind.coerce(other),
    };
    match value {
        Some(value) => Parsed::value(value),
        None => Parsed::invalid_as(ctx, kind.invalid_code()),
    }
}

/// Parts are whole numbers.
pub(crate) fn parse_part(ctx: &ValidationContext<'_>, config: &Config) -> Parsed {
    let parsed = number::parse(ctx, config);
    match &parsed.value {
        Some(Value::Number(n)) if n.fract() != 0.0 => {
            Parsed::invalid_as(ctx, ResultCode::InvalidNumber)
        }
        _ => parsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_text_per_kind() {
        assert_eq!(DateKind::Date.parse_text("2024-02-29"), Some(Value::Date(ymd(2024, 2, 29))));
        assert_eq!(DateKind::Date.parse_text("2024/03/01"), Some(Value::Date(ymd(2024, 3, 1))));
        assert_eq!(DateKind::Date.parse_text("2023-02-29"), None);
        assert_eq!(
            DateKind::Month.parse_text("2024-07"),
            YearMonth::new(2024, 7).map(Value::Month)
        );
        assert_eq!(
            DateKind::DateTime.parse_text("2024-01-02T03:04"),
            ymd(2024, 1, 2).and_hms_opt(3, 4, 0).map(Value::DateTime)
        );
    }

    #[test]
    fn test_parse_instant_accepts_every_kind() {
        let midnight = ymd(2024, 5, 1).and_hms_opt(0, 0, 0);
        assert_eq!(parse_instant("2024-05-01"), midnight);
        assert_eq!(parse_instant("2024-05"), midnight);
        assert_eq!(parse_instant("2024-05-01 00:00"), midnight);
        assert_eq!(parse_instant("yesterday"), None);
    }

    #[test]
    fn test_compose_and_extract() {
        let parts: IndexMap<DatePart, f64> =
            [(DatePart::Year, 1990.0), (DatePart::Month, 4.0), (DatePart::Day, 15.0)]
                .into_iter()
                .collect();
        let composed = DateKind::Date.compose(&parts).unwrap();
        assert_eq!(composed, Value::Date(ymd(1990, 4, 15)));
        assert_eq!(DatePart::Day.extract(&composed), Some(15.0));
        assert_eq!(DatePart::Hour.extract(&composed), Some(0.0));

        let mut impossible = parts.clone();
        impossible.insert(DatePart::Day, 31.0);
        assert_eq!(DateKind::Date.compose(&impossible), None);
        assert_eq!(
            DateKind::Month.compose(&parts),
            YearMonth::new(1990, 4).map(Value::Month)
        );
        assert_eq!(DateKind::DateTime.compose(&parts), None);
    }

    #[test]
    fn test_month_extracts_only_year_and_month() {
        let month = Value::Month(YearMonth::new(2020, 9).unwrap());
        assert_eq!(DatePart::Month.extract(&month), Some(9.0));
        assert_eq!(DatePart::Day.extract(&month), None);
    }

    #[test]
    fn test_pair_target_label() {
        let anchor = FieldPath::parse("periods[0].start");
        assert_eq!(PairRule::before(".end").target_label(&anchor), "end");
        assert_eq!(PairRule::after("deadline").label("Deadline").target_label(&anchor), "Deadline");
    }

    #[test]
    fn test_with_parts_uses_kind_parts() {
        let desc: FieldDescriptor = month().with_parts().into();
        let FieldKind::Date(spec) = desc.kind() else {
            panic!("expected date kind");
        };
        let parts: Vec<_> = spec.parts.as_ref().unwrap().keys().copied().collect();
        assert_eq!(parts, vec![DatePart::Year, DatePart::Month]);
    }
}
