//! Data model for cron expression schemas.
//!
//! This module defines the types shared by the preset store, the option
//! resolver, and the field grammar validator. The serde representations use
//! camelCase field names (`minValue`, `useBlankDay`, ...) so preset files
//! round-trip through JSON and YAML in the conventional wire form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The seven positional fields a cron expression can carry.
///
/// `Seconds` and `Years` only appear when the corresponding toggle is
/// enabled; the middle five are always present, in this order.
///
/// # Examples
///
/// ```
/// use cron_schema_core::FieldKind;
///
/// assert_eq!(FieldKind::DaysOfMonth.to_string(), "daysOfMonth");
/// assert_eq!(FieldKind::ALL.len(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Seconds,
    Minutes,
    Hours,
    DaysOfMonth,
    Months,
    DaysOfWeek,
    Years,
}

impl FieldKind {
    /// All field kinds in positional order.
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Seconds,
        FieldKind::Minutes,
        FieldKind::Hours,
        FieldKind::DaysOfMonth,
        FieldKind::Months,
        FieldKind::DaysOfWeek,
        FieldKind::Years,
    ];

    /// The camelCase name used in diagnostics and serialized forms.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Seconds => "seconds",
            FieldKind::Minutes => "minutes",
            FieldKind::Hours => "hours",
            FieldKind::DaysOfMonth => "daysOfMonth",
            FieldKind::Months => "months",
            FieldKind::DaysOfWeek => "daysOfWeek",
            FieldKind::Years => "years",
        }
    }

    /// Whether this is one of the two day fields that may hold a blank
    /// day (`?`) token.
    pub fn is_day_field(self) -> bool {
        matches!(self, FieldKind::DaysOfMonth | FieldKind::DaysOfWeek)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-field numeric range carried by a preset.
///
/// `min_value`/`max_value` are the dialect's absolute bounds; the optional
/// `lower_limit`/`upper_limit` are the preset's default *effective* bounds
/// and must lie within the absolute range (checked at registration).
///
/// # Examples
///
/// ```
/// use cron_schema_core::FieldRange;
///
/// let range = FieldRange::new(0, 59);
/// assert_eq!(range.lower_limit, None);
///
/// let narrowed = FieldRange::new(0, 59).with_limits(10, 30);
/// assert_eq!(narrowed.upper_limit, Some(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRange {
    pub min_value: u32,
    pub max_value: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_limit: Option<u32>,
}

impl FieldRange {
    /// Creates a range with absolute bounds only.
    pub fn new(min_value: u32, max_value: u32) -> Self {
        Self {
            min_value,
            max_value,
            lower_limit: None,
            upper_limit: None,
        }
    }

    /// Sets default effective limits narrower than the absolute bounds.
    pub fn with_limits(mut self, lower: u32, upper: u32) -> Self {
        self.lower_limit = Some(lower);
        self.upper_limit = Some(upper);
        self
    }
}

/// A named dialect configuration: absolute field ranges plus the grammar
/// extensions the dialect enables.
///
/// Presets are immutable once registered in the
/// [`preset store`](crate::register_preset). Use [`OptionPreset::new`] for
/// a baseline (standard 5-field ranges, every extension off) and flip the
/// toggles the dialect needs.
///
/// # Examples
///
/// ```
/// use cron_schema_core::OptionPreset;
///
/// let mut preset = OptionPreset::new("my-dialect");
/// preset.use_seconds = true;
/// preset.months.min_value = 0;
/// preset.months.max_value = 11;
/// assert_eq!(preset.preset_id, "my-dialect");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionPreset {
    pub preset_id: String,
    pub use_seconds: bool,
    pub use_years: bool,
    /// Accept `jan`-`dec` and `sun`-`sat` aliases (case-insensitive).
    #[serde(default)]
    pub use_aliases: bool,
    /// Accept the blank day token `?` in the two day fields.
    #[serde(default)]
    pub use_blank_day: bool,
    /// Reject expressions where both day fields are blank.
    #[serde(default)]
    pub allow_only_one_blank_day_field: bool,
    /// Require at least one of the two day fields to be blank.
    #[serde(default)]
    pub must_have_blank_day_field: bool,
    /// Accept `L` (and `L-n` offsets) in daysOfMonth.
    #[serde(default)]
    pub use_last_day_of_month: bool,
    /// Accept `nL` in daysOfWeek.
    #[serde(default)]
    pub use_last_day_of_week: bool,
    /// Accept `nW` in daysOfMonth (`LW` when combined with last-day).
    #[serde(default)]
    pub use_nearest_weekday: bool,
    /// Accept `n#k` in daysOfWeek.
    #[serde(default)]
    pub use_nth_weekday_of_month: bool,
    pub seconds: FieldRange,
    pub minutes: FieldRange,
    pub hours: FieldRange,
    pub days_of_month: FieldRange,
    pub months: FieldRange,
    pub days_of_week: FieldRange,
    pub years: FieldRange,
}

impl OptionPreset {
    /// Creates a preset with standard cron field ranges and every
    /// extension toggle off.
    pub fn new(preset_id: impl Into<String>) -> Self {
        Self {
            preset_id: preset_id.into(),
            use_seconds: false,
            use_years: false,
            use_aliases: false,
            use_blank_day: false,
            allow_only_one_blank_day_field: false,
            must_have_blank_day_field: false,
            use_last_day_of_month: false,
            use_last_day_of_week: false,
            use_nearest_weekday: false,
            use_nth_weekday_of_month: false,
            seconds: FieldRange::new(0, 59),
            minutes: FieldRange::new(0, 59),
            hours: FieldRange::new(0, 23),
            days_of_month: FieldRange::new(1, 31),
            months: FieldRange::new(1, 12),
            days_of_week: FieldRange::new(0, 7),
            years: FieldRange::new(1970, 2099),
        }
    }

    /// The range record for a field kind.
    pub fn field(&self, kind: FieldKind) -> &FieldRange {
        match kind {
            FieldKind::Seconds => &self.seconds,
            FieldKind::Minutes => &self.minutes,
            FieldKind::Hours => &self.hours,
            FieldKind::DaysOfMonth => &self.days_of_month,
            FieldKind::Months => &self.months,
            FieldKind::DaysOfWeek => &self.days_of_week,
            FieldKind::Years => &self.years,
        }
    }
}

/// Positional assignment of raw field strings, produced by the expression
/// splitter on success.
///
/// `seconds` and `years` are populated only when the resolved options
/// enable them.
///
/// # Examples
///
/// ```
/// use cron_schema_core::{CronFields, FieldKind};
///
/// let fields = CronFields {
///     seconds: None,
///     minutes: "0".into(),
///     hours: "*/4".into(),
///     days_of_month: "*".into(),
///     months: "1".into(),
///     days_of_week: "6".into(),
///     years: None,
/// };
/// assert_eq!(fields.field(FieldKind::Hours), Some("*/4"));
/// assert_eq!(fields.field(FieldKind::Years), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<String>,
    pub minutes: String,
    pub hours: String,
    pub days_of_month: String,
    pub months: String,
    pub days_of_week: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<String>,
}

impl CronFields {
    /// The raw string for a field kind, or `None` for a disabled
    /// seconds/years field.
    pub fn field(&self, kind: FieldKind) -> Option<&str> {
        match kind {
            FieldKind::Seconds => self.seconds.as_deref(),
            FieldKind::Minutes => Some(&self.minutes),
            FieldKind::Hours => Some(&self.hours),
            FieldKind::DaysOfMonth => Some(&self.days_of_month),
            FieldKind::Months => Some(&self.months),
            FieldKind::DaysOfWeek => Some(&self.days_of_week),
            FieldKind::Years => self.years.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_names_are_camel_case() {
        assert_eq!(FieldKind::DaysOfWeek.name(), "daysOfWeek");
        assert_eq!(FieldKind::Seconds.name(), "seconds");
    }

    #[test]
    fn test_day_fields() {
        assert!(FieldKind::DaysOfMonth.is_day_field());
        assert!(FieldKind::DaysOfWeek.is_day_field());
        assert!(!FieldKind::Months.is_day_field());
    }

    #[test]
    fn test_preset_serde_round_trip_uses_wire_names() {
        let preset = OptionPreset::new("rt");
        let json = serde_json::to_string(&preset).unwrap();
        assert!(json.contains("\"presetId\":\"rt\""));
        assert!(json.contains("\"daysOfMonth\":{\"minValue\":1,\"maxValue\":31}"));

        let back: OptionPreset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, preset);
    }

    #[test]
    fn test_preset_field_lookup() {
        let mut preset = OptionPreset::new("lookup");
        preset.months = FieldRange::new(0, 11);
        assert_eq!(preset.field(FieldKind::Months).max_value, 11);
        assert_eq!(preset.field(FieldKind::Years).min_value, 1970);
    }
}
