//! Option resolution: preset + override merge into concrete [`Options`].
//!
//! Resolution starts from a preset's per-field defaults, applies the
//! caller's override record with override-wins precedence, and validates
//! that every effective bound stays within the preset's absolute range.
//! Successful resolutions are memoized in a process-wide cache keyed by
//! the exact (preset, override) pair, so resolving the same inputs twice
//! yields the identical `Options` value without redoing the merge.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{LazyLock, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::preset::{PresetError, get_preset, validate_preset};
use crate::types::{FieldKind, OptionPreset};

/// Option resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// Unknown preset name or malformed literal preset.
    #[error(transparent)]
    Preset(#[from] PresetError),
    /// An overridden limit lies outside the preset's absolute range.
    #[error("{bound}Limit {value} of {field} field is outside of {min}-{max} in preset '{preset}'")]
    OutOfRange {
        preset: String,
        field: FieldKind,
        /// `"lower"` or `"upper"`.
        bound: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    /// The merged limits ended up inverted.
    #[error("lowerLimit {lower} of {field} field is bigger than upperLimit {upper} in preset '{preset}'")]
    InvertedLimits {
        preset: String,
        field: FieldKind,
        lower: u32,
        upper: u32,
    },
}

/// The preset a validation call starts from: a registered name or a
/// literal preset value supplied inline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PresetSelector {
    ByName(String),
    Literal(OptionPreset),
}

impl Default for PresetSelector {
    fn default() -> Self {
        PresetSelector::ByName("default".to_string())
    }
}

impl From<&str> for PresetSelector {
    fn from(name: &str) -> Self {
        PresetSelector::ByName(name.to_string())
    }
}

impl From<OptionPreset> for PresetSelector {
    fn from(preset: OptionPreset) -> Self {
        PresetSelector::Literal(preset)
    }
}

/// Per-field override: replaces the preset's effective limits, or
/// disables bound enforcement entirely with `no_limits`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_limits: Option<bool>,
}

impl FieldOverride {
    /// Override with both limits set.
    pub fn limits(lower: u32, upper: u32) -> Self {
        Self {
            lower_limit: Some(lower),
            upper_limit: Some(upper),
            no_limits: None,
        }
    }
}

/// Caller-supplied overrides: any subset of toggles and per-field limits.
/// Absent entries fall back to the preset's values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_seconds: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_years: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_aliases: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_blank_day: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_only_one_blank_day_field: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub must_have_blank_day_field: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_last_day_of_month: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_last_day_of_week: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_nearest_weekday: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_nth_weekday_of_month: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds: Option<FieldOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<FieldOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<FieldOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_of_month: Option<FieldOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<FieldOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<FieldOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<FieldOverride>,
}

impl OptionOverride {
    /// Sets the override record for one field kind.
    pub fn set_field(&mut self, kind: FieldKind, field: FieldOverride) {
        match kind {
            FieldKind::Seconds => self.seconds = Some(field),
            FieldKind::Minutes => self.minutes = Some(field),
            FieldKind::Hours => self.hours = Some(field),
            FieldKind::DaysOfMonth => self.days_of_month = Some(field),
            FieldKind::Months => self.months = Some(field),
            FieldKind::DaysOfWeek => self.days_of_week = Some(field),
            FieldKind::Years => self.years = Some(field),
        }
    }

    fn field(&self, kind: FieldKind) -> Option<&FieldOverride> {
        match kind {
            FieldKind::Seconds => self.seconds.as_ref(),
            FieldKind::Minutes => self.minutes.as_ref(),
            FieldKind::Hours => self.hours.as_ref(),
            FieldKind::DaysOfMonth => self.days_of_month.as_ref(),
            FieldKind::Months => self.months.as_ref(),
            FieldKind::DaysOfWeek => self.days_of_week.as_ref(),
            FieldKind::Years => self.years.as_ref(),
        }
    }
}

/// The full input to a validation call: which preset to start from and
/// what to override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputOptions {
    pub preset: PresetSelector,
    pub overrides: OptionOverride,
}

impl InputOptions {
    /// Starts from a registered preset by name.
    pub fn preset(name: &str) -> Self {
        Self {
            preset: PresetSelector::from(name),
            overrides: OptionOverride::default(),
        }
    }

    /// Replaces the override record.
    pub fn with_overrides(mut self, overrides: OptionOverride) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Effective bounds for one field after resolution.
///
/// `lower_limit`/`upper_limit` always hold concrete values (preset limits,
/// falling back to the absolute `min_value`/`max_value`). `no_limits`
/// disables numeric enforcement for bare atoms and range endpoints while
/// leaving structural rules intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBounds {
    pub min_value: u32,
    pub max_value: u32,
    pub lower_limit: u32,
    pub upper_limit: u32,
    pub no_limits: bool,
}

impl FieldBounds {
    /// Whether the effective limits span the whole absolute range. The
    /// wildcard `*` is only permitted when this holds.
    pub fn is_full_range(&self) -> bool {
        self.no_limits
            || (self.lower_limit == self.min_value && self.upper_limit == self.max_value)
    }
}

/// Resolved, concrete configuration consulted by the validator.
///
/// Immutable once constructed; every effective bound is guaranteed to lie
/// within the originating preset's absolute range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    pub preset_id: String,
    pub use_seconds: bool,
    pub use_years: bool,
    pub use_aliases: bool,
    pub use_blank_day: bool,
    pub allow_only_one_blank_day_field: bool,
    pub must_have_blank_day_field: bool,
    pub use_last_day_of_month: bool,
    pub use_last_day_of_week: bool,
    pub use_nearest_weekday: bool,
    pub use_nth_weekday_of_month: bool,
    pub seconds: FieldBounds,
    pub minutes: FieldBounds,
    pub hours: FieldBounds,
    pub days_of_month: FieldBounds,
    pub months: FieldBounds,
    pub days_of_week: FieldBounds,
    pub years: FieldBounds,
}

impl Options {
    /// Effective bounds for a field kind.
    pub fn bounds(&self, kind: FieldKind) -> &FieldBounds {
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

    /// Number of whitespace-separated fields an expression must have
    /// under these options (5, 6, or 7).
    pub fn expected_field_count(&self) -> usize {
        5 + usize::from(self.use_seconds) + usize::from(self.use_years)
    }
}

/// Cache key: the exact preset content plus the exact override content.
/// Keying on content rather than the preset name keeps cached entries
/// correct across re-registrations and covers literal presets for free.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResolutionKey {
    preset: OptionPreset,
    overrides: OptionOverride,
}

static RESOLVED: LazyLock<RwLock<HashMap<ResolutionKey, Options>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

static RESOLUTIONS: AtomicU64 = AtomicU64::new(0);

/// Number of full (non-cached) resolutions performed by this process.
/// Instrumentation hook for cache behavior tests and diagnostics.
pub fn resolutions_performed() -> u64 {
    RESOLUTIONS.load(Ordering::Relaxed)
}

/// Resolves `input` into concrete [`Options`].
///
/// Resolution is idempotent: the same (preset, override) pair always
/// yields an identical `Options` value, and repeat calls are served from
/// the process-wide cache.
///
/// # Examples
///
/// ```
/// use cron_schema_core::{resolve_options, InputOptions};
///
/// let options = resolve_options(&InputOptions::default()).unwrap();
/// assert_eq!(options.expected_field_count(), 5);
/// assert_eq!(options.minutes.upper_limit, 59);
/// ```
pub fn resolve_options(input: &InputOptions) -> Result<Options, OptionError> {
    let preset = match &input.preset {
        PresetSelector::ByName(name) => get_preset(name)?,
        PresetSelector::Literal(preset) => {
            validate_preset(preset)?;
            preset.clone()
        }
    };

    let key = ResolutionKey {
        preset,
        overrides: input.overrides.clone(),
    };

    {
        let cache = RESOLVED.read().expect("resolution cache lock poisoned");
        if let Some(options) = cache.get(&key) {
            debug!(preset = %options.preset_id, "resolved options from cache");
            return Ok(options.clone());
        }
    }

    let options = merge(&key.preset, &key.overrides)?;
    RESOLUTIONS.fetch_add(1, Ordering::Relaxed);
    debug!(preset = %options.preset_id, "resolved options");

    let mut cache = RESOLVED.write().expect("resolution cache lock poisoned");
    cache.insert(key, options.clone());
    Ok(options)
}

fn merge(preset: &OptionPreset, overrides: &OptionOverride) -> Result<Options, OptionError> {
    let options = Options {
        preset_id: preset.preset_id.clone(),
        use_seconds: overrides.use_seconds.unwrap_or(preset.use_seconds),
        use_years: overrides.use_years.unwrap_or(preset.use_years),
        use_aliases: overrides.use_aliases.unwrap_or(preset.use_aliases),
        use_blank_day: overrides.use_blank_day.unwrap_or(preset.use_blank_day),
        allow_only_one_blank_day_field: overrides
            .allow_only_one_blank_day_field
            .unwrap_or(preset.allow_only_one_blank_day_field),
        must_have_blank_day_field: overrides
            .must_have_blank_day_field
            .unwrap_or(preset.must_have_blank_day_field),
        use_last_day_of_month: overrides
            .use_last_day_of_month
            .unwrap_or(preset.use_last_day_of_month),
        use_last_day_of_week: overrides
            .use_last_day_of_week
            .unwrap_or(preset.use_last_day_of_week),
        use_nearest_weekday: overrides
            .use_nearest_weekday
            .unwrap_or(preset.use_nearest_weekday),
        use_nth_weekday_of_month: overrides
            .use_nth_weekday_of_month
            .unwrap_or(preset.use_nth_weekday_of_month),
        seconds: merge_field(preset, overrides, FieldKind::Seconds)?,
        minutes: merge_field(preset, overrides, FieldKind::Minutes)?,
        hours: merge_field(preset, overrides, FieldKind::Hours)?,
        days_of_month: merge_field(preset, overrides, FieldKind::DaysOfMonth)?,
        months: merge_field(preset, overrides, FieldKind::Months)?,
        days_of_week: merge_field(preset, overrides, FieldKind::DaysOfWeek)?,
        years: merge_field(preset, overrides, FieldKind::Years)?,
    };

    Ok(options)
}

fn merge_field(
    preset: &OptionPreset,
    overrides: &OptionOverride,
    kind: FieldKind,
) -> Result<FieldBounds, OptionError> {
    let range = preset.field(kind);
    let field_override = overrides.field(kind);

    let mut lower = range.lower_limit.unwrap_or(range.min_value);
    let mut upper = range.upper_limit.unwrap_or(range.max_value);
    let mut no_limits = false;

    if let Some(field_override) = field_override {
        if let Some(value) = field_override.lower_limit {
            lower = value;
        }
        if let Some(value) = field_override.upper_limit {
            upper = value;
        }
        no_limits = field_override.no_limits.unwrap_or(false);
    }

    for (bound, value) in [("lower", lower), ("upper", upper)] {
        if value < range.min_value || value > range.max_value {
            return Err(OptionError::OutOfRange {
                preset: preset.preset_id.clone(),
                field: kind,
                bound,
                value,
                min: range.min_value,
                max: range.max_value,
            });
        }
    }

    if lower > upper {
        return Err(OptionError::InvertedLimits {
            preset: preset.preset_id.clone(),
            field: kind,
            lower,
            upper,
        });
    }

    Ok(FieldBounds {
        min_value: range.min_value,
        max_value: range.max_value,
        lower_limit: lower,
        upper_limit: upper,
        no_limits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldRange;

    #[test]
    fn test_resolution_merges_and_caches() {
        // Unique literal preset so this test owns its cache entries.
        let mut preset = OptionPreset::new("resolution-merge-test");
        preset.minutes = FieldRange::new(0, 59).with_limits(10, 30);

        let mut input = InputOptions {
            preset: PresetSelector::Literal(preset),
            overrides: OptionOverride::default(),
        };

        // Preset default limits survive the merge.
        let options = resolve_options(&input).unwrap();
        assert_eq!(options.minutes.lower_limit, 10);
        assert_eq!(options.minutes.upper_limit, 30);
        assert_eq!(options.minutes.min_value, 0);
        assert!(!options.minutes.is_full_range());
        assert!(options.hours.is_full_range());

        // Override wins over the preset default.
        input.overrides.minutes = Some(FieldOverride::limits(0, 59));
        input.overrides.use_seconds = Some(true);
        let overridden = resolve_options(&input).unwrap();
        assert!(overridden.minutes.is_full_range());
        assert!(overridden.use_seconds);
        assert_eq!(overridden.expected_field_count(), 6);

        // Idempotence: same inputs give a bit-identical value, served
        // from the cache without another resolution.
        let after_first = resolutions_performed();
        let again = resolve_options(&input).unwrap();
        assert_eq!(again, overridden);
        assert_eq!(resolutions_performed(), after_first);
    }

    #[test]
    fn test_override_outside_absolute_range_fails() {
        let input = InputOptions {
            preset: PresetSelector::Literal(OptionPreset::new("range-check-test")),
            overrides: OptionOverride {
                hours: Some(FieldOverride::limits(0, 24)),
                ..OptionOverride::default()
            },
        };
        let err = resolve_options(&input).unwrap_err();
        assert!(matches!(
            err,
            OptionError::OutOfRange {
                field: FieldKind::Hours,
                bound: "upper",
                value: 24,
                ..
            }
        ));
    }

    #[test]
    fn test_inverted_override_limits_fail() {
        let input = InputOptions {
            preset: PresetSelector::Literal(OptionPreset::new("inverted-check-test")),
            overrides: OptionOverride {
                minutes: Some(FieldOverride::limits(40, 20)),
                ..OptionOverride::default()
            },
        };
        let err = resolve_options(&input).unwrap_err();
        assert!(matches!(err, OptionError::InvertedLimits { lower: 40, upper: 20, .. }));
    }

    #[test]
    fn test_unknown_preset_name_fails() {
        let input = InputOptions::preset("never-registered");
        let err = resolve_options(&input).unwrap_err();
        assert!(matches!(err, OptionError::Preset(PresetError::NotFound(_))));
    }

    #[test]
    fn test_malformed_literal_preset_fails() {
        let mut preset = OptionPreset::new("malformed-literal-test");
        preset.days_of_week = FieldRange::new(7, 1);
        let input = InputOptions {
            preset: PresetSelector::Literal(preset),
            overrides: OptionOverride::default(),
        };
        let err = resolve_options(&input).unwrap_err();
        assert!(matches!(
            err,
            OptionError::Preset(PresetError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_override_serde_is_order_independent_by_construction() {
        let overrides = OptionOverride {
            use_seconds: Some(true),
            minutes: Some(FieldOverride::limits(5, 55)),
            ..OptionOverride::default()
        };
        let json = serde_json::to_string(&overrides).unwrap();
        assert_eq!(json, r#"{"useSeconds":true,"minutes":{"lowerLimit":5,"upperLimit":55}}"#);

        let back: OptionOverride = serde_json::from_str(&json).unwrap();
        assert_eq!(back, overrides);
    }
}
