//! Process-wide preset store.
//!
//! Presets are named dialect configurations. The store is seeded lazily
//! with the built-in dialects and accepts runtime registrations, which
//! overwrite any existing entry of the same name. Entries are never
//! removed for the lifetime of the process.

use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

use thiserror::Error;
use tracing::debug;

use crate::types::{FieldKind, FieldRange, OptionPreset};

/// Preset registration and lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresetError {
    /// Registration name is empty or whitespace-only.
    #[error("preset name cannot be empty")]
    EmptyName,
    /// A field's `minValue` exceeds its `maxValue`.
    #[error("invalid {field} range in preset '{preset}': minValue {min} is bigger than maxValue {max}")]
    InvertedRange {
        preset: String,
        field: FieldKind,
        min: u32,
        max: u32,
    },
    /// A field's default limit lies outside its absolute range.
    #[error("invalid {field} {bound}Limit {value} in preset '{preset}': outside of {min}-{max}")]
    LimitOutOfRange {
        preset: String,
        field: FieldKind,
        /// `"lower"` or `"upper"`.
        bound: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    /// A field's default `lowerLimit` exceeds its `upperLimit`.
    #[error("invalid {field} limits in preset '{preset}': lowerLimit {lower} is bigger than upperLimit {upper}")]
    InvertedLimits {
        preset: String,
        field: FieldKind,
        lower: u32,
        upper: u32,
    },
    /// Lookup of a name with no registered preset.
    #[error("option preset '{0}' does not exist")]
    NotFound(String),
}

static PRESETS: LazyLock<RwLock<HashMap<String, OptionPreset>>> = LazyLock::new(|| {
    let mut presets = HashMap::new();
    for preset in [default_preset(), npm_node_cron(), aws_cloud_watch()] {
        presets.insert(preset.preset_id.clone(), preset);
    }
    RwLock::new(presets)
});

/// Validates a preset's shape and stores it under `name`, overwriting any
/// existing entry.
///
/// # Examples
///
/// ```
/// use cron_schema_core::{register_preset, get_preset, OptionPreset};
///
/// let mut preset = OptionPreset::new("my-scheduler");
/// preset.use_seconds = true;
/// register_preset("my-scheduler", preset).unwrap();
/// assert!(get_preset("my-scheduler").unwrap().use_seconds);
/// ```
pub fn register_preset(name: &str, preset: OptionPreset) -> Result<(), PresetError> {
    if name.trim().is_empty() {
        return Err(PresetError::EmptyName);
    }
    validate_preset(&preset)?;

    debug!(preset = %name, "registering option preset");
    let mut presets = PRESETS.write().expect("preset store lock poisoned");
    presets.insert(name.to_string(), preset);
    Ok(())
}

/// Returns a copy of the preset registered under `name`.
pub fn get_preset(name: &str) -> Result<OptionPreset, PresetError> {
    let presets = PRESETS.read().expect("preset store lock poisoned");
    presets
        .get(name)
        .cloned()
        .ok_or_else(|| PresetError::NotFound(name.to_string()))
}

/// Names of all registered presets, sorted for stable listings.
pub fn preset_names() -> Vec<String> {
    let presets = PRESETS.read().expect("preset store lock poisoned");
    let mut names: Vec<String> = presets.keys().cloned().collect();
    names.sort();
    names
}

pub(crate) fn validate_preset(preset: &OptionPreset) -> Result<(), PresetError> {
    for kind in FieldKind::ALL {
        let range = preset.field(kind);
        validate_range(&preset.preset_id, kind, range)?;
    }
    Ok(())
}

fn validate_range(preset: &str, field: FieldKind, range: &FieldRange) -> Result<(), PresetError> {
    if range.min_value > range.max_value {
        return Err(PresetError::InvertedRange {
            preset: preset.to_string(),
            field,
            min: range.min_value,
            max: range.max_value,
        });
    }

    for (bound, value) in [("lower", range.lower_limit), ("upper", range.upper_limit)] {
        if let Some(value) = value {
            if value < range.min_value || value > range.max_value {
                return Err(PresetError::LimitOutOfRange {
                    preset: preset.to_string(),
                    field,
                    bound,
                    value,
                    min: range.min_value,
                    max: range.max_value,
                });
            }
        }
    }

    if let (Some(lower), Some(upper)) = (range.lower_limit, range.upper_limit) {
        if lower > upper {
            return Err(PresetError::InvertedLimits {
                preset: preset.to_string(),
                field,
                lower,
                upper,
            });
        }
    }

    Ok(())
}

/// Standard 5-field cron: no seconds, no years, no extensions.
fn default_preset() -> OptionPreset {
    OptionPreset::new("default")
}

/// node-cron dialect: 6-field with seconds, months 0-11, weekdays 0-6.
fn npm_node_cron() -> OptionPreset {
    let mut preset = OptionPreset::new("npm-node-cron");
    preset.use_seconds = true;
    preset.months = FieldRange::new(0, 11);
    preset.days_of_week = FieldRange::new(0, 6);
    preset
}

/// AWS CloudWatch Events dialect: years, blank day with only-one
/// enforcement, aliases, and the L/W/# tokens.
fn aws_cloud_watch() -> OptionPreset {
    let mut preset = OptionPreset::new("aws-cloud-watch");
    preset.use_years = true;
    preset.use_blank_day = true;
    preset.allow_only_one_blank_day_field = true;
    preset.use_aliases = true;
    preset.use_last_day_of_month = true;
    preset.use_last_day_of_week = true;
    preset.use_nearest_weekday = true;
    preset.use_nth_weekday_of_month = true;
    preset.months = FieldRange::new(0, 12);
    preset.days_of_week = FieldRange::new(1, 7);
    preset.years = FieldRange::new(1970, 2199);
    preset
}
