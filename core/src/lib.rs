//! Core types, presets, and option resolution for cron expression schemas.
//!
//! This crate defines the configuration side of cron expression
//! validation:
//!
//! - [`FieldKind`] — the seven positional fields of a cron expression.
//! - [`OptionPreset`] / [`FieldRange`] — a named dialect: absolute field
//!   ranges plus grammar extension toggles.
//! - The preset store ([`register_preset`], [`get_preset`]) — a
//!   process-wide registry seeded with built-in dialects (`default`,
//!   `npm-node-cron`, `aws-cloud-watch`).
//! - The option resolver ([`resolve_options`]) — merges a preset with
//!   caller overrides into concrete, validated [`Options`], memoized per
//!   (preset, override) pair.
//! - [`CronFields`] — the positional assignment of raw field strings
//!   produced when an expression splits cleanly.
//!
//! The grammar validation itself lives in the `cron-schema-validator`
//! crate; this crate is the dialect contract it consults.
//!
//! # Example
//!
//! ```
//! use cron_schema_core::{resolve_options, FieldKind, InputOptions};
//!
//! let options = resolve_options(&InputOptions::preset("npm-node-cron")).unwrap();
//! assert!(options.use_seconds);
//! assert_eq!(options.expected_field_count(), 6);
//! assert_eq!(options.bounds(FieldKind::Months).max_value, 11);
//! ```

mod options;
mod preset;
mod types;

pub use options::{
    FieldBounds, FieldOverride, InputOptions, OptionError, OptionOverride, Options,
    PresetSelector, resolve_options, resolutions_performed,
};
pub use preset::{PresetError, get_preset, preset_names, register_preset};
pub use types::{CronFields, FieldKind, FieldRange, OptionPreset};
