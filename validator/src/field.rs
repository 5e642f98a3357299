//! The field grammar validator.
//!
//! Decides whether one field's raw string conforms to the grammar
//!
//! ```text
//! field      := "?" | list
//! list       := stepItem ("," stepItem)*
//! stepItem   := base ("/" step)?
//! base       := "*" | atom | atom "-" atom
//! atom       := number | specialToken
//! ```
//!
//! given the field's kind and the resolved [`Options`]. Validation is a
//! pure function with no state across calls; the descent over `,`, `/`,
//! and `-` always terminates because each split strictly shrinks the
//! input. Errors from every list element are collected rather than
//! short-circuited.

use cron_schema_core::{FieldKind, Options};

use crate::error::CheckError;

const MONTH_ALIASES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const WEEKDAY_ALIASES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// Validates one field against the grammar and the resolved options.
///
/// # Examples
///
/// ```
/// use cron_schema_core::{resolve_options, FieldKind, InputOptions};
/// use cron_schema_validator::check_field;
///
/// let options = resolve_options(&InputOptions::default()).unwrap();
/// assert!(check_field("*/4", FieldKind::Hours, &options).is_empty());
/// assert!(!check_field("7-5", FieldKind::Hours, &options).is_empty());
/// ```
pub fn check_field(field: &str, kind: FieldKind, options: &Options) -> Vec<CheckError> {
    // Blank day is a whole-field token, handled before any decomposition.
    if field == "?" {
        if kind.is_day_field() && options.use_blank_day {
            return Vec::new();
        }
        return vec![CheckError::BlankDayNotAllowed { field: kind }];
    }

    // Special tokens are single atoms; mixing them with list/range/step
    // syntax is rejected up front on the raw field text.
    if let Some(error) = special_token_mix(field, kind, options) {
        return vec![error];
    }

    let mut errors = Vec::new();
    for element in field.split(',') {
        errors.extend(check_list_element(element, kind, options));
    }
    errors
}

/// Fast-fail for `L`/`W`/`#` combined with `,`, `-`, or `/`. The one
/// permitted combination is the `L-n` offset range in daysOfMonth.
fn special_token_mix(field: &str, kind: FieldKind, options: &Options) -> Option<CheckError> {
    let has = |token: char| field.chars().any(|c| c.eq_ignore_ascii_case(&token));

    match kind {
        FieldKind::DaysOfMonth => {
            if options.use_last_day_of_month && has('L') {
                if field.contains(',') || field.contains('/') {
                    return Some(CheckError::SpecialTokenInList { token: 'L', field: kind });
                }
                let mut chars = field.chars();
                let offset_range = matches!(
                    (chars.next(), chars.next()),
                    (Some(first), Some('-')) if first.eq_ignore_ascii_case(&'L')
                );
                if field.contains('-') && !offset_range {
                    return Some(CheckError::SpecialTokenInList { token: 'L', field: kind });
                }
            }
            if options.use_nearest_weekday
                && has('W')
                && field.contains([',', '-', '/'])
            {
                return Some(CheckError::SpecialTokenInList { token: 'W', field: kind });
            }
        }
        FieldKind::DaysOfWeek => {
            if options.use_last_day_of_week && has('L') && field.contains([',', '-', '/']) {
                return Some(CheckError::SpecialTokenInList { token: 'L', field: kind });
            }
            if options.use_nth_weekday_of_month
                && field.contains('#')
                && field.contains([',', '-', '/'])
            {
                return Some(CheckError::SpecialTokenInList { token: '#', field: kind });
            }
        }
        _ => {}
    }
    None
}

/// One comma-separated list element: `base` or `base/step`.
fn check_list_element(element: &str, kind: FieldKind, options: &Options) -> Vec<CheckError> {
    let parts: Vec<&str> = element.split('/').collect();
    if parts.len() > 2 {
        return vec![CheckError::TooManyStepSeparators {
            element: element.to_string(),
        }];
    }

    let mut errors = check_step_base(parts[0], kind, options);
    if parts.len() == 2 {
        errors.extend(check_step(parts[1], parts[0], kind, options));
    }
    errors
}

/// The step count to the right of `/`.
fn check_step(step: &str, base: &str, kind: FieldKind, options: &Options) -> Vec<CheckError> {
    if step.is_empty() {
        return vec![CheckError::EmptyStep { field: kind }];
    }

    let value = match step.parse::<u32>() {
        Ok(value) if value > 0 => value,
        _ => {
            return vec![CheckError::InvalidStep {
                step: step.to_string(),
                field: kind,
            }];
        }
    };

    let bounds = options.bounds(kind);
    if !bounds.no_limits && value > bounds.upper_limit {
        return vec![CheckError::StepAboveUpperLimit {
            step: value,
            field: kind,
            limit: bounds.upper_limit,
        }];
    }

    // A step over a bounded range must fit inside the range's span,
    // otherwise the first repetition already falls outside it.
    if let Some((lower, upper)) = numeric_range(base) {
        if upper >= lower && value > upper - lower {
            return vec![CheckError::StepExceedsRangeSpan {
                step: value,
                lower,
                upper,
                field: kind,
            }];
        }
    }

    Vec::new()
}

fn numeric_range(base: &str) -> Option<(u32, u32)> {
    let (lower, upper) = base.split_once('-')?;
    Some((lower.parse().ok()?, upper.parse().ok()?))
}

/// The base to the left of `/`: a single atom or a range.
fn check_step_base(base: &str, kind: FieldKind, options: &Options) -> Vec<CheckError> {
    let parts: Vec<&str> = base.split('-').collect();
    match parts.len() {
        1 => check_atom(parts[0], kind, options),
        2 => {
            // `L-n` expresses "n days before the last day of the month";
            // the last-day token is permitted as a lower endpoint only.
            if kind == FieldKind::DaysOfMonth
                && options.use_last_day_of_month
                && parts[0].eq_ignore_ascii_case("L")
            {
                return check_range_atom(parts[1], kind, options);
            }

            let mut errors = check_range_atom(parts[0], kind, options);
            errors.extend(check_range_atom(parts[1], kind, options));

            if errors.is_empty() {
                // The ordering check only applies when both endpoints
                // resolve to plain numbers; alias endpoints skip it.
                if let (Ok(lower), Ok(upper)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>())
                {
                    if lower > upper {
                        errors.push(CheckError::RangeOrderInverted {
                            lower,
                            upper,
                            field: kind,
                        });
                    }
                }
            }
            errors
        }
        _ => vec![CheckError::TooManyRangeSeparators {
            element: base.to_string(),
        }],
    }
}

/// A bare atom in base position: wildcard, alias, special token, or
/// bounded number.
fn check_atom(element: &str, kind: FieldKind, options: &Options) -> Vec<CheckError> {
    if element == "*" {
        let bounds = options.bounds(kind);
        if bounds.is_full_range() {
            return Vec::new();
        }
        return vec![CheckError::WildcardLimitMismatch {
            field: kind,
            min: bounds.min_value,
            max: bounds.max_value,
        }];
    }

    if element.is_empty() {
        return vec![CheckError::EmptyElement { field: kind }];
    }

    if is_alias(element, kind, options) {
        return Vec::new();
    }

    if let Some(errors) = check_special_token(element, kind, options) {
        return errors;
    }

    check_number(element, kind, options)
}

/// A range endpoint: stricter than a base atom. Wildcards and special
/// tokens are never permitted inside a range.
fn check_range_atom(element: &str, kind: FieldKind, options: &Options) -> Vec<CheckError> {
    if element == "*" {
        return vec![CheckError::WildcardInRange { field: kind }];
    }

    if element.is_empty() {
        return vec![CheckError::EmptyRangeElement { field: kind }];
    }

    if is_alias(element, kind, options) {
        return Vec::new();
    }

    check_number(element, kind, options)
}

fn is_alias(element: &str, kind: FieldKind, options: &Options) -> bool {
    if !options.use_aliases {
        return false;
    }
    let table: &[&str] = match kind {
        FieldKind::Months => &MONTH_ALIASES,
        FieldKind::DaysOfWeek => &WEEKDAY_ALIASES,
        _ => return false,
    };
    table.iter().any(|alias| element.eq_ignore_ascii_case(alias))
}

/// Recognizes the vendor token shapes (`L`, `nL`, `nW`, `LW`, `n#k`) for
/// the two day fields. Returns `None` when the element has no token
/// shape and should be checked as a plain number.
fn check_special_token(
    element: &str,
    kind: FieldKind,
    options: &Options,
) -> Option<Vec<CheckError>> {
    match kind {
        FieldKind::DaysOfMonth => {
            if element.eq_ignore_ascii_case("L") {
                if options.use_last_day_of_month {
                    return Some(Vec::new());
                }
                return Some(vec![CheckError::LastDayNotAllowed { field: kind }]);
            }

            if element.eq_ignore_ascii_case("LW") {
                if !options.use_nearest_weekday {
                    return Some(vec![CheckError::NearestWeekdayNotAllowed { field: kind }]);
                }
                if !options.use_last_day_of_month {
                    return Some(vec![CheckError::LastDayNotAllowed { field: kind }]);
                }
                return Some(Vec::new());
            }

            if let Some(prefix) = strip_token_suffix(element, 'W') {
                if !options.use_nearest_weekday {
                    return Some(vec![CheckError::NearestWeekdayNotAllowed { field: kind }]);
                }
                if prefix.is_empty() {
                    return Some(vec![CheckError::MissingNearestWeekdayValue { field: kind }]);
                }
                return Some(check_number(prefix, kind, options));
            }
        }
        FieldKind::DaysOfWeek => {
            if let Some(prefix) = strip_token_suffix(element, 'L') {
                if !options.use_last_day_of_week {
                    return Some(vec![CheckError::LastDayNotAllowed { field: kind }]);
                }
                if prefix.is_empty() {
                    // Bare `L` reads as "last Saturday".
                    return Some(Vec::new());
                }
                return Some(check_number(prefix, kind, options));
            }

            if element.contains('#') {
                if !options.use_nth_weekday_of_month {
                    return Some(vec![CheckError::NthWeekdayNotAllowed { field: kind }]);
                }
                return Some(check_nth_weekday(element, kind, options));
            }
        }
        _ => {}
    }
    None
}

/// `n#k`: weekday `n` re-validated as a bounded atom, occurrence `k`
/// restricted to 1-5.
fn check_nth_weekday(element: &str, kind: FieldKind, options: &Options) -> Vec<CheckError> {
    let parts: Vec<&str> = element.split('#').collect();
    if parts.len() > 2 {
        return vec![CheckError::TooManyNthSeparators {
            element: element.to_string(),
        }];
    }

    let mut errors = Vec::new();
    if !is_alias(parts[0], kind, options) {
        errors.extend(check_number(parts[0], kind, options));
    }

    match parts[1].parse::<u32>() {
        Ok(value) if (1..=5).contains(&value) => {}
        Ok(value) => errors.push(CheckError::NthWeekdayOutOfRange { value, field: kind }),
        Err(_) => errors.push(CheckError::InvalidNthWeekday {
            value: parts[1].to_string(),
            field: kind,
        }),
    }
    errors
}

fn strip_token_suffix(element: &str, token: char) -> Option<&str> {
    let last = element.chars().next_back()?;
    if last.eq_ignore_ascii_case(&token) {
        Some(&element[..element.len() - 1])
    } else {
        None
    }
}

/// A plain numeric atom: decimal integer within the effective bounds,
/// unless bounds are disabled for the field.
fn check_number(element: &str, kind: FieldKind, options: &Options) -> Vec<CheckError> {
    let value = match element.parse::<u32>() {
        Ok(value) => value,
        Err(_) => {
            if element.parse::<f64>().is_ok() {
                return vec![CheckError::NotAnInteger {
                    element: element.to_string(),
                    field: kind,
                }];
            }
            return vec![CheckError::InvalidNumber {
                element: element.to_string(),
                field: kind,
            }];
        }
    };

    let bounds = options.bounds(kind);
    if bounds.no_limits {
        return Vec::new();
    }
    if value < bounds.lower_limit {
        return vec![CheckError::BelowLowerLimit {
            value,
            field: kind,
            limit: bounds.lower_limit,
        }];
    }
    if value > bounds.upper_limit {
        return vec![CheckError::AboveUpperLimit {
            value,
            field: kind,
            limit: bounds.upper_limit,
        }];
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cron_schema_core::{
        FieldOverride, InputOptions, OptionOverride, OptionPreset, PresetSelector,
        resolve_options,
    };

    fn default_options() -> Options {
        resolve_options(&InputOptions::default()).unwrap()
    }

    fn options_with(apply: impl FnOnce(&mut OptionOverride)) -> Options {
        let mut overrides = OptionOverride::default();
        apply(&mut overrides);
        resolve_options(&InputOptions::default().with_overrides(overrides)).unwrap()
    }

    #[test]
    fn test_simple_elements() {
        let options = default_options();
        assert!(check_field("*", FieldKind::Minutes, &options).is_empty());
        assert!(check_field("30", FieldKind::Minutes, &options).is_empty());
        assert!(check_field("5-7", FieldKind::Minutes, &options).is_empty());
        assert!(check_field("*/4", FieldKind::Hours, &options).is_empty());
        assert!(check_field("1,2,3", FieldKind::Months, &options).is_empty());
    }

    #[test]
    fn test_errors_are_collected_per_list_element() {
        let options = default_options();
        let errors = check_field("61,x,30", FieldKind::Minutes, &options);
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors[0],
            CheckError::AboveUpperLimit { value: 61, limit: 59, .. }
        ));
        assert!(matches!(errors[1], CheckError::InvalidNumber { .. }));
    }

    #[test]
    fn test_range_order() {
        let options = default_options();
        assert!(check_field("5-7", FieldKind::Minutes, &options).is_empty());
        assert_eq!(
            check_field("7-5", FieldKind::Minutes, &options),
            vec![CheckError::RangeOrderInverted {
                lower: 7,
                upper: 5,
                field: FieldKind::Minutes,
            }]
        );
    }

    #[test]
    fn test_malformed_ranges_and_steps() {
        let options = default_options();
        assert!(matches!(
            check_field("1-2-3", FieldKind::Minutes, &options)[0],
            CheckError::TooManyRangeSeparators { .. }
        ));
        assert!(matches!(
            check_field("1/2/3", FieldKind::Minutes, &options)[0],
            CheckError::TooManyStepSeparators { .. }
        ));
        assert!(matches!(
            check_field("1-*", FieldKind::Minutes, &options)[0],
            CheckError::WildcardInRange { .. }
        ));
        assert!(matches!(
            check_field("1-", FieldKind::Minutes, &options)[0],
            CheckError::EmptyRangeElement { .. }
        ));
        assert!(matches!(
            check_field("*/", FieldKind::Minutes, &options)[0],
            CheckError::EmptyStep { .. }
        ));
        assert!(matches!(
            check_field("1/*", FieldKind::Minutes, &options)[0],
            CheckError::InvalidStep { .. }
        ));
        assert!(matches!(
            check_field("1/0", FieldKind::Minutes, &options)[0],
            CheckError::InvalidStep { .. }
        ));
    }

    #[test]
    fn test_step_must_fit_range_span() {
        let options = options_with(|o| {
            o.minutes = Some(FieldOverride::limits(10, 20));
        });
        assert!(check_field("10-20/5", FieldKind::Minutes, &options).is_empty());
        assert_eq!(
            check_field("10-20/11", FieldKind::Minutes, &options),
            vec![CheckError::StepExceedsRangeSpan {
                step: 11,
                lower: 10,
                upper: 20,
                field: FieldKind::Minutes,
            }]
        );
    }

    #[test]
    fn test_wildcard_requires_full_range() {
        let options = options_with(|o| {
            o.minutes = Some(FieldOverride::limits(10, 20));
        });
        assert!(matches!(
            check_field("*", FieldKind::Minutes, &options)[0],
            CheckError::WildcardLimitMismatch { min: 0, max: 59, .. }
        ));
        assert!(matches!(
            check_field("*/2", FieldKind::Minutes, &options)[0],
            CheckError::WildcardLimitMismatch { .. }
        ));
        assert!(check_field("10-20/2", FieldKind::Minutes, &options).is_empty());
        // Other fields keep their full range.
        assert!(check_field("*", FieldKind::Hours, &options).is_empty());
    }

    #[test]
    fn test_no_limits_disables_numeric_enforcement() {
        let options = options_with(|o| {
            o.years = Some(FieldOverride {
                no_limits: Some(true),
                ..FieldOverride::default()
            });
            o.use_years = Some(true);
        });
        assert!(check_field("1905", FieldKind::Years, &options).is_empty());
        assert!(check_field("*", FieldKind::Years, &options).is_empty());
        // Structural rules still apply.
        assert!(!check_field("1-2-3", FieldKind::Years, &options).is_empty());
    }

    #[test]
    fn test_fractional_values_are_rejected() {
        let options = default_options();
        assert_eq!(
            check_field("1.5", FieldKind::Hours, &options),
            vec![CheckError::NotAnInteger {
                element: "1.5".to_string(),
                field: FieldKind::Hours,
            }]
        );
    }

    #[test]
    fn test_blank_day_gating() {
        let options = default_options();
        assert!(matches!(
            check_field("?", FieldKind::DaysOfMonth, &options)[0],
            CheckError::BlankDayNotAllowed { .. }
        ));

        let options = options_with(|o| o.use_blank_day = Some(true));
        assert!(check_field("?", FieldKind::DaysOfMonth, &options).is_empty());
        assert!(check_field("?", FieldKind::DaysOfWeek, &options).is_empty());
        assert!(matches!(
            check_field("?", FieldKind::Minutes, &options)[0],
            CheckError::BlankDayNotAllowed { field: FieldKind::Minutes }
        ));
    }

    #[test]
    fn test_aliases() {
        let options = options_with(|o| o.use_aliases = Some(true));
        assert!(check_field("jan", FieldKind::Months, &options).is_empty());
        assert!(check_field("DEC", FieldKind::Months, &options).is_empty());
        assert!(check_field("mon-fri", FieldKind::DaysOfWeek, &options).is_empty());
        assert!(!check_field("jan", FieldKind::DaysOfWeek, &options).is_empty());
        assert!(!check_field("xyz", FieldKind::Months, &options).is_empty());

        // Aliases require the toggle.
        let plain = default_options();
        assert!(!check_field("jan", FieldKind::Months, &plain).is_empty());
    }

    #[test]
    fn test_last_day_of_month_tokens() {
        let options = options_with(|o| o.use_last_day_of_month = Some(true));
        assert!(check_field("L", FieldKind::DaysOfMonth, &options).is_empty());
        assert!(check_field("l", FieldKind::DaysOfMonth, &options).is_empty());
        assert!(check_field("L-2", FieldKind::DaysOfMonth, &options).is_empty());
        assert_eq!(
            check_field("15,L", FieldKind::DaysOfMonth, &options),
            vec![CheckError::SpecialTokenInList {
                token: 'L',
                field: FieldKind::DaysOfMonth,
            }]
        );
        assert!(!check_field("15-L", FieldKind::DaysOfMonth, &options).is_empty());
        assert!(!check_field("L/2", FieldKind::DaysOfMonth, &options).is_empty());

        // Toggle off: `L` is reported as a disallowed token.
        let plain = default_options();
        assert!(matches!(
            check_field("L", FieldKind::DaysOfMonth, &plain)[0],
            CheckError::LastDayNotAllowed { .. }
        ));
    }

    #[test]
    fn test_last_day_of_week_tokens() {
        let options = options_with(|o| o.use_last_day_of_week = Some(true));
        assert!(check_field("5L", FieldKind::DaysOfWeek, &options).is_empty());
        assert!(check_field("L", FieldKind::DaysOfWeek, &options).is_empty());
        assert!(!check_field("9L", FieldKind::DaysOfWeek, &options).is_empty());
        assert!(matches!(
            check_field("5L,6L", FieldKind::DaysOfWeek, &options)[0],
            CheckError::SpecialTokenInList { token: 'L', .. }
        ));
    }

    #[test]
    fn test_nearest_weekday_tokens() {
        let options =
            options_with(|o| {
                o.use_nearest_weekday = Some(true);
                o.use_last_day_of_month = Some(true);
            });
        assert!(check_field("15W", FieldKind::DaysOfMonth, &options).is_empty());
        assert!(check_field("LW", FieldKind::DaysOfMonth, &options).is_empty());
        assert!(matches!(
            check_field("W", FieldKind::DaysOfMonth, &options)[0],
            CheckError::MissingNearestWeekdayValue { .. }
        ));
        assert!(matches!(
            check_field("32W", FieldKind::DaysOfMonth, &options)[0],
            CheckError::AboveUpperLimit { value: 32, .. }
        ));
        assert!(matches!(
            check_field("15W,16W", FieldKind::DaysOfMonth, &options)[0],
            CheckError::SpecialTokenInList { token: 'W', .. }
        ));

        // `LW` needs both toggles.
        let nearest_only = options_with(|o| o.use_nearest_weekday = Some(true));
        assert!(matches!(
            check_field("LW", FieldKind::DaysOfMonth, &nearest_only)[0],
            CheckError::LastDayNotAllowed { .. }
        ));
    }

    #[test]
    fn test_nth_weekday_tokens() {
        let options = options_with(|o| o.use_nth_weekday_of_month = Some(true));
        assert!(check_field("5#3", FieldKind::DaysOfWeek, &options).is_empty());
        assert!(check_field("5#1", FieldKind::DaysOfWeek, &options).is_empty());
        assert!(check_field("5#5", FieldKind::DaysOfWeek, &options).is_empty());
        assert!(matches!(
            check_field("5#6", FieldKind::DaysOfWeek, &options)[0],
            CheckError::NthWeekdayOutOfRange { value: 6, .. }
        ));
        assert!(matches!(
            check_field("5#0", FieldKind::DaysOfWeek, &options)[0],
            CheckError::NthWeekdayOutOfRange { value: 0, .. }
        ));
        assert!(matches!(
            check_field("5#x", FieldKind::DaysOfWeek, &options)[0],
            CheckError::InvalidNthWeekday { .. }
        ));
        assert!(matches!(
            check_field("9#3", FieldKind::DaysOfWeek, &options)[0],
            CheckError::AboveUpperLimit { value: 9, .. }
        ));
        assert!(matches!(
            check_field("5#3,6#2", FieldKind::DaysOfWeek, &options)[0],
            CheckError::SpecialTokenInList { token: '#', .. }
        ));

        let plain = default_options();
        assert!(matches!(
            check_field("5#3", FieldKind::DaysOfWeek, &plain)[0],
            CheckError::NthWeekdayNotAllowed { .. }
        ));
    }

    #[test]
    fn test_special_tokens_gated_to_their_field() {
        let options = options_with(|o| {
            o.use_last_day_of_month = Some(true);
            o.use_nearest_weekday = Some(true);
            o.use_nth_weekday_of_month = Some(true);
        });
        // DaysOfWeek has no W; DaysOfMonth has no #.
        assert!(matches!(
            check_field("5W", FieldKind::DaysOfWeek, &options)[0],
            CheckError::InvalidNumber { .. }
        ));
        assert!(matches!(
            check_field("5#3", FieldKind::DaysOfMonth, &options)[0],
            CheckError::InvalidNumber { .. }
        ));
    }

    #[test]
    fn test_alias_preset_round() {
        // The aws-cloud-watch preset turns all special tokens on.
        let options = resolve_options(&InputOptions::preset("aws-cloud-watch")).unwrap();
        assert!(check_field("L", FieldKind::DaysOfMonth, &options).is_empty());
        assert!(check_field("fri#3", FieldKind::DaysOfWeek, &options).is_empty());
        assert!(check_field("mon", FieldKind::DaysOfWeek, &options).is_empty());
    }

    #[test]
    fn test_literal_preset_narrow_seconds() {
        let mut preset = OptionPreset::new("narrow-seconds-test");
        preset.use_seconds = true;
        preset.seconds.lower_limit = Some(20);
        preset.seconds.upper_limit = Some(40);
        let options = resolve_options(&InputOptions {
            preset: PresetSelector::Literal(preset),
            overrides: OptionOverride::default(),
        })
        .unwrap();
        assert!(check_field("25", FieldKind::Seconds, &options).is_empty());
        assert!(matches!(
            check_field("10", FieldKind::Seconds, &options)[0],
            CheckError::BelowLowerLimit { value: 10, limit: 20, .. }
        ));
    }
}
