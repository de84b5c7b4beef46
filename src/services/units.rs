// src/services/units.rs
// DOCUMENTATION: Locale-aware unit normalization
// PURPOSE: Convert the directions API's human-readable Persian distance and
// duration strings into canonical integers (meters, minutes)

use crate::errors::PoiError;

const UNIT_METER: &str = "متر";
const UNIT_KILOMETER: &str = "کیلومتر";

/// Transliterate Persian and Arabic-Indic digit glyphs to ASCII
/// DOCUMENTATION: Directions responses mix Persian digits into the numeric
/// token ("۱.۲ کیلومتر"); everything else passes through unchanged.
pub fn to_ascii_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '۰' | '٠' => '0',
            '۱' | '١' => '1',
            '۲' | '٢' => '2',
            '۳' | '٣' => '3',
            '۴' | '٤' => '4',
            '۵' | '٥' => '5',
            '۶' | '٦' => '6',
            '۷' | '٧' => '7',
            '۸' | '٨' => '8',
            '۹' | '٩' => '9',
            other => other,
        })
        .collect()
}

/// Normalize a localized distance string to whole meters
/// DOCUMENTATION: "۳۵۰ متر" -> 350, "2 کیلومتر" -> 2000.
/// Fails with `PoiError::Format` on a missing/unknown unit or a number that
/// does not parse.
pub fn normalize_distance(text: &str) -> Result<i32, PoiError> {
    let normalized = to_ascii_digits(text.trim());
    let mut parts = normalized.split_whitespace();

    let value: f64 = parts
        .next()
        .ok_or_else(|| PoiError::Format(format!("empty distance text: {:?}", text)))?
        .parse()
        .map_err(|_| PoiError::Format(format!("unparsable distance number in {:?}", text)))?;

    let unit = parts
        .next()
        .ok_or_else(|| PoiError::Format(format!("distance text without unit: {:?}", text)))?;

    let meters = match unit {
        UNIT_METER => value,
        UNIT_KILOMETER => value * 1000.0,
        other => return Err(PoiError::Format(format!("unknown distance unit: {}", other))),
    };

    Ok(meters.round() as i32)
}

/// Normalize a localized duration string to whole minutes
/// DOCUMENTATION: The numeric token is already expressed in minutes upstream
/// ("۱۲ دقیقه"); only the number is interpreted.
pub fn normalize_duration(text: &str) -> Result<i32, PoiError> {
    let normalized = to_ascii_digits(text.trim());
    let token = normalized
        .split_whitespace()
        .next()
        .ok_or_else(|| PoiError::Format(format!("empty duration text: {:?}", text)))?;

    let minutes: f64 = token
        .parse()
        .map_err(|_| PoiError::Format(format!("unparsable duration number in {:?}", text)))?;

    Ok(minutes.round() as i32)
}
