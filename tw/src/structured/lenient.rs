//! Lenient numeric deserializers
//!
//! Models routinely emit `"75"` or `75.0` where the schema declares an
//! integer, and `30` where it declares a float. These helpers accept any
//! numeric spelling that denotes the declared type and normalize it, while
//! still rejecting booleans, non-numeric strings and fractional integers.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Unexpected, Visitor};

struct IntVisitor;

impl<'de> Visitor<'de> for IntVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
            Ok(v as i64)
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        let trimmed = v.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Ok(n);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
            _ => Err(E::invalid_value(Unexpected::Str(v), &self)),
        }
    }
}

struct FloatVisitor;

impl<'de> Visitor<'de> for FloatVisitor {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        match v.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(f),
            _ => Err(E::invalid_value(Unexpected::Str(v), &self)),
        }
    }
}

/// Integer wrapper used for lenient sequences
struct LenientInt(i64);

impl<'de> Deserialize<'de> for LenientInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IntVisitor).map(LenientInt)
    }
}

/// Deserialize a signed integer field (temperatures, percentages, speeds)
pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    deserializer.deserialize_any(IntVisitor)
}

/// Deserialize a non-negative integer field (day numbers and counts)
pub fn uint<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let v = deserializer.deserialize_any(IntVisitor)?;
    u32::try_from(v).map_err(|_| de::Error::invalid_value(Unexpected::Signed(v), &"a non-negative integer"))
}

/// Deserialize a float field (amounts and percentages)
pub fn float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    deserializer.deserialize_any(FloatVisitor)
}

/// Deserialize a list of non-negative integers
pub fn uint_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u32>, D::Error> {
    let raw = Vec::<LenientInt>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|LenientInt(v)| {
            u32::try_from(v).map_err(|_| de::Error::invalid_value(Unexpected::Signed(v), &"a non-negative integer"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "int")]
        temp: i64,
        #[serde(deserialize_with = "uint")]
        day: u32,
        #[serde(deserialize_with = "float")]
        pct: f64,
        #[serde(deserialize_with = "uint_list")]
        best: Vec<u32>,
    }

    fn parse(json: &str) -> Result<Sample, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_accepts_native_types() {
        let s = parse(r#"{"temp": -4, "day": 2, "pct": 30.5, "best": [1, 3]}"#).unwrap();
        assert_eq!(s.temp, -4);
        assert_eq!(s.day, 2);
        assert_eq!(s.pct, 30.5);
        assert_eq!(s.best, vec![1, 3]);
    }

    #[test]
    fn test_coerces_numeric_spellings() {
        let s = parse(r#"{"temp": "75", "day": 3.0, "pct": 30, "best": ["1", 2.0]}"#).unwrap();
        assert_eq!(s.temp, 75);
        assert_eq!(s.day, 3);
        assert_eq!(s.pct, 30.0);
        assert_eq!(s.best, vec![1, 2]);
    }

    #[test]
    fn test_rejects_fractional_integer() {
        let err = parse(r#"{"temp": 75.5, "day": 1, "pct": 1, "best": []}"#).unwrap_err();
        assert!(err.to_string().contains("an integer"));
    }

    #[test]
    fn test_rejects_negative_day() {
        assert!(parse(r#"{"temp": 1, "day": -1, "pct": 1, "best": []}"#).is_err());
        assert!(parse(r#"{"temp": 1, "day": 1, "pct": 1, "best": [-2]}"#).is_err());
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert!(parse(r#"{"temp": "warm", "day": 1, "pct": 1, "best": []}"#).is_err());
        assert!(parse(r#"{"temp": true, "day": 1, "pct": 1, "best": []}"#).is_err());
        assert!(parse(r#"{"temp": 1, "day": 1, "pct": "lots", "best": []}"#).is_err());
    }

    proptest! {
        #[test]
        fn prop_int_string_and_float_spellings_agree(n in -10_000i64..10_000) {
            let json = format!(r#"{{"temp": "{n}", "day": {d}.0, "pct": {n}, "best": [{d}]}}"#, d = n.unsigned_abs());
            let s = parse(&json).unwrap();
            prop_assert_eq!(s.temp, n);
            prop_assert_eq!(u64::from(s.day), n.unsigned_abs());
            prop_assert_eq!(s.pct, n as f64);
        }
    }
}
