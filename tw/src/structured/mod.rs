//! Structured response coding
//!
//! Turns a free-text model reply into a validated [`StructuredDocument`] or
//! a typed [`ErrorPayload`]. Nothing in here panics or returns any other
//! kind of error: callers may assume they only ever see one of the two.

pub mod fence;
pub mod lenient;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{
    AgentKind, AgentOutcome, BudgetDoc, ErrorPayload, ItineraryDoc, RestaurantDoc, StructuredDocument, Validate,
    WeatherDoc,
};

pub use fence::{FenceKind, extract_payload};

/// Deserialize a parsed value into `T` and apply its cross-field rules
fn validated<T: DeserializeOwned + Validate>(value: Value) -> Result<T, ErrorPayload> {
    let doc: T = serde_json::from_value(value).map_err(ErrorPayload::validation_failure)?;
    doc.validate().map_err(ErrorPayload::validation_failure)?;
    Ok(doc)
}

/// Decode a raw model reply against the schema of `kind`
pub fn decode(raw: &str, kind: AgentKind) -> Result<StructuredDocument, ErrorPayload> {
    debug!(%kind, raw_len = raw.len(), "decode: called");
    let extracted = extract_payload(raw);

    let value: Value = match serde_json::from_str(extracted) {
        Ok(value) => value,
        Err(e) => {
            warn!(%kind, error = %e, "decode: reply is not JSON");
            return Err(ErrorPayload::parse_failure(kind, extracted));
        }
    };

    let result = match kind {
        AgentKind::Itinerary => validated::<ItineraryDoc>(value).map(StructuredDocument::Itinerary),
        AgentKind::Weather => validated::<WeatherDoc>(value).map(StructuredDocument::Weather),
        AgentKind::Restaurant => validated::<RestaurantDoc>(value).map(StructuredDocument::Restaurant),
        AgentKind::Budget => validated::<BudgetDoc>(value).map(StructuredDocument::Budget),
    };

    match &result {
        Ok(_) => debug!(%kind, "decode: validated"),
        Err(payload) => warn!(%kind, error = %payload.error, "decode: validation failed"),
    }
    result
}

/// Read a reply that already crossed the wire
///
/// The remote side sends either an encoded document or an encoded error
/// payload. Anything else is run through [`decode`] so that a misbehaving
/// peer still yields a typed failure.
pub fn read_reply(text: &str, kind: AgentKind) -> AgentOutcome {
    debug!(%kind, "read_reply: called");
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(text.trim()) {
        debug!(error = %payload.error, "read_reply: remote error payload");
        return AgentOutcome::Failed(payload);
    }
    decode(text, kind).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RAW_CONTENT_LIMIT;
    use proptest::prelude::*;

    const ITINERARY: &str = r#"{
        "destination": "Tokyo",
        "days": 2,
        "itinerary": [
            {
                "day": 1,
                "title": "Old Tokyo",
                "morning": {"activities": ["Senso-ji"], "location": "Asakusa"},
                "afternoon": {"activities": ["Ueno Park"], "location": "Ueno"},
                "evening": {"activities": ["Sumida river cruise"], "location": "Sumida"},
                "meals": {"breakfast": "", "lunch": "", "dinner": ""}
            },
            {
                "day": 2,
                "title": "Modern Tokyo",
                "morning": {"activities": ["Meiji Shrine"], "location": "Harajuku"},
                "afternoon": {"activities": ["Shibuya Crossing"], "location": "Shibuya"},
                "evening": {"activities": ["Tokyo Tower"], "location": "Minato"}
            }
        ]
    }"#;

    const WEATHER: &str = r#"{
        "destination": "Tokyo",
        "forecast": [
            {"day": 1, "date": "Apr 2", "condition": "Sunny", "highTemp": "68", "lowTemp": 52.0,
             "precipitation": 10, "humidity": 45, "windSpeed": 8, "description": "Clear"},
            {"day": 2, "date": "Apr 3", "condition": "Rainy", "highTemp": 60, "lowTemp": 50,
             "precipitation": 80, "humidity": 85, "windSpeed": 12, "description": "Showers"}
        ],
        "travelAdvice": "Bring an umbrella.",
        "bestDays": [1]
    }"#;

    const RESTAURANT: &str = r#"{
        "destination": "Tokyo",
        "days": 3,
        "meals": [
            {"day": 1, "breakfast": "Cafe A", "lunch": "Ramen B", "dinner": "Sushi C"},
            {"day": 2, "breakfast": "Cafe D", "lunch": "Soba E", "dinner": "Yakitori F"},
            {"day": 3, "breakfast": "Cafe G", "lunch": "Curry H", "dinner": "Tempura I"}
        ]
    }"#;

    const BUDGET: &str = r#"{
        "totalBudget": 5000,
        "breakdown": [
            {"category": "Accommodation", "amount": 1500, "percentage": "30"},
            {"category": "Food & Dining", "amount": 1000.5, "percentage": 20.0}
        ],
        "notes": "Mid-range estimate."
    }"#;

    #[test]
    fn test_decode_itinerary() {
        let doc = decode(ITINERARY, AgentKind::Itinerary).unwrap();
        let StructuredDocument::Itinerary(doc) = doc else {
            panic!("Expected itinerary");
        };
        assert_eq!(doc.days, 2);
        assert_eq!(doc.itinerary[1].meals.breakfast, "");
        assert_eq!(doc.itinerary[0].morning.location, "Asakusa");
    }

    #[test]
    fn test_decode_weather_normalizes_numbers() {
        let StructuredDocument::Weather(doc) = decode(WEATHER, AgentKind::Weather).unwrap() else {
            panic!("Expected weather");
        };
        assert_eq!(doc.forecast[0].high_temp, 68);
        assert_eq!(doc.forecast[0].low_temp, 52);
        assert_eq!(doc.best_days, vec![1]);
    }

    #[test]
    fn test_decode_budget_defaults_currency_and_coerces() {
        let StructuredDocument::Budget(doc) = decode(BUDGET, AgentKind::Budget).unwrap() else {
            panic!("Expected budget");
        };
        assert_eq!(doc.currency, "USD");
        assert_eq!(doc.total_budget, 5000.0);
        assert_eq!(doc.breakdown[0].percentage, 30.0);

        let wire = AgentOutcome::Document(StructuredDocument::Budget(doc)).to_wire_json();
        let value: Value = serde_json::from_str(&wire).unwrap();
        assert_eq!(value["totalBudget"], serde_json::json!(5000.0));
        assert_eq!(value["breakdown"][0]["percentage"], serde_json::json!(30.0));
    }

    #[test]
    fn test_wire_key_order_follows_schema() {
        let doc = decode(BUDGET, AgentKind::Budget).unwrap();
        let wire = AgentOutcome::Document(doc).to_wire_json();
        let positions: Vec<usize> = ["\"totalBudget\"", "\"currency\"", "\"breakdown\"", "\"notes\""]
            .iter()
            .map(|key| wire.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_restaurant_three_days() {
        let StructuredDocument::Restaurant(doc) = decode(RESTAURANT, AgentKind::Restaurant).unwrap() else {
            panic!("Expected restaurant");
        };
        assert_eq!(doc.days, 3);
        assert_eq!(doc.meals.len(), 3);
    }

    #[test]
    fn test_restaurant_count_mismatch_fails_validation() {
        let raw = RESTAURANT.replace("\"days\": 3", "\"days\": 4");
        let err = decode(&raw, AgentKind::Restaurant).unwrap_err();
        assert_eq!(err.error, "Validation failed: meals has 3 entries but days is 4");
        assert_eq!(err.raw_content, None);
    }

    #[test]
    fn test_itinerary_count_mismatch_fails_validation() {
        let raw = ITINERARY.replace("\"days\": 2", "\"days\": 3");
        let err = decode(&raw, AgentKind::Itinerary).unwrap_err();
        assert!(err.error.starts_with("Validation failed: itinerary has 2 entries"));
    }

    #[test]
    fn test_weather_best_day_outside_forecast() {
        let raw = WEATHER.replace("\"bestDays\": [1]", "\"bestDays\": [1, 7]");
        let err = decode(&raw, AgentKind::Weather).unwrap_err();
        assert!(err.error.contains("day 7"));
    }

    #[test]
    fn test_missing_field_fails_validation() {
        let err = decode(r#"{"destination": "Tokyo", "days": 1}"#, AgentKind::Restaurant).unwrap_err();
        assert!(err.error.starts_with("Validation failed: missing field `meals`"));
    }

    #[test]
    fn test_wrong_type_fails_validation() {
        let raw = RESTAURANT.replace("\"days\": 3", "\"days\": \"three\"");
        let err = decode(&raw, AgentKind::Restaurant).unwrap_err();
        assert!(err.error.starts_with("Validation failed:"));

        let err = decode("[1, 2, 3]", AgentKind::Budget).unwrap_err();
        assert!(err.error.starts_with("Validation failed:"));
    }

    #[test]
    fn test_not_json_for_every_agent() {
        for kind in AgentKind::ALL {
            let err = decode("not json at all", kind).unwrap_err();
            assert_eq!(err.error, format!("Failed to generate structured {}", kind.error_subject()));
            assert_eq!(err.raw_content.as_deref(), Some("not json at all"));
        }
    }

    #[test]
    fn test_fenced_reply_is_decoded() {
        let raw = format!("Sure! Here is the plan:\n```json\n{}\n```\n```json\n{{broken\n```", RESTAURANT);
        assert!(decode(&raw, AgentKind::Restaurant).is_ok());
    }

    #[test]
    fn test_raw_content_is_first_200_chars() {
        let raw = format!("```\n{}\n```", "x".repeat(500));
        let err = decode(&raw, AgentKind::Itinerary).unwrap_err();
        assert_eq!(err.raw_content.unwrap(), "x".repeat(RAW_CONTENT_LIMIT));
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let doc = decode(WEATHER, AgentKind::Weather).unwrap();
        let wire = AgentOutcome::Document(doc.clone()).to_wire_json();
        assert_eq!(decode(&wire, AgentKind::Weather).unwrap(), doc);
    }

    #[test]
    fn test_read_reply_distinguishes_error_payloads() {
        let failed = read_reply(r#"{"error": "Validation failed: x"}"#, AgentKind::Budget);
        assert_eq!(failed, AgentOutcome::Failed(ErrorPayload::validation_failure("x")));

        let doc = read_reply(RESTAURANT, AgentKind::Restaurant);
        assert!(doc.is_document());

        let garbage = read_reply("<html>502</html>", AgentKind::Weather);
        assert!(matches!(garbage, AgentOutcome::Failed(ref p) if p.raw_content.is_some()));
    }

    proptest! {
        #[test]
        fn prop_non_json_raw_content_is_bounded_prefix(text in "[a-zA-Z ,.!?]{1,400}") {
            prop_assume!(serde_json::from_str::<Value>(text.trim()).is_err());
            let err = decode(&text, AgentKind::Weather).unwrap_err();
            let raw = err.raw_content.unwrap();
            prop_assert!(raw.chars().count() <= RAW_CONTENT_LIMIT);
            prop_assert!(text.trim().starts_with(&raw));
        }
    }
}
