//! Trip attributes mentioned in a free-text request
//!
//! Used to pre-fill the requirements form. Every attribute is optional; when
//! a pattern matches more than once the earliest mention in the text wins.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{BudgetLevel, RequirementsError, TripRequirements};

const NUMBER: &str = r"(\d+|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|fourteen)";

/// Words that follow "in"/"for" but are never a destination
const NOT_PLACES: &[&str] = &[
    "January", "February", "March", "April", "May", "June", "July", "August", "September", "October", "November",
    "December", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday", "Spring", "Summer",
    "Autumn", "Fall", "Winter", "I", "Me", "My", "Us", "We",
];

static CITY_PATTERN: OnceLock<Regex> = OnceLock::new();
static DAY_PATTERNS: OnceLock<Vec<(Regex, DayRule)>> = OnceLock::new();
static PEOPLE_PATTERNS: OnceLock<Vec<(Regex, PeopleRule)>> = OnceLock::new();
static WORD_PATTERN: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Copy)]
enum DayRule {
    Days,
    Weeks,
    OneWeek,
    Weekend,
}

#[derive(Debug, Clone, Copy)]
enum PeopleRule {
    Count,
    Fixed(u32),
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("hint patterns are valid")
}

fn city_pattern() -> &'static Regex {
    CITY_PATTERN.get_or_init(|| {
        // Prepositions are case-insensitive, the place name must be capitalised
        regex(r"\b(?i:to|in|visit|visiting|for|around)\s+([A-Z][\p{L}'.\-]*(?:\s+[A-Z][\p{L}'.\-]*)*)")
    })
}

fn day_patterns() -> &'static [(Regex, DayRule)] {
    DAY_PATTERNS.get_or_init(|| {
        vec![
            (regex(&format!(r"(?i)\b{}[\s-]*(?:days?|nights?)\b", NUMBER)), DayRule::Days),
            (regex(&format!(r"(?i)\b{}[\s-]*weeks?\b", NUMBER)), DayRule::Weeks),
            (regex(r"(?i)\b(?:a|one)\s+week\b"), DayRule::OneWeek),
            (regex(r"(?i)\bweekend\b"), DayRule::Weekend),
        ]
    })
}

fn people_patterns() -> &'static [(Regex, PeopleRule)] {
    PEOPLE_PATTERNS.get_or_init(|| {
        vec![
            (
                regex(&format!(
                    r"(?i)\b{}\s+(?:people|persons|person|travell?ers|adults|guests|friends)\b",
                    NUMBER
                )),
                PeopleRule::Count,
            ),
            (regex(&format!(r"(?i)\bfamily\s+of\s+{}\b", NUMBER)), PeopleRule::Count),
            (regex(&format!(r"(?i)\bgroup\s+of\s+{}\b", NUMBER)), PeopleRule::Count),
            (
                regex(r"(?i)\b(?:couple|for\s+two|honeymoon|my\s+(?:wife|husband|partner|girlfriend|boyfriend))\b"),
                PeopleRule::Fixed(2),
            ),
            (regex(r"(?i)\b(?:solo|alone|just\s+me|by\s+myself)\b"), PeopleRule::Fixed(1)),
        ]
    })
}

fn word_pattern() -> &'static Regex {
    WORD_PATTERN.get_or_init(|| regex(r"[A-Za-z]+(?:-[A-Za-z]+)*"))
}

/// Parse a digit string or a small number word
fn parse_number(text: &str) -> Option<u32> {
    let value = match text.to_lowercase().as_str() {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "fourteen" => 14,
        digits => digits.parse().ok()?,
    };
    (value > 0).then_some(value)
}

/// Attributes found in a request; any of them may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripHints {
    pub city: Option<String>,
    pub number_of_days: Option<u32>,
    pub number_of_people: Option<u32>,
    pub budget_level: Option<BudgetLevel>,
}

impl TripHints {
    pub fn is_complete(&self) -> bool {
        self.city.is_some() && self.number_of_days.is_some() && self.number_of_people.is_some() && self.budget_level.is_some()
    }

    /// Validated requirements, if every attribute is present
    pub fn to_requirements(&self) -> Result<TripRequirements, RequirementsError> {
        let city = self.city.clone().ok_or(RequirementsError::Missing("city"))?;
        let days = self.number_of_days.ok_or(RequirementsError::Missing("numberOfDays"))?;
        let people = self.number_of_people.ok_or(RequirementsError::Missing("numberOfPeople"))?;
        let level = self.budget_level.ok_or(RequirementsError::Missing("budgetLevel"))?;
        TripRequirements::new(city, days, people, level)
    }
}

impl From<&TripRequirements> for TripHints {
    fn from(requirements: &TripRequirements) -> Self {
        Self {
            city: Some(requirements.city.clone()),
            number_of_days: Some(requirements.number_of_days),
            number_of_people: Some(requirements.number_of_people),
            budget_level: Some(requirements.budget_level),
        }
    }
}

/// Extract whatever trip attributes the text mentions
pub fn extract_hints(text: &str) -> TripHints {
    debug!(len = text.len(), "extract_hints: called");
    let hints = TripHints {
        city: extract_city(text),
        number_of_days: extract_days(text),
        number_of_people: extract_people(text),
        budget_level: extract_budget_level(text),
    };
    debug!(?hints, "extract_hints: done");
    hints
}

fn extract_city(text: &str) -> Option<String> {
    city_pattern().captures_iter(text).find_map(|caps| {
        let words: Vec<&str> = caps[1]
            .split_whitespace()
            .map(|w| w.trim_end_matches(['.', '\'']))
            .take_while(|w| !NOT_PLACES.contains(w))
            .collect();
        (!words.is_empty()).then(|| words.join(" "))
    })
}

fn extract_days(text: &str) -> Option<u32> {
    day_patterns()
        .iter()
        .filter_map(|(re, rule)| {
            let caps = re.captures(text)?;
            let start = caps.get(0)?.start();
            let days = match rule {
                DayRule::Days => parse_number(&caps[1])?,
                DayRule::Weeks => parse_number(&caps[1])?.checked_mul(7)?,
                DayRule::OneWeek => 7,
                DayRule::Weekend => 2,
            };
            Some((start, days))
        })
        .min_by_key(|(start, _)| *start)
        .map(|(_, days)| days)
}

fn extract_people(text: &str) -> Option<u32> {
    people_patterns()
        .iter()
        .filter_map(|(re, rule)| {
            let caps = re.captures(text)?;
            let start = caps.get(0)?.start();
            let people = match rule {
                PeopleRule::Count => parse_number(&caps[1])?,
                PeopleRule::Fixed(n) => *n,
            };
            Some((start, people))
        })
        .min_by_key(|(start, _)| *start)
        .map(|(_, people)| people)
}

fn extract_budget_level(text: &str) -> Option<BudgetLevel> {
    word_pattern()
        .find_iter(text)
        .find_map(|word| BudgetLevel::from_adjective(word.as_str()))
}
