//! Named-entity enrichment (PERSON, ORG, GPE, DATE, LANGUAGE).
//!
//! Rule-based and best-effort: nothing downstream scores on these. The
//! recognizer compiles its patterns once at startup and is shared read-only
//! behind an `Arc` for the life of the process.

use std::cmp::Reverse;
use std::collections::HashSet;

use regex::{Match, Regex};
use serde::{Deserialize, Serialize};

use crate::analysis::experience::compile_date_patterns;

const ORG_SUFFIXES: &[&str] = &[
    "Inc", "LLC", "Ltd", "Corp", "Corporation", "Company", "Technologies", "University",
    "College", "Institute", "Labs", "Group", "Bank", "Foundation", "Solutions", "Systems",
];

const PLACES: &[&str] = &[
    "United States", "USA", "United Kingdom", "UK", "Canada", "Mexico", "Brazil", "Germany",
    "France", "Spain", "Italy", "Netherlands", "Ireland", "Sweden", "Poland", "India", "China",
    "Japan", "Singapore", "Australia", "New Zealand", "Nigeria", "Kenya", "South Africa",
    "New York", "San Francisco", "Seattle", "Austin", "Boston", "Chicago", "Los Angeles",
    "Toronto", "Vancouver", "London", "Berlin", "Paris", "Amsterdam", "Dublin", "Madrid",
    "Bangalore", "Bengaluru", "Mumbai", "Delhi", "Hyderabad", "Tokyo", "Sydney", "Melbourne",
    "Lagos", "Nairobi",
];

const LANGUAGES: &[&str] = &[
    "English", "Spanish", "French", "German", "Italian", "Portuguese", "Dutch", "Russian",
    "Mandarin", "Cantonese", "Chinese", "Japanese", "Korean", "Hindi", "Bengali", "Urdu",
    "Arabic", "Turkish", "Polish", "Swedish", "Swahili", "Yoruba", "Hebrew", "Greek",
];

/// How many leading non-empty lines are considered for the candidate's name.
const NAME_LINE_WINDOW: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entities {
    pub person: Vec<String>,
    pub org: Vec<String>,
    pub gpe: Vec<String>,
    pub date: Vec<String>,
    pub language: Vec<String>,
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        self.person.is_empty()
            && self.org.is_empty()
            && self.gpe.is_empty()
            && self.date.is_empty()
            && self.language.is_empty()
    }
}

pub struct EntityRecognizer {
    person: Regex,
    org: Regex,
    gpe: Regex,
    city_state: Regex,
    language: Regex,
    dates: Vec<Regex>,
}

impl EntityRecognizer {
    pub fn new() -> Result<Self, regex::Error> {
        let suffixes = alternation(ORG_SUFFIXES);
        Ok(Self {
            person: Regex::new(r"^\p{Lu}[\p{L}'\-]+(?:\s+\p{Lu}[\p{L}'.\-]*){1,3}$")?,
            org: Regex::new(&format!(
                r"\b(?:\p{{Lu}}[\p{{L}}&\-]*[ \t]+){{1,4}}(?:{suffixes})\b\.?"
            ))?,
            gpe: Regex::new(&format!(r"\b(?:{})\b", alternation(PLACES)))?,
            city_state: Regex::new(r"\b\p{Lu}[a-z]+(?: \p{Lu}[a-z]+)?, [A-Z]{2}\b")?,
            language: Regex::new(&format!(r"\b(?:{})\b", alternation(LANGUAGES)))?,
            dates: compile_date_patterns()?,
        })
    }

    pub fn recognize(&self, text: &str) -> Entities {
        let dates = self.dates.iter().flat_map(|p| p.find_iter(text)).collect();
        let places = self
            .gpe
            .find_iter(text)
            .chain(self.city_state.find_iter(text))
            .collect();

        Entities {
            person: self.person_candidates(text),
            org: dedup_in_order(self.org.find_iter(text).map(|m| m.as_str().trim())),
            gpe: dedup_in_order(non_overlapping(places).into_iter()),
            date: dedup_in_order(non_overlapping(dates).into_iter()),
            language: dedup_in_order(self.language.find_iter(text).map(|m| m.as_str())),
        }
    }

    fn person_candidates(&self, text: &str) -> Vec<String> {
        let names = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .take(NAME_LINE_WINDOW)
            .filter(|l| !l.contains('@') && !l.chars().any(|c| c.is_ascii_digit()))
            .filter(|l| self.person.is_match(l))
            .filter(|l| !self.org.is_match(l) && !self.gpe.is_match(l));
        dedup_in_order(names).into_iter().take(1).collect()
    }
}

fn alternation(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

/// Orders matches by position and drops any that overlap an earlier, longer one.
fn non_overlapping<'t>(mut spans: Vec<Match<'t>>) -> Vec<&'t str> {
    spans.sort_by_key(|m| (m.start(), Reverse(m.end())));
    let mut kept = Vec::new();
    let mut last_end = 0;
    for m in spans {
        if !kept.is_empty() && m.start() < last_end {
            continue;
        }
        last_end = m.end();
        kept.push(m.as_str());
    }
    kept
}

fn dedup_in_order<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|s| seen.insert(*s))
        .map(String::from)
        .collect()
}
