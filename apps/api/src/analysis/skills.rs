use regex::Regex;

use crate::analysis::vocabulary::Vocabulary;

/// Whole-word, case-insensitive matcher over the skill vocabulary.
///
/// Output order is vocabulary order, not document order. Blank labels are
/// skipped.
pub struct SkillExtractor {
    patterns: Vec<(String, Regex)>,
}

impl SkillExtractor {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self, regex::Error> {
        let patterns = vocabulary
            .skills()
            .into_iter()
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(|skill| {
                let label = skill.to_lowercase();
                let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&label)))?;
                Ok((label, re))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { patterns })
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(label, _)| label.clone())
            .collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.patterns.len()
    }
}
