use crate::analysis::vocabulary::Vocabulary;

/// Line-oriented education detector.
///
/// A line hits when it contains any keyword as a case-insensitive substring.
/// Each hit yields the line plus the line after it, so consecutive hits produce
/// overlapping snippets.
pub struct EducationExtractor {
    keywords: Vec<String>,
}

impl EducationExtractor {
    pub fn new(vocabulary: &Vocabulary) -> Self {
        Self {
            keywords: vocabulary
                .education_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        let lines: Vec<&str> = text
            .split('\n')
            .map(|l| l.trim_end_matches('\r'))
            .collect();
        let mut snippets = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            let lowered = line.to_lowercase();
            if !self.keywords.iter().any(|k| lowered.contains(k.as_str())) {
                continue;
            }
            let snippet = match lines.get(i + 1) {
                Some(next) => format!("{line} {next}"),
                None => line.to_string(),
            };
            snippets.push(snippet.trim().to_string());
        }

        snippets
    }
}
