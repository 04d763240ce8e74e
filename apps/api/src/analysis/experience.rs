//! Experience detection: section headers, then date-anchored context windows.
//!
//! Each date occurrence inside a section yields one snippet, so a role with
//! "01/2019" and "2019 - 2021" in its description produces two overlapping
//! snippets. Callers that count snippets see that inflation.

use regex::Regex;

use crate::analysis::vocabulary::Vocabulary;

/// Characters of context kept before a date match.
const WINDOW_BEFORE: usize = 100;
/// Characters of context kept after a date match start.
const WINDOW_AFTER: usize = 200;

/// MM/YYYY, Month YYYY, YYYY-YYYY|present|current, YYYY to YYYY|present|current.
const DATE_PATTERNS: &[&str] = &[
    r"\b\d{1,2}/\d{4}\b",
    r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]* \d{4}\b",
    r"(?i)\b\d{4}\s*-\s*(?:\d{4}|present|current)\b",
    r"(?i)\b\d{4}\s*to\s*(?:\d{4}|present|current)\b",
];

/// Compiles the date patterns in their fixed evaluation order.
pub fn compile_date_patterns() -> Result<Vec<Regex>, regex::Error> {
    DATE_PATTERNS.iter().map(|p| Regex::new(p)).collect()
}

pub struct ExperienceExtractor {
    header: Option<Regex>,
    blank_line: Regex,
    dates: Vec<Regex>,
}

impl ExperienceExtractor {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self, regex::Error> {
        let header = header_pattern(
            &vocabulary.experience_headers,
            &vocabulary.experience_header_suffixes,
        )
        .map(|p| Regex::new(&p))
        .transpose()?;

        Ok(Self {
            header,
            blank_line: Regex::new(r"\n\s*\n")?,
            dates: compile_date_patterns()?,
        })
    }

    /// Sections start at a header word and run to the next blank line or the
    /// end of the text.
    pub fn sections<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let Some(header) = &self.header else {
            return Vec::new();
        };

        let mut sections = Vec::new();
        let mut pos = 0;
        while let Some(m) = header.find_at(text, pos) {
            let end = self
                .blank_line
                .find_at(text, m.end())
                .map(|b| b.start())
                .unwrap_or(text.len());
            sections.push(&text[m.start()..end]);
            // A zero-width match must still advance by one char.
            pos = if end > pos {
                end
            } else {
                match text[pos..].chars().next() {
                    Some(c) => pos + c.len_utf8(),
                    None => break,
                }
            };
        }
        sections
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut items = Vec::new();
        for section in self.sections(text) {
            // Byte offset of every char, plus the end, so windows are cut in chars.
            let boundaries: Vec<usize> = section
                .char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(section.len()))
                .collect();
            let char_len = boundaries.len() - 1;

            for pattern in &self.dates {
                for m in pattern.find_iter(section) {
                    let start_char = boundaries.partition_point(|&b| b < m.start());
                    let from = boundaries[start_char.saturating_sub(WINDOW_BEFORE)];
                    let to = boundaries[(start_char + WINDOW_AFTER).min(char_len)];
                    items.push(section[from..to].trim().to_string());
                }
            }
        }
        items
    }
}

/// `None` when no non-blank header word remains.
fn header_pattern(headers: &[String], suffixes: &[String]) -> Option<String> {
    let words = non_blank(headers)
        .map(|h| regex::escape(&h.to_lowercase()))
        .collect::<Vec<_>>();
    if words.is_empty() {
        return None;
    }
    let words = words.join("|");
    let tails = non_blank(suffixes)
        .map(|s| format!(r"\s+{}", regex::escape(&s.to_lowercase())))
        .collect::<Vec<_>>();
    if tails.is_empty() {
        return Some(format!(r"(?i)(?:{words})"));
    }
    Some(format!(r"(?i)(?:{words})(?:{})?", tails.join("|")))
}

fn non_blank(items: &[String]) -> impl Iterator<Item = &str> {
    items.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ExperienceExtractor {
        ExperienceExtractor::new(&Vocabulary::default()).unwrap()
    }

    #[test]
    fn test_header_pattern_shape() {
        let v = Vocabulary::default();
        assert_eq!(
            header_pattern(&v.experience_headers, &v.experience_header_suffixes).as_deref(),
            Some(r"(?i)(?:work|professional|employment)(?:\s+experience|\s+history)?")
        );
    }

    #[test]
    fn test_section_runs_to_blank_line() {
        let text = "Jane Doe\n\nWork Experience\nAcme Corp 2019 - 2021\n\nEducation\nBSc";
        let sections = extractor().sections(text);
        assert_eq!(sections, vec!["Work Experience\nAcme Corp 2019 - 2021"]);
    }

    #[test]
    fn test_section_runs_to_end_without_blank_line() {
        let sections = extractor().sections("EMPLOYMENT HISTORY\nGlobex 01/2020");
        assert_eq!(sections, vec!["EMPLOYMENT HISTORY\nGlobex 01/2020"]);
    }

    #[test]
    fn test_no_header_no_experience() {
        let e = extractor();
        assert!(e.extract("Acme Corp 2019 - 2021\nMarch 2020").is_empty());
    }

    #[test]
    fn test_header_without_dates_yields_nothing() {
        assert!(extractor().extract("Professional summary: motivated engineer").is_empty());
    }

    #[test]
    fn test_one_snippet_per_date_occurrence() {
        let text = "Work Experience\nAcme Corp, Engineer, 03/2019 - Jan 2021\n";
        let items = extractor().extract(text);
        // "03/2019" via MM/YYYY and "Jan 2021" via Month YYYY.
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|s| s.starts_with("Work Experience")));
    }

    #[test]
    fn test_patterns_evaluated_in_fixed_order() {
        let text = format!(
            "Work history\n2015 to present Initech\n{}\nMay 2012 Globex\n",
            "x".repeat(250)
        );
        let items = extractor().extract(&text);
        // Month-name pattern runs before the "to" pattern.
        assert_eq!(items.len(), 2);
        assert!(items[0].contains("May 2012"));
        assert!(!items[0].contains("2015 to present"));
        assert!(items[1].contains("2015 to present"));
        assert!(!items[1].contains("May 2012"));
    }

    #[test]
    fn test_range_with_present() {
        let items = extractor().extract("Employment\nInitech 2018-Present\n");
        assert_eq!(items, vec!["Employment\nInitech 2018-Present"]);
    }

    #[test]
    fn test_window_clipped_to_char_bounds() {
        let filler = "é".repeat(150);
        let text = format!("Work experience {filler} 04/2020 {}", "x".repeat(300));
        let items = extractor().extract(&text);
        assert_eq!(items.len(), 1);
        let snippet = &items[0];
        assert!(snippet.contains("04/2020"));
        // 100 chars before the date, 200 from its start.
        assert_eq!(snippet.chars().count(), 300);
        assert!(snippet.starts_with('é'));
    }

    #[test]
    fn test_multiple_sections() {
        let text = "Work experience\nAcme 2010 - 2012\n\nstuff\n\nProfessional history\nGlobex 2013 - 2015";
        let e = extractor();
        assert_eq!(e.sections(text).len(), 2);
        assert_eq!(e.extract(text).len(), 2);
    }

    #[test]
    fn test_empty_header_vocabulary_disables_extraction() {
        let vocab = Vocabulary {
            experience_headers: vec![],
            ..Vocabulary::default()
        };
        let e = ExperienceExtractor::new(&vocab).unwrap();
        assert!(e.extract("Work experience\n2019 - 2020").is_empty());
    }

    #[test]
    fn test_blank_header_words_are_ignored() {
        let vocab = Vocabulary {
            experience_headers: vec!["".into(), "  ".into()],
            experience_header_suffixes: vec!["".into()],
            ..Vocabulary::default()
        };
        let e = ExperienceExtractor::new(&vocab).unwrap();
        assert!(e.sections("a\n\nb").is_empty());
        assert!(e.extract("Work experience\n2019 - 2020").is_empty());
    }

    #[test]
    fn test_blank_suffix_keeps_real_headers() {
        let vocab = Vocabulary {
            experience_header_suffixes: vec!["".into()],
            ..Vocabulary::default()
        };
        let e = ExperienceExtractor::new(&vocab).unwrap();
        assert_eq!(e.sections("Employment\nAcme 2019 - 2020"), vec!["Employment\nAcme 2019 - 2020"]);
    }

    #[test]
    fn test_zero_width_header_match_terminates() {
        // An optional-only pattern matches the empty string everywhere.
        let e = ExperienceExtractor {
            header: Some(Regex::new(r"(?:x)?").unwrap()),
            blank_line: Regex::new(r"\n\s*\n").unwrap(),
            dates: compile_date_patterns().unwrap(),
        };
        let sections = e.sections("é\n\nb");
        assert!(sections.len() <= "é\n\nb".chars().count() + 1);
    }
}
