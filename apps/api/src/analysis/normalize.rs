/// Lowercases, collapses whitespace, and replaces every character that is not
/// an ASCII letter or a space with a space. The result is trimmed but may
/// contain runs of spaces where punctuation or digits were removed.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .map(|c| if c.is_ascii_alphabetic() || c == ' ' { c } else { ' ' })
        .collect::<String>()
        .trim()
        .to_string()
}
