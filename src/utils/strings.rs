/// Whitespace-separated word count.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// True when `text` has at least one cased character and none are lowercase.
#[must_use]
pub fn is_all_caps(text: &str) -> bool {
    let mut has_cased = false;
    for ch in text.chars() {
        if ch.is_lowercase() {
            return false;
        }
        if ch.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Lower-case and trim a term list, dropping blanks and duplicates.
#[must_use]
pub fn normalize_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for term in terms {
        let term = term.as_ref().trim().to_lowercase();
        if !term.is_empty() && !out.contains(&term) {
            out.push(term);
        }
    }
    out
}
