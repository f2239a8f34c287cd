mod strings;

pub use strings::{is_all_caps, normalize_terms, word_count};
