use indexmap::IndexMap;

/// Occurrence counts keyed by tag or word, in first-seen order.
pub(crate) type FreqDist = IndexMap<String, u64>;

pub(crate) fn increment(dist: &mut FreqDist, key: &str) {
    // going through .entry() would allocate a key on every call,
    // even when the key is already present
    if let Some(count) = dist.get_mut(key) {
        *count += 1;
        return;
    }

    dist.insert(key.to_owned(), 1);
}

pub(crate) fn increment_nested(dists: &mut IndexMap<String, FreqDist>, outer: &str, inner: &str) {
    if let Some(dist) = dists.get_mut(outer) {
        increment(dist, inner);
        return;
    }

    let mut dist = FreqDist::new();
    dist.insert(inner.to_owned(), 1);
    dists.insert(outer.to_owned(), dist);
}

pub(crate) fn is_capitalized(word: &str) -> bool {
    word.chars().next().map_or(false, char::is_uppercase)
}

/// Last `length` characters of `word`, or all of it if it is shorter.
pub(crate) fn trailing_chars(word: &str, length: usize) -> &str {
    if length == 0 {
        return "";
    }

    match word.char_indices().rev().nth(length - 1) {
        Some((index, _)) => &word[index..],
        None => word,
    }
}

/// `suffix` with its first character removed.
pub(crate) fn drop_first_char(suffix: &str) -> &str {
    let mut chars = suffix.chars();
    chars.next();
    chars.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_chars_counts_characters_not_bytes() {
        assert_eq!(trailing_chars("running", 3), "ing");
        assert_eq!(trailing_chars("café", 2), "fé");
        assert_eq!(trailing_chars("ox", 5), "ox");
        assert_eq!(trailing_chars("ox", 0), "");
        assert_eq!(trailing_chars("", 3), "");
    }

    #[test]
    fn capitalization_looks_at_first_character_only() {
        assert!(is_capitalized("London"));
        assert!(is_capitalized("ÉCOLE"));
        assert!(!is_capitalized("iPhone"));
        assert!(!is_capitalized("1990s"));
        assert!(!is_capitalized(""));
    }

    #[test]
    fn nested_increment_creates_and_updates() {
        let mut dists = IndexMap::new();
        increment_nested(&mut dists, "NN", "dog");
        increment_nested(&mut dists, "NN", "dog");
        increment_nested(&mut dists, "NN", "cat");
        assert_eq!(dists["NN"]["dog"], 2);
        assert_eq!(dists["NN"]["cat"], 1);
        assert_eq!(drop_first_char("ing"), "ng");
        assert_eq!(drop_first_char(""), "");
    }
}
