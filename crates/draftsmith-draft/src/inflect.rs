//! English naming helpers used for entity, table and field names

use convert_case::{Case, Casing};

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "fish",
    "information",
    "media",
    "metadata",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

// Singular words whose last letter is an `s`
const ENDS_IN_S: &[&str] = &[
    "alias", "atlas", "bias", "canvas", "chaos", "cosmos", "ethos", "gas", "lens", "pancreas",
];

const F_TO_VES: &[(&str, &str)] = &[
    ("half", "halves"),
    ("knife", "knives"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("shelf", "shelves"),
    ("wife", "wives"),
    ("wolf", "wolves"),
];

/// `UserProfile` → `user_profile`
#[must_use]
pub fn snake(name: &str) -> String {
    name.to_case(Case::Snake)
}

/// `user_profile` → `UserProfile`
#[must_use]
pub fn studly(name: &str) -> String {
    name.to_case(Case::Pascal)
}

/// Conventional table name for an entity: `UserProfile` → `user_profiles`
#[must_use]
pub fn table_name(entity: &str) -> String {
    plural(&snake(entity))
}

/// Plural form of the trailing word, preserving case of the rest
#[must_use]
pub fn plural(word: &str) -> String {
    let tail = last_word(word);
    if UNCOUNTABLE.contains(&tail.as_str()) {
        return word.to_string();
    }
    for (one, many) in IRREGULAR.iter().chain(F_TO_VES) {
        if tail == *one {
            return replace_suffix(word, one.len(), many);
        }
    }

    let lower = word.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    if lower.ends_with('y') && bytes.len() > 1 && !is_vowel(bytes[bytes.len() - 2]) {
        return replace_suffix(word, 1, "ies");
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{word}es");
    }
    format!("{word}s")
}

/// Singular form of the trailing word, preserving case of the rest
#[must_use]
pub fn singular(word: &str) -> String {
    let tail = last_word(word);
    if UNCOUNTABLE.contains(&tail.as_str()) || ENDS_IN_S.contains(&tail.as_str()) {
        return word.to_string();
    }
    if tail
        .strip_suffix("es")
        .is_some_and(|stem| ENDS_IN_S.contains(&stem))
    {
        return replace_suffix(word, 2, "");
    }
    for (one, many) in IRREGULAR.iter().chain(F_TO_VES) {
        if tail == *many {
            return replace_suffix(word, many.len(), one);
        }
        if tail == *one {
            return word.to_string();
        }
    }

    let lower = word.to_ascii_lowercase();
    if lower.ends_with("ies") && lower.len() > 3 {
        return replace_suffix(word, 3, "y");
    }
    if ["sses", "xes", "zes", "ches", "shes", "uses"]
        .iter()
        .any(|s| lower.ends_with(s))
    {
        return replace_suffix(word, 2, "");
    }
    if ["ss", "us", "is"].iter().any(|s| lower.ends_with(s)) {
        return word.to_string();
    }
    if lower.ends_with('s') && lower.len() > 1 {
        return replace_suffix(word, 1, "");
    }
    word.to_string()
}

/// Is `word` already in singular form?
#[inline]
#[must_use]
pub fn is_singular(word: &str) -> bool {
    singular(word) == word
}

// Lowercased trailing word: after the last `_`, or from the last uppercase
// letter (`SalesPerson` → `person`, `user_profile` → `profile`).
fn last_word(word: &str) -> String {
    let after_underscore = word.rfind('_').map_or(0, |i| i + 1);
    let last_upper = word
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_uppercase())
        .map_or(0, |(i, _)| i);
    word[after_underscore.max(last_upper)..].to_ascii_lowercase()
}

fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u')
}

// Swap the last `len` bytes for `with`, keeping an uppercase initial if the
// replaced suffix started with one (`SalesPerson` → `SalesPeople`).
fn replace_suffix(word: &str, len: usize, with: &str) -> String {
    let cut = word.len() - len;
    let (head, tail) = word.split_at(cut);
    let upper = tail.chars().next().is_some_and(char::is_uppercase);
    let mut out = String::with_capacity(head.len() + with.len());
    out.push_str(head);
    if upper {
        let mut chars = with.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    } else {
        out.push_str(with);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plural_rules() {
        assert_eq!(plural("post"), "posts");
        assert_eq!(plural("category"), "categories");
        assert_eq!(plural("day"), "days");
        assert_eq!(plural("status"), "statuses");
        assert_eq!(plural("box"), "boxes");
        assert_eq!(plural("branch"), "branches");
        assert_eq!(plural("person"), "people");
        assert_eq!(plural("SalesPerson"), "SalesPeople");
        assert_eq!(plural("shelf"), "shelves");
        assert_eq!(plural("news"), "news");
        assert_eq!(plural("lens"), "lenses");
    }

    #[test]
    fn irregular_words_match_whole_words_only() {
        assert_eq!(table_name("Box"), "boxes");
        assert_eq!(table_name("Fox"), "foxes");
        assert_eq!(table_name("Inbox"), "inboxes");
        assert_eq!(table_name("Human"), "humans");
        assert_eq!(table_name("Price"), "prices");
        assert_eq!(table_name("Ox"), "oxen");
        assert_eq!(table_name("SalesPerson"), "sales_people");
        assert_eq!(table_name("FishTank"), "fish_tanks");
        assert_eq!(table_name("GoldFish"), "gold_fish");
        assert_eq!(singular("Humans"), "Human");
        assert_eq!(singular("Prices"), "Price");
    }

    #[test]
    fn singular_rules() {
        assert_eq!(singular("posts"), "post");
        assert_eq!(singular("Categories"), "Category");
        assert_eq!(singular("statuses"), "status");
        assert_eq!(singular("Status"), "Status");
        assert_eq!(singular("Address"), "Address");
        assert_eq!(singular("people"), "person");
        assert_eq!(singular("Person"), "Person");
        assert_eq!(singular("boxes"), "box");
        assert_eq!(singular("knives"), "knife");
        assert_eq!(singular("aliases"), "alias");
        assert_eq!(singular("Canvases"), "Canvas");
    }

    #[test]
    fn singular_detection() {
        assert!(is_singular("Post"));
        assert!(is_singular("UserProfile"));
        assert!(is_singular("Analysis"));
        assert!(is_singular("Alias"));
        assert!(is_singular("Canvas"));
        assert!(is_singular("Gas"));
        assert!(is_singular("Lens"));
        assert!(is_singular("Atlas"));
        assert!(is_singular("Human"));
        assert!(is_singular("Inbox"));
        assert!(!is_singular("Posts"));
        assert!(!is_singular("Users"));
    }

    #[test]
    fn case_helpers() {
        assert_eq!(snake("UserProfile"), "user_profile");
        assert_eq!(studly("user_profile"), "UserProfile");
        assert_eq!(table_name("Post"), "posts");
        assert_eq!(table_name("UserProfile"), "user_profiles");
        assert_eq!(table_name("Category"), "categories");
    }

    proptest! {
        #[test]
        fn regular_nouns_round_trip(stem in "[a-z]{2,8}[bdgklmnprt]") {
            prop_assume!(!ENDS_IN_S.contains(&format!("{stem}s").as_str()));
            prop_assert_eq!(singular(&plural(&stem)), stem);
        }
    }
}
