//! The Porter suffix-stripping stemmer, with the NLTK extensions
//!
//! On top of the 1980 algorithm this recognizes a small pool of irregular forms, keeps `ies` and
//! `ied` as `ie` in four-letter words, only turns a final `y` into `i` after a consonant, applies
//! `alli -> al` ahead of the other step 2 rules, and adds the `bli`, `fulli`, `lessli` and `logi`
//! rules. Words are lowercased first, and words of one or two letters are returned as they are.
//! Irregular forms are matched against the word as written, before lowercasing.

use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    static ref IRREGULAR_FORMS: HashMap<&'static str, &'static str> = [
        ("sky", "sky"),
        ("skies", "sky"),
        ("dying", "die"),
        ("lying", "lie"),
        ("tying", "tie"),
        ("news", "news"),
        ("innings", "inning"),
        ("inning", "inning"),
        ("outings", "outing"),
        ("outing", "outing"),
        ("cannings", "canning"),
        ("canning", "canning"),
        ("howe", "howe"),
        ("proceed", "proceed"),
        ("exceed", "exceed"),
        ("succeed", "succeed"),
    ]
    .into_iter()
    .collect();
}

/// Rewrite `suffix` to `replacement` when the stem left in front of it passes `condition`
struct Rule {
    suffix: &'static str,
    replacement: &'static str,
    condition: fn(&str) -> bool,
}

const fn rule(
    suffix: &'static str,
    replacement: &'static str,
    condition: fn(&str) -> bool,
) -> Rule {
    Rule {
        suffix,
        replacement,
        condition,
    }
}

const STEP1A: &[Rule] = &[
    rule("sses", "ss", always),
    rule("ies", "i", always),
    rule("ss", "ss", always),
    rule("s", "", always),
];

const STEP1C: &[Rule] = &[rule("y", "i", ends_after_consonant)];

const STEP2: &[Rule] = &[
    rule("ational", "ate", has_positive_measure),
    rule("tional", "tion", has_positive_measure),
    rule("enci", "ence", has_positive_measure),
    rule("anci", "ance", has_positive_measure),
    rule("izer", "ize", has_positive_measure),
    rule("bli", "ble", has_positive_measure),
    rule("alli", "al", has_positive_measure),
    rule("entli", "ent", has_positive_measure),
    rule("eli", "e", has_positive_measure),
    rule("ousli", "ous", has_positive_measure),
    rule("ization", "ize", has_positive_measure),
    rule("ation", "ate", has_positive_measure),
    rule("ator", "ate", has_positive_measure),
    rule("alism", "al", has_positive_measure),
    rule("iveness", "ive", has_positive_measure),
    rule("fulness", "ful", has_positive_measure),
    rule("ousness", "ous", has_positive_measure),
    rule("aliti", "al", has_positive_measure),
    rule("iviti", "ive", has_positive_measure),
    rule("biliti", "ble", has_positive_measure),
    rule("fulli", "ful", has_positive_measure),
    rule("lessli", "less", has_positive_measure),
    // The `l` counts towards the stem, so `geologi` and `theologi` shorten too
    rule("logi", "log", positive_measure_with_l),
];

const STEP3: &[Rule] = &[
    rule("icate", "ic", has_positive_measure),
    rule("ative", "", has_positive_measure),
    rule("alize", "al", has_positive_measure),
    rule("iciti", "ic", has_positive_measure),
    rule("ical", "ic", has_positive_measure),
    rule("ful", "", has_positive_measure),
    rule("ness", "", has_positive_measure),
];

const STEP4: &[Rule] = &[
    rule("al", "", measure_above_one),
    rule("ance", "", measure_above_one),
    rule("ence", "", measure_above_one),
    rule("er", "", measure_above_one),
    rule("ic", "", measure_above_one),
    rule("able", "", measure_above_one),
    rule("ible", "", measure_above_one),
    rule("ant", "", measure_above_one),
    rule("ement", "", measure_above_one),
    rule("ment", "", measure_above_one),
    rule("ent", "", measure_above_one),
    rule("ion", "", measure_above_one_after_s_or_t),
    rule("ou", "", measure_above_one),
    rule("ism", "", measure_above_one),
    rule("ate", "", measure_above_one),
    rule("iti", "", measure_above_one),
    rule("ous", "", measure_above_one),
    rule("ive", "", measure_above_one),
    rule("ize", "", measure_above_one),
];

const STEP5B: &[Rule] = &[rule("ll", "l", measure_above_one_with_l)];

/// Stem a single word
pub fn stem(word: &str) -> String {
    if let Some(stem) = IRREGULAR_FORMS.get(word) {
        return stem.to_string();
    }

    let lowercase = word.to_lowercase();

    if word.chars().count() <= 2
        || !lowercase
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    {
        return lowercase;
    }

    let word = step1a(lowercase);
    let word = step1b(word);
    let word = apply_rules(word, STEP1C);
    let word = step2(word);
    let word = apply_rules(word, STEP3);
    let word = apply_rules(word, STEP4);
    let word = step5a(word);

    apply_rules(word, STEP5B)
}

/// Apply the first rule whose suffix matches. Later rules are not tried even when its condition
/// fails.
fn apply_rules(word: String, rules: &[Rule]) -> String {
    for rule in rules {
        if let Some(stem) = word.strip_suffix(rule.suffix) {
            if (rule.condition)(stem) {
                return format!("{stem}{}", rule.replacement);
            }

            return word;
        }
    }

    word
}

/// Plurals
fn step1a(word: String) -> String {
    if word.len() == 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}ie");
        }
    }

    apply_rules(word, STEP1A)
}

/// -ed and -ing
fn step1b(word: String) -> String {
    if let Some(stem) = word.strip_suffix("ied") {
        return if word.len() == 4 {
            format!("{stem}ie")
        } else {
            format!("{stem}i")
        };
    }

    if let Some(stem) = word.strip_suffix("eed") {
        return if measure(stem) > 0 {
            format!("{stem}ee")
        } else {
            word
        };
    }

    let Some(stem) = ["ed", "ing"]
        .iter()
        .find_map(|suffix| word.strip_suffix(*suffix))
        .filter(|stem| contains_vowel(stem))
    else {
        return word;
    };

    for (suffix, replacement) in [("at", "ate"), ("bl", "ble"), ("iz", "ize")] {
        if let Some(base) = stem.strip_suffix(suffix) {
            return format!("{base}{replacement}");
        }
    }

    if ends_double_consonant(stem) {
        return if stem.ends_with(&['l', 's', 'z'][..]) {
            stem.to_string()
        } else {
            stem[..stem.len() - 1].to_string()
        };
    }

    if measure(stem) == 1 && ends_cvc(stem) {
        format!("{stem}e")
    } else {
        stem.to_string()
    }
}

/// Double suffixes to single ones
fn step2(word: String) -> String {
    if let Some(stem) = word.strip_suffix("alli") {
        if has_positive_measure(stem) {
            return step2(format!("{stem}al"));
        }
    }

    apply_rules(word, STEP2)
}

/// Final -e
fn step5a(word: String) -> String {
    if let Some(stem) = word.strip_suffix('e') {
        let m = measure(stem);

        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            return stem.to_string();
        }
    }

    word
}

fn is_consonant(word: &[u8], i: usize) -> bool {
    match word[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

/// The number of vowel-consonant sequences in the stem
fn measure(stem: &str) -> usize {
    let b = stem.as_bytes();

    (1..b.len())
        .filter(|&i| !is_consonant(b, i - 1) && is_consonant(b, i))
        .count()
}

fn contains_vowel(stem: &str) -> bool {
    let b = stem.as_bytes();

    (0..b.len()).any(|i| !is_consonant(b, i))
}

fn ends_double_consonant(word: &str) -> bool {
    let b = word.as_bytes();
    let n = b.len();

    n >= 2 && b[n - 1] == b[n - 2] && is_consonant(b, n - 1)
}

/// Consonant-vowel-consonant where the last letter is not w, x or y, or a two-letter
/// vowel-consonant word
fn ends_cvc(word: &str) -> bool {
    let b = word.as_bytes();
    let n = b.len();

    match n {
        0 | 1 => false,
        2 => !is_consonant(b, 0) && is_consonant(b, 1),
        _ => {
            is_consonant(b, n - 3)
                && !is_consonant(b, n - 2)
                && is_consonant(b, n - 1)
                && !matches!(b[n - 1], b'w' | b'x' | b'y')
        }
    }
}

fn always(_: &str) -> bool {
    true
}

fn has_positive_measure(stem: &str) -> bool {
    measure(stem) > 0
}

fn measure_above_one(stem: &str) -> bool {
    measure(stem) > 1
}

fn measure_above_one_after_s_or_t(stem: &str) -> bool {
    measure(stem) > 1 && stem.ends_with(&['s', 't'][..])
}

fn positive_measure_with_l(stem: &str) -> bool {
    has_positive_measure(&format!("{stem}l"))
}

fn measure_above_one_with_l(stem: &str) -> bool {
    measure(&format!("{stem}l")) > 1
}

fn ends_after_consonant(stem: &str) -> bool {
    stem.len() > 1 && is_consonant(stem.as_bytes(), stem.len() - 1)
}
