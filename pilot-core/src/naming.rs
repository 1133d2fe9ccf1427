//! Casing and pluralization helpers shared by the loader and templates.
//!
//! Identifiers are split into words on non-alphanumeric separators and on
//! case boundaries (`fooBar`, `HTTPServer`, `v1Beta`), then re-joined in
//! the requested style. All functions are pure.

/// Split an identifier into its words.
pub fn words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some(prev) = current.chars().last() {
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = ((prev.is_lowercase() || prev.is_ascii_digit()) && c.is_uppercase())
                || (prev.is_uppercase() && c.is_uppercase() && next_is_lower);
            if boundary {
                out.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// `WidgetSet` → `widgetSet`, `HTTPServer` → `httpServer`.
pub fn lower_camel(s: &str) -> String {
    let mut out = String::new();
    for (i, w) in words(s).iter().enumerate() {
        if i == 0 {
            out.push_str(&w.to_lowercase());
        } else {
            out.push_str(&capitalize(w));
        }
    }
    out
}

/// `widget_set` → `WidgetSet`.
pub fn upper_camel(s: &str) -> String {
    words(s).iter().map(|w| capitalize(w)).collect()
}

/// `WidgetSet` → `widget_set`.
pub fn snake_case(s: &str) -> String {
    join_lower(s, "_")
}

/// `WidgetSet` → `widget-set`.
pub fn kebab_case(s: &str) -> String {
    join_lower(s, "-")
}

fn join_lower(s: &str, sep: &str) -> String {
    words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Package-safe form: lower-case, alphanumerics only (`build-image` → `buildimage`).
pub fn package_name(s: &str) -> String {
    upper_camel(s).to_lowercase()
}

// ---------------------------------------------------------------------------
// Pluralization
// ---------------------------------------------------------------------------

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "deer",
    "fish",
    "information",
    "metadata",
    "news",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("analysis", "analyses"),
    ("child", "children"),
    ("criterion", "criteria"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("index", "indices"),
    ("man", "men"),
    ("matrix", "matrices"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("vertex", "vertices"),
    ("woman", "women"),
];

const F_TO_VES: &[&str] = &["calf", "elf", "half", "leaf", "loaf", "shelf", "thief", "wolf"];
const FE_TO_VES: &[&str] = &["knife", "life", "wife"];
const O_TO_OES: &[&str] = &["echo", "hero", "potato", "tomato", "veto"];

/// English plural of the last word of `s`, keeping any leading words.
///
/// `Widget` → `Widgets`, `ClusterPolicy` → `ClusterPolicies`, `Person` → `People`.
pub fn pluralize(s: &str) -> String {
    let trimmed = s.trim_end_matches(|c: char| !c.is_alphanumeric());
    let Some(last) = words(trimmed).pop() else {
        return s.to_string();
    };
    let stem = &trimmed[..trimmed.len() - last.len()];
    format!("{stem}{}", pluralize_word(&last))
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return match_case(word, plural);
    }
    if FE_TO_VES.contains(&lower.as_str()) {
        return format!("{}ves", &word[..word.len() - 2]);
    }
    if F_TO_VES.contains(&lower.as_str()) {
        return format!("{}ves", &word[..word.len() - 1]);
    }
    if O_TO_OES.contains(&lower.as_str()) {
        return format!("{word}es");
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| lower.ends_with(suffix)) {
        return format!("{word}es");
    }
    if lower.ends_with('y') && lower.len() > 1 {
        let before_y = lower.chars().rev().nth(1);
        if before_y.is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }
    format!("{word}s")
}

fn match_case(original: &str, replacement: &str) -> String {
    let all_upper = original.len() > 1 && original.chars().all(|c| !c.is_lowercase());
    if all_upper {
        return replacement.to_uppercase();
    }
    if original.chars().next().is_some_and(char::is_uppercase) {
        return capitalize(replacement);
    }
    replacement.to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
