//! Name transforms shared by the module entity and generators
//!
//! All transforms are pure functions of the input string.

use regex::Regex;
use std::sync::LazyLock;

static WORD_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_\s]+").expect("separator regex is valid"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Lower-case form: `"Recipe Name"` -> `"recipe name"`
pub fn lower(name: &str) -> String {
    name.to_lowercase()
}

/// StudlyCase form: `"recipe_name"` / `"Recipe Name"` -> `"RecipeName"`
pub fn studly(name: &str) -> String {
    WORD_SEPARATORS
        .split(name)
        .filter(|word| !word.is_empty())
        .map(upper_first)
        .collect()
}

/// snake_case form: `"Recipe Name"` / `"RecipeName"` -> `"recipe_name"`
pub fn snake(name: &str) -> String {
    if is_plain_lower(name) {
        return name.to_string();
    }

    let words: Vec<String> = name.split_whitespace().map(upper_first).collect();
    let joined = WHITESPACE.replace_all(&words.join(" "), "").into_owned();

    let mut out = String::with_capacity(joined.len() + 4);
    for (i, ch) in joined.chars().enumerate() {
        if i > 0 && ch.is_uppercase() {
            out.push('_');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

fn is_plain_lower(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_lowercase())
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Recipe Name", "recipe name")]
    #[test_case("Blog", "blog")]
    fn test_lower(input: &str, expected: &str) {
        assert_eq!(lower(input), expected);
    }

    #[test_case("Recipe Name", "RecipeName")]
    #[test_case("recipe_name", "RecipeName")]
    #[test_case("user-profile", "UserProfile")]
    #[test_case("blogPost", "BlogPost")]
    #[test_case("Blog", "Blog")]
    fn test_studly(input: &str, expected: &str) {
        assert_eq!(studly(input), expected);
    }

    #[test_case("Recipe Name", "recipe_name")]
    #[test_case("RecipeName", "recipe_name")]
    #[test_case("recipe", "recipe")]
    #[test_case("required_module", "required_module")]
    #[test_case("Blog", "blog")]
    fn test_snake(input: &str, expected: &str) {
        assert_eq!(snake(input), expected);
    }
}
