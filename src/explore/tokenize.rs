use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

static ISO_DATE: OnceLock<Regex> = OnceLock::new();

fn iso_date() -> &'static Regex {
    ISO_DATE.get_or_init(|| Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("valid date pattern"))
}

fn is_separator(c: char) -> bool {
    matches!(c, '/' | '.' | '-')
}

/// Lower-cased search tokens for a path.
///
/// Segments split on runs of `/`, `.` and `-`. A `YYYY-MM-DD` substring is
/// added whole as one more token.
pub fn tokenize(path: &str) -> HashSet<String> {
    if path.is_empty() {
        return HashSet::new();
    }
    let lower = path.to_lowercase();
    let mut tokens: HashSet<String> = lower
        .split(is_separator)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if let Some(date) = iso_date().find(&lower) {
        tokens.insert(date.as_str().to_string());
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_segments_and_adds_date() {
        assert_eq!(
            tokenize("archive/2021-05-09/haiku-003.html"),
            set(&["archive", "2021", "05", "09", "haiku", "003", "html", "2021-05-09"])
        );
    }

    #[test]
    fn empty_path_has_no_tokens() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn lower_cases_and_collapses_duplicates() {
        assert_eq!(tokenize("Spring/spring.HTML"), set(&["spring", "html"]));
    }

    #[test]
    fn runs_of_separators_yield_no_empty_tokens() {
        assert_eq!(tokenize("/a--b..c//d/"), set(&["a", "b", "c", "d"]));
    }

    #[test]
    fn partial_date_is_not_a_date_token() {
        let tokens = tokenize("2021-05/x.html");
        assert!(!tokens.iter().any(|t| t.contains('-')));
        assert!(tokens.contains("2021"));
    }
}
