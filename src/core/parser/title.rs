//! Title normalization and year extraction.

use crate::core::vocabulary::VocabularyMatcher;
use regex::Regex;
use std::sync::LazyLock;

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

const LEADING_ARTICLES: [&str; 3] = ["the ", "a ", "an "];

/// A title and optional year read from one name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleYear {
    pub title: String,
    pub year: Option<u16>,
}

/// Normalize a raw title for comparison.
///
/// Quality tokens are removed, the text is lowercased, punctuation is
/// dropped, whitespace collapsed and a leading article stripped.
pub fn normalize_title(raw: &str, vocabulary: &VocabularyMatcher) -> String {
    let without_tokens = vocabulary.quality_tokens().strip(raw);
    let lowered = without_tokens.to_lowercase();

    let mut cleaned = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        if c.is_alphanumeric() {
            cleaned.push(c);
        } else if c == '\'' || c == '\u{2019}' {
            // "director's" and "directors" must compare equal
        } else {
            cleaned.push(' ');
        }
    }

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    for article in LEADING_ARTICLES {
        if let Some(rest) = collapsed.strip_prefix(article) {
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    collapsed
}

/// Remove standalone year tokens from an already-normalized name
pub fn strip_years(normalized: &str) -> String {
    normalized
        .split_whitespace()
        .filter(|word| !is_year_token(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Byte offsets and values of 4-digit years (1900-2099) bounded by non-digits
pub fn year_candidates(text: &str) -> Vec<(usize, u16)> {
    DIGIT_RUN
        .find_iter(text)
        .filter(|m| is_year_token(m.as_str()))
        .filter_map(|m| m.as_str().parse::<u16>().ok().map(|y| (m.start(), y)))
        .collect()
}

fn is_year_token(word: &str) -> bool {
    word.len() == 4
        && word
            .parse::<u16>()
            .map(|y| (1900..=2099).contains(&y))
            .unwrap_or(false)
}

/// Read a movie title and year from a file stem or folder name.
///
/// The year is the last year token that appears before any quality token and
/// has a non-empty title in front of it, so `2001 A Space Odyssey (1968)`
/// yields `2001 a space odyssey` / 1968. Without a year the title runs up to
/// the first quality token.
pub fn movie_title_year(name: &str, vocabulary: &VocabularyMatcher) -> TitleYear {
    let quality_start = vocabulary
        .quality_tokens()
        .first_offset(name)
        .unwrap_or(name.len());

    let year = year_candidates(name)
        .into_iter()
        .filter(|(start, _)| *start < quality_start)
        .filter_map(|(start, year)| {
            let title = normalize_title(&name[..start], vocabulary);
            (!title.is_empty()).then_some((title, year))
        })
        .last();

    match year {
        Some((title, year)) => TitleYear {
            title,
            year: Some(year),
        },
        None => TitleYear {
            title: normalize_title(&name[..quality_start], vocabulary),
            year: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vocabulary::Vocabulary;

    fn vocab() -> VocabularyMatcher {
        Vocabulary::default().compile().unwrap()
    }

    #[test]
    fn normalize_lowercases_and_strips_punctuation() {
        let v = vocab();
        assert_eq!(normalize_title("The.Matrix", &v), "matrix");
        assert_eq!(normalize_title("Schindler's  List!", &v), "schindlers list");
        assert_eq!(normalize_title("Spider-Man: No Way Home", &v), "spider man no way home");
    }

    #[test]
    fn normalize_drops_quality_tokens() {
        let v = vocab();
        assert_eq!(normalize_title("Heat [1080p BluRay x264]", &v), "heat");
    }

    #[test]
    fn lone_article_is_kept() {
        assert_eq!(normalize_title("A", &vocab()), "a");
    }

    #[test]
    fn year_candidates_need_digit_boundaries() {
        assert_eq!(year_candidates("Movie 1999"), vec![(6, 1999)]);
        assert!(year_candidates("Movie 19999").is_empty());
        assert!(year_candidates("1080p 2160p").is_empty());
        assert!(year_candidates("Movie 1850").is_empty());
    }

    #[test]
    fn movie_title_year_with_parenthesized_year() {
        let parsed = movie_title_year("The Matrix (1999) [1080p BluRay x264]", &vocab());
        assert_eq!(parsed.title, "matrix");
        assert_eq!(parsed.year, Some(1999));
    }

    #[test]
    fn movie_title_year_prefers_last_year_with_title() {
        let v = vocab();
        let parsed = movie_title_year("2001 A Space Odyssey (1968)", &v);
        assert_eq!(parsed.title, "2001 a space odyssey");
        assert_eq!(parsed.year, Some(1968));

        let parsed = movie_title_year("Blade.Runner.2049.2017.2160p", &v);
        assert_eq!(parsed.title, "blade runner 2049");
        assert_eq!(parsed.year, Some(2017));
    }

    #[test]
    fn movie_title_without_year_stops_at_quality() {
        let parsed = movie_title_year("Heat.1080p.BluRay", &vocab());
        assert_eq!(parsed.title, "heat");
        assert_eq!(parsed.year, None);
    }

    #[test]
    fn year_after_quality_tokens_is_ignored() {
        let parsed = movie_title_year("Heat 1080p 1995", &vocab());
        assert_eq!(parsed.title, "heat");
        assert_eq!(parsed.year, None);
    }

    #[test]
    fn strip_years_removes_year_words_only() {
        assert_eq!(strip_years("foundation 2021"), "foundation");
        assert_eq!(strip_years("24 legacy"), "24 legacy");
    }

    #[test]
    fn director_in_a_title_is_kept() {
        let v = vocab();
        assert_eq!(normalize_title("The Director", &v), "director");

        let parsed = movie_title_year("The.Directors.2019.1080p", &v);
        assert_eq!(parsed.title, "directors");
        assert_eq!(parsed.year, Some(2019));
    }

    #[test]
    fn directors_cut_phrase_is_dropped_from_titles() {
        let v = vocab();
        assert_eq!(normalize_title("Blade Runner Directors Cut", &v), "blade runner");
        assert_eq!(normalize_title("Kingdom of Heaven Director's Cut", &v), "kingdom of heaven");
    }
}
