use super::fuzzy::{ConfidenceScore, normalize_for_comparison, title_similarity, year_match};

const TITLE_WEIGHT: f64 = 0.6;
const YEAR_WEIGHT: f64 = 0.4;
const ORIGINAL_TITLE_BONUS: f64 = 0.1;
const MISSING_YEAR_PENALTY: f64 = -0.05;

/// Title and year as known by a candidate (catalogue entry or provider hit).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateTitle<'a> {
    pub title: &'a str,
    pub original_title: Option<&'a str>,
    pub year: Option<i32>,
}

impl<'a> CandidateTitle<'a> {
    pub fn new(title: &'a str, year: Option<i32>) -> Self {
        Self {
            title,
            original_title: None,
            year,
        }
    }

    pub fn with_original_title(mut self, original_title: &'a str) -> Self {
        self.original_title = Some(original_title);
        self
    }
}

/// Reference scorer for movie-like content identified by title and year.
///
/// Title similarity always counts; year proximity only counts when both sides
/// know a year. Matching a distinct original title earns a small bonus, and a
/// filename without any year is penalised slightly when the candidate has one.
pub fn score_title_year(
    parsed_title: &str,
    parsed_year: Option<i32>,
    candidate: CandidateTitle<'_>,
) -> f64 {
    let mut score = ConfidenceScore::new();
    score.add(title_similarity(parsed_title, candidate.title), TITLE_WEIGHT);

    match (parsed_year, candidate.year) {
        (Some(_), Some(_)) => {
            score.add(year_match(parsed_year, candidate.year), YEAR_WEIGHT);
        }
        (None, Some(_)) => {
            score.add_bonus(MISSING_YEAR_PENALTY);
        }
        _ => {}
    }

    if let Some(original) = candidate.original_title {
        let original = normalize_for_comparison(original);
        if original != normalize_for_comparison(candidate.title)
            && original == normalize_for_comparison(parsed_title)
        {
            score.add_bonus(ORIGINAL_TITLE_BONUS);
        }
    }

    score.calculate()
}
