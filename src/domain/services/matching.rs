use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use std::collections::HashSet;

/// Candidates scoring below this are never considered a match.
pub const MIN_MATCH_SCORE: u32 = 5;
/// Candidates within this distance of the best score are indistinguishable.
pub const AMBIGUITY_MARGIN: u32 = 5;

const POSITION_SCORE: u32 = 50;
const PROFILE_SCORE: u32 = 5;
const HOUR_SCORE: u32 = 10;

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "my", "on", "at", "for", "of", "appointment", "please", "cancel",
    "de", "del", "la", "el", "las", "los", "mi", "para", "cita", "por", "favor", "cancelar", "que", "y",
];

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome<T> {
    NoMatch,
    Unique(T),
    Ambiguous(Vec<T>),
}

/// Searchable description of one appointment, in the business's local time.
#[derive(Debug, Clone)]
pub struct MatchProfile {
    pub tokens: HashSet<String>,
    pub hour12: String,
}

impl MatchProfile {
    pub fn new(local_start: NaiveDateTime, subject: &str, type_name: &str) -> Self {
        let mut tokens: HashSet<String> = HashSet::new();
        let (english, spanish) = weekday_names(local_start.weekday());
        tokens.insert(english.to_string());
        tokens.insert(spanish.to_string());
        tokens.insert(local_start.day().to_string());
        tokens.insert(local_start.format("%H:%M").to_string());

        let hour12 = hour12_label(local_start.hour(), local_start.minute());
        tokens.insert(hour12.clone());

        tokens.extend(keywords(subject));
        tokens.extend(keywords(type_name));

        Self { tokens, hour12 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scored<T> {
    pub item: T,
    pub score: u32,
}

fn weekday_names(day: Weekday) -> (&'static str, &'static str) {
    match day {
        Weekday::Mon => ("monday", "lunes"),
        Weekday::Tue => ("tuesday", "martes"),
        Weekday::Wed => ("wednesday", "miercoles"),
        Weekday::Thu => ("thursday", "jueves"),
        Weekday::Fri => ("friday", "viernes"),
        Weekday::Sat => ("saturday", "sabado"),
        Weekday::Sun => ("sunday", "domingo"),
    }
}

/// `9:00` → `9am`, `15:30` → `3:30pm`.
pub fn hour12_label(hour: u32, minute: u32) -> String {
    let suffix = if hour < 12 { "am" } else { "pm" };
    let h = match hour % 12 {
        0 => 12,
        h => h,
    };
    if minute == 0 {
        format!("{}{}", h, suffix)
    } else {
        format!("{}:{:02}{}", h, minute, suffix)
    }
}

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        other => other,
    }
}

/// Lower-cases, folds accents and drops punctuation other than `:`.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(fold_char)
        .map(|c| if c.is_alphanumeric() || c == ':' { c } else { ' ' })
        .collect()
}

pub fn keywords(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    let mut words: Vec<String> = Vec::new();
    let mut tokens = normalized.split_whitespace().peekable();

    while let Some(word) = tokens.next() {
        // "10 am" and "10:30 pm" collapse into a single hour keyword
        if word.chars().next().is_some_and(|c| c.is_ascii_digit())
            && let Some(next) = tokens.peek()
            && (*next == "am" || *next == "pm")
        {
            words.push(format!("{}{}", word, next));
            tokens.next();
            continue;
        }
        if STOPWORDS.contains(&word) {
            continue;
        }
        words.push(word.to_string());
    }

    words
}

/// Score of one candidate at 1-based list `position`.
pub fn score(keywords: &[String], position: usize, profile: &MatchProfile) -> u32 {
    let position_key = position.to_string();
    keywords.iter().map(|keyword| {
        let mut points = 0;
        if *keyword == position_key {
            points += POSITION_SCORE;
        }
        if profile.tokens.contains(keyword) {
            points += PROFILE_SCORE;
        }
        if profile.hour12.contains(keyword.as_str()) {
            points += HOUR_SCORE;
        }
        points
    }).sum()
}

/// Scores every candidate against `description` and keeps the ones above
/// `MIN_MATCH_SCORE`, best first.
pub fn rank<T: Clone>(description: &str, candidates: &[(T, MatchProfile)]) -> Vec<Scored<T>> {
    let words = keywords(description);
    let mut scored: Vec<Scored<T>> = candidates.iter()
        .enumerate()
        .map(|(idx, (item, profile))| Scored { item: item.clone(), score: score(&words, idx + 1, profile) })
        .filter(|s| s.score >= MIN_MATCH_SCORE)
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

pub fn best_match<T: Clone>(description: &str, candidates: &[(T, MatchProfile)]) -> MatchOutcome<T> {
    let ranked = rank(description, candidates);
    let Some(best) = ranked.first().map(|s| s.score) else {
        return MatchOutcome::NoMatch;
    };

    let mut contenders: Vec<T> = ranked.into_iter()
        .filter(|s| s.score + AMBIGUITY_MARGIN > best)
        .map(|s| s.item)
        .collect();

    if contenders.len() == 1 {
        MatchOutcome::Unique(contenders.remove(0))
    } else {
        MatchOutcome::Ambiguous(contenders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 1, day).unwrap().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn candidates() -> Vec<(&'static str, MatchProfile)> {
        vec![
            // Monday 7th 10:00
            ("massage", MatchProfile::new(at(7, 10, 0), "Masaje relajante", "Masaje")),
            // Wednesday 9th 16:30
            ("nails", MatchProfile::new(at(9, 16, 30), "Manicure", "Uñas")),
        ]
    }

    #[test]
    fn test_hour_labels() {
        assert_eq!(hour12_label(9, 0), "9am");
        assert_eq!(hour12_label(0, 15), "12:15am");
        assert_eq!(hour12_label(12, 0), "12pm");
        assert_eq!(hour12_label(16, 30), "4:30pm");
    }

    #[test]
    fn test_keywords_fold_accents_and_join_meridiem() {
        assert_eq!(keywords("La cita del Miércoles a las 4:30 PM"), vec!["miercoles".to_string(), "4:30pm".to_string()]);
        assert_eq!(keywords("uñas, ¡por favor!"), vec!["unas".to_string()]);
    }

    #[test]
    fn test_weekday_picks_single_candidate() {
        assert_eq!(best_match("la del miércoles", &candidates()), MatchOutcome::Unique("nails"));
        assert_eq!(best_match("monday please", &candidates()), MatchOutcome::Unique("massage"));
    }

    #[test]
    fn test_position_number_wins() {
        assert_eq!(best_match("2", &candidates()), MatchOutcome::Unique("nails"));
    }

    #[test]
    fn test_subject_words_match() {
        assert_eq!(best_match("el masaje", &candidates()), MatchOutcome::Unique("massage"));
    }

    #[test]
    fn test_unrelated_text_is_no_match() {
        assert_eq!(best_match("dentista", &candidates()), MatchOutcome::NoMatch);
        assert_eq!(best_match("", &candidates()), MatchOutcome::NoMatch);
    }

    #[test]
    fn test_equal_scores_are_ambiguous() {
        let twins = vec![
            ("a", MatchProfile::new(at(7, 10, 0), "Masaje", "Masaje")),
            ("b", MatchProfile::new(at(14, 11, 0), "Masaje", "Masaje")),
        ];
        match best_match("masaje", &twins) {
            MatchOutcome::Ambiguous(items) => assert_eq!(items, vec!["a", "b"]),
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_margin_separates_close_from_clear_winners() {
        let twins = vec![
            ("a", MatchProfile::new(at(7, 10, 0), "Masaje", "Masaje")),
            ("b", MatchProfile::new(at(14, 11, 0), "Masaje", "Masaje")),
        ];
        // "10am" adds profile + hour points only to the first candidate
        assert_eq!(best_match("masaje 10am", &twins), MatchOutcome::Unique("a"));
    }
}
