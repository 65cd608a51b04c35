//! Keyword and pattern heuristics used to gate auto-moderation.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const POSITIVE_WORDS: &[&str] = &[
    "amazing",
    "awesome",
    "beautiful",
    "best",
    "brilliant",
    "excellent",
    "fantastic",
    "fun",
    "good",
    "great",
    "incredible",
    "love",
    "loved",
    "masterpiece",
    "perfect",
    "recommend",
    "enjoyed",
    "wonderful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "awful",
    "bad",
    "boring",
    "broken",
    "buggy",
    "disappointing",
    "garbage",
    "hate",
    "horrible",
    "poor",
    "refund",
    "terrible",
    "trash",
    "waste",
    "worst",
];

/// Ratio above which (or below whose negation) a text gets a polar label.
const SENTIMENT_THRESHOLD: f64 = 0.2;
/// Spam score at which content is held for review.
pub const SPAM_THRESHOLD: f64 = 0.5;

const REPEATED_CHAR_RUN: usize = 5;
const CAPS_MIN_LETTERS: usize = 10;
const CAPS_RATIO: f64 = 0.7;
const REPEATED_PHRASE_COUNT: usize = 3;

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?://|www\.)\S+|\b[a-z0-9-]+\.(?:com|net|org|io|ru|xyz)\b")
        .expect("link pattern compiles")
});

/// Overall tone of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    /// More positive than negative words.
    Positive,
    /// Balanced, or no sentiment words at all.
    Neutral,
    /// More negative than positive words.
    Negative,
}

/// Lexicon-based sentiment verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sentiment {
    /// Tone derived from `ratio`.
    pub sentiment: SentimentLabel,
    /// `|ratio|`, in `[0, 1]`.
    pub confidence: f64,
    /// `(positive - negative) / (positive + negative)`, in `[-1, 1]`.
    pub ratio: f64,
    /// Positive words found.
    pub positive_count: usize,
    /// Negative words found.
    pub negative_count: usize,
}

/// Heuristic that raised a text's spam score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpamSignal {
    /// A character repeated many times in a row.
    RepeatedCharacters,
    /// Contains URLs.
    Links,
    /// Mostly uppercase letters.
    ExcessiveCaps,
    /// The same phrase appears several times.
    RepeatedPhrases,
}

impl SpamSignal {
    fn weight(self) -> f64 {
        match self {
            SpamSignal::RepeatedCharacters => 0.25,
            SpamSignal::Links => 0.4,
            SpamSignal::ExcessiveCaps => 0.25,
            SpamSignal::RepeatedPhrases => 0.3,
        }
    }
}

/// Weighted spam verdict.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpamAssessment {
    /// Sum of the raised signal weights, capped at 1.
    pub score: f64,
    /// Signals that fired.
    pub signals: Vec<SpamSignal>,
    /// Whether the score crosses the spam threshold.
    pub is_spam: bool,
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Count lexicon hits and normalize the difference into a label and confidence.
pub fn analyze_sentiment(text: &str) -> Sentiment {
    let tokens = words(text);
    let positive_count = tokens
        .iter()
        .filter(|word| POSITIVE_WORDS.contains(&word.as_str()))
        .count();
    let negative_count = tokens
        .iter()
        .filter(|word| NEGATIVE_WORDS.contains(&word.as_str()))
        .count();

    let total = positive_count + negative_count;
    let ratio = if total == 0 {
        0.0
    } else {
        (positive_count as f64 - negative_count as f64) / total as f64
    };

    let sentiment = if ratio > SENTIMENT_THRESHOLD {
        SentimentLabel::Positive
    } else if ratio < -SENTIMENT_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    Sentiment {
        sentiment,
        confidence: ratio.abs(),
        ratio,
        positive_count,
        negative_count,
    }
}

fn has_repeated_characters(text: &str) -> bool {
    let mut previous = None;
    let mut run = 0;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        if Some(c) == previous {
            run += 1;
        } else {
            previous = Some(c);
            run = 1;
        }
        if run >= REPEATED_CHAR_RUN {
            return true;
        }
    }
    false
}

fn has_excessive_caps(text: &str) -> bool {
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() < CAPS_MIN_LETTERS {
        return false;
    }
    let upper = letters.iter().filter(|c| c.is_uppercase()).count();
    upper as f64 / letters.len() as f64 > CAPS_RATIO
}

fn has_repeated_phrases(text: &str) -> bool {
    let tokens = words(text);
    let mut bigrams: HashMap<(&str, &str), usize> = HashMap::new();
    for pair in tokens.windows(2) {
        let count = bigrams
            .entry((pair[0].as_str(), pair[1].as_str()))
            .or_default();
        *count += 1;
        if *count >= REPEATED_PHRASE_COUNT {
            return true;
        }
    }
    false
}

/// Sum the weights of the spam patterns found in `text`, capped at 1.
pub fn assess_spam(text: &str) -> SpamAssessment {
    let checks = [
        (SpamSignal::RepeatedCharacters, has_repeated_characters(text)),
        (SpamSignal::Links, LINK_PATTERN.is_match(text)),
        (SpamSignal::ExcessiveCaps, has_excessive_caps(text)),
        (SpamSignal::RepeatedPhrases, has_repeated_phrases(text)),
    ];

    let signals: Vec<SpamSignal> = checks
        .into_iter()
        .filter_map(|(signal, hit)| hit.then_some(signal))
        .collect();
    let score = signals
        .iter()
        .map(|signal| signal.weight())
        .sum::<f64>()
        .min(1.0);

    SpamAssessment {
        score,
        is_spam: score >= SPAM_THRESHOLD,
        signals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_text() {
        let result = analyze_sentiment("amazing game love it");
        assert_eq!(result.sentiment, SentimentLabel::Positive);
        assert!(result.confidence > 0.0);
        assert_eq!(result.positive_count, 2);
    }

    #[test]
    fn negative_text() {
        let result = analyze_sentiment("terrible awful boring");
        assert_eq!(result.sentiment, SentimentLabel::Negative);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.ratio, -1.0);
    }

    #[test]
    fn balanced_or_empty_text_is_neutral() {
        let mixed = analyze_sentiment("great art, boring story");
        assert_eq!(mixed.sentiment, SentimentLabel::Neutral);
        assert_eq!(mixed.confidence, 0.0);

        let empty = analyze_sentiment("");
        assert_eq!(empty.sentiment, SentimentLabel::Neutral);
        assert_eq!(empty.ratio, 0.0);
    }

    #[test]
    fn mild_majority_crosses_threshold() {
        // 2 positive vs 1 negative: ratio 1/3
        let result = analyze_sentiment("Great combat, great music, bad ending.");
        assert_eq!(result.sentiment, SentimentLabel::Positive);
        assert!((result.confidence - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn ordinary_review_is_not_spam() {
        let result = assess_spam("Tight controls and a lovely soundtrack. Worth it.");
        assert!(result.signals.is_empty());
        assert_eq!(result.score, 0.0);
        assert!(!result.is_spam);
    }

    #[test]
    fn links_with_shouting_are_spam() {
        let result = assess_spam("BUY CHEAP KEYS NOW AT HTTP://KEYS.EXAMPLE");
        assert!(result.signals.contains(&SpamSignal::Links));
        assert!(result.signals.contains(&SpamSignal::ExcessiveCaps));
        assert!(result.is_spam);
    }

    #[test]
    fn repeated_characters_and_phrases() {
        let result = assess_spam("sooooo good, free coins free coins free coins");
        assert_eq!(
            result.signals,
            vec![SpamSignal::RepeatedCharacters, SpamSignal::RepeatedPhrases]
        );
        assert!(result.is_spam);
    }

    #[test]
    fn score_is_capped() {
        let result = assess_spam("WOWWWWW VISIT WWW.SCAM.COM VISIT WWW.SCAM.COM VISIT WWW.SCAM.COM");
        assert_eq!(result.score, 1.0);
    }
}
