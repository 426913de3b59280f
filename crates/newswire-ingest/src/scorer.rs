//! Lexicon polarity scorer for news headlines and summaries.

use newswire_core::Sentiment;

/// General news vocabulary weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("good", 0.35),
    ("great", 0.4),
    ("best", 0.5),
    ("better", 0.3),
    ("excellent", 0.5),
    ("positive", 0.3),
    ("success", 0.4),
    ("successful", 0.4),
    ("win", 0.4),
    ("wins", 0.4),
    ("won", 0.4),
    ("victory", 0.5),
    ("celebrate", 0.4),
    ("celebrates", 0.4),
    ("hope", 0.3),
    ("hopeful", 0.35),
    ("peace", 0.4),
    ("agreement", 0.2),
    ("deal", 0.15),
    ("growth", 0.3),
    ("recovery", 0.3),
    ("record", 0.15),
    ("rise", 0.1),
    ("boost", 0.3),
    ("boosts", 0.3),
    ("gain", 0.25),
    ("gains", 0.25),
    ("improve", 0.3),
    ("improves", 0.3),
    ("improved", 0.3),
    ("safe", 0.3),
    ("rescue", 0.3),
    ("rescued", 0.35),
    ("award", 0.35),
    ("breakthrough", 0.45),
    ("happy", 0.45),
    ("love", 0.5),
    ("welcome", 0.3),
    ("welcomes", 0.3),
    ("support", 0.2),
    ("strong", 0.25),
    ("launch", 0.1),
    ("new", 0.05),
    // Negative signals
    ("bad", -0.4),
    ("worse", -0.4),
    ("worst", -0.6),
    ("negative", -0.3),
    ("war", -0.5),
    ("attack", -0.5),
    ("attacks", -0.5),
    ("killed", -0.6),
    ("kills", -0.6),
    ("dead", -0.5),
    ("death", -0.5),
    ("deaths", -0.5),
    ("crisis", -0.5),
    ("crash", -0.5),
    ("disaster", -0.6),
    ("fear", -0.4),
    ("fears", -0.4),
    ("threat", -0.4),
    ("threatens", -0.4),
    ("fail", -0.4),
    ("failed", -0.4),
    ("failure", -0.4),
    ("loss", -0.35),
    ("losses", -0.35),
    ("fall", -0.15),
    ("falls", -0.15),
    ("decline", -0.25),
    ("protest", -0.2),
    ("protests", -0.2),
    ("violence", -0.6),
    ("injured", -0.4),
    ("arrested", -0.35),
    ("scandal", -0.5),
    ("fraud", -0.5),
    ("corruption", -0.5),
    ("lawsuit", -0.3),
    ("ban", -0.3),
    ("banned", -0.3),
    ("warning", -0.3),
    ("warns", -0.3),
    ("flood", -0.35),
    ("floods", -0.35),
    ("storm", -0.2),
    ("earthquake", -0.45),
    ("terror", -0.6),
    ("conflict", -0.4),
    ("recession", -0.45),
    ("inflation", -0.15),
    ("sad", -0.4),
    ("angry", -0.4),
];

/// Words that flip the polarity of the next scored word.
const NEGATORS: &[&str] = &["not", "no", "never", "without", "nor"];

/// Polarity multiplier applied to a negated word.
const NEGATION_FACTOR: f32 = -0.5;

/// Score a text string using the news lexicon.
///
/// Splits text into lowercase words, sums matching weights (a weight preceded
/// by a negator is multiplied by [`NEGATION_FACTOR`]), and clamps the result to
/// `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn lexicon_score(text: &str) -> f32 {
    let mut score = 0.0_f32;
    let mut negate_next = false;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic() && c != '\'')
            .trim_matches('\'')
            .to_lowercase();
        if w.is_empty() {
            continue;
        }
        if NEGATORS.contains(&w.as_str()) || w.ends_with("n't") {
            negate_next = true;
            continue;
        }
        if let Some(&(_, weight)) = LEXICON.iter().find(|(lex_word, _)| *lex_word == w) {
            score += if negate_next {
                weight * NEGATION_FACTOR
            } else {
                weight
            };
        }
        negate_next = false;
    }
    score.clamp(-1.0, 1.0)
}

/// Map a polarity score onto a label by its sign.
///
/// Non-finite scores map to [`Sentiment::Unknown`].
#[must_use]
pub fn classify_score(score: f32) -> Sentiment {
    if !score.is_finite() {
        Sentiment::Unknown
    } else if score > 0.0 {
        Sentiment::Positive
    } else if score < 0.0 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Label the overall polarity of `text`. Never fails.
#[must_use]
pub fn analyze_sentiment(text: &str) -> Sentiment {
    classify_score(lexicon_score(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_scores_zero_and_is_neutral() {
        assert_eq!(lexicon_score(""), 0.0);
        assert_eq!(analyze_sentiment(""), Sentiment::Neutral);
    }

    #[test]
    fn unknown_text_is_neutral() {
        assert_eq!(analyze_sentiment("the quick brown fox"), Sentiment::Neutral);
    }

    #[test]
    fn positive_keyword_is_positive() {
        assert_eq!(
            analyze_sentiment("Team celebrates great victory"),
            Sentiment::Positive
        );
    }

    #[test]
    fn negative_keyword_is_negative() {
        assert_eq!(
            analyze_sentiment("Earthquake leaves dozens injured"),
            Sentiment::Negative
        );
    }

    #[test]
    fn negation_flips_polarity() {
        assert!(lexicon_score("good") > 0.0);
        assert!(lexicon_score("not good") < 0.0);
        assert!(lexicon_score("isn't good") < 0.0);
    }

    #[test]
    fn negator_only_applies_to_next_word() {
        // "no" negates "fear"; "win" stays positive.
        let score = lexicon_score("no fear, big win");
        assert!(score > 0.0, "expected positive score, got {score}");
    }

    #[test]
    fn punctuation_stripped_from_words() {
        assert!(lexicon_score("Victory!") > 0.0);
        assert!(lexicon_score("(disaster)") < 0.0);
    }

    #[test]
    fn score_clamps_to_unit_range() {
        let positive = "great excellent best love victory breakthrough happy success";
        assert_eq!(lexicon_score(positive), 1.0);
        let negative = "war terror disaster killed violence worst scandal fraud";
        assert_eq!(lexicon_score(negative), -1.0);
    }

    #[test]
    fn classify_follows_sign() {
        assert_eq!(classify_score(0.2), Sentiment::Positive);
        assert_eq!(classify_score(-0.01), Sentiment::Negative);
        assert_eq!(classify_score(0.0), Sentiment::Neutral);
        assert_eq!(classify_score(f32::NAN), Sentiment::Unknown);
        assert_eq!(classify_score(f32::INFINITY), Sentiment::Unknown);
    }
}
