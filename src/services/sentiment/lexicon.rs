//! Rule-based polarity scoring for headlines.

use std::collections::{HashMap, HashSet};

/// Scores the polarity of a piece of text.
///
/// Implementations must be read-only after construction so a single
/// instance can be shared across requests.
pub trait PolarityScorer: Send + Sync {
    /// Compound polarity in [-1, 1].
    fn compound(&self, text: &str) -> f64;
}

/// Added to (or removed from) a word's valence by a preceding booster.
const BOOSTER_INCREMENT: f64 = 0.293;
/// Valence multiplier when a negation precedes a word.
const NEGATION_SCALAR: f64 = -0.74;
/// Tokens looked back over for a negation.
const NEGATION_LOOKBACK: usize = 3;
/// Normalization constant for the compound score.
const NORMALIZATION_ALPHA: f64 = 15.0;

/// Financial news lexicon with negation and intensifier handling.
///
/// Word valences are on a -4..4 scale; the summed valence of a text is
/// squashed into [-1, 1] with `s / sqrt(s^2 + alpha)`.
pub struct LexiconAnalyzer {
    words: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
    boosters: HashMap<&'static str, f64>,
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconAnalyzer {
    pub fn new() -> Self {
        let positive: &[(&str, f64)] = &[
            ("bullish", 2.6),
            ("surge", 2.2),
            ("surges", 2.2),
            ("surged", 2.2),
            ("soar", 2.5),
            ("soars", 2.5),
            ("soared", 2.5),
            ("rally", 2.0),
            ("rallies", 2.0),
            ("rallied", 2.0),
            ("jump", 1.8),
            ("jumps", 1.8),
            ("jumped", 1.8),
            ("climb", 1.5),
            ("climbs", 1.5),
            ("rise", 1.4),
            ("rises", 1.4),
            ("rising", 1.4),
            ("gain", 1.6),
            ("gains", 1.6),
            ("gained", 1.6),
            ("up", 0.8),
            ("high", 1.0),
            ("higher", 1.3),
            ("record", 1.6),
            ("strong", 1.8),
            ("stronger", 1.9),
            ("boost", 1.7),
            ("boosts", 1.7),
            ("support", 1.2),
            ("supported", 1.2),
            ("rebound", 1.7),
            ("rebounds", 1.7),
            ("recovery", 1.6),
            ("recovers", 1.6),
            ("optimism", 2.0),
            ("optimistic", 2.1),
            ("demand", 0.9),
            ("breakout", 1.8),
            ("shine", 1.5),
            ("shines", 1.5),
            ("safe", 1.3),
            ("haven", 0.9),
            ("upbeat", 2.0),
            ("positive", 2.2),
            ("good", 1.9),
            ("best", 2.4),
            ("win", 2.4),
            ("beat", 1.4),
            ("outperform", 1.9),
            ("upgrade", 1.7),
        ];
        let negative: &[(&str, f64)] = &[
            ("bearish", -2.6),
            ("crash", -3.0),
            ("crashes", -3.0),
            ("plunge", -2.8),
            ("plunges", -2.8),
            ("plunged", -2.8),
            ("tumble", -2.4),
            ("tumbles", -2.4),
            ("slump", -2.3),
            ("slumps", -2.3),
            ("drop", -1.6),
            ("drops", -1.6),
            ("dropped", -1.6),
            ("fall", -1.5),
            ("falls", -1.5),
            ("fell", -1.5),
            ("slip", -1.2),
            ("slips", -1.2),
            ("slide", -1.5),
            ("slides", -1.5),
            ("decline", -1.6),
            ("declines", -1.6),
            ("loss", -1.8),
            ("losses", -1.8),
            ("lower", -1.1),
            ("down", -0.9),
            ("weak", -1.9),
            ("weaker", -1.9),
            ("weakens", -1.8),
            ("pressure", -1.2),
            ("selloff", -2.2),
            ("sell-off", -2.2),
            ("fear", -2.2),
            ("fears", -2.2),
            ("worry", -1.9),
            ("worries", -1.9),
            ("concern", -1.4),
            ("concerns", -1.4),
            ("risk", -1.1),
            ("uncertainty", -1.4),
            ("volatile", -1.0),
            ("crisis", -3.1),
            ("recession", -2.5),
            ("war", -2.9),
            ("turmoil", -2.6),
            ("negative", -2.7),
            ("bad", -2.5),
            ("worst", -3.1),
            ("downgrade", -1.7),
            ("outflow", -1.3),
            ("outflows", -1.3),
            ("hawkish", -1.0),
        ];

        let words = positive.iter().chain(negative).copied().collect();

        let negations = [
            "not", "no", "never", "neither", "nor", "none", "nothing", "cannot", "cant", "can't",
            "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "won't", "wont", "isn't",
            "isnt", "aren't", "arent", "wasn't", "wasnt", "without", "hardly", "barely",
        ]
        .into_iter()
        .collect();

        let boosters: HashMap<&'static str, f64> = [
            ("very", BOOSTER_INCREMENT),
            ("extremely", BOOSTER_INCREMENT),
            ("highly", BOOSTER_INCREMENT),
            ("sharply", BOOSTER_INCREMENT),
            ("significantly", BOOSTER_INCREMENT),
            ("strongly", BOOSTER_INCREMENT),
            ("massively", BOOSTER_INCREMENT),
            ("slightly", -BOOSTER_INCREMENT),
            ("marginally", -BOOSTER_INCREMENT),
            ("somewhat", -BOOSTER_INCREMENT),
            ("modestly", -BOOSTER_INCREMENT),
        ]
        .into_iter()
        .collect();

        Self {
            words,
            negations,
            boosters,
        }
    }

    /// Valence of a single lowercase token, if it is in the lexicon.
    pub fn valence(&self, word: &str) -> Option<f64> {
        self.words.get(word).copied()
    }

    /// Sum of adjusted word valences.
    pub fn raw_score(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut total = 0.0;

        for (i, token) in tokens.iter().enumerate() {
            let Some(mut valence) = self.valence(token) else {
                continue;
            };

            if let Some(prev) = i.checked_sub(1).map(|p| tokens[p].as_str()) {
                if let Some(&boost) = self.boosters.get(prev) {
                    valence += boost * valence.signum();
                }
            }

            let start = i.saturating_sub(NEGATION_LOOKBACK);
            if tokens[start..i].iter().any(|t| self.negations.contains(t.as_str())) {
                valence *= NEGATION_SCALAR;
            }

            total += valence;
        }
        total
    }
}

impl PolarityScorer for LexiconAnalyzer {
    fn compound(&self, text: &str) -> f64 {
        let score = self.raw_score(text);
        if score == 0.0 {
            return 0.0;
        }
        (score / (score * score + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
    }
}

/// Lowercase words with surrounding punctuation removed.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}
