//! VADER-based sentiment labeling for news articles, boosted with a
//! crypto-market keyword lexicon that the general VADER dictionary
//! misses.

use crate::domain::types::NewsSentiment;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Compound-score threshold separating positive/negative labels from
/// neutral.
const LABEL_THRESHOLD: f64 = 0.3;

const BULLISH_KEYWORDS: &[(&str, f64)] = &[
    ("surge", 0.4),
    ("surges", 0.4),
    ("rally", 0.4),
    ("rallies", 0.4),
    ("soar", 0.5),
    ("soars", 0.5),
    ("skyrocket", 0.6),
    ("bullish", 0.5),
    ("bull run", 0.5),
    ("all-time high", 0.5),
    ("ath", 0.4),
    ("breakout", 0.3),
    ("adoption", 0.2),
    ("institutional", 0.2),
    ("partnership", 0.2),
    ("upgrade", 0.3),
    ("breakthrough", 0.4),
    ("record high", 0.4),
];

const BEARISH_KEYWORDS: &[(&str, f64)] = &[
    ("crash", -0.5),
    ("crashes", -0.5),
    ("plunge", -0.5),
    ("plunges", -0.5),
    ("dump", -0.4),
    ("bearish", -0.5),
    ("collapse", -0.5),
    ("lawsuit", -0.4),
    ("regulation", -0.2),
    ("ban", -0.4),
    ("hack", -0.5),
    ("hacked", -0.5),
    ("breach", -0.4),
    ("stolen", -0.5),
    ("scam", -0.6),
    ("fraud", -0.5),
    ("sell-off", -0.4),
    ("selloff", -0.4),
    ("panic", -0.4),
];

/// Keyword-to-tag table scanned over title + description.
const TAG_RULES: &[(&[&str], &str)] = &[
    (&["surge", "soar", "jump"], "Price Surge"),
    (&["drop", "fall", "crash"], "Price Drop"),
    (&["bullish", "optimistic"], "Bullish"),
    (&["bearish", "pessimistic"], "Bearish"),
    (&["regulation", "sec"], "Regulation"),
    (&["adoption", "institutional"], "Adoption"),
    (&["technology", "upgrade"], "Technology"),
    (&["market", "trading"], "Market"),
];

pub struct SentimentAnalyzer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    fn keyword_boost(&self, text: &str) -> f64 {
        let text_lower = text.to_lowercase();
        let mut boost = 0.0;

        for (keyword, score) in BULLISH_KEYWORDS {
            if text_lower.contains(keyword) {
                boost += score;
            }
        }
        for (keyword, score) in BEARISH_KEYWORDS {
            if text_lower.contains(keyword) {
                boost += score; // score is already negative
            }
        }

        boost
    }

    /// Score text in [-1, 1]: VADER compound plus half the keyword
    /// boost. Empty text is flat zero.
    pub fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let scores = self.analyzer.polarity_scores(text);
        let vader_score = scores["compound"];
        (vader_score + self.keyword_boost(text) * 0.5).clamp(-1.0, 1.0)
    }

    /// Score an article, title weighted 70% over description.
    pub fn score_article(&self, title: &str, description: &str) -> f64 {
        self.score(title) * 0.7 + self.score(description) * 0.3
    }

    pub fn label(&self, title: &str, description: &str) -> NewsSentiment {
        let score = self.score_article(title, description);
        if score > LABEL_THRESHOLD {
            NewsSentiment::Positive
        } else if score < -LABEL_THRESHOLD {
            NewsSentiment::Negative
        } else {
            NewsSentiment::Neutral
        }
    }

    /// Topical tags from a keyword scan over title and description.
    pub fn tags(&self, title: &str, description: &str) -> Vec<String> {
        let text = format!("{} {}", title, description).to_lowercase();
        TAG_RULES
            .iter()
            .filter(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
            .map(|(_, tag)| (*tag).to_string())
            .collect()
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
