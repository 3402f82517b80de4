// File: src/scoring.rs
use crate::core::model::TrainedModel;
use crate::core::tokenizer::term_counts;
use crate::core::types::{CategoryId, TermCounts};
use serde::Serialize;

/// Result of classifying one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Highest-scoring category. Ties go to the lowest category id.
    pub category: CategoryId,
    /// Log-posterior per category, indexed by category id. Only comparable
    /// to each other, never normalized back to probabilities.
    pub scores: Vec<f64>,
}

impl Prediction {
    pub fn score(&self, category: CategoryId) -> Option<f64> {
        self.scores.get(category).copied()
    }

    /// Categories by descending score; equal scores keep id order.
    pub fn ranked(&self) -> Vec<(CategoryId, f64)> {
        let mut ranked: Vec<(CategoryId, f64)> = self.scores.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

impl TrainedModel {
    /// Classifies raw text.
    pub fn predict(&self, document: &str) -> Prediction {
        self.predict_counts(&term_counts(document))
    }

    pub fn predict_batch<S: AsRef<str>>(&self, documents: &[S]) -> Vec<Prediction> {
        documents.iter().map(|d| self.predict(d.as_ref())).collect()
    }

    /// Scores already-tokenized term counts.
    ///
    /// Each distinct query term in the vocabulary adds
    /// `ln((count(c, t) + 1) / (total(c) + |V|))` to every category; terms
    /// outside the vocabulary are skipped. Query repeat counts are ignored.
    pub fn predict_counts(&self, query: &TermCounts) -> Prediction {
        let freq = self.frequencies();
        let ids = self.categories().ids();
        let denominators: Vec<f64> = ids.clone().map(|c| freq.denominator(c)).collect();

        let mut scores = self.priors().to_vec();
        for term in query.keys().filter(|t| freq.in_vocabulary(t)) {
            for c in ids.clone() {
                let numerator = freq.count(c, term) + 1.0;
                scores[c] += (numerator / denominators[c]).ln();
            }
        }

        Prediction { category: arg_max(&scores), scores }
    }
}

/// First index holding the maximum.
fn arg_max(scores: &[f64]) -> CategoryId {
    let mut best = 0;
    for (id, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = id;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CategorySet;
    use crate::learning::LearningEngine;

    fn sport_weather() -> TrainedModel {
        let cats = CategorySet::new(["sport", "weather"]).unwrap();
        let docs = ["the game was great", "great game tonight", "rain today", "great rain expected"];
        LearningEngine::new().train(&cats, &docs, &[0, 0, 1, 1]).unwrap()
    }

    #[test]
    fn overlapping_words_pick_sport() {
        let model = sport_weather();
        let prediction = model.predict("great game");
        assert_eq!(prediction.category, 0);
        assert!(prediction.scores[0] > prediction.scores[1]);
    }

    #[test]
    fn scores_follow_smoothed_formula() {
        let model = sport_weather();
        // |V| = 6, sport total = 5, weather total = 5.
        let prediction = model.predict("great game");
        let sport = 0.5f64.ln() + (3.0f64 / 11.0).ln() + (3.0f64 / 11.0).ln();
        let weather = 0.5f64.ln() + (2.0f64 / 11.0).ln() + (1.0f64 / 11.0).ln();
        assert!((prediction.scores[0] - sport).abs() < 1e-12);
        assert!((prediction.scores[1] - weather).abs() < 1e-12);
    }

    #[test]
    fn vocabulary_term_missing_from_category_is_smoothed() {
        let model = sport_weather();
        let prediction = model.predict("tonight");
        let expected = 0.5f64.ln() + (1.0f64 / 11.0).ln();
        assert!(prediction.scores[1].is_finite());
        assert!((prediction.scores[1] - expected).abs() < 1e-12);
    }

    #[test]
    fn unseen_words_do_not_move_scores() {
        let model = sport_weather();
        let plain = model.predict("great rain");
        let noisy = model.predict("great rain zeppelin quasar");
        assert_eq!(plain, noisy);
    }

    #[test]
    fn empty_query_scores_priors() {
        let model = sport_weather();
        let prediction = model.predict("the and of");
        assert_eq!(prediction.scores, model.priors().to_vec());
        // Equal priors: first declared category wins.
        assert_eq!(prediction.category, 0);
    }

    #[test]
    fn ties_break_to_lowest_id() {
        assert_eq!(arg_max(&[-2.0, -1.0, -1.0]), 1);
        assert_eq!(arg_max(&[-3.0, -3.0]), 0);
    }

    #[test]
    fn prediction_is_repeatable() {
        let model = sport_weather();
        let text = "great rain tonight, expected game";
        assert_eq!(model.predict(text), model.predict(text));
    }

    #[test]
    fn ranked_orders_by_descending_score() {
        let prediction = Prediction { category: 2, scores: vec![-5.0, -7.0, -1.0] };
        assert_eq!(prediction.ranked(), vec![(2, -1.0), (0, -5.0), (1, -7.0)]);
        assert_eq!(prediction.score(1), Some(-7.0));
    }

    #[test]
    fn shared_model_predicts_concurrently() {
        let model = sport_weather();
        let expected = model.predict("rain expected");
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| model.predict("rain expected")))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
