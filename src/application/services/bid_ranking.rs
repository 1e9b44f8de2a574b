//! # Bid Ranking
//!
//! Scores and orders the bids on a load.
//!
//! The [`RankingStrategy`] trait is the seam; [`WeightedScoreStrategy`] is
//! the production strategy:
//!
//! ```text
//! score = (1 / proposed_rate) * rate_weight + (rating / 5.0) * rating_weight
//! ```
//!
//! with weights 0.7 and 0.3 by default. Every bid on the load is ranked,
//! whatever its status.

use crate::application::error::ApplicationResult;
use crate::domain::entities::Bid;
use crate::domain::value_objects::{LoadId, Rating, TransporterId};
use crate::infrastructure::persistence::{BidFilter, FreightStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// A bid together with the transporter data its score depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct BidCandidate {
    /// The bid.
    pub bid: Bid,
    /// Bidding transporter's company name.
    pub company_name: String,
    /// Bidding transporter's rating.
    pub rating: Rating,
}

/// A bid with its ranking information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedBid {
    /// The bid being ranked.
    pub bid: Bid,
    /// Bidding transporter's company name.
    pub company_name: String,
    /// Bidding transporter's rating.
    pub rating: Rating,
    /// The rank (1 = best).
    pub rank: usize,
    /// The score used for ranking (higher = better).
    pub score: f64,
}

impl fmt::Display for RankedBid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RankedBid(#{} score={:.4} bid={})",
            self.rank, self.score, self.bid
        )
    }
}

/// Trait for ranking strategies.
pub trait RankingStrategy: Send + Sync + fmt::Debug {
    /// Ranks candidates best first. Ties keep their input order.
    fn rank(&self, candidates: &[BidCandidate]) -> Vec<RankedBid>;

    /// Returns the name of this ranking strategy.
    fn name(&self) -> &'static str;
}

/// Weighted blend of cheapness and transporter rating.
///
/// # Examples
///
/// ```
/// use freight_exchange::application::services::bid_ranking::WeightedScoreStrategy;
///
/// let strategy = WeightedScoreStrategy::default();
/// let score = strategy.score(500.0, 4.0).unwrap();
/// assert!((score - 0.2414).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedScoreStrategy {
    /// Weight for the inverse-rate factor.
    pub rate_weight: f64,
    /// Weight for the normalised rating factor.
    pub rating_weight: f64,
}

impl Default for WeightedScoreStrategy {
    fn default() -> Self {
        Self {
            rate_weight: 0.7,
            rating_weight: 0.3,
        }
    }
}

impl WeightedScoreStrategy {
    /// Creates a strategy with custom weights.
    #[must_use]
    pub fn new(rate_weight: f64, rating_weight: f64) -> Self {
        Self {
            rate_weight,
            rating_weight,
        }
    }

    /// Scores one bid. Returns `None` for a rate that is not a positive
    /// finite number.
    #[must_use]
    pub fn score(&self, rate: f64, rating: f64) -> Option<f64> {
        if !rate.is_finite() || rate <= 0.0 {
            return None;
        }
        Some((1.0 / rate) * self.rate_weight + (rating / Rating::MAX) * self.rating_weight)
    }
}

impl RankingStrategy for WeightedScoreStrategy {
    fn rank(&self, candidates: &[BidCandidate]) -> Vec<RankedBid> {
        let mut scored: Vec<(usize, f64)> = candidates
            .iter()
            .enumerate()
            .filter_map(|(i, c)| {
                let rate = c.bid.proposed_rate().to_f64();
                match self.score(rate, c.rating.get()) {
                    Some(score) => Some((i, score)),
                    None => {
                        warn!(bid_id = %c.bid.id(), rate, "bid with non-positive rate left unranked");
                        None
                    }
                }
            })
            .collect();

        // Stable sort, descending
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .enumerate()
            .filter_map(|(rank, (idx, score))| {
                candidates.get(idx).map(|c| RankedBid {
                    bid: c.bid.clone(),
                    company_name: c.company_name.clone(),
                    rating: c.rating,
                    rank: rank + 1,
                    score,
                })
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "WeightedScore"
    }
}

/// Ranks the bids on a load.
#[derive(Debug, Clone)]
pub struct BidRanking {
    store: Arc<dyn FreightStore>,
    strategy: Arc<dyn RankingStrategy>,
}

impl BidRanking {
    /// Creates the ranking service with a strategy.
    #[must_use]
    pub fn new(store: Arc<dyn FreightStore>, strategy: Arc<dyn RankingStrategy>) -> Self {
        Self { store, strategy }
    }

    /// Returns the active strategy's name.
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Ranks every bid on a load, best first.
    ///
    /// An unknown load, or one without bids, yields an empty list. Bids whose
    /// transporter no longer exists are skipped.
    ///
    /// # Errors
    ///
    /// Returns `Unexpected` on a storage failure.
    #[instrument(skip(self), fields(strategy = self.strategy.name()))]
    pub async fn rank_bids(&self, load_id: LoadId) -> ApplicationResult<Vec<RankedBid>> {
        let bids = self.store.find_bids(&BidFilter::for_load(load_id)).await?;

        let mut transporters: HashMap<TransporterId, Option<(String, Rating)>> = HashMap::new();
        let mut candidates = Vec::with_capacity(bids.len());
        for bid in bids {
            let transporter_id = bid.transporter_id();
            if !transporters.contains_key(&transporter_id) {
                let found = self
                    .store
                    .get_transporter(&transporter_id)
                    .await?
                    .map(|t| (t.company_name().to_string(), t.rating()));
                transporters.insert(transporter_id, found);
            }
            match transporters.get(&transporter_id) {
                Some(Some((company_name, rating))) => candidates.push(BidCandidate {
                    bid,
                    company_name: company_name.clone(),
                    rating: *rating,
                }),
                _ => warn!(bid_id = %bid.id(), %transporter_id, "bid references unknown transporter"),
            }
        }

        let ranked = self.strategy.rank(&candidates);
        debug!(bids = ranked.len(), "bids ranked");
        Ok(ranked)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::application::services::FreightServices;
    use crate::application::services::fixtures::{post_load, register, submit};
    use crate::domain::value_objects::Rate;

    const EPS: f64 = 1e-12;

    fn candidate(rate: f64, rating: f64) -> BidCandidate {
        BidCandidate {
            bid: Bid::new(
                LoadId::new_v4(),
                TransporterId::new_v4(),
                Rate::from_f64(rate).unwrap(),
                1,
            )
            .unwrap(),
            company_name: format!("carrier-{rate}"),
            rating: Rating::new(rating).unwrap(),
        }
    }

    mod strategy {
        use super::*;

        #[test]
        fn default_weights() {
            let strategy = WeightedScoreStrategy::default();
            assert!((strategy.rate_weight - 0.7).abs() < f64::EPSILON);
            assert!((strategy.rating_weight - 0.3).abs() < f64::EPSILON);
            assert_eq!(strategy.name(), "WeightedScore");
        }

        #[test]
        fn exact_scores_and_order() {
            let strategy = WeightedScoreStrategy::default();
            let candidates = vec![
                candidate(500.0, 4.0),
                candidate(600.0, 5.0),
                candidate(400.0, 3.0),
            ];
            let ranked = strategy.rank(&candidates);

            assert_eq!(ranked.len(), 3);
            assert_eq!(ranked[0].bid.id(), candidates[1].bid.id());
            assert!((ranked[0].score - (0.7 / 600.0 + 0.3)).abs() < EPS);
            assert!((ranked[0].score - 0.301_166_666_666_666_7).abs() < EPS);

            assert_eq!(ranked[1].bid.id(), candidates[0].bid.id());
            assert!((ranked[1].score - 0.2414).abs() < EPS);

            assert_eq!(ranked[2].bid.id(), candidates[2].bid.id());
            assert!((ranked[2].score - 0.18175).abs() < EPS);

            assert_eq!(ranked[0].rank, 1);
            assert_eq!(ranked[2].rank, 3);
        }

        #[test]
        fn ties_keep_input_order() {
            let strategy = WeightedScoreStrategy::default();
            let candidates = vec![candidate(250.0, 2.0), candidate(250.0, 2.0)];
            let ranked = strategy.rank(&candidates);
            assert_eq!(ranked[0].bid.id(), candidates[0].bid.id());
            assert_eq!(ranked[1].bid.id(), candidates[1].bid.id());
        }

        #[test]
        fn non_positive_rate_has_no_score() {
            let strategy = WeightedScoreStrategy::default();
            assert!(strategy.score(0.0, 5.0).is_none());
            assert!(strategy.score(-10.0, 5.0).is_none());
            assert!(strategy.score(f64::NAN, 5.0).is_none());
        }

        #[test]
        fn custom_weights() {
            let strategy = WeightedScoreStrategy::new(0.0, 1.0);
            let ranked = strategy.rank(&[candidate(10.0, 1.0), candidate(1000.0, 5.0)]);
            assert!((ranked[0].score - 1.0).abs() < EPS);
        }

        #[test]
        fn empty_input() {
            assert!(WeightedScoreStrategy::default().rank(&[]).is_empty());
        }
    }

    mod service {
        use super::*;

        #[tokio::test]
        async fn ranks_bids_of_every_status() {
            let services = FreightServices::in_memory();
            let load = post_load(&services, "LARGE", 10).await;
            let a = register(&services, 4.0, &[("LARGE", 20)]).await;
            let b = register(&services, 5.0, &[("LARGE", 20)]).await;
            let c = register(&services, 3.0, &[("LARGE", 20)]).await;
            let bid_a = submit(&services, load.id(), a.id(), 500.0, 1).await.unwrap();
            let bid_b = submit(&services, load.id(), b.id(), 600.0, 1).await.unwrap();
            let bid_c = submit(&services, load.id(), c.id(), 400.0, 1).await.unwrap();
            services.bids.reject_bid(bid_b.id()).await.unwrap();

            let ranked = services.ranking.rank_bids(load.id()).await.unwrap();
            let order: Vec<_> = ranked.iter().map(|r| r.bid.id()).collect();
            assert_eq!(order, vec![bid_b.id(), bid_a.id(), bid_c.id()]);
            assert_eq!(ranked[0].company_name, b.company_name());
        }

        #[tokio::test]
        async fn unknown_load_ranks_nothing() {
            let services = FreightServices::in_memory();
            let ranked = services.ranking.rank_bids(LoadId::new_v4()).await.unwrap();
            assert!(ranked.is_empty());
        }
    }
}
