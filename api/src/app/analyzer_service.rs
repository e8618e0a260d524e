//! R4R analyzer service
//!
//! Transforms a user's raw review history into a reciprocity/risk
//! assessment: reviews are grouped by unordered counterpart pair, paired
//! across directions, and scored into a bounded composite with risk tiers.
//! Results are memoized in a bounded TTL cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use crate::app::analyzer_config::{
    ANALYSIS_CACHE_TTL_SECS, CACHE_MAX_ENTRIES, CONNECTION_PAIR_CAP, CONNECTION_PAIR_WEIGHT,
    CONNECTION_QUICK_WEIGHT, HIGH_R4R_REVIEWER_THRESHOLD, MAX_COUNTERPART_SCANS, MAX_NETWORK_USERKEYS,
    MAX_SCORE, QUICK_BONUS_WEIGHT, RECIPROCAL_PERCENTAGE_WEIGHT, SUMMARY_CACHE_TTL_SECS,
};
use crate::app::cache::TtlCache;
use crate::domain::entities::{
    CrossConnection, HighR4rReviewer, NetworkAnalysis, NetworkConnection, R4rAnalysis, R4rSummary,
    Review, ReviewPair, ReviewSummary, RiskLevel,
};
use crate::domain::ports::EthosClient;
use crate::error::{AnalysisError, AppError, EthosError};

/// Composite r4r score from the reciprocity metrics.
///
/// Monotone in the reciprocal percentage and in the quick count (holding the
/// pair count fixed), bounded to [0, 100].
pub fn composite_score(reciprocal_percentage: f64, quick_count: usize, reciprocal_count: usize) -> f64 {
    let quick_fraction = quick_count as f64 / reciprocal_count.max(1) as f64;
    (reciprocal_percentage * RECIPROCAL_PERCENTAGE_WEIGHT + quick_fraction * QUICK_BONUS_WEIGHT)
        .min(MAX_SCORE)
}

/// Suspicious score for a single counterpart connection.
///
/// One slow pair lands at 30, a single quick pair at 70, and repeated quick
/// reciprocation saturates at 100.
pub fn connection_score(pair_count: usize, quick_count: usize) -> f64 {
    let frequency = (pair_count as f64 * CONNECTION_PAIR_WEIGHT).min(CONNECTION_PAIR_CAP);
    let quick_fraction = quick_count as f64 / pair_count.max(1) as f64;
    (frequency + quick_fraction * CONNECTION_QUICK_WEIGHT).min(MAX_SCORE)
}

/// Reciprocity metrics for one subject's review history
#[derive(Debug, Clone)]
struct ReviewStats {
    total_given: usize,
    total_received: usize,
    reciprocal: usize,
    quick: usize,
    reciprocal_percentage: f64,
    positive_percentage: f64,
    r4r_score: f64,
    pairs: Vec<ReviewPair>,
}

/// Pair the subject's reviews and compute the reciprocity metrics.
///
/// Reviews are bucketed by counterpart (O(n) map, not nested scans); within
/// a bucket the i-th given review pairs with the i-th received review after
/// sorting by timestamp, so no review ever counts toward two pairs.
fn compute_stats(userkey: &str, given: &[Review], received: &[Review]) -> ReviewStats {
    let mut buckets: HashMap<&str, (Vec<&Review>, Vec<&Review>)> = HashMap::new();
    for g in given {
        // Self-reviews carry no reciprocity signal.
        if g.author == g.subject {
            continue;
        }
        let Some(counterpart) = g.counterpart_of(userkey) else {
            continue;
        };
        buckets.entry(counterpart).or_default().0.push(g);
    }
    for r in received {
        if r.author == r.subject {
            continue;
        }
        let Some(counterpart) = r.counterpart_of(userkey) else {
            continue;
        };
        buckets.entry(counterpart).or_default().1.push(r);
    }

    let mut pairs = Vec::new();
    for (counterpart, (mut out, mut inc)) in buckets {
        out.sort_by_key(|r| r.created_at);
        inc.sort_by_key(|r| r.created_at);
        for (g, r) in out.iter().zip(inc.iter()) {
            pairs.push(ReviewPair::new(
                counterpart.to_string(),
                (*g).clone(),
                (*r).clone(),
            ));
        }
    }

    let total_given = given.len();
    let total_received = received.len();
    let reciprocal = pairs.len();
    let quick = pairs.iter().filter(|p| p.is_quick()).count();

    let denominator = total_given.max(total_received).max(1);
    let reciprocal_percentage =
        (reciprocal as f64 * 100.0 / denominator as f64).min(100.0);

    let positive = received.iter().filter(|r| r.is_positive()).count();
    let positive_percentage = if total_received > 0 {
        (positive as f64 * 100.0 / total_received as f64).round()
    } else {
        0.0
    };

    let r4r_score = composite_score(reciprocal_percentage, quick, reciprocal);

    ReviewStats {
        total_given,
        total_received,
        reciprocal,
        quick,
        reciprocal_percentage,
        positive_percentage,
        r4r_score,
        pairs,
    }
}

/// Service computing and caching R4R assessments
pub struct R4rAnalyzerService<C>
where
    C: EthosClient + 'static,
{
    ethos: Arc<C>,
    analysis_cache: TtlCache<R4rAnalysis>,
    review_summary_cache: TtlCache<ReviewSummary>,
}

impl<C> R4rAnalyzerService<C>
where
    C: EthosClient + 'static,
{
    pub fn new(ethos: Arc<C>) -> Self {
        Self {
            ethos,
            analysis_cache: TtlCache::new(
                Duration::from_secs(ANALYSIS_CACHE_TTL_SECS),
                CACHE_MAX_ENTRIES,
            ),
            review_summary_cache: TtlCache::new(
                Duration::from_secs(SUMMARY_CACHE_TTL_SECS),
                CACHE_MAX_ENTRIES,
            ),
        }
    }

    /// Full reciprocity/risk assessment for one user.
    ///
    /// Served from the cache within the TTL window; otherwise fetches both
    /// review directions concurrently, computes the assessment, scans the
    /// top counterparts one level deep, and caches the result. Nothing is
    /// cached on failure.
    pub async fn analyze_user(&self, userkey: &str) -> Result<R4rAnalysis, AppError> {
        if let Some(hit) = self.analysis_cache.get(userkey) {
            tracing::debug!(userkey, "analysis cache hit");
            return Ok(hit);
        }

        let (given, received) = tokio::try_join!(
            self.ethos.fetch_reviews_given(userkey),
            self.ethos.fetch_reviews_received(userkey),
        )?;

        if given.is_empty() && received.is_empty() {
            return Err(AnalysisError::InsufficientData(userkey.to_string()).into());
        }

        let stats = compute_stats(userkey, &given, &received);
        let mut connections = build_connections(&stats.pairs);

        // Display enrichment is best-effort and must never block the analysis.
        let profile = match self.ethos.fetch_profile(userkey).await {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(userkey, error = %e, "profile lookup failed, continuing");
                None
            }
        };

        let high_r4r_reviewers = self
            .scan_counterparts(userkey, &mut connections)
            .await;

        let analysis = R4rAnalysis {
            userkey: userkey.to_string(),
            display_name: profile.as_ref().and_then(|p| p.display_name.clone()),
            avatar_url: profile.as_ref().and_then(|p| p.avatar_url.clone()),
            total_reviews_given: stats.total_given,
            total_reviews_received: stats.total_received,
            reciprocal_reviews: stats.reciprocal,
            quick_reciprocal_count: stats.quick,
            reciprocal_percentage: stats.reciprocal_percentage,
            positive_percentage: stats.positive_percentage,
            r4r_score: stats.r4r_score,
            risk_level: RiskLevel::from_score(stats.r4r_score),
            network_connections: connections,
            high_r4r_reviewers,
        };

        self.analysis_cache.put(userkey, analysis.clone());
        tracing::info!(
            userkey,
            r4r_score = analysis.r4r_score,
            risk_level = %analysis.risk_level,
            reciprocal_reviews = analysis.reciprocal_reviews,
            cached_analyses = self.analysis_cache.len(),
            "analysis computed"
        );
        Ok(analysis)
    }

    /// Lightweight projection of the (cached) full analysis.
    ///
    /// A user with no review data gets a neutral all-zero summary rather
    /// than an error; upstream failures still propagate.
    pub async fn summarize_user(&self, userkey: &str) -> Result<R4rSummary, AppError> {
        match self.analyze_user(userkey).await {
            Ok(analysis) => Ok(R4rSummary::from(&analysis)),
            Err(AppError::Analysis(AnalysisError::InsufficientData(_))) => {
                Ok(R4rSummary::empty())
            }
            Err(e) => Err(e),
        }
    }

    /// Sentiment-only summary over received reviews, on its own short cache.
    pub async fn review_summary(&self, userkey: &str) -> Result<ReviewSummary, AppError> {
        if let Some(hit) = self.review_summary_cache.get(userkey) {
            tracing::debug!(userkey, "review summary cache hit");
            return Ok(hit);
        }

        let received = self.ethos.fetch_reviews_received(userkey).await?;
        let total_reviews = received.len();
        let positive = received.iter().filter(|r| r.is_positive()).count();
        let positive_percentage = if total_reviews > 0 {
            (positive as f64 * 100.0 / total_reviews as f64).round()
        } else {
            0.0
        };

        let summary = ReviewSummary {
            total_reviews,
            positive_percentage,
        };
        self.review_summary_cache.put(userkey, summary.clone());
        Ok(summary)
    }

    /// Batch analysis of up to [`MAX_NETWORK_USERKEYS`] users plus the
    /// reciprocal links discovered between them.
    ///
    /// Per-user fetches fan out concurrently. Users with insufficient data
    /// are skipped; an upstream failure fails the whole batch.
    pub async fn network_analysis(
        self: Arc<Self>,
        userkeys: Vec<String>,
    ) -> Result<NetworkAnalysis, AppError> {
        if userkeys.is_empty() {
            return Err(AnalysisError::Validation(
                "userkeys must not be empty".to_string(),
            )
            .into());
        }
        if userkeys.len() > MAX_NETWORK_USERKEYS {
            return Err(AnalysisError::Validation(format!(
                "at most {} userkeys per request (got {})",
                MAX_NETWORK_USERKEYS,
                userkeys.len()
            ))
            .into());
        }

        let mut join_set = JoinSet::new();
        for userkey in userkeys.iter().cloned() {
            let service = Arc::clone(&self);
            join_set.spawn(async move {
                let result = service.analyze_user(&userkey).await;
                (userkey, result)
            });
        }

        let mut by_userkey = HashMap::new();
        while let Some(joined) = join_set.join_next().await {
            let (userkey, result) = joined
                .map_err(|e| AppError::Internal(format!("analysis task panicked: {}", e)))?;
            match result {
                Ok(analysis) => {
                    by_userkey.insert(userkey, analysis);
                }
                Err(AppError::Analysis(AnalysisError::InsufficientData(_))) => {
                    tracing::debug!(%userkey, "skipping user with insufficient data");
                }
                Err(e) => return Err(e),
            }
        }

        // Preserve request order for the response.
        let analyses: Vec<R4rAnalysis> = userkeys
            .iter()
            .filter_map(|k| by_userkey.remove(k))
            .collect();

        let cross_connections = find_cross_connections(&analyses);
        let network_suspicious_score = if cross_connections.is_empty() {
            0.0
        } else {
            cross_connections
                .iter()
                .map(|c| c.suspicious_score)
                .sum::<f64>()
                / cross_connections.len() as f64
        };

        Ok(NetworkAnalysis {
            analyses,
            cross_connections,
            network_suspicious_score,
        })
    }

    /// Scan the strongest connections one level deep (never recursively):
    /// fetch each counterpart's own review history, score it with the same
    /// pairing logic, and collect those at or above the high-R4R threshold.
    /// Also backfills connection display names from the fetched profiles.
    /// Failures skip the counterpart; the list is best-effort.
    async fn scan_counterparts(
        &self,
        userkey: &str,
        connections: &mut [NetworkConnection],
    ) -> Vec<HighR4rReviewer> {
        let targets: Vec<String> = connections
            .iter()
            .take(MAX_COUNTERPART_SCANS)
            .map(|c| c.userkey.clone())
            .collect();

        let mut join_set = JoinSet::new();
        for counterpart in targets.iter().cloned() {
            let ethos = Arc::clone(&self.ethos);
            join_set.spawn(async move {
                let result: Result<_, EthosError> = async {
                    let (given, received) = tokio::try_join!(
                        ethos.fetch_reviews_given(&counterpart),
                        ethos.fetch_reviews_received(&counterpart),
                    )?;
                    let profile = ethos.fetch_profile(&counterpart).await.unwrap_or(None);
                    Ok((given, received, profile))
                }
                .await;
                (counterpart, result)
            });
        }

        let mut scanned = HashMap::new();
        while let Some(joined) = join_set.join_next().await {
            let Ok((counterpart, result)) = joined else {
                continue;
            };
            match result {
                Ok(data) => {
                    scanned.insert(counterpart, data);
                }
                Err(e) => {
                    tracing::debug!(
                        userkey,
                        %counterpart,
                        error = %e,
                        "counterpart scan failed, skipping"
                    );
                }
            }
        }

        let mut reviewers = Vec::new();
        for counterpart in &targets {
            let Some((given, received, profile)) = scanned.remove(counterpart) else {
                continue;
            };
            let display_name = profile.and_then(|p| p.display_name);
            if let Some(conn) = connections.iter_mut().find(|c| &c.userkey == counterpart) {
                conn.display_name = display_name.clone();
            }

            let stats = compute_stats(counterpart, &given, &received);
            if stats.r4r_score >= HIGH_R4R_REVIEWER_THRESHOLD {
                reviewers.push(HighR4rReviewer {
                    userkey: counterpart.clone(),
                    display_name,
                    r4r_score: stats.r4r_score,
                    risk_level: RiskLevel::from_score(stats.r4r_score),
                });
            }
        }
        reviewers
    }
}

/// One connection per counterpart with reciprocal activity, strongest first.
fn build_connections(pairs: &[ReviewPair]) -> Vec<NetworkConnection> {
    let mut per_counterpart: HashMap<&str, (usize, usize)> = HashMap::new();
    for pair in pairs {
        let entry = per_counterpart.entry(pair.counterpart.as_str()).or_default();
        entry.0 += 1;
        if pair.is_quick() {
            entry.1 += 1;
        }
    }

    let mut connections: Vec<NetworkConnection> = per_counterpart
        .into_iter()
        .map(|(userkey, (reciprocal_count, quick_reciprocal_count))| NetworkConnection {
            userkey: userkey.to_string(),
            display_name: None,
            reciprocal_count,
            quick_reciprocal_count,
            suspicious_score: connection_score(reciprocal_count, quick_reciprocal_count),
        })
        .collect();

    connections.sort_by(|a, b| {
        b.suspicious_score
            .partial_cmp(&a.suspicious_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.userkey.cmp(&b.userkey))
    });
    connections
}

/// Reciprocal links between every pair of analyzed users.
fn find_cross_connections(analyses: &[R4rAnalysis]) -> Vec<CrossConnection> {
    let mut cross = Vec::new();
    for i in 0..analyses.len() {
        for j in (i + 1)..analyses.len() {
            let a1 = &analyses[i];
            let a2 = &analyses[j];
            let c12 = a1
                .network_connections
                .iter()
                .find(|c| c.userkey == a2.userkey)
                .cloned();
            let c21 = a2
                .network_connections
                .iter()
                .find(|c| c.userkey == a1.userkey)
                .cloned();

            if c12.is_some() || c21.is_some() {
                let suspicious_score = c12
                    .as_ref()
                    .map(|c| c.suspicious_score)
                    .unwrap_or(0.0)
                    .max(c21.as_ref().map(|c| c.suspicious_score).unwrap_or(0.0));
                cross.push(CrossConnection {
                    user1: a1.userkey.clone(),
                    user2: a2.userkey.clone(),
                    is_mutual: c12.is_some() && c21.is_some(),
                    connection1to2: c12,
                    connection2to1: c21,
                    suspicious_score,
                });
            }
        }
    }
    cross
}
