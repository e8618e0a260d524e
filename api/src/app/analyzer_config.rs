//! Analyzer policy constants
//!
//! Tunable weights and thresholds for the R4R scoring model. The score must
//! stay in [0, 100] and increase monotonically with reciprocal percentage
//! and with the quick-reciprocal fraction; the exact coefficients are policy,
//! not contract.

/// A reciprocal pair answered within this many minutes counts as "quick"
pub const QUICK_RECIPROCAL_WINDOW_MINUTES: i64 = 30;

/// Weight of the reciprocal percentage in the composite score
pub const RECIPROCAL_PERCENTAGE_WEIGHT: f64 = 0.6;

/// Maximum bonus contributed by the quick-reciprocal fraction
pub const QUICK_BONUS_WEIGHT: f64 = 30.0;

/// Upper bound for every score the analyzer produces
pub const MAX_SCORE: f64 = 100.0;

/// Composite score at or above which a user is Critical risk
pub const RISK_CRITICAL_THRESHOLD: f64 = 75.0;

/// Composite score at or above which a user is High risk
pub const RISK_HIGH_THRESHOLD: f64 = 50.0;

/// Composite score at or above which a user is Moderate risk
pub const RISK_MODERATE_THRESHOLD: f64 = 25.0;

/// Counterparts scoring at or above this are listed as high-R4R reviewers
pub const HIGH_R4R_REVIEWER_THRESHOLD: f64 = 70.0;

/// Per-connection score contributed by each reciprocal pair
pub const CONNECTION_PAIR_WEIGHT: f64 = 30.0;

/// Cap on the pair-frequency component of a connection score
pub const CONNECTION_PAIR_CAP: f64 = 60.0;

/// Maximum timing component of a connection score (all pairs quick)
pub const CONNECTION_QUICK_WEIGHT: f64 = 40.0;

/// TTL for cached full analyses, in seconds
pub const ANALYSIS_CACHE_TTL_SECS: u64 = 300;

/// TTL for the fast review-summary cache, in seconds
pub const SUMMARY_CACHE_TTL_SECS: u64 = 120;

/// Entry bound for each cache; the oldest entry is evicted past this
pub const CACHE_MAX_ENTRIES: usize = 100;

/// Maximum userkeys accepted by a network-analysis request
pub const MAX_NETWORK_USERKEYS: usize = 20;

/// How many counterparts are scanned one level deep per analysis
pub const MAX_COUNTERPART_SCANS: usize = 10;

/// Page size for upstream review fetches
pub const REVIEW_PAGE_SIZE: usize = 100;

/// Upper bound on pages fetched per review direction
pub const MAX_REVIEW_PAGES: usize = 5;
