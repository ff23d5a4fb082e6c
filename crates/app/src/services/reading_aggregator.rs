//! Reading aggregator: sums each unit's readings over a period.
//!
//! Aggregation is the only IO-bound stage of a settlement. Units are fetched
//! concurrently on a [`JoinSet`], bounded by a [`Semaphore`], and joined
//! before any totals are computed. Dropping the future returned by
//! [`ReadingAggregator::aggregate_all`] drops the `JoinSet`, which aborts
//! every outstanding fetch.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use sunshare_domain::error::SunshareError;
use sunshare_domain::id::UnitId;
use sunshare_domain::period::Period;
use sunshare_domain::settlement::ReadingFetchFailure;
use sunshare_domain::unit::Unit;

use crate::ports::ReadingRepository;

/// Default number of units fetched at the same time.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Outcome of aggregating every unit of a network.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Aggregation {
    /// Aggregated kWh per unit. Every requested unit is present; failed units hold zero.
    pub quantities: HashMap<UnitId, f64>,
    /// Units whose readings could not be fetched.
    pub failures: Vec<ReadingFetchFailure>,
}

/// Fans reading fetches out across units and joins the sums.
pub struct ReadingAggregator<R> {
    source: Arc<R>,
    max_concurrency: usize,
}

impl<R> ReadingAggregator<R>
where
    R: ReadingRepository + Send + Sync + 'static,
{
    /// Create an aggregator over `source`, fetching at most
    /// `max_concurrency` units at a time (at least one).
    pub fn new(source: R, max_concurrency: usize) -> Self {
        Self::from_arc(Arc::new(source), max_concurrency)
    }

    /// Create an aggregator from a source already shared elsewhere.
    pub fn from_arc(source: Arc<R>, max_concurrency: usize) -> Self {
        Self {
            source,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Sum the readings of one unit within `period`.
    ///
    /// A unit without readings aggregates to zero.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying reading source.
    pub async fn aggregate(&self, unit: &Unit, period: &Period) -> Result<f64, SunshareError> {
        sum_readings(self.source.as_ref(), unit.id, period).await
    }

    /// Aggregate every unit concurrently.
    ///
    /// A unit whose fetch fails is zero-filled, logged, and reported in
    /// [`Aggregation::failures`]; the rest of the network still aggregates.
    pub async fn aggregate_all(&self, units: &[Unit], period: &Period) -> Aggregation {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for unit in units {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let unit_id = unit.id;
            let period = *period;
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let result = sum_readings(source.as_ref(), unit_id, &period).await;
                (unit_id, result)
            });
        }

        let mut aggregation = Aggregation::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((unit_id, Ok(quantity))) => {
                    aggregation.quantities.insert(unit_id, quantity);
                }
                Ok((unit_id, Err(err))) => {
                    tracing::warn!(%unit_id, error = %err, "reading fetch failed, settling unit as zero");
                    aggregation.quantities.insert(unit_id, 0.0);
                    aggregation.failures.push(ReadingFetchFailure {
                        unit_id,
                        reason: err.to_string(),
                    });
                }
                Err(err) => {
                    tracing::error!(error = %err, "reading aggregation task failed");
                }
            }
        }

        // a panicked task cannot report its unit; catch those here
        for unit in units {
            if !aggregation.quantities.contains_key(&unit.id) {
                aggregation.quantities.insert(unit.id, 0.0);
                aggregation.failures.push(ReadingFetchFailure {
                    unit_id: unit.id,
                    reason: "aggregation task failed".to_string(),
                });
            }
        }

        // join order is arbitrary
        aggregation.failures.sort_by_key(|failure| failure.unit_id);
        aggregation
    }
}

async fn sum_readings<R: ReadingRepository>(
    source: &R,
    unit_id: UnitId,
    period: &Period,
) -> Result<f64, SunshareError> {
    let readings = source
        .find_by_unit_in_range(unit_id, period.start(), period.end())
        .await?;

    let total = readings
        .iter()
        .filter(|reading| reading.unit_id == unit_id && period.contains(reading.recorded_at))
        .map(|reading| reading.value_kwh)
        .sum();

    tracing::debug!(%unit_id, readings = readings.len(), total_kwh = total, "aggregated readings");
    Ok(total)
}
