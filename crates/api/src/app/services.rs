use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, info};

use retailpulse_ai::{AiError, AiJob, AiResult, PriceOptimization, PriceOptimizationJob};
use retailpulse_infra::{AppConfig, CsvLoader, DataSet, DataStore, LoadError, MemoCache, fingerprint};
use retailpulse_inventory::{RedistributionPlan, RedistributionPlanner, SurplusPolicy};

/// Failure while producing a dashboard view.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Inference(#[from] AiError),
}

/// Pricing model output as served: the job's insight plus its typed rows.
#[derive(Debug, Clone)]
pub struct PricingInsight {
    pub result: AiResult,
    pub optimization: PriceOptimization,
}

/// Shared state behind the routes: one data store and one memo cache per
/// derived view. Locks are held only for a lookup or a single computation.
#[derive(Debug)]
pub struct AppServices {
    config: AppConfig,
    store: Mutex<DataStore>,
    plans: Mutex<MemoCache<RedistributionPlan>>,
    pricing: Mutex<MemoCache<PricingInsight>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // Cached values stay valid after a panicking holder.
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AppServices {
    pub fn new(config: AppConfig) -> Self {
        let store = DataStore::new(CsvLoader::new(config.data_dir.clone()));
        Self {
            config,
            store: Mutex::new(store),
            plans: Mutex::new(MemoCache::new()),
            pricing: Mutex::new(MemoCache::new()),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn surplus_policy(&self) -> SurplusPolicy {
        self.config.surplus_policy
    }

    pub fn data(&self) -> Result<Arc<DataSet>, LoadError> {
        lock(&self.store).snapshot()
    }

    pub fn redistribution_plan(&self) -> Result<Arc<RedistributionPlan>, ServiceError> {
        let data = self.data()?;
        let policy = self.surplus_policy();
        let key = fingerprint(&(data.inventory.as_slice(), &policy));

        let plan = lock(&self.plans).get_or_compute(key, || {
            let plan = RedistributionPlanner::new(policy).plan(&data.inventory);
            info!(
                policy = policy.as_str(),
                records = data.inventory.len(),
                suggestions = plan.suggestions.len(),
                proposed = plan.summary.proposed,
                blocked = plan.summary.blocked_low_buffer,
                no_match = plan.summary.no_match,
                "computed redistribution plan"
            );
            for s in &plan.suggestions {
                debug!(
                    product = %s.product,
                    destination = %s.destination_store,
                    source = ?s.source_store.as_ref().map(|id| id.as_str()),
                    quantity = s.quantity,
                    status = ?s.status,
                    "transfer suggestion"
                );
            }
            plan
        });
        Ok(plan)
    }

    pub fn price_optimization(&self) -> Result<Arc<PricingInsight>, ServiceError> {
        let data = self.data()?;
        let key = fingerprint(data.pricing.as_slice());

        let insight = lock(&self.pricing).try_get_or_compute(key, || {
            let result = run_job(&PriceOptimizationJob::new(data.pricing.clone()))?;
            let optimization = PriceOptimization::from_result(&result)?;
            info!(
                rows = optimization.suggestions.len(),
                r_squared = optimization.r_squared,
                "fitted pricing model"
            );
            Ok::<_, AiError>(PricingInsight { result, optimization })
        })?;
        Ok(insight)
    }

    /// Clear derived views and force the next request to reload the files.
    pub fn invalidate(&self) {
        lock(&self.store).invalidate();
        lock(&self.plans).invalidate();
        lock(&self.pricing).invalidate();
        info!("caches invalidated");
    }
}

fn run_job<J: AiJob>(job: &J) -> Result<AiResult, AiError> {
    let result = job.run()?;
    debug!(
        kind = job.kind(),
        score = result.score,
        confidence = result.confidence,
        "ai job finished"
    );
    Ok(result)
}
