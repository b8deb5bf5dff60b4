//! The genome-processing pipeline.
//!
//! Processing of a single genome is synchronous and deterministic:
//! resolve the component set, load features level by level, classify
//! unclassified components, merge duplicate records, validate and hand
//! the result to the sink. Across genomes, [`PipelineRunner`] drives a
//! bounded worker pool with per-job timeouts and bounded retries for
//! transient collaborator failures.

pub mod config;
pub mod handlers;

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::classify::ClassificationRules;
use crate::core::Genome;
use crate::merge::IdentityMerger;
use crate::resolve::ComponentResolver;
use crate::sources::{AssemblyCatalog, FeatureSource, GenomeSink, SourceError};
use crate::validate::{run_validators, ValidationError};

pub use config::PipelineConfig;
pub use handlers::{default_handlers, ordered_handlers, FeatureHandler};

/// Why a genome failed processing.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A validator raised a non-repairable defect. Never retried.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A collaborator failed transiently (I/O, external service).
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The sink refused the finished genome.
    #[error("failed to persist genome '{genome}': {source}")]
    Sink {
        genome: String,
        source: SourceError,
    },

    /// Resolution produced no components and empty genomes are not
    /// allowed.
    #[error("genome '{genome}' resolved to an empty component set")]
    EmptyGenome { genome: String },

    #[error("genome '{genome}' exceeded the {timeout_secs}s job timeout")]
    Timeout { genome: String, timeout_secs: u64 },

    /// A worker task failed outside the pipeline's own logic.
    #[error("internal failure processing genome '{genome}': {detail}")]
    Internal { genome: String, detail: String },
}

impl PipelineError {
    /// Transient failures are worth retrying; everything else is final.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Source(_) | Self::Sink { .. })
    }
}

/// Per-genome processing engine. Holds no mutable state of its own; the
/// genome graph passed in is exclusively owned by the calling worker.
pub struct GenomeCurator<'a> {
    catalog: &'a dyn AssemblyCatalog,
    source: &'a dyn FeatureSource,
    rules: ClassificationRules,
    config: PipelineConfig,
}

impl<'a> GenomeCurator<'a> {
    pub fn new(
        catalog: &'a dyn AssemblyCatalog,
        source: &'a dyn FeatureSource,
        config: PipelineConfig,
    ) -> Self {
        Self {
            catalog,
            source,
            rules: ClassificationRules::new(),
            config,
        }
    }

    /// Run the full semantic pipeline on one genome.
    pub fn process(&self, genome: &mut Genome, version: &str) -> Result<(), PipelineError> {
        let resolver = ComponentResolver::new(self.catalog);
        let attached = resolver.resolve(genome, version, self.config.resolution_policy)?;
        if attached == 0 && !self.config.validation.allow_empty_genomes {
            return Err(PipelineError::EmptyGenome {
                genome: genome.id.clone(),
            });
        }

        for handler in ordered_handlers(default_handlers()) {
            debug!(genome = %genome.id, handler = handler.name(), "running feature handler");
            handler.run(genome, self.source)?;
        }

        let superregnum = genome.superregnum;
        for component in genome.components.values_mut() {
            self.rules.classify_component(component, superregnum);
        }

        IdentityMerger::merge(genome);
        run_validators(genome, &self.config.validation)?;
        Ok(())
    }
}

/// One unit of work for the runner.
#[derive(Debug, Clone)]
pub struct GenomeJob {
    pub genome: Genome,
    pub version: String,
}

/// Outcome counts of a runner invocation.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: Vec<String>,
}

/// Processes many genomes concurrently under a bounded pool.
///
/// Each job owns its genome graph exclusively; jobs never share mutable
/// state. A job that exceeds the configured timeout is abandoned without
/// affecting its siblings. Transient collaborator failures are retried up
/// to the configured maximum with a fixed delay; validation failures
/// terminate the genome immediately.
pub struct PipelineRunner {
    catalog: Arc<dyn AssemblyCatalog>,
    source: Arc<dyn FeatureSource>,
    sink: Arc<dyn GenomeSink>,
    config: PipelineConfig,
}

impl PipelineRunner {
    pub fn new(
        catalog: Arc<dyn AssemblyCatalog>,
        source: Arc<dyn FeatureSource>,
        sink: Arc<dyn GenomeSink>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            catalog,
            source,
            sink,
            config,
        }
    }

    pub async fn run(&self, jobs: Vec<GenomeJob>) -> RunSummary {
        let pool = Arc::new(Semaphore::new(self.config.worker_pool_size.max(1)));
        let mut tasks = JoinSet::new();

        for job in jobs {
            let Ok(permit) = pool.clone().acquire_owned().await else {
                // The semaphore is never closed while the runner is alive
                break;
            };
            let catalog = Arc::clone(&self.catalog);
            let source = Arc::clone(&self.source);
            let sink = Arc::clone(&self.sink);
            let config = self.config.clone();
            tasks.spawn(async move {
                let _permit = permit;
                let genome_id = job.genome.id.clone();
                let succeeded = run_job(catalog, source, sink, config, job).await;
                (genome_id, succeeded)
            });
        }

        let mut summary = RunSummary::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, true)) => summary.succeeded += 1,
                Ok((genome_id, false)) => summary.failed.push(genome_id),
                Err(join_error) => {
                    error!(%join_error, "worker task failed to join");
                }
            }
        }
        summary
    }
}

/// Drive one job through its retry loop. Returns whether the genome was
/// accepted by the sink.
async fn run_job(
    catalog: Arc<dyn AssemblyCatalog>,
    source: Arc<dyn FeatureSource>,
    sink: Arc<dyn GenomeSink>,
    config: PipelineConfig,
    job: GenomeJob,
) -> bool {
    let genome_id = job.genome.id.clone();
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let outcome = attempt_job(
            Arc::clone(&catalog),
            Arc::clone(&source),
            Arc::clone(&sink),
            config.clone(),
            job.clone(),
        )
        .await;

        match outcome {
            Ok(()) => {
                info!(genome = %genome_id, attempt, "genome processed");
                return true;
            }
            Err(error) if error.is_transient() && attempt <= config.max_retries => {
                warn!(genome = %genome_id, attempt, %error, "transient failure, retrying");
                tokio::time::sleep(config.retry_delay()).await;
            }
            Err(error) => {
                error!(genome = %genome_id, %error, "genome failed");
                sink.reject(&genome_id, &error);
                return false;
            }
        }
    }
}

/// One processing attempt under the job timeout. The synchronous pipeline
/// runs on a blocking worker thread; if the timeout elapses the attempt
/// is abandoned and its result, if any, discarded. Nothing reaches the
/// sink from a timed-out attempt.
async fn attempt_job(
    catalog: Arc<dyn AssemblyCatalog>,
    source: Arc<dyn FeatureSource>,
    sink: Arc<dyn GenomeSink>,
    config: PipelineConfig,
    job: GenomeJob,
) -> Result<(), PipelineError> {
    let genome_id = job.genome.id.clone();
    let timeout = config.job_timeout();
    let timeout_secs = config.job_timeout_secs;

    let worker = tokio::task::spawn_blocking(move || {
        let curator = GenomeCurator::new(&*catalog, &*source, config);
        let mut genome = job.genome;
        curator.process(&mut genome, &job.version)?;
        sink.accept(&genome).map_err(|source| PipelineError::Sink {
            genome: genome.id.clone(),
            source,
        })?;
        Ok(())
    });

    match tokio::time::timeout(timeout, worker).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(PipelineError::Internal {
            genome: genome_id,
            detail: join_error.to_string(),
        }),
        Err(_) => Err(PipelineError::Timeout {
            genome: genome_id,
            timeout_secs,
        }),
    }
}
