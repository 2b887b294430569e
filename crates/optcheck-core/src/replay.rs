//! Trajectory replay
//!
//! Reconstructs an environment state from a trajectory record by
//! resolving the benchmark and every action token, then applying the
//! actions strictly in order. The engine holds no state of its own:
//! a completed replay is a pure function of the benchmark's initial
//! state and the commandline.

use crate::env::{ActionSpace, BenchmarkCorpus, Environment};
use crate::error::{OptcheckError, OptcheckResult};
use crate::record::TrajectoryRecord;
use std::sync::Arc;
use tracing::{debug, warn};

/// Replays trajectory records against environment instances
pub struct ReplayEngine {
    corpus: Arc<dyn BenchmarkCorpus>,
    actions: Arc<dyn ActionSpace>,
}

impl ReplayEngine {
    /// Create an engine over the given collaborators
    pub fn new(corpus: Arc<dyn BenchmarkCorpus>, actions: Arc<dyn ActionSpace>) -> Self {
        Self { corpus, actions }
    }

    /// Replay a record onto an existing environment.
    ///
    /// The benchmark URI and every commandline token are resolved
    /// before the environment is touched, so an unresolvable record
    /// never leaves partial state behind. A transformation failure
    /// mid-sequence aborts with [`OptcheckError::ReplayAborted`] and
    /// leaves the partial state in `env` for inspection.
    pub fn replay(&self, record: &TrajectoryRecord, env: &mut Environment) -> OptcheckResult<()> {
        let benchmark = self.corpus.resolve(&record.benchmark)?;
        let resolved = record
            .commandline
            .iter()
            .map(|token| self.actions.resolve(token))
            .collect::<OptcheckResult<Vec<_>>>()?;

        debug!(
            benchmark = %benchmark.uri,
            actions = resolved.len(),
            "replaying trajectory"
        );

        env.reset(benchmark);
        for (index, action) in resolved.into_iter().enumerate() {
            if let Err(detail) = self.actions.apply(env, &action) {
                warn!(
                    index,
                    token = %action.token,
                    %detail,
                    "replay aborted by transformation failure"
                );
                return Err(OptcheckError::replay_aborted(index, action.token, detail));
            }
            env.push_applied(action);
        }

        Ok(())
    }

    /// Replay a record onto a fresh environment and return it
    pub fn replay_fresh(&self, record: &TrajectoryRecord) -> OptcheckResult<Environment> {
        let benchmark = self.corpus.resolve(&record.benchmark)?;
        let mut env = Environment::new(benchmark);
        self.replay(record, &mut env)?;
        Ok(env)
    }
}
