//! Concurrent batch evaluation of many slips against one shared evaluator.
//!
//! Each request becomes a tagged outcome; one bad slip never fails the
//! batch.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::pricing::LineCurve;
use crate::strategy::{LineEvaluator, SlipEvaluation};
use crate::types::{ErrorKind, Side};

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// One slip to evaluate: a regional token, the favored side and the
/// home-relative curve it is priced against.
#[derive(Debug, Clone, Deserialize)]
pub struct SlipRequest {
    #[serde(default = "new_request_id")]
    pub id: String,
    pub token: String,
    pub favored: Side,
    pub curve: LineCurve,
}

/// Result of a single request, tagged by status.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Evaluated {
        id: String,
        evaluation: SlipEvaluation,
    },
    Failed {
        id: String,
        kind: ErrorKind,
        message: String,
    },
}

impl BatchOutcome {
    pub fn id(&self) -> &str {
        match self {
            BatchOutcome::Evaluated { id, .. } | BatchOutcome::Failed { id, .. } => id,
        }
    }

    pub fn is_evaluated(&self) -> bool {
        matches!(self, BatchOutcome::Evaluated { .. })
    }
}

/// Outcomes in request order plus a summary.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub table_version: String,
    pub evaluated: usize,
    pub failed: usize,
    /// Evaluated slips whose better role has a positive verdict.
    pub positive: usize,
    pub outcomes: Vec<BatchOutcome>,
}

/// Evaluate one request synchronously.
pub fn evaluate_request(evaluator: &LineEvaluator, request: &SlipRequest) -> BatchOutcome {
    match evaluator.evaluate(&request.token, request.favored, &request.curve) {
        Ok(evaluation) => BatchOutcome::Evaluated {
            id: request.id.clone(),
            evaluation,
        },
        Err(e) => {
            warn!(id = %request.id, token = %request.token, error = %e, "Slip evaluation failed");
            BatchOutcome::Failed {
                id: request.id.clone(),
                kind: e.kind(),
                message: e.to_string(),
            }
        }
    }
}

/// Evaluate every request on the blocking pool, sharing `evaluator`.
///
/// Outcomes keep input order. Only a panicked worker fails the batch.
pub async fn run_batch(
    evaluator: Arc<LineEvaluator>,
    requests: Vec<SlipRequest>,
) -> Result<BatchReport> {
    let total = requests.len();

    let handles: Vec<_> = requests
        .into_iter()
        .map(|request| {
            let evaluator = Arc::clone(&evaluator);
            tokio::task::spawn_blocking(move || evaluate_request(&evaluator, &request))
        })
        .collect();

    let mut outcomes = Vec::with_capacity(total);
    for joined in join_all(handles).await {
        outcomes.push(joined.context("Batch worker panicked")?);
    }

    let evaluated = outcomes.iter().filter(|o| o.is_evaluated()).count();
    let failed = outcomes.len() - evaluated;
    let positive = outcomes
        .iter()
        .filter(|o| match o {
            BatchOutcome::Evaluated { evaluation, .. } => evaluation.best().ev.verdict.is_positive(),
            BatchOutcome::Failed { .. } => false,
        })
        .count();

    info!(total, evaluated, failed, positive, "Batch complete");

    Ok(BatchReport {
        generated_at: Utc::now(),
        table_version: evaluator.table().version().to_string(),
        evaluated,
        failed,
        positive,
        outcomes,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
