//! Stage workflow driver.
//!
//! Each job gets five wall-clock checkpoints (resume collection start/end,
//! coding round start/end, interview start). Scheduling spawns one tokio
//! task per stage; every task sleeps to its target time and runs its
//! callback exactly once. A failing callback is logged and never cancels
//! the other stages of the same job.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::notify::Notifier;
use crate::selection::store::ApplicationStore;
use crate::selection::{select_top_candidates, SelectionStage};

/// The five wall-clock checkpoints of one job's pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StageTimings {
    pub resume_start: DateTime<Utc>,
    pub resume_end: DateTime<Utc>,
    pub coding_start: DateTime<Utc>,
    pub coding_end: DateTime<Utc>,
    pub interview_start: DateTime<Utc>,
}

impl StageTimings {
    /// Stage checkpoints must be strictly increasing.
    pub fn is_ordered(&self) -> bool {
        self.resume_start < self.resume_end
            && self.resume_end < self.coding_start
            && self.coding_start < self.coding_end
            && self.coding_end < self.interview_start
    }

    fn entries(&self) -> [(Stage, DateTime<Utc>); 5] {
        [
            (Stage::ResumeStart, self.resume_start),
            (Stage::ResumeEnd, self.resume_end),
            (Stage::CodingStart, self.coding_start),
            (Stage::CodingEnd, self.coding_end),
            (Stage::InterviewStart, self.interview_start),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResumeStart,
    ResumeEnd,
    CodingStart,
    CodingEnd,
    InterviewStart,
}

/// Dependencies handed to every stage callback. Built once in `main` and
/// shared by all scheduled jobs — no ambient globals.
pub struct StageContext {
    pub store: Arc<dyn ApplicationStore>,
    pub notifier: Arc<dyn Notifier>,
    pub resume_select_pct: f64,
    pub hr_select_pct: f64,
}

#[derive(Clone)]
pub struct WorkflowScheduler {
    ctx: Arc<StageContext>,
}

impl WorkflowScheduler {
    pub fn new(ctx: StageContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    /// Spawns one timer task per stage of `job_id`. Stages whose timestamp
    /// is already in the past fire immediately. Stage tasks are independent:
    /// an overrunning or failing callback never blocks the next stage.
    pub fn schedule(&self, job_id: Uuid, timings: &StageTimings) {
        for (stage, at) in timings.entries() {
            let ctx = Arc::clone(&self.ctx);
            tokio::spawn(async move {
                let delay = (at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
                tokio::time::sleep(delay).await;
                run_stage(&ctx, job_id, stage).await;
            });
        }
        info!("[Job {job_id}] workflow scheduled");
    }
}

/// Runs one stage callback. The stage-end callbacks select and notify; the
/// start checkpoints only log the boundary. Selection and notification
/// swallow their own faults, so this function never propagates one.
pub async fn run_stage(ctx: &StageContext, job_id: Uuid, stage: Stage) {
    match stage {
        Stage::ResumeStart => info!("[Job {job_id}] Resume collection started"),
        Stage::ResumeEnd => {
            info!("[Job {job_id}] Resume collection ended. Starting resume evaluation...");
            let selected = select_top_candidates(
                ctx.store.as_ref(),
                job_id,
                ctx.resume_select_pct,
                SelectionStage::Resume,
            )
            .await;
            if selected.is_empty() {
                info!("[Job {job_id}] no actionable cohort at resume end");
                return;
            }
            ctx.notifier.notify_candidates(job_id, &selected).await;
        }
        Stage::CodingStart => info!("[Job {job_id}] Coding round started"),
        Stage::CodingEnd => {
            info!("[Job {job_id}] Coding round ended. Shortlisting for HR...");
            let selected = select_top_candidates(
                ctx.store.as_ref(),
                job_id,
                ctx.hr_select_pct,
                SelectionStage::Hr,
            )
            .await;
            if selected.is_empty() {
                info!("[Job {job_id}] no actionable cohort at coding end");
                return;
            }
            ctx.notifier.notify_candidates(job_id, &selected).await;
        }
        Stage::InterviewStart => info!("[Job {job_id}] Interview round started"),
    }
}
