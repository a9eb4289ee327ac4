//! Top-candidate selection: rank a job's applications by resume score and
//! re-partition the cohort at a percentile cutoff.
//!
//! Selection is a read-sort-write sequence, deliberately not wrapped in a
//! transaction (eventual consistency is accepted between the read and the
//! status writes). Re-running on a frozen pool is idempotent: the same
//! ranking produces the same status assignment.

pub mod store;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::application::ApplicationStatus;
use crate::selection::store::{ApplicationStore, StoreError};

/// Which stage boundary the selection runs at; decides the terminal
/// statuses written to each cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStage {
    /// Resume collection ended: shortlist for the coding round.
    Resume,
    /// Coding round ended: shortlist for HR interviews.
    Hr,
}

impl SelectionStage {
    fn selected_status(self) -> ApplicationStatus {
        match self {
            SelectionStage::Resume => ApplicationStatus::Shortlisted,
            SelectionStage::Hr => ApplicationStatus::ShortlistedForHr,
        }
    }

    fn rejected_status(self) -> ApplicationStatus {
        match self {
            SelectionStage::Resume => ApplicationStatus::NotSelected,
            SelectionStage::Hr => ApplicationStatus::NotShortlistedForHr,
        }
    }

    /// Each stage re-partitions the surviving cohort, not the original
    /// applicant pool: `not_selected` is terminal and never resurrected by
    /// a later stage. A stage's own output statuses stay eligible so that
    /// re-running on a frozen pool is idempotent.
    fn is_eligible(self, status: &str) -> bool {
        match self {
            SelectionStage::Resume => true,
            SelectionStage::Hr => ApplicationStatus::parse(status).is_some_and(|s| {
                matches!(
                    s,
                    ApplicationStatus::Shortlisted
                        | ApplicationStatus::ShortlistedForHr
                        | ApplicationStatus::NotShortlistedForHr
                )
            }),
        }
    }
}

/// Number of applications that survive the cutoff: `max(1, ⌊n·pct⌋)`,
/// so any non-empty pool always selects at least one candidate.
pub fn cutoff_count(total: usize, percentage: f64) -> usize {
    (((total as f64) * percentage).floor() as usize)
        .max(1)
        .min(total)
}

/// Ranks all applications of `job_id` by `resume_score` (descending, ties
/// keep submission order) and writes an explicit status to BOTH cohorts:
/// the top `max(1, ⌊n·percentage⌋)` get the stage's selected status, the
/// rest its rejected status. Returns the selected candidates' user ids.
///
/// Every fault is logged and degraded to an empty result — callers cannot
/// distinguish "no applicants" from "error" here, by design.
pub async fn select_top_candidates(
    store: &dyn ApplicationStore,
    job_id: Uuid,
    percentage: f64,
    stage: SelectionStage,
) -> Vec<Uuid> {
    match run_selection(store, job_id, percentage, stage).await {
        Ok(selected) => selected,
        Err(e) => {
            error!("Error selecting top candidates for job {job_id}: {e}");
            Vec::new()
        }
    }
}

async fn run_selection(
    store: &dyn ApplicationStore,
    job_id: Uuid,
    percentage: f64,
    stage: SelectionStage,
) -> Result<Vec<Uuid>, StoreError> {
    let mut applications = store.applications_for_job(job_id).await?;
    applications.retain(|a| stage.is_eligible(&a.status));

    if applications.is_empty() {
        warn!("No applications found for job {job_id}");
        return Ok(Vec::new());
    }

    // Stable sort: equal scores keep the submission order of the fetch.
    applications.sort_by(|a, b| {
        b.resume_score
            .partial_cmp(&a.resume_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let cutoff = cutoff_count(applications.len(), percentage);
    let (selected, rejected) = applications.split_at(cutoff);

    let selected_ids: Vec<Uuid> = selected.iter().map(|a| a.id).collect();
    let rejected_ids: Vec<Uuid> = rejected.iter().map(|a| a.id).collect();

    // Both cohorts get an explicit status before this call returns.
    let updated = store
        .batch_update_status(&selected_ids, stage.selected_status())
        .await?;
    info!(
        "Marked {updated} of {total} applications as {status}",
        total = applications.len(),
        status = stage.selected_status()
    );

    if !rejected_ids.is_empty() {
        let updated = store
            .batch_update_status(&rejected_ids, stage.rejected_status())
            .await?;
        info!("Marked {updated} applications as {}", stage.rejected_status());
    }

    Ok(selected.iter().map(|a| a.user_id).collect())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::store::{ApplicationStore, StoreError};
    use super::*;
    use crate::models::application::ApplicationSummary;

    struct MemoryStore {
        rows: Mutex<Vec<ApplicationSummary>>,
        writes: AtomicUsize,
    }

    impl MemoryStore {
        fn new(scores: &[f64]) -> Self {
            Self::with_status(scores, "applied")
        }

        fn with_status(scores: &[f64], status: &str) -> Self {
            let rows = scores
                .iter()
                .map(|&score| ApplicationSummary {
                    id: Uuid::new_v4(),
                    user_id: Uuid::new_v4(),
                    resume_score: score,
                    status: status.to_string(),
                })
                .collect();
            Self {
                rows: Mutex::new(rows),
                writes: AtomicUsize::new(0),
            }
        }

        fn status_of(&self, id: Uuid) -> String {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .map(|r| r.status.clone())
                .unwrap()
        }

        fn statuses(&self) -> Vec<String> {
            self.rows.lock().unwrap().iter().map(|r| r.status.clone()).collect()
        }

        fn user_ids(&self) -> Vec<Uuid> {
            self.rows.lock().unwrap().iter().map(|r| r.user_id).collect()
        }

        fn ids(&self) -> Vec<Uuid> {
            self.rows.lock().unwrap().iter().map(|r| r.id).collect()
        }
    }

    #[async_trait]
    impl ApplicationStore for MemoryStore {
        async fn applications_for_job(
            &self,
            _job_id: Uuid,
        ) -> Result<Vec<ApplicationSummary>, StoreError> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn batch_update_status(
            &self,
            ids: &[Uuid],
            status: ApplicationStatus,
        ) -> Result<u64, StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            let mut updated = 0;
            for row in rows.iter_mut() {
                if ids.contains(&row.id) {
                    row.status = status.as_str().to_string();
                    updated += 1;
                }
            }
            Ok(updated)
        }
    }

    /// Store that fails every operation, for the degraded path.
    struct BrokenStore;

    #[async_trait]
    impl ApplicationStore for BrokenStore {
        async fn applications_for_job(
            &self,
            _job_id: Uuid,
        ) -> Result<Vec<ApplicationSummary>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn batch_update_status(
            &self,
            _ids: &[Uuid],
            _status: ApplicationStatus,
        ) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    #[test]
    fn test_cutoff_count_floors_and_guarantees_one() {
        assert_eq!(cutoff_count(4, 0.5), 2);
        assert_eq!(cutoff_count(5, 0.5), 2); // floor(2.5)
        assert_eq!(cutoff_count(1, 0.1), 1); // max(1, floor(0.1))
        assert_eq!(cutoff_count(10, 1.0), 10);
        assert_eq!(cutoff_count(3, 0.01), 1);
    }

    #[tokio::test]
    async fn test_selects_top_half_by_score() {
        let store = MemoryStore::new(&[90.0, 70.0, 50.0, 30.0]);
        let users = store.user_ids();

        let selected =
            select_top_candidates(&store, Uuid::new_v4(), 0.5, SelectionStage::Resume).await;

        assert_eq!(selected, vec![users[0], users[1]]);
        assert_eq!(
            store.statuses(),
            vec!["shortlisted", "shortlisted", "not_selected", "not_selected"]
        );
    }

    #[tokio::test]
    async fn test_every_application_gets_a_terminal_status() {
        let store = MemoryStore::new(&[10.0, 80.0, 55.0, 42.0, 67.0]);
        select_top_candidates(&store, Uuid::new_v4(), 0.4, SelectionStage::Resume).await;

        let statuses = store.statuses();
        let selected = statuses.iter().filter(|s| *s == "shortlisted").count();
        let rejected = statuses.iter().filter(|s| *s == "not_selected").count();
        assert_eq!(selected, 2); // floor(5 × 0.4)
        assert_eq!(selected + rejected, 5);
    }

    #[tokio::test]
    async fn test_selected_scores_dominate_rejected_scores() {
        let store = MemoryStore::new(&[12.0, 99.0, 47.0, 47.0, 3.0, 88.0]);
        select_top_candidates(&store, Uuid::new_v4(), 0.5, SelectionStage::Resume).await;

        let rows = store.rows.lock().unwrap();
        let min_selected = rows
            .iter()
            .filter(|r| r.status == "shortlisted")
            .map(|r| r.resume_score)
            .fold(f64::INFINITY, f64::min);
        let max_rejected = rows
            .iter()
            .filter(|r| r.status == "not_selected")
            .map(|r| r.resume_score)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(min_selected >= max_rejected);
    }

    #[tokio::test]
    async fn test_single_low_scorer_is_still_selected() {
        let store = MemoryStore::new(&[10.0]);
        let selected =
            select_top_candidates(&store, Uuid::new_v4(), 0.1, SelectionStage::Resume).await;

        assert_eq!(selected.len(), 1);
        assert_eq!(store.statuses(), vec!["shortlisted"]);
    }

    #[tokio::test]
    async fn test_empty_pool_returns_empty_and_writes_nothing() {
        let store = MemoryStore::new(&[]);
        let selected =
            select_top_candidates(&store, Uuid::new_v4(), 0.5, SelectionStage::Resume).await;

        assert!(selected.is_empty());
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_empty() {
        let selected =
            select_top_candidates(&BrokenStore, Uuid::new_v4(), 0.5, SelectionStage::Resume).await;
        assert!(selected.is_empty());
    }

    #[tokio::test]
    async fn test_hr_stage_writes_hr_statuses() {
        let store = MemoryStore::with_status(&[80.0, 60.0, 40.0], "shortlisted");
        select_top_candidates(&store, Uuid::new_v4(), 0.34, SelectionStage::Hr).await;

        assert_eq!(
            store.statuses(),
            vec![
                "shortlisted_for_hr",
                "not_shortlisted_for_hr",
                "not_shortlisted_for_hr"
            ]
        );
    }

    #[tokio::test]
    async fn test_hr_stage_never_resurrects_rejected_applications() {
        let store = MemoryStore::new(&[95.0, 90.0]);
        // Resume stage rejects the runner-up...
        select_top_candidates(&store, Uuid::new_v4(), 0.5, SelectionStage::Resume).await;
        assert_eq!(store.statuses(), vec!["shortlisted", "not_selected"]);

        // ...and the HR stage only re-partitions the survivor.
        let selected =
            select_top_candidates(&store, Uuid::new_v4(), 0.5, SelectionStage::Hr).await;
        assert_eq!(selected.len(), 1);
        assert_eq!(store.statuses(), vec!["shortlisted_for_hr", "not_selected"]);
    }

    #[tokio::test]
    async fn test_ties_break_by_submission_order() {
        let store = MemoryStore::new(&[50.0, 50.0, 50.0, 50.0]);
        let ids = store.ids();
        let users = store.user_ids();

        let selected =
            select_top_candidates(&store, Uuid::new_v4(), 0.5, SelectionStage::Resume).await;

        // Earlier submissions win the boundary.
        assert_eq!(selected, vec![users[0], users[1]]);
        assert_eq!(store.status_of(ids[0]), "shortlisted");
        assert_eq!(store.status_of(ids[3]), "not_selected");
    }

    #[tokio::test]
    async fn test_rerun_on_frozen_pool_is_idempotent() {
        let store = MemoryStore::new(&[90.0, 70.0, 50.0]);

        let first =
            select_top_candidates(&store, Uuid::new_v4(), 0.67, SelectionStage::Resume).await;
        let statuses_after_first = store.statuses();
        let second =
            select_top_candidates(&store, Uuid::new_v4(), 0.67, SelectionStage::Resume).await;

        assert_eq!(first, second);
        assert_eq!(store.statuses(), statuses_after_first);
    }

    #[tokio::test]
    async fn test_full_percentage_selects_everyone() {
        let store = MemoryStore::new(&[5.0, 4.0, 3.0]);
        let selected =
            select_top_candidates(&store, Uuid::new_v4(), 1.0, SelectionStage::Resume).await;

        assert_eq!(selected.len(), 3);
        assert!(store.statuses().iter().all(|s| s == "shortlisted"));
    }
}
