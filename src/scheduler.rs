//! Background runner for the leave batch jobs.
//!
//! Ticks once a day (and once at startup): monthly accrual for the current
//! month, the year-end close of the previous year during January, and the
//! comp-off expiry sweep. Accrual and year-end record a job key per period,
//! so a restart or a manual run through the API never applies them twice.

use chrono::Datelike;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};

use crate::api::AppState;
use crate::error::HrmsResult;
use crate::services::leave_jobs::{self, AccrualRun, CompOffExpiryRun, YearEndRun};

/// Interval between scheduler ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Outcome of one scheduler tick.
#[derive(Debug, Clone, Serialize)]
pub struct DailyRun {
    pub accrual: AccrualRun,
    /// Only set in January.
    pub year_end: Option<YearEndRun>,
    pub comp_off_expiry: CompOffExpiryRun,
}

/// Runs the leave jobs against the application's database and clock.
pub struct LeaveScheduler {
    state: AppState,
}

impl LeaveScheduler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Starts the tick loop on the runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(self) {
        info!(interval_secs = TICK_INTERVAL.as_secs(), "Leave scheduler started");

        let mut ticker = interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = self.run_due_jobs().await {
                error!(error = %e, "Scheduled leave jobs failed");
            }
        }
    }

    /// Runs every job due today.
    pub async fn run_due_jobs(&self) -> HrmsResult<DailyRun> {
        let now = self.state.now();
        let today = now.date();
        let db = self.state.db();
        let config = self.state.config();

        let accrual = leave_jobs::run_monthly_accrual(db, config, today, now).await?;
        let year_end = if today.month() == 1 {
            Some(leave_jobs::run_year_end(db, config, today.year() - 1, now).await?)
        } else {
            None
        };
        let comp_off_expiry = leave_jobs::expire_comp_offs(db, today, now).await?;

        info!(
            date = %today,
            accrued = accrual.processed,
            year_end = ?year_end.as_ref().map(|run| run.year),
            comp_offs_expired = comp_off_expiry.expired,
            "Scheduled leave jobs complete"
        );
        Ok(DailyRun {
            accrual,
            year_end,
            comp_off_expiry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::clock::FixedClock;
    use crate::services::test_support::{config, create_employee, date, setup_test_db};

    async fn scheduler_at(
        today: chrono::NaiveDate,
    ) -> HrmsResult<(LeaveScheduler, Arc<FixedClock>)> {
        let config = config();
        let db = setup_test_db(&config).await?;
        create_employee(&db, &config, "EMP500", date(2020, 1, 6), date(2026, 10, 17)).await?;
        let clock = Arc::new(FixedClock::at_date(today));
        let state = AppState::new(db, config, clock.clone());
        Ok((LeaveScheduler::new(state), clock))
    }

    #[tokio::test]
    async fn test_tick_accrues_once_per_month() -> HrmsResult<()> {
        let (scheduler, clock) = scheduler_at(date(2026, 11, 1)).await?;

        let first = scheduler.run_due_jobs().await?;
        assert!(!first.accrual.already_run);
        assert_eq!(first.accrual.processed, 1);
        assert!(first.year_end.is_none());

        clock.set(date(2026, 11, 2).and_hms_opt(10, 0, 0).unwrap());
        let second = scheduler.run_due_jobs().await?;
        assert!(second.accrual.already_run);
        Ok(())
    }

    #[tokio::test]
    async fn test_january_tick_closes_previous_year() -> HrmsResult<()> {
        let (scheduler, _clock) = scheduler_at(date(2027, 1, 3)).await?;

        let run = scheduler.run_due_jobs().await?;
        let year_end = run.year_end.expect("year-end runs in January");
        assert_eq!(year_end.year, 2026);
        assert!(!year_end.already_run);
        assert_eq!(year_end.carried_forward.len(), 1);

        let again = scheduler.run_due_jobs().await?;
        assert!(again.year_end.unwrap().already_run);
        Ok(())
    }
}
