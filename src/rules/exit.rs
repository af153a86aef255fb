//! Exit workflow rules: the standard checklist, notice-period progress and
//! the status timeline shown for a resignation.

use chrono::{Duration, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::entities::ResignationStatus;

/// Standard exit tasks: (task, owning department, days before last working day).
pub const EXIT_CHECKLIST: [(&str, &str, i64); 10] = [
    ("Exit Interview Scheduling", "HR", 2),
    ("Knowledge Transfer Documentation", "Department", 7),
    ("Project Handover", "Department", 5),
    ("Laptop & Asset Return", "IT", 1),
    ("ID Card Surrender", "HR", 1),
    ("Email Account Deactivation", "IT", 0),
    ("Access Card Deactivation", "Admin", 0),
    ("Final Salary Processing", "Finance", 3),
    ("Experience Letter Preparation", "HR", 5),
    ("Clear Dues from Departments", "Finance", 2),
];

/// A checklist task with its computed due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistTask {
    /// Task name.
    pub task: String,
    /// Owning department.
    pub department: String,
    /// Due date.
    pub due_date: NaiveDate,
}

/// Builds the standard checklist for a last working day.
pub fn exit_checklist(last_working_date: NaiveDate) -> Vec<ChecklistTask> {
    EXIT_CHECKLIST
        .iter()
        .map(|(task, department, days_before)| ChecklistTask {
            task: task.to_string(),
            department: department.to_string(),
            due_date: last_working_date - Duration::days(*days_before),
        })
        .collect()
}

/// Notice period position of an accepted resignation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeProgress {
    /// Calendar days from resignation to last working day.
    pub total_days: i64,
    /// Days served so far.
    pub days_completed: i64,
    /// Days left.
    pub days_remaining: i64,
    /// `days_completed / total_days * 100`, two decimals, capped at 100.
    pub completion_percentage: Decimal,
    /// No days remain.
    pub is_completed: bool,
}

/// Notice progress; `None` unless the resignation is accepted and the
/// last working day is after the resignation date.
pub fn notice_progress(
    status: ResignationStatus,
    resignation_date: NaiveDate,
    last_working_date: NaiveDate,
    today: NaiveDate,
) -> Option<NoticeProgress> {
    if status != ResignationStatus::Accepted || resignation_date >= last_working_date {
        return None;
    }
    let total_days = (last_working_date - resignation_date).num_days();
    let days_completed = (today - resignation_date).num_days().clamp(0, total_days);
    let days_remaining = (last_working_date - today).num_days().max(0);
    let completion_percentage = (Decimal::from(days_completed) * Decimal::ONE_HUNDRED
        / Decimal::from(total_days))
    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    .min(Decimal::ONE_HUNDRED);

    Some(NoticeProgress {
        total_days,
        days_completed,
        days_remaining,
        completion_percentage,
        is_completed: days_remaining == 0,
    })
}

/// Inputs to the exit-process status.
#[derive(Debug, Clone, Copy)]
pub struct ExitFacts {
    /// Checklist tasks completed.
    pub checklist_completed: u32,
    /// Checklist tasks in total.
    pub checklist_total: u32,
    /// No-due certificate marked complete.
    pub no_due_completed: bool,
    /// Exit interview marked complete.
    pub exit_interview_completed: bool,
    /// Final settlement amount is positive.
    pub has_final_settlement: bool,
}

/// Exit-process completion status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitProgress {
    /// No-due certificate complete.
    pub no_due_certificate: bool,
    /// Exit interview complete.
    pub exit_interview: bool,
    /// Checklist completion percentage.
    pub checklist_progress: Decimal,
    /// Checklist tasks completed.
    pub checklist_completed: u32,
    /// Checklist tasks in total.
    pub checklist_total: u32,
    /// Final settlement recorded.
    pub final_settlement: bool,
    /// Days until the last working day (zero once passed).
    pub days_until_exit: i64,
    /// Checklist progress keeps pace with the days left.
    pub is_on_track: bool,
}

impl ExitProgress {
    /// Every checklist task, the no-due certificate and the interview are done.
    pub fn is_complete(&self) -> bool {
        self.checklist_total > 0
            && self.checklist_completed == self.checklist_total
            && self.no_due_certificate
            && self.exit_interview
    }
}

/// Computes exit-process status for a last working day.
pub fn exit_progress(facts: ExitFacts, last_working_date: NaiveDate, today: NaiveDate) -> ExitProgress {
    let checklist_progress = if facts.checklist_total > 0 {
        (Decimal::from(facts.checklist_completed) * Decimal::ONE_HUNDRED
            / Decimal::from(facts.checklist_total))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };
    let days_until_exit = (last_working_date - today).num_days().max(0);
    let is_on_track = days_until_exit == 0
        || checklist_progress >= Decimal::ONE_HUNDRED - Decimal::from(days_until_exit);

    ExitProgress {
        no_due_certificate: facts.no_due_completed,
        exit_interview: facts.exit_interview_completed,
        checklist_progress,
        checklist_completed: facts.checklist_completed,
        checklist_total: facts.checklist_total,
        final_settlement: facts.has_final_settlement,
        days_until_exit,
        is_on_track,
    }
}

/// A stage shown on the resignation timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineStage {
    /// Submitted.
    Applied,
    /// Being reviewed.
    UnderReview,
    /// Accepted by the approver.
    Accepted,
    /// Notice period running.
    ServingNotice,
    /// Notice period served.
    NoticeCompleted,
    /// Exit tasks outstanding.
    ExitProcess,
    /// Exit finished.
    Completed,
    /// Rejected by the approver.
    Rejected,
    /// Withdrawn by the employee.
    Withdrawn,
}

/// One entry on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    /// Stage.
    pub stage: TimelineStage,
    /// Display label.
    pub label: String,
    /// When the stage was reached, if known.
    pub date: Option<NaiveDate>,
    /// Stage finished.
    pub completed: bool,
    /// Stage currently in progress.
    pub active: bool,
}

impl TimelineEntry {
    fn done(stage: TimelineStage, label: impl Into<String>, date: Option<NaiveDate>) -> Self {
        Self {
            stage,
            label: label.into(),
            date,
            completed: true,
            active: false,
        }
    }

    fn in_progress(stage: TimelineStage, label: impl Into<String>, date: Option<NaiveDate>) -> Self {
        Self {
            stage,
            label: label.into(),
            date,
            completed: false,
            active: true,
        }
    }
}

/// Dates and status needed to draw a timeline.
#[derive(Debug, Clone, Copy)]
pub struct TimelineFacts {
    /// Current status.
    pub status: ResignationStatus,
    /// Date submitted.
    pub applied_on: NaiveDate,
    /// Date accepted or rejected.
    pub decided_on: Option<NaiveDate>,
    /// Date withdrawn.
    pub withdrawn_on: Option<NaiveDate>,
    /// Resignation date.
    pub resignation_date: NaiveDate,
    /// Last working day.
    pub last_working_date: NaiveDate,
}

/// Builds the status timeline.
pub fn status_timeline(facts: TimelineFacts, exit: &ExitProgress, today: NaiveDate) -> Vec<TimelineEntry> {
    use ResignationStatus as S;

    let mut timeline = vec![TimelineEntry::done(
        TimelineStage::Applied,
        "Resignation Applied",
        Some(facts.applied_on),
    )];

    if matches!(facts.status, S::UnderReview | S::Accepted | S::Rejected | S::Completed) {
        timeline.push(TimelineEntry::done(
            TimelineStage::UnderReview,
            "Under Manager Review",
            facts.applied_on.succ_opt(),
        ));
    }

    match facts.status {
        S::Accepted | S::Completed => {
            timeline.push(TimelineEntry::done(
                TimelineStage::Accepted,
                "Resignation Accepted",
                facts.decided_on,
            ));

            let notice = notice_progress(
                S::Accepted,
                facts.resignation_date,
                facts.last_working_date,
                today,
            );
            match notice {
                Some(progress) if !progress.is_completed && facts.status == S::Accepted => {
                    timeline.push(TimelineEntry::in_progress(
                        TimelineStage::ServingNotice,
                        format!(
                            "Serving Notice Period ({} days remaining)",
                            progress.days_remaining
                        ),
                        Some(facts.resignation_date),
                    ));
                }
                _ => timeline.push(TimelineEntry::done(
                    TimelineStage::NoticeCompleted,
                    "Notice Period Completed",
                    Some(facts.last_working_date),
                )),
            }

            if facts.status == S::Completed || exit.is_complete() {
                timeline.push(TimelineEntry::done(
                    TimelineStage::Completed,
                    "Exit Process Completed",
                    Some(facts.last_working_date),
                ));
            } else {
                timeline.push(TimelineEntry::in_progress(
                    TimelineStage::ExitProcess,
                    format!(
                        "Exit Process ({}/{} tasks)",
                        exit.checklist_completed, exit.checklist_total
                    ),
                    None,
                ));
            }
        }
        S::Rejected => timeline.push(TimelineEntry::done(
            TimelineStage::Rejected,
            "Resignation Rejected",
            facts.decided_on,
        )),
        S::Withdrawn => timeline.push(TimelineEntry::done(
            TimelineStage::Withdrawn,
            "Resignation Withdrawn",
            facts.withdrawn_on,
        )),
        S::Applied | S::UnderReview => {}
    }

    timeline
}

/// Certificate number `NDC{employee_code}{YYYYMMDD}`.
pub fn no_due_certificate_number(employee_code: &str, issue_date: NaiveDate) -> String {
    format!("NDC{}{}", employee_code, issue_date.format("%Y%m%d"))
}

/// Final settlement: pending salary plus bonus minus deductions.
pub fn final_settlement(pending_salary: Decimal, pending_bonus: Decimal, deductions: Decimal) -> Decimal {
    pending_salary + pending_bonus - deductions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn no_progress() -> ExitProgress {
        exit_progress(
            ExitFacts {
                checklist_completed: 0,
                checklist_total: 10,
                no_due_completed: false,
                exit_interview_completed: false,
                has_final_settlement: false,
            },
            d(2026, 6, 1),
            d(2026, 4, 1),
        )
    }

    #[test]
    fn test_checklist_due_dates() {
        let tasks = exit_checklist(d(2026, 6, 30));
        assert_eq!(tasks.len(), 10);
        assert_eq!(tasks[1].task, "Knowledge Transfer Documentation");
        assert_eq!(tasks[1].due_date, d(2026, 6, 23));
        assert_eq!(tasks[5].due_date, d(2026, 6, 30));
    }

    #[test]
    fn test_notice_progress_only_when_accepted() {
        assert!(notice_progress(ResignationStatus::Applied, d(2026, 4, 1), d(2026, 5, 31), d(2026, 4, 10)).is_none());
    }

    #[test]
    fn test_notice_progress_midway() {
        let progress = notice_progress(ResignationStatus::Accepted, d(2026, 4, 1), d(2026, 5, 31), d(2026, 5, 1)).unwrap();
        assert_eq!(progress.total_days, 60);
        assert_eq!(progress.days_completed, 30);
        assert_eq!(progress.days_remaining, 30);
        assert_eq!(progress.completion_percentage, Decimal::from(50));
        assert!(!progress.is_completed);
    }

    #[test]
    fn test_notice_progress_after_last_day() {
        let progress = notice_progress(ResignationStatus::Accepted, d(2026, 4, 1), d(2026, 5, 31), d(2026, 6, 10)).unwrap();
        assert_eq!(progress.days_completed, 60);
        assert!(progress.is_completed);
    }

    #[test]
    fn test_exit_progress_on_track_rule() {
        let progress = exit_progress(
            ExitFacts {
                checklist_completed: 10,
                checklist_total: 10,
                no_due_completed: true,
                exit_interview_completed: true,
                has_final_settlement: true,
            },
            d(2026, 5, 31),
            d(2026, 5, 1),
        );
        assert!(progress.is_on_track);
        assert!(progress.is_complete());
        assert_eq!(progress.days_until_exit, 30);

        let lagging = exit_progress(
            ExitFacts {
                checklist_completed: 1,
                checklist_total: 10,
                no_due_completed: false,
                exit_interview_completed: false,
                has_final_settlement: false,
            },
            d(2026, 5, 31),
            d(2026, 5, 21),
        );
        assert!(!lagging.is_on_track);
    }

    #[test]
    fn test_timeline_for_applied() {
        let facts = TimelineFacts {
            status: ResignationStatus::Applied,
            applied_on: d(2026, 4, 1),
            decided_on: None,
            withdrawn_on: None,
            resignation_date: d(2026, 4, 1),
            last_working_date: d(2026, 5, 31),
        };
        let timeline = status_timeline(facts, &no_progress(), d(2026, 4, 2));
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].stage, TimelineStage::Applied);
    }

    #[test]
    fn test_timeline_for_accepted_serving_notice() {
        let facts = TimelineFacts {
            status: ResignationStatus::Accepted,
            applied_on: d(2026, 4, 1),
            decided_on: Some(d(2026, 4, 3)),
            withdrawn_on: None,
            resignation_date: d(2026, 4, 1),
            last_working_date: d(2026, 5, 31),
        };
        let timeline = status_timeline(facts, &no_progress(), d(2026, 5, 1));
        let stages: Vec<_> = timeline.iter().map(|t| t.stage).collect();
        assert_eq!(
            stages,
            vec![
                TimelineStage::Applied,
                TimelineStage::UnderReview,
                TimelineStage::Accepted,
                TimelineStage::ServingNotice,
                TimelineStage::ExitProcess,
            ]
        );
        assert_eq!(timeline[3].label, "Serving Notice Period (30 days remaining)");
        assert_eq!(timeline[4].label, "Exit Process (0/10 tasks)");
    }

    #[test]
    fn test_timeline_for_withdrawn() {
        let facts = TimelineFacts {
            status: ResignationStatus::Withdrawn,
            applied_on: d(2026, 4, 1),
            decided_on: None,
            withdrawn_on: Some(d(2026, 4, 5)),
            resignation_date: d(2026, 4, 1),
            last_working_date: d(2026, 5, 31),
        };
        let timeline = status_timeline(facts, &no_progress(), d(2026, 4, 6));
        assert_eq!(timeline.last().unwrap().stage, TimelineStage::Withdrawn);
        assert_eq!(timeline.last().unwrap().date, Some(d(2026, 4, 5)));
    }

    #[test]
    fn test_certificate_number_and_settlement() {
        assert_eq!(no_due_certificate_number("EMP007", d(2026, 5, 31)), "NDCEMP00720260531");
        assert_eq!(
            final_settlement(Decimal::from(30000), Decimal::from(5000), Decimal::from(2000)),
            Decimal::from(33000)
        );
    }
}
