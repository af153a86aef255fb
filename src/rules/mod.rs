//! Pure business rules.
//!
//! Every function in this module is synchronous and free of I/O. The
//! services fetch rows, call these rules, and persist the results. Leave
//! rules return an [`AuditStep`](crate::models::AuditStep) alongside their
//! result so decisions can be explained to HR.

mod accrual;
mod attendance;
mod balance;
mod carry_forward;
mod exit;
mod leave_split;
mod optional_quota;
mod probation;
mod salary;
mod tenure;
mod working_days;

pub use accrual::{
    initial_earned_allocation, monthly_accrual, AccrualDecision, AccrualFacts, AccrualOutcome,
    EarnedAllocation,
};
pub use attendance::{
    classify_worked_minutes, format_minutes, punctuality, standard_minutes, summarize_day,
    DayStatus, DaySummary, Punctuality,
};
pub use balance::BalanceFigures;
pub use carry_forward::{carry_forward, CarryForwardResult};
pub use exit::{
    exit_checklist, exit_progress, final_settlement, no_due_certificate_number, notice_progress,
    status_timeline, ChecklistTask, ExitFacts, ExitProgress, NoticeProgress, TimelineEntry,
    TimelineFacts, TimelineStage, EXIT_CHECKLIST,
};
pub use leave_split::{split_paid_unpaid, SplitOutcome, SplitPlan};
pub use optional_quota::{check_optional_quota, OptionalQuotaCheck};
pub use probation::{
    months_after_probation, probation_audit_step, probation_end_date, probation_status,
    ProbationStatus,
};
pub use salary::{
    amount_in_words, component_default_amount, loss_of_pay, quick_salary, salary_totals,
    QuickSalary, SalaryLine, SalaryTotals,
};
pub use tenure::{completed_years, is_anniversary};
pub use working_days::{count_working_days, CalendarHoliday, WorkingDaysResult};
