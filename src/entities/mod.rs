//! Entity module - SeaORM entity definitions for every persisted table.
//! Each entity has a `Model` struct for data and an `Entity` struct for
//! queries; string-valued enums are stored via `DeriveActiveEnum`.

pub mod attendance;
pub mod celebration_wish;
pub mod comp_off_grant;
pub mod department;
pub mod designation;
pub mod employee;
pub mod employee_notice;
pub mod employee_salary;
pub mod employee_salary_component;
pub mod exit_interview;
pub mod holiday;
pub mod leave;
pub mod leave_balance;
pub mod leave_type;
pub mod location;
pub mod message_category;
pub mod message_subtype;
pub mod no_due_certificate;
pub mod payroll_run;
pub mod payroll_run_employee;
pub mod payslip;
pub mod payslip_component;
pub mod resignation;
pub mod resignation_checklist;
pub mod salary_component;
pub mod system_state;

pub use attendance::Entity as Attendance;
pub use celebration_wish::{CelebrationKind, Entity as CelebrationWish};
pub use comp_off_grant::Entity as CompOffGrant;
pub use department::Entity as Department;
pub use designation::Entity as Designation;
pub use employee::{EmployeeRole, EmployeeStatus, Entity as Employee};
pub use employee_notice::Entity as EmployeeNotice;
pub use employee_salary::Entity as EmployeeSalary;
pub use employee_salary_component::Entity as EmployeeSalaryComponent;
pub use exit_interview::Entity as ExitInterview;
pub use holiday::{Entity as Holiday, HolidayType};
pub use leave::{Entity as Leave, HalfDayPeriod, LeaveStatus};
pub use leave_balance::Entity as LeaveBalance;
pub use leave_type::{Entity as LeaveType, LeaveKind};
pub use location::Entity as Location;
pub use message_category::Entity as MessageCategory;
pub use message_subtype::Entity as MessageSubtype;
pub use no_due_certificate::{Entity as NoDueCertificate, SettlementMode};
pub use payroll_run::{Entity as PayrollRun, PayrollStatus};
pub use payroll_run_employee::Entity as PayrollRunEmployee;
pub use payslip::{Entity as Payslip, PayslipStatus};
pub use payslip_component::Entity as PayslipComponent;
pub use resignation::{Entity as Resignation, ExitStatus, ResignationStatus};
pub use resignation_checklist::Entity as ResignationChecklist;
pub use salary_component::{CalculationType, ComponentType, Entity as SalaryComponent};
pub use system_state::Entity as SystemState;
