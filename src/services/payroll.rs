//! Salary components, salary structures, payroll runs and payslips.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::entities::{
    self, employee, employee_salary, employee_salary_component, leave, leave_type,
    payroll_run, payroll_run_employee, payslip, payslip_component, salary_component,
    CalculationType, ComponentType, LeaveKind, LeaveStatus, PayrollStatus, PayslipStatus,
};
use crate::error::{HrmsError, HrmsResult};
use crate::rules::{
    amount_in_words, component_default_amount, count_working_days, loss_of_pay, salary_totals,
    SalaryLine, SalaryTotals,
};

use super::catalog;

/// Name of the deduction line added for unpaid leave.
pub const LOSS_OF_PAY: &str = "Loss of Pay";

/// Input for a new salary component.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSalaryComponent {
    pub name: String,
    pub component_type: ComponentType,
    pub calculation_type: CalculationType,
    pub value: Decimal,
    #[serde(default)]
    pub percentage_of: Option<String>,
    #[serde(default)]
    pub is_taxable: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update of a salary component.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalaryComponentUpdate {
    pub name: Option<String>,
    pub component_type: Option<ComponentType>,
    pub calculation_type: Option<CalculationType>,
    pub value: Option<Decimal>,
    pub percentage_of: Option<String>,
    pub is_taxable: Option<bool>,
    pub description: Option<String>,
}

fn validate_component_value(calculation_type: CalculationType, value: Decimal) -> HrmsResult<()> {
    if value < Decimal::ZERO {
        return Err(HrmsError::validation("value", "must not be negative"));
    }
    if calculation_type == CalculationType::Percentage && value > Decimal::ONE_HUNDRED {
        return Err(HrmsError::validation("value", "a percentage cannot exceed 100"));
    }
    Ok(())
}

async fn ensure_component_name_free<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except: Option<i32>,
) -> HrmsResult<()> {
    let mut query =
        entities::SalaryComponent::find().filter(salary_component::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(salary_component::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(HrmsError::Duplicate {
            entity: "Salary component".to_string(),
            key: name.to_string(),
        });
    }
    Ok(())
}

async fn find_component<C: ConnectionTrait>(db: &C, id: i32) -> HrmsResult<salary_component::Model> {
    entities::SalaryComponent::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Salary component", id))
}

/// Adds a salary component to the catalogue.
pub async fn create_component<C: ConnectionTrait>(
    db: &C,
    input: NewSalaryComponent,
) -> HrmsResult<salary_component::Model> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(HrmsError::validation("name", "is required"));
    }
    validate_component_value(input.calculation_type, input.value)?;
    ensure_component_name_free(db, &name, None).await?;

    let component = salary_component::ActiveModel {
        name: Set(name),
        component_type: Set(input.component_type),
        calculation_type: Set(input.calculation_type),
        value: Set(input.value),
        percentage_of: Set(input.percentage_of),
        is_taxable: Set(input.is_taxable),
        is_active: Set(true),
        description: Set(input.description),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(component = %component.name, "Salary component created");
    Ok(component)
}

/// Updates the fields present in `update`.
pub async fn update_component<C: ConnectionTrait>(
    db: &C,
    id: i32,
    update: SalaryComponentUpdate,
) -> HrmsResult<salary_component::Model> {
    let current = find_component(db, id).await?;
    let calculation_type = update.calculation_type.unwrap_or(current.calculation_type);
    let value = update.value.unwrap_or(current.value);
    validate_component_value(calculation_type, value)?;

    let mut active: salary_component::ActiveModel = current.into();
    if let Some(name) = update.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(HrmsError::validation("name", "is required"));
        }
        ensure_component_name_free(db, &name, Some(id)).await?;
        active.name = Set(name);
    }
    if let Some(component_type) = update.component_type {
        active.component_type = Set(component_type);
    }
    active.calculation_type = Set(calculation_type);
    active.value = Set(value);
    if update.percentage_of.is_some() {
        active.percentage_of = Set(update.percentage_of);
    }
    if let Some(is_taxable) = update.is_taxable {
        active.is_taxable = Set(is_taxable);
    }
    if update.description.is_some() {
        active.description = Set(update.description);
    }
    Ok(active.update(db).await?)
}

/// Flips a component between active and inactive.
pub async fn toggle_component<C: ConnectionTrait>(db: &C, id: i32) -> HrmsResult<salary_component::Model> {
    let current = find_component(db, id).await?;
    let is_active = !current.is_active;
    let mut active: salary_component::ActiveModel = current.into();
    active.is_active = Set(is_active);
    let component = active.update(db).await?;
    info!(component = %component.name, is_active, "Salary component toggled");
    Ok(component)
}

/// Deletes a component that no salary structure uses.
pub async fn delete_component<C: ConnectionTrait>(db: &C, id: i32) -> HrmsResult<()> {
    let component = find_component(db, id).await?;
    let in_use = entities::EmployeeSalaryComponent::find()
        .filter(employee_salary_component::Column::ComponentId.eq(id))
        .one(db)
        .await?
        .is_some();
    if in_use {
        return Err(HrmsError::validation(
            "id",
            format!("{} is used by a salary structure; deactivate it instead", component.name),
        ));
    }
    entities::SalaryComponent::delete_by_id(id).exec(db).await?;
    info!(component = %component.name, "Salary component deleted");
    Ok(())
}

/// Lists components by type then name.
pub async fn list_components<C: ConnectionTrait>(
    db: &C,
    include_inactive: bool,
) -> HrmsResult<Vec<salary_component::Model>> {
    let mut query = entities::SalaryComponent::find();
    if !include_inactive {
        query = query.filter(salary_component::Column::IsActive.eq(true));
    }
    Ok(query
        .order_by_asc(salary_component::Column::ComponentType)
        .order_by_asc(salary_component::Column::Name)
        .all(db)
        .await?)
}

/// One component of a new salary structure.
#[derive(Debug, Clone, Deserialize)]
pub struct SalaryLineInput {
    pub component_id: i32,
    /// Defaults to the component's fixed value or percentage of basic.
    #[serde(default)]
    pub amount: Option<Decimal>,
}

/// Input for a new salary structure.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSalaryStructure {
    pub actor_id: i32,
    pub employee_id: i32,
    pub effective_date: NaiveDate,
    pub basic_salary: Decimal,
    #[serde(default)]
    pub components: Vec<SalaryLineInput>,
}

/// A salary structure with its lines and totals.
#[derive(Debug, Clone, Serialize)]
pub struct SalaryStructure {
    pub salary: employee_salary::Model,
    pub lines: Vec<SalaryLine>,
    pub totals: SalaryTotals,
}

/// Creates an employee's salary structure and makes it the active one.
///
/// The previously active structure is deactivated and the employee's
/// basic salary is updated.
pub async fn create_salary_structure(
    db: &DatabaseConnection,
    input: NewSalaryStructure,
    now: NaiveDateTime,
) -> HrmsResult<SalaryStructure> {
    if input.basic_salary <= Decimal::ZERO {
        return Err(HrmsError::validation("basic_salary", "must be positive"));
    }

    let txn = db.begin().await?;
    super::require_hr(&txn, input.actor_id).await?;
    let employee = super::find_employee(&txn, input.employee_id).await?;

    let mut seen = HashSet::new();
    let mut lines = Vec::with_capacity(input.components.len());
    for line in &input.components {
        if !seen.insert(line.component_id) {
            return Err(HrmsError::validation(
                "components",
                format!("component {} listed twice", line.component_id),
            ));
        }
        let component = find_component(&txn, line.component_id).await?;
        if !component.is_active {
            return Err(HrmsError::validation(
                "components",
                format!("{} is not active", component.name),
            ));
        }
        let amount = line.amount.unwrap_or_else(|| {
            component_default_amount(component.calculation_type, component.value, input.basic_salary)
        });
        if amount < Decimal::ZERO {
            return Err(HrmsError::validation("components", "amounts must not be negative"));
        }
        lines.push(SalaryLine {
            component_id: Some(component.id),
            name: component.name,
            component_type: component.component_type,
            amount,
        });
    }
    let totals = salary_totals(input.basic_salary, &lines);

    entities::EmployeeSalary::update_many()
        .col_expr(employee_salary::Column::IsActive, Expr::value(false))
        .filter(employee_salary::Column::EmployeeId.eq(employee.id))
        .filter(employee_salary::Column::IsActive.eq(true))
        .exec(&txn)
        .await?;

    let salary = employee_salary::ActiveModel {
        employee_id: Set(employee.id),
        effective_date: Set(input.effective_date),
        basic_salary: Set(input.basic_salary),
        gross_salary: Set(totals.gross),
        net_salary: Set(totals.net),
        is_active: Set(true),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for line in &lines {
        if let Some(component_id) = line.component_id {
            employee_salary_component::ActiveModel {
                employee_salary_id: Set(salary.id),
                component_id: Set(component_id),
                amount: Set(line.amount),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    let mut person: employee::ActiveModel = employee.into();
    person.basic_salary = Set(Some(input.basic_salary));
    person.update(&txn).await?;
    txn.commit().await?;

    info!(
        employee_id = input.employee_id,
        gross = %totals.gross,
        net = %totals.net,
        "Salary structure created"
    );
    Ok(SalaryStructure {
        salary,
        lines,
        totals,
    })
}

async fn structure_lines<C: ConnectionTrait>(
    db: &C,
    salary: &employee_salary::Model,
) -> HrmsResult<Vec<SalaryLine>> {
    let rows = entities::EmployeeSalaryComponent::find()
        .filter(employee_salary_component::Column::EmployeeSalaryId.eq(salary.id))
        .order_by_asc(employee_salary_component::Column::Id)
        .all(db)
        .await?;
    let components: HashMap<i32, salary_component::Model> = entities::SalaryComponent::find()
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let component = components.get(&row.component_id)?;
            Some(SalaryLine {
                component_id: Some(component.id),
                name: component.name.clone(),
                component_type: component.component_type,
                amount: row.amount,
            })
        })
        .collect())
}

/// The employee's active salary structure, if any.
pub async fn active_salary<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
) -> HrmsResult<Option<SalaryStructure>> {
    let Some(salary) = entities::EmployeeSalary::find()
        .filter(employee_salary::Column::EmployeeId.eq(employee_id))
        .filter(employee_salary::Column::IsActive.eq(true))
        .order_by_desc(employee_salary::Column::Id)
        .one(db)
        .await?
    else {
        return Ok(None);
    };
    let lines = structure_lines(db, &salary).await?;
    let totals = salary_totals(salary.basic_salary, &lines);
    Ok(Some(SalaryStructure {
        salary,
        lines,
        totals,
    }))
}

/// Input for a new payroll run.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPayrollRun {
    pub actor_id: i32,
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub employee_ids: Vec<i32>,
}

/// An employee that can be selected for a payroll run.
#[derive(Debug, Clone, Serialize)]
pub struct AvailableEmployee {
    pub employee_id: i32,
    pub employee_code: String,
    pub name: String,
    pub department: Option<String>,
    pub gross_salary: Decimal,
    pub net_salary: Decimal,
}

/// Active employees with an active salary structure.
pub async fn available_employees<C: ConnectionTrait>(db: &C) -> HrmsResult<Vec<AvailableEmployee>> {
    let salaries: HashMap<i32, employee_salary::Model> = entities::EmployeeSalary::find()
        .filter(employee_salary::Column::IsActive.eq(true))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.employee_id, s))
        .collect();
    let people = entities::Employee::find()
        .filter(employee::Column::Status.eq(entities::EmployeeStatus::Active))
        .order_by_asc(employee::Column::EmployeeCode)
        .all(db)
        .await?;

    Ok(people
        .into_iter()
        .filter_map(|person| {
            let salary = salaries.get(&person.id)?;
            Some(AvailableEmployee {
                employee_id: person.id,
                name: person.full_name(),
                employee_code: person.employee_code,
                department: person.department,
                gross_salary: salary.gross_salary,
                net_salary: salary.net_salary,
            })
        })
        .collect())
}

async fn find_run<C: ConnectionTrait>(db: &C, id: i32) -> HrmsResult<payroll_run::Model> {
    entities::PayrollRun::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Payroll run", id))
}

/// Creates a draft payroll run for the selected employees.
pub async fn create_payroll_run(
    db: &DatabaseConnection,
    input: NewPayrollRun,
    now: NaiveDateTime,
) -> HrmsResult<payroll_run::Model> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(HrmsError::validation("name", "is required"));
    }
    catalog::month_bounds(input.year, input.month)?;
    let mut employee_ids = input.employee_ids.clone();
    employee_ids.sort_unstable();
    employee_ids.dedup();
    if employee_ids.is_empty() {
        return Err(HrmsError::validation("employee_ids", "select at least one employee"));
    }

    let txn = db.begin().await?;
    super::require_hr(&txn, input.actor_id).await?;
    let month = input.month as i32;
    let existing = entities::PayrollRun::find()
        .filter(payroll_run::Column::Name.eq(name.as_str()))
        .filter(payroll_run::Column::Year.eq(input.year))
        .filter(payroll_run::Column::Month.eq(month))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(HrmsError::Duplicate {
            entity: "Payroll run".to_string(),
            key: format!("{} {}-{:02}", name, input.year, input.month),
        });
    }
    for id in &employee_ids {
        super::find_employee(&txn, *id).await?;
    }

    let run = payroll_run::ActiveModel {
        name: Set(name),
        year: Set(input.year),
        month: Set(month),
        status: Set(PayrollStatus::Draft),
        total_employees: Set(employee_ids.len() as i32),
        total_amount: Set(Decimal::ZERO),
        processed_by: Set(None),
        processed_at: Set(None),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    for employee_id in employee_ids {
        payroll_run_employee::ActiveModel {
            payroll_run_id: Set(run.id),
            employee_id: Set(employee_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }
    txn.commit().await?;

    info!(run_id = run.id, run = %run.name, year = run.year, month = run.month, "Payroll run created");
    Ok(run)
}

/// Why an employee got no payslip.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedEmployee {
    pub employee_id: i32,
    pub reason: String,
}

/// Outcome of processing a run.
#[derive(Debug, Clone, Serialize)]
pub struct PayrollProcessed {
    pub run: payroll_run::Model,
    pub payslips: Vec<payslip::Model>,
    pub skipped: Vec<SkippedEmployee>,
}

fn payslip_number(year: i32, month: i32, employee_code: &str, run_id: i32) -> String {
    format!("PS{}{:02}{}_{}", year, month, employee_code, run_id)
}

/// Approved unpaid leave days starting within `[start, end]`.
async fn unpaid_leave_days<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    start: NaiveDate,
    end: NaiveDate,
    unpaid_types: &HashSet<i32>,
) -> HrmsResult<Decimal> {
    Ok(entities::Leave::find()
        .filter(leave::Column::EmployeeId.eq(employee_id))
        .filter(leave::Column::Status.eq(LeaveStatus::Approved))
        .filter(leave::Column::StartDate.gte(start))
        .filter(leave::Column::StartDate.lte(end))
        .all(db)
        .await?
        .into_iter()
        .filter(|l| l.is_unpaid || unpaid_types.contains(&l.leave_type_id))
        .map(|l| l.days_requested)
        .sum())
}

async fn generate_payslips<C: ConnectionTrait>(
    db: &C,
    run: &payroll_run::Model,
    now: NaiveDateTime,
) -> HrmsResult<(Vec<payslip::Model>, Vec<SkippedEmployee>)> {
    let (start, end) = catalog::month_bounds(run.year, run.month as u32)?;
    let unpaid_types: HashSet<i32> = entities::LeaveType::find()
        .filter(leave_type::Column::Kind.eq(LeaveKind::Unpaid))
        .all(db)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();
    let selected = entities::PayrollRunEmployee::find()
        .filter(payroll_run_employee::Column::PayrollRunId.eq(run.id))
        .order_by_asc(payroll_run_employee::Column::EmployeeId)
        .all(db)
        .await?;

    let mut payslips = Vec::new();
    let mut skipped = Vec::new();
    for row in selected {
        let employee = super::find_employee(db, row.employee_id).await?;
        let Some(structure) = active_salary(db, employee.id).await? else {
            skipped.push(SkippedEmployee {
                employee_id: employee.id,
                reason: "no active salary structure".to_string(),
            });
            continue;
        };
        let existing = entities::Payslip::find()
            .filter(payslip::Column::PayrollRunId.eq(run.id))
            .filter(payslip::Column::EmployeeId.eq(employee.id))
            .one(db)
            .await?;
        if existing.is_some() {
            skipped.push(SkippedEmployee {
                employee_id: employee.id,
                reason: "payslip already generated".to_string(),
            });
            continue;
        }

        let holidays = catalog::calendar_holidays(db, start, end, employee.location.as_deref()).await?;
        let working_days = count_working_days(start, end, &holidays, 1).working_days;
        let lop_days = unpaid_leave_days(db, employee.id, start, end, &unpaid_types)
            .await?
            .min(Decimal::from(working_days));
        let lop_amount = loss_of_pay(structure.totals.gross, working_days, lop_days);

        let mut lines = structure.lines.clone();
        if lop_amount > Decimal::ZERO {
            lines.push(SalaryLine {
                component_id: None,
                name: LOSS_OF_PAY.to_string(),
                component_type: ComponentType::Deduction,
                amount: lop_amount,
            });
        }
        let totals = salary_totals(structure.salary.basic_salary, &lines);

        let slip = payslip::ActiveModel {
            payroll_run_id: Set(run.id),
            employee_id: Set(employee.id),
            payslip_number: Set(payslip_number(run.year, run.month, &employee.employee_code, run.id)),
            basic_salary: Set(structure.salary.basic_salary),
            gross_salary: Set(totals.gross),
            total_deductions: Set(totals.deductions),
            net_salary: Set(totals.net),
            working_days: Set(working_days as i32),
            paid_days: Set(Decimal::from(working_days) - lop_days),
            lop_days: Set(lop_days),
            status: Set(PayslipStatus::Generated),
            generated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        for line in lines {
            payslip_component::ActiveModel {
                payslip_id: Set(slip.id),
                component_id: Set(line.component_id),
                name: Set(line.name),
                component_type: Set(line.component_type),
                amount: Set(line.amount),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        payslips.push(slip);
    }
    Ok((payslips, skipped))
}

async fn set_run_status<C: ConnectionTrait>(
    db: &C,
    run: payroll_run::Model,
    status: PayrollStatus,
) -> HrmsResult<payroll_run::Model> {
    let mut active: payroll_run::ActiveModel = run.into();
    active.status = Set(status);
    Ok(active.update(db).await?)
}

/// Generates payslips for every selected employee of a draft run.
///
/// Employees without an active salary structure, or who already have a
/// payslip in the run, are skipped. The run moves through processing to
/// completed in one transaction, so a failure leaves it in draft with
/// nothing kept.
pub async fn process_payroll_run(
    db: &DatabaseConnection,
    run_id: i32,
    actor_id: i32,
    now: NaiveDateTime,
) -> HrmsResult<PayrollProcessed> {
    let txn = db.begin().await?;
    super::require_hr(&txn, actor_id).await?;
    let run = find_run(&txn, run_id).await?;
    if run.status != PayrollStatus::Draft {
        return Err(HrmsError::InvalidTransition {
            entity: "Payroll run".to_string(),
            from: format!("{:?}", run.status).to_lowercase(),
            to: "processing".to_string(),
        });
    }
    let run = set_run_status(&txn, run, PayrollStatus::Processing).await?;

    let (payslips, skipped) = match generate_payslips(&txn, &run, now).await {
        Ok(result) => result,
        Err(err) => {
            txn.rollback().await?;
            warn!(run_id, error = %err, "Payroll processing failed; run left in draft");
            return Err(err);
        }
    };

    let total_amount: Decimal = payslips.iter().map(|p| p.net_salary).sum();
    let mut active: payroll_run::ActiveModel = run.into();
    active.status = Set(PayrollStatus::Completed);
    active.total_employees = Set(payslips.len() as i32);
    active.total_amount = Set(total_amount);
    active.processed_by = Set(Some(actor_id));
    active.processed_at = Set(Some(now));
    let run = active.update(&txn).await?;
    txn.commit().await?;

    info!(
        run_id,
        generated = payslips.len(),
        skipped = skipped.len(),
        total = %total_amount,
        "Payroll run processed"
    );
    Ok(PayrollProcessed {
        run,
        payslips,
        skipped,
    })
}

/// Deletes a run that has not completed, with its selection and payslips.
pub async fn delete_payroll_run(db: &DatabaseConnection, run_id: i32, actor_id: i32) -> HrmsResult<()> {
    let txn = db.begin().await?;
    super::require_hr(&txn, actor_id).await?;
    let run = find_run(&txn, run_id).await?;
    if run.status == PayrollStatus::Completed {
        return Err(HrmsError::validation("id", "a completed payroll run cannot be deleted"));
    }

    let slip_ids: Vec<i32> = entities::Payslip::find()
        .filter(payslip::Column::PayrollRunId.eq(run_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    entities::PayslipComponent::delete_many()
        .filter(payslip_component::Column::PayslipId.is_in(slip_ids))
        .exec(&txn)
        .await?;
    entities::Payslip::delete_many()
        .filter(payslip::Column::PayrollRunId.eq(run_id))
        .exec(&txn)
        .await?;
    entities::PayrollRunEmployee::delete_many()
        .filter(payroll_run_employee::Column::PayrollRunId.eq(run_id))
        .exec(&txn)
        .await?;
    entities::PayrollRun::delete_by_id(run_id).exec(&txn).await?;
    txn.commit().await?;

    info!(run_id, run = %run.name, "Payroll run deleted");
    Ok(())
}

/// Lists runs, newest period first.
pub async fn list_payroll_runs<C: ConnectionTrait>(db: &C) -> HrmsResult<Vec<payroll_run::Model>> {
    Ok(entities::PayrollRun::find()
        .order_by_desc(payroll_run::Column::Year)
        .order_by_desc(payroll_run::Column::Month)
        .order_by_desc(payroll_run::Column::Id)
        .all(db)
        .await?)
}

/// A run with its selected employees and payslips.
#[derive(Debug, Clone, Serialize)]
pub struct PayrollRunDetail {
    pub run: payroll_run::Model,
    pub employee_ids: Vec<i32>,
    pub payslips: Vec<payslip::Model>,
}

/// Fetches a run with its selection and payslips.
pub async fn get_payroll_run<C: ConnectionTrait>(db: &C, run_id: i32) -> HrmsResult<PayrollRunDetail> {
    let run = find_run(db, run_id).await?;
    let employee_ids = entities::PayrollRunEmployee::find()
        .filter(payroll_run_employee::Column::PayrollRunId.eq(run_id))
        .order_by_asc(payroll_run_employee::Column::EmployeeId)
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.employee_id)
        .collect();
    let payslips = list_payslips(db, &PayslipFilter {
        payroll_run_id: Some(run_id),
        employee_id: None,
    })
    .await?;
    Ok(PayrollRunDetail {
        run,
        employee_ids,
        payslips,
    })
}

/// Filters for the payslip list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayslipFilter {
    pub payroll_run_id: Option<i32>,
    pub employee_id: Option<i32>,
}

/// Lists payslips by number.
pub async fn list_payslips<C: ConnectionTrait>(
    db: &C,
    filter: &PayslipFilter,
) -> HrmsResult<Vec<payslip::Model>> {
    let mut query = entities::Payslip::find();
    if let Some(run_id) = filter.payroll_run_id {
        query = query.filter(payslip::Column::PayrollRunId.eq(run_id));
    }
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(payslip::Column::EmployeeId.eq(employee_id));
    }
    Ok(query
        .order_by_asc(payslip::Column::PayslipNumber)
        .all(db)
        .await?)
}

/// A payslip with its lines, ready to print.
#[derive(Debug, Clone, Serialize)]
pub struct PayslipDetail {
    pub payslip: payslip::Model,
    pub employee_code: String,
    pub employee_name: String,
    pub period: String,
    pub earnings: Vec<payslip_component::Model>,
    pub deductions: Vec<payslip_component::Model>,
    pub net_in_words: String,
}

async fn find_payslip<C: ConnectionTrait>(db: &C, id: i32) -> HrmsResult<payslip::Model> {
    entities::Payslip::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Payslip", id))
}

/// Fetches a payslip with its earning and deduction lines.
pub async fn get_payslip<C: ConnectionTrait>(db: &C, id: i32) -> HrmsResult<PayslipDetail> {
    let payslip = find_payslip(db, id).await?;
    let run = find_run(db, payslip.payroll_run_id).await?;
    let employee = super::find_employee(db, payslip.employee_id).await?;
    let (earnings, deductions): (Vec<_>, Vec<_>) = entities::PayslipComponent::find()
        .filter(payslip_component::Column::PayslipId.eq(payslip.id))
        .order_by_asc(payslip_component::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .partition(|c| c.component_type == ComponentType::Earning);

    let period = NaiveDate::from_ymd_opt(run.year, run.month as u32, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", run.year, run.month));
    Ok(PayslipDetail {
        net_in_words: amount_in_words(payslip.net_salary),
        employee_code: employee.employee_code.clone(),
        employee_name: employee.full_name(),
        period,
        earnings,
        deductions,
        payslip,
    })
}

/// Moves a payslip forward: generated, then approved, then paid.
pub async fn update_payslip_status<C: ConnectionTrait>(
    db: &C,
    id: i32,
    status: PayslipStatus,
    actor_id: i32,
) -> HrmsResult<payslip::Model> {
    super::require_hr(db, actor_id).await?;
    let payslip = find_payslip(db, id).await?;
    let allowed = matches!(
        (payslip.status, status),
        (PayslipStatus::Generated, PayslipStatus::Approved)
            | (PayslipStatus::Approved, PayslipStatus::Paid)
    );
    if !allowed {
        return Err(HrmsError::InvalidTransition {
            entity: "Payslip".to_string(),
            from: format!("{:?}", payslip.status).to_lowercase(),
            to: format!("{:?}", status).to_lowercase(),
        });
    }
    let mut active: payslip::ActiveModel = payslip.into();
    active.status = Set(status);
    let payslip = active.update(db).await?;
    info!(payslip = %payslip.payslip_number, status = ?payslip.status, "Payslip status updated");
    Ok(payslip)
}

/// Months with at least one payslip for an employee, newest first.
pub async fn payslip_periods<C: ConnectionTrait>(db: &C, employee_id: i32) -> HrmsResult<Vec<(i32, u32)>> {
    let run_ids: HashSet<i32> = list_payslips(db, &PayslipFilter {
        payroll_run_id: None,
        employee_id: Some(employee_id),
    })
    .await?
    .into_iter()
    .map(|p| p.payroll_run_id)
    .collect();
    let mut periods: Vec<(i32, u32)> = list_payroll_runs(db)
        .await?
        .into_iter()
        .filter(|r| run_ids.contains(&r.id))
        .map(|r| (r.year, r.month as u32))
        .collect();
    periods.dedup();
    Ok(periods)
}
