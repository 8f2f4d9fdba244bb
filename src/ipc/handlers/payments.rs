use chrono::NaiveDate;
use serde_json::json;

use crate::api::ApiClient;
use crate::ipc::helpers::{get_required_str, parse_field, with_api, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::{PaymentInput, PaymentMethod};
use crate::payments::payment_rows;
use crate::validate::validate_payment_input;

/// Grouped payment table for one student, with the server-side financial
/// aggregates passed through untouched.
fn rows(api: &ApiClient, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let s = api.get_student(&student_id)?;
    Ok(json!({
        "rows": payment_rows(&s.payments),
        "totals": {
            "totalPayment": s.total_payment,
            "totalDebt": s.total_debt,
            "paidAmount": s.paid_amount,
            "remainingDebt": s.remaining_debt,
        },
    }))
}

fn mark_paid(api: &ApiClient, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let payment_id = get_required_str(params, "paymentId")?;
    let method: PaymentMethod = parse_field(params, "method")?;
    let payment_date: NaiveDate = parse_field(params, "paymentDate")?;
    let payment = api.mark_payment_paid(&payment_id, method, payment_date)?;
    log::info!("payment {} marked paid ({})", payment_id, method.as_str());
    Ok(json!({ "payment": payment }))
}

fn delete(api: &ApiClient, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let payment_id = get_required_str(params, "paymentId")?;
    api.delete_payment(&payment_id)?;
    log::info!("payment {} deleted", payment_id);
    Ok(json!({ "deleted": true }))
}

fn create(api: &ApiClient, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let input: PaymentInput = parse_field(params, "input")?;
    validate_payment_input(&input)?;
    let payment = api.create_payment(&student_id, &input)?;
    log::info!("payment {} recorded for student {}", payment.id, student_id);
    Ok(json!({ "payment": payment }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "payments.rows" => Some(with_api(state, req, rows)),
        "payments.markPaid" => Some(with_api(state, req, mark_paid)),
        "payments.delete" => Some(with_api(state, req, delete)),
        "payments.create" => Some(with_api(state, req, create)),
        _ => None,
    }
}
