use serde_json::json;

use crate::api::ApiClient;
use crate::exam;
use crate::ipc::helpers::{get_required_str, parse_field, parse_params, with_api, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::{ExamKind, ExamPatch, Student, StudentFilter, StudentInput};
use crate::payments::payment_rows;
use crate::validate::validate_student_input;

/// Student record plus everything the list/detail views derive from it.
pub fn student_view(s: &Student) -> serde_json::Value {
    let mut v = json!(s);
    v["examStatus"] = json!(exam::exam_status(s));
    v["overall"] = json!(exam::overall_status(s));
    v["canAttempt"] = json!({
        "written": exam::can_attempt(s, ExamKind::Written),
        "driving": exam::can_attempt(s, ExamKind::Driving),
    });
    v
}

fn views(students: &[Student]) -> Vec<serde_json::Value> {
    students.iter().map(student_view).collect()
}

fn students_list(api: &ApiClient, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let filter: StudentFilter = parse_params(params)?;
    let students = api.list_students(&filter)?;
    Ok(json!({ "students": views(&students) }))
}

fn students_get(api: &ApiClient, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(params, "studentId")?;
    let s = api.get_student(&id)?;
    let mut v = student_view(&s);
    v["paymentRows"] = json!(payment_rows(&s.payments));
    Ok(json!({ "student": v }))
}

fn students_create(api: &ApiClient, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let input: StudentInput = parse_field(params, "input")?;
    validate_student_input(&input)?;
    let s = api.create_student(&input)?;
    log::info!("student {} created", s.id);
    Ok(json!({ "student": student_view(&s) }))
}

fn students_update(api: &ApiClient, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(params, "studentId")?;
    let input: StudentInput = parse_field(params, "input")?;
    validate_student_input(&input)?;
    let s = api.update_student(&id, &input)?;
    Ok(json!({ "student": student_view(&s) }))
}

fn students_delete(api: &ApiClient, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(params, "studentId")?;
    api.delete_student(&id)?;
    log::info!("student {} deleted", id);
    Ok(json!({ "deleted": true }))
}

fn students_completed(api: &ApiClient, _params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let students = api.completed_students()?;
    Ok(json!({ "students": views(&students) }))
}

fn students_passed_written(
    api: &ApiClient,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let license_type = params.get("licenseType").and_then(|v| v.as_str());
    let students = api.passed_written_exam(license_type)?;
    Ok(json!({ "students": views(&students) }))
}

fn exams_mark(
    api: &ApiClient,
    params: &serde_json::Value,
    kind: ExamKind,
) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(params, "studentId")?;
    let patch: ExamPatch = parse_params(params)?;
    let s = match kind {
        ExamKind::Written => api.set_written_exam(&id, &patch)?,
        ExamKind::Driving => api.set_driving_exam(&id, &patch)?,
    };
    log::info!("student {} {} exam -> {}", id, kind.as_str(), patch.status.as_str());
    Ok(json!({ "student": student_view(&s) }))
}

fn exams_reset(api: &ApiClient, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(params, "studentId")?;
    let kind: ExamKind = parse_field(params, "examType")?;
    let s = api.reset_exam(&id, kind)?;
    log::info!("student {} {} exam reset", id, kind.as_str());
    Ok(json!({ "student": student_view(&s) }))
}

fn cohort_multiple_driving_failures(
    api: &ApiClient,
    _params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let students = api.list_students(&StudentFilter::default())?;
    let hits: Vec<serde_json::Value> = exam::multiple_driving_failures(&students)
        .into_iter()
        .map(student_view)
        .collect();
    Ok(json!({ "students": hits }))
}

fn cohort_rights_exhausted(
    api: &ApiClient,
    _params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let students = api.list_students(&StudentFilter::default())?;
    let hits: Vec<serde_json::Value> = exam::rights_exhausted(&students)
        .into_iter()
        .map(student_view)
        .collect();
    Ok(json!({ "students": hits }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(with_api(state, req, students_list)),
        "students.get" => Some(with_api(state, req, students_get)),
        "students.create" => Some(with_api(state, req, students_create)),
        "students.update" => Some(with_api(state, req, students_update)),
        "students.delete" => Some(with_api(state, req, students_delete)),
        "students.completed" => Some(with_api(state, req, students_completed)),
        "students.passedWrittenExam" => Some(with_api(state, req, students_passed_written)),
        "exams.markWritten" => Some(with_api(state, req, |api, p| {
            exams_mark(api, p, ExamKind::Written)
        })),
        "exams.markDriving" => Some(with_api(state, req, |api, p| {
            exams_mark(api, p, ExamKind::Driving)
        })),
        "exams.reset" => Some(with_api(state, req, exams_reset)),
        "cohorts.multipleDrivingFailures" => {
            Some(with_api(state, req, cohort_multiple_driving_failures))
        }
        "cohorts.rightsExhausted" => Some(with_api(state, req, cohort_rights_exhausted)),
        _ => None,
    }
}
