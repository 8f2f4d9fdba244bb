use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use serde_json::json;

use crate::api::ApiClient;
use crate::ipc::helpers::{
    get_required_str, parse_field, parse_optional_field, parse_params, with_api, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::lessons;
use crate::model::{DrivingLesson, LessonFilter, Student};
use crate::notify::{self, Recipient};
use crate::validate::ValidationError;

/// Lesson record plus the actions the UI may offer for it.
fn lesson_view(l: &DrivingLesson) -> serde_json::Value {
    let mut v = json!(l);
    v["availableActions"] = json!(lessons::available_actions(l));
    v
}

fn eligible_students(api: &ApiClient, _params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let students = api.eligible_students()?;
    Ok(json!({ "students": students }))
}

fn lessons_list(api: &ApiClient, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let filter: LessonFilter = parse_params(params)?;
    let rows: Vec<serde_json::Value> = api.list_lessons(&filter)?.iter().map(lesson_view).collect();
    Ok(json!({ "lessons": rows }))
}

fn schedule_tomorrow(api: &ApiClient, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let student_ids: Vec<String> = parse_field(params, "studentIds")?;
    if student_ids.is_empty() {
        return Err(HandlerErr::bad_params("studentIds boş olamaz"));
    }
    let date: NaiveDate = parse_optional_field(params, "date")?
        .unwrap_or_else(|| lessons::default_schedule_date(Local::now().date_naive()));

    // Eligible students carry the phones and instructor links the
    // notification drafts need; fetch them before the batch mutates
    // anything.
    let eligible = api.eligible_students()?;
    let by_id: HashMap<&str, &Student> = eligible.iter().map(|s| (s.id.as_str(), s)).collect();

    let outcomes = api.schedule_tomorrow(&student_ids, Some(date))?;

    let mut notices = Vec::new();
    let mut per_instructor: HashMap<String, usize> = HashMap::new();
    for o in outcomes.iter().filter(|o| o.success) {
        if let Some(s) = by_id.get(o.student_id.as_str()) {
            notices.push(notify::schedule_notice(Recipient::from_student(s), date, None));
            if let Some(iid) = &s.instructor_id {
                *per_instructor.entry(iid.clone()).or_default() += 1;
            }
        }
    }
    if !per_instructor.is_empty() {
        // Roster drafts are best effort: the batch already ran, so a
        // failed instructor lookup must not turn the result into an error.
        match api.list_instructors() {
            Ok(instructors) => {
                for i in &instructors {
                    if let Some(count) = per_instructor.get(&i.id) {
                        notices.push(notify::roster_notice(
                            Recipient::from_instructor(i),
                            date,
                            *count,
                        ));
                    }
                }
            }
            Err(e) => log::warn!("instructor roster drafts skipped: {}", e),
        }
    }

    let scheduled = outcomes.iter().filter(|o| o.success).count();
    log::info!(
        "schedule batch for {}: {} ok, {} failed",
        date,
        scheduled,
        outcomes.len() - scheduled
    );
    Ok(json!({
        "date": date,
        "outcomes": outcomes,
        "scheduled": scheduled,
        "failed": outcomes.len() - scheduled,
        "notices": notices,
    }))
}

fn set_time(api: &ApiClient, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let lesson_id = get_required_str(params, "lessonId")?;
    let time = get_required_str(params, "scheduledTime")?;
    if lessons::parse_lesson_time(&time).is_none() {
        return Err(ValidationError {
            field: "scheduledTime",
            message: "Saat HH:MM biçiminde olmalı".to_string(),
        }
        .into());
    }
    let lesson = api.set_lesson_time(&lesson_id, time.trim())?;
    Ok(json!({ "lesson": lesson_view(&lesson) }))
}

fn instructor_done(api: &ApiClient, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let lesson_id = get_required_str(params, "lessonId")?;
    let notes: Option<String> = parse_optional_field(params, "notes")?;
    let actual_duration: Option<u32> = parse_optional_field(params, "actualDuration")?;
    let lesson = api.mark_instructor_done(&lesson_id, notes.as_deref(), actual_duration)?;
    log::info!("lesson {} marked done by instructor", lesson_id);
    Ok(json!({ "lesson": lesson_view(&lesson) }))
}

fn cancel(api: &ApiClient, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let lesson_id = get_required_str(params, "lessonId")?;
    // No local pre-check on status: the server decides, and its message
    // comes back to the UI word for word.
    api.cancel_lesson(&lesson_id)?;
    log::info!("lesson {} cancelled", lesson_id);
    Ok(json!({ "cancelled": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "lessons.eligibleStudents" => Some(with_api(state, req, eligible_students)),
        "lessons.list" => Some(with_api(state, req, lessons_list)),
        "lessons.scheduleTomorrow" => Some(with_api(state, req, schedule_tomorrow)),
        "lessons.setTime" => Some(with_api(state, req, set_time)),
        "lessons.markInstructorDone" => Some(with_api(state, req, instructor_done)),
        "lessons.cancel" => Some(with_api(state, req, cancel)),
        _ => None,
    }
}
