//! Driving-lesson lifecycle.
//!
//! The server owns every transition; this module encodes which actions
//! are worth offering for a lesson in a given state, so the UI can gate
//! its buttons without a round trip. `COMPLETED` and `NO_SHOW` are
//! produced by server-side confirmation logic only; the client reads
//! them but never requests them.

use chrono::{Days, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::model::{DrivingLesson, LessonStatus};

/// Mutations the client can request on an existing lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LessonAction {
    SetTime,
    MarkInstructorDone,
    Cancel,
}

pub fn is_terminal(status: LessonStatus) -> bool {
    matches!(
        status,
        LessonStatus::Completed | LessonStatus::Cancelled | LessonStatus::NoShow
    )
}

/// Whether `action` is meaningful for a lesson currently in `status`.
/// Advisory only: the dispatching handler does not re-check, the server
/// is the authority and its rejection is surfaced verbatim.
pub fn allows(status: LessonStatus, action: LessonAction) -> bool {
    match action {
        LessonAction::SetTime => {
            matches!(status, LessonStatus::Planned | LessonStatus::Scheduled)
        }
        LessonAction::MarkInstructorDone => status == LessonStatus::Scheduled,
        LessonAction::Cancel => !is_terminal(status),
    }
}

pub fn available_actions(lesson: &DrivingLesson) -> Vec<LessonAction> {
    [
        LessonAction::SetTime,
        LessonAction::MarkInstructorDone,
        LessonAction::Cancel,
    ]
    .into_iter()
    .filter(|a| allows(lesson.status, *a))
    .collect()
}

/// Default date for the bulk scheduler: the day after `today`.
pub fn default_schedule_date(today: NaiveDate) -> NaiveDate {
    today + Days::new(1)
}

/// "HH:MM", 24-hour clock.
pub fn parse_lesson_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(status: LessonStatus) -> DrivingLesson {
        DrivingLesson {
            id: "l1".to_string(),
            student_id: "s1".to_string(),
            instructor_id: "i1".to_string(),
            lesson_number: 3,
            scheduled_date: NaiveDate::from_ymd_opt(2026, 3, 10),
            scheduled_time: Some("09:00".to_string()),
            scheduled_by: None,
            status,
            instructor_completed_at: None,
            student_confirmed_at: None,
            actual_duration: None,
            notes: None,
        }
    }

    #[test]
    fn set_time_only_before_instructor_done() {
        assert!(allows(LessonStatus::Planned, LessonAction::SetTime));
        assert!(allows(LessonStatus::Scheduled, LessonAction::SetTime));
        assert!(!allows(LessonStatus::InstructorDone, LessonAction::SetTime));
        assert!(!allows(LessonStatus::Completed, LessonAction::SetTime));
    }

    #[test]
    fn instructor_done_only_from_scheduled() {
        assert!(allows(LessonStatus::Scheduled, LessonAction::MarkInstructorDone));
        assert!(!allows(LessonStatus::Planned, LessonAction::MarkInstructorDone));
        assert!(!allows(LessonStatus::InstructorDone, LessonAction::MarkInstructorDone));
    }

    #[test]
    fn cancel_from_any_non_terminal_state() {
        assert!(allows(LessonStatus::Planned, LessonAction::Cancel));
        assert!(allows(LessonStatus::Scheduled, LessonAction::Cancel));
        assert!(allows(LessonStatus::InstructorDone, LessonAction::Cancel));
        assert!(!allows(LessonStatus::Cancelled, LessonAction::Cancel));
        assert!(!allows(LessonStatus::Completed, LessonAction::Cancel));
        assert!(!allows(LessonStatus::NoShow, LessonAction::Cancel));
    }

    #[test]
    fn terminal_lessons_offer_nothing() {
        assert!(available_actions(&lesson(LessonStatus::NoShow)).is_empty());
        assert_eq!(
            available_actions(&lesson(LessonStatus::Scheduled)),
            vec![
                LessonAction::SetTime,
                LessonAction::MarkInstructorDone,
                LessonAction::Cancel
            ]
        );
    }

    #[test]
    fn tomorrow_rolls_over_month_end() {
        let d = default_schedule_date(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    }

    #[test]
    fn lesson_time_format() {
        assert!(parse_lesson_time("09:30").is_some());
        assert!(parse_lesson_time(" 21:05 ").is_some());
        assert!(parse_lesson_time("9h30").is_none());
        assert!(parse_lesson_time("25:00").is_none());
    }
}
