//! Exam progression derivations.
//!
//! Everything here is a pure function over [`ExamRecord`] / [`Student`];
//! the attempt counters themselves are maintained by the backend. The UI
//! renders the returned display strings verbatim, so the Turkish wording
//! is part of the contract.

use serde::Serialize;

use crate::model::{ExamKind, ExamRecord, ExamStatus, Student, StudentStatus};

/// Display projection of one exam track.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDisplay {
    pub status: ExamStatus,
    pub display: String,
    pub attempts: u32,
    pub max_attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed_at_attempt: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentExamStatus {
    pub written: ExamDisplay,
    pub driving: ExamDisplay,
}

/// Derived, non-persisted summary of both exam tracks, for list badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverallStatus {
    Completed,
    WrittenOnly,
    Failed,
    Waiting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallBadge {
    pub status: OverallStatus,
    pub label: String,
    pub tone: Tone,
}

pub fn exam_display(rec: &ExamRecord) -> ExamDisplay {
    let display = match rec.status {
        ExamStatus::NotTaken => {
            if rec.attempts == 0 {
                "Henüz Girmedi".to_string()
            } else {
                format!("{}. Hak Kullanıldı", rec.attempts)
            }
        }
        ExamStatus::Passed => match rec.passed_at_attempt {
            Some(1) => "İlk Denemede Geçti".to_string(),
            Some(n) => format!("{}. Denemede Geçti", n),
            // Older records may lack passedAtAttempt; fall back to the
            // attempt counter.
            None => format!("{}. Denemede Geçti", rec.attempts.max(1)),
        },
        ExamStatus::Failed => format!("{}. Hakta Kaldı", rec.attempts),
    };
    ExamDisplay {
        status: rec.status,
        display,
        attempts: rec.attempts,
        max_attempts: rec.max_attempts,
        passed_at_attempt: rec.passed_at_attempt,
    }
}

/// Display projections for both tracks. Reads only the exam sub-records:
/// a student whose global status is `failed` while attempts remain still
/// gets the attempt-based text, because the global status gates actions,
/// not wording.
pub fn exam_status(student: &Student) -> StudentExamStatus {
    StudentExamStatus {
        written: exam_display(&student.written_exam),
        driving: exam_display(&student.driving_exam),
    }
}

/// True once the track has consumed every allowed attempt.
pub fn exhausted(rec: &ExamRecord) -> bool {
    rec.attempts >= rec.max_attempts
}

fn failure_tone(rec: &ExamRecord) -> Tone {
    if exhausted(rec) {
        Tone::Error
    } else {
        Tone::Warning
    }
}

pub fn overall_status(student: &Student) -> OverallBadge {
    let written = &student.written_exam;
    let driving = &student.driving_exam;

    match (written.status, driving.status) {
        (ExamStatus::Passed, ExamStatus::Passed) => OverallBadge {
            status: OverallStatus::Completed,
            label: "Tamamladı".to_string(),
            tone: Tone::Success,
        },
        (ExamStatus::Passed, ExamStatus::NotTaken) => OverallBadge {
            status: OverallStatus::WrittenOnly,
            label: "Direksiyon Bekliyor".to_string(),
            tone: Tone::Info,
        },
        (ExamStatus::Passed, ExamStatus::Failed) => OverallBadge {
            status: OverallStatus::WrittenOnly,
            label: format!("Direksiyon {}. Hakta Kaldı", driving.attempts),
            tone: failure_tone(driving),
        },
        (ExamStatus::Failed, _) => OverallBadge {
            status: OverallStatus::Failed,
            label: format!("Yazılı {}. Hakta Kaldı", written.attempts),
            tone: failure_tone(written),
        },
        _ => OverallBadge {
            status: OverallStatus::Waiting,
            label: "Sınav Bekliyor".to_string(),
            tone: Tone::Info,
        },
    }
}

/// Whether the UI may offer another attempt on the given track. The
/// global `failed` status blocks both tracks outright; otherwise a track
/// is open while it is not passed and attempts remain. Driving
/// additionally requires a passed written exam.
pub fn can_attempt(student: &Student, kind: ExamKind) -> bool {
    if student.status == StudentStatus::Failed {
        return false;
    }
    let rec = match kind {
        ExamKind::Written => &student.written_exam,
        ExamKind::Driving => {
            if student.written_exam.status != ExamStatus::Passed {
                return false;
            }
            &student.driving_exam
        }
    };
    rec.status != ExamStatus::Passed && !exhausted(rec)
}

/// Students who failed the driving exam at least twice.
pub fn multiple_driving_failures(students: &[Student]) -> Vec<&Student> {
    students
        .iter()
        .filter(|s| s.driving_exam.status == ExamStatus::Failed && s.driving_exam.attempts >= 2)
        .collect()
}

/// Students with no attempts left on a failed track.
pub fn rights_exhausted(students: &[Student]) -> Vec<&Student> {
    students
        .iter()
        .filter(|s| {
            (s.written_exam.status == ExamStatus::Failed && exhausted(&s.written_exam))
                || (s.driving_exam.status == ExamStatus::Failed && exhausted(&s.driving_exam))
        })
        .collect()
}
