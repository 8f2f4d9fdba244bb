//! Wire-format domain records shared by the REST client, the derivation
//! modules and the IPC handlers. Field names follow the backend's
//! camelCase JSON; enums serialize exactly as the backend spells them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExamStatus {
    #[default]
    NotTaken,
    Passed,
    Failed,
}

impl ExamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExamStatus::NotTaken => "not-taken",
            ExamStatus::Passed => "passed",
            ExamStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
    Completed,
    Failed,
}

impl StudentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Active => "active",
            StudentStatus::Inactive => "inactive",
            StudentStatus::Completed => "completed",
            StudentStatus::Failed => "failed",
        }
    }
}

pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

/// One exam track (written or driving) of a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRecord {
    #[serde(default)]
    pub status: ExamStatus,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_exam_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed_at_attempt: Option<u32>,
    /// Dates of the attempts that were failed, oldest first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_attempts: Option<Vec<NaiveDate>>,
}

impl Default for ExamRecord {
    fn default() -> Self {
        ExamRecord {
            status: ExamStatus::NotTaken,
            attempts: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            last_exam_date: None,
            passed_at_attempt: None,
            failed_attempts: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone: String,
    #[serde(default)]
    pub gender: Option<String>,
    /// Free-form class code kept for records predating license classes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_class_id: Option<String>,
    #[serde(default)]
    pub status: StudentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_id: Option<String>,
    #[serde(default)]
    pub written_exam: ExamRecord,
    #[serde(default)]
    pub driving_exam: ExamRecord,
    // Financial aggregates are computed by the server and passed through
    // untouched.
    #[serde(default)]
    pub total_payment: f64,
    #[serde(default)]
    pub total_debt: f64,
    #[serde(default)]
    pub paid_amount: f64,
    #[serde(default)]
    pub remaining_debt: f64,
    #[serde(default)]
    pub payments: Vec<Payment>,
    // Lesson entitlement counters are server-authoritative; nothing here
    // recomputes them.
    #[serde(default)]
    pub total_lessons_entitled: u32,
    #[serde(default)]
    pub lessons_completed: u32,
    #[serde(default)]
    pub lessons_remaining: u32,
}

impl Student {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Credit,
    Bank,
    Pos,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Credit => "credit",
            PaymentMethod::Bank => "bank",
            PaymentMethod::Pos => "pos",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    Debt,
    Installment,
    Payment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_installments: Option<u32>,
    /// Set on payments that satisfy a previously recorded debt; such rows
    /// render under the debt, never on their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_debt_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonStatus {
    Planned,
    Scheduled,
    InstructorDone,
    Completed,
    Cancelled,
    NoShow,
}

impl LessonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonStatus::Planned => "PLANNED",
            LessonStatus::Scheduled => "SCHEDULED",
            LessonStatus::InstructorDone => "INSTRUCTOR_DONE",
            LessonStatus::Completed => "COMPLETED",
            LessonStatus::Cancelled => "CANCELLED",
            LessonStatus::NoShow => "NO_SHOW",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrivingLesson {
    pub id: String,
    pub student_id: String,
    pub instructor_id: String,
    pub lesson_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    /// "HH:MM", 24-hour clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_by: Option<String>,
    pub status: LessonStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_confirmed_at: Option<DateTime<Utc>>,
    /// Minutes actually driven, reported by the instructor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub active: bool,
}

impl Instructor {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Per-student row of the batch scheduler result. The batch never fails
/// as a whole; each student reports its own outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOutcome {
    pub student_id: String,
    pub student_name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessons_remaining: Option<u32>,
}

// ---- request payloads ----

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInput {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_class_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub amount: f64,
    pub date: NaiveDate,
    pub method: PaymentMethod,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_installments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_debt_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamPatch {
    pub status: ExamStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamKind {
    Written,
    Driving,
}

impl ExamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExamKind::Written => "written",
            ExamKind::Driving => "driving",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFilter {
    #[serde(default)]
    pub status: Option<StudentStatus>,
    #[serde(default)]
    pub instructor_id: Option<String>,
    #[serde(default)]
    pub license_type: Option<String>,
    #[serde(default)]
    pub written_exam_status: Option<ExamStatus>,
    #[serde(default)]
    pub driving_exam_status: Option<ExamStatus>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonFilter {
    #[serde(default)]
    pub instructor_id: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<LessonStatus>,
}
