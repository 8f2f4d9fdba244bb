//! Typed client for the driving-school REST backend.
//!
//! Every endpoint returns the envelope `{success, data?, message?}`.
//! Mapping policy: transport problems become [`ApiError::Transport`]
//! with a generic Turkish message, anything the server said arrives
//! verbatim in [`ApiError::Server`], and a 2xx body that does not parse
//! is [`ApiError::BadResponse`]. Callers never retry.

use reqwest::blocking::Client;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::model::{
    DrivingLesson, ExamKind, ExamPatch, Instructor, LessonFilter, Payment, PaymentInput,
    PaymentMethod, ScheduleOutcome, Student, StudentFilter, StudentInput,
};
use crate::session::Session;
use chrono::NaiveDate;

pub const FALLBACK_SERVER_MESSAGE: &str = "İşlem başarısız oldu";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server was never reached, or the connection died mid-flight.
    #[error("Sunucuya ulaşılamadı")]
    Transport(String),
    /// The server answered and rejected the operation; `message` is shown
    /// to the user unchanged.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// A success status with a body we cannot make sense of.
    #[error("Sunucudan beklenmeyen yanıt alındı")]
    BadResponse(String),
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

pub struct ApiClient {
    http: Client,
    session: Session,
}

impl ApiClient {
    pub fn new(session: Session) -> ApiClient {
        ApiClient {
            http: Client::new(),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn call_raw(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<(u16, String), ApiError> {
        let request_id = Uuid::new_v4();
        let url = format!("{}{}", self.session.base_url(), path);
        let mut req = self
            .http
            .request(method.clone(), &url)
            .header("Authorization", self.session.bearer())
            .header("X-Request-Id", request_id.to_string());
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(b) = body {
            req = req.json(&b);
        }
        log::debug!("{} {} [{}]", method, path, request_id);
        let resp = req.send().map_err(|e| {
            log::warn!("{} {} [{}] unreachable: {}", method, path, request_id, e);
            ApiError::Transport(e.to_string())
        })?;
        let status = resp.status().as_u16();
        let text = resp
            .text()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok((status, text))
    }

    fn decode<T: DeserializeOwned>(status: u16, text: &str) -> Result<Envelope<T>, ApiError> {
        match serde_json::from_str::<Envelope<T>>(text) {
            Ok(env) => Ok(env),
            Err(e) if (200..300).contains(&status) => Err(ApiError::BadResponse(e.to_string())),
            // Error bodies without the envelope still surface as a server
            // rejection, with the generic message.
            Err(_) => Err(ApiError::Server {
                status,
                message: FALLBACK_SERVER_MESSAGE.to_string(),
            }),
        }
    }

    /// Request expecting a `data` payload.
    fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let (status, text) = self.call_raw(method, path, query, body)?;
        let env: Envelope<T> = Self::decode(status, &text)?;
        if !env.success || !(200..300).contains(&status) {
            return Err(ApiError::Server {
                status,
                message: env.message.unwrap_or_else(|| FALLBACK_SERVER_MESSAGE.to_string()),
            });
        }
        env.data
            .ok_or_else(|| ApiError::BadResponse("missing data".to_string()))
    }

    /// Request where success carries no payload (deletes, cancels).
    fn call_unit(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<(), ApiError> {
        let (status, text) = self.call_raw(method, path, &[], body)?;
        let env: Envelope<serde_json::Value> = Self::decode(status, &text)?;
        if !env.success || !(200..300).contains(&status) {
            return Err(ApiError::Server {
                status,
                message: env.message.unwrap_or_else(|| FALLBACK_SERVER_MESSAGE.to_string()),
            });
        }
        Ok(())
    }

    // ---- students ----

    pub fn list_students(&self, filter: &StudentFilter) -> Result<Vec<Student>, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(s) = filter.status {
            query.push(("status", s.as_str().to_string()));
        }
        if let Some(id) = &filter.instructor_id {
            query.push(("instructorId", id.clone()));
        }
        if let Some(lt) = &filter.license_type {
            query.push(("licenseType", lt.clone()));
        }
        if let Some(s) = filter.written_exam_status {
            query.push(("writtenExamStatus", s.as_str().to_string()));
        }
        if let Some(s) = filter.driving_exam_status {
            query.push(("drivingExamStatus", s.as_str().to_string()));
        }
        if let Some(q) = &filter.search {
            query.push(("search", q.clone()));
        }
        self.call(Method::GET, "/api/students", &query, None)
    }

    pub fn get_student(&self, id: &str) -> Result<Student, ApiError> {
        self.call(Method::GET, &format!("/api/students/{}", id), &[], None)
    }

    pub fn create_student(&self, input: &StudentInput) -> Result<Student, ApiError> {
        self.call(Method::POST, "/api/students", &[], Some(json!(input)))
    }

    pub fn update_student(&self, id: &str, input: &StudentInput) -> Result<Student, ApiError> {
        self.call(
            Method::PUT,
            &format!("/api/students/{}", id),
            &[],
            Some(json!(input)),
        )
    }

    pub fn delete_student(&self, id: &str) -> Result<(), ApiError> {
        self.call_unit(Method::DELETE, &format!("/api/students/{}", id), None)
    }

    pub fn set_written_exam(&self, id: &str, patch: &ExamPatch) -> Result<Student, ApiError> {
        self.call(
            Method::PATCH,
            &format!("/api/students/{}/written-exam", id),
            &[],
            Some(json!(patch)),
        )
    }

    pub fn set_driving_exam(&self, id: &str, patch: &ExamPatch) -> Result<Student, ApiError> {
        self.call(
            Method::PATCH,
            &format!("/api/students/{}/driving-exam", id),
            &[],
            Some(json!(patch)),
        )
    }

    pub fn reset_exam(&self, id: &str, exam: ExamKind) -> Result<Student, ApiError> {
        self.call(
            Method::POST,
            &format!("/api/students/{}/reset-exam", id),
            &[],
            Some(json!({ "examType": exam.as_str() })),
        )
    }

    pub fn completed_students(&self) -> Result<Vec<Student>, ApiError> {
        self.call(Method::GET, "/api/students/completed", &[], None)
    }

    pub fn passed_written_exam(&self, license_type: Option<&str>) -> Result<Vec<Student>, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(lt) = license_type {
            query.push(("licenseType", lt.to_string()));
        }
        self.call(Method::GET, "/api/students/passed-written-exam", &query, None)
    }

    // ---- driving lessons ----

    pub fn eligible_students(&self) -> Result<Vec<Student>, ApiError> {
        self.call(Method::GET, "/api/driving-lessons/eligible-students", &[], None)
    }

    pub fn list_lessons(&self, filter: &LessonFilter) -> Result<Vec<DrivingLesson>, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(id) = &filter.instructor_id {
            query.push(("instructorId", id.clone()));
        }
        if let Some(d) = filter.date {
            query.push(("date", d.to_string()));
        }
        if let Some(s) = filter.status {
            query.push(("status", s.as_str().to_string()));
        }
        self.call(Method::GET, "/api/driving-lessons", &query, None)
    }

    pub fn schedule_tomorrow(
        &self,
        student_ids: &[String],
        date: Option<NaiveDate>,
    ) -> Result<Vec<ScheduleOutcome>, ApiError> {
        let mut body = json!({ "studentIds": student_ids });
        if let Some(d) = date {
            body["date"] = json!(d);
        }
        self.call(Method::POST, "/api/driving-lessons/tomorrow", &[], Some(body))
    }

    pub fn set_lesson_time(&self, lesson_id: &str, time: &str) -> Result<DrivingLesson, ApiError> {
        self.call(
            Method::PATCH,
            &format!("/api/driving-lessons/{}/time", lesson_id),
            &[],
            Some(json!({ "scheduledTime": time })),
        )
    }

    pub fn mark_instructor_done(
        &self,
        lesson_id: &str,
        notes: Option<&str>,
        actual_duration: Option<u32>,
    ) -> Result<DrivingLesson, ApiError> {
        let mut body = json!({});
        if let Some(n) = notes {
            body["notes"] = json!(n);
        }
        if let Some(d) = actual_duration {
            body["actualDuration"] = json!(d);
        }
        self.call(
            Method::PATCH,
            &format!("/api/driving-lessons/{}/instructor-done", lesson_id),
            &[],
            Some(body),
        )
    }

    pub fn cancel_lesson(&self, lesson_id: &str) -> Result<(), ApiError> {
        self.call_unit(
            Method::DELETE,
            &format!("/api/driving-lessons/{}", lesson_id),
            None,
        )
    }

    // ---- payments ----

    pub fn mark_payment_paid(
        &self,
        payment_id: &str,
        method: PaymentMethod,
        payment_date: NaiveDate,
    ) -> Result<Payment, ApiError> {
        self.call(
            Method::PATCH,
            &format!("/api/payments/{}/mark-paid", payment_id),
            &[],
            Some(json!({
                "method": method.as_str(),
                "paymentDate": payment_date,
            })),
        )
    }

    pub fn delete_payment(&self, payment_id: &str) -> Result<(), ApiError> {
        self.call_unit(Method::DELETE, &format!("/api/payments/{}", payment_id), None)
    }

    pub fn create_payment(&self, student_id: &str, input: &PaymentInput) -> Result<Payment, ApiError> {
        self.call(
            Method::POST,
            &format!("/api/payments/students/{}", student_id),
            &[],
            Some(json!(input)),
        )
    }

    // ---- instructors ----

    pub fn list_instructors(&self) -> Result<Vec<Instructor>, ApiError> {
        self.call(Method::GET, "/api/instructors", &[], None)
    }
}
