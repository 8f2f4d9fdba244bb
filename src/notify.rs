//! Notification drafts for scheduling results.
//!
//! Recipients are resolved into a tagged union once, at the boundary
//! where the typed record is still at hand; downstream code never
//! inspects record shapes to guess who it is talking to. The daemon only
//! drafts the message text; delivery belongs to the device's SMS
//! channel, driven by the UI.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Instructor, Student};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Recipient {
    #[serde(rename_all = "camelCase")]
    Student {
        id: String,
        name: String,
        phone: String,
    },
    #[serde(rename_all = "camelCase")]
    Instructor {
        id: String,
        name: String,
        phone: String,
    },
}

impl Recipient {
    pub fn from_student(s: &Student) -> Recipient {
        Recipient::Student {
            id: s.id.clone(),
            name: s.display_name(),
            phone: s.phone.clone(),
        }
    }

    pub fn from_instructor(i: &Instructor) -> Recipient {
        Recipient::Instructor {
            id: i.id.clone(),
            name: i.display_name(),
            phone: i.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub recipient: Recipient,
    pub message: String,
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Draft for a student whose lesson was just scheduled.
pub fn schedule_notice(recipient: Recipient, date: NaiveDate, time: Option<&str>) -> Notice {
    let message = match time {
        Some(t) => format!(
            "Direksiyon dersiniz {} günü saat {} olarak planlandı.",
            format_date(date),
            t
        ),
        None => format!(
            "Direksiyon dersiniz {} günü için planlandı. Saat bilgisi daha sonra bildirilecektir.",
            format_date(date)
        ),
    };
    Notice { recipient, message }
}

/// Draft for an instructor's next-day roster.
pub fn roster_notice(recipient: Recipient, date: NaiveDate, lesson_count: usize) -> Notice {
    Notice {
        recipient,
        message: format!(
            "{} günü {} direksiyon dersiniz bulunmaktadır.",
            format_date(date),
            lesson_count
        ),
    }
}
