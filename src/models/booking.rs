use serde::{Deserialize, Serialize};

use crate::db::Document;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub status: BookingStatus,
    /// Client-supplied booking details (customer name, date, service, price, ...), stored verbatim.
    #[serde(flatten)]
    pub details: Document,
}

/// Body of `POST /bookings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewBooking {
    pub email: String,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(flatten)]
    pub details: Document,
}

impl NewBooking {
    pub fn into_document(self) -> Document {
        let mut doc = self.details;
        doc.remove("_id");
        doc.insert("email".to_string(), self.email.into());
        doc.insert("status".to_string(), self.status.as_str().into());
        doc
    }
}

/// Body of `PATCH /bookings/:id`. Only the status is ever applied.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Whether a booking in this status may move to `next`. Staying put is always allowed.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;

        matches!(
            (self, next),
            (Pending, Pending)
                | (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Confirmed)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
                | (Completed, Completed)
                | (Cancelled, Cancelled)
        )
    }
}
