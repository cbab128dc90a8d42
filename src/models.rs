use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Student,
    #[serde(rename = "Club Admin")]
    ClubAdmin,
    Faculty,
    #[serde(rename = "Super Admin")]
    SuperAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
    Attended,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub event_id: String,
    pub status: RegistrationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub event_id: String,
    pub event_name: String,
    pub amount: String,
    pub date: DateTime<Utc>,
    pub status: TransactionStatus,
    pub payment_method: String,
}

/// A member of the institute. `email` is the unique key; lookups are
/// case-insensitive. Collection fields default to empty so that older
/// persisted records missing them deserialize cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub joined_clubs: Vec<String>,
    #[serde(default)]
    pub pending_clubs: Vec<String>,
    #[serde(default)]
    pub registered_events: Vec<Registration>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl User {
    pub fn is_registered_for(&self, event_id: &str) -> bool {
        self.registered_events.iter().any(|r| r.event_id == event_id)
    }

    pub fn transaction_for(&self, event_id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.event_id == event_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Technical,
    Cultural,
    Sports,
    Social,
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// A student organization. Administered by exactly one identity, resolved by
/// a case-insensitive match on `admin_email`; `password` is the shared
/// secret gating Club Admin logins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub logo_url: String,
    pub banner_url: String,
    pub member_count: u32,
    pub president: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
}

impl Club {
    pub fn is_admin(&self, email: &str) -> bool {
        self.admin_email
            .as_deref()
            .map_or(false, |a| a.eq_ignore_ascii_case(email))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubEvent {
    pub id: String,
    pub club_id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub reminders: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_map_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event_gallery: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mini_announcement: Option<String>,
}

impl ClubEvent {
    /// Numeric value embedded in the fee string, extracted by stripping
    /// every non-digit character. A fee with no digits parses to 0.
    pub fn fee_amount(&self) -> u32 {
        let digits: String = self
            .fee
            .as_deref()
            .unwrap_or("")
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        digits.parse().unwrap_or(0)
    }

    /// Paid iff a fee is present, is not the literal "Free", and carries a
    /// positive numeric value.
    pub fn is_paid(&self) -> bool {
        match self.fee.as_deref() {
            None | Some("Free") => false,
            Some(_) => self.fee_amount() > 0,
        }
    }

    pub fn registration_open(&self, now: DateTime<Utc>) -> bool {
        self.registration_deadline.map_or(true, |d| now <= d)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRequest {
    pub id: String,
    pub club_id: String,
    pub user_email: String,
    pub user_name: String,
    pub department: String,
    pub status: RequestStatus,
    pub request_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub club_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub author_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub club_id: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationItem {
    pub id: String,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportStatus {
    Pending,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportRequest {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub status: SupportStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
}

/// Display/export artifact proving a registration. `reference` is the
/// transaction id when one exists, otherwise a deterministic id derived
/// from the attendee's email and the event id so free registrations still
/// carry a scannable code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub event_id: String,
    pub event_title: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub attendee_name: String,
    pub attendee_email: String,
    pub reference: String,
}

impl Ticket {
    pub fn issue(event: &ClubEvent, user: &User, transaction_id: Option<&str>) -> Ticket {
        let reference = transaction_id
            .map(str::to_owned)
            .unwrap_or_else(|| Self::fallback_reference(&user.email, &event.id));
        Ticket {
            event_id: event.id.clone(),
            event_title: event.title.clone(),
            event_date: event.date,
            location: event.location.clone(),
            attendee_name: user.name.clone(),
            attendee_email: user.email.clone(),
            reference,
        }
    }

    pub fn fallback_reference(email: &str, event_id: &str) -> String {
        let local = email.split('@').next().unwrap_or(email).to_uppercase();
        format!("T_{local}_{event_id}")
    }
}
