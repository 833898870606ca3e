// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures exchanged with the community REST API.
//! The backend answers in `snake_case`, but some payloads (and locally held
//! state) use `camelCase`; fields that appear both ways carry a serde alias.
//!
//! ## Model Categories
//!
//! - **Identifiers**: [`UserId`], tolerant of string or numeric ids
//! - **Comcell groups**: group detail and membership
//! - **Teams**: team detail, roster, per-member detail
//! - **Events**: events and attendance records

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::auth::OwnershipRecord;

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque user identifier.
///
/// The backend emits ids as strings or numbers depending on the endpoint, so
/// both are accepted and stored as text.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        UserId(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        UserId(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_user_id(self) -> Option<UserId> {
        match self {
            RawId::Text(s) if s.trim().is_empty() => None,
            RawId::Text(s) => Some(UserId(s)),
            RawId::Number(n) => Some(UserId(n.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawId::deserialize(deserializer)?
            .into_user_id()
            .ok_or_else(|| serde::de::Error::custom("user id must not be empty"))
    }
}

/// Deserialize an optional id where `null`, a missing field and `""` all mean "no id".
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.and_then(RawId::into_user_id))
}

/// Resource identifier (group, team, event). Same tolerance as [`UserId`].
pub type ResourceId = UserId;

// =============================================================================
// Authentication
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: crate::session::SessionUser,
}

/// Request to change a user's global role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateUserRoleRequest {
    pub user_id: UserId,
    pub role_name: crate::auth::Role,
}

// =============================================================================
// Comcell Groups
// =============================================================================

/// A comcell (small group) as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComcellGroup {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "meetingDay")]
    pub meeting_day: Option<String>,
    #[serde(default, alias = "meetingTime")]
    pub meeting_time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Leader / co-leader, normalised from either wire spelling.
    #[serde(flatten)]
    pub ownership: OwnershipRecord,
}

/// Editable group settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupUpdate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl From<&ComcellGroup> for GroupUpdate {
    fn from(group: &ComcellGroup) -> Self {
        GroupUpdate {
            name: group.name.clone(),
            description: group.description.clone(),
            meeting_day: group.meeting_day.clone(),
            meeting_time: group.meeting_time.clone(),
            location: group.location.clone(),
        }
    }
}

/// Role of a member inside a group's membership list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemberRole {
    Leader,
    #[serde(alias = "coleader", alias = "co_leader", alias = "coLeader")]
    CoLeader,
    Member,
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberRole::Leader => write!(f, "leader"),
            MemberRole::CoLeader => write!(f, "co-leader"),
            MemberRole::Member => write!(f, "member"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupMember {
    #[serde(alias = "userId", alias = "id")]
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_member_role")]
    pub role: MemberRole,
}

fn default_member_role() -> MemberRole {
    MemberRole::Member
}

/// Body for the add/remove member endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MembershipChange {
    pub group_id: ResourceId,
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<MemberRole>,
}

// =============================================================================
// Teams
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub ownership: OwnershipRecord,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamUpdate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Team> for TeamUpdate {
    fn from(team: &Team) -> Self {
        TeamUpdate {
            name: team.name.clone(),
            description: team.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamMember {
    #[serde(alias = "userId", alias = "id")]
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MemberStatus {
    #[default]
    Active,
    Inactive,
    #[serde(alias = "on_leave", alias = "onLeave")]
    OnLeave,
}

/// Lookup key for the member-detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamMemberKey {
    pub team_id: ResourceId,
    pub user_id: UserId,
}

/// A member's role, positions, status and notes within one team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamMemberDetail {
    #[serde(alias = "teamId")]
    pub team_id: ResourceId,
    #[serde(alias = "userId")]
    pub user_id: UserId,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub positions: Vec<String>,
    #[serde(default)]
    pub status: MemberStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

// =============================================================================
// Events & Attendance
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: ResourceId,
    #[serde(alias = "groupId")]
    pub group_id: ResourceId,
    pub title: String,
    #[serde(alias = "startsAt", alias = "start_time")]
    pub starts_at: DateTime<Utc>,
    #[serde(default, alias = "endsAt", alias = "end_time")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
}

impl Event {
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.starts_at >= now
    }
}

/// Editable event fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventUpdate {
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

impl From<&Event> for EventUpdate {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            starts_at: event.starts_at,
            ends_at: event.ends_at,
            location: event.location.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Excused,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendanceRecord {
    #[serde(alias = "eventId")]
    pub event_id: ResourceId,
    #[serde(alias = "userId")]
    pub user_id: UserId,
    pub status: AttendanceStatus,
}

/// Body for the batch attendance read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendanceQuery {
    pub event_ids: Vec<ResourceId>,
}

/// Body for the batch attendance write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendanceUpdate {
    pub event_id: ResourceId,
    pub records: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AttendanceStats {
    #[serde(default, alias = "totalEvents")]
    pub total_events: u32,
    #[serde(default, alias = "averageAttendance")]
    pub average_attendance: f64,
    #[serde(default, alias = "lastAttendance")]
    pub last_attendance: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_id_accepts_strings_and_numbers() {
        let from_text: UserId = serde_json::from_value(json!("u-17")).unwrap();
        let from_number: UserId = serde_json::from_value(json!(17)).unwrap();
        assert_eq!(from_text, UserId::new("u-17"));
        assert_eq!(from_number, UserId::new("17"));
        assert!(serde_json::from_value::<UserId>(json!("")).is_err());
    }

    #[test]
    fn group_detail_reads_snake_case_ownership() {
        let group: ComcellGroup = serde_json::from_value(json!({
            "id": 4,
            "name": "Northside Comcell",
            "meeting_day": "Friday",
            "leader_id": "u-1",
            "co_leader_id": null
        }))
        .unwrap();

        assert_eq!(group.id, UserId::new("4"));
        assert_eq!(group.meeting_day.as_deref(), Some("Friday"));
        assert_eq!(group.ownership.leader_id, Some(UserId::new("u-1")));
        assert_eq!(group.ownership.co_leader_id, None);
    }

    #[test]
    fn group_detail_reads_camel_case_ownership() {
        let group: ComcellGroup = serde_json::from_value(json!({
            "id": "g-9",
            "name": "Youth",
            "leaderId": 12,
            "coLeaderId": 13
        }))
        .unwrap();

        assert_eq!(group.ownership.leader_id, Some(UserId::new("12")));
        assert_eq!(group.ownership.co_leader_id, Some(UserId::new("13")));
    }

    #[test]
    fn member_roles_parse_all_spellings() {
        for raw in ["co-leader", "coleader", "co_leader", "coLeader"] {
            let role: MemberRole = serde_json::from_value(json!(raw)).unwrap();
            assert_eq!(role, MemberRole::CoLeader, "{raw}");
        }
        let member: GroupMember =
            serde_json::from_value(json!({ "userId": 3, "name": "Ana" })).unwrap();
        assert_eq!(member.role, MemberRole::Member);
    }

    #[test]
    fn events_parse_rfc3339() {
        let event: Event = serde_json::from_value(json!({
            "id": 1,
            "groupId": 4,
            "title": "Friday fellowship",
            "startsAt": "2026-10-23T19:00:00Z",
            "endsAt": "2026-10-23T21:00:00Z"
        }))
        .unwrap();
        assert!(event.ends_at.unwrap() > event.starts_at);
    }
}
