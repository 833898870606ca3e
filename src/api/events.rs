// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Event and attendance endpoints.

use reqwest::Method;
use tokio_util::sync::CancellationToken;

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::{
    AttendanceQuery, AttendanceRecord, AttendanceStats, AttendanceUpdate, Event, EventUpdate,
    ResourceId,
};

impl ApiClient {
    /// `GET /events/getAllEventByGroupId/:id`
    pub async fn get_events_by_group(
        &self,
        group_id: &ResourceId,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<Event>> {
        self.fetch(
            Method::GET,
            &["events", "getAllEventByGroupId", group_id.as_str()],
            None::<&()>,
            cancel,
        )
        .await
    }

    /// `POST /events/getAttendance` - batch read for several events
    pub async fn get_attendance(
        &self,
        query: &AttendanceQuery,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<AttendanceRecord>> {
        self.fetch(Method::POST, &["events", "getAttendance"], Some(query), cancel)
            .await
    }

    /// `POST /events/updateAttendance` - batch write for one event
    pub async fn update_attendance(
        &self,
        update: &AttendanceUpdate,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        self.execute(Method::POST, &["events", "updateAttendance"], Some(update), cancel)
            .await
    }

    /// `POST /events/updateEvent/:id`
    pub async fn update_event(
        &self,
        event_id: &ResourceId,
        update: &EventUpdate,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        self.execute(
            Method::POST,
            &["events", "updateEvent", event_id.as_str()],
            Some(update),
            cancel,
        )
        .await
    }

    /// `GET /events/getAttendanceStats/:groupId`
    pub async fn get_attendance_stats(
        &self,
        group_id: &ResourceId,
        cancel: &CancellationToken,
    ) -> ApiResult<AttendanceStats> {
        self.fetch(
            Method::GET,
            &["events", "getAttendanceStats", group_id.as_str()],
            None::<&()>,
            cancel,
        )
        .await
    }
}
