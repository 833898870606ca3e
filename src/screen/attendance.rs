// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Attendance board for one group.
//!
//! Events, attendance and event edits are gated by the owning group's
//! ownership record. Until the group detail has loaded, the board is
//! read-only. Writes are only accepted for events listed under this group,
//! and each successful write is followed by a refetch of what it touched.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::state::ScreenError;
use super::validation::validate_event_update;
use crate::api::ApiClient;
use crate::auth::{AccessDecision, MutationAction, OwnershipRecord};
use crate::dispatch::MutationDispatcher;
use crate::error::ApiError;
use crate::models::{
    AttendanceQuery, AttendanceRecord, AttendanceStats, AttendanceUpdate, ComcellGroup, Event,
    EventUpdate, ResourceId,
};
use crate::session::IdentityProvider;

pub struct AttendanceBoard<P> {
    group_id: ResourceId,
    api: Arc<ApiClient>,
    dispatcher: MutationDispatcher<P>,
    group: Option<ComcellGroup>,
    events: Vec<Event>,
    stats: Option<AttendanceStats>,
    records: HashMap<ResourceId, Vec<AttendanceRecord>>,
    cancel: CancellationToken,
}

impl<P: IdentityProvider> AttendanceBoard<P> {
    pub fn new(group_id: ResourceId, api: Arc<ApiClient>, dispatcher: MutationDispatcher<P>) -> Self {
        Self {
            group_id,
            api,
            dispatcher,
            group: None,
            events: Vec::new(),
            stats: None,
            records: HashMap::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Tie the board's requests to `parent`.
    pub fn with_parent(mut self, parent: &CancellationToken) -> Self {
        self.cancel = parent.child_token();
        self
    }

    pub fn group(&self) -> Option<&ComcellGroup> {
        self.group.as_ref()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn stats(&self) -> Option<&AttendanceStats> {
        self.stats.as_ref()
    }

    pub fn records(&self, event_id: &ResourceId) -> &[AttendanceRecord] {
        self.records.get(event_id).map(Vec::as_slice).unwrap_or_default()
    }

    fn ownership(&self) -> Option<&OwnershipRecord> {
        self.group.as_ref().map(|g| &g.ownership)
    }

    pub fn access(&self) -> AccessDecision {
        self.dispatcher.gate().evaluate(self.ownership())
    }

    /// Refuse before any request when the gate denies `action` or the event
    /// is not one of this group's.
    fn check_target(&self, action: MutationAction, event_id: &ResourceId) -> Result<(), ScreenError> {
        if let Err(denied) = self.dispatcher.gate().authorize(action, self.ownership()) {
            self.dispatcher.notifier().error(denied.to_string());
            return Err(ScreenError::Denied(denied));
        }
        if !self.events.iter().any(|e| &e.id == event_id) {
            warn!(group_id = %self.group_id, event_id = %event_id, "Event is not listed for this group");
            return Err(ScreenError::ForeignResource {
                noun: "event",
                id: event_id.clone(),
            });
        }
        Ok(())
    }

    fn refetch_failed(&self, err: &ApiError, fallback: &str) {
        if err.is_cancelled() {
            return;
        }
        warn!(group_id = %self.group_id, error = %err, "Refetch after change failed");
        self.dispatcher.notifier().error(err.user_message(fallback));
    }

    /// Events starting at or after `now`, soonest first.
    pub fn upcoming(&self, now: DateTime<Utc>) -> Vec<&Event> {
        let mut upcoming: Vec<&Event> = self.events.iter().filter(|e| e.is_upcoming(now)).collect();
        upcoming.sort_by_key(|e| e.starts_at);
        upcoming
    }

    /// Events that started before `now`, most recent first.
    pub fn past(&self, now: DateTime<Utc>) -> Vec<&Event> {
        let mut past: Vec<&Event> = self.events.iter().filter(|e| !e.is_upcoming(now)).collect();
        past.sort_by_key(|e| std::cmp::Reverse(e.starts_at));
        past
    }

    /// Fetch group detail, events and stats concurrently.
    ///
    /// Each part settles on its own. Only a failed group fetch is returned
    /// as an error, since without it nothing on the board can be edited.
    pub async fn load(&mut self) -> Result<(), ScreenError> {
        let (group, events, stats) = tokio::join!(
            self.api.get_group_detail(&self.group_id, &self.cancel),
            self.api.get_events_by_group(&self.group_id, &self.cancel),
            self.api.get_attendance_stats(&self.group_id, &self.cancel),
        );

        if self.cancel.is_cancelled() {
            return Err(ScreenError::Cancelled);
        }

        match events {
            Ok(events) => self.events = events,
            Err(err) => {
                warn!(group_id = %self.group_id, error = %err, "Event fetch failed");
                self.dispatcher
                    .notifier()
                    .error(err.user_message("Could not load events."));
            }
        }

        match stats {
            Ok(stats) => self.stats = Some(stats),
            Err(err) => debug!(group_id = %self.group_id, error = %err, "Stats unavailable"),
        }

        match group {
            Ok(group) => {
                self.group = Some(group);
                Ok(())
            }
            Err(source) => {
                self.group = None;
                let message = source.user_message("Could not load this group.");
                warn!(group_id = %self.group_id, error = %source, "Group fetch failed");
                self.dispatcher.notifier().error(message.clone());
                Err(ScreenError::Load { message, source })
            }
        }
    }

    /// Batch-read attendance for `event_ids`. Events without records get an
    /// empty list.
    pub async fn load_attendance(&mut self, event_ids: &[ResourceId]) -> Result<(), ScreenError> {
        let query = AttendanceQuery {
            event_ids: event_ids.to_vec(),
        };
        let records = match self.api.get_attendance(&query, &self.cancel).await {
            Ok(records) => records,
            Err(ApiError::Cancelled) => return Err(ScreenError::Cancelled),
            Err(source) => {
                let message = source.user_message("Could not load attendance.");
                self.dispatcher.notifier().error(message.clone());
                return Err(ScreenError::Load { message, source });
            }
        };

        for id in event_ids {
            self.records.insert(id.clone(), Vec::new());
        }
        for record in records {
            self.records
                .entry(record.event_id.clone())
                .or_default()
                .push(record);
        }
        Ok(())
    }

    /// Write one event's attendance. Records are re-keyed to `event_id`.
    pub async fn save_attendance(
        &mut self,
        event_id: &ResourceId,
        mut records: Vec<AttendanceRecord>,
    ) -> Result<(), ScreenError> {
        self.check_target(MutationAction::SaveAttendance, event_id)?;
        for record in &mut records {
            record.event_id = event_id.clone();
        }
        let update = AttendanceUpdate {
            event_id: event_id.clone(),
            records,
        };

        self.dispatcher
            .dispatch(MutationAction::SaveAttendance, self.ownership(), || {
                self.api.update_attendance(&update, &self.cancel)
            })
            .await?;

        let query = AttendanceQuery {
            event_ids: vec![event_id.clone()],
        };
        let (records, stats) = tokio::join!(
            self.api.get_attendance(&query, &self.cancel),
            self.api.get_attendance_stats(&self.group_id, &self.cancel),
        );
        match records {
            Ok(records) => {
                let records = records
                    .into_iter()
                    .filter(|r| &r.event_id == event_id)
                    .collect();
                self.records.insert(event_id.clone(), records);
            }
            Err(err) => self.refetch_failed(&err, "Could not refresh attendance."),
        }
        match stats {
            Ok(stats) => self.stats = Some(stats),
            Err(err) => self.refetch_failed(&err, "Could not refresh attendance stats."),
        }
        Ok(())
    }

    /// Edit an event's title, times or location.
    pub async fn update_event(
        &mut self,
        event_id: &ResourceId,
        update: &EventUpdate,
    ) -> Result<(), ScreenError> {
        self.check_target(MutationAction::EditEvent, event_id)?;
        validate_event_update(update).map_err(ScreenError::Validation)?;

        self.dispatcher
            .dispatch(MutationAction::EditEvent, self.ownership(), || {
                self.api.update_event(event_id, update, &self.cancel)
            })
            .await?;

        match self
            .api
            .get_events_by_group(&self.group_id, &self.cancel)
            .await
        {
            Ok(events) => self.events = events,
            Err(err) => self.refetch_failed(&err, "Could not refresh events."),
        }
        Ok(())
    }
}

impl<P> Drop for AttendanceBoard<P> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
