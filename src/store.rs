use crate::models::*;
use chrono::{DateTime, NaiveDate, Utc};
use itertools::Itertools;
use nanoid::nanoid;
use std::collections::HashMap;

/// Root application state: identifier-indexed maps for the entities that
/// get looked up by key, plain collections for the rest. Every transition
/// is synchronous and guard-then-commit; a failed guard leaves the state
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub clubs: HashMap<String, Club>,
    pub events: HashMap<String, ClubEvent>,
    // keyed by lowercase email, records keep their original casing
    users: HashMap<String, User>,
    pub membership_requests: Vec<MembershipRequest>,
    pub announcements: Vec<Announcement>,
    pub media: Vec<MediaItem>,
    pub notifications: Vec<NotificationItem>,
    pub support_requests: Vec<SupportRequest>,
    pub chat: Vec<ChatMessage>,
    current: Option<String>,
}

impl AppState {
    pub fn new() -> AppState {
        let mut state = AppState::default();
        state.reset_chat();
        state
    }

    // --- identity store ---

    pub fn find_user(&self, email: &str) -> Option<&User> {
        self.users.get(&email.to_lowercase())
    }

    pub fn find_user_mut(&mut self, email: &str) -> Option<&mut User> {
        self.users.get_mut(&email.to_lowercase())
    }

    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.email.to_lowercase(), user);
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub(crate) fn users_mut(&mut self) -> impl Iterator<Item = &mut User> {
        self.users.values_mut()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    // --- session ---

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_deref().and_then(|e| self.users.get(e))
    }

    pub fn current_user_mut(&mut self) -> Option<&mut User> {
        match self.current.as_deref() {
            Some(email) => self.users.get_mut(email),
            None => None,
        }
    }

    pub fn set_session(&mut self, email: &str) {
        self.current = Some(email.to_lowercase());
    }

    /// Re-enter a persisted session. The record wins over whatever the
    /// identity store currently holds for that email.
    pub fn resume_session(&mut self, user: User) {
        let key = user.email.to_lowercase();
        self.users.insert(key.clone(), user);
        self.current = Some(key);
    }

    pub fn clear_session(&mut self) {
        self.current = None;
        self.reset_chat();
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Write the session user's record back into the identity store.
    pub fn save_profile(&mut self, updated: User) {
        let key = updated.email.to_lowercase();
        self.users.insert(key.clone(), updated);
        if self.current.is_none() {
            self.current = Some(key);
        }
    }

    // --- catalog views ---

    pub fn club_for_admin(&self, email: &str) -> Option<&Club> {
        self.clubs.values().find(|c| c.is_admin(email))
    }

    pub fn upcoming_events(&self, now: DateTime<Utc>) -> Vec<&ClubEvent> {
        self.events
            .values()
            .filter(|e| e.date >= now)
            .sorted_by_key(|e| e.date)
            .collect()
    }

    /// Past events, newest first.
    pub fn past_events(&self, now: DateTime<Utc>) -> Vec<&ClubEvent> {
        self.events
            .values()
            .filter(|e| e.date < now)
            .sorted_by_key(|e| std::cmp::Reverse(e.date))
            .collect()
    }

    pub fn my_events(&self) -> Vec<&ClubEvent> {
        let Some(user) = self.current_user() else {
            return vec![];
        };
        self.events
            .values()
            .filter(|e| user.is_registered_for(&e.id))
            .sorted_by_key(|e| e.date)
            .collect()
    }

    pub fn events_on(&self, day: NaiveDate) -> Vec<&ClubEvent> {
        self.events
            .values()
            .filter(|e| e.date.date_naive() == day)
            .sorted_by_key(|e| e.date)
            .collect()
    }

    pub fn search_clubs(&self, query: &str, category: Option<Category>) -> Vec<&Club> {
        let needle = query.to_lowercase();
        self.clubs
            .values()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .filter(|c| category.map_or(true, |cat| c.category == cat))
            .sorted_by(|a, b| a.name.cmp(&b.name))
            .collect()
    }

    // Per-club listings tolerate orphaned owners: a deleted club's events,
    // announcements and media simply stop being reachable through it.

    pub fn club_events(&self, club_id: &str) -> Vec<&ClubEvent> {
        self.events
            .values()
            .filter(|e| e.club_id == club_id)
            .sorted_by_key(|e| e.date)
            .collect()
    }

    pub fn club_announcements(&self, club_id: &str) -> Vec<&Announcement> {
        self.announcements
            .iter()
            .filter(|a| a.club_id == club_id)
            .collect()
    }

    pub fn club_media(&self, club_id: &str) -> Vec<&MediaItem> {
        self.media.iter().filter(|m| m.club_id == club_id).collect()
    }

    pub fn registrants_for(&self, event_id: &str) -> Vec<&User> {
        self.users
            .values()
            .filter(|u| u.is_registered_for(event_id))
            .sorted_by(|a, b| a.name.cmp(&b.name))
            .collect()
    }

    pub fn pending_requests_for(&self, club_id: &str) -> Vec<&MembershipRequest> {
        self.membership_requests
            .iter()
            .filter(|r| r.club_id == club_id && r.status == RequestStatus::Pending)
            .collect()
    }

    // --- notifications ---

    pub fn push_notification(&mut self, title: &str, message: &str, kind: NotificationKind) {
        self.notifications.insert(
            0,
            NotificationItem {
                id: format!("n_{}", nanoid!(8)),
                title: title.to_owned(),
                message: message.to_owned(),
                timestamp: Utc::now(),
                read: false,
                kind,
            },
        );
    }

    pub fn unread_notifications(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn mark_notifications_read(&mut self) {
        for n in &mut self.notifications {
            n.read = true;
        }
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }

    // --- chat transcript ---

    pub(crate) fn reset_chat(&mut self) {
        self.chat = vec![ChatMessage {
            id: "1".into(),
            role: ChatRole::Model,
            text: crate::chat::GREETING.to_owned(),
        }];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use chrono::TimeZone;

    #[test]
    fn user_lookup_is_case_insensitive() {
        let state = seed::demo_state();
        let user = state.find_user("RAHUL.SHARMA@VIT.EDU").unwrap();
        assert_eq!(user.name, "Rahul Sharma");
    }

    #[test]
    fn admin_club_resolved_by_email_not_membership() {
        let state = seed::demo_state();
        // priya administers the ACM chapter via adminEmail even though her
        // joinedClubs also carries it
        let club = state.club_for_admin("priya.verma@vit.edu").unwrap();
        assert_eq!(club.id, "c2");
        assert!(state.club_for_admin("vikram.singh@vit.edu").is_none());
    }

    #[test]
    fn event_views_split_on_now() {
        let state = seed::demo_state();
        let now = Utc.with_ymd_and_hms(2023, 11, 18, 0, 0, 0).unwrap();
        let upcoming = state.upcoming_events(now);
        let past = state.past_events(now);
        assert_eq!(upcoming.len(), 2);
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].id, "e1");
        // upcoming sorted soonest first
        assert!(upcoming[0].date <= upcoming[1].date);
    }

    #[test]
    fn club_search_filters_by_name_and_category() {
        let state = seed::demo_state();
        assert_eq!(state.search_clubs("robo", None).len(), 1);
        assert_eq!(state.search_clubs("", Some(Category::Technical)).len(), 3);
        assert_eq!(state.search_clubs("acm", Some(Category::Cultural)).len(), 0);
    }

    #[test]
    fn notifications_track_unread() {
        let mut state = AppState::new();
        state.push_notification("Event Reminder", "soon", NotificationKind::Info);
        assert_eq!(state.unread_notifications(), 1);
        state.mark_notifications_read();
        assert_eq!(state.unread_notifications(), 0);
        state.clear_notifications();
        assert!(state.notifications.is_empty());
    }
}
