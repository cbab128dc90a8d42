use crate::error::{AppError, AppResult};
use crate::models::{Announcement, ClubEvent, MediaItem, MediaKind, SocialLinks};
use crate::store::AppState;
use chrono::{DateTime, Utc};
use nanoid::nanoid;
use tracing::info;
use url::Url;

pub const MAX_REMINDERS: usize = 5;
pub const MAX_GALLERY_IMAGES: usize = 5;
pub const MAX_GALLERY_VIDEOS: usize = 1;

/// Event editor form. `title` and `date` are required; everything else
/// falls back the way the admin panel fills defaults.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub fee: Option<String>,
    pub description: String,
    pub image_url: Option<String>,
    pub reminders: Vec<DateTime<Utc>>,
    pub google_map_url: Option<String>,
    pub event_gallery: Vec<String>,
    pub mini_announcement: Option<String>,
}

fn validate_event_draft(draft: &EventDraft) -> AppResult<()> {
    if draft.title.trim().is_empty() {
        return Err(AppError::MissingField("title"));
    }
    if draft.date.is_none() {
        return Err(AppError::MissingField("date"));
    }
    if draft.reminders.is_empty() || draft.reminders.len() > MAX_REMINDERS {
        return Err(AppError::ReminderCount);
    }
    if draft.event_gallery.len() > MAX_GALLERY_IMAGES {
        return Err(AppError::GalleryLimit(MediaKind::Image));
    }
    Ok(())
}

pub fn create_event(state: &mut AppState, club_id: &str, draft: EventDraft) -> AppResult<String> {
    if !state.clubs.contains_key(club_id) {
        return Err(AppError::NotFound("club"));
    }
    validate_event_draft(&draft)?;

    let id = format!("e_{}", nanoid!(8));
    let event = ClubEvent {
        id: id.clone(),
        club_id: club_id.to_owned(),
        title: draft.title,
        date: draft.date.unwrap_or_else(Utc::now),
        location: draft.location.unwrap_or_else(|| "TBD".into()),
        fee: draft.fee,
        description: draft.description,
        image_url: draft
            .image_url
            .unwrap_or_else(|| format!("https://picsum.photos/600/300?random={}", nanoid!(6))),
        reminders: draft.reminders,
        is_live: false,
        stream_url: None,
        google_map_url: draft.google_map_url,
        registration_deadline: draft.registration_deadline,
        event_gallery: draft.event_gallery,
        mini_announcement: draft.mini_announcement,
    };
    state.events.insert(id.clone(), event);
    info!(club_id, event_id = %id, "event created");
    Ok(id)
}

pub fn update_event(state: &mut AppState, event_id: &str, draft: EventDraft) -> AppResult<()> {
    validate_event_draft(&draft)?;
    let event = state
        .events
        .get_mut(event_id)
        .ok_or(AppError::NotFound("event"))?;

    event.title = draft.title;
    event.date = draft.date.unwrap_or(event.date);
    event.registration_deadline = draft.registration_deadline;
    event.location = draft.location.unwrap_or_else(|| "TBD".into());
    event.fee = draft.fee;
    event.description = draft.description;
    if let Some(image_url) = draft.image_url {
        event.image_url = image_url;
    }
    event.reminders = draft.reminders;
    event.google_map_url = draft.google_map_url;
    event.event_gallery = draft.event_gallery;
    event.mini_announcement = draft.mini_announcement;
    Ok(())
}

pub fn delete_event(state: &mut AppState, event_id: &str) -> AppResult<()> {
    state
        .events
        .remove(event_id)
        .map(|_| ())
        .ok_or(AppError::NotFound("event"))
}

/// Going live needs a working stream URL; ending clears it.
pub fn start_live_stream(state: &mut AppState, event_id: &str, stream_url: &str) -> AppResult<()> {
    Url::parse(stream_url).map_err(|_| AppError::InvalidStreamUrl)?;
    let event = state
        .events
        .get_mut(event_id)
        .ok_or(AppError::NotFound("event"))?;
    event.is_live = true;
    event.stream_url = Some(stream_url.to_owned());
    info!(event_id, "stream started");
    Ok(())
}

pub fn end_live_stream(state: &mut AppState, event_id: &str) -> AppResult<()> {
    let event = state
        .events
        .get_mut(event_id)
        .ok_or(AppError::NotFound("event"))?;
    event.is_live = false;
    event.stream_url = None;
    info!(event_id, "stream ended");
    Ok(())
}

// --- announcements ---

pub fn post_announcement(
    state: &mut AppState,
    club_id: &str,
    content: &str,
    image_url: Option<String>,
) -> AppResult<String> {
    if content.trim().is_empty() {
        return Err(AppError::MissingField("content"));
    }
    let club = state.clubs.get(club_id).ok_or(AppError::NotFound("club"))?;
    let announcement = Announcement {
        id: format!("a_{}", nanoid!(8)),
        club_id: club_id.to_owned(),
        content: content.to_owned(),
        timestamp: Utc::now(),
        image_url,
        author_name: club.president.clone(),
    };
    let id = announcement.id.clone();
    // newest first, matching the feed
    state.announcements.insert(0, announcement);
    Ok(id)
}

pub fn edit_announcement(
    state: &mut AppState,
    announcement_id: &str,
    content: &str,
    image_url: Option<String>,
) -> AppResult<()> {
    if content.trim().is_empty() {
        return Err(AppError::MissingField("content"));
    }
    let announcement = state
        .announcements
        .iter_mut()
        .find(|a| a.id == announcement_id)
        .ok_or(AppError::NotFound("announcement"))?;
    announcement.content = content.to_owned();
    announcement.image_url = image_url;
    Ok(())
}

pub fn delete_announcement(state: &mut AppState, announcement_id: &str) -> AppResult<()> {
    let before = state.announcements.len();
    state.announcements.retain(|a| a.id != announcement_id);
    if state.announcements.len() == before {
        return Err(AppError::NotFound("announcement"));
    }
    Ok(())
}

// --- gallery media ---

fn gallery_has_room(state: &AppState, club_id: &str, kind: MediaKind) -> AppResult<()> {
    let count = state
        .club_media(club_id)
        .iter()
        .filter(|m| m.kind == kind)
        .count();
    let limit = match kind {
        MediaKind::Image => MAX_GALLERY_IMAGES,
        MediaKind::Video => MAX_GALLERY_VIDEOS,
    };
    if count >= limit {
        return Err(AppError::GalleryLimit(kind));
    }
    Ok(())
}

pub fn add_media(
    state: &mut AppState,
    club_id: &str,
    kind: MediaKind,
    url: &str,
    caption: Option<String>,
) -> AppResult<String> {
    if url.is_empty() {
        return Err(AppError::MissingField("media url"));
    }
    if !state.clubs.contains_key(club_id) {
        return Err(AppError::NotFound("club"));
    }
    gallery_has_room(state, club_id, kind)?;

    let item = MediaItem {
        id: format!("m_{}", nanoid!(8)),
        club_id: club_id.to_owned(),
        kind,
        url: url.to_owned(),
        caption,
        timestamp: Utc::now(),
    };
    let id = item.id.clone();
    state.media.push(item);
    Ok(id)
}

pub fn edit_media(
    state: &mut AppState,
    media_id: &str,
    kind: MediaKind,
    url: &str,
    caption: Option<String>,
) -> AppResult<()> {
    if url.is_empty() {
        return Err(AppError::MissingField("media url"));
    }
    let original = state
        .media
        .iter()
        .find(|m| m.id == media_id)
        .ok_or(AppError::NotFound("media item"))?;
    // a kind change counts against the caps like a fresh upload
    if original.kind != kind {
        let club_id = original.club_id.clone();
        gallery_has_room(state, &club_id, kind)?;
    }
    let item = state
        .media
        .iter_mut()
        .find(|m| m.id == media_id)
        .ok_or(AppError::NotFound("media item"))?;
    item.kind = kind;
    item.url = url.to_owned();
    item.caption = caption;
    Ok(())
}

pub fn delete_media(state: &mut AppState, media_id: &str) -> AppResult<()> {
    let before = state.media.len();
    state.media.retain(|m| m.id != media_id);
    if state.media.len() == before {
        return Err(AppError::NotFound("media item"));
    }
    Ok(())
}

// --- club settings ---

#[derive(Debug, Clone, Default)]
pub struct ClubSettings {
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub social_links: Option<SocialLinks>,
}

pub fn update_club_settings(
    state: &mut AppState,
    club_id: &str,
    settings: ClubSettings,
) -> AppResult<()> {
    let club = state
        .clubs
        .get_mut(club_id)
        .ok_or(AppError::NotFound("club"))?;
    if let Some(description) = settings.description {
        club.description = description;
    }
    if let Some(logo_url) = settings.logo_url {
        club.logo_url = logo_url;
    }
    if let Some(banner_url) = settings.banner_url {
        club.banner_url = banner_url;
    }
    if let Some(social_links) = settings.social_links {
        club.social_links = Some(social_links);
    }
    Ok(())
}

/// Rotate the shared-secret club password. The current secret must match
/// and the new one must be non-empty and confirmed.
pub fn rotate_club_password(
    state: &mut AppState,
    club_id: &str,
    current: &str,
    new: &str,
    confirm: &str,
) -> AppResult<()> {
    let club = state
        .clubs
        .get_mut(club_id)
        .ok_or(AppError::NotFound("club"))?;
    if club.password.as_deref() != Some(current) {
        return Err(AppError::WrongCurrentPassword);
    }
    if new.is_empty() || new != confirm {
        return Err(AppError::PasswordMismatch);
    }
    club.password = Some(new.to_owned());
    info!(club_id, "club access password rotated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use chrono::TimeZone;

    fn draft(reminders: usize) -> EventDraft {
        let date = Utc.with_ymd_and_hms(2024, 1, 10, 18, 0, 0).unwrap();
        EventDraft {
            title: "Hack Night".into(),
            date: Some(date),
            reminders: (0..reminders)
                .map(|i| date - chrono::Duration::days(i as i64 + 1))
                .collect(),
            ..EventDraft::default()
        }
    }

    #[test]
    fn event_requires_title_date_and_reminders() {
        let mut state = seed::demo_state();

        let mut missing_title = draft(1);
        missing_title.title = "  ".into();
        assert!(matches!(
            create_event(&mut state, "c1", missing_title),
            Err(AppError::MissingField("title"))
        ));

        let mut missing_date = draft(1);
        missing_date.date = None;
        assert!(matches!(
            create_event(&mut state, "c1", missing_date),
            Err(AppError::MissingField("date"))
        ));

        assert!(matches!(
            create_event(&mut state, "c1", draft(0)),
            Err(AppError::ReminderCount)
        ));
        assert!(matches!(
            create_event(&mut state, "c1", draft(6)),
            Err(AppError::ReminderCount)
        ));

        assert!(create_event(&mut state, "c1", draft(1)).is_ok());
        assert!(create_event(&mut state, "c1", draft(5)).is_ok());
    }

    #[test]
    fn created_event_gets_panel_defaults() {
        let mut state = seed::demo_state();
        let id = create_event(&mut state, "c1", draft(2)).unwrap();
        let event = state.events.get(&id).unwrap();
        assert_eq!(event.location, "TBD");
        assert!(!event.is_live);
        assert_eq!(event.club_id, "c1");
    }

    #[test]
    fn update_keeps_the_reminder_rule() {
        let mut state = seed::demo_state();
        let id = create_event(&mut state, "c1", draft(2)).unwrap();
        assert!(matches!(
            update_event(&mut state, &id, draft(0)),
            Err(AppError::ReminderCount)
        ));
        update_event(&mut state, &id, draft(5)).unwrap();
        assert_eq!(state.events.get(&id).unwrap().reminders.len(), 5);
    }

    #[test]
    fn live_toggle_requires_a_stream_url() {
        let mut state = seed::demo_state();
        assert!(matches!(
            start_live_stream(&mut state, "e1", "not a url"),
            Err(AppError::InvalidStreamUrl)
        ));
        start_live_stream(&mut state, "e1", "https://www.youtube.com/watch?v=abc").unwrap();
        let event = state.events.get("e1").unwrap();
        assert!(event.is_live);
        assert!(event.stream_url.is_some());

        end_live_stream(&mut state, "e1").unwrap();
        let event = state.events.get("e1").unwrap();
        assert!(!event.is_live);
        assert!(event.stream_url.is_none());
    }

    #[test]
    fn announcements_require_content() {
        let mut state = seed::demo_state();
        assert!(matches!(
            post_announcement(&mut state, "c1", "  ", None),
            Err(AppError::MissingField("content"))
        ));
        let id = post_announcement(&mut state, "c1", "Meet at 6.", None).unwrap();
        // author is the club president
        assert_eq!(state.announcements[0].author_name, "Aarav Patel");
        edit_announcement(&mut state, &id, "Meet at 7.", None).unwrap();
        assert_eq!(state.announcements[0].content, "Meet at 7.");
        delete_announcement(&mut state, &id).unwrap();
        assert!(matches!(
            delete_announcement(&mut state, &id),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn gallery_caps_are_per_kind() {
        let mut state = seed::demo_state();
        // seed ships two c1 images; top up to the cap of five
        for i in 0..3 {
            add_media(
                &mut state,
                "c1",
                MediaKind::Image,
                &format!("https://img/{i}"),
                None,
            )
            .unwrap();
        }
        assert!(matches!(
            add_media(&mut state, "c1", MediaKind::Image, "https://img/6", None),
            Err(AppError::GalleryLimit(MediaKind::Image))
        ));
        // a first video still fits
        let video = add_media(&mut state, "c1", MediaKind::Video, "https://vid/1", None).unwrap();
        assert!(matches!(
            add_media(&mut state, "c1", MediaKind::Video, "https://vid/2", None),
            Err(AppError::GalleryLimit(MediaKind::Video))
        ));
        // converting an image into a second video trips the cap too
        let image_id = state
            .media
            .iter()
            .find(|m| m.club_id == "c1" && m.kind == MediaKind::Image)
            .map(|m| m.id.clone())
            .unwrap();
        assert!(matches!(
            edit_media(&mut state, &image_id, MediaKind::Video, "https://vid/3", None),
            Err(AppError::GalleryLimit(MediaKind::Video))
        ));
        // same-kind edits are free
        edit_media(&mut state, &video, MediaKind::Video, "https://vid/1b", None).unwrap();
    }

    #[test]
    fn password_rotation_checks_the_current_secret() {
        let mut state = seed::demo_state();
        assert!(matches!(
            rotate_club_password(&mut state, "c1", "wrong", "new", "new"),
            Err(AppError::WrongCurrentPassword)
        ));
        assert!(matches!(
            rotate_club_password(&mut state, "c1", "1234", "new", "other"),
            Err(AppError::PasswordMismatch)
        ));
        assert!(matches!(
            rotate_club_password(&mut state, "c1", "1234", "", ""),
            Err(AppError::PasswordMismatch)
        ));
        rotate_club_password(&mut state, "c1", "1234", "secret", "secret").unwrap();
        assert_eq!(
            state.clubs.get("c1").unwrap().password.as_deref(),
            Some("secret")
        );
    }

    #[test]
    fn settings_update_is_partial() {
        let mut state = seed::demo_state();
        update_club_settings(
            &mut state,
            "c4",
            ClubSettings {
                description: Some("We jam louder now.".into()),
                ..ClubSettings::default()
            },
        )
        .unwrap();
        let club = state.clubs.get("c4").unwrap();
        assert_eq!(club.description, "We jam louder now.");
        assert!(club.banner_url.contains("picsum"));
    }
}
