use crate::error::{AppError, AppResult};
use crate::models::{Category, Club, Role, SocialLinks, User};
use crate::store::AppState;
use itertools::Itertools;
use nanoid::nanoid;
use tracing::info;

/// Club editor form. Name, president and admin email are required; the
/// category falls back to Other.
#[derive(Debug, Clone, Default)]
pub struct ClubDraft {
    pub name: String,
    pub category: Option<Category>,
    pub description: String,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub member_count: Option<u32>,
    pub president: String,
    pub admin_email: String,
    pub password: Option<String>,
    pub department: Option<String>,
    pub social_links: Option<SocialLinks>,
}

/// Create or edit a club. Saving also upserts the Club Admin user for the
/// club's `admin_email`: an existing record is promoted and linked, a
/// missing one is created with the club pre-joined. The two writes are
/// sequential, not atomic.
pub fn save_club(
    state: &mut AppState,
    existing_id: Option<&str>,
    draft: ClubDraft,
) -> AppResult<String> {
    if draft.name.trim().is_empty() {
        return Err(AppError::MissingField("name"));
    }
    if draft.president.trim().is_empty() {
        return Err(AppError::MissingField("president"));
    }
    if draft.admin_email.trim().is_empty() {
        return Err(AppError::MissingField("admin email"));
    }
    if let Some(id) = existing_id {
        if !state.clubs.contains_key(id) {
            return Err(AppError::NotFound("club"));
        }
    }

    let club_id = existing_id
        .map(str::to_owned)
        .unwrap_or_else(|| format!("c_{}", nanoid!(8)));
    let previous = existing_id.and_then(|id| state.clubs.get(id));

    let club = Club {
        id: club_id.clone(),
        name: draft.name.trim().to_owned(),
        category: draft.category.unwrap_or(Category::Other),
        description: draft.description,
        logo_url: draft
            .logo_url
            .or_else(|| previous.map(|c| c.logo_url.clone()))
            .unwrap_or_default(),
        banner_url: draft
            .banner_url
            .or_else(|| previous.map(|c| c.banner_url.clone()))
            .unwrap_or_default(),
        member_count: draft
            .member_count
            .or_else(|| previous.map(|c| c.member_count))
            .unwrap_or(0),
        president: draft.president.trim().to_owned(),
        password: draft
            .password
            .or_else(|| previous.and_then(|c| c.password.clone())),
        next_event_id: previous.and_then(|c| c.next_event_id.clone()),
        admin_email: Some(draft.admin_email.to_lowercase()),
        department: draft.department.clone(),
        social_links: draft
            .social_links
            .or_else(|| previous.and_then(|c| c.social_links.clone())),
    };
    state.clubs.insert(club_id.clone(), club);

    // second write: keep the identity store in step with the catalog
    let admin_email = draft.admin_email.to_lowercase();
    match state.find_user_mut(&admin_email) {
        Some(user) => {
            user.role = Role::ClubAdmin;
            if !user.joined_clubs.contains(&club_id) {
                user.joined_clubs.push(club_id.clone());
            }
        }
        None => {
            state.insert_user(User {
                email: admin_email.clone(),
                name: draft.president.trim().to_owned(),
                role: Role::ClubAdmin,
                department: draft.department,
                prn: None,
                roll_no: None,
                division: None,
                profile_picture: None,
                joined_clubs: vec![club_id.clone()],
                pending_clubs: vec![],
                registered_events: vec![],
                transactions: vec![],
            });
        }
    }

    info!(club_id = %club_id, admin = %admin_email, "club saved");
    Ok(club_id)
}

/// Delete a club and scrub it from every user's membership sets. The
/// club's events, announcements and media are intentionally left behind;
/// reads tolerate the orphans.
pub fn delete_club(state: &mut AppState, club_id: &str) -> AppResult<()> {
    state
        .clubs
        .remove(club_id)
        .ok_or(AppError::NotFound("club"))?;

    for user in state.users_mut() {
        user.joined_clubs.retain(|c| c != club_id);
        user.pending_clubs.retain(|c| c != club_id);
    }
    info!(club_id, "club deleted");
    Ok(())
}

/// Club Admin directory, filtered by a case-insensitive name/email search.
pub fn list_club_admins<'a>(state: &'a AppState, search: &str) -> Vec<&'a User> {
    let needle = search.to_lowercase();
    state
        .users()
        .filter(|u| u.role == Role::ClubAdmin)
        .filter(|u| {
            needle.is_empty()
                || u.name.to_lowercase().contains(&needle)
                || u.email.to_lowercase().contains(&needle)
        })
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleCounts {
    pub students: usize,
    pub faculty: usize,
    pub club_admins: usize,
}

pub fn role_counts(state: &AppState) -> RoleCounts {
    RoleCounts {
        students: state.users().filter(|u| u.role == Role::Student).count(),
        faculty: state.users().filter(|u| u.role == Role::Faculty).count(),
        club_admins: state.users().filter(|u| u.role == Role::ClubAdmin).count(),
    }
}

/// (club name, joined-user count) per club, for the analytics tab.
pub fn membership_tallies(state: &AppState) -> Vec<(String, usize)> {
    state
        .clubs
        .values()
        .sorted_by(|a, b| a.id.cmp(&b.id))
        .map(|club| {
            let count = state
                .users()
                .filter(|u| u.joined_clubs.iter().any(|c| c == &club.id))
                .count();
            (club.name.clone(), count)
        })
        .collect()
}
