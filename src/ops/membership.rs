use crate::error::{AppError, AppResult};
use crate::models::{MembershipRequest, RequestStatus};
use crate::store::AppState;
use chrono::Utc;
use nanoid::nanoid;
use tracing::info;

/// The session user asks to join a club. Produces a pending request for the
/// club's admin and marks the club as pending on the user. Joined and
/// pending sets stay disjoint: duplicate requests and re-joins are refused.
pub fn request_join(state: &mut AppState, club_id: &str) -> AppResult<String> {
    if !state.clubs.contains_key(club_id) {
        return Err(AppError::NotFound("club"));
    }
    let user = state.current_user().ok_or(AppError::NotFound("session user"))?;
    if user.joined_clubs.iter().any(|c| c == club_id) {
        return Err(AppError::AlreadyMember);
    }
    if user.pending_clubs.iter().any(|c| c == club_id) {
        return Err(AppError::AlreadyRequested);
    }

    let request = MembershipRequest {
        id: format!("r_{}", nanoid!(8)),
        club_id: club_id.to_owned(),
        user_email: user.email.clone(),
        user_name: user.name.clone(),
        department: user.department.clone().unwrap_or_else(|| "General".into()),
        status: RequestStatus::Pending,
        request_date: Utc::now(),
    };
    let id = request.id.clone();
    state.membership_requests.push(request);

    let user = state
        .current_user_mut()
        .ok_or(AppError::NotFound("session user"))?;
    user.pending_clubs.push(club_id.to_owned());
    info!(club_id, request_id = %id, "membership requested");
    Ok(id)
}

/// Admin approval: the request becomes terminal and the club id moves from
/// the requester's pending set to their joined set.
pub fn approve_request(state: &mut AppState, request_id: &str) -> AppResult<()> {
    settle_request(state, request_id, RequestStatus::Approved)
}

/// Admin rejection: terminal; the club id is dropped from the requester's
/// pending set.
pub fn reject_request(state: &mut AppState, request_id: &str) -> AppResult<()> {
    settle_request(state, request_id, RequestStatus::Rejected)
}

fn settle_request(
    state: &mut AppState,
    request_id: &str,
    status: RequestStatus,
) -> AppResult<()> {
    let request = state
        .membership_requests
        .iter_mut()
        .find(|r| r.id == request_id)
        .ok_or(AppError::NotFound("membership request"))?;
    if request.status != RequestStatus::Pending {
        return Err(AppError::NotFound("membership request"));
    }
    request.status = status;
    let club_id = request.club_id.clone();
    let user_email = request.user_email.clone();

    // the requester may have signed up through a different surface and not
    // exist in the identity store; the request itself still settles
    if let Some(user) = state.find_user_mut(&user_email) {
        user.pending_clubs.retain(|c| c != &club_id);
        if status == RequestStatus::Approved && !user.joined_clubs.contains(&club_id) {
            user.joined_clubs.push(club_id.clone());
        }
    }
    info!(request_id, club_id, ?status, "membership request settled");
    Ok(())
}
