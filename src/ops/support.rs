use crate::error::{AppError, AppResult};
use crate::models::{SupportRequest, SupportStatus};
use crate::store::AppState;
use chrono::Utc;
use nanoid::nanoid;

/// File a support ticket. Open to any visitor, signed in or not.
pub fn submit_request(
    state: &mut AppState,
    name: &str,
    email: &str,
    subject: &str,
    message: &str,
) -> AppResult<String> {
    if name.trim().is_empty() {
        return Err(AppError::MissingField("name"));
    }
    if email.trim().is_empty() {
        return Err(AppError::MissingField("email"));
    }
    if message.trim().is_empty() {
        return Err(AppError::MissingField("message"));
    }

    let request = SupportRequest {
        id: format!("sup_{}", nanoid!(8)),
        name: name.trim().to_owned(),
        email: email.trim().to_owned(),
        subject: subject.trim().to_owned(),
        message: message.trim().to_owned(),
        timestamp: Utc::now(),
        status: SupportStatus::Pending,
    };
    let id = request.id.clone();
    // newest first, matching the support desk
    state.support_requests.insert(0, request);
    Ok(id)
}

pub fn resolve_request(state: &mut AppState, request_id: &str) -> AppResult<()> {
    let request = state
        .support_requests
        .iter_mut()
        .find(|r| r.id == request_id)
        .ok_or(AppError::NotFound("support request"))?;
    request.status = SupportStatus::Resolved;
    Ok(())
}

pub fn delete_request(state: &mut AppState, request_id: &str) -> AppResult<()> {
    let before = state.support_requests.len();
    state.support_requests.retain(|r| r.id != request_id);
    if state.support_requests.len() == before {
        return Err(AppError::NotFound("support request"));
    }
    Ok(())
}

pub fn pending_count(state: &AppState) -> usize {
    state
        .support_requests
        .iter()
        .filter(|r| r.status == SupportStatus::Pending)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn ticket_lifecycle() {
        let mut state = seed::demo_state();
        let id = submit_request(
            &mut state,
            "Rahul Sharma",
            "rahul.sharma@vit.edu",
            "App issue",
            "The events tab is blank.",
        )
        .unwrap();
        assert_eq!(pending_count(&state), 1);

        resolve_request(&mut state, &id).unwrap();
        assert_eq!(pending_count(&state), 0);
        assert_eq!(state.support_requests[0].status, SupportStatus::Resolved);

        delete_request(&mut state, &id).unwrap();
        assert!(state.support_requests.is_empty());
        assert!(matches!(
            resolve_request(&mut state, &id),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn blank_submissions_are_rejected() {
        let mut state = seed::demo_state();
        assert!(matches!(
            submit_request(&mut state, "", "a@vit.edu", "s", "m"),
            Err(AppError::MissingField("name"))
        ));
        assert!(matches!(
            submit_request(&mut state, "A", "a@vit.edu", "s", "  "),
            Err(AppError::MissingField("message"))
        ));
        assert!(state.support_requests.is_empty());
    }
}
