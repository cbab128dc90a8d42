use crate::error::{AppError, AppResult};
use crate::models::{Role, User};
use crate::store::AppState;
use tracing::info;

pub const INSTITUTIONAL_DOMAIN: &str = "@vit.edu";
/// The one accepted verification code. There is no real OTP delivery.
pub const ACCEPTED_OTP: &str = "1234";
pub const SYSTEM_ACCESS_PASSWORD: &str = "1234";

// fixed identity presented by the mock federated login
const GOOGLE_SEED_EMAIL: &str = "student@vit.edu";
const GOOGLE_SEED_NAME: &str = "Google User";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginStep {
    Landing,
    Email,
    Otp {
        email: String,
    },
    /// A brand-new identity: role, department and (for privileged roles) a
    /// shared-secret password still need collecting.
    RoleSelection {
        email: String,
        name: String,
    },
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpOutcome {
    /// Known email; the session now points at the existing record.
    SignedIn,
    /// Unknown email; the flow moved to the role-assignment step.
    NeedsRole,
}

#[derive(Debug, Clone)]
pub struct RoleSelection {
    pub role: Role,
    pub department: String,
    pub password: Option<String>,
}

/// The linearly-ordered login screens. Guards reject without moving the
/// step, so a failed attempt can simply be retried.
#[derive(Debug, Clone)]
pub struct LoginFlow {
    step: LoginStep,
}

impl Default for LoginFlow {
    fn default() -> LoginFlow {
        LoginFlow::new()
    }
}

impl LoginFlow {
    pub fn new() -> LoginFlow {
        LoginFlow {
            step: LoginStep::Landing,
        }
    }

    pub fn step(&self) -> &LoginStep {
        &self.step
    }

    pub fn begin_email(&mut self) {
        self.step = LoginStep::Email;
    }

    /// Validate the address and move to the verification step.
    pub fn submit_email(&mut self, email: &str) -> AppResult<()> {
        let email = email.trim();
        if email.is_empty() || !email.ends_with(INSTITUTIONAL_DOMAIN) {
            return Err(AppError::InvalidEmail);
        }
        self.step = LoginStep::Otp {
            email: email.to_owned(),
        };
        Ok(())
    }

    /// Verify the code. Exactly one literal value is accepted; anything
    /// else fails without touching the identity store or the session.
    pub fn submit_otp(&mut self, state: &mut AppState, otp: &str) -> AppResult<OtpOutcome> {
        let LoginStep::Otp { email } = &self.step else {
            return Err(AppError::InvalidCode);
        };
        if otp != ACCEPTED_OTP {
            return Err(AppError::InvalidCode);
        }
        let email = email.clone();

        if let Some(existing) = state.find_user(&email) {
            let email = existing.email.clone();
            state.set_session(&email);
            info!(%email, "signed in existing user");
            self.step = LoginStep::Complete;
            return Ok(OtpOutcome::SignedIn);
        }

        let name = email.split('@').next().unwrap_or(&email).to_owned();
        self.step = LoginStep::RoleSelection { email, name };
        Ok(OtpOutcome::NeedsRole)
    }

    /// Mock federated login: skips verification and always seeds the
    /// role-assignment step with the same fixed identity.
    pub fn google_login(&mut self) {
        self.step = LoginStep::RoleSelection {
            email: GOOGLE_SEED_EMAIL.to_owned(),
            name: GOOGLE_SEED_NAME.to_owned(),
        };
    }

    /// Finish signup for a brand-new identity. Privileged roles are gated
    /// by shared secrets; Student/Faculty need none. On success the new
    /// user is inserted and becomes the session.
    pub fn complete_role_selection(
        &mut self,
        state: &mut AppState,
        selection: RoleSelection,
    ) -> AppResult<()> {
        let LoginStep::RoleSelection { email, name } = &self.step else {
            return Err(AppError::NotFound("pending role selection"));
        };
        let (email, name) = (email.clone(), name.clone());

        let supplied = selection.password.as_deref().unwrap_or("");
        match selection.role {
            Role::ClubAdmin => {
                let club = state
                    .club_for_admin(&email)
                    .ok_or(AppError::NoClubAssigned)?;
                if club.password.as_deref() != Some(supplied) {
                    return Err(AppError::WrongClubPassword);
                }
            }
            Role::SuperAdmin => {
                if supplied != SYSTEM_ACCESS_PASSWORD {
                    return Err(AppError::WrongSystemPassword);
                }
            }
            Role::Student | Role::Faculty => {}
        }

        // joinedClubs starts empty even for a Club Admin; their club is
        // resolved through adminEmail, not membership
        let user = User {
            email,
            name,
            role: selection.role,
            department: Some(selection.department),
            prn: None,
            roll_no: None,
            division: None,
            profile_picture: None,
            joined_clubs: vec![],
            pending_clubs: vec![],
            registered_events: vec![],
            transactions: vec![],
        };
        let email = user.email.clone();
        state.insert_user(user);
        state.set_session(&email);
        info!(%email, role = ?selection.role, "registered new user");
        self.step = LoginStep::Complete;
        Ok(())
    }
}

/// Clear the session and reset the assistant transcript to its greeting.
pub fn logout(state: &mut AppState) {
    state.clear_session();
}
