use chrono::{Duration, TimeZone, Utc};
use vit_clubs_hub::error::AppError;
use vit_clubs_hub::models::{MediaKind, RequestStatus, Role};
use vit_clubs_hub::ops::club_admin::{self, EventDraft};
use vit_clubs_hub::ops::{membership, super_admin, support};
use vit_clubs_hub::seed;
use vit_clubs_hub::store::AppState;

fn event_draft(reminders: usize) -> EventDraft {
    let date = Utc.with_ymd_and_hms(2024, 2, 1, 17, 0, 0).unwrap();
    EventDraft {
        title: "Android Study Jam".into(),
        date: Some(date),
        reminders: (0..reminders)
            .map(|i| date - Duration::days(i as i64 + 1))
            .collect(),
        ..EventDraft::default()
    }
}

#[test]
fn reminder_bounds_are_enforced_both_ways() {
    let mut state = seed::demo_state();
    assert!(matches!(
        club_admin::create_event(&mut state, "c1", event_draft(0)),
        Err(AppError::ReminderCount)
    ));
    assert!(matches!(
        club_admin::create_event(&mut state, "c1", event_draft(6)),
        Err(AppError::ReminderCount)
    ));
    assert!(club_admin::create_event(&mut state, "c1", event_draft(1)).is_ok());
    assert!(club_admin::create_event(&mut state, "c1", event_draft(5)).is_ok());
}

#[test]
fn gallery_caps_reject_the_sixth_image_but_not_the_first_video() {
    let mut state = seed::demo_state();
    // seed ships 2 images for c1; fill the gallery to 5
    for i in 0..3 {
        club_admin::add_media(
            &mut state,
            "c1",
            MediaKind::Image,
            &format!("https://img.example/{i}"),
            None,
        )
        .unwrap();
    }
    assert!(matches!(
        club_admin::add_media(&mut state, "c1", MediaKind::Image, "https://img.example/6", None),
        Err(AppError::GalleryLimit(MediaKind::Image))
    ));
    assert!(
        club_admin::add_media(&mut state, "c1", MediaKind::Video, "https://vid.example/1", None)
            .is_ok()
    );
    assert!(matches!(
        club_admin::add_media(&mut state, "c1", MediaKind::Video, "https://vid.example/2", None),
        Err(AppError::GalleryLimit(MediaKind::Video))
    ));
    // a different club's gallery is unaffected
    assert!(
        club_admin::add_media(&mut state, "c2", MediaKind::Image, "https://img.example/c2", None)
            .is_ok()
    );
}

#[test]
fn approval_settles_the_request_and_updates_the_member() {
    let mut state = seed::demo_state();
    state.set_session("neha.gupta@vit.edu");
    let id = membership::request_join(&mut state, "c2").unwrap();
    assert_eq!(state.pending_requests_for("c2").len(), 3); // 2 seeded + 1 new

    membership::approve_request(&mut state, &id).unwrap();
    let user = state.find_user("neha.gupta@vit.edu").unwrap();
    assert!(user.joined_clubs.contains(&"c2".to_owned()));
    assert!(user.pending_clubs.is_empty());
    let settled = state
        .membership_requests
        .iter()
        .find(|r| r.id == id)
        .unwrap();
    assert_eq!(settled.status, RequestStatus::Approved);
}

#[test]
fn saving_a_club_provisions_and_promotes_admins() {
    let mut state = seed::demo_state();
    let draft = super_admin::ClubDraft {
        name: "Cine Circle".into(),
        description: "Film screenings and discussion.".into(),
        president: "Devika Rao".into(),
        admin_email: "Devika.Rao@vit.edu".into(),
        password: Some("matinee".into()),
        ..super_admin::ClubDraft::default()
    };
    let id = super_admin::save_club(&mut state, None, draft).unwrap();

    let admin = state.find_user("devika.rao@vit.edu").unwrap();
    assert_eq!(admin.role, Role::ClubAdmin);
    assert_eq!(admin.joined_clubs, vec![id.clone()]);
    // the admin's club resolves through adminEmail
    assert_eq!(state.club_for_admin("devika.rao@vit.edu").unwrap().id, id);
}

#[test]
fn club_deletion_scrubs_memberships_and_tolerates_orphans() {
    let mut state = seed::demo_state();
    super_admin::delete_club(&mut state, "c5").unwrap();

    assert!(!state.clubs.contains_key("c5"));
    assert!(state.users().all(|u| !u.joined_clubs.contains(&"c5".to_owned())));
    // RoboWars is orphaned but still listed and still registerable data
    assert!(state.events.contains_key("e2"));
    let now = Utc.with_ymd_and_hms(2023, 11, 10, 0, 0, 0).unwrap();
    assert!(state.upcoming_events(now).iter().any(|e| e.id == "e2"));
}

#[test]
fn support_desk_round_trip() {
    let mut state = seed::demo_state();
    let id = support::submit_request(
        &mut state,
        "Vikram Singh",
        "vikram.singh@vit.edu",
        "Projector",
        "The seminar hall projector flickers.",
    )
    .unwrap();
    assert_eq!(support::pending_count(&state), 1);
    support::resolve_request(&mut state, &id).unwrap();
    assert_eq!(support::pending_count(&state), 0);
    support::delete_request(&mut state, &id).unwrap();
    assert!(state.support_requests.is_empty());
}

#[test]
fn password_rotation_gates_on_the_current_secret() {
    let mut state = seed::demo_state();
    assert!(matches!(
        club_admin::rotate_club_password(&mut state, "c2", "wrong", "next", "next"),
        Err(AppError::WrongCurrentPassword)
    ));
    club_admin::rotate_club_password(&mut state, "c2", "1234", "next", "next").unwrap();

    // the login gate now expects the rotated secret
    let mut flow = vit_clubs_hub::ops::auth::LoginFlow::new();
    state.clubs.get_mut("c2").unwrap().admin_email = Some("fresh.admin@vit.edu".into());
    flow.submit_email("fresh.admin@vit.edu").unwrap();
    flow.submit_otp(&mut state, "1234").unwrap();
    let err = flow
        .complete_role_selection(
            &mut state,
            vit_clubs_hub::ops::auth::RoleSelection {
                role: Role::ClubAdmin,
                department: "Information Technology".into(),
                password: Some("1234".into()),
            },
        )
        .unwrap_err();
    assert!(matches!(err, AppError::WrongClubPassword));
}

#[test]
fn orphan_tolerant_views_skip_missing_owners() {
    let mut state: AppState = seed::demo_state();
    super_admin::delete_club(&mut state, "c1").unwrap();
    // the announcements and media still belong to the dead id and remain
    // addressable without panicking
    assert_eq!(state.club_announcements("c1").len(), 1);
    assert_eq!(state.club_media("c1").len(), 2);
    assert!(state.clubs.get("c1").is_none());
}
