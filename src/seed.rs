//! Demo dataset the app ships with: the catalog, identity store and inbox
//! a fresh install starts from.

use crate::models::*;
use crate::store::AppState;
use chrono::{DateTime, Utc};

fn ts(s: &str) -> DateTime<Utc> {
    s.parse().expect("valid demo timestamp")
}

fn club(
    id: &str,
    name: &str,
    category: Category,
    description: &str,
    seq: u32,
    member_count: u32,
    president: &str,
    admin_email: &str,
    next_event_id: Option<&str>,
) -> Club {
    Club {
        id: id.into(),
        name: name.into(),
        category,
        description: description.into(),
        logo_url: format!("https://picsum.photos/100/100?random={seq}"),
        banner_url: format!("https://picsum.photos/600/300?random={seq}"),
        member_count,
        president: president.into(),
        password: Some("1234".into()),
        next_event_id: next_event_id.map(str::to_owned),
        admin_email: Some(admin_email.into()),
        department: None,
        social_links: None,
    }
}

fn student(email: &str, name: &str, department: &str, joined: &[&str]) -> User {
    User {
        email: email.into(),
        name: name.into(),
        role: Role::Student,
        department: Some(department.into()),
        prn: None,
        roll_no: None,
        division: None,
        profile_picture: None,
        joined_clubs: joined.iter().map(|s| (*s).to_owned()).collect(),
        pending_clubs: vec![],
        registered_events: vec![],
        transactions: vec![],
    }
}

fn with_role(mut user: User, role: Role) -> User {
    user.role = role;
    user
}

pub fn demo_state() -> AppState {
    let mut state = AppState::new();

    for c in [
        club(
            "c1",
            "Google Developer Student Clubs (GDSC)",
            Category::Technical,
            "GDSC VIT Pune is a community group for students interested in Google developer \
             technologies. Students from all undergraduate or graduate programs with an interest \
             in growing as a developer are welcome.",
            1,
            450,
            "Aarav Patel",
            "aarav.patel@vit.edu",
            Some("e1"),
        ),
        club(
            "c2",
            "ACM Student Chapter",
            Category::Technical,
            "Association for Computing Machinery (ACM) is the world's largest educational and \
             scientific computing society. We organize hackathons, coding competitions, and \
             workshops.",
            2,
            380,
            "Isha Sharma",
            "priya.verma@vit.edu",
            None,
        ),
        club(
            "c3",
            "VishwaConclave",
            Category::Social,
            "A platform for students to engage in diplomacy and international relations through \
             Model United Nations and other debate formats.",
            3,
            120,
            "Rohan Deshmukh",
            "rohan.deshmukh@vit.edu",
            Some("e3"),
        ),
        club(
            "c4",
            "V-Rock",
            Category::Cultural,
            "The official music band and club of VIT Pune. We jam, we perform, we rock!",
            4,
            60,
            "Sameer Khan",
            "sameer.khan@vit.edu",
            None,
        ),
        club(
            "c5",
            "Robotics Forum",
            Category::Technical,
            "Building the future, one bot at a time. We participate in Robocon, ABU, and various \
             national robotics competitions.",
            5,
            200,
            "Ananya Gupta",
            "ananya.gupta@vit.edu",
            Some("e2"),
        ),
    ] {
        state.clubs.insert(c.id.clone(), c);
    }

    for e in [
        ClubEvent {
            id: "e1".into(),
            club_id: "c1".into(),
            title: "Cloud Study Jam".into(),
            date: ts("2023-11-15T10:00:00Z"),
            location: "Auditorium, Building 2".into(),
            fee: Some("Free".into()),
            description: "Learn the basics of Google Cloud Platform and earn badges. Hands-on \
                          workshop with expert guidance."
                .into(),
            image_url: "https://picsum.photos/600/300?random=10".into(),
            reminders: vec![],
            is_live: false,
            stream_url: None,
            google_map_url: None,
            registration_deadline: None,
            event_gallery: vec![],
            mini_announcement: None,
        },
        ClubEvent {
            id: "e2".into(),
            club_id: "c5".into(),
            title: "RoboWars 2023".into(),
            date: ts("2023-11-20T09:00:00Z"),
            location: "Main Ground".into(),
            fee: Some("₹200".into()),
            description: "The ultimate battle of bots. Watch as student-made robots compete for \
                          glory."
                .into(),
            image_url: "https://picsum.photos/600/300?random=11".into(),
            reminders: vec![],
            is_live: false,
            stream_url: None,
            google_map_url: None,
            registration_deadline: None,
            event_gallery: vec![],
            mini_announcement: None,
        },
        ClubEvent {
            id: "e3".into(),
            club_id: "c3".into(),
            title: "Diplomacy Summit".into(),
            date: ts("2023-11-25T11:00:00Z"),
            location: "Conference Hall".into(),
            fee: Some("₹150".into()),
            description: "A panel discussion with eminent diplomats and policy makers.".into(),
            image_url: "https://picsum.photos/600/300?random=12".into(),
            reminders: vec![],
            is_live: false,
            stream_url: None,
            google_map_url: None,
            registration_deadline: None,
            event_gallery: vec![],
            mini_announcement: None,
        },
    ] {
        state.events.insert(e.id.clone(), e);
    }

    let mut rahul = student(
        "rahul.sharma@vit.edu",
        "Rahul Sharma",
        "Computer Engineering",
        &["c1"],
    );
    rahul.registered_events = vec![Registration {
        event_id: "e1".into(),
        status: RegistrationStatus::Registered,
    }];
    state.insert_user(rahul);

    state.insert_user(with_role(
        student(
            "priya.verma@vit.edu",
            "Priya Verma",
            "Information Technology",
            &["c2"],
        ),
        Role::ClubAdmin,
    ));
    state.insert_user(with_role(
        student(
            "vikram.singh@vit.edu",
            "Vikram Singh",
            "Mechanical Engineering",
            &[],
        ),
        Role::Faculty,
    ));
    state.insert_user(student(
        "neha.gupta@vit.edu",
        "Neha Gupta",
        "Electronics & Telecom",
        &["c4"],
    ));
    state.insert_user(with_role(
        student(
            "super.admin@vit.edu",
            "System Administrator",
            "Administration",
            &[],
        ),
        Role::SuperAdmin,
    ));
    for (email, name, department, joined) in [
        (
            "aarav.patel@vit.edu",
            "Aarav Patel",
            "Computer Engineering",
            "c1",
        ),
        (
            "rohan.deshmukh@vit.edu",
            "Rohan Deshmukh",
            "Mechanical Engineering",
            "c3",
        ),
        (
            "sameer.khan@vit.edu",
            "Sameer Khan",
            "Electronics & Telecom",
            "c4",
        ),
        (
            "ananya.gupta@vit.edu",
            "Ananya Gupta",
            "Artificial Intelligence",
            "c5",
        ),
    ] {
        state.insert_user(with_role(
            student(email, name, department, &[joined]),
            Role::ClubAdmin,
        ));
    }

    state.announcements = vec![
        Announcement {
            id: "a1".into(),
            club_id: "c2".into(),
            content: "We are thrilled to announce that registrations for the annual Hackathon \
                      are now open! Visit the link in bio to register your team."
                .into(),
            timestamp: ts("2023-10-28T09:30:00Z"),
            image_url: Some("https://picsum.photos/600/300?random=50".into()),
            author_name: "Isha Sharma".into(),
        },
        Announcement {
            id: "a2".into(),
            club_id: "c1".into(),
            content: "Reminder: The Cloud Study Jam session starts tomorrow at 10 AM. Please \
                      bring your laptops fully charged!"
                .into(),
            timestamp: ts("2023-11-14T18:00:00Z"),
            image_url: None,
            author_name: "Aarav Patel".into(),
        },
    ];

    state.membership_requests = vec![
        MembershipRequest {
            id: "r1".into(),
            club_id: "c2".into(),
            user_email: "rohit.kumar@vit.edu".into(),
            user_name: "Rohit Kumar".into(),
            department: "Computer Engineering".into(),
            status: RequestStatus::Pending,
            request_date: ts("2023-11-01T10:00:00Z"),
        },
        MembershipRequest {
            id: "r2".into(),
            club_id: "c2".into(),
            user_email: "sneha.patil@vit.edu".into(),
            user_name: "Sneha Patil".into(),
            department: "Artificial Intelligence".into(),
            status: RequestStatus::Pending,
            request_date: ts("2023-11-02T14:20:00Z"),
        },
    ];

    state.notifications = vec![
        NotificationItem {
            id: "n1".into(),
            title: "Event Reminder".into(),
            message: "Cloud Study Jam starts in 1 hour at Auditorium 2.".into(),
            timestamp: ts("2023-11-15T09:00:00Z"),
            read: false,
            kind: NotificationKind::Info,
        },
        NotificationItem {
            id: "n2".into(),
            title: "Registration Confirmed".into(),
            message: "Your seat for RoboWars 2023 has been confirmed.".into(),
            timestamp: ts("2023-11-12T15:30:00Z"),
            read: true,
            kind: NotificationKind::Success,
        },
        NotificationItem {
            id: "n3".into(),
            title: "Club Request Update".into(),
            message: "Your request to join ACM Student Chapter has been approved!".into(),
            timestamp: ts("2023-11-10T11:00:00Z"),
            read: true,
            kind: NotificationKind::Success,
        },
    ];

    state.media = vec![
        MediaItem {
            id: "m1".into(),
            club_id: "c1".into(),
            kind: MediaKind::Image,
            url: "https://images.unsplash.com/photo-1517048676732-d65bc937f952?w=800".into(),
            caption: Some("Hackathon 2023 Winners".into()),
            timestamp: ts("2023-11-01T12:00:00Z"),
        },
        MediaItem {
            id: "m2".into(),
            club_id: "c1".into(),
            kind: MediaKind::Image,
            url: "https://images.unsplash.com/photo-1522071820081-009f0129c71c?w=800".into(),
            caption: Some("Team Brainstorming".into()),
            timestamp: ts("2023-11-02T12:00:00Z"),
        },
    ];

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_state_is_consistent() {
        let state = demo_state();
        assert_eq!(state.clubs.len(), 5);
        assert_eq!(state.events.len(), 3);
        assert_eq!(state.user_count(), 9);
        // every event belongs to a known club
        for event in state.events.values() {
            assert!(state.clubs.contains_key(&event.club_id));
        }
        // every club admin email resolves to exactly one club
        for club in state.clubs.values() {
            let email = club.admin_email.as_deref().unwrap();
            assert_eq!(state.club_for_admin(email).unwrap().id, club.id);
        }
    }
}
