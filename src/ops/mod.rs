pub mod auth;
pub mod club_admin;
pub mod membership;
pub mod registration;
pub mod super_admin;
pub mod support;
