pub mod auth_redirect;
pub mod current_user;
