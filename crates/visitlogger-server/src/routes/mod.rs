pub mod analytics;
pub mod home;
pub mod script;
pub mod snippet;
pub mod track;
