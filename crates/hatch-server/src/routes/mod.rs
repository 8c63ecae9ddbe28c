pub mod events;
pub mod ideas;
pub mod projects;
pub mod wizards;
