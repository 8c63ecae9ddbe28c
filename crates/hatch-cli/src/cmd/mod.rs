pub mod config;
pub mod convert;
pub mod idea;
pub mod init;
pub mod project;
pub mod ui;
