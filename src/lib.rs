pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod export;
pub mod form;
pub mod model;
pub mod report;
pub mod store;
pub mod submit;
pub mod tui;
pub mod ui;
