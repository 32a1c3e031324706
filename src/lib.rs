pub mod assistant;
pub mod completion;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod grading;
pub mod handlers;
pub mod state;
