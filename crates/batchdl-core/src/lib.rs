pub mod config;
pub mod logging;

pub mod control;
pub mod download;
pub mod fetch;
pub mod job;
pub mod playlist;
pub mod progress;
pub mod retry;
pub mod scheduler;
pub mod storage;
pub mod url_model;
