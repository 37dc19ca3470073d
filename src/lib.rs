pub mod api;
pub mod config;
pub mod dispatch;
pub mod humanize;
pub mod observability;
pub mod sections;
pub mod storage;
pub mod titles;
pub mod transform;
pub mod upstream;
