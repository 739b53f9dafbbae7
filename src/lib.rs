pub mod condition;
pub mod config;
pub mod db;
pub mod output;
pub mod query;
pub mod search;
