pub mod api;
pub mod config;
pub mod controller;
pub mod data_models;
pub mod debounce;
pub mod error;
pub mod gateway;
pub mod query_builder;
pub mod search_state;
