pub mod config;
pub mod docs;
pub mod error;
pub mod response;

pub mod auth;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
