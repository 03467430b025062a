//! Platform independent StudyMate client
//! logic, shared by the browser UI and the
//! terminal client.

pub mod activity;
pub mod api;
pub mod assistant;
pub mod auth;
pub mod config;
pub mod draft;
pub mod error;
pub mod idle;
pub mod notify;
pub mod overlay;
pub mod priority;
pub mod resource;
pub mod schedule;
pub mod session;
pub mod workflow;

pub use api::{
  ApiClient,
  Transport
};
pub use error::{
  ApiError,
  AuthError,
  ValidationError
};
