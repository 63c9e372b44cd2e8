//! Async client for the face-auth service.

pub mod client;

pub use client::{AuthClient, AuthResponse, Credentials, StatusResponse, UserSummary};
