//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own persistence concerns so route handlers can stay
//! focused on request translation and validation.

pub mod chat;
