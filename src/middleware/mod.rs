//! Middleware del sistema
//!
//! Este módulo contiene la extracción del usuario actual y la
//! configuración de CORS.

pub mod auth;
pub mod cors;

pub use auth::*;
pub use cors::*;
