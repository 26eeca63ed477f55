//! Modelos del sistema
//!
//! Este módulo contiene los modelos que mapean las respuestas de la API de
//! Colibrí y los datos derivados que muestra el dashboard.

pub mod analytics;
pub mod auth;
pub mod reservation;
pub mod route;

pub use analytics::*;
pub use auth::*;
pub use reservation::*;
pub use route::*;
