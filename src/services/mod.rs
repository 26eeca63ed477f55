//! Services module
//!
//! Este módulo contiene la lógica de negocio del dashboard: resolución de
//! horarios, estado efectivo, nombres de ubicación, filtros y el asistente.

pub mod assistant_service;
pub mod geocoding_service;
pub mod route_enrichment_service;
pub mod route_filter;
pub mod route_status;
pub mod schedule_service;

pub use assistant_service::*;
pub use geocoding_service::*;
pub use route_enrichment_service::*;
pub use route_filter::*;
pub use route_status::*;
pub use schedule_service::*;
