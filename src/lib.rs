//! Dashboard de Colibrí Arroyo Seco
//!
//! Enriquecimiento de rutas (horario, estado efectivo, nombres de lugar)
//! servido como JSON para las vistas de mapa y de rutas por mes.

pub mod cache;
pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
