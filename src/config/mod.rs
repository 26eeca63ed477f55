//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno y la configuración
//! de los clientes externos y del pipeline de rutas.

pub mod environment;

pub use environment::*;
