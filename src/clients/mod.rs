//! Clients - HTTP Clients for External APIs
//!
//! This module contains HTTP clients for the Colibrí REST API and the
//! reverse-geocoding service, each behind a trait so views can be tested
//! with in-memory collaborators.

pub mod colibri_client;
pub mod nominatim_client;

pub use colibri_client::{ColibriApiClient, DashboardApi};
pub use nominatim_client::{
    NominatimAddress, NominatimClient, ReverseGeocodeResponse, ReverseGeocoder,
};
