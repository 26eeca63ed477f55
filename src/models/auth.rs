use serde::{Deserialize, Serialize};

use crate::utils::validation::lenient_string;

/// Roles del dashboard (solo informativos, no se aplican permisos)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Driver,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Driver => "DRIVER",
        }
    }

    /// `DRIVER`, `CONDUCTOR` y `Conductor` son conductores; el resto es admin
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "DRIVER" | "CONDUCTOR" => UserRole::Driver,
            _ => UserRole::Admin,
        }
    }
}

/// Sesión guardada por el front (`colibri:user`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionPayload {
    #[serde(default, alias = "userId", deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "rol")]
    pub role: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Claims del JWT emitido por la API de Colibrí
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, alias = "rol", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Usuario actual, inyectado explícitamente en cada consulta
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentUser {
    pub id: Option<String>,
    pub email: Option<String>,
    pub role: UserRole,
}

impl Default for CurrentUser {
    fn default() -> Self {
        Self {
            id: None,
            email: None,
            role: UserRole::Admin,
        }
    }
}

impl CurrentUser {
    pub fn is_driver(&self) -> bool {
        self.role == UserRole::Driver
    }

    /// Conductor efectivo para filtrar vistas: un conductor solo ve sus rutas
    pub fn effective_driver_id<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        if self.is_driver() {
            self.id.as_deref()
        } else {
            requested.filter(|id| !id.is_empty() && *id != "all")
        }
    }
}
