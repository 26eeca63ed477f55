//! Asistente estratégico
//!
//! Arma un resumen de reservas, consulta al asistente remoto y, si la
//! consulta falla, responde con un reporte local elegido por palabras clave.

use rust_decimal::Decimal;
use std::sync::Arc;

use crate::clients::DashboardApi;
use crate::models::{AiQueryRequest, AssistantReply, AssistantSource, BusinessSummary};

/// Tema del reporte local
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantTopic {
    Earnings,
    Growth,
    Finance,
    Expansion,
    Technology,
}

const GROWTH_KEYWORDS: [&str; 3] = ["crecimiento", "reservas", "aumentar"];
const FINANCE_KEYWORDS: [&str; 4] = ["financi", "tarifa", "precio", "costo"];
const EXPANSION_KEYWORDS: [&str; 3] = ["expansion", "ruta", "ciudad"];
const TECHNOLOGY_KEYWORDS: [&str; 3] = ["tecnolog", "app", "digital"];

impl AssistantTopic {
    /// Primer grupo de palabras clave que aparece en el mensaje; sin
    /// coincidencias, análisis de ganancias.
    pub fn detect(message: &str) -> Self {
        let lower = message.to_lowercase();
        let mentions = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if mentions(&GROWTH_KEYWORDS) {
            AssistantTopic::Growth
        } else if mentions(&FINANCE_KEYWORDS) {
            AssistantTopic::Finance
        } else if mentions(&EXPANSION_KEYWORDS) {
            AssistantTopic::Expansion
        } else if mentions(&TECHNOLOGY_KEYWORDS) {
            AssistantTopic::Technology
        } else {
            AssistantTopic::Earnings
        }
    }
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Reporte local para cuando el asistente remoto no responde
pub fn fallback_response(message: &str, data: &BusinessSummary) -> String {
    match AssistantTopic::detect(message) {
        AssistantTopic::Earnings => {
            let fare = data.average_fare();
            format!(
                "Análisis de Ganancias - Colibrí Arroyo Seco\n\n\
                 **Datos actuales:**\n\
                 • Reservas totales: {}\n\
                 • Completadas: {}\n\
                 • Pendientes: {}\n\
                 • Canceladas: {}\n\n\
                 **Ingresos:**\n\
                 • Bruto: ${} MXN\n\
                 • Comisión 15%: ${} MXN\n\
                 • Neto aproximado: ${} MXN\n\n\
                 **Por viaje:**\n\
                 • Tarifa promedio: ${} MXN\n\
                 • Margen estimado (60%): ${} MXN\n\n\
                 **Recomendaciones:**\n\
                 1. Recordatorios automáticos a pendientes\n\
                 2. +20% tarifa en horas pico\n\
                 3. Programa de referidos\n\
                 4. Fidelización de clientes",
                data.total_reservations,
                data.completed_trips,
                data.pending_reservations,
                data.cancelled_reservations,
                money(data.total_revenue),
                money(data.total_revenue * Decimal::new(15, 2)),
                money(data.total_revenue * Decimal::new(85, 2)),
                money(fare),
                money(fare * Decimal::new(6, 1)),
            )
        }
        AssistantTopic::Growth => format!(
            "Estrategia de Crecimiento\n\n\
             **Estado actual:**\n\
             • {} reservas totales\n\
             • {} completadas ({:.1}% conversión)\n\n\
             **Metas próximas:**\n\
             • Convertir todas las pendientes\n\
             • Cancelaciones <20%\n\
             • Programa de referidos\n\
             • Alianzas locales\n\n\
             **Meta 2026:** 1000 reservas/mes",
            data.total_reservations,
            data.completed_trips,
            data.conversion_rate().round_dp(1),
        ),
        AssistantTopic::Finance => format!(
            "Optimización Financiera\n\n\
             **Datos clave:**\n\
             • Ingresos: ${} MXN\n\
             • Tarifa promedio: ${} MXN\n\n\
             **Acciones:**\n\
             • Tarifas dinámicas\n\
             • Suscripciones mensuales\n\
             • Comisión reducida para conductores premium\n\
             • Optimizar rutas",
            money(data.total_revenue),
            money(data.average_fare()),
        ),
        AssistantTopic::Expansion => "Plan de Expansión\n\n\
             **Próximas ciudades:** Guadalajara → Monterrey → Puebla\n\n\
             **Por ciudad:**\n\
             • 50 conductores\n\
             • Centro de operaciones\n\
             • Campaña de lanzamiento\n\n\
             **Inversión estimada:** ~$500K USD primer año"
            .to_string(),
        AssistantTopic::Technology => "Innovaciones Tecnológicas 2026\n\n\
             **Prioridades:**\n\
             1. App nativa iOS + Android\n\
             2. IA predicción de demanda\n\
             3. Integración transporte público\n\
             4. Calificaciones y confianza\n\n\
             **Beneficios:**\n\
             • +150% reservas por app\n\
             • -30% espera\n\
             • +40% satisfacción"
            .to_string(),
    }
}

pub struct AssistantService {
    api: Arc<dyn DashboardApi>,
}

impl AssistantService {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self { api }
    }

    /// Resumen de todas las reservas; un fallo deja el resumen en ceros
    pub async fn business_summary(&self) -> BusinessSummary {
        match self.api.list_reservations().await {
            Ok(reservations) => BusinessSummary::from_reservations(&reservations),
            Err(e) => {
                log::error!("❌ Error obteniendo datos del negocio: {}", e);
                BusinessSummary::default()
            }
        }
    }

    pub async fn answer(&self, message: &str) -> AssistantReply {
        let summary = self.business_summary().await;
        let request = AiQueryRequest {
            message: message.to_string(),
            context: summary.to_context(),
        };

        let (response, source) = match self.api.ai_query(&request).await {
            Ok(reply) if reply.success => (
                reply.response.unwrap_or_default(),
                AssistantSource::Remote,
            ),
            Ok(reply) => (
                reply
                    .fallback
                    .unwrap_or_else(|| "Error de conexión".to_string()),
                AssistantSource::RemoteFallback,
            ),
            Err(e) => {
                log::warn!("⚠️ Asistente remoto no disponible, usando respaldo local: {}", e);
                (fallback_response(message, &summary), AssistantSource::Local)
            }
        };

        AssistantReply {
            response,
            source,
            summary,
        }
    }
}
