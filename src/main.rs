use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};

use colibri_dashboard::config::environment::EnvironmentConfig;
use colibri_dashboard::routes::create_app;
use colibri_dashboard::state::{AppState, ShutdownSignal};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .init();

    info!("🐦 Colibrí Arroyo Seco - Dashboard de rutas");
    info!("================================================");
    info!("🔗 API de Colibrí: {}", config.api_base_url);
    info!("🗺️ Geocodificación: {}", config.geocoding.base_url);
    info!(
        "⚙️ Concurrencia: {} rutas, {} geocodificaciones, política de horario {:?}",
        config.enrichment.max_concurrency,
        config.geocoding.max_concurrency,
        config.enrichment.schedule_policy
    );

    if config.cors_origins.is_empty() && !config.is_development() {
        warn!("⚠️ CORS_ORIGINS vacío fuera de desarrollo: se aceptan todos los orígenes");
    }

    let app_state = AppState::new(config.clone())
        .map_err(|e| anyhow::anyhow!("Error creando clientes HTTP: {}", e))?;
    let shutdown = app_state.shutdown.clone();
    let app = create_app(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("   GET  /api/me - Usuario actual");
    info!("   GET  /api/routes/map - Rutas enriquecidas para el mapa");
    info!("   GET  /api/routes/by-month?month=YYYY-MM - Rutas por mes");
    info!("   POST /api/assistant/query - Asistente estratégico");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful; avisa a los pipelines en curso
async fn shutdown_signal(shutdown: ShutdownSignal) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }

    shutdown.trigger();
}
