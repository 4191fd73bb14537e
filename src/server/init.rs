//! Server initialization and main run loop
//!
//! Builds the dispatcher from configuration and serves the webhook API
//! until Ctrl+C or SIGTERM.

use super::config::{AppConfig, SmsProvider};
use super::validation::{validate_config, validate_production_config};
use anyhow::{Context, Result};
use homeline_channels::{TwilioConfig, TwilioSender};
use homeline_core::{
    AppointmentExecutor, Dispatcher, ExecutorSet, GoogleCalendarClient, GoogleCalendarConfig,
    HistoryBackend, HistoryStore, LlmPlanner, LogSmsSender, PlannerConfig, SecondaryAgent,
    SmsSender,
};
use homeline_llm::{LlmProvider, OpenAiConfig, OpenAiProvider};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Connect the configured history store
///
/// The store is health-checked here so an unreachable backend fails startup
/// instead of every later dispatch.
pub async fn connect_store(config: &AppConfig) -> Result<Arc<dyn HistoryStore>> {
    let backend = HistoryBackend::connect(&config.store.url, config.store.key_prefix.as_deref())
        .await
        .context("Failed to connect history store")?;
    backend
        .health_check()
        .await
        .with_context(|| format!("History store ({}) is unreachable", backend.kind()))?;
    info!(backend = backend.kind(), "History store ready");
    Ok(Arc::new(backend))
}

fn llm_provider(config: &AppConfig) -> Result<Arc<dyn LlmProvider>> {
    let mut openai = OpenAiConfig::from_env()
        .context("OPENAI_API_KEY is required for the planner")?
        .with_model(&config.planner.model)
        .with_timeout(config.planner.timeout());
    if let Some(base_url) = &config.openai.base_url {
        openai = openai.with_base_url(base_url);
    }
    Ok(Arc::new(OpenAiProvider::new(openai)))
}

fn sms_sender(config: &AppConfig) -> Result<Arc<dyn SmsSender>> {
    match config.sms.provider {
        SmsProvider::Twilio => {
            let auth_token = std::env::var("TWILIO_AUTH_TOKEN")
                .context("TWILIO_AUTH_TOKEN is required when sms.provider = \"twilio\"")?;
            let twilio = TwilioConfig::new(&config.sms.account_sid, auth_token, &config.sms.from_number);
            Ok(Arc::new(
                TwilioSender::new(twilio).context("Failed to initialize Twilio sender")?,
            ))
        }
        SmsProvider::Log => {
            warn!("SMS delivery disabled (sms.provider = \"log\")");
            Ok(Arc::new(LogSmsSender))
        }
    }
}

fn appointment_executor(config: &AppConfig) -> AppointmentExecutor {
    if !config.calendar.enabled {
        info!("Calendar disabled; appointment requests will report not configured");
        return AppointmentExecutor::disabled();
    }

    let calendar = GoogleCalendarConfig::new(
        &config.calendar.calendar_id,
        &config.calendar.service_account_path,
        &config.calendar.timezone,
    );
    match GoogleCalendarClient::from_config(calendar) {
        Ok(client) => AppointmentExecutor::new(Arc::new(client), &config.calendar.timezone),
        Err(e) => {
            warn!(error = %e, "Calendar credentials unusable; appointment booking disabled");
            AppointmentExecutor::disabled()
        }
    }
}

/// Build the dispatcher and everything it depends on
pub async fn build_dispatcher(config: &AppConfig) -> Result<Dispatcher> {
    let store = connect_store(config).await?;
    let provider = llm_provider(config)?;

    let mut planner_config = PlannerConfig::new()
        .with_model(&config.planner.model)
        .with_temperature(config.planner.temperature)
        .with_timeout(config.planner.timeout())
        .with_max_actions(config.planner.max_actions);
    if let Some(path) = &config.planner.template_path {
        planner_config = planner_config
            .with_template_file(path)
            .with_context(|| format!("Failed to load planner template {}", path.display()))?;
    }
    let max_actions = planner_config.max_actions;
    let planner = LlmPlanner::new(Arc::clone(&provider), planner_config);

    let secondary = if config.secondary_agent.enabled {
        SecondaryAgent::new(provider, &config.secondary_agent.model)
    } else {
        SecondaryAgent::disabled()
    };

    let executors = ExecutorSet::new(sms_sender(config)?, config.sms.operator_number())
        .with_secondary(Arc::new(secondary))
        .with_appointment(Arc::new(appointment_executor(config)));

    Ok(Dispatcher::new(store, Arc::new(planner), executors).with_max_actions(max_actions))
}

/// Run the server
pub async fn run(config: AppConfig) -> Result<()> {
    info!("Starting Homeline SMS assistant v{}", env!("CARGO_PKG_VERSION"));

    validate_config(&config)?;
    validate_production_config(&config)?;

    let dispatcher = Arc::new(build_dispatcher(&config).await?);
    info!("Dispatcher initialized");

    let app = crate::api::router(dispatcher)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Homeline shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal"),
        () = terminate => info!("Received SIGTERM signal"),
    }
}
