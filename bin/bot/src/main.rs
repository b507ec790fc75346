use classmate_ai::{OpenAiBackend, StudyAssistant};
use classmate_bot::config::{BotConfig, DEFAULT_CONFIG_PATH};
use classmate_bot::service::BotService;
use classmate_bot::user::InMemoryUserRepository;
use classmate_bot::{redirect, telegram};
use classmate_timetable::InMemoryScheduleStore;
use std::path::PathBuf;
use std::sync::Arc;
use teloxide::Bot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    let config = match BotConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration from {}: {e}", path.display());
            return std::process::ExitCode::FAILURE;
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(locale = ?config.locale, "Loaded configuration");

    let store = Arc::new(InMemoryScheduleStore::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let mut service = BotService::new(store, users, config.locale).with_parser(config.entry.parser());

    match config.llm.backend().map(OpenAiBackend::new) {
        Some(Ok(backend)) => {
            let mut assistant = StudyAssistant::new(Arc::new(backend));
            if let Some(prompt) = &config.llm.system_prompt {
                assistant = assistant.with_system_prompt(prompt);
            }
            service = service.with_assistant(assistant);
            tracing::info!(model = %config.llm.model, "Study assistant enabled");
        }
        Some(Err(e)) => tracing::warn!(error = %e, "Study assistant disabled"),
        None => tracing::info!("No LLM API key configured, /ask is disabled"),
    }
    let service = Arc::new(service);

    // Idle entry sessions are kept forever unless a timeout is configured.
    if let Some(max_idle) = config.entry.idle_timeout() {
        let cleanup_service = Arc::clone(&service);
        let cleanup_interval = config.entry.cleanup_interval();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(cleanup_interval);
            loop {
                interval.tick().await;
                let evicted = cleanup_service.entry().evict_idle(max_idle);
                if evicted > 0 {
                    tracing::debug!(evicted_sessions = evicted, "Periodic entry session cleanup");
                }
            }
        });
    }

    if let Some(addr) = config.redirect.addr.clone() {
        tokio::spawn(async move {
            if let Err(report) = redirect::serve(&addr).await {
                tracing::error!(error = %report, "Redirect listener stopped");
            }
        });
    }

    tracing::info!("Starting Telegram dispatcher");
    telegram::run(Bot::new(&config.telegram.token), service).await;

    std::process::ExitCode::SUCCESS
}
