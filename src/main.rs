use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use conceptmap::analysis::{
    ConceptAnalysis, ConceptAnalyzer, LangSmithSink, ModelSettings, NoopTraceSink,
    OpenAiClient, TraceSink,
};
use conceptmap::api::{serve, ApiContext};
use conceptmap::config::AppConfig;

// Plain main: the blocking HTTP clients (completion + trace) are built
// before the runtime starts and only ever used on the blocking pool.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(conceptmap::config::default_log_filter())),
        )
        .init();

    let config = Arc::new(AppConfig::from_env()?);
    config.validate()?;
    tracing::info!(
        version = conceptmap::config::APP_VERSION,
        model = %config.openai_model,
        "Configuration validated"
    );

    let client = OpenAiClient::new(
        &config.openai_base_url,
        &config.openai_api_key,
        OpenAiClient::DEFAULT_TIMEOUT_SECS,
    );
    let trace: Box<dyn TraceSink> = if config.langsmith_tracing {
        Box::new(LangSmithSink::new(
            &config.langsmith_endpoint,
            &config.langsmith_api_key,
            &config.langsmith_project,
        ))
    } else {
        Box::new(NoopTraceSink)
    };
    let analyzer: Arc<dyn ConceptAnalysis> = Arc::new(ConceptAnalyzer::new(
        client,
        trace,
        ModelSettings::from_config(&config),
    ));
    let ctx = ApiContext::new(analyzer, Arc::clone(&config));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(&config, ctx))?;
    Ok(())
}
