use aws_config::BehaviorVersion;
use tracing_subscriber::EnvFilter;

use palaver_bedrock::client::BedrockRuntime;
use palaver_lambda::config::Config;
use palaver_lambda::state::AppState;
use palaver_storage::client::DynamoTurnStore;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;

    // Client handles are built once per cold start and shared by every invocation.
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let inference = BedrockRuntime::new(&sdk_config);
    let store = DynamoTurnStore::new(&sdk_config, config.table.as_str())
        .with_ttl_attribute(config.ttl_attribute.as_str());

    tracing::info!(
        table = %config.table,
        default_model = %config.default_model_id,
        ttl_attribute = %config.ttl_attribute,
        "starting chat lambda"
    );

    let state = AppState::new(inference, store, config.default_model_id);

    lambda_http::run(palaver_lambda::app(state))
        .await
        .map_err(|e| eyre::eyre!(e))
}
