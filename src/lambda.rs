#[cfg(feature = "lambda")]
use api_alarms::config::lambda::{ApiGatewayNameResolver, S3SpecSource};
#[cfg(feature = "lambda")]
use api_alarms::utils::logger;
#[cfg(feature = "lambda")]
use api_alarms::{MacroHandler, MacroRequest, MacroResponse};
#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

#[cfg(feature = "lambda")]
type Handler = MacroHandler<S3SpecSource, ApiGatewayNameResolver>;

#[cfg(feature = "lambda")]
async fn function_handler(
    handler: &Handler,
    event: LambdaEvent<MacroRequest>,
) -> Result<MacroResponse, Error> {
    tracing::info!(
        "Macro invocation {} from region {:?}",
        event.context.request_id,
        event.payload.region
    );

    // 失敗也以 failure 狀態回傳給 CloudFormation
    Ok(handler.handle(event.payload).await)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 建立 AWS 客戶端
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_client = aws_sdk_s3::Client::new(&config);
    let apigateway_client = aws_sdk_apigateway::Client::new(&config);

    let handler = MacroHandler::new(
        S3SpecSource::new(s3_client),
        ApiGatewayNameResolver::new(apigateway_client),
    );
    let handler = &handler;

    run(service_fn(move |event| function_handler(handler, event))).await
}
