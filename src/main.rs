use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use eyenotes_api_rest::{router, ApiDoc, PatientRepo};

/// Main entry point for the eyeNotes backend
///
/// Starts the REST server the clinic front-end and the `eyenotes` CLI talk
/// to. Patient records are stored as JSON files under the data directory.
///
/// # Environment Variables
/// - `EMR_REST_ADDR`: REST server address (default: "0.0.0.0:5000")
/// - `EMR_DATA_DIR`: Directory for patient data storage (default: "./emr_data")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("eyenotes=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("EMR_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".into());
    let data_dir =
        PathBuf::from(std::env::var("EMR_DATA_DIR").unwrap_or_else(|_| "./emr_data".into()));

    tracing::info!("++ Starting eyeNotes REST on {}", rest_addr);
    tracing::info!("++ Patient data under {}", data_dir.display());

    let repo = Arc::new(PatientRepo::open(data_dir)?);

    let app = router(repo)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
