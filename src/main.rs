use rask_model::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    rask_model::app::run().await
}
