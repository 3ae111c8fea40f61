mod cli;
mod infra;
mod report;
mod routes;
mod server;

use ace_motivation::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
