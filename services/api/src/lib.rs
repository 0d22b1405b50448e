mod cli;
mod demo;
mod infra;
mod responses;
mod routes;
mod server;
mod terminal;

use stress_check::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
