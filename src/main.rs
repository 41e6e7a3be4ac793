use clap::Parser;
use signup_wizard_lib::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    signup_wizard_lib::run(Cli::parse()).await
}
