use std::process::ExitCode;

use clap::Parser;
use core_tkw::setup_logging;
use data_model_tkw::models::SubmitPayload;

use cli_tkw::cli::{Cli, Commands};
use cli_tkw::client::{ApiClient, CliError};
use cli_tkw::format::{history_line, project_line, request_details};

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = ApiClient::new(cli.api_url);

    match cli.command {
        Commands::Submit {
            project_name,
            business_details,
            website_structure,
        } => {
            let answer = client
                .submit(&SubmitPayload {
                    project_name,
                    business_details,
                    website_structure,
                })
                .await?;
            let verb = if answer.reused { "Reused" } else { "Created" };
            println!("{} request {}", verb, answer.id);
            println!("Automation answered: {}", answer.automation);
        }

        Commands::History { search } => {
            let list = client.history(search.as_deref()).await?;
            if list.items.is_empty() {
                println!("No requests found.");
            }
            for request in &list.items {
                println!("{}", history_line(request));
            }
        }

        Commands::Projects { search } => {
            let list = client.projects(search.as_deref()).await?;
            if list.items.is_empty() {
                println!("No saved projects.");
            }
            for project in &list.items {
                println!("{}", project_line(project));
            }
        }

        Commands::Show { id } => {
            let request = client.show(&id).await?;
            println!("{}", request_details(&request));
        }

        Commands::Callback { id, outcome } => {
            let answer = client.callback(&outcome.callback_body(&id)).await?;
            tracing::debug!(?answer, "Callback answered");
            println!("Callback accepted for {}", id);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    setup_logging("cli_tkw=warn");

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
