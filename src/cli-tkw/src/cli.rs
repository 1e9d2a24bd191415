use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "tkw")]
#[command(about = "Operate a running Tekton Words API server", long_about = None)]
pub struct Cli {
    /// Base URL of the API server
    #[arg(long, env = "TKW_API_URL", default_value = "http://127.0.0.1:3000", value_parser = parse_url)]
    pub api_url: Url,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Store a request and send it to the automation system
    Submit {
        #[arg(short = 'n', long)]
        project_name: String,
        #[arg(short = 'd', long)]
        business_details: String,
        #[arg(short = 'w', long)]
        website_structure: String,
    },

    /// List past requests, newest first
    History {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List saved projects, one per name
    Projects {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a single request
    Show { id: String },

    /// Report a result for a request, as the automation system would
    Callback {
        id: String,
        #[command(flatten)]
        outcome: Outcome,
    },
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct Outcome {
    /// Link to the generated document
    #[arg(long)]
    pub output_link: Option<String>,
    /// Why the generation failed
    #[arg(long)]
    pub error: Option<String>,
}

impl Outcome {
    /// The callback body the server expects for this outcome.
    pub fn callback_body(&self, id: &str) -> Value {
        match (&self.error, &self.output_link) {
            (Some(error), _) => json!({ "id": id, "error": error }),
            (None, link) => json!({ "id": id, "outputLink": link }),
        }
    }
}

/// Parses the API base URL, ending its path with `/` so routes resolve beneath it.
fn parse_url(s: &str) -> Result<Url, String> {
    let mut url = Url::parse(s).map_err(|e| format!("Invalid URL: {}", e))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
