pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "blog-api")]
#[command(about = "Blog API - JSON:API backend for articles, categories and authors")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Apply database migrations")]
    Migrate,

    #[command(about = "Load seed data from a YAML fixture file")]
    Seed(commands::seed::SeedArgs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// Print a finished command: one JSON object, or a check line followed
    /// by `key: value` detail lines
    pub fn success(&self, message: &str, details: Map<String, Value>) -> anyhow::Result<()> {
        print!("{}", self.render_success(message, details)?);
        Ok(())
    }

    fn render_success(&self, message: &str, details: Map<String, Value>) -> anyhow::Result<String> {
        match self {
            OutputFormat::Json => {
                let mut body = Map::new();
                body.insert("success".to_string(), Value::Bool(true));
                body.insert("message".to_string(), Value::String(message.to_string()));
                body.extend(details);
                Ok(format!("{}\n", serde_json::to_string_pretty(&Value::Object(body))?))
            }
            OutputFormat::Text => {
                let mut out = format!("✓ {}\n", message);
                for (key, value) in details {
                    match value {
                        Value::String(s) => out.push_str(&format!("  {}: {}\n", key, s)),
                        other => out.push_str(&format!("  {}: {}\n", key, other)),
                    }
                }
                Ok(out)
            }
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Serve(args) => commands::serve::handle(args).await,
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::Seed(args) => commands::seed::handle(args, output_format).await,
    }
}
