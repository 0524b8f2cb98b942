use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use swagger_bridge::{BallerinaSwaggerConverter, SwaggerConverter};

#[derive(Parser, Debug)]
#[command(author, version, about = "swagger-bridge offline converter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a Swagger definition from a Ballerina source file
    ToSwagger {
        input: PathBuf,
        /// Service to convert when the file defines more than one
        #[arg(long)]
        service: Option<String>,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate a Ballerina service from a Swagger definition (JSON or YAML)
    ToBallerina {
        input: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let converter = BallerinaSwaggerConverter::new();

    match cli.command {
        Commands::ToSwagger { input, service, output } => {
            let source = read_input(&input)?;
            let swagger = converter
                .generate_swagger_definitions(&source, service.as_deref())
                .await
                .with_context(|| format!("failed to convert {}", input.display()))?;
            write_output(output.as_deref(), &swagger)?;
        }
        Commands::ToBallerina { input, output } => {
            let swagger = read_input(&input)?;
            let source = converter
                .service_from_swagger_definition(&swagger)
                .await
                .with_context(|| format!("failed to convert {}", input.display()))?;
            write_output(output.as_deref(), &source)?;
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_output(path: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => println!("{contents}"),
    }
    Ok(())
}
