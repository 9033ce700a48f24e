mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dockhand", about = "Build and run Docker images from platform app releases")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a Docker image from the app's latest release
    Build {
        /// App name on the platform
        #[arg(short, long)]
        app: String,
        /// Override the stack-derived base image
        #[arg(short, long)]
        base: Option<String>,
        /// Tag for the built image (defaults to the app name)
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Write the build context as a tar.gz instead of invoking docker
    Context {
        /// Output archive path
        tarfile: PathBuf,
        /// App name on the platform
        #[arg(short, long)]
        app: String,
        /// Override the stack-derived base image
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Run a built image with the app's config vars
    Run {
        /// App name on the platform
        #[arg(short, long)]
        app: String,
        /// Image to run (defaults to the app name)
        #[arg(short, long)]
        image: Option<String>,
        /// Run detached instead of interactive
        #[arg(short, long)]
        detach: bool,
        /// Command and arguments passed through to the container
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { app, base, tag } => {
            commands::build(&app, base.as_deref(), tag.as_deref()).await?
        }
        Commands::Context { tarfile, app, base } => {
            commands::context(&app, base.as_deref(), &tarfile).await?
        }
        Commands::Run {
            app,
            image,
            detach,
            args,
        } => commands::run(&app, image.as_deref(), detach, &args).await?,
    }

    Ok(())
}
