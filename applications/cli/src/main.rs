/// Tandem - listen-together music player
mod commands;
mod config;

use clap::{Parser, Subcommand};
use commands::App;
use config::TandemConfig;
use std::path::PathBuf;
use tandem_core::PlayMode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tandem")]
#[command(about = "Listen-together music player", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./tandem.toml when present)
    #[arg(short, long, global = true, env = "TANDEM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a track by name and follow playback until it stops
    Play {
        /// Track title
        #[arg(short, long)]
        title: String,
        /// Artist name
        #[arg(short, long)]
        artist: String,
    },
    /// Add tracks from a JSON file to the local library
    Import {
        /// JSON array of tracks
        path: PathBuf,
    },
    /// List the local library
    Library,
    /// Show or change the play mode
    Mode {
        #[command(subcommand)]
        action: Option<ModeAction>,
    },
    /// Start a listening session with a companion
    Invite {
        /// Companion id
        #[arg(short, long)]
        partner: String,
        /// Title of the track the session starts on
        #[arg(short, long)]
        title: String,
        /// Artist of the track the session starts on
        #[arg(short, long)]
        artist: String,
    },
    /// End the current listening session
    Leave,
    /// Show the current listening session
    Session,
    /// Act on a chat message containing a track-change command
    Say {
        /// Message text, e.g. "[切歌:Blue Bird:Ikimono-gakari]"
        text: String,
    },
}

#[derive(Subcommand)]
enum ModeAction {
    /// Print the stored play mode
    Show,
    /// Advance to the next play mode
    Toggle,
    /// Set the play mode explicitly
    Set {
        /// sequence, shuffle, repeat-one or repeat-all
        mode: PlayMode,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tandem=info,tandem_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = TandemConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let app = App::open(config).await?;

    match cli.command {
        Commands::Play { title, artist } => app.play(&title, &artist).await?,
        Commands::Import { path } => app.import(&path).await?,
        Commands::Library => app.library().await?,
        Commands::Mode { action } => match action.unwrap_or(ModeAction::Show) {
            ModeAction::Show => app.show_mode().await?,
            ModeAction::Toggle => app.toggle_mode().await?,
            ModeAction::Set { mode } => app.set_mode(mode).await?,
        },
        Commands::Invite {
            partner,
            title,
            artist,
        } => app.invite(&partner, &title, &artist).await?,
        Commands::Leave => app.leave().await?,
        Commands::Session => app.session().await?,
        Commands::Say { text } => app.say(&text).await?,
    }

    Ok(())
}
