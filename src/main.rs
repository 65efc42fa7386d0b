use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotmcp::{cli, config, error, logging};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Run the MCP server on stdio
    Serve,

    /// List your playlists
    Playlists,

    /// Resolve a playlist name the way the MCP tools do
    FindPlaylist(FindPlaylistOptions),

    /// Look up a track URI by artist and song
    TrackUri(TrackUriOptions),

    /// List devices available for playback
    Devices,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct FindPlaylistOptions {
    /// Playlist name, matched fuzzily
    pub name: String,

    /// Minimum similarity in (0, 1]
    #[clap(long)]
    pub threshold: Option<f64>,

    /// Also show this many closest names
    #[clap(long, default_value_t = 0)]
    pub candidates: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct TrackUriOptions {
    pub artist: String,
    pub song: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    logging::init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };

    match cli.command {
        Command::Auth => cli::auth(&config).await,
        Command::Serve => cli::serve(&config).await,
        Command::Playlists => cli::list_playlists(&config).await,
        Command::FindPlaylist(opt) => {
            cli::find_playlist(&config, &opt.name, opt.threshold, opt.candidates).await
        }
        Command::TrackUri(opt) => cli::track_uri(&config, &opt.artist, &opt.song).await,
        Command::Devices => cli::list_devices(&config).await,
        Command::Completions(_) => {}
    }
}
