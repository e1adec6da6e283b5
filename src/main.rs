use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use farmview::animation::Smoothing;
use farmview::app::{App, HostEvent};
use farmview::config::Config;
use farmview::render::TerminalRenderer;
use farmview::scene::View;
use std::io;

#[derive(Parser)]
#[command(version, about = "Terminal-based 3D farm diorama", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "VIEW",
        help = "Open the demo straight on a view (fields, crops, livestock, equipment)"
    )]
    view: Option<String>,

    #[arg(short, long, help = "Open the demo immediately instead of the landing page")]
    open: bool,

    #[arg(long, value_name = "FPS", help = "Frame rate override (1-120)")]
    fps: Option<u32>,

    #[arg(
        long,
        value_name = "MODE",
        help = "Livestock smoothing: per_frame or time_scaled"
    )]
    smoothing: Option<Smoothing>,

    #[arg(long, help = "Write the default config file and exit")]
    init_config: bool,

    #[arg(long, value_name = "SHELL", help = "Print shell completions and exit")]
    completions: Option<Shell>,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        return Ok(());
    }

    if cli.init_config {
        return init_config();
    }

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            eprintln!("\nContinuing with default settings.");
            eprintln!("\nTo customize, create a config file at:");
            eprintln!("  $XDG_CONFIG_HOME/farmview/config.toml");
            eprintln!("  or ~/.config/farmview/config.toml");
            eprintln!("\nOr run `farmview --init-config` to write one.");
            eprintln!();
            Config::default()
        }
    };

    if let Some(fps) = cli.fps {
        config.animation.fps = fps;
    }
    if let Some(smoothing) = cli.smoothing {
        config.animation.smoothing = smoothing;
    }
    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
    }

    let start_view = cli.view.as_deref().map(|name| {
        name.parse::<View>().unwrap_or_else(|e| {
            eprintln!("{}", e);
            config.default_view
        })
    });

    let mut renderer = TerminalRenderer::new()?;
    renderer.init()?;

    let (term_width, term_height) = renderer.get_size();
    let mut app = App::new(&config, term_width, term_height);

    if cli.open || start_view.is_some() {
        app.handle(HostEvent::Open);
    }
    if let Some(view) = start_view {
        app.handle(HostEvent::SelectView(view));
    }

    let result = app.run(&mut renderer).await;

    renderer.cleanup()?;

    result
}

fn init_config() -> io::Result<()> {
    let to_io = |e: farmview::error::ConfigError| io::Error::other(e.to_string());

    let dir = Config::get_config_dir().map_err(to_io)?;
    std::fs::create_dir_all(&dir)?;
    let path = Config::get_config_path().map_err(to_io)?;

    if path.exists() {
        eprintln!("Config already exists at {:?}, leaving it untouched.", path);
        return Ok(());
    }

    Config::default().save(&path).map_err(to_io)?;
    println!("Wrote default config to {:?}", path);
    Ok(())
}
