use anyhow::Result;
use cirview_context::assets;
use cirview_context::config::{Args, Mode, ViewerConfig};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cirview",
    version,
    about = "Local viewer for generated net and PCB diagrams"
)]
pub struct Cli {
    /// TCP port to listen on [default: random in 3000-3099]
    pub port: Option<u16>,

    /// Net diagram path, relative to the current directory [default: build/net.dot.svg]
    pub net: Option<PathBuf>,

    /// PCB diagram path, relative to the current directory [default: build/pcb.svg]
    pub pcb: Option<PathBuf>,

    /// Require the port and both diagram paths instead of substituting defaults
    #[arg(long)]
    pub strict: bool,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve(cli)?;
    cirview_server::start(config).await
}

/// Turn parsed arguments into a resolved configuration: diagram paths are
/// anchored at the working directory, the viewer's own page and assets at
/// its install location.
fn resolve(cli: Cli) -> Result<ViewerConfig> {
    let mode = if cli.strict { Mode::Strict } else { Mode::Lenient };
    let args = Args {
        port: cli.port,
        net: cli.net,
        pcb: cli.pcb,
    };

    let cwd = std::env::current_dir()?;
    // Anchor the discovery fallback so every resolved path is absolute.
    let asset_dir = cwd.join(assets::find_asset_dir());

    ViewerConfig::resolve(&args, mode, &cwd, &asset_dir)
}
