use anyhow::{bail, Result};
use rand::Rng;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Default diagram locations, relative to the caller's working directory.
pub const DEFAULT_NET_PATH: &str = "build/net.dot.svg";
pub const DEFAULT_PCB_PATH: &str = "build/pcb.svg";

/// Range the port is drawn from when no port argument is given.
pub const DEFAULT_PORT_RANGE: RangeInclusive<u16> = 3000..=3099;

/// Defaulting policy for omitted arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Substitute documented defaults for anything omitted.
    Lenient,
    /// Require the port and both diagram paths explicitly.
    Strict,
}

/// Raw argument values as parsed from the command line.
#[derive(Debug, Clone, Default)]
pub struct Args {
    pub port: Option<u16>,
    pub net: Option<PathBuf>,
    pub pcb: Option<PathBuf>,
}

/// Resolved server configuration.
///
/// Built once at startup and never mutated. All paths are absolute by the
/// time this struct exists, so no path resolution happens per-request.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub port: u16,
    pub index_path: PathBuf,
    pub net_path: PathBuf,
    pub pcb_path: PathBuf,
    pub css_dir: PathBuf,
    pub js_dir: PathBuf,
}

impl ViewerConfig {
    /// Resolve the full configuration from parsed arguments.
    ///
    /// `cwd` is the base for the diagram paths; `asset_dir` is the base for
    /// the viewer's own page and asset directories. Both must be absolute.
    /// An absolute diagram argument replaces the base entirely.
    ///
    /// No filesystem checks happen here — a resolved path that points at
    /// nothing surfaces as a not-found response when it is requested.
    pub fn resolve(args: &Args, mode: Mode, cwd: &Path, asset_dir: &Path) -> Result<Self> {
        let port = match (args.port, mode) {
            (Some(port), _) => port,
            (None, Mode::Lenient) => rand::thread_rng().gen_range(DEFAULT_PORT_RANGE),
            (None, Mode::Strict) => bail!("missing required argument: port"),
        };

        let net_path = resolve_diagram(args.net.as_deref(), DEFAULT_NET_PATH, "net", mode, cwd)?;
        let pcb_path = resolve_diagram(args.pcb.as_deref(), DEFAULT_PCB_PATH, "pcb", mode, cwd)?;

        Ok(Self {
            port,
            index_path: asset_dir.join("index.html"),
            net_path,
            pcb_path,
            css_dir: asset_dir.join("css"),
            js_dir: asset_dir.join("js"),
        })
    }
}

/// Join a diagram argument onto `cwd`, falling back to `default` in lenient
/// mode.
fn resolve_diagram(
    arg: Option<&Path>,
    default: &str,
    name: &str,
    mode: Mode,
    cwd: &Path,
) -> Result<PathBuf> {
    match (arg, mode) {
        (Some(path), _) => Ok(cwd.join(path)),
        (None, Mode::Lenient) => Ok(cwd.join(default)),
        (None, Mode::Strict) => bail!("missing required argument: {name} diagram path"),
    }
}
