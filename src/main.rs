use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{Level, error, info};

use vr_locomotion_bridge_lib::config::AppConfig;
use vr_locomotion_bridge_lib::config::manifest_config::ManifestBase;
use vr_locomotion_bridge_lib::core::runtime::script::ScriptedRuntime;
use vr_locomotion_bridge_lib::core::{ActionBindings, ControlMode, InitError, InputRuntime};
use vr_locomotion_bridge_lib::logging;
use vr_locomotion_bridge_lib::mapping::command::CommandWriter;
use vr_locomotion_bridge_lib::mapping::poller::Poller;
use vr_locomotion_bridge_lib::mapping::translator::Translator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// SteamVR through OpenVR (needs the `openvr` feature)
    Openvr,
    /// Replay frames from a JSON-lines file
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StartMode {
    Default,
    Control,
}

impl From<StartMode> for ControlMode {
    fn from(mode: StartMode) -> Self {
        match mode {
            StartMode::Default => ControlMode::Default,
            StartMode::Control => ControlMode::Control,
        }
    }
}

const DEFAULT_BACKEND: Backend = if cfg!(feature = "openvr") {
    Backend::Openvr
} else {
    Backend::Script
};

/// Prints `move <speed> <direction>` and `snapturn left|right` lines from VR controller input.
#[derive(Debug, Parser)]
#[command(name = "vr-locomotion-bridge", version = vr_locomotion_bridge_lib::VERSION)]
struct Cli {
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory containing actions.json
    #[arg(long, conflicts_with = "exe_dir")]
    manifest_dir: Option<PathBuf>,

    /// Look for actions.json next to the executable
    #[arg(long)]
    exe_dir: bool,

    /// Polling rate in Hz
    #[arg(long)]
    tick_hz: Option<u32>,

    /// Emit a move line on every control tick, even when unchanged
    #[arg(long)]
    always_emit: bool,

    /// Activate the control action set on every tick, even in default mode
    #[arg(long)]
    always_activate_control: bool,

    /// Mode at startup
    #[arg(long, value_enum)]
    start_in: Option<StartMode>,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    #[arg(long, value_enum, default_value_t = DEFAULT_BACKEND)]
    backend: Backend,

    /// Input script for the script backend
    #[arg(long, required_if_eq("backend", "script"))]
    script: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: Level,

    /// Prefix diagnostics with a timestamp and level
    #[arg(long)]
    timestamps: bool,

    /// Write the effective config to this path before starting
    #[arg(long)]
    write_config: Option<PathBuf>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.manifest_dir {
            config.manifest.base = ManifestBase::Explicit(dir.clone());
        }
        if self.exe_dir {
            config.manifest.base = ManifestBase::ExecutableDirectory;
        }
        if let Some(tick_hz) = self.tick_hz {
            config.poller.tick_hz = tick_hz;
        }
        if self.always_emit {
            config.poller.suppress_duplicate_moves = false;
        }
        if self.always_activate_control {
            config.poller.always_activate_control_set = true;
        }
        if let Some(mode) = self.start_in {
            config.poller.initial_mode = mode.into();
        }
    }
}

/// Opens the selected runtime, plus the tick count after which input runs out.
fn open_runtime(cli: &Cli) -> Result<(Box<dyn InputRuntime>, Option<u64>)> {
    match cli.backend {
        Backend::Script => {
            let path = cli
                .script
                .as_ref()
                .context("--script is required with the script backend")?;
            let runtime = ScriptedRuntime::open(path)?;
            let frames = runtime.frame_count() as u64;
            Ok((Box::new(runtime), Some(frames)))
        }
        #[cfg(feature = "openvr")]
        Backend::Openvr => {
            use vr_locomotion_bridge_lib::core::runtime::openvr::OpenVrRuntime;
            Ok((Box::new(OpenVrRuntime::init_overlay()?), None))
        }
        #[cfg(not(feature = "openvr"))]
        Backend::Openvr => {
            anyhow::bail!("this build has no OpenVR backend, rebuild with `--features openvr`")
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if logging::StderrLogger::init(cli.log_level, cli.timestamps).is_err() {
        env_logger::builder()
            .filter_level(cli.log_level.to_level_filter())
            .init();
    }

    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let mut config = rt.block_on(async {
        match &cli.config {
            Some(path) => AppConfig::load_config(path).await,
            None => Ok(AppConfig::default()),
        }
    })?;
    cli.apply_overrides(&mut config);
    config.validate()?;
    if let Some(path) = &cli.write_config {
        rt.block_on(config.save_config(path))?;
    }
    drop(rt);

    info!("VR Application Overlay initialization");
    let (mut runtime, script_ticks) = match open_runtime(&cli) {
        Ok(opened) => opened,
        Err(e) => {
            if let Some(init) = e.downcast_ref::<InitError>() {
                error!("error {}", init);
                std::process::exit(init.exit_code());
            }
            return Err(e);
        }
    };

    info!("Action set initialization");
    let manifest_path = config
        .manifest
        .manifest_path()
        .context("Failed to resolve the action manifest directory")?;
    let bindings = ActionBindings::register(&mut runtime, &manifest_path);
    let translator = Translator::new(bindings, &config.poller);

    let stdout = io::stdout();
    let mut poller = Poller::new(
        runtime,
        translator,
        CommandWriter::new(stdout.lock()),
        config.poller.tick_period(),
    );
    poller
        .run(cli.ticks.or(script_ticks))
        .context("Failed to write command to standard output")?;

    Ok(())
}
