//! atlas-resource entry point — CLI wiring and config-driven dispatch.

use std::path::Path;
use std::process;

use anyhow::{Context, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use atlas_resource::capacity::rated_capacity_per_unit;
use atlas_resource::cli::{CapacityArgs, Cli, Command, SmoothArgs};
use atlas_resource::config::RunConfig;
use atlas_resource::io::export::export_curve_csv;
use atlas_resource::resources::{PanelConfig, ResourceRegistry, TurbineConfig};
use atlas_resource::smoothing::{SmoothingParameters, smooth_fleet};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the run configuration: `--config` takes priority, then `--preset`,
/// then the built-in default.
fn load_config(cli: &Cli) -> anyhow::Result<RunConfig> {
    let cfg = if let Some(ref path) = cli.config {
        RunConfig::from_toml_file(path)?
    } else if let Some(ref name) = cli.preset {
        RunConfig::from_preset(name)?
    } else {
        RunConfig::default()
    };

    let errors = cfg.validate();
    if let Some(first) = errors.first() {
        for e in &errors {
            tracing::error!("{e}");
        }
        bail!("invalid configuration ({} errors, first: {first})", errors.len());
    }
    Ok(cfg)
}

/// Resources are addressed by file path or by registry name.
fn is_path(arg: &str) -> bool {
    let path = Path::new(arg);
    path.is_file()
        || path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == "yaml" || e == "yml")
}

/// Builds the registry on first use, so path-only runs never touch the
/// resource directories.
struct LazyRegistry<'a> {
    cfg: &'a RunConfig,
    registry: Option<ResourceRegistry>,
}

impl<'a> LazyRegistry<'a> {
    fn new(cfg: &'a RunConfig) -> Self {
        Self {
            cfg,
            registry: None,
        }
    }

    fn get(&mut self) -> anyhow::Result<&ResourceRegistry> {
        if self.registry.is_none() {
            self.registry = Some(self.cfg.registry()?);
        }
        self.registry
            .as_ref()
            .context("resource registry unavailable")
    }

    fn turbine(&mut self, arg: &str) -> anyhow::Result<TurbineConfig> {
        let turbine = if is_path(arg) {
            TurbineConfig::from_yaml_file(Path::new(arg))?
        } else {
            self.get()?.load_turbine(arg)?
        };
        tracing::info!(turbine = arg, points = turbine.len(), "turbine loaded");
        Ok(turbine)
    }

    fn panel(&mut self, arg: &str) -> anyhow::Result<PanelConfig> {
        let panel = if is_path(arg) {
            PanelConfig::from_yaml_file(Path::new(arg))?
        } else {
            self.get()?.load_panel(arg)?
        };
        tracing::info!(panel = arg, model = panel.model(), "panel loaded");
        Ok(panel)
    }
}

fn run_capacity(cfg: &RunConfig, args: &CapacityArgs) -> anyhow::Result<()> {
    let mut registry = LazyRegistry::new(cfg);

    if let Some(ref name) = args.turbine {
        let turbine = registry.turbine(name)?;
        let cap = rated_capacity_per_unit(&turbine)?;
        println!("Turbine: {name}");
        println!("Hub height: {:.1} m", turbine.hub_height());
        println!("Rated capacity: {cap:.4} kW");
    } else if let Some(ref name) = args.panel {
        let panel = registry.panel(name)?;
        let cap = rated_capacity_per_unit(&panel)?;
        println!("Panel: {name} ({panel})");
        println!("Rated capacity: {cap:.4}");
    }
    Ok(())
}

/// Config smoothing parameters with command-line overrides applied on top.
/// Any override enables smoothing even if the config disables it.
fn smoothing_parameters(
    cfg: &RunConfig,
    args: &SmoothArgs,
) -> anyhow::Result<Option<SmoothingParameters>> {
    let s = &cfg.smoothing;
    let overridden = args.eta.is_some() || args.delta_v.is_some() || args.sigma.is_some();
    if !s.enabled && !overridden {
        return Ok(None);
    }
    let params = SmoothingParameters::new(
        args.eta.unwrap_or(s.eta),
        args.delta_v.unwrap_or(s.delta_v),
        args.sigma.unwrap_or(s.sigma),
    )?;
    Ok(Some(params))
}

fn run_smooth(cfg: &RunConfig, args: &SmoothArgs) -> anyhow::Result<()> {
    if args.out.is_some() && args.turbine.len() > 1 {
        bail!("--out can only be used with a single --turbine");
    }

    let mut registry = LazyRegistry::new(cfg);
    let turbines = args
        .turbine
        .iter()
        .map(|name| registry.turbine(name))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let Some(params) = smoothing_parameters(cfg, args)? else {
        tracing::info!("smoothing disabled, writing nameplate curves");
        for (name, turbine) in args.turbine.iter().zip(&turbines) {
            println!("{name}: rated {:.2} kW (unsmoothed)", turbine.rated_power());
        }
        if let (Some(path), Some(turbine)) = (&args.out, turbines.first()) {
            export_curve_csv(turbine, path, cfg.output.precision)
                .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        }
        return Ok(());
    };

    tracing::info!(%params, turbines = turbines.len(), "smoothing power curves");
    let smoothed = smooth_fleet(&turbines, params, args.workers);

    let mut oversmoothed = 0usize;
    for ((name, input), result) in args.turbine.iter().zip(&turbines).zip(&smoothed) {
        println!(
            "{name}: rated {:.2} kW -> {:.2} kW, power at 0 m/s {:.4} kW",
            input.rated_power(),
            result.turbine.rated_power(),
            result.turbine.power().first().copied().unwrap_or(0.0),
        );
        for d in &result.diagnostics {
            tracing::warn!(turbine = %name, "{d}");
        }
        if result.is_oversmoothed() {
            oversmoothed += 1;
        }
    }

    if let (Some(path), Some(result)) = (&args.out, smoothed.first()) {
        export_curve_csv(&result.turbine, path, cfg.output.precision)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        eprintln!("Curve written to {}", path.display());
    }

    if args.strict && oversmoothed > 0 {
        bail!("{oversmoothed} turbine(s) oversmoothed");
    }
    Ok(())
}

fn run_list(cfg: &RunConfig) -> anyhow::Result<()> {
    let registry = cfg.registry()?;
    println!("Turbines:");
    for name in registry.turbines() {
        println!("  {name}");
    }
    println!("Panels:");
    for name in registry.panels() {
        println!("  {name}");
    }
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let cfg = load_config(cli)?;
    match &cli.command {
        Command::Capacity(args) => run_capacity(&cfg, args),
        Command::Smooth(args) => run_smooth(&cfg, args),
        Command::List => run_list(&cfg),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
