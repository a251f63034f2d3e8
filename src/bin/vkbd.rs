// Vkbd CLI
// Replays a scenario file against a virtual keyboard and prints what it emitted

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use vkbd_core::{Scenario, ScriptedInput, Settings, VirtualKeyboard};

/// Virtual keyboard hardware scenario runner
#[derive(Parser, Debug)]
#[command(name = "vkbd")]
#[command(version)]
#[command(about = "Replay keyboard firmware test scenarios on virtual hardware", long_about = None)]
struct Args {
    /// TOML scenario file
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// TOML settings file (default: ~/.config/vkbd/settings.toml)
    #[arg(short, long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Do not print the event transcript
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Settings::load_default().context("failed to load default settings"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = load_settings(args.settings.as_ref())?;
    let scenario = Scenario::from_file(&args.scenario)
        .with_context(|| format!("failed to load scenario {}", args.scenario.display()))?;

    if let Some(name) = scenario.name() {
        log::info!("running scenario '{}'", name);
    }

    let mut vk = VirtualKeyboard::from_settings(&settings, Box::new(ScriptedInput::new()));
    vk.setup();
    let summary = scenario
        .run(&mut vk)
        .with_context(|| format!("scenario {} failed", args.scenario.display()))?;

    if settings.echo_transcript() && !args.quiet {
        print!("{}", vk.log().transcript());
    }
    println!("{}", summary);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["vkbd", "/tmp/scenario.toml"]);

        assert_eq!(args.scenario, PathBuf::from("/tmp/scenario.toml"));
        assert!(args.settings.is_none());
        assert!(!args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn test_args_with_options() {
        let args = Args::parse_from([
            "vkbd",
            "--settings",
            "/tmp/settings.toml",
            "--verbose",
            "-q",
            "run.toml",
        ]);

        assert_eq!(args.settings, Some(PathBuf::from("/tmp/settings.toml")));
        assert!(args.verbose);
        assert!(args.quiet);
        assert_eq!(args.scenario, PathBuf::from("run.toml"));
    }

    #[test]
    fn test_scenario_is_required() {
        assert!(Args::try_parse_from(["vkbd"]).is_err());
    }
}
