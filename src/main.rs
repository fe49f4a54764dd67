use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use formink::export::{file::expand_tilde, save_export};
use formink::script::{self, Script};
use formink::session::options_from_config;
use formink::{AnnotationSession, Config, FileBackgroundSource, FormCatalog, NoticeLevel};
use std::path::{Path, PathBuf};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("FORMINK_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "formink")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Annotate scanned clinical forms and export them as PNG, PDF, or print pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recorded JSON interaction script and write its exports
    Replay {
        /// Script to replay
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Config file to use instead of ~/.config/formink/config.toml
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Directory for export files (overrides export.output_dir)
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// List the form catalog in activation order
    Forms {
        /// Config file to use instead of ~/.config/formink/config.toml
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Write the example config to ~/.config/formink/config.toml
    InitConfig,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            script,
            config,
            output_dir,
        } => run_replay(&script, config.as_deref(), output_dir),
        Command::Forms { config } => list_forms(config.as_deref()),
        Command::InitConfig => {
            let path = Config::get_config_path()?;
            Config::create_default_file(&path)?;
            println!("Wrote example config to {}", path.display());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::load_from(path)
        }
        None => Config::load(),
    }
}

fn list_forms(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let catalog = FormCatalog::from_config(&config.catalog);

    if catalog.is_empty() {
        println!("No forms configured. Add [[catalog.forms]] entries to the config file.");
        return Ok(());
    }

    for (index, form) in catalog.forms().iter().enumerate() {
        let marker = if index == 0 { " (default)" } else { "" };
        println!("{:>2}. {}{}  [{}]", index + 1, form.name, marker, form.url);
    }
    Ok(())
}

fn run_replay(
    script_path: &Path,
    config_path: Option<&Path>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let script = Script::load(script_path)?;

    let catalog = FormCatalog::from_config(&config.catalog);
    let source = FileBackgroundSource::from_config(&config.catalog);
    log::info!(
        "Replaying {} steps against {} form(s) from {}",
        script.steps.len(),
        catalog.len(),
        source.base_dir().display()
    );

    let mut session = AnnotationSession::new(
        options_from_config(&config),
        script.subject.clone(),
        Box::new(source),
    );
    let outcome = script::replay(&script, &mut session, &catalog);

    for notice in &outcome.notices {
        match notice.level {
            NoticeLevel::Error => eprintln!("error: {}", notice.message),
            NoticeLevel::Info | NoticeLevel::Success => println!("{}", notice.message),
        }
    }

    let directory = output_dir.unwrap_or_else(|| expand_tilde(&config.export.output_dir));
    for artifact in &outcome.artifacts {
        let path = save_export(artifact, &directory)
            .with_context(|| format!("Failed to write {}", artifact.filename))?;
        println!("Saved {}", path.display());
    }

    for message in &outcome.messages {
        println!("Message: {}", message.text);
        if let Some(url) = &message.handoff_url {
            println!("Handoff: {}", url);
        }
    }

    if outcome.failed_steps > 0 {
        log::warn!("{} step(s) failed", outcome.failed_steps);
        println!("{} step(s) failed", outcome.failed_steps);
    }
    Ok(())
}
