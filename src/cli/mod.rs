//! `invite_studio_cli`: a one-shot host for editing sessions.
//!
//! Every command opens a session for the given template file (restoring its
//! stored draft), runs, and closes the session, which forces a final save.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use invite_domain::EditorMode;

use crate::{
    config::{Config, ConfigManager},
    StudioError,
};

pub use commands::CliContext;

#[derive(Parser, Debug)]
#[clap(name = "invite_studio_cli", author, version, about = "Customize invitation templates from the terminal")]
pub struct Cli {
    /// Disable colors and decorations.
    #[clap(long, global = true)]
    pub plain: bool,
    /// Directory holding `config/config.json`. Defaults to the platform config dir.
    #[clap(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
    /// Overrides the configured drafts directory.
    #[clap(long, global = true, value_name = "DIR")]
    pub drafts_dir: Option<PathBuf>,
    /// Field catalog JSON to use instead of the built-in wedding catalog.
    #[clap(long, global = true, value_name = "FILE")]
    pub catalog: Option<PathBuf>,
    /// Extra tracing directive, e.g. `invite_core=debug`.
    #[clap(long, global = true, value_name = "DIRECTIVE")]
    pub log: Option<String>,
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the template's active sections in order.
    Sections { template: PathBuf },
    /// Show visible fields grouped by section.
    Fields {
        template: PathBuf,
        /// Show this mode without changing the stored one.
        #[clap(long)]
        mode: Option<EditorMode>,
    },
    /// Set a field value (`true`/`false` for toggles, comma-separated URLs for galleries).
    Set {
        template: PathBuf,
        key: String,
        value: String,
    },
    /// Reset one field, or every field when no key is given.
    Reset { template: PathBuf, key: Option<String> },
    /// Switch between basic and full mode.
    Mode { template: PathBuf, mode: EditorMode },
    /// Print the render props as JSON.
    Preview {
        template: PathBuf,
        /// Only print this section.
        #[clap(long)]
        section: Option<String>,
    },
    /// Show counts, save state and build metadata.
    Status { template: PathBuf },
    /// Delete the stored draft for a template.
    Discard { template: PathBuf },
    /// List stored drafts.
    Drafts,
}

impl Commands {
    fn template(&self) -> Option<&PathBuf> {
        match self {
            Commands::Sections { template }
            | Commands::Fields { template, .. }
            | Commands::Set { template, .. }
            | Commands::Reset { template, .. }
            | Commands::Mode { template, .. }
            | Commands::Preview { template, .. }
            | Commands::Status { template }
            | Commands::Discard { template } => Some(template),
            Commands::Drafts => None,
        }
    }
}

/// Parses process arguments and runs the selected command.
pub fn run_cli() -> Result<(), StudioError> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<(), StudioError> {
    output::set_preferences(output::OutputPreferences { plain: cli.plain });

    let manager = match &cli.config_dir {
        Some(dir) => ConfigManager::with_base_dir(dir.clone())?,
        None => ConfigManager::from_default_location()?,
    };
    let config = manager.load()?;
    crate::init_with_filter(cli.log.as_deref().or(config.log_filter.as_deref()));
    if !config.ui_color_enabled {
        output::set_preferences(output::OutputPreferences { plain: true });
    }

    let context = CliContext::new(config, cli.drafts_dir.clone(), cli.catalog.as_deref())?;
    let template = cli.command.template().cloned();
    commands::dispatch(&context, cli.command)?;

    if let Some(path) = template {
        remember_template(&manager, context.config.clone(), path);
    }
    Ok(())
}

fn remember_template(manager: &ConfigManager, mut config: Config, path: PathBuf) {
    let value = path.display().to_string();
    if config.last_opened_template.as_deref() == Some(value.as_str()) {
        return;
    }
    config.last_opened_template = Some(value);
    if let Err(err) = manager.save(&config) {
        tracing::warn!(error = %err, "could not record last opened template");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn mode_argument_parses_editor_modes() {
        let cli = Cli::try_parse_from(["invite_studio_cli", "mode", "t.json", "full"]).expect("parse");
        assert!(matches!(cli.command, Commands::Mode { mode: EditorMode::Full, .. }));

        assert!(Cli::try_parse_from(["invite_studio_cli", "mode", "t.json", "fancy"]).is_err());
    }
}
