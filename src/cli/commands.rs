use crate::core::aggregator;
use crate::domain::models::{Config, ConfigOption, DEFAULT_TEMPLATE};
use crate::infra::logger::{LogFacadeSink, setup_logger};
use crate::infra::output::{print_summary, write_output};
use crate::infra::vcs::{GitCli, VcsQuery};
use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ctxcat")]
#[command(about = "Concatenate filtered files into one LLM context document", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    Generate {
        /// Files and directories to include
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Only include these extensions (comma separated, e.g. ".rs,.toml")
        #[arg(long, default_value = "")]
        ext: String,

        /// Skip these extensions (comma separated)
        #[arg(long, default_value = "")]
        exclude_ext: String,

        /// Skip files with exactly these names (comma separated)
        #[arg(long, default_value = "")]
        exclude_names: String,

        /// Process files even when version control ignores them
        #[arg(long)]
        no_ignore: bool,

        /// Per-file template with {path} and {content} placeholders
        #[arg(long, default_value = DEFAULT_TEMPLATE)]
        template: String,

        #[arg(long)]
        output: Option<PathBuf>,

        /// Replace the output file if it already exists
        #[arg(long)]
        force: bool,

        #[arg(long)]
        clipboard: bool,
    },
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logger(cli.verbose)?;

    match cli.command {
        Commands::Generate {
            paths,
            ext,
            exclude_ext,
            exclude_names,
            no_ignore,
            template,
            output,
            force,
            clipboard,
        } => {
            info!("Starting generate command");
            debug!(
                "Command parameters: paths={:?}, ext={}, exclude_ext={}, exclude_names={}, no_ignore={}, output={:?}, force={}, clipboard={}",
                paths, ext, exclude_ext, exclude_names, no_ignore, output, force, clipboard
            );

            let vcs: Arc<dyn VcsQuery> = Arc::new(GitCli::detect());
            let config = Config::new(
                template,
                vcs,
                build_options(&ext, &exclude_ext, &exclude_names, no_ignore, cli.verbose > 0),
            )?;

            generate(&paths, &config, output, clipboard, force)?;
        }
    }
    Ok(())
}

fn build_options(
    ext: &str,
    exclude_ext: &str,
    exclude_names: &str,
    no_ignore: bool,
    verbose: bool,
) -> Vec<ConfigOption> {
    vec![
        ConfigOption::IncludeExtensions(Config::parse_list(ext)),
        ConfigOption::ExcludeExtensions(Config::parse_list(exclude_ext)),
        ConfigOption::ExcludeNames(Config::parse_list(exclude_names)),
        ConfigOption::BypassIgnore(no_ignore),
        ConfigOption::Verbose(verbose),
    ]
}

fn generate(
    paths: &[PathBuf],
    config: &Config,
    output: Option<PathBuf>,
    clipboard: bool,
    force: bool,
) -> anyhow::Result<()> {
    info!("Aggregating {} input path(s)", paths.len());
    let aggregate = aggregator::run(paths, config, &LogFacadeSink)
        .context("Failed to build context document")?;

    info!("Writing output");
    write_output(&aggregate.document, output, clipboard, force)?;
    print_summary(&aggregate.stats)
}
