use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use lamulana_randomizer_core::{
    apply, load_supplements, restore, RandomizerSettings, ALREADY_CLEAN, SUCCEEDED,
};

#[derive(Debug, Parser)]
#[command(name = "lamulana-randomizer", version, about = "La-Mulana item randomizer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Randomize data/script.dat, backing up the clean file first.
    Apply(ApplyArgs),
    /// Put the clean backup back in place.
    Restore {
        #[arg(long)]
        install_dir: PathBuf,
    },
}

#[derive(Debug, Args)]
struct ApplyArgs {
    #[arg(long)]
    install_dir: PathBuf,

    #[arg(long)]
    seed: String,

    /// JSON file describing every placement and its requirements.
    #[arg(long, default_value = "supplements.json")]
    supplements: PathBuf,

    #[arg(long, default_value_t = false)]
    easy_mode: bool,

    #[arg(long, default_value_t = false)]
    tablet_save: bool,

    #[arg(long, default_value_t = false)]
    auto_registration: bool,

    #[arg(long, default_value_t = false)]
    start_with_grail: bool,

    #[arg(long, default_value_t = false)]
    start_with_scanner: bool,

    #[arg(long, default_value_t = false)]
    start_with_game_master: bool,

    #[arg(long, default_value_t = false)]
    start_with_glyph_reader: bool,

    /// Also write data/spoiler_log.txt.
    #[arg(long, default_value_t = false)]
    debug: bool,
}

impl From<ApplyArgs> for RandomizerSettings {
    fn from(args: ApplyArgs) -> Self {
        RandomizerSettings {
            seed: args.seed,
            easy_mode: args.easy_mode,
            tablet_save: args.tablet_save,
            auto_registration: args.auto_registration,
            start_with_grail: args.start_with_grail,
            start_with_scanner: args.start_with_scanner,
            start_with_game_master: args.start_with_game_master,
            start_with_glyph_reader: args.start_with_glyph_reader,
            debug: args.debug,
            install_dir: args.install_dir,
            supplements_path: args.supplements,
        }
    }
}

fn run(cli: Cli) -> lamulana_randomizer_core::Result<String> {
    match cli.command {
        Command::Apply(args) => {
            let settings = RandomizerSettings::from(args);
            log::debug!(
                "settings: {}",
                serde_json::to_string(&settings).unwrap_or_default()
            );
            let supplements = load_supplements(&settings.supplements_path)?;
            apply(&settings, &supplements)
        }
        Command::Restore { install_dir } => restore(&RandomizerSettings {
            install_dir,
            ..RandomizerSettings::default()
        }),
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(status) => {
            println!("{status}");
            if status != SUCCEEDED && status != ALREADY_CLEAN {
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
