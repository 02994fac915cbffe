use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod codec;
pub mod create_source;
pub mod dataset;
pub mod items;
mod object_factory;
pub mod randomizer;
pub mod script;
pub mod script_dat;
mod script_editor;
pub mod script_txt;
pub mod shop_items;
mod shuffle_utils;
pub mod spoiler_log;
pub mod starting_items;
pub mod supplements;
pub mod tablet_save;
pub mod validate;

use codec::CodecError;
use script_txt::ScriptParseError;

pub use randomizer::{randomize_items, Randomized};
pub use script::Script;
pub use script_dat::{build_script_dat, is_valid_script_dat, read_script_dat};
pub use starting_items::StartingItemOptions;
pub use supplements::Supplements;

pub const SUCCEEDED: &str = "Succeeded.";
pub const INSTALL_DIR_NOT_FOUND: &str = "Unable to find La-Mulana install directory.";
pub const VALID_SCRIPT_NOT_FOUND: &str = "Valid script is not found. Please re-install La-Mulana.";
pub const ALREADY_CLEAN: &str = "Already clean.";
pub const BACKUP_IS_BROKEN: &str = "Backup is broken. Please re-install La-Mulana.";

const SCRIPT_DAT_PATH: &str = "data/script.dat";
const BACKUP_PATH: &str = "data/script.dat.bak";
const SPOILER_LOG_PATH: &str = "data/spoiler_log.txt";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RandomizerSettings {
    pub seed: String,
    pub easy_mode: bool,
    pub tablet_save: bool,
    pub auto_registration: bool,
    pub start_with_grail: bool,
    pub start_with_scanner: bool,
    pub start_with_game_master: bool,
    pub start_with_glyph_reader: bool,
    pub debug: bool,
    pub install_dir: PathBuf,
    pub supplements_path: PathBuf,
}

impl RandomizerSettings {
    pub fn starting_item_options(&self) -> StartingItemOptions {
        StartingItemOptions {
            easy_mode: self.easy_mode,
            grail: self.start_with_grail,
            scanner: self.start_with_scanner,
            game_master: self.start_with_game_master,
            glyph_reader: self.start_with_glyph_reader,
        }
    }
}

#[derive(Debug, Error)]
pub enum RandomizerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("script parse error: {0}")]
    Parse(#[from] ScriptParseError),
    #[error("not a known La-Mulana script.dat")]
    InvalidScript,
    #[error("assertion failed: {0}")]
    Assertion(String),
    #[error("no completable shuffle found in {attempts} attempts")]
    ShuffleExhausted { attempts: usize },
    #[error("reachability check did not settle within {iterations} iterations")]
    ValidationDiverged { iterations: usize },
    #[error("event requirements did not resolve: {unresolved:?}")]
    EventExpansionDiverged { unresolved: Vec<String> },
}

pub type Result<T> = std::result::Result<T, RandomizerError>;

pub fn load_supplements(path: &Path) -> Result<Supplements> {
    if !path.exists() {
        return Err(RandomizerError::Config(format!(
            "Supplements file does not exist: {}",
            path.display()
        )));
    }
    Supplements::from_json(&fs::read_to_string(path)?)
}

/// Shuffles `script` in place and applies the optional extras; returns the spoiler log.
pub fn randomize_script(
    script: &mut Script,
    settings: &RandomizerSettings,
    supplements: &Supplements,
) -> Result<String> {
    let Randomized { source, shuffled } = randomize_items(script, supplements, &settings.seed)?;

    let mut log = spoiler_log::spoiler_log(&settings.seed, &source, &shuffled);
    let options = settings.starting_item_options();
    if options != StartingItemOptions::default() {
        script.add_starting_items_with_options(&[], &[], &options);
        log.push_str(&format!("starting items: {options:?}\n"));
    }
    if settings.tablet_save {
        script.tablet_save(settings.easy_mode)?;
        log.push_str("tablet save: on\n");
    }
    if settings.auto_registration {
        script.auto_registration();
        log.push_str("auto registration: on\n");
    }
    Ok(log)
}

fn read_file_or_none(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn read_valid_file_or_none(path: &Path) -> Result<Option<Vec<u8>>> {
    Ok(read_file_or_none(path)?.filter(|x| is_valid_script_dat(x)))
}

fn write_valid_script_dat(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes)?;
    if read_valid_file_or_none(path)?.is_none() {
        return Err(RandomizerError::Assertion(format!(
            "{} does not read back as a clean script",
            path.display()
        )));
    }
    Ok(())
}

pub fn apply(settings: &RandomizerSettings, supplements: &Supplements) -> Result<String> {
    if !settings.install_dir.is_dir() {
        return Ok(INSTALL_DIR_NOT_FOUND.to_owned());
    }
    let target = settings.install_dir.join(SCRIPT_DAT_PATH);
    let backup = settings.install_dir.join(BACKUP_PATH);

    let clean = match read_valid_file_or_none(&backup)? {
        Some(bytes) => bytes,
        None => {
            let Some(bytes) = read_file_or_none(&target)? else {
                return Ok(INSTALL_DIR_NOT_FOUND.to_owned());
            };
            if !is_valid_script_dat(&bytes) {
                return Ok(VALID_SCRIPT_NOT_FOUND.to_owned());
            }
            write_valid_script_dat(&backup, &bytes)?;
            info!("backed up {}", backup.display());
            bytes
        }
    };

    let mut script = read_script_dat(&clean)?;
    let log = randomize_script(&mut script, settings, supplements)?;
    fs::write(&target, build_script_dat(&script)?)?;
    info!("wrote {}", target.display());

    if settings.debug {
        let log_path = settings.install_dir.join(SPOILER_LOG_PATH);
        fs::write(log_path, log)?;
    }

    Ok(SUCCEEDED.to_owned())
}

pub fn restore(settings: &RandomizerSettings) -> Result<String> {
    if !settings.install_dir.is_dir() {
        return Ok(INSTALL_DIR_NOT_FOUND.to_owned());
    }
    let target = settings.install_dir.join(SCRIPT_DAT_PATH);
    let backup = settings.install_dir.join(BACKUP_PATH);

    let Some(clean) = read_valid_file_or_none(&backup)? else {
        return Ok(BACKUP_IS_BROKEN.to_owned());
    };
    if read_valid_file_or_none(&target)?.is_some() {
        return Ok(ALREADY_CLEAN.to_owned());
    }
    write_valid_script_dat(&target, &clean)?;
    info!("restored {}", target.display());
    Ok(SUCCEEDED.to_owned())
}
