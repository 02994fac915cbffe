use log::debug;
use sha3::{Digest, Sha3_512};

use crate::codec;
use crate::items::sub_weapon;
use crate::script::{Script, ALWAYS_ON_FLAG};
use crate::shop_items::{self, NO_FLAG};
use crate::{RandomizerError, Result};

/// SHA3-512 of the unmodified script.dat shipped with the game.
const SCRIPT_DAT_HASH: &str = "d18f3a643bee62db6870b35b1a1781bcc4067bd7409fa620168e16054ddc7ce645463b59e06d0768d87eff9ad9bdc1f0efd04dbc498d2e5de73d5a863a692a90";
/// Same for the English release.
const SCRIPT_DAT_EN_HASH: &str = "146e1b6e9e63ed22fb84b3c38f4d25a0723b07fe3fefe9395af68d6eeaa3b1108b288847ec50114efff4e7600afccc68a983d681b94cbb55a507b21f45d52db7";

const TALK_COUNT: usize = 905;
const FIRST_SHOP_TALK: usize = 252;

fn sha3_512_hex(bytes: &[u8]) -> String {
    hex::encode(Sha3_512::digest(bytes))
}

pub fn is_valid_script_dat(bytes: &[u8]) -> bool {
    let hash = sha3_512_hex(bytes);
    hash == SCRIPT_DAT_HASH || hash == SCRIPT_DAT_EN_HASH
}

pub fn read_script_dat(bytes: &[u8]) -> Result<Script> {
    if !is_valid_script_dat(bytes) {
        return Err(RandomizerError::InvalidScript);
    }
    let text = codec::decode(bytes)?;
    debug!("decoded script.dat: {} bytes, {} chars", bytes.len(), text.chars().count());
    let script = Script::parse(&text)?;
    check_layout(&script)?;
    Ok(script)
}

pub fn build_script_dat(script: &Script) -> Result<Vec<u8>> {
    Ok(codec::encode(&script.stringify())?)
}

fn layout_error(what: &str) -> RandomizerError {
    RandomizerError::Assertion(format!("unexpected script layout: {what}"))
}

// Spot checks that the parse landed on the structure the rest of the crate indexes into.
fn check_layout(script: &Script) -> Result<()> {
    if script.talks().len() != TALK_COUNT {
        return Err(layout_error(&format!(
            "{} talks instead of {TALK_COUNT}",
            script.talks().len()
        )));
    }
    let field = script
        .worlds()
        .first()
        .and_then(|w| w.fields.first())
        .ok_or_else(|| layout_error("no first field"))?;
    let first_start = field
        .objects
        .first()
        .and_then(|x| x.starts.first())
        .map(|x| x.number);
    if first_start != Some(ALWAYS_ON_FLAG) {
        return Err(layout_error("first field object"));
    }
    let map_start = field
        .maps
        .first()
        .and_then(|m| m.objects.get(5))
        .and_then(|x| x.starts.first())
        .map(|x| x.number);
    if map_start != Some(58) {
        return Err(layout_error("first map object"));
    }
    let shop = shop_items::parse(&script.talks()[FIRST_SHOP_TALK])?;
    let expected = [
        (sub_weapon::HAND_SCANNER, 20, NO_FLAG),
        (sub_weapon::AMMUNITION, 500, NO_FLAG),
        (sub_weapon::BUCKLER, 80, 697),
    ];
    let actual = shop.map(|x| (x.number, x.price, x.flag));
    if actual != expected {
        return Err(layout_error(&format!("first shop is {actual:?}")));
    }
    Ok(())
}
