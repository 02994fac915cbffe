use crate::dataset::{Item, ItemKind, ItemSpot, ShopSpot, Storage};
use crate::items::{equipment, sub_weapon};
use crate::object_factory::{to_object_for_shutter, to_object_for_special_chest, to_objects_for_chest};
use crate::script::{object_number, Object, Start, World};
use crate::shop_items::{self, ShopItemData};
use crate::supplements::{
    NIGHT_SURFACE_CHEST_COUNT, NIGHT_SURFACE_SEAL_COUNT, NIGHT_SURFACE_SUB_WEAPON_COUNT,
    TRUE_SHRINE_OF_THE_MOTHER_SEAL_COUNT,
};
use crate::{RandomizerError, Result};

const GATE_OF_GUIDANCE_ANKH_JEWEL_FLAG: i32 = 743;
const MAUSOLEUM_ANKH_TRIGGER_POS: (i32, i32) = (49152, 16384);
const VIMANA_OLD_START: i32 = 788;
const VIMANA_NEW_START: i32 = 891;

/// Rewrites the three records of every shop talk that has a shuffled counterpart.
/// Prices are kept from the original record.
pub fn replace_shops(talks: &mut [String], shops: &[ShopSpot]) -> Result<()> {
    for (i, talk) in talks.iter_mut().enumerate() {
        let Some(new_shop) = shops.iter().find(|x| x.spot.talk_number() == Some(i)) else {
            continue;
        };
        let old = shop_items::parse(talk)?;
        let mut replaced = old;
        for (slot, (old_item, new_item)) in replaced.iter_mut().zip(old.iter().zip(&new_shop.items)) {
            *slot = ShopItemData {
                kind: to_shop_item_kind(new_item)?,
                number: new_item.number,
                price: old_item.price,
                count: new_item.count,
                flag: new_item.flag,
            };
        }
        *talk = shop_items::stringify(&replaced)?;
    }
    Ok(())
}

fn to_shop_item_kind(item: &Item) -> Result<u8> {
    match item.kind {
        ItemKind::SubWeapon => Ok(0),
        ItemKind::Equipment => Ok(1),
        ItemKind::Rom => Ok(2),
        ItemKind::MainWeapon | ItemKind::Seal => Err(RandomizerError::Assertion(format!(
            "{item} can't be sold in a shop"
        ))),
    }
}

#[derive(Debug, Default)]
struct Cursors {
    main_weapon: usize,
    sub_weapon: usize,
    chest: usize,
    seal: usize,
}

pub fn replace_items(worlds: &mut [World], shuffled: &Storage) -> Result<()> {
    let mut cursors = Cursors::default();
    for world in worlds.iter_mut() {
        for field in world.fields.iter_mut() {
            for map in field.maps.iter_mut() {
                let old = std::mem::take(&mut map.objects);
                let mut objects = Vec::with_capacity(old.len());
                for (i, obj) in old.iter().enumerate() {
                    objects.extend(replace_object(obj, &old[i + 1..], shuffled, &mut cursors)?);
                }
                map.objects = objects;
            }
        }
    }
    check_cursors(&cursors, shuffled)
}

fn replace_object(
    obj: &Object,
    following: &[Object],
    shuffled: &Storage,
    cursors: &mut Cursors,
) -> Result<Vec<Object>> {
    match obj.number {
        object_number::MAIN_WEAPON => {
            let item = nth_item(shuffled.main_weapon_shutters(), cursors.main_weapon, "main weapon")?;
            cursors.main_weapon += 1;
            let flag = next_shutter_check_flag(following)?;
            Ok(vec![to_object_for_shutter(obj, flag, item)?])
        }
        object_number::SUB_WEAPON => {
            let len = shuffled.sub_weapon_shutters().len();
            if cursors.sub_weapon >= len {
                check_extra(cursors.sub_weapon, len + NIGHT_SURFACE_SUB_WEAPON_COUNT, "sub weapon")?;
                cursors.sub_weapon += 1;
                return Ok(vec![obj.clone()]);
            }
            let item = &shuffled.sub_weapon_shutters()[cursors.sub_weapon].item;
            cursors.sub_weapon += 1;
            if obj.op1 == sub_weapon::ANKH_JEWEL {
                if obj.op3 != GATE_OF_GUIDANCE_ANKH_JEWEL_FLAG {
                    return Ok(vec![to_object_for_special_chest(obj, item)?]);
                }
                let flag = next_wall_check_flag(following)?;
                return Ok(vec![to_object_for_shutter(obj, flag, item)?]);
            }
            let flag = if obj.op1 == sub_weapon::PISTOL {
                next_breakable_wall_check_flag(following)?
            } else {
                next_shutter_check_flag(following)?
            };
            Ok(vec![to_object_for_shutter(obj, flag, item)?])
        }
        object_number::CHEST => {
            if obj.op2 == -1 || obj.op2 == equipment::SWEET_CLOTHING {
                return Ok(vec![obj.clone()]);
            }
            let len = shuffled.chests().len();
            if cursors.chest >= len {
                check_extra(cursors.chest, len + NIGHT_SURFACE_CHEST_COUNT, "chest")?;
                cursors.chest += 1;
                return Ok(vec![obj.clone()]);
            }
            let item = if obj.is_second_twin_statue() {
                // Shares the item placed in the first twin statue chest.
                let prev = cursors.chest.checked_sub(1).ok_or_else(|| {
                    RandomizerError::Assertion("twin statue chest comes first".to_owned())
                })?;
                &shuffled.chests()[prev].item
            } else {
                let item = &shuffled.chests()[cursors.chest].item;
                cursors.chest += 1;
                item
            };
            to_objects_for_chest(obj, item)
        }
        object_number::SEAL => {
            let len = shuffled.seal_chests().len();
            if cursors.seal >= len {
                let extra = TRUE_SHRINE_OF_THE_MOTHER_SEAL_COUNT + NIGHT_SURFACE_SEAL_COUNT;
                check_extra(cursors.seal, len + extra, "seal")?;
                cursors.seal += 1;
                return Ok(vec![obj.clone()]);
            }
            let item = &shuffled.seal_chests()[cursors.seal].item;
            cursors.seal += 1;
            Ok(vec![to_object_for_special_chest(obj, item)?])
        }
        object_number::MAUSOLEUM_ANKH_TRIGGER if (obj.x, obj.y) == MAUSOLEUM_ANKH_TRIGGER_POS => {
            let prev = cursors.sub_weapon.checked_sub(1).ok_or_else(|| {
                RandomizerError::Assertion("ankh trigger precedes every sub weapon".to_owned())
            })?;
            let item = nth_item(shuffled.sub_weapon_shutters(), prev, "sub weapon")?;
            Ok(vec![Object {
                op1: item.flag,
                ..obj.clone()
            }])
        }
        object_number::VIMANA
            if obj.starts.len() == 1 && obj.starts[0].number == VIMANA_OLD_START =>
        {
            Ok(vec![Object {
                starts: vec![Start {
                    number: VIMANA_NEW_START,
                    value: obj.starts[0].value,
                }],
                ..obj.clone()
            }])
        }
        _ => Ok(vec![obj.clone()]),
    }
}

fn nth_item<'a>(list: &'a [ItemSpot], idx: usize, what: &str) -> Result<&'a Item> {
    list.get(idx).map(|x| &x.item).ok_or_else(|| {
        RandomizerError::Assertion(format!("script has more {what} objects than placements"))
    })
}

fn check_extra(idx: usize, limit: usize, what: &str) -> Result<()> {
    if idx >= limit {
        return Err(RandomizerError::Assertion(format!(
            "script has more {what} objects than placements"
        )));
    }
    Ok(())
}

fn check_cursors(cursors: &Cursors, shuffled: &Storage) -> Result<()> {
    let expected = [
        ("main weapon", cursors.main_weapon, shuffled.main_weapon_shutters().len()),
        (
            "sub weapon",
            cursors.sub_weapon,
            shuffled.sub_weapon_shutters().len() + NIGHT_SURFACE_SUB_WEAPON_COUNT,
        ),
        (
            "chest",
            cursors.chest,
            shuffled.chests().len() + NIGHT_SURFACE_CHEST_COUNT,
        ),
        (
            "seal",
            cursors.seal,
            shuffled.seal_chests().len()
                + TRUE_SHRINE_OF_THE_MOTHER_SEAL_COUNT
                + NIGHT_SURFACE_SEAL_COUNT,
        ),
    ];
    for (what, visited, expected) in expected {
        if visited != expected {
            return Err(RandomizerError::Assertion(format!(
                "visited {visited} {what} objects, expected {expected}"
            )));
        }
    }
    Ok(())
}

fn find_next(objs: &[Object], number: i32) -> Result<&Object> {
    objs.iter().find(|x| x.number == number).ok_or_else(|| {
        RandomizerError::Assertion(format!("no object {number} follows the item"))
    })
}

fn next_shutter_check_flag(objs: &[Object]) -> Result<i32> {
    Ok(find_next(objs, object_number::SHUTTER_CHECK)?.op1)
}

fn next_wall_check_flag(objs: &[Object]) -> Result<i32> {
    Ok(find_next(objs, object_number::WALL_CHECK)?.op3)
}

// op4 packs the wall's flag between the thousands and the units digit.
fn next_breakable_wall_check_flag(objs: &[Object]) -> Result<i32> {
    let data = find_next(objs, object_number::BREAKABLE_WALL)?.op4;
    Ok((data - (data / 10000) * 10000) / 10)
}
