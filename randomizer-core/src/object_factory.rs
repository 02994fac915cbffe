//! Builds the replacement objects that hand out a shuffled item at an existing spot.

use crate::dataset::{Item, ItemKind};
use crate::items::{sub_weapon, ROM_CHEST_OFFSET};
use crate::script::{object_number, Object, Start, ALWAYS_ON_FLAG};
use crate::{RandomizerError, Result};

pub fn to_object_for_shutter(old: &Object, start_flag: i32, item: &Item) -> Result<Object> {
    match item.kind {
        ItemKind::MainWeapon => create_main_weapon(old, item),
        ItemKind::SubWeapon => {
            check_ankh_jewel(item)?;
            create_sub_weapon(old, item)
        }
        ItemKind::Equipment | ItemKind::Rom => {
            let old_flag = old.item_flag()?;
            let mut starts = vec![
                Start {
                    number: ALWAYS_ON_FLAG,
                    value: true,
                },
                Start {
                    number: start_flag,
                    value: true,
                },
            ];
            starts.extend(
                old.starts
                    .iter()
                    .filter(|x| x.number != ALWAYS_ON_FLAG && x.number != old_flag),
            );
            Ok(Object::new(
                object_number::CHEST,
                old.x,
                old.y,
                40,
                chest_item_number(item),
                item.flag,
                -1,
                starts,
            ))
        }
        ItemKind::Seal => create_seal(old, item),
    }
}

pub fn to_object_for_special_chest(old: &Object, item: &Item) -> Result<Object> {
    match item.kind {
        ItemKind::MainWeapon => create_main_weapon(old, item),
        ItemKind::SubWeapon => {
            check_ankh_jewel(item)?;
            create_sub_weapon(old, item)
        }
        ItemKind::Equipment | ItemKind::Rom => Ok(Object::new(
            object_number::CHEST,
            old.x,
            old.y,
            40,
            chest_item_number(item),
            item.flag,
            -1,
            starts_without_item_flag(old)?,
        )),
        ItemKind::Seal => create_seal(old, item),
    }
}

/// Chest contents; weapons and seals need an empty chest plus the item itself.
pub fn to_objects_for_chest(old: &Object, item: &Item) -> Result<Vec<Object>> {
    match item.kind {
        ItemKind::MainWeapon => {
            let starts = create_chest_starts(old, item.flag)?;
            Ok(vec![
                create_empty_chest(old, starts.clone()),
                Object::new(
                    object_number::MAIN_WEAPON,
                    old.x,
                    old.y,
                    item.number,
                    item.flag,
                    -1,
                    -1,
                    starts,
                ),
            ])
        }
        ItemKind::SubWeapon => {
            check_ankh_jewel(item)?;
            let starts = create_chest_starts(old, item.flag)?;
            Ok(vec![
                create_empty_chest(old, starts.clone()),
                Object::new(
                    object_number::SUB_WEAPON,
                    old.x,
                    old.y,
                    item.number,
                    item.count,
                    item.flag,
                    -1,
                    starts,
                ),
            ])
        }
        ItemKind::Equipment | ItemKind::Rom => {
            let old_flag = old.item_flag()?;
            let mut starts = starts_without_item_flag(old)?;
            // e.g. the talisman chest, which only appears until its item is taken
            if old.starts.iter().any(|x| x.number == old_flag) {
                starts.push(Start {
                    number: item.flag,
                    value: false,
                });
            }
            Ok(vec![Object::new(
                object_number::CHEST,
                old.x,
                old.y,
                old.op1,
                chest_item_number(item),
                item.flag,
                -1,
                starts,
            )])
        }
        ItemKind::Seal => {
            let starts = create_chest_starts(old, item.flag)?;
            Ok(vec![
                create_empty_chest(old, starts.clone()),
                Object::new(
                    object_number::SEAL,
                    old.x,
                    old.y,
                    item.number,
                    item.flag,
                    -1,
                    -1,
                    starts,
                ),
            ])
        }
    }
}

fn chest_item_number(item: &Item) -> i32 {
    match item.kind {
        ItemKind::Rom => ROM_CHEST_OFFSET + item.number,
        _ => item.number,
    }
}

fn check_ankh_jewel(item: &Item) -> Result<()> {
    if item.number == sub_weapon::ANKH_JEWEL && item.count > 1 {
        return Err(RandomizerError::Assertion(format!(
            "ankh jewel placed with count {}",
            item.count
        )));
    }
    Ok(())
}

fn starts_without_item_flag(old: &Object) -> Result<Vec<Start>> {
    let old_flag = old.item_flag()?;
    Ok(old
        .starts
        .iter()
        .filter(|x| x.number != old_flag)
        .copied()
        .collect())
}

fn replaced_starts(old: &Object, flag: i32) -> Result<Vec<Start>> {
    let mut starts = starts_without_item_flag(old)?;
    starts.push(Start {
        number: flag,
        value: false,
    });
    Ok(starts)
}

fn create_main_weapon(old: &Object, item: &Item) -> Result<Object> {
    Ok(Object::new(
        object_number::MAIN_WEAPON,
        old.x,
        old.y,
        item.number,
        item.flag,
        -1,
        -1,
        replaced_starts(old, item.flag)?,
    ))
}

fn create_sub_weapon(old: &Object, item: &Item) -> Result<Object> {
    Ok(Object::new(
        object_number::SUB_WEAPON,
        old.x,
        old.y,
        item.number,
        item.count,
        item.flag,
        -1,
        replaced_starts(old, item.flag)?,
    ))
}

fn create_seal(old: &Object, item: &Item) -> Result<Object> {
    Ok(Object::new(
        object_number::SEAL,
        old.x,
        old.y,
        item.number,
        item.flag,
        -1,
        -1,
        replaced_starts(old, item.flag)?,
    ))
}

fn create_empty_chest(old: &Object, starts: Vec<Start>) -> Object {
    Object::new(
        object_number::CHEST,
        old.x,
        old.y,
        old.op1,
        -1,
        old.op1,
        -1,
        starts,
    )
}

fn create_chest_starts(old: &Object, flag: i32) -> Result<Vec<Start>> {
    let old_flag = old.item_flag()?;
    let mut starts = vec![
        Start {
            number: ALWAYS_ON_FLAG,
            value: true,
        },
        Start {
            number: old.as_chest_item().open_flag,
            value: true,
        },
        Start {
            number: flag,
            value: false,
        },
    ];
    starts.extend(
        old.starts
            .iter()
            .filter(|x| x.number != ALWAYS_ON_FLAG && x.number != old_flag),
    );
    Ok(starts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(number: i32, value: bool) -> Start {
        Start { number, value }
    }

    fn chest() -> Object {
        Object::new(
            1,
            100,
            200,
            50,
            10,
            300,
            -1,
            vec![start(ALWAYS_ON_FLAG, true), start(300, false), start(42, true)],
        )
    }

    #[test]
    fn chest_with_equipment_keeps_open_flag() {
        let item = Item::new("boots", ItemKind::Equipment, 16, 1, 600);
        let objs = to_objects_for_chest(&chest(), &item).unwrap();
        assert_eq!(
            objs,
            vec![Object::new(
                1,
                100,
                200,
                50,
                16,
                600,
                -1,
                vec![start(ALWAYS_ON_FLAG, true), start(42, true), start(600, false)],
            )]
        );
    }

    #[test]
    fn chest_with_rom_offsets_number() {
        let mut old = chest();
        old.starts = vec![start(42, true)];
        let item = Item::new("glyphReader", ItemKind::Rom, 2, 1, 601);
        let objs = to_objects_for_chest(&old, &item).unwrap();
        assert_eq!(objs[0].op2, 102);
        assert_eq!(objs[0].starts, vec![start(42, true)]);
    }

    #[test]
    fn chest_with_sub_weapon_adds_empty_chest() {
        let item = Item::new("spear", ItemKind::SubWeapon, 2, 1, 700);
        let objs = to_objects_for_chest(&chest(), &item).unwrap();
        let starts = vec![
            start(ALWAYS_ON_FLAG, true),
            start(50, true),
            start(700, false),
            start(42, true),
        ];
        assert_eq!(
            objs,
            vec![
                Object::new(1, 100, 200, 50, -1, 50, -1, starts.clone()),
                Object::new(13, 100, 200, 2, 1, 700, -1, starts),
            ]
        );
    }

    #[test]
    fn chest_with_seal_adds_empty_chest() {
        let item = Item::new("originSeal", ItemKind::Seal, 0, 1, 701);
        let objs = to_objects_for_chest(&chest(), &item).unwrap();
        assert_eq!(objs.len(), 2);
        assert_eq!((objs[1].number, objs[1].op1, objs[1].op2), (71, 0, 701));
    }

    #[test]
    fn shutter_with_equipment_waits_for_start_flag() {
        let old = Object::new(
            77,
            5,
            6,
            2,
            180,
            -1,
            -1,
            vec![start(180, false), start(12, true)],
        );
        let item = Item::new("feather", ItemKind::Equipment, 17, 1, 610);
        let obj = to_object_for_shutter(&old, 900, &item).unwrap();
        assert_eq!(
            obj,
            Object::new(
                1,
                5,
                6,
                40,
                17,
                610,
                -1,
                vec![start(ALWAYS_ON_FLAG, true), start(900, true), start(12, true)],
            )
        );
    }

    #[test]
    fn shutter_with_main_weapon_swaps_flag() {
        let old = Object::new(13, 5, 6, 1, 1, 181, -1, vec![start(181, false)]);
        let item = Item::new("axe", ItemKind::MainWeapon, 5, 1, 182);
        let obj = to_object_for_shutter(&old, 900, &item).unwrap();
        assert_eq!(obj, Object::new(77, 5, 6, 5, 182, -1, -1, vec![start(182, false)]));
    }

    #[test]
    fn special_chest_drops_old_flag_only() {
        let old = Object::new(71, 5, 6, 1, 400, -1, -1, vec![start(400, false), start(1, true)]);
        let item = Item::new("map", ItemKind::Equipment, 54, 1, 620);
        let obj = to_object_for_special_chest(&old, &item).unwrap();
        assert_eq!(obj, Object::new(1, 5, 6, 40, 54, 620, -1, vec![start(1, true)]));
    }

    #[test]
    fn rejects_stacked_ankh_jewels() {
        let item = Item::new("ankhJewel", ItemKind::SubWeapon, sub_weapon::ANKH_JEWEL, 2, 630);
        assert!(to_objects_for_chest(&chest(), &item).is_err());
    }
}
