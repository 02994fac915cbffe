use serde::{Deserialize, Serialize};

use crate::items::{equipment, rom, sub_weapon, ROM_CHEST_OFFSET};
use crate::script::{add_object, object_number, Object, Start, World};

/// Flag nothing else in the game uses; set once the starting items were handed out.
pub const UNUSED_ONE_TIME_FLAG: i32 = 7400;
pub const UNUSED_SAVE_FLAG: i32 = 6000;

const STARTING_FIELD: i32 = 1;
const STARTING_SCREEN: (i32, i32) = (3, 1);
const ITEM_X: i32 = 26624;
const ITEM_Y: i32 = 14336;
const FLAG_SETTER_Y: i32 = 10240;
const SHOP_ITEM_OBJECT: i32 = 7;
const GRANT_POS: (i32, i32) = (43008, 22528);
const FLAG_SETTER_OBJECT: i32 = 22;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingItemOptions {
    pub easy_mode: bool,
    pub grail: bool,
    pub scanner: bool,
    pub game_master: bool,
    pub glyph_reader: bool,
}

fn flag_setter() -> Object {
    Object::new(
        FLAG_SETTER_OBJECT,
        ITEM_X,
        FLAG_SETTER_Y,
        2,
        2,
        UNUSED_ONE_TIME_FLAG,
        -1,
        vec![],
    )
}

fn starting_objects(chest_item_numbers: &[i32], sub_weapons: &[i32]) -> Vec<Object> {
    let not_saved = || {
        vec![Start {
            number: UNUSED_SAVE_FLAG,
            value: false,
        }]
    };
    std::iter::once(flag_setter())
        .chain(sub_weapons.iter().flat_map(|&number| {
            // The weapon itself, then its ammunition.
            [0, 255].map(|count| {
                Object::new(
                    object_number::SUB_WEAPON,
                    ITEM_X,
                    FLAG_SETTER_Y,
                    number,
                    count,
                    UNUSED_SAVE_FLAG,
                    -1,
                    not_saved(),
                )
            })
        }))
        .chain(chest_item_numbers.iter().map(|&number| {
            Object::new(
                object_number::CHEST,
                ITEM_X,
                ITEM_Y,
                UNUSED_ONE_TIME_FLAG,
                number,
                UNUSED_SAVE_FLAG,
                -1,
                vec![],
            )
        }))
        .collect()
}

/// Grants chest items (equipment numbers, or ROM numbers offset by 100) and sub weapons
/// at the start of a new game.
pub fn add_starting_items(worlds: &mut [World], chest_item_numbers: &[i32], sub_weapons: &[i32]) {
    let objects = starting_objects(chest_item_numbers, sub_weapons);
    let (x, y) = STARTING_SCREEN;
    add_object(worlds, STARTING_FIELD, x, y, &objects);
}

pub fn add_starting_items_with_options(
    worlds: &mut [World],
    chest_item_numbers: &[i32],
    sub_weapons: &[i32],
    options: &StartingItemOptions,
) {
    let mut chest_item_numbers = chest_item_numbers.to_vec();
    let mut sub_weapons = sub_weapons.to_vec();
    if !options.easy_mode {
        if options.grail {
            chest_item_numbers.push(equipment::HOLY_GRAIL);
        }
        if options.game_master {
            chest_item_numbers.push(ROM_CHEST_OFFSET + rom::GAME_MASTER);
        }
        if options.glyph_reader {
            chest_item_numbers.push(ROM_CHEST_OFFSET + rom::GLYPH_READER);
        }
        if options.scanner {
            sub_weapons.push(sub_weapon::HAND_SCANNER);
        }
    }
    let mut objects = starting_objects(&chest_item_numbers, &sub_weapons);
    if options.easy_mode {
        let (x, y) = GRANT_POS;
        // money, then weights
        objects.push(Object::new(SHOP_ITEM_OBJECT, x, y, 7, 46, -1, -1, vec![]));
        objects.push(Object::new(SHOP_ITEM_OBJECT, x, y, 6, 3, -1, -1, vec![]));
    }
    let (x, y) = STARTING_SCREEN;
    add_object(worlds, STARTING_FIELD, x, y, &objects);
}
