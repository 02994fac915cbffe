use crate::dataset::{ShopSpot, Storage};
use crate::items::equipment;
use crate::script_txt::{self, ScriptParseError};
use crate::shop_items::{self, ShopItemData};
use crate::{script_editor, starting_items, tablet_save, RandomizerError, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Start {
    pub number: i32,
    pub value: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Object {
    pub number: i32,
    pub x: i32,
    pub y: i32,
    pub op1: i32,
    pub op2: i32,
    pub op3: i32,
    pub op4: i32,
    pub starts: Vec<Start>,
}

/// Non-object element of a field or map (CHIPLINE, HIT, ANIME, UP, ...).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Child {
    pub name: String,
    pub attrs: Vec<i32>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Map {
    pub attrs: Vec<i32>,
    pub children: Vec<Child>,
    pub objects: Vec<Object>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    pub attrs: Vec<i32>,
    pub children: Vec<Child>,
    pub objects: Vec<Object>,
    pub maps: Vec<Map>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct World {
    pub value: i32,
    pub fields: Vec<Field>,
}

pub mod object_number {
    pub const CHEST: i32 = 1;
    pub const SUB_WEAPON: i32 = 13;
    pub const SHOP: i32 = 14;
    pub const SHUTTER_CHECK: i32 = 20;
    pub const WALL_CHECK: i32 = 59;
    pub const BREAKABLE_WALL: i32 = 70;
    pub const SEAL: i32 = 71;
    pub const MAIN_WEAPON: i32 = 77;
    pub const MAUSOLEUM_ANKH_TRIGGER: i32 = 140;
    pub const VIMANA: i32 = 186;
}

/// Start number that is always set once a game is running.
pub const ALWAYS_ON_FLAG: i32 = 99999;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MainWeaponData {
    pub main_weapon_number: i32,
    pub flag: i32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SubWeaponData {
    pub sub_weapon_number: i32,
    pub count: i32,
    pub flag: i32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChestItemData {
    pub open_flag: i32,
    pub chest_item_number: i32,
    pub flag: i32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SealData {
    pub seal_number: i32,
    pub flag: i32,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShopData {
    pub talk_number: usize,
    pub items: [ShopItemData; 3],
}

impl Object {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        number: i32,
        x: i32,
        y: i32,
        op1: i32,
        op2: i32,
        op3: i32,
        op4: i32,
        starts: Vec<Start>,
    ) -> Self {
        Object {
            number,
            x,
            y,
            op1,
            op2,
            op3,
            op4,
            starts,
        }
    }

    pub fn as_main_weapon(&self) -> MainWeaponData {
        MainWeaponData {
            main_weapon_number: self.op1,
            flag: self.op2,
        }
    }

    pub fn as_sub_weapon(&self) -> SubWeaponData {
        SubWeaponData {
            sub_weapon_number: self.op1,
            count: self.op2,
            flag: self.op3,
        }
    }

    pub fn as_chest_item(&self) -> ChestItemData {
        ChestItemData {
            open_flag: self.op1,
            chest_item_number: self.op2,
            flag: self.op3,
        }
    }

    pub fn as_seal(&self) -> SealData {
        SealData {
            seal_number: self.op1,
            flag: self.op2,
        }
    }

    pub fn item_flag(&self) -> Result<i32> {
        match self.number {
            object_number::CHEST | object_number::SUB_WEAPON => Ok(self.op3),
            object_number::SEAL | object_number::MAIN_WEAPON => Ok(self.op2),
            number => Err(RandomizerError::Assertion(format!(
                "object {number} holds no item"
            ))),
        }
    }

    // Second twin statue chest; it shares its item with the first one.
    pub(crate) fn is_second_twin_statue(&self) -> bool {
        self.number == object_number::CHEST
            && self.x == 8192
            && self.y == 6144
            && self.op1 == 420
            && self.op2 == 14
            && self.op3 == 766
            && self.op4 == 0
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Script {
    talks: Vec<String>,
    worlds: Vec<World>,
}

impl Script {
    /// Parses script text and checks that it re-serializes to the same bytes.
    pub fn parse(text: &str) -> Result<Self> {
        let (talks, worlds) = script_txt::parse_script_txt(text)?;
        let script = Script { talks, worlds };
        if let Some(offset) = script_txt::first_difference(text, &script.stringify()) {
            return Err(ScriptParseError::RoundTripMismatch { offset }.into());
        }
        Ok(script)
    }

    pub fn from_parts(talks: Vec<String>, worlds: Vec<World>) -> Self {
        Script { talks, worlds }
    }

    pub fn stringify(&self) -> String {
        script_txt::stringify_script_txt(&self.talks, &self.worlds)
    }

    pub fn talks(&self) -> &[String] {
        &self.talks
    }

    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    fn view_objects(&self) -> impl Iterator<Item = &Object> {
        self.worlds
            .iter()
            .take(1)
            .flat_map(|w| &w.fields)
            .flat_map(|f| &f.maps)
            .flat_map(|m| &m.objects)
    }

    pub fn main_weapons(&self) -> Vec<MainWeaponData> {
        self.view_objects()
            .filter(|x| x.number == object_number::MAIN_WEAPON)
            .map(Object::as_main_weapon)
            .collect()
    }

    pub fn sub_weapons(&self) -> Vec<SubWeaponData> {
        self.view_objects()
            .filter(|x| x.number == object_number::SUB_WEAPON)
            .map(Object::as_sub_weapon)
            .collect()
    }

    pub fn chests(&self) -> Vec<ChestItemData> {
        self.view_objects()
            .filter(|x| x.number == object_number::CHEST && !x.is_second_twin_statue())
            .map(Object::as_chest_item)
            .filter(|x| {
                x.chest_item_number != -1 && x.chest_item_number != equipment::SWEET_CLOTHING
            })
            .collect()
    }

    pub fn seals(&self) -> Vec<SealData> {
        self.view_objects()
            .filter(|x| x.number == object_number::SEAL)
            .map(Object::as_seal)
            .collect()
    }

    pub fn shops(&self) -> Result<Vec<ShopData>> {
        self.view_objects()
            .filter(|x| x.number == object_number::SHOP && x.op1 <= 99)
            .map(|x| {
                let talk_number = usize::try_from(x.op4).map_err(|_| {
                    RandomizerError::Assertion(format!("shop refers to talk {}", x.op4))
                })?;
                let talk = self.talks.get(talk_number).ok_or_else(|| {
                    RandomizerError::Assertion(format!("shop refers to missing talk {talk_number}"))
                })?;
                Ok(ShopData {
                    talk_number,
                    items: shop_items::parse(talk)?,
                })
            })
            .collect()
    }

    pub fn replace_items(&mut self, shuffled: &Storage) -> Result<()> {
        script_editor::replace_items(&mut self.worlds, shuffled)
    }

    pub fn replace_shops(&mut self, shops: &[ShopSpot]) -> Result<()> {
        script_editor::replace_shops(&mut self.talks, shops)
    }

    pub fn add_object(&mut self, field: i32, screen_x: i32, screen_y: i32, objects: &[Object]) {
        add_object(&mut self.worlds, field, screen_x, screen_y, objects);
    }

    pub fn add_starting_items(&mut self, chest_item_numbers: &[i32], sub_weapons: &[i32]) {
        starting_items::add_starting_items(&mut self.worlds, chest_item_numbers, sub_weapons);
    }

    pub fn add_starting_items_with_options(
        &mut self,
        chest_item_numbers: &[i32],
        sub_weapons: &[i32],
        options: &starting_items::StartingItemOptions,
    ) {
        starting_items::add_starting_items_with_options(
            &mut self.worlds,
            chest_item_numbers,
            sub_weapons,
            options,
        );
    }

    pub fn tablet_save(&mut self, easy_mode: bool) -> Result<()> {
        tablet_save::tablet_save(&mut self.worlds, easy_mode);
        tablet_save::prefix_save_prompt(&mut self.talks)
    }

    pub fn auto_registration(&mut self) {
        tablet_save::auto_registration(&mut self.worlds);
    }
}

pub fn add_object(
    worlds: &mut [World],
    field: i32,
    screen_x: i32,
    screen_y: i32,
    objects: &[Object],
) {
    for world in worlds.iter_mut() {
        for f in world.fields.iter_mut().filter(|f| f.attrs.first() == Some(&field)) {
            for map in f
                .maps
                .iter_mut()
                .filter(|m| m.attrs.first() == Some(&screen_x) && m.attrs.get(1) == Some(&screen_y))
            {
                map.objects.extend_from_slice(objects);
            }
        }
    }
}
