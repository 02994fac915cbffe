use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::items::{equipment, sub_weapon};
use crate::{RandomizerError, Result};

pub const SACRED_ORB: &str = "sacredOrb";
pub const SACRED_ORB_PREFIX: &str = "sacredOrb:";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ItemKind {
    MainWeapon,
    SubWeapon,
    Equipment,
    Rom,
    Seal,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::MainWeapon => "mainWeapon",
            ItemKind::SubWeapon => "subWeapon",
            ItemKind::Equipment => "equipment",
            ItemKind::Rom => "rom",
            ItemKind::Seal => "seal",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Item {
    pub name: Arc<str>,
    pub kind: ItemKind,
    pub number: i32,
    pub count: i32,
    pub flag: i32,
}

impl Item {
    pub fn new(name: &str, kind: ItemKind, number: i32, count: i32, flag: i32) -> Self {
        Item {
            name: Arc::from(name),
            kind,
            number,
            count,
            flag,
        }
    }

    pub fn sacred_orb_threshold(count: i32) -> Self {
        Item::new(SACRED_ORB, ItemKind::Equipment, -1, count, -1)
    }

    // Shops can't sell items whose flag low byte is zero, nor maps, orbs, main weapons and
    // seals. Sub weapons only sell as ammunition, or when they are one-off gear.
    pub fn can_display_in_shop(&self) -> bool {
        if self.flag % 256 == 0 {
            return false;
        }
        match self.kind {
            ItemKind::Equipment => {
                self.number != equipment::MAP && self.number != equipment::SACRED_ORB
            }
            ItemKind::Rom => true,
            ItemKind::SubWeapon => {
                self.count > 0 || sub_weapon::SELLABLE_WITHOUT_AMMO.contains(&self.number)
            }
            ItemKind::MainWeapon | ItemKind::Seal => false,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{}", self.name, self.kind.as_str(), self.number)?;
        if self.count > 1 {
            write!(f, " x{}", self.count)?;
        }
        write!(f, ", flag {})", self.flag)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SpotKind {
    WeaponShutter,
    Chest,
    Shop { talk_number: usize },
    SealChest,
}

// `requirement_items` is an OR of AND-groups; `None` means always reachable.
#[derive(Clone, Debug, PartialEq)]
pub struct Spot {
    pub kind: SpotKind,
    pub requirement_items: Option<Vec<Vec<Item>>>,
}

impl Spot {
    pub fn new(kind: SpotKind, requirement_items: Option<Vec<Vec<Item>>>) -> Self {
        Spot {
            kind,
            requirement_items,
        }
    }

    pub fn talk_number(&self) -> Option<usize> {
        match self.kind {
            SpotKind::Shop { talk_number } => Some(talk_number),
            _ => None,
        }
    }

    pub fn is_reachable(&self, current_item_names: &HashSet<&str>, sacred_orb_count: i32) -> bool {
        let Some(groups) = &self.requirement_items else {
            return true;
        };
        groups.iter().any(|group| {
            group.iter().all(|x| {
                (&*x.name == SACRED_ORB && x.count <= sacred_orb_count)
                    || current_item_names.contains(&*x.name)
            })
        })
    }
}

#[derive(Clone, Debug)]
pub struct ItemSpot {
    pub spot: Arc<Spot>,
    pub item: Item,
}

#[derive(Clone, Debug)]
pub struct ShopSpot {
    pub spot: Arc<Spot>,
    pub items: [Item; 3],
}

#[derive(Clone, Debug)]
pub struct Storage {
    all_requirement_names: Arc<[String]>,
    main_weapon_shutters: Vec<ItemSpot>,
    sub_weapon_shutters: Vec<ItemSpot>,
    chests: Vec<ItemSpot>,
    seal_chests: Vec<ItemSpot>,
    shops: Vec<ShopSpot>,
    all_items: Vec<Item>,
}

fn check_kinds(list: &[ItemSpot], expected: SpotKind, category: &str) -> Result<()> {
    match list.iter().find(|x| x.spot.kind != expected) {
        Some(x) => Err(RandomizerError::Assertion(format!(
            "{category} holds a spot of kind {:?}",
            x.spot.kind
        ))),
        None => Ok(()),
    }
}

impl Storage {
    pub fn new(
        all_requirement_names: Arc<[String]>,
        main_weapon_shutters: Vec<ItemSpot>,
        sub_weapon_shutters: Vec<ItemSpot>,
        chests: Vec<ItemSpot>,
        seal_chests: Vec<ItemSpot>,
        shops: Vec<ShopSpot>,
    ) -> Result<Self> {
        check_kinds(&main_weapon_shutters, SpotKind::WeaponShutter, "mainWeaponShutters")?;
        check_kinds(&sub_weapon_shutters, SpotKind::WeaponShutter, "subWeaponShutters")?;
        check_kinds(&chests, SpotKind::Chest, "chests")?;
        check_kinds(&seal_chests, SpotKind::SealChest, "sealChests")?;
        if let Some(x) = shops.iter().find(|x| x.spot.talk_number().is_none()) {
            return Err(RandomizerError::Assertion(format!(
                "shops holds a spot of kind {:?}",
                x.spot.kind
            )));
        }

        let mut all_items: Vec<Item> = main_weapon_shutters
            .iter()
            .chain(&sub_weapon_shutters)
            .chain(&chests)
            .chain(&seal_chests)
            .map(|x| x.item.clone())
            .chain(shops.iter().flat_map(|x| x.items.iter().cloned()))
            .collect();
        // Stable: items a shop can't sell come first, otherwise in placement order.
        all_items.sort_by_key(Item::can_display_in_shop);

        Ok(Storage {
            all_requirement_names,
            main_weapon_shutters,
            sub_weapon_shutters,
            chests,
            seal_chests,
            shops,
            all_items,
        })
    }

    pub fn all_requirement_names(&self) -> &Arc<[String]> {
        &self.all_requirement_names
    }

    pub fn main_weapon_shutters(&self) -> &[ItemSpot] {
        &self.main_weapon_shutters
    }

    pub fn sub_weapon_shutters(&self) -> &[ItemSpot] {
        &self.sub_weapon_shutters
    }

    pub fn chests(&self) -> &[ItemSpot] {
        &self.chests
    }

    pub fn seal_chests(&self) -> &[ItemSpot] {
        &self.seal_chests
    }

    pub fn shops(&self) -> &[ShopSpot] {
        &self.shops
    }

    pub fn all_items(&self) -> &[Item] {
        &self.all_items
    }

    pub fn placements(&self) -> impl Iterator<Item = (&Spot, &Item)> {
        self.main_weapon_shutters
            .iter()
            .chain(&self.sub_weapon_shutters)
            .chain(&self.chests)
            .chain(&self.seal_chests)
            .map(|x| (&*x.spot, &x.item))
            .chain(
                self.shops
                    .iter()
                    .flat_map(|x| x.items.iter().map(move |item| (&*x.spot, item))),
            )
    }
}
