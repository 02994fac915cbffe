use std::collections::BTreeSet;
use std::sync::Arc;

use log::warn;

use crate::dataset::{
    Item, ItemKind, ItemSpot, ShopSpot, Spot, SpotKind, Storage, SACRED_ORB_PREFIX,
};
use crate::items::ROM_CHEST_OFFSET;
use crate::script::Script;
use crate::shop_items::ShopItemData;
use crate::supplements::{
    expand_events, parse_requirements, RequirementGroups, SpotSupplement, Supplements,
    NIGHT_SURFACE_CHEST_COUNT, NIGHT_SURFACE_SEAL_COUNT, NIGHT_SURFACE_SUB_WEAPON_COUNT,
    TRUE_SHRINE_OF_THE_MOTHER_SEAL_COUNT, WARE_NO_MISE_COUNT,
};
use crate::{RandomizerError, Result};

fn check_count(what: &str, in_script: usize, expected: usize) -> Result<()> {
    if in_script != expected {
        return Err(RandomizerError::Assertion(format!(
            "script has {in_script} {what}, supplements describe {expected}"
        )));
    }
    Ok(())
}

fn shop_item(name: &str, data: &ShopItemData) -> Result<Item> {
    let kind = match data.kind {
        0 => ItemKind::SubWeapon,
        1 => ItemKind::Equipment,
        2 => ItemKind::Rom,
        kind => {
            return Err(RandomizerError::Assertion(format!(
                "unknown shop item kind {kind} for {name}"
            )))
        }
    };
    Ok(Item::new(name, kind, data.number, data.count, data.flag))
}

struct AllItems {
    main_weapons: Vec<Item>,
    sub_weapons: Vec<Item>,
    chests: Vec<Item>,
    seals: Vec<Item>,
    shops: Vec<(usize, [Item; 3])>,
}

impl AllItems {
    fn new(script: &Script, supplements: &Supplements) -> Result<Self> {
        let main_weapon_data = script.main_weapons();
        check_count("main weapons", main_weapon_data.len(), supplements.main_weapons.len())?;
        let main_weapons = supplements
            .main_weapons
            .iter()
            .zip(&main_weapon_data)
            .map(|(s, d)| Item::new(&s.name, ItemKind::MainWeapon, d.main_weapon_number, 1, d.flag))
            .collect();

        let sub_weapon_data = script.sub_weapons();
        check_count(
            "sub weapons",
            sub_weapon_data.len(),
            supplements.sub_weapons.len() + NIGHT_SURFACE_SUB_WEAPON_COUNT,
        )?;
        let sub_weapons = supplements
            .sub_weapons
            .iter()
            .zip(&sub_weapon_data)
            .map(|(s, d)| Item::new(&s.name, ItemKind::SubWeapon, d.sub_weapon_number, d.count, d.flag))
            .collect();

        let chest_data = script.chests();
        check_count(
            "chests",
            chest_data.len(),
            supplements.chests.len() + NIGHT_SURFACE_CHEST_COUNT,
        )?;
        let chests = supplements
            .chests
            .iter()
            .zip(&chest_data)
            .map(|(s, d)| {
                if d.chest_item_number < ROM_CHEST_OFFSET {
                    Item::new(&s.name, ItemKind::Equipment, d.chest_item_number, 1, d.flag)
                } else {
                    let number = d.chest_item_number - ROM_CHEST_OFFSET;
                    Item::new(&s.name, ItemKind::Rom, number, 1, d.flag)
                }
            })
            .collect();

        let seal_data = script.seals();
        check_count(
            "seals",
            seal_data.len(),
            supplements.seals.len() + TRUE_SHRINE_OF_THE_MOTHER_SEAL_COUNT + NIGHT_SURFACE_SEAL_COUNT,
        )?;
        let seals = supplements
            .seals
            .iter()
            .zip(&seal_data)
            .map(|(s, d)| Item::new(&s.name, ItemKind::Seal, d.seal_number, 1, d.flag))
            .collect();

        let shop_data = script.shops()?;
        check_count(
            "shops",
            shop_data.len(),
            supplements.shops.len() + WARE_NO_MISE_COUNT,
        )?;
        let shops = supplements
            .shops
            .iter()
            .zip(&shop_data)
            .map(|(s, d)| {
                let names: Vec<&str> = s.names.split(',').map(str::trim).collect();
                let [a, b, c] = names.as_slice() else {
                    return Err(RandomizerError::Assertion(format!(
                        "shop \"{}\" must name 3 items",
                        s.names
                    )));
                };
                Ok((
                    d.talk_number,
                    [
                        shop_item(a, &d.items[0])?,
                        shop_item(b, &d.items[1])?,
                        shop_item(c, &d.items[2])?,
                    ],
                ))
            })
            .collect::<Result<_>>()?;

        Ok(AllItems {
            main_weapons,
            sub_weapons,
            chests,
            seals,
            shops,
        })
    }

    fn enumerate(&self) -> Vec<&Item> {
        self.main_weapons
            .iter()
            .chain(&self.sub_weapons)
            .chain(&self.chests)
            .chain(&self.seals)
            .chain(self.shops.iter().flat_map(|(_, items)| items))
            .collect()
    }
}

fn resolve_name(name: &str, pool: &[&Item]) -> Item {
    if let Some(item) = pool.iter().find(|x| &*x.name == name) {
        return (*item).clone();
    }
    if let Some(count) = name
        .strip_prefix(SACRED_ORB_PREFIX)
        .and_then(|x| x.parse::<i32>().ok())
    {
        return Item::sacred_orb_threshold(count);
    }
    // Kept under its own name so that validation reports it.
    Item::new(name, ItemKind::Equipment, -1, 1, -1)
}

fn to_requirement_items(groups: Option<RequirementGroups>, pool: &[&Item]) -> Option<Vec<Vec<Item>>> {
    groups.map(|groups| {
        groups
            .iter()
            .map(|group| group.iter().map(|name| resolve_name(name, pool)).collect())
            .collect()
    })
}

fn warn_missing_requirements(supplements: &Supplements, pool: &[&Item]) {
    let missing: BTreeSet<&str> = supplements
        .main_weapons
        .iter()
        .chain(&supplements.sub_weapons)
        .chain(&supplements.chests)
        .chain(&supplements.seals)
        .map(|x| &x.requirements)
        .chain(supplements.shops.iter().map(|x| &x.requirements))
        .flatten()
        .flat_map(|group| group.split(','))
        .map(str::trim)
        .filter(|name| !name.starts_with(SACRED_ORB_PREFIX))
        .filter(|name| pool.iter().all(|x| &*x.name != *name))
        .collect();
    for name in missing {
        warn!("missing item: {name}");
    }
}

/// Pairs every supplement entry with the placement the script holds at the same index.
pub fn create_source(script: &Script, supplements: &Supplements) -> Result<Storage> {
    let supplements = expand_events(supplements)?;
    let all_items = AllItems::new(script, &supplements)?;
    let pool = all_items.enumerate();
    warn_missing_requirements(&supplements, &pool);

    let item_spots = |kind: SpotKind, items: &[Item], list: &[SpotSupplement]| {
        items
            .iter()
            .zip(list)
            .map(|(item, s)| ItemSpot {
                spot: Arc::new(Spot::new(
                    kind,
                    to_requirement_items(parse_requirements(&s.requirements), &pool),
                )),
                item: item.clone(),
            })
            .collect::<Vec<_>>()
    };
    let main_weapons = item_spots(SpotKind::WeaponShutter, &all_items.main_weapons, &supplements.main_weapons);
    let sub_weapons = item_spots(SpotKind::WeaponShutter, &all_items.sub_weapons, &supplements.sub_weapons);
    let chests = item_spots(SpotKind::Chest, &all_items.chests, &supplements.chests);
    let seals = item_spots(SpotKind::SealChest, &all_items.seals, &supplements.seals);
    let shops: Vec<ShopSpot> = all_items
        .shops
        .iter()
        .zip(&supplements.shops)
        .map(|((talk_number, items), s)| ShopSpot {
            spot: Arc::new(Spot::new(
                SpotKind::Shop {
                    talk_number: *talk_number,
                },
                to_requirement_items(parse_requirements(&s.requirements), &pool),
            )),
            items: items.clone(),
        })
        .collect();

    let all_requirement_names: BTreeSet<String> = main_weapons
        .iter()
        .chain(&sub_weapons)
        .chain(&chests)
        .chain(&seals)
        .map(|x| &x.spot)
        .chain(shops.iter().map(|x| &x.spot))
        .filter_map(|spot| spot.requirement_items.as_ref())
        .flatten()
        .flatten()
        .map(|item| item.name.to_string())
        .collect();

    Storage::new(
        all_requirement_names.into_iter().collect::<Vec<_>>().into(),
        main_weapons,
        sub_weapons,
        chests,
        seals,
        shops,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::SACRED_ORB;
    use crate::script::{Field, Map, Object, World};
    use crate::shop_items::{self, NO_FLAG};
    use crate::supplements::ShopSupplement;

    fn obj(number: i32, op1: i32, op2: i32, op3: i32, op4: i32) -> Object {
        Object::new(number, 0, 0, op1, op2, op3, op4, vec![])
    }

    fn spot(name: &str, requirements: &[&str]) -> SpotSupplement {
        SpotSupplement {
            name: name.to_owned(),
            requirements: requirements.iter().map(|x| x.to_string()).collect(),
        }
    }

    fn script() -> Script {
        let shop = |kind: u8, number: i32, flag: i32| ShopItemData {
            kind,
            number,
            price: 10,
            count: 1,
            flag,
        };
        let talks = vec![
            shop_items::stringify(&[shop(0, 1, 700), shop(1, 2, 701), shop(2, 3, 702)]).unwrap(),
            shop_items::stringify(&[shop(0, 1, NO_FLAG); 3]).unwrap(),
        ];
        let objects = vec![
            obj(77, 0, 100, -1, -1),
            obj(13, 2, 1, 101, -1),
            obj(13, 3, 1, 102, -1),
            obj(1, 400, 10, 103, -1),
            obj(1, 400, 102, 104, -1),
            obj(1, 400, 11, 105, -1),
            obj(1, 400, 12, 106, -1),
            obj(1, 400, 13, 107, -1),
            obj(71, 0, 108, -1, -1),
            obj(71, 1, 109, -1, -1),
            obj(71, 2, 110, -1, -1),
            obj(14, 0, -1, -1, 0),
            obj(14, 0, -1, -1, 1),
        ];
        Script::from_parts(
            talks,
            vec![World {
                value: 0,
                fields: vec![Field {
                    attrs: vec![0, 0, 0, 0, 0],
                    children: vec![],
                    objects: vec![],
                    maps: vec![Map {
                        attrs: vec![0, 0, 0],
                        children: vec![],
                        objects,
                    }],
                }],
            }],
        )
    }

    fn supplements() -> Supplements {
        Supplements {
            main_weapons: vec![spot("whip", &[])],
            sub_weapons: vec![spot("spear", &["whip"])],
            chests: vec![spot("ring", &["sacredOrb:2, whip", "unknownThing"]), spot("reader", &[])],
            seals: vec![spot("originSeal", &["event:door"])],
            shops: vec![ShopSupplement {
                names: "shuriken, boots, game".to_owned(),
                requirements: vec![],
            }],
            events: vec![spot("event:door", &["spear, ring"])],
        }
    }

    #[test]
    fn pairs_supplements_with_script_data() {
        let storage = create_source(&script(), &supplements()).unwrap();
        assert_eq!(storage.main_weapon_shutters()[0].item, Item::new("whip", ItemKind::MainWeapon, 0, 1, 100));
        assert_eq!(storage.sub_weapon_shutters()[0].item, Item::new("spear", ItemKind::SubWeapon, 2, 1, 101));
        assert_eq!(storage.chests()[0].item, Item::new("ring", ItemKind::Equipment, 10, 1, 103));
        assert_eq!(storage.chests()[1].item, Item::new("reader", ItemKind::Rom, 2, 1, 104));
        assert_eq!(storage.seal_chests()[0].item, Item::new("originSeal", ItemKind::Seal, 0, 1, 108));
        let shop = &storage.shops()[0];
        assert_eq!(shop.spot.talk_number(), Some(0));
        assert_eq!(shop.items[2], Item::new("game", ItemKind::Rom, 3, 1, 702));
    }

    #[test]
    fn resolves_requirements_against_item_pool() {
        let storage = create_source(&script(), &supplements()).unwrap();
        let groups = storage.chests()[0].spot.requirement_items.as_ref().unwrap();
        assert_eq!(groups[0][0], Item::sacred_orb_threshold(2));
        assert_eq!(&*groups[0][1].name, "whip");
        assert_eq!(groups[1][0].number, -1);
        let seal_groups = storage.seal_chests()[0].spot.requirement_items.as_ref().unwrap();
        let names: Vec<&str> = seal_groups[0].iter().map(|x| &*x.name).collect();
        assert_eq!(names, vec!["spear", "ring"]);
        assert!(storage.chests()[1].spot.requirement_items.is_none());
        assert_eq!(
            &storage.all_requirement_names()[..],
            &[
                "ring".to_owned(),
                SACRED_ORB.to_owned(),
                "spear".to_owned(),
                "unknownThing".to_owned(),
                "whip".to_owned(),
            ]
        );
    }

    #[test]
    fn rejects_count_mismatch() {
        let mut supplements = supplements();
        supplements.chests.pop();
        assert!(matches!(
            create_source(&script(), &supplements),
            Err(RandomizerError::Assertion(_))
        ));
    }

    #[test]
    fn shop_needs_three_names() {
        let mut supplements = supplements();
        supplements.shops[0].names = "a, b".to_owned();
        assert!(create_source(&script(), &supplements).is_err());
    }
}
