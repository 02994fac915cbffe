use std::collections::HashSet;

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha3::{Digest, Sha3_256};

use crate::create_source::create_source;
use crate::dataset::{Item, ItemSpot, ShopSpot, Storage};
use crate::script::Script;
use crate::shop_items::NO_FLAG;
use crate::shuffle_utils::{select_random, shuffle_simply};
use crate::supplements::Supplements;
use crate::validate::validate;
use crate::{RandomizerError, Result};

pub const MAX_SHUFFLE_ATTEMPTS: usize = 10000;

const STACKABLE_ITEM_NAMES: [&str; 9] = [
    "weights",
    "shurikenAmmo",
    "toukenAmmo",
    "spearAmmo",
    "flareGunAmmo",
    "bombAmmo",
    "ammunition",
    "shellHorn",
    "finder",
];

/// Flags shared by several placements in the base game.
const SHARED_FLAGS: [i32; 3] = [NO_FLAG, 753, 754];

pub fn seed_rng(seed: &str) -> ChaCha20Rng {
    let digest = Sha3_256::digest(seed.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    ChaCha20Rng::from_seed(bytes)
}

#[derive(Clone, Debug)]
pub struct Randomized {
    pub source: Storage,
    pub shuffled: Storage,
}

pub fn randomize_items(
    script: &mut Script,
    supplements: &Supplements,
    seed: &str,
) -> Result<Randomized> {
    let source = create_source(script, supplements)?;
    if !validate(&source)? {
        return Err(RandomizerError::Assertion(
            "the unshuffled placement can't be completed".to_owned(),
        ));
    }
    assert_unique(&source)?;
    let mut rng = seed_rng(seed);
    let shuffled = randomize_storage(&source, &mut rng)?;
    assert_unique(&shuffled)?;
    script.replace_items(&shuffled)?;
    script.replace_shops(shuffled.shops())?;
    Ok(Randomized { source, shuffled })
}

pub fn randomize_storage<R: Rng + ?Sized>(source: &Storage, rng: &mut R) -> Result<Storage> {
    for attempt in 1..=MAX_SHUFFLE_ATTEMPTS {
        let shuffled = shuffle(source, rng)?;
        if validate(&shuffled)? {
            info!("shuffle was tried {attempt} times");
            return Ok(shuffled);
        }
        debug!("shuffle attempt {attempt} can't be completed");
    }
    Err(RandomizerError::ShuffleExhausted {
        attempts: MAX_SHUFFLE_ATTEMPTS,
    })
}

struct Distribution {
    main_weapons: Vec<Item>,
    sub_weapons: Vec<Item>,
    chests: Vec<Item>,
    seals: Vec<Item>,
    shops: Vec<[Item; 3]>,
}

fn distribute_items<R: Rng + ?Sized>(source: &Storage, rng: &mut R) -> Result<Distribution> {
    let capacity = [
        source.main_weapon_shutters().len(),
        source.sub_weapon_shutters().len(),
        source.chests().len(),
        source.seal_chests().len(),
        source.shops().len() * 3,
    ];
    let mut lists: [Vec<Item>; 5] = Default::default();
    for item in source.all_items() {
        let mut weights = [0; 5];
        for (i, weight) in weights.iter_mut().enumerate() {
            *weight = capacity[i] - lists[i].len();
        }
        if !item.can_display_in_shop() {
            weights[4] = 0;
        }
        let idx = select_random(&weights, rng)?;
        lists[idx].push(item.clone());
    }
    let [main_weapons, sub_weapons, chests, seals, shop_items] = lists;
    let shops = shop_items
        .chunks_exact(3)
        .map(|x| [x[0].clone(), x[1].clone(), x[2].clone()])
        .collect();
    Ok(Distribution {
        main_weapons,
        sub_weapons,
        chests,
        seals,
        shops,
    })
}

fn check_len(what: &str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(RandomizerError::Assertion(format!(
            "distributed {got} items to {what}, expected {expected}"
        )));
    }
    Ok(())
}

fn zip_spots(spots: &[ItemSpot], items: Vec<Item>) -> Vec<ItemSpot> {
    spots
        .iter()
        .zip(items)
        .map(|(x, item)| ItemSpot {
            spot: x.spot.clone(),
            item,
        })
        .collect()
}

fn shuffle<R: Rng + ?Sized>(source: &Storage, rng: &mut R) -> Result<Storage> {
    let mut d = distribute_items(source, rng)?;
    check_len("main weapons", d.main_weapons.len(), source.main_weapon_shutters().len())?;
    check_len("sub weapons", d.sub_weapons.len(), source.sub_weapon_shutters().len())?;
    check_len("chests", d.chests.len(), source.chests().len())?;
    check_len("seals", d.seals.len(), source.seal_chests().len())?;
    check_len("shops", d.shops.len(), source.shops().len())?;

    shuffle_simply(&mut d.main_weapons, rng);
    shuffle_simply(&mut d.sub_weapons, rng);
    shuffle_simply(&mut d.chests, rng);
    shuffle_simply(&mut d.seals, rng);
    shuffle_simply(&mut d.shops, rng);

    let shops = source
        .shops()
        .iter()
        .zip(d.shops)
        .map(|(x, items)| ShopSpot {
            spot: x.spot.clone(),
            items,
        })
        .collect();
    Storage::new(
        source.all_requirement_names().clone(),
        zip_spots(source.main_weapon_shutters(), d.main_weapons),
        zip_spots(source.sub_weapon_shutters(), d.sub_weapons),
        zip_spots(source.chests(), d.chests),
        zip_spots(source.seal_chests(), d.seals),
        shops,
    )
}

/// No two placements may hand out the same item or set the same flag, stackables aside.
pub fn assert_unique(storage: &Storage) -> Result<()> {
    let mut names = HashSet::new();
    let mut flags = HashSet::new();
    for (_, item) in storage.placements() {
        if !STACKABLE_ITEM_NAMES.contains(&&*item.name)
            && !names.insert(format!("{}:{}", item.kind.as_str(), item.name))
        {
            return Err(RandomizerError::Assertion(format!("duplicate item: {item}")));
        }
        if !SHARED_FLAGS.contains(&item.flag) && !flags.insert(item.flag) {
            return Err(RandomizerError::Assertion(format!(
                "duplicate flag {} at {item}",
                item.flag
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dataset::{ItemKind, Spot, SpotKind};

    fn spot(kind: SpotKind, name: &str, flag: i32) -> ItemSpot {
        ItemSpot {
            spot: Arc::new(Spot::new(kind, None)),
            item: Item::new(name, ItemKind::Equipment, 1, 1, flag),
        }
    }

    fn shop(talk_number: usize, names: [&str; 3], flags: [i32; 3]) -> ShopSpot {
        ShopSpot {
            spot: Arc::new(Spot::new(SpotKind::Shop { talk_number }, None)),
            items: [
                Item::new(names[0], ItemKind::Rom, 1, 1, flags[0]),
                Item::new(names[1], ItemKind::Rom, 2, 1, flags[1]),
                Item::new(names[2], ItemKind::Rom, 3, 1, flags[2]),
            ],
        }
    }

    fn source() -> Storage {
        Storage::new(
            Arc::from(vec!["sacredOrb".to_owned()]),
            vec![spot(SpotKind::WeaponShutter, "m", 1)],
            vec![spot(SpotKind::WeaponShutter, "s", 2)],
            vec![
                spot(SpotKind::Chest, "a", 3),
                spot(SpotKind::Chest, "b", 256),
                spot(SpotKind::Chest, "c", 5),
            ],
            vec![spot(SpotKind::SealChest, "seal", 6)],
            vec![shop(0, ["x", "y", "z"], [7, 8, 9])],
        )
        .unwrap()
    }

    #[test]
    fn same_seed_same_shuffle() {
        let a = randomize_storage(&source(), &mut seed_rng("abc")).unwrap();
        let b = randomize_storage(&source(), &mut seed_rng("abc")).unwrap();
        let names = |s: &Storage| -> Vec<String> {
            s.placements().map(|(_, x)| x.name.to_string()).collect()
        };
        assert_eq!(names(&a), names(&b));
    }

    #[test]
    fn shuffle_conserves_categories() {
        let source = source();
        let mut rng = seed_rng("conserve");
        for _ in 0..20 {
            let shuffled = shuffle(&source, &mut rng).unwrap();
            assert_eq!(shuffled.main_weapon_shutters().len(), 1);
            assert_eq!(shuffled.sub_weapon_shutters().len(), 1);
            assert_eq!(shuffled.chests().len(), 3);
            assert_eq!(shuffled.seal_chests().len(), 1);
            assert_eq!(shuffled.shops().len(), 1);
            let mut before: Vec<String> =
                source.all_items().iter().map(|x| x.name.to_string()).collect();
            let mut after: Vec<String> =
                shuffled.all_items().iter().map(|x| x.name.to_string()).collect();
            before.sort();
            after.sort();
            assert_eq!(before, after);
        }
    }

    #[test]
    fn unsellable_item_never_lands_in_shop() {
        let source = source();
        let mut rng = seed_rng("shop");
        for _ in 0..200 {
            let shuffled = shuffle(&source, &mut rng).unwrap();
            assert!(shuffled.shops()[0].items.iter().all(|x| &*x.name != "b"));
        }
    }

    #[test]
    fn unsellable_item_with_no_room_left_fails_instead_of_going_to_shop() {
        // two unsellable items and a single chest to hold them
        let source = Storage::new(
            Arc::from(vec!["sacredOrb".to_owned()]),
            vec![],
            vec![],
            vec![spot(SpotKind::Chest, "a", 3)],
            vec![],
            vec![shop(0, ["x", "y", "z"], [256, 512, 9])],
        )
        .unwrap();
        let mut rng = seed_rng("full");
        for _ in 0..50 {
            let err = shuffle(&source, &mut rng).unwrap_err();
            match err {
                RandomizerError::Assertion(msg) => {
                    assert!(msg.contains("no category left to draw from"), "{msg}")
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn uncompletable_source_exhausts_attempts() {
        let locked = || {
            Arc::new(Spot::new(
                SpotKind::Chest,
                Some(vec![vec![Item::new("x", ItemKind::Equipment, 1, 1, 0)]]),
            ))
        };
        let source = Storage::new(
            Arc::from(vec!["sacredOrb".to_owned(), "x".to_owned()]),
            vec![],
            vec![],
            vec![
                ItemSpot {
                    spot: locked(),
                    item: Item::new("x", ItemKind::Equipment, 1, 1, 3),
                },
                ItemSpot {
                    spot: locked(),
                    item: Item::new("y", ItemKind::Equipment, 2, 1, 4),
                },
            ],
            vec![],
            vec![],
        )
        .unwrap();
        let err = randomize_storage(&source, &mut seed_rng("locked")).unwrap_err();
        assert!(matches!(
            err,
            RandomizerError::ShuffleExhausted {
                attempts: MAX_SHUFFLE_ATTEMPTS
            }
        ));
    }

    #[test]
    fn spots_keep_their_order() {
        let source = source();
        let shuffled = shuffle(&source, &mut seed_rng("order")).unwrap();
        for (a, b) in source.chests().iter().zip(shuffled.chests()) {
            assert!(Arc::ptr_eq(&a.spot, &b.spot));
        }
    }

    #[test]
    fn duplicates_are_rejected_unless_allowed() {
        let storage = |names: [&str; 3], flags: [i32; 3]| {
            Storage::new(
                Arc::from(Vec::<String>::new()),
                vec![],
                vec![],
                vec![],
                vec![],
                vec![shop(0, names, flags)],
            )
            .unwrap()
        };
        assert!(assert_unique(&storage(["a", "b", "c"], [1, 2, 3])).is_ok());
        assert!(assert_unique(&storage(["a", "a", "c"], [1, 2, 3])).is_err());
        assert!(assert_unique(&storage(["weights", "weights", "c"], [1, 2, 3])).is_ok());
        assert!(assert_unique(&storage(["a", "b", "c"], [1, 1, 3])).is_err());
        assert!(assert_unique(&storage(["a", "b", "c"], [NO_FLAG, NO_FLAG, 754])).is_ok());
    }

    #[test]
    fn seed_rng_depends_on_seed() {
        assert_eq!(seed_rng("a").gen::<u64>(), seed_rng("a").gen::<u64>());
        assert_ne!(seed_rng("a").gen::<u64>(), seed_rng("b").gen::<u64>());
    }
}
