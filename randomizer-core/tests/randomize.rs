use lamulana_randomizer_core::dataset::Storage;
use lamulana_randomizer_core::randomizer::{assert_unique, randomize_storage, seed_rng};
use lamulana_randomizer_core::script::Script;
use lamulana_randomizer_core::shop_items::{self, ShopItemData};
use lamulana_randomizer_core::validate::validate;
use lamulana_randomizer_core::{
    create_source::create_source, randomize_items, randomize_script, RandomizerError,
    RandomizerSettings, Supplements,
};

fn shop_talk(items: [(u8, i32, i32); 3]) -> String {
    let items = items.map(|(kind, number, flag)| ShopItemData {
        kind,
        number,
        price: 30,
        count: 1,
        flag,
    });
    shop_items::stringify(&items).unwrap()
}

fn object(number: i32, ops: [i32; 4]) -> String {
    format!(
        "<OBJECT {number},1024,2048,{},{},{},{}>\n</OBJECT>\n",
        ops[0], ops[1], ops[2], ops[3]
    )
}

fn shutter(flag: i32) -> String {
    object(20, [flag, -1, -1, -1])
}

fn script_text() -> String {
    let talks = [
        shop_talk([(1, 20, 720), (2, 5, 721), (1, 21, 722)]),
        shop_talk([(2, 6, 723), (1, 22, 724), (2, 7, 725)]),
        shop_talk([(1, 23, 726), (1, 24, 727), (1, 25, 728)]),
    ];
    let objects = [
        // main weapons: knife, axe
        object(77, [3, 701, -1, -1]),
        shutter(601),
        object(77, [5, 702, -1, -1]),
        shutter(602),
        // sub weapons: shuriken, spear, then the night surface one
        object(13, [0, 0, 703, -1]),
        shutter(603),
        object(13, [2, 0, 704, -1]),
        shutter(604),
        object(13, [4, 0, 705, -1]),
        // chests: sacred orb, feather, grapple claw, glyph reader, then three on the night surface
        object(1, [401, 53, 706, -1]),
        object(1, [402, 10, 707, -1]),
        object(1, [403, 11, 708, -1]),
        object(1, [404, 102, 709, -1]),
        object(1, [405, 30, 710, -1]),
        object(1, [406, 31, 711, -1]),
        object(1, [407, 32, 712, -1]),
        // empty chest, never counted
        object(1, [408, -1, -1, -1]),
        // seals, the last two never shuffled
        object(71, [0, 713, -1, -1]),
        object(71, [1, 714, -1, -1]),
        object(71, [2, 715, -1, -1]),
        object(71, [3, 716, -1, -1]),
        // shops, the last one undescribed
        object(14, [0, -1, -1, 0]),
        object(14, [0, -1, -1, 1]),
        object(14, [0, -1, -1, 2]),
        // scenery
        object(3, [-1, -1, -1, -1]),
    ];
    let mut text = String::new();
    for talk in talks {
        text.push_str(&format!("<TALK>\n{talk}</TALK>\n"));
    }
    text.push_str("<WORLD 0>\n<FIELD 0,0,0,0,0>\n<MAP 0,0,1>\n");
    text.push_str(&objects.concat());
    text.push_str("</MAP>\n</FIELD>\n</WORLD>\n");
    text
}

fn supplements() -> Supplements {
    Supplements::from_json(
        r#"{
            "mainWeapons": [
                { "name": "knife" },
                { "name": "axe", "requirements": ["feather"] }
            ],
            "subWeapons": [
                { "name": "shuriken" },
                { "name": "spear", "requirements": ["sacredOrb:1"] }
            ],
            "chests": [
                { "name": "sacredOrb:guidance" },
                { "name": "feather" },
                { "name": "grappleClaw", "requirements": ["knife, shuriken"] },
                { "name": "glyphReader", "requirements": ["event:door"] }
            ],
            "seals": [
                { "name": "originSeal" },
                { "name": "birthSeal", "requirements": ["grappleClaw, originSeal"] }
            ],
            "shops": [
                { "names": "bookOfTheDead, mekuri, lampOfTime" },
                { "names": "guild, ring, bunemon", "requirements": ["glyphReader"] }
            ],
            "events": [
                { "name": "event:door", "requirements": ["axe, spear"] }
            ]
        }"#,
    )
    .unwrap()
}

fn script() -> Script {
    Script::parse(&script_text()).unwrap()
}

fn settings(seed: &str) -> RandomizerSettings {
    RandomizerSettings {
        seed: seed.to_owned(),
        ..RandomizerSettings::default()
    }
}

fn placed_names(storage: &Storage) -> Vec<String> {
    let mut names: Vec<String> = storage
        .all_items()
        .iter()
        .map(|x| x.name.to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn fixture_round_trips() {
    let text = script_text();
    assert_eq!(Script::parse(&text).unwrap().stringify(), text);
}

#[test]
fn same_seed_gives_identical_script() {
    let mut a = script();
    let mut b = script();
    let log_a = randomize_script(&mut a, &settings("abc"), &supplements()).unwrap();
    let log_b = randomize_script(&mut b, &settings("abc"), &supplements()).unwrap();
    assert_eq!(a.stringify(), b.stringify());
    assert_eq!(log_a, log_b);
    assert!(log_a.starts_with("La-Mulana Randomizer seed: abc\n"));
}

#[test]
fn randomized_script_still_parses() {
    let mut script = script();
    randomize_script(&mut script, &settings("parse"), &supplements()).unwrap();
    let text = script.stringify();
    assert_eq!(Script::parse(&text).unwrap().stringify(), text);
}

#[test]
fn accepted_shuffle_is_valid_unique_and_conserving() {
    let source = create_source(&script(), &supplements()).unwrap();
    for seed in ["a", "b", "c", "d", "e"] {
        let shuffled = randomize_storage(&source, &mut seed_rng(seed)).unwrap();
        assert!(validate(&shuffled).unwrap());
        assert_unique(&shuffled).unwrap();
        assert_eq!(shuffled.main_weapon_shutters().len(), 2);
        assert_eq!(shuffled.sub_weapon_shutters().len(), 2);
        assert_eq!(shuffled.chests().len(), 4);
        assert_eq!(shuffled.seal_chests().len(), 2);
        assert_eq!(shuffled.shops().len(), 2);
        assert_eq!(placed_names(&shuffled), placed_names(&source));
    }
}

#[test]
fn shops_only_sell_shop_items() {
    let mut script = script();
    let randomized = randomize_items(&mut script, &supplements(), "shops").unwrap();
    for shop in randomized.shuffled.shops() {
        assert!(shop.items.iter().all(|x| x.can_display_in_shop()));
    }
    let prices: Vec<i32> = script.shops().unwrap()[..2]
        .iter()
        .flat_map(|x| x.items.map(|item| item.price))
        .collect();
    assert_eq!(prices, vec![30; 6]);
}

#[test]
fn undescribed_placements_are_left_alone() {
    let before = script();
    let mut after = script();
    randomize_items(&mut after, &supplements(), "untouched").unwrap();
    assert_eq!(after.talks()[2], before.talks()[2]);
    let seals: Vec<_> = after.seals().iter().map(|x| (x.seal_number, x.flag)).collect();
    assert!(seals.ends_with(&[(2, 715), (3, 716)]));
}

#[test]
fn count_mismatch_is_rejected() {
    let mut supplements = supplements();
    supplements.seals.pop();
    let err = randomize_items(&mut script(), &supplements, "abc").unwrap_err();
    assert!(matches!(err, RandomizerError::Assertion(_)));
}

#[test]
fn tablet_save_needs_the_save_prompt_talk() {
    let mut script = script();
    let settings = RandomizerSettings {
        tablet_save: true,
        ..settings("abc")
    };
    let err = randomize_script(&mut script, &settings, &supplements()).unwrap_err();
    assert!(matches!(err, RandomizerError::Assertion(_)));
}
