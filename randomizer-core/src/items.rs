//! Item number tables as they appear in the script objects and shop records.

pub const MAIN_WEAPON_NAMES: &[&str] = &[
    "whip", "chainWhip", "mace", "knife", "keySword", "axe", "katana",
];

pub const SUB_WEAPON_NAMES: &[&str] = &[
    "shuriken",
    "touken",
    "spear",
    "flareGun",
    "bomb",
    "pistol",
    "weights",
    "ankhJewel",
    "buckler",
    "handScanner",
    "silverShield",
    "angelShield",
    "ammunition",
];

pub const EQUIPMENT_NAMES: &[&str] = &[
    "msx",
    "shellHorn",
    "waterproofCase",
    "heatproofCase",
    "finder",
    "holyGrail",
    "lampOfTime",
    "protectiveClothes",
    "talisman",
    "scriptures",
    "gauntlet",
    "ring",
    "glove",
    "keyOfEternity",
    "twinStatue",
    "bronzeMirror",
    "boots",
    "feather",
    "bracelet",
    "dragonBone",
    "grappleClaw",
    "magatamaJewel",
    "crucifix",
    "bookOfTheDead",
    "perfume",
    "ocarina",
    "anchor",
    "womanStatue",
    "miniDoll",
    "eyeOfTruth",
    "serpentStaff",
    "iceCape",
    "helmet",
    "scalesphere",
    "crystalSkull",
    "djedPillar",
    "planeModel",
    "cogOfTheSoul",
    "pochetteKey",
    "vessel",
    "msx2",
    "diary",
    "mulanaTalisman",
    "lampOfTimeSpecified",
    "maternityStatue",
    "fakeHandScanner",
    "pepper",
    "treasures",
    "medicineOfLifeYellow",
    "medicineOfLifeGreen",
    "medicineOfLifeRed",
    "fakeSilverShield",
    "theTreasuresOfLaMurana",
    "sacredOrb",
    "map",
    "originSeal",
    "birthSeal",
    "lifeSeal",
    "deathSeal",
    "sweetClothing",
];

pub const ROM_NAMES: &[&str] = &[
    "gameMaster",
    "gameMaster2",
    "glyphReader",
    "ruinsRam8k",
    "ruinsRam16k",
    "unreleasedRom",
    "pr3",
    "gr3",
    "athleticLand",
    "antarcticAdventure",
    "monkeyAcademy",
    "timePilot",
    "frogger",
    "superCobra",
    "videoHustler",
    "mahjongDojo",
    "hyperOlympic1",
    "hyperOlympic2",
    "hyperOlympic3",
    "circusCharlier",
    "magicalTree",
    "comicBakery",
    "hyperSports1",
    "hyperSports2",
    "hyperSports3",
    "cabbagePatchKids",
    "hyperRally",
    "konamiTennis",
    "skyJaguar",
    "konamiPinball",
    "konamiGolf",
    "konamiBaseball",
    "yieArKungFu",
    "kingsValley",
    "mopiRanger",
    "pippols",
    "roadFighter",
    "konamiPingPong",
    "konamiSoccer",
    "goonies",
    "konamiBoxing",
    "yieArKungFu2",
    "knightmare",
    "twinbee",
    "shinSynthesizer",
    "gradius",
    "penguinAdventure",
    "castlevania",
    "kingKong2",
    "qbert",
    "firebird",
    "ganbareGoemon",
    "mazeOfGalious",
    "metalGear",
    "gradius2",
    "f1Spirit",
    "usas",
    "shalom",
    "breakShot",
    "pennantRace",
    "salamander",
    "parodius",
    "sealOfElGiza",
    "contra",
    "heavenAndEarth",
    "nemesis3",
    "mahjongWizard",
    "pennantRace2",
    "metalGear2",
    "spaceManbow",
    "quarth",
    "kingsValleyDisk",
    "divinerSensation",
    "snatcher",
    "f1Spirit3d",
    "gameCollection1",
    "gameCollection2",
    "gameCollection3",
    "gameCollection4",
    "gameCollectionEX",
    "sdSnatcher",
    "badlands",
    "gradius2Beta",
    "a1Spirit",
];

pub mod sub_weapon {
    pub const PISTOL: i32 = 5;
    pub const ANKH_JEWEL: i32 = 7;
    pub const BUCKLER: i32 = 8;
    pub const HAND_SCANNER: i32 = 9;
    pub const SILVER_SHIELD: i32 = 10;
    pub const ANGEL_SHIELD: i32 = 11;
    pub const AMMUNITION: i32 = 12;

    pub const SELLABLE_WITHOUT_AMMO: [i32; 5] =
        [PISTOL, BUCKLER, HAND_SCANNER, SILVER_SHIELD, ANGEL_SHIELD];
}

pub mod equipment {
    pub const HOLY_GRAIL: i32 = 5;
    pub const SACRED_ORB: i32 = 53;
    pub const MAP: i32 = 54;
    pub const SWEET_CLOTHING: i32 = 59;
}

pub mod rom {
    pub const GAME_MASTER: i32 = 0;
    pub const GLYPH_READER: i32 = 2;
}

/// Chest objects store ROMs offset by this amount in their item number.
pub const ROM_CHEST_OFFSET: i32 = 100;

fn lookup(table: &[&'static str], number: i32) -> Option<&'static str> {
    usize::try_from(number).ok().and_then(|i| table.get(i).copied())
}

fn position(table: &[&str], name: &str) -> Option<i32> {
    table.iter().position(|x| *x == name).map(|i| i as i32)
}

pub fn main_weapon_name(number: i32) -> Option<&'static str> {
    lookup(MAIN_WEAPON_NAMES, number)
}

pub fn sub_weapon_name(number: i32) -> Option<&'static str> {
    lookup(SUB_WEAPON_NAMES, number)
}

pub fn equipment_name(number: i32) -> Option<&'static str> {
    lookup(EQUIPMENT_NAMES, number)
}

pub fn rom_name(number: i32) -> Option<&'static str> {
    lookup(ROM_NAMES, number)
}

pub fn sub_weapon_number(name: &str) -> Option<i32> {
    position(SUB_WEAPON_NAMES, name)
}

pub fn equipment_number(name: &str) -> Option<i32> {
    position(EQUIPMENT_NAMES, name)
}

pub fn rom_number(name: &str) -> Option<i32> {
    position(ROM_NAMES, name)
}
