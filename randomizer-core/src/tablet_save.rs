//! Warp-on-save: saving at a region's grail tablet and dying sends the player back there.
//!
//! Each region gets a stop area that raises its warp flag and a batch of flag setters that
//! lower every other warp flag, so at most one warp flag is up at a time. The warp objects
//! on the otherwise unused field 18 pick the destination from that flag.

use crate::items::{rom, ROM_CHEST_OFFSET};
use crate::script::{add_object, object_number, Object, Start, World, ALWAYS_ON_FLAG};
use crate::starting_items::{UNUSED_ONE_TIME_FLAG, UNUSED_SAVE_FLAG};
use crate::{RandomizerError, Result};

use self::flags::*;

pub mod flags {
    pub const DO_WARP: i32 = 7410;
    pub const WARP_GUI: i32 = 7411;
    pub const WARP_SUR: i32 = 7412;
    pub const WARP_MAU: i32 = 7413;
    pub const WARP_SUN: i32 = 7414;
    pub const WARP_SPR: i32 = 7415;
    pub const WARP_INF: i32 = 7416;
    pub const WARP_EXT: i32 = 7417;
    pub const WARP_TLF: i32 = 7418;
    pub const WARP_END: i32 = 7419;
    pub const WARP_MOM: i32 = 7420;
    pub const WARP_CON: i32 = 7421;
    pub const WARP_GRA: i32 = 7422;
    pub const WARP_MOO: i32 = 7423;
    pub const WARP_GOD: i32 = 7424;
    pub const WARP_RUI: i32 = 7425;
    pub const WARP_BIR: i32 = 7426;
    pub const WARP_TLB: i32 = 7427;
    pub const WARP_DIM: i32 = 7428;

    pub const GRAIL_GUI: i32 = 7431;
    pub const GRAIL_MAU: i32 = 7432;
    pub const GRAIL_SUN: i32 = 7433;
    pub const GRAIL_SPR: i32 = 7434;
    pub const GRAIL_INF: i32 = 7435;
    pub const GRAIL_EXT: i32 = 7436;
    pub const GRAIL_TLF: i32 = 7437;
    pub const GRAIL_END: i32 = 7438;
    pub const GRAIL_MOM: i32 = 7439;
    pub const GRAIL_CON: i32 = 7440;
    pub const GRAIL_GRA: i32 = 7441;
    pub const GRAIL_MOO: i32 = 7442;
    pub const GRAIL_GOD: i32 = 7443;
    pub const GRAIL_RUI: i32 = 7444;
    pub const GRAIL_BIR: i32 = 7445;
    pub const GRAIL_TLB: i32 = 7446;
    pub const GRAIL_DIM: i32 = 7447;

    pub const ALL_WARPS: [i32; 18] = [
        WARP_GUI, WARP_SUR, WARP_MAU, WARP_SUN, WARP_SPR, WARP_INF, WARP_EXT, WARP_TLF, WARP_END,
        WARP_MOM, WARP_CON, WARP_GRA, WARP_MOO, WARP_GOD, WARP_RUI, WARP_BIR, WARP_TLB, WARP_DIM,
    ];
}

const SAVE_PROMPT_TALK: usize = 84;
/// Control sequence setting the save flag when the save prompt is shown.
const SAVE_PROMPT_PREFIX: &str = "２５\x4c";

const XELPUD_OBJECT: i32 = 14;
const FLAG_SETTER_OBJECT: i32 = 22;
const FLAG_CLEARER_OBJECT: i32 = 40;
const WARP_OBJECT: i32 = 87;
const STOP_AREA_OBJECT: i32 = 157;

const SURFACE_FIELD: i32 = 1;
const SURFACE_SCREEN: (i32, i32) = (3, 1);
const WARP_ROOM_FIELD: i32 = 18;
const WARP_ROOM_SCREEN: (i32, i32) = (1, 0);

struct Region {
    field: i32,
    screen: (i32, i32),
    tablet: (i32, i32),
    warp_flag: i32,
    grail_flag: i32,
    /// Field, screen x, screen y and position index the warp sends the player to.
    destination: [i32; 4],
}

const fn region(
    field: i32,
    screen: (i32, i32),
    tablet: (i32, i32),
    warp_flag: i32,
    grail_flag: i32,
    destination: [i32; 4],
) -> Region {
    Region {
        field,
        screen,
        tablet,
        warp_flag,
        grail_flag,
        destination,
    }
}

const REGIONS: [Region; 17] = [
    region(0, (2, 1), (12288, 36864), WARP_GUI, GRAIL_GUI, [0, 6, 7, 19]),
    region(2, (0, 2), (14336, 28672), WARP_MAU, GRAIL_MAU, [2, 8, 8, 15]),
    region(3, (2, 0), (55296, 12288), WARP_SUN, GRAIL_SUN, [3, 2, 28, 7]),
    region(4, (1, 3), (12288, 12288), WARP_SPR, GRAIL_SPR, [4, 7, 7, 7]),
    region(5, (2, 3), (28672, 4096), WARP_INF, GRAIL_INF, [5, 14, 15, 3]),
    region(6, (3, 4), (2048, 12288), WARP_EXT, GRAIL_EXT, [6, 19, 2, 7]),
    region(9, (0, 0), (8192, 36864), WARP_TLF, GRAIL_TLF, [9, 0, 5, 19]),
    region(7, (0, 0), (43008, 4096), WARP_END, GRAIL_END, [7, 0, 22, 3]),
    region(8, (1, 4), (40960, 4096), WARP_MOM, GRAIL_MOM, [8, 17, 21, 30]),
    region(11, (0, 1), (26624, 4096), WARP_CON, GRAIL_CON, [11, 4, 14, 3]),
    region(12, (3, 1), (14336, 12288), WARP_GRA, GRAIL_GRA, [12, 7, 8, 7]),
    // moonlight really is field 14 and goddess field 13
    region(14, (0, 1), (20480, 20480), WARP_MOO, GRAIL_MOO, [14, 4, 11, 11]),
    region(13, (0, 4), (28672, 4096), WARP_GOD, GRAIL_GOD, [13, 16, 15, 3]),
    region(15, (0, 1), (28672, 36864), WARP_RUI, GRAIL_RUI, [15, 4, 15, 19]),
    region(16, (3, 0), (57344, 36864), WARP_BIR, GRAIL_BIR, [16, 3, 29, 19]),
    region(10, (3, 0), (49152, 36864), WARP_TLB, GRAIL_TLB, [10, 3, 25, 19]),
    region(17, (2, 2), (16384, 20480), WARP_DIM, GRAIL_DIM, [17, 10, 9, 11]),
];

fn stop_area(pos: (i32, i32), flag: i32) -> Object {
    Object::new(STOP_AREA_OBJECT, pos.0, pos.1, 4, 4, 10000, flag, vec![])
}

// Clears DO_WARP once the game is running so that the warp only fires after a reload.
fn warp_disabler() -> Object {
    Object::new(
        FLAG_CLEARER_OBJECT,
        DO_WARP,
        DO_WARP,
        -1,
        -1,
        -1,
        -1,
        vec![Start {
            number: ALWAYS_ON_FLAG,
            value: true,
        }],
    )
}

fn region_objects(region: &Region) -> Vec<Object> {
    let (x, y) = region.tablet;
    let mut objects = vec![
        Object::new(XELPUD_OBJECT, x + 2048, y + 4096, 200, -1, 185, 0, vec![]),
        stop_area(region.tablet, region.warp_flag),
    ];
    let others: Vec<i32> = std::iter::once(DO_WARP)
        .chain(ALL_WARPS.iter().copied().filter(|&x| x != region.warp_flag))
        .collect();
    objects.extend(others.chunks(5).map(|chunk| {
        let op = |i: usize| chunk.get(i).copied().unwrap_or(-1);
        Object::new(
            FLAG_CLEARER_OBJECT,
            region.warp_flag,
            op(0),
            op(1),
            op(2),
            op(3),
            op(4),
            vec![],
        )
    }));
    objects.push(warp_disabler());
    objects
}

fn surface_objects(easy_mode: bool) -> Vec<Object> {
    let mut objects = vec![
        // warps into the middle of an unused screen
        Object::new(
            WARP_OBJECT,
            26624,
            16384,
            WARP_ROOM_FIELD,
            1,
            15,
            4,
            vec![
                Start {
                    number: DO_WARP,
                    value: true,
                },
                Start {
                    number: WARP_SUR,
                    value: false,
                },
            ],
        ),
        warp_disabler(),
        stop_area((16384, 12288), WARP_SUR),
    ];
    if !easy_mode {
        objects.push(Object::new(
            FLAG_SETTER_OBJECT,
            26624,
            10240,
            2,
            2,
            UNUSED_ONE_TIME_FLAG,
            -1,
            vec![],
        ));
        objects.push(Object::new(
            object_number::CHEST,
            26624,
            14336,
            UNUSED_ONE_TIME_FLAG,
            ROM_CHEST_OFFSET + rom::GAME_MASTER,
            UNUSED_SAVE_FLAG,
            -1,
            vec![
                Start {
                    number: ALWAYS_ON_FLAG,
                    value: true,
                },
                Start {
                    number: UNUSED_SAVE_FLAG,
                    value: false,
                },
            ],
        ));
    }
    objects
}

fn warp_room_objects() -> Vec<Object> {
    // The surface is reached by falling through; this one should never fire.
    std::iter::once(Object::new(WARP_OBJECT, 30720, 16384, 1, 7, 13, 5, vec![]))
        .chain(REGIONS.iter().map(|region| {
            let [field, x, y, pos] = region.destination;
            Object::new(
                WARP_OBJECT,
                30720,
                14336,
                field,
                x,
                y,
                pos,
                vec![Start {
                    number: region.warp_flag,
                    value: true,
                }],
            )
        }))
        .collect()
}

pub fn tablet_save(worlds: &mut [World], easy_mode: bool) {
    for region in &REGIONS {
        let (x, y) = region.screen;
        add_object(worlds, region.field, x, y, &region_objects(region));
    }
    let (x, y) = SURFACE_SCREEN;
    add_object(worlds, SURFACE_FIELD, x, y, &surface_objects(easy_mode));
    let (x, y) = WARP_ROOM_SCREEN;
    add_object(worlds, WARP_ROOM_FIELD, x, y, &warp_room_objects());
}

pub fn prefix_save_prompt(talks: &mut [String]) -> Result<()> {
    let talk = talks.get_mut(SAVE_PROMPT_TALK).ok_or_else(|| {
        RandomizerError::Assertion(format!("talk {SAVE_PROMPT_TALK} not found"))
    })?;
    talk.insert_str(0, SAVE_PROMPT_PREFIX);
    Ok(())
}

pub fn auto_registration(worlds: &mut [World]) {
    for region in &REGIONS {
        let (x, y) = region.screen;
        add_object(worlds, region.field, x, y, &[stop_area(region.tablet, region.grail_flag)]);
    }
}
