use crate::dataset::{Item, ItemSpot, Storage};

fn push_section(log: &mut String, title: &str, source: &[ItemSpot], shuffled: &[ItemSpot]) {
    log.push_str(&format!("{title}:\n"));
    for (i, (before, after)) in source.iter().zip(shuffled).enumerate() {
        log.push_str(&format!(
            "  {title} {i} ({}) -> {}\n",
            before.item.name, after.item
        ));
    }
}

fn names(items: &[Item; 3]) -> String {
    items
        .iter()
        .map(|x| x.name.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn spoiler_log(seed: &str, source: &Storage, shuffled: &Storage) -> String {
    let mut log = format!("La-Mulana Randomizer seed: {seed}\n");
    push_section(
        &mut log,
        "main weapon",
        source.main_weapon_shutters(),
        shuffled.main_weapon_shutters(),
    );
    push_section(
        &mut log,
        "sub weapon",
        source.sub_weapon_shutters(),
        shuffled.sub_weapon_shutters(),
    );
    push_section(&mut log, "chest", source.chests(), shuffled.chests());
    push_section(&mut log, "seal", source.seal_chests(), shuffled.seal_chests());
    log.push_str("shop:\n");
    for (before, after) in source.shops().iter().zip(shuffled.shops()) {
        let talk = before
            .spot
            .talk_number()
            .map_or_else(|| "?".to_owned(), |x| x.to_string());
        log.push_str(&format!(
            "  shop talk {talk} ({}) -> {}\n",
            names(&before.items),
            after
                .items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    log
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dataset::{ItemKind, ShopSpot, Spot, SpotKind};

    fn storage(chest: &str, shop: [&str; 3]) -> Storage {
        let spot = |name: &str| ItemSpot {
            spot: Arc::new(Spot::new(SpotKind::Chest, None)),
            item: Item::new(name, ItemKind::Equipment, 1, 1, 10),
        };
        let item = |name: &str, flag| Item::new(name, ItemKind::Rom, 1, 1, flag);
        Storage::new(
            Arc::from(Vec::<String>::new()),
            vec![],
            vec![],
            vec![spot(chest)],
            vec![],
            vec![ShopSpot {
                spot: Arc::new(Spot::new(SpotKind::Shop { talk_number: 252 }, None)),
                items: [item(shop[0], 1), item(shop[1], 2), item(shop[2], 3)],
            }],
        )
        .unwrap()
    }

    #[test]
    fn one_line_per_placement() {
        let source = storage("feather", ["a", "b", "c"]);
        let shuffled = storage("grappleClaw", ["c", "a", "b"]);
        let log = spoiler_log("abc", &source, &shuffled);
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines[0], "La-Mulana Randomizer seed: abc");
        assert!(log.contains("  chest 0 (feather) -> grappleClaw (equipment:1, flag 10)\n"));
        let shop_line = lines.iter().find(|x| x.starts_with("  shop talk 252")).unwrap();
        assert!(shop_line.starts_with("  shop talk 252 (a, b, c) -> c (rom:1"));
        assert_eq!(lines.len(), 8);
    }
}
