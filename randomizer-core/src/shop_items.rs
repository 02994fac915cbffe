use crate::codec::{self, CodecError};

/// Flag value meaning "this shop item sets no flag" (254 * 256 + 255).
pub const NO_FLAG: i32 = 65279;

// `kind` is 0 for sub weapons, 1 for equipment and 2 for ROMs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopItemData {
    pub kind: u8,
    pub number: i32,
    pub price: i32,
    pub count: i32,
    pub flag: i32,
}

/// Every byte except the low halves of price and flag is stored plus one.
pub fn parse(text: &str) -> Result<[ShopItemData; 3], CodecError> {
    let data = codec::text_to_shop_item_data(text)?;
    let item = |i: usize| {
        let d = &data[i * 7..i * 7 + 7];
        let b = |j: usize| i32::from(d[j]);
        ShopItemData {
            kind: d[0].wrapping_sub(1),
            number: b(1) - 1,
            price: ((b(2) - 1) << 8) + b(3),
            count: b(4) - 1,
            flag: ((b(5) - 1) << 8) + b(6),
        }
    };
    Ok([item(0), item(1), item(2)])
}

pub fn stringify(items: &[ShopItemData; 3]) -> Result<String, CodecError> {
    let data: Vec<u8> = items
        .iter()
        .flat_map(|x| {
            [
                x.kind.wrapping_add(1),
                (x.number + 1) as u8,
                ((x.price >> 8) + 1) as u8,
                (x.price % 256) as u8,
                (x.count + 1) as u8,
                ((x.flag >> 8) + 1) as u8,
                (x.flag % 256) as u8,
            ]
        })
        .collect();
    codec::shop_item_data_to_text(&data)
}
