use std::collections::HashMap;
use std::sync::OnceLock;

use thiserror::Error;

const KEY: u8 = 0b0110_0001;

pub const SHOP_ITEM_DATA_LEN: usize = 7 * 3;

const CODE_ROWS: [&str; 16] = [
    "０１２３４５６７８９\nＢＣＤＥＦ",
    "ＳｄＯ新⑩倍母天道書者闇死地古文",
    " !\"#$%&'()*+,-./",
    "0123456789:;<=>?",
    "@ABCDEFGHIJKLMNO",
    "PQRSTUVWXYZ[\\]^_",
    "`abcdefghijklmno",
    "pqrstuvwxyz{|}~代",
    "形勇気年杯体をぁぃぅぇぉゃゅょっ",
    "真あいうえおかきくけこさしすせそ",
    "実｡｢｣､･ｦｧｨｩｪｫｬｭｮｯ",
    "ｰｱｲｳｴｵｶｷｸｹｺｻｼｽｾｿ",
    "ﾀﾁﾂﾃﾄﾅﾆﾇﾈﾉﾊﾋﾌﾍﾎﾏ",
    "ﾐﾑﾒﾓﾔﾕﾖﾗﾘﾙﾚﾛﾜﾝﾞﾟ",
    "たちつてとなにぬねのはひふへほま",
    "みむめもやゆよらりるれろわん我▼",
];

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("character {ch:?} at offset {offset} has no code and no single-byte Shift_JIS form")]
    UnmappableChar { offset: usize, ch: char },

    #[error("byte 0x{byte:02X} at offset {offset} has no character")]
    UnmappableByte { offset: usize, byte: u8 },

    #[error("shop item data must be {expected} bytes, got {got}")]
    ShopDataLength { expected: usize, got: usize },
}

struct CodeTable {
    code_to_char: Vec<char>,
    char_to_code: HashMap<char, u8>,
}

fn table() -> &'static CodeTable {
    static TABLE: OnceLock<CodeTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let code_to_char: Vec<char> = CODE_ROWS.iter().flat_map(|row| row.chars()).collect();
        let char_to_code = code_to_char
            .iter()
            .enumerate()
            .map(|(code, &ch)| (ch, code as u8))
            .collect();
        CodeTable {
            code_to_char,
            char_to_code,
        }
    })
}

fn code_to_char(offset: usize, code: u8) -> Result<char, CodecError> {
    if let Some(&ch) = table().code_to_char.get(code as usize) {
        return Ok(ch);
    }
    // Codes outside the table are read as legacy single-byte Shift_JIS.
    let bytes = [code];
    let (text, had_errors) = encoding_rs::SHIFT_JIS.decode_without_bom_handling(&bytes);
    let mut chars = text.chars();
    match (chars.next(), chars.next(), had_errors) {
        (Some(ch), None, false) => Ok(ch),
        _ => Err(CodecError::UnmappableByte { offset, byte: code }),
    }
}

fn char_to_code(offset: usize, ch: char) -> Result<u8, CodecError> {
    if let Some(&code) = table().char_to_code.get(&ch) {
        return Ok(code);
    }
    let mut buf = [0u8; 4];
    let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(ch.encode_utf8(&mut buf));
    match (&*bytes, had_errors) {
        ([code], false) => Ok(*code),
        _ => Err(CodecError::UnmappableChar { offset, ch }),
    }
}

pub fn decode(bytes: &[u8]) -> Result<String, CodecError> {
    bytes
        .iter()
        .enumerate()
        .map(|(offset, &b)| code_to_char(offset, b ^ KEY))
        .collect()
}

pub fn encode(text: &str) -> Result<Vec<u8>, CodecError> {
    text.chars()
        .enumerate()
        .map(|(offset, ch)| char_to_code(offset, ch).map(|code| code ^ KEY))
        .collect()
}

/// Maps the text of a shop talk to its raw (unmasked) record bytes.
pub fn text_to_shop_item_data(text: &str) -> Result<Vec<u8>, CodecError> {
    let data = text
        .chars()
        .enumerate()
        .map(|(offset, ch)| char_to_code(offset, ch))
        .collect::<Result<Vec<_>, _>>()?;
    if data.len() != SHOP_ITEM_DATA_LEN {
        return Err(CodecError::ShopDataLength {
            expected: SHOP_ITEM_DATA_LEN,
            got: data.len(),
        });
    }
    Ok(data)
}

pub fn shop_item_data_to_text(data: &[u8]) -> Result<String, CodecError> {
    if data.len() != SHOP_ITEM_DATA_LEN {
        return Err(CodecError::ShopDataLength {
            expected: SHOP_ITEM_DATA_LEN,
            got: data.len(),
        });
    }
    data.iter()
        .enumerate()
        .map(|(offset, &code)| code_to_char(offset, code))
        .collect()
}
