use thiserror::Error;

use crate::script::{Child, Field, Map, Object, Start, World};

const TALK_OPEN: &str = "<TALK>\n";
const TALK_CLOSE: &str = "</TALK>\n";

#[derive(Debug, Error)]
pub enum ScriptParseError {
    #[error("TALK opened on line {line} is never closed")]
    UnterminatedTalk { line: usize },

    #[error("unexpected end of text inside {context}")]
    UnexpectedEof { context: &'static str },

    #[error("expected a tag on line {line}, got '{text}'")]
    ExpectedTag { line: usize, text: String },

    #[error("unexpected tag '{tag}' on line {line} inside {context}")]
    UnexpectedTag {
        line: usize,
        tag: String,
        context: &'static str,
    },

    #[error("tag '{tag}' on line {line} has no attributes")]
    MissingAttrs { line: usize, tag: String },

    #[error("wrong attribute count for {tag} on line {line}: expected {expected}, got {got}")]
    WrongAttrCount {
        line: usize,
        tag: String,
        expected: usize,
        got: usize,
    },

    #[error("failed to parse integer '{token}' on line {line}")]
    ParseInt {
        line: usize,
        token: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("START value on line {line} must be 0 or 1, got {value}")]
    BadStartValue { line: usize, value: i32 },

    #[error("re-serialized script differs from the input at byte {offset}")]
    RoundTripMismatch { offset: usize },
}

struct Tag<'a> {
    line: usize,
    name: &'a str,
    attrs: Option<&'a str>,
    closing: bool,
}

impl<'a> Tag<'a> {
    fn parse(line: usize, raw: &'a str) -> Result<Self, ScriptParseError> {
        let inner = raw
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .ok_or_else(|| ScriptParseError::ExpectedTag {
                line,
                text: raw.to_string(),
            })?;
        if let Some(name) = inner.strip_prefix('/') {
            return Ok(Tag {
                line,
                name,
                attrs: None,
                closing: true,
            });
        }
        let (name, attrs) = match inner.split_once(' ') {
            Some((name, attrs)) => (name, Some(attrs)),
            None => (inner, None),
        };
        Ok(Tag {
            line,
            name,
            attrs,
            closing: false,
        })
    }

    fn attrs(&self) -> Result<Vec<i32>, ScriptParseError> {
        let raw = self.attrs.ok_or_else(|| ScriptParseError::MissingAttrs {
            line: self.line,
            tag: self.name.to_string(),
        })?;
        raw.split(',')
            .map(|token| {
                token.parse::<i32>().map_err(|e| ScriptParseError::ParseInt {
                    line: self.line,
                    token: token.to_string(),
                    source: e,
                })
            })
            .collect()
    }

    fn attrs_exact(&self, expected: usize) -> Result<Vec<i32>, ScriptParseError> {
        let attrs = self.attrs()?;
        if attrs.len() != expected {
            return Err(ScriptParseError::WrongAttrCount {
                line: self.line,
                tag: self.name.to_string(),
                expected,
                got: attrs.len(),
            });
        }
        Ok(attrs)
    }

    fn unexpected(&self, context: &'static str) -> ScriptParseError {
        let tag = if self.closing {
            format!("/{}", self.name)
        } else {
            self.name.to_string()
        };
        ScriptParseError::UnexpectedTag {
            line: self.line,
            tag,
            context,
        }
    }
}

struct Reader<'a> {
    rest: &'a str,
    line: usize,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str) -> Self {
        Reader { rest: text, line: 1 }
    }

    fn advance(&mut self, len: usize) {
        self.line += self.rest[..len].matches('\n').count();
        self.rest = &self.rest[len..];
    }

    fn take_talk(&mut self) -> Result<Option<&'a str>, ScriptParseError> {
        let rest = self.rest;
        let Some(after) = rest.strip_prefix(TALK_OPEN) else {
            return Ok(None);
        };
        let end = after
            .find(TALK_CLOSE)
            .ok_or(ScriptParseError::UnterminatedTalk { line: self.line })?;
        let body = &after[..end];
        self.advance(TALK_OPEN.len() + end + TALK_CLOSE.len());
        Ok(Some(body))
    }

    fn next_tag(&mut self, context: &'static str) -> Result<Tag<'a>, ScriptParseError> {
        let rest = self.rest;
        if rest.is_empty() {
            return Err(ScriptParseError::UnexpectedEof { context });
        }
        let line = self.line;
        let end = rest.find('\n').ok_or_else(|| ScriptParseError::ExpectedTag {
            line,
            text: rest.to_string(),
        })?;
        let raw = &rest[..end];
        self.advance(end + 1);
        Tag::parse(line, raw)
    }
}

pub fn parse_script_txt(text: &str) -> Result<(Vec<String>, Vec<World>), ScriptParseError> {
    let mut reader = Reader::new(text);
    let mut talks = Vec::new();
    let mut worlds = Vec::new();
    while !reader.rest.is_empty() {
        if let Some(talk) = reader.take_talk()? {
            talks.push(talk.to_string());
            continue;
        }
        let tag = reader.next_tag("script")?;
        match (tag.closing, tag.name) {
            (false, "WORLD") => worlds.push(parse_world(&mut reader, &tag)?),
            _ => return Err(tag.unexpected("script")),
        }
    }
    Ok((talks, worlds))
}

fn parse_world(reader: &mut Reader<'_>, open: &Tag<'_>) -> Result<World, ScriptParseError> {
    let value = open.attrs_exact(1)?[0];
    let mut fields = Vec::new();
    loop {
        let tag = reader.next_tag("WORLD")?;
        match (tag.closing, tag.name) {
            (false, "FIELD") => fields.push(parse_field(reader, &tag)?),
            (true, "WORLD") => return Ok(World { value, fields }),
            _ => return Err(tag.unexpected("WORLD")),
        }
    }
}

fn parse_field(reader: &mut Reader<'_>, open: &Tag<'_>) -> Result<Field, ScriptParseError> {
    let mut field = Field {
        attrs: open.attrs()?,
        children: Vec::new(),
        objects: Vec::new(),
        maps: Vec::new(),
    };
    loop {
        let tag = reader.next_tag("FIELD")?;
        match (tag.closing, tag.name) {
            (false, "OBJECT") => field.objects.push(parse_object(reader, &tag)?),
            (false, "MAP") => field.maps.push(parse_map(reader, &tag)?),
            (true, "FIELD") => return Ok(field),
            (false, "WORLD" | "FIELD" | "START" | "TALK") | (true, _) => {
                return Err(tag.unexpected("FIELD"))
            }
            (false, name) => field.children.push(Child {
                name: name.to_string(),
                attrs: tag.attrs()?,
            }),
        }
    }
}

fn parse_map(reader: &mut Reader<'_>, open: &Tag<'_>) -> Result<Map, ScriptParseError> {
    let mut map = Map {
        attrs: open.attrs()?,
        children: Vec::new(),
        objects: Vec::new(),
    };
    loop {
        let tag = reader.next_tag("MAP")?;
        match (tag.closing, tag.name) {
            (false, "OBJECT") => map.objects.push(parse_object(reader, &tag)?),
            (true, "MAP") => return Ok(map),
            (false, "WORLD" | "FIELD" | "MAP" | "START" | "TALK") | (true, _) => {
                return Err(tag.unexpected("MAP"))
            }
            (false, name) => map.children.push(Child {
                name: name.to_string(),
                attrs: tag.attrs()?,
            }),
        }
    }
}

fn parse_object(reader: &mut Reader<'_>, open: &Tag<'_>) -> Result<Object, ScriptParseError> {
    let a = open.attrs_exact(7)?;
    let mut starts = Vec::new();
    loop {
        let tag = reader.next_tag("OBJECT")?;
        match (tag.closing, tag.name) {
            (false, "START") => {
                let s = tag.attrs_exact(2)?;
                let value = match s[1] {
                    0 => false,
                    1 => true,
                    value => {
                        return Err(ScriptParseError::BadStartValue {
                            line: tag.line,
                            value,
                        })
                    }
                };
                starts.push(Start {
                    number: s[0],
                    value,
                });
            }
            (true, "OBJECT") => {
                return Ok(Object {
                    number: a[0],
                    x: a[1],
                    y: a[2],
                    op1: a[3],
                    op2: a[4],
                    op3: a[5],
                    op4: a[6],
                    starts,
                })
            }
            _ => return Err(tag.unexpected("OBJECT")),
        }
    }
}

fn join_attrs(attrs: &[i32]) -> String {
    attrs
        .iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn push_child(out: &mut String, child: &Child) {
    out.push_str(&format!("<{} {}>\n", child.name, join_attrs(&child.attrs)));
}

fn push_object(out: &mut String, obj: &Object) {
    out.push_str(&format!(
        "<OBJECT {},{},{},{},{},{},{}>\n",
        obj.number, obj.x, obj.y, obj.op1, obj.op2, obj.op3, obj.op4
    ));
    for start in &obj.starts {
        out.push_str(&format!("<START {},{}>\n", start.number, u8::from(start.value)));
    }
    out.push_str("</OBJECT>\n");
}

pub fn stringify_script_txt(talks: &[String], worlds: &[World]) -> String {
    let mut out = String::new();
    for talk in talks {
        out.push_str(TALK_OPEN);
        out.push_str(talk);
        out.push_str(TALK_CLOSE);
    }
    for world in worlds {
        out.push_str(&format!("<WORLD {}>\n", world.value));
        for field in &world.fields {
            out.push_str(&format!("<FIELD {}>\n", join_attrs(&field.attrs)));
            field.children.iter().for_each(|c| push_child(&mut out, c));
            field.objects.iter().for_each(|o| push_object(&mut out, o));
            for map in &field.maps {
                out.push_str(&format!("<MAP {}>\n", join_attrs(&map.attrs)));
                map.children.iter().for_each(|c| push_child(&mut out, c));
                map.objects.iter().for_each(|o| push_object(&mut out, o));
                out.push_str("</MAP>\n");
            }
            out.push_str("</FIELD>\n");
        }
        out.push_str("</WORLD>\n");
    }
    out
}

pub(crate) fn first_difference(a: &str, b: &str) -> Option<usize> {
    if a == b {
        return None;
    }
    let common = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    Some(common)
}
