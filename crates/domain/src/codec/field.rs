use std::net::{Ipv4Addr, Ipv6Addr};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hickory_proto::rr::Name as DomainName;
use hickory_proto::serialize::binary::{BinDecodable, BinDecoder, BinEncodable};
use serde_json::{Map, Value};

/// One RDATA field, in wire order. The key names the field in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    U8(&'static str),
    U16(&'static str),
    U32(&'static str),
    /// 48-bit integer (TSIG time signed).
    U48(&'static str),
    Ipv4(&'static str),
    Ipv6(&'static str),
    /// Uncompressed, fully-qualified domain name.
    Name(&'static str),
    /// Single length-prefixed character-string.
    Text(&'static str),
    /// Character-strings until the end of RDATA.
    TextList(&'static str),
    /// Raw text until the end of RDATA (URI target, CAA value).
    TextRest(&'static str),
    HexFixed(&'static str, usize),
    /// Hex blob with a one-byte length prefix.
    HexLen8(&'static str),
    /// Hex blob with a two-byte length prefix.
    HexLen16(&'static str),
    HexRest(&'static str),
    Base64Rest(&'static str),
    /// NSEC-style type bitmap, rendered as a list of type numbers.
    TypeBitmap(&'static str),
    /// SVCB/HTTPS parameters, rendered as `{key, value}` pairs with hex values.
    SvcParams(&'static str),
}

impl Field {
    pub fn key(&self) -> &'static str {
        match *self {
            Field::U8(k)
            | Field::U16(k)
            | Field::U32(k)
            | Field::U48(k)
            | Field::Ipv4(k)
            | Field::Ipv6(k)
            | Field::Name(k)
            | Field::Text(k)
            | Field::TextList(k)
            | Field::TextRest(k)
            | Field::HexFixed(k, _)
            | Field::HexLen8(k)
            | Field::HexLen16(k)
            | Field::HexRest(k)
            | Field::Base64Rest(k)
            | Field::TypeBitmap(k)
            | Field::SvcParams(k) => k,
        }
    }
}

/// Why a payload could not be turned into RDATA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldError {
    /// The JSON does not have the expected structure.
    Shape(String),
    /// The structure is right but a value cannot be packed.
    Range(String),
}

struct WireReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], String> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| format!("rdata truncated at offset {}", self.pos))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn rest(&mut self) -> &'a [u8] {
        let slice = &self.bytes[self.pos.min(self.bytes.len())..];
        self.pos = self.bytes.len();
        slice
    }

    fn u8(&mut self) -> Result<u8, String> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, String> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, String> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u48(&mut self) -> Result<u64, String> {
        let b = self.take(6)?;
        Ok(b.iter().fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte)))
    }

    // Names may carry compression pointers into earlier RDATA, so the decoder
    // always sees the whole buffer.
    fn name(&mut self) -> Result<DomainName, String> {
        let mut decoder = BinDecoder::new(self.bytes);
        decoder.read_slice(self.pos).map_err(|e| e.to_string())?;
        let name = DomainName::read(&mut decoder).map_err(|e| e.to_string())?;
        self.pos = decoder.index();
        Ok(name)
    }

    fn character_string(&mut self) -> Result<String, String> {
        let len = self.u8()? as usize;
        utf8(self.take(len)?)
    }
}

fn utf8(bytes: &[u8]) -> Result<String, String> {
    String::from_utf8(bytes.to_vec()).map_err(|_| "character-string is not valid UTF-8".to_string())
}

/// Walks `shape` over wire-format RDATA and renders each field as JSON.
pub(crate) fn read_fields(shape: &[Field], rdata: &[u8]) -> Result<Map<String, Value>, String> {
    let mut reader = WireReader::new(rdata);
    let mut fields = Map::new();

    for field in shape {
        let value = match *field {
            Field::U8(_) => Value::from(reader.u8()?),
            Field::U16(_) => Value::from(reader.u16()?),
            Field::U32(_) => Value::from(reader.u32()?),
            Field::U48(_) => Value::from(reader.u48()?),
            Field::Ipv4(_) => {
                let b = reader.take(4)?;
                Value::from(Ipv4Addr::new(b[0], b[1], b[2], b[3]).to_string())
            }
            Field::Ipv6(_) => {
                let b = reader.take(16)?;
                let mut octets = [0u8; 16];
                octets.copy_from_slice(b);
                Value::from(Ipv6Addr::from(octets).to_string())
            }
            Field::Name(_) => Value::from(reader.name()?.to_ascii()),
            Field::Text(_) => Value::from(reader.character_string()?),
            Field::TextList(_) => {
                let mut strings = Vec::new();
                while !reader.is_empty() {
                    strings.push(Value::from(reader.character_string()?));
                }
                Value::Array(strings)
            }
            Field::TextRest(_) => Value::from(utf8(reader.rest())?),
            Field::HexFixed(_, len) => Value::from(hex::encode(reader.take(len)?)),
            Field::HexLen8(_) => {
                let len = reader.u8()? as usize;
                Value::from(hex::encode(reader.take(len)?))
            }
            Field::HexLen16(_) => {
                let len = reader.u16()? as usize;
                Value::from(hex::encode(reader.take(len)?))
            }
            Field::HexRest(_) => Value::from(hex::encode(reader.rest())),
            Field::Base64Rest(_) => Value::from(STANDARD.encode(reader.rest())),
            Field::TypeBitmap(_) => Value::Array(
                read_type_bitmap(reader.rest())?
                    .into_iter()
                    .map(Value::from)
                    .collect(),
            ),
            Field::SvcParams(_) => {
                let mut params = Vec::new();
                while !reader.is_empty() {
                    let key = reader.u16()?;
                    let len = reader.u16()? as usize;
                    let value = reader.take(len)?;
                    let mut param = Map::new();
                    param.insert("key".to_string(), Value::from(key));
                    param.insert("value".to_string(), Value::from(hex::encode(value)));
                    params.push(Value::Object(param));
                }
                Value::Array(params)
            }
        };
        fields.insert(field.key().to_string(), value);
    }

    if !reader.is_empty() {
        return Err(format!(
            "{} trailing bytes after last field",
            rdata.len() - reader.pos
        ));
    }

    Ok(fields)
}

/// Packs payload fields into wire-format RDATA following `shape`.
pub(crate) fn write_fields(
    shape: &[Field],
    fields: &Map<String, Value>,
    out: &mut Vec<u8>,
) -> Result<(), FieldError> {
    if let Some(unexpected) = fields
        .keys()
        .find(|key| !shape.iter().any(|f| f.key() == key.as_str()))
    {
        return Err(FieldError::Shape(format!("unexpected field `{unexpected}`")));
    }

    for field in shape {
        let key = field.key();
        let value = fields
            .get(key)
            .ok_or_else(|| FieldError::Shape(format!("missing field `{key}`")))?;

        match *field {
            Field::U8(_) => out.push(narrow::<u8>(key, number(key, value)?)?),
            Field::U16(_) => out.extend_from_slice(&narrow::<u16>(key, number(key, value)?)?.to_be_bytes()),
            Field::U32(_) => out.extend_from_slice(&narrow::<u32>(key, number(key, value)?)?.to_be_bytes()),
            Field::U48(_) => {
                let n = number(key, value)?;
                if n >= 1 << 48 {
                    return Err(out_of_range(key));
                }
                out.extend_from_slice(&n.to_be_bytes()[2..]);
            }
            Field::Ipv4(_) => {
                let addr: Ipv4Addr = string(key, value)?
                    .parse()
                    .map_err(|_| FieldError::Shape(format!("`{key}` is not an IPv4 address")))?;
                out.extend_from_slice(&addr.octets());
            }
            Field::Ipv6(_) => {
                let addr: Ipv6Addr = string(key, value)?
                    .parse()
                    .map_err(|_| FieldError::Shape(format!("`{key}` is not an IPv6 address")))?;
                out.extend_from_slice(&addr.octets());
            }
            Field::Name(_) => {
                let name = fqdn(key, string(key, value)?)?;
                let bytes = name
                    .to_bytes()
                    .map_err(|e| FieldError::Range(format!("`{key}`: {e}")))?;
                out.extend_from_slice(&bytes);
            }
            Field::Text(_) => write_character_string(key, string(key, value)?.as_bytes(), out)?,
            Field::TextList(_) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| FieldError::Shape(format!("`{key}` must be a list of strings")))?;
                for item in items {
                    write_character_string(key, string(key, item)?.as_bytes(), out)?;
                }
            }
            Field::TextRest(_) => out.extend_from_slice(string(key, value)?.as_bytes()),
            Field::HexFixed(_, len) => {
                let bytes = hex_bytes(key, value)?;
                if bytes.len() != len {
                    return Err(FieldError::Range(format!(
                        "`{key}` must be exactly {len} bytes, got {}",
                        bytes.len()
                    )));
                }
                out.extend_from_slice(&bytes);
            }
            Field::HexLen8(_) => {
                let bytes = hex_bytes(key, value)?;
                out.push(narrow::<u8>(key, bytes.len() as u64)?);
                out.extend_from_slice(&bytes);
            }
            Field::HexLen16(_) => {
                let bytes = hex_bytes(key, value)?;
                out.extend_from_slice(&narrow::<u16>(key, bytes.len() as u64)?.to_be_bytes());
                out.extend_from_slice(&bytes);
            }
            Field::HexRest(_) => out.extend_from_slice(&hex_bytes(key, value)?),
            Field::Base64Rest(_) => {
                let bytes = STANDARD
                    .decode(string(key, value)?)
                    .map_err(|_| FieldError::Shape(format!("`{key}` is not valid base64")))?;
                out.extend_from_slice(&bytes);
            }
            Field::TypeBitmap(_) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| FieldError::Shape(format!("`{key}` must be a list of type numbers")))?;
                let types = items
                    .iter()
                    .map(|item| narrow::<u16>(key, number(key, item)?))
                    .collect::<Result<Vec<_>, _>>()?;
                write_type_bitmap(&types, out);
            }
            Field::SvcParams(_) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| FieldError::Shape(format!("`{key}` must be a list of parameters")))?;
                for item in items {
                    let param = item
                        .as_object()
                        .ok_or_else(|| FieldError::Shape(format!("`{key}` entries must be objects")))?;
                    let param_key = param
                        .get("key")
                        .ok_or_else(|| FieldError::Shape(format!("`{key}` entry without `key`")))?;
                    let param_value = param
                        .get("value")
                        .ok_or_else(|| FieldError::Shape(format!("`{key}` entry without `value`")))?;
                    let bytes = hex_bytes(key, param_value)?;
                    out.extend_from_slice(&narrow::<u16>(key, number(key, param_key)?)?.to_be_bytes());
                    out.extend_from_slice(&narrow::<u16>(key, bytes.len() as u64)?.to_be_bytes());
                    out.extend_from_slice(&bytes);
                }
            }
        }
    }

    Ok(())
}

/// Parses a presentation-format name, requiring it to be fully qualified.
pub(crate) fn fqdn(key: &str, text: &str) -> Result<DomainName, FieldError> {
    let body = text.strip_suffix('.').unwrap_or(text);
    if text != "." && body.split('.').any(str::is_empty) {
        return Err(FieldError::Range(format!(
            "`{key}` contains an empty label: {text:?}"
        )));
    }
    let name = DomainName::from_ascii(text)
        .map_err(|e| FieldError::Range(format!("`{key}` is not a valid domain name: {e}")))?;
    if !name.is_fqdn() {
        return Err(FieldError::Range(format!(
            "`{key}` must be fully qualified: {text:?}"
        )));
    }
    Ok(name)
}

fn number(key: &str, value: &Value) -> Result<u64, FieldError> {
    value
        .as_u64()
        .ok_or_else(|| FieldError::Shape(format!("`{key}` must be an unsigned integer")))
}

fn narrow<T: TryFrom<u64>>(key: &str, n: u64) -> Result<T, FieldError> {
    T::try_from(n).map_err(|_| out_of_range(key))
}

fn out_of_range(key: &str) -> FieldError {
    FieldError::Range(format!("`{key}` is out of range"))
}

fn string<'v>(key: &str, value: &'v Value) -> Result<&'v str, FieldError> {
    value
        .as_str()
        .ok_or_else(|| FieldError::Shape(format!("`{key}` must be a string")))
}

fn hex_bytes(key: &str, value: &Value) -> Result<Vec<u8>, FieldError> {
    hex::decode(string(key, value)?)
        .map_err(|_| FieldError::Shape(format!("`{key}` is not valid hex")))
}

fn write_character_string(key: &str, bytes: &[u8], out: &mut Vec<u8>) -> Result<(), FieldError> {
    let len = u8::try_from(bytes.len()).map_err(|_| {
        FieldError::Range(format!("`{key}` character-string exceeds 255 bytes"))
    })?;
    out.push(len);
    out.extend_from_slice(bytes);
    Ok(())
}

fn write_type_bitmap(types: &[u16], out: &mut Vec<u8>) {
    let mut sorted = types.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut i = 0;
    while i < sorted.len() {
        let window = (sorted[i] >> 8) as u8;
        let mut bitmap = [0u8; 32];
        let mut len = 0;
        while i < sorted.len() && (sorted[i] >> 8) as u8 == window {
            let low = (sorted[i] & 0xff) as usize;
            bitmap[low / 8] |= 0x80 >> (low % 8);
            len = low / 8 + 1;
            i += 1;
        }
        out.push(window);
        out.push(len as u8);
        out.extend_from_slice(&bitmap[..len]);
    }
}

fn read_type_bitmap(bytes: &[u8]) -> Result<Vec<u16>, String> {
    let mut reader = WireReader::new(bytes);
    let mut types = Vec::new();
    while !reader.is_empty() {
        let window = u16::from(reader.u8()?);
        let len = reader.u8()? as usize;
        if len == 0 || len > 32 {
            return Err(format!("invalid type bitmap length {len}"));
        }
        for (index, byte) in reader.take(len)?.iter().enumerate() {
            for bit in 0..8usize {
                if byte & (0x80 >> bit) != 0 {
                    types.push((window << 8) | (index * 8 + bit) as u16);
                }
            }
        }
    }
    Ok(types)
}
