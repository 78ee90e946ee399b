use std::collections::HashMap;
use std::str::FromStr;

/// Marker starting a `=ybegin` header line
pub(crate) const YBEGIN: &[u8] = b"=ybegin";
/// Marker starting a `=ypart` line
pub(crate) const YPART: &[u8] = b"=ypart";
/// Marker starting a `=yend` trailer line
pub(crate) const YEND: &[u8] = b"=yend";

const NAME_KEY: &str = "name=";

/// Values from a `=ybegin` line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct BeginHeader {
    /// Original filename (empty when missing)
    pub name: String,
    /// Filename exactly as it appeared on the line
    pub name_bytes: Vec<u8>,
    /// Total file size
    pub size: u64,
    /// Line length
    pub columns: usize,
    /// Part number; `Some` whenever a `part=` token is present
    pub part: Option<u32>,
    /// Total number of parts
    pub total: u32,
}

/// Values from a `=ypart` line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PartRange {
    pub begin: u64,
    pub end: u64,
}

/// Values from a `=yend` line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Trailer {
    /// Size of the decoded part
    pub size: u64,
    /// CRC32 of this part
    pub pcrc32: u32,
    /// CRC32 of the whole file
    pub crc32: u32,
    /// Part number; `Some` whenever a `part=` token is present
    pub part: Option<u32>,
}

/// Whether `line` starts with the given marker
pub(crate) fn is_marker(line: &[u8], marker: &[u8]) -> bool {
    line.starts_with(marker)
}

/// Parse a decimal value, falling back to zero
///
/// yEnc producers are sloppy; a malformed number never aborts decoding.
pub(crate) fn parse_or_default<T: FromStr + Default>(value: &str) -> T {
    value.parse().unwrap_or_default()
}

/// Parse a hex CRC32, falling back to zero
///
/// Up to 64 bits are accepted and truncated to the low 32.
pub(crate) fn parse_crc32_or_default(value: &str) -> u32 {
    u64::from_str_radix(value, 16)
        .map(|crc| crc as u32)
        .unwrap_or_default()
}

/// Split `key=value` tokens on whitespace and the first `=`
///
/// Tokens without `=` or with an empty key are skipped.
fn tokens(text: &str) -> impl Iterator<Item = (&str, &str)> {
    text.split_whitespace()
        .filter_map(|token| token.split_once('='))
        .filter(|(key, _)| !key.is_empty())
}

/// Split a header into the part before `name=` and the trimmed filename
fn split_name(text: &str) -> (&str, Option<&str>) {
    match text.find(NAME_KEY) {
        Some(idx) => (&text[..idx], Some(text[idx + NAME_KEY.len()..].trim())),
        None => (text, None),
    }
}

/// Raw filename bytes after the first `name=`, ASCII whitespace trimmed
fn raw_name(line: &[u8]) -> Option<&[u8]> {
    let key = NAME_KEY.as_bytes();
    line.windows(key.len())
        .position(|window| window == key)
        .map(|idx| line[idx + key.len()..].trim_ascii())
}

/// Parse the `key=value` parameters of a yEnc control line
///
/// `name` runs to the end of the line, since filenames may contain spaces
/// and `=`. Every other token is split on its first `=`.
///
/// # Example
/// ```
/// let params = yenc_rs::parse_params(b"=ybegin line=128 size=42 name=my file=1.bin");
/// assert_eq!(params["size"], "42");
/// assert_eq!(params["name"], "my file=1.bin");
/// ```
pub fn parse_params(line: &[u8]) -> HashMap<String, String> {
    let text = String::from_utf8_lossy(line);
    let (head, name) = split_name(&text);

    let mut params: HashMap<String, String> = tokens(head)
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    if let Some(name) = name {
        params.insert("name".to_string(), name.to_string());
    }
    params
}

/// Parse yEnc =ybegin header line
///
/// Format: =ybegin [part=1 total=5] line=128 size=123456 name=file.bin
///
/// Filenames need not be UTF-8. `name` is a lossy rendering for display,
/// `name_bytes` keeps the bytes as sent.
pub(crate) fn parse_ybegin(line: &[u8]) -> BeginHeader {
    let line = line.strip_prefix(YBEGIN).unwrap_or(line);
    let text = String::from_utf8_lossy(line);
    let (head, name) = split_name(&text);

    let mut header = BeginHeader {
        name: name.unwrap_or_default().to_string(),
        name_bytes: raw_name(line).unwrap_or_default().to_vec(),
        ..BeginHeader::default()
    };
    for (key, value) in tokens(head) {
        match key {
            "size" => header.size = parse_or_default(value),
            "line" => header.columns = parse_or_default(value),
            "part" => header.part = Some(parse_or_default(value)),
            "total" => header.total = parse_or_default(value),
            _ => {}
        }
    }
    header
}

/// Parse yEnc =ypart line
///
/// Format: =ypart begin=1 end=123456
pub(crate) fn parse_ypart(line: &[u8]) -> PartRange {
    let text = String::from_utf8_lossy(line.strip_prefix(YPART).unwrap_or(line));

    let mut range = PartRange::default();
    for (key, value) in tokens(&text) {
        match key {
            "begin" => range.begin = parse_or_default(value),
            "end" => range.end = parse_or_default(value),
            _ => {}
        }
    }
    range
}

/// Parse yEnc =yend line
///
/// Format: =yend size=123456 [part=1] [pcrc32=87654321] [crc32=12345678]
pub(crate) fn parse_yend(line: &[u8]) -> Trailer {
    let text = String::from_utf8_lossy(line.strip_prefix(YEND).unwrap_or(line));

    let mut trailer = Trailer::default();
    for (key, value) in tokens(&text) {
        match key {
            "size" => trailer.size = parse_or_default(value),
            "pcrc32" => trailer.pcrc32 = parse_crc32_or_default(value),
            "crc32" => trailer.crc32 = parse_crc32_or_default(value),
            "part" => trailer.part = Some(parse_or_default(value)),
            _ => {}
        }
    }
    trailer
}
