//! Shared test-side decoding: enough zip and HTTP parsing to check output.

use std::io::Read;

pub(crate) struct ZipMember {
    pub(crate) name: String,
    pub(crate) crc: u32,
    pub(crate) content: Vec<u8>,
}

fn u16_at(bytes: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes(bytes[pos..pos + 2].try_into().unwrap())
}

fn u32_at(bytes: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap())
}

/// Walk the central directory and inflate every member.
///
/// Assumes what the streamer writes: no archive comment, so the end record
/// is the trailing 22 bytes.
pub(crate) fn parse_zip(bytes: &[u8]) -> Vec<ZipMember> {
    assert!(bytes.len() >= 22, "too short for an end record");
    let eocd = bytes.len() - 22;
    assert_eq!(0x0605_4b50, u32_at(bytes, eocd), "bad end record signature");
    let count = u16_at(bytes, eocd + 10) as usize;
    let cd_size = u32_at(bytes, eocd + 12) as usize;
    let cd_offset = u32_at(bytes, eocd + 16) as usize;

    let mut members = Vec::with_capacity(count);
    let mut pos = cd_offset;
    for _ in 0..count {
        assert_eq!(0x0201_4b50, u32_at(bytes, pos), "bad central header");
        let crc = u32_at(bytes, pos + 16);
        let csize = u32_at(bytes, pos + 20) as usize;
        let name_len = u16_at(bytes, pos + 28) as usize;
        let extra_len = u16_at(bytes, pos + 30) as usize;
        let comment_len = u16_at(bytes, pos + 32) as usize;
        let header_offset = u32_at(bytes, pos + 42) as usize;
        let name = String::from_utf8(bytes[pos + 46..pos + 46 + name_len].to_vec()).unwrap();

        assert_eq!(0x0403_4b50, u32_at(bytes, header_offset), "bad local header");
        let lf_name = u16_at(bytes, header_offset + 26) as usize;
        let lf_extra = u16_at(bytes, header_offset + 28) as usize;
        let data = header_offset + 30 + lf_name + lf_extra;

        let mut content = Vec::new();
        flate2::read::DeflateDecoder::new(&bytes[data..data + csize])
            .read_to_end(&mut content)
            .unwrap();
        members.push(ZipMember { name, crc, content });
        pos += 46 + name_len + extra_len + comment_len;
    }
    assert_eq!(cd_offset + cd_size, pos, "central directory size mismatch");
    members
}

pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
}

impl HttpResponse {
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Split a raw HTTP/1.1 response into status, headers, and body.
pub(crate) fn parse_response(bytes: &[u8]) -> HttpResponse {
    let split = bytes
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("no header/body separator");
    let head = std::str::from_utf8(&bytes[..split]).unwrap();
    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap();
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("no status code");
    let headers = lines
        .map(|line| {
            let (name, value) = line.split_once(':').expect("malformed header");
            (name.trim().to_string(), value.trim().to_string())
        })
        .collect();
    HttpResponse {
        status,
        headers,
        body: bytes[split + 4..].to_vec(),
    }
}
