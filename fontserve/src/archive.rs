//! Streams selected font files into a zip archive, member by member.
//!
//! The container is assembled by hand so it can be written front-to-back to
//! any [`Write`] sink: every member carries a data descriptor (flag bit 3),
//! so nothing has to be seeked back and patched. Member bodies are raw
//! DEFLATE streams; at most one source file is open at a time and reads go
//! through a fixed-size chunk buffer, so memory stays bounded regardless of
//! archive size. A slow sink blocks the writes, which in turn pauses the
//! reads; that is the whole backpressure story.

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use flate2::{write::DeflateEncoder, Compression, Crc};
use fontstore::FileEntry;

use crate::error::Error;

const LOCAL_HEADER_SIG: u32 = 0x0403_4b50;
const DATA_DESCRIPTOR_SIG: u32 = 0x0807_4b50;
const CENTRAL_HEADER_SIG: u32 = 0x0201_4b50;
const END_OF_CENTRAL_DIR_SIG: u32 = 0x0605_4b50;

const VERSION_NEEDED: u16 = 20;
const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;
const METHOD_DEFLATE: u16 = 8;
// The zip epoch, 1980-01-01 00:00:00; members carry no meaningful mtime.
const DOS_TIME: u16 = 0;
const DOS_DATE: u16 = 0x0021;

const CHUNK_SIZE: usize = 64 * 1024;

/// Stream `entries` into `sink` as a zip archive and return the sink.
///
/// Members are named by the basename of their source path, in entry order.
/// Basenames are not deduplicated; with a flat layout the last member of a
/// given name wins at extraction time. The first read or write failure
/// aborts the whole archive; bytes already written are not retracted.
pub fn stream_archive<W: Write>(entries: &[FileEntry], sink: W) -> Result<W, Error> {
    let mut zip = ZipStreamer::new(sink);
    for entry in entries {
        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.{}", entry.variant, entry.format));
        zip.append_file(&name, &entry.path)?;
    }
    zip.finish()
}

/// Incremental zip writer over any byte sink.
pub struct ZipStreamer<W: Write> {
    sink: CountingWriter<W>,
    members: Vec<MemberRecord>,
}

/// What `finish` needs to remember about a written member.
struct MemberRecord {
    name: String,
    crc: u32,
    compressed: u32,
    uncompressed: u32,
    header_offset: u32,
}

impl<W: Write> ZipStreamer<W> {
    pub fn new(sink: W) -> ZipStreamer<W> {
        ZipStreamer {
            sink: CountingWriter { inner: sink, written: 0 },
            members: Vec::new(),
        }
    }

    /// Add one archive member sourced from `path`, compressing as we go.
    pub fn append_file(&mut self, name: &str, path: &Path) -> Result<(), Error> {
        let name_len =
            u16::try_from(name.len()).map_err(|_| Error::MemberNameTooLong(name.len()))?;
        let header_offset = u32::try_from(self.sink.written).map_err(|_| Error::ArchiveTooLarge)?;
        let mut file = File::open(path).map_err(|source| Error::ArchiveRead {
            path: path.to_path_buf(),
            source,
        })?;

        // Local header; sizes and crc live in the trailing data descriptor.
        self.write_u32(LOCAL_HEADER_SIG)?;
        self.write_u16(VERSION_NEEDED)?;
        self.write_u16(FLAG_DATA_DESCRIPTOR)?;
        self.write_u16(METHOD_DEFLATE)?;
        self.write_u16(DOS_TIME)?;
        self.write_u16(DOS_DATE)?;
        self.write_u32(0)?; // crc-32
        self.write_u32(0)?; // compressed size
        self.write_u32(0)?; // uncompressed size
        self.write_u16(name_len)?;
        self.write_u16(0)?; // extra field length
        self.write_all(name.as_bytes())?;

        let mut crc = Crc::new();
        let mut uncompressed: u64 = 0;
        let body_start = self.sink.written;
        let mut encoder = DeflateEncoder::new(&mut self.sink, Compression::default());
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = file.read(&mut buf).map_err(|source| Error::ArchiveRead {
                path: path.to_path_buf(),
                source,
            })?;
            if n == 0 {
                break;
            }
            crc.update(&buf[..n]);
            encoder.write_all(&buf[..n]).map_err(Error::ArchiveWrite)?;
            uncompressed += n as u64;
        }
        encoder.finish().map_err(Error::ArchiveWrite)?;

        let compressed = self.sink.written - body_start;
        let (compressed, uncompressed) = match (u32::try_from(compressed), u32::try_from(uncompressed)) {
            (Ok(c), Ok(u)) => (c, u),
            _ => return Err(Error::EntryTooLarge(path.to_path_buf())),
        };

        self.write_u32(DATA_DESCRIPTOR_SIG)?;
        self.write_u32(crc.sum())?;
        self.write_u32(compressed)?;
        self.write_u32(uncompressed)?;

        self.members.push(MemberRecord {
            name: name.to_string(),
            crc: crc.sum(),
            compressed,
            uncompressed,
            header_offset,
        });
        Ok(())
    }

    /// Write the central directory and end record, flush, and return the sink.
    pub fn finish(mut self) -> Result<W, Error> {
        let members = std::mem::take(&mut self.members);
        let cd_offset = u32::try_from(self.sink.written).map_err(|_| Error::ArchiveTooLarge)?;
        for member in &members {
            self.write_u32(CENTRAL_HEADER_SIG)?;
            self.write_u16(VERSION_NEEDED)?; // version made by
            self.write_u16(VERSION_NEEDED)?;
            self.write_u16(FLAG_DATA_DESCRIPTOR)?;
            self.write_u16(METHOD_DEFLATE)?;
            self.write_u16(DOS_TIME)?;
            self.write_u16(DOS_DATE)?;
            self.write_u32(member.crc)?;
            self.write_u32(member.compressed)?;
            self.write_u32(member.uncompressed)?;
            let name_len = u16::try_from(member.name.len())
                .map_err(|_| Error::MemberNameTooLong(member.name.len()))?;
            self.write_u16(name_len)?;
            self.write_u16(0)?; // extra field length
            self.write_u16(0)?; // comment length
            self.write_u16(0)?; // disk number start
            self.write_u16(0)?; // internal attributes
            self.write_u32(0)?; // external attributes
            self.write_u32(member.header_offset)?;
            self.write_all(member.name.as_bytes())?;
        }
        let cd_end = u32::try_from(self.sink.written).map_err(|_| Error::ArchiveTooLarge)?;
        let count = u16::try_from(members.len()).map_err(|_| Error::ArchiveTooLarge)?;

        self.write_u32(END_OF_CENTRAL_DIR_SIG)?;
        self.write_u16(0)?; // this disk
        self.write_u16(0)?; // central directory disk
        self.write_u16(count)?;
        self.write_u16(count)?;
        self.write_u32(cd_end - cd_offset)?;
        self.write_u32(cd_offset)?;
        self.write_u16(0)?; // comment length

        self.sink.flush().map_err(Error::ArchiveWrite)?;
        Ok(self.sink.inner)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.sink.write_all(bytes).map_err(Error::ArchiveWrite)
    }

    fn write_u16(&mut self, value: u16) -> Result<(), Error> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_u32(&mut self, value: u32) -> Result<(), Error> {
        self.write_all(&value.to_le_bytes())
    }
}

/// Tracks how many bytes reached the sink; zip offsets are derived from it.
struct CountingWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
