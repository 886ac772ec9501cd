//! Multi-image icon container (ICO) assembly and inspection.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! ICONDIR        reserved:u16 = 0, type:u16 = 1, count:u16
//! ICONDIRENTRY   width:u8, height:u8, colors:u8 = 0, reserved:u8 = 0,
//!   x count      planes:u16 = 1, bpp:u16 = 32, length:u32, offset:u32
//! payloads       concatenated in entry order
//! ```
//!
//! Width and height bytes of zero mean 256.

use std::io::{self, Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::error::{Error, Result};
use crate::render::RenderedImage;

/// Size of the ICONDIR header in bytes.
pub const HEADER_LEN: u32 = 6;

/// Size of one ICONDIRENTRY in bytes.
pub const ENTRY_LEN: u32 = 16;

/// Resource type number for icons (cursors are 2).
const ICON_TYPE: u16 = 1;

/// Largest edge length a directory entry can describe.
pub const MAX_EDGE: u32 = 256;

macro_rules! invalid_data {
    ($($arg:tt)+) => {
        return Err(Error::Container(io::Error::new(
            io::ErrorKind::InvalidData,
            format!($($arg)+),
        )))
    };
}

// ============================================================================
// IconDirEntry
// ============================================================================

/// Directory metadata for one embedded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconDirEntry {
    /// Width in pixels (1-256).
    pub width: u32,
    /// Height in pixels (1-256).
    pub height: u32,
    /// Palette size; 0 for true-color images.
    pub color_count: u8,
    pub planes: u16,
    pub bits_per_pixel: u16,
    /// Payload length in bytes.
    pub length: u32,
    /// Absolute payload offset within the container.
    pub offset: u32,
}

impl IconDirEntry {
    /// Offset one past the end of this entry's payload.
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.length as u64
    }
}

/// Encodes an edge length as a directory byte, with 256 stored as 0.
pub fn dimension_byte(edge: u32) -> Result<u8> {
    match edge {
        1..=255 => Ok(edge as u8),
        MAX_EDGE => Ok(0),
        _ => Err(Error::SizeOverflow { size: edge }),
    }
}

fn edge_from_byte(byte: u8) -> u32 {
    if byte == 0 { MAX_EDGE } else { byte as u32 }
}

// ============================================================================
// IconContainer
// ============================================================================

/// A complete icon container: directory entries plus their payloads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IconContainer {
    entries: Vec<IconDirEntry>,
    payloads: Vec<Vec<u8>>,
}

impl IconContainer {
    /// Lays out a container for `images`, in order.
    ///
    /// Offsets start right after the directory and each one advances by
    /// the previous payload's length, so payloads are contiguous.
    pub fn from_images(images: Vec<RenderedImage>) -> Result<Self> {
        if images.len() > u16::MAX as usize {
            return Err(Error::TooManyEntries {
                count: images.len(),
            });
        }

        let mut offset = HEADER_LEN as u64 + ENTRY_LEN as u64 * images.len() as u64;
        let mut entries = Vec::with_capacity(images.len());
        let mut payloads = Vec::with_capacity(images.len());

        for image in images {
            dimension_byte(image.size)?;
            dimension_byte(image.width)?;
            dimension_byte(image.height)?;

            let too_large = || Error::PayloadTooLarge {
                size: image.size,
                len: image.data.len(),
            };
            let length = u32::try_from(image.data.len()).map_err(|_| too_large())?;
            let start = u32::try_from(offset).map_err(|_| too_large())?;
            offset += length as u64;
            if offset > u32::MAX as u64 {
                return Err(too_large());
            }

            debug!(
                "entry {}: {}x{} at offset {start}, {length} bytes",
                entries.len(),
                image.width,
                image.height
            );
            entries.push(IconDirEntry {
                width: image.width,
                height: image.height,
                color_count: 0,
                planes: 1,
                bits_per_pixel: 32,
                length,
                offset: start,
            });
            payloads.push(image.data);
        }

        Ok(Self { entries, payloads })
    }

    /// Returns the directory entries.
    pub fn entries(&self) -> &[IconDirEntry] {
        &self.entries
    }

    /// Returns the payload of the entry at `index`.
    pub fn payload(&self, index: usize) -> Option<&[u8]> {
        self.payloads.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total size of the serialized container in bytes.
    pub fn encoded_len(&self) -> u64 {
        let payload_len: u64 = self.entries.iter().map(|e| e.length as u64).sum();
        HEADER_LEN as u64 + ENTRY_LEN as u64 * self.entries.len() as u64 + payload_len
    }

    /// Writes the container.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u16::<LittleEndian>(0)?; // reserved
        writer.write_u16::<LittleEndian>(ICON_TYPE)?;
        writer.write_u16::<LittleEndian>(self.entries.len() as u16)?;
        for entry in &self.entries {
            writer.write_u8(edge_byte(entry.width))?;
            writer.write_u8(edge_byte(entry.height))?;
            writer.write_u8(entry.color_count)?;
            writer.write_u8(0)?; // reserved
            writer.write_u16::<LittleEndian>(entry.planes)?;
            writer.write_u16::<LittleEndian>(entry.bits_per_pixel)?;
            writer.write_u32::<LittleEndian>(entry.length)?;
            writer.write_u32::<LittleEndian>(entry.offset)?;
        }
        for payload in &self.payloads {
            writer.write_all(payload)?;
        }
        Ok(())
    }

    /// Serializes the container into a new buffer.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.encoded_len() as usize);
        self.write(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads a container, checking the header and every payload span.
    pub fn read<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let reserved = reader.read_u16::<LittleEndian>().map_err(Error::Container)?;
        if reserved != 0 {
            invalid_data!("reserved header field is {reserved}, must be 0");
        }
        let kind = reader.read_u16::<LittleEndian>().map_err(Error::Container)?;
        if kind != ICON_TYPE {
            invalid_data!("resource type is {kind}, expected {ICON_TYPE} (icon)");
        }
        let count = reader.read_u16::<LittleEndian>().map_err(Error::Container)? as usize;

        let mut entries = Vec::with_capacity(count);
        for index in 0..count {
            let (entry, reserved) = read_entry(&mut reader).map_err(Error::Container)?;
            if reserved != 0 {
                invalid_data!("entry {index} has reserved byte {reserved}, must be 0");
            }
            entries.push(entry);
        }

        let mut payloads = Vec::with_capacity(count);
        for entry in &entries {
            reader
                .seek(SeekFrom::Start(entry.offset as u64))
                .map_err(Error::Container)?;
            let mut data = vec![0u8; entry.length as usize];
            reader.read_exact(&mut data).map_err(Error::Container)?;
            payloads.push(data);
        }

        Ok(Self { entries, payloads })
    }
}

/// Reads one directory entry and its reserved byte.
fn read_entry<R: Read>(reader: &mut R) -> io::Result<(IconDirEntry, u8)> {
    let width = reader.read_u8()?;
    let height = reader.read_u8()?;
    let color_count = reader.read_u8()?;
    let reserved = reader.read_u8()?;
    let entry = IconDirEntry {
        width: edge_from_byte(width),
        height: edge_from_byte(height),
        color_count,
        planes: reader.read_u16::<LittleEndian>()?,
        bits_per_pixel: reader.read_u16::<LittleEndian>()?,
        length: reader.read_u32::<LittleEndian>()?,
        offset: reader.read_u32::<LittleEndian>()?,
    };
    Ok((entry, reserved))
}

// Entries are validated in `from_images`/`read`, so only 1-256 reach here.
fn edge_byte(edge: u32) -> u8 {
    if edge >= MAX_EDGE { 0 } else { edge as u8 }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn payload(len: usize, fill: u8) -> Vec<u8> {
        vec![fill; len]
    }

    #[test]
    fn dimension_bytes() {
        assert_eq!(dimension_byte(1).unwrap(), 1);
        assert_eq!(dimension_byte(255).unwrap(), 255);
        assert_eq!(dimension_byte(256).unwrap(), 0);
        assert!(matches!(dimension_byte(0), Err(Error::SizeOverflow { size: 0 })));
        assert!(matches!(dimension_byte(257), Err(Error::SizeOverflow { size: 257 })));
    }

    #[test]
    fn single_entry_layout() {
        let container =
            IconContainer::from_images(vec![RenderedImage::square(16, payload(3, 0xAB))]).unwrap();
        let bytes = container.to_bytes().unwrap();

        let expected: &[u8] = b"\x00\x00\x01\x00\x01\x00\
                                \x10\x10\x00\x00\x01\x00\x20\x00\
                                \x03\x00\x00\x00\x16\x00\x00\x00\
                                \xab\xab\xab";
        assert_eq!(bytes.as_slice(), expected);
        assert_eq!(container.encoded_len(), bytes.len() as u64);
    }

    #[test]
    fn offsets_are_contiguous() {
        let sizes = [256, 128, 64, 48, 32, 24, 16];
        let images = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| RenderedImage::square(size, payload(10 + i * 7, i as u8)))
            .collect();
        let container = IconContainer::from_images(images).unwrap();
        let bytes = container.to_bytes().unwrap();

        let mut expected_offset = HEADER_LEN as u64 + ENTRY_LEN as u64 * sizes.len() as u64;
        for (i, entry) in container.entries().iter().enumerate() {
            assert_eq!(entry.offset as u64, expected_offset);
            assert_eq!(entry.width, sizes[i]);
            assert_eq!(entry.planes, 1);
            assert_eq!(entry.bits_per_pixel, 32);
            assert_eq!(
                &bytes[entry.offset as usize..entry.end() as usize],
                container.payload(i).unwrap()
            );
            expected_offset = entry.end();
        }
        assert_eq!(expected_offset, bytes.len() as u64);
    }

    #[test]
    fn size_256_is_written_as_zero() {
        let container =
            IconContainer::from_images(vec![RenderedImage::square(256, payload(1, 0))]).unwrap();
        let bytes = container.to_bytes().unwrap();
        assert_eq!(bytes[6], 0);
        assert_eq!(bytes[7], 0);

        let read = IconContainer::read(Cursor::new(bytes)).unwrap();
        assert_eq!(read.entries()[0].width, 256);
        assert_eq!(read.entries()[0].height, 256);
    }

    #[test]
    fn oversized_images_are_rejected() {
        for size in [0, 257, 512] {
            let err = IconContainer::from_images(vec![RenderedImage::square(size, payload(1, 0))])
                .unwrap_err();
            assert!(matches!(err, Error::SizeOverflow { size: s } if s == size));
        }

        let wide = RenderedImage {
            size: 16,
            width: 300,
            height: 16,
            data: payload(1, 0),
        };
        assert!(matches!(
            IconContainer::from_images(vec![wide]),
            Err(Error::SizeOverflow { size: 300 })
        ));
    }

    #[test]
    fn empty_container() {
        let container = IconContainer::from_images(Vec::new()).unwrap();
        assert!(container.is_empty());
        assert_eq!(container.to_bytes().unwrap(), b"\x00\x00\x01\x00\x00\x00");
    }

    #[test]
    fn read_back_written_container() {
        let images = vec![
            RenderedImage::square(48, payload(5, 1)),
            RenderedImage {
                size: 32,
                width: 32,
                height: 16,
                data: payload(9, 2),
            },
        ];
        let original = IconContainer::from_images(images).unwrap();
        let read = IconContainer::read(Cursor::new(original.to_bytes().unwrap())).unwrap();
        assert_eq!(read, original);
        assert_eq!(read.len(), 2);
        assert_eq!(read.entries()[1].height, 16);
    }

    #[test]
    fn read_rejects_bad_header() {
        let bad_reserved = b"\x01\x00\x01\x00\x00\x00";
        assert!(matches!(
            IconContainer::read(Cursor::new(bad_reserved)),
            Err(Error::Container(_))
        ));

        let cursor_file = b"\x00\x00\x02\x00\x00\x00";
        assert!(matches!(
            IconContainer::read(Cursor::new(cursor_file)),
            Err(Error::Container(_))
        ));
    }

    #[test]
    fn read_rejects_truncated_payload() {
        let mut bytes = IconContainer::from_images(vec![RenderedImage::square(16, payload(8, 3))])
            .unwrap()
            .to_bytes()
            .unwrap();
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(
            IconContainer::read(Cursor::new(bytes)),
            Err(Error::Container(_))
        ));
    }
}
