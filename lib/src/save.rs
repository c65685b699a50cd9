//! Saves the world as a short string that can be copied and pasted.
//!
//! The format, from the inside out:
//!
//! 1. The board is read row by row, one bit per cell (`1` for alive),
//!    eight cells to a byte, least significant bit first.
//!    Unused bits of the last byte are `0`.
//! 2. The packed bytes are compressed with raw DEFLATE.
//! 3. The length of the packed bytes is written before the compressed data
//!    as a 4-byte little-endian integer.
//! 4. The whole thing is encoded in standard base64.
//!
//! The size of the board is not part of the save; the loader must supply it.

use crate::{
    cells::CellPosition,
    error::{Error, Result},
    world::{check_size, World},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use flate2::{read::DeflateDecoder, write::DeflateEncoder, Compression};
use std::io::{Read, Write};

/// Size of the length prefix in bytes.
const PREFIX_LEN: usize = 4;

/// Number of bytes needed to pack `cells` bits.
#[inline]
const fn packed_len(cells: usize) -> usize {
    (cells + 7) / 8
}

/// Packs the world into one bit per cell, row-major.
fn pack(world: &World) -> Vec<u8> {
    let mut bytes = vec![0; packed_len(world.area())];
    let columns = world.columns() as usize;
    for pos in world.cells() {
        let index = pos.row as usize * columns + pos.col as usize;
        bytes[index / 8] |= 1 << (index % 8);
    }
    bytes
}

/// The inverse of [`pack`]. The caller has checked the length.
fn unpack(bytes: &[u8], rows: i32, columns: i32) -> Result<World> {
    let area = rows as usize * columns as usize;
    let cells = bytes
        .iter()
        .enumerate()
        .filter(|&(_, &byte)| byte != 0)
        .flat_map(|(i, &byte)| {
            (0..8)
                .filter(move |bit| byte & (1 << bit) != 0)
                .map(move |bit| i * 8 + bit)
        });
    let mut alive = Vec::new();
    for index in cells {
        if index >= area {
            return Err(Error::SizeMismatch {
                expected: area,
                found: bytes.len() * 8,
            });
        }
        alive.push(CellPosition::new(
            (index / columns as usize) as i32,
            (index % columns as usize) as i32,
        ));
    }
    World::from_cells(rows, columns, alive)
}

/// Saves the living cells of the world as a base64 string.
///
/// Only the cells are saved: neither the size of the world
/// nor its generation counter.
pub fn save(world: &World) -> String {
    let packed = pack(world);
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&packed)
        .expect("compressing into memory cannot fail");
    let compressed = encoder
        .finish()
        .expect("compressing into memory cannot fail");

    let len = u32::try_from(packed.len()).expect("the area of a world is bounded");
    let mut bytes = Vec::with_capacity(PREFIX_LEN + compressed.len());
    bytes.extend_from_slice(&len.to_le_bytes());
    bytes.extend_from_slice(&compressed);
    STANDARD.encode(bytes)
}

/// Restores a world of the given size from a string produced by [`save`].
///
/// Surrounding whitespace is ignored. Fails with
/// * [`Error::NonPositive`] or [`Error::TooLarge`] if no board has that size,
/// * [`Error::Decode`] if the string is not a valid save,
/// * [`Error::SizeMismatch`] if the save holds a different number of cells.
///
/// The returned world starts at generation 0.
pub fn load(text: &str, rows: i32, columns: i32) -> Result<World> {
    check_size(rows, columns)?;

    let bytes = STANDARD
        .decode(text.trim())
        .map_err(|e| Error::Decode(format!("invalid base64: {}", e)))?;
    if bytes.len() < PREFIX_LEN {
        return Err(Error::Decode(String::from("missing length prefix")));
    }
    let (prefix, compressed) = bytes.split_at(PREFIX_LEN);
    let mut len = [0; PREFIX_LEN];
    len.copy_from_slice(prefix);
    let len = u32::from_le_bytes(len) as usize;

    let area = rows as usize * columns as usize;
    if len != packed_len(area) {
        return Err(Error::SizeMismatch {
            expected: area,
            found: len.saturating_mul(8),
        });
    }

    // Reads at most one byte more than announced, so that a longer stream is
    // noticed without inflating all of it.
    let mut packed = Vec::new();
    DeflateDecoder::new(compressed)
        .take(len as u64 + 1)
        .read_to_end(&mut packed)
        .map_err(|e| Error::Decode(format!("invalid compressed data: {}", e)))?;
    if packed.len() != len {
        return Err(Error::Decode(format!(
            "expected {} bytes after decompression, found {}",
            len,
            packed.len()
        )));
    }
    unpack(&packed, rows, columns)
}
