//! Binary topology codec (spec.md §4.I).
//!
//! Only graph topology round-trips through this format. `entry_point`,
//! `max_layer`, hyperparameters and vector data are not persisted. A
//! restoring caller recomputes `max_layer = max(top_layer)` and picks any
//! node at that layer as the entry point, same as a fresh build's phase 1.
//!
//! The wire format prefixes the spec's record layout with a 4-byte magic
//! and a `u16` version, the upgrade this crate's design notes call for
//! over a bare, unversioned node count (see `DESIGN.md`).

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Cursor, Read, Write};

use crate::node::Node;
use crate::Error;

const MAGIC: &[u8; 4] = b"HNSW";
const VERSION: u16 = 1;

/// Encode a node slice into the self-describing binary format.
pub fn serialize(nodes: &[Node]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(MAGIC);
    buf.write_u16::<LittleEndian>(VERSION).unwrap();
    buf.write_u32::<LittleEndian>(nodes.len() as u32).unwrap();

    for node in nodes {
        buf.write_u32::<LittleEndian>(node.top_layer as u32).unwrap();
        for layer in 0..=node.top_layer {
            buf.write_u32::<LittleEndian>(node.neighbors(layer).len() as u32)
                .unwrap();
        }
        for layer in 0..=node.top_layer {
            let neighbors = node.neighbors(layer);
            buf.write_u32::<LittleEndian>(neighbors.len() as u32)
                .unwrap();
            for &id in neighbors {
                buf.write_u32::<LittleEndian>(id as u32).unwrap();
            }
        }
    }
    buf
}

/// Decode topology previously written by [`serialize`].
///
/// Each node is reconstructed with `vector_id` equal to its position in
/// the stream; the caller is responsible for re-associating these with
/// whatever external vector store the original graph was built over.
pub fn deserialize(bytes: &[u8]) -> Result<Vec<Node>, Error> {
    let mut cursor = Cursor::new(bytes);

    let mut magic = [0u8; 4];
    read_exact(&mut cursor, &mut magic)?;
    if &magic != MAGIC {
        return Err(Error::CorruptStream("bad magic".to_string()));
    }
    let version = read_u16(&mut cursor)?;
    if version != VERSION {
        return Err(Error::CorruptStream(format!(
            "unsupported version {version}"
        )));
    }

    let node_count = read_u32(&mut cursor)? as usize;
    let mut nodes = Vec::with_capacity(node_count);

    for vector_id in 0..node_count {
        let top_layer = read_u32(&mut cursor)? as usize;

        let mut connection_counts = Vec::with_capacity(top_layer + 1);
        for _ in 0..=top_layer {
            connection_counts.push(read_u32(&mut cursor)? as usize);
        }

        let mut node = Node::new(vector_id, top_layer);
        for (layer, &expected) in connection_counts.iter().enumerate() {
            let repeated = read_u32(&mut cursor)? as usize;
            if repeated != expected {
                return Err(Error::CorruptStream(format!(
                    "node {vector_id} layer {layer}: connection_count {expected} != repeated {repeated}"
                )));
            }
            for _ in 0..repeated {
                let neighbor = read_u32(&mut cursor)? as usize;
                node.add_neighbor(layer, neighbor);
            }
        }
        nodes.push(node);
    }

    Ok(nodes)
}

fn read_exact(cursor: &mut Cursor<&[u8]>, buf: &mut [u8]) -> Result<(), Error> {
    cursor
        .read_exact(buf)
        .map_err(|_| Error::CorruptStream("unexpected end of stream".to_string()))
}

fn read_u16(cursor: &mut Cursor<&[u8]>) -> Result<u16, Error> {
    map_eof(cursor.read_u16::<LittleEndian>())
}

fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32, Error> {
    map_eof(cursor.read_u32::<LittleEndian>())
}

fn map_eof<T>(result: io::Result<T>) -> Result<T, Error> {
    result.map_err(|_| Error::CorruptStream("unexpected end of stream".to_string()))
}
