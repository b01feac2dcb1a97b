// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Persisted lexicon format.
//!
//! A depth-first pre-order dump. Each node record is:
//!
//! ```text
//! [terminal: 1 byte, 0 or 1]
//! [word length: varint][word bytes]        only when terminal
//! [child count: varint]
//! per child, in enumeration order:
//!   [label length: varint][label bytes]
//!   [the child's own record]
//! ```
//!
//! Varints are LEB128: 7 bits per byte, high bit set on continuation. After
//! the tree comes a fixed 16-byte trailer: `[node count: u64 LE]
//! [word byte count: u64 LE]`. A reader seeks to the trailer *first* and
//! preallocates the node arena and the text buffer before touching a single
//! record, so loading is two big allocations and one forward pass.
//!
//! Loading is all-or-nothing: any short read, over-long varint, count or
//! budget violation aborts with an error and every partially built buffer is
//! dropped. Every length field is checked against the trailer's budget
//! before it is trusted; nothing is repaired.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::key::Key;
use crate::lexicon::{Lexicon, Node};
use crate::store::ChildStore;
use crate::types::{LexiconConfig, NodeId, TextRange};

/// Size of the fixed trailer at the end of the stream.
pub const TRAILER_LEN: u64 = 16;

/// A u64 varint never needs more than this many bytes; anything longer is
/// corrupt input.
const MAX_VARINT_BYTES: usize = 10;

/// Distinct leading bytes cap the arity of any node.
const MAX_ARITY: u64 = 256;

// ============================================================================
// VARINT
// ============================================================================

fn write_varint<W: Write>(w: &mut W, mut value: u64) -> io::Result<()> {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            return w.write_all(&[byte]);
        }
        w.write_all(&[byte | 0x80])?;
    }
}

fn read_varint<R: Read>(r: &mut R) -> io::Result<u64> {
    let mut value = 0u64;
    let mut shift = 0u32;
    for _ in 0..MAX_VARINT_BYTES {
        let mut byte = [0u8; 1];
        r.read_exact(&mut byte)?;
        value |= u64::from(byte[0] & 0x7F) << shift;
        if byte[0] & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
    Err(bad_data("varint exceeds maximum length"))
}

fn bad_data(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_string())
}

// ============================================================================
// ENCODE
// ============================================================================

/// Serialize a lexicon. The stream can be handed back to [`decode`] as-is.
pub fn encode<W: Write>(w: &mut W, lexicon: &Lexicon) -> io::Result<()> {
    let mut node_count = 0u64;
    let mut word_bytes = 0u64;
    let mut stack = vec![NodeId::ROOT];
    while let Some(id) = stack.pop() {
        let node = lexicon.node(id);
        if id != NodeId::ROOT {
            let label = node.key.bytes();
            write_varint(w, label.len() as u64)?;
            w.write_all(label)?;
        }
        match node.word {
            Some(range) => {
                let bytes = range.bytes(&lexicon.text);
                w.write_all(&[1])?;
                write_varint(w, bytes.len() as u64)?;
                w.write_all(bytes)?;
                word_bytes += bytes.len() as u64;
            }
            None => w.write_all(&[0])?,
        }
        node_count += 1;
        write_varint(w, node.children.arity() as u64)?;
        let mut kids = Vec::with_capacity(node.children.arity());
        node.children.for_each(&mut |_, child| kids.push(child));
        while let Some(child) = kids.pop() {
            stack.push(child);
        }
    }
    w.write_all(&node_count.to_le_bytes())?;
    w.write_all(&word_bytes.to_le_bytes())?;
    Ok(())
}

// ============================================================================
// DECODE
// ============================================================================

/// One frame of the iterative pre-order decode: a parent still owed some
/// children.
struct Pending {
    parent: NodeId,
    remaining: u64,
}

/// Deserialize a lexicon written by [`encode`]. `config.store` decides the
/// child-store strategy of the loaded trie; labels keep whatever width they
/// were written with, so `config.key` only affects edges inserted later.
pub fn decode<R: Read + Seek>(r: &mut R, config: LexiconConfig) -> io::Result<Lexicon> {
    let end = r.seek(SeekFrom::End(0))?;
    if end < TRAILER_LEN {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stream shorter than the trailer",
        ));
    }
    r.seek(SeekFrom::End(-(TRAILER_LEN as i64)))?;
    let mut trailer = [0u8; TRAILER_LEN as usize];
    r.read_exact(&mut trailer)?;
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&trailer[..8]);
    let node_count = u64::from_le_bytes(buf);
    buf.copy_from_slice(&trailer[8..]);
    let byte_count = u64::from_le_bytes(buf);

    // every node record is at least two bytes, and both buffers must be
    // addressable by u32 ids and ranges
    let body = end - TRAILER_LEN;
    if node_count == 0 || node_count > body / 2 + 1 || node_count > u64::from(u32::MAX) {
        return Err(bad_data("implausible node count in trailer"));
    }
    if byte_count > body || byte_count > u64::from(u32::MAX) {
        return Err(bad_data("implausible text size in trailer"));
    }

    r.seek(SeekFrom::Start(0))?;
    let mut nodes: Vec<Node> = Vec::with_capacity(node_count as usize);
    let mut text: Vec<u8> = Vec::with_capacity(byte_count as usize);
    let mut label = Vec::new();

    let root_arity = read_record(r, config, Key::Empty, &mut nodes, &mut text, node_count, byte_count)?;
    let mut stack = vec![Pending {
        parent: NodeId::ROOT,
        remaining: root_arity,
    }];
    while let Some(top) = stack.last_mut() {
        if top.remaining == 0 {
            stack.pop();
            continue;
        }
        top.remaining -= 1;
        let parent = top.parent;

        let label_len = read_varint(r)?;
        if label_len == 0 {
            return Err(bad_data("empty edge label"));
        }
        if label_len > byte_count.max(1) {
            return Err(bad_data("edge label exceeds text budget"));
        }
        label.resize(label_len as usize, 0);
        r.read_exact(&mut label)?;
        let byte = label[0];
        if nodes[parent.index()].children.get(byte).is_some() {
            return Err(bad_data("children share a leading byte"));
        }
        let key = Key::from_label(&label);
        let arity = read_record(r, config, key, &mut nodes, &mut text, node_count, byte_count)?;
        let id = NodeId((nodes.len() - 1) as u32);
        nodes[parent.index()].children.attach(byte, id);
        stack.push(Pending {
            parent: id,
            remaining: arity,
        });
    }

    if nodes.len() as u64 != node_count {
        return Err(bad_data("node count does not match trailer"));
    }
    if text.len() as u64 != byte_count {
        return Err(bad_data("text size does not match trailer"));
    }
    if r.stream_position()? != end - TRAILER_LEN {
        return Err(bad_data("garbage between tree and trailer"));
    }
    Ok(Lexicon {
        nodes,
        text,
        config,
    })
}

/// Read one node record (flag, optional word, arity) and append the node.
/// Returns the node's arity; the caller wires up parentage.
fn read_record<R: Read>(
    r: &mut R,
    config: LexiconConfig,
    key: Key,
    nodes: &mut Vec<Node>,
    text: &mut Vec<u8>,
    node_count: u64,
    byte_count: u64,
) -> io::Result<u64> {
    if nodes.len() as u64 >= node_count {
        return Err(bad_data("more nodes than the trailer promised"));
    }
    let mut flag = [0u8; 1];
    r.read_exact(&mut flag)?;
    let word = match flag[0] {
        0 => None,
        1 => {
            let len = read_varint(r)?;
            if text.len() as u64 + len > byte_count {
                return Err(bad_data("word bytes exceed the trailer budget"));
            }
            let start = text.len();
            text.resize(start + len as usize, 0);
            r.read_exact(&mut text[start..])?;
            if std::str::from_utf8(&text[start..]).is_err() {
                return Err(bad_data("stored word is not UTF-8"));
            }
            Some(TextRange::new(start, len as usize))
        }
        _ => return Err(bad_data("terminal flag is neither 0 nor 1")),
    };
    let arity = read_varint(r)?;
    if arity > MAX_ARITY {
        return Err(bad_data("arity exceeds the byte alphabet"));
    }
    nodes.push(Node {
        key,
        word,
        children: ChildStore::new(config.store),
    });
    Ok(arity)
}
