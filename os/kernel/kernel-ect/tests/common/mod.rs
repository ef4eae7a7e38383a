//! Little-endian blob builder shared by the integration tests.

#![allow(dead_code, clippy::cast_possible_truncation)]

/// One record body, written word by word.
#[derive(Debug, Clone, Default)]
pub struct Body(Vec<u8>);

impl Body {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u32(mut self, value: u32) -> Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn i32(mut self, value: i32) -> Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn words(self, values: &[u32]) -> Self {
        values.iter().fold(self, |body, &v| body.u32(v))
    }

    /// Low word first.
    pub fn u64(self, value: u64) -> Self {
        self.u32(value as u32).u32((value >> 32) as u32)
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        self
    }

    pub fn string(mut self, s: &str) -> Self {
        put_string(&mut self.0, s);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// `strlen` word, bytes, NUL, padding to 4.
pub fn put_string(out: &mut Vec<u8>, s: &str) {
    let start = out.len();
    out.extend_from_slice(&(s.len() as u32).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
    out.push(0);
    while (out.len() - start) % 4 != 0 {
        out.push(0);
    }
}

#[derive(Debug, Clone)]
enum Key {
    Name(String),
    Wide(u64),
}

/// A named block: header, key/offset table, then record bodies.
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    parser_version: u32,
    version: [u8; 4],
    records: Vec<(Key, Body)>,
}

impl BlockBuilder {
    pub fn new(parser_version: u32) -> Self {
        Self {
            parser_version,
            version: *b"0001",
            records: Vec::new(),
        }
    }

    pub fn record(mut self, name: &str, body: Body) -> Self {
        self.records.push((Key::Name(name.to_owned()), body));
        self
    }

    pub fn keyed(mut self, key: u64, body: Body) -> Self {
        self.records.push((Key::Wide(key), body));
        self
    }

    fn encode_table(&self, offsets: &[u32]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.parser_version.to_le_bytes());
        out.extend_from_slice(&self.version);
        out.extend_from_slice(&(self.records.len() as u32).to_le_bytes());
        for ((key, _), offset) in self.records.iter().zip(offsets) {
            match key {
                Key::Name(name) => put_string(&mut out, name),
                Key::Wide(key) => {
                    out.extend_from_slice(&(*key as u32).to_le_bytes());
                    out.extend_from_slice(&((*key >> 32) as u32).to_le_bytes());
                }
            }
            out.extend_from_slice(&offset.to_le_bytes());
        }
        out
    }

    /// Encoded block; body offsets are relative to its first byte.
    pub fn encode(&self) -> Vec<u8> {
        let table_len = self.encode_table(&vec![0; self.records.len()]).len();

        let mut offsets = Vec::new();
        let mut at = table_len;
        for (_, body) in &self.records {
            offsets.push(at as u32);
            at += body.len();
        }

        let mut out = self.encode_table(&offsets);
        for (_, body) in &self.records {
            out.extend_from_slice(&body.0);
        }
        out
    }
}

/// A whole blob: header, directory, then the blocks back to back.
#[derive(Debug, Clone)]
pub struct EctBuilder {
    sign: [u8; 4],
    version: [u8; 4],
    total_size: Option<u32>,
    blocks: Vec<(String, Vec<u8>)>,
}

impl Default for EctBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EctBuilder {
    pub fn new() -> Self {
        Self {
            sign: *b"PARA",
            version: *b"0001",
            total_size: None,
            blocks: Vec::new(),
        }
    }

    pub fn sign(mut self, sign: [u8; 4]) -> Self {
        self.sign = sign;
        self
    }

    /// Override the declared size; by default it is the encoded length.
    pub fn total_size(mut self, total_size: u32) -> Self {
        self.total_size = Some(total_size);
        self
    }

    pub fn block(mut self, name: &str, block: &BlockBuilder) -> Self {
        self.blocks.push((name.to_owned(), block.encode()));
        self
    }

    /// A directory entry with arbitrary bytes behind it.
    pub fn raw_block(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.blocks.push((name.to_owned(), bytes));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut directory_len = 0;
        for (name, _) in &self.blocks {
            let mut scratch = Vec::new();
            put_string(&mut scratch, name);
            directory_len += scratch.len() + 4;
        }

        let mut out = Vec::new();
        out.extend_from_slice(&self.sign);
        out.extend_from_slice(&self.version);
        out.extend_from_slice(&0_u32.to_le_bytes());
        out.extend_from_slice(&(self.blocks.len() as u32).to_le_bytes());

        let mut at = 16 + directory_len;
        for (name, bytes) in &self.blocks {
            put_string(&mut out, name);
            out.extend_from_slice(&(at as u32).to_le_bytes());
            at += bytes.len();
        }
        for (_, bytes) in &self.blocks {
            out.extend_from_slice(bytes);
        }

        let total = self.total_size.unwrap_or(out.len() as u32);
        out[8..12].copy_from_slice(&total.to_le_bytes());
        out
    }
}

/// The PLL block used by several tests: one `CPU_PLL` at 1.6 GHz.
pub fn cpu_pll_block() -> BlockBuilder {
    BlockBuilder::new(1).record(
        "CPU_PLL",
        Body::new().u32(0).u32(1).words(&[1_600_000, 3, 100, 2, 0]),
    )
}
