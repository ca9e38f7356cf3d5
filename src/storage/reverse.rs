//! Backward line reader
//!
//! Reads a seekable source from its end in fixed-size chunks and yields
//! complete lines last-to-first. Only the chunks between the end of the file
//! and the line being looked for are ever read.

use std::io::{self, Read, Seek, SeekFrom};

/// Default chunk size for backward scans
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Iterator over the non-blank lines of a source, last line first
///
/// Each yielded line has surrounding ASCII whitespace (including `\r`)
/// removed. The partial line at the start of a chunk is carried over and
/// completed by the next chunk read.
pub struct ReverseLines<R> {
    reader: R,
    position: u64,
    chunk_size: usize,
    fragment: Vec<u8>,
    ready: Vec<Vec<u8>>,
    finished: bool,
}

impl<R: Read + Seek> ReverseLines<R> {
    /// Positions the reader at the end of the source
    pub fn new(mut reader: R, chunk_size: usize) -> io::Result<Self> {
        let position = reader.seek(SeekFrom::End(0))?;
        Ok(Self {
            reader,
            position,
            chunk_size: chunk_size.max(1),
            fragment: Vec::new(),
            ready: Vec::new(),
            finished: false,
        })
    }

    /// Reads the chunk preceding the current position and splits it into lines
    fn read_chunk(&mut self) -> io::Result<()> {
        let read_size = self.position.min(self.chunk_size as u64);
        self.position -= read_size;
        self.reader.seek(SeekFrom::Start(self.position))?;

        let mut chunk = vec![0u8; read_size as usize];
        self.reader.read_exact(&mut chunk)?;
        chunk.extend_from_slice(&self.fragment);

        let mut pieces = chunk.split(|byte| *byte == b'\n');
        let leading = pieces.next().unwrap_or_default().to_vec();
        // `ready` is a stack: the last complete line is popped first.
        self.ready.extend(pieces.map(<[u8]>::to_vec));
        self.fragment = leading;
        Ok(())
    }
}

impl<R: Read + Seek> Iterator for ReverseLines<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.ready.pop() {
                let trimmed = trim_line(&line);
                if !trimmed.is_empty() {
                    return Some(Ok(trimmed.to_vec()));
                }
                continue;
            }

            if self.finished {
                return None;
            }

            if self.position == 0 {
                self.finished = true;
                let first = std::mem::take(&mut self.fragment);
                let trimmed = trim_line(&first);
                if trimmed.is_empty() {
                    return None;
                }
                return Some(Ok(trimmed.to_vec()));
            }

            if let Err(e) = self.read_chunk() {
                self.finished = true;
                return Some(Err(e));
            }
        }
    }
}

fn trim_line(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|byte| !byte.is_ascii_whitespace())
        .map_or(start, |index| index + 1);
    &line[start..end]
}
