use std::error::Error;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use byteorder::{ByteOrder, BE};

use crate::errors::{UnpackCause, UnpackError};

/// Sequential cursor over a byte source, decoding the big-endian
/// fixed-width shapes and count-prefixed tables the class file format is
/// made of. There is no way back: sub-structures always get a fresh
/// unpacker over their own payload buffer, so a short read in one
/// attribute cannot bleed into its neighbours.
///
/// When the source is a file handle it is released when the unpacker is
/// dropped, on success and error paths alike.
pub struct Unpacker<R> {
    stream: R,
}

impl<'a> Unpacker<&'a [u8]> {
    /// An unpacker over an in-memory buffer.
    pub fn new(data: &'a [u8]) -> Unpacker<&'a [u8]> {
        Unpacker { stream: data }
    }
}

impl Unpacker<BufReader<File>> {
    /// An unpacker reading from the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Unpacker<BufReader<File>>, std::io::Error> {
        Ok(Unpacker {
            stream: BufReader::new(File::open(path)?),
        })
    }
}

impl<R: Read> Unpacker<R> {
    /// An unpacker over any blocking reader.
    pub fn from_reader(stream: R) -> Unpacker<R> {
        Unpacker { stream }
    }

    fn fill(&mut self, buf: &mut [u8], format: &'static str) -> Result<(), Box<dyn Error>> {
        let mut present = 0;
        while present < buf.len() {
            let n = self.stream.read(&mut buf[present..])?;
            if n == 0 {
                break;
            }
            present += n;
        }
        if present < buf.len() {
            return Err(Box::new(UnpackError::new(
                UnpackCause::Truncated {
                    format,
                    wanted: buf.len(),
                    present,
                },
                "ran out of data",
            )));
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, Box<dyn Error>> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf, "u8")?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, Box<dyn Error>> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf, "u16")?;
        Ok(BE::read_u16(&buf))
    }

    pub fn read_u32(&mut self) -> Result<u32, Box<dyn Error>> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf, "u32")?;
        Ok(BE::read_u32(&buf))
    }

    pub fn read_i32(&mut self) -> Result<i32, Box<dyn Error>> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf, "i32")?;
        Ok(BE::read_i32(&buf))
    }

    pub fn read_u64(&mut self) -> Result<u64, Box<dyn Error>> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf, "u64")?;
        Ok(BE::read_u64(&buf))
    }

    pub fn read_i64(&mut self) -> Result<i64, Box<dyn Error>> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf, "i64")?;
        Ok(BE::read_i64(&buf))
    }

    pub fn read_f32(&mut self) -> Result<f32, Box<dyn Error>> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf, "f32")?;
        Ok(BE::read_f32(&buf))
    }

    pub fn read_f64(&mut self) -> Result<f64, Box<dyn Error>> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf, "f64")?;
        Ok(BE::read_f64(&buf))
    }

    /// The next `count` bytes as an owned buffer.
    pub fn read(&mut self, count: usize) -> Result<Vec<u8>, Box<dyn Error>> {
        let mut buf = vec![0u8; count];
        self.fill(&mut buf, "bytes")?;
        Ok(buf)
    }

    /// Reads a u16 count, then that many records through `read_one`.
    pub fn unpack_array<T, F>(&mut self, mut read_one: F) -> Result<Vec<T>, Box<dyn Error>>
    where
        F: FnMut(&mut Self) -> Result<T, Box<dyn Error>>,
    {
        let count = self.read_u16()?;
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            items.push(read_one(self)?);
        }
        Ok(items)
    }

    /// Reads a u16 count, then unpacks that many structures. Identical
    /// mechanics to [`unpack_array`](Unpacker::unpack_array); the name
    /// marks table-of-structures reads at call sites.
    pub fn unpack_objects<T, F>(&mut self, read_one: F) -> Result<Vec<T>, Box<dyn Error>>
    where
        F: FnMut(&mut Self) -> Result<T, Box<dyn Error>>,
    {
        self.unpack_array(read_one)
    }
}
