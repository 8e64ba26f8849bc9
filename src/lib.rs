//! Unpacks compiled Java class files into a navigable in-memory model:
//! the constant pool with its indirection and dereferencing rules,
//! fields and methods with lazily decoded attributes, Code bodies with
//! their exception and line-number tables, and pretty renderings close
//! to what the javap utility prints.
//!
//! Most of the structure here follows the class file chapter of the JVM
//! specification, through format version 52.0:
//! <https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html>

pub mod access_flags;
pub mod attributes;
pub mod class_file;
pub mod constants;
pub mod descriptors;
pub mod errors;
pub mod unpack;

use std::error::Error;
use std::path::Path;

use class_file::{ClassFile, JAVA_CLASS_MAGIC};
use unpack::Unpacker;

/// True when `data` starts with the class-file magic. Never errors.
pub fn is_class(data: &[u8]) -> bool {
    let mut up = Unpacker::new(data);
    matches!(up.read_u32(), Ok(JAVA_CLASS_MAGIC))
}

/// True when the file at `path` starts with the class-file magic.
pub fn is_class_file<P: AsRef<Path>>(path: P) -> bool {
    match Unpacker::open(path) {
        Ok(mut up) => matches!(up.read_u32(), Ok(JAVA_CLASS_MAGIC)),
        Err(_) => false,
    }
}

/// Parses a full class from an in-memory buffer.
pub fn unpack_class(data: &[u8]) -> Result<ClassFile, Box<dyn Error>> {
    let mut up = Unpacker::new(data);
    ClassFile::unpack(&mut up, None)
}

/// Opens and parses a class file. The handle is released once the
/// unpacker goes out of scope, on every exit path.
pub fn unpack_classfile<P: AsRef<Path>>(path: P) -> Result<ClassFile, Box<dyn Error>> {
    let mut up = Unpacker::open(path)?;
    ClassFile::unpack(&mut up, None)
}
