//! Attribute tables hang off class, member, and code structures. Each
//! entry is a name (resolved through the constant pool) and an opaque,
//! length-prefixed payload; what the bytes mean depends on the name and
//! on which structure carries the table. Payloads are stored raw and
//! decoded on demand by whoever knows the name, so unrecognized
//! attributes survive untouched.

use std::collections::HashMap;
use std::error::Error;
use std::io::Read;

use crate::constants::ConstantPool;
use crate::unpack::Unpacker;

/// A name-to-payload attribute table. Duplicate names are possible in
/// the file format; the last payload seen wins.
#[derive(Clone, Debug, Default)]
pub struct AttributeTable {
    attribs: HashMap<String, Vec<u8>>,
}

impl AttributeTable {
    pub fn unpack<R: Read>(
        up: &mut Unpacker<R>,
        cpool: &ConstantPool,
    ) -> Result<AttributeTable, Box<dyn Error>> {
        let count = up.read_u16()?;
        let mut attribs = HashMap::with_capacity(count as usize);
        for _ in 0..count {
            let name_ref = up.read_u16()?;
            let size = up.read_u32()?;
            let name = cpool.utf8_at(name_ref)?.to_string();
            attribs.insert(name, up.read(size as usize)?);
        }
        Ok(AttributeTable { attribs })
    }

    /// The raw payload stored under `name`.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.attribs.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.attribs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attribs.is_empty()
    }

    /// The stored attribute names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attribs.keys().map(String::as_str)
    }
}

/// One row of a Code attribute's exception-handler table. The catch
/// type is resolved to its class name during unpack, so comparing and
/// hashing handlers does not depend on pool indices.
#[derive(Clone, Debug)]
pub struct ExceptionInfo {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    /// Zero denotes a catch-all entry.
    pub catch_type_ref: u16,
    catch_type: Option<String>,
}

impl ExceptionInfo {
    pub fn unpack<R: Read>(
        up: &mut Unpacker<R>,
        cpool: &ConstantPool,
    ) -> Result<ExceptionInfo, Box<dyn Error>> {
        let start_pc = up.read_u16()?;
        let end_pc = up.read_u16()?;
        let handler_pc = up.read_u16()?;
        let catch_type_ref = up.read_u16()?;
        let catch_type = if catch_type_ref == 0 {
            None
        } else {
            Some(cpool.class_name(catch_type_ref)?.to_string())
        };
        Ok(ExceptionInfo {
            start_pc,
            end_pc,
            handler_pc,
            catch_type_ref,
            catch_type,
        })
    }

    /// The handled class name, or None for a catch-all entry.
    pub fn get_catch_type(&self) -> Option<&str> {
        self.catch_type.as_deref()
    }

    pub fn pretty_catch_type(&self) -> String {
        match self.catch_type.as_deref() {
            Some(name) => format!("Class {name}"),
            None => "any".to_string(),
        }
    }

    /// The four fields this entry compares and hashes by.
    pub fn info(&self) -> (u16, u16, u16, Option<&str>) {
        (
            self.start_pc,
            self.end_pc,
            self.handler_pc,
            self.catch_type.as_deref(),
        )
    }
}

impl PartialEq for ExceptionInfo {
    fn eq(&self, other: &ExceptionInfo) -> bool {
        self.info() == other.info()
    }
}

impl Eq for ExceptionInfo {}

impl std::hash::Hash for ExceptionInfo {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.info().hash(state);
    }
}

/// A LineNumberTable row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineNumber {
    pub start_pc: u16,
    pub line_number: u16,
}

/// A LocalVariableTable or LocalVariableTypeTable row; in the type
/// table the descriptor index holds a generic signature instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalVariable {
    pub start_pc: u16,
    pub length: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub index: u16,
}

/// The decoded body of a method's Code attribute: stack and local
/// limits, the raw bytecode, the exception-handler table, and a nested
/// attribute table of its own. The bytecode stays an opaque buffer;
/// interpreting it belongs to an external opcode table plugged in
/// through [`Disassemble`].
#[derive(Clone, Debug)]
pub struct CodeInfo {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exceptions: Vec<ExceptionInfo>,
    pub attribs: AttributeTable,
}

impl CodeInfo {
    pub fn unpack<R: Read>(
        up: &mut Unpacker<R>,
        cpool: &ConstantPool,
    ) -> Result<CodeInfo, Box<dyn Error>> {
        let max_stack = up.read_u16()?;
        let max_locals = up.read_u16()?;
        let code_length = up.read_u32()?;
        let code = up.read(code_length as usize)?;
        let exceptions = up.unpack_objects(|up| ExceptionInfo::unpack(up, cpool))?;
        let attribs = AttributeTable::unpack(up, cpool)?;
        Ok(CodeInfo {
            max_stack,
            max_locals,
            code,
            exceptions,
            attribs,
        })
    }

    pub fn get_attribute(&self, name: &str) -> Option<&[u8]> {
        self.attribs.get(name)
    }

    /// The LineNumberTable rows, or empty when the attribute is absent.
    pub fn get_linenumbertable(&self) -> Result<Vec<LineNumber>, Box<dyn Error>> {
        let buff = match self.get_attribute("LineNumberTable") {
            Some(b) => b,
            None => return Ok(Vec::new()),
        };
        let mut up = Unpacker::new(buff);
        up.unpack_array(|up| {
            Ok(LineNumber {
                start_pc: up.read_u16()?,
                line_number: up.read_u16()?,
            })
        })
    }

    /// The line-number rows rebased so the method's first executable
    /// line is 0.
    pub fn get_relativelinenumbertable(&self) -> Result<Vec<(u16, i32)>, Box<dyn Error>> {
        let lnt = self.get_linenumbertable()?;
        match lnt.first() {
            None => Ok(Vec::new()),
            Some(first) => {
                let base = first.line_number as i32;
                Ok(lnt
                    .iter()
                    .map(|row| (row.start_pc, row.line_number as i32 - base))
                    .collect())
            }
        }
    }

    pub fn get_localvariabletable(&self) -> Result<Vec<LocalVariable>, Box<dyn Error>> {
        match self.get_attribute("LocalVariableTable") {
            Some(b) => unpack_locals(b),
            None => Ok(Vec::new()),
        }
    }

    pub fn get_localvariabletypetable(&self) -> Result<Vec<LocalVariable>, Box<dyn Error>> {
        match self.get_attribute("LocalVariableTypeTable") {
            Some(b) => unpack_locals(b),
            None => Ok(Vec::new()),
        }
    }

    /// The source line for a code offset: the line of the greatest
    /// start_pc at or below `pc`, or -1 when the table is empty or the
    /// offset precedes every entry.
    pub fn get_line_for_offset(&self, pc: u16) -> Result<i32, Box<dyn Error>> {
        let mut prev = -1;
        for row in self.get_linenumbertable()? {
            if row.start_pc < pc {
                prev = row.line_number as i32;
            } else if row.start_pc == pc {
                return Ok(row.line_number as i32);
            } else {
                return Ok(prev);
            }
        }
        Ok(prev)
    }

    /// Forwards the raw bytecode to an external opcode table.
    pub fn disassemble(&self, dis: &dyn Disassemble) -> Vec<(usize, String, Vec<String>)> {
        dis.disassemble(&self.code)
    }
}

fn unpack_locals(buff: &[u8]) -> Result<Vec<LocalVariable>, Box<dyn Error>> {
    let mut up = Unpacker::new(buff);
    up.unpack_array(|up| {
        Ok(LocalVariable {
            start_pc: up.read_u16()?,
            length: up.read_u16()?,
            name_index: up.read_u16()?,
            descriptor_index: up.read_u16()?,
            index: up.read_u16()?,
        })
    })
}

/// Decoding individual instructions is outside this crate; a
/// bytecode-savvy caller plugs in here.
pub trait Disassemble {
    /// Rows of (offset, mnemonic, arguments) for the given code bytes.
    fn disassemble(&self, code: &[u8]) -> Vec<(usize, String, Vec<String>)>;
}

/// One InnerClasses row. Any of the reference fields may be zero,
/// meaning "not applicable": anonymous classes have no name, top-level
/// members no outer info.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InnerClassInfo {
    pub inner_info_ref: u16,
    pub outer_info_ref: u16,
    pub name_ref: u16,
    pub access_flags: u16,
}

impl InnerClassInfo {
    pub fn unpack<R: Read>(up: &mut Unpacker<R>) -> Result<InnerClassInfo, Box<dyn Error>> {
        Ok(InnerClassInfo {
            inner_info_ref: up.read_u16()?,
            outer_info_ref: up.read_u16()?,
            name_ref: up.read_u16()?,
            access_flags: up.read_u16()?,
        })
    }

    /// The simple name, or None for anonymous classes.
    pub fn get_name<'a>(&self, cpool: &'a ConstantPool) -> Result<Option<&'a str>, Box<dyn Error>> {
        if self.name_ref == 0 {
            return Ok(None);
        }
        Ok(Some(cpool.utf8_at(self.name_ref)?))
    }
}
