use std::error::Error;
use std::io::Read;

use crate::descriptors::{pretty_class, pretty_type, pretty_typeseq};
use crate::errors::{UnpackCause, UnpackError};
use crate::unpack::Unpacker;

/// Constant pool entry tags, as they appear on the wire.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Utf8 = 1,
    Integer = 3,
    Float = 4,
    Long = 5,
    Double = 6,
    Class = 7,
    String = 8,
    Fieldref = 9,
    Methodref = 10,
    InterfaceMethodref = 11,
    NameAndType = 12,
    ModuleId = 13,
    Unknown = 255,
}

impl From<u8> for Tag {
    fn from(value: u8) -> Self {
        match value {
            1 => Tag::Utf8,
            3 => Tag::Integer,
            4 => Tag::Float,
            5 => Tag::Long,
            6 => Tag::Double,
            7 => Tag::Class,
            8 => Tag::String,
            9 => Tag::Fieldref,
            10 => Tag::Methodref,
            11 => Tag::InterfaceMethodref,
            12 => Tag::NameAndType,
            13 => Tag::ModuleId,
            _ => Tag::Unknown,
        }
    }
}

/// A single constant pool entry. The index fields refer back into the
/// same pool, forming a shallow acyclic graph: a Class points at the
/// Utf8 holding its name, a Methodref points at a Class and a
/// NameAndType, and so on. Entries store the raw indices; resolution
/// happens on demand through [`ConstantPool`].
#[derive(Clone, Debug, PartialEq)]
pub enum Const {
    /// Decoded from Java's modified UTF-8 (see §4.4.7 of the JVM spec).
    Utf8(String),
    Integer(i32),
    Float(f32),
    /// Occupies two pool slots; the trailing slot stays empty.
    Long(i64),
    /// Occupies two pool slots; the trailing slot stays empty.
    Double(f64),
    Class {
        name_index: u16,
    },
    String {
        string_index: u16,
    },
    Fieldref {
        class_index: u16,
        name_and_type_index: u16,
    },
    Methodref {
        class_index: u16,
        name_and_type_index: u16,
    },
    InterfaceMethodref {
        class_index: u16,
        name_and_type_index: u16,
    },
    NameAndType {
        name_index: u16,
        descriptor_index: u16,
    },
    ModuleId {
        name_index: u16,
        version_index: u16,
    },
}

impl Const {
    pub fn tag(&self) -> Tag {
        match self {
            Const::Utf8(_) => Tag::Utf8,
            Const::Integer(_) => Tag::Integer,
            Const::Float(_) => Tag::Float,
            Const::Long(_) => Tag::Long,
            Const::Double(_) => Tag::Double,
            Const::Class { .. } => Tag::Class,
            Const::String { .. } => Tag::String,
            Const::Fieldref { .. } => Tag::Fieldref,
            Const::Methodref { .. } => Tag::Methodref,
            Const::InterfaceMethodref { .. } => Tag::InterfaceMethodref,
            Const::NameAndType { .. } => Tag::NameAndType,
            Const::ModuleId { .. } => Tag::ModuleId,
        }
    }
}

/// A fully dereferenced constant. Scalars resolve to themselves, Class
/// and String entries to their underlying text, and compound entries to
/// pairs of dereferenced components (a Methodref becomes its class name
/// paired with a name/descriptor pair).
#[derive(Clone, Debug, PartialEq)]
pub enum ConstValue {
    Str(String),
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Pair(Box<ConstValue>, Box<ConstValue>),
}

impl ConstValue {
    pub fn as_str(&self) -> Option<&str> {
        if let ConstValue::Str(s) = self {
            Some(s)
        } else {
            None
        }
    }
}

/// The constants pool. Indexed from 1; slot 0 never holds an entry, and
/// the slot after a Long or Double stays empty as well, exactly as the
/// count field in the file pretends.
#[derive(Clone, Debug, Default)]
pub struct ConstantPool {
    consts: Vec<Option<Const>>,
}

impl ConstantPool {
    pub fn unpack<R: Read>(up: &mut Unpacker<R>) -> Result<ConstantPool, Box<dyn Error>> {
        let count = up.read_u16()? as usize;
        log::trace!("unpacking constant pool, {count} slots");

        let mut consts: Vec<Option<Const>> = Vec::with_capacity(count.max(1));
        consts.push(None);
        while consts.len() < count {
            let item = read_const(up)?;
            let twoslot = matches!(item, Const::Long(_) | Const::Double(_));
            consts.push(Some(item));
            if twoslot {
                consts.push(None);
            }
        }
        Ok(ConstantPool { consts })
    }

    /// Number of slots, counting the unused slot 0.
    pub fn size(&self) -> u16 {
        self.consts.len() as u16
    }

    fn slot(&self, index: u16) -> Result<&Option<Const>, Box<dyn Error>> {
        if self.consts.is_empty() {
            return Err(Box::new(UnpackError::new(
                UnpackCause::NoPool,
                "constant pool was never unpacked",
            )));
        }
        if index == 0 {
            return Err(Box::new(UnpackError::new(
                UnpackCause::InvalidReference(0),
                "requested const 0",
            )));
        }
        self.consts.get(index as usize).ok_or_else(|| {
            Box::new(UnpackError::new(
                UnpackCause::InvalidReference(index),
                "constant index out of bounds",
            )) as Box<dyn Error>
        })
    }

    /// The raw entry at `index`, or None for the padding slot trailing a
    /// Long or Double.
    pub fn get_const(&self, index: u16) -> Result<Option<&Const>, Box<dyn Error>> {
        Ok(self.slot(index)?.as_ref())
    }

    fn entry(&self, index: u16) -> Result<&Const, Box<dyn Error>> {
        self.get_const(index)?.ok_or_else(|| {
            Box::new(UnpackError::new(
                UnpackCause::InvalidReference(index),
                "reference into a long/double padding slot",
            )) as Box<dyn Error>
        })
    }

    /// The Utf8 string at `index`; any other tag is an invalid
    /// reference.
    pub fn utf8_at(&self, index: u16) -> Result<&str, Box<dyn Error>> {
        match self.entry(index)? {
            Const::Utf8(s) => Ok(s),
            other => Err(Box::new(UnpackError::new(
                UnpackCause::InvalidReference(index),
                &format!("expected Utf8, found {:?}", other.tag()),
            ))),
        }
    }

    /// The internal class name behind the Class entry at `index`.
    pub fn class_name(&self, index: u16) -> Result<&str, Box<dyn Error>> {
        match self.entry(index)? {
            Const::Class { name_index } => self.utf8_at(*name_index),
            other => Err(Box::new(UnpackError::new(
                UnpackCause::InvalidReference(index),
                &format!("expected Class, found {:?}", other.tag()),
            ))),
        }
    }

    /// The (name, descriptor) strings behind the NameAndType entry at
    /// `index`.
    pub fn name_and_type(&self, index: u16) -> Result<(&str, &str), Box<dyn Error>> {
        match self.entry(index)? {
            Const::NameAndType {
                name_index,
                descriptor_index,
            } => Ok((self.utf8_at(*name_index)?, self.utf8_at(*descriptor_index)?)),
            other => Err(Box::new(UnpackError::new(
                UnpackCause::InvalidReference(index),
                &format!("expected NameAndType, found {:?}", other.tag()),
            ))),
        }
    }

    /// Resolves indirections. Scalars come back as themselves, Class and
    /// String entries as their Utf8 text, and compound entries as pairs
    /// of recursively dereferenced components. A pure function of the
    /// pool: repeated calls on the same index return equal values.
    pub fn deref_const(&self, index: u16) -> Result<ConstValue, Box<dyn Error>> {
        let pair = |a: u16, b: u16| -> Result<ConstValue, Box<dyn Error>> {
            Ok(ConstValue::Pair(
                Box::new(self.deref_const(a)?),
                Box::new(self.deref_const(b)?),
            ))
        };
        match self.entry(index)? {
            Const::Utf8(s) => Ok(ConstValue::Str(s.clone())),
            Const::Integer(v) => Ok(ConstValue::Int(*v)),
            Const::Float(v) => Ok(ConstValue::Float(*v)),
            Const::Long(v) => Ok(ConstValue::Long(*v)),
            Const::Double(v) => Ok(ConstValue::Double(*v)),
            Const::Class { name_index } => self.deref_const(*name_index),
            Const::String { string_index } => self.deref_const(*string_index),
            Const::Fieldref {
                class_index,
                name_and_type_index,
            }
            | Const::Methodref {
                class_index,
                name_and_type_index,
            }
            | Const::InterfaceMethodref {
                class_index,
                name_and_type_index,
            } => pair(*class_index, *name_and_type_index),
            Const::NameAndType {
                name_index,
                descriptor_index,
            } => pair(*name_index, *descriptor_index),
            Const::ModuleId {
                name_index,
                version_index,
            } => pair(*name_index, *version_index),
        }
    }

    /// Renders the end-value of a constant for human display: a String
    /// as its literal, a Class as its dotted name, member references as
    /// `owner.name:type` or `owner.name(args):return`, a NameAndType as
    /// `name:type`, a ModuleId as `name@version`. The padding slot after
    /// a Long or Double renders as nothing.
    pub fn pretty_deref_const(&self, index: u16) -> Result<String, Box<dyn Error>> {
        match self.slot(index)? {
            None => Ok(String::new()),
            Some(Const::String { string_index }) => Ok(self.utf8_at(*string_index)?.to_string()),
            Some(Const::Class { name_index }) => Ok(pretty_class(self.utf8_at(*name_index)?)),
            Some(Const::Fieldref {
                class_index,
                name_and_type_index,
            }) => {
                let owner = pretty_class(self.class_name(*class_index)?);
                let (name, desc) = self.name_and_type(*name_and_type_index)?;
                Ok(format!("{owner}.{name}:{}", pretty_type(desc)?))
            }
            Some(Const::Methodref {
                class_index,
                name_and_type_index,
            })
            | Some(Const::InterfaceMethodref {
                class_index,
                name_and_type_index,
            }) => {
                let owner = pretty_class(self.class_name(*class_index)?);
                let (name, desc) = self.name_and_type(*name_and_type_index)?;
                let types = pretty_typeseq(desc)?;
                let [args, ret] = types.as_slice() else {
                    return Err(Box::new(UnpackError::new(
                        UnpackCause::Unimplemented(format!("method descriptor {desc}")),
                        "expected a parameter list and a return type",
                    )));
                };
                Ok(format!("{owner}.{name}{args}:{ret}"))
            }
            Some(Const::NameAndType {
                name_index,
                descriptor_index,
            }) => {
                let name = self.utf8_at(*name_index)?;
                let types = pretty_typeseq(self.utf8_at(*descriptor_index)?)?;
                Ok(format!("{name}:{}", types.concat()))
            }
            Some(Const::ModuleId {
                name_index,
                version_index,
            }) => Ok(format!(
                "{}@{}",
                self.utf8_at(*name_index)?,
                self.utf8_at(*version_index)?
            )),
            Some(other) => Err(Box::new(UnpackError::new(
                UnpackCause::Unimplemented(format!("{:?}", other.tag())),
                "no pretty form for this constant type",
            ))),
        }
    }

    /// The javap-verbose rendering of one slot: a type label and a value
    /// string with `#index` placeholders for references. None for the
    /// padding slot after a Long or Double.
    pub fn pretty_const(
        &self,
        index: u16,
    ) -> Result<Option<(&'static str, String)>, Box<dyn Error>> {
        let entry = match self.slot(index)? {
            None => return Ok(None),
            Some(e) => e,
        };
        Ok(Some(match entry {
            Const::Utf8(s) => ("Utf8", s.escape_default().to_string()),
            Const::Integer(v) => ("int", v.to_string()),
            Const::Float(v) => ("float", format!("{v}f")),
            Const::Long(v) => ("long", format!("{v}l")),
            Const::Double(v) => ("double", format!("{v}d")),
            Const::Class { name_index } => ("class", format!("#{name_index}")),
            Const::String { string_index } => ("String", format!("#{string_index}")),
            Const::Fieldref {
                class_index,
                name_and_type_index,
            } => ("Field", format!("#{class_index}.#{name_and_type_index}")),
            Const::Methodref {
                class_index,
                name_and_type_index,
            } => ("Method", format!("#{class_index}.#{name_and_type_index}")),
            Const::InterfaceMethodref {
                class_index,
                name_and_type_index,
            } => (
                "InterfaceMethod",
                format!("#{class_index}.#{name_and_type_index}"),
            ),
            Const::NameAndType {
                name_index,
                descriptor_index,
            } => ("NameAndType", format!("#{name_index}:#{descriptor_index}")),
            Const::ModuleId {
                name_index,
                version_index,
            } => ("ModuleIdInfo", format!("#{name_index}@#{version_index}")),
        }))
    }

    /// The populated (index, entry) slots, in pool order.
    pub fn entries(&self) -> impl Iterator<Item = (u16, &Const)> {
        self.consts
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|c| (i as u16, c)))
    }

    /// Verifies that every cross-reference stored in the pool lands on
    /// an entry of the expected tag.
    pub fn check(&self) -> Result<(), Box<dyn Error>> {
        for (_, entry) in self.entries() {
            match entry {
                Const::Class { name_index } => {
                    self.utf8_at(*name_index)?;
                }
                Const::String { string_index } => {
                    self.utf8_at(*string_index)?;
                }
                Const::Fieldref {
                    class_index,
                    name_and_type_index,
                }
                | Const::Methodref {
                    class_index,
                    name_and_type_index,
                }
                | Const::InterfaceMethodref {
                    class_index,
                    name_and_type_index,
                } => {
                    self.class_name(*class_index)?;
                    self.name_and_type(*name_and_type_index)?;
                }
                Const::NameAndType {
                    name_index,
                    descriptor_index,
                } => {
                    self.utf8_at(*name_index)?;
                    self.utf8_at(*descriptor_index)?;
                }
                Const::ModuleId {
                    name_index,
                    version_index,
                } => {
                    self.utf8_at(*name_index)?;
                    self.utf8_at(*version_index)?;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn read_const<R: Read>(up: &mut Unpacker<R>) -> Result<Const, Box<dyn Error>> {
    let tag = up.read_u8()?;
    match Tag::from(tag) {
        Tag::Utf8 => {
            let length = up.read_u16()?;
            let raw = up.read(length as usize)?;
            Ok(Const::Utf8(decode_modified_utf8(raw)?))
        }
        Tag::Integer => Ok(Const::Integer(up.read_i32()?)),
        Tag::Float => Ok(Const::Float(up.read_f32()?)),
        Tag::Long => Ok(Const::Long(up.read_i64()?)),
        Tag::Double => Ok(Const::Double(up.read_f64()?)),
        Tag::Class => Ok(Const::Class {
            name_index: up.read_u16()?,
        }),
        Tag::String => Ok(Const::String {
            string_index: up.read_u16()?,
        }),
        Tag::Fieldref => Ok(Const::Fieldref {
            class_index: up.read_u16()?,
            name_and_type_index: up.read_u16()?,
        }),
        Tag::Methodref => Ok(Const::Methodref {
            class_index: up.read_u16()?,
            name_and_type_index: up.read_u16()?,
        }),
        Tag::InterfaceMethodref => Ok(Const::InterfaceMethodref {
            class_index: up.read_u16()?,
            name_and_type_index: up.read_u16()?,
        }),
        Tag::NameAndType => Ok(Const::NameAndType {
            name_index: up.read_u16()?,
            descriptor_index: up.read_u16()?,
        }),
        Tag::ModuleId => Ok(Const::ModuleId {
            name_index: up.read_u16()?,
            version_index: up.read_u16()?,
        }),
        Tag::Unknown => Err(Box::new(UnpackError::new(
            UnpackCause::Unimplemented(format!("constant tag {tag}")),
            "unknown constant pool tag",
        ))),
    }
}

/// Java's modified UTF-8 encodes U+0000 as the two-byte sequence
/// 0xC0 0x80 and supplementary code points as paired surrogate
/// triplets. Strictly valid UTF-8 passes through untouched; on failure
/// the embedded-null form is substituted and decoding retried.
fn decode_modified_utf8(raw: Vec<u8>) -> Result<String, Box<dyn Error>> {
    let raw = match String::from_utf8(raw) {
        Ok(s) => return Ok(s),
        Err(e) => e.into_bytes(),
    };
    let mut patched = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == 0xC0 && raw.get(i + 1) == Some(&0x80) {
            patched.push(0x00);
            i += 2;
        } else {
            patched.push(raw[i]);
            i += 1;
        }
    }
    String::from_utf8(patched).map_err(|_| {
        Box::new(UnpackError::new(
            UnpackCause::Unimplemented("modified utf-8 string".into()),
            "Utf8 constant is not valid modified UTF-8",
        )) as Box<dyn Error>
    })
}
