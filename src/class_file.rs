use std::collections::BTreeSet;
use std::error::Error;
use std::io::Read;
use std::sync::OnceLock;

use crate::access_flags::*;
use crate::attributes::{AttributeTable, CodeInfo, InnerClassInfo};
use crate::constants::{ConstValue, ConstantPool, Tag};
use crate::descriptors::{self, pretty_class};
use crate::errors::{UnpackCause, UnpackError};
use crate::unpack::Unpacker;

/// The four bytes at the start of every class file.
pub const JAVA_CLASS_MAGIC: u32 = 0xCAFE_BABE;

/// A field or method of a class. Holds the access-flag mask, raw pool
/// references for its name and descriptor, and its attribute table;
/// everything interesting is dereferenced on demand against the owning
/// class's pool.
#[derive(Clone, Debug)]
pub struct MemberInfo {
    pub access_flags: u16,
    pub name_ref: u16,
    pub descriptor_ref: u16,
    pub attribs: AttributeTable,
    is_method: bool,
}

impl MemberInfo {
    pub fn unpack<R: Read>(
        up: &mut Unpacker<R>,
        cpool: &ConstantPool,
        is_method: bool,
    ) -> Result<MemberInfo, Box<dyn Error>> {
        let access_flags = up.read_u16()?;
        let name_ref = up.read_u16()?;
        let descriptor_ref = up.read_u16()?;
        let attribs = AttributeTable::unpack(up, cpool)?;
        Ok(MemberInfo {
            access_flags,
            name_ref,
            descriptor_ref,
            attribs,
            is_method,
        })
    }

    pub fn is_method(&self) -> bool {
        self.is_method
    }

    pub fn get_attribute(&self, name: &str) -> Option<&[u8]> {
        self.attribs.get(name)
    }

    pub fn get_name<'a>(&self, cpool: &'a ConstantPool) -> Result<&'a str, Box<dyn Error>> {
        cpool.utf8_at(self.name_ref)
    }

    pub fn get_descriptor<'a>(&self, cpool: &'a ConstantPool) -> Result<&'a str, Box<dyn Error>> {
        cpool.utf8_at(self.descriptor_ref)
    }

    pub fn is_public(&self) -> bool {
        self.access_flags & ACC_PUBLIC != 0
    }

    pub fn is_private(&self) -> bool {
        self.access_flags & ACC_PRIVATE != 0
    }

    pub fn is_protected(&self) -> bool {
        self.access_flags & ACC_PROTECTED != 0
    }

    pub fn is_static(&self) -> bool {
        self.access_flags & ACC_STATIC != 0
    }

    pub fn is_final(&self) -> bool {
        self.access_flags & ACC_FINAL != 0
    }

    pub fn is_synchronized(&self) -> bool {
        self.access_flags & ACC_SYNCHRONIZED != 0
    }

    pub fn is_native(&self) -> bool {
        self.access_flags & ACC_NATIVE != 0
    }

    pub fn is_abstract(&self) -> bool {
        self.access_flags & ACC_ABSTRACT != 0
    }

    pub fn is_strict(&self) -> bool {
        self.access_flags & ACC_STRICT != 0
    }

    pub fn is_volatile(&self) -> bool {
        self.access_flags & ACC_VOLATILE != 0
    }

    pub fn is_transient(&self) -> bool {
        self.access_flags & ACC_TRANSIENT != 0
    }

    pub fn is_bridge(&self) -> bool {
        self.access_flags & ACC_BRIDGE != 0
    }

    pub fn is_varargs(&self) -> bool {
        self.access_flags & ACC_VARARGS != 0
    }

    pub fn is_enum(&self) -> bool {
        self.access_flags & ACC_ENUM != 0
    }

    pub fn is_module(&self) -> bool {
        self.access_flags & ACC_MODULE != 0
    }

    /// Synthetic members are marked either by the flag bit or by a
    /// Synthetic attribute, depending on compiler vintage.
    pub fn is_synthetic(&self) -> bool {
        self.access_flags & ACC_SYNTHETIC != 0 || self.get_attribute("Synthetic").is_some()
    }

    pub fn is_deprecated(&self) -> bool {
        self.get_attribute("Deprecated").is_some()
    }

    /// The Signature attribute, carrying the generics-aware type.
    pub fn get_signature<'a>(
        &self,
        cpool: &'a ConstantPool,
    ) -> Result<Option<&'a str>, Box<dyn Error>> {
        let buff = match self.get_attribute("Signature") {
            Some(b) => b,
            None => return Ok(None),
        };
        let mut up = Unpacker::new(buff);
        let type_index = up.read_u16()?;
        Ok(Some(cpool.utf8_at(type_index)?))
    }

    /// The Module attribute rendered as `name@version`.
    pub fn get_module(&self, cpool: &ConstantPool) -> Result<Option<String>, Box<dyn Error>> {
        let buff = match self.get_attribute("Module") {
            Some(b) => b,
            None => return Ok(None),
        };
        let mut up = Unpacker::new(buff);
        let module_index = up.read_u16()?;
        Ok(Some(cpool.pretty_deref_const(module_index)?))
    }

    /// The decoded Code attribute of a non-abstract method, or None.
    pub fn get_code(&self, cpool: &ConstantPool) -> Result<Option<CodeInfo>, Box<dyn Error>> {
        let buff = match self.get_attribute("Code") {
            Some(b) => b,
            None => return Ok(None),
        };
        let mut up = Unpacker::new(buff);
        Ok(Some(CodeInfo::unpack(&mut up, cpool)?))
    }

    /// The class names in this method's throws clause.
    pub fn get_exceptions(&self, cpool: &ConstantPool) -> Result<Vec<String>, Box<dyn Error>> {
        let buff = match self.get_attribute("Exceptions") {
            Some(b) => b,
            None => return Ok(Vec::new()),
        };
        let mut up = Unpacker::new(buff);
        let refs = up.unpack_array(|up| up.read_u16())?;
        refs.into_iter()
            .map(|r| Ok(cpool.class_name(r)?.to_string()))
            .collect()
    }

    /// The constant pool index held by a field's ConstantValue
    /// attribute, or None for non-constant fields.
    pub fn get_constantvalue(&self) -> Result<Option<u16>, Box<dyn Error>> {
        let buff = match self.get_attribute("ConstantValue") {
            Some(b) => b,
            None => return Ok(None),
        };
        let mut up = Unpacker::new(buff);
        Ok(Some(up.read_u16()?))
    }

    /// The resolved value behind [`get_constantvalue`](MemberInfo::get_constantvalue).
    pub fn deref_constantvalue(
        &self,
        cpool: &ConstantPool,
    ) -> Result<Option<ConstValue>, Box<dyn Error>> {
        match self.get_constantvalue()? {
            Some(index) => Ok(Some(cpool.deref_const(index)?)),
            None => Ok(None),
        }
    }

    /// The type descriptor token for a field, or the return type token
    /// for a method.
    pub fn get_type_descriptor<'a>(
        &self,
        cpool: &'a ConstantPool,
    ) -> Result<&'a str, Box<dyn Error>> {
        let tokens = descriptors::typeseq(self.get_descriptor(cpool)?)?;
        tokens.last().copied().ok_or_else(|| {
            Box::new(UnpackError::new(
                UnpackCause::Unimplemented("empty descriptor".into()),
                "member descriptor holds no type",
            )) as Box<dyn Error>
        })
    }

    /// The parameter type tokens of a method; empty for fields.
    pub fn get_arg_type_descriptors<'a>(
        &self,
        cpool: &'a ConstantPool,
    ) -> Result<Vec<&'a str>, Box<dyn Error>> {
        if !self.is_method {
            return Ok(Vec::new());
        }
        let desc = self.get_descriptor(cpool)?;
        let tokens = descriptors::typeseq(desc)?;
        let params = match tokens.first() {
            Some(p) if p.starts_with('(') => *p,
            _ => {
                return Err(Box::new(UnpackError::new(
                    UnpackCause::Unimplemented(format!("method descriptor {desc}")),
                    "missing parameter list",
                )))
            }
        };
        descriptors::typeseq(&params[1..params.len() - 1])
    }

    pub fn pretty_type(&self, cpool: &ConstantPool) -> Result<String, Box<dyn Error>> {
        descriptors::pretty_type(self.get_type_descriptor(cpool)?)
    }

    pub fn pretty_arg_types(&self, cpool: &ConstantPool) -> Result<Vec<String>, Box<dyn Error>> {
        self.get_arg_type_descriptors(cpool)?
            .into_iter()
            .map(descriptors::pretty_type)
            .collect()
    }

    /// Access-flag keywords in declaration order. The compiler-marker
    /// keywords (synthetic, bridge, varargs) only appear when `all` is
    /// set.
    pub fn pretty_access_flags(&self, all: bool) -> Vec<&'static str> {
        let mut words = Vec::new();
        if self.is_public() {
            words.push("public");
        }
        if self.is_private() {
            words.push("private");
        }
        if self.is_protected() {
            words.push("protected");
        }
        if self.is_static() {
            words.push("static");
        }
        if self.is_final() {
            words.push("final");
        }
        if self.is_strict() {
            words.push("strict");
        }
        if self.is_native() {
            words.push("native");
        }
        if self.is_abstract() {
            words.push("abstract");
        }
        if self.is_enum() {
            words.push("enum");
        }
        if self.is_module() {
            words.push("module");
        }
        if all && self.is_synthetic() {
            words.push("synthetic");
        }
        if self.is_method {
            if self.is_synchronized() {
                words.push("synchronized");
            }
            if all && self.is_bridge() {
                words.push("bridge");
            }
            if all && self.is_varargs() {
                words.push("varargs");
            }
        } else {
            if self.is_transient() {
                words.push("transient");
            }
            if self.is_volatile() {
                words.push("volatile");
            }
        }
        words
    }

    pub fn pretty_exceptions(&self, cpool: &ConstantPool) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(self
            .get_exceptions(cpool)?
            .iter()
            .map(|e| pretty_class(e))
            .collect())
    }

    /// One human-readable declaration: flags, type, name with its
    /// argument list for methods, and a throws clause as applicable.
    /// Constructors keep the `<init>` name but drop the void return
    /// type.
    pub fn pretty_descriptor(&self, cpool: &ConstantPool) -> Result<String, Box<dyn Error>> {
        let flags = self.pretty_access_flags(false).join(" ");
        let name = self.get_name(cpool)?;
        let member_type = if name == "<init>" {
            None
        } else {
            Some(self.pretty_type(cpool)?)
        };
        let ident = if self.is_method {
            format!("{}({})", name, self.pretty_arg_types(cpool)?.join(","))
        } else {
            name.to_string()
        };
        let throws = self.pretty_exceptions(cpool)?.join(",");

        let mut parts: Vec<String> = Vec::new();
        if !flags.is_empty() {
            parts.push(flags);
        }
        if let Some(t) = member_type {
            parts.push(t);
        }
        parts.push(ident);
        if !throws.is_empty() {
            parts.push(format!("throws {throws}"));
        }
        Ok(parts.join(" "))
    }

    /// Canonical identity within the class: the bare name for fields,
    /// `name(argDescriptors)` for methods. Bridge methods additionally
    /// carry their full descriptor as a suffix, so two bridges differing
    /// only in return type stay distinct.
    pub fn get_identifier(&self, cpool: &ConstantPool) -> Result<String, Box<dyn Error>> {
        let name = self.get_name(cpool)?;
        if !self.is_method {
            return Ok(name.to_string());
        }
        let args = self.get_arg_type_descriptors(cpool)?.join(",");
        if self.is_bridge() {
            Ok(format!("{name}({args}):{}", self.get_descriptor(cpool)?))
        } else {
            Ok(format!("{name}({args})"))
        }
    }

    /// The display form of [`get_identifier`](MemberInfo::get_identifier):
    /// pretty argument types and a trailing pretty member type.
    pub fn pretty_identifier(&self, cpool: &ConstantPool) -> Result<String, Box<dyn Error>> {
        let name = self.get_name(cpool)?;
        let ident = if self.is_method {
            format!("{}({})", name, self.pretty_arg_types(cpool)?.join(","))
        } else {
            name.to_string()
        };
        Ok(format!("{ident}:{}", self.pretty_type(cpool)?))
    }
}

/// A fully decoded class file. Immutable once unpacked; the derived
/// provides/requires sets are memoized behind single-assignment cells,
/// so sharing a parsed class across threads for read-only inspection is
/// safe.
#[derive(Clone, Debug)]
pub struct ClassFile {
    pub magic: u32,
    /// Stored as (major, minor); the file serializes minor first.
    pub version: (u16, u16),
    pub cpool: ConstantPool,
    pub access_flags: u16,
    pub this_ref: u16,
    pub super_ref: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<MemberInfo>,
    pub methods: Vec<MemberInfo>,
    pub attribs: AttributeTable,
    provides: OnceLock<BTreeSet<String>>,
    provides_private: OnceLock<BTreeSet<String>>,
    requires: OnceLock<BTreeSet<String>>,
}

impl ClassFile {
    /// Unpacks a whole class from the stream. If the magic header was
    /// already read off (say, by a sniffing check), pass the value
    /// through `magic` and it will not be read again.
    pub fn unpack<R: Read>(
        up: &mut Unpacker<R>,
        magic: Option<u32>,
    ) -> Result<ClassFile, Box<dyn Error>> {
        let magic = match magic {
            Some(m) => m,
            None => up.read_u32()?,
        };
        if magic != JAVA_CLASS_MAGIC {
            return Err(Box::new(UnpackError::new(
                UnpackCause::NotAClassFile,
                "bad magic header",
            )));
        }

        let minor = up.read_u16()?;
        let major = up.read_u16()?;
        log::trace!("class file version {major}.{minor}");

        let cpool = ConstantPool::unpack(up)?;

        let access_flags = up.read_u16()?;
        let this_ref = up.read_u16()?;
        let super_ref = up.read_u16()?;

        let interfaces = up.unpack_array(|up| up.read_u16())?;
        log::trace!("unpacking fields");
        let fields = up.unpack_objects(|up| MemberInfo::unpack(up, &cpool, false))?;
        log::trace!("unpacking methods");
        let methods = up.unpack_objects(|up| MemberInfo::unpack(up, &cpool, true))?;
        let attribs = AttributeTable::unpack(up, &cpool)?;

        let class = ClassFile {
            magic,
            version: (major, minor),
            cpool,
            access_flags,
            this_ref,
            super_ref,
            interfaces,
            fields,
            methods,
            attribs,
            provides: OnceLock::new(),
            provides_private: OnceLock::new(),
            requires: OnceLock::new(),
        };
        check_format(&class)?;
        Ok(class)
    }

    pub fn deref_const(&self, index: u16) -> Result<ConstValue, Box<dyn Error>> {
        self.cpool.deref_const(index)
    }

    pub fn get_attribute(&self, name: &str) -> Option<&[u8]> {
        self.attribs.get(name)
    }

    pub fn get_version(&self) -> (u16, u16) {
        self.version
    }

    pub fn get_major_version(&self) -> u16 {
        self.version.0
    }

    pub fn get_minor_version(&self) -> u16 {
        self.version.1
    }

    /// The oldest JDK release able to load this class version, if the
    /// version is a known one.
    pub fn get_platform(&self) -> Option<&'static str> {
        platform_from_version(self.version.0, self.version.1)
    }

    pub fn is_public(&self) -> bool {
        self.access_flags & ACC_PUBLIC != 0
    }

    pub fn is_final(&self) -> bool {
        self.access_flags & ACC_FINAL != 0
    }

    pub fn is_super(&self) -> bool {
        self.access_flags & ACC_SUPER != 0
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE != 0
    }

    pub fn is_abstract(&self) -> bool {
        self.access_flags & ACC_ABSTRACT != 0
    }

    pub fn is_annotation(&self) -> bool {
        self.access_flags & ACC_ANNOTATION != 0
    }

    pub fn is_enum(&self) -> bool {
        self.access_flags & ACC_ENUM != 0
    }

    pub fn is_deprecated(&self) -> bool {
        self.get_attribute("Deprecated").is_some()
    }

    /// This class's own internal name.
    pub fn get_this(&self) -> Result<&str, Box<dyn Error>> {
        self.cpool.class_name(self.this_ref)
    }

    /// The direct superclass name. Errors for the root class, whose
    /// super_ref is zero.
    pub fn get_super(&self) -> Result<&str, Box<dyn Error>> {
        self.cpool.class_name(self.super_ref)
    }

    pub fn get_interfaces(&self) -> Result<Vec<&str>, Box<dyn Error>> {
        self.interfaces
            .iter()
            .map(|i| self.cpool.class_name(*i))
            .collect()
    }

    pub fn get_field_by_name(&self, name: &str) -> Result<Option<&MemberInfo>, Box<dyn Error>> {
        for field in &self.fields {
            if field.get_name(&self.cpool)? == name {
                return Ok(Some(field));
            }
        }
        Ok(None)
    }

    /// Methods matching `name`, in file order.
    pub fn get_methods_by_name(&self, name: &str) -> Result<Vec<&MemberInfo>, Box<dyn Error>> {
        let mut found = Vec::new();
        for method in &self.methods {
            if method.get_name(&self.cpool)? == name {
                found.push(method);
            }
        }
        Ok(found)
    }

    /// The non-bridge method with this name whose argument type
    /// descriptors match `arg_types` exactly.
    pub fn get_method(
        &self,
        name: &str,
        arg_types: &[&str],
    ) -> Result<Option<&MemberInfo>, Box<dyn Error>> {
        for method in self.get_methods_by_name(name)? {
            if !method.is_bridge() && method.get_arg_type_descriptors(&self.cpool)? == arg_types {
                return Ok(Some(method));
            }
        }
        Ok(None)
    }

    /// Bridge methods adapting the named method's return type.
    pub fn get_method_bridges(
        &self,
        name: &str,
        arg_types: &[&str],
    ) -> Result<Vec<&MemberInfo>, Box<dyn Error>> {
        let mut found = Vec::new();
        for method in self.get_methods_by_name(name)? {
            if method.is_bridge() && method.get_arg_type_descriptors(&self.cpool)? == arg_types {
                found.push(method);
            }
        }
        Ok(found)
    }

    pub fn get_sourcefile_ref(&self) -> Result<Option<u16>, Box<dyn Error>> {
        let buff = match self.get_attribute("SourceFile") {
            Some(b) => b,
            None => return Ok(None),
        };
        let mut up = Unpacker::new(buff);
        Ok(Some(up.read_u16()?))
    }

    pub fn get_sourcefile(&self) -> Result<Option<&str>, Box<dyn Error>> {
        match self.get_sourcefile_ref()? {
            Some(r) => Ok(Some(self.cpool.utf8_at(r)?)),
            None => Ok(None),
        }
    }

    pub fn get_source_debug_extension(&self) -> Option<String> {
        self.get_attribute("SourceDebugExtension")
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    pub fn get_innerclasses(&self) -> Result<Option<Vec<InnerClassInfo>>, Box<dyn Error>> {
        let buff = match self.get_attribute("InnerClasses") {
            Some(b) => b,
            None => return Ok(None),
        };
        let mut up = Unpacker::new(buff);
        Ok(Some(up.unpack_objects(InnerClassInfo::unpack)?))
    }

    pub fn get_signature(&self) -> Result<Option<&str>, Box<dyn Error>> {
        let buff = match self.get_attribute("Signature") {
            Some(b) => b,
            None => return Ok(None),
        };
        let mut up = Unpacker::new(buff);
        let type_index = up.read_u16()?;
        Ok(Some(self.cpool.utf8_at(type_index)?))
    }

    /// The EnclosingMethod attribute rendered as
    /// `class.methodSignature`. Classes enclosed by an initializer turn
    /// up with a live class index but a zero method index; those render
    /// as just the class name.
    pub fn get_enclosingmethod(&self) -> Result<Option<String>, Box<dyn Error>> {
        let buff = match self.get_attribute("EnclosingMethod") {
            Some(b) => b,
            None => return Ok(None),
        };
        let mut up = Unpacker::new(buff);
        let class_index = up.read_u16()?;
        let method_index = up.read_u16()?;

        if class_index != 0 && method_index != 0 {
            let enclosing_class = self.cpool.class_name(class_index)?;
            let (name, desc) = self.cpool.name_and_type(method_index)?;
            Ok(Some(format!("{enclosing_class}.{name}{desc}")))
        } else if class_index != 0 {
            Ok(Some(self.cpool.class_name(class_index)?.to_string()))
        } else {
            Ok(None)
        }
    }

    /// Class-level access keywords. ACC_SUPER is deliberately left out
    /// of the rendering.
    pub fn pretty_access_flags(&self) -> Vec<&'static str> {
        let mut words = Vec::new();
        if self.is_public() {
            words.push("public");
        }
        if self.is_final() {
            words.push("final");
        }
        if self.is_interface() {
            words.push("interface");
        }
        if self.is_abstract() {
            words.push("abstract");
        }
        if self.is_annotation() {
            words.push("annotation");
        }
        if self.is_enum() {
            words.push("enum");
        }
        words
    }

    pub fn pretty_this(&self) -> Result<String, Box<dyn Error>> {
        Ok(pretty_class(self.get_this()?))
    }

    pub fn pretty_super(&self) -> Result<String, Box<dyn Error>> {
        Ok(pretty_class(self.get_super()?))
    }

    pub fn pretty_interfaces(&self) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(self
            .get_interfaces()?
            .into_iter()
            .map(pretty_class)
            .collect())
    }

    /// The full declaration line: flags, name, superclass, and any
    /// implemented interfaces.
    pub fn pretty_descriptor(&self) -> Result<String, Box<dyn Error>> {
        let mut decl = self.pretty_access_flags().join(" ");
        if !self.is_interface() {
            if decl.is_empty() {
                decl = "class".to_string();
            } else {
                decl.push_str(" class");
            }
        }
        let name = self.pretty_this()?;
        let superclass = self.pretty_super()?;
        let interfaces = self.pretty_interfaces()?.join(",");

        if interfaces.is_empty() {
            Ok(format!("{decl} {name} extends {superclass}"))
        } else {
            Ok(format!(
                "{decl} {name} extends {superclass} implements {interfaces}"
            ))
        }
    }

    fn compute_provides(&self, private: bool) -> Result<BTreeSet<String>, Box<dyn Error>> {
        let me = self.pretty_this()?;
        let mut found = BTreeSet::new();
        found.insert(me.clone());
        for member in self.fields.iter().chain(self.methods.iter()) {
            if private || member.is_public() {
                found.insert(format!("{me}.{}", member.pretty_identifier(&self.cpool)?));
            }
        }
        Ok(found)
    }

    fn compute_requires(&self) -> Result<BTreeSet<String>, Box<dyn Error>> {
        let provided = self.get_provides(true)?;
        let mut found = BTreeSet::new();
        for (i, entry) in self.cpool.entries() {
            match entry.tag() {
                Tag::Class | Tag::Fieldref | Tag::Methodref | Tag::InterfaceMethodref => {}
                _ => continue,
            }
            let pv = self.cpool.pretty_deref_const(i)?;
            let pv = if pv.starts_with('[') {
                // Operations on arrays store the array type in the
                // pool; only an object element type is worth reporting.
                match array_element_class(&pv)? {
                    Some(element) => element,
                    None => continue,
                }
            } else {
                pv
            };
            if !provided.contains(&pv) {
                found.insert(pv);
            }
        }
        Ok(found)
    }

    /// The symbols this class exposes: its own name plus qualified
    /// member identifiers, public-only unless `private` is set.
    /// Computed on first request and cached.
    pub fn get_provides(&self, private: bool) -> Result<&BTreeSet<String>, Box<dyn Error>> {
        let cell = if private {
            &self.provides_private
        } else {
            &self.provides
        };
        if let Some(cached) = cell.get() {
            return Ok(cached);
        }
        let computed = self.compute_provides(private)?;
        Ok(cell.get_or_init(|| computed))
    }

    /// The external symbols referenced through the constant pool, with
    /// this class's own provides subtracted. Computed on first request
    /// and cached.
    pub fn get_requires(&self) -> Result<&BTreeSet<String>, Box<dyn Error>> {
        if let Some(cached) = self.requires.get() {
            return Ok(cached);
        }
        let computed = self.compute_requires()?;
        Ok(self.requires.get_or_init(|| computed))
    }

    /// [`get_provides`](ClassFile::get_provides) filtered through an
    /// external glob-match delegate; names the delegate matches are
    /// dropped.
    pub fn get_provides_ignoring<F>(
        &self,
        private: bool,
        ignored: F,
    ) -> Result<Vec<String>, Box<dyn Error>>
    where
        F: Fn(&str) -> bool,
    {
        Ok(self
            .get_provides(private)?
            .iter()
            .filter(|name| !ignored(name))
            .cloned()
            .collect())
    }

    /// [`get_requires`](ClassFile::get_requires) filtered through an
    /// external glob-match delegate.
    pub fn get_requires_ignoring<F>(&self, ignored: F) -> Result<Vec<String>, Box<dyn Error>>
    where
        F: Fn(&str) -> bool,
    {
        Ok(self
            .get_requires()?
            .iter()
            .filter(|name| !ignored(name))
            .cloned()
            .collect())
    }
}

/// The dotted element class of a pretty array reference, or None when
/// the element is a primitive.
fn array_element_class(pv: &str) -> Result<Option<String>, Box<dyn Error>> {
    let (token, _) = descriptors::next_argsig(pv)?;
    let element = token.trim_start_matches('[');
    match element.strip_prefix('L') {
        Some(name) => Ok(Some(name.trim_end_matches(';').to_string())),
        None => Ok(None),
    }
}

/// Post-parse validation of the cross-reference rules the format
/// demands: this_class names a Class entry, super_class is zero only
/// for the root class, interfaces are Class entries, member names and
/// descriptors are Utf8, and every pool cross-reference lands on an
/// entry of the expected tag.
fn check_format(class: &ClassFile) -> Result<(), Box<dyn Error>> {
    class.cpool.check()?;

    if class.this_ref == 0 {
        return Err(Box::new(UnpackError::new(
            UnpackCause::InvalidReference(0),
            "this_class must be a nonzero Class reference",
        )));
    }
    class.cpool.class_name(class.this_ref)?;
    if class.super_ref != 0 {
        class.cpool.class_name(class.super_ref)?;
    }
    for interface in &class.interfaces {
        class.cpool.class_name(*interface)?;
    }
    for member in class.fields.iter().chain(class.methods.iter()) {
        member.get_name(&class.cpool)?;
        member.get_descriptor(&class.cpool)?;
    }
    Ok(())
}

// Minimum and maximum class version, inclusive, per JDK release.
const PLATFORMS: &[((u16, u16), (u16, u16), &str)] = &[
    ((45, 0), (45, 3), "1.0.2"),
    ((45, 4), (45, 65535), "1.1"),
    ((46, 0), (46, 65535), "1.2"),
    ((47, 0), (47, 65535), "1.3"),
    ((48, 0), (48, 65535), "1.4"),
    ((49, 0), (49, 65535), "1.5"),
    ((50, 0), (50, 65535), "1.6"),
    ((51, 0), (51, 65535), "1.7"),
    ((52, 0), (52, 65535), "1.8"),
];

/// The earliest JDK release able to load class version `major.minor`,
/// or None for versions outside the table.
pub fn platform_from_version(major: u16, minor: u16) -> Option<&'static str> {
    let version = (major, minor);
    for &(low, high, name) in PLATFORMS {
        if low <= version && version <= high {
            return Some(name);
        }
    }
    None
}
