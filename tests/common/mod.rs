//! Builders that assemble synthetic class-file images byte by byte,
//! standing in for compiled fixtures.

#![allow(dead_code)]

/// Accumulates constant pool entries and tracks slot numbering,
/// including the double slots Long and Double burn.
pub struct PoolBuilder {
    bytes: Vec<u8>,
    next_index: u16,
}

impl PoolBuilder {
    pub fn new() -> PoolBuilder {
        PoolBuilder {
            bytes: Vec::new(),
            next_index: 1,
        }
    }

    fn take(&mut self, slots: u16) -> u16 {
        let index = self.next_index;
        self.next_index += slots;
        index
    }

    pub fn utf8(&mut self, s: &str) -> u16 {
        self.utf8_raw(s.as_bytes())
    }

    pub fn utf8_raw(&mut self, raw: &[u8]) -> u16 {
        self.bytes.push(1);
        self.bytes.extend((raw.len() as u16).to_be_bytes());
        self.bytes.extend(raw);
        self.take(1)
    }

    pub fn integer(&mut self, v: i32) -> u16 {
        self.bytes.push(3);
        self.bytes.extend(v.to_be_bytes());
        self.take(1)
    }

    pub fn float(&mut self, v: f32) -> u16 {
        self.bytes.push(4);
        self.bytes.extend(v.to_be_bytes());
        self.take(1)
    }

    pub fn long(&mut self, v: i64) -> u16 {
        self.bytes.push(5);
        self.bytes.extend(v.to_be_bytes());
        self.take(2)
    }

    pub fn double(&mut self, v: f64) -> u16 {
        self.bytes.push(6);
        self.bytes.extend(v.to_be_bytes());
        self.take(2)
    }

    pub fn class(&mut self, name_index: u16) -> u16 {
        self.bytes.push(7);
        self.bytes.extend(name_index.to_be_bytes());
        self.take(1)
    }

    pub fn string(&mut self, string_index: u16) -> u16 {
        self.bytes.push(8);
        self.bytes.extend(string_index.to_be_bytes());
        self.take(1)
    }

    fn pair(&mut self, tag: u8, a: u16, b: u16) -> u16 {
        self.bytes.push(tag);
        self.bytes.extend(a.to_be_bytes());
        self.bytes.extend(b.to_be_bytes());
        self.take(1)
    }

    pub fn fieldref(&mut self, class_index: u16, nat_index: u16) -> u16 {
        self.pair(9, class_index, nat_index)
    }

    pub fn methodref(&mut self, class_index: u16, nat_index: u16) -> u16 {
        self.pair(10, class_index, nat_index)
    }

    pub fn interface_methodref(&mut self, class_index: u16, nat_index: u16) -> u16 {
        self.pair(11, class_index, nat_index)
    }

    pub fn name_and_type(&mut self, name_index: u16, descriptor_index: u16) -> u16 {
        self.pair(12, name_index, descriptor_index)
    }

    /// Arbitrary raw entry bytes occupying one slot.
    pub fn raw(&mut self, entry: &[u8]) -> u16 {
        self.bytes.extend(entry);
        self.take(1)
    }

    /// The serialized pool: count then entries.
    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.bytes.len() + 2);
        out.extend(self.next_index.to_be_bytes());
        out.extend(&self.bytes);
        out
    }
}

/// One serialized attribute: name index, length, payload.
pub fn attribute(name_index: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend(name_index.to_be_bytes());
    out.extend((payload.len() as u32).to_be_bytes());
    out.extend(payload);
    out
}

/// A count-prefixed attribute table.
pub fn attribute_table(attribs: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend((attribs.len() as u16).to_be_bytes());
    for a in attribs {
        out.extend(a);
    }
    out
}

/// One serialized field or method structure.
pub fn member(access_flags: u16, name_index: u16, descriptor_index: u16, attribs: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend(access_flags.to_be_bytes());
    out.extend(name_index.to_be_bytes());
    out.extend(descriptor_index.to_be_bytes());
    out.extend(attribute_table(attribs));
    out
}

/// A whole class-file image. `version` is (major, minor); the image
/// stores minor first, as the format does.
pub fn class_image(
    version: (u16, u16),
    pool: &PoolBuilder,
    access_flags: u16,
    this_class: u16,
    super_class: u16,
    interfaces: &[u16],
    fields: &[Vec<u8>],
    methods: &[Vec<u8>],
    attribs: &[Vec<u8>],
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend(0xCAFEBABEu32.to_be_bytes());
    out.extend(version.1.to_be_bytes());
    out.extend(version.0.to_be_bytes());
    out.extend(pool.build());
    out.extend(access_flags.to_be_bytes());
    out.extend(this_class.to_be_bytes());
    out.extend(super_class.to_be_bytes());
    out.extend((interfaces.len() as u16).to_be_bytes());
    for i in interfaces {
        out.extend(i.to_be_bytes());
    }
    out.extend((fields.len() as u16).to_be_bytes());
    for f in fields {
        out.extend(f);
    }
    out.extend((methods.len() as u16).to_be_bytes());
    for m in methods {
        out.extend(m);
    }
    out.extend(attribute_table(attribs));
    out
}

/// `public class Empty extends java.lang.Object` with its default
/// constructor, in the shape javac 1.8 (major 52) emits.
pub fn empty_class() -> Vec<u8> {
    let mut pool = PoolBuilder::new();
    let empty_name = pool.utf8("Empty");
    let this_class = pool.class(empty_name);
    let object_name = pool.utf8("java/lang/Object");
    let super_class = pool.class(object_name);
    let init_name = pool.utf8("<init>");
    let init_desc = pool.utf8("()V");
    let code_name = pool.utf8("Code");
    let init_nat = pool.name_and_type(init_name, init_desc);
    let super_init = pool.methodref(super_class, init_nat);
    let sourcefile_name = pool.utf8("SourceFile");
    let sourcefile = pool.utf8("Empty.java");
    let lnt_name = pool.utf8("LineNumberTable");

    // aload_0; invokespecial super.<init>; return
    let mut body = Vec::new();
    body.extend(1u16.to_be_bytes());
    body.extend(1u16.to_be_bytes());
    body.extend(5u32.to_be_bytes());
    body.extend([0x2a, 0xb7]);
    body.extend(super_init.to_be_bytes());
    body.push(0xb1);
    body.extend(0u16.to_be_bytes());
    let mut lnt = Vec::new();
    lnt.extend(1u16.to_be_bytes());
    lnt.extend(0u16.to_be_bytes());
    lnt.extend(1u16.to_be_bytes());
    body.extend(attribute_table(&[attribute(lnt_name, &lnt)]));

    let ctor = member(0x0001, init_name, init_desc, &[attribute(code_name, &body)]);

    let sf = sourcefile.to_be_bytes().to_vec();

    class_image(
        (52, 0),
        &pool,
        0x0021,
        this_class,
        super_class,
        &[],
        &[],
        &[ctor],
        &[attribute(sourcefile_name, &sf)],
    )
}
