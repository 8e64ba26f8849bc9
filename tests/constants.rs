mod common;

use std::error::Error;

use common::PoolBuilder;
use jclass::constants::{Const, ConstValue, ConstantPool, Tag};
use jclass::errors::{UnpackCause, UnpackError};
use jclass::unpack::Unpacker;

fn cause<'a>(err: &'a (dyn Error + 'static)) -> &'a UnpackCause {
    err.downcast_ref::<UnpackError>()
        .expect("an UnpackError")
        .cause()
}

fn parse(pool: &PoolBuilder) -> Result<ConstantPool, Box<dyn Error>> {
    let data = pool.build();
    let mut up = Unpacker::new(&data);
    ConstantPool::unpack(&mut up)
}

#[test]
fn long_and_double_occupy_two_slots() -> Result<(), Box<dyn Error>> {
    let mut pool = PoolBuilder::new();
    let long_at = pool.long(9);
    let utf8_at = pool.utf8("after");
    assert_eq!(long_at, 1);
    assert_eq!(utf8_at, 3);

    let cpool = parse(&pool)?;
    assert_eq!(cpool.size(), 4);
    assert_eq!(cpool.get_const(1)?, Some(&Const::Long(9)));
    assert_eq!(cpool.get_const(2)?, None);
    assert_eq!(cpool.utf8_at(3)?, "after");
    Ok(())
}

#[test]
fn double_burns_its_trailing_slot_too() -> Result<(), Box<dyn Error>> {
    let mut pool = PoolBuilder::new();
    pool.double(0.25);
    let after = pool.integer(7);
    assert_eq!(after, 3);

    let cpool = parse(&pool)?;
    assert_eq!(cpool.get_const(2)?, None);
    assert_eq!(cpool.deref_const(3)?, ConstValue::Int(7));
    Ok(())
}

#[test]
fn modified_utf8_null_decodes_to_nul() -> Result<(), Box<dyn Error>> {
    let mut pool = PoolBuilder::new();
    pool.utf8_raw(&[0x41, 0xC0, 0x80, 0x42]);
    let cpool = parse(&pool)?;
    assert_eq!(cpool.utf8_at(1)?, "A\u{0}B");
    Ok(())
}

#[test]
fn strict_utf8_passes_through() -> Result<(), Box<dyn Error>> {
    let mut pool = PoolBuilder::new();
    pool.utf8("héllo");
    let cpool = parse(&pool)?;
    assert_eq!(cpool.utf8_at(1)?, "héllo");
    Ok(())
}

#[test]
fn hopeless_utf8_is_unimplemented() {
    let mut pool = PoolBuilder::new();
    pool.utf8_raw(&[0xF0, 0x28, 0x8C, 0x28]);
    let err = parse(&pool).unwrap_err();
    assert!(matches!(
        cause(err.as_ref()),
        UnpackCause::Unimplemented(_)
    ));
}

#[test]
fn deref_follows_indirection_recursively() -> Result<(), Box<dyn Error>> {
    let mut pool = PoolBuilder::new();
    let list_name = pool.utf8("java/util/List");
    let list_class = pool.class(list_name);
    let add_name = pool.utf8("add");
    let add_desc = pool.utf8("(Ljava/lang/Object;)Z");
    let nat = pool.name_and_type(add_name, add_desc);
    let methodref = pool.methodref(list_class, nat);

    let cpool = parse(&pool)?;
    let expected = ConstValue::Pair(
        Box::new(ConstValue::Str("java/util/List".into())),
        Box::new(ConstValue::Pair(
            Box::new(ConstValue::Str("add".into())),
            Box::new(ConstValue::Str("(Ljava/lang/Object;)Z".into())),
        )),
    );
    assert_eq!(cpool.deref_const(methodref)?, expected);
    // dereference is a pure function of the pool
    assert_eq!(cpool.deref_const(methodref)?, cpool.deref_const(methodref)?);
    assert_eq!(cpool.deref_const(list_class)?, ConstValue::Str("java/util/List".into()));
    Ok(())
}

#[test]
fn pretty_deref_renders_for_display() -> Result<(), Box<dyn Error>> {
    let mut pool = PoolBuilder::new();
    let list_name = pool.utf8("java/util/List");
    let list_class = pool.class(list_name);
    let add_name = pool.utf8("add");
    let add_desc = pool.utf8("(Ljava/lang/Object;)Z");
    let nat = pool.name_and_type(add_name, add_desc);
    let methodref = pool.methodref(list_class, nat);
    let count_name = pool.utf8("count");
    let count_desc = pool.utf8("I");
    let count_nat = pool.name_and_type(count_name, count_desc);
    let fieldref = pool.fieldref(list_class, count_nat);
    let hello = pool.utf8("hello");
    let string = pool.string(hello);

    let cpool = parse(&pool)?;
    assert_eq!(cpool.pretty_deref_const(list_class)?, "java.util.List");
    assert_eq!(
        cpool.pretty_deref_const(methodref)?,
        "java.util.List.add(java.lang.Object):boolean"
    );
    assert_eq!(cpool.pretty_deref_const(fieldref)?, "java.util.List.count:int");
    assert_eq!(
        cpool.pretty_deref_const(nat)?,
        "add:(java.lang.Object)boolean"
    );
    assert_eq!(cpool.pretty_deref_const(string)?, "hello");
    Ok(())
}

#[test]
fn module_id_renders_name_at_version() -> Result<(), Box<dyn Error>> {
    let mut pool = PoolBuilder::new();
    let name = pool.utf8("java.base");
    let version = pool.utf8("9");
    let module = pool.raw(&{
        let mut entry = vec![13u8];
        entry.extend(name.to_be_bytes());
        entry.extend(version.to_be_bytes());
        entry
    });
    let cpool = parse(&pool)?;
    assert_eq!(cpool.pretty_deref_const(module)?, "java.base@9");
    Ok(())
}

#[test]
fn const_zero_is_an_invalid_reference() {
    let mut pool = PoolBuilder::new();
    pool.utf8("x");
    let cpool = parse(&pool).unwrap();
    let err = cpool.deref_const(0).unwrap_err();
    assert!(matches!(
        cause(err.as_ref()),
        UnpackCause::InvalidReference(0)
    ));
}

#[test]
fn out_of_bounds_is_an_invalid_reference() {
    let mut pool = PoolBuilder::new();
    pool.utf8("x");
    let cpool = parse(&pool).unwrap();
    let err = cpool.deref_const(99).unwrap_err();
    assert!(matches!(
        cause(err.as_ref()),
        UnpackCause::InvalidReference(99)
    ));
}

#[test]
fn unparsed_pool_has_no_pool() {
    let cpool = ConstantPool::default();
    let err = cpool.deref_const(1).unwrap_err();
    assert!(matches!(cause(err.as_ref()), UnpackCause::NoPool));
}

#[test]
fn unknown_tag_is_unimplemented() {
    let mut pool = PoolBuilder::new();
    pool.raw(&[99]);
    let err = parse(&pool).unwrap_err();
    assert!(matches!(
        cause(err.as_ref()),
        UnpackCause::Unimplemented(_)
    ));
}

#[test]
fn wrong_tag_behind_a_reference_fails_check() {
    let mut pool = PoolBuilder::new();
    let number = pool.integer(5);
    pool.class(number);
    let cpool = parse(&pool).unwrap();
    let err = cpool.check().unwrap_err();
    assert!(matches!(
        cause(err.as_ref()),
        UnpackCause::InvalidReference(_)
    ));
}

#[test]
fn well_formed_pool_passes_check() -> Result<(), Box<dyn Error>> {
    let mut pool = PoolBuilder::new();
    let name = pool.utf8("java/util/List");
    let class = pool.class(name);
    let method = pool.utf8("size");
    let desc = pool.utf8("()I");
    let nat = pool.name_and_type(method, desc);
    pool.methodref(class, nat);
    parse(&pool)?.check()
}

#[test]
fn verbose_listing_shows_raw_references() -> Result<(), Box<dyn Error>> {
    let mut pool = PoolBuilder::new();
    let name = pool.utf8("Thing");
    let class = pool.class(name);
    let num = pool.integer(42);
    let big = pool.long(9);

    let cpool = parse(&pool)?;
    assert_eq!(cpool.pretty_const(name)?, Some(("Utf8", "Thing".to_string())));
    assert_eq!(cpool.pretty_const(class)?, Some(("class", "#1".to_string())));
    assert_eq!(cpool.pretty_const(num)?, Some(("int", "42".to_string())));
    assert_eq!(cpool.pretty_const(big)?, Some(("long", "9l".to_string())));
    // the padding slot after the long
    assert_eq!(cpool.pretty_const(big + 1)?, None);
    Ok(())
}

#[test]
fn entries_skip_empty_slots() -> Result<(), Box<dyn Error>> {
    let mut pool = PoolBuilder::new();
    pool.long(1);
    pool.utf8("x");
    let cpool = parse(&pool)?;
    let indices: Vec<u16> = cpool.entries().map(|(i, _)| i).collect();
    assert_eq!(indices, vec![1, 3]);
    let tags: Vec<Tag> = cpool.entries().map(|(_, c)| c.tag()).collect();
    assert_eq!(tags, vec![Tag::Long, Tag::Utf8]);
    Ok(())
}
