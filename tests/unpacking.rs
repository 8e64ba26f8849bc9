use std::error::Error;

use jclass::errors::{UnpackCause, UnpackError};
use jclass::unpack::Unpacker;

fn cause<'a>(err: &'a (dyn Error + 'static)) -> &'a UnpackCause {
    err.downcast_ref::<UnpackError>()
        .expect("an UnpackError")
        .cause()
}

#[test]
fn typed_reads_advance_in_order() -> Result<(), Box<dyn Error>> {
    let data = [0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0xff];
    let mut up = Unpacker::new(&data);
    assert_eq!(up.read_u16()?, 1);
    assert_eq!(up.read_u32()?, 2);
    assert_eq!(up.read_u8()?, 0xff);
    Ok(())
}

#[test]
fn truncation_reports_wanted_and_present() {
    let data = [0x00, 0x01, 0x02];
    let mut up = Unpacker::new(&data);
    let err = up.read_u32().unwrap_err();
    match cause(err.as_ref()) {
        UnpackCause::Truncated {
            format,
            wanted,
            present,
        } => {
            assert_eq!(*format, "u32");
            assert_eq!(*wanted, 4);
            assert_eq!(*present, 3);
        }
        other => panic!("unexpected cause {other:?}"),
    }
}

#[test]
fn read_hands_out_counted_buffers() -> Result<(), Box<dyn Error>> {
    let data = [1, 2, 3, 4, 5];
    let mut up = Unpacker::new(&data);
    assert_eq!(up.read(3)?, vec![1, 2, 3]);
    assert_eq!(up.read(2)?, vec![4, 5]);
    assert!(up.read(1).is_err());
    Ok(())
}

#[test]
fn arrays_are_count_prefixed() -> Result<(), Box<dyn Error>> {
    let data = [0x00, 0x02, 0x00, 0x05, 0x00, 0x07];
    let mut up = Unpacker::new(&data);
    let values = up.unpack_array(|up| up.read_u16())?;
    assert_eq!(values, vec![5, 7]);
    Ok(())
}

#[test]
fn signed_and_float_shapes() -> Result<(), Box<dyn Error>> {
    let mut data = Vec::new();
    data.extend((-7i32).to_be_bytes());
    data.extend((-9i64).to_be_bytes());
    data.extend(2.5f32.to_be_bytes());
    data.extend((-0.5f64).to_be_bytes());
    let mut up = Unpacker::new(&data);
    assert_eq!(up.read_i32()?, -7);
    assert_eq!(up.read_i64()?, -9);
    assert_eq!(up.read_f32()?, 2.5);
    assert_eq!(up.read_f64()?, -0.5);
    Ok(())
}

#[test]
fn reader_sources_behave_like_buffers() -> Result<(), Box<dyn Error>> {
    let data = [0xCA, 0xFE, 0xBA, 0xBE];
    let mut up = Unpacker::from_reader(&data[..]);
    assert_eq!(up.read_u32()?, 0xCAFEBABE);
    Ok(())
}

#[test]
fn is_class_checks_magic_and_never_errors() {
    assert!(jclass::is_class(&[0xCA, 0xFE, 0xBA, 0xBE]));
    assert!(jclass::is_class(&[0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00]));
    assert!(!jclass::is_class(&[0x50, 0x4b, 0x03, 0x04]));
    assert!(!jclass::is_class(&[0xCA, 0xFE]));
    assert!(!jclass::is_class(&[]));
}
