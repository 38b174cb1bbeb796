use serde::{Deserialize, Serialize};
use xmlb::{BindingError, FormatError, from_text, to_text};

#[test]
fn test_bool() {
    assert_eq!(to_text(&true).unwrap(), "true");
    assert_eq!(to_text(&false).unwrap(), "false");
    assert!(from_text::<bool>("true").unwrap());
    assert!(!from_text::<bool>(" false ").unwrap());
    assert!(from_text::<bool>("1").is_err());
}

#[test]
fn test_i32_min_max() {
    for v in [i32::MIN, -1, 0, 1, i32::MAX] {
        assert_eq!(v, from_text::<i32>(&to_text(&v).unwrap()).unwrap());
    }
}

#[test]
fn test_wide_integers() {
    assert_eq!(to_text(&u128::MAX).unwrap(), "340282366920938463463374607431768211455");
    assert_eq!(from_text::<i128>("-170141183460469231731687303715884105728").unwrap(), i128::MIN);
    assert_eq!(from_text::<usize>("12").unwrap(), 12);
}

#[test]
fn test_integer_overflow() {
    let err = from_text::<u8>("300").unwrap_err();
    match err {
        BindingError::Format(FormatError::InvalidValue { text, expected, .. }) => {
            assert_eq!(text, "300");
            assert_eq!(expected, "u8");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_surrounding_whitespace_is_ignored_for_numbers() {
    assert_eq!(from_text::<i64>("\n  -42\t").unwrap(), -42);
    assert_eq!(from_text::<f64>(" 2.5 ").unwrap(), 2.5);
}

#[test]
fn test_f32_roundtrip() {
    for v in [std::f32::consts::PI, f32::INFINITY, f32::NEG_INFINITY, 0.0_f32, -0.0_f32] {
        let decoded: f32 = from_text(&to_text(&v).unwrap()).unwrap();
        assert_eq!(v.to_bits(), decoded.to_bits());
    }
    assert!(from_text::<f32>(&to_text(&f32::NAN).unwrap()).unwrap().is_nan());
}

#[test]
fn test_f64_roundtrip() {
    let v = std::f64::consts::E;
    let decoded: f64 = from_text(&to_text(&v).unwrap()).unwrap();
    assert_eq!(v.to_bits(), decoded.to_bits());
}

#[test]
fn test_char() {
    assert_eq!(to_text(&'λ').unwrap(), "λ");
    assert_eq!(from_text::<char>("λ").unwrap(), 'λ');
    assert!(from_text::<char>("ab").is_err());
    assert!(from_text::<char>("").is_err());
}

#[test]
fn test_string_is_verbatim() {
    for s in ["", " padded ", "a < b & c", "line\nbreak"] {
        assert_eq!(to_text(s).unwrap(), s);
        assert_eq!(from_text::<String>(s).unwrap(), s);
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
enum FileType {
    Regular,
    Directory,
    Symlink(String),
    BlockDevice { major: u32, minor: u32 },
}

#[test]
fn test_unit_enum() {
    assert_eq!(to_text(&FileType::Directory).unwrap(), "Directory");
    assert_eq!(from_text::<FileType>("Regular").unwrap(), FileType::Regular);
    assert!(from_text::<FileType>("Socket").is_err());
}

#[test]
fn test_data_carrying_variants_are_unsupported() {
    let v = FileType::Symlink("/etc/hosts".to_string());
    assert!(matches!(to_text(&v), Err(BindingError::Unsupported(_))));
    let v = FileType::BlockDevice { major: 8, minor: 1 };
    assert!(matches!(to_text(&v), Err(BindingError::Unsupported(_))));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Inode(u64);

#[test]
fn test_newtype_struct_is_transparent() {
    assert_eq!(to_text(&Inode(77)).unwrap(), "77");
    assert_eq!(from_text::<Inode>("77").unwrap(), Inode(77));
}

#[test]
fn test_unit_is_empty() {
    assert_eq!(to_text(&()).unwrap(), "");
    from_text::<()>("").unwrap();
}

#[test]
fn test_compound_shapes_are_unsupported() {
    #[derive(Debug, Serialize, Deserialize)]
    struct FileHandle {
        inode: u64,
        generation: u32,
    }

    assert!(matches!(to_text(&vec![1u32, 2]), Err(BindingError::Unsupported(_))));
    assert!(matches!(to_text(&(1u32, 2u32)), Err(BindingError::Unsupported(_))));
    assert!(matches!(
        to_text(&FileHandle { inode: 1, generation: 2 }),
        Err(BindingError::Unsupported(_))
    ));
    assert!(matches!(to_text(&Option::<u32>::None), Err(BindingError::Unsupported(_))));
    assert!(matches!(from_text::<Vec<u32>>("1 2"), Err(BindingError::Unsupported(_))));
    assert!(matches!(from_text::<FileHandle>("1"), Err(BindingError::Unsupported(_))));
}

#[test]
fn test_option_some_is_transparent() {
    assert_eq!(to_text(&Some(42u32)).unwrap(), "42");
    assert_eq!(from_text::<Option<u32>>("42").unwrap(), Some(42));
}
