//! Integration tests for scsynth-synthdef.
//!
//! Exercises the codec layers together: graph construction, file container
//! encoding, decoding, and persistence on disk.

use scsynth_synthdef::{
    DecodeError, DecodeOptions, InputSpec, OutputSpec, Rate, SynthDef, SynthDefError,
    SynthDefFile, UGen, decode_file, decode_synthdef, encode_definitions, encode_file,
    encode_synthdef,
};
use tempfile::TempDir;

/// Brown noise scaled by a constant, sent to the bus named by the `out` parameter.
fn ambient() -> SynthDef {
    SynthDef {
        name: "ambient".into(),
        constants: vec![0.2],
        parameters: vec![0.0],
        parameter_names: vec![scsynth_synthdef::ParamName::new("out", 0)],
        ugens: vec![
            UGen::new("Control", Rate::Control).with_output(Rate::Control),
            UGen::new("BrownNoise", Rate::Audio).with_output(Rate::Audio),
            UGen::new("BinaryOpUGen", Rate::Audio)
                .with_special_index(2)
                .with_inputs([InputSpec::ugen(1, 0), InputSpec::constant(0)])
                .with_output(Rate::Audio),
            UGen::new("Out", Rate::Audio)
                .with_inputs([InputSpec::ugen(0, 0), InputSpec::ugen(2, 0)]),
        ],
        variants: vec![],
    }
}

#[test]
fn test_ambient_graph_round_trip() {
    let bytes = encode_synthdef(&ambient()).unwrap();
    let (decoded, rest) = decode_synthdef(&bytes).unwrap();
    assert!(rest.is_empty());

    assert_eq!(decoded.name, "ambient");
    assert_eq!(decoded.constants, vec![0.2]);
    assert_eq!(decoded.parameters, vec![0.0]);
    assert_eq!(decoded.parameter_index("out"), Some(0));
    assert_eq!(decoded.ugens.len(), 4);

    let mul = &decoded.ugens[2];
    assert_eq!(mul.class_name, "BinaryOpUGen");
    assert_eq!(mul.special_index, 2);
    assert_eq!(
        mul.inputs,
        vec![
            InputSpec::UGen {
                ugen_index: 1,
                output_index: 0
            },
            InputSpec::Constant { index: 0 },
        ]
    );
    assert_eq!(mul.outputs, vec![OutputSpec::new(Rate::Audio)]);

    let out = &decoded.ugens[3];
    assert!(out.outputs.is_empty());
    assert_eq!(out.inputs.len(), 2);

    assert!(decoded.variants.is_empty());
    assert_eq!(decoded, ambient());
}

#[test]
fn test_ambient_file_bytes() {
    let bytes = encode_definitions(&[ambient()]).unwrap();

    assert_eq!(&bytes[..4], b"SCgf");
    assert_eq!(&bytes[4..8], &[0, 0, 0, 2]);
    assert_eq!(&bytes[8..10], &[0, 1]);
    assert_eq!(bytes[10] as usize, "ambient".len());
    assert_eq!(&bytes[11..18], b"ambient");

    let file = decode_file(&bytes).unwrap();
    assert_eq!(file.definitions, vec![ambient()]);
    assert_eq!(encode_file(&file).unwrap(), bytes);
}

#[test]
fn test_multi_definition_file_preserves_order() {
    let defs = vec![
        ambient(),
        SynthDef::new("empty"),
        SynthDef::new("variants")
            .with_parameter(440.0)
            .with_parameter_name("freq", 0)
            .with_variant("low", 110.0)
            .with_variant("high", 880.0),
    ];
    let bytes = encode_definitions(&defs).unwrap();
    let file = SynthDefFile::from_bytes(&bytes).unwrap();
    assert_eq!(file.names(), vec!["ambient", "empty", "variants"]);
    assert_eq!(file.definitions, defs);
}

#[test]
fn test_version_gate() {
    let mut bytes = encode_definitions(&[ambient()]).unwrap();
    bytes[4..8].copy_from_slice(&3i32.to_be_bytes());
    assert_eq!(
        decode_file(&bytes),
        Err(DecodeError::UnsupportedVersion { version: 3 })
    );

    // Version 1 files use 16-bit counts and are not readable either.
    bytes[4..8].copy_from_slice(&1i32.to_be_bytes());
    assert!(matches!(
        decode_file(&bytes),
        Err(DecodeError::UnsupportedVersion { version: 1 })
    ));
}

#[test]
fn test_rounding_option_on_file_decode() {
    let def = SynthDef::new("detuned")
        .with_constant(0.333_333)
        .with_parameter(440.004_2);
    let bytes = encode_definitions(&[def]).unwrap();

    let exact = SynthDefFile::from_bytes(&bytes).unwrap();
    assert_eq!(exact.definitions[0].constants, vec![0.333_333]);

    let rounded =
        SynthDefFile::from_bytes_with(&bytes, &DecodeOptions::new().with_rounding(3)).unwrap();
    assert_eq!(rounded.definitions[0].constants, vec![0.333]);
    assert_eq!(rounded.definitions[0].parameters, vec![440.004]);
}

#[test]
fn test_save_load_roundtrip() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("nested").join("ambient.scsyndef");

    let original = SynthDefFile::from(ambient());
    original.save(&path).expect("should save");
    assert!(path.exists());

    let loaded = SynthDefFile::load(&path).expect("should load");
    assert_eq!(loaded, original);
    assert_eq!(
        std::fs::read(&path).unwrap(),
        original.to_bytes().unwrap(),
        "file on disk must be the exact encoding"
    );
}

#[test]
fn test_load_missing_file_reports_path() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("missing.scsyndef");
    let err = SynthDefFile::load(&path).unwrap_err();
    assert!(
        matches!(err, SynthDefError::ReadFile { path: ref p, .. } if p == &path),
        "got: {err:?}"
    );
}

#[test]
fn test_load_corrupt_file_is_decode_error() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("corrupt.scsyndef");
    std::fs::write(&path, b"SCgf\0\0\0\x02\0\x01\x05abc").unwrap();
    let err = SynthDefFile::load(&path).unwrap_err();
    assert!(matches!(
        err,
        SynthDefError::Decode(DecodeError::Truncated { .. })
    ));
}

#[test]
fn test_save_rejects_unencodable_definition() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("bad.scsyndef");
    let file = SynthDefFile::from(SynthDef::new("n".repeat(256)));
    let err = file.save(&path).unwrap_err();
    assert!(matches!(err, SynthDefError::Encode(_)));
    assert!(!path.exists(), "nothing is written when encoding fails");
}

#[test]
fn test_non_utf8_names_survive_disk_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("latin1.scsyndef");

    let def = SynthDef::new(&[b'p', 0xE9, b'a'])
        .with_parameter(0.5)
        .with_parameter_name(&[0xB0u8], 0)
        .with_ugen(UGen::new("Control", Rate::Control).with_output(Rate::Control));
    let file = SynthDefFile::from(def);
    file.save(&path).unwrap();

    let loaded = SynthDefFile::load(&path).unwrap();
    assert_eq!(loaded, file);
    assert_eq!(loaded.definitions[0].name.as_str(), None);
    assert_eq!(loaded.to_bytes().unwrap(), std::fs::read(&path).unwrap());
}

#[cfg(feature = "serde")]
#[test]
fn test_json_dump_round_trip() {
    let file = SynthDefFile::from(ambient());
    let json = serde_json::to_string_pretty(&file).expect("should serialize");
    assert!(json.contains("\"BinaryOpUGen\""));
    let back: SynthDefFile = serde_json::from_str(&json).expect("should deserialize");
    assert_eq!(back, file);
}

#[cfg(feature = "serde")]
#[test]
fn test_json_keeps_non_utf8_names() {
    let file = SynthDefFile::from(SynthDef::new(&[0xE9u8, b'x']));
    let json = serde_json::to_string(&file).expect("should serialize");
    let back: SynthDefFile = serde_json::from_str(&json).expect("should deserialize");
    assert_eq!(back.definitions[0].name.as_bytes(), &[0xE9, b'x']);
}
