//! Integration tests for client configuration and synth definition loading.

use std::fs;

use scsynth_config::{ClientConfig, ConfigError, load_synthdef_dir};
use scsynth_synthdef::{InputSpec, Rate, SynthDef, SynthDefError, SynthDefFile, UGen};
use tempfile::TempDir;

fn noise(name: &str, amp: f32) -> SynthDef {
    SynthDef::new(name)
        .with_constant(amp)
        .with_parameter(0.0)
        .with_parameter_name("out", 0)
        .with_ugen(UGen::new("Control", Rate::Control).with_output(Rate::Control))
        .with_ugen(UGen::new("PinkNoise", Rate::Audio).with_output(Rate::Audio))
        .with_ugen(
            UGen::new("BinaryOpUGen", Rate::Audio)
                .with_special_index(2)
                .with_inputs([InputSpec::ugen(1, 0), InputSpec::constant(0)])
                .with_output(Rate::Audio),
        )
        .with_ugen(
            UGen::new("Out", Rate::Audio)
                .with_inputs([InputSpec::ugen(0, 0), InputSpec::ugen(2, 0)]),
        )
}

#[test]
fn config_save_load_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.toml");

    let config = ClientConfig::new(9)
        .with_boundary(4096)
        .with_synthdef_dir(temp_dir.path())
        .with_rounding(3);
    config.save(&path).unwrap();

    assert_eq!(ClientConfig::load(&path).unwrap(), config);
}

#[test]
fn load_missing_config_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.toml");
    let err = ClientConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { path: ref p, .. } if *p == path));
}

#[test]
fn load_rejects_out_of_range_client() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "client_id = 99\n").unwrap();
    assert!(matches!(
        ClientConfig::load(&path),
        Err(ConfigError::Allocator(_))
    ));
}

#[test]
fn library_applies_decode_options() {
    let temp_dir = TempDir::new().unwrap();
    SynthDefFile::new(vec![noise("pink", 0.333_333), noise("pink_loud", 0.9)])
        .save(temp_dir.path().join("noise.scsyndef"))
        .unwrap();

    let config = ClientConfig::default()
        .with_synthdef_dir(temp_dir.path())
        .with_rounding(3);
    let library = load_synthdef_dir(config.synthdef_dir(), &config.decode_options()).unwrap();

    assert!(library.failures().is_empty());
    assert_eq!(library.names(), vec!["pink", "pink_loud"]);
    assert_eq!(library.get("pink").unwrap().constants, vec![0.333]);
    assert_eq!(library.get("pink").unwrap().ugens.len(), 4);
}

#[test]
fn library_skips_corrupt_files() {
    let temp_dir = TempDir::new().unwrap();
    SynthDefFile::from(noise("good", 0.5))
        .save(temp_dir.path().join("good.scsyndef"))
        .unwrap();
    fs::write(temp_dir.path().join("bad.scsyndef"), b"SCgf\0\0\0\x02\0\x01").unwrap();
    fs::write(temp_dir.path().join("readme.txt"), b"not a synthdef").unwrap();

    let library = load_synthdef_dir(temp_dir.path(), &Default::default()).unwrap();

    assert_eq!(library.names(), vec!["good"]);
    assert_eq!(library.failures().len(), 1);
    let (path, err) = &library.failures()[0];
    assert!(path.ends_with("bad.scsyndef"));
    assert!(matches!(err, SynthDefError::Decode(_)));
}

#[test]
fn find_synthdef_through_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("grain_cloud_31337.scsyndef");
    SynthDefFile::from(noise("grain_cloud_31337", 0.1))
        .save(&path)
        .unwrap();

    let config = ClientConfig::default().with_synthdef_dir(temp_dir.path());
    assert_eq!(config.find_synthdef("grain_cloud_31337").unwrap(), path);

    let loaded = SynthDefFile::load(config.find_synthdef("grain_cloud_31337").unwrap()).unwrap();
    assert_eq!(loaded.names(), vec!["grain_cloud_31337"]);

    assert!(matches!(
        config.find_synthdef("absent_def_31337"),
        Err(ConfigError::SynthDefNotFound(ref name)) if name == "absent_def_31337"
    ));
}
