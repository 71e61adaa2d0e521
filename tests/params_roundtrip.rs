//! Integration tests for parameter bag persistence

use bucle::{Device, Error, ErrorKind, Param, ParameterBag, Result, StateFormat, Stateful};
use proptest::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

#[derive(Debug, Default, PartialEq)]
struct Optimizer {
    lr: f64,
    step: u64,
    device: Option<Device>,
}

impl Stateful for Optimizer {
    fn state(&self) -> Result<Value> {
        Ok(json!({ "lr": self.lr, "step": self.step }))
    }

    fn load_state(&mut self, state: Value) -> Result<()> {
        #[derive(serde::Deserialize)]
        struct Saved {
            lr: f64,
            step: u64,
        }
        let saved: Saved = serde_json::from_value(state)
            .map_err(|e| Error::deserialization(format!("optimizer state: {e}")))?;
        self.lr = saved.lr;
        self.step = saved.step;
        Ok(())
    }

    fn to_device(&mut self, device: &Device) -> Result<()> {
        self.device = Some(*device);
        Ok(())
    }
}

#[test]
fn test_round_trip_restores_every_persistent_entry() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("run.state.json");

    let mut params = ParameterBag::new();
    params.set("name", "resnet").expect("entry");
    params.set("dropout", 0.25).expect("entry");
    params.set_value("milestones", vec![30, 60, 90]).expect("entry");
    params
        .set_state("optimizer", Optimizer { lr: 0.1, step: 42, device: None })
        .expect("entry");
    params.save(&path).expect("save should succeed");

    let restored = ParameterBag::from_file(
        &path,
        [("optimizer", Param::state(Optimizer::default()))],
    )
    .expect("load should succeed");

    assert_eq!(restored.get_as::<String>("name").expect("entry"), "resnet");
    assert_eq!(restored.get_as::<f64>("dropout").expect("entry"), 0.25);
    assert_eq!(
        restored.get_as::<Vec<u32>>("milestones").expect("entry"),
        vec![30, 60, 90]
    );
    let optimizer = restored.state::<Optimizer>("optimizer").expect("entry");
    assert_eq!(optimizer.lr, 0.1);
    assert_eq!(optimizer.step, 42);
}

#[test]
fn test_without_stateful_extra_the_raw_state_is_kept() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("run.state.yaml");

    let mut params = ParameterBag::new();
    params
        .set_state("optimizer", Optimizer { lr: 0.5, step: 1, device: None })
        .expect("entry");
    params.save(&path).expect("save should succeed");

    let restored = ParameterBag::from_file(&path, Vec::<(String, Param)>::new())
        .expect("load should succeed");
    assert_eq!(
        restored.value("optimizer").expect("entry"),
        &json!({ "lr": 0.5, "step": 1 })
    );
}

#[test]
fn test_private_entries_stay_out_of_the_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("run.state.json");

    let mut params = ParameterBag::new();
    params.set("_loader", Param::object(vec![0u8; 16])).expect("entry");
    params.set("_workers", 8).expect("entry");
    params.set("lr", 0.01).expect("entry");
    params.save(&path).expect("save should succeed");

    let content = std::fs::read_to_string(&path).expect("read");
    assert!(!content.contains("loader"));
    assert!(!content.contains("workers"));

    let mapping = StateFormat::Json.decode(&content).expect("decode");
    assert_eq!(
        mapping.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["batch", "epoch", "lr"]
    );
}

#[test]
fn test_opaque_persistent_entry_fails_to_save() {
    let dir = TempDir::new().expect("temp dir");
    let mut params = ParameterBag::new();
    params.set("loader", Param::object(vec![1, 2, 3])).expect("entry");

    let err = params
        .save(dir.path().join("x.state.json"))
        .expect_err("opaque objects cannot be saved");
    assert!(matches!(err, Error::NotSerializable { ref name } if name == "loader"));
    assert_eq!(err.kind(), ErrorKind::Deserialization);
}

#[test]
fn test_to_device_moves_stateful_entries() {
    let mut params = ParameterBag::new();
    params.set_state("_opt", Optimizer::default()).expect("entry");
    params.to_device(&"cuda:1".parse().expect("device")).expect("move");

    let optimizer = params.state::<Optimizer>("opt").expect("entry");
    assert_eq!(optimizer.device, Some(Device::Cuda(1)));
}

proptest! {
    #[test]
    fn prop_save_load_round_trips_plain_values(
        entries in proptest::collection::btree_map("[a-z]{1,8}", -1_000i64..1_000, 0..8),
        private in proptest::collection::btree_map("[a-z]{1,8}", any::<bool>(), 0..4),
    ) {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("prop.state.json");

        let mut params = ParameterBag::new();
        for (key, value) in &entries {
            if key == "batch" || key == "epoch" {
                continue;
            }
            params.set(key, *value).expect("entry");
        }
        for (key, value) in &private {
            if entries.contains_key(key) || key == "batch" || key == "epoch" {
                continue;
            }
            params.set(&format!("_{key}"), *value).expect("entry");
        }
        params.save(&path).expect("save");

        let mut restored = ParameterBag::new();
        restored.load(&path).expect("load");

        for (key, value) in &entries {
            if key == "batch" || key == "epoch" {
                continue;
            }
            prop_assert_eq!(restored.get_as::<i64>(key).expect("entry"), *value);
        }
        for key in private.keys() {
            if !entries.contains_key(key) && key != "batch" && key != "epoch" {
                prop_assert!(!restored.contains(key));
            }
        }

        // Saving the restored bag yields the same file.
        let again = dir.path().join("again.state.json");
        restored.save(&again).expect("save");
        prop_assert_eq!(
            std::fs::read_to_string(&path).expect("read"),
            std::fs::read_to_string(&again).expect("read")
        );
    }
}
