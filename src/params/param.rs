//! Values stored in a [`ParameterBag`](super::ParameterBag)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::str::FromStr;

/// Compute device a [`Stateful`] object can be moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Device {
    /// Host memory
    #[default]
    Cpu,
    /// Accelerator with the given ordinal
    Cuda(usize),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda(idx) => write!(f, "cuda:{idx}"),
        }
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "cuda" => Ok(Device::Cuda(0)),
            other => other
                .strip_prefix("cuda:")
                .and_then(|idx| idx.parse().ok())
                .map(Device::Cuda)
                .ok_or_else(|| format!("unknown device '{s}' (expected cpu, cuda or cuda:N)")),
        }
    }
}

impl TryFrom<String> for Device {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Device> for String {
    fn from(device: Device) -> Self {
        device.to_string()
    }
}

/// Capability of objects that persist themselves through the bag.
///
/// Networks, optimizers and schedulers implement this so that saving the bag
/// stores their state rather than the object, and loading restores that state
/// into the already constructed object.
pub trait Stateful: Any {
    /// Produce a serializable snapshot of the current state.
    fn state(&self) -> Result<Value>;

    /// Restore a snapshot produced by [`Stateful::state`].
    fn load_state(&mut self, state: Value) -> Result<()>;

    /// Move the object to `device`.
    fn to_device(&mut self, _device: &Device) -> Result<()> {
        Ok(())
    }

    /// Short name used when describing the bag.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A single entry of a parameter bag.
pub enum Param {
    /// Plain value, persisted as is
    Value(Value),
    /// Object persisted through its own state contract
    State(Box<dyn Stateful>),
    /// Opaque object that is never persisted
    Object(Box<dyn Any>),
}

impl Param {
    /// Plain value from anything serde can serialize.
    pub fn value<T: Serialize>(value: T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Param::Value)
            .map_err(|e| Error::Serialization {
                message: e.to_string(),
            })
    }

    /// Object with delegated persistence.
    pub fn state<T: Stateful>(obj: T) -> Self {
        Param::State(Box::new(obj))
    }

    /// Opaque object.
    pub fn object<T: Any>(obj: T) -> Self {
        Param::Object(Box::new(obj))
    }

    /// Borrow the plain value, if this is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Param::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the stateful object, if this is one.
    pub fn as_stateful(&self) -> Option<&dyn Stateful> {
        match self {
            Param::State(obj) => Some(obj.as_ref()),
            _ => None,
        }
    }

    /// Downcast a stateful or opaque entry to a concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Param::Value(_) => None,
            Param::State(obj) => {
                let any: &dyn Any = obj.as_ref();
                any.downcast_ref()
            }
            Param::Object(obj) => obj.downcast_ref(),
        }
    }

    /// Mutable variant of [`Param::downcast_ref`].
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        match self {
            Param::Value(_) => None,
            Param::State(obj) => {
                let any: &mut dyn Any = obj.as_mut();
                any.downcast_mut()
            }
            Param::Object(obj) => obj.downcast_mut(),
        }
    }

    /// Whether a non-transient entry of this kind can be saved.
    pub fn is_persistable(&self) -> bool {
        !matches!(self, Param::Object(_))
    }

    /// One-line rendering used by `describe`.
    pub(crate) fn summary(&self) -> String {
        match self {
            Param::Value(v) => v.to_string(),
            Param::State(obj) => format!("<{}>", obj.name()),
            Param::Object(_) => "<object>".to_string(),
        }
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Param::State(obj) => f.debug_tuple("State").field(&obj.name()).finish(),
            Param::Object(_) => f.write_str("Object(..)"),
        }
    }
}

impl From<Value> for Param {
    fn from(value: Value) -> Self {
        Param::Value(value)
    }
}

macro_rules! impl_from_plain {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Param {
                fn from(value: $ty) -> Self {
                    Param::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_from_plain!(bool, i32, i64, u32, u64, usize, f32, f64, String, &str);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Counter(u32);

    impl Stateful for Counter {
        fn state(&self) -> Result<Value> {
            Ok(json!(self.0))
        }

        fn load_state(&mut self, state: Value) -> Result<()> {
            self.0 = state.as_u64().ok_or_else(|| Error::deserialization("not a count"))? as u32;
            Ok(())
        }
    }

    #[test]
    fn test_device_parse_and_display() {
        assert_eq!("cpu".parse::<Device>().unwrap(), Device::Cpu);
        assert_eq!("cuda".parse::<Device>().unwrap(), Device::Cuda(0));
        assert_eq!("CUDA:2".parse::<Device>().unwrap(), Device::Cuda(2));
        assert!("tpu".parse::<Device>().is_err());
        assert!("cuda:x".parse::<Device>().is_err());
        assert_eq!(Device::Cuda(1).to_string(), "cuda:1");
    }

    #[test]
    fn test_device_serde_as_string() {
        let yaml = serde_yaml::to_string(&Device::Cuda(3)).unwrap();
        assert!(yaml.contains("cuda:3"));
        let device: Device = serde_yaml::from_str("cpu").unwrap();
        assert_eq!(device, Device::Cpu);
    }

    #[test]
    fn test_param_from_plain_values() {
        assert_eq!(Param::from(3).as_value(), Some(&json!(3)));
        assert_eq!(Param::from(0.5).as_value(), Some(&json!(0.5)));
        assert_eq!(Param::from("sgd").as_value(), Some(&json!("sgd")));
        assert_eq!(Param::from(true).as_value(), Some(&json!(true)));
    }

    #[test]
    fn test_param_value_from_serialize() {
        let param = Param::value(vec![1, 2, 3]).unwrap();
        assert_eq!(param.as_value(), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn test_downcast_state_and_object() {
        let mut state = Param::state(Counter(4));
        assert_eq!(state.downcast_ref::<Counter>().map(|c| c.0), Some(4));
        state.downcast_mut::<Counter>().unwrap().0 = 9;
        assert_eq!(state.downcast_ref::<Counter>().map(|c| c.0), Some(9));
        assert!(state.downcast_ref::<String>().is_none());

        let object = Param::object(vec![1u8, 2]);
        assert_eq!(object.downcast_ref::<Vec<u8>>().map(Vec::len), Some(2));
        assert!(Param::from(1).downcast_ref::<i64>().is_none());
    }

    #[test]
    fn test_persistable_kinds() {
        assert!(Param::from(1).is_persistable());
        assert!(Param::state(Counter(0)).is_persistable());
        assert!(!Param::object(()).is_persistable());
    }

    #[test]
    fn test_summary_names_stateful_type() {
        let summary = Param::state(Counter(0)).summary();
        assert!(summary.contains("Counter"));
        assert_eq!(Param::object(()).summary(), "<object>");
    }
}
