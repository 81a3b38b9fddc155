//! Decoding of the KScreen backend's configuration map.
//!
//! `getConfig` answers with nested `a{sv}` / `av` values. They are first
//! flattened into a small owned tree so the field lookups below do not have
//! to deal with variant boxing or borrowed lifetimes.

use std::collections::HashMap;
use zvariant::{OwnedValue, Value};

use crate::Result;
use crate::api::models::{
    DisplayConfig, Error, Output, Position, Rotation, ScreenFeatures, Size,
};

// Largest magnitude below which every integral f64 converts to i64 exactly.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Map(HashMap<String, Node>),
    List(Vec<Node>),
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Other,
}

impl Node {
    fn from_value(value: &Value<'_>) -> Self {
        match value {
            Value::Value(inner) => Self::from_value(inner),
            Value::Bool(b) => Self::Bool(*b),
            Value::U8(n) => Self::Int(i64::from(*n)),
            Value::I16(n) => Self::Int(i64::from(*n)),
            Value::U16(n) => Self::Int(i64::from(*n)),
            Value::I32(n) => Self::Int(i64::from(*n)),
            Value::U32(n) => Self::Int(i64::from(*n)),
            Value::I64(n) => Self::Int(*n),
            Value::U64(n) => i64::try_from(*n).map_or(Self::Other, Self::Int),
            Value::F64(f) => Self::Float(*f),
            Value::Str(s) => Self::Text(s.to_string()),
            Value::Array(a) => Self::List(a.iter().map(Self::from_value).collect()),
            Value::Dict(d) => Self::Map(
                d.iter()
                    .filter_map(|(k, v)| match k {
                        Value::Str(key) => Some((key.to_string(), Self::from_value(v))),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => Self::Other,
        }
    }

    fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Self::Map(m) => m.get(key),
            _ => None,
        }
    }

    /// Integer at `key`. Floats count only when they hold an exact integer.
    fn int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Self::Int(n) => Some(*n),
            Self::Float(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT => Some(*f as i64),
            _ => None,
        }
    }

    /// Integer at `key` that fits an `i32`.
    fn int32(&self, key: &str) -> Option<i32> {
        self.int(key).and_then(|n| i32::try_from(n).ok())
    }

    fn float(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Self::Float(f) => Some(*f),
            Self::Int(n) => i32::try_from(*n).ok().map(f64::from),
            _ => None,
        }
    }

    fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Self::Bool(true)))
    }

    fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Self::Text(s) => Some(s.clone()),
            Self::Int(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn list(&self, key: &str) -> &[Node] {
        match self.get(key) {
            Some(Self::List(items)) => items,
            _ => &[],
        }
    }
}

/// Parses the map returned by `getConfig`.
///
/// A map without an `outputs` entry is not a configuration.
pub(crate) fn parse_config(map: &HashMap<String, OwnedValue>) -> Result<DisplayConfig> {
    let root = Node::Map(
        map.iter()
            .map(|(k, v)| (k.clone(), Node::from_value(v)))
            .collect(),
    );

    if root.get("outputs").is_none() {
        return Err(Error::InvalidConfig("missing outputs".into()));
    }

    let features = root
        .int("features")
        .and_then(|f| u32::try_from(f).ok())
        .map(ScreenFeatures::from_bits_truncate)
        .unwrap_or_default();

    let outputs = root
        .list("outputs")
        .iter()
        .map(parse_output)
        .collect::<Result<Vec<_>>>()?;

    Ok(DisplayConfig { features, outputs })
}

fn parse_output(node: &Node) -> Result<Output> {
    let id = node
        .int32("id")
        .ok_or_else(|| Error::InvalidConfig("output without id".into()))?;

    let position = node
        .get("pos")
        .map(|pos| Position {
            x: pos.int32("x").unwrap_or(0),
            y: pos.int32("y").unwrap_or(0),
        })
        .unwrap_or_default();

    let current_mode = node.text("currentModeId").and_then(|current| {
        node.list("modes")
            .iter()
            .find(|mode| mode.text("id").as_deref() == Some(current.as_str()))
    });

    let size = current_mode.and_then(|mode| mode.get("size")).map(|size| Size {
        width: size.int32("width").unwrap_or(0),
        height: size.int32("height").unwrap_or(0),
    });

    Ok(Output {
        id,
        name: node.text("name").unwrap_or_default(),
        enabled: node.flag("enabled"),
        connected: node.flag("connected"),
        primary: node.flag("primary"),
        position,
        size,
        refresh_rate: current_mode.and_then(|mode| mode.float("refreshRate")),
        scale: node.float("scale").unwrap_or(1.0),
        rotation: node.int("rotation").map(Rotation::from).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(entries: Vec<(&str, Value<'static>)>) -> Value<'static> {
        let map: HashMap<String, Value<'static>> = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::new(v)))
            .collect();
        Value::from(map)
    }

    fn laptop_output() -> Value<'static> {
        dict(vec![
            ("id", Value::from(1i32)),
            ("name", Value::from("eDP-1")),
            ("enabled", Value::from(true)),
            ("connected", Value::from(true)),
            ("primary", Value::from(true)),
            ("currentModeId", Value::from("2")),
            (
                "pos",
                dict(vec![("x", Value::from(0i32)), ("y", Value::from(0i32))]),
            ),
            (
                "modes",
                Value::from(vec![
                    Value::new(dict(vec![
                        ("id", Value::from("1")),
                        ("refreshRate", Value::from(60.0f64)),
                        (
                            "size",
                            dict(vec![
                                ("width", Value::from(1280i32)),
                                ("height", Value::from(800i32)),
                            ]),
                        ),
                    ])),
                    Value::new(dict(vec![
                        ("id", Value::from("2")),
                        ("refreshRate", Value::from(144.0f64)),
                        (
                            "size",
                            dict(vec![
                                ("width", Value::from(2560i32)),
                                ("height", Value::from(1600i32)),
                            ]),
                        ),
                    ])),
                ]),
            ),
            ("rotation", Value::from(8i32)),
            ("scale", Value::from(1.5f64)),
        ])
    }

    fn config(outputs: Vec<Value<'static>>, features: i32) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        map.insert(
            "features".to_string(),
            OwnedValue::try_from(Value::from(features)).unwrap(),
        );
        let outputs: Vec<Value<'static>> = outputs.into_iter().map(Value::new).collect();
        map.insert(
            "outputs".to_string(),
            OwnedValue::try_from(Value::from(outputs)).unwrap(),
        );
        map
    }

    #[test]
    fn parses_output_with_current_mode() {
        let cfg = parse_config(&config(vec![laptop_output()], 0b1_0001)).unwrap();

        assert!(cfg.auto_rotation_supported());
        assert_eq!(cfg.outputs.len(), 1);

        let out = &cfg.outputs[0];
        assert_eq!(out.id, 1);
        assert_eq!(out.name, "eDP-1");
        assert!(out.enabled && out.connected && out.primary);
        assert_eq!(out.position, Position { x: 0, y: 0 });
        assert_eq!(
            out.size,
            Some(Size {
                width: 2560,
                height: 1600
            })
        );
        assert_eq!(out.refresh_rate, Some(144.0));
        assert_eq!(out.scale, 1.5);
        assert_eq!(out.rotation, Rotation::Right);
    }

    #[test]
    fn disconnected_output_without_mode() {
        let hdmi = dict(vec![
            ("id", Value::from(2i32)),
            ("name", Value::from("HDMI-1")),
            ("connected", Value::from(false)),
        ]);
        let cfg = parse_config(&config(vec![hdmi], 0)).unwrap();

        let out = &cfg.outputs[0];
        assert!(!out.connected);
        assert!(!out.enabled);
        assert_eq!(out.size, None);
        assert_eq!(out.refresh_rate, None);
        assert_eq!(out.scale, 1.0);
        assert_eq!(out.rotation, Rotation::Normal);
        assert!(!cfg.auto_rotation_supported());
    }

    #[test]
    fn tablet_mode_counts_as_auto_rotation() {
        let cfg = parse_config(&config(vec![], 1 << 5)).unwrap();
        assert!(cfg.auto_rotation_supported());
        assert!(cfg.outputs.is_empty());
    }

    #[test]
    fn out_of_range_numbers_are_not_truncated() {
        let odd = dict(vec![
            ("id", Value::from(3i32)),
            (
                "pos",
                dict(vec![
                    ("x", Value::from(i64::from(i32::MAX) + 1)),
                    ("y", Value::from(1080.0f64)),
                ]),
            ),
            ("rotation", Value::from(2.5f64)),
        ]);
        let cfg = parse_config(&config(vec![odd], 0)).unwrap();

        let out = &cfg.outputs[0];
        assert_eq!(out.position, Position { x: 0, y: 1080 });
        assert_eq!(out.rotation, Rotation::Normal);

        let huge_id = dict(vec![("id", Value::from(i64::MAX))]);
        assert!(matches!(
            parse_config(&config(vec![huge_id], 0)),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn missing_outputs_is_invalid() {
        let map = HashMap::new();
        assert!(matches!(parse_config(&map), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn output_without_id_is_invalid() {
        let nameless = dict(vec![("name", Value::from("DP-3"))]);
        assert!(matches!(
            parse_config(&config(vec![nameless], 0)),
            Err(Error::InvalidConfig(_))
        ));
    }
}
