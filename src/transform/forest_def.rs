use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::Value;
use crate::foundation::error::{PageError, PageResult};
use crate::foundation::math::Mat4;
use crate::graph::node::{SizedLink, TransformLink};
use crate::transform::forest::{ForestOp, ForestParams, ForestRecord};
use crate::transform::pivot::{AnchorX, AnchorY};

/// JSON form of a transform forest.
///
/// ```json
/// { "forest": [ { "type": "translate", "name": "A", "x": 10,
///                 "children": [ { "type": "scale", "name": "B", "x": 2, "y": 2 } ] } ] }
/// ```
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ForestDef {
    pub forest: Vec<RecordDef>,
    #[serde(default)]
    pub instant_calculate: Option<bool>,
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Name(String),
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecordDef {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub enable: Option<bool>,
    #[serde(default)]
    pub x: Option<Scalar>,
    #[serde(default)]
    pub y: Option<Scalar>,
    #[serde(default)]
    pub z: Option<Scalar>,
    #[serde(default, alias = "radian")]
    pub radians: Option<bool>,
    #[serde(default, alias = "transformMatrix")]
    pub matrix: Option<Vec<f64>>,
    #[serde(default)]
    pub transform_node: Option<String>,
    #[serde(default)]
    pub object_node: Option<String>,
    #[serde(default)]
    pub children: Vec<RecordDef>,
}

/// Named nodes that `transformNode` / `objectNode` references resolve against.
#[derive(Clone, Debug, Default)]
pub struct ForestBindings {
    transforms: BTreeMap<String, TransformLink>,
    objects: BTreeMap<String, SizedLink>,
}

impl ForestBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(mut self, name: impl Into<String>, node: TransformLink) -> Self {
        self.transforms.insert(name.into(), node);
        self
    }

    pub fn object(mut self, name: impl Into<String>, node: SizedLink) -> Self {
        self.objects.insert(name.into(), node);
        self
    }

    fn lookup_transform(&self, name: Option<&str>) -> Option<TransformLink> {
        let name = name?;
        let found = self.transforms.get(name).cloned();
        if found.is_none() {
            tracing::warn!(name, "unbound transformNode in forest, using identity");
        }
        found
    }

    fn lookup_object(&self, name: Option<&str>) -> Option<SizedLink> {
        let name = name?;
        let found = self.objects.get(name).cloned();
        if found.is_none() {
            tracing::warn!(name, "unbound objectNode in forest, anchors resolve to 0");
        }
        found
    }
}

impl ForestDef {
    pub fn from_json_str(s: &str) -> PageResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| PageError::serde(format!("parse transform forest JSON: {e}")))
    }

    pub fn from_reader<R: std::io::Read>(r: R) -> PageResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PageError::serde(format!("parse transform forest JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> PageResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PageError::validation(format!("open transform forest JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Resolve types and node references into forest params.
    pub fn into_params(self, bindings: &ForestBindings) -> PageResult<ForestParams> {
        let records = self
            .forest
            .into_iter()
            .map(|r| r.into_record(bindings))
            .collect::<PageResult<Vec<_>>>()?;
        let mut params = ForestParams::new(records);
        if let Some(instant) = self.instant_calculate {
            params.instant_calculate = Value::Literal(instant);
        }
        Ok(params)
    }
}

fn number(v: Option<Scalar>, default: f64, field: &str, kind: &str) -> PageResult<Value<f64>> {
    match v {
        None => Ok(Value::Literal(default)),
        Some(Scalar::Number(n)) => Ok(Value::Literal(n)),
        Some(Scalar::Name(s)) => Err(PageError::validation(format!(
            "forest record of type '{kind}': field '{field}' must be a number, got '{s}'"
        ))),
    }
}

impl RecordDef {
    fn into_record(self, bindings: &ForestBindings) -> PageResult<ForestRecord> {
        let kind = self.kind.to_ascii_lowercase();
        let op = match kind.as_str() {
            "node" => ForestOp::Node(bindings.lookup_transform(self.transform_node.as_deref())),
            "matrix" => {
                let m = match self.matrix {
                    None => None,
                    Some(values) => {
                        let arr: [f64; 16] = values.try_into().map_err(|v: Vec<f64>| {
                            PageError::validation(format!(
                                "forest matrix must have 16 elements, got {}",
                                v.len()
                            ))
                        })?;
                        Some(Value::Literal(Mat4(arr)))
                    }
                };
                ForestOp::Matrix(m)
            }
            "pivotpoint" => ForestOp::PivotPoint {
                x: match self.x {
                    None => AnchorX::default(),
                    Some(Scalar::Number(n)) => n.into(),
                    Some(Scalar::Name(s)) => AnchorX::parse(&s),
                },
                y: match self.y {
                    None => AnchorY::default(),
                    Some(Scalar::Number(n)) => n.into(),
                    Some(Scalar::Name(s)) => AnchorY::parse(&s),
                },
                object: bindings.lookup_object(self.object_node.as_deref()),
            },
            "scale" => ForestOp::Scale {
                x: number(self.x, 1.0, "x", &kind)?,
                y: number(self.y, 1.0, "y", &kind)?,
                z: number(self.z, 1.0, "z", &kind)?,
            },
            "rotate" => ForestOp::Rotate {
                x: number(self.x, 0.0, "x", &kind)?,
                y: number(self.y, 0.0, "y", &kind)?,
                z: number(self.z, 0.0, "z", &kind)?,
                radians: Value::Literal(self.radians.unwrap_or(false)),
            },
            "translate" => ForestOp::Translate {
                x: number(self.x, 0.0, "x", &kind)?,
                y: number(self.y, 0.0, "y", &kind)?,
                z: number(self.z, 0.0, "z", &kind)?,
            },
            other => {
                return Err(PageError::validation(format!(
                    "unknown transform forest record type '{other}'"
                )));
            }
        };

        let children = self
            .children
            .into_iter()
            .map(|c| c.into_record(bindings))
            .collect::<PageResult<Vec<_>>>()?;
        Ok(ForestRecord {
            name: self.name,
            enable: Value::Literal(self.enable.unwrap_or(true)),
            op,
            children,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/forest_def.rs"]
mod tests;
