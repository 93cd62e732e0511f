use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotator {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub rotation: Quat,
    pub translation: Vector,
    pub scale_3d: Vector,
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FVector({}, {}, {})", self.x, self.y, self.z)
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FVector2D({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Rotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FRotator({}, {}, {})", self.pitch, self.yaw, self.roll)
    }
}

impl fmt::Display for Quat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FQuat({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FTransform({}, {}, {})", self.rotation, self.translation, self.scale_3d)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Name(String),
    Text(String),
    Enum(String),
    Object(Option<String>),
    Struct(StructValue),
    Array(Vec<PropertyValue>),
    Map(Vec<(PropertyValue, PropertyValue)>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyTag {
    pub name: String,
    #[serde(default)]
    pub value: Option<PropertyValue>,
}

/// Struct payloads with a dedicated literal spelling. Anything else arrives
/// as a `Fallback` property bag or as pre-rendered `Raw` text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "struct")]
pub enum StructValue {
    Vector(Vector),
    Vector2D(Vector2D),
    Rotator(Rotator),
    Quat(Quat),
    Guid {
        a: u32,
        b: u32,
        c: u32,
        d: u32,
    },
    Color {
        r: u8,
        g: u8,
        b: u8,
        a: u8,
    },
    LinearColor {
        r: f32,
        g: f32,
        b: f32,
        a: f32,
    },
    SoftObjectPath {
        asset_path_name: String,
    },
    UniqueNetIdRepl {
        #[serde(default)]
        unique_net_id: Option<String>,
    },
    NavAgentSelector {
        packed_bits: u32,
    },
    #[serde(rename = "Box")]
    Box3 {
        min: Vector,
        max: Vector,
    },
    Box2D {
        min: Vector2D,
        max: Vector2D,
    },
    IntVector {
        x: i32,
        y: i32,
        z: i32,
    },
    FloatVector {
        x: f32,
        y: f32,
        z: f32,
    },
    FloatVector2D {
        x: f32,
        y: f32,
    },
    DateTime {
        ticks: i64,
    },
    Fallback {
        #[serde(default)]
        properties: Vec<PropertyTag>,
    },
    GameplayTagContainer {
        #[serde(default)]
        tags: Vec<String>,
    },
    Raw {
        #[serde(default)]
        text: Option<String>,
    },
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Int(v) => write!(f, "{v}"),
            PropertyValue::UInt(v) => write!(f, "{v}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Str(s)
            | PropertyValue::Name(s)
            | PropertyValue::Text(s)
            | PropertyValue::Enum(s) => write!(f, "{s}"),
            PropertyValue::Object(Some(path)) => write!(f, "{path}"),
            PropertyValue::Object(None) => write!(f, "None"),
            PropertyValue::Struct(s) => write!(f, "{}", format_struct_value(s)),
            PropertyValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            PropertyValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn nested_fallback(value: &Option<PropertyValue>) -> Option<&[PropertyTag]> {
    match value {
        Some(PropertyValue::Struct(StructValue::Fallback { properties })) => Some(properties),
        _ => None,
    }
}

fn format_nested_leaf(value: &Option<PropertyValue>) -> String {
    match value {
        Some(PropertyValue::Text(s)) | Some(PropertyValue::Name(s)) => format!("\"{s}\""),
        Some(v) => format!("\"{v}\""),
        None => "\"\"".to_string(),
    }
}

fn format_fallback_field(value: &Option<PropertyValue>) -> String {
    match value {
        Some(PropertyValue::Text(s)) | Some(PropertyValue::Name(s)) => format!("\"{s}\""),
        Some(PropertyValue::Object(path)) => {
            format!("\"{}\"", path.as_deref().unwrap_or("None"))
        }
        _ => match nested_fallback(value) {
            // nested structs are flattened one level only
            Some([]) => "{}".to_string(),
            Some(nested) => {
                let fields: Vec<String> = nested
                    .iter()
                    .map(|tag| format!("\"{}\": {}", tag.name, format_nested_leaf(&tag.value)))
                    .collect();
                format!("{{ {} }}", fields.join(", "))
            }
            None => match value {
                Some(v) => format!("\"{v}\""),
                None => "{}".to_string(),
            },
        },
    }
}

pub fn format_struct_fallback(properties: &[PropertyTag]) -> String {
    if properties.is_empty() {
        return "[]".to_string();
    }

    let entries: Vec<String> = properties
        .iter()
        .map(|tag| format!("\t\t{{ \"{}\": {} }}", tag.name, format_fallback_field(&tag.value)))
        .collect();

    format!("[\n{}\n\t]", entries.join(",\n"))
}

pub fn format_tag_container(tags: &[String]) -> String {
    match tags {
        [] => "[]".to_string(),
        [single] => format!("\"{single}\""),
        _ => {
            let quoted: Vec<String> = tags.iter().map(|t| format!("\t\t\"{t}\"")).collect();
            format!("[\n{}\n\t]", quoted.join(",\n"))
        }
    }
}

pub fn format_struct_value(value: &StructValue) -> String {
    match value {
        StructValue::Vector(v) => v.to_string(),
        StructValue::Vector2D(v) => v.to_string(),
        StructValue::Rotator(r) => r.to_string(),
        StructValue::Quat(q) => q.to_string(),
        StructValue::Guid { a, b, c, d } => format!("FGuid({a}, {b}, {c}, {d})"),
        StructValue::Color { r, g, b, a } => format!("FColor({r}, {g}, {b}, {a})"),
        StructValue::LinearColor { r, g, b, a } => format!("FLinearColor({r}, {g}, {b}, {a})"),
        StructValue::SoftObjectPath { asset_path_name } => {
            format!("FSoftObjectPath({asset_path_name})")
        }
        StructValue::UniqueNetIdRepl { unique_net_id } => {
            format!("FUniqueNetIdRepl({})", unique_net_id.as_deref().unwrap_or(""))
        }
        StructValue::NavAgentSelector { packed_bits } => format!("FNavAgentSelector({packed_bits})"),
        StructValue::Box3 { min, max } => format!("FBox({max}, {min})"),
        StructValue::Box2D { min, max } => format!("FBox2D({max}, {min})"),
        StructValue::IntVector { x, y, z } => format!("FVector({x}, {y}, {z})"),
        StructValue::FloatVector { x, y, z } => format!("FVector({x}, {y}, {z})"),
        StructValue::FloatVector2D { x, y } => format!("FVector2D({x}, {y})"),
        StructValue::DateTime { ticks } => format!("FDateTime({ticks})"),
        StructValue::Fallback { properties } => format_struct_fallback(properties),
        StructValue::GameplayTagContainer { tags } => format_tag_container(tags),
        StructValue::Raw { text: Some(text) } => text.clone(),
        StructValue::Raw { text: None } => {
            trace!("struct value without a textual form");
            "Issue here".to_string()
        }
    }
}

pub fn format_property_value(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Str(s) | PropertyValue::Name(s) | PropertyValue::Text(s) => {
            format!("\"{s}\"")
        }
        PropertyValue::Object(Some(path)) => format!("FindObject(\"{path}\")"),
        PropertyValue::Object(None) => "nullptr".to_string(),
        PropertyValue::Struct(s) => format_struct_value(s),
        PropertyValue::Array(items) => {
            let items: Vec<String> = items.iter().map(format_property_value).collect();
            if items.is_empty() {
                "TArray {  }".to_string()
            } else {
                format!("TArray {{ {} }}", items.join(", "))
            }
        }
        PropertyValue::Map(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}: {}", format_property_value(k), format_property_value(v)))
                .collect();
            if entries.is_empty() {
                "TMap {  }".to_string()
            } else {
                format!("TMap {{ {} }}", entries.join(", "))
            }
        }
        other => other.to_string(),
    }
}
