use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructuralKind {
    NameProperty,
    PackageIndex,
    TextProperty,
    StructProperty,
    BlueprintGeneratedClass,
    ActorProperty,
    ObjectProperty,
    SoftObjectProperty,
    ResolvedScriptObject,
    ResolvedLoadedObject,
    #[default]
    Other,
}

/// Engine naming prefix for a structural kind. `hint` is the target class
/// name of object-valued properties; actors get `A` instead of `U`.
pub fn prefix(kind: StructuralKind, hint: &str) -> &'static str {
    match kind {
        StructuralKind::NameProperty
        | StructuralKind::PackageIndex
        | StructuralKind::TextProperty
        | StructuralKind::StructProperty => "F",
        StructuralKind::BlueprintGeneratedClass | StructuralKind::ActorProperty => "A",
        StructuralKind::ObjectProperty if hint.contains("Actor") => "A",
        StructuralKind::ResolvedScriptObject
        | StructuralKind::ResolvedLoadedObject
        | StructuralKind::SoftObjectProperty
        | StructuralKind::ObjectProperty => "U",
        StructuralKind::Other => "",
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyFlags(pub u64);

impl PropertyFlags {
    pub const NONE: PropertyFlags = PropertyFlags(0);
    pub const CONST_PARM: PropertyFlags = PropertyFlags(0x0000_0000_0000_0002);
    pub const PARM: PropertyFlags = PropertyFlags(0x0000_0000_0000_0080);
    pub const OUT_PARM: PropertyFlags = PropertyFlags(0x0000_0000_0000_0100);
    pub const RETURN_PARM: PropertyFlags = PropertyFlags(0x0000_0000_0000_0400);
    pub const INSTANCED_REFERENCE: PropertyFlags = PropertyFlags(0x0000_0000_0008_0000);
    pub const REFERENCE_PARM: PropertyFlags = PropertyFlags(0x0000_0000_0800_0000);
    pub const CONTAINS_INSTANCED_REFERENCE: PropertyFlags = PropertyFlags(0x0000_0080_0000_0000);

    pub const fn contains(self, other: PropertyFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: PropertyFlags) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for PropertyFlags {
    type Output = PropertyFlags;

    fn bitor(self, rhs: PropertyFlags) -> PropertyFlags {
        PropertyFlags(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDesc {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub flags: PropertyFlags,
    pub kind: PropertyKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PropertyKind {
    Int8,
    Int16,
    Int,
    Int64,
    UInt16,
    UInt32,
    UInt64,
    Bool,
    Float,
    Double,
    Str,
    Name,
    Text,
    Object {
        #[serde(default)]
        property_class: Option<String>,
    },
    WeakObject {
        #[serde(default)]
        property_class: Option<String>,
    },
    LazyObject {
        #[serde(default)]
        property_class: Option<String>,
    },
    SoftObject {
        #[serde(default)]
        property_class: Option<String>,
    },
    Class {
        #[serde(default)]
        meta_class: Option<String>,
    },
    SoftClass {
        #[serde(default)]
        meta_class: Option<String>,
    },
    Interface {
        #[serde(default)]
        interface_class: Option<String>,
    },
    Enum {
        #[serde(default)]
        enum_name: Option<String>,
    },
    Byte {
        #[serde(default)]
        enum_name: Option<String>,
    },
    Struct {
        #[serde(default)]
        struct_name: Option<String>,
    },
    FieldPath {
        property_class: String,
    },
    Delegate {
        #[serde(default)]
        signature_function: Option<String>,
    },
    MulticastDelegate {
        #[serde(default)]
        signature_function: Option<String>,
    },
    MulticastInlineDelegate {
        #[serde(default)]
        signature_function: Option<String>,
    },
    MulticastSparseDelegate {
        #[serde(default)]
        signature_function: Option<String>,
    },
    Array {
        inner: Box<PropertyDesc>,
    },
    Set {
        element: Box<PropertyDesc>,
    },
    Map {
        key: Box<PropertyDesc>,
        value: Box<PropertyDesc>,
    },
    /// A property class the model has no shape for; carries the parser's
    /// class name, e.g. `FOptionalProperty`.
    Other {
        type_name: String,
    },
}

impl PropertyDesc {
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            flags: PropertyFlags::NONE,
            kind,
        }
    }

    pub fn with_flags(mut self, flags: PropertyFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn structural_kind(&self) -> StructuralKind {
        match self.kind {
            PropertyKind::Name => StructuralKind::NameProperty,
            PropertyKind::Text => StructuralKind::TextProperty,
            PropertyKind::Struct { .. } => StructuralKind::StructProperty,
            PropertyKind::Object { .. } => StructuralKind::ObjectProperty,
            PropertyKind::SoftObject { .. } => StructuralKind::SoftObjectProperty,
            _ => StructuralKind::Other,
        }
    }

    pub fn is_object_valued(&self) -> bool {
        matches!(
            self.kind,
            PropertyKind::Object { .. }
                | PropertyKind::WeakObject { .. }
                | PropertyKind::LazyObject { .. }
                | PropertyKind::SoftObject { .. }
                | PropertyKind::Class { .. }
                | PropertyKind::SoftClass { .. }
        )
    }

    pub fn prefix(&self) -> &'static str {
        prefix(self.structural_kind(), &property_type_name(self))
    }
}

impl fmt::Display for PropertyDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix(), property_type_name(self))
    }
}

fn or_unknown<'a>(name: &'a Option<String>, sentinel: &'a str) -> &'a str {
    name.as_deref().unwrap_or(sentinel)
}

pub fn unknown_field_type(type_name: &str) -> String {
    let start = type_name.chars().next().map_or(0, char::len_utf8);
    match type_name.find("Property") {
        Some(idx) if idx > start => type_name[start..idx].to_string(),
        _ => type_name.to_string(),
    }
}

pub fn property_type_name(property: &PropertyDesc) -> String {
    match &property.kind {
        PropertyKind::Int8 => "int8".into(),
        PropertyKind::Int16 => "int16".into(),
        PropertyKind::Int => "int".into(),
        PropertyKind::Int64 => "int64".into(),
        PropertyKind::UInt16 => "uint16".into(),
        PropertyKind::UInt32 => "uint32".into(),
        PropertyKind::UInt64 => "uint64".into(),
        PropertyKind::Bool => "bool".into(),
        PropertyKind::Float => "float".into(),
        PropertyKind::Double => "double".into(),
        PropertyKind::Str => "FString".into(),
        PropertyKind::Name => unknown_field_type("FNameProperty"),
        PropertyKind::Text => unknown_field_type("FTextProperty"),
        PropertyKind::Class { meta_class } => {
            format!("{} Class", or_unknown(meta_class, "UKN_ObjectMetaClass"))
        }
        PropertyKind::SoftClass { meta_class } => {
            format!("{} Class (soft)", or_unknown(meta_class, "UKN_ObjectMetaClass"))
        }
        PropertyKind::Object { property_class }
        | PropertyKind::WeakObject { property_class }
        | PropertyKind::LazyObject { property_class }
        | PropertyKind::SoftObject { property_class } => {
            or_unknown(property_class, "UKN_ObjectPropertyClass").to_string()
        }
        PropertyKind::Enum { enum_name } => or_unknown(enum_name, "Enum").to_string(),
        PropertyKind::Byte { enum_name } => or_unknown(enum_name, "Byte").to_string(),
        PropertyKind::Interface { interface_class } => {
            format!("{} interface", or_unknown(interface_class, "UKN_InterfaceClass"))
        }
        PropertyKind::Struct { struct_name } => or_unknown(struct_name, "Struct").to_string(),
        PropertyKind::FieldPath { property_class } => format!("{property_class} field path"),
        PropertyKind::Delegate { signature_function } => {
            format!("{} (Delegate)", or_unknown(signature_function, "UKN_SignatureFunction"))
        }
        PropertyKind::MulticastDelegate { signature_function } => format!(
            "{} (MulticastDelegateProperty)",
            or_unknown(signature_function, "UKN_SignatureFunction")
        ),
        PropertyKind::MulticastInlineDelegate { signature_function } => format!(
            "{} (MulticastInlineDelegateProperty)",
            or_unknown(signature_function, "UKN_SignatureFunction")
        ),
        PropertyKind::MulticastSparseDelegate { signature_function } => format!(
            "{} (MulticastSparseDelegateProperty)",
            or_unknown(signature_function, "UKN_SignatureFunction")
        ),
        PropertyKind::Array { inner } => {
            format!("TArray<{}>", element_type(property, inner))
        }
        PropertyKind::Set { element } => {
            format!("TSet<{}>", element_type(property, element))
        }
        PropertyKind::Map { key, value } => {
            format!("TMap<{}, {}>", key, element_type(property, value))
        }
        PropertyKind::Other { type_name } => unknown_field_type(type_name),
    }
}

const OWNING_REFERENCE: PropertyFlags = PropertyFlags(
    PropertyFlags::INSTANCED_REFERENCE.0
        | PropertyFlags::REFERENCE_PARM.0
        | PropertyFlags::CONTAINS_INSTANCED_REFERENCE.0,
);

// `*` marks owning references, not a literal pointer type.
fn element_type(container: &PropertyDesc, element: &PropertyDesc) -> String {
    let owning = container.flags.intersects(OWNING_REFERENCE)
        || element.flags.intersects(OWNING_REFERENCE)
        || element.is_object_valued();
    format!("{}{}", element, if owning { "*" } else { "" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn object(class: &str) -> PropertyDesc {
        PropertyDesc::new(
            "Obj",
            PropertyKind::Object {
                property_class: Some(class.into()),
            },
        )
    }

    #[rstest]
    #[case(StructuralKind::NameProperty, "", "F")]
    #[case(StructuralKind::PackageIndex, "", "F")]
    #[case(StructuralKind::TextProperty, "", "F")]
    #[case(StructuralKind::StructProperty, "", "F")]
    #[case(StructuralKind::BlueprintGeneratedClass, "", "A")]
    #[case(StructuralKind::ActorProperty, "", "A")]
    #[case(StructuralKind::ObjectProperty, "PlayerActor", "A")]
    #[case(StructuralKind::ObjectProperty, "Widget", "U")]
    #[case(StructuralKind::SoftObjectProperty, "Actor", "U")]
    #[case(StructuralKind::ResolvedScriptObject, "", "U")]
    #[case(StructuralKind::ResolvedLoadedObject, "", "U")]
    #[case(StructuralKind::Other, "Actor", "")]
    fn test_prefix(#[case] kind: StructuralKind, #[case] hint: &str, #[case] expected: &str) {
        assert_eq!(prefix(kind, hint), expected);
    }

    #[rstest]
    #[case(PropertyKind::Int8, "int8")]
    #[case(PropertyKind::Int, "int")]
    #[case(PropertyKind::UInt64, "uint64")]
    #[case(PropertyKind::Bool, "bool")]
    #[case(PropertyKind::Double, "double")]
    #[case(PropertyKind::Str, "FString")]
    #[case(PropertyKind::Name, "Name")]
    #[case(PropertyKind::Class { meta_class: Some("Actor".into()) }, "Actor Class")]
    #[case(PropertyKind::Class { meta_class: None }, "UKN_ObjectMetaClass Class")]
    #[case(PropertyKind::SoftClass { meta_class: Some("Pawn".into()) }, "Pawn Class (soft)")]
    #[case(PropertyKind::Object { property_class: None }, "UKN_ObjectPropertyClass")]
    #[case(PropertyKind::Enum { enum_name: None }, "Enum")]
    #[case(PropertyKind::Byte { enum_name: Some("ECollisionChannel".into()) }, "ECollisionChannel")]
    #[case(PropertyKind::Interface { interface_class: None }, "UKN_InterfaceClass interface")]
    #[case(PropertyKind::Struct { struct_name: None }, "Struct")]
    #[case(PropertyKind::FieldPath { property_class: "IntProperty".into() }, "IntProperty field path")]
    #[case(PropertyKind::Delegate { signature_function: Some("OnHit__DelegateSignature".into()) }, "OnHit__DelegateSignature (Delegate)")]
    #[case(PropertyKind::MulticastInlineDelegate { signature_function: None }, "UKN_SignatureFunction (MulticastInlineDelegateProperty)")]
    #[case(PropertyKind::Other { type_name: "FOptionalProperty".into() }, "Optional")]
    #[case(PropertyKind::Other { type_name: "FUtf8Str".into() }, "FUtf8Str")]
    #[case(PropertyKind::Other { type_name: "ÜberProperty".into() }, "ber")]
    #[case(PropertyKind::Other { type_name: "Property".into() }, "Property")]
    fn test_property_type_name(#[case] kind: PropertyKind, #[case] expected: &str) {
        assert_eq!(property_type_name(&PropertyDesc::new("P", kind)), expected);
    }

    #[test]
    fn test_array_of_objects_is_marked_owning() {
        let array = PropertyDesc::new(
            "Targets",
            PropertyKind::Array {
                inner: Box::new(object("Actor")),
            },
        );
        assert_eq!(property_type_name(&array), "TArray<AActor*>");
    }

    #[test]
    fn test_array_of_ints_is_plain() {
        let array = PropertyDesc::new(
            "Counts",
            PropertyKind::Array {
                inner: Box::new(PropertyDesc::new("Counts", PropertyKind::Int)),
            },
        );
        assert_eq!(property_type_name(&array), "TArray<int>");
    }

    #[test]
    fn test_reference_parm_set_is_marked_owning() {
        let set = PropertyDesc::new(
            "Names",
            PropertyKind::Set {
                element: Box::new(PropertyDesc::new("Names", PropertyKind::Name)),
            },
        )
        .with_flags(PropertyFlags::PARM | PropertyFlags::REFERENCE_PARM);
        assert_eq!(property_type_name(&set), "TSet<FName*>");
    }

    #[test]
    fn test_map_prefixes_key_and_value_separately() {
        let map = PropertyDesc::new(
            "Lookup",
            PropertyKind::Map {
                key: Box::new(PropertyDesc::new("Key", PropertyKind::Name)),
                value: Box::new(PropertyDesc::new(
                    "Value",
                    PropertyKind::Struct {
                        struct_name: Some("Vector".into()),
                    },
                )),
            },
        );
        assert_eq!(property_type_name(&map), "TMap<FName, FVector>");
    }

    #[test]
    fn test_display_includes_prefix() {
        assert_eq!(object("Widget").to_string(), "UWidget");
        assert_eq!(object("PlayerActor").to_string(), "APlayerActor");
    }
}
