use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::RenderOptions;
use crate::expr::{ExprKind, KismetExpression, ObjectRef};
use crate::labels::collect_jump_targets;
use crate::render::{ExpressionRenderer, RenderMode};
use crate::structs::{PropertyValue, format_property_value};
use crate::types::{PropertyDesc, PropertyFlags, StructuralKind, prefix};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptFunction {
    pub name: String,
    #[serde(default)]
    pub return_property: Option<PropertyDesc>,
    #[serde(default)]
    pub parameters: Vec<PropertyDesc>,
    #[serde(default)]
    pub script: Vec<KismetExpression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProperty {
    pub property: PropertyDesc,
    #[serde(default)]
    pub default_value: Option<PropertyValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptClass {
    pub name: String,
    #[serde(default)]
    pub kind: StructuralKind,
    #[serde(default)]
    pub super_class: Option<ObjectRef>,
    #[serde(default)]
    pub properties: Vec<ClassProperty>,
    #[serde(default)]
    pub functions: Vec<ScriptFunction>,
}

impl ScriptClass {
    pub fn function(&self, name: &str) -> Option<&ScriptFunction> {
        self.functions.iter().find(|f| f.name == name)
    }
}

fn parameter_decl(param: &PropertyDesc) -> String {
    let constness = if param.flags.contains(PropertyFlags::CONST_PARM) {
        "const "
    } else {
        ""
    };
    let reference = if param.flags.intersects(PropertyFlags::OUT_PARM | PropertyFlags::REFERENCE_PARM) {
        "&"
    } else {
        ""
    };
    format!("{constness}{param}{reference} {}", param.name)
}

fn signature(function: &ScriptFunction) -> String {
    let return_type = function
        .return_property
        .as_ref()
        .map_or_else(|| "void".to_string(), ToString::to_string);
    let params = function
        .parameters
        .iter()
        .filter(|p| !p.flags.contains(PropertyFlags::RETURN_PARM))
        .map(parameter_decl)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{return_type} {}({params})", function.name)
}

pub fn render_function(function: &ScriptFunction, options: RenderOptions) -> String {
    debug!(function = %function.name, statements = function.script.len(), "rendering function");

    let jump_targets = collect_jump_targets(&function.script);
    let mut renderer = ExpressionRenderer::new(&jump_targets, options);
    renderer.write(&format!("\t{}\n\t{{\n", signature(function)));
    for statement in &function.script {
        renderer.render(statement, RenderMode::Statement);
    }
    // EndOfScript already closes the body.
    if !matches!(function.script.last().map(|s| &s.kind), Some(ExprKind::EndOfScript)) {
        renderer.write("\t}\n");
    }
    renderer.finish()
}

pub fn render_class(class: &ScriptClass, options: RenderOptions) -> String {
    debug!(
        class = %class.name,
        properties = class.properties.len(),
        functions = class.functions.len(),
        "rendering class"
    );

    let mut out = format!("class {}{}", prefix(class.kind, &class.name), class.name);
    if let Some(super_class) = &class.super_class {
        out.push_str(&format!(
            " : public {}{}",
            prefix(super_class.kind, &super_class.name),
            super_class.name
        ));
    }
    out.push_str("\n{\npublic:\n");

    for field in &class.properties {
        let decl = format!("\t{} {}", field.property, field.property.name);
        match &field.default_value {
            Some(value) => out.push_str(&format!("{decl} = {};\n", format_property_value(value))),
            None => out.push_str(&format!("{decl};\n")),
        }
    }

    for (i, function) in class.functions.iter().enumerate() {
        if i > 0 || !class.properties.is_empty() {
            out.push('\n');
        }
        out.push_str(&render_function(function, options));
    }

    out.push_str("};\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::PropertyPointer;
    use crate::types::PropertyKind;
    use pretty_assertions::assert_eq;

    fn node(index: u32, kind: ExprKind) -> KismetExpression {
        KismetExpression::new(index, kind)
    }

    fn door_open() -> ScriptFunction {
        ScriptFunction {
            name: "OpenDoor".into(),
            return_property: Some(PropertyDesc::new("ReturnValue", PropertyKind::Bool)),
            parameters: vec![
                PropertyDesc::new(
                    "Instigator",
                    PropertyKind::Object {
                        property_class: Some("Actor".into()),
                    },
                )
                .with_flags(PropertyFlags::PARM | PropertyFlags::CONST_PARM),
                PropertyDesc::new("Angle", PropertyKind::Float).with_flags(PropertyFlags::PARM | PropertyFlags::OUT_PARM),
                PropertyDesc::new("ReturnValue", PropertyKind::Bool)
                    .with_flags(PropertyFlags::PARM | PropertyFlags::RETURN_PARM),
            ],
            script: vec![
                node(
                    0,
                    ExprKind::Let {
                        value: PropertyPointer::legacy("Angle"),
                        variable: Box::new(node(
                            1,
                            ExprKind::LocalOutVariable {
                                variable: PropertyPointer::legacy("Angle"),
                            },
                        )),
                        assignment: Box::new(node(2, ExprKind::FloatConst { value: 90.0 })),
                    },
                ),
                node(
                    10,
                    ExprKind::Return {
                        return_expression: Box::new(node(11, ExprKind::True)),
                    },
                ),
                node(12, ExprKind::EndOfScript),
            ],
        }
    }

    #[test]
    fn test_render_function() {
        assert_eq!(
            render_function(&door_open(), RenderOptions::default()),
            "\tbool OpenDoor(const AActor Instigator, float& Angle)\n\t{\n\
             \t\tAngle = 90;\n\n\
             \t\treturn true;\n\n\
             \t}\n"
        );
    }

    #[test]
    fn test_function_without_end_of_script_is_closed() {
        let function = ScriptFunction {
            name: "Tick".into(),
            return_property: None,
            parameters: vec![],
            script: vec![node(0, ExprKind::Jump { code_offset: 0 })],
        };
        assert_eq!(
            render_function(&function, RenderOptions::default()),
            "\tvoid Tick()\n\t{\n\t\tLabel_0:\n\t\tgoto Label_0;\n\n\t}\n"
        );
    }

    #[test]
    fn test_render_class_outline() {
        let class = ScriptClass {
            name: "BP_Door_C".into(),
            kind: StructuralKind::BlueprintGeneratedClass,
            super_class: Some(ObjectRef::new("Actor", StructuralKind::BlueprintGeneratedClass)),
            properties: vec![
                ClassProperty {
                    property: PropertyDesc::new("bLocked", PropertyKind::Bool),
                    default_value: Some(PropertyValue::Bool(true)),
                },
                ClassProperty {
                    property: PropertyDesc::new("DoorName", PropertyKind::Name),
                    default_value: None,
                },
            ],
            functions: vec![ScriptFunction {
                name: "Lock".into(),
                return_property: None,
                parameters: vec![],
                script: vec![node(0, ExprKind::EndOfScript)],
            }],
        };
        assert_eq!(
            render_class(&class, RenderOptions::default()),
            "class ABP_Door_C : public AActor\n{\npublic:\n\
             \tbool bLocked = true;\n\
             \tFName DoorName;\n\
             \n\
             \tvoid Lock()\n\t{\n\t}\n\
             };\n"
        );
    }

    #[test]
    fn test_lookup_function_by_name() {
        let class = ScriptClass {
            name: "BP_Door_C".into(),
            kind: StructuralKind::BlueprintGeneratedClass,
            super_class: None,
            properties: vec![],
            functions: vec![door_open()],
        };
        assert!(class.function("OpenDoor").is_some());
        assert!(class.function("CloseDoor").is_none());
    }
}
