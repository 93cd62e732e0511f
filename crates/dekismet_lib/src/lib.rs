use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod tables {
    include!(concat!(env!("OUT_DIR"), "/kismet_tables.rs"));
}

pub mod expr;
pub mod function;
pub mod labels;
pub mod render;
pub mod structs;
pub mod types;

pub use expr::{CastToken, ExprKind, KismetExpression, ObjectRef, PropertyPointer, SwitchCase};
pub use function::{ClassProperty, ScriptClass, ScriptFunction, render_class, render_function};
pub use labels::{JumpTargetSet, collect_jump_targets, find_label_line};
pub use render::{ExpressionRenderer, RenderMode, render_expression, render_statements};
pub use tables::{EXPR_TOKEN_COUNT, EXPR_TOKENS, ExprToken};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    #[serde(default)]
    pub qualify_instance_members: bool,
}

#[derive(Debug, Error)]
pub enum DekismetError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid script dump: {0}")]
    Json(#[from] serde_json::Error),

    #[error("function not found: {0}")]
    FunctionNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptDump {
    Class(ScriptClass),
    Function(ScriptFunction),
}

impl ScriptDump {
    pub fn from_json(json: &str) -> Result<Self, DekismetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DekismetError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn render(&self, options: RenderOptions) -> String {
        match self {
            ScriptDump::Class(class) => render_class(class, options),
            ScriptDump::Function(function) => render_function(function, options),
        }
    }

    pub fn render_function(&self, name: &str, options: RenderOptions) -> Result<String, DekismetError> {
        let function = match self {
            ScriptDump::Class(class) => class.function(name),
            ScriptDump::Function(function) => Some(function).filter(|f| f.name == name),
        };
        function
            .map(|f| render_function(f, options))
            .ok_or_else(|| DekismetError::FunctionNotFound(name.to_string()))
    }
}

pub fn decompile_json(json: &str, options: RenderOptions) -> Result<String, DekismetError> {
    Ok(ScriptDump::from_json(json)?.render(options))
}

pub fn decompile_json_function(json: &str, name: &str, options: RenderOptions) -> Result<String, DekismetError> {
    ScriptDump::from_json(json)?.render_function(name, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOOR_CLASS: &str = r#"{
        "class": {
            "name": "BP_Door_C",
            "kind": "BlueprintGeneratedClass",
            "super_class": { "name": "Actor", "kind": "BlueprintGeneratedClass" },
            "properties": [
                {
                    "property": { "name": "OpenCount", "kind": { "type": "Int" } },
                    "default_value": { "type": "Int", "value": 0 }
                }
            ],
            "functions": [
                {
                    "name": "Open",
                    "script": [
                        {
                            "statement_index": 0,
                            "inst": "JumpIfNot",
                            "code_offset": 30,
                            "boolean_expression": {
                                "statement_index": 5,
                                "inst": "InstanceVariable",
                                "variable": { "new": ["bLocked"], "is_instance_member": true }
                            }
                        },
                        {
                            "statement_index": 15,
                            "inst": "CallMath",
                            "stack_node": {
                                "name": "Add_IntInt",
                                "outer": { "name": "KismetMathLibrary", "kind": "PackageIndex" }
                            },
                            "parameters": [
                                { "statement_index": 20, "inst": "IntConst", "value": 2 },
                                { "statement_index": 25, "inst": "IntOne" }
                            ]
                        },
                        { "statement_index": 30, "inst": "Return", "return_expression": { "statement_index": 31, "inst": "Nothing" } },
                        { "statement_index": 32, "inst": "EndOfScript" }
                    ]
                }
            ]
        }
    }"#;

    const OPEN_BODY: &str = "\tvoid Open()\n\t{\n\
        \t\tif (!bLocked) goto Label_30;\n\n\
        \t\tFKismetMathLibrary::Add_IntInt(2, 1);\n\n\
        \t\tLabel_30:\n\
        \t\treturn;\n\n\
        \t}\n";

    #[test]
    fn test_decompile_class_dump() {
        let out = decompile_json(DOOR_CLASS, RenderOptions::default()).unwrap();
        assert_eq!(
            out,
            format!("class ABP_Door_C : public AActor\n{{\npublic:\n\tint OpenCount = 0;\n\n{OPEN_BODY}}};\n")
        );
        assert_eq!(find_label_line(&out, 30), Some(11));
    }

    #[test]
    fn test_decompile_single_function() {
        let out = decompile_json_function(DOOR_CLASS, "Open", RenderOptions::default()).unwrap();
        assert_eq!(out, OPEN_BODY);

        let qualified = decompile_json_function(
            DOOR_CLASS,
            "Open",
            RenderOptions {
                qualify_instance_members: true,
            },
        )
        .unwrap();
        assert!(qualified.contains("if (!this->bLocked) goto Label_30;"));
    }

    #[test]
    fn test_missing_function_is_an_error() {
        let err = decompile_json_function(DOOR_CLASS, "Close", RenderOptions::default()).unwrap_err();
        assert!(matches!(err, DekismetError::FunctionNotFound(name) if name == "Close"));
    }

    #[test]
    fn test_malformed_dump_is_an_error() {
        let err = decompile_json("{ \"class\": 3 }", RenderOptions::default()).unwrap_err();
        assert!(matches!(err, DekismetError::Json(_)));
    }

    #[test]
    fn test_dump_survives_json_round_trip() {
        let dump = ScriptDump::from_json(DOOR_CLASS).unwrap();
        let json = serde_json::to_string(&dump).unwrap();
        let again = ScriptDump::from_json(&json).unwrap();
        assert_eq!(again, dump);
        assert_eq!(again.render(RenderOptions::default()), dump.render(RenderOptions::default()));
    }
}
