use serde::{Deserialize, Serialize};

use crate::structs::{Rotator, Transform, Vector};
use crate::tables::ExprToken;
use crate::types::StructuralKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub name: String,
    #[serde(default)]
    pub kind: StructuralKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<Box<ObjectRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer: Option<Box<ObjectRef>>,
}

impl ObjectRef {
    pub fn new(name: impl Into<String>, kind: StructuralKind) -> Self {
        Self {
            name: name.into(),
            kind,
            class: None,
            outer: None,
        }
    }

    pub fn with_class(mut self, class: ObjectRef) -> Self {
        self.class = Some(Box::new(class));
        self
    }

    pub fn with_outer(mut self, outer: ObjectRef) -> Self {
        self.outer = Some(Box::new(outer));
        self
    }

    pub fn path(&self) -> String {
        match &self.outer {
            Some(outer) => format!("{}.{}", outer.path(), self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyPointer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<String>,
    #[serde(default)]
    pub is_instance_member: bool,
}

impl PropertyPointer {
    pub fn path<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            new: Some(segments.into_iter().map(Into::into).collect()),
            old: None,
            is_instance_member: false,
        }
    }

    pub fn legacy(name: impl Into<String>) -> Self {
        Self {
            new: None,
            old: Some(name.into()),
            is_instance_member: false,
        }
    }

    pub fn instance_member(mut self) -> Self {
        self.is_instance_member = true;
        self
    }

    pub fn text(&self) -> String {
        match &self.new {
            Some(path) => path.join(".").replace(' ', ""),
            None => self.old.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastToken {
    ObjectToInterface,
    ObjectToBool,
    InterfaceToBool,
    DoubleToFloat,
    FloatToDouble,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub case_index_value_term: KismetExpression,
    #[serde(default)]
    pub next_offset: u32,
    pub case_term: KismetExpression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KismetExpression {
    #[serde(default)]
    pub statement_index: u32,
    #[serde(flatten)]
    pub kind: ExprKind,
}

type Expr = Box<KismetExpression>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "inst")]
pub enum ExprKind {
    LocalVariable { variable: PropertyPointer },
    InstanceVariable { variable: PropertyPointer },
    DefaultVariable { variable: PropertyPointer },
    Return { return_expression: Expr },
    Jump { code_offset: u32 },
    JumpIfNot { code_offset: u32, boolean_expression: Expr },
    Assert { line_number: u16, debug_mode: bool, assert_expression: Expr },
    Nothing,
    NothingInt32,
    Let { value: PropertyPointer, variable: Expr, assignment: Expr },
    BitFieldConst { inner_property: PropertyPointer, const_value: u8 },
    ClassContext {
        object_expression: Expr,
        #[serde(default)]
        offset: u32,
        #[serde(default)]
        r_value_pointer: Option<PropertyPointer>,
        context_expression: Expr,
    },
    MetaCast { class_ptr: ObjectRef, target: Expr },
    LetBool { variable: Expr, assignment: Expr },
    EndParmValue,
    EndFunctionParms,
    #[serde(rename = "Self")]
    SelfObject,
    Skip { code_offset: u32, skip_expression: Expr },
    Context {
        object_expression: Expr,
        #[serde(default)]
        offset: u32,
        #[serde(default)]
        r_value_pointer: Option<PropertyPointer>,
        context_expression: Expr,
    },
    #[serde(rename = "Context_FailSilent")]
    ContextFailSilent {
        object_expression: Expr,
        #[serde(default)]
        offset: u32,
        #[serde(default)]
        r_value_pointer: Option<PropertyPointer>,
        context_expression: Expr,
    },
    VirtualFunction { virtual_function_name: String, #[serde(default)] parameters: Vec<KismetExpression> },
    FinalFunction { stack_node: ObjectRef, #[serde(default)] parameters: Vec<KismetExpression> },
    IntConst { value: i32 },
    FloatConst { value: f32 },
    StringConst { value: String },
    ObjectConst { value: ObjectRef },
    NameConst { value: String },
    RotationConst { value: Rotator },
    VectorConst { value: Vector },
    ByteConst { value: u8 },
    IntZero,
    IntOne,
    True,
    False,
    TextConst { #[serde(default)] source_string: Option<Expr> },
    NoObject,
    TransformConst { value: Transform },
    IntConstByte { value: u8 },
    NoInterface,
    DynamicCast { class_ptr: ObjectRef, target: Expr },
    StructConst { struct_value: ObjectRef, #[serde(default)] struct_size: i32, #[serde(default)] properties: Vec<KismetExpression> },
    EndStructConst,
    SetArray { assigning_property: Expr, #[serde(default)] elements: Vec<KismetExpression> },
    EndArray,
    PropertyConst { property: PropertyPointer },
    UnicodeStringConst { value: String },
    Int64Const { value: i64 },
    UInt64Const { value: u64 },
    DoubleConst { value: f64 },
    Cast { conversion_type: CastToken, target: Expr },
    SetSet { set_property: Expr, #[serde(default)] elements: Vec<KismetExpression> },
    EndSet,
    SetMap { map_property: Expr, #[serde(default)] elements: Vec<KismetExpression> },
    EndMap,
    SetConst { inner_property: PropertyPointer, #[serde(default)] elements: Vec<KismetExpression> },
    EndSetConst,
    MapConst {
        key_property: PropertyPointer,
        value_property: PropertyPointer,
        #[serde(default)]
        elements: Vec<KismetExpression>,
    },
    EndMapConst,
    Vector3fConst { value: Vector },
    StructMemberContext { member_property: PropertyPointer, struct_expression: Expr },
    LetMulticastDelegate { variable: Expr, assignment: Expr },
    LetDelegate { variable: Expr, assignment: Expr },
    LocalVirtualFunction { virtual_function_name: String, #[serde(default)] parameters: Vec<KismetExpression> },
    LocalFinalFunction { stack_node: ObjectRef, #[serde(default)] parameters: Vec<KismetExpression> },
    LocalOutVariable { variable: PropertyPointer },
    DeprecatedOp4A,
    InstanceDelegate { function_name: String },
    PushExecutionFlow { pushing_address: u32 },
    PopExecutionFlow,
    ComputedJump { code_offset_expression: Expr },
    PopExecutionFlowIfNot { boolean_expression: Expr },
    Breakpoint,
    InterfaceContext { interface_value: Expr },
    ObjToInterfaceCast { class_ptr: ObjectRef, target: Expr },
    EndOfScript,
    CrossInterfaceCast { class_ptr: ObjectRef, target: Expr },
    InterfaceToObjCast { class_ptr: ObjectRef, target: Expr },
    WireTracepoint,
    SkipOffsetConst { value: u32 },
    AddMulticastDelegate { delegate: Expr, delegate_to_add: Expr },
    ClearMulticastDelegate { delegate_to_clear: Expr },
    Tracepoint,
    LetObj { variable: Expr, assignment: Expr },
    LetWeakObjPtr { variable: Expr, assignment: Expr },
    BindDelegate { function_name: String, delegate: Expr, object_term: Expr },
    RemoveMulticastDelegate { delegate: Expr, delegate_to_add: Expr },
    CallMulticastDelegate { stack_node: ObjectRef, delegate: Expr, #[serde(default)] parameters: Vec<KismetExpression> },
    LetValueOnPersistentFrame { destination_property: PropertyPointer, assignment_expression: Expr },
    ArrayConst { inner_property: PropertyPointer, #[serde(default)] elements: Vec<KismetExpression> },
    EndArrayConst,
    SoftObjectConst { value: Expr },
    CallMath { stack_node: ObjectRef, #[serde(default)] parameters: Vec<KismetExpression> },
    SwitchValue {
        #[serde(default)]
        end_goto_offset: u32,
        index_term: Expr,
        default_term: Expr,
        #[serde(default)]
        cases: Vec<SwitchCase>,
    },
    InstrumentationEvent { event_type: u8, #[serde(default)] event_name: Option<String> },
    ArrayGetByRef { array_variable: Expr, array_index: Expr },
    ClassSparseDataVariable { variable: PropertyPointer },
    FieldPathConst { value: Expr },
    AutoRtfmTransact { transaction_id: i32, #[serde(default)] code_offset: u32 },
    AutoRtfmStopTransact { transaction_id: i32, #[serde(default)] mode: u8 },
    AutoRtfmAbortIfNot { boolean_expression: Expr },
}

impl KismetExpression {
    pub fn new(statement_index: u32, kind: ExprKind) -> Self {
        Self {
            statement_index,
            kind,
        }
    }

    pub fn token(&self) -> ExprToken {
        self.kind.token()
    }

    pub fn children(&self) -> Vec<&KismetExpression> {
        use ExprKind::*;

        match &self.kind {
            Return { return_expression: e }
            | JumpIfNot { boolean_expression: e, .. }
            | Assert { assert_expression: e, .. }
            | MetaCast { target: e, .. }
            | DynamicCast { target: e, .. }
            | ObjToInterfaceCast { target: e, .. }
            | CrossInterfaceCast { target: e, .. }
            | InterfaceToObjCast { target: e, .. }
            | Skip { skip_expression: e, .. }
            | Cast { target: e, .. }
            | StructMemberContext { struct_expression: e, .. }
            | ComputedJump { code_offset_expression: e }
            | PopExecutionFlowIfNot { boolean_expression: e }
            | InterfaceContext { interface_value: e }
            | ClearMulticastDelegate { delegate_to_clear: e }
            | LetValueOnPersistentFrame { assignment_expression: e, .. }
            | SoftObjectConst { value: e }
            | FieldPathConst { value: e }
            | AutoRtfmAbortIfNot { boolean_expression: e } => vec![e.as_ref()],

            TextConst { source_string } => source_string.iter().map(|e| e.as_ref()).collect(),

            Let { variable, assignment, .. }
            | LetBool { variable, assignment }
            | LetObj { variable, assignment }
            | LetWeakObjPtr { variable, assignment }
            | LetDelegate { variable, assignment }
            | LetMulticastDelegate { variable, assignment } => {
                vec![variable.as_ref(), assignment.as_ref()]
            }

            ClassContext { object_expression, context_expression, .. }
            | Context { object_expression, context_expression, .. }
            | ContextFailSilent { object_expression, context_expression, .. } => {
                vec![object_expression.as_ref(), context_expression.as_ref()]
            }

            AddMulticastDelegate { delegate, delegate_to_add }
            | RemoveMulticastDelegate { delegate, delegate_to_add } => {
                vec![delegate.as_ref(), delegate_to_add.as_ref()]
            }
            BindDelegate { delegate, object_term, .. } => vec![delegate.as_ref(), object_term.as_ref()],
            ArrayGetByRef { array_variable, array_index } => {
                vec![array_variable.as_ref(), array_index.as_ref()]
            }

            VirtualFunction { parameters, .. }
            | LocalVirtualFunction { parameters, .. }
            | FinalFunction { parameters, .. }
            | LocalFinalFunction { parameters, .. }
            | CallMath { parameters, .. } => parameters.iter().collect(),
            CallMulticastDelegate { delegate, parameters, .. } => {
                std::iter::once(delegate.as_ref()).chain(parameters.iter()).collect()
            }

            StructConst { properties: items, .. }
            | ArrayConst { elements: items, .. }
            | SetConst { elements: items, .. }
            | MapConst { elements: items, .. } => items.iter().collect(),
            SetArray { assigning_property: target, elements }
            | SetSet { set_property: target, elements }
            | SetMap { map_property: target, elements } => {
                std::iter::once(target.as_ref()).chain(elements.iter()).collect()
            }

            SwitchValue { index_term, default_term, cases, .. } => {
                let mut out = vec![index_term.as_ref()];
                for case in cases {
                    out.push(&case.case_index_value_term);
                    out.push(&case.case_term);
                }
                out.push(default_term.as_ref());
                out
            }

            LocalVariable { .. }
            | InstanceVariable { .. }
            | DefaultVariable { .. }
            | LocalOutVariable { .. }
            | ClassSparseDataVariable { .. }
            | Jump { .. }
            | Nothing
            | NothingInt32
            | BitFieldConst { .. }
            | EndParmValue
            | EndFunctionParms
            | SelfObject
            | IntConst { .. }
            | FloatConst { .. }
            | StringConst { .. }
            | ObjectConst { .. }
            | NameConst { .. }
            | RotationConst { .. }
            | VectorConst { .. }
            | ByteConst { .. }
            | IntZero
            | IntOne
            | True
            | False
            | NoObject
            | TransformConst { .. }
            | IntConstByte { .. }
            | NoInterface
            | EndStructConst
            | EndArray
            | PropertyConst { .. }
            | UnicodeStringConst { .. }
            | Int64Const { .. }
            | UInt64Const { .. }
            | DoubleConst { .. }
            | EndSet
            | EndMap
            | EndSetConst
            | EndMapConst
            | Vector3fConst { .. }
            | DeprecatedOp4A
            | InstanceDelegate { .. }
            | PushExecutionFlow { .. }
            | PopExecutionFlow
            | Breakpoint
            | EndOfScript
            | WireTracepoint
            | SkipOffsetConst { .. }
            | Tracepoint
            | EndArrayConst
            | InstrumentationEvent { .. }
            | AutoRtfmTransact { .. }
            | AutoRtfmStopTransact { .. } => Vec::new(),
        }
    }
}

impl ExprKind {
    pub fn token(&self) -> ExprToken {
        match self {
            ExprKind::LocalVariable { .. } => ExprToken::EX_LocalVariable,
            ExprKind::InstanceVariable { .. } => ExprToken::EX_InstanceVariable,
            ExprKind::DefaultVariable { .. } => ExprToken::EX_DefaultVariable,
            ExprKind::Return { .. } => ExprToken::EX_Return,
            ExprKind::Jump { .. } => ExprToken::EX_Jump,
            ExprKind::JumpIfNot { .. } => ExprToken::EX_JumpIfNot,
            ExprKind::Assert { .. } => ExprToken::EX_Assert,
            ExprKind::Nothing => ExprToken::EX_Nothing,
            ExprKind::NothingInt32 => ExprToken::EX_NothingInt32,
            ExprKind::Let { .. } => ExprToken::EX_Let,
            ExprKind::BitFieldConst { .. } => ExprToken::EX_BitFieldConst,
            ExprKind::ClassContext { .. } => ExprToken::EX_ClassContext,
            ExprKind::MetaCast { .. } => ExprToken::EX_MetaCast,
            ExprKind::LetBool { .. } => ExprToken::EX_LetBool,
            ExprKind::EndParmValue => ExprToken::EX_EndParmValue,
            ExprKind::EndFunctionParms => ExprToken::EX_EndFunctionParms,
            ExprKind::SelfObject => ExprToken::EX_Self,
            ExprKind::Skip { .. } => ExprToken::EX_Skip,
            ExprKind::Context { .. } => ExprToken::EX_Context,
            ExprKind::ContextFailSilent { .. } => ExprToken::EX_Context_FailSilent,
            ExprKind::VirtualFunction { .. } => ExprToken::EX_VirtualFunction,
            ExprKind::FinalFunction { .. } => ExprToken::EX_FinalFunction,
            ExprKind::IntConst { .. } => ExprToken::EX_IntConst,
            ExprKind::FloatConst { .. } => ExprToken::EX_FloatConst,
            ExprKind::StringConst { .. } => ExprToken::EX_StringConst,
            ExprKind::ObjectConst { .. } => ExprToken::EX_ObjectConst,
            ExprKind::NameConst { .. } => ExprToken::EX_NameConst,
            ExprKind::RotationConst { .. } => ExprToken::EX_RotationConst,
            ExprKind::VectorConst { .. } => ExprToken::EX_VectorConst,
            ExprKind::ByteConst { .. } => ExprToken::EX_ByteConst,
            ExprKind::IntZero => ExprToken::EX_IntZero,
            ExprKind::IntOne => ExprToken::EX_IntOne,
            ExprKind::True => ExprToken::EX_True,
            ExprKind::False => ExprToken::EX_False,
            ExprKind::TextConst { .. } => ExprToken::EX_TextConst,
            ExprKind::NoObject => ExprToken::EX_NoObject,
            ExprKind::TransformConst { .. } => ExprToken::EX_TransformConst,
            ExprKind::IntConstByte { .. } => ExprToken::EX_IntConstByte,
            ExprKind::NoInterface => ExprToken::EX_NoInterface,
            ExprKind::DynamicCast { .. } => ExprToken::EX_DynamicCast,
            ExprKind::StructConst { .. } => ExprToken::EX_StructConst,
            ExprKind::EndStructConst => ExprToken::EX_EndStructConst,
            ExprKind::SetArray { .. } => ExprToken::EX_SetArray,
            ExprKind::EndArray => ExprToken::EX_EndArray,
            ExprKind::PropertyConst { .. } => ExprToken::EX_PropertyConst,
            ExprKind::UnicodeStringConst { .. } => ExprToken::EX_UnicodeStringConst,
            ExprKind::Int64Const { .. } => ExprToken::EX_Int64Const,
            ExprKind::UInt64Const { .. } => ExprToken::EX_UInt64Const,
            ExprKind::DoubleConst { .. } => ExprToken::EX_DoubleConst,
            ExprKind::Cast { .. } => ExprToken::EX_Cast,
            ExprKind::SetSet { .. } => ExprToken::EX_SetSet,
            ExprKind::EndSet => ExprToken::EX_EndSet,
            ExprKind::SetMap { .. } => ExprToken::EX_SetMap,
            ExprKind::EndMap => ExprToken::EX_EndMap,
            ExprKind::SetConst { .. } => ExprToken::EX_SetConst,
            ExprKind::EndSetConst => ExprToken::EX_EndSetConst,
            ExprKind::MapConst { .. } => ExprToken::EX_MapConst,
            ExprKind::EndMapConst => ExprToken::EX_EndMapConst,
            ExprKind::Vector3fConst { .. } => ExprToken::EX_Vector3fConst,
            ExprKind::StructMemberContext { .. } => ExprToken::EX_StructMemberContext,
            ExprKind::LetMulticastDelegate { .. } => ExprToken::EX_LetMulticastDelegate,
            ExprKind::LetDelegate { .. } => ExprToken::EX_LetDelegate,
            ExprKind::LocalVirtualFunction { .. } => ExprToken::EX_LocalVirtualFunction,
            ExprKind::LocalFinalFunction { .. } => ExprToken::EX_LocalFinalFunction,
            ExprKind::LocalOutVariable { .. } => ExprToken::EX_LocalOutVariable,
            ExprKind::DeprecatedOp4A => ExprToken::EX_DeprecatedOp4A,
            ExprKind::InstanceDelegate { .. } => ExprToken::EX_InstanceDelegate,
            ExprKind::PushExecutionFlow { .. } => ExprToken::EX_PushExecutionFlow,
            ExprKind::PopExecutionFlow => ExprToken::EX_PopExecutionFlow,
            ExprKind::ComputedJump { .. } => ExprToken::EX_ComputedJump,
            ExprKind::PopExecutionFlowIfNot { .. } => ExprToken::EX_PopExecutionFlowIfNot,
            ExprKind::Breakpoint => ExprToken::EX_Breakpoint,
            ExprKind::InterfaceContext { .. } => ExprToken::EX_InterfaceContext,
            ExprKind::ObjToInterfaceCast { .. } => ExprToken::EX_ObjToInterfaceCast,
            ExprKind::EndOfScript => ExprToken::EX_EndOfScript,
            ExprKind::CrossInterfaceCast { .. } => ExprToken::EX_CrossInterfaceCast,
            ExprKind::InterfaceToObjCast { .. } => ExprToken::EX_InterfaceToObjCast,
            ExprKind::WireTracepoint => ExprToken::EX_WireTracepoint,
            ExprKind::SkipOffsetConst { .. } => ExprToken::EX_SkipOffsetConst,
            ExprKind::AddMulticastDelegate { .. } => ExprToken::EX_AddMulticastDelegate,
            ExprKind::ClearMulticastDelegate { .. } => ExprToken::EX_ClearMulticastDelegate,
            ExprKind::Tracepoint => ExprToken::EX_Tracepoint,
            ExprKind::LetObj { .. } => ExprToken::EX_LetObj,
            ExprKind::LetWeakObjPtr { .. } => ExprToken::EX_LetWeakObjPtr,
            ExprKind::BindDelegate { .. } => ExprToken::EX_BindDelegate,
            ExprKind::RemoveMulticastDelegate { .. } => ExprToken::EX_RemoveMulticastDelegate,
            ExprKind::CallMulticastDelegate { .. } => ExprToken::EX_CallMulticastDelegate,
            ExprKind::LetValueOnPersistentFrame { .. } => ExprToken::EX_LetValueOnPersistentFrame,
            ExprKind::ArrayConst { .. } => ExprToken::EX_ArrayConst,
            ExprKind::EndArrayConst => ExprToken::EX_EndArrayConst,
            ExprKind::SoftObjectConst { .. } => ExprToken::EX_SoftObjectConst,
            ExprKind::CallMath { .. } => ExprToken::EX_CallMath,
            ExprKind::SwitchValue { .. } => ExprToken::EX_SwitchValue,
            ExprKind::InstrumentationEvent { .. } => ExprToken::EX_InstrumentationEvent,
            ExprKind::ArrayGetByRef { .. } => ExprToken::EX_ArrayGetByRef,
            ExprKind::ClassSparseDataVariable { .. } => ExprToken::EX_ClassSparseDataVariable,
            ExprKind::FieldPathConst { .. } => ExprToken::EX_FieldPathConst,
            ExprKind::AutoRtfmTransact { .. } => ExprToken::EX_AutoRtfmTransact,
            ExprKind::AutoRtfmStopTransact { .. } => ExprToken::EX_AutoRtfmStopTransact,
            ExprKind::AutoRtfmAbortIfNot { .. } => ExprToken::EX_AutoRtfmAbortIfNot,
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(
            self,
            ExprKind::FinalFunction { .. } | ExprKind::LocalFinalFunction { .. } | ExprKind::CallMath { .. }
        )
    }
}
