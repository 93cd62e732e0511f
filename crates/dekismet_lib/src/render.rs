use std::collections::BTreeSet;

use tracing::trace;

use crate::RenderOptions;
use crate::expr::{CastToken, ExprKind, KismetExpression, ObjectRef, PropertyPointer, SwitchCase};
use crate::labels::{JumpTargetSet, collect_jump_targets, label_name};
use crate::types::prefix;

const INDENT: &str = "\t\t";
const TERMINATOR: &str = ";\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Statement,
    Expression,
}

#[derive(Debug)]
pub struct ExpressionRenderer<'a> {
    jump_targets: &'a JumpTargetSet,
    options: RenderOptions,
    out: String,
    at_line_start: bool,
    emitted_labels: BTreeSet<u32>,
}

impl<'a> ExpressionRenderer<'a> {
    pub fn new(jump_targets: &'a JumpTargetSet, options: RenderOptions) -> Self {
        Self {
            jump_targets,
            options,
            out: String::new(),
            at_line_start: true,
            emitted_labels: BTreeSet::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub(crate) fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.out.push_str(text);
        self.at_line_start = text.ends_with('\n');
    }

    fn indent(&mut self, mode: RenderMode) {
        if mode == RenderMode::Statement {
            self.write(INDENT);
        }
    }

    fn terminate(&mut self, mode: RenderMode) {
        if mode == RenderMode::Statement {
            self.write(TERMINATOR);
        }
    }

    fn as_statement(&mut self, mode: RenderMode, body: impl FnOnce(&mut Self)) {
        self.indent(mode);
        body(self);
        self.terminate(mode);
    }

    fn emit_label(&mut self, offset: u32, mode: RenderMode) {
        if !self.jump_targets.contains(&offset) || !self.emitted_labels.insert(offset) {
            return;
        }
        let label = label_name(offset);
        match mode {
            RenderMode::Statement => self.write(&format!("{INDENT}{label}:\n")),
            RenderMode::Expression => self.write(&format!("{label}:\n")),
        }
    }

    fn variable(&mut self, pointer: &PropertyPointer) {
        let text = pointer.text();
        if self.options.qualify_instance_members && pointer.is_instance_member {
            self.write(&format!("this->{text}"));
        } else {
            self.write(&text);
        }
    }

    fn args(&mut self, parameters: &[KismetExpression]) {
        let wrap = parameters.len() > 4;
        for (i, param) in parameters.iter().enumerate() {
            if wrap {
                self.write("\n\t\t\t");
            }
            self.render(param, RenderMode::Expression);
            if i + 1 < parameters.len() {
                self.write(", ");
            }
        }
    }

    fn call(&mut self, callee: &str, parameters: &[KismetExpression]) {
        self.write(callee);
        self.write("(");
        self.args(parameters);
        self.write(")");
    }

    fn container_literal(&mut self, name: &str, elements: &[KismetExpression]) {
        self.write(name);
        self.write(" {");
        for (i, element) in elements.iter().enumerate() {
            self.write(" ");
            self.render(element, RenderMode::Expression);
            if i + 1 < elements.len() {
                self.write(",");
            }
        }
        self.write(if elements.is_empty() { "  }" } else { " }" });
    }

    fn map_literal(&mut self, elements: &[KismetExpression]) {
        self.write("TMap {");
        let pairs = elements.chunks(2).count();
        for (i, pair) in elements.chunks(2).enumerate() {
            self.write(" ");
            self.render(&pair[0], RenderMode::Expression);
            if let Some(value) = pair.get(1) {
                self.write(": ");
                self.render(value, RenderMode::Expression);
            }
            if i + 1 < pairs {
                self.write(",");
            }
        }
        self.write(if elements.is_empty() { "  }" } else { " }" });
    }

    fn container_assign(&mut self, target: &KismetExpression, mode: RenderMode, literal: impl FnOnce(&mut Self)) {
        self.as_statement(mode, |r| {
            r.render(target, RenderMode::Expression);
            r.write(" = ");
            literal(r);
        });
    }

    fn object_cast(&mut self, class: &ObjectRef, target: &KismetExpression) {
        self.write(&format!("Cast<{}{}*>(", prefix(class.kind, &class.name), class.name));
        self.render(target, RenderMode::Expression);
        self.write(")");
    }

    fn object_const(&mut self, value: &ObjectRef, mode: RenderMode) {
        if mode == RenderMode::Statement && self.at_line_start {
            self.write(INDENT);
        }
        let class = match &value.class {
            Some(class) => {
                let short = class.name.rsplit('.').next().unwrap_or(&class.name);
                format!("{}{}", prefix(class.kind, ""), short)
            }
            None => {
                trace!(object = %value.name, "object constant without class");
                "UNKNOWN".to_string()
            }
        };
        let outer = match &value.outer {
            Some(outer) => outer.path(),
            None => {
                trace!(object = %value.name, "object constant without outer");
                "UNKNOWN".to_string()
            }
        };
        self.write(&format!("FindObject<{class}>(\"{outer}.{}\")", value.name));
    }

    fn context(&mut self, object: &KismetExpression, member: &KismetExpression, mode: RenderMode) {
        if mode == RenderMode::Statement && self.at_line_start {
            self.write(INDENT);
        }
        self.render(object, RenderMode::Expression);
        self.write("->");
        self.render(member, RenderMode::Expression);
        self.terminate(mode);
    }

    fn multicast(&mut self, receiver: &KismetExpression, mode: RenderMode, body: impl FnOnce(&mut Self)) {
        if !matches!(
            receiver.kind,
            ExprKind::LocalVariable { .. } | ExprKind::InstanceVariable { .. } | ExprKind::Context { .. }
        ) {
            trace!(receiver = receiver.token().name(), "unsupported multicast receiver");
            return;
        }
        self.as_statement(mode, |r| {
            r.render(receiver, RenderMode::Expression);
            body(r);
        });
    }

    fn switch_value(
        &mut self,
        index_term: &KismetExpression,
        default_term: &KismetExpression,
        cases: &[SwitchCase],
        mode: RenderMode,
    ) {
        let ternary = cases.len() <= 2
            && cases
                .iter()
                .all(|c| matches!(c.case_index_value_term.kind, ExprKind::True | ExprKind::False));

        if ternary {
            self.as_statement(mode, |r| {
                r.render(index_term, RenderMode::Expression);
                r.write(" ? ");
                let true_cases = cases.iter().filter(|c| c.case_index_value_term.kind == ExprKind::True);
                let false_cases = cases.iter().filter(|c| c.case_index_value_term.kind == ExprKind::False);
                for (i, case) in true_cases.chain(false_cases).enumerate() {
                    if i > 0 {
                        r.write(" : ");
                    }
                    r.render(&case.case_term, RenderMode::Expression);
                }
            });
            return;
        }

        self.indent(mode);
        self.write("switch (");
        self.render(index_term, RenderMode::Expression);
        self.write(")\n\t\t{\n");
        for case in cases {
            match &case.case_index_value_term.kind {
                ExprKind::IntConst { value } => self.write(&format!("\t\t\tcase {value}:\n")),
                _ => {
                    self.write("\t\t\tcase ");
                    self.render(&case.case_index_value_term, RenderMode::Expression);
                    self.write(":\n");
                }
            }
            self.write("\t\t\t{\n\t\t\t    ");
            self.render(&case.case_term, RenderMode::Expression);
            self.write(";\n\t\t\t    break;\n\t\t\t}\n");
        }
        self.write("\t\t\tdefault:\n\t\t\t{\n\t\t\t    ");
        self.render(default_term, RenderMode::Expression);
        self.write("\n\t\t\t}\n\t\t}");
        if mode == RenderMode::Statement {
            self.write("\n\n");
        }
    }

    pub fn render(&mut self, expr: &KismetExpression, mode: RenderMode) {
        use ExprKind::*;

        self.emit_label(expr.statement_index, mode);

        match &expr.kind {
            Let { variable, assignment, .. }
            | LetObj { variable, assignment }
            | LetWeakObjPtr { variable, assignment }
            | LetBool { variable, assignment }
            | LetDelegate { variable, assignment }
            | LetMulticastDelegate { variable, assignment } => {
                self.indent(mode);
                self.render(variable, RenderMode::Expression);
                self.write(" = ");
                self.render(assignment, RenderMode::Expression);
                if mode == RenderMode::Statement || assignment.kind.is_call() {
                    self.write(TERMINATOR);
                }
            }
            LetValueOnPersistentFrame {
                destination_property,
                assignment_expression,
            } => {
                let destination = destination_property.text();
                self.as_statement(mode, |r| {
                    if destination.contains("K2Node_") {
                        r.write("UberGraphFrame->");
                    }
                    r.write(&destination);
                    r.write(" = ");
                    r.render(assignment_expression, RenderMode::Expression);
                });
            }

            FinalFunction { stack_node, parameters } => {
                self.indent(mode);
                self.call(&stack_node.name.replace(' ', ""), parameters);
                if mode == RenderMode::Statement {
                    self.write(";\n");
                }
            }
            LocalFinalFunction { stack_node, parameters } => {
                self.indent(mode);
                if mode == RenderMode::Statement && !parameters.is_empty() {
                    let owner = stack_node.outer.as_ref().map(|o| o.kind).unwrap_or_default();
                    self.write(prefix(owner, ""));
                }
                self.call(&stack_node.name.replace(' ', ""), parameters);
                if mode == RenderMode::Statement {
                    self.write(";\n");
                }
            }
            CallMath { stack_node, parameters } => {
                let owner = match &stack_node.outer {
                    Some(outer) => format!("{}{}", prefix(outer.kind, ""), outer.name.replace(' ', "")),
                    None => {
                        trace!(function = %stack_node.name, "math call without owning class");
                        "UKN_Outer".to_string()
                    }
                };
                self.as_statement(mode, |r| r.call(&format!("{owner}::{}", stack_node.name), parameters));
            }
            VirtualFunction {
                virtual_function_name,
                parameters,
            }
            | LocalVirtualFunction {
                virtual_function_name,
                parameters,
            } => {
                self.as_statement(mode, |r| r.call(&virtual_function_name.replace(' ', ""), parameters));
            }

            AddMulticastDelegate {
                delegate,
                delegate_to_add,
            } => self.multicast(delegate, mode, |r| {
                r.write(".AddDelegate(");
                r.render(delegate_to_add, RenderMode::Expression);
                r.write(")");
            }),
            RemoveMulticastDelegate {
                delegate,
                delegate_to_add,
            } => self.multicast(delegate, mode, |r| {
                r.write(".RemoveDelegate(");
                r.render(delegate_to_add, RenderMode::Expression);
                r.write(")");
            }),
            CallMulticastDelegate {
                delegate, parameters, ..
            } => self.multicast(delegate, mode, |r| r.call(".Call", parameters)),
            ClearMulticastDelegate { delegate_to_clear } => self.as_statement(mode, |r| {
                r.render(delegate_to_clear, RenderMode::Expression);
                r.write(".Clear()");
            }),
            BindDelegate {
                function_name,
                delegate,
                object_term,
            } => self.as_statement(mode, |r| {
                r.render(delegate, RenderMode::Expression);
                r.write(".BindUFunction(");
                r.render(object_term, RenderMode::Expression);
                r.write(&format!(", \"{function_name}\")"));
            }),

            Jump { code_offset } => {
                self.as_statement(mode, |r| r.write(&format!("goto {}", label_name(*code_offset))));
            }
            JumpIfNot {
                code_offset,
                boolean_expression,
            } => self.as_statement(mode, |r| {
                r.write("if (!");
                r.render(boolean_expression, RenderMode::Expression);
                r.write(&format!(") goto {}", label_name(*code_offset)));
            }),
            ComputedJump { code_offset_expression } => self.as_statement(mode, |r| {
                r.write("goto ");
                match &code_offset_expression.kind {
                    IntConst { value } if *value >= 0 => r.write(&label_name(*value as u32)),
                    SkipOffsetConst { value } => r.write(&label_name(*value)),
                    _ => r.render(code_offset_expression, RenderMode::Expression),
                }
            }),
            PopExecutionFlowIfNot { boolean_expression } => self.as_statement(mode, |r| {
                r.write("if (!");
                r.render(boolean_expression, RenderMode::Expression);
                r.write(") FlowStack.Pop()");
            }),

            Cast {
                conversion_type: CastToken::ObjectToInterface,
                target,
            } => self.render(target, mode),
            Cast {
                conversion_type,
                target,
            } => self.as_statement(mode, |r| {
                r.write(match conversion_type {
                    CastToken::ObjectToBool | CastToken::InterfaceToBool => "(bool)",
                    CastToken::DoubleToFloat => "(float)",
                    CastToken::FloatToDouble => "(double)",
                    CastToken::ObjectToInterface => "",
                });
                r.render(target, RenderMode::Expression);
            }),
            MetaCast { class_ptr, target }
            | DynamicCast { class_ptr, target }
            | ObjToInterfaceCast { class_ptr, target }
            | CrossInterfaceCast { class_ptr, target }
            | InterfaceToObjCast { class_ptr, target } => {
                self.as_statement(mode, |r| r.object_cast(class_ptr, target));
            }

            ArrayConst { elements, .. } => self.container_literal("TArray", elements),
            SetConst { elements, .. } => self.container_literal("TSet", elements),
            MapConst { elements, .. } => self.map_literal(elements),
            SetArray {
                assigning_property,
                elements,
            } => self.container_assign(assigning_property, mode, |r| r.container_literal("TArray", elements)),
            SetSet { set_property, elements } => {
                self.container_assign(set_property, mode, |r| r.container_literal("TSet", elements));
            }
            SetMap { map_property, elements } => {
                self.container_assign(map_property, mode, |r| r.map_literal(elements));
            }
            StructConst {
                struct_value,
                properties,
                ..
            } => {
                self.write(&format!("{}{}(", prefix(struct_value.kind, &struct_value.name), struct_value.name));
                for (i, field) in properties.iter().enumerate() {
                    self.render(field, RenderMode::Expression);
                    if i + 1 < properties.len() && !matches!(field.kind, ArrayConst { .. }) {
                        self.write(", ");
                    }
                }
                self.write(")");
            }
            ObjectConst { value } => self.object_const(value, mode),

            IntConst { value } => self.write(&value.to_string()),
            Int64Const { value } => self.write(&value.to_string()),
            UInt64Const { value } => self.write(&value.to_string()),
            SkipOffsetConst { value } => self.write(&value.to_string()),
            FloatConst { value } => self.write(&value.to_string()),
            DoubleConst { value } => {
                if !value.is_finite() || (value - value.floor()).abs() >= 1e-10 {
                    self.write(&value.to_string());
                } else if value.abs() < i64::MAX as f64 {
                    self.write(&(*value as i64).to_string());
                } else {
                    self.write(&format!("{value:.0}"));
                }
            }
            ByteConst { value } | IntConstByte { value } => self.write(&format!("0x{value:X}")),
            BitFieldConst { const_value, .. } => self.write(&const_value.to_string()),
            StringConst { value } | NameConst { value } => self.write(&format!("\"{value}\"")),
            InstanceDelegate { function_name } => self.write(&format!("\"{function_name}\"")),
            UnicodeStringConst { value } => self.write(value),
            TextConst { source_string } => match source_string {
                Some(source) => self.render(source, RenderMode::Expression),
                None => self.write("nullptr"),
            },
            VectorConst { value } => self.write(&value.to_string()),
            Vector3fConst { value } => self.write(&format!("FVector3f({}, {}, {})", value.x, value.y, value.z)),
            RotationConst { value } => self.write(&value.to_string()),
            TransformConst { value } => self.write(&value.to_string()),
            PropertyConst { property } => self.write(&property.text()),
            SoftObjectConst { value } | FieldPathConst { value } => self.render(value, mode),
            True => self.write("true"),
            False => self.write("false"),
            SelfObject => self.write("this"),
            NoObject | NoInterface => self.write("nullptr"),
            IntZero => self.write("0"),
            IntOne => self.write("1"),

            LocalVariable { variable }
            | InstanceVariable { variable }
            | DefaultVariable { variable }
            | LocalOutVariable { variable }
            | ClassSparseDataVariable { variable } => self.variable(variable),

            Context {
                object_expression,
                context_expression,
                ..
            }
            | ClassContext {
                object_expression,
                context_expression,
                ..
            } => self.context(object_expression, context_expression, mode),
            ContextFailSilent {
                object_expression,
                context_expression,
                ..
            } => match mode {
                RenderMode::Statement => {
                    self.write(INDENT);
                    self.render(object_expression, RenderMode::Expression);
                    self.write("->");
                    self.render(context_expression, RenderMode::Expression);
                    self.write(TERMINATOR);
                }
                RenderMode::Expression => self.render(object_expression, RenderMode::Expression),
            },
            InterfaceContext { interface_value } => self.render(interface_value, mode),
            StructMemberContext {
                member_property,
                struct_expression,
            } => {
                self.render(struct_expression, RenderMode::Expression);
                self.write(".");
                self.write(&member_property.text());
            }
            ArrayGetByRef {
                array_variable,
                array_index,
            } => {
                self.render(array_variable, RenderMode::Expression);
                self.write("[");
                self.render(array_index, RenderMode::Expression);
                self.write("]");
            }

            SwitchValue {
                index_term,
                default_term,
                cases,
                ..
            } => self.switch_value(index_term, default_term, cases, mode),

            Return { return_expression } => {
                self.indent(mode);
                self.write("return");
                if return_expression.kind != Nothing {
                    self.write(" ");
                }
                self.render(return_expression, RenderMode::Expression);
                self.terminate(mode);
            }
            EndOfScript => {
                if mode == RenderMode::Statement {
                    self.write("\t}\n");
                }
            }

            Nothing
            | NothingInt32
            | EndParmValue
            | EndFunctionParms
            | EndStructConst
            | EndArray
            | EndArrayConst
            | EndSet
            | EndMap
            | EndSetConst
            | EndMapConst
            | PushExecutionFlow { .. }
            | PopExecutionFlow
            | DeprecatedOp4A
            | WireTracepoint
            | Tracepoint
            | Breakpoint
            | AutoRtfmTransact { .. }
            | AutoRtfmStopTransact { .. }
            | AutoRtfmAbortIfNot { .. } => {}

            Assert { .. } | Skip { .. } | InstrumentationEvent { .. } => {
                let name = expr.token().name();
                trace!(token = name, statement = expr.statement_index, "no pseudocode form");
                self.write(name);
            }
        }
    }
}

pub fn render_expression(
    expr: &KismetExpression,
    jump_targets: &JumpTargetSet,
    mode: RenderMode,
    options: RenderOptions,
) -> String {
    let mut renderer = ExpressionRenderer::new(jump_targets, options);
    renderer.render(expr, mode);
    renderer.finish()
}

pub fn render_statements(script: &[KismetExpression], options: RenderOptions) -> String {
    let jump_targets = collect_jump_targets(script);
    let mut renderer = ExpressionRenderer::new(&jump_targets, options);
    for statement in script {
        renderer.render(statement, RenderMode::Statement);
    }
    renderer.finish()
}
