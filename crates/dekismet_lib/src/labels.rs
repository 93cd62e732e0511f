use std::collections::BTreeSet;

use crate::expr::{ExprKind, KismetExpression};

pub type JumpTargetSet = BTreeSet<u32>;

pub fn label_name(offset: u32) -> String {
    format!("Label_{offset}")
}

/// Walks every statement (and every operand nested inside it) and records the
/// offsets targeted by `Jump`, `JumpIfNot` and constant `ComputedJump`s.
pub fn collect_jump_targets(script: &[KismetExpression]) -> JumpTargetSet {
    let mut targets = JumpTargetSet::new();
    let mut stack: Vec<&KismetExpression> = script.iter().rev().collect();

    while let Some(expr) = stack.pop() {
        match &expr.kind {
            ExprKind::Jump { code_offset } | ExprKind::JumpIfNot { code_offset, .. } => {
                targets.insert(*code_offset);
            }
            ExprKind::ComputedJump { code_offset_expression } => match &code_offset_expression.kind {
                ExprKind::IntConst { value } if *value >= 0 => {
                    targets.insert(*value as u32);
                }
                ExprKind::SkipOffsetConst { value } => {
                    targets.insert(*value);
                }
                _ => {}
            },
            _ => {}
        }
        stack.extend(expr.children().into_iter().rev());
    }

    targets
}

pub fn find_label_line(text: &str, offset: u32) -> Option<usize> {
    let wanted = format!("{}:", label_name(offset));
    text.lines().position(|line| line.trim() == wanted)
}
