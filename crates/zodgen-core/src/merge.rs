use crate::{
    annotate::{AnnotationDirective, is_balanced},
    expr::{ExpressionNode, OverrideExpression},
};

///
/// MergeOutcome
///
/// Result of folding a directive into a field's base node. `degraded`
/// carries the reason when a directive had to be dropped; the node is then
/// the untouched base, and the run continues.
///

#[derive(Debug)]
pub struct MergeOutcome {
    pub node: ExpressionNode,
    pub degraded: Option<String>,
}

/// Fold a parsed directive into the base expression.
///
/// Append pushes the chain onto the node's refinements, leaving shape and
/// optionality untouched. Override replaces the base shape and every
/// refinement with the expression, while the computed optionality wrapper
/// (and trailing chain) still apply on top.
#[must_use]
pub fn merge_directive(
    base: ExpressionNode,
    directive: Option<AnnotationDirective>,
) -> MergeOutcome {
    let Some(directive) = directive else {
        return MergeOutcome {
            node: base,
            degraded: None,
        };
    };

    match directive {
        AnnotationDirective::Append { chain } => {
            let mut node = base;
            node.refinements.extend(chain);
            MergeOutcome {
                node,
                degraded: None,
            }
        }
        AnnotationDirective::Override {
            expression,
            trailing,
        } => {
            if !is_balanced(&expression) {
                return MergeOutcome {
                    node: base,
                    degraded: Some("override expression has unbalanced brackets".to_string()),
                };
            }

            let mut node = base;
            node.refinements.clear();
            node.override_expr = Some(OverrideExpression {
                expression,
                trailing,
            });
            MergeOutcome {
                node,
                degraded: None,
            }
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{PrimitiveKind, RefinementCall, Shape};

    fn base() -> ExpressionNode {
        ExpressionNode::nullable(Shape::primitive(PrimitiveKind::String))
            .with_refinements(vec![RefinementCall::new("trim", "")])
    }

    #[test]
    fn no_directive_passes_base_through() {
        let outcome = merge_directive(base(), None);
        assert_eq!(outcome.node, base());
        assert!(outcome.degraded.is_none());
    }

    #[test]
    fn append_extends_refinements_and_keeps_shape() {
        let directive = AnnotationDirective::Append {
            chain: vec![
                RefinementCall::new("min", "2"),
                RefinementCall::new("max", "50"),
            ],
        };
        let outcome = merge_directive(base(), directive.into());

        assert_eq!(outcome.node.refinements.len(), 3);
        assert_eq!(
            outcome.node.shape.primitive_kind(),
            Some(PrimitiveKind::String)
        );
        assert_eq!(outcome.node.optionality, base().optionality);
    }

    #[test]
    fn override_replaces_refinements_but_keeps_optionality() {
        let directive = AnnotationDirective::Override {
            expression: "z.string().email()".to_string(),
            trailing: vec![RefinementCall::new("trim", "")],
        };
        let outcome = merge_directive(base(), directive.into());

        assert!(outcome.node.refinements.is_empty());
        let override_expr = outcome.node.override_expr.unwrap();
        assert_eq!(override_expr.expression, "z.string().email()");
        assert_eq!(override_expr.trailing.len(), 1);
        assert_eq!(outcome.node.optionality, base().optionality);
    }

    #[test]
    fn unbalanced_override_degrades_to_base() {
        let directive = AnnotationDirective::Override {
            expression: "z.string(".to_string(),
            trailing: Vec::new(),
        };
        let outcome = merge_directive(base(), directive.into());

        assert!(outcome.degraded.is_some());
        assert!(outcome.node.override_expr.is_none());
        assert_eq!(outcome.node, base());
    }
}
