use crate::ast::{NodeId, NodeKind, Script};

const INDENT: &str = "  ";

/// Renders a script back to source form, one statement per line.
pub fn render_script(script: &Script) -> String {
    let mut out = String::new();
    out.push_str("SCRIPT ");
    out.push_str(script.name());
    out.push('\n');
    for id in script.top_level() {
        write_node(script, *id, 1, &mut out);
    }
    out
}

fn write_node(script: &Script, id: NodeId, depth: usize, out: &mut String) {
    match script.kind(id) {
        NodeKind::Script => {
            for child in script.children(id) {
                write_node(script, *child, depth, out);
            }
        }
        NodeKind::Statement => {
            indent(depth, out);
            out.push_str(&inline(script, id));
            out.push_str(";\n");
        }
        NodeKind::Block => {
            indent(depth, out);
            out.push_str("{\n");
            for child in script.children(id) {
                write_node(script, *child, depth + 1, out);
            }
            indent(depth, out);
            out.push_str("}\n");
        }
        NodeKind::Conditional(_) => write_conditional(script, id, depth, "IF", out),
        NodeKind::Enclosure | NodeKind::Value { .. } | NodeKind::Operator(_) => {
            indent(depth, out);
            out.push_str(&fragment(script, id));
            out.push('\n');
        }
    }
}

fn write_conditional(script: &Script, id: NodeId, depth: usize, keyword: &str, out: &mut String) {
    indent(depth, out);
    out.push_str(keyword);
    if let Some(condition) = script.condition(id) {
        out.push(' ');
        out.push_str(&fragment(script, condition));
    }
    out.push('\n');
    if let Some(body) = script.body(id) {
        write_body(script, body, depth, out);
    }
    let Some(alternate) = script.alternate(id) else {
        return;
    };
    let else_if = script
        .conditional(alternate)
        .is_some_and(|conditional| conditional.is_alternate_condition);
    if else_if {
        write_conditional(script, alternate, depth, "ELSE IF", out);
    } else {
        indent(depth, out);
        out.push_str("ELSE\n");
        write_body(script, alternate, depth, out);
    }
}

// braces line up with the IF; bare bodies are indented one step
fn write_body(script: &Script, id: NodeId, depth: usize, out: &mut String) {
    let depth = match script.kind(id) {
        NodeKind::Block => depth,
        _ => depth + 1,
    };
    write_node(script, id, depth, out);
}

fn inline(script: &Script, id: NodeId) -> String {
    script
        .children(id)
        .iter()
        .map(|child| fragment(script, *child))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fragment(script: &Script, id: NodeId) -> String {
    match script.kind(id) {
        NodeKind::Value { text } => text.clone(),
        NodeKind::Operator(operator) => operator.text.clone(),
        NodeKind::Enclosure => format!("({})", inline(script, id)),
        _ => inline(script, id),
    }
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
