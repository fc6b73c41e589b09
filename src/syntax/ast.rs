//! Small helpers over tree-sitter JavaScript/TypeScript nodes.

use tree_sitter::Node;

pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source
        .get(node.start_byte()..node.end_byte())
        .unwrap_or("")
        .trim()
}

pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

pub fn call_target_node(node: Node<'_>) -> Option<Node<'_>> {
    node.child_by_field_name("function")
        .or_else(|| node.child_by_field_name("callee"))
        .or_else(|| node.child_by_field_name("constructor"))
}

pub fn call_arguments(node: Node<'_>) -> Vec<Node<'_>> {
    match node.child_by_field_name("arguments") {
        Some(args) => named_children(args),
        None => Vec::new(),
    }
}

pub fn is_call_like(kind: &str) -> bool {
    matches!(kind, "call_expression" | "new_expression")
}

pub fn is_member_access(kind: &str) -> bool {
    matches!(kind, "member_expression" | "optional_member_expression")
}

pub fn member_object_and_property<'a>(node: Node<'a>, source: &str) -> Option<(Node<'a>, String)> {
    if !is_member_access(node.kind()) {
        return None;
    }
    let object = node.child_by_field_name("object")?;
    let property = node
        .child_by_field_name("property")
        .map(|prop| node_text(prop, source).to_string())?;
    Some((object, property))
}

/// Peel parentheses, `await`, type assertions and non-null assertions.
pub fn strip_wrappers(node: Node<'_>) -> Node<'_> {
    let mut current = node;
    loop {
        let inner = match current.kind() {
            "parenthesized_expression"
            | "as_expression"
            | "satisfies_expression"
            | "type_assertion"
            | "non_null_expression" => current
                .child_by_field_name("expression")
                .or_else(|| current.named_child(0)),
            "await_expression" => current
                .child_by_field_name("argument")
                .or_else(|| current.named_child(0)),
            _ => None,
        };
        match inner {
            Some(next) => current = next,
            None => return current,
        }
    }
}

pub fn unquote_string_literal(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.len() < 2 {
        return None;
    }
    let first = trimmed.chars().next()?;
    if first == '"' || first == '\'' || first == '`' {
        let last = trimmed.chars().last()?;
        if last == first {
            return Some(trimmed[1..trimmed.len() - 1].to_string());
        }
    }
    None
}

pub fn is_string_like(kind: &str) -> bool {
    matches!(kind, "string" | "template_string")
}

/// Contents of a string or template literal, quotes removed.
pub fn string_value(node: Node<'_>, source: &str) -> Option<String> {
    if !is_string_like(node.kind()) {
        return None;
    }
    unquote_string_literal(node_text(node, source))
}

pub fn is_function_like(kind: &str) -> bool {
    matches!(
        kind,
        "function_declaration"
            | "generator_function_declaration"
            | "method_definition"
            | "function_expression"
            | "function"
            | "generator_function"
            | "arrow_function"
    )
}

pub fn is_class_like(kind: &str) -> bool {
    matches!(kind, "class_declaration" | "class" | "abstract_class_declaration")
}

/// Parameter nodes of a function-like node, including the bare identifier of
/// `x => ..`.
pub fn function_parameters(node: Node<'_>) -> Vec<Node<'_>> {
    if let Some(single) = node.child_by_field_name("parameter") {
        return vec![single];
    }
    match node.child_by_field_name("parameters") {
        Some(params) => named_children(params),
        None => Vec::new(),
    }
}

/// The binding pattern of a parameter node (`x`, `{ a }`, `...rest`, `x = 1`).
pub fn parameter_pattern(node: Node<'_>) -> Node<'_> {
    let mut current = node;
    loop {
        let next = match current.kind() {
            "required_parameter" | "optional_parameter" => current.child_by_field_name("pattern"),
            "assignment_pattern" => current.child_by_field_name("left"),
            "rest_pattern" => current.named_child(0),
            _ => None,
        };
        match next {
            Some(inner) if inner.id() != current.id() => current = inner,
            _ => return current,
        }
    }
}

/// Decorators attached to a class member or class declaration. TypeScript puts
/// member decorators before the member inside the class body; exported classes may
/// carry theirs on the `export` statement.
pub fn decorator_nodes(node: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    let parent_kind = node.parent().map(|parent| parent.kind()).unwrap_or("");
    if parent_kind == "class_body" {
        let mut prev = node.prev_named_sibling();
        while let Some(sibling) = prev {
            if sibling.kind() != "decorator" {
                break;
            }
            out.push(sibling);
            prev = sibling.prev_named_sibling();
        }
        out.reverse();
    }
    if let Some(parent) = node.parent() {
        if parent_kind == "export_statement" {
            let mut cursor = parent.walk();
            out.extend(
                parent
                    .named_children(&mut cursor)
                    .filter(|child| child.kind() == "decorator"),
            );
        }
    }
    let mut cursor = node.walk();
    out.extend(
        node.named_children(&mut cursor)
            .filter(|child| child.kind() == "decorator"),
    );
    out
}

/// `@Get('/x')` → `Get`, `@nest.Controller()` → `Controller`.
pub fn decorator_name(node: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        let target = if child.kind() == "call_expression" {
            match call_target_node(child) {
                Some(target) => target,
                None => continue,
            }
        } else {
            child
        };
        let raw = node_text(target, source);
        let name = last_segment(raw);
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }
    None
}

pub fn last_segment(raw: &str) -> &str {
    raw.trim_start_matches('@')
        .rsplit(['.', '?'])
        .next()
        .unwrap_or(raw)
        .trim()
}

/// Name of an object literal key or class member name.
pub fn property_key_name(node: Node<'_>, source: &str) -> Option<String> {
    match node.kind() {
        "property_identifier"
        | "identifier"
        | "private_property_identifier"
        | "shorthand_property_identifier"
        | "shorthand_property_identifier_pattern" => Some(node_text(node, source).to_string()),
        "string" => string_value(node, source),
        "number" => Some(node_text(node, source).to_string()),
        "computed_property_name" => node
            .named_child(0)
            .and_then(|inner| string_value(inner, source)),
        _ => None,
    }
}

/// `: Promise<User>` → `Promise<User>`.
pub fn annotation_text(annotation: Node<'_>, source: &str) -> String {
    let text = node_text(annotation, source);
    crate::util::collapse_whitespace(text.trim_start_matches(':').trim_start())
}

/// Whether an anonymous keyword token (`get`, `static`, `readonly`) is a direct
/// child of `node`.
pub fn has_keyword_child(node: Node<'_>, keyword: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == keyword);
    found
}

pub fn ancestors(node: Node<'_>) -> impl Iterator<Item = Node<'_>> {
    std::iter::successors(node.parent(), |current| current.parent())
}

pub fn contains(outer: Node<'_>, inner: Node<'_>) -> bool {
    outer.start_byte() <= inner.start_byte() && inner.end_byte() <= outer.end_byte()
}

/// Depth-first, source-ordered walk collecting every node accepted by `keep`.
pub fn collect_nodes<'a>(root: Node<'a>, mut keep: impl FnMut(Node<'a>) -> bool) -> Vec<Node<'a>> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if keep(node) {
            out.push(node);
        }
        let mut children = named_children(node);
        children.reverse();
        stack.extend(children);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SourceParser;

    #[test]
    fn unquote_handles_all_quote_styles() {
        assert_eq!(unquote_string_literal("'a'").as_deref(), Some("a"));
        assert_eq!(unquote_string_literal("\"b\"").as_deref(), Some("b"));
        assert_eq!(unquote_string_literal("`c`").as_deref(), Some("c"));
        assert_eq!(unquote_string_literal("d"), None);
        assert_eq!(unquote_string_literal("'e\""), None);
    }

    #[test]
    fn last_segment_strips_receivers() {
        assert_eq!(last_segment("app.get"), "get");
        assert_eq!(last_segment("@Get"), "Get");
        assert_eq!(last_segment("fetch"), "fetch");
    }

    #[test]
    fn collect_nodes_is_source_ordered() {
        let mut parser = SourceParser::new().unwrap();
        let file = parser
            .parse("a.js", "a(b(1)); c(2);".to_string())
            .unwrap();
        let calls = collect_nodes(file.root(), |node| node.kind() == "call_expression");
        let names: Vec<&str> = calls
            .iter()
            .filter_map(|call| call_target_node(*call))
            .map(|target| node_text(target, &file.source))
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
