//! Route-likeness heuristics.
//!
//! `is_route_like` is a tunable filter, not a grammar: it accepts strings that start
//! with a single `/` and only use URL path characters plus the `:`/`{}` parameter
//! markers. Known false negatives: absolute URLs (`https://host/x`), routes with regex
//! groups containing `\`, and relative routes such as `users/:id`. Known false
//! positives: absolute filesystem paths (`/etc/hosts`) and MIME-like strings that
//! happen to start with `/`.

pub const HTTP_ANY: &str = "ANY";

/// Member names that register routes on express-like routers.
pub const HTTP_METHOD_NAMES: &[&str] = &["get", "post", "put", "patch", "delete", "options", "head"];

const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "HEAD"];
const ROUTE_MAX_LEN: usize = 200;

/// Upper-cased HTTP verb for a route-registration member name (`get` → `GET`,
/// `all` → `ANY`). Anything else is `None`.
pub fn normalize_method(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('"');
    if trimmed.is_empty() {
        return None;
    }
    let upper = trimmed.to_ascii_uppercase();
    if upper == "ALL" || upper == "ANY" {
        return Some(HTTP_ANY.to_string());
    }
    if HTTP_METHODS.iter().any(|method| *method == upper) {
        return Some(upper);
    }
    None
}

pub fn is_http_method_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    HTTP_METHOD_NAMES.contains(&lower.as_str())
}

pub fn is_route_like(candidate: &str) -> bool {
    let value = candidate.trim();
    if value.is_empty() || value.len() > ROUTE_MAX_LEN {
        return false;
    }
    if !value.starts_with('/') || value.starts_with("//") {
        return false;
    }
    // free text always carries whitespace somewhere
    if value.chars().any(|ch| ch.is_whitespace()) {
        return false;
    }
    if !value.chars().all(is_route_char) {
        return false;
    }
    if value.split('/').any(|segment| segment == "." || segment == "..") {
        return false;
    }
    braces_balanced(value)
}

/// Parameter names in order of appearance, duplicates included.
///
/// A parameter is a path segment that starts with `:` or `{` right after a `/`; the
/// name runs until the next `/`, `?`, `}` or the end of the route.
pub fn extract_route_parameters(route: &str) -> Vec<String> {
    let chars: Vec<char> = route.chars().collect();
    let mut params = Vec::new();
    let mut idx = 0;
    while idx < chars.len() {
        let starts_param =
            chars[idx] == '/' && matches!(chars.get(idx + 1), Some(':') | Some('{'));
        if !starts_param {
            idx += 1;
            continue;
        }
        let start = idx + 2;
        let mut end = start;
        while end < chars.len() && !matches!(chars[end], '/' | '?' | '}') {
            end += 1;
        }
        if end > start {
            params.push(chars[start..end].iter().collect());
        }
        idx = end;
    }
    params
}

/// Controller path joined with a member path: `cats` + `:id` → `/cats/:id`, and
/// two empty parts give `/`.
pub fn join_route(prefix: &str, path: &str) -> String {
    let parts: Vec<&str> = [prefix, path]
        .iter()
        .map(|part| part.trim().trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect();
    format!("/{}", parts.join("/"))
}

/// Lower-cased route with every parameter-like segment collapsed to `{}`, used to
/// group registrations of the same endpoint. Returns `None` for non-routes.
pub fn normalize_route(raw: &str) -> Option<String> {
    let value = raw.trim();
    if !is_route_like(value) {
        return None;
    }
    let value = strip_query_fragment(value);
    let mut path = collapse_slashes(value);
    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    let mut out = String::from("/");
    let mut has_alpha = false;
    for (idx, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if idx > 0 {
            out.push('/');
        }
        let normalized = normalize_route_segment(segment);
        if normalized.chars().any(|ch| ch.is_ascii_alphabetic()) {
            has_alpha = true;
        }
        out.push_str(&normalized);
    }
    if !has_alpha {
        return None;
    }
    Some(out.to_ascii_lowercase())
}

fn is_route_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '/' | '-' | '_' | '.' | '~' | ':' | '{' | '}' | '?' | '*' | '+' | '(' | ')' | '$' | '@'
                | '!' | '&' | '=' | ',' | ';' | '%'
        )
}

fn braces_balanced(value: &str) -> bool {
    let mut depth = 0i32;
    for ch in value.chars() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn strip_query_fragment(value: &str) -> &str {
    let mut end = value.len();
    if let Some(idx) = value.find('#') {
        end = end.min(idx);
    }
    // `?` directly after a parameter name is the optional marker, not a query
    if let Some(idx) = value.find("/?") {
        end = end.min(idx + 1);
    }
    &value[..end]
}

fn collapse_slashes(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last_slash = false;
    for ch in value.chars() {
        if ch == '/' {
            if !last_slash {
                out.push(ch);
                last_slash = true;
            }
        } else {
            out.push(ch);
            last_slash = false;
        }
    }
    out
}

fn normalize_route_segment(segment: &str) -> String {
    let trimmed = segment.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with(':') || trimmed.starts_with('{') || trimmed.starts_with('$') {
        return "{}".to_string();
    }
    if trimmed.contains("${") || trimmed.contains('*') {
        return "{}".to_string();
    }
    if trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        return "{}".to_string();
    }
    trimmed.to_string()
}
