//! Receiver text simplification.

use std::sync::LazyLock;

use regex::Regex;

static NEW_EXPR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bnew\s+([A-Za-z_][A-Za-z0-9_]*)\b").expect("new-expression pattern compiles")
});

/// Reduce a call receiver to the bare name the resolver can look up.
///
/// `new OrderDao(conn)` gives `OrderDao`, `app.dao.OrderDao` gives
/// `OrderDao`, `getDao().` gives `getDao`. `this` and `super` pass through.
/// Returns `None` for an empty receiver or one with no identifier characters.
pub fn simplify_qualifier(raw: Option<&str>) -> Option<String> {
    let q = raw?.trim();
    if q.is_empty() {
        return None;
    }
    if let Some(caps) = NEW_EXPR.captures(q) {
        return Some(caps[1].to_string());
    }
    let before_call = q.split('(').next().unwrap_or(q).trim();
    let last = before_call.rsplit('.').next().unwrap_or(before_call);
    let name: String = last
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    (!name.is_empty()).then_some(name)
}

/// Whether the receiver refers to the calling object itself.
pub fn is_self_reference(qualifier: Option<&str>) -> bool {
    matches!(qualifier, None | Some("this") | Some("super"))
}
