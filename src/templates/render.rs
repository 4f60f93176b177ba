//! Minimal mustache-style template engine
//!
//! Supported tags:
//! - `{{ key }}` - HTML-escaped scalar lookup
//! - `{{#key}} ... {{/key}}` - section, repeated per array element,
//!   rendered once for `true` or an object, skipped for `false`/null

use serde_json::Value;

use super::TemplateError;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Var(String),
    Section(String, Vec<Node>),
}

/// A parsed template
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Parse template source. `name` is only used in error messages.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self, TemplateError> {
        let name = name.into();
        let nodes = parse_nodes(&name, source)?;
        Ok(Self { name, nodes })
    }

    /// Template name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render against a JSON context
    pub fn render(&self, context: &Value) -> Result<String, TemplateError> {
        let mut out = String::new();
        let mut scopes = vec![context];
        render_nodes(&self.nodes, &mut scopes, &mut out)?;
        Ok(out)
    }
}

fn parse_nodes(name: &str, source: &str) -> Result<Vec<Node>, TemplateError> {
    // Stack of open sections: (key, nodes collected so far in the parent)
    let mut stack: Vec<(String, Vec<Node>)> = Vec::new();
    let mut current: Vec<Node> = Vec::new();
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            current.push(Node::Text(rest[..start].to_string()));
        }
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or_else(|| {
            TemplateError::Syntax(format!("{}: unclosed tag", name))
        })?;
        let tag = after[..end].trim();
        rest = &after[end + 2..];

        if let Some(key) = tag.strip_prefix('#') {
            let key = key.trim();
            if key.is_empty() {
                return Err(TemplateError::Syntax(format!("{}: empty section name", name)));
            }
            stack.push((key.to_string(), std::mem::take(&mut current)));
        } else if let Some(key) = tag.strip_prefix('/') {
            let key = key.trim();
            let (open, parent) = stack.pop().ok_or_else(|| {
                TemplateError::Syntax(format!("{}: unexpected {{{{/{}}}}}", name, key))
            })?;
            if open != key {
                return Err(TemplateError::Syntax(format!(
                    "{}: {{{{#{}}}}} closed by {{{{/{}}}}}",
                    name, open, key
                )));
            }
            let body = std::mem::replace(&mut current, parent);
            current.push(Node::Section(open, body));
        } else if tag.is_empty() {
            return Err(TemplateError::Syntax(format!("{}: empty tag", name)));
        } else {
            current.push(Node::Var(tag.to_string()));
        }
    }
    if !rest.is_empty() {
        current.push(Node::Text(rest.to_string()));
    }

    if let Some((open, _)) = stack.pop() {
        return Err(TemplateError::Syntax(format!(
            "{}: unclosed section {}",
            name, open
        )));
    }
    Ok(current)
}

fn lookup<'a>(scopes: &[&'a Value], key: &str) -> Option<&'a Value> {
    scopes
        .iter()
        .rev()
        .find_map(|scope| scope.as_object().and_then(|obj| obj.get(key)))
}

fn render_nodes<'a>(
    nodes: &[Node],
    scopes: &mut Vec<&'a Value>,
    out: &mut String,
) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(key) => {
                let value =
                    lookup(scopes, key).ok_or_else(|| TemplateError::UnknownKey(key.clone()))?;
                match value {
                    Value::String(s) => escape_html(s, out),
                    Value::Number(n) => out.push_str(&n.to_string()),
                    Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
                    Value::Null => {}
                    Value::Array(_) | Value::Object(_) => {
                        return Err(TemplateError::TypeMismatch(key.clone()))
                    }
                }
            }
            Node::Section(key, body) => {
                let value =
                    lookup(scopes, key).ok_or_else(|| TemplateError::UnknownKey(key.clone()))?;
                match value {
                    Value::Array(items) => {
                        for item in items {
                            scopes.push(item);
                            render_nodes(body, scopes, out)?;
                            scopes.pop();
                        }
                    }
                    Value::Object(_) => {
                        scopes.push(value);
                        render_nodes(body, scopes, out)?;
                        scopes.pop();
                    }
                    Value::Bool(true) => render_nodes(body, scopes, out)?,
                    Value::Bool(false) | Value::Null => {}
                    Value::String(_) | Value::Number(_) => {
                        return Err(TemplateError::TypeMismatch(key.clone()))
                    }
                }
            }
        }
    }
    Ok(())
}

/// Append `s` to `out` with HTML special characters escaped
pub fn escape_html(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
