//! Render a filter tree into a parameterized WHERE fragment.
//!
//! Identifiers come from the entity descriptor only; every comparison value
//! binds as a parameter. Unknown field names and operators are errors, which
//! the record service collapses into the uniform classification.

use crate::error::AppError;
use crate::filter::types::WhereTree;
use crate::schema::EntityDescriptor;
use crate::sql::{field_of, quoted, QueryBuf};
use serde_json::Value;

/// Render the tree, pushing bind parameters into `q`. `None` when the tree
/// is empty (no WHERE clause at all).
pub fn render_where(
    tree: &WhereTree,
    entity: &EntityDescriptor,
    q: &mut QueryBuf,
) -> Result<Option<String>, AppError> {
    if tree.is_empty() {
        return Ok(None);
    }
    Ok(Some(render_node(tree, entity, q)?))
}

fn render_node(
    tree: &WhereTree,
    entity: &EntityDescriptor,
    q: &mut QueryBuf,
) -> Result<String, AppError> {
    let mut parts = Vec::new();
    for (name, value) in &tree.fields {
        parts.push(render_field(entity, name, value, q)?);
    }
    for child in &tree.and {
        parts.push(format!("({})", render_node(child, entity, q)?));
    }
    if !tree.or.is_empty() {
        let branches = tree
            .or
            .iter()
            .map(|child| render_node(child, entity, q))
            .collect::<Result<Vec<_>, _>>()?;
        parts.push(format!("({})", branches.join(" OR ")));
    }
    for child in &tree.not {
        parts.push(format!("NOT ({})", render_node(child, entity, q)?));
    }
    if parts.is_empty() {
        Ok("1=1".to_string())
    } else {
        Ok(parts.join(" AND "))
    }
}

fn render_field(
    entity: &EntityDescriptor,
    name: &str,
    value: &Value,
    q: &mut QueryBuf,
) -> Result<String, AppError> {
    let field = field_of(entity, name)?;
    let col = quoted(field.column_name());
    let cast = field.field_type.sql_cast();
    match value {
        Value::Null => Ok(format!("{} IS NULL", col)),
        Value::Object(ops) => {
            let mut parts = Vec::new();
            for (op, operand) in ops {
                parts.push(render_operator(&col, cast, op, operand, q)?);
            }
            if parts.is_empty() {
                Ok("1=1".to_string())
            } else {
                Ok(parts.join(" AND "))
            }
        }
        scalar => {
            let ph = q.bind(scalar.clone(), cast);
            Ok(format!("{} = {}", col, ph))
        }
    }
}

fn render_operator(
    col: &str,
    cast: Option<&str>,
    op: &str,
    operand: &Value,
    q: &mut QueryBuf,
) -> Result<String, AppError> {
    let comparison = |sym: &str, q: &mut QueryBuf| {
        let ph = q.bind(operand.clone(), cast);
        format!("{} {} {}", col, sym, ph)
    };
    Ok(match op {
        "equals" => match operand {
            Value::Null => format!("{} IS NULL", col),
            _ => comparison("=", q),
        },
        "not" => match operand {
            Value::Null => format!("{} IS NOT NULL", col),
            _ => comparison("<>", q),
        },
        "in" => render_in(col, cast, operand, false, q)?,
        "notIn" => render_in(col, cast, operand, true, q)?,
        "lt" => comparison("<", q),
        "lte" => comparison("<=", q),
        "gt" => comparison(">", q),
        "gte" => comparison(">=", q),
        "contains" => {
            let ph = q.bind(operand.clone(), None);
            format!("{} LIKE '%' || {} || '%'", col, ph)
        }
        "startsWith" => {
            let ph = q.bind(operand.clone(), None);
            format!("{} LIKE {} || '%'", col, ph)
        }
        "endsWith" => {
            let ph = q.bind(operand.clone(), None);
            format!("{} LIKE '%' || {}", col, ph)
        }
        other => return Err(AppError::UnsupportedOperator(other.to_string())),
    })
}

fn render_in(
    col: &str,
    cast: Option<&str>,
    operand: &Value,
    negated: bool,
    q: &mut QueryBuf,
) -> Result<String, AppError> {
    let Value::Array(items) = operand else {
        return Err(AppError::UnsupportedOperator(format!(
            "{} expects an array",
            if negated { "notIn" } else { "in" }
        )));
    };
    if items.is_empty() {
        // IN () is invalid SQL; an empty list matches nothing.
        return Ok(if negated { "1=1" } else { "1=0" }.to_string());
    }
    let placeholders = items
        .iter()
        .map(|v| q.bind(v.clone(), cast))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!(
        "{} {} ({})",
        col,
        if negated { "NOT IN" } else { "IN" },
        placeholders
    ))
}
