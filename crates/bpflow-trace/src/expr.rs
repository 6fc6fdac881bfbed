//! Expression building: operator tables and the text shapes of composed
//! expressions.
//!
//! Nothing here resolves pins. Callers resolve operands first and hand the
//! resulting [`StyledText`] in; this module only knows which symbol a
//! function name maps to and how the pieces are laid out.

use crate::span::{SpanKind, StyledText};

/// Function-name base to binary operator symbol.
const BINARY_OPERATORS: [(&str, &str); 18] = [
    ("Add", "+"),
    ("Subtract", "-"),
    ("Multiply", "*"),
    ("Divide", "/"),
    ("Percent", "%"),
    ("Less", "<"),
    ("Greater", ">"),
    ("LessEqual", "<="),
    ("GreaterEqual", ">="),
    ("EqualEqual", "=="),
    ("NotEqual", "!="),
    ("BooleanAND", "&&"),
    ("BooleanOR", "||"),
    ("BooleanXOR", "^"),
    ("BooleanNAND", "!&"),
    ("And", "&"),
    ("Or", "|"),
    ("Xor", "^"),
];

/// The part of a function name before its `_TypeType` suffix.
pub fn operation_base(function: &str) -> &str {
    let function = function.trim();
    function.split('_').next().unwrap_or(function)
}

/// Binary operator symbol for a function name, if it is one.
///
/// `Concat` (string join) is reported as `+`; it is always rendered n-ary.
pub fn operator_symbol(function: &str) -> Option<&'static str> {
    let base = operation_base(function);
    if base == "Concat" {
        return Some("+");
    }
    BINARY_OPERATORS
        .iter()
        .find(|(name, _)| *name == base)
        .map(|(_, symbol)| *symbol)
}

/// Unary operator symbol for a function name, if it is one.
pub fn unary_symbol(function: &str) -> Option<&'static str> {
    let function = function.trim();
    match function {
        "Not_PreBool" | "BooleanNot" => Some("!"),
        "Not_Int" => Some("~"),
        _ if function.starts_with("Negate") => Some("-"),
        _ => None,
    }
}

/// True for conversion functions: `Conv_XToY`, or the display form
/// `ToY (X)`.
pub fn is_conversion(function: &str) -> bool {
    conversion_name(function).is_some()
}

/// Display name of a conversion: `Conv_IntToString` → `ToString`,
/// `ToText (Float)` → `ToText`.
pub fn conversion_name(function: &str) -> Option<String> {
    let function = function.trim();
    if let Some(rest) = function.strip_prefix("Conv_") {
        let to = rest.rfind("To")?;
        let target = &rest[to..];
        return (target.len() > 2).then(|| target.to_string());
    }
    let (head, tail) = function.split_once(" (")?;
    if head.starts_with("To") && head.len() > 2 && tail.ends_with(')') {
        return Some(head.to_string());
    }
    None
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// `(A op B)`
pub fn binary(lhs: StyledText, symbol: &str, rhs: StyledText) -> StyledText {
    nary(vec![lhs, rhs], symbol)
}

/// `(A op B op C)`
pub fn nary(operands: Vec<StyledText>, symbol: &str) -> StyledText {
    let mut out = StyledText::plain("(");
    for (idx, operand) in operands.into_iter().enumerate() {
        if idx > 0 {
            out.push_plain(" ");
            out.push(SpanKind::Operator, symbol);
            out.push_plain(" ");
        }
        out.append(operand);
    }
    out.push_plain(")");
    out
}

/// `op (A)`
pub fn unary(symbol: &str, operand: StyledText) -> StyledText {
    StyledText::styled(SpanKind::Operator, symbol)
        .with_plain(" ")
        .with_text(StyledText::parenthesized(operand))
}

/// `Name(a, b)` with a plain function-name span.
pub fn call(name: &str, args: Vec<StyledText>) -> StyledText {
    call_with(StyledText::styled(SpanKind::FunctionName, name), args)
}

/// `<name>(a, b)` for an already styled (possibly linked) name.
pub fn call_with(name: StyledText, args: Vec<StyledText>) -> StyledText {
    name.with_text(StyledText::parenthesized(StyledText::join(args, ", ")))
}

/// `name=value`
pub fn argument(name: &str, value: StyledText) -> StyledText {
    StyledText::styled(SpanKind::ParamName, name)
        .with_plain("=")
        .with_text(value)
}

/// `(Cond ? A : B)`
pub fn select(condition: StyledText, a: StyledText, b: StyledText) -> StyledText {
    StyledText::plain("(")
        .with_text(condition)
        .with_plain(" ")
        .with(SpanKind::Operator, "?")
        .with_plain(" ")
        .with_text(a)
        .with_plain(" ")
        .with(SpanKind::Operator, ":")
        .with_plain(" ")
        .with_text(b)
        .with_plain(")")
}

/// `receiver.member`
pub fn member(receiver: StyledText, member: &str, kind: SpanKind) -> StyledText {
    receiver.with_plain(".").with(kind, member)
}
