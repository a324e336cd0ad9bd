use crate::expr::RefinementCall;

/// Marker token that introduces a directive inside field documentation.
pub const MARKER: &str = "@zod";

///
/// AnnotationDirective
///
/// A parsed field directive: either a chain of refinement calls appended
/// to the inferred base shape, or a full-expression override that replaces
/// it (while the field's computed optionality still applies).
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AnnotationDirective {
    Append {
        chain: Vec<RefinementCall>,
    },
    Override {
        expression: String,
        trailing: Vec<RefinementCall>,
    },
}

///
/// ParsedAnnotation
///
/// Parse outcome. Malformed syntax never fails the run; the caller records
/// a warning and the field falls back to its inferred base shape.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParsedAnnotation {
    Directive(AnnotationDirective),
    Malformed { reason: String },
    Missing,
}

/// Extract the directive from a field's raw annotation text, if any.
///
/// Multi-line documentation blocks are collapsed into one logical line
/// first, so a call chain or override expression spanning several comment
/// lines parses as a single directive.
#[must_use]
pub fn parse_annotation(text: &str) -> ParsedAnnotation {
    let line = collapse(text);

    let Some(pos) = line.find(MARKER) else {
        return ParsedAnnotation::Missing;
    };

    let rest = line[pos + MARKER.len()..].trim_start();
    if rest.is_empty() {
        return malformed("marker is not followed by a call chain");
    }
    if !rest.starts_with('.') {
        return malformed("expected '.' after marker");
    }

    let segments = match parse_chain(rest) {
        Ok(segments) => segments,
        Err(reason) => return ParsedAnnotation::Malformed { reason },
    };

    build_directive(segments)
}

/// Check bracket balance over `()[]{}`, skipping quoted content.
#[must_use]
pub fn is_balanced(text: &str) -> bool {
    let mut depth = 0i64;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in text.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }

    depth == 0 && quote.is_none()
}

///
/// Segment
/// One `.name` or `.name(args)` link of a parsed chain.
///

struct Segment {
    name: String,
    args: Option<String>,
}

fn malformed(reason: &str) -> ParsedAnnotation {
    ParsedAnnotation::Malformed {
        reason: reason.to_string(),
    }
}

// Collapse a multi-line annotation block into one logical line: whitespace
// runs outside brackets become a single space; bracketed content is kept
// verbatim apart from newlines.
fn collapse(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0i64;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut pending_space = false;

    for c in text.chars() {
        if let Some(q) = quote {
            out.push(if c == '\n' { ' ' } else { c });
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                flush_space(&mut out, &mut pending_space);
                quote = Some(c);
                out.push(c);
            }
            '(' | '[' | '{' => {
                flush_space(&mut out, &mut pending_space);
                depth += 1;
                out.push(c);
            }
            ')' | ']' | '}' => {
                flush_space(&mut out, &mut pending_space);
                depth -= 1;
                out.push(c);
            }
            c if c.is_whitespace() => {
                if depth > 0 {
                    out.push(if c == '\n' { ' ' } else { c });
                } else {
                    pending_space = true;
                }
            }
            c => {
                flush_space(&mut out, &mut pending_space);
                out.push(c);
            }
        }
    }

    out.trim().to_string()
}

fn flush_space(out: &mut String, pending: &mut bool) {
    if *pending && !out.is_empty() {
        out.push(' ');
    }
    *pending = false;
}

// Parse a `.a(x).b(y)` chain starting at a '.', tolerating whitespace
// around the dots. Text after the chain (trailing prose) is ignored.
fn parse_chain(input: &str) -> Result<Vec<Segment>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut segments = Vec::new();
    let mut i = 0;

    loop {
        // caller guarantees the first char is '.'
        i += 1;
        skip_spaces(&chars, &mut i);

        let start = i;
        while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
            i += 1;
        }
        if i == start || chars[start].is_numeric() {
            return Err("expected a method name after '.'".to_string());
        }
        let name: String = chars[start..i].iter().collect();

        skip_spaces(&chars, &mut i);

        let args = if i < chars.len() && chars[i] == '(' {
            let (inner, close) = scan_balanced(&chars, i)?;
            i = close + 1;
            Some(inner)
        } else {
            None
        };

        segments.push(Segment { name, args });

        skip_spaces(&chars, &mut i);
        if i >= chars.len() || chars[i] != '.' {
            return Ok(segments);
        }
    }
}

fn skip_spaces(chars: &[char], i: &mut usize) {
    while *i < chars.len() && chars[*i].is_whitespace() {
        *i += 1;
    }
}

// Scan from an opening '(' to its balanced close, string-aware. Returns
// the inner text and the index of the closing paren.
fn scan_balanced(chars: &[char], open: usize) -> Result<(String, usize), String> {
    let mut depth = 0i64;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate().skip(open) {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    if c != ')' {
                        return Err("mismatched brackets in call arguments".to_string());
                    }
                    let inner: String = chars[open + 1..i].iter().collect();
                    return Ok((inner.trim().to_string(), i));
                }
                if depth < 0 {
                    return Err("unbalanced brackets in call arguments".to_string());
                }
            }
            _ => {}
        }
    }

    Err("unbalanced brackets in call arguments".to_string())
}

// Classify a parsed chain: a leading bare `.custom` must carry `.use(...)`
// and becomes an override; anything else is an append chain of calls.
fn build_directive(segments: Vec<Segment>) -> ParsedAnnotation {
    let is_override = segments
        .first()
        .is_some_and(|s| s.name == "custom" && s.args.is_none());

    if is_override {
        let Some(use_call) = segments.get(1) else {
            return ParsedAnnotation::Malformed {
                reason: "'.custom' must be followed by '.use(...)'".to_string(),
            };
        };
        let Some(expression) = use_call.args.as_ref().filter(|_| use_call.name == "use") else {
            return ParsedAnnotation::Malformed {
                reason: "'.custom' must be followed by '.use(...)'".to_string(),
            };
        };
        if expression.is_empty() {
            return ParsedAnnotation::Malformed {
                reason: "override expression is empty".to_string(),
            };
        }

        let mut trailing = Vec::new();
        for segment in &segments[2..] {
            let Some(args) = &segment.args else {
                return ParsedAnnotation::Malformed {
                    reason: format!("'.{}' is missing an argument list", segment.name),
                };
            };
            trailing.push(RefinementCall::new(segment.name.clone(), args.clone()));
        }

        return ParsedAnnotation::Directive(AnnotationDirective::Override {
            expression: expression.clone(),
            trailing,
        });
    }

    let mut chain = Vec::new();
    for segment in &segments {
        let Some(args) = &segment.args else {
            return ParsedAnnotation::Malformed {
                reason: format!("'.{}' is missing an argument list", segment.name),
            };
        };
        chain.push(RefinementCall::new(segment.name.clone(), args.clone()));
    }

    ParsedAnnotation::Directive(AnnotationDirective::Append { chain })
}

///
/// TESTS
///
