//! Merges student source with the question's hidden scaffold ("main block").
//!
//! For the C family the scaffold is split by a brace-counting heuristic, not a
//! parser: braces inside comments or string literals shift the depth count
//! and can misplace declarations. Callers should treat the result as
//! best-effort for unusual scaffolds.

use crate::services::grading::language;

const DECLARATION_KEYWORDS: &[&str] = &["struct", "class", "typedef", "enum", "union"];

/// Decodes the HTML entities the submission transport may introduce.
/// `&amp;` is handled last, so a double-escaped `&amp;lt;` decodes to `&lt;`
/// here and to `<` on a second pass.
pub(crate) fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Produces the single source blob sent to the judge.
pub(crate) fn compose(student_code: &str, main_block: Option<&str>, language: Option<&str>) -> String {
    let student = decode_entities(student_code);
    let scaffold = main_block.map(decode_entities).filter(|block| !block.trim().is_empty());

    let Some(scaffold) = scaffold else {
        return decode_entities(&student);
    };

    let composed = if language::is_structurally_ordered(language) {
        let parts = partition_scaffold(&scaffold);
        join_sections(&[
            parts.includes.join("\n"),
            parts.declarations.join("\n"),
            student,
            parts.rest.join("\n"),
        ])
    } else {
        format!("{scaffold}\n\n{student}")
    };

    decode_entities(&composed)
}

#[derive(Debug, Default, PartialEq)]
pub(crate) struct ScaffoldParts {
    pub(crate) includes: Vec<String>,
    pub(crate) declarations: Vec<String>,
    pub(crate) rest: Vec<String>,
}

/// Splits a C-family scaffold into preprocessor lines, top-level type
/// declaration blocks and everything else, each in original order.
pub(crate) fn partition_scaffold(scaffold: &str) -> ScaffoldParts {
    let mut parts = ScaffoldParts::default();
    let mut block: Vec<&str> = Vec::new();
    let mut block_depth: i64 = 0;
    // Depth of the code that stays in `rest`, so nothing inside a function
    // body is mistaken for a top-level declaration.
    let mut rest_depth: i64 = 0;
    // Set while a preprocessor directive continues onto the next line.
    let mut continued_directive = false;

    for line in scaffold.lines() {
        if continued_directive {
            parts.includes.push(line.to_string());
            continued_directive = line.trim_end().ends_with('\\');
            continue;
        }

        if !block.is_empty() {
            block.push(line);
            block_depth += brace_delta(line);
            if block_depth <= 0 {
                parts.declarations.push(block.join("\n"));
                block.clear();
            }
            continue;
        }

        if rest_depth <= 0 && line.trim_start().starts_with('#') {
            parts.includes.push(line.to_string());
            continued_directive = line.trim_end().ends_with('\\');
            continue;
        }

        if rest_depth <= 0 && starts_declaration(line) {
            let delta = brace_delta(line);
            if delta <= 0 {
                parts.declarations.push(line.to_string());
            } else {
                block_depth = delta;
                block.push(line);
            }
            continue;
        }

        rest_depth += brace_delta(line);
        parts.rest.push(line.to_string());
    }

    if !block.is_empty() {
        parts.declarations.push(block.join("\n"));
    }

    parts
}

fn starts_declaration(line: &str) -> bool {
    line.contains('{')
        && line
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .any(|word| DECLARATION_KEYWORDS.contains(&word))
}

fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

fn join_sections(sections: &[String]) -> String {
    sections
        .iter()
        .filter(|section| !section.trim().is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n\n")
}
