//! Java source rendering for a [`ClassSpec`].

use std::fmt::Write as _;

use itertools::Itertools;

use super::{ClassSpec, Constructor, FieldSpec};
use crate::level::FieldLevel;

const INDENT: &str = "    ";
const RECORD_ID: &str = "WaAS_RecordID";
const RECORD_BASE: &str = "Data_Record";

fn indent(depth: usize) -> String {
    INDENT.repeat(depth)
}

pub fn render(spec: &ClassSpec) -> String {
    let mut out = String::new();
    write_preamble(&mut out, spec);
    write_class_open(&mut out, spec);
    if spec.constructor == Constructor::Root {
        let _ = writeln!(out, "{}protected String[] s;", indent(1));
        let _ = writeln!(out);
    }
    for field in &spec.fields {
        write_declaration(&mut out, field);
    }
    for field in &spec.fields {
        write_initializer(&mut out, field);
    }
    for field in &spec.fields {
        write_getter(&mut out, field);
    }
    write_constructor(&mut out, spec);
    let _ = writeln!(out, "}}");
    out
}

fn write_preamble(out: &mut String, spec: &ClassSpec) {
    let _ = writeln!(out, "/**");
    let _ = writeln!(out, " * Source code generated by {}", env!("CARGO_PKG_NAME"));
    let _ = writeln!(out, " */");
    let _ = writeln!(out);
    let _ = writeln!(out, "package {};", spec.package);
    let _ = writeln!(out);
    for import in &spec.imports {
        let _ = writeln!(out, "import {import};");
    }
}

fn write_class_open(out: &mut String, spec: &ClassSpec) {
    let modifiers = if spec.is_abstract() {
        "public abstract class"
    } else {
        "public class"
    };
    let base = spec.extends.as_deref().unwrap_or(RECORD_BASE);
    let _ = writeln!(out);
    let _ = writeln!(out, "{modifiers} {} extends {base} {{", spec.class_name);
    let _ = writeln!(out);
}

fn write_declaration(out: &mut String, field: &FieldSpec) {
    let _ = writeln!(
        out,
        "{}protected {} {};",
        indent(1),
        field.level.java_type(),
        field.name
    );
    let _ = writeln!(out);
}

fn write_getter(out: &mut String, field: &FieldSpec) {
    let _ = writeln!(
        out,
        "{}public {} get{}() {{",
        indent(1),
        field.level.java_type(),
        field.name
    );
    let _ = writeln!(out, "{}return {};", indent(2), field.name);
    let _ = writeln!(out, "{}}}", indent(1));
    let _ = writeln!(out);
}

/// Parse expression and empty-value fallback for numeric levels.
fn numeric_parse(level: FieldLevel) -> Option<(&'static str, &'static str)> {
    match level {
        FieldLevel::Double => Some(("Double.parseDouble(s.trim())", "Double.NaN")),
        FieldLevel::Int => Some(("Integer.parseInt(s.trim())", "Integer.MIN_VALUE")),
        FieldLevel::Short => Some(("Short.parseShort(s.trim())", "Short.MIN_VALUE")),
        FieldLevel::Byte => Some(("Byte.parseByte(s.trim())", "Byte.MIN_VALUE")),
        FieldLevel::Boolean | FieldLevel::String => None,
    }
}

fn write_initializer(out: &mut String, field: &FieldSpec) {
    let name = &field.name;
    let _ = writeln!(
        out,
        "{}protected final void init{name}(String s) {{",
        indent(1)
    );
    let _ = writeln!(out, "{}if (!s.trim().isEmpty()) {{", indent(2));
    match field.level {
        FieldLevel::String => {
            let _ = writeln!(out, "{}{name} = s;", indent(3));
        }
        FieldLevel::Boolean => {
            let _ = writeln!(out, "{}byte b = Byte.parseByte(s.trim());", indent(3));
            match field.false_code {
                Some(code) => {
                    let _ = writeln!(out, "{}if (b == {code}) {{", indent(3));
                    let _ = writeln!(out, "{}{name} = false;", indent(4));
                    let _ = writeln!(out, "{}}} else {{", indent(3));
                    let _ = writeln!(out, "{}{name} = true;", indent(4));
                    let _ = writeln!(out, "{}}}", indent(3));
                }
                None => {
                    let _ = writeln!(out, "{}{name} = false;", indent(3));
                }
            }
        }
        level => {
            if let Some((parse, missing)) = numeric_parse(level) {
                let _ = writeln!(out, "{}{name} = {parse};", indent(3));
                let _ = writeln!(out, "{}}} else {{", indent(2));
                let _ = writeln!(out, "{}{name} = {missing};", indent(3));
            }
        }
    }
    let _ = writeln!(out, "{}}}", indent(2));
    let _ = writeln!(out, "{}}}", indent(1));
    let _ = writeln!(out);
}

fn write_constructor(out: &mut String, spec: &ClassSpec) {
    let name = &spec.class_name;
    match &spec.constructor {
        Constructor::Root | Constructor::Intermediate => {
            let _ = writeln!(out, "{}{name}({RECORD_ID} i) {{", indent(1));
            let _ = writeln!(out, "{}super(i);", indent(2));
            let _ = writeln!(out, "{}}}", indent(1));
        }
        Constructor::Concrete { columns } => {
            let _ = writeln!(
                out,
                "{}public {name}({RECORD_ID} i, String line) throws Exception {{",
                indent(1)
            );
            let _ = writeln!(out, "{}super(i);", indent(2));
            let _ = writeln!(out, "{}s = line.split(\"\\t\", -1);", indent(2));
            let calls = columns
                .iter()
                .enumerate()
                .map(|(idx, column)| format!("{}init{column}(s[{idx}]);", indent(2)))
                .join("\n");
            if !calls.is_empty() {
                let _ = writeln!(out, "{calls}");
            }
            let _ = writeln!(out, "{}}}", indent(1));
            let _ = writeln!(out);
            let _ = writeln!(out, "{}@Override", indent(1));
            let _ = writeln!(out, "{}public {RECORD_ID} getID() {{", indent(1));
            let _ = writeln!(out, "{}return ({RECORD_ID}) id;", indent(2));
            let _ = writeln!(out, "{}}}", indent(1));
        }
    }
}
