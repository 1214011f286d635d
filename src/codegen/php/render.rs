//! PHP source rendering for a [`ClassModel`]

use std::fmt::{self, Write};

use crate::model::{ClassModel, PropertyModel};

const INDENT: &str = "    ";

/// Render a class model to PHP source
pub fn render_class(model: &ClassModel<'_>) -> String {
    PhpSource(model).to_string()
}

/// [`fmt::Display`] adapter printing a class model as PHP source
pub struct PhpSource<'a, 't>(pub &'a ClassModel<'t>);

impl fmt::Display for PhpSource<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_class(f, self.0)
    }
}

/// Write a class model as PHP source
pub fn write_class(output: &mut impl Write, model: &ClassModel<'_>) -> fmt::Result {
    writeln!(output, "<?php")?;
    writeln!(output)?;
    writeln!(output, "namespace {};", model.namespace())?;
    writeln!(output)?;

    let mut has_imports = false;
    for import in model.imports() {
        writeln!(output, "use {import};")?;
        has_imports = true;
    }
    if has_imports {
        writeln!(output)?;
    }

    if let Some(comment) = model.comment() {
        write_doc_comment(output, "", comment)?;
    }

    for attribute in model.attributes() {
        writeln!(output, "#[{attribute}]")?;
    }

    match model.parent_type() {
        Some(parent) => writeln!(output, "class {} extends {}", model.class_name(), parent)?,
        None => writeln!(output, "class {}", model.class_name())?,
    }
    writeln!(output, "{{")?;

    for (i, property) in model.properties().enumerate() {
        if i > 0 {
            writeln!(output)?;
        }
        write_property(output, property)?;
    }

    writeln!(output, "}}")
}

fn write_property(output: &mut impl Write, property: &PropertyModel) -> fmt::Result {
    if let Some(comment) = property.comment() {
        write_doc_comment(output, INDENT, comment)?;
    }

    for attribute in property.attributes() {
        writeln!(output, "{INDENT}#[{attribute}]")?;
    }

    writeln!(output, "{INDENT}public {} ${};", property.ty(), property.name())
}

fn write_doc_comment(output: &mut impl Write, indent: &str, comment: &str) -> fmt::Result {
    writeln!(output, "{indent}/**")?;
    for line in comment.lines() {
        // A literal `*/` would close the doc block early
        let line = line.trim_end().replace("*/", "*\\/");
        if line.is_empty() {
            writeln!(output, "{indent} *")?;
        } else {
            writeln!(output, "{indent} * {line}")?;
        }
    }
    writeln!(output, "{indent} */")
}
