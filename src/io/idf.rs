//! Flat text input format I/O.
//!
//! The flat format is a comma-separated object list: a type name, then one
//! value per field, closed by a semicolon. `!` starts a comment; the `!-`
//! variant carries a field label the parser keeps so a reprint looks like
//! the input. Cross-references are names here, never handles, so the format
//! carries no hierarchy; the translators rebuild it.

use anyhow::{Context, Result, anyhow};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// One field token together with its label comment, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdfField {
    pub value: String,
    /// Label from a `!- ...` comment; empty when the input had none.
    pub label: String,
}

/// One object in a flat-format document: the type name and the raw field
/// tokens in declaration order. For named types the first token is the
/// object's name; the document layer itself is schema-agnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdfObject {
    pub type_name: String,
    pub fields: Vec<IdfField>,
}

impl IdfObject {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.fields.push(IdfField {
            value: value.into(),
            label: String::new(),
        });
    }

    pub fn push_labeled(&mut self, value: impl Into<String>, label: &str) {
        self.fields.push(IdfField {
            value: value.into(),
            label: label.to_string(),
        });
    }

    /// Field token by position, blank when the object is shorter.
    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }
}

impl fmt::Display for IdfObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return writeln!(f, "{};", self.type_name);
        }
        writeln!(f, "{},", self.type_name)?;
        let last = self.fields.len() - 1;
        for (idx, field) in self.fields.iter().enumerate() {
            let sep = if idx == last { ';' } else { ',' };
            let token = format!("{}{}", field.value, sep);
            if field.label.is_empty() {
                writeln!(f, "  {token}")?;
            } else {
                writeln!(f, "  {token:<25}  !- {}", field.label)?;
            }
        }
        Ok(())
    }
}

/// A parsed flat-format file: objects in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdfDocument {
    pub objects: Vec<IdfObject>,
}

impl IdfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl fmt::Display for IdfDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, object) in self.objects.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{object}")?;
        }
        Ok(())
    }
}

/// Splits a line into code and, when the comment is a `!-` label, the
/// label text. Delimiters are forbidden inside values, so the first `!`
/// always starts a comment.
fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.find('!') {
        Some(pos) => {
            let label = line[pos..].strip_prefix("!-").map(str::trim);
            (&line[..pos], label)
        }
        None => (line, None),
    }
}

/// Parses flat-format text into a document.
///
/// Values may share a line or sit one per line; comments are dropped
/// except for `!-` labels, which stick to the value they follow. Blank
/// field tokens are kept, they mean "no value". Structural damage, a
/// value missing its `,` or `;`, an empty type name, an object left open
/// at the end, fails with the line number.
pub fn from_idf_string(text: &str) -> Result<IdfDocument> {
    let mut objects: Vec<IdfObject> = Vec::new();
    let mut current: Option<IdfObject> = None;
    let mut buffer = String::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let (code, label) = split_comment(raw);

        let mut fields_done = false;
        let mut closed = false;
        for ch in code.chars() {
            if ch != ',' && ch != ';' {
                buffer.push(ch);
                continue;
            }
            let token = buffer.trim().to_string();
            buffer.clear();
            match current.take() {
                None => {
                    if token.is_empty() {
                        return Err(anyhow!("line {line_no}: object with empty type name"));
                    }
                    let object = IdfObject::new(&token);
                    if ch == ';' {
                        objects.push(object);
                        closed = true;
                    } else {
                        current = Some(object);
                    }
                }
                Some(mut object) => {
                    object.fields.push(IdfField {
                        value: token,
                        label: String::new(),
                    });
                    fields_done = true;
                    if ch == ';' {
                        objects.push(object);
                        closed = true;
                    } else {
                        current = Some(object);
                    }
                }
            }
        }

        if !buffer.trim().is_empty() {
            return Err(anyhow!(
                "line {line_no}: value {:?} not terminated by ',' or ';'",
                buffer.trim()
            ));
        }
        buffer.clear();

        if let Some(label) = label
            && fields_done
        {
            let target = if closed && current.is_none() {
                objects.last_mut()
            } else {
                current.as_mut()
            };
            if let Some(field) = target.and_then(|o| o.fields.last_mut()) {
                field.label = label.to_string();
            }
        }
    }

    if let Some(object) = current {
        return Err(anyhow!(
            "unterminated object {} at end of input",
            object.type_name
        ));
    }
    Ok(IdfDocument { objects })
}

/// Prints a document to flat-format text.
pub fn to_idf_string(document: &IdfDocument) -> String {
    document.to_string()
}

/// Reads a flat-format file.
pub fn read_idf(path: &Path) -> Result<IdfDocument> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    from_idf_string(&text).with_context(|| format!("Failed to parse: {}", path.display()))
}

/// Writes a document to a flat-format file.
pub fn write_idf(path: &Path, document: &IdfDocument) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write!(writer, "{document}")
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(())
}
