//! Type graph document loader.
//!
//! Reads the XML interchange form of an already-parsed old-IDL type graph:
//!
//! ```xml
//! <typeGraph>
//!   <package name="hidl2aidl.test" version="1.0">
//!     <struct name="Outer" doc="Outer doc.">
//!       <struct name="Inner">
//!         <field name="a" type="int32"/>
//!       </struct>
//!       <field name="inner" type="Inner"/>
//!     </struct>
//!     <enum name="Color" storage="uint8">
//!       <value name="RED" value="0"/>
//!     </enum>
//!   </package>
//! </typeGraph>
//! ```
//!
//! Type expressions are scalar names, `string`, `handle`, `memory`,
//! `vec<T>`, `T[N]` (repeatable), fully qualified `pkg@M.m::A.B`, or a
//! dotted name looked up from the innermost enclosing scope outward.

use crate::error::ParseError;
use crate::fqname::{QualifiedName, Version};
use crate::graph::TypeGraph;
use crate::types::{
    CompoundStyle, CompoundType, EnumType, EnumValue, Field, NamedTypeKind, ScalarKind, Type,
    TypeId,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parses a type graph document from a string.
///
/// # Arguments
/// * `xml` - Type graph document content
///
/// # Returns
/// Graph with every type reference resolved.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed, an element or attribute is
/// invalid, or a type reference cannot be resolved.
pub fn parse_type_graph(xml: &str) -> Result<TypeGraph, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut loader = Loader::default();
    let mut seen_root = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = element_name(e)?;
                match name.as_str() {
                    "typeGraph" => seen_root = true,
                    "package" if seen_root => loader.parse_package(&mut reader, e, true)?,
                    other => return Err(ParseError::unknown_element(other, "document")),
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = element_name(e)?;
                match name.as_str() {
                    "typeGraph" => seen_root = true,
                    "package" if seen_root => loader.parse_package(&mut reader, e, false)?,
                    other => return Err(ParseError::unknown_element(other, "document")),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(ParseError::InvalidStructure {
            message: "No typeGraph element found".to_string(),
        });
    }

    let graph = loader.finish()?;
    tracing::debug!("loaded type graph with {} named types", graph.len());
    Ok(graph)
}

/// Parses a type graph document from a file.
///
/// # Errors
/// Returns `ParseError` if reading or parsing fails.
pub fn parse_type_graph_file(path: &std::path::Path) -> Result<TypeGraph, ParseError> {
    let xml = std::fs::read_to_string(path)?;
    parse_type_graph(&xml)
}

/// Unresolved type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeExpr {
    Scalar(ScalarKind),
    String,
    Handle,
    Memory,
    Vector(Box<TypeExpr>),
    Array(Box<TypeExpr>, Vec<usize>),
    Named(String),
}

/// Parses a type expression without resolving names.
fn parse_type_expr(text: &str) -> Result<TypeExpr, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::invalid_attr("field", "type", text));
    }

    let mut base = text;
    let mut dimensions = Vec::new();
    while base.ends_with(']') {
        let open = base
            .rfind('[')
            .ok_or_else(|| ParseError::invalid_attr("field", "type", text))?;
        let dim = base[open + 1..base.len() - 1]
            .trim()
            .parse()
            .map_err(|_| ParseError::invalid_attr("field", "type", text))?;
        dimensions.insert(0, dim);
        base = base[..open].trim_end();
    }
    if !dimensions.is_empty() {
        return Ok(TypeExpr::Array(Box::new(parse_type_expr(base)?), dimensions));
    }

    if let Some(inner) = base.strip_prefix("vec<").and_then(|s| s.strip_suffix('>')) {
        return Ok(TypeExpr::Vector(Box::new(parse_type_expr(inner)?)));
    }

    if let Some(kind) = ScalarKind::from_idl_name(base) {
        return Ok(TypeExpr::Scalar(kind));
    }

    match base {
        "string" => Ok(TypeExpr::String),
        "handle" => Ok(TypeExpr::Handle),
        "memory" => Ok(TypeExpr::Memory),
        _ if base
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | ':')) =>
        {
            Ok(TypeExpr::Named(base.to_string()))
        }
        _ => Err(ParseError::invalid_attr("field", "type", text)),
    }
}

/// Field whose type is resolved once every named type is registered.
#[derive(Debug)]
struct PendingField {
    owner: TypeId,
    name: String,
    type_expr: TypeExpr,
    doc: Option<String>,
}

/// Typedef whose target is resolved once every named type is registered.
#[derive(Debug)]
struct PendingAlias {
    alias: TypeId,
    type_expr: TypeExpr,
}

#[derive(Debug, Default)]
struct Loader {
    graph: TypeGraph,
    fields: Vec<PendingField>,
    aliases: Vec<PendingAlias>,
}

impl Loader {
    /// Parses a `package` element and its declarations.
    fn parse_package(
        &mut self,
        reader: &mut Reader<&[u8]>,
        e: &BytesStart<'_>,
        has_children: bool,
    ) -> Result<(), ParseError> {
        let mut name = None;
        let mut version = None;
        for (key, value) in read_attributes(e)? {
            match key.as_str() {
                "name" => name = Some(value),
                "version" => version = Some(Version::parse(&value)?),
                _ => {}
            }
        }
        let name = name.ok_or_else(|| ParseError::missing_attr("package", "name"))?;
        let version = version.ok_or_else(|| ParseError::missing_attr("package", "version"))?;
        let scope = QualifiedName::new(name, version, Vec::new());

        if has_children {
            self.parse_scope_body(reader, &scope, None, "package")?;
        }
        Ok(())
    }

    /// Parses children of a scope until its end tag.
    fn parse_scope_body(
        &mut self,
        reader: &mut Reader<&[u8]>,
        scope: &QualifiedName,
        owner: Option<TypeId>,
        context: &str,
    ) -> Result<(), ParseError> {
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => self.parse_member(reader, e, scope, owner, context, true)?,
                Ok(Event::Empty(ref e)) => {
                    self.parse_member(reader, e, scope, owner, context, false)?
                }
                Ok(Event::End(_)) => break,
                Ok(Event::Eof) => {
                    return Err(ParseError::InvalidStructure {
                        message: format!("unexpected end of document inside '{context}'"),
                    });
                }
                Err(e) => return Err(ParseError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }

    /// Parses one child element of a scope.
    fn parse_member(
        &mut self,
        reader: &mut Reader<&[u8]>,
        e: &BytesStart<'_>,
        scope: &QualifiedName,
        owner: Option<TypeId>,
        context: &str,
        has_children: bool,
    ) -> Result<(), ParseError> {
        let tag = element_name(e)?;
        match tag.as_str() {
            "field" => {
                let owner = owner
                    .filter(|id| self.graph.get(*id).is_compound())
                    .ok_or_else(|| ParseError::unknown_element("field", context))?;
                self.parse_field(e, owner)?;
                if has_children {
                    skip_element(reader)?;
                }
            }
            "value" => {
                let owner = owner
                    .filter(|id| self.graph.get(*id).is_enum())
                    .ok_or_else(|| ParseError::unknown_element("value", context))?;
                self.parse_enum_value(e, owner)?;
                if has_children {
                    skip_element(reader)?;
                }
            }
            "struct" | "union" | "safeUnion" | "enum" | "typedef" | "interface" => {
                self.parse_declaration(reader, e, &tag, scope, owner, has_children)?;
            }
            other => return Err(ParseError::unknown_element(other, context)),
        }
        Ok(())
    }

    /// Parses a named type declaration.
    fn parse_declaration(
        &mut self,
        reader: &mut Reader<&[u8]>,
        e: &BytesStart<'_>,
        tag: &str,
        scope: &QualifiedName,
        parent: Option<TypeId>,
        has_children: bool,
    ) -> Result<(), ParseError> {
        let mut name = None;
        let mut doc = None;
        let mut storage = None;
        let mut target = None;
        for (key, value) in read_attributes(e)? {
            match key.as_str() {
                "name" => name = Some(value),
                "doc" => doc = Some(value),
                "storage" => {
                    storage = Some(
                        ScalarKind::from_idl_name(&value)
                            .ok_or_else(|| ParseError::invalid_attr(tag, "storage", &value))?,
                    )
                }
                "type" => target = Some(parse_type_expr(&value)?),
                _ => {}
            }
        }
        let name = name.ok_or_else(|| ParseError::missing_attr(tag, "name"))?;

        let kind = match tag {
            "struct" => NamedTypeKind::Compound(CompoundType::new(CompoundStyle::Struct)),
            "union" => NamedTypeKind::Compound(CompoundType::new(CompoundStyle::Union)),
            "safeUnion" => NamedTypeKind::Compound(CompoundType::new(CompoundStyle::SafeUnion)),
            "enum" => NamedTypeKind::Enum(EnumType {
                storage: storage.ok_or_else(|| ParseError::missing_attr(tag, "storage"))?,
                values: Vec::new(),
            }),
            // Placeholder until every named type is registered.
            "typedef" => NamedTypeKind::TypeAlias(Type::String),
            _ => NamedTypeKind::Interface,
        };

        let fq_name = scope.nested(name);
        let id = self.graph.add(fq_name.clone(), kind, parent)?;
        self.graph.get_mut(id).doc = doc;

        if tag == "typedef" {
            let type_expr = target.ok_or_else(|| ParseError::missing_attr(tag, "type"))?;
            self.aliases.push(PendingAlias {
                alias: id,
                type_expr,
            });
            if has_children {
                skip_element(reader)?;
            }
        } else if has_children {
            self.parse_scope_body(reader, &fq_name, Some(id), tag)?;
        }
        Ok(())
    }

    /// Parses a `field` element.
    fn parse_field(&mut self, e: &BytesStart<'_>, owner: TypeId) -> Result<(), ParseError> {
        let mut name = None;
        let mut type_expr = None;
        let mut doc = None;
        for (key, value) in read_attributes(e)? {
            match key.as_str() {
                "name" => name = Some(value),
                "type" => type_expr = Some(parse_type_expr(&value)?),
                "doc" => doc = Some(value),
                _ => {}
            }
        }
        self.fields.push(PendingField {
            owner,
            name: name.ok_or_else(|| ParseError::missing_attr("field", "name"))?,
            type_expr: type_expr.ok_or_else(|| ParseError::missing_attr("field", "type"))?,
            doc,
        });
        Ok(())
    }

    /// Parses an enum `value` element.
    fn parse_enum_value(&mut self, e: &BytesStart<'_>, owner: TypeId) -> Result<(), ParseError> {
        let mut name = None;
        let mut value = None;
        for (key, v) in read_attributes(e)? {
            match key.as_str() {
                "name" => name = Some(v),
                "value" => value = Some(v),
                _ => {}
            }
        }
        let name = name.ok_or_else(|| ParseError::missing_attr("value", "name"))?;
        let value = value.ok_or_else(|| ParseError::missing_attr("value", "value"))?;
        if let NamedTypeKind::Enum(enum_type) = &mut self.graph.get_mut(owner).kind {
            enum_type.values.push(EnumValue { name, value });
        }
        Ok(())
    }

    /// Resolves pending references and returns the finished graph.
    fn finish(mut self) -> Result<TypeGraph, ParseError> {
        for alias in std::mem::take(&mut self.aliases) {
            let fq_name = self.graph.get(alias.alias).fq_name().clone();
            let scope = match self.graph.get(alias.alias).parent() {
                Some(parent) => self.graph.get(parent).fq_name().clone(),
                None => fq_name.package_and_version(),
            };
            let ty = self.resolve(&alias.type_expr, &scope)?;
            self.graph.get_mut(alias.alias).kind = NamedTypeKind::TypeAlias(ty);
        }

        for pending in std::mem::take(&mut self.fields) {
            let scope = self.graph.get(pending.owner).fq_name().clone();
            let ty = self.resolve(&pending.type_expr, &scope)?;
            let mut field = Field::new(pending.name, ty);
            field.doc = pending.doc;
            self.graph.compound_mut(pending.owner)?.add_field(field);
        }

        Ok(self.graph)
    }

    /// Resolves a type expression as seen from `scope`.
    fn resolve(&self, expr: &TypeExpr, scope: &QualifiedName) -> Result<Type, ParseError> {
        Ok(match expr {
            TypeExpr::Scalar(kind) => Type::Scalar(*kind),
            TypeExpr::String => Type::String,
            TypeExpr::Handle => Type::Handle,
            TypeExpr::Memory => Type::Memory,
            TypeExpr::Vector(inner) => Type::Vector(Box::new(self.resolve(inner, scope)?)),
            TypeExpr::Array(element, dimensions) => Type::Array {
                element: Box::new(self.resolve(element, scope)?),
                dimensions: dimensions.clone(),
            },
            TypeExpr::Named(name) => Type::Named(self.lookup_name(name, scope)?),
        })
    }

    /// Looks a name up from the innermost scope outward.
    fn lookup_name(&self, name: &str, scope: &QualifiedName) -> Result<TypeId, ParseError> {
        if name.contains('@') {
            let fq_name = QualifiedName::parse(name)?;
            return self.graph.find(&fq_name).ok_or_else(|| ParseError::UnknownType {
                type_name: name.to_string(),
                scope: scope.to_string(),
            });
        }

        let relative: Vec<String> = name.split('.').map(str::to_string).collect();
        for depth in (0..=scope.names().len()).rev() {
            let mut names = scope.names()[..depth].to_vec();
            names.extend(relative.iter().cloned());
            let candidate = QualifiedName::new(scope.package(), scope.version(), names);
            if let Some(id) = self.graph.find(&candidate) {
                return Ok(id);
            }
        }

        Err(ParseError::UnknownType {
            type_name: name.to_string(),
            scope: scope.to_string(),
        })
    }
}

/// Returns the tag name of an element.
fn element_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(e.name().as_ref())?.to_string())
}

/// Reads and unescapes all attributes of an element.
fn read_attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, ParseError> {
    let element = element_name(e)?;
    let mut out = Vec::new();
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let raw = std::str::from_utf8(&attr.value)?;
        let value = quick_xml::escape::unescape(raw)
            .map_err(|_| ParseError::invalid_attr(&element, &key, raw))?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}

/// Consumes events up to and including the end tag of the current element.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}
