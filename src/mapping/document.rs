//! Parsed mapping descriptions.
//!
//! A description is a list of class fragments. The same tree can be written
//! as XML (attributes on `<class>`/`<field>` elements) or as JSON; both parse
//! into a [`MappingDocument`] of plain data. Field type tags are kept as
//! written here and normalized when a fragment is resolved.

use crate::config::DescriptionFormat;
use crate::error::{PersistError, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;

const TAG_CLASS: &str = "class";
const TAG_FIELD: &str = "field";
const ATT_NAME: &str = "name";
const ATT_KEYCLASS: &str = "keyClass";
const ATT_INDEX: &str = "index";
const ATT_DOCFIELD: &str = "docfield";
const ATT_TYPE: &str = "type";
const ATT_SCALING_FACTOR: &str = "scalingFactor";

/// One declared logical field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFragment {
    /// Logical field name on the record.
    pub name: String,

    /// Physical field name in the backend.
    pub docfield: String,

    /// Physical type tag, case-insensitive.
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(
        rename = "scalingFactor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub scaling_factor: Option<i32>,
}

/// Mapping declared for one (key type, record type) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassFragment {
    /// Fully-qualified record type name.
    pub name: String,

    /// Fully-qualified key type name.
    #[serde(rename = "keyClass")]
    pub key_class: String,

    /// Physical container name, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldFragment>,
}

/// A parsed mapping description.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingDocument {
    pub classes: Vec<ClassFragment>,
}

impl MappingDocument {
    /// Read and parse a whole description from `input`.
    pub fn from_reader<R: Read>(mut input: R, format: DescriptionFormat) -> Result<Self> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        Self::parse(&text, format)
    }

    /// Parse a description held in memory.
    pub fn parse(text: &str, format: DescriptionFormat) -> Result<Self> {
        let trimmed = text.trim_start();
        if trimmed.is_empty() {
            return Err(PersistError::MappingSource(
                "mapping document is empty".into(),
            ));
        }

        match resolve_format(trimmed, format)? {
            DescriptionFormat::Json => Ok(serde_json::from_str(trimmed)?),
            _ => parse_xml(trimmed),
        }
    }

    /// First fragment declared for `(key_class, name)`, in document order.
    pub fn find_class(&self, key_class: &str, name: &str) -> Option<&ClassFragment> {
        self.classes
            .iter()
            .find(|class| class.key_class == key_class && class.name == name)
    }
}

fn resolve_format(text: &str, format: DescriptionFormat) -> Result<DescriptionFormat> {
    match format {
        DescriptionFormat::Auto => match text.as_bytes().first() {
            Some(b'<') => Ok(DescriptionFormat::Xml),
            Some(b'{') => Ok(DescriptionFormat::Json),
            _ => Err(PersistError::MappingSource(
                "unrecognized mapping description format".into(),
            )),
        },
        explicit => Ok(explicit),
    }
}

fn parse_xml(text: &str) -> Result<MappingDocument> {
    let document = roxmltree::Document::parse(text)?;
    let classes = document
        .root_element()
        .children()
        .filter(|node| node.has_tag_name(TAG_CLASS))
        .map(class_from_xml)
        .collect::<Result<Vec<_>>>()?;

    Ok(MappingDocument { classes })
}

fn class_from_xml(node: roxmltree::Node<'_, '_>) -> Result<ClassFragment> {
    let fields = node
        .children()
        .filter(|child| child.has_tag_name(TAG_FIELD))
        .map(field_from_xml)
        .collect::<Result<Vec<_>>>()?;

    Ok(ClassFragment {
        name: required_attribute(node, TAG_CLASS, ATT_NAME)?,
        key_class: required_attribute(node, TAG_CLASS, ATT_KEYCLASS)?,
        index: node.attribute(ATT_INDEX).map(str::to_string),
        fields,
    })
}

fn field_from_xml(node: roxmltree::Node<'_, '_>) -> Result<FieldFragment> {
    let scaling_factor = match node.attribute(ATT_SCALING_FACTOR) {
        Some(raw) => Some(raw.trim().parse::<i32>().map_err(|_| {
            PersistError::MappingSource(format!(
                "invalid {} '{}' on <{}> at {}",
                ATT_SCALING_FACTOR,
                raw,
                TAG_FIELD,
                position(node)
            ))
        })?),
        None => None,
    };

    Ok(FieldFragment {
        name: required_attribute(node, TAG_FIELD, ATT_NAME)?,
        docfield: required_attribute(node, TAG_FIELD, ATT_DOCFIELD)?,
        type_name: required_attribute(node, TAG_FIELD, ATT_TYPE)?,
        scaling_factor,
    })
}

fn required_attribute(node: roxmltree::Node<'_, '_>, tag: &str, name: &str) -> Result<String> {
    node.attribute(name).map(str::to_string).ok_or_else(|| {
        PersistError::MappingSource(format!(
            "<{}> at {} is missing attribute '{}'",
            tag,
            position(node),
            name
        ))
    })
}

fn position(node: roxmltree::Node<'_, '_>) -> String {
    let pos = node.document().text_pos_at(node.range().start);
    format!("{}:{}", pos.row, pos.col)
}
