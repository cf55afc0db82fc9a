//! Routing of stored documents to the item type that can parse them.
//!
//! The record store hands back a type id alongside each document. [`ItemRegistry`] maps that id
//! (or, when no id is known, the root element name) to a parser producing an [`AnyItem`].

use crate::items::{
    CarePlan, Directive, ExplanationOfBenefits, Height, Medication, RecordItem, Weight,
};
use hrv_xml::{parse_document, XmlError, XmlResult, XmlWriter};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use uuid::Uuid;

/// Any record item this crate can parse.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "item")]
pub enum AnyItem {
    Height(Height),
    Weight(Weight),
    Medication(Medication),
    Directive(Directive),
    CarePlan(CarePlan),
    ExplanationOfBenefits(ExplanationOfBenefits),
}

macro_rules! any_item {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for AnyItem {
                fn from(item: $variant) -> Self {
                    AnyItem::$variant(item)
                }
            }
        )*

        impl AnyItem {
            pub fn type_id(&self) -> Uuid {
                match self {
                    $(AnyItem::$variant(_) => $variant::TYPE_ID,)*
                }
            }

            pub fn type_name(&self) -> &'static str {
                match self {
                    $(AnyItem::$variant(_) => $variant::TYPE_NAME,)*
                }
            }

            pub fn validate(&self) -> XmlResult<()> {
                match self {
                    $(AnyItem::$variant(item) => item.validate(),)*
                }
            }

            pub fn to_xml_string(&self) -> XmlResult<String> {
                match self {
                    $(AnyItem::$variant(item) => item.to_xml_string(),)*
                }
            }

            /// Write the item as its root element to an existing writer.
            pub fn write_document<W: Write>(&self, writer: &mut XmlWriter<W>) -> XmlResult<()> {
                match self {
                    $(AnyItem::$variant(item) => item.write_document(writer),)*
                }
            }
        }

        impl fmt::Display for AnyItem {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(AnyItem::$variant(item) => write!(f, "{item}"),)*
                }
            }
        }

        fn builtin_types() -> Vec<ItemType> {
            vec![$(ItemType::of::<$variant>(),)*]
        }
    };
}

any_item!(
    Height,
    Weight,
    Medication,
    Directive,
    CarePlan,
    ExplanationOfBenefits,
);

fn parse_as<T: RecordItem + Into<AnyItem>>(xml: &str) -> XmlResult<AnyItem> {
    T::from_xml_str(xml).map(Into::into)
}

/// A registered item type and its parser.
#[derive(Clone, Copy)]
pub struct ItemType {
    pub type_id: Uuid,
    pub name: &'static str,
    pub root_element: &'static str,
    parse: fn(&str) -> XmlResult<AnyItem>,
}

impl ItemType {
    fn of<T: RecordItem + Into<AnyItem>>() -> Self {
        Self {
            type_id: T::TYPE_ID,
            name: T::TYPE_NAME,
            root_element: T::ROOT_ELEMENT,
            parse: parse_as::<T>,
        }
    }

    /// Parse `xml` as this type.
    pub fn parse(&self, xml: &str) -> XmlResult<AnyItem> {
        (self.parse)(xml)
    }
}

impl fmt::Debug for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemType")
            .field("type_id", &self.type_id)
            .field("name", &self.name)
            .field("root_element", &self.root_element)
            .finish()
    }
}

/// Every item type this crate implements. It only routes; it holds no records.
#[derive(Debug)]
pub struct ItemRegistry {
    types: Vec<ItemType>,
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self {
            types: builtin_types(),
        }
    }

    pub fn types(&self) -> &[ItemType] {
        &self.types
    }

    pub fn by_type_id(&self, type_id: Uuid) -> Option<&ItemType> {
        self.types.iter().find(|t| t.type_id == type_id)
    }

    pub fn by_root(&self, root_element: &str) -> Option<&ItemType> {
        self.types.iter().find(|t| t.root_element == root_element)
    }

    /// Parse `xml` as the item type registered under `type_id`.
    ///
    /// # Errors
    ///
    /// [`XmlError::UnknownType`] if no type is registered under `type_id`; otherwise whatever
    /// the item's parser reports.
    pub fn parse(&self, type_id: Uuid, xml: &str) -> XmlResult<AnyItem> {
        let item_type = self
            .by_type_id(type_id)
            .ok_or_else(|| XmlError::UnknownType(type_id.to_string()))?;
        tracing::debug!(%type_id, name = item_type.name, "dispatching by type id");
        item_type.parse(xml)
    }

    /// Parse `xml` by matching its root element, or the first child of a wrapper element,
    /// against the registered root names.
    pub fn parse_detect(&self, xml: &str) -> XmlResult<AnyItem> {
        let document = parse_document(xml)?;
        let root = document.root_element();
        let candidates = std::iter::once(root).chain(root.children().filter(|n| n.is_element()));

        for node in candidates {
            let name = node.tag_name().name();
            if let Some(item_type) = self.by_root(name) {
                tracing::debug!(root = name, name = item_type.name, "dispatching by root element");
                return item_type.parse(xml);
            }
        }
        Err(XmlError::UnknownType(format!(
            "no item type is rooted at <{}>",
            root.tag_name().name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHT_XML: &str = "<height><when><date><y>2020</y><m>3</m><d>5</d></date></when>\
                              <value><m>1.83</m></value></height>";

    #[test]
    fn every_type_is_registered_once() {
        let registry = ItemRegistry::new();
        assert_eq!(registry.types().len(), 6);
        for item_type in registry.types() {
            assert_eq!(
                registry.by_type_id(item_type.type_id).unwrap().name,
                item_type.name
            );
            assert_eq!(
                registry.by_root(item_type.root_element).unwrap().type_id,
                item_type.type_id
            );
        }
    }

    #[test]
    fn parses_by_type_id() {
        let registry = ItemRegistry::new();
        let item = registry.parse(Height::TYPE_ID, HEIGHT_XML).unwrap();
        assert!(matches!(item, AnyItem::Height(ref h) if h.value.as_ref().unwrap().meters() == 1.83));
        assert_eq!(item.type_name(), "Height");
        assert_eq!(item.to_xml_string().unwrap(), HEIGHT_XML);
    }

    #[test]
    fn wrong_type_id_reports_the_missing_root() {
        let registry = ItemRegistry::new();
        let err = registry.parse(Weight::TYPE_ID, HEIGHT_XML).expect_err("should fail");
        assert!(matches!(err, XmlError::Structure { ref element, .. } if element == "weight"));
    }

    #[test]
    fn unknown_type_id_is_reported() {
        let registry = ItemRegistry::new();
        let err = registry.parse(Uuid::nil(), HEIGHT_XML).expect_err("should fail");
        assert!(matches!(err, XmlError::UnknownType(_)));
    }

    #[test]
    fn detects_the_type_inside_a_wrapper() {
        let registry = ItemRegistry::new();
        let wrapped = format!("<thing><data-xml>{HEIGHT_XML}</data-xml></thing>");
        assert!(matches!(
            registry.parse_detect(&wrapped),
            Err(XmlError::UnknownType(_))
        ));

        let wrapped = format!("<data-xml>{HEIGHT_XML}</data-xml>");
        let item = registry.parse_detect(&wrapped).unwrap();
        assert_eq!(item.type_id(), Height::TYPE_ID);
    }

    #[test]
    fn serialises_to_tagged_json() {
        let item = ItemRegistry::new().parse_detect(HEIGHT_XML).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "Height");
        assert_eq!(json["item"]["value"]["value"], 1.83);
        assert_eq!(json["item"]["when"]["date"]["year"], 2020);
    }
}
