//! Structural schema of character documents
//!
//! Checked before any field is extracted, so a malformed document never
//! reaches the catalogs.

use chrono::NaiveDate;

use crate::application::ports::outbound::EntityStorageError;
use crate::domain::value_objects::{CharacterId, Sex};
use crate::infrastructure::xml::XmlElement;

pub(crate) const ROOT: &str = "character";
pub(crate) const ENTRY: &str = "entry";
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Allowed content of one top-level element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Content {
    /// Free text, possibly empty
    Text,
    /// Non-empty catalog key or free-text nature
    Key,
    Integer,
    /// `yyyy-MM-dd` or nil-marked
    Date,
    /// `<entry key="..">n</entry>` children
    ValuedEntries,
    /// `<entry key=".."/>` children
    KeyEntries,
    /// `key` attribute with a numeric body
    Road,
    Sex,
}

/// Every element of a character document, in document order
pub(crate) const ELEMENTS: &[(&str, Content)] = &[
    ("name", Content::Key),
    ("clan", Content::Key),
    ("generation", Content::Integer),
    ("chronicle", Content::Text),
    ("experience", Content::Integer),
    ("nature", Content::Key),
    ("hideout", Content::Text),
    ("player", Content::Text),
    ("demeanor", Content::Key),
    ("concept", Content::Key),
    ("sire", Content::Text),
    ("sect", Content::Text),
    ("attributes", Content::ValuedEntries),
    ("abilities", Content::ValuedEntries),
    ("advantages", Content::ValuedEntries),
    ("merits", Content::KeyEntries),
    ("flaws", Content::KeyEntries),
    ("road", Content::Road),
    ("willpower", Content::Integer),
    ("usedWillpower", Content::Integer),
    ("bloodPool", Content::Integer),
    ("age", Content::Integer),
    ("apparentAge", Content::Integer),
    ("dayOfBirth", Content::Date),
    ("dayOfDeath", Content::Date),
    ("hairColor", Content::Text),
    ("eyeColor", Content::Text),
    ("skinColor", Content::Text),
    ("nationality", Content::Text),
    ("height", Content::Integer),
    ("weight", Content::Integer),
    ("sex", Content::Sex),
    ("story", Content::Text),
    ("description", Content::Text),
];

/// The root `id` attribute as a character id
pub(crate) fn identity(root: &XmlElement) -> Result<CharacterId, EntityStorageError> {
    let raw = root
        .attribute("id")
        .ok_or_else(|| EntityStorageError::MissingIdentity("root has no 'id' attribute".into()))?;
    raw.parse::<CharacterId>().map_err(|e| {
        EntityStorageError::MissingIdentity(format!("'{}' is not a UUID: {}", raw, e))
    })
}

/// Collect every structural violation of the document
pub(crate) fn validate(root: &XmlElement) -> Result<(), EntityStorageError> {
    let mut violations = Vec::new();

    if root.name != ROOT {
        violations.push(format!("root element is <{}>, expected <{}>", root.name, ROOT));
    }
    if !root.text().is_empty() {
        violations.push("root element contains stray text".to_string());
    }

    let mut cursor = 0;
    for child in &root.children {
        let Some(position) = ELEMENTS.iter().position(|(name, _)| *name == child.name) else {
            violations.push(format!("unexpected element <{}>", child.name));
            continue;
        };
        if position < cursor {
            violations.push(format!("element <{}> is out of order or repeated", child.name));
            continue;
        }
        for (missing, _) in &ELEMENTS[cursor..position] {
            violations.push(format!("missing element <{}>", missing));
        }
        cursor = position + 1;

        if let Err(reason) = check_content(child, ELEMENTS[position].1) {
            violations.push(format!("<{}>: {}", child.name, reason));
        }
    }
    for (missing, _) in &ELEMENTS[cursor..] {
        violations.push(format!("missing element <{}>", missing));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(EntityStorageError::Schema { violations })
    }
}

fn check_content(element: &XmlElement, content: Content) -> Result<(), String> {
    let nested = matches!(content, Content::ValuedEntries | Content::KeyEntries);
    if !nested && !element.children.is_empty() {
        return Err("must not contain child elements".into());
    }

    match content {
        Content::Text => Ok(()),
        Content::Key => non_empty(element.text()),
        Content::Integer => integer(element.text()),
        Content::Date => {
            if element.is_nil() {
                Ok(())
            } else {
                NaiveDate::parse_from_str(element.text(), DATE_FORMAT)
                    .map(|_| ())
                    .map_err(|_| format!("'{}' is not a yyyy-MM-dd date", element.text()))
            }
        }
        Content::ValuedEntries => entries(element, |entry| integer(entry.text())),
        Content::KeyEntries => entries(element, |entry| {
            if entry.text().is_empty() {
                Ok(())
            } else {
                Err("key entries carry no value".into())
            }
        }),
        Content::Road => {
            non_empty(element.attribute("key").unwrap_or_default())
                .map_err(|_| "road has no key".to_string())?;
            integer(element.text())
        }
        Content::Sex => element.text().parse::<Sex>().map(|_| ()).map_err(|e| e.to_string()),
    }
}

fn entries<F>(block: &XmlElement, check: F) -> Result<(), String>
where
    F: Fn(&XmlElement) -> Result<(), String>,
{
    if !block.text().is_empty() {
        return Err("contains stray text".into());
    }
    for entry in &block.children {
        if entry.name != ENTRY {
            return Err(format!("unexpected <{}>, expected <{}>", entry.name, ENTRY));
        }
        let key = entry.attribute("key").unwrap_or_default();
        if key.trim().is_empty() {
            return Err("entry without key".into());
        }
        check(entry).map_err(|reason| format!("entry '{}': {}", key, reason))?;
    }
    Ok(())
}

fn non_empty(text: &str) -> Result<(), String> {
    if text.trim().is_empty() {
        Err("must not be empty".into())
    } else {
        Ok(())
    }
}

fn integer(text: &str) -> Result<(), String> {
    text.parse::<i32>()
        .map(|_| ())
        .map_err(|_| format!("'{}' is not an integer", text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::xml;

    fn minimal_document() -> XmlElement {
        let mut root = XmlElement::new(ROOT).with_attribute("id", CharacterId::new().to_string());
        for (name, content) in ELEMENTS {
            let element = match content {
                Content::Text => XmlElement::new(*name),
                Content::Key => XmlElement::new(*name).with_text("x"),
                Content::Integer => XmlElement::new(*name).with_text("1"),
                Content::Date => XmlElement::new(*name).with_attribute("xsi:nil", "true"),
                Content::ValuedEntries => XmlElement::new(*name)
                    .with_child(XmlElement::new(ENTRY).with_attribute("key", "k").with_text("2")),
                Content::KeyEntries => XmlElement::new(*name),
                Content::Road => XmlElement::new(*name).with_attribute("key", "humanity").with_text("7"),
                Content::Sex => XmlElement::new(*name).with_text("female"),
            };
            root.children.push(element);
        }
        root
    }

    fn violations(root: &XmlElement) -> Vec<String> {
        match validate(root) {
            Err(EntityStorageError::Schema { violations }) => violations,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(()) => Vec::new(),
        }
    }

    #[test]
    fn test_complete_document_passes() {
        assert!(validate(&minimal_document()).is_ok());
    }

    #[test]
    fn test_identity_must_be_a_uuid() {
        let root = xml::parse("<character/>").unwrap();
        assert!(matches!(identity(&root), Err(EntityStorageError::MissingIdentity(_))));

        let root = xml::parse(r#"<character id="42"/>"#).unwrap();
        assert!(matches!(identity(&root), Err(EntityStorageError::MissingIdentity(_))));

        let id = CharacterId::new();
        let root = XmlElement::new(ROOT).with_attribute("id", id.to_string());
        assert_eq!(identity(&root).unwrap(), id);
    }

    #[test]
    fn test_missing_and_unexpected_elements_are_all_reported() {
        let mut root = minimal_document();
        root.children.retain(|c| c.name != "concept" && c.name != "sex");
        root.children.push(XmlElement::new("haven"));

        let found = violations(&root);
        assert!(found.contains(&"missing element <concept>".to_string()));
        assert!(found.contains(&"missing element <sex>".to_string()));
        assert!(found.contains(&"unexpected element <haven>".to_string()));
    }

    #[test]
    fn test_out_of_order_element() {
        let mut root = minimal_document();
        let name = root.children.remove(0);
        root.children.push(name);

        let found = violations(&root);
        assert!(found.iter().any(|v| v.contains("<name> is out of order")));
    }

    #[test]
    fn test_bad_content() {
        let mut root = minimal_document();
        for child in &mut root.children {
            match child.name.as_str() {
                "experience" => child.text = "lots".into(),
                "dayOfBirth" => {
                    child.attributes.clear();
                    child.text = "01.02.1900".into();
                }
                "attributes" => child.children[0].text = "two".into(),
                "sex" => child.text = "unknown".into(),
                _ => {}
            }
        }

        let found = violations(&root);
        assert_eq!(found.len(), 4, "{:?}", found);
        assert!(found.iter().any(|v| v.starts_with("<attributes>: entry 'k'")));
    }

    #[test]
    fn test_wrong_root_name() {
        let mut root = minimal_document();
        root.name = "npc".into();
        assert!(violations(&root)[0].contains("<npc>"));
    }
}
