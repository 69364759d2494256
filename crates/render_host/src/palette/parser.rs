//! Palette document parser
//!
//! Inflates a `materials` document into named [`Material`] presets. Fields
//! absent from a `material` element keep their defaults; unrecognized child
//! elements are skipped silently. Malformed numeric text or malformed markup
//! fails the parse, leaving everything parsed up to that point in the output
//! map for the caller to keep or discard.

use std::collections::HashMap;

use thiserror::Error;

use super::material::Material;
use super::xml::{Attribute, MarkupError, XmlEvent, XmlReader};

/// Errors produced while parsing a palette document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// The document is not well-formed markup
    #[error(transparent)]
    Markup(#[from] MarkupError),

    /// An element's text is not a valid decimal value
    #[error("invalid number {text:?} in <{element}>")]
    Number {
        /// Element whose text failed to parse
        element: String,
        /// The offending text
        text: String,
    },
}

/// Palette document parser
pub struct PaletteParser;

impl PaletteParser {
    /// Parse a palette document into `materials`.
    ///
    /// Presets completed before a failure point stay in the map; the caller
    /// decides whether a partial palette is acceptable. A document whose
    /// root element is not `materials` declares nothing and parses cleanly.
    pub fn parse_into(
        source: &str,
        materials: &mut HashMap<String, Material>,
    ) -> Result<(), PaletteError> {
        let mut reader = XmlReader::new(source);

        let root = loop {
            match reader.next_event()? {
                XmlEvent::StartTag { name, .. } => break Some(name),
                XmlEvent::Eof => break None,
                _ => {}
            }
        };
        match root {
            Some(name) if name == "materials" => {}
            _ => return Ok(()),
        }

        loop {
            match reader.next_event()? {
                XmlEvent::StartTag { name, attributes } if name == "material" => {
                    Self::parse_material(&mut reader, &attributes, materials)?;
                }
                XmlEvent::StartTag { .. } => Self::skip_element(&mut reader)?,
                XmlEvent::EndTag { .. } | XmlEvent::Eof => break,
                XmlEvent::Text(_) => {}
            }
        }
        Ok(())
    }

    fn parse_material(
        reader: &mut XmlReader<'_>,
        attributes: &[Attribute],
        materials: &mut HashMap<String, Material>,
    ) -> Result<(), PaletteError> {
        let name = attributes
            .iter()
            .find(|a| a.name == "name")
            .map(|a| a.value.clone());

        let mut material = Material::default();
        loop {
            match reader.next_event()? {
                XmlEvent::StartTag { name: child, .. } => {
                    let text = Self::element_text(reader)?;
                    let text = text.trim();
                    match child.as_str() {
                        "albedo" => Self::apply_albedo(text, &mut material)?,
                        "metallic" if !text.is_empty() => {
                            material.metallic = Self::parse_float(&child, text)?;
                        }
                        "roughness" if !text.is_empty() => {
                            material.roughness = Self::parse_float(&child, text)?;
                        }
                        "clearCoat" if !text.is_empty() => {
                            material.clear_coat = Self::parse_float(&child, text)?;
                        }
                        // Unrecognized children are skipped silently
                        _ => {}
                    }
                }
                XmlEvent::EndTag { .. } | XmlEvent::Eof => break,
                XmlEvent::Text(_) => {}
            }
        }

        // A material with no name attribute cannot be selected; drop it.
        if let Some(name) = name {
            materials.insert(name, material);
        }
        Ok(())
    }

    /// Collect the character data of the element just opened, consuming
    /// events up to and including its end tag. Nested elements contribute
    /// no text.
    fn element_text(reader: &mut XmlReader<'_>) -> Result<String, PaletteError> {
        let mut text = String::new();
        let mut depth = 0usize;
        loop {
            match reader.next_event()? {
                XmlEvent::StartTag { .. } => depth += 1,
                XmlEvent::EndTag { .. } if depth > 0 => depth -= 1,
                XmlEvent::EndTag { .. } | XmlEvent::Eof => break,
                XmlEvent::Text(t) if depth == 0 => text.push_str(&t),
                XmlEvent::Text(_) => {}
            }
        }
        Ok(text)
    }

    /// Consume events until the element just opened is closed
    fn skip_element(reader: &mut XmlReader<'_>) -> Result<(), PaletteError> {
        let mut depth = 0usize;
        loop {
            match reader.next_event()? {
                XmlEvent::StartTag { .. } => depth += 1,
                XmlEvent::EndTag { .. } if depth > 0 => depth -= 1,
                XmlEvent::EndTag { .. } | XmlEvent::Eof => return Ok(()),
                XmlEvent::Text(_) => {}
            }
        }
    }

    /// Apply comma-separated RGB text to the albedo. Fewer than 3 fields
    /// leaves the albedo unchanged; extra fields are ignored.
    fn apply_albedo(text: &str, material: &mut Material) -> Result<(), PaletteError> {
        let channels: Vec<&str> = text.split(',').collect();
        if channels.len() >= 3 {
            material.albedo[0] = Self::parse_float("albedo", channels[0].trim())?;
            material.albedo[1] = Self::parse_float("albedo", channels[1].trim())?;
            material.albedo[2] = Self::parse_float("albedo", channels[2].trim())?;
        }
        Ok(())
    }

    fn parse_float(element: &str, text: &str) -> Result<f32, PaletteError> {
        text.parse::<f32>().map_err(|_| PaletteError::Number {
            element: element.to_string(),
            text: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    fn parse(source: &str) -> HashMap<String, Material> {
        let mut materials = HashMap::new();
        PaletteParser::parse_into(source, &mut materials).unwrap();
        materials
    }

    #[test]
    fn test_parse_full_material() {
        let materials = parse(
            r#"
<materials>
    <material name="Silver">
        <albedo>0.97, 0.96, 0.91</albedo>
        <metallic>1.0</metallic>
        <roughness>0.25</roughness>
        <clearCoat>0.1</clearCoat>
    </material>
</materials>
"#,
        );
        assert_eq!(materials.len(), 1);

        let silver = materials.get("Silver").unwrap();
        assert_relative_eq!(silver.metallic, 1.0);
        assert_relative_eq!(silver.roughness, 0.25);
        assert_relative_eq!(silver.clear_coat, 0.1);
        assert_relative_eq!(silver.albedo, Vec3::new(0.97, 0.96, 0.91));
    }

    #[test]
    fn test_absent_fields_keep_defaults() {
        let materials = parse(
            r#"
<materials>
    <material name="Plain">
        <roughness>0.4</roughness>
    </material>
</materials>
"#,
        );
        let plain = materials.get("Plain").unwrap();
        assert_relative_eq!(plain.metallic, 1.0);
        assert_relative_eq!(plain.roughness, 0.4);
        assert_relative_eq!(plain.clear_coat, 0.0);
        assert_eq!(plain.albedo, Vec3::zeros());
    }

    #[test]
    fn test_short_albedo_leaves_prior_value() {
        let materials = parse(
            r#"
<materials>
    <material name="Partial">
        <albedo>0.5, 0.5</albedo>
    </material>
</materials>
"#,
        );
        assert_eq!(materials.get("Partial").unwrap().albedo, Vec3::zeros());
    }

    #[test]
    fn test_unrecognized_children_skipped() {
        let materials = parse(
            r#"
<materials>
    <material name="Odd">
        <sheen>0.9</sheen>
        <metallic>0.2</metallic>
        <notes><line>hand tuned</line></notes>
    </material>
</materials>
"#,
        );
        let odd = materials.get("Odd").unwrap();
        assert_relative_eq!(odd.metallic, 0.2);
        assert_relative_eq!(odd.roughness, 0.7);
    }

    #[test]
    fn test_multiple_materials() {
        let materials = parse(
            r#"
<materials>
    <material name="Gold">
        <albedo>1.0, 0.77, 0.34</albedo>
    </material>
    <material name="Copper">
        <albedo>0.97, 0.74, 0.62</albedo>
    </material>
</materials>
"#,
        );
        assert_eq!(materials.len(), 2);
        assert_relative_eq!(
            materials.get("Gold").unwrap().albedo,
            Vec3::new(1.0, 0.77, 0.34)
        );
    }

    #[test]
    fn test_bad_number_fails_but_keeps_earlier_presets() {
        let mut materials = HashMap::new();
        let result = PaletteParser::parse_into(
            r#"
<materials>
    <material name="Good">
        <metallic>0.5</metallic>
    </material>
    <material name="Bad">
        <metallic>shiny</metallic>
    </material>
</materials>
"#,
            &mut materials,
        );
        assert!(matches!(result, Err(PaletteError::Number { .. })));
        assert!(materials.contains_key("Good"));
        assert!(!materials.contains_key("Bad"));
    }

    #[test]
    fn test_bad_albedo_number_is_format_error() {
        let mut materials = HashMap::new();
        let result = PaletteParser::parse_into(
            "<materials><material name=\"X\"><albedo>1.0, oops, 0.0</albedo></material></materials>",
            &mut materials,
        );
        assert!(matches!(result, Err(PaletteError::Number { .. })));
    }

    #[test]
    fn test_malformed_markup_is_markup_error() {
        let mut materials = HashMap::new();
        let result =
            PaletteParser::parse_into("<materials><material name=></material>", &mut materials);
        assert!(matches!(result, Err(PaletteError::Markup(_))));
    }

    #[test]
    fn test_non_materials_root_declares_nothing() {
        assert!(parse("<palette><material name=\"A\"/></palette>").is_empty());
    }

    #[test]
    fn test_self_closing_material_gets_defaults() {
        let materials = parse("<materials><material name=\"Bare\"/></materials>");
        assert_eq!(materials.get("Bare"), Some(&Material::default()));
    }

    #[test]
    fn test_unnamed_material_dropped() {
        let materials = parse("<materials><material><metallic>0.3</metallic></material></materials>");
        assert!(materials.is_empty());
    }
}
