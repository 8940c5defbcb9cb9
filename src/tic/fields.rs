//! # Field Descriptors
//!
//! Static description of the tags worth publishing: expected data length plus the metadata
//! consumers need to interpret the value. The built-in table covers the historic output of
//! single-phase multi-tariff meters ("compteur monophasé multitarif").

use serde::{Deserialize, Serialize};

/// Homie property datatypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomieDatatype {
    Integer,
    Float,
    Boolean,
    String,
    Enum,
    Color,
}

impl HomieDatatype {
    pub fn as_str(&self) -> &'static str {
        match self {
            HomieDatatype::Integer => "integer",
            HomieDatatype::Float => "float",
            HomieDatatype::Boolean => "boolean",
            HomieDatatype::String => "string",
            HomieDatatype::Enum => "enum",
            HomieDatatype::Color => "color",
        }
    }
}

impl std::fmt::Display for HomieDatatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Describes one known tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Tag as sent by the meter
    pub tag: String,
    /// Expected data length; longer data is truncated
    pub len: usize,
    /// Property id under which the value is published (lowercase tag when empty)
    #[serde(default)]
    pub prop_id: String,
    /// Friendly name
    pub name: String,
    pub datatype: HomieDatatype,
    #[serde(default)]
    pub unit: String,
    /// Valid payloads of an enum property
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl FieldDescriptor {
    pub fn new(
        tag: impl Into<String>,
        len: usize,
        name: impl Into<String>,
        datatype: HomieDatatype,
        unit: impl Into<String>,
    ) -> Self {
        let tag = tag.into();
        FieldDescriptor {
            prop_id: tag.to_lowercase(),
            tag,
            len,
            name: name.into(),
            datatype,
            unit: unit.into(),
            values: Vec::new(),
        }
    }

    /// Set the enumerated values (for `HomieDatatype::Enum`).
    pub fn with_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }
}

const VALUES_OPTARIF: [&str; 4] = [
    "BASE", // Option Base
    "HC..", // Option Heures Creuses
    "EJP.", // Option EJP
    "BBRx", // Option Tempo
];

const VALUES_PTEC: [&str; 11] = [
    "TH..", "HC..", "HP..", "HN..", "PM..", "HCJB", "HCJW", "HCJR", "HPJB", "HPJW", "HPJR",
];

const VALUES_DEMAIN: [&str; 4] = ["----", "BLEU", "BLAN", "ROUG"];

/// Tags of the historic single-phase multi-tariff output.
pub fn historic_single_phase_fields() -> Vec<FieldDescriptor> {
    use HomieDatatype::{Enum, Integer, String};

    vec![
        FieldDescriptor::new("ADCO", 12, "Adresse du compteur", String, ""),
        FieldDescriptor::new("OPTARIF", 4, "Option tarifaire choisie", Enum, "")
            .with_values(VALUES_OPTARIF),
        FieldDescriptor::new("ISOUSC", 2, "Intensité souscrite", Integer, "A"),
        FieldDescriptor::new("BASE", 9, "Index option base", Integer, "Wh"),
        FieldDescriptor::new("HCHC", 9, "Index option Heures Creuses: Heures Creuses", Integer, "Wh"),
        FieldDescriptor::new("HCHP", 9, "Index option Heures Creuses: Heures Pleines", Integer, "Wh"),
        FieldDescriptor::new("EJPHN", 9, "Index option EJP: Heures Normales", Integer, "Wh"),
        FieldDescriptor::new("EJPHPM", 9, "Index option EJP: Heures de Pointe Mobile", Integer, "Wh"),
        FieldDescriptor::new("BBRHCJB", 9, "Index option Tempo: Heures Creuses Jours Bleus", Integer, "Wh"),
        FieldDescriptor::new("BBRHPJB", 9, "Index option Tempo: Heures Pleines Jours Bleus", Integer, "Wh"),
        FieldDescriptor::new("BBRHCJW", 9, "Index option Tempo: Heures Creuses Jours Blancs", Integer, "Wh"),
        FieldDescriptor::new("BBRHPJW", 9, "Index option Tempo: Heures Pleines Jours Blancs", Integer, "Wh"),
        FieldDescriptor::new("BBRHCJR", 9, "Index option Tempo: Heures Creuses Jours Rouges", Integer, "Wh"),
        FieldDescriptor::new("BBRHPJR", 9, "Index option Tempo: Heures Pleines Jours Rouges", Integer, "Wh"),
        FieldDescriptor::new("PEJP", 2, "Préavis Début EJP (30 min)", Integer, "min"),
        FieldDescriptor::new("PTEC", 4, "Période tarifaire en cours", Enum, "")
            .with_values(VALUES_PTEC),
        FieldDescriptor::new("DEMAIN", 4, "Couleur du lendemain", Enum, "")
            .with_values(VALUES_DEMAIN),
        FieldDescriptor::new("IINST", 3, "Intensité instantanée", Integer, "A"),
        FieldDescriptor::new("ADPS", 3, "Avertissement de Dépassement de Puissance Souscrite", Integer, "A"),
        FieldDescriptor::new("IMAX", 3, "Intensité maximale", Integer, "A"),
        FieldDescriptor::new("PAPP", 5, "Puissance apparente", Integer, "VA"),
        FieldDescriptor::new("HHPHC", 1, "Horaire heures pleines / heures creuses", String, ""),
        FieldDescriptor::new("MOTDETAT", 6, "Mot d’état du compteur", String, ""),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_table_has_unique_tags() {
        let fields = historic_single_phase_fields();
        assert_eq!(fields.len(), 23);
        let tags: HashSet<_> = fields.iter().map(|f| f.tag.as_str()).collect();
        assert_eq!(tags.len(), fields.len());
    }

    #[test]
    fn test_enum_fields_carry_values() {
        for field in historic_single_phase_fields() {
            assert_eq!(
                field.datatype == HomieDatatype::Enum,
                !field.values.is_empty(),
                "{}",
                field.tag
            );
        }
    }

    #[test]
    fn test_prop_id_is_lowercase_tag() {
        let field = FieldDescriptor::new("MOTDETAT", 6, "Mot d’état", HomieDatatype::String, "");
        assert_eq!(field.prop_id, "motdetat");
    }
}
