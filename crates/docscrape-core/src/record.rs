//! The flat, fixed-shape result of processing one product number.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::{CoreError, Pzn};

/// A column of the export table.
///
/// Declaration order is the export column order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Field {
    Pzn,
    Name,
    Brand,
    Price,
    ActiveIngredients,
    Dosage,
    Manufacturer,
    ManufacturerAddress,
    Indications,
    Usage,
    PatientNotes,
    SideEffects,
    Contraindications,
    Interactions,
    Warnings,
    Excipients,
    Breastfeeding,
    Description,
    ImageUrl,
    Link,
    Error,
}

impl Field {
    pub const ALL: [Field; 21] = [
        Field::Pzn,
        Field::Name,
        Field::Brand,
        Field::Price,
        Field::ActiveIngredients,
        Field::Dosage,
        Field::Manufacturer,
        Field::ManufacturerAddress,
        Field::Indications,
        Field::Usage,
        Field::PatientNotes,
        Field::SideEffects,
        Field::Contraindications,
        Field::Interactions,
        Field::Warnings,
        Field::Excipients,
        Field::Breastfeeding,
        Field::Description,
        Field::ImageUrl,
        Field::Link,
        Field::Error,
    ];

    /// Column header used in exports.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Field::Pzn => "PZN",
            Field::Name => "Name",
            Field::Brand => "Marke",
            Field::Price => "Preis",
            Field::ActiveIngredients => "Wirkstoffe",
            Field::Dosage => "Dosierung",
            Field::Manufacturer => "Hersteller",
            Field::ManufacturerAddress => "Hersteller-Adresse",
            Field::Indications => "Anwendungsgebiete",
            Field::Usage => "Anwendung",
            Field::PatientNotes => "Patientenhinweise",
            Field::SideEffects => "Nebenwirkungen",
            Field::Contraindications => "Gegenanzeigen",
            Field::Interactions => "Wechselwirkungen",
            Field::Warnings => "Warnhinweise",
            Field::Excipients => "Hilfsstoffe",
            Field::Breastfeeding => "Stillzeit",
            Field::Description => "Beschreibung",
            Field::ImageUrl => "Bild-URL",
            Field::Link => "Link",
            Field::Error => "Fehler",
        }
    }

    /// Looks up a field by its export header.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownField`] for headers that no field uses.
    pub fn from_header(header: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|f| f.header() == header)
            .ok_or_else(|| CoreError::UnknownField(header.to_owned()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Placeholder stored for a field that extraction could not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sentinel {
    /// `"n.a."`
    #[default]
    NotAvailable,
    /// `""`
    Empty,
}

impl Sentinel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentinel::NotAvailable => "n.a.",
            Sentinel::Empty => "",
        }
    }

    #[must_use]
    pub fn is_sentinel(self, value: &str) -> bool {
        value == self.as_str()
    }
}

impl FromStr for Sentinel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "n.a." | "na" | "n/a" => Ok(Sentinel::NotAvailable),
            "" | "empty" => Ok(Sentinel::Empty),
            other => Err(format!("expected \"n.a.\" or \"empty\", got {other:?}")),
        }
    }
}

/// Marker written to the name column of a degraded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMarker {
    NotFound,
    Blocked,
    /// Transport failure; the message goes to [`Field::Error`].
    Error,
    /// Any other non-200 status.
    HttpStatus(u16),
}

impl fmt::Display for StatusMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMarker::NotFound => f.write_str("❌ Not found"),
            StatusMarker::Blocked => f.write_str("⛔ Blocked (WAF active)"),
            StatusMarker::Error => f.write_str("Error"),
            StatusMarker::HttpStatus(code) => write!(f, "Error {code}"),
        }
    }
}

impl StatusMarker {
    /// Recognizes a rendered marker, e.g. the name cell of a row read back
    /// from an export.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "❌ Not found" => Some(StatusMarker::NotFound),
            "⛔ Blocked (WAF active)" => Some(StatusMarker::Blocked),
            "Error" => Some(StatusMarker::Error),
            other => other
                .strip_prefix("Error ")
                .and_then(|code| code.parse().ok())
                .map(StatusMarker::HttpStatus),
        }
    }
}

/// One row of the result table.
///
/// Only the fields a record actually carries are present: a degraded record
/// has no brand or price entry at all, while a successful record stores the
/// sentinel for anything extraction could not find.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    fields: BTreeMap<Field, String>,
}

impl Record {
    #[must_use]
    pub fn builder(pzn: &Pzn, link: &str) -> RecordBuilder {
        let mut fields = BTreeMap::new();
        fields.insert(Field::Pzn, pzn.to_string());
        fields.insert(Field::Link, link.to_owned());
        RecordBuilder { fields }
    }

    /// A record that carries only the product number, a status marker and
    /// the link.
    #[must_use]
    pub fn degraded(pzn: &Pzn, marker: StatusMarker, link: &str) -> Self {
        Self::builder(pzn, link)
            .field(Field::Name, marker.to_string())
            .build()
    }

    /// Rebuilds a record from `(field, value)` pairs, e.g. a parsed CSV row.
    /// Later duplicates overwrite earlier ones.
    #[must_use]
    pub fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (Field, String)>,
    {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    #[must_use]
    pub fn pzn(&self) -> Option<&str> {
        self.get(Field::Pzn)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get(Field::Name)
    }

    /// Present fields in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.fields.iter().map(|(f, v)| (*f, v.as_str()))
    }
}

/// Collects fields for a [`Record`]; the record itself is immutable.
#[derive(Debug)]
pub struct RecordBuilder {
    fields: BTreeMap<Field, String>,
}

impl RecordBuilder {
    #[must_use]
    pub fn field(mut self, field: Field, value: impl Into<String>) -> Self {
        self.fields.insert(field, value.into());
        self
    }

    #[must_use]
    pub fn build(self) -> Record {
        Record {
            fields: self.fields,
        }
    }
}
