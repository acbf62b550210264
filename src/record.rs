//! MARC record structures.
//!
//! - [`Record`] — leader plus fields in directory order
//! - [`Field`] — either a [`ControlField`] or a [`DataField`]
//! - [`Subfield`] — coded data element within a data field
//!
//! # Examples
//!
//! ```
//! use marc_stream::{DataField, Leader, Record};
//!
//! let mut record = Record::new(Leader::default());
//! record.add_control_field("001", "ocm12345");
//!
//! let mut title = DataField::new("245", '1', '0');
//! title.add_subfield('a', "The Great Gatsby");
//! record.add_field(title.into());
//!
//! assert_eq!(record.control_field("001"), Some("ocm12345"));
//! assert_eq!(record.fields().count(), 2);
//! ```

use crate::error::{MarcError, Result};
use crate::leader::Leader;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Byte that introduces each subfield code inside a data field.
pub const SUBFIELD_DELIMITER: u8 = 0x1F;

const SUBFIELD_DELIMITER_CHAR: char = SUBFIELD_DELIMITER as char;

/// Whether a tag designates a control field (no indicators, no subfields).
///
/// Control fields are the `00X` tags.
///
/// ```
/// use marc_stream::record::is_control_tag;
///
/// assert!(is_control_tag("001"));
/// assert!(is_control_tag("008"));
/// assert!(!is_control_tag("010"));
/// assert!(!is_control_tag("245"));
/// ```
#[must_use]
pub fn is_control_tag(tag: &str) -> bool {
    let bytes = tag.as_bytes();
    bytes.len() == 3 && bytes[0] == b'0' && bytes[1] == b'0' && bytes[2].is_ascii_digit()
}

/// A decoded MARC record.
///
/// Fields keep the order in which they were appended, which for decoded
/// records is directory order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record leader (24 bytes)
    pub leader: Leader,
    /// Variable fields in directory order
    pub fields: Vec<Field>,
}

/// A variable field: control field or data field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Field {
    /// Flat text value without subfields.
    Control(ControlField),
    /// Indicators plus coded subfields.
    Data(DataField),
}

/// A control field (tags 001-009).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlField {
    /// Field tag (3 characters)
    pub tag: String,
    /// Field value
    pub value: String,
}

/// A data field (tags 010 and higher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataField {
    /// Field tag (3 characters)
    pub tag: String,
    /// First indicator
    pub indicator1: char,
    /// Second indicator
    pub indicator2: char,
    /// Subfields (stored in `SmallVec` to avoid allocation for typical fields with 4 or fewer subfields)
    pub subfields: SmallVec<[Subfield; 4]>,
}

/// A subfield within a data field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subfield {
    /// Subfield code (single character)
    pub code: char,
    /// Subfield value
    pub value: String,
}

impl Record {
    /// Create an empty record with the given leader.
    #[must_use]
    pub fn new(leader: Leader) -> Self {
        Record {
            leader,
            fields: Vec::new(),
        }
    }

    /// Append a field after all existing fields.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Append a control field.
    pub fn add_control_field(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.add_field(Field::Control(ControlField {
            tag: tag.into(),
            value: value.into(),
        }));
    }

    /// Iterate over all fields in order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Iterate over fields with the given tag, in order.
    pub fn fields_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |f| f.tag() == tag)
    }

    /// Iterate over data fields only.
    pub fn data_fields(&self) -> impl Iterator<Item = &DataField> {
        self.fields.iter().filter_map(Field::as_data)
    }

    /// Value of the first control field with the given tag.
    #[must_use]
    pub fn control_field(&self, tag: &str) -> Option<&str> {
        self.fields
            .iter()
            .filter_map(Field::as_control)
            .find(|f| f.tag == tag)
            .map(|f| f.value.as_str())
    }

    /// First data field with the given tag.
    #[must_use]
    pub fn data_field(&self, tag: &str) -> Option<&DataField> {
        self.data_fields().find(|f| f.tag == tag)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Field {
    /// The field's tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Field::Control(f) => &f.tag,
            Field::Data(f) => &f.tag,
        }
    }

    /// The control field, if this is one.
    #[must_use]
    pub fn as_control(&self) -> Option<&ControlField> {
        match self {
            Field::Control(f) => Some(f),
            Field::Data(_) => None,
        }
    }

    /// The data field, if this is one.
    #[must_use]
    pub fn as_data(&self) -> Option<&DataField> {
        match self {
            Field::Data(f) => Some(f),
            Field::Control(_) => None,
        }
    }
}

impl From<ControlField> for Field {
    fn from(field: ControlField) -> Self {
        Field::Control(field)
    }
}

impl From<DataField> for Field {
    fn from(field: DataField) -> Self {
        Field::Data(field)
    }
}

impl DataField {
    /// Create a data field with no subfields.
    #[must_use]
    pub fn new(tag: impl Into<String>, indicator1: char, indicator2: char) -> Self {
        DataField {
            tag: tag.into(),
            indicator1,
            indicator2,
            subfields: SmallVec::new(),
        }
    }

    /// Parse a raw field value into indicators and subfields.
    ///
    /// The value is the text between the directory-located field start and its
    /// 0x1E terminator: two indicator characters followed by zero or more
    /// subfields, each introduced by 0x1F and a one-character code.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::InvalidField`] if the value is shorter than the two
    /// indicators, if text follows the indicators without a subfield delimiter,
    /// or if a delimiter is not followed by a subfield code.
    pub fn unmarshal(tag: impl Into<String>, value: &str) -> Result<Self> {
        let tag = tag.into();
        let mut chars = value.chars();
        let (Some(indicator1), Some(indicator2)) = (chars.next(), chars.next()) else {
            return Err(MarcError::InvalidField(format!(
                "Tag {tag}: data field too short (needs indicators)"
            )));
        };

        let mut field = DataField::new(tag, indicator1, indicator2);
        let rest = chars.as_str();
        if rest.is_empty() {
            return Ok(field);
        }

        let Some(body) = rest.strip_prefix(SUBFIELD_DELIMITER_CHAR) else {
            return Err(MarcError::InvalidField(format!(
                "Tag {}: expected subfield delimiter after indicators",
                field.tag
            )));
        };

        for segment in body.split(SUBFIELD_DELIMITER_CHAR) {
            let mut seg = segment.chars();
            let Some(code) = seg.next() else {
                return Err(MarcError::InvalidField(format!(
                    "Tag {}: subfield delimiter without a code",
                    field.tag
                )));
            };
            field.add_subfield(code, seg.as_str());
        }

        Ok(field)
    }

    /// Append a subfield.
    pub fn add_subfield(&mut self, code: char, value: impl Into<String>) {
        self.subfields.push(Subfield {
            code,
            value: value.into(),
        });
    }

    /// First value for a subfield code.
    #[must_use]
    pub fn subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// All values for a subfield code, in order.
    pub fn subfields_by_code(&self, code: char) -> impl Iterator<Item = &str> {
        self.subfields
            .iter()
            .filter(move |sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_tag_predicate() {
        for tag in ["000", "001", "005", "008", "009"] {
            assert!(is_control_tag(tag), "{tag}");
        }
        for tag in ["010", "100", "245", "LDR", "00", "0001", "00a"] {
            assert!(!is_control_tag(tag), "{tag}");
        }
    }

    #[test]
    fn test_fields_keep_insertion_order() {
        let mut record = Record::new(Leader::default());
        record.add_field(DataField::new("650", ' ', '0').into());
        record.add_control_field("001", "id");
        record.add_field(DataField::new("245", '1', '0').into());
        record.add_field(DataField::new("650", ' ', '7').into());

        let tags: Vec<&str> = record.fields().map(Field::tag).collect();
        assert_eq!(tags, vec!["650", "001", "245", "650"]);
        assert_eq!(record.fields_by_tag("650").count(), 2);
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_control_field_lookup() {
        let mut record = Record::new(Leader::default());
        assert!(record.is_empty());
        record.add_control_field("001", "12345");
        record.add_control_field("003", "DLC");

        assert_eq!(record.control_field("001"), Some("12345"));
        assert_eq!(record.control_field("003"), Some("DLC"));
        assert_eq!(record.control_field("005"), None);
        assert!(record.data_field("001").is_none());
    }

    #[test]
    fn test_unmarshal_subfields() {
        let field =
            DataField::unmarshal("245", "10\x1faThe Great Gatsby /\x1fcF. Scott Fitzgerald.")
                .unwrap();

        assert_eq!(field.tag, "245");
        assert_eq!(field.indicator1, '1');
        assert_eq!(field.indicator2, '0');
        assert_eq!(field.subfields.len(), 2);
        assert_eq!(field.subfield('a'), Some("The Great Gatsby /"));
        assert_eq!(field.subfield('c'), Some("F. Scott Fitzgerald."));
    }

    #[test]
    fn test_unmarshal_repeated_codes_keep_order() {
        let field = DataField::unmarshal("650", " 0\x1faNovels\x1fxAmerican\x1fxFiction").unwrap();
        let values: Vec<&str> = field.subfields_by_code('x').collect();
        assert_eq!(values, vec!["American", "Fiction"]);
    }

    #[test]
    fn test_unmarshal_empty_subfield_value() {
        let field = DataField::unmarshal("500", "  \x1fa").unwrap();
        assert_eq!(field.subfield('a'), Some(""));
    }

    #[test]
    fn test_unmarshal_indicators_only() {
        let field = DataField::unmarshal("856", "40").unwrap();
        assert!(field.subfields.is_empty());
    }

    #[test]
    fn test_unmarshal_multibyte_indicator_text() {
        let field = DataField::unmarshal("880", "10\x1faТолстой").unwrap();
        assert_eq!(field.subfield('a'), Some("Толстой"));
    }

    #[test]
    fn test_unmarshal_too_short() {
        let err = DataField::unmarshal("245", "1").unwrap_err();
        assert!(matches!(err, MarcError::InvalidField(_)));
    }

    #[test]
    fn test_unmarshal_missing_delimiter() {
        let err = DataField::unmarshal("245", "10Title without delimiter").unwrap_err();
        assert!(err.to_string().contains("expected subfield delimiter"), "got: {err}");
    }

    #[test]
    fn test_unmarshal_delimiter_without_code() {
        assert!(DataField::unmarshal("245", "10\x1faTitle\x1f").is_err());
        assert!(DataField::unmarshal("245", "10\x1f\x1faTitle").is_err());
    }

    #[test]
    fn test_field_accessors() {
        let control: Field = ControlField {
            tag: "001".to_string(),
            value: "x".to_string(),
        }
        .into();
        assert_eq!(control.tag(), "001");
        assert!(control.as_control().is_some());
        assert!(control.as_data().is_none());

        let data: Field = DataField::new("245", '0', '0').into();
        assert!(data.as_data().is_some());
        assert!(data.as_control().is_none());
    }
}
