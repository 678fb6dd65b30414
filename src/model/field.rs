//! Field configuration: which inputs the trip form shows, grouped in sections.

use serde::Deserialize;

/// Key of the server-assigned trip identifier. Shown read-only, never submitted.
pub const TRIP_ID_KEY: &str = "TripId";

/// Key of the trip → route relation.
pub const ROUTE_KEY: &str = "TripRoute";

static BUILTIN_FIELDS: &str = include_str!("../../assets/trip_fields.toml");

/// Declared input type of a free-form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Number,
    Email,
    Tel,
    Time,
    Url,
}

impl InputType {
    /// Maps a configuration type name to an input type. Unknown names fall back to text.
    fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "number" => Self::Number,
            "email" => Self::Email,
            "tel" => Self::Tel,
            "time" => Self::Time,
            "url" => Self::Url,
            _ => Self::Text,
        }
    }
}

/// The `type` tag of a configured field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FieldType {
    Date,
    Boolean,
    Input(InputType),
}

impl Default for FieldType {
    fn default() -> Self {
        Self::Input(InputType::Text)
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "date" => Self::Date,
            "boolean" => Self::Boolean,
            other => Self::Input(InputType::from_name(other)),
        }
    }
}

/// One input on the form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldSpec {
    /// Form data key (also the JSON property name sent to the server).
    pub key: String,
    /// Display label.
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Marked with `*` in the label; not enforced.
    #[serde(default)]
    pub required: bool,
}

impl FieldSpec {
    /// Label as rendered in the form, e.g. `Trip Name*:`.
    pub fn display_label(&self) -> String {
        let marker = if self.required { "*" } else { "" };
        format!("{}{marker}:", self.label)
    }

    /// Picks the widget used to edit this field.
    pub fn widget(&self) -> FieldWidget {
        FieldWidget::for_field(self)
    }
}

/// A named group of fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldSection {
    pub name: String,
    #[serde(rename = "field", default)]
    pub fields: Vec<FieldSpec>,
}

/// The full, ordered field layout of the trip form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldConfig {
    #[serde(rename = "section", default)]
    sections: Vec<FieldSection>,
}

impl FieldConfig {
    /// The layout compiled into the binary.
    pub fn builtin() -> Self {
        Self::from_toml(BUILTIN_FIELDS).expect("valid embedded field configuration")
    }

    /// Parses a layout from TOML (`[[section]]` tables with `[[section.field]]` entries).
    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Returns the sections in display order.
    pub fn sections(&self) -> &[FieldSection] {
        &self.sections
    }

    /// Iterates every field across all sections, in display order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    /// Total number of fields.
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.fields.len()).sum()
    }

    /// Returns `true` if no fields are configured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the field at a flat index.
    pub fn field(&self, index: usize) -> Option<&FieldSpec> {
        self.fields().nth(index)
    }
}

/// Editor chosen for a field, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidget {
    /// Static text; the value is never edited on this form.
    ReadOnly,
    /// Searchable route selector storing a `RouteId`.
    RouteSelect,
    /// Calendar picker storing a timestamp string.
    DatePicker,
    /// Checkbox storing a boolean.
    Checkbox,
    /// Text input gated by the input type's validity check.
    TextInput(InputType),
}

impl FieldWidget {
    /// Identity-based rules win over the declared type.
    pub fn for_field(spec: &FieldSpec) -> Self {
        if spec.key == TRIP_ID_KEY {
            return Self::ReadOnly;
        }
        if spec.key == ROUTE_KEY {
            return Self::RouteSelect;
        }
        match spec.field_type {
            FieldType::Date => Self::DatePicker,
            FieldType::Boolean => Self::Checkbox,
            FieldType::Input(input) => Self::TextInput(input),
        }
    }
}
