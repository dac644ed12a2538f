//! Generic record model produced by the save-archive decoder.
//!
//! A decoded save is a tree of loosely-typed records: each [`Record`]
//! carries a class name, a flat property bag and a list of named
//! components. Property values are a tagged [`Value`] whose shape is only
//! known at read time. Some struct values nest whole archives (a
//! [`Container`] of actors, or a blob [`Archive`]), which is how a save is
//! organized as containers within containers.
//!
//! Nothing here interprets the data. Interpretation (and the errors for
//! unexpected shapes) lives in `refinder-core`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A property bag keyed by property name.
pub type Properties = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// One decoded property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Signed 32-bit integer (`IntProperty`).
    Int32(i32),
    /// Unsigned 64-bit integer (`UInt64Property`).
    UInt64(u64),
    /// Boolean (`BoolProperty`).
    Bool(bool),
    /// Plain string, name or soft object path.
    String(String),
    /// Localizable text (`TextProperty`).
    Text(TextValue),
    /// Enum value (`EnumProperty`).
    Enum(EnumValue),
    /// Reference to a class or object (`ObjectProperty`).
    Object(ObjectRef),
    /// Struct value; may nest a whole archive.
    Struct(StructValue),
    /// Array whose elements are struct values (`ArrayProperty` of structs).
    ArrayOfStruct(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in parse error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Int32(_) => "Int32",
            Self::UInt64(_) => "UInt64",
            Self::Bool(_) => "Bool",
            Self::String(_) => "String",
            Self::Text(_) => "Text",
            Self::Enum(_) => "Enum",
            Self::Object(_) => "Object",
            Self::Struct(StructValue::Map(_)) => "Struct",
            Self::Struct(StructValue::Container(_)) => "Struct(Container)",
            Self::Struct(StructValue::Blob(_)) => "Struct(Blob)",
            Self::ArrayOfStruct(_) => "ArrayOfStruct",
        }
    }

    /// The integer, if this is [`Value::Int32`].
    pub const fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// The integer, if this is [`Value::UInt64`].
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    /// The flag, if this is [`Value::Bool`].
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The string, if this is [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// The text, if this is [`Value::Text`].
    pub const fn as_text(&self) -> Option<&TextValue> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// The enum value, if this is [`Value::Enum`].
    pub const fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Self::Enum(v) => Some(v),
            _ => None,
        }
    }

    /// The object reference, if this is [`Value::Object`].
    pub const fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    /// The property map, if this is a plain [`Value::Struct`].
    pub const fn as_struct_map(&self) -> Option<&Properties> {
        match self {
            Self::Struct(StructValue::Map(v)) => Some(v),
            _ => None,
        }
    }

    /// The actor container, if this struct nests one.
    pub const fn as_container(&self) -> Option<&Container> {
        match self {
            Self::Struct(StructValue::Container(v)) => Some(v),
            _ => None,
        }
    }

    /// The blob archive, if this struct nests one.
    pub const fn as_blob(&self) -> Option<&Archive> {
        match self {
            Self::Struct(StructValue::Blob(v)) => Some(v),
            _ => None,
        }
    }

    /// The elements, if this is [`Value::ArrayOfStruct`].
    pub fn as_struct_array(&self) -> Option<&[Self]> {
        match self {
            Self::ArrayOfStruct(v) => Some(v),
            _ => None,
        }
    }

    /// Shorthand for a literal [`Value::Text`].
    pub fn literal_text(text: impl Into<String>) -> Self {
        Self::Text(TextValue::Literal(text.into()))
    }

    /// Shorthand for a [`Value::Enum`] from its qualified value.
    pub fn enumeration(value: impl Into<String>) -> Self {
        Self::Enum(EnumValue {
            enum_type: String::new(),
            value: value.into(),
        })
    }

    /// Shorthand for a [`Value::Object`] referencing `class_name`.
    pub fn object(class_name: impl Into<String>) -> Self {
        Self::Object(ObjectRef {
            class_name: class_name.into(),
        })
    }

    /// Shorthand for a plain [`Value::Struct`] built from name/value pairs.
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Self)>,
        K: Into<String>,
    {
        Self::Struct(StructValue::Map(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }
}

/// Localizable text. The decoder emits one of several encodings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextValue {
    /// Text stored as a literal string.
    Literal(String),
    /// Text stored as a localization entry with its source string.
    Localized {
        /// Localization namespace.
        namespace: String,
        /// Localization key.
        key: String,
        /// Source-language string.
        source_string: String,
    },
    /// Any encoding that carries no usable string.
    Empty,
}

impl TextValue {
    /// Resolve to a display string: the literal, else the source string,
    /// else the empty string.
    pub fn resolve(&self) -> &str {
        match self {
            Self::Literal(s) => s,
            Self::Localized { source_string, .. } => source_string,
            Self::Empty => "",
        }
    }
}

/// An enum property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Name of the enum type (may be empty).
    #[serde(default)]
    pub enum_type: String,
    /// Qualified value, e.g. `EZoneLinkType::Waypoint`.
    pub value: String,
}

/// A reference to a class or object by path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Full class path, e.g. `/Game/Items/Ring_Foo.Ring_Foo_C`.
    pub class_name: String,
}

/// Payload of a [`Value::Struct`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StructValue {
    /// An ordinary struct: a nested property bag.
    Map(Properties),
    /// A persistence container holding actors.
    Container(Container),
    /// A persistence blob holding a nested archive.
    Blob(Archive),
}

// ---------------------------------------------------------------------------
// Records and archives
// ---------------------------------------------------------------------------

/// A named component attached to a [`Record`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Component key, e.g. `Loot`, `Zone`, `Reward_0`.
    pub key: String,
    /// Component properties.
    #[serde(default)]
    pub properties: Properties,
}

impl Component {
    /// Create an empty component with the given key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            properties: Properties::new(),
        }
    }

    /// Builder: add a property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }
}

/// One generically-typed decoded object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Object key (often a level or container path). May be empty.
    #[serde(default)]
    pub key: String,
    /// Class name of the object.
    #[serde(default)]
    pub class_name: String,
    /// Flat properties.
    #[serde(default)]
    pub properties: Properties,
    /// Components, in save order.
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Record {
    /// Create an empty record of the given class.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            ..Self::default()
        }
    }

    /// Builder: set the object key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Builder: add a property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Builder: append a component.
    #[must_use]
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// First component with exactly this key.
    pub fn component(&self, key: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.key == key)
    }
}

/// An ordered collection of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Archive {
    /// The records, in save order.
    #[serde(default)]
    pub objects: Vec<Record>,
}

impl Archive {
    /// Wrap a list of records.
    pub const fn new(objects: Vec<Record>) -> Self {
        Self { objects }
    }
}

/// An actor inside a persistence [`Container`]: a class plus its own
/// mini-archive of property-bearing records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Class name of the actor.
    pub class_name: String,
    /// The actor's own archive.
    #[serde(default)]
    pub archive: Archive,
}

impl Actor {
    /// Create an actor of the given class over the given records.
    pub fn new(class_name: impl Into<String>, objects: Vec<Record>) -> Self {
        Self {
            class_name: class_name.into(),
            archive: Archive::new(objects),
        }
    }
}

/// A persistence container: the actors of one level or quest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// Actors, in save order.
    #[serde(default)]
    pub actors: Vec<Actor>,
}
