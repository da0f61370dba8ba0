//! Resolved type tags and the host-language types behind them.

use std::fmt;

/// What a bean element or property resolves to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// A generated record type.
    #[default]
    Bean,
    String,
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    /// The synthetic `Comments` property.
    Comment,
}

impl TypeTag {
    /// Tag for a host type name such as `int`, `java.lang.Integer` or
    /// `java.math.BigDecimal`. Types without a scalar tag are strings.
    pub fn from_wrapper(class: &str) -> Self {
        let simple = class.strip_prefix("java.lang.").unwrap_or(class);
        match simple {
            "boolean" | "Boolean" => Self::Boolean,
            "byte" | "Byte" => Self::Byte,
            "char" | "Character" => Self::Char,
            "short" | "Short" => Self::Short,
            "int" | "Integer" => Self::Int,
            "long" | "Long" => Self::Long,
            "float" | "Float" => Self::Float,
            "double" | "Double" => Self::Double,
            _ => Self::String,
        }
    }

    pub fn is_scalar(self) -> bool {
        !matches!(self, Self::Bean | Self::String | Self::Comment)
    }

    pub fn is_bean(self) -> bool {
        self == Self::Bean
    }

    /// Default host type for a non-bean tag: the primitive for scalars,
    /// `java.lang.String` otherwise.
    pub fn wrapper_class(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bean | Self::String | Self::Comment => "java.lang.String",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Bean => "bean",
            Self::Comment => "comment",
            other => other.wrapper_class(),
        };
        f.write_str(text)
    }
}

/// Whether a host type name is a primitive that cannot hold null.
pub fn is_primitive(class: &str) -> bool {
    to_object_type(class).is_some()
}

/// The nullable object type for a primitive host type.
pub fn to_object_type(class: &str) -> Option<&'static str> {
    let object = match class {
        "boolean" => "java.lang.Boolean",
        "byte" => "java.lang.Byte",
        "char" => "java.lang.Character",
        "short" => "java.lang.Short",
        "int" => "java.lang.Integer",
        "long" => "java.lang.Long",
        "float" => "java.lang.Float",
        "double" => "java.lang.Double",
        _ => return None,
    };
    Some(object)
}
