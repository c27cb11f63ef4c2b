//! Type-safe enumerations for the EMX markup vocabulary.
//!
//! Every key an EMX record may carry, and every recognised `dataType`, is
//! spelled exactly once here. Parsing is case-sensitive because the markup
//! keys are (`dataType` and `datatype` are different keys).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! vocabulary_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $label:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// All members in vocabulary order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the key exactly as it is spelled in markup.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!("Unknown {}: {}", $label, s)),
                }
            }
        }
    };
}

vocabulary_enum! {
    /// Recognised attribute data types.
    pub enum DataType: "data type" {
        Bool => "bool",
        Categorical => "categorical",
        CategoricalMref => "categorical_mref",
        Compound => "compound",
        Date => "date",
        Datetime => "datetime",
        Decimal => "decimal",
        Email => "email",
        Enum => "enum",
        File => "file",
        Hyperlink => "hyperlink",
        Int => "int",
        Long => "long",
        Mref => "mref",
        OneToMany => "one_to_many",
        String => "string",
        Text => "text",
        Xref => "xref",
    }
}

vocabulary_enum! {
    /// Keys allowed on a package record.
    pub enum PackageKey: "package key" {
        Name => "name",
        Label => "label",
        Description => "description",
        Parent => "parent",
        Tags => "tags",
    }
}

vocabulary_enum! {
    /// Keys allowed on an entity record.
    pub enum EntityKey: "entity key" {
        Name => "name",
        Label => "label",
        Extends => "extends",
        Package => "package",
        Abstract => "abstract",
        Description => "description",
        Backend => "backend",
        Tags => "tags",
    }
}

vocabulary_enum! {
    /// Keys allowed on an attribute record, in attributes-sheet column order.
    pub enum AttributeKey: "attribute key" {
        Entity => "entity",
        Name => "name",
        DataType => "dataType",
        RefEntity => "refEntity",
        Nillable => "nillable",
        IdAttribute => "idAttribute",
        Auto => "auto",
        Description => "description",
        RangeMin => "rangeMin",
        RangeMax => "rangeMax",
        LookupAttribute => "lookupAttribute",
        Label => "label",
        Aggregateable => "aggregateable",
        LabelAttribute => "labelAttribute",
        ReadOnly => "readOnly",
        Tags => "tags",
        ValidationExpression => "validationExpression",
        Visible => "visible",
        DefaultValue => "defaultValue",
        PartOfAttribute => "partOfAttribute",
        Expression => "expression",
    }
}

vocabulary_enum! {
    /// Keys allowed on a semantic tag definition.
    pub enum TagKey: "tag key" {
        Identifier => "identifier",
        Label => "label",
        ObjectIri => "objectIRI",
        RelationLabel => "relationLabel",
        RelationIri => "relationIRI",
        CodeSystem => "codeSystem",
    }
}

vocabulary_enum! {
    /// Columns of the EMX2 `molgenis` sheet, in sheet order.
    pub enum Emx2Column: "EMX2 column" {
        TableName => "tableName",
        TableExtends => "tableExtends",
        ColumnName => "columnName",
        ColumnType => "columnType",
        Key => "key",
        Required => "required",
        RefSchema => "refSchema",
        RefTable => "refTable",
        Validation => "validation",
        Semantics => "semantics",
        Label => "label",
        Description => "description",
    }
}
