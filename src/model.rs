//! Format-agnostic data model for documented entities.

use std::fmt;

/// Kind of a compound, as reported by the `kind` attribute of a Doxygen
/// `compounddef`. Drives both compound filtering and template selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The synthetic root of the tree.
    Index,
    Namespace,
    Class,
    Struct,
    Union,
    Interface,
    Group,
    Page,
    Typedef,
    File,
    Dir,
    Other(String),
}

impl Kind {
    pub fn as_str(&self) -> &str {
        match self {
            Kind::Index => "index",
            Kind::Namespace => "namespace",
            Kind::Class => "class",
            Kind::Struct => "struct",
            Kind::Union => "union",
            Kind::Interface => "interface",
            Kind::Group => "group",
            Kind::Page => "page",
            Kind::Typedef => "typedef",
            Kind::File => "file",
            Kind::Dir => "dir",
            Kind::Other(kind) => kind,
        }
    }

    /// Whether compounds of this kind own the namespaces and classes they
    /// reference through `innernamespace`/`innerclass`.
    pub fn is_scope(&self) -> bool {
        matches!(
            self,
            Kind::Namespace | Kind::Class | Kind::Struct | Kind::Union | Kind::Interface
        )
    }
}

impl From<&str> for Kind {
    fn from(kind: &str) -> Self {
        match kind {
            "index" => Kind::Index,
            "namespace" => Kind::Namespace,
            "class" => Kind::Class,
            "struct" => Kind::Struct,
            "union" => Kind::Union,
            "interface" => Kind::Interface,
            "group" => Kind::Group,
            "page" => Kind::Page,
            "typedef" => Kind::Typedef,
            "file" => Kind::File,
            "dir" => Kind::Dir,
            other => Kind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A documented leaf item attached to a compound (function, variable,
/// enum, define, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Member {
    pub id: String,
    pub name: String,
    /// memberdef kind: "function", "variable", "enum", "define", ...
    pub kind: String,
    /// sectiondef kind: "public-func", "enum", "define", ...
    pub section: String,
    /// Group the member was declared under, if any.
    pub groupid: Option<String>,
    /// Protection level ("public", "protected", "private").
    pub prot: String,
    pub is_static: bool,
    /// Declared type, plain text.
    pub ty: String,
    /// Argument string, e.g. "(double x) const".
    pub args: String,
    pub initializer: String,
    pub brief: String,
    pub detailed: String,
    pub params: Vec<Param>,
    pub enum_values: Vec<EnumValue>,
}

impl Member {
    /// One-line declaration used for headings and summary tables.
    pub fn signature(&self) -> String {
        let signature = match self.kind.as_str() {
            "define" => {
                let params = if self.params.is_empty() {
                    String::new()
                } else {
                    let names: Vec<&str> = self.params.iter().map(|p| p.name.as_str()).collect();
                    format!("({})", names.join(", "))
                };
                format!("#define {}{} {}", self.name, params, self.initializer)
            }
            "enum" => format!("enum {}", self.name),
            "typedef" => format!("typedef {} {}{}", self.ty, self.name, self.args),
            "variable" | "property" => {
                format!("{} {}{} {}", self.ty, self.name, self.args, self.initializer)
            }
            _ => format!("{} {}{}", self.ty, self.name, self.args),
        };
        let signature = signature.trim();
        if self.is_static {
            format!("static {}", signature)
        } else {
            signature.to_string()
        }
    }
}

/// Function or macro parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Param {
    pub ty: String,
    pub name: String,
    pub default: String,
}

/// A single value of an enum member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumValue {
    pub id: String,
    pub name: String,
    pub initializer: String,
    pub brief: String,
}

/// Reference to a base type (informational, never traversed).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseRef {
    pub refid: Option<String>,
    pub name: String,
    pub prot: String,
    pub virt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_known_and_unknown() {
        assert_eq!(Kind::from("namespace"), Kind::Namespace);
        assert_eq!(Kind::from("protocol"), Kind::Other("protocol".to_string()));
        assert_eq!(Kind::from("protocol").as_str(), "protocol");
    }

    #[test]
    fn function_signature() {
        let member = Member {
            kind: "function".to_string(),
            ty: "double".to_string(),
            name: "length".to_string(),
            args: "() const".to_string(),
            ..Default::default()
        };
        assert_eq!(member.signature(), "double length() const");
    }

    #[test]
    fn define_signature_lists_params() {
        let member = Member {
            kind: "define".to_string(),
            name: "MAX".to_string(),
            initializer: "((a) > (b) ? (a) : (b))".to_string(),
            params: vec![
                Param { name: "a".to_string(), ..Default::default() },
                Param { name: "b".to_string(), ..Default::default() },
            ],
            ..Default::default()
        };
        assert_eq!(member.signature(), "#define MAX(a, b) ((a) > (b) ? (a) : (b))");
    }

    #[test]
    fn static_variable_signature() {
        let member = Member {
            kind: "variable".to_string(),
            ty: "int".to_string(),
            name: "count".to_string(),
            is_static: true,
            ..Default::default()
        };
        assert_eq!(member.signature(), "static int count");
    }
}
