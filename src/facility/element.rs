//! Resolved program elements handed across the compiler-facility boundary.
//!
//! An `Element` is a snapshot of what the type resolver knows about one
//! declaration. It carries enough structure for identity (`Ptr`), completion
//! kinds, hover rendering, and signature help; it deliberately does not hold
//! on to any compilation internals, so it may outlive the compile it came
//! from.

/// Member name the resolver reports for constructors.
pub const CONSTRUCTOR_NAME: &str = "<init>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    AnnotationType,
    Class,
    Constructor,
    Enum,
    EnumConstant,
    ExceptionParameter,
    Field,
    InstanceInit,
    Interface,
    LocalVariable,
    Method,
    Package,
    Parameter,
    ResourceVariable,
    StaticInit,
    TypeParameter,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    /// Short-printed parameter type, e.g. `List<String>`.
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    /// Simple name; [`CONSTRUCTOR_NAME`] for constructors.
    pub name: String,
    /// Declaring package, empty for the unnamed package.
    pub package: String,
    /// Simple names of the enclosing types, outermost first. Empty for
    /// top-level types and packages.
    pub owners: Vec<String>,
    /// Short-printed type of the element itself, e.g. `int` for a field.
    pub type_name: String,
    /// Short-printed superclass, for type elements.
    pub super_type: Option<String>,
    /// Short-printed return type, for executables.
    pub return_type: Option<String>,
    /// Declared parameters, for executables.
    pub params: Vec<Param>,
    /// Erased parameter type descriptors, for executables.
    pub erased_params: Vec<String>,
    /// Enclosed members, for type elements.
    pub members: Vec<Element>,
}

impl Element {
    pub fn is_executable(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::Constructor
                | ElementKind::InstanceInit
                | ElementKind::Method
                | ElementKind::StaticInit
        )
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::AnnotationType
                | ElementKind::Class
                | ElementKind::Enum
                | ElementKind::Interface
        )
    }

    /// Fully qualified name of the enclosing element, e.g. `java.lang.Object`
    /// for one of its members.
    pub fn qualified_owner(&self) -> String {
        let chain = self.owners.join(".");
        if self.package.is_empty() {
            chain
        } else if chain.is_empty() {
            self.package.clone()
        } else {
            format!("{}.{}", self.package, chain)
        }
    }

    /// Simple name of the innermost enclosing type.
    pub fn enclosing_simple_name(&self) -> Option<&str> {
        self.owners.last().map(String::as_str)
    }

    /// The name a user would read: the enclosing type's simple name for
    /// constructors, the element's own simple name otherwise.
    pub fn display_name(&self) -> &str {
        if self.name == CONSTRUCTOR_NAME {
            self.enclosing_simple_name().unwrap_or(&self.name)
        } else {
            &self.name
        }
    }
}
