//! Stable, source-independent identity for a declaration.
//!
//! Two elements resolved by different compilations of the same source compare
//! equal under `Ptr` iff they denote the same program element. The canonical
//! form is `package/Outer.Inner#member(erased,erased)`: the member segment is
//! absent for types, the parameter list is present only for executables, and
//! constructors use the enclosing type's simple name as the member name.

use std::fmt::{Display, Formatter, Result};

use crate::facility::element::{CONSTRUCTOR_NAME, Element, ElementKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ptr {
    path: String,
}

impl Ptr {
    pub fn from_element(el: &Element) -> Self {
        if el.kind == ElementKind::Package {
            return Self {
                path: el.name.clone(),
            };
        }
        if el.is_type() {
            let mut chain = el.owners.clone();
            chain.push(el.name.clone());
            return Self {
                path: class_path(&el.package, &chain.join(".")),
            };
        }
        let owner = class_path(&el.package, &el.owners.join("."));
        let member = if el.name == CONSTRUCTOR_NAME {
            el.enclosing_simple_name().unwrap_or(CONSTRUCTOR_NAME)
        } else {
            &el.name
        };
        let path = if el.is_executable() {
            format!("{}#{}({})", owner, member, el.erased_params.join(","))
        } else {
            format!("{owner}#{member}")
        };
        Self { path }
    }

    pub fn to_class(package: &str, class: &str) -> Self {
        Self {
            path: class_path(package, class),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Display for Ptr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.path)
    }
}

fn class_path(package: &str, chain: &str) -> String {
    if package.is_empty() {
        chain.to_string()
    } else {
        format!("{package}/{chain}")
    }
}
