//! Source-syntax rendering of semantic types for diagnostics.

use crate::intern::{TypeId, TypeInterner, TypeKey};
use sable_common::{limits, CallableKind, Interner, Lifetime};
use std::fmt;

/// Renders a type in source syntax: `int|null`, `{int f}`, `&a:int`,
/// `function(int)->(int)`. Depth-limited so recursive nominals cannot
/// render forever.
pub struct TypeDisplay<'a> {
    types: &'a TypeInterner,
    strings: &'a Interner,
    ty: TypeId,
}

impl<'a> TypeDisplay<'a> {
    pub fn new(types: &'a TypeInterner, strings: &'a Interner, ty: TypeId) -> Self {
        TypeDisplay { types, strings, ty }
    }

    fn fmt_type(&self, f: &mut fmt::Formatter<'_>, ty: TypeId, depth: u32) -> fmt::Result {
        if depth > limits::MAX_TYPE_DISPLAY_DEPTH {
            return f.write_str("...");
        }
        match self.types.lookup(ty) {
            TypeKey::Void => f.write_str("void"),
            TypeKey::Any => f.write_str("any"),
            TypeKey::Null => f.write_str("null"),
            TypeKey::Bool => f.write_str("bool"),
            TypeKey::Byte => f.write_str("byte"),
            TypeKey::Int => f.write_str("int"),
            TypeKey::Nominal(n) => {
                f.write_str(&self.strings.resolve(self.types.nominal_name(n)))
            }
            TypeKey::Array(elem) => {
                self.fmt_child(f, elem, depth)?;
                f.write_str("[]")
            }
            TypeKey::Reference(elem, lifetime) => {
                match lifetime {
                    Lifetime::Static => f.write_str("&")?,
                    Lifetime::This => f.write_str("&this:")?,
                    Lifetime::Named(name) => {
                        write!(f, "&{}:", self.strings.resolve(name))?;
                    }
                }
                self.fmt_child(f, elem, depth)
            }
            TypeKey::Record(record) => {
                f.write_str("{")?;
                for (i, &(name, field)) in record.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    self.fmt_type(f, field, depth + 1)?;
                    write!(f, " {}", self.strings.resolve(name))?;
                }
                if record.open {
                    if !record.fields.is_empty() {
                        f.write_str(", ")?;
                    }
                    f.write_str("...")?;
                }
                f.write_str("}")
            }
            TypeKey::Callable(callable) => {
                match callable.kind {
                    CallableKind::Function => f.write_str("function(")?,
                    CallableKind::Method => f.write_str("method(")?,
                }
                for (i, &p) in callable.params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    self.fmt_type(f, p, depth + 1)?;
                }
                f.write_str(")->(")?;
                for (i, &r) in callable.returns.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    self.fmt_type(f, r, depth + 1)?;
                }
                f.write_str(")")
            }
            TypeKey::Union(children) => {
                for (i, &child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    self.fmt_child(f, child, depth)?;
                }
                Ok(())
            }
            TypeKey::Intersection(children) => {
                for (i, &child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str("&")?;
                    }
                    self.fmt_child(f, child, depth)?;
                }
                Ok(())
            }
            TypeKey::Negation(inner) => {
                f.write_str("!")?;
                self.fmt_child(f, inner, depth)
            }
        }
    }

    /// Children of compound constructors get parentheses when they are
    /// themselves compound.
    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, ty: TypeId, depth: u32) -> fmt::Result {
        let compound = matches!(
            self.types.lookup(ty),
            TypeKey::Union(_) | TypeKey::Intersection(_) | TypeKey::Callable(_)
        );
        if compound {
            f.write_str("(")?;
            self.fmt_type(f, ty, depth + 1)?;
            f.write_str(")")
        } else {
            self.fmt_type(f, ty, depth + 1)
        }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_type(f, self.ty, 0)
    }
}
