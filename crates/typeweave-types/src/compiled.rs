//! Structural view of a compiled type.
//!
//! A [`CompiledType`] holds the declared members of one type: nested types,
//! methods, fields and constructors. Method and constructor bodies are opaque
//! code plus a constant table; the only rewriting ever applied to them is
//! [`Rebind`], which renames references from one owner type to another when a
//! member is copied between types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::WeaveError;
use crate::marker::{Marker, MarkerValue};
use crate::names;

/// Access flag bits for types and members.
pub mod access {
    pub const PUBLIC: u16 = 0x0001;
    pub const PRIVATE: u16 = 0x0002;
    pub const PROTECTED: u16 = 0x0004;
    pub const STATIC: u16 = 0x0008;
    pub const FINAL: u16 = 0x0010;
    pub const ABSTRACT: u16 = 0x0400;
}

/// What sort of type a [`CompiledType`] declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    /// Value record (immutable data carrier)
    Record,
    Enum,
    /// Marker type; accessor methods declare its properties
    Marker,
    /// Synthetic per-package descriptor
    PackageInfo,
}

/// A value or reference type appearing in a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSig {
    Void,
    Bool,
    Int,
    Long,
    Double,
    Str,
    /// Reference to a compiled type by qualified name
    Object(String),
    Array(Box<TypeSig>),
}

impl fmt::Display for TypeSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSig::Void => f.write_str("void"),
            TypeSig::Bool => f.write_str("boolean"),
            TypeSig::Int => f.write_str("int"),
            TypeSig::Long => f.write_str("long"),
            TypeSig::Double => f.write_str("double"),
            TypeSig::Str => f.write_str("string"),
            TypeSig::Object(name) => f.write_str(name),
            TypeSig::Array(inner) => write!(f, "{}[]", inner),
        }
    }
}

/// Parameter and return types of a method or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub params: Vec<TypeSig>,
    pub ret: TypeSig,
}

impl Signature {
    pub fn new(params: Vec<TypeSig>, ret: TypeSig) -> Self {
        Self { params, ret }
    }

    /// `() -> void`
    pub fn unit() -> Self {
        Self::new(Vec::new(), TypeSig::Void)
    }

    /// Rendered descriptor, e.g. `(int,def.lib.Foo)void`.
    pub fn descriptor(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        format!("({}){}", params.join(","), self.ret)
    }
}

/// An entry of a body's constant table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constant {
    Int(i64),
    Str(String),
    TypeRef(String),
    FieldRef {
        owner: String,
        name: String,
        ty: TypeSig,
    },
    MethodRef {
        owner: String,
        name: String,
        signature: Signature,
    },
}

/// Opaque executable body of a method or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodBody {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub constants: Vec<Constant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeSig,
    pub access: u16,
    pub constant_value: Option<Constant>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeSig) -> Self {
        Self {
            name: name.into(),
            ty,
            access: access::PUBLIC,
            constant_value: None,
        }
    }

    pub fn with_constant(mut self, value: Constant) -> Self {
        self.constant_value = Some(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub signature: Signature,
    pub access: u16,
    pub body: Option<MethodBody>,
    /// Default value when this method is a marker property accessor
    pub marker_default: Option<MarkerValue>,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
            access: access::PUBLIC,
            body: None,
            marker_default: None,
        }
    }

    pub fn with_body(mut self, body: MethodBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_marker_default(mut self, value: MarkerValue) -> Self {
        self.marker_default = Some(value);
        self
    }

    /// Member identity used for duplicate detection at insertion time.
    pub fn identity(&self) -> String {
        format!("{}{}", self.name, self.signature.descriptor())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorDef {
    pub signature: Signature,
    pub access: u16,
    pub body: Option<MethodBody>,
}

impl ConstructorDef {
    pub fn new(params: Vec<TypeSig>) -> Self {
        Self {
            signature: Signature::new(params, TypeSig::Void),
            access: access::PUBLIC,
            body: None,
        }
    }

    pub fn with_body(mut self, body: MethodBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn identity(&self) -> String {
        format!("<init>{}", self.signature.descriptor())
    }
}

/// In-memory structural view of one compiled type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledType {
    /// Fully-qualified name; nested types use `Outer$Inner`
    pub name: String,
    pub kind: TypeKind,
    pub access: u16,
    pub super_type: Option<String>,
    pub interfaces: Vec<String>,
    pub markers: Vec<Marker>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
    pub constructors: Vec<ConstructorDef>,
    pub nested: Vec<CompiledType>,
}

impl CompiledType {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            access: access::PUBLIC,
            super_type: None,
            interfaces: Vec::new(),
            markers: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            nested: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    /// Descriptor type for `package`.
    pub fn package_info(package: &str) -> Self {
        Self::new(names::package_info_name(package), TypeKind::PackageInfo)
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_constructor(mut self, ctor: ConstructorDef) -> Self {
        self.constructors.push(ctor);
        self
    }

    /// Attach a nested type declared as `inner.inner_name()`; its name is rewritten
    /// to live under this type.
    pub fn with_nested(mut self, mut inner: CompiledType) -> Self {
        let declared = names::inner_name(&inner.name).to_string();
        inner.rename(&names::nested_name(&self.name, &declared));
        self.nested.push(inner);
        self
    }

    pub fn simple_name(&self) -> &str {
        names::simple_name(&self.name)
    }

    /// Declared name (last `$` segment) of this type.
    pub fn inner_name(&self) -> &str {
        names::inner_name(&self.name)
    }

    pub fn marker(&self, type_name: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.type_name == type_name)
    }

    pub fn declared_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// First declared method with the given simple name (overloads share one slot).
    pub fn declared_method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.declared_field(name).is_some()
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.declared_method(name).is_some()
    }

    pub fn nested_type(&self, inner: &str) -> Option<&CompiledType> {
        self.nested.iter().find(|n| n.inner_name() == inner)
    }

    pub fn nested_type_mut(&mut self, inner: &str) -> Option<&mut CompiledType> {
        self.nested.iter_mut().find(|n| n.inner_name() == inner)
    }

    /// Follow a chain of declared nested names below this type.
    pub fn find_nested(&self, chain: &[&str]) -> Option<&CompiledType> {
        let mut current = self;
        for inner in chain {
            current = current.nested_type(inner)?;
        }
        Some(current)
    }

    /// Number of methods, fields and constructors (nested types excluded).
    pub fn member_count(&self) -> usize {
        self.methods.len() + self.fields.len() + self.constructors.len()
    }

    /// Add a method; fails if one with the same name and descriptor exists.
    pub fn add_method(&mut self, method: MethodDef) -> Result<(), WeaveError> {
        self.check_member_name(&method.name)?;
        let identity = method.identity();
        if self.methods.iter().any(|m| m.identity() == identity) {
            return Err(WeaveError::duplicate(&self.name, identity));
        }
        self.methods.push(method);
        Ok(())
    }

    /// Add a field; fails if one with the same name exists.
    pub fn add_field(&mut self, field: FieldDef) -> Result<(), WeaveError> {
        self.check_member_name(&field.name)?;
        if self.has_field(&field.name) {
            return Err(WeaveError::duplicate(&self.name, field.name));
        }
        self.fields.push(field);
        Ok(())
    }

    /// Member names are non-empty and free of `.`, `;`, `[` and `/`.
    fn check_member_name(&self, member: &str) -> Result<(), WeaveError> {
        if member.is_empty() || member.contains(['.', ';', '[', '/']) {
            return Err(WeaveError::malformed(
                format!("{} member", self.name),
                format!("invalid member name {:?}", member),
            ));
        }
        Ok(())
    }

    /// Add a constructor; fails if one with the same descriptor exists.
    pub fn add_constructor(&mut self, ctor: ConstructorDef) -> Result<(), WeaveError> {
        let identity = ctor.identity();
        if self.constructors.iter().any(|c| c.identity() == identity) {
            return Err(WeaveError::duplicate(&self.name, identity));
        }
        self.constructors.push(ctor);
        Ok(())
    }

    /// Return the nested type declared as `inner`, creating an empty one of
    /// `kind` and `access` when absent. The flag tells whether it was created.
    pub fn nested_or_insert(
        &mut self,
        inner: &str,
        kind: TypeKind,
        access: u16,
    ) -> (&mut CompiledType, bool) {
        let position = self.nested.iter().position(|n| n.inner_name() == inner);
        match position {
            Some(idx) => (&mut self.nested[idx], false),
            None => {
                let mut created = CompiledType::new(names::nested_name(&self.name, inner), kind);
                created.access = access;
                self.nested.push(created);
                let last = self.nested.len() - 1;
                (&mut self.nested[last], true)
            }
        }
    }

    /// Rename this type and every nested type below it.
    pub fn rename(&mut self, new_name: &str) {
        let old = std::mem::replace(&mut self.name, new_name.to_string());
        for nested in &mut self.nested {
            if let Some(renamed) = names::rebase(&nested.name, &old, new_name) {
                nested.rename(&renamed);
            }
        }
    }
}

/// Copy of a member with references to one owner type renamed to another.
pub trait Rebind {
    fn rebind(&self, from: &str, to: &str) -> Self;
}

fn rebind_name(name: &str, from: &str, to: &str) -> String {
    names::rebase(name, from, to).unwrap_or_else(|| name.to_string())
}

impl Rebind for TypeSig {
    fn rebind(&self, from: &str, to: &str) -> Self {
        match self {
            TypeSig::Object(name) => TypeSig::Object(rebind_name(name, from, to)),
            TypeSig::Array(inner) => TypeSig::Array(Box::new(inner.rebind(from, to))),
            other => other.clone(),
        }
    }
}

impl Rebind for Signature {
    fn rebind(&self, from: &str, to: &str) -> Self {
        Signature {
            params: self.params.iter().map(|p| p.rebind(from, to)).collect(),
            ret: self.ret.rebind(from, to),
        }
    }
}

impl Rebind for Constant {
    fn rebind(&self, from: &str, to: &str) -> Self {
        match self {
            Constant::TypeRef(name) => Constant::TypeRef(rebind_name(name, from, to)),
            Constant::FieldRef { owner, name, ty } => Constant::FieldRef {
                owner: rebind_name(owner, from, to),
                name: name.clone(),
                ty: ty.rebind(from, to),
            },
            Constant::MethodRef {
                owner,
                name,
                signature,
            } => Constant::MethodRef {
                owner: rebind_name(owner, from, to),
                name: name.clone(),
                signature: signature.rebind(from, to),
            },
            other => other.clone(),
        }
    }
}

impl Rebind for MethodBody {
    fn rebind(&self, from: &str, to: &str) -> Self {
        MethodBody {
            max_stack: self.max_stack,
            max_locals: self.max_locals,
            code: self.code.clone(),
            constants: self.constants.iter().map(|c| c.rebind(from, to)).collect(),
        }
    }
}

impl Rebind for FieldDef {
    fn rebind(&self, from: &str, to: &str) -> Self {
        FieldDef {
            name: self.name.clone(),
            ty: self.ty.rebind(from, to),
            access: self.access,
            constant_value: self.constant_value.as_ref().map(|c| c.rebind(from, to)),
        }
    }
}

impl Rebind for MethodDef {
    fn rebind(&self, from: &str, to: &str) -> Self {
        MethodDef {
            name: self.name.clone(),
            signature: self.signature.rebind(from, to),
            access: self.access,
            body: self.body.as_ref().map(|b| b.rebind(from, to)),
            marker_default: self.marker_default.as_ref().map(|v| v.rebind(from, to)),
        }
    }
}

impl Rebind for ConstructorDef {
    fn rebind(&self, from: &str, to: &str) -> Self {
        ConstructorDef {
            signature: self.signature.rebind(from, to),
            access: self.access,
            body: self.body.as_ref().map(|b| b.rebind(from, to)),
        }
    }
}
