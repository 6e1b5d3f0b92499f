//! Finalized type metadata.
//!
//! These are the read-only definitions a [`super::TypeBuilder`] produces once its type is created. Nothing
//! here can be mutated after finalization; objects and reflection only read it.

use typeforge_core::{ClassRef, StorageCategory, TypeRef};

use super::opcode::OpCode;

macro_rules! attribute_set {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$fmeta:meta])* $flag:ident = $bit:expr => $kw:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(u32);

        impl $name {
            $($(#[$fmeta])* pub const $flag: $name = $name($bit);)*

            pub const fn empty() -> Self {
                $name(0)
            }

            pub const fn union(self, other: Self) -> Self {
                $name(self.0 | other.0)
            }

            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// Disassembly keywords of the set flags, in declaration order.
            pub fn keywords(self) -> Vec<&'static str> {
                let mut out = Vec::new();
                $(
                    if self.contains($name::$flag) {
                        out.push($kw);
                    }
                )*
                out
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                self.union(rhs)
            }
        }
    };
}

attribute_set! {
    /// Visibility and layout flags of a generated type.
    TypeAttributes {
        /// Visible only inside its container.
        NOT_PUBLIC = 1 << 0 => "notpublic",
        PUBLIC = 1 << 1 => "public",
        AUTO_LAYOUT = 1 << 2 => "auto",
        ANSI_CLASS = 1 << 3 => "ansi",
        /// Type initialization may run at any time before first static access.
        BEFORE_FIELD_INIT = 1 << 4 => "beforefieldinit",
    }
}

attribute_set! {
    /// Access flags of a field.
    FieldAttributes {
        PRIVATE = 1 << 0 => "private",
    }
}

attribute_set! {
    /// Access and naming flags of a method.
    MethodAttributes {
        PUBLIC = 1 << 0 => "public",
        HIDE_BY_SIG = 1 << 1 => "hidebysig",
        /// The name is meaningful to tooling (accessors, constructors).
        SPECIAL_NAME = 1 << 2 => "specialname",
        /// The name is meaningful to the host itself (constructors).
        RT_SPECIAL_NAME = 1 << 3 => "rtspecialname",
    }
}

/// Identifies a field of one specific type under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldToken {
    pub(crate) owner: u64,
    pub(crate) index: usize,
}

/// Identifies a method or constructor of one specific type under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodToken {
    pub(crate) owner: u64,
    pub(crate) index: usize,
}

/// Identifies a property of one specific type under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyToken {
    pub(crate) owner: u64,
    pub(crate) index: usize,
}

/// Name of every constructor.
pub const CONSTRUCTOR_NAME: &str = ".ctor";

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub(crate) name: String,
    pub(crate) ty: TypeRef,
    pub(crate) attributes: FieldAttributes,
    pub(crate) storage: StorageCategory,
}

impl FieldDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn attributes(&self) -> FieldAttributes {
        self.attributes
    }

    pub fn storage(&self) -> StorageCategory {
        self.storage
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Instance,
    Constructor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    pub(crate) name: String,
    pub(crate) attributes: MethodAttributes,
    pub(crate) kind: MethodKind,
    pub(crate) params: Vec<TypeRef>,
    /// `None` is `void`.
    pub(crate) ret: Option<TypeRef>,
    pub(crate) body: Vec<OpCode>,
    pub(crate) max_stack: usize,
}

impl MethodDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> MethodAttributes {
        self.attributes
    }

    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }

    pub fn return_type(&self) -> Option<&TypeRef> {
        self.ret.as_ref()
    }

    pub fn body(&self) -> &[OpCode] {
        &self.body
    }

    /// Deepest evaluation stack the verifier observed for this body.
    pub fn max_stack(&self) -> usize {
        self.max_stack
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    pub(crate) name: String,
    pub(crate) ty: TypeRef,
    pub(crate) getter: Option<usize>,
    pub(crate) setter: Option<usize>,
}

impl PropertyDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn can_read(&self) -> bool {
        self.getter.is_some()
    }

    pub fn can_write(&self) -> bool {
        self.setter.is_some()
    }
}

/// A finalized generated type.
#[derive(Debug, PartialEq)]
pub struct TypeDef {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) container: String,
    pub(crate) attributes: TypeAttributes,
    pub(crate) fields: Vec<FieldDef>,
    pub(crate) methods: Vec<MethodDef>,
    pub(crate) properties: Vec<PropertyDef>,
}

impl TypeDef {
    /// Process-unique identity of this type.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// `Container.Type`.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.container, self.name)
    }

    pub fn attributes(&self) -> TypeAttributes {
        self.attributes
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodDef] {
        &self.methods
    }

    pub fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub(crate) fn method_at(&self, index: usize) -> Option<&MethodDef> {
        self.methods.get(index)
    }

    /// The public constructor taking no arguments, if the type declares one.
    pub fn default_constructor(&self) -> Option<&MethodDef> {
        self.methods.iter().find(|m| {
            m.kind == MethodKind::Constructor
                && m.params.is_empty()
                && m.attributes.contains(MethodAttributes::PUBLIC)
        })
    }

    /// A type reference to this type, usable as the property type of another generated type.
    pub fn class_ref(&self) -> ClassRef {
        ClassRef {
            id: self.id,
            name: self.full_name(),
        }
    }
}
