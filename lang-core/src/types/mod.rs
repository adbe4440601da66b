//! Type descriptor `T` — a structural description of each language type,
//! plus the process-wide registry that hands descriptors out by id.
//!
//! Per the §9 "arena-plus-index" redesign note, a compound descriptor never
//! owns its child types directly (no `Arc`-cycle risk from a struct that
//! references itself); every child is stored as a [`TypeId`] and resolved
//! through [`TypeRegistry::get`] on demand. Reference counting applies to
//! the descriptor handle itself (`Arc<TypeDescriptor>`): primitives are
//! interned once and the registry holds a permanent clone, so they are
//! never actually freed even though the same `Arc` machinery is used.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::result::TypeId;

/// Structural category of a type, with its category-specific body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Primitive,
    Slice { element: TypeId },
    Pointer { pointee: TypeId },
    Result { ok: TypeId, err: TypeId },
    Function { params: Vec<TypeId>, return_type: TypeId },
    Struct { fields: Vec<(String, TypeId)> },
    Enum { variants: Vec<(String, Vec<TypeId>)> },
    Module,
    Unknown,
}

/// A structural description of a language type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub id: TypeId,
    pub category: Category,
    pub size: usize,
    pub alignment: usize,
    pub name: Option<String>,
}

impl TypeDescriptor {
    pub fn printable_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unknown")
    }
}

// Interned primitive ids. `0` is reserved as the "any/unchecked" sentinel
// by `crate::result::ANY_TYPE` and is never issued here.
pub const PRIMITIVE_VOID: TypeId = 1;
pub const PRIMITIVE_NEVER: TypeId = 2;
pub const PRIMITIVE_I32: TypeId = 3;
pub const PRIMITIVE_I64: TypeId = 4;
pub const PRIMITIVE_F64: TypeId = 5;
pub const PRIMITIVE_BOOL: TypeId = 6;
pub const PRIMITIVE_STRING: TypeId = 7;
pub const PRIMITIVE_USIZE: TypeId = 8;

const FIRST_COMPOUND_ID: TypeId = 1000;

struct Inner {
    descriptors: HashMap<TypeId, Arc<TypeDescriptor>>,
    next_compound_id: TypeId,
}

/// Process-wide type registry: interned primitives plus an arena of
/// compound descriptors indexed by id.
pub struct TypeRegistry {
    inner: RwLock<Inner>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut descriptors = HashMap::new();
        for (id, name, size, alignment) in [
            (PRIMITIVE_VOID, "void", 0usize, 1usize),
            (PRIMITIVE_NEVER, "Never", 0, 1),
            (PRIMITIVE_I32, "i32", 4, 4),
            (PRIMITIVE_I64, "i64", 8, 8),
            (PRIMITIVE_F64, "f64", 8, 8),
            (PRIMITIVE_BOOL, "bool", 1, 1),
            (PRIMITIVE_STRING, "string", 24, 8),
            (PRIMITIVE_USIZE, "usize", 8, 8),
        ] {
            descriptors.insert(
                id,
                Arc::new(TypeDescriptor {
                    id,
                    category: Category::Primitive,
                    size,
                    alignment,
                    name: Some(name.to_string()),
                }),
            );
        }
        TypeRegistry {
            inner: RwLock::new(Inner {
                descriptors,
                next_compound_id: FIRST_COMPOUND_ID,
            }),
        }
    }

    fn allocate_id(&self) -> TypeId {
        let mut inner = self.inner.write();
        let id = inner.next_compound_id;
        inner.next_compound_id += 1;
        id
    }

    /// Looks up a descriptor by id. Returns `None` for unknown non-zero
    /// ids; callers that need a printable name should use
    /// [`Self::name_of`], which renders unknown ids as `"unknown"`.
    pub fn get(&self, id: TypeId) -> Option<Arc<TypeDescriptor>> {
        self.inner.read().descriptors.get(&id).cloned()
    }

    /// Per `spec.md` §3: unknown ids render as `"unknown"`.
    pub fn name_of(&self, id: TypeId) -> String {
        self.get(id)
            .map(|d| d.printable_name().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Retaining a descriptor handle is just cloning the `Arc`; exposed as
    /// a named operation so callers read like the spec's retain/release
    /// pair rather than reaching for `Arc::clone` directly.
    pub fn retain(desc: &Arc<TypeDescriptor>) -> Arc<TypeDescriptor> {
        Arc::clone(desc)
    }

    /// Releasing is dropping the handle; primitives are never actually
    /// freed because the registry itself always holds one clone.
    pub fn release(desc: Arc<TypeDescriptor>) {
        drop(desc);
    }

    pub fn define_slice(&self, element: TypeId, element_size: usize) -> TypeId {
        let id = self.allocate_id();
        self.insert(id, Category::Slice { element }, element_size, 8, None);
        id
    }

    pub fn define_pointer(&self, pointee: TypeId) -> TypeId {
        let id = self.allocate_id();
        self.insert(id, Category::Pointer { pointee }, 8, 8, None);
        id
    }

    pub fn define_result(&self, ok: TypeId, err: TypeId) -> TypeId {
        let id = self.allocate_id();
        self.insert(id, Category::Result { ok, err }, 0, 8, None);
        id
    }

    /// `param_count > 0` implies `params` is non-empty; Rust's `Vec`
    /// already makes "non-null vector" a non-issue, so the contract
    /// reduces to keeping `params.len()` consistent with the caller's
    /// declared arity, which this constructor guarantees by construction.
    pub fn define_function(&self, params: Vec<TypeId>, return_type: TypeId) -> TypeId {
        let id = self.allocate_id();
        self.insert(
            id,
            Category::Function {
                params,
                return_type,
            },
            8,
            8,
            None,
        );
        id
    }

    /// Forward-declares a struct so self-referencing fields (a struct that
    /// contains a pointer-to-itself, say) can name their own id before the
    /// field list is known. Call [`Self::set_struct_fields`] once the
    /// fields are ready.
    pub fn declare_struct(&self, name: impl Into<String>) -> TypeId {
        let id = self.allocate_id();
        self.insert(id, Category::Struct { fields: Vec::new() }, 0, 1, Some(name.into()));
        id
    }

    pub fn set_struct_fields(&self, id: TypeId, fields: Vec<(String, TypeId)>, size: usize, alignment: usize) {
        let mut inner = self.inner.write();
        if let Some(existing) = inner.descriptors.get(&id) {
            let name = existing.name.clone();
            inner.descriptors.insert(
                id,
                Arc::new(TypeDescriptor {
                    id,
                    category: Category::Struct { fields },
                    size,
                    alignment,
                    name,
                }),
            );
        }
    }

    pub fn define_enum(
        &self,
        name: impl Into<String>,
        variants: Vec<(String, Vec<TypeId>)>,
        size: usize,
        alignment: usize,
    ) -> TypeId {
        let id = self.allocate_id();
        self.insert(id, Category::Enum { variants }, size, alignment, Some(name.into()));
        id
    }

    pub fn define_module(&self, name: impl Into<String>) -> TypeId {
        let id = self.allocate_id();
        self.insert(id, Category::Module, 0, 1, Some(name.into()));
        id
    }

    fn insert(&self, id: TypeId, category: Category, size: usize, alignment: usize, name: Option<String>) {
        self.inner.write().descriptors.insert(
            id,
            Arc::new(TypeDescriptor {
                id,
                category,
                size,
                alignment,
                name,
            }),
        );
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_interned_and_always_resolvable() {
        let reg = TypeRegistry::new();
        assert_eq!(reg.name_of(PRIMITIVE_I64), "i64");
        assert_eq!(reg.name_of(999_999), "unknown");
    }

    #[test]
    fn self_referencing_struct_via_forward_declaration() {
        let reg = TypeRegistry::new();
        let node_id = reg.declare_struct("Node");
        let ptr_to_self = reg.define_pointer(node_id);
        reg.set_struct_fields(
            node_id,
            vec![
                ("value".to_string(), PRIMITIVE_I64),
                ("next".to_string(), ptr_to_self),
            ],
            16,
            8,
        );
        let desc = reg.get(node_id).unwrap();
        match &desc.category {
            Category::Struct { fields } => {
                assert_eq!(fields[1].1, ptr_to_self);
            }
            _ => panic!("expected struct"),
        }
    }

    #[test]
    fn function_descriptor_keeps_param_return_types() {
        let reg = TypeRegistry::new();
        let f = reg.define_function(vec![PRIMITIVE_I32], PRIMITIVE_VOID);
        let desc = reg.get(f).unwrap();
        match &desc.category {
            Category::Function { params, return_type } => {
                assert_eq!(params, &vec![PRIMITIVE_I32]);
                assert_eq!(*return_type, PRIMITIVE_VOID);
            }
            _ => panic!("expected function"),
        }
    }

    #[test]
    fn retain_release_are_arc_clone_and_drop() {
        let reg = TypeRegistry::new();
        let s = reg.define_slice(PRIMITIVE_I32, 4);
        let desc = reg.get(s).unwrap();
        let strong_before = Arc::strong_count(&desc);
        let retained = TypeRegistry::retain(&desc);
        assert_eq!(Arc::strong_count(&desc), strong_before + 1);
        TypeRegistry::release(retained);
        assert_eq!(Arc::strong_count(&desc), strong_before);
    }
}
