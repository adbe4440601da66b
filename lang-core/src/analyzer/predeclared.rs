//! Predeclared registry `P` — the fixed roster of built-in callables
//! installed into the root scope at analyzer construction.

use crate::analyzer::ast::SourceLocation;
use crate::analyzer::symbol_table::{ScopeId, SymbolEntry, SymbolKind, SymbolTable};
use crate::error::ErrorKind;
use crate::types::{self, TypeRegistry};

/// One row of the predeclared roster. `range` appears twice, sharing a
/// name — see `spec.md` §9's open question on that overload.
pub struct PredeclaredEntry {
    pub name: &'static str,
    pub signature: &'static str,
}

fn roster() -> Vec<PredeclaredEntry> {
    vec![
        PredeclaredEntry {
            name: "log",
            signature: "(string) -> void",
        },
        PredeclaredEntry {
            name: "panic",
            signature: "(string) -> Never",
        },
        PredeclaredEntry {
            name: "exit",
            signature: "(i32) -> Never",
        },
        PredeclaredEntry {
            name: "range",
            signature: "(i32) -> []i32",
        },
        PredeclaredEntry {
            name: "range",
            signature: "(i32, i32) -> []i32",
        },
        PredeclaredEntry {
            name: "args",
            signature: "() -> []string",
        },
        PredeclaredEntry {
            name: "infinite",
            signature: "() -> InfiniteIterator",
        },
        PredeclaredEntry {
            name: "len",
            signature: "([]T) -> usize",
        },
    ]
}

fn signature_type_id(types: &TypeRegistry, signature: &str) -> u32 {
    match signature {
        "(string) -> void" => types.define_function(vec![types::PRIMITIVE_STRING], types::PRIMITIVE_VOID),
        "(string) -> Never" => types.define_function(vec![types::PRIMITIVE_STRING], types::PRIMITIVE_NEVER),
        "(i32) -> Never" => types.define_function(vec![types::PRIMITIVE_I32], types::PRIMITIVE_NEVER),
        "(i32) -> []i32" => {
            let slice = types.define_slice(types::PRIMITIVE_I32, 4);
            types.define_function(vec![types::PRIMITIVE_I32], slice)
        }
        "(i32, i32) -> []i32" => {
            let slice = types.define_slice(types::PRIMITIVE_I32, 4);
            types.define_function(vec![types::PRIMITIVE_I32, types::PRIMITIVE_I32], slice)
        }
        "() -> []string" => {
            let slice = types.define_slice(types::PRIMITIVE_STRING, 24);
            types.define_function(vec![], slice)
        }
        "() -> InfiniteIterator" => {
            let iter = types.define_module("InfiniteIterator");
            types.define_function(vec![], iter)
        }
        "([]T) -> usize" => {
            let slice = types.define_slice(crate::result::ANY_TYPE, 0);
            types.define_function(vec![slice], types::PRIMITIVE_USIZE)
        }
        _ => unreachable!("roster() and signature_type_id() have drifted apart"),
    }
}

/// Installs the fixed predeclared roster into `scope`. Removal is not
/// supported once installed.
pub fn install(
    table: &mut SymbolTable,
    scope: ScopeId,
    types: &TypeRegistry,
) -> Result<(), ErrorKind> {
    for entry in roster() {
        let type_id = signature_type_id(types, entry.signature);
        let symbol = SymbolEntry::new(entry.name, SymbolKind::Function, type_id, SourceLocation::default())
            .predeclared();
        // §9 open question: `range` is registered twice under one name.
        // `SymbolTable::insert` permits this specific collision (an
        // all-predeclared-Function overload set); any other collision in
        // this fixed roster would indicate a programming error.
        table.insert(scope, symbol)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installs_full_roster_including_range_overload() {
        let (mut table, root) = SymbolTable::new();
        let types = TypeRegistry::new();
        install(&mut table, root, &types).unwrap();

        let names: Vec<_> = table.iter_scope(root).map(|e| e.name.clone()).collect();
        assert_eq!(names.iter().filter(|n| n.as_str() == "range").count(), 2);
        for expected in ["log", "panic", "exit", "args", "infinite", "len"] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[test]
    fn predeclared_entries_are_flagged() {
        let (mut table, root) = SymbolTable::new();
        let types = TypeRegistry::new();
        install(&mut table, root, &types).unwrap();
        assert!(table.lookup(root, "log").unwrap().is_predeclared);
    }
}
