//! Import resolver `I` — deduplicates imports by textual path, allocates a
//! placeholder module scope, and binds an alias to it.
//!
//! Canonicalization (resolving `./foo` vs `foo/bar/../foo` to the same
//! path) is a collaborator's responsibility; this module compares paths as
//! written.

use crate::analyzer::ast::SourceLocation;
use crate::analyzer::diagnostics::Diagnostic;
use crate::analyzer::symbol_table::{ScopeId, SymbolTable};
use crate::error::ErrorKind;

/// One accepted import: its path and the location of the `import`
/// statement that introduced it.
#[derive(Debug, Clone)]
pub struct ImportRecord {
    pub path: String,
    pub location: SourceLocation,
}

/// Tracks accepted imports for duplicate detection across an analysis run.
pub struct ImportResolver {
    // Starts at 16 and grows geometrically — `Vec`'s amortized-doubling
    // growth already gives us this; no manual capacity dance needed.
    imports: Vec<ImportRecord>,
}

impl ImportResolver {
    pub fn new() -> Self {
        ImportResolver {
            imports: Vec::with_capacity(16),
        }
    }

    pub fn imports(&self) -> &[ImportRecord] {
        &self.imports
    }

    /// Resolves one `import` declaration.
    ///
    /// 1. Rejects a path equal to a previously imported path, citing the
    ///    earlier location.
    /// 2. Appends `{path, location}` to the import list.
    /// 3. If `alias` is present, allocates a fresh placeholder module
    ///    scope and binds it via [`SymbolTable::add_alias`]; on an
    ///    alias-name collision the placeholder scope is left unreachable
    ///    (this table has no scope-removal operation — see `DESIGN.md`)
    ///    and the collision is reported.
    pub fn analyze_import(
        &mut self,
        table: &mut SymbolTable,
        current_scope: ScopeId,
        path: &str,
        alias: Option<&str>,
        location: SourceLocation,
        file: &str,
    ) -> Result<Option<ScopeId>, Diagnostic> {
        if let Some(previous) = self.imports.iter().find(|r| r.path == path) {
            return Err(Diagnostic::error(
                ErrorKind::DuplicateSymbol(path.to_string()),
                format!(
                    "duplicate import of '{}', first imported at line {}",
                    path, previous.location.line
                ),
            )
            .at(file, location));
        }

        self.imports.push(ImportRecord {
            path: path.to_string(),
            location,
        });

        let Some(alias) = alias else {
            return Ok(None);
        };

        let module_scope = table.new_scope(current_scope);
        match table.add_alias(current_scope, alias, module_scope) {
            Ok(()) => Ok(Some(module_scope)),
            Err(kind) => Err(Diagnostic::error(
                kind,
                format!("alias '{alias}' already bound in this scope"),
            )
            .at(file, location)),
        }
    }
}

impl Default for ImportResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::symbol_table::SymbolTable;

    #[test]
    fn s6_duplicate_import_cites_first_location() {
        let (mut table, root) = SymbolTable::new();
        let mut resolver = ImportResolver::new();
        resolver
            .analyze_import(&mut table, root, "std/io", None, SourceLocation::new(3, 1), "main.lang")
            .unwrap();
        let err = resolver
            .analyze_import(&mut table, root, "std/io", None, SourceLocation::new(7, 1), "main.lang")
            .unwrap_err();
        assert_eq!(resolver.imports().len(), 1);
        assert!(err.message.contains("line 3"));
    }

    #[test]
    fn aliased_import_binds_a_module_scope() {
        let (mut table, root) = SymbolTable::new();
        let mut resolver = ImportResolver::new();
        let module_scope = resolver
            .analyze_import(
                &mut table,
                root,
                "std/io",
                Some("io"),
                SourceLocation::new(1, 1),
                "main.lang",
            )
            .unwrap();
        assert!(module_scope.is_some());
        assert!(table.resolve_alias_member(root, "io", "anything").is_none());
    }

    #[test]
    fn alias_collision_is_reported() {
        let (mut table, root) = SymbolTable::new();
        let mut resolver = ImportResolver::new();
        resolver
            .analyze_import(&mut table, root, "std/io", Some("io"), SourceLocation::new(1, 1), "main.lang")
            .unwrap();
        let err = resolver
            .analyze_import(&mut table, root, "std/fmt", Some("io"), SourceLocation::new(2, 1), "main.lang")
            .unwrap_err();
        assert!(err.message.contains("already bound"));
    }
}
