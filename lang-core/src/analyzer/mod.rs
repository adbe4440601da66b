//! Semantic analyzer substrate: the scope stack, symbol table, predeclared
//! roster, import resolver, and running statistics a front end drives while
//! walking an AST. No parser or full type checker lives here — only the
//! bookkeeping those stages share.

pub mod ast;
pub mod diagnostics;
pub mod imports;
pub mod predeclared;
pub mod symbol_table;

use ast::SourceLocation;
use diagnostics::{Diagnostic, DiagnosticSink, Severity};
use imports::ImportResolver;
use symbol_table::{InsertOutcome, ScopeId, SymbolEntry, SymbolTable};

use crate::safety::SafetyConfig;
use crate::types::TypeRegistry;

/// Running counters a caller can inspect after a walk, per §7's
/// end-of-analysis summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalysisStats {
    pub nodes_analyzed: u64,
    pub types_checked: u64,
    pub errors: u64,
    pub warnings: u64,
    pub max_scope_depth: u32,
}

/// Owns the symbol table, import resolver, and accumulated diagnostics for
/// one analysis run. There is deliberately no global singleton here — a
/// caller analyzing two compilation units concurrently constructs two
/// `Analyzer`s, each with its own `SafetyConfig`.
pub struct Analyzer {
    table: SymbolTable,
    root_scope: ScopeId,
    scope_stack: Vec<ScopeId>,
    types: TypeRegistry,
    imports: ImportResolver,
    diagnostics: Vec<Diagnostic>,
    stats: AnalysisStats,
    safety_config: SafetyConfig,
}

impl Analyzer {
    pub fn new(safety_config: SafetyConfig) -> Result<Self, crate::error::ErrorKind> {
        let (mut table, root_scope) = SymbolTable::new();
        let types = TypeRegistry::new();
        predeclared::install(&mut table, root_scope, &types)?;

        Ok(Analyzer {
            table,
            root_scope,
            scope_stack: vec![root_scope],
            types,
            imports: ImportResolver::new(),
            diagnostics: Vec::new(),
            stats: AnalysisStats::default(),
            safety_config,
        })
    }

    pub fn safety_config(&self) -> &SafetyConfig {
        &self.safety_config
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn stats(&self) -> AnalysisStats {
        self.stats
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The innermost scope currently being analyzed.
    pub fn current_scope(&self) -> ScopeId {
        *self.scope_stack.last().expect("scope stack is never empty")
    }

    /// Pushes a fresh child of the current scope and returns it.
    pub fn enter_scope(&mut self) -> ScopeId {
        let child = self.table.new_scope(self.current_scope());
        self.scope_stack.push(child);
        self.stats.max_scope_depth = self.stats.max_scope_depth.max(self.scope_stack.len() as u32);
        child
    }

    /// Pops the innermost scope. The root scope is never popped.
    pub fn exit_scope(&mut self) {
        if self.scope_stack.len() > 1 {
            self.scope_stack.pop();
        }
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.stats.errors += 1,
            Severity::Warning => self.stats.warnings += 1,
        }
        self.diagnostics.push(diagnostic);
    }

    /// Declares a symbol in the current scope, reporting
    /// `DuplicateSymbol` as an error diagnostic on conflict and a
    /// predeclared shadow as a warning.
    pub fn declare(&mut self, entry: SymbolEntry, file: &str) {
        self.stats.nodes_analyzed += 1;
        let scope = self.current_scope();
        let name = entry.name.clone();
        let location = entry.declaration_site;
        match self.table.insert(scope, entry) {
            Ok(InsertOutcome::Inserted) => {}
            Ok(InsertOutcome::ShadowedPredeclared) => {
                self.record(
                    Diagnostic::warning(
                        crate::error::ErrorKind::DuplicateSymbol(name.clone()),
                        format!("declaration of '{name}' shadows a predeclared identifier"),
                    )
                    .at(file, location),
                );
            }
            Err(kind) => {
                self.record(
                    Diagnostic::error(kind, format!("'{name}' is already declared in this scope"))
                        .at(file, location),
                );
            }
        }
    }

    /// Resolves one `import` declaration against the import resolver.
    pub fn analyze_import(
        &mut self,
        path: &str,
        alias: Option<&str>,
        location: SourceLocation,
        file: &str,
    ) {
        self.stats.nodes_analyzed += 1;
        let scope = self.current_scope();
        if let Err(diagnostic) =
            self.imports
                .analyze_import(&mut self.table, scope, path, alias, location, file)
        {
            self.record(diagnostic);
        }
    }

    pub fn imports(&self) -> &[imports::ImportRecord] {
        self.imports.imports()
    }

    pub fn note_type_checked(&mut self) {
        self.stats.types_checked += 1;
    }
}

impl DiagnosticSink for std::sync::Mutex<Vec<Diagnostic>> {
    fn report(&self, diagnostic: Diagnostic) {
        self.lock().expect("diagnostic sink mutex poisoned").push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symbol_table::SymbolKind;

    #[test]
    fn predeclared_roster_is_installed_at_construction() {
        let analyzer = Analyzer::new(SafetyConfig::debug()).unwrap();
        assert!(analyzer.table().lookup(analyzer.root_scope, "log").is_some());
    }

    #[test]
    fn declaring_a_duplicate_increments_error_count() {
        let mut analyzer = Analyzer::new(SafetyConfig::debug()).unwrap();
        let loc = SourceLocation::new(1, 1);
        analyzer.declare(
            SymbolEntry::new("x", SymbolKind::Variable, 0, loc),
            "main.lang",
        );
        analyzer.declare(
            SymbolEntry::new("x", SymbolKind::Variable, 0, loc),
            "main.lang",
        );
        assert_eq!(analyzer.stats().errors, 1);
    }

    #[test]
    fn shadowing_a_predeclared_name_is_a_warning_not_an_error() {
        let mut analyzer = Analyzer::new(SafetyConfig::debug()).unwrap();
        analyzer.declare(
            SymbolEntry::new("log", SymbolKind::Function, 99, SourceLocation::new(2, 1)),
            "main.lang",
        );
        assert_eq!(analyzer.stats().warnings, 1);
        assert_eq!(analyzer.stats().errors, 0);
    }

    #[test]
    fn scope_stack_tracks_depth() {
        let mut analyzer = Analyzer::new(SafetyConfig::debug()).unwrap();
        analyzer.enter_scope();
        analyzer.enter_scope();
        assert_eq!(analyzer.stats().max_scope_depth, 3);
        analyzer.exit_scope();
        assert_ne!(analyzer.current_scope(), analyzer.root_scope);
    }

    #[test]
    fn s6_duplicate_import_is_recorded_as_a_diagnostic() {
        let mut analyzer = Analyzer::new(SafetyConfig::debug()).unwrap();
        analyzer.analyze_import("std/io", None, SourceLocation::new(3, 1), "main.lang");
        analyzer.analyze_import("std/io", None, SourceLocation::new(7, 1), "main.lang");
        assert_eq!(analyzer.imports().len(), 1);
        assert_eq!(analyzer.diagnostics().len(), 1);
    }
}
