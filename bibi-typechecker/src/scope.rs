//! Scope Store: the chain of lexical scopes shared by the checker and the evaluator
//!
//! The global scope sits at the bottom of the stack and lives as long as the
//! store. Every other scope is pushed on entry to a construct (function
//! activation, block, loop body, branch, guarded or recovery block) and popped
//! on exit. Lookups walk from the innermost scope outwards, stopping at the
//! nearest function activation and then jumping to the global scope, so a
//! function body never sees its caller's locals.

use crate::symbol::{Symbol, SymbolUpdate};
use indexmap::IndexMap;
use std::collections::VecDeque;
use thiserror::Error;

pub type ScopeId = usize;

/// Default number of closed scopes kept in the history side table
pub const DEFAULT_HISTORY_LIMIT: usize = 4096;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScopeError {
    #[error("'{name}' is already declared in scope '{scope}'")]
    DuplicateDefinition { name: String, scope: String },

    #[error("'{name}' is not defined")]
    NotFound { name: String },

    #[error("Cannot update undefined symbol '{name}'")]
    UndefinedSymbol { name: String },

    #[error("Record '{record}' has no field '{field}'")]
    FieldNotFound { record: String, field: String },

    #[error("Cannot apply this update to {kind} '{name}'")]
    InvalidUpdate { name: String, kind: &'static str },

    #[error("Cannot pop the global scope")]
    CannotPopGlobal,
}

/// Construct a scope was opened for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    /// Function activation; bounds name resolution
    Function,
    Block,
    Loop,
    Branch,
    Guarded,
    Recovery,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub name: String,
    pub kind: ScopeKind,
    symbols: IndexMap<String, Symbol>,
}

impl Scope {
    fn new(id: ScopeId, name: String, kind: ScopeKind) -> Self {
        Self {
            id,
            name,
            kind,
            symbols: IndexMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn symbols(&self) -> impl Iterator<Item = (&String, &Symbol)> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Introspection record for a scope, kept after it is popped
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeRecord {
    pub id: ScopeId,
    pub name: String,
    pub kind: ScopeKind,
    pub depth: usize,
    /// Names defined in the scope, filled in when it closes
    pub symbols: Vec<String>,
    pub closed: bool,
}

#[derive(Debug, Clone)]
pub struct ScopeStore {
    scopes: Vec<Scope>,
    history: VecDeque<ScopeRecord>,
    history_limit: usize,
    next_id: ScopeId,
}

impl Default for ScopeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStore {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        let mut store = Self {
            scopes: Vec::new(),
            history: VecDeque::new(),
            history_limit,
            next_id: 0,
        };
        store.push("global", ScopeKind::Global);
        store
    }

    /// Open a new innermost scope
    pub fn push(&mut self, name: impl Into<String>, kind: ScopeKind) -> ScopeId {
        let id = self.next_id;
        self.next_id += 1;
        let name = name.into();
        tracing::trace!(scope = %name, ?kind, depth = self.scopes.len(), "push scope");

        self.record(ScopeRecord {
            id,
            name: name.clone(),
            kind,
            depth: self.scopes.len(),
            symbols: Vec::new(),
            closed: false,
        });
        self.scopes.push(Scope::new(id, name, kind));
        id
    }

    /// Close the innermost scope; the global scope cannot be popped
    pub fn pop(&mut self) -> Result<Scope, ScopeError> {
        if self.scopes.len() <= 1 {
            return Err(ScopeError::CannotPopGlobal);
        }
        let scope = self.scopes.pop().ok_or(ScopeError::CannotPopGlobal)?;
        tracing::trace!(scope = %scope.name, depth = self.scopes.len(), "pop scope");
        self.close_record(&scope);
        Ok(scope)
    }

    /// Pop scopes until `depth` remain (never below the global scope)
    pub fn truncate(&mut self, depth: usize) {
        while self.scopes.len() > depth.max(1) {
            if self.pop().is_err() {
                break;
            }
        }
    }

    /// Drop every scope except the global one
    pub fn reset_to_global(&mut self) {
        self.truncate(1);
    }

    /// Number of active scopes, including the global scope
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_global(&self) -> bool {
        self.scopes.len() == 1
    }

    pub fn current(&self) -> &Scope {
        // The global scope is never popped
        &self.scopes[self.scopes.len() - 1]
    }

    pub fn global(&self) -> &Scope {
        &self.scopes[0]
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Define `name` in the innermost scope
    pub fn define(&mut self, name: impl Into<String>, symbol: Symbol) -> Result<(), ScopeError> {
        let index = self.scopes.len() - 1;
        self.define_at(index, name.into(), symbol)
    }

    /// Define `name` in the global scope regardless of the current depth
    pub fn define_global(
        &mut self,
        name: impl Into<String>,
        symbol: Symbol,
    ) -> Result<(), ScopeError> {
        self.define_at(0, name.into(), symbol)
    }

    fn define_at(&mut self, index: usize, name: String, symbol: Symbol) -> Result<(), ScopeError> {
        let scope = &mut self.scopes[index];
        if scope.symbols.contains_key(&name) {
            return Err(ScopeError::DuplicateDefinition {
                name,
                scope: scope.name.clone(),
            });
        }
        scope.symbols.insert(name, symbol);
        Ok(())
    }

    /// Remove a global symbol, returning it if present
    pub fn remove_global(&mut self, name: &str) -> Option<Symbol> {
        self.scopes[0].symbols.shift_remove(name)
    }

    /// Find the symbol visible under `name`
    pub fn lookup(&self, name: &str) -> Result<&Symbol, ScopeError> {
        self.resolve(name)
            .and_then(|index| self.scopes[index].symbols.get(name))
            .ok_or_else(|| ScopeError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn lookup_mut(&mut self, name: &str) -> Result<&mut Symbol, ScopeError> {
        match self.resolve(name) {
            Some(index) => self.scopes[index]
                .symbols
                .get_mut(name)
                .ok_or_else(|| ScopeError::NotFound {
                    name: name.to_string(),
                }),
            None => Err(ScopeError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Kind of the scope holding the definition `name` resolves to
    pub fn resolving_kind(&self, name: &str) -> Option<ScopeKind> {
        self.resolve(name).map(|index| self.scopes[index].kind)
    }

    /// Merge `update` into the nearest visible definition of `name`
    pub fn update(&mut self, name: &str, update: SymbolUpdate) -> Result<(), ScopeError> {
        let symbol = self
            .lookup_mut(name)
            .map_err(|_| ScopeError::UndefinedSymbol {
                name: name.to_string(),
            })?;

        match (symbol, update) {
            (Symbol::Variable { value, .. }, SymbolUpdate::Value(new_value)) => {
                *value = new_value;
                Ok(())
            }
            (Symbol::RecordInstance(instance), SymbolUpdate::Field { name: field, value }) => {
                match instance.fields.get_mut(&field) {
                    Some(slot) => {
                        slot.value = value;
                        Ok(())
                    }
                    None => Err(ScopeError::FieldNotFound {
                        record: name.to_string(),
                        field,
                    }),
                }
            }
            (symbol, _) => Err(ScopeError::InvalidUpdate {
                name: name.to_string(),
                kind: symbol.kind_name(),
            }),
        }
    }

    /// Index of the scope that defines the visible `name`
    fn resolve(&self, name: &str) -> Option<usize> {
        for index in (0..self.scopes.len()).rev() {
            let scope = &self.scopes[index];
            if scope.symbols.contains_key(name) {
                return Some(index);
            }
            if scope.kind == ScopeKind::Function {
                break;
            }
        }
        self.scopes[0].symbols.contains_key(name).then_some(0)
    }

    /// Records of every scope pushed, oldest first, bounded by the history limit
    pub fn history(&self) -> impl Iterator<Item = &ScopeRecord> {
        self.history.iter()
    }

    fn record(&mut self, record: ScopeRecord) {
        if self.history_limit == 0 {
            return;
        }
        while self.history.len() >= self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(record);
    }

    fn close_record(&mut self, scope: &Scope) {
        if let Some(record) = self.history.iter_mut().rev().find(|r| r.id == scope.id) {
            record.symbols = scope.symbols.keys().cloned().collect();
            record.closed = true;
        }
    }

    /// Render the active scopes, innermost last
    pub fn describe(&self) -> String {
        let mut lines = Vec::new();
        for (depth, scope) in self.scopes.iter().enumerate() {
            let indent = "  ".repeat(depth);
            lines.push(format!("{indent}[{}] {:?}", scope.name, scope.kind));
            for (name, symbol) in &scope.symbols {
                lines.push(format!("{indent}  {name}: {symbol}"));
            }
        }
        lines.join("\n")
    }
}
