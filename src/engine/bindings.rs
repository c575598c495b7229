// src/engine/bindings.rs
//! Union-find over variable ids with a value trail for backtracking.

use std::collections::HashMap;

use crate::engine::term::{Term, VarId};

/// Records a variable's binding before it was overwritten, so `undo` can
/// reinstate it. `old` is `None` when the variable was unbound.
#[derive(Debug, Clone)]
pub struct TrailEntry {
    pub var: VarId,
    pub old: Option<Term>,
}

/// A checkpoint is a trail length. Checkpoints obey stack discipline:
/// undoing to one invalidates every checkpoint taken after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// The binding environment of a single query: a forest of variable ids
/// whose roots are either unbound or point at a non-variable term.
///
/// Every mutation of `parent` is recorded on the trail, including the
/// pointer redirections made by path compression, so `undo` restores the
/// environment exactly.
#[derive(Debug, Default)]
pub struct Bindings {
    parent: HashMap<VarId, Term>,
    trail: Vec<TrailEntry>,
    occurs_check: bool,
}

impl Bindings {
    pub fn new() -> Self {
        Self {
            parent: HashMap::new(),
            trail: Vec::new(),
            occurs_check: true,
        }
    }

    /// Disabling the occurs check trades soundness on cyclic terms for
    /// speed. Defaults to enabled.
    pub fn set_occurs_check(&mut self, enabled: bool) {
        self.occurs_check = enabled;
    }

    pub fn occurs_check(&self) -> bool {
        self.occurs_check
    }

    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    /// Walks the parent chain of `v` to its representative: an unbound
    /// root variable or a non-variable term. Intermediate links are
    /// re-pointed at the representative, each redirection trailed.
    pub fn find(&mut self, v: VarId) -> Term {
        let mut path = Vec::new();
        let mut cur = v;
        let rep = loop {
            match self.parent.get(&cur) {
                None => break Term::Var(cur),
                Some(Term::Var(next)) => {
                    path.push(cur);
                    cur = *next;
                }
                Some(term) => break term.clone(),
            }
        };
        // Compress chains of length > 1.
        if path.len() > 1 {
            for &link in &path {
                if Term::Var(link) == rep {
                    continue;
                }
                let old = self.parent.insert(link, rep.clone());
                self.trail.push(TrailEntry { var: link, old });
            }
        }
        rep
    }

    /// Resolves a term one step: variables dereference through `find`,
    /// everything else is returned as is.
    pub fn resolve(&mut self, term: &Term) -> Term {
        match term {
            Term::Var(v) => self.find(*v),
            _ => term.clone(),
        }
    }

    /// Fully dereferences a term, rebuilding compounds so that no bound
    /// variable remains anywhere inside.
    pub fn resolve_deep(&mut self, term: &Term) -> Term {
        let resolved = self.resolve(term);
        match resolved {
            Term::Compound(functor, args) => {
                let args = args.iter().map(|a| self.resolve_deep(a)).collect();
                Term::Compound(functor, args)
            }
            other => other,
        }
    }

    /// Binds root variable `var` to `term`, recording the old state on the
    /// trail. Callers must pass a representative (`find` result) and never
    /// the variable itself as `term`.
    pub fn bind(&mut self, var: VarId, term: Term) {
        debug_assert!(!matches!(term, Term::Var(v) if v == var));
        let old = self.parent.insert(var, term);
        self.trail.push(TrailEntry { var, old });
    }

    /// Takes a checkpoint of the current trail position.
    pub fn mark(&self) -> Checkpoint {
        Checkpoint(self.trail.len())
    }

    /// Rewinds the trail to `cp`, reinstating every overwritten binding.
    pub fn undo(&mut self, cp: Checkpoint) {
        while self.trail.len() > cp.0 {
            if let Some(entry) = self.trail.pop() {
                match entry.old {
                    Some(old) => {
                        self.parent.insert(entry.var, old);
                    }
                    None => {
                        self.parent.remove(&entry.var);
                    }
                }
            }
        }
    }
}
