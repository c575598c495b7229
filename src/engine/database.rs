// src/engine/database.rs
//! The clause database: an ordered store of facts and rules.

use std::collections::HashMap;

use log::debug;

use crate::engine::bindings::Bindings;
use crate::engine::term::{Term, VarGen, VarId};
use crate::engine::unify::unify;

/// A fact (`body == None`) or a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub head: Term,
    pub body: Option<Term>,
}

impl Clause {
    pub fn fact(head: Term) -> Self {
        Clause { head, body: None }
    }

    pub fn rule(head: Term, body: Term) -> Self {
        Clause { head, body: Some(body) }
    }
}

/// Stable identifier of a stored clause. Ids survive database mutation, so
/// a candidate list snapshotted at call time simply skips ids that have
/// been retracted since (logical update view).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseId(u64);

#[derive(Debug)]
struct StoredClause {
    id: ClauseId,
    clause: Clause,
}

/// Ordered clause store. `asserta` prepends, `assertz` appends; candidate
/// enumeration follows definition order.
#[derive(Debug, Default)]
pub struct Database {
    clauses: Vec<StoredClause>,
    next_id: u64,
}

impl Database {
    pub fn new() -> Self {
        Self {
            clauses: Vec::new(),
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    fn mint_id(&mut self) -> ClauseId {
        let id = ClauseId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Appends a clause; the `assertz` primitive.
    pub fn add_last(&mut self, clause: Clause) -> ClauseId {
        let id = self.mint_id();
        self.clauses.push(StoredClause { id, clause });
        id
    }

    /// Prepends a clause; the `asserta` primitive.
    pub fn add_first(&mut self, clause: Clause) -> ClauseId {
        let id = self.mint_id();
        self.clauses.insert(0, StoredClause { id, clause });
        id
    }

    pub fn get(&self, id: ClauseId) -> Option<&Clause> {
        self.clauses
            .iter()
            .find(|stored| stored.id == id)
            .map(|stored| &stored.clause)
    }

    /// Clause ids whose head matches the predicate indicator, in
    /// definition order.
    pub fn candidates(&self, functor: &str, arity: usize) -> Vec<ClauseId> {
        self.clauses
            .iter()
            .filter(|stored| {
                stored.clause.head.functor_arity() == Some((functor, arity))
            })
            .map(|stored| stored.id)
            .collect()
    }

    /// Removes the first clause whose renamed copy unifies with
    /// `template`; the `retract` primitive. A `':-'/2` template matches
    /// head and body, anything else matches heads only. Trial unification
    /// happens in a throwaway environment so the caller's bindings are
    /// untouched.
    pub fn remove_first_matching(&mut self, template: &Term, vars: &mut VarGen) -> bool {
        let (head_pat, body_pat) = match template {
            Term::Compound(functor, args) if functor == ":-" && args.len() == 2 => {
                (&args[0], Some(&args[1]))
            }
            other => (other, None),
        };
        let position = self.clauses.iter().position(|stored| {
            let renamed = rename_clause(&stored.clause, vars);
            let mut scratch = Bindings::new();
            if !unify(head_pat, &renamed.head, &mut scratch) {
                return false;
            }
            match body_pat {
                None => true,
                Some(pat) => {
                    let body = renamed.body.unwrap_or_else(|| Term::atom("true"));
                    unify(pat, &body, &mut scratch)
                }
            }
        });
        match position {
            Some(index) => {
                let removed = self.clauses.remove(index);
                debug!("retracted clause {}", removed.clause.head);
                true
            }
            None => false,
        }
    }
}

/// Produces a fresh renaming of a clause: every variable is mapped to a
/// newly minted id, consistently within the clause instance. Rename
/// tables never leak between instances.
pub fn rename_clause(clause: &Clause, vars: &mut VarGen) -> Clause {
    let mut mapping = HashMap::new();
    Clause {
        head: rename_term(&clause.head, &mut mapping, vars),
        body: clause
            .body
            .as_ref()
            .map(|body| rename_term(body, &mut mapping, vars)),
    }
}

pub(crate) fn rename_term(
    term: &Term,
    mapping: &mut HashMap<VarId, VarId>,
    vars: &mut VarGen,
) -> Term {
    match term {
        Term::Var(id) => {
            let fresh = *mapping.entry(*id).or_insert_with(|| vars.fresh());
            Term::Var(fresh)
        }
        Term::Compound(functor, args) => {
            let args = args
                .iter()
                .map(|arg| rename_term(arg, mapping, vars))
                .collect();
            Term::Compound(functor.clone(), args)
        }
        other => other.clone(),
    }
}
