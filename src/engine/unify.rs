// src/engine/unify.rs
//! Structural unification of two terms under a binding environment.

use log::trace;

use crate::engine::bindings::Bindings;
use crate::engine::term::{Term, VarId};

/// Attempts to make `t1` and `t2` syntactically identical by binding
/// variables in `env`. Returns whether unification succeeded.
///
/// On failure the environment is left with whatever bindings were made
/// before the mismatch; callers bracket the call with `mark`/`undo`.
pub fn unify(t1: &Term, t2: &Term, env: &mut Bindings) -> bool {
    let r1 = env.resolve(t1);
    let r2 = env.resolve(t2);
    trace!("unify {} with {}", r1, r2);

    match (&r1, &r2) {
        (Term::Atom(a), Term::Atom(b)) => a == b,
        // Int and Float are distinct even when numerically equal.
        (Term::Number(a), Term::Number(b)) => a == b,
        (Term::Str(a), Term::Str(b)) => a == b,
        (Term::Var(v1), Term::Var(v2)) => {
            if v1 == v2 {
                true
            } else {
                env.bind(*v1, r2);
                true
            }
        }
        (Term::Var(v), _) => bind_checked(*v, r2, env),
        (_, Term::Var(v)) => bind_checked(*v, r1, env),
        (Term::Compound(f1, args1), Term::Compound(f2, args2)) => {
            if f1 != f2 || args1.len() != args2.len() {
                return false;
            }
            args1.iter().zip(args2.iter()).all(|(a, b)| unify(a, b, env))
        }
        _ => false,
    }
}

/// Binds `v` to `term` after the occurs check (when enabled).
fn bind_checked(v: VarId, term: Term, env: &mut Bindings) -> bool {
    if env.occurs_check() && occurs(v, &term, env) {
        trace!("occurs check failed: _G{} in {}", v, term);
        return false;
    }
    env.bind(v, term);
    true
}

/// Whether variable `v` occurs anywhere inside `term` under `env`.
pub fn occurs(v: VarId, term: &Term, env: &mut Bindings) -> bool {
    match env.resolve(term) {
        Term::Var(other) => other == v,
        Term::Compound(_, args) => args.iter().any(|arg| occurs(v, arg, env)),
        _ => false,
    }
}
