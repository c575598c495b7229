// src/engine/builtins.rs
//! Structural built-in predicates: term inspection and construction.
//!
//! The solver dispatches here for the predicates that examine or rebuild
//! terms without touching the clause database.

use log::debug;

use crate::engine::bindings::Bindings;
use crate::engine::database::Clause;
use crate::engine::term::{Number, Term, VarGen};
use crate::engine::unify::unify;

/// `var/1`, `nonvar/1`, `atom/1`, `number/1` type tests.
pub fn type_test(name: &str, arg: &Term, env: &mut Bindings) -> bool {
    let resolved = env.resolve(arg);
    match name {
        "var" => matches!(resolved, Term::Var(_)),
        "nonvar" => !matches!(resolved, Term::Var(_)),
        "atom" => matches!(resolved, Term::Atom(_)),
        "number" => matches!(resolved, Term::Number(_)),
        _ => false,
    }
}

/// `functor(Term, Name, Arity)`: decomposes a bound term, or constructs
/// one with fresh arguments from a bound name/arity pair.
pub fn functor(args: &[Term], env: &mut Bindings, vars: &mut VarGen) -> bool {
    let term = env.resolve(&args[0]);
    match term {
        Term::Compound(ref functor, ref t_args) => {
            let name = Term::atom(functor);
            let arity = Term::int(t_args.len() as i64);
            unify(&args[1], &name, env) && unify(&args[2], &arity, env)
        }
        Term::Atom(ref name) => {
            let name = Term::atom(name);
            unify(&args[1], &name, env) && unify(&args[2], &Term::int(0), env)
        }
        Term::Number(_) | Term::Str(_) => {
            unify(&args[1], &term, env) && unify(&args[2], &Term::int(0), env)
        }
        Term::Var(_) => {
            let name = env.resolve(&args[1]);
            let arity = env.resolve(&args[2]);
            match (name, arity) {
                (Term::Atom(functor), Term::Number(Number::Int(n))) if n > 0 => {
                    let fresh_args = (0..n).map(|_| Term::Var(vars.fresh())).collect();
                    unify(&term, &Term::Compound(functor, fresh_args), env)
                }
                (Term::Atom(functor), Term::Number(Number::Int(0))) => {
                    unify(&term, &Term::Atom(functor), env)
                }
                (atomic @ (Term::Number(_) | Term::Str(_)), Term::Number(Number::Int(0))) => {
                    unify(&term, &atomic, env)
                }
                (name, arity) => {
                    debug!("functor/3: cannot construct from {} and {}", name, arity);
                    false
                }
            }
        }
    }
}

/// `arg(N, Term, Arg)`: the N-th argument (1-based) of a compound.
pub fn arg(args: &[Term], env: &mut Bindings) -> bool {
    let index = env.resolve(&args[0]);
    let term = env.resolve(&args[1]);
    match (index, term) {
        (Term::Number(Number::Int(n)), Term::Compound(_, t_args)) if n >= 1 => {
            match t_args.get(n as usize - 1) {
                Some(selected) => unify(&args[2], selected, env),
                None => false,
            }
        }
        _ => false,
    }
}

/// `Term =.. List`: decomposes a term into `[Functor|Args]`, or builds a
/// term from a proper list.
pub fn univ(args: &[Term], env: &mut Bindings) -> bool {
    let term = env.resolve(&args[0]);
    match term {
        Term::Compound(functor, t_args) => {
            let mut elems = vec![Term::Atom(functor)];
            elems.extend(t_args);
            unify(&args[1], &Term::list(elems, None), env)
        }
        Term::Atom(_) | Term::Number(_) | Term::Str(_) => {
            unify(&args[1], &Term::list(vec![term], None), env)
        }
        Term::Var(_) => {
            let list = env.resolve_deep(&args[1]);
            let Some(items) = list_to_vec(&list) else {
                debug!("=../2: {} is not a proper list", list);
                return false;
            };
            match items.split_first() {
                Some((Term::Atom(functor), rest)) if !rest.is_empty() => {
                    let built = Term::Compound(functor.clone(), rest.to_vec());
                    unify(&term, &built, env)
                }
                Some((atomic, [])) => unify(&term, atomic, env),
                _ => false,
            }
        }
    }
}

/// Converts a `'.'/2` chain into a vector; `None` unless the chain is a
/// proper list ending in `[]`.
pub fn list_to_vec(term: &Term) -> Option<Vec<Term>> {
    let mut items = Vec::new();
    let mut rest = term;
    loop {
        match rest {
            Term::Atom(name) if name == "[]" => return Some(items),
            Term::Compound(functor, args) if functor == "." && args.len() == 2 => {
                items.push(args[0].clone());
                rest = &args[1];
            }
            _ => return None,
        }
    }
}

/// Interprets an asserted term as a clause: `':-'/2` splits into head and
/// body, any other callable term is a fact. Returns `None` for terms that
/// cannot head a clause.
pub fn clause_from_term(term: Term) -> Option<Clause> {
    match term {
        Term::Compound(functor, mut args) if functor == ":-" && args.len() == 2 => {
            let body = args.pop()?;
            let head = args.pop()?;
            head.functor_arity()?;
            Some(Clause::rule(head, body))
        }
        head @ (Term::Atom(_) | Term::Compound(..)) => Some(Clause::fact(head)),
        _ => None,
    }
}
