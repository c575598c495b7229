use hornlog::bindings::Bindings;
use hornlog::term::Term;
use hornlog::unify::{occurs, unify};

#[test]
fn test_identical_atoms_unify() {
    let mut env = Bindings::new();
    assert!(unify(&Term::atom("a"), &Term::atom("a"), &mut env));
    assert!(!unify(&Term::atom("a"), &Term::atom("b"), &mut env));
}

#[test]
fn test_numbers_unify_by_variant_and_value() {
    let mut env = Bindings::new();
    assert!(unify(&Term::int(1), &Term::int(1), &mut env));
    assert!(!unify(&Term::int(1), &Term::int(2), &mut env));
    // The reference behavior distinguishes 1 from 1.0.
    assert!(!unify(&Term::int(1), &Term::float(1.0), &mut env));
    assert!(unify(&Term::float(2.5), &Term::float(2.5), &mut env));
}

#[test]
fn test_strings_unify_by_value() {
    let mut env = Bindings::new();
    assert!(unify(
        &Term::Str("hi".to_string()),
        &Term::Str("hi".to_string()),
        &mut env
    ));
    assert!(!unify(
        &Term::Str("hi".to_string()),
        &Term::atom("hi"),
        &mut env
    ));
}

#[test]
fn test_variable_binds_to_term() {
    let mut env = Bindings::new();
    assert!(unify(&Term::Var(0), &Term::atom("a"), &mut env));
    assert_eq!(env.resolve(&Term::Var(0)), Term::atom("a"));
}

#[test]
fn test_variable_variable_aliasing() {
    let mut env = Bindings::new();
    assert!(unify(&Term::Var(0), &Term::Var(1), &mut env));
    assert!(unify(&Term::Var(1), &Term::atom("shared"), &mut env));
    assert_eq!(env.resolve(&Term::Var(0)), Term::atom("shared"));
}

#[test]
fn test_compound_unification_binds_argwise() {
    let mut env = Bindings::new();
    let goal = Term::compound("f", vec![Term::Var(0), Term::atom("b")]);
    let head = Term::compound("f", vec![Term::atom("a"), Term::Var(1)]);
    assert!(unify(&goal, &head, &mut env));
    assert_eq!(env.resolve(&Term::Var(0)), Term::atom("a"));
    assert_eq!(env.resolve(&Term::Var(1)), Term::atom("b"));
}

#[test]
fn test_functor_or_arity_mismatch_fails() {
    let mut env = Bindings::new();
    let f1 = Term::compound("f", vec![Term::int(1)]);
    let g1 = Term::compound("g", vec![Term::int(1)]);
    let f2 = Term::compound("f", vec![Term::int(1), Term::int(2)]);
    assert!(!unify(&f1, &g1, &mut env));
    assert!(!unify(&f1, &f2, &mut env));
}

#[test]
fn test_unify_commutes() {
    let lhs = Term::compound("f", vec![Term::Var(0), Term::atom("b")]);
    let rhs = Term::compound("f", vec![Term::atom("a"), Term::Var(1)]);

    let mut env1 = Bindings::new();
    assert!(unify(&lhs, &rhs, &mut env1));
    let mut env2 = Bindings::new();
    assert!(unify(&rhs, &lhs, &mut env2));

    for id in 0..2 {
        assert_eq!(env1.resolve(&Term::Var(id)), env2.resolve(&Term::Var(id)));
    }
}

#[test]
fn test_occurs_check_rejects_cyclic_binding() {
    let mut env = Bindings::new();
    let cyclic = Term::compound("f", vec![Term::Var(0)]);
    assert!(!unify(&Term::Var(0), &cyclic, &mut env));
    assert_eq!(env.resolve(&Term::Var(0)), Term::Var(0));
}

#[test]
fn test_occurs_check_sees_through_bindings() {
    let mut env = Bindings::new();
    assert!(unify(&Term::Var(1), &Term::Var(0), &mut env));
    let cyclic = Term::compound("f", vec![Term::Var(1)]);
    assert!(occurs(0, &cyclic, &mut env));
    assert!(!unify(&Term::Var(0), &cyclic, &mut env));
}

#[test]
fn test_occurs_check_can_be_disabled() {
    let mut env = Bindings::new();
    env.set_occurs_check(false);
    let cyclic = Term::compound("f", vec![Term::Var(0)]);
    assert!(unify(&Term::Var(0), &cyclic, &mut env));
}

#[test]
fn test_failed_unification_is_undone_by_the_caller() {
    let mut env = Bindings::new();
    let cp = env.mark();
    let lhs = Term::compound("f", vec![Term::Var(0), Term::atom("a")]);
    let rhs = Term::compound("f", vec![Term::atom("x"), Term::atom("b")]);
    // The first argument binds before the second fails.
    assert!(!unify(&lhs, &rhs, &mut env));
    env.undo(cp);
    assert_eq!(env.resolve(&Term::Var(0)), Term::Var(0));
}

#[test]
fn test_list_unification() {
    let mut env = Bindings::new();
    let pattern = Term::list(vec![Term::Var(0)], Some(Term::Var(1)));
    let value = Term::list(
        vec![Term::atom("a"), Term::atom("b"), Term::atom("c")],
        None,
    );
    assert!(unify(&pattern, &value, &mut env));
    assert_eq!(env.resolve(&Term::Var(0)), Term::atom("a"));
    assert_eq!(
        env.resolve_deep(&Term::Var(1)),
        Term::list(vec![Term::atom("b"), Term::atom("c")], None)
    );
}
