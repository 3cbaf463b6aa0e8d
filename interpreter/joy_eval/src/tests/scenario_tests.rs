//! End-to-end scenarios running source text through the reader and machine.

use pretty_assertions::assert_eq;

use joy_ir::Term;

use crate::tests::{eval, eval_err, top};
use crate::{Dictionary, RuntimeErrorKind};

#[test]
fn test_sum_then_compare() {
    let (stack, _) = eval("1 2 + 3 + 6 =");
    assert_eq!(stack, vec![Term::Boolean(true)]);
}

#[test]
fn test_map_then_reverse() {
    let (stack, _) = eval("[7 8 9] [1 -] map reverse");
    assert_eq!(
        top(&stack),
        &Term::quotation(vec![Term::Number(8), Term::Number(7), Term::Number(6)])
    );
}

#[test]
fn test_symbol_list_surgery() {
    let (stack, interner) = eval("['a 'b 'c] 'd swap rest cons");
    assert_eq!(
        top(&stack),
        &Term::quotation(vec![
            Term::Symbol(interner.intern("d")),
            Term::Symbol(interner.intern("b")),
            Term::Symbol(interner.intern("c")),
        ])
    );
}

#[test]
fn test_first_of_empty_list_fails() {
    let err = eval_err("[] first");
    assert_eq!(
        err.kind,
        RuntimeErrorKind::EmptyList {
            operator: "first".to_owned()
        }
    );
}

#[test]
fn test_add_on_empty_stack_underflows() {
    let err = eval_err("+");
    assert_eq!(
        err.kind,
        RuntimeErrorKind::StackUnderflow {
            operator: "+".to_owned(),
            needed: 2,
            available: 0,
        }
    );
}

#[test]
fn test_user_definition_of_square() {
    let mut dictionary = Dictionary::new();
    let interner = dictionary.shared_interner();

    let body = joy_parse::parse("dup *", &interner).unwrap();
    dictionary.define_str("square", body.into());

    let terms = joy_parse::parse("3 square", &interner).unwrap();
    let stack = crate::run(terms, dictionary).unwrap();
    assert_eq!(stack, vec![Term::Number(9)]);
}

#[test]
fn test_aliases_spell_the_same_operations() {
    let (stack, _) = eval("2 3 add 5 equal?");
    assert_eq!(stack, vec![Term::Boolean(true)]);
}

#[test]
fn test_definitions_can_call_each_other() {
    let mut dictionary = Dictionary::new();
    let interner = dictionary.shared_interner();

    let square = joy_parse::parse("dup *", &interner).unwrap();
    dictionary.define_str("square", square.into());
    // `cube` forward-references nothing, but resolves `square` late.
    let cube = joy_parse::parse("dup square *", &interner).unwrap();
    dictionary.define_str("cube", cube.into());

    let terms = joy_parse::parse("4 cube", &interner).unwrap();
    let stack = crate::run(terms, dictionary).unwrap();
    assert_eq!(stack, vec![Term::Number(64)]);
}

#[test]
fn test_forward_reference_resolves_at_run_time() {
    let mut dictionary = Dictionary::new();
    let interner = dictionary.shared_interner();

    // `twice` refers to `inc`, which does not exist yet at definition time.
    let twice = joy_parse::parse("inc inc", &interner).unwrap();
    dictionary.define_str("twice", twice.into());
    let inc = joy_parse::parse("1 +", &interner).unwrap();
    dictionary.define_str("inc", inc.into());

    let terms = joy_parse::parse("5 twice", &interner).unwrap();
    let stack = crate::run(terms, dictionary).unwrap();
    assert_eq!(stack, vec![Term::Number(7)]);
}

#[test]
fn test_quotations_stay_data_until_invoked() {
    let (stack, interner) = eval("[1 2 +]");
    assert_eq!(
        stack,
        vec![Term::quotation(vec![
            Term::Number(1),
            Term::Number(2),
            Term::Operator(interner.intern("+")),
        ])]
    );
}

#[test]
fn test_unknown_operator_names_the_word() {
    let err = eval_err("1 frobnicate");
    assert_eq!(
        err.kind,
        RuntimeErrorKind::UnknownOperator {
            name: "frobnicate".to_owned()
        }
    );
}
