//! The plain operator library: fixed stack transformations.
//!
//! Conventions follow the surface language: binary operators take the deeper
//! operand first (`8 2 -` is `6`), list operators take the list on top
//! (`x [L] cons`), and boolean-producing operators end in `?` by convention
//! only - the suffix never gates dispatch.
//!
//! Arithmetic is exact-integer and checked: division or remainder by zero
//! fails with `DivisionByZero`, overflow with `NumericOverflow`.

use std::sync::Arc;

use joy_ir::Term;

use crate::dictionary::Builtin;
use crate::errors::{
    division_by_zero, empty_list, index_out_of_bounds, numeric_overflow, type_mismatch,
    RuntimeError,
};
use crate::machine::Machine;

type OpResult = Result<(), RuntimeError>;

/// Operator registry, merged into the built-in table with the combinators.
pub(crate) const REGISTRY: &[Builtin] = &[
    // Arithmetic
    Builtin { name: "+", arity: 2, run: add },
    Builtin { name: "-", arity: 2, run: sub },
    Builtin { name: "*", arity: 2, run: mul },
    Builtin { name: "/", arity: 2, run: div },
    Builtin { name: "%", arity: 2, run: rem },
    Builtin { name: "neg", arity: 1, run: neg },
    Builtin { name: "abs", arity: 1, run: abs },
    Builtin { name: "sign", arity: 1, run: sign },
    Builtin { name: "min", arity: 2, run: min },
    Builtin { name: "max", arity: 2, run: max },
    // Comparison
    Builtin { name: "=", arity: 2, run: equal },
    Builtin { name: "!=", arity: 2, run: differ },
    Builtin { name: "<", arity: 2, run: lt },
    Builtin { name: "<=", arity: 2, run: lte },
    Builtin { name: ">", arity: 2, run: gt },
    Builtin { name: ">=", arity: 2, run: gte },
    // Boolean logic
    Builtin { name: "and", arity: 2, run: and },
    Builtin { name: "or", arity: 2, run: or },
    Builtin { name: "not", arity: 1, run: not },
    Builtin { name: "xor", arity: 2, run: xor },
    // Data introspection
    Builtin { name: "null?", arity: 1, run: null_p },
    Builtin { name: "small?", arity: 1, run: small_p },
    Builtin { name: "integer?", arity: 1, run: integer_p },
    Builtin { name: "boolean?", arity: 1, run: boolean_p },
    Builtin { name: "list?", arity: 1, run: list_p },
    Builtin { name: "symbol?", arity: 1, run: symbol_p },
    Builtin { name: "sametype?", arity: 2, run: sametype_p },
    // List manipulation
    Builtin { name: "cons", arity: 2, run: cons },
    Builtin { name: "uncons", arity: 1, run: uncons },
    Builtin { name: "append", arity: 2, run: append },
    Builtin { name: "concat", arity: 2, run: concat },
    Builtin { name: "reverse", arity: 1, run: reverse },
    Builtin { name: "first", arity: 1, run: first },
    Builtin { name: "rest", arity: 1, run: rest },
    Builtin { name: "last", arity: 1, run: last },
    Builtin { name: "length", arity: 1, run: length },
    Builtin { name: "take", arity: 2, run: take },
    Builtin { name: "drop", arity: 2, run: drop_n },
    Builtin { name: "remove", arity: 2, run: remove },
    Builtin { name: "member?", arity: 2, run: member_p },
    Builtin { name: "index", arity: 2, run: index },
    Builtin { name: "sum", arity: 1, run: sum },
    Builtin { name: "product", arity: 1, run: product },
    // Stack manipulation
    Builtin { name: "dup", arity: 1, run: dup },
    Builtin { name: "pop", arity: 1, run: pop },
    Builtin { name: "swap", arity: 2, run: swap },
    Builtin { name: "id", arity: 0, run: id },
    Builtin { name: "stack", arity: 0, run: stack },
    Builtin { name: "unstack", arity: 1, run: unstack },
    Builtin { name: "stack-size", arity: 0, run: stack_size },
];

// Arithmetic

fn add(m: &mut Machine) -> OpResult {
    let a = m.pop_number("+")?;
    let b = m.pop_number("+")?;
    let r = b.checked_add(a).ok_or_else(|| numeric_overflow("+"))?;
    m.push(Term::Number(r));
    Ok(())
}

fn sub(m: &mut Machine) -> OpResult {
    let a = m.pop_number("-")?;
    let b = m.pop_number("-")?;
    let r = b.checked_sub(a).ok_or_else(|| numeric_overflow("-"))?;
    m.push(Term::Number(r));
    Ok(())
}

fn mul(m: &mut Machine) -> OpResult {
    let a = m.pop_number("*")?;
    let b = m.pop_number("*")?;
    let r = b.checked_mul(a).ok_or_else(|| numeric_overflow("*"))?;
    m.push(Term::Number(r));
    Ok(())
}

/// Floor division: rounds toward negative infinity, matching the surface
/// language's `8 -3 /` = `-3`.
fn floor_div(b: i64, a: i64, operator: &'static str) -> Result<i64, RuntimeError> {
    if a == 0 {
        return Err(division_by_zero(operator));
    }
    let q = b.checked_div(a).ok_or_else(|| numeric_overflow(operator))?;
    let r = b.wrapping_rem(a);
    if r != 0 && (r < 0) != (a < 0) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Floor remainder: result takes the divisor's sign, pairing with
/// [`floor_div`] so that `b = (b / a) * a + (b % a)`.
fn floor_rem(b: i64, a: i64, operator: &'static str) -> Result<i64, RuntimeError> {
    if a == 0 {
        return Err(division_by_zero(operator));
    }
    let r = b.checked_rem(a).unwrap_or(0);
    if r != 0 && (r < 0) != (a < 0) {
        Ok(r + a)
    } else {
        Ok(r)
    }
}

fn div(m: &mut Machine) -> OpResult {
    let a = m.pop_number("/")?;
    let b = m.pop_number("/")?;
    m.push(Term::Number(floor_div(b, a, "/")?));
    Ok(())
}

fn rem(m: &mut Machine) -> OpResult {
    let a = m.pop_number("%")?;
    let b = m.pop_number("%")?;
    m.push(Term::Number(floor_rem(b, a, "%")?));
    Ok(())
}

fn neg(m: &mut Machine) -> OpResult {
    let x = m.pop_number("neg")?;
    let r = x.checked_neg().ok_or_else(|| numeric_overflow("neg"))?;
    m.push(Term::Number(r));
    Ok(())
}

fn abs(m: &mut Machine) -> OpResult {
    let x = m.pop_number("abs")?;
    let r = x.checked_abs().ok_or_else(|| numeric_overflow("abs"))?;
    m.push(Term::Number(r));
    Ok(())
}

fn sign(m: &mut Machine) -> OpResult {
    let x = m.pop_number("sign")?;
    m.push(Term::Number(x.signum()));
    Ok(())
}

fn min(m: &mut Machine) -> OpResult {
    let a = m.pop_number("min")?;
    let b = m.pop_number("min")?;
    m.push(Term::Number(b.min(a)));
    Ok(())
}

fn max(m: &mut Machine) -> OpResult {
    let a = m.pop_number("max")?;
    let b = m.pop_number("max")?;
    m.push(Term::Number(b.max(a)));
    Ok(())
}

// Comparison

fn equal(m: &mut Machine) -> OpResult {
    let a = m.pop("=")?;
    let b = m.pop("=")?;
    m.push(Term::Boolean(b == a));
    Ok(())
}

fn differ(m: &mut Machine) -> OpResult {
    let a = m.pop("!=")?;
    let b = m.pop("!=")?;
    m.push(Term::Boolean(b != a));
    Ok(())
}

fn lt(m: &mut Machine) -> OpResult {
    let a = m.pop_number("<")?;
    let b = m.pop_number("<")?;
    m.push(Term::Boolean(b < a));
    Ok(())
}

fn lte(m: &mut Machine) -> OpResult {
    let a = m.pop_number("<=")?;
    let b = m.pop_number("<=")?;
    m.push(Term::Boolean(b <= a));
    Ok(())
}

fn gt(m: &mut Machine) -> OpResult {
    let a = m.pop_number(">")?;
    let b = m.pop_number(">")?;
    m.push(Term::Boolean(b > a));
    Ok(())
}

fn gte(m: &mut Machine) -> OpResult {
    let a = m.pop_number(">=")?;
    let b = m.pop_number(">=")?;
    m.push(Term::Boolean(b >= a));
    Ok(())
}

// Boolean logic

fn and(m: &mut Machine) -> OpResult {
    let a = m.pop_boolean("and")?;
    let b = m.pop_boolean("and")?;
    m.push(Term::Boolean(b && a));
    Ok(())
}

fn or(m: &mut Machine) -> OpResult {
    let a = m.pop_boolean("or")?;
    let b = m.pop_boolean("or")?;
    m.push(Term::Boolean(b || a));
    Ok(())
}

fn not(m: &mut Machine) -> OpResult {
    let x = m.pop_boolean("not")?;
    m.push(Term::Boolean(!x));
    Ok(())
}

fn xor(m: &mut Machine) -> OpResult {
    let a = m.pop_boolean("xor")?;
    let b = m.pop_boolean("xor")?;
    m.push(Term::Boolean(b ^ a));
    Ok(())
}

// Data introspection

fn null_p(m: &mut Machine) -> OpResult {
    let verdict = match m.pop("null?")? {
        Term::Number(n) => n == 0,
        Term::Quotation(q) => q.is_empty(),
        other => return Err(type_mismatch("null?", "number or quotation", &other)),
    };
    m.push(Term::Boolean(verdict));
    Ok(())
}

fn small_p(m: &mut Machine) -> OpResult {
    let verdict = match m.pop("small?")? {
        Term::Number(n) => n < 2,
        Term::Quotation(q) => q.len() < 2,
        other => return Err(type_mismatch("small?", "number or quotation", &other)),
    };
    m.push(Term::Boolean(verdict));
    Ok(())
}

fn integer_p(m: &mut Machine) -> OpResult {
    let x = m.pop("integer?")?;
    m.push(Term::Boolean(matches!(x, Term::Number(_))));
    Ok(())
}

fn boolean_p(m: &mut Machine) -> OpResult {
    let x = m.pop("boolean?")?;
    m.push(Term::Boolean(matches!(x, Term::Boolean(_))));
    Ok(())
}

fn list_p(m: &mut Machine) -> OpResult {
    let x = m.pop("list?")?;
    m.push(Term::Boolean(x.is_quotation()));
    Ok(())
}

fn symbol_p(m: &mut Machine) -> OpResult {
    let x = m.pop("symbol?")?;
    m.push(Term::Boolean(matches!(x, Term::Symbol(_))));
    Ok(())
}

fn sametype_p(m: &mut Machine) -> OpResult {
    let a = m.pop("sametype?")?;
    let b = m.pop("sametype?")?;
    m.push(Term::Boolean(
        std::mem::discriminant(&b) == std::mem::discriminant(&a),
    ));
    Ok(())
}

// List manipulation

fn cons(m: &mut Machine) -> OpResult {
    let list = m.pop_quotation("cons")?;
    let item = m.pop("cons")?;
    let mut items = Vec::with_capacity(list.len() + 1);
    items.push(item);
    items.extend(list.iter().cloned());
    m.push(Term::quotation(items));
    Ok(())
}

fn uncons(m: &mut Machine) -> OpResult {
    let list = m.pop_quotation("uncons")?;
    let Some(head) = list.first().cloned() else {
        return Err(empty_list("uncons"));
    };
    let tail: Arc<[Term]> = Arc::from(&list[1..]);
    m.push(head);
    m.push(Term::Quotation(tail));
    Ok(())
}

fn append(m: &mut Machine) -> OpResult {
    let list = m.pop_quotation("append")?;
    let item = m.pop("append")?;
    let mut items = Vec::with_capacity(list.len() + 1);
    items.extend(list.iter().cloned());
    items.push(item);
    m.push(Term::quotation(items));
    Ok(())
}

fn concat(m: &mut Machine) -> OpResult {
    let back = m.pop_quotation("concat")?;
    let front = m.pop_quotation("concat")?;
    let mut items = Vec::with_capacity(front.len() + back.len());
    items.extend(front.iter().cloned());
    items.extend(back.iter().cloned());
    m.push(Term::quotation(items));
    Ok(())
}

fn reverse(m: &mut Machine) -> OpResult {
    let list = m.pop_quotation("reverse")?;
    let items: Vec<Term> = list.iter().rev().cloned().collect();
    m.push(Term::quotation(items));
    Ok(())
}

fn first(m: &mut Machine) -> OpResult {
    let list = m.pop_quotation("first")?;
    let Some(head) = list.first().cloned() else {
        return Err(empty_list("first"));
    };
    m.push(head);
    Ok(())
}

fn rest(m: &mut Machine) -> OpResult {
    let list = m.pop_quotation("rest")?;
    if list.is_empty() {
        return Err(empty_list("rest"));
    }
    let tail: Arc<[Term]> = Arc::from(&list[1..]);
    m.push(Term::Quotation(tail));
    Ok(())
}

fn last(m: &mut Machine) -> OpResult {
    let list = m.pop_quotation("last")?;
    let Some(end) = list.last().cloned() else {
        return Err(empty_list("last"));
    };
    m.push(end);
    Ok(())
}

fn length(m: &mut Machine) -> OpResult {
    let list = m.pop_quotation("length")?;
    m.push(Term::Number(i64::try_from(list.len()).unwrap_or(i64::MAX)));
    Ok(())
}

/// Clamp a slice boundary: negative counts measure from the end of the
/// list, and anything past the end saturates.
fn clamp_index(n: i64, len: usize) -> usize {
    if n < 0 {
        len.saturating_sub(n.unsigned_abs().try_into().unwrap_or(usize::MAX))
    } else {
        usize::try_from(n).unwrap_or(usize::MAX).min(len)
    }
}

fn take(m: &mut Machine) -> OpResult {
    let n = m.pop_number("take")?;
    let list = m.pop_quotation("take")?;
    let cut = clamp_index(n, list.len());
    let items: Vec<Term> = list[..cut].to_vec();
    m.push(Term::quotation(items));
    Ok(())
}

fn drop_n(m: &mut Machine) -> OpResult {
    let n = m.pop_number("drop")?;
    let list = m.pop_quotation("drop")?;
    let cut = clamp_index(n, list.len());
    let items: Vec<Term> = list[cut..].to_vec();
    m.push(Term::quotation(items));
    Ok(())
}

fn remove(m: &mut Machine) -> OpResult {
    let item = m.pop("remove")?;
    let list = m.pop_quotation("remove")?;
    let items: Vec<Term> = list.iter().filter(|t| **t != item).cloned().collect();
    m.push(Term::quotation(items));
    Ok(())
}

fn member_p(m: &mut Machine) -> OpResult {
    let list = m.pop_quotation("member?")?;
    let item = m.pop("member?")?;
    m.push(Term::Boolean(list.contains(&item)));
    Ok(())
}

fn index(m: &mut Machine) -> OpResult {
    let list = m.pop_quotation("index")?;
    let i = m.pop_number("index")?;
    let slot = usize::try_from(i)
        .ok()
        .and_then(|i| list.get(i))
        .ok_or_else(|| index_out_of_bounds("index", i, list.len()))?;
    m.push(slot.clone());
    Ok(())
}

fn sum(m: &mut Machine) -> OpResult {
    let list = m.pop_quotation("sum")?;
    let mut total = 0i64;
    for term in list.iter() {
        let Term::Number(n) = term else {
            return Err(type_mismatch("sum", "number", term));
        };
        total = total.checked_add(*n).ok_or_else(|| numeric_overflow("sum"))?;
    }
    m.push(Term::Number(total));
    Ok(())
}

fn product(m: &mut Machine) -> OpResult {
    let list = m.pop_quotation("product")?;
    let mut total = 1i64;
    for term in list.iter() {
        let Term::Number(n) = term else {
            return Err(type_mismatch("product", "number", term));
        };
        total = total
            .checked_mul(*n)
            .ok_or_else(|| numeric_overflow("product"))?;
    }
    m.push(Term::Number(total));
    Ok(())
}

// Stack manipulation

fn dup(m: &mut Machine) -> OpResult {
    let x = m.pop("dup")?;
    m.push(x.clone());
    m.push(x);
    Ok(())
}

fn pop(m: &mut Machine) -> OpResult {
    m.pop("pop")?;
    Ok(())
}

fn swap(m: &mut Machine) -> OpResult {
    let a = m.pop("swap")?;
    let b = m.pop("swap")?;
    m.push(a);
    m.push(b);
    Ok(())
}

fn id(_m: &mut Machine) -> OpResult {
    Ok(())
}

fn stack(m: &mut Machine) -> OpResult {
    let items: Vec<Term> = m.stack().iter().rev().cloned().collect();
    m.push(Term::quotation(items));
    Ok(())
}

fn unstack(m: &mut Machine) -> OpResult {
    let list = m.pop_quotation("unstack")?;
    m.stack = list.iter().rev().cloned().collect();
    Ok(())
}

fn stack_size(m: &mut Machine) -> OpResult {
    let depth = i64::try_from(m.stack().len()).unwrap_or(i64::MAX);
    m.push(Term::Number(depth));
    Ok(())
}
