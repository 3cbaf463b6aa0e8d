//! Higher-order combinators: operators that control quotation invocation.
//!
//! Every combinator "calls" a quotation by splicing its terms onto the front
//! of the pending queue - never by a nested evaluator invocation - so
//! combinator nesting depth is bounded by memory, not the host call stack.
//!
//! `i`, `branch`, and `step` are pure queue-splices. `dip`, `map`, and
//! `filter` additionally park state in a machine frame and splice a
//! continuation marker after the quotation body; the marker's handler
//! (`continue_*` below) picks the frame back up when the body has drained.

use std::sync::Arc;

use smallvec::SmallVec;

use joy_ir::Term;

use crate::dictionary::Builtin;
use crate::errors::{
    arity_mismatch, malformed_term, stack_underflow, type_mismatch, RunResult, RuntimeError,
};
use crate::machine::{Frame, Machine};

/// Combinator registry, merged into the built-in table alongside the plain
/// operators.
pub(crate) const REGISTRY: &[Builtin] = &[
    Builtin {
        name: "i",
        arity: 1,
        run: apply,
    },
    Builtin {
        name: "dip",
        arity: 2,
        run: dip,
    },
    Builtin {
        name: "branch",
        arity: 3,
        run: branch,
    },
    Builtin {
        name: "choice",
        arity: 3,
        run: choice,
    },
    Builtin {
        name: "map",
        arity: 2,
        run: map,
    },
    Builtin {
        name: "filter",
        arity: 2,
        run: filter,
    },
    Builtin {
        name: "step",
        arity: 2,
        run: step,
    },
];

/// `[P] i` - pop a quotation and splice its terms for execution.
fn apply(m: &mut Machine) -> Result<(), RuntimeError> {
    let body = m.pop_quotation("i")?;
    m.splice(&body);
    Ok(())
}

/// `x [P] dip` - run `P` with `x` set aside, then restore `x` on top.
///
/// The set-aside term is parked in a frame, not on the stack and not in the
/// queue, so the invoked quotation cannot observe or disturb it.
fn dip(m: &mut Machine) -> Result<(), RuntimeError> {
    let body = m.pop_quotation("dip")?;
    let saved = m.pop("dip")?;
    m.frames.push(Frame::Dip { saved });
    m.push_marker(m.marks.dip_k);
    m.splice(&body);
    Ok(())
}

/// `cond [T] [F] branch` - splice exactly one of the two quotations.
fn branch(m: &mut Machine) -> Result<(), RuntimeError> {
    let if_false = m.pop_quotation("branch")?;
    let if_true = m.pop_quotation("branch")?;
    let cond = m.pop_boolean("branch")?;
    m.splice(if cond { &if_true } else { &if_false });
    Ok(())
}

/// `cond t f choice` - push one of two plain values.
fn choice(m: &mut Machine) -> Result<(), RuntimeError> {
    let if_false = m.pop("choice")?;
    let if_true = m.pop("choice")?;
    let cond = m.pop_boolean("choice")?;
    m.push(if cond { if_true } else { if_false });
    Ok(())
}

/// `[L] [P] map` - invoke `P` on each element of `L` on a temporary
/// sub-stack, collecting exactly one result per element into a new list.
fn map(m: &mut Machine) -> Result<(), RuntimeError> {
    let body = m.pop_quotation("map")?;
    let source = m.pop_quotation("map")?;
    let Some(first) = source.first().cloned() else {
        // Mapping over the empty list yields the empty list, no invocation.
        m.push(Term::Quotation(source));
        return Ok(());
    };
    let saved_stack = std::mem::take(&mut m.stack);
    let collected = Vec::with_capacity(source.len());
    m.frames.push(Frame::Map {
        body: Arc::clone(&body),
        source,
        next: 1,
        collected,
        saved_stack,
    });
    m.push(first);
    m.push_marker(m.marks.map_k);
    m.splice(&body);
    Ok(())
}

/// `[L] [P] filter` - keep the elements of `L` for which `P` leaves exactly
/// Boolean `true` on a one-element sub-stack; order-preserving.
fn filter(m: &mut Machine) -> Result<(), RuntimeError> {
    let body = m.pop_quotation("filter")?;
    let source = m.pop_quotation("filter")?;
    let Some(first) = source.first().cloned() else {
        m.push(Term::Quotation(source));
        return Ok(());
    };
    let saved_stack = std::mem::take(&mut m.stack);
    m.frames.push(Frame::Filter {
        body: Arc::clone(&body),
        source,
        next: 1,
        kept: Vec::new(),
        saved_stack,
    });
    m.push(first);
    m.push_marker(m.marks.filter_k);
    m.splice(&body);
    Ok(())
}

/// `[L] [P] step` - apply `P` to every element of `L` on the main stack.
///
/// Expands through the queue into `elem ...P rest-of-L [P] step`, the
/// self-referential splice that folds a list without host recursion.
fn step(m: &mut Machine) -> Result<(), RuntimeError> {
    let body = m.pop_quotation("step")?;
    let source = m.pop_quotation("step")?;
    schedule_step(m, &body, &source);
    Ok(())
}

/// Splice one round of `step` expansion, if any elements remain.
fn schedule_step(m: &mut Machine, body: &Arc<[Term]>, source: &Arc<[Term]>) {
    let Some(first) = source.first().cloned() else {
        return;
    };
    let rest: Arc<[Term]> = Arc::from(&source[1..]);
    let mut expansion: SmallVec<[Term; 8]> = SmallVec::new();
    expansion.push(first);
    expansion.extend(body.iter().cloned());
    expansion.push(Term::Quotation(rest));
    expansion.push(Term::Quotation(Arc::clone(body)));
    // The marker re-enters `step` directly, so a user redefinition of the
    // word `step` cannot hijack an expansion already in flight.
    expansion.push(Term::Operator(m.marks.step_k));
    m.splice(&expansion);
}

impl Machine {
    /// `map` continuation: one element's invocation has drained.
    pub(crate) fn continue_map(&mut self) -> RunResult {
        let Some(Frame::Map {
            body,
            source,
            next,
            mut collected,
            saved_stack,
        }) = self.frames.pop()
        else {
            return Err(malformed_term("map continuation with no matching frame"));
        };
        // The sub-stack started empty and was seeded with the element; the
        // invocation must leave exactly one term.
        if self.stack.len() != 1 {
            return Err(arity_mismatch("map", 1, self.stack.len()));
        }
        let result = self.pop("map")?;
        collected.push(result);

        if next < source.len() {
            let elem = source[next].clone();
            self.frames.push(Frame::Map {
                body: Arc::clone(&body),
                source,
                next: next + 1,
                collected,
                saved_stack,
            });
            self.push(elem);
            self.push_marker(self.marks.map_k);
            self.splice(&body);
        } else {
            self.stack = saved_stack;
            self.push(Term::quotation(collected));
        }
        Ok(())
    }

    /// `filter` continuation: one predicate invocation has drained.
    pub(crate) fn continue_filter(&mut self) -> RunResult {
        let Some(Frame::Filter {
            body,
            source,
            next,
            mut kept,
            saved_stack,
        }) = self.frames.pop()
        else {
            return Err(malformed_term("filter continuation with no matching frame"));
        };
        if self.stack.len() != 1 {
            return Err(arity_mismatch("filter", 1, self.stack.len()));
        }
        let verdict = match self.pop("filter")? {
            Term::Boolean(b) => b,
            other => return Err(type_mismatch("filter", "boolean", &other)),
        };
        if verdict {
            kept.push(source[next - 1].clone());
        }

        if next < source.len() {
            let elem = source[next].clone();
            self.frames.push(Frame::Filter {
                body: Arc::clone(&body),
                source,
                next: next + 1,
                kept,
                saved_stack,
            });
            self.push(elem);
            self.push_marker(self.marks.filter_k);
            self.splice(&body);
        } else {
            self.stack = saved_stack;
            self.push(Term::quotation(kept));
        }
        Ok(())
    }

    /// `step` continuation: re-enter the expansion for the rest of the list.
    pub(crate) fn continue_step(&mut self) -> RunResult {
        if self.stack.len() < 2 {
            return Err(stack_underflow("step", 2, self.stack.len()));
        }
        let body = self.pop_quotation("step")?;
        let source = self.pop_quotation("step")?;
        schedule_step(self, &body, &source);
        Ok(())
    }
}
