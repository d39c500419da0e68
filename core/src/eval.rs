//! The memoizing evaluator.
//!
//! Evaluation descends the grammar with a stack of frames kept on the heap,
//! instead of with native recursion, so how deeply a grammar can recurse is
//! bounded only by [`Config::max_depth`](../config/struct.Config.html) and not
//! by the size of the thread's stack.

use core::{convert::TryFrom, mem};

use alloc::{rc::Rc, vec::Vec};

use log::trace;

use crate::{
    config::Config,
    error::Error,
    grammar::{Grammar, Node, Parser},
    input::{Cursor, Endianness},
    memo::{Entry, MemoKey, MemoTable, Success},
    value::Value,
};


pub(crate) type Outcome<U> = Result<Option<Success<U>>, Error>;


/// What a frame does next.
enum Step<U> {
    /// Evaluate the parser at the bit offset, then resume with its result
    Call(Parser, usize),
    /// Finish with the result
    Return(Option<Success<U>>),
}

/// A parser being evaluated at an offset.
struct Frame<'g, U> {
    parser: Parser,
    node: &'g Node<U>,
    key: MemoKey,
    pos: usize,
    state: State<U>,
}

/// The progress of a frame, for the nodes that call more than once or that
/// must remember something across a call.
enum State<U> {
    Fresh,
    Parts(Parts<U>),
    Alternative(usize),
    Repeat(Repeat<U>),
    Counted(Counted<U>),
    Second(Option<Success<U>>),
    Scoped(Endianness),
    Permuting(Permutation<U>),
}

enum Entered<'g, U> {
    Memoized(Option<Success<U>>),
    Frame(Frame<'g, U>),
}


/// The state of one parse:  what is being parsed, the memo table, and how
/// deeply the grammar is recursing.
pub(crate) struct Evaluator<'g, 'i, U, M> {
    grammar: &'g Grammar<U>,
    input: &'i [u8],
    memo: M,
    config: Config,
    /// How many indirections are being evaluated
    depth: usize,
    endianness: Endianness,
}

impl<'g, 'i, U, M> Evaluator<'g, 'i, U, M>
    where M: MemoTable<U>,
{
    pub(crate) fn new(grammar: &'g Grammar<U>, input: &'i [u8], memo: M, config: Config)
                      -> Self
    {
        Self {
            grammar,
            input,
            memo,
            config,
            depth: 0,
            endianness: config.endianness,
        }
    }

    pub(crate) fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Evaluate `parser` at bit offset `pos`, consulting and filling the memo
    /// table.
    pub(crate) fn eval(&mut self, parser: Parser, pos: usize) -> Outcome<U> {
        let mut stack = Vec::new();
        let mut returned = match self.enter(parser, pos)? {
            Entered::Memoized(result) => return Ok(result),
            Entered::Frame(frame) => {
                stack.push(frame);
                None
            }
        };
        while let Some(frame) = stack.last_mut() {
            let step = match returned.take() {
                None => self.start(frame)?,
                Some(result) => self.resume(frame, result)?,
            };
            match step {
                Step::Call(callee, at) => match self.enter(callee, at)? {
                    Entered::Memoized(result) => returned = Some(result),
                    Entered::Frame(frame) => stack.push(frame),
                },
                Step::Return(result) => {
                    if let Some(frame) = stack.pop() {
                        self.leave(&frame, result.as_ref());
                    }
                    returned = Some(result);
                }
            }
        }
        Ok(returned.flatten())
    }

    fn enter(&mut self, parser: Parser, pos: usize) -> Result<Entered<'g, U>, Error> {
        let grammar = self.grammar;
        let node = grammar.node(parser).ok_or(Error::ForeignParser(parser))?;
        let key = MemoKey { parser: parser.index(), pos, endianness: self.endianness };

        match self.memo.lookup(&key) {
            Some(Entry::Done(result)) => {
                trace!("memo hit for {} at {}", parser, pos);
                return Ok(Entered::Memoized(result.clone()));
            }
            Some(Entry::InProgress) => {
                trace!("left recursion through {} at {}", parser, pos);
                return Err(Error::LeftRecursion { parser, offset: pos });
            }
            None => {}
        }

        // Only indirections can make a grammar recurse, so only they count.
        if let Node::Indirect(_) = node {
            if !self.config.depth_allowed(self.depth + 1) {
                return Err(Error::DepthExceeded { limit: self.config.max_depth });
            }
            self.depth += 1;
        }
        self.memo.store(key, Entry::InProgress);
        Ok(Entered::Frame(Frame { parser, node, key, pos, state: State::Fresh }))
    }

    fn leave(&mut self, frame: &Frame<'g, U>, result: Option<&Success<U>>) {
        if let Node::Indirect(_) = frame.node {
            self.depth -= 1;
        }
        self.memo.store(frame.key, Entry::Done(result.cloned()));
    }

    /// Begin evaluating the node of a new frame.
    fn start(&mut self, frame: &mut Frame<'g, U>) -> Result<Step<U>, Error> {
        let pos = frame.pos;
        Ok(match frame.node {
            Node::Ch(c) => Step::Return(self.byte_leaf(pos, |b| b == *c)),
            Node::Range { low, high } =>
                Step::Return(self.byte_leaf(pos, |b| (*low ..= *high).contains(&b))),
            Node::Set { set, negated } =>
                Step::Return(self.byte_leaf(pos, |b| set.contains(b) != *negated)),
            Node::Token(token) => Step::Return(self.token(token, pos)),
            Node::Int { bits, signed } => Step::Return(self.int(*bits, *signed, pos)),
            Node::End => Step::Return(if self.cursor(pos).at_end() { empty(pos) } else { None }),
            Node::Nothing => Step::Return(None),
            Node::Epsilon => Step::Return(empty(pos)),
            Node::Indirect(None) => return Err(Error::Unbound(frame.parser)),

            Node::IntRange { inner, .. }
            | Node::Optional(inner)
            | Node::Ignore(inner)
            | Node::And(inner)
            | Node::Not(inner)
            | Node::Action(inner, _)
            | Node::Map(inner, _)
            | Node::AttrBool(inner, _)
            | Node::ButNot(inner, _)
            | Node::Difference(inner, _)
            | Node::Xor(inner, _)
            | Node::LengthValue { length: inner, .. }
            | Node::Indirect(Some(inner)) => Step::Call(*inner, pos),

            Node::Whitespace(inner) => Step::Call(*inner, self.skip_whitespace(pos)),
            Node::WithEndianness(endianness, inner) => {
                frame.state = State::Scoped(self.endianness);
                self.endianness = *endianness;
                Step::Call(*inner, pos)
            }
            Node::Sequence(parts) => start_with(&mut frame.state, Parts::new(pos),
                                                 |p| p.call(parts, None), State::Parts),
            Node::Pick { parts, keep } => start_with(&mut frame.state, Parts::new(pos),
                                                     |p| p.call(parts, Some(*keep)),
                                                     State::Parts),
            Node::Choice(alternatives) => {
                frame.state = State::Alternative(0);
                match alternatives.first() {
                    Some(&first) => Step::Call(first, pos),
                    None => Step::Return(None),
                }
            }
            Node::Many { inner, .. } => {
                frame.state = State::Repeat(Repeat::new(pos));
                Step::Call(*inner, pos)
            }
            Node::RepeatN { inner, count } => {
                let count = u64::try_from(*count).unwrap_or(u64::MAX);
                start_with(&mut frame.state, Counted::new(count, pos, false),
                           |c| c.call(*inner), State::Counted)
            }
            Node::Permutation(members) =>
                start_with(&mut frame.state, Permutation::new(members.len(), pos),
                           |p| p.step(members, None), State::Permuting),
        })
    }

    /// Continue a frame with the result of the parser it called.
    fn resume(&mut self, frame: &mut Frame<'g, U>, result: Option<Success<U>>)
              -> Result<Step<U>, Error>
    {
        let pos = frame.pos;
        let state = &mut frame.state;
        Ok(match frame.node {
            Node::IntRange { low, high, .. } =>
                Step::Return(result.filter(|s| in_range(s.value.as_ref(), *low, *high))),
            Node::Optional(_) => Step::Return(Some(result.unwrap_or(Success {
                value: Some(Value::None),
                end: pos,
            }))),
            Node::Whitespace(_) | Node::Indirect(_) => Step::Return(result),
            Node::Ignore(_) =>
                Step::Return(result.map(|s| Success { value: None, end: s.end })),
            Node::And(_) => Step::Return(result.and_then(|_| empty(pos))),
            Node::Not(_) => Step::Return(if result.is_some() { None } else { empty(pos) }),
            Node::Action(_, f) => Step::Return(result.map(|s| Success {
                value: Some(Value::User(Rc::new(with_sentinel(s.value.as_ref(), |v| f(v))))),
                end: s.end,
            })),
            Node::Map(_, f) => Step::Return(result.map(|s| Success {
                value: Some(with_sentinel(s.value.as_ref(), |v| f(v))),
                end: s.end,
            })),
            Node::AttrBool(_, predicate) => Step::Return(result.filter(|s| {
                with_sentinel(s.value.as_ref(), |v| predicate(v))
            })),
            Node::WithEndianness(..) => {
                if let State::Scoped(saved) = state {
                    self.endianness = *saved;
                }
                Step::Return(result)
            }
            Node::Sequence(parts) => match state {
                State::Parts(progress) => progress.step(parts, None, result),
                _ => Step::Return(None),
            },
            Node::Pick { parts, keep } => match state {
                State::Parts(progress) => progress.step(parts, Some(*keep), result),
                _ => Step::Return(None),
            },
            Node::Choice(alternatives) => match (result, state) {
                (Some(success), _) => Step::Return(Some(success)),
                (None, State::Alternative(next)) => {
                    *next += 1;
                    match alternatives.get(*next) {
                        Some(&alternative) => Step::Call(alternative, pos),
                        None => Step::Return(None),
                    }
                }
                (None, _) => Step::Return(None),
            },
            Node::Many { inner, sep, at_least_one } => match state {
                State::Repeat(repeat) => repeat.step(*inner, *sep, *at_least_one, result),
                _ => Step::Return(None),
            },
            Node::RepeatN { inner, .. } => match state {
                State::Counted(counted) => counted.step(*inner, result),
                _ => Step::Return(None),
            },
            Node::LengthValue { length, value: element } => match state {
                State::Counted(counted) => counted.step(*element, result),
                _ => {
                    let Some(len) = result else { return Ok(Step::Return(None)) };
                    let count = match len.value {
                        Some(Value::Uint { value, .. }) => value,
                        _ => return Err(Error::NotALength(*length)),
                    };
                    // The count comes from the input, so every element must
                    // consume something, which bounds the work by the input.
                    start_with(state, Counted::new(count, len.end, true),
                               |c| c.call(*element), State::Counted)
                }
            },
            Node::ButNot(_, b) => exclude(state, *b, pos, result, |a_end, b_end| b_end >= a_end),
            Node::Difference(_, b) =>
                exclude(state, *b, pos, result, |a_end, b_end| b_end == a_end),
            Node::Xor(_, b) => match state {
                State::Second(first) => Step::Return(match (first.take(), result) {
                    (Some(s), None) | (None, Some(s)) => Some(s),
                    _ => None,
                }),
                _ => {
                    *state = State::Second(result);
                    Step::Call(*b, pos)
                }
            },
            Node::Permutation(members) => match state {
                State::Permuting(search) => search.step(members, Some(result)),
                _ => Step::Return(None),
            },
            // Leaves never call.
            Node::Ch(_) | Node::Range { .. } | Node::Set { .. } | Node::Token(_)
            | Node::Int { .. } | Node::End | Node::Nothing | Node::Epsilon => Step::Return(result),
        })
    }

    #[inline]
    fn cursor(&self, pos: usize) -> Cursor<'i> {
        Cursor::new(self.input, pos, self.endianness)
    }

    fn byte_leaf<F>(&self, pos: usize, accept: F) -> Option<Success<U>>
        where F: Fn(u8) -> bool,
    {
        let mut cursor = self.cursor(pos);
        let b = cursor.read_byte()?;
        if accept(b) {
            Some(Success {
                value: Some(Value::Uint { value: u64::from(b), bits: 8 }),
                end: cursor.pos(),
            })
        } else {
            None
        }
    }

    fn token(&self, token: &[u8], pos: usize) -> Option<Success<U>> {
        let mut cursor = self.cursor(pos);
        for &expected in token {
            if cursor.read_byte()? != expected {
                return None;
            }
        }
        Some(Success { value: Some(Value::bytes(token)), end: cursor.pos() })
    }

    fn int(&self, bits: u8, signed: bool, pos: usize) -> Option<Success<U>> {
        let mut cursor = self.cursor(pos);
        let width = usize::from(bits);
        let value = if signed {
            Value::Sint { value: cursor.read_signed(width)?, bits }
        } else {
            Value::Uint { value: cursor.read(width)?, bits }
        };
        Some(Success { value: Some(value), end: cursor.pos() })
    }

    fn skip_whitespace(&self, pos: usize) -> usize {
        let mut cursor = self.cursor(pos);
        loop {
            let before = cursor.pos();
            match cursor.read_byte() {
                Some(b) if is_space(b) => {}
                _ => return before,
            }
        }
    }
}


/// Put `progress` in `state` after taking its first step.
fn start_with<U, P, S, W>(state: &mut State<U>, mut progress: P, step: S, wrap: W) -> Step<U>
    where S: FnOnce(&mut P) -> Step<U>,
          W: FnOnce(P) -> State<U>,
{
    let first = step(&mut progress);
    *state = wrap(progress);
    first
}

/// The parts of a `sequence`, or of a `left`, `right`, or `middle` which keep
/// only the value of one part.
struct Parts<U> {
    next: usize,
    end: usize,
    values: Vec<Value<U>>,
    kept: Option<Value<U>>,
}

impl<U> Parts<U> {
    fn new(pos: usize) -> Self {
        Self { next: 0, end: pos, values: Vec::new(), kept: None }
    }

    fn step(&mut self, parts: &[Parser], keep: Option<usize>, result: Option<Success<U>>)
            -> Step<U>
    {
        let Some(success) = result else { return Step::Return(None) };
        match keep {
            Some(k) if k == self.next => self.kept = success.value,
            Some(_) => {}
            None => self.values.extend(success.value),
        }
        self.end = success.end;
        self.next += 1;
        self.call(parts, keep)
    }

    fn call(&mut self, parts: &[Parser], keep: Option<usize>) -> Step<U> {
        if let Some(&part) = parts.get(self.next) {
            return Step::Call(part, self.end);
        }
        let value = if keep.is_some() {
            self.kept.take()
        } else {
            Some(Value::Seq(mem::take(&mut self.values).into()))
        };
        Step::Return(Some(Success { value, end: self.end }))
    }
}

/// The loop of `many`, `many1`, `sep_by`, and `sep_by1`.  An iteration that
/// consumes nothing ends it without counting.
struct Repeat<U> {
    values: Vec<Value<U>>,
    count: usize,
    end: usize,
    /// Whether the pending result is a separator's
    separated: bool,
}

impl<U> Repeat<U> {
    fn new(pos: usize) -> Self {
        Self { values: Vec::new(), count: 0, end: pos, separated: false }
    }

    fn step(&mut self, inner: Parser, sep: Option<Parser>, at_least_one: bool,
            result: Option<Success<U>>)
            -> Step<U>
    {
        if self.separated {
            self.separated = false;
            return match result {
                Some(s) => Step::Call(inner, s.end),
                None => self.finish(at_least_one),
            };
        }
        match result {
            Some(s) if s.end > self.end => {
                self.values.extend(s.value);
                self.end = s.end;
                self.count += 1;
                match sep {
                    Some(sep) => {
                        self.separated = true;
                        Step::Call(sep, self.end)
                    }
                    None => Step::Call(inner, self.end),
                }
            }
            _ => self.finish(at_least_one),
        }
    }

    fn finish(&mut self, at_least_one: bool) -> Step<U> {
        if at_least_one && self.count == 0 {
            return Step::Return(None);
        }
        let values = mem::take(&mut self.values);
        Step::Return(Some(Success { value: Some(Value::Seq(values.into())), end: self.end }))
    }
}

/// The elements of `repeat_n` and of `length_value`.
struct Counted<U> {
    values: Vec<Value<U>>,
    remaining: u64,
    end: usize,
    /// Whether each element must consume something
    progress: bool,
}

impl<U> Counted<U> {
    fn new(count: u64, pos: usize, progress: bool) -> Self {
        Self { values: Vec::new(), remaining: count, end: pos, progress }
    }

    fn step(&mut self, element: Parser, result: Option<Success<U>>) -> Step<U> {
        match result {
            Some(s) if !self.progress || s.end > self.end => {
                self.values.extend(s.value);
                self.end = s.end;
                self.remaining -= 1;
                self.call(element)
            }
            _ => Step::Return(None),
        }
    }

    fn call(&mut self, element: Parser) -> Step<U> {
        if self.remaining > 0 {
            return Step::Call(element, self.end);
        }
        let values = mem::take(&mut self.values);
        Step::Return(Some(Success { value: Some(Value::Seq(values.into())), end: self.end }))
    }
}

/// The search of a `permutation` for an order in which all its members match,
/// with one level per member matched so far.  A sentinel from an `optional`
/// does not count as matching, but once nothing else can match, the remaining
/// members may all be absent if they all give sentinels.
struct Permutation<U> {
    slots: Vec<Option<Option<Value<U>>>>,
    levels: Vec<Level>,
}

struct Level {
    pos: usize,
    /// Where to continue looking for a member to try
    next: usize,
    /// The member this level matched, which the next level is after
    filled: Option<usize>,
    /// The member whose result is pending
    waiting: Option<usize>,
    /// While checking that the remaining members may be absent, those found so
    /// far
    absent: Option<Vec<usize>>,
}

impl Level {
    fn at(pos: usize) -> Self {
        Self { pos, next: 0, filled: None, waiting: None, absent: None }
    }
}

impl<U> Permutation<U> {
    fn new(members: usize, pos: usize) -> Self {
        Self {
            slots: (0 .. members).map(|_| None).collect(),
            levels: alloc::vec![Level::at(pos)],
        }
    }

    fn step(&mut self, members: &[Parser], mut result: Option<Option<Success<U>>>) -> Step<U> {
        loop {
            let Some(level) = self.levels.last_mut() else { return Step::Return(None) };

            if let Some(i) = level.waiting.take() {
                let result = result.take().flatten();
                if let Some(absent) = &mut level.absent {
                    if let Some(Success { value: Some(Value::None), .. }) = result {
                        absent.push(i);
                    } else {
                        self.backtrack();
                        continue;
                    }
                } else if let Some(s) = result {
                    if !matches!(s.value, Some(Value::None)) {
                        self.slots[i] = Some(s.value);
                        level.filled = Some(i);
                        if self.slots.iter().all(Option::is_some) {
                            return self.finish(s.end);
                        }
                        self.levels.push(Level::at(s.end));
                        continue;
                    }
                }
            }

            let slots = &self.slots;
            let Some(level) = self.levels.last_mut() else { return Step::Return(None) };
            match (level.next .. members.len()).find(|&i| slots[i].is_none()) {
                Some(i) => {
                    level.next = i + 1;
                    level.waiting = Some(i);
                    return Step::Call(members[i], level.pos);
                }
                None if level.absent.is_none() => {
                    level.absent = Some(Vec::new());
                    level.next = 0;
                }
                None => {
                    let pos = level.pos;
                    for i in level.absent.take().unwrap_or_default() {
                        self.slots[i] = Some(Some(Value::None));
                    }
                    return self.finish(pos);
                }
            }
        }
    }

    /// Give up on the top level, and make its parent try its next member.
    fn backtrack(&mut self) {
        let _ = self.levels.pop();
        if let Some(parent) = self.levels.last_mut() {
            if let Some(i) = parent.filled.take() {
                self.slots[i] = None;
            }
        }
    }

    fn finish(&mut self, end: usize) -> Step<U> {
        let values = mem::take(&mut self.slots).into_iter().flatten().flatten()
                                                  .collect::<Vec<_>>();
        Step::Return(Some(Success { value: Some(Value::Seq(values.into())), end }))
    }
}

fn exclude<U, F>(state: &mut State<U>, other: Parser, pos: usize, result: Option<Success<U>>,
                 excluded: F)
                 -> Step<U>
    where F: Fn(usize, usize) -> bool,
{
    match state {
        State::Second(first) => match (first.take(), result) {
            (Some(a), Some(b)) if excluded(a.end, b.end) => Step::Return(None),
            (first, _) => Step::Return(first),
        },
        _ => match result {
            Some(a) => {
                *state = State::Second(Some(a));
                Step::Call(other, pos)
            }
            None => Step::Return(None),
        },
    }
}

fn in_range<U>(value: Option<&Value<U>>, low: i64, high: i64) -> bool {
    let n = match value {
        Some(Value::Uint { value, .. }) => i128::from(*value),
        Some(Value::Sint { value, .. }) => i128::from(*value),
        _ => return false,
    };
    (i128::from(low) ..= i128::from(high)).contains(&n)
}

#[inline]
fn empty<U>(pos: usize) -> Option<Success<U>> {
    Some(Success { value: None, end: pos })
}

/// Give `f` the value, or the sentinel if there is none.
fn with_sentinel<U, R, F>(value: Option<&Value<U>>, f: F) -> R
    where F: FnOnce(&Value<U>) -> R,
{
    match value {
        Some(v) => f(v),
        None => f(&Value::None),
    }
}

/// What C's `isspace` considers whitespace in the "C" locale.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}
