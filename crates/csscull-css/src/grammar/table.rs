//! LALR(1) table construction.
//!
//! The table is built once, on first use, from [`PRODUCTIONS`]:
//!
//! 1. FIRST sets and nullability for every nonterminal.
//! 2. The LR(0) automaton: item-set cores and their transitions.
//! 3. Lookaheads for kernel items, propagated through the LR(0) transitions
//!    until nothing changes. States with equal cores are never split, which
//!    is what makes the result LALR rather than canonical LR.
//! 4. Actions. Conflicts are resolved statically: shift beats reduce, and of
//!    two reductions the production declared first wins.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use strum::EnumCount as _;

use super::{Nonterminal, PRODUCTIONS, Symbol, Terminal};

/// What to do in a state on a given lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
    #[default]
    Error,
}

/// A set of terminals as a bitmask over [`Terminal::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TerminalSet(u128);

const _: () = assert!(Terminal::COUNT <= 128);

impl TerminalSet {
    const fn single(terminal: Terminal) -> Self {
        Self(1 << terminal.index())
    }

    const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    const fn is_superset(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    fn iter(self) -> impl Iterator<Item = Terminal> {
        (0..Terminal::COUNT)
            .filter(move |i| self.0 & (1 << i) != 0)
            .filter_map(Terminal::from_index)
    }
}

/// A production with a dot somewhere in its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Item {
    production: usize,
    dot: usize,
}

impl Item {
    const fn start(production: usize) -> Self {
        Self { production, dot: 0 }
    }

    fn next_symbol(self) -> Option<Symbol> {
        PRODUCTIONS[self.production].rhs.get(self.dot).copied()
    }

    fn rest(self) -> &'static [Symbol] {
        let rhs = PRODUCTIONS[self.production].rhs;
        rhs.get(self.dot + 1..).unwrap_or_default()
    }

    const fn advance(self) -> Self {
        Self {
            production: self.production,
            dot: self.dot + 1,
        }
    }
}

type ItemSet = BTreeMap<Item, TerminalSet>;

/// FIRST sets and the productions of each nonterminal.
struct Analysis {
    by_lhs: Vec<Vec<usize>>,
    first: Vec<TerminalSet>,
    nullable: Vec<bool>,
}

impl Analysis {
    fn new() -> Self {
        let mut by_lhs = vec![Vec::new(); Nonterminal::COUNT];
        for (index, production) in PRODUCTIONS.iter().enumerate() {
            by_lhs[production.lhs as usize].push(index);
        }

        let mut analysis = Self {
            by_lhs,
            first: vec![TerminalSet::default(); Nonterminal::COUNT],
            nullable: vec![false; Nonterminal::COUNT],
        };

        let mut changed = true;
        while changed {
            changed = false;
            for production in PRODUCTIONS {
                let lhs = production.lhs as usize;
                let (first, nullable) = analysis.first_of(production.rhs);
                let merged = analysis.first[lhs].union(first);
                if merged != analysis.first[lhs] {
                    analysis.first[lhs] = merged;
                    changed = true;
                }
                if nullable && !analysis.nullable[lhs] {
                    analysis.nullable[lhs] = true;
                    changed = true;
                }
            }
        }
        analysis
    }

    /// FIRST of a symbol string, and whether the whole string can derive
    /// the empty string.
    fn first_of(&self, symbols: &[Symbol]) -> (TerminalSet, bool) {
        let mut first = TerminalSet::default();
        for symbol in symbols {
            match *symbol {
                Symbol::Terminal(terminal) => {
                    return (first.union(TerminalSet::single(terminal)), false);
                }
                Symbol::Nonterminal(nonterminal) => {
                    first = first.union(self.first[nonterminal as usize]);
                    if !self.nullable[nonterminal as usize] {
                        return (first, false);
                    }
                }
            }
        }
        (first, true)
    }

    /// LR(1) closure of a kernel.
    fn closure(&self, kernel: &ItemSet) -> ItemSet {
        let mut items = kernel.clone();
        let mut pending: Vec<Item> = items.keys().copied().collect();

        while let Some(item) = pending.pop() {
            let Some(Symbol::Nonterminal(next)) = item.next_symbol() else {
                continue;
            };
            let lookahead = items.get(&item).copied().unwrap_or_default();
            let (first, nullable) = self.first_of(item.rest());
            let spread = if nullable {
                first.union(lookahead)
            } else {
                first
            };

            for &production in &self.by_lhs[next as usize] {
                let start = Item::start(production);
                match items.get_mut(&start) {
                    Some(existing) if existing.is_superset(spread) => {}
                    Some(existing) => {
                        *existing = existing.union(spread);
                        pending.push(start);
                    }
                    None => {
                        let _ = items.insert(start, spread);
                        pending.push(start);
                    }
                }
            }
        }
        items
    }
}

/// How many conflicts the static resolution rules had to settle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Conflicts {
    pub shift_reduce: usize,
    pub reduce_reduce: usize,
}

/// The parse table: one action per state and terminal, one goto per state
/// and nonterminal.
#[derive(Debug)]
pub(crate) struct ParseTable {
    actions: Vec<Action>,
    gotos: Vec<Option<usize>>,
    states: usize,
    /// State reached from the start state over a `Stylesheet`; parsing
    /// resumes here after a syntax error.
    pub resume: usize,
    pub conflicts: Conflicts,
}

pub(crate) static PARSE_TABLE: LazyLock<ParseTable> = LazyLock::new(ParseTable::build);

impl ParseTable {
    fn build() -> Self {
        let analysis = Analysis::new();

        // LR(0) automaton.
        let mut kernels: Vec<Vec<Item>> = vec![vec![Item::start(0)]];
        let mut index: BTreeMap<Vec<Item>, usize> = BTreeMap::new();
        let _ = index.insert(kernels[0].clone(), 0);
        let mut transitions: Vec<BTreeMap<Symbol, usize>> = Vec::new();

        let mut state = 0;
        while state < kernels.len() {
            let kernel: ItemSet = kernels[state]
                .iter()
                .map(|&item| (item, TerminalSet::default()))
                .collect();
            let mut successors: BTreeMap<Symbol, Vec<Item>> = BTreeMap::new();
            for item in analysis.closure(&kernel).into_keys() {
                if let Some(symbol) = item.next_symbol() {
                    successors.entry(symbol).or_default().push(item.advance());
                }
            }

            let mut edges = BTreeMap::new();
            for (symbol, mut successor) in successors {
                successor.sort_unstable();
                let target = *index.entry(successor.clone()).or_insert_with(|| {
                    kernels.push(successor);
                    kernels.len() - 1
                });
                let _ = edges.insert(symbol, target);
            }
            transitions.push(edges);
            state += 1;
        }
        let states = kernels.len();

        // Lookahead propagation over the LR(0) transitions.
        let mut lookaheads: Vec<ItemSet> = kernels
            .iter()
            .map(|kernel| {
                kernel
                    .iter()
                    .map(|&item| (item, TerminalSet::default()))
                    .collect()
            })
            .collect();
        let _ = lookaheads[0].insert(Item::start(0), TerminalSet::single(Terminal::End));

        let mut changed = true;
        while changed {
            changed = false;
            for (state, edges) in transitions.iter().enumerate() {
                for (item, lookahead) in analysis.closure(&lookaheads[state]) {
                    let Some(symbol) = item.next_symbol() else {
                        continue;
                    };
                    let Some(&target) = edges.get(&symbol) else {
                        continue;
                    };
                    let entry = lookaheads[target].entry(item.advance()).or_default();
                    if !entry.is_superset(lookahead) {
                        *entry = entry.union(lookahead);
                        changed = true;
                    }
                }
            }
        }

        let mut table = Self {
            actions: vec![Action::Error; states * Terminal::COUNT],
            gotos: vec![None; states * Nonterminal::COUNT],
            states,
            resume: 0,
            conflicts: Conflicts::default(),
        };

        for (state, edges) in transitions.iter().enumerate() {
            for (&symbol, &target) in edges {
                match symbol {
                    Symbol::Terminal(terminal) => {
                        table.actions[state * Terminal::COUNT + terminal.index()] =
                            Action::Shift(target);
                    }
                    Symbol::Nonterminal(nonterminal) => {
                        table.gotos[state * Nonterminal::COUNT + nonterminal as usize] =
                            Some(target);
                    }
                }
            }
            for (item, lookahead) in analysis.closure(&lookaheads[state]) {
                if item.next_symbol().is_some() {
                    continue;
                }
                for terminal in lookahead.iter() {
                    let action = if item.production == 0 {
                        Action::Accept
                    } else {
                        Action::Reduce(item.production)
                    };
                    table.resolve(state, terminal, action);
                }
            }
        }

        table.resume = table
            .goto(0, Nonterminal::Stylesheet)
            .expect("the start state has a goto on Stylesheet");

        log::trace!(
            "parse table: {} productions, {} states, {} shift/reduce and {} reduce/reduce conflicts resolved",
            PRODUCTIONS.len(),
            table.states,
            table.conflicts.shift_reduce,
            table.conflicts.reduce_reduce,
        );
        table
    }

    /// Install a reduction, settling any conflict with what is already there.
    fn resolve(&mut self, state: usize, terminal: Terminal, action: Action) {
        let slot = &mut self.actions[state * Terminal::COUNT + terminal.index()];
        match (*slot, action) {
            (Action::Error, _) => *slot = action,
            (Action::Shift(_), _) => {
                self.conflicts.shift_reduce += 1;
                log::trace!("state {state}: shift over {action:?} on {terminal}");
            }
            (Action::Reduce(existing), Action::Reduce(candidate)) => {
                self.conflicts.reduce_reduce += 1;
                log::trace!(
                    "state {state}: reduce/reduce between {existing} and {candidate} on {terminal}"
                );
                *slot = Action::Reduce(existing.min(candidate));
            }
            (existing, _) => {
                log::trace!("state {state}: keeping {existing:?} over {action:?} on {terminal}");
            }
        }
    }

    /// Action for `state` on `terminal`.
    pub fn action(&self, state: usize, terminal: Terminal) -> Action {
        self.actions
            .get(state * Terminal::COUNT + terminal.index())
            .copied()
            .unwrap_or_default()
    }

    /// State to enter after reducing to `nonterminal` on top of `state`.
    pub fn goto(&self, state: usize, nonterminal: Nonterminal) -> Option<usize> {
        self.gotos
            .get(state * Nonterminal::COUNT + nonterminal as usize)
            .copied()
            .flatten()
    }

    /// Terminals that have a non-error action in `state`.
    pub fn expected(&self, state: usize) -> Vec<Terminal> {
        (0..Terminal::COUNT)
            .filter_map(Terminal::from_index)
            .filter(|&terminal| self.action(state, terminal) != Action::Error)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::TokenKind;

    fn token(kind: TokenKind) -> Terminal {
        Terminal::Token(kind)
    }

    #[test]
    fn test_table_builds_without_reduce_reduce_conflicts() {
        let table = &*PARSE_TABLE;
        assert!(table.states > 1);
        assert_eq!(table.conflicts.reduce_reduce, 0);
        // `a.b`, `a|b`, `*|b` and friends are settled in favour of shifting.
        assert!(table.conflicts.shift_reduce > 0);
    }

    #[test]
    fn test_start_state_accepts_empty_input() {
        let table = &*PARSE_TABLE;
        assert!(matches!(table.action(0, Terminal::End), Action::Reduce(_)));
        assert_eq!(table.action(table.resume, Terminal::End), Action::Accept);
    }

    #[test]
    fn test_statement_starts_are_expected_at_top_level() {
        let table = &*PARSE_TABLE;
        let expected = table.expected(table.resume);
        for terminal in [
            token(TokenKind::Ident),
            token(TokenKind::Star),
            token(TokenKind::Dot),
            token(TokenKind::Hash),
            token(TokenKind::LeftBracket),
            token(TokenKind::Colon),
            token(TokenKind::LeftBrace),
            token(TokenKind::ImportSym),
            token(TokenKind::NamespaceSym),
            token(TokenKind::Cdo),
            Terminal::End,
        ] {
            assert!(expected.contains(&terminal), "{terminal} not expected");
        }
        assert!(!expected.contains(&token(TokenKind::AtKeyword)));
        assert!(!expected.contains(&token(TokenKind::RightBrace)));
    }

    #[test]
    fn test_first_sets() {
        let analysis = Analysis::new();
        let declarations = Nonterminal::OptDeclaration as usize;
        assert!(analysis.nullable[declarations]);
        assert!(analysis.nullable[Nonterminal::Stylesheet as usize]);
        assert!(!analysis.nullable[Nonterminal::Selector as usize]);

        let selector = analysis.first[Nonterminal::Selector as usize];
        assert!(selector.is_superset(TerminalSet::single(token(TokenKind::Pipe))));
        assert!(selector.is_superset(TerminalSet::single(token(TokenKind::ColorKeyword))));
        assert!(!selector.is_superset(TerminalSet::single(token(TokenKind::Greater))));
    }
}
