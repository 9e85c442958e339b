//! FIRST and FOLLOW sets, computed by fixpoint iteration

use super::productions::Grammar;
use super::symbols::{NonTerminal, Symbol, Terminal};
use std::collections::{BTreeMap, BTreeSet};

/// Terminals that can begin a derivation, plus whether it can be empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirstSet {
    pub terminals: BTreeSet<Terminal>,
    pub nullable: bool,
}

impl FirstSet {
    pub fn contains(&self, terminal: &Terminal) -> bool {
        self.terminals.contains(terminal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GrammarAnalysis {
    first: BTreeMap<NonTerminal, FirstSet>,
    follow: BTreeMap<NonTerminal, BTreeSet<Terminal>>,
}

impl GrammarAnalysis {
    pub fn compute(grammar: &Grammar) -> Self {
        let first = compute_first(grammar);
        let follow = compute_follow(grammar, &first);
        Self { first, follow }
    }

    pub fn first(&self, nonterminal: NonTerminal) -> Option<&FirstSet> {
        self.first.get(&nonterminal)
    }

    pub fn follow(&self, nonterminal: NonTerminal) -> Option<&BTreeSet<Terminal>> {
        self.follow.get(&nonterminal)
    }

    /// FIRST of a symbol string; an empty string is nullable
    pub fn first_of_sequence(&self, symbols: &[Symbol]) -> FirstSet {
        first_of_sequence(&self.first, symbols)
    }
}

fn first_of_sequence(first: &BTreeMap<NonTerminal, FirstSet>, symbols: &[Symbol]) -> FirstSet {
    let mut result = FirstSet::default();
    for symbol in symbols {
        match symbol {
            Symbol::Terminal(t) => {
                result.terminals.insert(t.clone());
                return result;
            }
            Symbol::NonTerminal(n) => {
                let Some(set) = first.get(n) else {
                    return result;
                };
                result.terminals.extend(set.terminals.iter().cloned());
                if !set.nullable {
                    return result;
                }
            }
        }
    }
    result.nullable = true;
    result
}

fn compute_first(grammar: &Grammar) -> BTreeMap<NonTerminal, FirstSet> {
    let mut first: BTreeMap<NonTerminal, FirstSet> = grammar
        .nonterminals()
        .into_iter()
        .map(|n| (n, FirstSet::default()))
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for production in grammar.productions() {
            let derived = first_of_sequence(&first, &production.rhs);
            let entry = first.entry(production.lhs).or_default();

            let before = (entry.terminals.len(), entry.nullable);
            entry.terminals.extend(derived.terminals);
            entry.nullable |= derived.nullable;
            changed |= before != (entry.terminals.len(), entry.nullable);
        }
    }
    first
}

fn compute_follow(
    grammar: &Grammar,
    first: &BTreeMap<NonTerminal, FirstSet>,
) -> BTreeMap<NonTerminal, BTreeSet<Terminal>> {
    let mut follow: BTreeMap<NonTerminal, BTreeSet<Terminal>> = grammar
        .nonterminals()
        .into_iter()
        .map(|n| (n, BTreeSet::new()))
        .collect();
    follow
        .entry(grammar.start())
        .or_default()
        .insert(Terminal::eof());

    let mut changed = true;
    while changed {
        changed = false;
        for production in grammar.productions() {
            for (i, symbol) in production.rhs.iter().enumerate() {
                let Symbol::NonTerminal(target) = symbol else {
                    continue;
                };

                let rest = first_of_sequence(first, &production.rhs[i + 1..]);
                let mut additions = rest.terminals;
                if rest.nullable {
                    if let Some(lhs_follow) = follow.get(&production.lhs) {
                        additions.extend(lhs_follow.iter().cloned());
                    }
                }

                let entry = follow.entry(*target).or_default();
                let before = entry.len();
                entry.extend(additions);
                changed |= entry.len() != before;
            }
        }
    }
    follow
}
