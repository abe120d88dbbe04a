use rand::{
    distributions::{Distribution, WeightedError, WeightedIndex},
    Rng,
};
use thiserror::Error;

use crate::{
    grammar::{Grammar, Rule, RuleId, Weight},
    term::{Node, Production, Term},
};

pub const DEFAULT_DEPTH: usize = 8;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Grammar has no entry rule")]
    MissingEntry,
    #[error("Entry rule {0} is not declared in this grammar")]
    UnknownEntry(RuleId),
    #[error("Rule `{0}` has no branches")]
    EmptyRule(String),
    #[error("Rule `{rule}` references {target}, which is not declared in this grammar")]
    UnknownRule { rule: String, target: RuleId },
    #[error("Rule `{rule}` has a branch with weight {weight}")]
    InvalidWeight { rule: String, weight: Weight },
    #[error("Rule `{rule}` has unusable branch weights")]
    Weights {
        rule: String,
        #[source]
        source: WeightedError,
    },
    #[error("Base case of rule `{0}` leads back to itself")]
    UnboundedBaseCase(String),
}
pub type Result<T> = std::result::Result<T, GenerationError>;

enum Selector {
    Uniform(usize),
    Weighted(WeightedIndex<f64>),
}

impl Selector {
    fn new(rule: &Rule) -> Result<Self> {
        let first = rule
            .branches
            .first()
            .ok_or_else(|| GenerationError::EmptyRule(rule.name.to_string()))?;
        if let Some(branch) = rule.branches.iter().find(|b| !b.weight.is_valid()) {
            return Err(GenerationError::InvalidWeight {
                rule: rule.name.to_string(),
                weight: branch.weight,
            });
        }
        let equal = rule.branches.iter().all(|b| b.weight.same_as(first.weight));
        if equal && !first.weight.is_zero() {
            return Ok(Selector::Uniform(rule.branches.len()));
        }
        WeightedIndex::new(rule.branches.iter().map(|b| b.weight.as_f64()))
            .map(Selector::Weighted)
            .map_err(|source| GenerationError::Weights {
                rule: rule.name.to_string(),
                source,
            })
    }

    fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match self {
            Selector::Uniform(n) => rng.gen_range(0..*n),
            Selector::Weighted(index) => index.sample(rng),
        }
    }
}

pub struct Fuzzer<'g> {
    rules: Vec<(&'g Rule, Selector)>,
}

impl<'g> Fuzzer<'g> {
    pub fn new(grammar: &'g Grammar) -> Result<Self> {
        let rules = grammar
            .rules()
            .map(|(_, rule)| Selector::new(rule).map(|selector| (rule, selector)))
            .collect::<Result<Vec<_>>>()?;
        for (rule, _) in &rules {
            let dangling = rule
                .branches
                .iter()
                .flat_map(|b| b.node.rule_refs())
                .find(|target| target.index() >= rules.len());
            if let Some(target) = dangling {
                return Err(GenerationError::UnknownRule {
                    rule: rule.name.to_string(),
                    target,
                });
            }
        }
        check_base_cases(&rules)?;
        Ok(Self { rules })
    }

    /// `max_depth` bounds how many rule expansions may nest along any path
    /// before every rule falls back to its first branch.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        entry: RuleId,
        max_depth: usize,
    ) -> Result<Term> {
        let (rule, _) = self
            .rules
            .get(entry.index())
            .ok_or(GenerationError::UnknownEntry(entry))?;
        log::trace!("expanding `{}` with depth {max_depth}", rule.name);
        let depth = isize::try_from(max_depth).unwrap_or(isize::MAX - 1) + 1;
        Ok(self.expand(rng, &Node::Rule(entry), depth))
    }

    fn expand<R: Rng + ?Sized>(&self, rng: &mut R, node: &Production, depth: isize) -> Term {
        match node {
            Node::Number(v) => Node::Number(*v),
            Node::Bool(v) => Node::Bool(*v),
            Node::Symbol(name) => Node::Symbol(name.clone()),
            Node::Rule(id) => {
                let (rule, selector) = &self.rules[id.index()];
                let index = if depth <= 0 { 0 } else { selector.pick(rng) };
                self.expand(rng, &rule.branches[index].node, depth - 1)
            }
            Node::Triple(a, b, c) => {
                let a = self.expand(rng, a, depth);
                let b = self.expand(rng, b, depth);
                let c = self.expand(rng, c, depth);
                Node::Triple(a.into(), b.into(), c.into())
            }
            Node::Call(name, arg) => {
                let arg = self.expand(rng, arg, depth);
                Node::Call(name.clone(), arg.into())
            }
            Node::BinOp(op, lhs, rhs) => {
                let lhs = self.expand(rng, lhs, depth);
                let rhs = self.expand(rng, rhs, depth);
                Node::BinOp(op.clone(), lhs.into(), rhs.into())
            }
            Node::If {
                cond,
                positive,
                negative,
            } => {
                let cond = self.expand(rng, cond, depth);
                let positive = self.expand(rng, positive, depth);
                let negative = self.expand(rng, negative, depth);
                Node::If {
                    cond: cond.into(),
                    positive: positive.into(),
                    negative: negative.into(),
                }
            }
        }
    }
}

/// Once depth runs out every rule takes its first branch, so the rules
/// reachable through first branches alone must not form a cycle.
fn check_base_cases(rules: &[(&Rule, Selector)]) -> Result<()> {
    #[derive(PartialEq, Eq, Clone, Copy)]
    enum Mark {
        New,
        Open,
        Done,
    }
    fn visit(rules: &[(&Rule, Selector)], index: usize, marks: &mut [Mark]) -> Result<()> {
        let (rule, _) = rules[index];
        match marks[index] {
            Mark::Done => return Ok(()),
            Mark::Open => return Err(GenerationError::UnboundedBaseCase(rule.name.to_string())),
            Mark::New => {}
        }
        marks[index] = Mark::Open;
        for next in rule.branches[0].node.rule_refs() {
            visit(rules, next.index(), marks)?;
        }
        marks[index] = Mark::Done;
        Ok(())
    }

    let mut marks = vec![Mark::New; rules.len()];
    for index in 0..rules.len() {
        visit(rules, index, &mut marks)?;
    }
    Ok(())
}

pub fn fuzz<R: Rng + ?Sized>(rng: &mut R, grammar: &Grammar, depth: usize) -> Result<Term> {
    let entry = grammar.entry().ok_or(GenerationError::MissingEntry)?;
    let term = Fuzzer::new(grammar)?.generate(rng, entry, depth)?;
    log::debug!(
        "generated a term of {} nodes, height {}",
        term.size(),
        term.height()
    );
    Ok(term)
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::grammar::Branch;

    fn single(node: Production) -> Grammar {
        let mut grammar = Grammar::new();
        let id = grammar.define("E", [node]);
        grammar.set_entry(id);
        grammar
    }

    fn contains_symbol(term: &Term, name: &str) -> bool {
        match term {
            Node::Symbol(s) => s.as_str() == name,
            Node::Number(_) | Node::Bool(_) => false,
            Node::Triple(a, b, c) => [a, b, c].iter().any(|t| contains_symbol(t, name)),
            Node::Call(_, arg) => contains_symbol(arg, name),
            Node::BinOp(_, lhs, rhs) => contains_symbol(lhs, name) || contains_symbol(rhs, name),
            Node::If {
                cond,
                positive,
                negative,
            } => [cond, positive, negative]
                .iter()
                .any(|t| contains_symbol(t, name)),
            Node::Rule(r) => match *r {},
        }
    }

    #[test]
    fn test_single_symbol() {
        let grammar = single(Production::symbol("x"));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(fuzz(&mut rng, &grammar, 0).unwrap(), Term::symbol("x"));
    }

    #[test]
    fn test_deterministic() {
        let grammar = crate::grammars::default_grammar();
        let a = fuzz(&mut StdRng::seed_from_u64(42), &grammar, DEFAULT_DEPTH).unwrap();
        let b = fuzz(&mut StdRng::seed_from_u64(42), &grammar, DEFAULT_DEPTH).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_terminates_for_every_depth() {
        let grammar = crate::grammars::default_grammar();
        let mut rng = StdRng::seed_from_u64(7);
        for depth in 0..6 {
            let term = fuzz(&mut rng, &grammar, depth).unwrap();
            assert!(matches!(term, Node::Triple(..)));
        }
    }

    #[test]
    fn test_base_case_at_depth_zero() {
        // Entry consumes the one unit of slack, so C is expanded at depth 0
        // and must always take its first branch even though it weighs nothing
        // compared to the recursive one.
        let mut grammar = Grammar::new();
        let c = grammar.declare("C");
        let base = Branch::weighted(Production::symbol("y"), Weight::ratio(1, 1000));
        grammar.push_branch(c, base);
        grammar.push_branch(
            c,
            Branch::weighted(
                Production::binop("mul", Node::Rule(c), Node::Rule(c)),
                Weight::new(1000),
            ),
        );
        let e = grammar.define("E", [Production::call("sin", Node::Rule(c))]);
        grammar.set_entry(e);

        for seed in 0..32 {
            let term = fuzz(&mut StdRng::seed_from_u64(seed), &grammar, 0).unwrap();
            assert_eq!(term, Term::call("sin", Term::symbol("y")));
        }
    }

    #[test]
    fn test_depth_bounds_rule_nesting() {
        let mut grammar = Grammar::new();
        let c = grammar.declare("C");
        grammar.push_branch(c, Branch::weighted(Production::symbol("x"), Weight::new(0)));
        grammar.push_branch(c, Production::call("cos", Node::Rule(c)));
        grammar.set_entry(c);

        // Only the recursive branch can be drawn, so every expansion above
        // depth 0 adds a `cos` and the one at depth 0 takes the base case.
        let term = fuzz(&mut StdRng::seed_from_u64(1), &grammar, 3).unwrap();
        assert_eq!(term.height(), 5);
        assert_eq!(term.to_string(), "(cos (cos (cos (cos x))))");
    }

    #[test]
    fn test_weighted_never_picks_zero_weight() {
        let mut grammar = Grammar::new();
        let a = grammar.declare("A");
        grammar.push_branch(a, Branch::weighted(Production::symbol("x"), Weight::ratio(1, 4)));
        grammar.push_branch(a, Branch::weighted(Production::symbol("rnd"), Weight::new(0)));
        grammar.push_branch(a, Branch::weighted(Production::symbol("y"), Weight::ratio(3, 4)));
        let e = grammar.define(
            "E",
            [Production::triple(Node::Rule(a), Node::Rule(a), Node::Rule(a))],
        );
        grammar.set_entry(e);

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..64 {
            let term = fuzz(&mut rng, &grammar, 4).unwrap();
            assert!(!contains_symbol(&term, "rnd"));
        }
    }

    #[test]
    fn test_example_grammar() {
        let grammar = crate::grammars::example_grammar();
        let mut rng = StdRng::seed_from_u64(11);
        let term = fuzz(&mut rng, &grammar, DEFAULT_DEPTH).unwrap();
        assert!(matches!(term, Node::Triple(..)));
    }

    #[test]
    fn test_invalid_grammars() {
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            fuzz(&mut rng, &Grammar::new(), 1),
            Err(GenerationError::MissingEntry)
        ));

        let mut grammar = Grammar::new();
        let e = grammar.declare("E");
        grammar.set_entry(e);
        assert!(matches!(
            fuzz(&mut rng, &grammar, 1),
            Err(GenerationError::EmptyRule(name)) if name.as_str() == "E"
        ));

        let mut grammar = Grammar::new();
        let e = grammar.define(
            "E",
            [
                Branch::weighted(Production::symbol("x"), Weight::new(0)),
                Branch::weighted(Production::symbol("y"), Weight::new(0)),
            ],
        );
        grammar.set_entry(e);
        assert!(matches!(
            fuzz(&mut rng, &grammar, 1),
            Err(GenerationError::Weights { .. })
        ));

        let mut grammar = Grammar::new();
        let broken = Branch::weighted(Production::symbol("x"), Weight::ratio(1, 0));
        let e = grammar.define("E", [broken]);
        grammar.set_entry(e);
        assert!(matches!(
            fuzz(&mut rng, &grammar, 1),
            Err(GenerationError::InvalidWeight { .. })
        ));

        let mut grammar = Grammar::new();
        let a = grammar.declare("A");
        let b = grammar.define("B", [Production::call("exp", Node::Rule(a))]);
        grammar.push_branch(a, Node::Rule(b));
        grammar.set_entry(a);
        assert!(matches!(
            fuzz(&mut rng, &grammar, 1),
            Err(GenerationError::UnboundedBaseCase(_))
        ));

        let mut other = Grammar::new();
        other.declare("X");
        let foreign = other.declare("Y");
        let grammar = single(Node::Rule(foreign));
        assert!(matches!(
            fuzz(&mut rng, &grammar, 1),
            Err(GenerationError::UnknownRule { .. })
        ));
    }
}
