use std::rc::Rc;

use crate::{grammar::RuleId, prelude::*};

#[derive(PartialEq, Eq, Hash, Clone, Copy, derive_more::Display, Debug)]
pub enum Kind {
    #[display(fmt = "Number")]
    Number,
    #[display(fmt = "Bool")]
    Bool,
    #[display(fmt = "Symbol")]
    Symbol,
    #[display(fmt = "Triple")]
    Triple,
    #[display(fmt = "Call")]
    Call,
    #[display(fmt = "BinOp")]
    BinOp,
    #[display(fmt = "If")]
    If,
    #[display(fmt = "Rule")]
    Rule,
}

/// Payload of [`Node::Rule`] in a concrete term. It has no values, so a
/// [`Term`] can never hold a rule reference.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Concrete {}

impl std::fmt::Display for Concrete {
    fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {}
    }
}

/// An expression node. `R` is what a rule reference points at: a [`RuleId`]
/// inside a grammar, nothing at all once the tree is concrete.
#[derive(PartialEq, Clone, Debug)]
pub enum Node<R> {
    Number(f64),
    Bool(bool),
    Symbol(Identifier),
    Triple(Rc<Self>, Rc<Self>, Rc<Self>),
    Call(Identifier, Rc<Self>),
    BinOp(Identifier, Rc<Self>, Rc<Self>),
    If {
        cond: Rc<Self>,
        positive: Rc<Self>,
        negative: Rc<Self>,
    },
    Rule(R),
}

pub type Term = Node<Concrete>;
pub type Production = Node<RuleId>;

impl<R> Node<R> {
    pub fn number(v: f64) -> Self {
        Node::Number(v)
    }

    pub fn symbol(name: &str) -> Self {
        Node::Symbol(ident(name))
    }

    pub fn triple(a: Self, b: Self, c: Self) -> Self {
        Node::Triple(a.into(), b.into(), c.into())
    }

    pub fn call(name: &str, arg: Self) -> Self {
        Node::Call(ident(name), arg.into())
    }

    pub fn binop(op: &str, lhs: Self, rhs: Self) -> Self {
        Node::BinOp(ident(op), lhs.into(), rhs.into())
    }

    pub fn if_then_else(cond: Self, positive: Self, negative: Self) -> Self {
        Node::If {
            cond: cond.into(),
            positive: positive.into(),
            negative: negative.into(),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Node::Number(_) => Kind::Number,
            Node::Bool(_) => Kind::Bool,
            Node::Symbol(_) => Kind::Symbol,
            Node::Triple(..) => Kind::Triple,
            Node::Call(..) => Kind::Call,
            Node::BinOp(..) => Kind::BinOp,
            Node::If { .. } => Kind::If,
            Node::Rule(_) => Kind::Rule,
        }
    }

    fn children(&self) -> Vec<&Self> {
        match self {
            Node::Number(_) | Node::Bool(_) | Node::Symbol(_) | Node::Rule(_) => vec![],
            Node::Triple(a, b, c) => vec![a.as_ref(), b.as_ref(), c.as_ref()],
            Node::Call(_, arg) => vec![arg.as_ref()],
            Node::BinOp(_, lhs, rhs) => vec![lhs.as_ref(), rhs.as_ref()],
            Node::If {
                cond,
                positive,
                negative,
            } => vec![cond.as_ref(), positive.as_ref(), negative.as_ref()],
        }
    }

    pub fn size(&self) -> usize {
        1 + self.children().into_iter().map(Self::size).sum::<usize>()
    }

    /// Length of the longest root-to-leaf path, counting nodes.
    pub fn height(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Self::height)
            .max()
            .unwrap_or(0)
    }
}

impl Production {
    /// Rule handles referenced anywhere below this node, in visiting order.
    pub fn rule_refs(&self) -> Vec<RuleId> {
        fn rec(node: &Production, acc: &mut Vec<RuleId>) {
            if let Node::Rule(id) = node {
                acc.push(*id);
            }
            for child in node.children() {
                rec(child, acc);
            }
        }
        let mut acc = vec![];
        rec(self, &mut acc);
        acc
    }
}

impl<R> From<f64> for Node<R> {
    fn from(v: f64) -> Self {
        Node::Number(v)
    }
}

impl<R: std::fmt::Display> std::fmt::Display for Node<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Number(v) => f.write_fmt(format_args!("{v}")),
            Node::Bool(v) => f.write_fmt(format_args!("{v}")),
            Node::Symbol(name) => f.write_str(name),
            Node::Triple(a, b, c) => f.write_fmt(format_args!("(triple {a} {b} {c})")),
            Node::Call(name, arg) => f.write_fmt(format_args!("({name} {arg})")),
            Node::BinOp(op, lhs, rhs) => f.write_fmt(format_args!("({op} {lhs} {rhs})")),
            Node::If {
                cond,
                positive,
                negative,
            } => f.write_fmt(format_args!("(if {cond} {positive} {negative})")),
            Node::Rule(rule) => f.write_fmt(format_args!("{rule}")),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let term = Term::if_then_else(
            Term::binop("gt", Term::symbol("x"), Term::symbol("rnd")),
            Term::triple(Term::symbol("x"), Term::symbol("y"), 1.0.into()),
            Term::call("sin", Term::binop("mul", Term::symbol("y"), (-0.5).into())),
        );
        assert_eq!(
            term.to_string(),
            "(if (gt x rnd) (triple x y 1) (sin (mul y -0.5)))"
        );
    }

    #[test]
    fn test_size_and_height() {
        let leaf = Term::symbol("x");
        assert_eq!(leaf.size(), 1);
        assert_eq!(leaf.height(), 1);

        let term = Term::binop("add", Term::call("cos", Term::symbol("x")), 0.25.into());
        assert_eq!(term.size(), 4);
        assert_eq!(term.height(), 3);
        assert_eq!(term.kind(), Kind::BinOp);
    }

    #[test]
    fn test_rule_refs() {
        let mut grammar = crate::grammar::Grammar::new();
        let a = grammar.declare("A");
        let c = grammar.declare("C");
        let production = Production::binop(
            "add",
            Node::Rule(c),
            Production::call("exp", Node::Rule(a)),
        );
        assert_eq!(production.rule_refs(), vec![c, a]);
        assert_eq!(Node::Rule(a).kind(), Kind::Rule);
    }
}
