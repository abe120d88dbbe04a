//! Built-in grammars and hand-written terms.

use crate::{
    grammar::{Branch, Grammar, Weight},
    term::{Node, Production, Term},
};

/// The grammar images are generated from unless told otherwise.
///
/// ```text
/// E ::= (C, C, C)
/// A ::= x | y | rnd
/// C ::= A | if x > rnd then C else C | if y > C then C else C
///     | C + C | C * C | C % C | C / -0.112 | sin(C * A)
///     | exp(C) | sqrt(C) | log(0.7741) | if A * -0.048 >= 0.1134 then C else C
/// ```
pub fn default_grammar() -> Grammar {
    let mut grammar = Grammar::new();
    let a = grammar.define("A", ["x", "y", "rnd"].map(Production::symbol));
    let c = grammar.declare("C");
    let rc = || Production::Rule(c);
    let ra = || Production::Rule(a);

    let branches = [
        ra(),
        Production::if_then_else(
            Production::binop("gt", Production::symbol("x"), Production::symbol("rnd")),
            rc(),
            rc(),
        ),
        Production::if_then_else(
            Production::binop("gt", Production::symbol("y"), rc()),
            rc(),
            rc(),
        ),
        Production::binop("add", rc(), rc()),
        Production::binop("mul", rc(), rc()),
        Production::binop("mod", rc(), rc()),
        Production::binop("div", rc(), (-0.112).into()),
        Production::call("sin", Production::binop("mul", rc(), ra())),
        Production::call("exp", rc()),
        Production::call("sqrt", rc()),
        Production::call("log", 0.7741.into()),
        Production::if_then_else(
            Production::binop(
                "gte",
                Production::binop("mul", ra(), (-0.048).into()),
                0.1134.into(),
            ),
            rc(),
            rc(),
        ),
    ];
    for branch in branches {
        grammar.push_branch(c, branch);
    }

    let e = grammar.define("E", [Production::triple(rc(), rc(), rc())]);
    grammar.set_entry(e);
    grammar
}

/// A smaller grammar with explicit weights that favours sums and products.
pub fn example_grammar() -> Grammar {
    let mut grammar = Grammar::new();
    let third = Weight::ratio(1, 3);
    let a = grammar.define(
        "A",
        ["x", "y", "rnd"].map(|s| Branch::weighted(Production::symbol(s), third)),
    );
    let c = grammar.declare("C");
    let rc = || Production::Rule(c);
    grammar.push_branch(c, Branch::weighted(Node::Rule(a), Weight::ratio(1, 4)));
    grammar.push_branch(
        c,
        Branch::weighted(Production::binop("add", rc(), rc()), Weight::ratio(3, 8)),
    );
    grammar.push_branch(
        c,
        Branch::weighted(Production::binop("mul", rc(), rc()), Weight::ratio(3, 8)),
    );

    let e = grammar.define(
        "E",
        [Branch::weighted(Production::triple(rc(), rc(), rc()), Weight::ONE)],
    );
    grammar.set_entry(e);
    grammar
}

/// Horizontal black-to-white gradient.
pub fn grayscale() -> Term {
    Term::symbol("x")
}

/// Blue-ish quadrants where `x` and `y` share a sign, gray `x mod y` elsewhere.
pub fn cool() -> Term {
    let x = || Term::symbol("x");
    let y = || Term::symbol("y");
    let modulo = || Term::binop("mod", x(), y());
    Term::if_then_else(
        Term::binop("gte", Term::binop("mul", x(), y()), 0.0.into()),
        Term::triple(x(), y(), 1.0.into()),
        Term::triple(modulo(), modulo(), modulo()),
    )
}
